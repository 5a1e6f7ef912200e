//! 1-bpp monochrome packing (XTG payloads).
//!
//! Row-major, 8 horizontal pixels per byte, MSB = leftmost pixel. Rows are
//! padded to a byte boundary; pad bits are zero.

use eink_quant::LevelImage;

/// Pack 2-level indices into a row-major bitmap.
pub(super) fn pack(levels: &LevelImage) -> Vec<u8> {
    let width = levels.width() as usize;
    let height = levels.height() as usize;
    let bytes_per_row = (width + 7) / 8;
    let data = levels.data();

    let mut out = Vec::with_capacity(height * bytes_per_row);
    for y in 0..height {
        for byte_idx in 0..bytes_per_row {
            let mut byte = 0u8;
            for bit in 0..8 {
                let x = byte_idx * 8 + bit;
                if x < width {
                    byte |= data[y * width + x] << (7 - bit);
                }
            }
            out.push(byte);
        }
    }
    out
}

/// Unpack a row-major bitmap back into 2-level indices.
///
/// The caller has already validated `payload.len()` against the packing
/// rule for these dimensions.
pub(super) fn unpack(payload: &[u8], width: u16, height: u16) -> Vec<u8> {
    let width = width as usize;
    let height = height as usize;
    let bytes_per_row = (width + 7) / 8;

    let mut out = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let byte = payload[y * bytes_per_row + x / 8];
            out[y * width + x] = (byte >> (7 - x % 8)) & 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pack_2x2_scenario() {
        // Samples [0, 255, 255, 0] quantized at threshold 128 give levels
        // [0, 1, 1, 0]; packed row-major MSB-first that is 0100 0000 for
        // row 0 and 1000 0000 for row 1.
        let levels = LevelImage::new(2, 2, 2, vec![0, 1, 1, 0]).unwrap();
        let packed = pack(&levels);
        assert_eq!(packed, vec![0b0100_0000, 0b1000_0000]);
    }

    #[test]
    fn test_pack_full_byte_row() {
        let levels = LevelImage::new(8, 1, 2, vec![1, 0, 1, 0, 1, 0, 1, 0]).unwrap();
        assert_eq!(pack(&levels), vec![0b1010_1010]);
    }

    #[test]
    fn test_pack_pads_trailing_bits_with_zero() {
        // Width 9: second byte of each row carries one pixel in its MSB.
        let levels = LevelImage::new(9, 1, 2, vec![1; 9]).unwrap();
        assert_eq!(pack(&levels), vec![0b1111_1111, 0b1000_0000]);
    }

    #[test]
    fn test_unpack_reverses_pack() {
        let data: Vec<u8> = (0..11 * 5).map(|i| (i % 2) as u8).collect();
        let levels = LevelImage::new(11, 5, 2, data).unwrap();
        let packed = pack(&levels);
        assert_eq!(unpack(&packed, 11, 5), levels.data());
    }
}
