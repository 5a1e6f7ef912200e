//! 2-bpp grayscale bitplane packing (XTH payloads).
//!
//! Each frame stores two bitplanes: plane 1 holds the high bit of every
//! pixel's level, plane 2 the low bit. Planes are packed column-major with
//! columns traversed right-to-left and 8 vertical pixels per byte, top row
//! in the MSB. This matches the scan order of the target controller's
//! refresh hardware, so the device never transposes.

use eink_quant::LevelImage;

/// Pack 4-level indices into two concatenated bitplanes.
pub(super) fn pack(levels: &LevelImage) -> Vec<u8> {
    let width = levels.width() as usize;
    let height = levels.height() as usize;
    let plane_size = width * ((height + 7) / 8);
    let data = levels.data();

    let mut plane_high = Vec::with_capacity(plane_size);
    let mut plane_low = Vec::with_capacity(plane_size);

    for x in (0..width).rev() {
        let mut y0 = 0;
        while y0 < height {
            let mut high = 0u8;
            let mut low = 0u8;
            for i in 0..8 {
                let y = y0 + i;
                if y < height {
                    let level = data[y * width + x];
                    high |= ((level >> 1) & 1) << (7 - i);
                    low |= (level & 1) << (7 - i);
                }
            }
            plane_high.push(high);
            plane_low.push(low);
            y0 += 8;
        }
    }

    plane_high.extend_from_slice(&plane_low);
    plane_high
}

/// Unpack two concatenated bitplanes back into 4-level indices.
///
/// The caller has already validated `payload.len()` against the packing
/// rule for these dimensions.
pub(super) fn unpack(payload: &[u8], width: u16, height: u16) -> Vec<u8> {
    let width = width as usize;
    let height = height as usize;
    let plane_size = payload.len() / 2;
    let (plane_high, plane_low) = payload.split_at(plane_size);

    let mut out = vec![0u8; width * height];
    let mut byte_idx = 0;
    for x in (0..width).rev() {
        let mut y0 = 0;
        while y0 < height {
            let high = plane_high[byte_idx];
            let low = plane_low[byte_idx];
            for i in 0..8 {
                let y = y0 + i;
                if y < height {
                    let bit_high = (high >> (7 - i)) & 1;
                    let bit_low = (low >> (7 - i)) & 1;
                    out[y * width + x] = (bit_high << 1) | bit_low;
                }
            }
            byte_idx += 1;
            y0 += 8;
        }
    }
    out
}
