use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkpack::config::Config;
use inkpack::pipeline::{Pipeline, Source};

#[derive(Parser)]
#[command(name = "inkpack")]
#[command(about = "Inkpack - page converter for XTC/XTH/XTG e-paper reader formats")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert page sources into a container, frame files, or decoded PNGs
    Convert {
        /// Input files (.png, .xtg, .xth, .xtc), each with an optional
        /// page selection suffix like book.xtc:1-10
        #[arg(required = true)]
        sources: Vec<String>,

        /// Output file; the extension picks the mode (.xtc container,
        /// .xth/.xtg frame files, .png decoded previews)
        #[arg(short, long)]
        output: PathBuf,

        /// Config file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert {
            sources,
            output,
            config,
        } => run_convert(&sources, &output, config.as_deref()),
    }
}

fn run_convert(
    sources: &[String],
    output: &PathBuf,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    let pipeline = Pipeline::new(config)?;

    let sources: Vec<Source> = sources.iter().map(|arg| Source::from_arg(arg)).collect();
    tracing::info!(sources = sources.len(), output = %output.display(), "converting");

    let summary = pipeline.run(&sources, output)?;
    tracing::info!(
        pages = summary.pages,
        chapters = summary.chapters,
        "done: {}",
        output.display()
    );
    Ok(())
}
