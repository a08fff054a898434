use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use hfm::config::CodecConfig;
use hfm::Codec;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Compress SRC into the artifact DST
    Zip,
    /// Restore DST from the artifact SRC
    Unzip,
    /// Show the header of the artifact SRC
    Info,
}

#[derive(Debug, Parser)]
#[command(version, about = "Huffman file compressor")]
struct Cli {
    action: Action,

    /// Input file
    src: PathBuf,

    /// Output file
    #[arg(required_if_eq_any([("action", "zip"), ("action", "unzip")]))]
    dst: Option<PathBuf>,

    /// JSON codec configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Decode each fresh artifact and compare it with the input
    #[arg(long)]
    verify: bool,

    /// Write the output file in place instead of through a temporary file
    #[arg(long)]
    no_atomic: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(cli: &Cli) -> anyhow::Result<CodecConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_slice(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => CodecConfig::default(),
    };
    if cli.verify {
        config.verify_after_encode = true;
    }
    if cli.no_atomic {
        config.atomic_write = false;
    }
    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let codec = Codec::new(load_config(cli)?);
    let dst = || cli.dst.as_deref().context("missing destination path");

    match cli.action {
        Action::Zip => {
            let dst = dst()?;
            let stats = codec
                .zip_file(&cli.src, dst)
                .with_context(|| format!("compressing {}", cli.src.display()))?;
            info!(
                src = %cli.src.display(),
                dst = %dst.display(),
                original = stats.original_size,
                compressed = stats.compressed_size,
                ratio = stats.ratio,
                entropy = stats.entropy_bits,
                "compressed"
            );
        }
        Action::Unzip => {
            let dst = dst()?;
            let len = codec
                .unzip_file(&cli.src, dst)
                .with_context(|| format!("decompressing {}", cli.src.display()))?;
            info!(src = %cli.src.display(), dst = %dst.display(), len, "decompressed");
        }
        Action::Info => {
            let artifact = std::fs::read(&cli.src)
                .with_context(|| format!("reading {}", cli.src.display()))?;
            let header = codec
                .inspect(&artifact)
                .with_context(|| format!("parsing header of {}", cli.src.display()))?;
            info!(
                version = header.version,
                create_time = header.create_time,
                content_bit_len = header.content_bit_len,
                code_table_len = header.code_table_len,
                symbols = header.codes.len(),
                "header"
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
