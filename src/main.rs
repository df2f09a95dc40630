use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use huffman_rust::{compress_to, decompress_to, CodecConfig, CodecReport, HuffmanError};

#[derive(Parser, Debug)]
#[command(name = "huffman", version, about = "Lossless static Huffman compression of single files")]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Properties file with codec settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Replace existing output files
    #[arg(long, global = true, default_value_t = false)]
    overwrite: bool,
    /// Write a <output>.stats.json report
    #[arg(long, global = true, default_value_t = false)]
    stats: bool,
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, default_value_t = false)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file
    Compress {
        input: PathBuf,
        /// Output file (defaults to the input with the compressed extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompress a file
    Decompress {
        input: PathBuf,
        /// Output file (defaults to the input with the decompressed extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set up the global logger");
}

fn run(args: Args) -> Result<CodecReport, HuffmanError> {
    let mut config = match &args.config {
        Some(path) => CodecConfig::load(path)?,
        None => CodecConfig::default(),
    };
    config.overwrite |= args.overwrite;
    config.write_stats |= args.stats;

    match args.command {
        Command::Compress { input, output } => {
            let output = output.unwrap_or_else(|| config.compressed_path(&input));
            compress_to(&input, &output, &config)
        }
        Command::Decompress { input, output } => {
            let output = output.unwrap_or_else(|| config.decompressed_path(&input));
            decompress_to(&input, &output, &config)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(args) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let mut msg = e.to_string();
            let mut source = e.source();
            while let Some(cause) = source {
                msg.push_str(&format!(": {}", cause));
                source = cause.source();
            }
            error!("{}", msg);
            ExitCode::FAILURE
        }
    }
}
