use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use study_ingest::parser::mime;
use study_ingest::{ParserConfig, ParserRegistry, RawContent};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "study-ingest", version, about = "Turn uploaded files into text for AI ingestion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ParserArgs {
    /// JSON config file (flags below override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accept any well-formed MIME type via the binary fallback
    #[arg(long)]
    accept_unknown: bool,

    /// Maximum characters of extracted text
    #[arg(long)]
    max_text_chars: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a single file and print the result
    Parse {
        file: PathBuf,

        /// Declared MIME type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,

        #[command(flatten)]
        args: ParserArgs,
    },
    /// Parse every file under a directory and print a report
    Scan {
        dir: PathBuf,

        /// Files parsed concurrently
        #[arg(long, default_value_t = 8)]
        concurrency: usize,

        #[command(flatten)]
        args: ParserArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,study_ingest=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Parse { file, mime, args } => parse_one(&file, mime, &args).await,
        Command::Scan {
            dir,
            concurrency,
            args,
        } => scan(&dir, concurrency, &args).await,
    }
}

fn load_config(args: &ParserArgs) -> Result<ParserConfig> {
    let mut config = match &args.config {
        Some(path) => ParserConfig::from_json_file(path)?,
        None => ParserConfig::default(),
    };

    if args.accept_unknown {
        config.accept_unknown = true;
    }
    if let Some(chars) = args.max_text_chars {
        config.max_text_chars = chars;
    }

    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

async fn parse_one(file: &Path, declared: Option<String>, args: &ParserArgs) -> Result<()> {
    let registry = ParserRegistry::from_config(&load_config(args)?);
    let mime_type = declared.unwrap_or_else(|| mime::guess_from_path(file));

    match registry.parse(RawContent::from_path(file), &mime_type).await {
        Ok(parsed) => print_json(&parsed, args.pretty),
        Err(e) => {
            let message = format!("{}: {}", file.display(), e.user_message());
            Err(e).context(message)
        }
    }
}

async fn scan(dir: &Path, concurrency: usize, args: &ParserArgs) -> Result<()> {
    let registry = ParserRegistry::from_config(&load_config(args)?);
    let report = study_ingest::scan_dir(&registry, dir, concurrency).await;
    print_json(&report, args.pretty)
}
