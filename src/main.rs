use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;
use sanitize::{HtmlSanitizer, SanitizerConfig};
use tagging::{DocumentRef, SuggesterConfig};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Allow-list HTML sanitizing and tag suggestion
#[derive(Parser)]
#[command(name = "hippo", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sanitize HTML against an allow-list and print the result
    Sanitize {
        /// Allow-list config (TOML); the built-in allow-list when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// HTML input file (default: stdin)
        input: Option<PathBuf>,
    },
    /// Suggest tags for a JSON document and print them as JSON
    Suggest {
        /// Suggester config (TOML); keyword and tag cloud providers when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON array of tagged documents feeding the tag cloud
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Maximum number of suggestions, overrides the config
        #[arg(long)]
        limit: Option<usize>,

        /// JSON document to suggest tags for
        document: PathBuf,
    },
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn sanitize(config: Option<&Path>, input: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let sanitizer = match config {
        Some(path) => SanitizerConfig::load(path)?.build_sanitizer(),
        None => HtmlSanitizer::default(),
    };
    info!("sanitizing with {} allow-listed elements", sanitizer.filter().len());
    let html = read_input(input)?;
    let clean = sanitizer.clean(&html)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{clean}")?;
    Ok(())
}

fn suggest(
    config: Option<&Path>,
    corpus: Option<&Path>,
    limit: Option<usize>,
    document: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut config = match config {
        Some(path) => SuggesterConfig::load(path)?,
        None => SuggesterConfig::default(),
    };
    if let Some(limit) = limit {
        config.limit = limit;
    }
    let corpus: Vec<DocumentRef> = match corpus {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    let document: DocumentRef = serde_json::from_str(&fs::read_to_string(document)?)?;
    info!(
        "suggesting tags for '{}' with a corpus of {} documents",
        document.id,
        corpus.len()
    );

    let tags = config.build(&corpus).suggest(&document);
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &tags)?;
    writeln!(stdout)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Sanitize { config, input } => sanitize(config.as_deref(), input.as_deref()),
        Command::Suggest {
            config,
            corpus,
            limit,
            document,
        } => suggest(config.as_deref(), corpus.as_deref(), limit, &document),
    }
}
