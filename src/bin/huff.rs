//! huff CLI - Huffman compressor/decompressor
//!
//! Compresses a file to `<name>.huf` or restores it, optionally printing the
//! Huffman tree in Graphviz format.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use huffpack::config::HuffConfig;
use huffpack::container;
use huffpack::export::Dot;
use huffpack::{Compressor, Mode};

const SUFFIX: &str = ".huf";
const FALLBACK_SUFFIX: &str = ".dehuf";

/// Huffman compressor/decompressor.
#[derive(Parser, Debug)]
#[command(name = "huff")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("action").required(true).args(["compress", "extract"])))]
#[command(group(ArgGroup::new("tree_mode").args(["verbose_tree", "compact_tree"])))]
struct Args {
    /// Compress FILE into FILE.huf
    #[arg(short = 'c', value_name = "FILE")]
    compress: Option<PathBuf>,

    /// Decompress FILE, stripping the .huf suffix
    #[arg(short = 'x', value_name = "FILE")]
    extract: Option<PathBuf>,

    /// Standard compression, two bytes per tree node (default)
    #[arg(short = '1')]
    verbose_tree: bool,

    /// Higher compression ratio, bit-packed tree
    #[arg(short = '2')]
    compact_tree: bool,

    /// Quiet
    #[arg(short, long)]
    quiet: bool,

    /// Print the Huffman tree in Graphviz format
    #[arg(short = 'p', long = "print-tree")]
    print_tree: bool,

    /// Output file (derived from the input name when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the operation report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Compress,
    Decompress,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.quiet || args.print_tree);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => HuffConfig::load(path)
            .with_context(|| format!("can't load config {}", path.display()))?,
        None => HuffConfig::default(),
    };
    if args.compact_tree {
        config.mode = Mode::Compact;
    } else if args.verbose_tree {
        config.mode = Mode::Verbose;
    }

    let (action, input_path) = match (&args.compress, &args.extract) {
        (Some(path), _) => (Action::Compress, path),
        (None, Some(path)) => (Action::Decompress, path),
        (None, None) => anyhow::bail!("nothing to do, pass -c or -x"),
    };
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| output_path(input_path, action));

    info!(input = %input_path.display(), "input");
    let input = File::open(input_path).context("can't open input file")?;
    info!(output = %output_path.display(), "output");
    let output = File::create(&output_path).context("can't create output file")?;

    let compressor = Compressor::new(config);
    let stdout = io::stdout();
    let mut stdout = BufWriter::new(stdout.lock());

    match action {
        Action::Compress => {
            let report = compressor.compress(input, output)?;
            if args.print_tree {
                let tree = compressor.analyze(File::open(input_path)?)?;
                write!(stdout, "{}", Dot(&tree))?;
            }
            if args.json {
                serde_json::to_writer_pretty(&mut stdout, &report)?;
                writeln!(stdout)?;
            }
        }
        Action::Decompress => {
            let report = compressor.decompress(input, output)?;
            if args.print_tree {
                let (_, tree) = container::read_tree(io::BufReader::new(File::open(input_path)?))?;
                write!(stdout, "{}", Dot(&tree))?;
            }
            if args.json {
                serde_json::to_writer_pretty(&mut stdout, &report)?;
                writeln!(stdout)?;
            }
        }
    }
    stdout.flush()?;
    Ok(())
}

/// Appends `.huf` when compressing. When decompressing, strips `.huf` from a
/// name that is longer than the suffix itself, otherwise appends `.dehuf`.
fn output_path(input: &Path, action: Action) -> PathBuf {
    let name = input.as_os_str().to_string_lossy();
    match action {
        Action::Compress => PathBuf::from(format!("{name}{SUFFIX}")),
        Action::Decompress => {
            let is_bare_suffix = input
                .file_name()
                .map_or(true, |file| file.to_string_lossy() == SUFFIX);
            match name.strip_suffix(SUFFIX) {
                Some(stem) if !is_bare_suffix && !stem.is_empty() => PathBuf::from(stem),
                _ => PathBuf::from(format!("{name}{FALLBACK_SUFFIX}")),
            }
        }
    }
}
