//! dirdupe - a backup auditing toolkit.
//!
//! Usage:
//!   dirdupe scan DIR -o hashes.txt       Hash every file under DIR
//!   dirdupe find hashes.txt              Report duplicated folders
//!   dirdupe upgrade old.txt -o new.txt   Upgrade the oldest inventory layout
//!   dirdupe --help                       Show help

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dirdupe_analyze::{BestMatches, FolderMatcher};
use dirdupe_core::{DirTree, MatchConfig, ingest, upgrade_legacy};
use dirdupe_report::{ordered_reports, write_report};
use dirdupe_scan::{InventoryScanner, ScanConfig};

#[derive(Parser)]
#[command(
    name = "dirdupe",
    version,
    about = "Find duplicated folder trees in content-hash inventories",
    long_about = "dirdupe audits backups.\n\n\
                  Scan a directory into a hash inventory with `dirdupe scan`, then \
                  feed the inventory to `dirdupe find` to report folders whose \
                  contents mostly match each other — including a folder matching \
                  itself, which flags duplicate files inside it."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hash every file under a directory into an inventory
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Follow symbolic links
        #[arg(long)]
        follow_symlinks: bool,

        /// Skip hidden files and directories
        #[arg(long)]
        skip_hidden: bool,

        /// Number of walker threads (0 = auto)
        #[arg(short, long, default_value = "0")]
        threads: usize,
    },

    /// Report folders with mostly matching contents
    Find {
        /// Inventory produced by `dirdupe scan`
        hashes: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory name to skip as a comparison subject; repeatable,
        /// replaces the default set (.git, .svn)
        #[arg(short = 'x', long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Rewrite the oldest inventory layout into the current one
    Upgrade {
        /// Legacy inventory file
        hashes: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            dir,
            output,
            follow_symlinks,
            skip_hidden,
            threads,
        } => run_scan(&dir, output, follow_symlinks, skip_hidden, threads),
        Command::Find {
            hashes,
            output,
            exclude,
            format,
        } => run_find(&hashes, output, exclude, format),
        Command::Upgrade { hashes, output } => run_upgrade(&hashes, output),
    }
}

/// Hash a directory into an inventory stream.
fn run_scan(
    dir: &Path,
    output: Option<PathBuf>,
    follow_symlinks: bool,
    skip_hidden: bool,
    threads: usize,
) -> Result<()> {
    let config = ScanConfig::builder()
        .root(dir)
        .follow_symlinks(follow_symlinks)
        .include_hidden(!skip_hidden)
        .threads(threads)
        .build()
        .wrap_err("invalid scan configuration")?;

    eprintln!("Scanning {}...", dir.display());

    let scanner = InventoryScanner::new(config);
    let stats = match output {
        Some(path) => {
            let file = File::create(&path)
                .wrap_err_with(|| format!("cannot create {}", path.display()))?;
            scanner.scan(BufWriter::new(file))?
        }
        None => scanner.scan(BufWriter::new(io::stdout().lock()))?,
    };

    eprintln!(
        "{} files hashed, {} total, {} skipped",
        stats.files,
        format_size(stats.bytes),
        stats.skipped
    );
    Ok(())
}

/// Run ingest → analyze → report over one inventory.
fn run_find(
    hashes: &Path,
    output: Option<PathBuf>,
    exclude: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let file =
        File::open(hashes).wrap_err_with(|| format!("cannot open {}", hashes.display()))?;
    let tree = ingest(BufReader::new(file)).wrap_err("invalid inventory")?;
    info!(
        files = tree.file_count(),
        dirs = tree.dir_count(),
        "inventory loaded"
    );

    let config = if exclude.is_empty() {
        MatchConfig::default()
    } else {
        MatchConfig::builder()
            .excluded_dirs(exclude)
            .build()
            .wrap_err("invalid match configuration")?
    };
    let matches = FolderMatcher::with_config(config).find_matches(&tree);

    match output {
        Some(path) => {
            let file = File::create(&path)
                .wrap_err_with(|| format!("cannot create {}", path.display()))?;
            write_output(&tree, &matches, format, BufWriter::new(file))?;
            eprintln!("Report written to {}", path.display());
        }
        None => write_output(&tree, &matches, format, BufWriter::new(io::stdout().lock()))?,
    }
    Ok(())
}

fn write_output<W: Write>(
    tree: &DirTree,
    matches: &BestMatches,
    format: OutputFormat,
    mut out: W,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_report(tree, matches, out)?,
        OutputFormat::Json => {
            let reports = ordered_reports(tree, matches);
            serde_json::to_writer_pretty(&mut out, &reports)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Rewrite a legacy inventory into the current record schema.
fn run_upgrade(hashes: &Path, output: Option<PathBuf>) -> Result<()> {
    let input =
        File::open(hashes).wrap_err_with(|| format!("cannot open {}", hashes.display()))?;
    let reader = BufReader::new(input);

    let count = match output {
        Some(path) => {
            let file = File::create(&path)
                .wrap_err_with(|| format!("cannot create {}", path.display()))?;
            upgrade_legacy(reader, BufWriter::new(file))?
        }
        None => upgrade_legacy(reader, BufWriter::new(io::stdout().lock()))?,
    };

    eprintln!("{count} records upgraded");
    Ok(())
}

/// Format size for operator-facing summaries.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
