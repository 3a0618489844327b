//! duview - explore where disk space goes.
//!
//! Usage:
//!   duv [PATH]                    List PATH's children by size
//!   duv [PATH] -e DIR             Also show DIR's children inline
//!   duv [PATH] -m DIR             Show the next page of DIR's children
//!   duv [PATH] --json             Emit the listing as JSON
//!   duv --help                    Show help

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing::Level;

use duview_core::{
    BUSY_TICK, Entry, EntryKind, ExplorerConfig, format_elapsed, format_size, resolve_path,
    resolve_root,
};
use duview_scan::{ExplorerSession, ScanOutcome, ScanPoll};

/// Spinner frames drawn while a scan outlives the grace period.
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

#[derive(Parser)]
#[command(
    name = "duview",
    version,
    about = "Explore disk usage, largest entries first",
    long_about = "duview lists a directory's children ordered by size, with directory \
                  totals computed recursively. Expand directories inline with --expand \
                  and page through large ones with --more."
)]
struct Cli {
    /// Directory to list (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Show this directory's children inline (repeatable)
    #[arg(short, long = "expand", value_name = "DIR")]
    expand: Vec<PathBuf>,

    /// Advance this directory to its next page (repeat to go further)
    #[arg(short, long = "more", value_name = "DIR")]
    more: Vec<PathBuf>,

    /// Number of children shown per page of a directory
    #[arg(short = 'n', long, default_value = "100")]
    page_size: NonZeroUsize,

    /// Milliseconds before a busy indicator is shown
    #[arg(long, default_value = "500")]
    grace_ms: u64,

    /// Emit the listing as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = resolve_root(&cli.path)?;

    let config = ExplorerConfig::builder()
        .page_size(cli.page_size)
        .busy_grace(Duration::from_millis(cli.grace_ms))
        .build()
        .context("Invalid configuration")?;

    let mut session = ExplorerSession::new(config);
    for dir in &cli.expand {
        session.toggle_expansion(&resolve_path(dir));
    }
    for dir in &cli.more {
        session.advance_pagination(&resolve_path(dir));
    }

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(scan(&session, &root))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_listing(&outcome);
    }

    Ok(())
}

/// Install the stderr log subscriber.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one background scan, drawing a spinner if it outlives the grace period.
async fn scan(session: &ExplorerSession, root: &Path) -> Result<ScanOutcome> {
    let handle = session.trigger_rescan(root)?;

    let outcome = match handle.wait_grace().await? {
        ScanPoll::Complete(outcome) => outcome,
        ScanPoll::StillRunning(handle) => {
            let activity = handle.activity();
            let label = root.display().to_string();
            let spinner = tokio::spawn(async move {
                activity
                    .wait_idle(BUSY_TICK, |frame| {
                        let glyph = SPINNER[frame as usize % SPINNER.len()];
                        eprint!("\r{glyph} Scanning {label}");
                    })
                    .await;
                eprint!("\r\x1b[2K");
            });

            let outcome = handle.wait().await?;
            spinner.await.context("Busy indicator failed")?;
            outcome
        }
    };

    Ok(outcome)
}

/// Print the flattened listing with a summary footer.
fn print_listing(outcome: &ScanOutcome) {
    println!("{}", "─".repeat(72));
    println!(
        " {} - {}",
        outcome.root.display(),
        format_size(outcome.total_size)
    );
    println!("{}", "─".repeat(72));

    for entry in &outcome.entries {
        print_entry(entry, outcome.total_size);
    }

    if outcome.entries.is_empty() {
        println!(" (empty)");
    }

    println!("{}", "─".repeat(72));
    println!(
        " {} entries, scanned in {}",
        outcome.entries.len(),
        format_elapsed(outcome.elapsed)
    );
}

/// Print one row: indentation, expansion marker, type tag, name, size and bar.
fn print_entry(entry: &Entry, total_size: u64) {
    let indent = "  ".repeat(entry.depth as usize);
    let ratio = if total_size > 0 {
        entry.size as f64 / total_size as f64
    } else {
        0.0
    };

    let marker = match entry.kind {
        EntryKind::Directory if entry.expanded => "▼ ",
        EntryKind::Directory => "▶ ",
        EntryKind::File | EntryKind::Other | EntryKind::More { .. } => "  ",
    };

    let name_width = 40usize.saturating_sub(indent.chars().count()).max(8);

    println!(
        " {}{}[{:<5}] {:<name_width$} {:>10} {}",
        indent,
        marker,
        entry.kind.to_string(),
        truncate(&entry.name, name_width),
        format_size(entry.size),
        make_bar(ratio, 10),
    );
}

/// Create a simple ASCII bar.
fn make_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width - filled;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Truncate a string to at most `max_len` characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
