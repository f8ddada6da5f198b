//! CLI for the hfdl dataset downloader.

mod progress;

use anyhow::{Context, Result};
use clap::Parser;
use hfdl_core::config::{self, HfdlConfig};
use hfdl_core::downloader;
use hfdl_core::filter::filter_files;
use hfdl_core::job::DownloadJob;
use hfdl_core::manifest;
use hfdl_core::progress::{NoopProgress, ProgressSink};
use std::path::PathBuf;
use std::time::Duration;

/// Exit code when the manifest is empty or nothing matched the filter.
pub const EXIT_NOTHING_TO_DO: i32 = 3;

/// Download dataset repositories with a bounded worker pool.
#[derive(Debug, Parser)]
#[command(name = "hfdl")]
#[command(
    about = "Download dataset repositories with a bounded worker pool",
    long_about = None
)]
pub struct Cli {
    /// Dataset id, e.g. 'edc505/pokemon'.
    pub dataset: String,

    /// Base URL of the dataset host.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output directory (default: dataset id with '/' replaced by '_').
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Number of parallel download threads (default 8, must be >= 1).
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Comma-separated file extensions to download (e.g. '.png,.jpg,.json').
    #[arg(short, long, value_name = "EXTS")]
    pub filter: Option<String>,

    /// Maximum number of files to download.
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,

    /// API token for private datasets (or set the HF_TOKEN env var).
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Show a progress bar during download.
    #[arg(short, long)]
    pub progress: bool,

    /// List matching files without downloading.
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run_from_args() -> Result<i32> {
    let cli = Cli::parse();
    run(cli)
}

/// Runs one download job end to end. Returns the process exit code: 0 when
/// the job completed (even with per-file failures) or for a dry run,
/// [`EXIT_NOTHING_TO_DO`] when there is nothing to download. Fatal errors
/// (config, manifest listing) propagate as `Err`.
pub fn run(cli: Cli) -> Result<i32> {
    let cfg = config::load_or_init().unwrap_or_else(|e| {
        tracing::warn!("could not load config, using defaults: {:#}", e);
        HfdlConfig::default()
    });

    let threads = cli.threads.unwrap_or(cfg.default_threads);
    config::validate_threads(threads)?;
    let extensions = split_filter(cli.filter.as_deref());
    if let Some(exts) = &extensions {
        config::validate_filter(exts)?;
    }

    let base_url = cli.base_url.as_deref().unwrap_or(&cfg.base_url);
    let token = resolve_token(cli.token.clone());
    let output_dir = derive_output_dir(&cli.dataset, cli.output.clone());

    if cli.verbose {
        println!("Dataset: {}", cli.dataset);
        println!("Output directory: {}", output_dir.display());
        println!("Threads: {}", threads);
        if let Some(exts) = &extensions {
            println!("Filter: {}", exts.join(","));
        }
        if let Some(limit) = cli.limit {
            println!("Limit: {}", limit);
        }
        println!();
    }

    println!("Fetching file list from '{}'...", cli.dataset);
    let manifest = manifest::list_dataset_files(base_url, &cli.dataset, token.as_deref())
        .with_context(|| format!("could not list files for '{}'", cli.dataset))?;

    if manifest.is_empty() {
        println!("No files found in dataset.");
        return Ok(EXIT_NOTHING_TO_DO);
    }

    let files = filter_files(manifest, extensions.as_deref(), cli.limit);
    if files.is_empty() {
        println!("No files match the specified filters.");
        return Ok(EXIT_NOTHING_TO_DO);
    }
    println!("Found {} file(s) to download.", files.len());

    if cli.dry_run {
        println!("\nFiles (dry run):");
        for f in &files {
            println!("  {}", f.relative_path);
        }
        return Ok(0);
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("could not create output directory {}", output_dir.display()))?;

    let total = files.len() as u64;
    let job = DownloadJob {
        files,
        dest_root: output_dir.clone(),
        max_concurrency: threads,
        auth_token: token,
        verbose: cli.verbose,
        timeout: Duration::from_secs(cfg.timeout_secs),
    };

    let sink: Box<dyn ProgressSink> = if cli.progress {
        Box::new(progress::BarProgress::new(total))
    } else {
        Box::new(NoopProgress)
    };
    let summary = downloader::run(&job, sink.as_ref());

    println!("\nDownload complete!");
    println!("  Success: {}", summary.succeeded);
    println!("  Failed:  {}", summary.failed);
    let shown = std::fs::canonicalize(&output_dir).unwrap_or(output_dir);
    println!("  Output:  {}", shown.display());

    if !summary.failures.is_empty() {
        println!("\nFailures:");
        for failure in &summary.failures {
            if let Some(msg) = failure.message.as_deref() {
                println!("  {}", msg);
            }
        }
    }

    // Per-file failures do not fail the run; the caller reads the summary.
    Ok(0)
}

/// Resolves the auth token: the flag wins, then the HF_TOKEN env var.
fn resolve_token(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty()))
}

/// Output directory defaults to the dataset id with '/' flattened to '_'.
fn derive_output_dir(dataset: &str, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from(dataset.replace('/', "_")))
}

/// Splits a comma-separated extension list; entries are trimmed later during
/// normalization, empties are caught by config validation.
fn split_filter(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(|s| s.split(',').map(|e| e.trim().to_string()).collect())
}
