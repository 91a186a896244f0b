//! inosync - Arduino example sketch stager
//!
//! Copies the `.ino` sketch found in each `examples/<name>/` directory to
//! `test/src/<name>/<name>.cpp` so a test build can compile every example.
//! The destination is cleared before each run.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (invalid arguments, config, overlap, I/O)

mod cli;
mod config;
mod error;
mod models;
mod report;
mod scanner;
mod sync;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config(&args);
    }

    init_logging(&args);

    info!("inosync v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_sync(&args) {
        error!("Sync failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .inosync.toml in the root.
fn handle_init_config(args: &Args) -> Result<()> {
    let path = args.root.join(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            path.display()
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(&path, &content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {} with default settings.", path.display());
    Ok(())
}

/// Initialize logging based on verbosity settings and `RUST_LOG`.
///
/// Logs go to stderr so `--format json` output stays parseable.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(args.env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete sync workflow.
fn run_sync(args: &Args) -> Result<()> {
    let config = Config::resolve(args)?;

    let options = sync::SyncOptions {
        root: args.root.clone(),
        examples_dir: args.root.join(&config.paths.examples_dir),
        dest_dir: args.root.join(&config.paths.dest_dir),
        target_extension: config.sketch.target_extension.clone(),
        clean_destination: config.sync.clean_destination,
        dry_run: args.dry_run,
        show_progress: !args.quiet && !args.dry_run && args.format == OutputFormat::Text,
    };
    debug!("Sync options: {:?}", options);

    let file_scanner = scanner::SketchScanner::new(scanner::ScanConfig::from(&config));
    let sync_report = sync::execute(&file_scanner, &options)?;

    match args.format {
        OutputFormat::Json => println!("{}", report::generate_json_report(&sync_report)?),
        OutputFormat::Text => {
            if !args.quiet {
                print!("{}", report::generate_text_summary(&sync_report));
            }
        }
    }

    Ok(())
}
