use clap::Parser;
use shared_utils::logging::{self, LogConfig};
use std::path::PathBuf;
use std::time::Instant;

mod convert;
mod dispatch;

use convert::{ConversionJob, TargetFormat};
use dispatch::{aggregate, dry_run_lines, run_jobs};

#[derive(Parser)]
#[command(name = "heic-batch")]
#[command(version, about = "Convert HEIC images to PNG, JPG, or WebP", long_about = None)]
struct Cli {
    /// Input directory containing HEIC files
    input_dir: PathBuf,

    /// Output directory for converted files
    output_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "png", ignore_case = true)]
    format: TargetFormat,

    /// Quality for JPG/WebP (1-100)
    #[arg(short, long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Show detailed per-file conversion output
    #[arg(short, long)]
    verbose: bool,

    /// Disable parallel processing
    #[arg(long)]
    no_parallel: bool,

    /// Show what would be converted without actually converting
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let _ = logging::init_logging("heic_batch", LogConfig::default());

    let cli = Cli::parse();

    let files = match shared_utils::collect_source_files(
        &cli.input_dir,
        shared_utils::SOURCE_EXTENSIONS,
    ) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    if files.is_empty() {
        println!("📂 No HEIC files found in '{}'", cli.input_dir.display());
        return Ok(());
    }

    let jobs: Vec<ConversionJob> = files
        .iter()
        .map(|source| ConversionJob {
            source: source.clone(),
            input_root: cli.input_dir.clone(),
            output_root: cli.output_dir.clone(),
            format: cli.format,
            quality: cli.quality,
            verbose: cli.verbose,
        })
        .collect();

    if cli.dry_run {
        println!(
            "🔍 DRY RUN: Would convert {} HEIC file(s) to {}",
            jobs.len(),
            cli.format.as_str()
        );
        for line in dry_run_lines(&jobs) {
            println!("{}", line);
        }
        return Ok(());
    }

    println!(
        "Converting {} HEIC file(s) to {}...",
        jobs.len(),
        cli.format.as_str()
    );

    let start_time = Instant::now();
    let results = run_jobs(&jobs, !cli.no_parallel, cli.verbose);
    let (batch, input_bytes, output_bytes) = aggregate(&results);

    shared_utils::print_summary_report(&batch, start_time.elapsed(), input_bytes, output_bytes);

    Ok(())
}
