//! Worker-pool dispatch, dry-run planning, and result aggregation.

use crate::convert::{convert_file, ConversionJob, ConversionResult};
use indicatif::ProgressBar;
use rayon::prelude::*;
use shared_utils::batch::BatchResult;
use shared_utils::heic::HeicDecoder;
use shared_utils::progress::create_progress_bar;

/// Number of planned conversions shown in full during a dry run.
pub const DRY_RUN_PREVIEW: usize = 5;

/// Run all jobs and return one result per job (order may differ from
/// submission order in parallel mode; the aggregation is order-independent).
///
/// Worker count is `min(available cores, job count)`. Sequential execution
/// is used when parallel mode is disabled or only one job exists. Each
/// parallel worker holds its own libheif decoder handle.
pub fn run_jobs(jobs: &[ConversionJob], parallel: bool, verbose: bool) -> Vec<ConversionResult> {
    let total = jobs.len();
    let pb = if verbose || total == 0 {
        ProgressBar::hidden()
    } else {
        create_progress_bar(total as u64, "Converting")
    };

    let results: Vec<ConversionResult> = if parallel && total > 1 {
        let workers = num_cpus::get().min(total);
        println!("⚙️  Using {} parallel workers...", workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .or_else(|_| rayon::ThreadPoolBuilder::new().num_threads(2).build());

        match pool {
            Ok(pool) => pool.install(|| {
                jobs.par_iter()
                    .map_init(HeicDecoder::new, |decoder, job| {
                        run_one(decoder, job, &pb, verbose)
                    })
                    .collect()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "thread pool creation failed, running sequentially");
                run_sequential(jobs, &pb, verbose)
            }
        }
    } else {
        run_sequential(jobs, &pb, verbose)
    };

    pb.finish_with_message("Complete!");

    debug_assert_eq!(results.len(), total);
    results
}

fn run_sequential(
    jobs: &[ConversionJob],
    pb: &ProgressBar,
    verbose: bool,
) -> Vec<ConversionResult> {
    let decoder = HeicDecoder::new();
    jobs.iter()
        .map(|job| run_one(&decoder, job, pb, verbose))
        .collect()
}

fn run_one(
    decoder: &HeicDecoder,
    job: &ConversionJob,
    pb: &ProgressBar,
    verbose: bool,
) -> ConversionResult {
    pb.set_message(
        job.source
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string(),
    );

    let result = convert_file(decoder, job);

    if verbose && !result.message.is_empty() {
        println!("{}", result.message);
    }
    pb.inc(1);
    result
}

/// Reduce the result set into batch counters plus aggregate byte totals for
/// the files actually converted.
pub fn aggregate(results: &[ConversionResult]) -> (BatchResult, u64, u64) {
    let mut batch = BatchResult::new();
    let mut input_bytes = 0u64;
    let mut output_bytes = 0u64;

    for result in results {
        if result.skipped {
            batch.skip();
        } else if result.success {
            batch.success();
            input_bytes += result.input_size;
            output_bytes += result.output_size.unwrap_or(0);
        } else {
            batch.fail(result.input_path.clone(), result.message.clone());
        }
    }

    (batch, input_bytes, output_bytes)
}

/// Planned source -> destination lines for dry-run mode: the first
/// [`DRY_RUN_PREVIEW`] mappings plus a remainder count.
pub fn dry_run_lines(jobs: &[ConversionJob]) -> Vec<String> {
    let mut lines: Vec<String> = jobs
        .iter()
        .take(DRY_RUN_PREVIEW)
        .map(|job| {
            format!(
                "  {} -> {}",
                job.source.display(),
                job.output_path().display()
            )
        })
        .collect();

    if jobs.len() > DRY_RUN_PREVIEW {
        lines.push(format!("  ... and {} more files", jobs.len() - DRY_RUN_PREVIEW));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::TargetFormat;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn garbage_jobs(input_root: &Path, output_root: &Path, count: usize) -> Vec<ConversionJob> {
        (0..count)
            .map(|i| {
                let source = input_root.join(format!("file{}.heic", i));
                fs::write(&source, b"not a heic").unwrap();
                ConversionJob {
                    source,
                    input_root: input_root.to_path_buf(),
                    output_root: output_root.to_path_buf(),
                    format: TargetFormat::Png,
                    quality: 85,
                    verbose: false,
                }
            })
            .collect()
    }

    #[test]
    fn test_one_result_per_job_sequential() {
        let tmp = TempDir::new().unwrap();
        let jobs = garbage_jobs(tmp.path(), &tmp.path().join("out"), 4);

        let results = run_jobs(&jobs, false, false);
        assert_eq!(results.len(), jobs.len());
        assert!(results.iter().all(|r| !r.success));
    }

    #[test]
    fn test_one_result_per_job_parallel() {
        let tmp = TempDir::new().unwrap();
        let jobs = garbage_jobs(tmp.path(), &tmp.path().join("out"), 6);

        let results = run_jobs(&jobs, true, false);
        assert_eq!(results.len(), jobs.len());
        assert!(results.iter().all(|r| !r.success));
    }

    #[test]
    fn test_run_jobs_empty() {
        let results = run_jobs(&[], true, false);
        assert!(results.is_empty());
    }

    #[test]
    fn test_aggregate_counts_and_bytes() {
        let converted = ConversionResult {
            success: true,
            skipped: false,
            input_path: PathBuf::from("a.heic"),
            output_path: Some(PathBuf::from("a.png")),
            input_size: 100,
            output_size: Some(40),
            message: String::new(),
        };
        let skipped = ConversionResult {
            success: true,
            skipped: true,
            input_path: PathBuf::from("b.heic"),
            output_path: Some(PathBuf::from("b.png")),
            input_size: 200,
            output_size: None,
            message: "skipped".to_string(),
        };
        let failed = ConversionResult::failed(Path::new("c.heic"), "boom");

        let (batch, input_bytes, output_bytes) =
            aggregate(&[converted, skipped, failed]);

        assert_eq!(batch.total, 3);
        assert_eq!(batch.succeeded, 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.failed, 1);
        assert_eq!(batch.errors.len(), 1);
        // byte totals only cover actual conversions
        assert_eq!(input_bytes, 100);
        assert_eq!(output_bytes, 40);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let mk = |i: u64, success: bool| ConversionResult {
            success,
            skipped: false,
            input_path: PathBuf::from(format!("{}.heic", i)),
            output_path: None,
            input_size: i,
            output_size: Some(i / 2),
            message: String::new(),
        };
        let forward = [mk(2, true), mk(4, true), mk(8, false)];
        let reversed = [mk(8, false), mk(4, true), mk(2, true)];

        let (a, a_in, a_out) = aggregate(&forward);
        let (b, b_in, b_out) = aggregate(&reversed);
        assert_eq!(a.succeeded, b.succeeded);
        assert_eq!(a.failed, b.failed);
        assert_eq!(a_in, b_in);
        assert_eq!(a_out, b_out);
    }

    #[test]
    fn test_dry_run_lines_caps_preview() {
        let tmp = TempDir::new().unwrap();
        let jobs = garbage_jobs(tmp.path(), &tmp.path().join("out"), 7);

        let lines = dry_run_lines(&jobs);
        assert_eq!(lines.len(), DRY_RUN_PREVIEW + 1);
        assert_eq!(lines.last().unwrap(), "  ... and 2 more files");
        assert!(lines[0].contains("->"));
    }

    #[test]
    fn test_dry_run_lines_small_batch_has_no_remainder() {
        let tmp = TempDir::new().unwrap();
        let jobs = garbage_jobs(tmp.path(), &tmp.path().join("out"), 3);

        let lines = dry_run_lines(&jobs);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.contains("->")));
    }

    #[test]
    fn test_dry_run_makes_no_writes() {
        let tmp = TempDir::new().unwrap();
        let output_root = tmp.path().join("out");
        let jobs = garbage_jobs(tmp.path(), &output_root, 7);

        let _ = dry_run_lines(&jobs);
        assert!(!output_root.exists());
    }
}
