//! Summary reporting for batch conversions.

use crate::batch::BatchResult;
use crate::colors;
use crate::progress::{format_bytes, format_duration};
use std::time::Duration;

/// Print the end-of-run summary: counts, byte totals, timing, and any
/// per-file errors collected along the way.
pub fn print_summary_report(
    result: &BatchResult,
    duration: Duration,
    input_bytes: u64,
    output_bytes: u64,
) {
    println!();
    println!("╔══════════════════════════════════════════════╗");
    println!("║          📊 Conversion Summary               ║");
    println!("╠══════════════════════════════════════════════╣");
    println!(
        "║  📁 Files Processed:     {:>10}          ║",
        result.total
    );
    println!(
        "║  ✅ Converted:           {:>10}          ║",
        result.succeeded
    );
    println!(
        "║  ⏭️  Skipped (fresh):     {:>10}          ║",
        result.skipped
    );
    println!(
        "║  ❌ Errors:              {:>10}          ║",
        result.failed
    );
    println!(
        "║  📈 Success Rate:        {:>9.1}%          ║",
        result.success_rate()
    );
    println!("╠══════════════════════════════════════════════╣");
    println!(
        "║  💾 Input Size:          {:>10}          ║",
        format_bytes(input_bytes)
    );
    println!(
        "║  💾 Output Size:         {:>10}          ║",
        format_bytes(output_bytes)
    );
    if input_bytes > 0 {
        let reduction = (1.0 - output_bytes as f64 / input_bytes as f64) * 100.0;
        println!("║  📉 Size Reduction:      {:>9.1}%          ║", reduction);
    }
    println!(
        "║  ⏱️  Total Time:          {:>10}          ║",
        format_duration(duration)
    );
    if result.total > 0 {
        let avg_time = duration.as_secs_f64() / result.total as f64;
        println!("║  ⏱️  Avg Time/File:       {:>9.2}s          ║", avg_time);
    }
    println!("╚══════════════════════════════════════════════╝");

    if !result.errors.is_empty() {
        println!();
        println!("{}", colors::error().apply_to("❌ Errors encountered:"));
        for (path, error) in &result.errors {
            println!("   {} → {}", path.display(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_print_summary_report_no_panic() {
        let mut result = BatchResult::new();
        result.success();
        result.skip();
        result.fail(PathBuf::from("bad.heic"), "decode failed".to_string());

        print_summary_report(&result, Duration::from_secs(10), 1000, 500);
    }

    #[test]
    fn test_print_summary_report_empty() {
        let result = BatchResult::new();
        print_summary_report(&result, Duration::from_secs(1), 0, 0);
    }

    #[test]
    fn test_size_reduction_formula() {
        let input = 1000u64;
        let output = 250u64;
        let reduction = (1.0 - output as f64 / input as f64) * 100.0;
        assert!((reduction - 75.0).abs() < 0.01);
    }
}
