//! Shared utilities for the heic-batch converter
//!
//! This crate provides the cross-cutting functionality used by the
//! `heic-batch` binary:
//! - Recursive source-file discovery with deterministic ordering
//! - Progress bar with ETA
//! - Batch result accounting and summary reporting
//! - Logging initialization (file log with rotation)
//! - HEIC decoding via libheif
//! - Common path helpers and error types

pub mod batch;
pub mod colors;
pub mod common_utils;
pub mod heic;
pub mod img_errors;
pub mod logging;
pub mod progress;
pub mod report;

pub use batch::{collect_source_files, BatchResult, DiscoverError, SOURCE_EXTENSIONS};
pub use common_utils::{get_extension_lowercase, has_extension};
pub use heic::{is_heic_file, HeicDecoder};
pub use img_errors::{ImgConvertError, Result};
pub use progress::{create_progress_bar, format_bytes, format_duration};
pub use report::print_summary_report;
