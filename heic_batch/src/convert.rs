//! Per-file conversion: output-path mapping, freshness skip, decode + encode.

use clap::ValueEnum;
use image::{DynamicImage, RgbImage, RgbaImage};
use shared_utils::heic::HeicDecoder;
use shared_utils::img_errors::{ImgConvertError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetFormat {
    Png,
    Jpg,
    Webp,
}

impl TargetFormat {
    /// Canonical lowercase file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpg => "jpg",
            TargetFormat::Webp => "webp",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::Png => "PNG",
            TargetFormat::Jpg => "JPG",
            TargetFormat::Webp => "WEBP",
        }
    }
}

/// One source-file-to-output-file conversion unit. Built once per discovered
/// file, consumed exactly once by a worker.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub format: TargetFormat,
    pub quality: u8,
    pub verbose: bool,
}

impl ConversionJob {
    /// Output path: the source's path relative to the input root, re-rooted
    /// under the output root, with the target format's extension.
    pub fn output_path(&self) -> PathBuf {
        let relative = self
            .source
            .strip_prefix(&self.input_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(self.source.file_name().unwrap_or_default()));

        self.output_root
            .join(relative)
            .with_extension(self.format.extension())
    }
}

#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub success: bool,
    pub skipped: bool,
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub input_size: u64,
    pub output_size: Option<u64>,
    pub message: String,
}

impl ConversionResult {
    fn converted(job: &ConversionJob, output: PathBuf, input_size: u64, output_size: Option<u64>) -> Self {
        let message = if job.verbose {
            format!("✅ Converted: {} -> {}", job.source.display(), output.display())
        } else {
            String::new()
        };
        Self {
            success: true,
            skipped: false,
            input_path: job.source.clone(),
            output_path: Some(output),
            input_size,
            output_size,
            message,
        }
    }

    fn skipped_up_to_date(job: &ConversionJob, input_size: u64) -> Self {
        Self {
            success: true,
            skipped: true,
            input_path: job.source.clone(),
            output_path: Some(job.output_path()),
            input_size,
            output_size: None,
            message: format!("⏭️  Skipped (already up-to-date): {}", job.source.display()),
        }
    }

    pub fn failed(source: &Path, error: &str) -> Self {
        Self {
            success: false,
            skipped: false,
            input_path: source.to_path_buf(),
            output_path: None,
            input_size: fs::metadata(source).map(|m| m.len()).unwrap_or(0),
            output_size: None,
            message: format!("❌ Error converting {}: {}", source.display(), error),
        }
    }
}

/// Convert one file. Every decode/encode/filesystem error is captured into a
/// failure result so that a single bad file never aborts the batch.
pub fn convert_file(decoder: &HeicDecoder, job: &ConversionJob) -> ConversionResult {
    match try_convert(decoder, job) {
        Ok(result) => result,
        Err(e) => ConversionResult::failed(&job.source, &e.to_string()),
    }
}

fn try_convert(decoder: &HeicDecoder, job: &ConversionJob) -> Result<ConversionResult> {
    let input_size = fs::metadata(&job.source)?.len();
    let output = job.output_path();

    if is_up_to_date(&job.source, &output) {
        return Ok(ConversionResult::skipped_up_to_date(job, input_size));
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    tracing::debug!(
        source = %job.source.display(),
        output = %output.display(),
        format = job.format.as_str(),
        "converting"
    );

    let img = decoder.decode(&job.source)?;
    encode_image(img, &output, job.format, job.quality)?;

    let output_size = fs::metadata(&output).map(|m| m.len()).ok();
    Ok(ConversionResult::converted(job, output, input_size, output_size))
}

/// Freshness check: the output counts as current when it exists and its
/// mtime is strictly newer than the source's. Mtime only, no content hash.
fn is_up_to_date(source: &Path, output: &Path) -> bool {
    let source_mtime = match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };
    let output_mtime = match fs::metadata(output).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };
    output_mtime > source_mtime
}

/// Encode a decoded image to the target format, normalizing the pixel format
/// first where the encoder requires it.
pub fn encode_image(
    img: DynamicImage,
    path: &Path,
    format: TargetFormat,
    quality: u8,
) -> Result<()> {
    match format {
        TargetFormat::Jpg => {
            // JPEG has no alpha: composite transparent sources onto white.
            let img = if img.color().has_alpha() {
                DynamicImage::ImageRgb8(flatten_onto_white(&img.to_rgba8()))
            } else {
                img
            };
            let img = match img {
                i @ (DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_)) => i,
                other => DynamicImage::ImageRgb8(other.to_rgb8()),
            };

            let file = fs::File::create(path)?;
            let mut writer = std::io::BufWriter::new(file);
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality);
            img.write_with_encoder(encoder)?;
            writer.flush()?;
        }
        TargetFormat::Png => {
            let img = match img {
                i @ (DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_)) => {
                    DynamicImage::ImageRgb8(i.to_rgb8())
                }
                other => other,
            };
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
        TargetFormat::Webp => {
            // Alpha sources get alpha-preserving lossless WebP, everything
            // else lossy with the requested quality.
            let has_alpha = img.color().has_alpha();
            let img = match img {
                i @ (DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) => i,
                other if has_alpha => DynamicImage::ImageRgba8(other.to_rgba8()),
                other => DynamicImage::ImageRgb8(other.to_rgb8()),
            };

            let encoder = webp::Encoder::from_image(&img)
                .map_err(|e| ImgConvertError::WebPEncodeError(e.to_string()))?;
            let encoded = if has_alpha {
                encoder.encode_lossless()
            } else {
                encoder.encode(quality as f32)
            };
            fs::write(path, &*encoded)?;
        }
    }
    Ok(())
}

fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a)) / 255) as u8;
        out.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}
