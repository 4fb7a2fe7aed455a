//! HEIC decoding via libheif-rs.
//!
//! Each worker constructs its own [`HeicDecoder`]; the libheif handle is not
//! shared across workers, so codec state never crosses the worker boundary.

use crate::img_errors::{ImgConvertError, Result};
use image::{DynamicImage, RgbImage, RgbaImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
use std::path::Path;

/// Per-worker handle to the libheif decoder.
pub struct HeicDecoder {
    lib: LibHeif,
}

impl HeicDecoder {
    pub fn new() -> Self {
        Self {
            lib: LibHeif::new(),
        }
    }

    /// Decode the primary image of a HEIC file.
    ///
    /// Sources with an alpha channel decode to RGBA, all others to RGB.
    pub fn decode(&self, path: &Path) -> Result<DynamicImage> {
        if !is_heic_file(path) {
            return Err(ImgConvertError::HeicReadError(format!(
                "{} is not a HEIC/HEIF file",
                path.display()
            )));
        }

        let ctx = HeifContext::read_from_file(path.to_string_lossy().as_ref())
            .map_err(|e| ImgConvertError::HeicReadError(format!("{}", e)))?;

        let handle = ctx.primary_image_handle().map_err(|e| {
            ImgConvertError::HeicDecodeError(format!("no primary image: {}", e))
        })?;

        let width = handle.width();
        let height = handle.height();
        let has_alpha = handle.has_alpha_channel();

        let chroma = if has_alpha {
            RgbChroma::Rgba
        } else {
            RgbChroma::Rgb
        };
        let decoded = self
            .lib
            .decode(&handle, ColorSpace::Rgb(chroma), None)
            .map_err(|e| ImgConvertError::HeicDecodeError(format!("{}", e)))?;

        let planes = decoded.planes();
        let plane = planes.interleaved.ok_or_else(|| {
            ImgConvertError::HeicDecodeError("no interleaved RGB plane".to_string())
        })?;

        let channels: usize = if has_alpha { 4 } else { 3 };
        let row_len = width as usize * channels;

        // libheif rows may carry stride padding; strip it before handing the
        // buffer to the image crate.
        let data = if plane.stride == row_len {
            plane.data.to_vec()
        } else {
            let mut packed = Vec::with_capacity(row_len * height as usize);
            for row in 0..height as usize {
                let start = row * plane.stride;
                packed.extend_from_slice(&plane.data[start..start + row_len]);
            }
            packed
        };

        let img = if has_alpha {
            RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8)
        } else {
            RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8)
        };

        img.ok_or_else(|| {
            ImgConvertError::HeicDecodeError(format!(
                "decoded buffer does not match {}x{}",
                width, height
            ))
        })
    }
}

impl Default for HeicDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether a path looks like a HEIC/HEIF file, by extension first and
/// by the `ftyp` brand in the file header as a fallback.
pub fn is_heic_file(path: &Path) -> bool {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_lowercase();
        if matches!(ext.as_str(), "heic" | "heif" | "hif") {
            return true;
        }
    }

    if let Ok(mut file) = std::fs::File::open(path) {
        use std::io::Read;
        let mut buffer = [0u8; 12];
        if file.read_exact(&mut buffer).is_ok() && &buffer[4..8] == b"ftyp" {
            let brand = &buffer[8..12];
            if matches!(
                brand,
                b"heic" | b"heix" | b"heim" | b"heis" | b"mif1" | b"msf1"
            ) {
                return true;
            }
        }
    }

    false
}
