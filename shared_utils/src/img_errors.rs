//! Error types for HEIC decode and image encode operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImgConvertError {
    #[error("Failed to read HEIC: {0}")]
    HeicReadError(String),

    #[error("Failed to decode HEIC: {0}")]
    HeicDecodeError(String),

    #[error("WebP encode failed: {0}")]
    WebPEncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ImgConvertError>;
