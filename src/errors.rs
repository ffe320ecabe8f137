//! # Scan Error Types Module
//!
//! This module defines custom error types used throughout the number scanning
//! pipeline. Extraction failures are never shown to users; these types exist so
//! handlers can decide between "skip the result message" and "treat as empty".

/// Custom error types for the scanning pipeline
#[derive(Debug, Clone)]
pub enum ScanError {
    /// Image bytes could not be decoded as a supported raster format
    Decode(String),
    /// OCR provider error, timeout or transport failure
    OcrUnavailable(String),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Decode(msg) => write!(f, "Image decode error: {msg}"),
            ScanError::OcrUnavailable(msg) => write!(f, "OCR unavailable: {msg}"),
        }
    }
}

impl std::error::Error for ScanError {}

impl From<image::ImageError> for ScanError {
    fn from(err: image::ImageError) -> Self {
        ScanError::Decode(err.to_string())
    }
}
