//! # OCR Client Module
//!
//! This module talks to an OCR.space-style HTTP provider. The image is
//! submitted as a base64 PNG data URL and the provider returns parsed text as
//! JSON. The provider is strictly best-effort: any error flag, timeout or
//! transport failure surfaces as [`ScanError::OcrUnavailable`], which callers
//! treat the same as "no text found".

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::GrayImage;
use serde::Deserialize;
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::OcrConfig;
use crate::errors::ScanError;

/// Client for the remote OCR provider
pub struct OcrClient {
    http: reqwest::Client,
    config: OcrConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrResponse {
    #[serde(default)]
    parsed_results: Vec<ParsedResult>,
    #[serde(default)]
    is_errored_on_processing: bool,
    // The provider reports this as either a string or a list of strings
    #[serde(default)]
    error_message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

impl OcrClient {
    /// Create a new client for the configured provider
    pub fn new(config: OcrConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Submit a normalized image and return the recognized text
    ///
    /// The request carries an explicit timeout so a stuck provider cannot
    /// stall a chat indefinitely.
    pub async fn recognize(&self, image: &GrayImage) -> Result<String, ScanError> {
        let payload = encode_png_base64(image)?;
        debug!(payload_bytes = payload.len(), "Submitting image to OCR provider");

        let params = [
            ("apikey", self.config.api_key.clone()),
            ("base64Image", format!("data:image/png;base64,{payload}")),
            ("language", self.config.language.clone()),
            ("isOverlayRequired", "false".to_string()),
            ("OCREngine", "2".to_string()),
        ];

        let response = self
            .http
            .post(&self.config.endpoint)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .form(&params)
            .send()
            .await
            .map_err(|e| ScanError::OcrUnavailable(e.to_string()))?
            .json::<OcrResponse>()
            .await
            .map_err(|e| ScanError::OcrUnavailable(e.to_string()))?;

        let text = collect_text(response)?;
        info!(chars = text.len(), "OCR provider returned text");
        Ok(text)
    }
}

/// PNG-encode a grayscale image and base64 it for the form payload
fn encode_png_base64(image: &GrayImage) -> Result<String, ScanError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .map_err(|e| ScanError::OcrUnavailable(format!("PNG encoding failed: {e}")))?;
    Ok(BASE64.encode(&bytes))
}

/// Join parsed results into cleaned text, or fail on the provider error flag
fn collect_text(response: OcrResponse) -> Result<String, ScanError> {
    if response.is_errored_on_processing {
        let detail = response
            .error_message
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unspecified provider error".to_string());
        return Err(ScanError::OcrUnavailable(detail));
    }

    let raw: String = response
        .parsed_results
        .into_iter()
        .map(|r| r.parsed_text)
        .collect();

    // Strip per-line whitespace and drop empty lines, OCR output is ragged
    let cleaned = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join("\n");

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_success_response_parsing() {
        let json = r#"{
            "ParsedResults": [
                {"ParsedText": "Call 01712345678  \r\n\r\n  or (123) 456-7890\n"}
            ],
            "IsErroredOnProcessing": false
        }"#;
        let response: OcrResponse = serde_json::from_str(json).unwrap();
        let text = collect_text(response).unwrap();

        assert_eq!(text, "Call 01712345678\nor (123) 456-7890");
    }

    #[test]
    fn test_multiple_parsed_results_are_concatenated() {
        let json = r#"{
            "ParsedResults": [
                {"ParsedText": "first page\n"},
                {"ParsedText": "second page"}
            ],
            "IsErroredOnProcessing": false
        }"#;
        let response: OcrResponse = serde_json::from_str(json).unwrap();

        assert_eq!(collect_text(response).unwrap(), "first page\nsecond page");
    }

    #[test]
    fn test_error_flag_is_unavailable() {
        let json = r#"{
            "ParsedResults": [],
            "IsErroredOnProcessing": true,
            "ErrorMessage": ["Invalid API key"]
        }"#;
        let response: OcrResponse = serde_json::from_str(json).unwrap();

        let err = collect_text(response).unwrap_err();
        assert!(matches!(err, ScanError::OcrUnavailable(_)));
        assert!(format!("{err}").contains("Invalid API key"));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let response: OcrResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(collect_text(response).unwrap(), "");
    }

    #[test]
    fn test_png_encoding_produces_base64() {
        let img = GrayImage::from_pixel(8, 8, Luma([90u8]));
        let encoded = encode_png_base64(&img).unwrap();

        assert!(!encoded.is_empty());
        // PNG magic bytes survive the round trip
        let decoded = BASE64.decode(encoded).unwrap();
        assert_eq!(&decoded[1..4], b"PNG");
    }
}
