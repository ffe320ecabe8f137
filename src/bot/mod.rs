//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles incoming text, photo, and document messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats result messages

pub mod callback_handler;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

use std::sync::Arc;

use crate::cleanup::MessageCleaner;
use crate::config::AppConfig;
use crate::ocr::OcrClient;
use crate::text_processing::NumberDetector;

/// Shared handler dependencies, constructed once at startup and passed by
/// reference to every handler (no ambient globals)
pub struct ScannerContext {
    pub detector: NumberDetector,
    pub ocr: OcrClient,
    pub cleaner: Arc<MessageCleaner>,
    pub config: AppConfig,
}
