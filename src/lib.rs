//! # Number Scanner Telegram Bot
//!
//! A Telegram bot that extracts printed phone numbers from images using a
//! remote OCR provider and presents them as short-lived, auto-expiring
//! messages. Every message the bot sends or receives is deleted after a
//! configurable TTL.

pub mod bot;
pub mod cleanup;
pub mod config;
pub mod errors;
pub mod ocr;
pub mod patterns;
pub mod preprocess;
pub mod text_processing;
