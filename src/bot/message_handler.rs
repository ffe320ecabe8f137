//! Message Handler module for processing incoming Telegram messages
//!
//! Every inbound message and every reply the bot produces is handed to the
//! cleaner, so the whole conversation expires after the configured TTL. The
//! extraction pipeline never surfaces an error to the user: the worst outcome
//! of a bad image or a dead OCR provider is the neutral not-found marker, or
//! silence for an undecodable upload.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{FileId, MessageId};
use tracing::{debug, error, info, warn};

use crate::errors::ScanError;
use crate::preprocess;
use crate::text_processing::ResultNumber;

use super::ui_builder::{create_results_keyboard, format_no_results_message, format_results_message};
use super::ScannerContext;

const START_MESSAGE: &str = "👋 Send me a photo of printed phone numbers and I will \
    extract them for you.\n\nEvery message here self-destructs after a short while.";

const HELP_MESSAGE: &str = "📖 How to use this bot:\n\n\
    1. Send a photo (or an image file) containing phone numbers\n\
    2. Tap a number button to get it in copy-friendly form\n\
    3. Messages are deleted automatically once they expire\n\n\
    Clear, well-lit images give the best results.";

pub async fn message_handler(bot: Bot, msg: Message, ctx: Arc<ScannerContext>) -> Result<()> {
    if msg.text().is_some() {
        handle_text_message(&bot, &msg, &ctx).await?;
    } else if msg.photo().is_some() {
        handle_photo_message(&bot, &msg, &ctx).await?;
    } else if msg.document().is_some() {
        handle_document_message(&bot, &msg, &ctx).await?;
    } else {
        // Nothing to scan, but it still expires
        ctx.cleaner.track(msg.chat.id, msg.id);
    }
    Ok(())
}

async fn handle_text_message(bot: &Bot, msg: &Message, ctx: &ScannerContext) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    debug!(user_id = %msg.chat.id, "Received text message");

    // The user's message expires regardless of what it said
    ctx.cleaner.track(msg.chat.id, msg.id);

    let reply = match text {
        "/start" => Some(START_MESSAGE),
        "/help" => Some(HELP_MESSAGE),
        _ => None,
    };

    if let Some(reply) = reply {
        let sent = bot.send_message(msg.chat.id, reply).await?;
        ctx.cleaner.track(msg.chat.id, sent.id);
    }

    Ok(())
}

async fn handle_photo_message(bot: &Bot, msg: &Message, ctx: &ScannerContext) -> Result<()> {
    info!(user_id = %msg.chat.id, "Received photo message");

    if let Some(photos) = msg.photo() {
        if let Some(largest_photo) = photos.last() {
            scan_and_reply(bot, msg.chat.id, msg.id, largest_photo.file.id.clone(), ctx).await?;
        }
    }
    Ok(())
}

async fn handle_document_message(bot: &Bot, msg: &Message, ctx: &ScannerContext) -> Result<()> {
    let Some(doc) = msg.document() else {
        return Ok(());
    };

    let is_image = doc
        .mime_type
        .as_ref()
        .map(|mime| mime.to_string().starts_with("image/"))
        .unwrap_or(false);

    if is_image {
        info!(user_id = %msg.chat.id, "Received image document");
        scan_and_reply(bot, msg.chat.id, msg.id, doc.file.id.clone(), ctx).await?;
    } else {
        info!(user_id = %msg.chat.id, "Received non-image document");
        ctx.cleaner.track(msg.chat.id, msg.id);
        let sent = bot
            .send_message(msg.chat.id, format_no_results_message())
            .await?;
        ctx.cleaner.track(msg.chat.id, sent.id);
    }
    Ok(())
}

/// Download, scan and answer a single image message
///
/// The user's original message is tracked for expiry on every path, including
/// failures. An undecodable image produces no result message at all; an OCR
/// outage is indistinguishable from an image with no numbers in it.
async fn scan_and_reply(
    bot: &Bot,
    chat_id: ChatId,
    user_message: MessageId,
    file_id: FileId,
    ctx: &ScannerContext,
) -> Result<()> {
    let progress = bot.send_message(chat_id, "🔄").await?;

    let numbers = scan_image(bot, chat_id, file_id, ctx).await;

    delete_quietly(bot, chat_id, progress.id).await;
    ctx.cleaner.track(chat_id, user_message);

    let numbers = match numbers {
        Some(numbers) => numbers,
        None => return Ok(()), // undecodable or undownloadable; stay silent
    };

    let sent = if numbers.is_empty() {
        bot.send_message(chat_id, format_no_results_message())
            .await?
    } else {
        info!(user_id = %chat_id, count = numbers.len(), "Sending extracted numbers");
        bot.send_message(chat_id, format_results_message(&numbers))
            .reply_markup(create_results_keyboard(&numbers, ctx.config.max_results))
            .await?
    };
    ctx.cleaner.track(chat_id, sent.id);

    Ok(())
}

/// Run the extraction pipeline; `None` means no result message should be sent
async fn scan_image(
    bot: &Bot,
    chat_id: ChatId,
    file_id: FileId,
    ctx: &ScannerContext,
) -> Option<Vec<ResultNumber>> {
    let bytes = match download_file(bot, file_id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(user_id = %chat_id, error = %e, "Failed to download image");
            return None;
        }
    };
    debug!(user_id = %chat_id, bytes = bytes.len(), "Image downloaded");

    let normalized = match preprocess::normalize(&bytes) {
        Ok(image) => image,
        Err(e) => {
            warn!(user_id = %chat_id, error = %e, "Image could not be decoded");
            return None;
        }
    };

    let text = match ctx.ocr.recognize(&normalized).await {
        Ok(text) => text,
        Err(ScanError::OcrUnavailable(msg)) => {
            // Best-effort provider; absence of text is a valid empty result
            warn!(user_id = %chat_id, error = %msg, "OCR unavailable, treating as no text");
            String::new()
        }
        Err(e) => {
            warn!(user_id = %chat_id, error = %e, "OCR failed, treating as no text");
            String::new()
        }
    };

    Some(ctx.detector.extract_numbers(&text))
}

/// Download a Telegram file into memory
pub async fn download_file(bot: &Bot, file_id: FileId) -> Result<Vec<u8>> {
    let file = bot.get_file(file_id).await?;
    let url = format!(
        "https://api.telegram.org/file/bot{}/{}",
        bot.token(),
        file.path
    );

    let response = reqwest::get(&url).await?;
    let bytes = response.bytes().await?;

    Ok(bytes.to_vec())
}

/// Delete a transient marker message; the sweep handles everything durable
async fn delete_quietly(bot: &Bot, chat_id: ChatId, message_id: MessageId) {
    if let Err(e) = bot.delete_message(chat_id, message_id).await {
        debug!(user_id = %chat_id, error = %e, "Could not delete progress marker");
    }
}
