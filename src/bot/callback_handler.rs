//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, error};

use super::ScannerContext;

/// Handle a `copy_<canonical>` button press by re-rendering that single
/// number in copy-friendly form
///
/// The payload round-trips through the client, so only well-formed canonical
/// keys are accepted; anything else is ignored and the query is still
/// answered to clear the client's loading state.
pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: Arc<ScannerContext>) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query");

    if let Some(canonical) = q.data.as_deref().and_then(|d| d.strip_prefix("copy_")) {
        if is_canonical_key(canonical) {
            if let Some(msg) = &q.message {
                let display = ctx.detector.format(canonical);
                let text = format!("`{display}`\n📋 Tap and hold the number to copy it");

                match bot
                    .edit_message_text(msg.chat().id, msg.id(), text)
                    .parse_mode(ParseMode::Markdown)
                    .await
                {
                    Ok(_) => ctx.cleaner.track(msg.chat().id, msg.id()),
                    Err(e) => {
                        error!(user_id = %q.from.id, error = %e, "Failed to edit message for copy view")
                    }
                }
            }
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}

/// A canonical key is digits with at most one leading `+`
fn is_canonical_key(key: &str) -> bool {
    let digits = key.strip_prefix('+').unwrap_or(key);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
