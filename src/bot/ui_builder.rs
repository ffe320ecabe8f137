//! UI Builder module for creating keyboards and formatting result messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::text_processing::ResultNumber;

// Telegram inline button labels get clipped by clients past ~20 chars
const MAX_BUTTON_LABEL: usize = 20;

/// Header line for a non-empty result list
pub fn format_results_message(numbers: &[ResultNumber]) -> String {
    if numbers.len() == 1 {
        "📱 Found 1 number. Tap it to copy".to_string()
    } else {
        format!("📱 Found {} numbers. Tap one to copy", numbers.len())
    }
}

/// Neutral marker when no number survived extraction
pub fn format_no_results_message() -> String {
    "❌ No phone numbers found in this image".to_string()
}

/// Create the numbered inline keyboard, one button per result
///
/// Callback data carries the canonical key so the callback handler can
/// re-render the number without any per-chat state. The result list itself is
/// uncapped; the keyboard is where the UI limit applies.
pub fn create_results_keyboard(numbers: &[ResultNumber], cap: usize) -> InlineKeyboardMarkup {
    let mut buttons = Vec::new();

    for (i, number) in numbers.iter().take(cap).enumerate() {
        let label = format!("{}. {}", i + 1, number.display);
        let label = if label.len() > MAX_BUTTON_LABEL {
            format!("{}...", &label[..MAX_BUTTON_LABEL - 3])
        } else {
            label
        };

        buttons.push(vec![InlineKeyboardButton::callback(
            label,
            format!("copy_{}", number.canonical),
        )]);
    }

    InlineKeyboardMarkup::new(buttons)
}
