use anyhow::Result;
use std::env;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use numscan::bot::{callback_handler, message_handler, ScannerContext};
use numscan::cleanup::MessageCleaner;
use numscan::config::AppConfig;
use numscan::ocr::OcrClient;
use numscan::text_processing::NumberDetector;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    info!("Starting number scanner bot");

    let bot_token = env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");
    let config = AppConfig::from_env();

    let detector = NumberDetector::new()?;
    let ocr = OcrClient::new(config.ocr.clone());
    let cleaner = Arc::new(MessageCleaner::new(config.message_ttl));

    let bot = Bot::new(bot_token);

    info!(
        ttl_secs = config.message_ttl.as_secs(),
        sweep_secs = config.sweep_interval.as_secs(),
        "Starting cleanup sweep loop"
    );
    // The sweep loop is the only task that deletes expired messages
    tokio::spawn(Arc::clone(&cleaner).run(bot.clone(), config.sweep_interval));

    let context = Arc::new(ScannerContext {
        detector,
        ocr,
        cleaner,
        config,
    });

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let context = Arc::clone(&context);
            move |bot: Bot, msg: Message| {
                let context = Arc::clone(&context);
                async move { message_handler(bot, msg, context).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let context = Arc::clone(&context);
            move |bot: Bot, q: CallbackQuery| {
                let context = Arc::clone(&context);
                async move { callback_handler(bot, q, context).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
