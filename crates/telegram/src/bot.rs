use std::time::Duration;

use {
    relay_capture::{Pipeline, Responder},
    relay_config::TelegramConfig,
    secrecy::ExposeSecret,
    teloxide::{
        ApiError, Bot, RequestError,
        prelude::*,
        types::{AllowedUpdate, Me, UpdateKind},
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::{Error, Result, handlers};

/// Delay before retrying a failed `getUpdates` call.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Build a bot whose HTTP timeout outlasts the long-polling timeout, so the
/// client doesn't abort a request before Telegram responds.
pub fn build_bot(config: &TelegramConfig) -> Result<Bot> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(Duration::from_secs(u64::from(config.poll_timeout_secs) + 15))
        .build()
        .map_err(|e| Error::message(format!("failed to build Telegram HTTP client: {e}")))?;
    Ok(Bot::with_client(config.token.expose_secret(), client))
}

/// Verify credentials and clear any webhook so long polling works.
pub async fn connect(bot: &Bot) -> Result<Me> {
    let me = bot.get_me().await?;
    bot.delete_webhook().send().await?;
    info!(username = ?me.username, "telegram bot connected (webhook cleared)");
    Ok(me)
}

/// Long-poll for messages and feed them to `pipeline` one at a time until
/// `cancel` fires.
///
/// Returns an error when another instance is polling with the same token;
/// any other API failure is logged and retried.
pub async fn run_polling(
    bot: &Bot,
    pipeline: &Pipeline,
    responder: &dyn Responder,
    poll_timeout_secs: u32,
    cancel: CancellationToken,
) -> Result<()> {
    info!(poll_timeout_secs, "starting telegram polling loop");
    let mut offset: i32 = 0;
    // Offset carried by the last completed request; updates below it are
    // confirmed.
    let mut confirmed: i32 = 0;

    loop {
        let request = bot
            .get_updates()
            .offset(offset)
            .timeout(poll_timeout_secs)
            .allowed_updates(vec![AllowedUpdate::Message]);

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = request.send() => result,
        };
        confirmed = offset;

        match result {
            Ok(updates) => {
                debug!(count = updates.len(), "got telegram updates");
                for update in updates {
                    offset = update.id.as_offset();
                    match update.kind {
                        UpdateKind::Message(msg) => {
                            handlers::handle_message(&msg, pipeline, responder).await;
                        },
                        other => {
                            debug!("ignoring non-message update: {other:?}");
                        },
                    }
                }
            },
            Err(e) => {
                if matches!(&e, RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) {
                    warn!("another instance is already polling with this token");
                    return Err(e.into());
                }

                warn!(error = %e, "telegram getUpdates failed");
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(RETRY_DELAY) => {},
                }
            },
        }
    }

    if offset != confirmed {
        confirm_offset(bot, offset).await;
    }
    info!("telegram polling stopped");
    Ok(())
}

/// Tell Telegram that every update below `offset` was handled, so a batch
/// processed right before shutdown is not redelivered on restart.
async fn confirm_offset(bot: &Bot, offset: i32) {
    let result = bot
        .get_updates()
        .offset(offset)
        .timeout(0)
        .allowed_updates(vec![AllowedUpdate::Message])
        .send()
        .await;
    match result {
        Ok(_) => debug!(offset, "confirmed handled updates"),
        Err(e) => warn!(offset, error = %e, "failed to confirm handled updates"),
    }
}
