use {
    async_trait::async_trait,
    relay_capture::Responder,
    teloxide::{
        Bot,
        payloads::SendMessageSetters,
        prelude::Requester,
        types::{ChatId, MessageId, ReplyParameters},
    },
    tracing::{debug, warn},
};

/// Replies to captures as plain-text messages quoting the original.
#[derive(Clone)]
pub struct TelegramResponder {
    bot: Bot,
}

impl TelegramResponder {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Responder for TelegramResponder {
    async fn reply(&self, chat_id: i64, reply_to: i32, text: &str) {
        let result = self
            .bot
            .send_message(ChatId(chat_id), text)
            .reply_parameters(
                ReplyParameters::new(MessageId(reply_to)).allow_sending_without_reply(),
            )
            .await;
        match result {
            Ok(_) => debug!(chat_id, reply_to, "sent reply"),
            Err(e) => warn!(chat_id, reply_to, error = %e, "failed to send reply"),
        }
    }
}
