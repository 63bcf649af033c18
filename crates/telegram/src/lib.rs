//! Telegram side of inbox-relay.
//!
//! Long-polls the Bot API with teloxide, converts each message into a
//! transport-neutral `InboundEvent`, runs it through the capture pipeline and
//! replies in the originating chat.

pub mod bot;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod media;
pub mod outbound;

#[cfg(test)]
mod testing;

pub use {
    bot::{build_bot, connect, run_polling},
    error::{Error, Result},
    media::TelegramMediaSource,
    outbound::TelegramResponder,
};
