use async_trait::async_trait;

use crate::pipeline::Outcome;

pub const UNSUPPORTED_MEDIA_MSG: &str = "Only text is supported for this media kind.";
pub const EMPTY_CAPTURE_MSG: &str = "Cannot add empty message.";
pub const ADDED_MSG: &str = "Added to inbox.";
pub const ADDED_WITH_IMAGE_MSG: &str = "Added to inbox with image.";

/// Sends a reply into the chat the event came from.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Best effort: implementations log their own failures.
    async fn reply(&self, chat_id: i64, reply_to: i32, text: &str);
}

/// The reply for an outcome, or `None` when the event is dropped silently.
#[must_use]
pub fn reply_text(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Unauthorized => None,
        Outcome::UnsupportedMedia => Some(UNSUPPORTED_MEDIA_MSG.to_string()),
        Outcome::EmptyCapture => Some(EMPTY_CAPTURE_MSG.to_string()),
        Outcome::Added { with_image: false } => Some(ADDED_MSG.to_string()),
        Outcome::Added { with_image: true } => Some(ADDED_WITH_IMAGE_MSG.to_string()),
        Outcome::SubmissionFailed(err) => Some(format!("Error adding to inbox: {}", err.reason())),
    }
}
