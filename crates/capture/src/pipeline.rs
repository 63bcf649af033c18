use {
    std::sync::Arc,
    tracing::{debug, info, warn},
};

use crate::{
    access::AccessFilter,
    enrich::{self, MediaSource, MediaUploader},
    normalize::{Rejection, normalize},
    respond::{self, Responder},
    submit::{CaptureSubmitter, SubmitError},
    types::InboundEvent,
};

/// Terminal state of one pipeline run.
#[derive(Debug)]
pub enum Outcome {
    Unauthorized,
    UnsupportedMedia,
    EmptyCapture,
    Added { with_image: bool },
    SubmissionFailed(SubmitError),
}

impl From<Rejection> for Outcome {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::UnsupportedMedia => Self::UnsupportedMedia,
            Rejection::EmptyCapture => Self::EmptyCapture,
        }
    }
}

/// Filter, normalize, enrich, submit, respond.
///
/// Holds no per-event state; callers feed events one at a time.
pub struct Pipeline {
    access: AccessFilter,
    source: Arc<dyn MediaSource>,
    uploader: Arc<dyn MediaUploader>,
    submitter: Arc<dyn CaptureSubmitter>,
}

impl Pipeline {
    pub fn new(
        access: AccessFilter,
        source: Arc<dyn MediaSource>,
        uploader: Arc<dyn MediaUploader>,
        submitter: Arc<dyn CaptureSubmitter>,
    ) -> Self {
        Self {
            access,
            source,
            uploader,
            submitter,
        }
    }

    /// Run one event through the pipeline without replying.
    pub async fn process(&self, event: &InboundEvent) -> Outcome {
        if self.access.check(event).is_err() {
            return Outcome::Unauthorized;
        }

        let mut capture = match normalize(event, self.uploader.is_enabled()) {
            Ok(capture) => capture,
            Err(rejection) => {
                debug!(message_id = event.message_id, %rejection, "capture rejected");
                return rejection.into();
            },
        };

        let reference =
            enrich::upload_photo(event, self.source.as_ref(), self.uploader.as_ref()).await;
        if let Some(ref reference) = reference {
            enrich::attach_reference(&mut capture, reference);
        }

        if capture.content.is_empty() {
            debug!(message_id = event.message_id, "nothing left to capture after enrichment");
            return Outcome::EmptyCapture;
        }

        match self.submitter.submit(&capture).await {
            Ok(()) => {
                info!(
                    message_id = event.message_id,
                    with_image = reference.is_some(),
                    "capture added to inbox"
                );
                Outcome::Added {
                    with_image: reference.is_some(),
                }
            },
            Err(e) => {
                warn!(
                    message_id = event.message_id,
                    kind = %e.kind(),
                    error = %e,
                    "failed to add capture to inbox"
                );
                Outcome::SubmissionFailed(e)
            },
        }
    }

    /// Process one event and send the matching reply, if any.
    pub async fn handle(&self, event: &InboundEvent, responder: &dyn Responder) -> Outcome {
        let outcome = self.process(event).await;
        if let Some(text) = respond::reply_text(&outcome) {
            responder.reply(event.chat_id, event.message_id, &text).await;
        }
        outcome
    }
}
