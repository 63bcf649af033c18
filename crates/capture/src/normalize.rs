//! Deterministic `(content, note)` derivation from one inbound event.

use crate::types::{InboundEvent, NormalizedCapture};

/// Why an event never reaches the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Media that cannot be carried into the inbox.
    UnsupportedMedia,
    /// Nothing left to submit.
    EmptyCapture,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedMedia => write!(f, "unsupported media"),
            Self::EmptyCapture => write!(f, "empty capture"),
        }
    }
}

/// Build the base capture for `event`.
///
/// `photos_enabled` tells whether a media uploader is available. Without
/// one, photos are treated like every other unsupported media kind.
///
/// A photo event may come back with an empty capture: the enrichment step
/// fills it in, and the pipeline re-checks emptiness afterwards.
pub fn normalize(
    event: &InboundEvent,
    photos_enabled: bool,
) -> Result<NormalizedCapture, Rejection> {
    let mut capture = NormalizedCapture {
        content: event.text().unwrap_or_default().to_string(),
        note: String::new(),
    };

    if let Some(origin) = &event.forward_origin {
        let line = origin.render();
        if capture.content.is_empty() {
            capture.content = line;
        } else {
            capture.note = line;
        }
    }

    let pending_photo = match &event.media {
        Some(_) if photos_enabled && event.photo().is_some() => true,
        Some(_) => return Err(Rejection::UnsupportedMedia),
        None => false,
    };

    if let Some(caption) = event.caption() {
        append_paragraph(&mut capture.content, caption);
    }

    if capture.is_empty() && !pending_photo {
        return Err(Rejection::EmptyCapture);
    }
    Ok(capture)
}

/// Append `text` to `buf`, separated by a blank line when `buf` is non-empty.
pub(crate) fn append_paragraph(buf: &mut String, text: &str) {
    if !buf.is_empty() {
        buf.push_str("\n\n");
    }
    buf.push_str(text);
}
