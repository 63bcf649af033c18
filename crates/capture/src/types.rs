//! Per-event data model. Everything here lives for one pipeline run.

/// One inbound chat message, already stripped of transport details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundEvent {
    /// Identity of the author (Telegram user id).
    pub sender_id: u64,
    /// Chat the reply goes back to.
    pub chat_id: i64,
    /// Message the reply quotes.
    pub message_id: i32,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub forward_origin: Option<ForwardOrigin>,
    pub media: Option<MediaDescriptor>,
}

impl InboundEvent {
    /// Text with empty strings folded into `None`.
    pub(crate) fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    pub(crate) fn caption(&self) -> Option<&str> {
        self.caption.as_deref().filter(|c| !c.is_empty())
    }

    /// The media descriptor when it is a photo.
    #[must_use]
    pub fn photo(&self) -> Option<&MediaDescriptor> {
        self.media.as_ref().filter(|m| m.kind == MediaKind::Photo)
    }
}

/// Where a forwarded message originally came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOrigin {
    FromUser {
        first: String,
        last: Option<String>,
        handle: Option<String>,
    },
    FromChat {
        title: String,
        handle: Option<String>,
    },
}

impl ForwardOrigin {
    /// Render the origin as a single human-readable line.
    #[must_use]
    pub fn render(&self) -> String {
        let (name, handle) = match self {
            Self::FromUser {
                first,
                last,
                handle,
            } => {
                let name = match last.as_deref().filter(|l| !l.is_empty()) {
                    Some(last) => format!("{first} {last}"),
                    None => first.clone(),
                };
                (name, handle)
            },
            Self::FromChat { title, handle } => (title.clone(), handle),
        };
        match handle.as_deref().filter(|h| !h.is_empty()) {
            Some(handle) => format!("Forwarded from {} (@{handle})", name.trim()),
            None => format!("Forwarded from {}", name.trim()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    Document,
    Sticker,
    Animation,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Sticker => "sticker",
            Self::Animation => "animation",
        };
        f.write_str(s)
    }
}

/// Attached media, with variants ordered smallest to largest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub kind: MediaKind,
    pub variants: Vec<MediaVariant>,
}

impl MediaDescriptor {
    /// Highest-resolution variant (the last one).
    #[must_use]
    pub fn largest(&self) -> Option<&MediaVariant> {
        self.variants.last()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaVariant {
    /// Opaque handle the event source can resolve into a download URL.
    pub locator: String,
    pub approx_size: Option<u32>,
}

/// Content and note of one capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedCapture {
    pub content: String,
    pub note: String,
}

impl NormalizedCapture {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.note.is_empty()
    }

    /// Note as an optional field for submitters that omit empty notes.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        (!self.note.is_empty()).then_some(self.note.as_str())
    }
}

/// Result of a successful media upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    /// Durable reference returned by the store.
    pub reference_url: String,
    /// Human-navigable URL written into the note.
    pub display_url: String,
}
