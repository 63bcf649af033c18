//! Conversion of teloxide messages into pipeline events.

use {
    relay_capture::{ForwardOrigin, InboundEvent, MediaDescriptor, MediaKind, MediaVariant},
    teloxide::types::{Chat, MediaKind as TgMediaKind, Message, MessageKind, MessageOrigin},
};

/// Build an [`InboundEvent`] from a Telegram message.
///
/// Returns `None` for messages without a sender (channel posts, service
/// messages) since they cannot pass the access filter anyway.
pub fn inbound_event(msg: &Message) -> Option<InboundEvent> {
    let sender = msg.from.as_ref()?;
    Some(InboundEvent {
        sender_id: sender.id.0,
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        text: msg.text().map(str::to_string),
        caption: msg.caption().map(str::to_string),
        forward_origin: msg.forward_origin().map(forward_origin),
        media: media_descriptor(msg),
    })
}

fn forward_origin(origin: &MessageOrigin) -> ForwardOrigin {
    match origin {
        MessageOrigin::User { sender_user, .. } => ForwardOrigin::FromUser {
            first: sender_user.first_name.clone(),
            last: sender_user.last_name.clone(),
            handle: sender_user.username.clone(),
        },
        MessageOrigin::HiddenUser {
            sender_user_name, ..
        } => ForwardOrigin::FromUser {
            first: sender_user_name.clone(),
            last: None,
            handle: None,
        },
        MessageOrigin::Chat { sender_chat, .. } => chat_origin(sender_chat),
        MessageOrigin::Channel { chat, .. } => chat_origin(chat),
    }
}

fn chat_origin(chat: &Chat) -> ForwardOrigin {
    let title = chat
        .title()
        .or_else(|| chat.first_name())
        .unwrap_or("unknown chat");
    ForwardOrigin::FromChat {
        title: title.to_string(),
        handle: chat.username().map(str::to_string),
    }
}

/// Describe attached media. Only photos carry variants; other kinds are
/// refused by the pipeline before anything is downloaded.
fn media_descriptor(msg: &Message) -> Option<MediaDescriptor> {
    let MessageKind::Common(common) = &msg.kind else {
        return None;
    };
    let kind = match &common.media_kind {
        TgMediaKind::Photo(p) => {
            return Some(MediaDescriptor {
                kind: MediaKind::Photo,
                variants: p
                    .photo
                    .iter()
                    .map(|size| MediaVariant {
                        locator: size.file.id.clone(),
                        approx_size: Some(size.file.size),
                    })
                    .collect(),
            });
        },
        TgMediaKind::Video(_) | TgMediaKind::VideoNote(_) => MediaKind::Video,
        TgMediaKind::Audio(_) | TgMediaKind::Voice(_) => MediaKind::Audio,
        TgMediaKind::Document(_) => MediaKind::Document,
        TgMediaKind::Sticker(_) => MediaKind::Sticker,
        TgMediaKind::Animation(_) => MediaKind::Animation,
        _ => return None,
    };
    Some(MediaDescriptor {
        kind,
        variants: Vec::new(),
    })
}
