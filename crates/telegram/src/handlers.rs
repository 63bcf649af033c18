use {
    relay_capture::{Outcome, Pipeline, Responder},
    teloxide::types::Message,
    tracing::{debug, field},
};

use crate::extract;

/// Run a Telegram message through the capture pipeline and reply.
///
/// Returns `None` when the message carries no sender and is skipped.
pub async fn handle_message(
    msg: &Message,
    pipeline: &Pipeline,
    responder: &dyn Responder,
) -> Option<Outcome> {
    let Some(event) = extract::inbound_event(msg) else {
        debug!(chat_id = msg.chat.id.0, "ignoring message without sender");
        return None;
    };
    debug!(
        chat_id = event.chat_id,
        message_id = event.message_id,
        media = event.media.as_ref().map(|m| field::display(m.kind)),
        forwarded = event.forward_origin.is_some(),
        "received telegram message"
    );
    Some(pipeline.handle(&event, responder).await)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            TelegramMediaSource, TelegramResponder,
            testing::{CapturedRequest, MockTelegramApi, RecordingInbox, StaticUploader},
        },
        relay_capture::{AccessFilter, DisabledUploader, MediaUploader},
        serde_json::json,
        std::sync::Arc,
    };

    fn message(extra: serde_json::Value) -> Message {
        let mut base = json!({
            "message_id": 7,
            "date": 1,
            "chat": { "id": 42, "type": "private", "first_name": "Alice" },
            "from": { "id": 1001, "is_bot": false, "first_name": "Alice" }
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).expect("deserialize message")
    }

    fn pipeline(
        api: &MockTelegramApi,
        uploader: Arc<dyn MediaUploader>,
        inbox: Arc<RecordingInbox>,
    ) -> Pipeline {
        Pipeline::new(
            AccessFilter::new(1001),
            Arc::new(TelegramMediaSource::new(api.bot())),
            uploader,
            inbox,
        )
    }

    #[tokio::test]
    async fn text_message_is_added_and_acknowledged() {
        let api = MockTelegramApi::start().await;
        let inbox = Arc::new(RecordingInbox::default());
        let pipeline = pipeline(&api, Arc::new(DisabledUploader), Arc::clone(&inbox));
        let responder = TelegramResponder::new(api.bot());

        let outcome = handle_message(&message(json!({ "text": "buy milk" })), &pipeline, &responder)
            .await
            .expect("message has a sender");

        assert!(matches!(outcome, Outcome::Added { with_image: false }));
        let captures = inbox.captures();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].content, "buy milk");

        let replies = api.sent_messages();
        assert_eq!(replies.len(), 1, "requests={:?}", api.requests());
        assert_eq!(replies[0].chat_id, 42);
        assert_eq!(replies[0].text, "Added to inbox.");
        assert_eq!(replies[0].reply_to_message_id(), Some(7));
        api.shutdown().await;
    }

    #[tokio::test]
    async fn stranger_gets_no_reply() {
        let api = MockTelegramApi::start().await;
        let inbox = Arc::new(RecordingInbox::default());
        let pipeline = pipeline(&api, Arc::new(DisabledUploader), Arc::clone(&inbox));
        let responder = TelegramResponder::new(api.bot());

        let msg = message(json!({
            "text": "hi",
            "from": { "id": 666, "is_bot": false, "first_name": "Mallory" }
        }));
        let outcome = handle_message(&msg, &pipeline, &responder).await.unwrap();

        assert!(matches!(outcome, Outcome::Unauthorized));
        assert!(inbox.captures().is_empty());
        assert!(api.requests().is_empty());
        api.shutdown().await;
    }

    #[tokio::test]
    async fn photo_without_storage_is_refused() {
        let api = MockTelegramApi::start().await;
        let inbox = Arc::new(RecordingInbox::default());
        let pipeline = pipeline(&api, Arc::new(DisabledUploader), Arc::clone(&inbox));
        let responder = TelegramResponder::new(api.bot());

        let msg = message(json!({
            "caption": "sunset",
            "photo": [{ "file_id": "large", "file_unique_id": "l", "width": 10, "height": 10 }]
        }));
        let outcome = handle_message(&msg, &pipeline, &responder).await.unwrap();

        assert!(matches!(outcome, Outcome::UnsupportedMedia));
        assert!(inbox.captures().is_empty());
        let replies = api.sent_messages();
        assert_eq!(replies[0].text, "Only text is supported for this media kind.");
        api.shutdown().await;
    }

    #[tokio::test]
    async fn photo_is_downloaded_uploaded_and_linked() {
        let api = MockTelegramApi::start().await;
        let inbox = Arc::new(RecordingInbox::default());
        let uploader = Arc::new(StaticUploader::default());
        let pipeline = pipeline(
            &api,
            Arc::clone(&uploader) as Arc<dyn MediaUploader>,
            Arc::clone(&inbox),
        );
        let responder = TelegramResponder::new(api.bot());

        let msg = message(json!({
            "photo": [
                { "file_id": "small", "file_unique_id": "s", "width": 90, "height": 60, "file_size": 10 },
                { "file_id": "large", "file_unique_id": "l", "width": 1280, "height": 853, "file_size": 3 }
            ]
        }));
        let outcome = handle_message(&msg, &pipeline, &responder).await.unwrap();

        assert!(matches!(outcome, Outcome::Added { with_image: true }));
        assert_eq!(api.requested_file_ids(), vec!["large".to_string()]);
        assert_eq!(uploader.uploads(), vec![(MockTelegramApi::PHOTO_BYTES.to_vec(), ".jpg".to_string())]);

        let captures = inbox.captures();
        assert_eq!(captures[0].content, "Image from Telegram");
        assert_eq!(captures[0].note, format!("Image: {}", StaticUploader::DISPLAY_URL));
        assert_eq!(api.sent_messages()[0].text, "Added to inbox with image.");
        api.shutdown().await;
    }

    #[tokio::test]
    async fn inbox_rejection_is_reported_in_chat() {
        let api = MockTelegramApi::start().await;
        let inbox = Arc::new(RecordingInbox::rejecting("invalid token"));
        let pipeline = pipeline(&api, Arc::new(DisabledUploader), Arc::clone(&inbox));
        let responder = TelegramResponder::new(api.bot());

        let outcome = handle_message(&message(json!({ "text": "note" })), &pipeline, &responder)
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::SubmissionFailed(_)));
        assert_eq!(
            api.sent_messages()[0].text,
            "Error adding to inbox: invalid token"
        );
        assert!(
            api.requests()
                .iter()
                .all(|r| !matches!(r, CapturedRequest::GetFile { .. }))
        );
        api.shutdown().await;
    }
}
