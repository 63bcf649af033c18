//! In-process Bot API stand-in and recording doubles shared by the tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use {
    async_trait::async_trait,
    axum::{
        Json, Router,
        body::Bytes,
        extract::State,
        http::{StatusCode, Uri},
        response::{IntoResponse, Response},
        routing::post,
    },
    relay_capture::{
        CaptureSubmitter, MediaReference, MediaUploader, NormalizedCapture, SubmitError,
    },
    serde::Deserialize,
    serde_json::{Value, json},
    teloxide::Bot,
    tokio::{sync::oneshot, task::JoinHandle},
};

pub const TOKEN: &str = "test-token";
const FILE_PATH: &str = "photos/file_1.jpg";

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyParametersBody {
    pub message_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    #[serde(default)]
    pub reply_parameters: Option<ReplyParametersBody>,
}

impl SendMessageRequest {
    pub fn reply_to_message_id(&self) -> Option<i32> {
        self.reply_parameters.as_ref().map(|p| p.message_id)
    }
}

#[derive(Debug, Clone)]
pub enum CapturedRequest {
    SendMessage(SendMessageRequest),
    GetFile { file_id: String },
    GetUpdates { offset: i64 },
    Other { method: String },
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    updates: Arc<Mutex<VecDeque<Value>>>,
}

/// Axum server answering Bot API calls on a random local port.
pub struct MockTelegramApi {
    state: MockState,
    addr: std::net::SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    server: JoinHandle<()>,
}

impl MockTelegramApi {
    pub const PHOTO_BYTES: &'static [u8] = &[0xFF, 0xD8, 0xFF];

    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/{*path}", post(api_handler).get(file_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("serve mock telegram api");
        });

        Self {
            state,
            addr,
            shutdown_tx,
            server,
        }
    }

    pub fn bot(&self) -> Bot {
        let api_url =
            reqwest::Url::parse(&format!("http://{}/", self.addr)).expect("parse api url");
        Bot::new(TOKEN).set_api_url(api_url)
    }

    /// Queue a raw update for the next `getUpdates` call.
    pub fn push_update(&self, update: Value) {
        self.state
            .updates
            .lock()
            .expect("lock updates")
            .push_back(update);
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().expect("lock requests").clone()
    }

    pub fn sent_messages(&self) -> Vec<SendMessageRequest> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                CapturedRequest::SendMessage(body) => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn requested_file_ids(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                CapturedRequest::GetFile { file_id } => Some(file_id),
                _ => None,
            })
            .collect()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        self.server.await.expect("server join");
    }
}

fn ok(result: Value) -> Json<Value> {
    Json(json!({ "ok": true, "result": result }))
}

async fn api_handler(State(state): State<MockState>, uri: Uri, body: Bytes) -> Json<Value> {
    let method = uri.path().rsplit('/').next().unwrap_or_default().to_string();
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let captured = match method.as_str() {
        "SendMessage" => match serde_json::from_value::<SendMessageRequest>(payload.clone()) {
            Ok(req) => CapturedRequest::SendMessage(req),
            Err(_) => CapturedRequest::Other { method },
        },
        "GetFile" => CapturedRequest::GetFile {
            file_id: payload["file_id"].as_str().unwrap_or_default().to_string(),
        },
        "GetUpdates" => CapturedRequest::GetUpdates {
            offset: payload["offset"].as_i64().unwrap_or_default(),
        },
        _ => CapturedRequest::Other { method },
    };
    state
        .requests
        .lock()
        .expect("lock requests")
        .push(captured.clone());

    match captured {
        CapturedRequest::SendMessage(req) => ok(json!({
            "message_id": 1,
            "date": 0,
            "chat": { "id": req.chat_id, "type": "private" },
            "text": "ok"
        })),
        CapturedRequest::GetFile { file_id } => ok(json!({
            "file_id": file_id,
            "file_unique_id": "unique",
            "file_size": MockTelegramApi::PHOTO_BYTES.len(),
            "file_path": FILE_PATH
        })),
        CapturedRequest::GetUpdates { offset } => {
            let pending: Vec<Value> = {
                let mut queue = state.updates.lock().expect("lock updates");
                queue.retain(|u| u["update_id"].as_i64().unwrap_or_default() >= offset);
                queue.drain(..).collect()
            };
            if pending.is_empty() {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            ok(Value::Array(pending))
        },
        CapturedRequest::Other { method } if method == "GetMe" => ok(json!({
            "id": 1,
            "is_bot": true,
            "first_name": "Relay",
            "username": "relay_bot",
            "can_join_groups": false,
            "can_read_all_group_messages": false,
            "supports_inline_queries": false,
            "can_connect_to_business": false,
            "has_main_web_app": false
        })),
        CapturedRequest::Other { .. } => ok(Value::Bool(true)),
    }
}

async fn file_handler(uri: Uri) -> Response {
    if uri.path() == format!("/file/bot{TOKEN}/{FILE_PATH}") {
        MockTelegramApi::PHOTO_BYTES.to_vec().into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Submitter that records captures and optionally rejects them.
#[derive(Default)]
pub struct RecordingInbox {
    reject_with: Option<String>,
    captures: Mutex<Vec<NormalizedCapture>>,
}

impl RecordingInbox {
    pub fn rejecting(reason: &str) -> Self {
        Self {
            reject_with: Some(reason.to_string()),
            ..Default::default()
        }
    }

    pub fn captures(&self) -> Vec<NormalizedCapture> {
        self.captures.lock().expect("lock captures").clone()
    }
}

#[async_trait]
impl CaptureSubmitter for RecordingInbox {
    async fn submit(&self, capture: &NormalizedCapture) -> Result<(), SubmitError> {
        if let Some(reason) = &self.reject_with {
            return Err(SubmitError::rejected(reason.clone()));
        }
        self.captures
            .lock()
            .expect("lock captures")
            .push(capture.clone());
        Ok(())
    }
}

/// Uploader that accepts everything and hands back a fixed reference.
#[derive(Default)]
pub struct StaticUploader {
    uploads: Mutex<Vec<(Vec<u8>, String)>>,
}

impl StaticUploader {
    pub const DISPLAY_URL: &'static str = "https://store.example/objects/1.jpg";

    pub fn uploads(&self) -> Vec<(Vec<u8>, String)> {
        self.uploads.lock().expect("lock uploads").clone()
    }
}

#[async_trait]
impl MediaUploader for StaticUploader {
    async fn upload(
        &self,
        data: Vec<u8>,
        extension: &str,
    ) -> relay_capture::Result<MediaReference> {
        self.uploads
            .lock()
            .expect("lock uploads")
            .push((data, extension.to_string()));
        Ok(MediaReference {
            reference_url: format!("{}/details", Self::DISPLAY_URL),
            display_url: Self::DISPLAY_URL.to_string(),
        })
    }
}
