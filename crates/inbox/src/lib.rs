//! Dynalist inbox submitter.
//!
//! Posts each capture to the `inbox/add` endpoint and maps the response to
//! the capture pipeline's typed submission errors.

use {
    async_trait::async_trait,
    relay_capture::{CaptureSubmitter, NormalizedCapture, SubmitError},
    relay_config::InboxConfig,
    reqwest::Client,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::debug,
};

/// Request body for `inbox/add`.
#[derive(Debug, Serialize)]
struct AddRequest<'a> {
    token: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    checkbox: bool,
}

/// Response of `inbox/add`. Every call answers with `_code`.
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "_code")]
    code: String,
    #[serde(rename = "_msg", default)]
    message: Option<String>,
    #[serde(default)]
    node_id: Option<String>,
}

/// Appends captures to a Dynalist inbox.
pub struct DynalistInbox {
    client: Client,
    api_url: String,
    token: Secret<String>,
    checkbox: bool,
    index: Option<i64>,
}

impl DynalistInbox {
    #[must_use]
    pub fn new(config: &InboxConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: &InboxConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
            checkbox: config.checkbox,
            index: config.index,
        }
    }
}

#[async_trait]
impl CaptureSubmitter for DynalistInbox {
    async fn submit(&self, capture: &NormalizedCapture) -> Result<(), SubmitError> {
        let body = AddRequest {
            token: self.token.expose_secret(),
            content: &capture.content,
            note: capture.note(),
            index: self.index,
            checkbox: self.checkbox,
        };

        let resp = self
            .client
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(SubmitError::transport)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(SubmitError::transport)?;

        let parsed: AddResponse =
            serde_json::from_slice(&bytes).map_err(SubmitError::malformed)?;
        if parsed.code != "Ok" {
            let reason = match parsed.message.filter(|m| !m.is_empty()) {
                Some(message) => message,
                None => format!("code {}", parsed.code),
            };
            return Err(SubmitError::rejected(reason));
        }

        debug!(%status, node_id = ?parsed.node_id, "dynalist accepted capture");
        Ok(())
    }
}
