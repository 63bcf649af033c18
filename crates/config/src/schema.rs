/// Config schema: Telegram bot, target inbox, optional object storage.
use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
};

/// Default Dynalist inbox endpoint.
pub const DEFAULT_INBOX_API_URL: &str = "https://dynalist.io/api/v1/inbox/add";

/// Root configuration, loaded once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub telegram: TelegramConfig,
    pub inbox: InboxConfig,
    pub storage: StorageConfig,
}

impl RelayConfig {
    /// Whether media uploads can be enabled.
    #[must_use]
    pub fn storage_enabled(&self) -> bool {
        self.storage.is_complete()
    }
}

/// Telegram bot settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub token: Secret<String>,

    /// The only Telegram user whose messages are relayed.
    pub authorized_user_id: Option<u64>,

    /// Long-poll timeout for `getUpdates` (seconds).
    pub poll_timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            authorized_user_id: None,
            poll_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("authorized_user_id", &self.authorized_user_id)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

/// Target inbox (Dynalist `inbox/add`).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct InboxConfig {
    /// Per-user API token.
    pub token: Secret<String>,

    pub api_url: String,

    /// Render new items with a checkbox.
    pub checkbox: bool,

    /// Insert position inside the inbox; the inbox default when unset.
    pub index: Option<i64>,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            api_url: DEFAULT_INBOX_API_URL.to_string(),
            checkbox: false,
            index: None,
        }
    }
}

impl std::fmt::Debug for InboxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboxConfig")
            .field("token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("checkbox", &self.checkbox)
            .field("index", &self.index)
            .finish()
    }
}

/// Cloudflare R2 bucket used to re-host photos.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub account_id: String,
    pub access_key_id: String,
    pub access_key_secret: Secret<String>,
    pub bucket: String,

    /// S3 endpoint override; derived from `account_id` when unset.
    pub endpoint: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            access_key_id: String::new(),
            access_key_secret: Secret::new(String::new()),
            bucket: String::new(),
            endpoint: None,
        }
    }
}

impl StorageConfig {
    fn required_fields(&self) -> [(&'static str, bool); 4] {
        [
            ("account_id", !self.account_id.is_empty()),
            ("access_key_id", !self.access_key_id.is_empty()),
            (
                "access_key_secret",
                !self.access_key_secret.expose_secret().is_empty(),
            ),
            ("bucket", !self.bucket.is_empty()),
        ]
    }

    /// All credentials and the bucket are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.required_fields().iter().all(|(_, set)| *set)
    }

    /// Nothing at all is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required_fields().iter().all(|(_, set)| !*set)
    }

    /// Names of required fields that are still empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.required_fields()
            .into_iter()
            .filter_map(|(name, set)| (!set).then_some(name))
            .collect()
    }

    /// S3-compatible endpoint for the account.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.r2.cloudflarestorage.com", self.account_id))
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"[REDACTED]")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
