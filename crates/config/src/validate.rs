//! Startup validation of the effective configuration.

use secrecy::ExposeSecret;

use crate::schema::RelayConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "telegram.token"
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.path, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, path: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path: path.to_string(),
            message: message.into(),
        });
    }
}

/// Check that the relay can start with `config`.
///
/// Missing credentials for Telegram or the inbox are errors. Storage is
/// optional: absent is informational, partial is a warning and uploads stay
/// disabled.
#[must_use]
pub fn validate(config: &RelayConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if config.telegram.token.expose_secret().is_empty() {
        result.push(
            Severity::Error,
            "telegram.token",
            "bot token is required (set BOT_TOKEN)",
        );
    }
    if config.telegram.authorized_user_id.is_none() {
        result.push(
            Severity::Error,
            "telegram.authorized_user_id",
            "authorized user id is required (set TG_USER_ID)",
        );
    }
    if config.telegram.poll_timeout_secs == 0 {
        result.push(
            Severity::Warning,
            "telegram.poll_timeout_secs",
            "a zero poll timeout turns long polling into busy polling",
        );
    }

    if config.inbox.token.expose_secret().is_empty() {
        result.push(
            Severity::Error,
            "inbox.token",
            "inbox API token is required (set DYNALIST_TOKEN)",
        );
    }
    if !config.inbox.api_url.starts_with("http://") && !config.inbox.api_url.starts_with("https://")
    {
        result.push(
            Severity::Error,
            "inbox.api_url",
            format!("not an HTTP URL: {}", config.inbox.api_url),
        );
    }

    if config.storage.is_empty() {
        result.push(
            Severity::Info,
            "storage",
            "no object storage configured; photos will be refused",
        );
    } else if !config.storage.is_complete() {
        result.push(
            Severity::Warning,
            "storage",
            format!(
                "incomplete object storage settings, missing {}; photo uploads disabled",
                config.storage.missing_fields().join(", ")
            ),
        );
    }

    result
}
