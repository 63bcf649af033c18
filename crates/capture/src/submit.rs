use {async_trait::async_trait, std::error::Error as StdError};

use crate::types::NormalizedCapture;

/// Appends captures to the target inbox.
#[async_trait]
pub trait CaptureSubmitter: Send + Sync {
    /// Submit one capture. Implementations must not retry.
    async fn submit(&self, capture: &NormalizedCapture) -> Result<(), SubmitError>;
}

/// Coarse failure class, logged for diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitErrorKind {
    MalformedResponse,
    Rejected,
    Transport,
}

impl std::fmt::Display for SubmitErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedResponse => write!(f, "malformed_response"),
            Self::Rejected => write!(f, "rejected"),
            Self::Transport => write!(f, "transport"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The inbox answered with something that could not be decoded.
    #[error("failed to decode response: {source}")]
    MalformedResponse {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The inbox understood the request and refused it.
    #[error("{reason}")]
    Rejected { reason: String },

    /// The request never completed.
    #[error("failed to send request: {source}")]
    Transport {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl SubmitError {
    #[must_use]
    pub fn malformed(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::MalformedResponse {
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn transport(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Transport {
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SubmitErrorKind {
        match self {
            Self::MalformedResponse { .. } => SubmitErrorKind::MalformedResponse,
            Self::Rejected { .. } => SubmitErrorKind::Rejected,
            Self::Transport { .. } => SubmitErrorKind::Transport,
        }
    }

    /// Human-readable reason shown to the user.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
