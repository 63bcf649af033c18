use tracing::warn;

use crate::types::InboundEvent;

/// Admits events from exactly one configured sender.
#[derive(Debug, Clone, Copy)]
pub struct AccessFilter {
    authorized_id: u64,
}

impl AccessFilter {
    #[must_use]
    pub fn new(authorized_id: u64) -> Self {
        Self { authorized_id }
    }

    /// Determine if an inbound event should be processed.
    ///
    /// Returns `Ok(())` if the sender is authorized, or `Err(AccessDenied)` if
    /// the event must be dropped without a reply.
    pub fn check(&self, event: &InboundEvent) -> Result<(), AccessDenied> {
        if event.sender_id == self.authorized_id {
            return Ok(());
        }
        warn!(
            sender_id = event.sender_id,
            chat_id = event.chat_id,
            "unauthorized message dropped"
        );
        Err(AccessDenied::NotAuthorized {
            sender_id: event.sender_id,
        })
    }
}

/// Reason an inbound event was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    NotAuthorized { sender_id: u64 },
}

impl std::fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthorized { sender_id } => write!(f, "sender {sender_id} is not authorized"),
        }
    }
}
