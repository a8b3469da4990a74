//! Caller-supplied actor context.

use serde::{Deserialize, Serialize};

/// Who performed an audited action, as reported by the caller.
///
/// Every field is advisory: none is required for signing correctness, but
/// all of them are included in the signed payload so they cannot be altered
/// after the fact. The subsystem never derives these itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// Identifier of the acting user, if known.
    pub user_id: Option<String>,
    /// Display name of the acting user.
    pub user_name: Option<String>,
    /// Session the action was performed in.
    pub session_id: Option<String>,
    /// Source IP address.
    pub ip_address: Option<String>,
    /// User agent string of the client.
    pub user_agent: Option<String>,
    /// Correlation ID linking this event to a request trace.
    pub correlation_id: Option<String>,
}

impl ActorContext {
    /// Create an empty actor context (anonymous / system action).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user ID.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the user name.
    #[must_use]
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Set the session ID.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set the source IP address.
    #[must_use]
    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the correlation ID.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}
