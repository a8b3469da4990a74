//! Audit event types and canonical serialization.
//!
//! An [`AuditEvent`] is immutable once persisted. Construction goes through
//! [`EventDraft`], the only mutable stage, and happens exclusively inside
//! [`crate::AuditService::log`], which assigns the id and timestamp and
//! attaches the signature.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use veritrail_core::{ActorContext, AuditEventId, EntityRef, Timestamp};
use veritrail_crypto::{Signature, SigningKey};

/// The fixed set of auditable action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    /// An entity was created.
    Created,
    /// An entity was updated.
    Updated,
    /// An entity was deleted.
    Deleted,
    /// An entity was read (selected sensitive reads only).
    Read,
    /// A user logged in.
    Login,
    /// A user logged out.
    Logout,
    /// A password was changed.
    PasswordChange,
    /// Permissions were changed.
    PermissionChange,
    /// A system-level event occurred.
    SystemEvent,
    /// A security-relevant event occurred.
    SecurityEvent,
    /// Configuration was changed.
    ConfigurationChange,
    /// Data was exported.
    DataExport,
    /// Data was imported.
    DataImport,
    /// A backup was taken.
    Backup,
    /// A backup was restored.
    Restore,
}

impl AuditEventKind {
    /// Stable identifier used in the canonical payload.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Read => "read",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::PasswordChange => "password_change",
            Self::PermissionChange => "permission_change",
            Self::SystemEvent => "system_event",
            Self::SecurityEvent => "security_event",
            Self::ConfigurationChange => "configuration_change",
            Self::DataExport => "data_export",
            Self::DataImport => "data_import",
            Self::Backup => "backup",
            Self::Restore => "restore",
        }
    }

    /// Whether this kind describes a state mutation that normally carries
    /// before/after snapshots.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Created
                | Self::Updated
                | Self::Deleted
                | Self::ConfigurationChange
                | Self::DataImport
                | Self::Restore
        )
    }
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable record of a tracked action on an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event identifier, assigned at creation, never reused.
    pub id: AuditEventId,
    /// What happened.
    pub kind: AuditEventKind,
    /// The entity the action was about.
    pub entity: EntityRef,
    /// Who performed the action (advisory, caller-supplied).
    pub actor: ActorContext,
    /// Service-assigned creation time (UTC).
    pub timestamp: Timestamp,
    /// Optional free-text justification.
    pub reason: Option<String>,
    /// Entity state before the action, if any.
    pub old_values: Option<Value>,
    /// Entity state after the action, if any.
    pub new_values: Option<Value>,
    /// Signature over the canonical payload.
    pub signature: Signature,
    /// Identifier of the key that produced the signature
    /// (`<algorithm>:<version>`), enabling key rotation.
    pub signature_algorithm: String,
}

impl AuditEvent {
    /// The canonical payload: a deterministic serialization of every field
    /// except the signature itself, identical at sign and verify time.
    ///
    /// Each part is length-prefixed and optionals carry a presence byte, so
    /// field boundaries are unambiguous and absent is distinct from empty.
    /// JSON snapshots serialize with sorted object keys (`serde_json`'s
    /// default map backing), timestamps at fixed microsecond precision.
    #[must_use]
    pub fn canonical_payload(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        push_part(&mut buf, self.id.0.as_bytes());
        push_part(&mut buf, self.kind.as_str().as_bytes());
        push_part(&mut buf, self.entity.entity_type.as_bytes());
        push_part(&mut buf, self.entity.entity_id.as_bytes());
        push_opt_str(&mut buf, self.actor.user_id.as_deref());
        push_opt_str(&mut buf, self.actor.user_name.as_deref());
        push_opt_str(&mut buf, self.actor.session_id.as_deref());
        push_opt_str(&mut buf, self.actor.ip_address.as_deref());
        push_opt_str(&mut buf, self.actor.user_agent.as_deref());
        push_opt_str(&mut buf, self.actor.correlation_id.as_deref());
        push_part(&mut buf, self.timestamp.to_rfc3339().as_bytes());
        push_opt_str(&mut buf, self.reason.as_deref());
        push_opt_json(&mut buf, self.old_values.as_ref());
        push_opt_json(&mut buf, self.new_values.as_ref());
        push_part(&mut buf, self.signature_algorithm.as_bytes());
        buf
    }

    /// Verify this event's stored signature with the given key.
    ///
    /// Re-derives the canonical payload from the event's fields and
    /// delegates to the byte-level verify. The caller is responsible for
    /// resolving the key matching `signature_algorithm`.
    #[must_use]
    pub fn verify_with(&self, key: &SigningKey) -> bool {
        key.verify(&self.canonical_payload(), &self.signature)
    }
}

fn push_part(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    buf.extend_from_slice(bytes);
}

fn push_opt_str(buf: &mut Vec<u8>, value: Option<&str>) {
    match value {
        Some(s) => {
            buf.push(1);
            push_part(buf, s.as_bytes());
        },
        None => buf.push(0),
    }
}

fn push_opt_json(buf: &mut Vec<u8>, value: Option<&Value>) {
    match value {
        Some(v) => {
            buf.push(1);
            // Serializing a Value cannot fail.
            push_part(buf, &serde_json::to_vec(v).unwrap_or_default());
        },
        None => buf.push(0),
    }
}

/// Mutable builder for an audit event, consumed by
/// [`crate::AuditService::log`].
///
/// The draft carries only caller-supplied data; id, timestamp and
/// signature are assigned by the service.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub(crate) kind: AuditEventKind,
    pub(crate) entity: EntityRef,
    pub(crate) actor: ActorContext,
    pub(crate) reason: Option<String>,
    pub(crate) old_values: Option<Value>,
    pub(crate) new_values: Option<Value>,
}

impl EventDraft {
    /// Start a draft for an action on the given entity.
    #[must_use]
    pub fn new(
        kind: AuditEventKind,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entity: EntityRef::new(entity_type, entity_id),
            actor: ActorContext::default(),
            reason: None,
            old_values: None,
            new_values: None,
        }
    }

    /// Attach the acting user's context.
    #[must_use]
    pub fn actor(mut self, actor: ActorContext) -> Self {
        self.actor = actor;
        self
    }

    /// Attach a free-text justification.
    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attach the entity state before the action.
    #[must_use]
    pub fn old_values(mut self, values: Value) -> Self {
        self.old_values = Some(values);
        self
    }

    /// Attach the entity state after the action.
    #[must_use]
    pub fn new_values(mut self, values: Value) -> Self {
        self.new_values = Some(values);
        self
    }
}
