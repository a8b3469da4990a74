//! Integrity verification report types.
//!
//! Produced by [`crate::AuditService::verify_entity_integrity`]; ephemeral,
//! never persisted by this subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::event::AuditEventKind;
use veritrail_core::{AuditEventId, EntityRef, Timestamp};

/// Why a single event failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The recomputed signature does not match the stored one: the record
    /// was altered after signing.
    SignatureMismatch,
    /// The stored record is structurally unreadable (distinct from
    /// "tampered").
    MalformedPayload {
        /// What could not be read.
        detail: String,
    },
    /// The recorded key identifier is valid but no key material is
    /// available for it.
    UnknownAlgorithm {
        /// The unresolvable key identifier.
        key_id: String,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignatureMismatch => write!(f, "signature-mismatch"),
            Self::MalformedPayload { detail } => write!(f, "malformed-payload: {detail}"),
            Self::UnknownAlgorithm { key_id } => write!(f, "unknown-algorithm: {key_id}"),
        }
    }
}

/// One failing event in an integrity report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityViolation {
    /// Id of the offending event.
    pub audit_id: AuditEventId,
    /// Classification of the failure.
    pub kind: ViolationKind,
    /// The event's recorded kind.
    pub event_kind: AuditEventKind,
    /// The event's recorded timestamp.
    pub timestamp: Timestamp,
    /// The signature the canonical payload should carry, recomputed at
    /// verification time. Absent when no key material could be resolved.
    pub expected_signature: Option<String>,
    /// The signature actually stored with the event.
    pub actual_signature: String,
}

/// Aggregated result of verifying every event in an entity's trail.
///
/// Each event is verified independently; one violation never taints the
/// verdict on any other event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// The entity whose trail was verified.
    pub entity: EntityRef,
    /// Number of events examined.
    pub total_events: usize,
    /// Number that verified successfully.
    pub valid_events: usize,
    /// Number that failed verification.
    pub invalid_events: usize,
    /// One entry per failing event.
    pub violations: Vec<IntegrityViolation>,
}

impl IntegrityReport {
    /// Build a report from the verified entity and its violations.
    #[must_use]
    pub fn new(entity: EntityRef, total_events: usize, violations: Vec<IntegrityViolation>) -> Self {
        let invalid_events = violations.len();
        Self {
            entity,
            total_events,
            valid_events: total_events.saturating_sub(invalid_events),
            invalid_events,
            violations,
        }
    }

    /// Whether the whole trail is intact.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.invalid_events == 0
    }
}
