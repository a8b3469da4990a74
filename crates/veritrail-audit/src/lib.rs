//! Veritrail Audit - tamper-evident audit trail recording and verification.
//!
//! This crate provides:
//! - Cryptographically signed, immutable audit events
//! - Trail queries by entity and time range
//! - On-demand integrity verification of single events or whole trails
//!
//! # Security Model
//!
//! Every audit event is:
//! - Signed over a canonical serialization of its fields
//! - Stamped with a service-assigned UTC timestamp
//! - Stored append-only under a collision-free random id
//!
//! Each event is independently self-certifying: verifying one event never
//! depends on any other, so verification parallelizes and a single
//! tampered field is pinpointed exactly. Events are *not* chain-linked;
//! wholesale deletion of an event is outside this crate's threat model.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use veritrail_audit::{AuditEventKind, AuditService, EventDraft, MemoryAuditStore};
//! use veritrail_crypto::{Keyring, SigningKey};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let key = SigningKey::hmac_sha256("v1", b"configured-secret").unwrap();
//! let service = AuditService::new(Arc::new(MemoryAuditStore::new()), Keyring::new(key));
//!
//! let id = service
//!     .log(
//!         EventDraft::new(AuditEventKind::Updated, "Service", "svc-123")
//!             .old_values(serde_json::json!({"title": "A"}))
//!             .new_values(serde_json::json!({"title": "B"}))
//!             .reason("typo fix"),
//!     )
//!     .await
//!     .unwrap();
//!
//! assert!(service.verify_integrity(&id).await.unwrap());
//!
//! let report = service.verify_entity_integrity("Service", "svc-123").await.unwrap();
//! assert!(report.is_valid());
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod event;
mod report;
mod service;
mod store;

pub use error::{AuditError, AuditResult};
pub use event::{AuditEvent, AuditEventKind, EventDraft};
pub use report::{IntegrityReport, IntegrityViolation, ViolationKind};
pub use service::{AuditConfig, AuditService};
pub use store::{AuditStore, MemoryAuditStore, StoreError, StoreResult};

// Re-export the core types appearing in the public surface.
pub use veritrail_core::{ActorContext, AuditEventId, EntityRef, Timestamp};
