//! Prelude module - commonly used types for convenient import.
//!
//! Use `use veritrail_audit::prelude::*;` to import all essential types.

// Errors
pub use crate::{AuditError, AuditResult};

// Event types
pub use crate::{AuditEvent, AuditEventKind, EventDraft};

// Service and verification
pub use crate::{AuditConfig, AuditService, IntegrityReport, IntegrityViolation, ViolationKind};

// Storage
pub use crate::{AuditStore, MemoryAuditStore, StoreError, StoreResult};

// Re-exports from core
pub use crate::{ActorContext, AuditEventId, EntityRef, Timestamp};
