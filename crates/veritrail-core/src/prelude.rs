//! Prelude module - commonly used types for convenient import.
//!
//! Use `use veritrail_core::prelude::*;` to import all essential types.

pub use crate::{ActorContext, AuditEventId, EntityRef, Timestamp};
