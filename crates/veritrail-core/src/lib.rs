//! Veritrail Core - shared value types for the audit trail subsystem.
//!
//! This crate provides:
//! - [`AuditEventId`] - opaque, high-entropy event identifiers
//! - [`Timestamp`] - UTC timestamps with a deterministic wire form
//! - [`EntityRef`] - the (entity type, entity id) trail lookup key
//! - [`ActorContext`] - advisory caller context recorded with each event
//!
//! Everything here is a plain value type: no I/O, no global state.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod actor;
mod types;

pub use actor::ActorContext;
pub use types::{AuditEventId, EntityRef, Timestamp};
