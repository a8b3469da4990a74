//! Audit record store contract and in-memory reference adapter.
//!
//! The durable backing store (a relational or equivalent transactional
//! engine) lives outside this subsystem; this module defines the narrow
//! contract the orchestrator needs plus an in-memory adapter used in tests
//! and embedded deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::event::AuditEvent;
use veritrail_core::{AuditEventId, Timestamp};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An event with this id already exists. Ids are random and must never
    /// collide; the orchestrator treats this as fatal misconfiguration.
    #[error("duplicate audit event id: {0}")]
    DuplicateId(AuditEventId),

    /// The storage backend failed.
    #[error("backend error: {0}")]
    Backend(String),

    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend for audit events.
///
/// Implementations must be thread-safe and guarantee:
/// - Durability of a successfully acknowledged [`create`](Self::create)
/// - Trail queries ordered by timestamp ascending, ties broken by
///   store-assigned insertion sequence
/// - Inclusive time-range boundaries
/// - Rejection of duplicate ids on create
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist a new event atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if the id already exists, or a
    /// backend error if the write fails.
    async fn create(&self, event: &AuditEvent) -> StoreResult<()>;

    /// Get an event by id.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval or deserialization fails.
    async fn get(&self, id: &AuditEventId) -> StoreResult<Option<AuditEvent>>;

    /// Get the full trail for an entity, ordered.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval fails.
    async fn get_trail(&self, entity_type: &str, entity_id: &str) -> StoreResult<Vec<AuditEvent>>;

    /// Get the trail for an entity restricted to `[from, to]`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval fails.
    async fn get_trail_range(
        &self,
        entity_type: &str,
        entity_id: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> StoreResult<Vec<AuditEvent>>;

    /// Get all events in `[from, to]` across entities, ordered.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval fails.
    async fn get_events(&self, from: Timestamp, to: Timestamp) -> StoreResult<Vec<AuditEvent>>;

    /// Whether an event with this id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    async fn exists(&self, id: &AuditEventId) -> StoreResult<bool>;

    /// Count all stored events.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    async fn count(&self) -> StoreResult<usize>;
}

/// A stored event plus its insertion sequence number.
#[derive(Debug, Clone)]
struct StoredEvent {
    seq: u64,
    event: AuditEvent,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    events: HashMap<AuditEventId, StoredEvent>,
}

/// In-memory audit store.
///
/// Append-only: events are never mutated or removed through the contract.
/// Insertion order is tracked with a per-store sequence so trail ordering
/// is deterministic even for equal timestamps.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    inner: RwLock<Inner>,
}

impl MemoryAuditStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a stored event in place, bypassing the append-only contract.
    ///
    /// Simulates out-of-band tampering (e.g. a direct write to the backing
    /// rows) for integrity-verification tests. Not part of [`AuditStore`].
    #[doc(hidden)]
    pub async fn overwrite(&self, event: AuditEvent) {
        let mut inner = self.inner.write().await;
        if let Some(stored) = inner.events.get_mut(&event.id) {
            stored.event = event;
        }
    }

    async fn collect_sorted<F>(&self, mut filter: F) -> Vec<AuditEvent>
    where
        F: FnMut(&AuditEvent) -> bool,
    {
        let inner = self.inner.read().await;
        let mut matched: Vec<&StoredEvent> = inner
            .events
            .values()
            .filter(|stored| filter(&stored.event))
            .collect();
        matched.sort_by_key(|stored| (stored.event.timestamp, stored.seq));
        matched.into_iter().map(|stored| stored.event.clone()).collect()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn create(&self, event: &AuditEvent) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.events.contains_key(&event.id) {
            return Err(StoreError::DuplicateId(event.id.clone()));
        }
        let seq = inner.next_seq;
        inner.next_seq = inner.next_seq.saturating_add(1);
        inner.events.insert(
            event.id.clone(),
            StoredEvent {
                seq,
                event: event.clone(),
            },
        );
        Ok(())
    }

    async fn get(&self, id: &AuditEventId) -> StoreResult<Option<AuditEvent>> {
        let inner = self.inner.read().await;
        Ok(inner.events.get(id).map(|stored| stored.event.clone()))
    }

    async fn get_trail(&self, entity_type: &str, entity_id: &str) -> StoreResult<Vec<AuditEvent>> {
        Ok(self
            .collect_sorted(|event| {
                event.entity.entity_type == entity_type && event.entity.entity_id == entity_id
            })
            .await)
    }

    async fn get_trail_range(
        &self,
        entity_type: &str,
        entity_id: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> StoreResult<Vec<AuditEvent>> {
        Ok(self
            .collect_sorted(|event| {
                event.entity.entity_type == entity_type
                    && event.entity.entity_id == entity_id
                    && event.timestamp >= from
                    && event.timestamp <= to
            })
            .await)
    }

    async fn get_events(&self, from: Timestamp, to: Timestamp) -> StoreResult<Vec<AuditEvent>> {
        Ok(self
            .collect_sorted(|event| event.timestamp >= from && event.timestamp <= to)
            .await)
    }

    async fn exists(&self, id: &AuditEventId) -> StoreResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner.events.contains_key(id))
    }

    async fn count(&self) -> StoreResult<usize> {
        let inner = self.inner.read().await;
        Ok(inner.events.len())
    }
}
