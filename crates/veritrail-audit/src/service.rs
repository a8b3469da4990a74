//! The audit service orchestrator.
//!
//! Builds events from caller-supplied drafts, signs them, persists them,
//! and answers trail and integrity queries. Stateless with respect to
//! in-process mutable data: all coordination is delegated to the store,
//! so concurrent calls never contend on shared memory here.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{AuditError, AuditResult};
use crate::event::{AuditEvent, AuditEventKind, EventDraft};
use crate::report::{IntegrityReport, IntegrityViolation, ViolationKind};
use crate::store::{AuditStore, StoreResult};
use veritrail_core::{AuditEventId, EntityRef, Timestamp};
use veritrail_crypto::{Keyring, Signature, SignatureAlgorithm};

/// Tunables for the audit service, injected at construction.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Ceiling applied to every store call so a stuck backend cannot block
    /// callers indefinitely.
    pub store_timeout: Duration,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Records signed audit events and verifies their integrity.
///
/// All operations are async and cancel promptly when their future is
/// dropped. `log` is the only mutating operation; everything else is
/// read-only.
pub struct AuditService {
    store: Arc<dyn AuditStore>,
    keyring: Keyring,
    config: AuditConfig,
}

impl AuditService {
    /// Create a service with default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn AuditStore>, keyring: Keyring) -> Self {
        Self::with_config(store, keyring, AuditConfig::default())
    }

    /// Create a service with explicit configuration.
    #[must_use]
    pub fn with_config(store: Arc<dyn AuditStore>, keyring: Keyring, config: AuditConfig) -> Self {
        Self {
            store,
            keyring,
            config,
        }
    }

    /// Record an audit event.
    ///
    /// Assigns the id and timestamp, signs the canonical payload with the
    /// active key, and persists the fully built record as one atomic write.
    /// Returns the new event's id.
    ///
    /// # Errors
    ///
    /// - [`AuditError::Validation`] if the draft's entity type or id is
    ///   empty.
    /// - [`AuditError::Store`] if the write fails; the event is then not
    ///   recorded and the caller decides whether the triggering business
    ///   operation rolls back. Never retried here.
    /// - [`AuditError::StoreTimeout`] if the write exceeds the configured
    ///   ceiling.
    pub async fn log(&self, draft: EventDraft) -> AuditResult<AuditEventId> {
        if !draft.entity.is_complete() {
            return Err(AuditError::Validation(
                "entity_type and entity_id must be non-empty".to_string(),
            ));
        }

        let key = self.keyring.active();
        let mut event = AuditEvent {
            id: AuditEventId::new(),
            kind: draft.kind,
            entity: draft.entity,
            actor: draft.actor,
            timestamp: Timestamp::now(),
            reason: draft.reason,
            old_values: draft.old_values,
            new_values: draft.new_values,
            signature: Signature::empty(),
            signature_algorithm: key.key_id(),
        };
        event.signature = key.sign(&event.canonical_payload());

        self.store_call(self.store.create(&event)).await?;

        debug!(
            event_id = %event.id,
            entity = %event.entity,
            kind = %event.kind,
            "audit event recorded"
        );
        Ok(event.id)
    }

    /// Record an event that carries no before/after state.
    ///
    /// Convenience for non-mutating kinds (logins, reads, system events).
    ///
    /// # Errors
    ///
    /// Same as [`log`](Self::log).
    pub async fn log_event(
        &self,
        kind: AuditEventKind,
        entity_type: impl Into<String> + Send,
        entity_id: impl Into<String> + Send,
    ) -> AuditResult<AuditEventId> {
        self.log(EventDraft::new(kind, entity_type, entity_id)).await
    }

    /// Get the full audit trail for an entity, timestamp ascending.
    ///
    /// Empty when no events exist; never an error for an unknown entity.
    ///
    /// # Errors
    ///
    /// Returns a store error or timeout if the query fails.
    pub async fn get_audit_trail(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> AuditResult<Vec<AuditEvent>> {
        self.store_call(self.store.get_trail(entity_type, entity_id))
            .await
    }

    /// Get an entity's trail restricted to `[from, to]`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns a store error or timeout if the query fails.
    pub async fn get_audit_trail_range(
        &self,
        entity_type: &str,
        entity_id: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> AuditResult<Vec<AuditEvent>> {
        self.store_call(self.store.get_trail_range(entity_type, entity_id, from, to))
            .await
    }

    /// Get all events in `[from, to]` across entities.
    ///
    /// # Errors
    ///
    /// Returns a store error or timeout if the query fails.
    pub async fn get_events(&self, from: Timestamp, to: Timestamp) -> AuditResult<Vec<AuditEvent>> {
        self.store_call(self.store.get_events(from, to)).await
    }

    /// Verify a single event's signature.
    ///
    /// Returns `Ok(false)` both for a failed verification and for an id
    /// that does not exist: "can't verify something that isn't there" is an
    /// expected outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns a store error or timeout if the fetch fails.
    pub async fn verify_integrity(&self, id: &AuditEventId) -> AuditResult<bool> {
        let Some(event) = self.store_call(self.store.get(id)).await? else {
            warn!(event_id = %id, "integrity check requested for unknown audit event");
            return Ok(false);
        };

        match self.check_event(&event) {
            Ok(()) => Ok(true),
            Err(kind) => {
                warn!(event_id = %id, violation = %kind, "audit event failed integrity check");
                Ok(false)
            },
        }
    }

    /// Verify every event in an entity's trail and aggregate the outcome.
    ///
    /// Events are verified independently of one another; the report lists
    /// one violation per failing event with the expected and stored
    /// signatures for forensic comparison.
    ///
    /// # Errors
    ///
    /// Returns a store error or timeout if the trail query fails.
    pub async fn verify_entity_integrity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> AuditResult<IntegrityReport> {
        let events = self
            .store_call(self.store.get_trail(entity_type, entity_id))
            .await?;

        let mut violations = Vec::new();
        for event in &events {
            if let Err(kind) = self.check_event(event) {
                violations.push(self.violation(event, kind));
            }
        }

        let report = IntegrityReport::new(
            EntityRef::new(entity_type, entity_id),
            events.len(),
            violations,
        );
        if report.is_valid() {
            debug!(entity = %report.entity, total = report.total_events, "audit trail verified intact");
        } else {
            warn!(
                entity = %report.entity,
                invalid = report.invalid_events,
                total = report.total_events,
                "audit trail integrity violations found"
            );
        }
        Ok(report)
    }

    /// Classify a single stored event: intact, or why not.
    fn check_event(&self, event: &AuditEvent) -> Result<(), ViolationKind> {
        if event.signature.is_empty() {
            return Err(ViolationKind::MalformedPayload {
                detail: "event carries no signature".to_string(),
            });
        }

        let key_id = event.signature_algorithm.as_str();
        let Some((algorithm_part, _version)) = key_id.split_once(':') else {
            return Err(ViolationKind::MalformedPayload {
                detail: format!("unparseable key identifier: {key_id}"),
            });
        };
        if algorithm_part.parse::<SignatureAlgorithm>().is_err() {
            return Err(ViolationKind::MalformedPayload {
                detail: format!("unknown algorithm in key identifier: {key_id}"),
            });
        }

        let Some(key) = self.keyring.resolve(key_id) else {
            return Err(ViolationKind::UnknownAlgorithm {
                key_id: key_id.to_string(),
            });
        };

        if event.verify_with(key) {
            Ok(())
        } else {
            Err(ViolationKind::SignatureMismatch)
        }
    }

    fn violation(&self, event: &AuditEvent, kind: ViolationKind) -> IntegrityViolation {
        let expected_signature = self
            .keyring
            .resolve(&event.signature_algorithm)
            .map(|key| key.sign(&event.canonical_payload()).to_hex());

        IntegrityViolation {
            audit_id: event.id.clone(),
            kind,
            event_kind: event.kind,
            timestamp: event.timestamp,
            expected_signature,
            actual_signature: event.signature.to_hex(),
        }
    }

    async fn store_call<T>(
        &self,
        fut: impl Future<Output = StoreResult<T>> + Send,
    ) -> AuditResult<T> {
        match tokio::time::timeout(self.config.store_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AuditError::StoreTimeout {
                timeout: self.config.store_timeout,
            }),
        }
    }
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService")
            .field("keyring", &self.keyring)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryAuditStore;
    use serde_json::json;
    use veritrail_crypto::SigningKey;

    fn test_keyring() -> Keyring {
        Keyring::new(SigningKey::hmac_sha256("v1", b"test-secret").unwrap())
    }

    fn test_service(store: Arc<MemoryAuditStore>) -> AuditService {
        AuditService::new(store, test_keyring())
    }

    #[tokio::test]
    async fn test_log_then_verify() {
        let store = Arc::new(MemoryAuditStore::new());
        let service = test_service(store.clone());

        let id = service
            .log(
                EventDraft::new(AuditEventKind::Updated, "Service", "svc-123")
                    .old_values(json!({"title": "A"}))
                    .new_values(json!({"title": "B"}))
                    .reason("typo fix"),
            )
            .await
            .unwrap();

        assert!(service.verify_integrity(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_validation_rejects_empty_entity() {
        let service = test_service(Arc::new(MemoryAuditStore::new()));

        let result = service
            .log(EventDraft::new(AuditEventKind::Created, "", "svc-1"))
            .await;
        assert!(matches!(result, Err(AuditError::Validation(_))));

        let result = service
            .log(EventDraft::new(AuditEventKind::Created, "Service", ""))
            .await;
        assert!(matches!(result, Err(AuditError::Validation(_))));
    }

    #[tokio::test]
    async fn test_identical_drafts_get_distinct_ids() {
        let service = test_service(Arc::new(MemoryAuditStore::new()));
        let draft = EventDraft::new(AuditEventKind::Read, "Service", "svc-1");

        let a = service.log(draft.clone()).await.unwrap();
        let b = service.log(draft).await.unwrap();

        assert_ne!(a, b);
        assert!(service.verify_integrity(&a).await.unwrap());
        assert!(service.verify_integrity(&b).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_unknown_id_is_false() {
        let service = test_service(Arc::new(MemoryAuditStore::new()));
        let verdict = service.verify_integrity(&AuditEventId::new()).await.unwrap();
        assert!(!verdict);
    }

    #[tokio::test]
    async fn test_trail_contents() {
        let service = test_service(Arc::new(MemoryAuditStore::new()));

        service
            .log(
                EventDraft::new(AuditEventKind::Updated, "Service", "svc-123")
                    .old_values(json!({"title": "A"}))
                    .new_values(json!({"title": "B"})),
            )
            .await
            .unwrap();

        let trail = service.get_audit_trail("Service", "svc-123").await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].kind, AuditEventKind::Updated);
        assert_eq!(trail[0].old_values, Some(json!({"title": "A"})));
        assert_eq!(trail[0].new_values, Some(json!({"title": "B"})));

        let empty = service.get_audit_trail("Service", "other").await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_entity_report_all_valid() {
        let service = test_service(Arc::new(MemoryAuditStore::new()));
        service
            .log_event(AuditEventKind::Created, "Service", "svc-123")
            .await
            .unwrap();
        service
            .log_event(AuditEventKind::Updated, "Service", "svc-123")
            .await
            .unwrap();

        let report = service
            .verify_entity_integrity("Service", "svc-123")
            .await
            .unwrap();
        assert_eq!(report.total_events, 2);
        assert_eq!(report.valid_events, 2);
        assert_eq!(report.invalid_events, 0);
        assert!(report.is_valid());
    }

    #[tokio::test]
    async fn test_tampered_event_detected() {
        let store = Arc::new(MemoryAuditStore::new());
        let service = test_service(store.clone());

        let id = service
            .log(
                EventDraft::new(AuditEventKind::Updated, "Service", "svc-123")
                    .new_values(json!({"title": "B"})),
            )
            .await
            .unwrap();
        let clean_id = service
            .log_event(AuditEventKind::Read, "Service", "svc-123")
            .await
            .unwrap();

        // Out-of-band tampering: overwrite new_values, keep the signature.
        let mut tampered = store.get(&id).await.unwrap().unwrap();
        tampered.new_values = Some(json!({"title": "Z"}));
        store.overwrite(tampered).await;

        assert!(!service.verify_integrity(&id).await.unwrap());
        assert!(service.verify_integrity(&clean_id).await.unwrap());

        let report = service
            .verify_entity_integrity("Service", "svc-123")
            .await
            .unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.total_events, 2);
        assert_eq!(report.valid_events, 1);
        assert_eq!(report.invalid_events, 1);
        assert_eq!(report.violations.len(), 1);

        let violation = &report.violations[0];
        assert_eq!(violation.audit_id, id);
        assert_eq!(violation.kind, ViolationKind::SignatureMismatch);
        let expected = violation.expected_signature.as_ref().unwrap();
        assert_ne!(expected, &violation.actual_signature);
    }

    #[tokio::test]
    async fn test_rotation_keeps_old_events_verifying() {
        let store = Arc::new(MemoryAuditStore::new());

        let service_v1 = AuditService::new(
            store.clone(),
            Keyring::new(SigningKey::hmac_sha256("v1", b"old-secret").unwrap()),
        );
        let old_id = service_v1
            .log_event(AuditEventKind::Created, "Service", "svc-123")
            .await
            .unwrap();

        // Rotated deployment: new active key, old key kept as historical.
        let mut keyring = Keyring::new(SigningKey::hmac_sha256("v1", b"old-secret").unwrap());
        keyring.rotate(SigningKey::hmac_sha512("v2", b"new-secret").unwrap());
        let service_v2 = AuditService::new(store.clone(), keyring);

        let new_id = service_v2
            .log_event(AuditEventKind::Updated, "Service", "svc-123")
            .await
            .unwrap();

        assert!(service_v2.verify_integrity(&old_id).await.unwrap());
        assert!(service_v2.verify_integrity(&new_id).await.unwrap());

        let old_event = store.get(&old_id).await.unwrap().unwrap();
        let new_event = store.get(&new_id).await.unwrap().unwrap();
        assert_eq!(old_event.signature_algorithm, "hmac-sha256:v1");
        assert_eq!(new_event.signature_algorithm, "hmac-sha512:v2");
    }

    #[tokio::test]
    async fn test_unresolvable_key_reported_as_unknown_algorithm() {
        let store = Arc::new(MemoryAuditStore::new());
        let writer = AuditService::new(
            store.clone(),
            Keyring::new(SigningKey::hmac_sha256("v1", b"secret").unwrap()),
        );
        writer
            .log_event(AuditEventKind::Created, "Service", "svc-123")
            .await
            .unwrap();

        // A verifier deployed without the v1 key material.
        let verifier = AuditService::new(
            store,
            Keyring::new(SigningKey::hmac_sha256("v2", b"other").unwrap()),
        );

        let report = verifier
            .verify_entity_integrity("Service", "svc-123")
            .await
            .unwrap();
        assert!(!report.is_valid());
        assert_eq!(
            report.violations[0].kind,
            ViolationKind::UnknownAlgorithm {
                key_id: "hmac-sha256:v1".to_string()
            }
        );
        // No key material, so no expected signature to show.
        assert!(report.violations[0].expected_signature.is_none());
    }

    #[tokio::test]
    async fn test_garbled_key_identifier_is_malformed() {
        let store = Arc::new(MemoryAuditStore::new());
        let service = test_service(store.clone());

        let id = service
            .log_event(AuditEventKind::Created, "Service", "svc-123")
            .await
            .unwrap();

        let mut garbled = store.get(&id).await.unwrap().unwrap();
        garbled.signature_algorithm = "not-a-key-id".to_string();
        store.overwrite(garbled).await;

        let report = service
            .verify_entity_integrity("Service", "svc-123")
            .await
            .unwrap();
        assert!(matches!(
            report.violations[0].kind,
            ViolationKind::MalformedPayload { .. }
        ));
    }
}
