//! End-to-end lifecycle behaviour over in-memory collaborators.

mod common;

use ac_02_content_store::ContentStore;
use ac_03_chain_registry::prelude::*;
use ac_04_lifecycle::prelude::*;
use common::{harness, harness_over, OfflineAfterFailedWrite, YieldingRegistry, FOO};
use shared_types::{Address, ContentId, ContractState};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const A: Address = Address([0x0a; 20]);

#[tokio::test(start_paused = true)]
async fn test_full_lifecycle_scenario() {
    let h = harness();

    // Compile
    let artifact = h.orchestrator.compile(FOO.as_bytes()).await.unwrap();
    assert_eq!(artifact.name, "Foo");

    // Deploy + register
    let deployed = h.orchestrator.deploy("Foo", &[]).await.unwrap();
    assert!(!h.chain.get_code(deployed.address).await.unwrap().is_empty());
    let record = h.orchestrator.get_state(deployed.address).await.unwrap();
    assert_eq!(record.state, ContractState::Active);

    // Archive
    let c1 = h.orchestrator.archive(deployed.address).await.unwrap();
    let record = h.orchestrator.get_state(deployed.address).await.unwrap();
    assert_eq!(record.state, ContractState::Pending);
    assert_eq!(record.content_id, c1);
    assert_eq!(h.orchestrator.pending().await.unwrap().len(), 1);

    // Delay elapses
    tokio::time::sleep(Duration::from_secs(61)).await;

    let record = h.orchestrator.get_state(deployed.address).await.unwrap();
    assert_eq!(record.state, ContractState::Archived);
    assert_eq!(record.content_id, c1);
    assert!(h.orchestrator.pending().await.unwrap().is_empty());
    assert_eq!(h.orchestrator.in_flight(), 0);

    let blob = h.content_store.retrieve(&c1).await.unwrap();
    assert_eq!(blob["ContractName"], "Foo");
}

#[tokio::test(start_paused = true)]
async fn test_state_stays_pending_until_delay_elapses() {
    let h = harness();
    h.orchestrator.register(A).await.unwrap();
    h.orchestrator.archive(A).await.unwrap();

    tokio::time::sleep(Duration::from_secs(59)).await;
    assert_eq!(
        h.orchestrator.get_state(A).await.unwrap().state,
        ContractState::Pending
    );

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(
        h.orchestrator.get_state(A).await.unwrap().state,
        ContractState::Archived
    );
}

#[tokio::test]
async fn test_archive_rejected_from_pending_and_archived_without_writes() {
    for state in [ContractState::Pending, ContractState::Archived] {
        // Arrange
        let h = harness();
        h.registry.seed(A, state, ContentId::new("QmOld"));

        // Act
        let err = h.orchestrator.archive(A).await.unwrap_err();

        // Assert
        assert!(
            matches!(err, LifecycleError::InvalidTransition { .. }),
            "{state}: {err}"
        );
        assert!(h.registry.writes().is_empty());
        assert!(h.content_store.is_empty());
        assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 0);
        assert!(h.orchestrator.pending().await.unwrap().is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_archive_is_single_flight() {
    let h = harness();
    h.orchestrator.register(A).await.unwrap();

    let (first, second) = tokio::join!(h.orchestrator.archive(A), h.orchestrator.archive(A));

    let results = [first, second];
    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1);
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(LifecycleError::InvalidTransition { .. })))
        .count();
    assert_eq!(rejected, 1);

    let pending_writes = h
        .registry
        .writes()
        .into_iter()
        .filter(|w| w.state == ContractState::Pending)
        .count();
    assert_eq!(pending_writes, 1);
}

#[tokio::test(start_paused = true)]
async fn test_second_archive_while_pending_fails_fast() {
    let h = harness();
    h.orchestrator.register(A).await.unwrap();
    h.orchestrator.archive(A).await.unwrap();

    let err = h.orchestrator.archive(A).await.unwrap_err();
    assert_eq!(err.kind(), "InvalidTransition");
}

#[tokio::test]
async fn test_register_twice_is_already_registered() {
    let h = harness();
    h.orchestrator.register(A).await.unwrap();

    let err = h.orchestrator.register(A).await.unwrap_err();

    assert!(matches!(err, LifecycleError::AlreadyRegistered(addr) if addr == A));
    assert_eq!(h.registry.get_all_addresses().await.unwrap(), vec![A]);
}

#[tokio::test]
async fn test_deploy_unknown_artifact_is_artifact_missing() {
    let h = harness();
    h.orchestrator.compile(FOO.as_bytes()).await.unwrap();

    let err = h.orchestrator.deploy("Bar", &[]).await.unwrap_err();

    assert_eq!(err.kind(), "ArtifactMissing");
    assert!(h.chain.last_creation().is_none());
}

#[tokio::test]
async fn test_deploy_with_empty_code_is_not_registered() {
    let h = harness();
    h.orchestrator.compile(FOO.as_bytes()).await.unwrap();
    h.chain.set_deploy_empty_code(true);

    let err = h.orchestrator.deploy("Foo", &[]).await.unwrap_err();

    assert_eq!(err.kind(), "EmptyDeployment");
    assert!(h.registry.get_all_addresses().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_failure_leaves_contract_active() {
    let h = harness();
    h.orchestrator.register(A).await.unwrap();
    h.content_store.set_offline(true);

    let err = h.orchestrator.archive(A).await.unwrap_err();

    assert_eq!(err.kind(), "StoreUnavailable");
    assert_eq!(
        h.orchestrator.get_state(A).await.unwrap().state,
        ContractState::Active
    );
    assert!(h.orchestrator.pending().await.unwrap().is_empty());
    assert_eq!(h.orchestrator.in_flight(), 0);
}

#[tokio::test]
async fn test_explorer_failure_surfaces_distinct_kind() {
    let h = harness();
    h.orchestrator.register(A).await.unwrap();
    h.fetcher.offline.store(true, Ordering::SeqCst);

    let err = h.orchestrator.archive(A).await.unwrap_err();

    assert_eq!(err.kind(), "ExplorerUnavailable");
    assert!(h.content_store.is_empty());
}

#[tokio::test]
async fn test_failed_pending_write_that_did_not_land_discards_record() {
    // Arrange
    let h = harness();
    h.orchestrator.register(A).await.unwrap();
    h.registry.fail_next_updates(1);

    // Act
    let err = h.orchestrator.archive(A).await.unwrap_err();

    // Assert
    assert_eq!(err.kind(), "ChainUnavailable");
    assert_eq!(
        h.orchestrator.get_state(A).await.unwrap().state,
        ContractState::Active
    );
    assert!(h.orchestrator.pending().await.unwrap().is_empty());
    // The claim is released so a retry is possible.
    assert_eq!(h.orchestrator.in_flight(), 0);
    h.orchestrator.archive(A).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_pending_write_that_landed_despite_error_is_confirmed() {
    // Arrange
    let h = harness();
    h.orchestrator.register(A).await.unwrap();
    h.registry.lose_next_update_acks(1);

    // Act
    let (content_id, handle) = h.orchestrator.archive_tracked(A).await.unwrap();

    // Assert
    assert_eq!(
        h.orchestrator.get_state(A).await.unwrap().state,
        ContractState::Pending
    );
    assert_eq!(h.orchestrator.pending().await.unwrap().len(), 1);
    assert!(matches!(handle.await.unwrap(), ConfirmationOutcome::Confirmed(_)));
    let record = h.orchestrator.get_state(A).await.unwrap();
    assert_eq!(record.state, ContractState::Archived);
    assert_eq!(record.content_id, content_id);
    assert!(h.orchestrator.pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unresolvable_pending_write_keeps_record_for_recovery() {
    // Arrange
    let registry = Arc::new(InMemoryRegistry::new());
    let h = harness_over(
        Arc::new(OfflineAfterFailedWrite(registry.clone())),
        registry.clone(),
        Arc::new(InMemoryPendingStore::new()),
    );
    h.orchestrator.register(A).await.unwrap();
    registry.fail_next_updates(1);

    // Act
    let err = h.orchestrator.archive(A).await.unwrap_err();

    // Assert
    assert_eq!(err.kind(), "ChainUnavailable");
    let pending = h.orchestrator.pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].address, A);
    assert_eq!(h.orchestrator.in_flight(), 0);

    // Once the chain is back, recovery sees Active and drops the record.
    registry.set_offline(false);
    let report = h.orchestrator.recover().await.unwrap();
    assert_eq!(report.discarded, vec![A]);
    assert!(h.orchestrator.pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_archive_of_unregistered_address_is_rejected_without_side_effects() {
    let h = harness();

    let err = h.orchestrator.archive(A).await.unwrap_err();

    assert!(matches!(err, LifecycleError::NotRegistered(addr) if addr == A));
    assert_eq!(err.kind(), "NotRegistered");
    assert!(h.registry.writes().is_empty());
    assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 0);
    assert!(h.content_store.is_empty());
    assert!(h.orchestrator.pending().await.unwrap().is_empty());
    assert_eq!(h.orchestrator.in_flight(), 0);
}

#[tokio::test]
async fn test_concurrent_registration_sends_one_add_contract() {
    // Arrange
    let registry = Arc::new(InMemoryRegistry::new());
    let h = harness_over(
        Arc::new(YieldingRegistry(registry.clone())),
        registry.clone(),
        Arc::new(InMemoryPendingStore::new()),
    );

    // Act
    let (first, second) = tokio::join!(h.orchestrator.register(A), h.orchestrator.register(A));

    // Assert
    assert_eq!(registry.add_contract_calls(), 1);
    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(LifecycleError::AlreadyRegistered(addr)) if *addr == A))
            .count(),
        1
    );
    assert_eq!(registry.get_all_addresses().await.unwrap(), vec![A]);
    assert_eq!(h.orchestrator.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_confirmation_retries_until_write_lands() {
    let h = harness();
    h.orchestrator.register(A).await.unwrap();
    let (content_id, handle) = h.orchestrator.archive_tracked(A).await.unwrap();
    h.registry.fail_next_updates(2);

    let outcome = handle.await.unwrap();

    assert!(matches!(outcome, ConfirmationOutcome::Confirmed(_)));
    let record = h.orchestrator.get_state(A).await.unwrap();
    assert_eq!(record.state, ContractState::Archived);
    assert_eq!(record.content_id, content_id);
    assert!(h.orchestrator.pending().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_confirmation_is_deferred_not_lost() {
    let h = harness();
    h.orchestrator.register(A).await.unwrap();
    let (_, handle) = h.orchestrator.archive_tracked(A).await.unwrap();
    h.registry.fail_next_updates(3);

    let outcome = handle.await.unwrap();

    assert_eq!(outcome, ConfirmationOutcome::Deferred);
    assert_eq!(
        h.orchestrator.get_state(A).await.unwrap().state,
        ContractState::Pending
    );
    assert_eq!(h.orchestrator.pending().await.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_list_archived_filters_by_state() {
    let h = harness();
    let archived = Address([1; 20]);
    let active = Address([2; 20]);
    h.registry.seed(archived, ContractState::Archived, ContentId::new("Qm1"));
    h.registry.seed(active, ContractState::Active, ContentId::empty());

    let listing = h.orchestrator.list_archived().await.unwrap();

    assert_eq!(listing.archived.len(), 1);
    assert_eq!(listing.archived[0].address, archived);
    assert!(listing.failures.is_empty());
}

#[tokio::test]
async fn test_list_archived_reports_unreadable_addresses_alongside_results() {
    // Arrange
    let h = harness();
    let first = Address([1; 20]);
    let broken = Address([2; 20]);
    let last = Address([3; 20]);
    for address in [first, broken, last] {
        h.registry.seed(address, ContractState::Archived, ContentId::new("QmArchived"));
    }
    h.registry.fail_reads_for(broken);

    // Act
    let listing = h.orchestrator.list_archived().await.unwrap();

    // Assert
    let archived: Vec<_> = listing.archived.iter().map(|r| r.address).collect();
    assert_eq!(archived, vec![first, last]);
    assert_eq!(listing.failures.len(), 1);
    assert_eq!(listing.failures[0].contract_address, broken);
    assert_eq!(listing.failures[0].error, "ChainUnavailable");
}

#[tokio::test]
async fn test_update_state_escape_hatch_writes_directly() {
    let h = harness();
    h.orchestrator
        .update_state(A, ContractState::Archived, &ContentId::new("QmManual"))
        .await
        .unwrap();

    let record = h.orchestrator.get_state(A).await.unwrap();
    assert_eq!(record.state, ContractState::Archived);
    assert_eq!(record.content_id.as_str(), "QmManual");
}
