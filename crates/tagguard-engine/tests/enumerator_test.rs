mod common;

use std::sync::Arc;

use common::*;
use tagguard_core::errors::{error_code, EnumerationError, ErrorCode};
use tagguard_core::{CancellationToken, ResourceType};
use tagguard_engine::{InventoryBackend, ResourceEnumerator};

fn enumerate(
    backend: &Arc<InventoryBackend>,
    resource_type: ResourceType,
    cancel: &CancellationToken,
) -> ResourceEnumerator {
    ResourceEnumerator::for_type(&registry(backend, cancel), resource_type, REGION, cancel.clone())
        .unwrap()
}

// ─── Pagination ───

#[test]
fn follows_tokens_across_pages() {
    let backend = Arc::new(InventoryBackend::default().with_page_size(2));
    for i in 0..5 {
        backend.insert(resource(ResourceType::Service, &format!("svc-{i}"), &[]));
    }
    let cancel = CancellationToken::new();
    let mut enumerator = enumerate(&backend, ResourceType::Service, &cancel);
    let ids: Vec<String> = enumerator
        .by_ref()
        .map(|r| r.unwrap().resource_id)
        .collect();
    assert_eq!(ids, vec!["svc-0", "svc-1", "svc-2", "svc-3", "svc-4"]);
    assert_eq!(enumerator.pages_fetched(), 3);
    assert_eq!(backend.list_calls(), 3);
}

#[test]
fn pages_are_fetched_lazily() {
    let backend = Arc::new(InventoryBackend::default().with_page_size(2));
    for i in 0..6 {
        backend.insert(resource(ResourceType::TargetGroup, &format!("tg-{i}"), &[]));
    }
    let cancel = CancellationToken::new();
    let mut enumerator = enumerate(&backend, ResourceType::TargetGroup, &cancel);
    assert_eq!(backend.list_calls(), 0);
    enumerator.next();
    assert_eq!(backend.list_calls(), 1);
    enumerator.next();
    assert_eq!(backend.list_calls(), 1);
    enumerator.next();
    assert_eq!(backend.list_calls(), 2);
}

#[test]
fn zero_resources_yield_nothing() {
    let backend = fleet();
    let cancel = CancellationToken::new();
    let mut enumerator = enumerate(&backend, ResourceType::LoadBalancer, &cancel);
    assert!(enumerator.next().is_none());
    assert_eq!(enumerator.pages_fetched(), 1);
}

// ─── Failures ───

#[test]
fn access_denied_is_yielded_once_then_ends() {
    let backend = fleet();
    backend.deny_listing(ResourceType::Cluster);
    let cancel = CancellationToken::new();
    let mut enumerator = enumerate(&backend, ResourceType::Cluster, &cancel);
    match enumerator.next() {
        Some(Err(EnumerationError::AccessDenied { resource_type, .. })) => {
            assert_eq!(resource_type, ResourceType::Cluster)
        }
        other => panic!("expected access denied, got {other:?}"),
    }
    assert!(enumerator.next().is_none());
    assert!(enumerator.next().is_none());
}

#[test]
fn persistent_throttling_surfaces_after_retries() {
    let backend = fleet();
    backend.throttle_next(10);
    let cancel = CancellationToken::new();
    let mut enumerator = enumerate(&backend, ResourceType::Cluster, &cancel);
    let err = enumerator.next().unwrap().unwrap_err();
    assert_eq!(err.error_code(), error_code::THROTTLED);
    assert_eq!(backend.list_calls(), 3);
}

#[test]
fn transient_throttling_is_absorbed() {
    let backend = fleet();
    backend.throttle_next(2);
    let cancel = CancellationToken::new();
    let count = enumerate(&backend, ResourceType::Cluster, &cancel)
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(count, 2);
}

// ─── Cancellation ───

#[test]
fn cancelled_enumerator_requests_no_page() {
    let backend = fleet();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut enumerator = enumerate(&backend, ResourceType::Cluster, &cancel);
    assert!(enumerator.next().is_none());
    assert_eq!(backend.list_calls(), 0);
}

#[test]
fn cancellation_drains_buffer_but_stops_paging() {
    let backend = Arc::new(InventoryBackend::default().with_page_size(2));
    for i in 0..4 {
        backend.insert(resource(ResourceType::Cluster, &format!("c-{i}"), &[]));
    }
    let cancel = CancellationToken::new();
    let mut enumerator = enumerate(&backend, ResourceType::Cluster, &cancel);
    assert!(enumerator.next().is_some());
    cancel.cancel();
    assert!(enumerator.next().is_some());
    assert!(enumerator.next().is_none());
    assert_eq!(backend.list_calls(), 1);
}
