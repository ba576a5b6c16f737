#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tagguard_core::{CancellationToken, ResourceType};
use tagguard_engine::backends::InventoryResource;
use tagguard_engine::{HandlerRegistry, InventoryBackend, RetryPolicy};

pub const REGION: &str = "us-east-1";

pub fn arn(resource_type: ResourceType, id: &str) -> String {
    format!("arn:aws:{}:{REGION}:123456789012:{id}", resource_type.as_str())
}

pub fn resource(resource_type: ResourceType, id: &str, tags: &[(&str, &str)]) -> InventoryResource {
    let mut r = InventoryResource::new(resource_type, id, arn(resource_type, id)).in_region(REGION);
    for (k, v) in tags {
        r = r.with_tag(*k, *v);
    }
    r
}

pub const FULL_TAGS: [(&str, &str); 4] = [
    ("Environment", "prod"),
    ("Owner", "platform-team"),
    ("CostCenter", "eng-001"),
    ("Application", "shop"),
];

/// Two clusters (one compliant), one compliant service, one bare log group,
/// one NAT gateway missing Application. No load balancers.
pub fn fleet() -> Arc<InventoryBackend> {
    let backend = InventoryBackend::default().with_page_size(2);
    backend.insert(resource(
        ResourceType::Cluster,
        "web",
        &[("Environment", "prod"), ("Owner", "platform-team")],
    ));
    backend.insert(resource(ResourceType::Cluster, "api", &FULL_TAGS));
    backend.insert(resource(ResourceType::Service, "checkout", &FULL_TAGS));
    backend.insert(resource(ResourceType::LogGroup, "/aws/lambda/ingest", &[]));
    backend.insert(resource(
        ResourceType::NatGateway,
        "nat-0a1b",
        &[
            ("Environment", "prod"),
            ("Owner", "network"),
            ("CostCenter", "net-002"),
        ],
    ));
    Arc::new(backend)
}

/// Retry without sleeping.
pub fn fast_retry(cancel: &CancellationToken) -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO, Duration::ZERO, false, cancel.clone())
}

pub fn registry(backend: &Arc<InventoryBackend>, cancel: &CancellationToken) -> HandlerRegistry {
    HandlerRegistry::standard(backend.clone(), fast_retry(cancel))
}
