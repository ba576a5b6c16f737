mod common;

use std::path::Path;
use std::sync::Arc;

use common::*;
use tagguard_core::constants::AUDIT_REPORT_HEADER;
use tagguard_core::errors::{error_code, BackendError, EnumerationError, FetchError, WriteError};
use tagguard_core::models::TagShape;
use tagguard_core::{
    CancellationToken, CompliancePolicy, ResourceDescriptor, ResourceHandler, ResourcePage, ResourceType,
    TagSet,
};
use tagguard_engine::handlers::BackendHandler;
use tagguard_engine::report::AuditRow;
use tagguard_engine::{AuditSummary, Auditor, HandlerRegistry, InventoryBackend, ReportSink};

fn auditor(backend: &Arc<InventoryBackend>, cancel: &CancellationToken) -> Auditor {
    Auditor::new(registry(backend, cancel), CompliancePolicy::default(), REGION)
        .with_concurrency(4)
        .with_cancellation(cancel.clone())
}

fn run_audit(backend: &Arc<InventoryBackend>, path: Option<&Path>) -> AuditSummary {
    let cancel = CancellationToken::new();
    let auditor = auditor(backend, &cancel);
    let sink = ReportSink::create(path, 8, REGION, auditor.policy()).unwrap();
    auditor.run(sink).unwrap()
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<AuditRow>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader.deserialize().map(|r| r.unwrap()).collect();
    (header, rows)
}

// ─── Report contents ───

#[test]
fn audit_writes_sorted_parseable_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let summary = run_audit(&fleet(), Some(&path));

    let (header, rows) = read_rows(&path);
    assert_eq!(header, AUDIT_REPORT_HEADER.to_vec());
    let keys: Vec<(String, String)> = rows
        .iter()
        .map(|r| (r.resource_type.clone(), r.resource_id.clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("cluster".to_string(), "api".to_string()),
            ("cluster".to_string(), "web".to_string()),
            ("service".to_string(), "checkout".to_string()),
            ("log_group".to_string(), "/aws/lambda/ingest".to_string()),
            ("nat_gateway".to_string(), "nat-0a1b".to_string()),
        ]
    );
    assert_eq!(summary.total_audited, rows.len());
    assert!(!dir.path().join("report.csv.tmp").exists());
}

#[test]
fn non_compliant_row_lists_missing_and_existing_tags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    run_audit(&fleet(), Some(&path));

    let (_, rows) = read_rows(&path);
    let web = rows.iter().find(|r| r.resource_id == "web").unwrap();
    assert!(!web.compliant);
    assert_eq!(web.missing_tags, "CostCenter;Application");
    assert_eq!(web.existing_tags, "Environment=prod;Owner=platform-team");
    assert_eq!(web.resource_arn, arn(ResourceType::Cluster, "web"));

    let api = rows.iter().find(|r| r.resource_id == "api").unwrap();
    assert!(api.compliant);
    assert_eq!(api.missing_tags, "");
}

#[test]
fn compliant_column_is_literal_true_false() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    run_audit(&fleet(), Some(&path));
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains(",true,"));
    assert!(content.contains(",false,"));
}

// ─── Summary ───

#[test]
fn summary_counts_and_breakdown() {
    let summary = run_audit(&fleet(), None);
    assert_eq!(summary.total_audited, 5);
    assert_eq!(summary.compliant, 2);
    assert_eq!(summary.non_compliant(), 3);
    assert!((summary.compliance_rate - 0.4).abs() < 1e-9);

    let clusters = summary.by_type[&ResourceType::Cluster];
    assert_eq!((clusters.total, clusters.compliant), (2, 1));
    assert_eq!(clusters.compliance_rate(), 0.5);
    assert!(!summary.by_type.contains_key(&ResourceType::LoadBalancer));

    assert_eq!(
        summary.most_common_missing(),
        vec![
            ("Application", 3),
            ("CostCenter", 2),
            ("Environment", 1),
            ("Owner", 1)
        ]
    );
}

#[test]
fn zero_load_balancers_is_not_an_error() {
    let summary = run_audit(&fleet(), None);
    assert!(summary.enumeration_failures.is_empty());
    assert!(summary.skipped.is_empty());
    assert!(!summary.cancelled);
}

#[test]
fn empty_inventory_gives_zero_rate_and_header_only_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let summary = run_audit(&Arc::new(InventoryBackend::default()), Some(&path));
    assert_eq!(summary.total_audited, 0);
    assert_eq!(summary.compliance_rate, 0.0);
    let (header, rows) = read_rows(&path);
    assert_eq!(header.len(), 6);
    assert!(rows.is_empty());
}

// ─── Failure isolation ───

#[test]
fn enumeration_failure_does_not_stop_other_types() {
    let backend = fleet();
    backend.deny_listing(ResourceType::Service);
    let summary = run_audit(&backend, None);

    assert_eq!(summary.enumeration_failures.len(), 1);
    let failure = &summary.enumeration_failures[0];
    assert_eq!(failure.resource_type, "service");
    assert_eq!(failure.code, error_code::ACCESS_DENIED);
    assert_eq!(summary.total_audited, 4);
}

#[test]
fn fetch_failure_is_skipped_not_non_compliant() {
    let backend = fleet();
    backend.fail_fetch(
        arn(ResourceType::LogGroup, "/aws/lambda/ingest"),
        BackendError::AccessDenied {
            reason: "logs:ListTagsForResource".to_string(),
        },
    );
    let summary = run_audit(&backend, None);

    assert_eq!(summary.total_audited, 4);
    assert_eq!(summary.skipped_count(), 1);
    assert_eq!(summary.skipped[0].resource.resource_id, "/aws/lambda/ingest");
    assert_eq!(summary.skipped[0].code, error_code::ACCESS_DENIED);
    assert_eq!(summary.non_compliant(), 2);
}

#[test]
fn unexpected_tag_shape_is_skipped() {
    let backend = fleet();
    backend.override_shape(arn(ResourceType::NatGateway, "nat-0a1b"), TagShape::Map);
    let summary = run_audit(&backend, None);
    assert_eq!(summary.skipped_count(), 1);
    assert_eq!(summary.skipped[0].code, error_code::UNEXPECTED_SHAPE);
}

#[test]
fn transient_throttling_does_not_lose_resources() {
    let backend = fleet();
    backend.throttle_next(2);
    let summary = run_audit(&backend, None);
    assert_eq!(summary.total_audited, 5);
    assert!(summary.enumeration_failures.is_empty());
}

// ─── Cancellation ───

#[test]
fn cancelled_run_keeps_valid_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let backend = fleet();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let auditor = auditor(&backend, &cancel);
    let sink = ReportSink::create(Some(&path), 8, REGION, auditor.policy()).unwrap();
    let summary = auditor.run(sink).unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.total_audited, 0);
    assert_eq!(backend.list_calls(), 0);
    let (header, _) = read_rows(&path);
    assert_eq!(header, AUDIT_REPORT_HEADER.to_vec());
}

/// Cancels the run as soon as one resource's tags have been read.
struct CancelAfterFetch {
    inner: BackendHandler,
    cancel: CancellationToken,
}

impl ResourceHandler for CancelAfterFetch {
    fn resource_type(&self) -> ResourceType {
        self.inner.resource_type()
    }

    fn list_page(&self, region: &str, next_token: Option<&str>) -> Result<ResourcePage, EnumerationError> {
        self.inner.list_page(region, next_token)
    }

    fn fetch_tags(&self, resource: &ResourceDescriptor) -> Result<TagSet, FetchError> {
        let tags = self.inner.fetch_tags(resource);
        self.cancel.cancel();
        tags
    }

    fn write_tags(&self, resource: &ResourceDescriptor, tags: &TagSet) -> Result<(), WriteError> {
        self.inner.write_tags(resource, tags)
    }
}

#[test]
fn cancelled_mid_run_keeps_gathered_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let backend = fleet();
    let cancel = CancellationToken::new();
    let mut registry = registry(&backend, &cancel);
    registry.register(Arc::new(CancelAfterFetch {
        inner: BackendHandler::new(ResourceType::Cluster, backend.clone(), fast_retry(&cancel)),
        cancel: cancel.clone(),
    }));
    let auditor = Auditor::new(registry, CompliancePolicy::default(), REGION)
        .with_concurrency(1)
        .with_cancellation(cancel.clone());
    let sink = ReportSink::create(Some(&path), 8, REGION, auditor.policy()).unwrap();
    let summary = auditor.run(sink).unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.total_audited, 1);
    let (header, rows) = read_rows(&path);
    assert_eq!(header, AUDIT_REPORT_HEADER.to_vec());
    assert_eq!(rows.len(), summary.total_audited);
    assert_eq!(rows[0].resource_type, "cluster");
}

#[test]
fn unwritable_report_path_is_setup_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("report.csv");
    let err = ReportSink::create(Some(&path), 8, REGION, &CompliancePolicy::default())
        .err()
        .unwrap();
    assert!(err.is_fatal());
}
