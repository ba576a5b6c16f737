//! # tagguard-engine
//!
//! Enumerates resources through a per-type dispatch table, fetches and
//! evaluates their tags against a [`CompliancePolicy`], and either streams
//! the results into a CSV report ([`Auditor`]) or writes the missing tags
//! back ([`Remediator`]).
//!
//! Every backend call goes through [`retry::RetryPolicy`]. Per-resource work
//! runs on a bounded rayon pool and honours a shared [`CancellationToken`].
//!
//! [`CompliancePolicy`]: tagguard_core::CompliancePolicy
//! [`CancellationToken`]: tagguard_core::CancellationToken

pub mod auditor;
pub mod backends;
pub mod enumerator;
pub mod evaluator;
pub mod fetcher;
pub mod handlers;
pub mod remediator;
pub mod report;
pub mod retry;
pub mod writer;

pub use auditor::Auditor;
pub use backends::{build_backend, InventoryBackend};
pub use enumerator::ResourceEnumerator;
pub use evaluator::evaluate;
pub use fetcher::TagFetcher;
pub use handlers::HandlerRegistry;
pub use remediator::{RemediationReport, Remediator};
pub use report::{AuditSummary, ReportSink};
pub use retry::RetryPolicy;
pub use writer::TagWriter;
