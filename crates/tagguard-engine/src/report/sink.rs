//! Single-writer report sink: bounded crossbeam channel, dedicated writer thread.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};
use tagguard_core::constants::AUDIT_REPORT_HEADER;
use tagguard_core::errors::{EnumerationError, FetchError, SetupError, TagguardError};
use tagguard_core::{CompliancePolicy, ComplianceResult, ResourceDescriptor, ResourceType, TagguardResult};

use super::row::AuditRow;
use super::summary::AuditSummary;

enum SinkMessage {
    Result(ComplianceResult),
    Skipped {
        resource: ResourceDescriptor,
        error: FetchError,
    },
    EnumerationFailed(EnumerationError),
    Cancelled,
}

/// Cloneable sender side of a [`ReportSink`], handed to workers.
#[derive(Clone)]
pub struct ReportHandle {
    tx: Sender<SinkMessage>,
}

impl ReportHandle {
    fn send(&self, message: SinkMessage) {
        if self.tx.send(message).is_err() {
            tracing::error!("report writer stopped; dropping report message");
        }
    }

    pub fn record(&self, result: ComplianceResult) {
        self.send(SinkMessage::Result(result));
    }

    pub fn record_skipped(&self, resource: ResourceDescriptor, error: FetchError) {
        self.send(SinkMessage::Skipped { resource, error });
    }

    pub fn record_enumeration_failure(&self, error: EnumerationError) {
        self.send(SinkMessage::EnumerationFailed(error));
    }

    pub fn mark_cancelled(&self) {
        self.send(SinkMessage::Cancelled);
    }
}

/// Accumulates compliance results into a CSV report and an [`AuditSummary`].
///
/// Rows are appended and flushed one at a time as they arrive, so the file
/// is valid CSV at every point of the run. [`ReportSink::finish`] rewrites
/// it sorted by resource type, then resource id.
pub struct ReportSink {
    handle: ReportHandle,
    writer: JoinHandle<TagguardResult<AuditSummary>>,
}

impl ReportSink {
    /// Open the report and start the writer thread. With `path = None`
    /// only the summary is kept.
    pub fn create(
        path: Option<&Path>,
        channel_capacity: usize,
        region: &str,
        policy: &CompliancePolicy,
    ) -> TagguardResult<Self> {
        let summary = AuditSummary::new(
            region,
            policy.required_keys().to_vec(),
            path.map(|p| p.display().to_string()),
        );
        let csv = match path {
            Some(p) => Some(open_report(p)?),
            None => None,
        };
        let (tx, rx) = bounded(channel_capacity.max(1));
        let state = WriterState {
            path: path.map(Path::to_path_buf),
            csv,
            rows: Vec::new(),
            summary,
            incremental_error: None,
        };
        let writer = std::thread::Builder::new()
            .name("tagguard-report".to_string())
            .spawn(move || state.run(rx))?;
        Ok(Self {
            handle: ReportHandle { tx },
            writer,
        })
    }

    pub fn handle(&self) -> ReportHandle {
        self.handle.clone()
    }

    pub fn record(&self, result: ComplianceResult) {
        self.handle.record(result);
    }

    pub fn record_enumeration_failure(&self, error: EnumerationError) {
        self.handle.record_enumeration_failure(error);
    }

    pub fn mark_cancelled(&self) {
        self.handle.mark_cancelled();
    }

    /// Close the channel, wait for the writer, and return the summary.
    /// Every outstanding [`ReportHandle`] must be dropped first.
    pub fn finish(self) -> TagguardResult<AuditSummary> {
        drop(self.handle);
        self.writer.join().map_err(|_| TagguardError::Report {
            reason: "report writer thread panicked".to_string(),
        })?
    }
}

fn open_report(path: &Path) -> TagguardResult<csv::Writer<File>> {
    let file = File::create(path).map_err(|e| SetupError::ReportOutput {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    csv.write_record(AUDIT_REPORT_HEADER)
        .and_then(|_| csv.flush().map_err(csv::Error::from))
        .map_err(|e| SetupError::ReportOutput {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(csv)
}

struct WriterState {
    path: Option<PathBuf>,
    csv: Option<csv::Writer<File>>,
    rows: Vec<(ResourceType, AuditRow)>,
    summary: AuditSummary,
    incremental_error: Option<String>,
}

impl WriterState {
    fn run(mut self, rx: Receiver<SinkMessage>) -> TagguardResult<AuditSummary> {
        for message in rx {
            match message {
                SinkMessage::Result(result) => self.append(&result),
                SinkMessage::Skipped { resource, error } => {
                    self.summary.record_skipped(resource, &error)
                }
                SinkMessage::EnumerationFailed(error) => {
                    self.summary.record_enumeration_failure(&error)
                }
                SinkMessage::Cancelled => self.summary.cancelled = true,
            }
        }
        self.finalize()
    }

    fn append(&mut self, result: &ComplianceResult) {
        self.summary.record(result);
        let row = AuditRow::from(result);
        if let Some(csv) = self.csv.as_mut() {
            let written = csv
                .serialize(&row)
                .and_then(|_| csv.flush().map_err(csv::Error::from));
            if let Err(e) = written {
                if self.incremental_error.is_none() {
                    tracing::error!(error = %e, "failed to append report row");
                    self.incremental_error = Some(e.to_string());
                }
            }
        }
        self.rows.push((result.resource.resource_type, row));
    }

    /// Rewrite the report sorted, through a temp file and a rename.
    fn finalize(mut self) -> TagguardResult<AuditSummary> {
        let Some(path) = self.path.take() else {
            return Ok(self.summary);
        };
        drop(self.csv.take());

        self.rows
            .sort_by(|(ta, a), (tb, b)| ta.cmp(tb).then_with(|| a.resource_id.cmp(&b.resource_id)));

        let tmp = PathBuf::from(format!("{}.tmp", path.display()));
        let report_err = |e: &dyn std::fmt::Display| TagguardError::Report {
            reason: format!("{}: {e}", path.display()),
        };
        {
            let mut csv = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp)
                .map_err(|e| report_err(&e))?;
            csv.write_record(AUDIT_REPORT_HEADER)
                .map_err(|e| report_err(&e))?;
            for (_, row) in &self.rows {
                csv.serialize(row).map_err(|e| report_err(&e))?;
            }
            csv.flush().map_err(|e| report_err(&e))?;
        }
        fs::rename(&tmp, &path).map_err(|e| report_err(&e))?;

        if let Some(reason) = self.incremental_error {
            tracing::warn!(%reason, "incremental report writes failed; final report rewritten");
        }
        tracing::debug!(rows = self.rows.len(), path = %path.display(), "report written");
        Ok(self.summary)
    }
}
