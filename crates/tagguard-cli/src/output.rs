use std::fmt::Write as _;

use serde::Serialize;
use tagguard_core::constants::RECOMMENDATION_THRESHOLD;
use tagguard_engine::{AuditSummary, RemediationReport};

const RULE: &str = "============================================================";

#[derive(Serialize)]
struct JsonOut<'a, T: Serialize> {
    ok: bool,
    data: &'a T,
}

fn print_json<T: Serialize>(ok: bool, data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&JsonOut { ok, data })?);
    Ok(())
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn print_audit_summary(json: bool, summary: &AuditSummary) -> anyhow::Result<()> {
    if json {
        return print_json(true, summary);
    }
    print!("{}", render_audit_summary(summary));
    Ok(())
}

pub fn render_audit_summary(summary: &AuditSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "TAG AUDIT SUMMARY");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Audit Date: {}", summary.generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Region: {}", summary.region);
    let _ = writeln!(out, "Required Tags: {}", summary.required_tags.join(", "));
    if let Some(path) = &summary.report_path {
        let _ = writeln!(out, "Report File: {path}");
    }
    if summary.cancelled {
        let _ = writeln!(out, "Status: interrupted, results are partial");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "OVERALL COMPLIANCE:");
    let _ = writeln!(out, "  Total Resources: {}", summary.total_audited);
    let _ = writeln!(out, "  Compliant Resources: {}", summary.compliant);
    let _ = writeln!(out, "  Non-Compliant Resources: {}", summary.non_compliant());
    let _ = writeln!(out, "  Skipped (tags unreadable): {}", summary.skipped_count());
    let _ = writeln!(out, "  Overall Compliance Rate: {}", percent(summary.compliance_rate));
    let _ = writeln!(out);

    if !summary.by_type.is_empty() {
        let _ = writeln!(out, "COMPLIANCE BY RESOURCE TYPE:");
        for (resource_type, stats) in &summary.by_type {
            let _ = writeln!(out, "  {}:", resource_type.label());
            let _ = writeln!(
                out,
                "    Total: {}, Compliant: {} ({})",
                stats.total,
                stats.compliant,
                percent(stats.compliance_rate())
            );
        }
        let _ = writeln!(out);
    }

    let missing = summary.most_common_missing();
    if !missing.is_empty() {
        let _ = writeln!(out, "MOST COMMON MISSING TAGS:");
        for (tag, count) in missing {
            let _ = writeln!(out, "  {tag}: {count} resources");
        }
        let _ = writeln!(out);
    }

    if !summary.enumeration_failures.is_empty() {
        let _ = writeln!(out, "RESOURCE TYPES NOT LISTED:");
        for failure in &summary.enumeration_failures {
            let _ = writeln!(out, "  {}: [{}] {}", failure.resource_type, failure.code, failure.reason);
        }
        let _ = writeln!(out);
    }

    if !summary.skipped.is_empty() {
        let _ = writeln!(out, "SKIPPED RESOURCES:");
        for skipped in &summary.skipped {
            let _ = writeln!(out, "  {}: [{}] {}", skipped.resource, skipped.code, skipped.reason);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{RULE}");

    if summary.total_audited > 0 && summary.compliance_rate < RECOMMENDATION_THRESHOLD {
        let _ = writeln!(out, "\nRECOMMENDATIONS:");
        let _ = writeln!(out, "- Apply the missing tags in bulk with `tagguard remediate`");
        let _ = writeln!(out, "- Enforce required tags at creation time with organization tag policies");
        let _ = writeln!(out, "- Add the required tags to infrastructure-as-code templates");
        let _ = writeln!(out, "- Schedule a recurring audit to catch untagged resources early");
    }
    out
}

pub fn print_remediation(json: bool, report: &RemediationReport) -> anyhow::Result<()> {
    if json {
        return print_json(!report.has_write_errors(), report);
    }
    print!("{}", render_remediation(report));
    Ok(())
}

pub fn render_remediation(report: &RemediationReport) -> String {
    let mut out = String::new();
    let verb = if report.dry_run { "would tag" } else { "tagged" };
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(
        out,
        "TAG REMEDIATION{}",
        if report.dry_run { " (DRY RUN)" } else { "" }
    );
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Region: {}", report.region);
    let _ = writeln!(out, "Tags: {}", report.tag_template);
    if report.cancelled {
        let _ = writeln!(out, "Status: interrupted, results are partial");
    }
    let _ = writeln!(out);

    for outcome in report.outcomes.iter().filter(|o| !o.applied_tags.is_empty() || !o.success) {
        if outcome.success {
            let _ = writeln!(out, "  {verb} {}: {}", outcome.resource, outcome.applied_tags);
        } else {
            let _ = writeln!(out, "  failed {}: {}", outcome.resource, outcome.error_string());
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Processed: {}", report.outcomes.len());
    let _ = writeln!(out, "  {}: {}", capitalize(verb), report.tagged());
    let _ = writeln!(out, "  Already compliant or nothing to write: {}", report.unchanged());
    let _ = writeln!(out, "  Failed: {}", report.failed());
    for failure in &report.enumeration_failures {
        let _ = writeln!(
            out,
            "  Not listed: {} [{}] {}",
            failure.resource_type, failure.code, failure.reason
        );
    }
    let _ = writeln!(out, "{RULE}");
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
