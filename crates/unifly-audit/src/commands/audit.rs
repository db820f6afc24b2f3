//! `audit` handler: pairwise rule comparison with severity gating.

use owo_colors::OwoColorize;
use tabled::Tabled;
use unifly_audit_core::{AuditOptions, AuditReport, Finding, audit};

use crate::cli::AuditArgs;
use crate::config::{self, Settings};
use crate::error::CliError;
use crate::output;

use super::load_snapshot;

// ── Finding table row ───────────────────────────────────────────────

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Rule")]
    rule: String,
    #[tabled(rename = "Preceded By")]
    other_rule: String,
    #[tabled(rename = "Detail")]
    message: String,
}

impl From<&Finding> for FindingRow {
    fn from(f: &Finding) -> Self {
        Self {
            severity: output::severity_label(f.severity, false),
            kind: f.kind.to_string(),
            rule: f.rule_name.clone(),
            other_rule: f.other_rule_name.clone(),
            message: f.message.clone(),
        }
    }
}

fn summary(report: &AuditReport, color: bool) -> String {
    let head = format!(
        "{} rules checked, {} pairs compared, {} finding(s)",
        report.rules_checked,
        report.pairs_compared,
        report.findings.len()
    );
    match report.max_severity() {
        Some(max) => format!("{head}, highest {}", output::severity_label(max, color)),
        None if color => head.green().to_string(),
        None => head,
    }
}

fn report_detail(report: &AuditReport, color: bool) -> String {
    if report.is_clean() {
        return summary(report, color);
    }
    let rows: Vec<FindingRow> = report.findings.iter().map(FindingRow::from).collect();
    format!("{}\n{}", output::render_table(&rows), summary(report, color))
}

fn report_plain(report: &AuditReport) -> String {
    report
        .findings
        .iter()
        .map(|f| {
            format!(
                "{}\t{}\t{}\t{}",
                f.severity, f.kind, f.rule_id, f.other_rule_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: AuditArgs, settings: &Settings) -> Result<(), CliError> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let defaults = &settings.config.defaults;

    let options = AuditOptions {
        include_disabled: args.include_disabled || defaults.include_disabled,
        min_severity: args
            .min_severity
            .map_or(defaults.min_severity, config::severity),
    };
    let fail_on = args.fail_on.map(config::severity).or(defaults.fail_on);

    let report = audit(&snapshot.rules, &options);

    let color = output::should_color(settings.color);
    let out = output::render_single(
        settings.output,
        &report,
        |r| report_detail(r, color),
        report_plain,
    )?;
    output::print_output(&out, settings.quiet);

    if let Some(threshold) = fail_on {
        let count = report.count_at_least(threshold);
        if count > 0 {
            return Err(CliError::FindingsAtThreshold {
                count,
                threshold: threshold.to_string(),
            });
        }
    }
    Ok(())
}
