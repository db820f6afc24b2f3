//! `rules` handler: the snapshot in evaluation order.

use serde::Serialize;
use tabled::Tabled;
use unifly_audit_core::{FirewallRule, evaluation_order, scope_score};

use crate::cli::RulesArgs;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::load_snapshot;

/// A rule as listed, with its breadth alongside.
#[derive(Debug, Serialize)]
struct RuleView<'a> {
    #[serde(flatten)]
    rule: &'a FirewallRule,
    scope_score: u32,
}

// ── Rule table row ──────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Index")]
    index: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Scope")]
    scope: u32,
}

fn with_zone(target: String, zone: Option<&str>) -> String {
    match zone {
        Some(zone) => format!("{zone}:{target}"),
        None => target,
    }
}

fn rule_row(v: &RuleView<'_>) -> RuleRow {
    let r = v.rule;
    let port = r.destination.port.clone().unwrap_or_default();
    RuleRow {
        index: r.index.map(|i| i.to_string()).unwrap_or_default(),
        id: r.id.to_string(),
        name: r.name.clone().unwrap_or_default(),
        action: r.action.map(|a| a.to_string()).unwrap_or_else(|| "-".into()),
        enabled: if r.enabled { "yes" } else { "no" }.into(),
        protocol: r.effective_protocol().to_string(),
        source: with_zone(r.source.target.to_string(), r.source.zone_id.as_deref()),
        destination: with_zone(
            r.destination.target.to_string(),
            r.destination.zone_id.as_deref(),
        ),
        port: if r.destination.match_opposite_ports && !port.is_empty() {
            format!("!{port}")
        } else {
            port
        },
        scope: v.scope_score,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: RulesArgs, settings: &Settings) -> Result<(), CliError> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let views: Vec<RuleView<'_>> = evaluation_order(&snapshot.rules)
        .into_iter()
        .map(|rule| RuleView {
            rule,
            scope_score: scope_score(rule),
        })
        .collect();

    let out = output::render_list(settings.output, &views, rule_row, |v| {
        v.rule.id.to_string()
    })?;
    output::print_output(&out, settings.quiet);
    Ok(())
}
