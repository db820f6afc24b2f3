//! `overlap` handler: explain a single rule pair.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;
use unifly_audit_core::{
    DimensionResult, FirewallRule, OverlapReport, ScopeScore, is_narrower_scope,
};

use crate::cli::OverlapArgs;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::load_snapshot;

// ── View ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RuleScope {
    id: String,
    name: String,
    scope: ScopeScore,
    score: u32,
}

impl RuleScope {
    fn of(rule: &FirewallRule) -> Self {
        let scope = ScopeScore::of(rule);
        Self {
            id: rule.id.to_string(),
            name: rule.display_name(),
            scope,
            score: scope.total(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PairView {
    rule_a: RuleScope,
    rule_b: RuleScope,
    overlaps: bool,
    dimensions: Vec<DimensionResult>,
    /// Id of the strictly narrower rule, if either is.
    narrower: Option<String>,
}

impl PairView {
    fn between(a: &FirewallRule, b: &FirewallRule) -> Self {
        let report = OverlapReport::between(a, b);
        let narrower = if is_narrower_scope(a, b) {
            Some(a.id.to_string())
        } else if is_narrower_scope(b, a) {
            Some(b.id.to_string())
        } else {
            None
        };
        Self {
            rule_a: RuleScope::of(a),
            rule_b: RuleScope::of(b),
            overlaps: report.overlaps(),
            dimensions: report.dimensions,
            narrower,
        }
    }
}

#[derive(Tabled)]
struct DimensionRow {
    #[tabled(rename = "Dimension")]
    dimension: String,
    #[tabled(rename = "Overlaps")]
    overlaps: String,
}

fn pair_detail(view: &PairView, color: bool) -> String {
    let rows: Vec<DimensionRow> = view
        .dimensions
        .iter()
        .map(|d| DimensionRow {
            dimension: d.dimension.to_string(),
            overlaps: output::verdict_label(d.overlaps, false),
        })
        .collect();

    let verdict = if view.overlaps {
        "rules overlap"
    } else {
        "rules are disjoint"
    };
    let verdict = match (color, view.overlaps) {
        (false, _) => verdict.to_string(),
        (true, true) => verdict.yellow().bold().to_string(),
        (true, false) => verdict.green().to_string(),
    };

    let scope_line = |r: &RuleScope| {
        format!(
            "{:<12} {} (source {}, destination {})",
            r.id, r.score, r.scope.source, r.scope.destination
        )
    };

    [
        format!("A: {} ({})", view.rule_a.name, view.rule_a.id),
        format!("B: {} ({})", view.rule_b.name, view.rule_b.id),
        output::render_table(&rows),
        format!("Verdict:  {verdict}"),
        "Scope:".to_string(),
        format!("  {}", scope_line(&view.rule_a)),
        format!("  {}", scope_line(&view.rule_b)),
        format!(
            "Narrower: {}",
            view.narrower.as_deref().unwrap_or("neither")
        ),
    ]
    .join("\n")
}

fn pair_plain(view: &PairView) -> String {
    let word = if view.overlaps { "overlap" } else { "disjoint" };
    word.to_string()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: OverlapArgs, settings: &Settings) -> Result<(), CliError> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let a = snapshot.rule(&args.rule_a)?;
    let b = snapshot.rule(&args.rule_b)?;

    let view = PairView::between(a, b);
    tracing::debug!(
        rule_a = %a.id,
        rule_b = %b.id,
        overlaps = view.overlaps,
        "pair evaluated"
    );

    let color = output::should_color(settings.color);
    let out = output::render_single(
        settings.output,
        &view,
        |v| pair_detail(v, color),
        pair_plain,
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}
