// ── Rule-set audit ──
//
// Walks an ordered rule list and reports pairs where an earlier rule takes
// precedence over a later one for traffic both could match. Overlap decides
// whether a pair is interesting; the scope heuristic decides which of the
// two is the specific one.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{FirewallRule, RuleAction};
use crate::overlap::rules_overlap;
use crate::scope::is_narrower_scope;

// ── Finding types ───────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FindingKind {
    /// A later, narrower rule with the opposite action never fires for the
    /// traffic an earlier, broader rule already decided.
    Shadowed,
    /// Overlapping rules with opposite actions; the earlier one wins.
    Conflict,
    /// A later, narrower rule repeats what an earlier, broader rule does.
    Redundant,
}

impl FindingKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::Shadowed => Severity::High,
            Self::Conflict => Severity::Medium,
            Self::Redundant => Severity::Low,
        }
    }
}

/// One observation about an ordered pair of rules.
///
/// `rule_*` names the later, affected rule; `other_rule_*` the earlier rule
/// that takes precedence over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub rule_id: String,
    pub rule_name: String,
    pub other_rule_id: String,
    pub other_rule_name: String,
    pub message: String,
}

// ── Options / report ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditOptions {
    /// Also compare rules that are switched off.
    pub include_disabled: bool,
    /// Drop findings below this severity.
    pub min_severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub rules_checked: usize,
    pub pairs_compared: usize,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity >= severity)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

// ── Pipeline ────────────────────────────────────────────────────────

/// Rules in the order the gateway evaluates them: by index, unindexed rules
/// last, snapshot order among equals.
pub fn evaluation_order(rules: &[FirewallRule]) -> Vec<&FirewallRule> {
    let mut ordered: Vec<&FirewallRule> = rules.iter().collect();
    ordered.sort_by_key(|rule| (rule.index.is_none(), rule.index));
    ordered
}

/// Classify an overlapping pair. `earlier` takes precedence over `later`.
pub fn classify(earlier: &FirewallRule, later: &FirewallRule) -> Option<FindingKind> {
    let (Some(first), Some(second)) = (earlier.action, later.action) else {
        return None;
    };
    let same_verdict = first.permits() == second.permits();
    let later_is_narrower = is_narrower_scope(later, earlier);

    match (same_verdict, later_is_narrower) {
        (false, true) => Some(FindingKind::Shadowed),
        (false, false) => Some(FindingKind::Conflict),
        (true, true) => Some(FindingKind::Redundant),
        (true, false) => None,
    }
}

fn verb(action: Option<RuleAction>) -> &'static str {
    match action {
        Some(RuleAction::Allow) => "allowed",
        Some(RuleAction::Block) => "blocked",
        Some(RuleAction::Reject) => "rejected",
        None => "matched",
    }
}

fn describe(kind: FindingKind, earlier: &FirewallRule, later: &FirewallRule) -> String {
    let (first, second) = (earlier.display_name(), later.display_name());
    match kind {
        FindingKind::Shadowed => format!(
            "'{second}' is shadowed: overlapping traffic is already {} by broader rule '{first}'",
            verb(earlier.action)
        ),
        FindingKind::Conflict => format!(
            "'{second}' conflicts with '{first}': overlapping traffic is {} by '{first}' first",
            verb(earlier.action)
        ),
        FindingKind::Redundant => format!(
            "'{second}' is redundant: broader rule '{first}' already {} the same traffic",
            verb(earlier.action)
        ),
    }
}

/// Compare every ordered pair of rules and collect findings.
pub fn audit(rules: &[FirewallRule], options: &AuditOptions) -> AuditReport {
    let ordered: Vec<&FirewallRule> = evaluation_order(rules)
        .into_iter()
        .filter(|rule| options.include_disabled || rule.enabled)
        .collect();

    let mut report = AuditReport {
        rules_checked: ordered.len(),
        ..AuditReport::default()
    };

    for (i, earlier) in ordered.iter().enumerate() {
        for later in ordered.iter().skip(i + 1) {
            report.pairs_compared += 1;
            if !rules_overlap(earlier, later) {
                continue;
            }
            let Some(kind) = classify(earlier, later) else {
                continue;
            };
            if kind.severity() < options.min_severity {
                continue;
            }

            debug!(
                %kind,
                rule = %later.id,
                other_rule = %earlier.id,
                "audit finding"
            );
            report.findings.push(Finding {
                kind,
                severity: kind.severity(),
                rule_id: later.id.to_string(),
                rule_name: later.display_name(),
                other_rule_id: earlier.id.to_string(),
                other_rule_name: earlier.display_name(),
                message: describe(kind, earlier, later),
            });
        }
    }

    info!(
        rules = report.rules_checked,
        pairs = report.pairs_compared,
        findings = report.findings.len(),
        "audit complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatchTarget;
    use pretty_assertions::assert_eq;

    fn allow_all(index: i64) -> FirewallRule {
        FirewallRule::new("allow-all")
            .with_name("Allow all")
            .with_index(index)
            .with_action(RuleAction::Allow)
            .with_protocol("all")
    }

    fn deny_ssh(index: i64) -> FirewallRule {
        FirewallRule::new("deny-ssh")
            .with_name("Block guest SSH")
            .with_index(index)
            .with_action(RuleAction::Block)
            .with_protocol("tcp")
            .with_source(MatchTarget::networks(["guest"]))
            .with_destination(MatchTarget::networks(["corporate"]))
            .with_port("22")
    }

    #[test]
    fn broad_allow_shadows_later_specific_deny() {
        let report = audit(&[deny_ssh(2000), allow_all(1000)], &AuditOptions::default());

        assert_eq!(report.rules_checked, 2);
        assert_eq!(report.pairs_compared, 1);
        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.kind, FindingKind::Shadowed);
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.rule_id, "deny-ssh");
        assert_eq!(finding.other_rule_id, "allow-all");
        assert!(finding.message.contains("Allow all"));
    }

    #[test]
    fn findings_echo_rule_ids_as_written() {
        let broad = FirewallRule {
            id: "550E8400E29B41D4A716446655440000".into(),
            ..allow_all(1000)
        };
        let narrow = FirewallRule {
            id: "6BA7B810-9DAD-11D1-80B4-00C04FD430C8".into(),
            ..deny_ssh(2000)
        };

        let report = audit(&[narrow, broad], &AuditOptions::default());
        let finding = &report.findings[0];
        assert_eq!(finding.rule_id, "6BA7B810-9DAD-11D1-80B4-00C04FD430C8");
        assert_eq!(finding.other_rule_id, "550E8400E29B41D4A716446655440000");
    }

    #[test]
    fn specific_rule_first_is_a_conflict_not_shadowing() {
        let report = audit(&[deny_ssh(1000), allow_all(2000)], &AuditOptions::default());
        assert_eq!(report.findings[0].kind, FindingKind::Conflict);
        assert_eq!(report.findings[0].rule_id, "allow-all");
    }

    #[test]
    fn same_action_narrower_rule_is_redundant() {
        let narrow_allow = deny_ssh(2000).with_action(RuleAction::Allow);
        let report = audit(&[allow_all(1000), narrow_allow], &AuditOptions::default());
        assert_eq!(report.findings[0].kind, FindingKind::Redundant);
        assert_eq!(report.max_severity(), Some(Severity::Low));
    }

    #[test]
    fn block_and_reject_share_a_verdict() {
        let broad_reject = allow_all(1000).with_action(RuleAction::Reject);
        let report = audit(&[broad_reject, deny_ssh(2000)], &AuditOptions::default());
        assert_eq!(report.findings[0].kind, FindingKind::Redundant);
    }

    #[test]
    fn disabled_rules_are_skipped_by_default() {
        let rules = [allow_all(1000).with_enabled(false), deny_ssh(2000)];
        let report = audit(&rules, &AuditOptions::default());
        assert_eq!(report.rules_checked, 1);
        assert!(report.is_clean());

        let report = audit(
            &rules,
            &AuditOptions {
                include_disabled: true,
                ..AuditOptions::default()
            },
        );
        assert_eq!(report.findings.len(), 1);
    }

    #[test]
    fn min_severity_filters_findings() {
        let narrow_allow = deny_ssh(2000).with_action(RuleAction::Allow);
        let report = audit(
            &[allow_all(1000), narrow_allow],
            &AuditOptions {
                min_severity: Severity::Medium,
                ..AuditOptions::default()
            },
        );
        assert!(report.is_clean());
        assert_eq!(report.pairs_compared, 1);
    }

    #[test]
    fn rules_without_action_produce_no_findings() {
        let unknown = FirewallRule::new("unknown").with_index(1);
        let report = audit(&[unknown, deny_ssh(2)], &AuditOptions::default());
        assert!(report.is_clean());
    }

    #[test]
    fn non_overlapping_rules_produce_no_findings() {
        let other_zone = allow_all(1000).with_destination_zone("zone-e0fa");
        let deny = deny_ssh(2000).with_destination_zone("zone-e0fb");
        assert!(audit(&[other_zone, deny], &AuditOptions::default()).is_clean());
    }

    #[test]
    fn unindexed_rules_sort_last_in_snapshot_order() {
        let rules = [
            FirewallRule::new("c"),
            FirewallRule::new("b").with_index(20),
            FirewallRule::new("d"),
            FirewallRule::new("a").with_index(10),
        ];
        let order: Vec<String> = evaluation_order(&rules)
            .iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(order, ["a", "b", "c", "d"]);
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Severity>().ok(), Some(Severity::High));
        assert!(Severity::High > Severity::Medium);
        assert_eq!(Severity::Medium.to_string(), "medium");
    }
}
