// ── ICMP type matching ──

use crate::model::{FirewallRule, Protocol};

const ANY_TYPE: &str = "ANY";

fn icmp_typename(rule: &FirewallRule) -> Option<&str> {
    rule.icmp_typename
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != ANY_TYPE)
}

/// Whether the ICMP type selectors of two rules can coincide.
///
/// Only relevant when an `icmp` rule is involved and neither rule matches
/// all protocols. Type names are canonical controller tokens and compare
/// case-sensitively; absent or `ANY` is a wildcard.
pub fn icmp_types_overlap(r1: &FirewallRule, r2: &FirewallRule) -> bool {
    let (p1, p2) = (r1.effective_protocol(), r2.effective_protocol());
    if *p1 != Protocol::Icmp && *p2 != Protocol::Icmp {
        return true;
    }
    if *p1 == Protocol::All || *p2 == Protocol::All {
        return true;
    }

    match (icmp_typename(r1), icmp_typename(r2)) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}
