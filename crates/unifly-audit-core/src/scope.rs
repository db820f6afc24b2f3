// ── Scope scoring ──
//
// A rough breadth estimate used to pick the more specific of two rules that
// are already known to overlap. Lower is narrower. This is a ranking
// heuristic, not a subset test.
//
// Score per side:
//   ANY                          10
//   NETWORK / IP / CLIENT / WEB  2 + number of listed entries
//   each IP entry that is a CIDR adds (32 - prefix) / 4 for IPv4,
//                                     (128 - prefix) / 16 for IPv6
//
// A single IPv4 /8 therefore scores 9, still below ANY.

use ipnetwork::IpNetwork;
use serde::Serialize;

use crate::matcher::cidr::parse_cidr;
use crate::model::{FirewallRule, MatchTarget};

pub const ANY_SCORE: u32 = 10;
const LIST_BASE_SCORE: u32 = 2;

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Extra breadth for a CIDR entry; zero for anything else.
pub fn cidr_bonus(entry: &str) -> u32 {
    match parse_cidr(entry) {
        Some(IpNetwork::V4(net)) => u32::from(32_u8.saturating_sub(net.prefix())) / 4,
        Some(IpNetwork::V6(net)) => u32::from(128_u8.saturating_sub(net.prefix())) / 16,
        None => 0,
    }
}

/// Breadth of one source or destination target.
pub fn target_score(target: &MatchTarget) -> u32 {
    let bonus = match target {
        MatchTarget::Any => return ANY_SCORE,
        MatchTarget::Ip { ips, .. } => ips.iter().map(|ip| cidr_bonus(ip)).sum(),
        _ => 0,
    };
    LIST_BASE_SCORE
        .saturating_add(count(target.len()))
        .saturating_add(bonus)
}

/// Breadth of a whole rule, kept per side for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScopeScore {
    pub source: u32,
    pub destination: u32,
}

impl ScopeScore {
    pub fn of(rule: &FirewallRule) -> Self {
        Self {
            source: target_score(&rule.source.target),
            destination: target_score(&rule.destination.target),
        }
    }

    pub fn total(self) -> u32 {
        self.source.saturating_add(self.destination)
    }
}

/// Total breadth of a rule.
pub fn scope_score(rule: &FirewallRule) -> u32 {
    ScopeScore::of(rule).total()
}

/// Whether `candidate` is strictly narrower than `other`. Ties are not.
pub fn is_narrower_scope(candidate: &FirewallRule, other: &FirewallRule) -> bool {
    scope_score(candidate) < scope_score(other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ip_rule(ips: &[&str]) -> FirewallRule {
        FirewallRule::new("ip").with_source(MatchTarget::ips(ips.iter().copied()))
    }

    #[test]
    fn any_scores_ten_per_side() {
        assert_eq!(scope_score(&FirewallRule::new("any")), 20);
    }

    #[test]
    fn list_targets_scale_with_cardinality() {
        assert_eq!(target_score(&MatchTarget::networks(["a"])), 3);
        assert_eq!(target_score(&MatchTarget::networks(["a", "b", "c"])), 5);
        assert_eq!(target_score(&MatchTarget::networks(Vec::<String>::new())), 2);
        assert_eq!(target_score(&MatchTarget::domains(["a.com", "b.com"])), 4);
        assert_eq!(target_score(&MatchTarget::clients(["aa:bb:cc:dd:ee:ff"])), 3);
    }

    #[test]
    fn wider_cidrs_score_higher() {
        let score = |cidr: &str| target_score(&MatchTarget::ips([cidr]));
        assert_eq!(score("10.0.0.1"), 3);
        assert_eq!(score("10.0.0.1/32"), 3);
        assert_eq!(score("10.0.0.0/24"), 5);
        assert_eq!(score("10.0.0.0/16"), 7);
        assert_eq!(score("10.0.0.0/8"), 9);
        assert!(score("10.0.0.0/8") < ANY_SCORE);
    }

    #[test]
    fn ipv6_bonus_uses_its_own_scale() {
        assert_eq!(cidr_bonus("2001:db8::/64"), 4);
        assert_eq!(cidr_bonus("2001:db8::1/128"), 0);
        assert_eq!(cidr_bonus("not-a-cidr"), 0);
    }

    #[test]
    fn narrower_is_strict() {
        let any = FirewallRule::new("any");
        assert!(!is_narrower_scope(&any, &FirewallRule::new("other")));
        assert!(is_narrower_scope(&ip_rule(&["10.0.0.0/8"]), &any));
        assert!(is_narrower_scope(
            &ip_rule(&["10.0.0.0/24"]),
            &ip_rule(&["10.0.0.0/8"])
        ));
        assert!(!is_narrower_scope(&any, &ip_rule(&["10.0.0.1"])));
    }

    #[test]
    fn specific_deny_is_narrower_than_allow_all() {
        let allow_all = FirewallRule::new("allow-all").with_protocol("all");
        let deny_ssh = FirewallRule::new("deny-ssh")
            .with_protocol("tcp")
            .with_source(MatchTarget::networks(["guest"]))
            .with_destination(MatchTarget::networks(["corporate"]))
            .with_port("22");
        assert_eq!(
            ScopeScore::of(&deny_ssh),
            ScopeScore {
                source: 3,
                destination: 3
            }
        );
        assert!(is_narrower_scope(&deny_ssh, &allow_all));
        assert!(!is_narrower_scope(&allow_all, &deny_ssh));
    }
}
