// ── Source / destination matching ──
//
// Both sides of a rule use the same target model, so a single predicate
// serves both. Cross-type pairs never overlap, with one exception: a
// NETWORK selector and an IP selector are always assumed to overlap, since
// resolving a network id to its subnet is outside this crate.

use super::cidr::IpSet;
use super::domain::domains_overlap;
use super::overlaps_with_exceptions;
use crate::model::{FirewallRule, MatchTarget};

/// Whether two source or destination targets can match a common endpoint.
pub fn targets_overlap(a: &MatchTarget, b: &MatchTarget) -> bool {
    match (a, b) {
        (MatchTarget::Any, _)
        | (_, MatchTarget::Any)
        | (MatchTarget::Network { .. }, MatchTarget::Ip { .. })
        | (MatchTarget::Ip { .. }, MatchTarget::Network { .. }) => true,

        (
            MatchTarget::Network {
                network_ids: ids_a,
                match_opposite: opp_a,
            },
            MatchTarget::Network {
                network_ids: ids_b,
                match_opposite: opp_b,
            },
        ) => overlaps_with_exceptions(ids_a.as_slice(), *opp_a, ids_b.as_slice(), *opp_b),

        (
            MatchTarget::Ip {
                ips: ips_a,
                match_opposite: opp_a,
            },
            MatchTarget::Ip {
                ips: ips_b,
                match_opposite: opp_b,
            },
        ) => overlaps_with_exceptions(&IpSet(ips_a), *opp_a, &IpSet(ips_b), *opp_b),

        (
            MatchTarget::Client { client_macs: macs_a },
            MatchTarget::Client { client_macs: macs_b },
        ) => overlaps_with_exceptions(macs_a.as_slice(), false, macs_b.as_slice(), false),

        (
            MatchTarget::Web { web_domains: domains_a },
            MatchTarget::Web { web_domains: domains_b },
        ) => domains_overlap(domains_a.as_slice(), domains_b.as_slice()),

        _ => false,
    }
}

pub fn sources_overlap(r1: &FirewallRule, r2: &FirewallRule) -> bool {
    targets_overlap(&r1.source.target, &r2.source.target)
}

pub fn destinations_overlap(r1: &FirewallRule, r2: &FirewallRule) -> bool {
    targets_overlap(&r1.destination.target, &r2.destination.target)
}
