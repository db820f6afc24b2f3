// ── IP / CIDR matching ──
//
// Entries in an IP selector are literal addresses, CIDRs, or hyphenated
// `a-b` ranges. Only CIDR arithmetic is performed; ranges and anything that
// fails to parse are compared as opaque strings.

use std::net::IpAddr;

use ipnetwork::IpNetwork;

use super::ValueSet;

/// Parse `raw` as a CIDR block. Strings without a `/` are never CIDRs.
pub(crate) fn parse_cidr(raw: &str) -> Option<IpNetwork> {
    let raw = raw.trim();
    if !raw.contains('/') {
        return None;
    }
    raw.parse().ok()
}

/// Whether `candidate` lies inside the CIDR `cidr`.
///
/// Returns false when `cidr` has no prefix length; exact IP equality is the
/// caller's business. A CIDR candidate must fit entirely inside `cidr`.
pub fn ip_matches_cidr(candidate: &str, cidr: &str) -> bool {
    let Some(outer) = parse_cidr(cidr) else {
        return false;
    };

    let candidate = candidate.trim();
    if candidate.contains('/') {
        candidate
            .parse::<IpNetwork>()
            .is_ok_and(|inner| network_within(inner, outer))
    } else {
        candidate
            .parse::<IpAddr>()
            .is_ok_and(|ip| outer.contains(ip))
    }
}

/// `inner` is a subset of `outer`. Prefix-aligned blocks nest, so a longer
/// prefix whose network address falls inside `outer` is wholly contained.
fn network_within(inner: IpNetwork, outer: IpNetwork) -> bool {
    inner.prefix() >= outer.prefix() && outer.contains(inner.network())
}

/// CIDR blocks are either nested or disjoint.
fn networks_intersect(a: IpNetwork, b: IpNetwork) -> bool {
    a.contains(b.network()) || b.contains(a.network())
}

/// Whether two single IP-selector entries can share an address.
pub fn ip_entries_overlap(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    if a == b || ip_matches_cidr(a, b) || ip_matches_cidr(b, a) {
        return true;
    }
    match (parse_cidr(a), parse_cidr(b)) {
        (Some(a), Some(b)) => networks_intersect(a, b),
        _ => false,
    }
}

/// Whether any entry of `ips1` overlaps any entry of `ips2`.
pub fn ip_ranges_overlap<A, B>(ips1: &[A], ips2: &[B]) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    ips1.iter()
        .any(|a| ips2.iter().any(|b| ip_entries_overlap(a.as_ref(), b.as_ref())))
}

// ── Exception-set view ──────────────────────────────────────────────

/// An IP selector list seen through CIDR-aware set semantics.
///
/// An entry is only considered excepted by an inverted list when it is
/// listed verbatim or lies wholly inside one of the listed CIDRs.
#[derive(Debug, Clone, Copy)]
pub struct IpSet<'a>(pub &'a [String]);

impl ValueSet for IpSet<'_> {
    type Item = str;

    fn items(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn intersects(&self, item: &str) -> bool {
        self.0.iter().any(|member| ip_entries_overlap(item, member))
    }

    fn covers(&self, item: &str) -> bool {
        self.0
            .iter()
            .any(|member| member.trim() == item.trim() || ip_matches_cidr(item, member))
    }
}
