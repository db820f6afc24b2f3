// ── Destination port matching ──
//
// Port specs are comma-separated single ports and inclusive `low-high`
// ranges, e.g. "22,80-82,443". The matcher is lenient and never fails;
// `PortSpec` is the strict parser the snapshot loader validates with.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use tracing::trace;

use super::overlaps_with_exceptions;
use crate::error::CoreError;
use crate::model::FirewallRule;

fn parse_port(raw: &str) -> Result<u16, String> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| format!("'{}' is not a port number (0-65535)", raw.trim()))
}

fn parse_token(token: &str) -> Result<RangeInclusive<u16>, String> {
    let token = token.trim();
    if token.is_empty() {
        return Err("empty entry".into());
    }
    match token.split_once('-') {
        Some((low, high)) => {
            let (low, high) = (parse_port(low)?, parse_port(high)?);
            if low > high {
                return Err(format!("range '{token}' runs backwards"));
            }
            Ok(low..=high)
        }
        None => parse_port(token).map(|port| port..=port),
    }
}

/// Expand a port spec into the set of ports it covers.
///
/// Whitespace around entries is ignored. Entries that do not parse are
/// skipped rather than reported.
pub fn parse_port_string(spec: &str) -> BTreeSet<u16> {
    let mut ports = BTreeSet::new();
    for token in spec.split(',').filter(|t| !t.trim().is_empty()) {
        match parse_token(token) {
            Ok(range) => ports.extend(range),
            Err(reason) => trace!(spec, token, %reason, "skipping port entry"),
        }
    }
    ports
}

// ── Strict parsing ──────────────────────────────────────────────────

/// A validated port spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec {
    ranges: Vec<RangeInclusive<u16>>,
}

impl PortSpec {
    pub fn ports(&self) -> BTreeSet<u16> {
        self.ranges.iter().cloned().flatten().collect()
    }
}

impl FromStr for PortSpec {
    type Err = CoreError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| CoreError::InvalidPortSpec {
            spec: spec.to_owned(),
            reason,
        };

        if spec.trim().is_empty() {
            return Err(invalid("no ports listed".into()));
        }

        let ranges = spec
            .split(',')
            .map(parse_token)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        Ok(Self { ranges })
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .ranges
            .iter()
            .map(|r| {
                if r.start() == r.end() {
                    r.start().to_string()
                } else {
                    format!("{}-{}", r.start(), r.end())
                }
            })
            .collect();
        f.write_str(&parts.join(","))
    }
}

// ── Rule-level predicate ────────────────────────────────────────────

fn port_spec(rule: &FirewallRule) -> Option<&str> {
    rule.destination
        .port
        .as_deref()
        .filter(|spec| !spec.trim().is_empty())
}

/// Whether the destination ports of two rules can coincide.
///
/// Ports only constrain tcp, udp and tcp_udp rules; for any other protocol,
/// or when either side lists no port, the dimension is a wildcard.
pub fn ports_overlap(r1: &FirewallRule, r2: &FirewallRule) -> bool {
    if !r1.effective_protocol().uses_ports() || !r2.effective_protocol().uses_ports() {
        return true;
    }
    let (Some(spec1), Some(spec2)) = (port_spec(r1), port_spec(r2)) else {
        return true;
    };

    overlaps_with_exceptions(
        &parse_port_string(spec1),
        r1.destination.match_opposite_ports,
        &parse_port_string(spec2),
        r2.destination.match_opposite_ports,
    )
}
