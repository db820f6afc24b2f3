// ── Rule overlap ──
//
// Two rules overlap when some flow satisfies both of them in every
// dimension at once. Dimensions are independent, so the decision is the
// conjunction of the per-dimension predicates in `matcher`.

use serde::Serialize;

use crate::matcher::{icmp, port, protocol, target, zone};
use crate::model::FirewallRule;

/// One independent matching dimension of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
    Protocol,
    Zone,
    IcmpType,
    Port,
    Source,
    Destination,
}

impl Dimension {
    /// Every dimension, cheapest check first.
    pub const ALL: [Self; 6] = [
        Self::Protocol,
        Self::Zone,
        Self::IcmpType,
        Self::Port,
        Self::Source,
        Self::Destination,
    ];

    /// Evaluate this dimension for a pair of rules.
    pub fn overlaps(self, r1: &FirewallRule, r2: &FirewallRule) -> bool {
        match self {
            Self::Protocol => protocol::protocols_overlap(r1, r2),
            Self::Zone => zone::zones_overlap(r1, r2),
            Self::IcmpType => icmp::icmp_types_overlap(r1, r2),
            Self::Port => port::ports_overlap(r1, r2),
            Self::Source => target::sources_overlap(r1, r2),
            Self::Destination => target::destinations_overlap(r1, r2),
        }
    }
}

/// Whether any traffic can match both rules. Stops at the first dimension
/// that rules the pair out.
pub fn rules_overlap(r1: &FirewallRule, r2: &FirewallRule) -> bool {
    Dimension::ALL.iter().all(|d| d.overlaps(r1, r2))
}

// ── Per-dimension report ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionResult {
    pub dimension: Dimension,
    pub overlaps: bool,
}

/// Every dimension of a rule pair, evaluated without short-circuiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapReport {
    pub dimensions: Vec<DimensionResult>,
}

impl OverlapReport {
    pub fn between(r1: &FirewallRule, r2: &FirewallRule) -> Self {
        let dimensions = Dimension::ALL
            .iter()
            .map(|&dimension| DimensionResult {
                dimension,
                overlaps: dimension.overlaps(r1, r2),
            })
            .collect();
        Self { dimensions }
    }

    /// Same answer as [`rules_overlap`].
    pub fn overlaps(&self) -> bool {
        self.dimensions.iter().all(|d| d.overlaps)
    }

    /// Dimensions that keep the two rules apart.
    pub fn blocking(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.dimensions
            .iter()
            .filter(|d| !d.overlaps)
            .map(|d| d.dimension)
    }

    pub fn dimension(&self, dimension: Dimension) -> Option<bool> {
        self.dimensions
            .iter()
            .find(|d| d.dimension == dimension)
            .map(|d| d.overlaps)
    }
}
