//! Firewall rule overlap and scope analysis for UniFi configuration snapshots.
//!
//! This crate owns the rule model and the analysis engine behind the
//! `unifly-audit` CLI:
//!
//! - **Domain model** ([`model`]): normalized [`FirewallRule`] records whose
//!   source and destination selectors are a tagged [`MatchTarget`]
//!   (`Any | Network | Ip | Client | Web`), plus [`Snapshot`] loading and
//!   validation for JSON, YAML and TOML files.
//!
//! - **Selector matchers** ([`matcher`]): one pure predicate per matching
//!   dimension: protocol, source/destination target, destination port, ICMP
//!   type and firewall zone, with CIDR and domain-suffix helpers underneath.
//!   Match-opposite lists share a single exception-set routine.
//!
//! - **[`rules_overlap`]**: conjunction of every dimension; true when some
//!   flow could match both rules. [`OverlapReport`] gives the same answer
//!   broken down per dimension.
//!
//! - **[`is_narrower_scope`]**: breadth heuristic used to decide which of two
//!   overlapping rules is the specific one.
//!
//! - **[`audit()`]**: ordered pairwise comparison of a rule list producing
//!   shadowed / conflicting / redundant rule [`Finding`]s.
//!
//! Every analysis function is synchronous and side-effect free; rule pairs
//! can be compared from any number of threads.

pub mod audit;
pub mod error;
pub mod matcher;
pub mod model;
pub mod overlap;
pub mod scope;

// ── Primary re-exports ──────────────────────────────────────────────
pub use audit::{
    AuditOptions, AuditReport, Finding, FindingKind, Severity, audit, evaluation_order,
};
pub use error::CoreError;
pub use overlap::{Dimension, DimensionResult, OverlapReport, rules_overlap};
pub use scope::{ScopeScore, is_narrower_scope, scope_score};

pub use matcher::cidr::{ip_matches_cidr, ip_ranges_overlap};
pub use matcher::domain::domains_overlap;
pub use matcher::icmp::icmp_types_overlap;
pub use matcher::port::{PortSpec, parse_port_string, ports_overlap};
pub use matcher::protocol::protocols_overlap;
pub use matcher::target::{destinations_overlap, sources_overlap};
pub use matcher::zone::zones_overlap;

pub use model::{
    Destination, EntityId, FirewallRule, MacAddress, MatchTarget, Protocol, RuleAction, Snapshot,
    SnapshotFormat, Source, TargetKind,
};
