// ── Domain model ──

pub mod entity_id;
pub mod firewall;
pub mod snapshot;

pub use entity_id::{EntityId, MacAddress};
pub use firewall::{
    Destination, FirewallRule, MatchTarget, Protocol, RuleAction, Source, TargetKind,
};
pub use snapshot::{Snapshot, SnapshotFormat};
