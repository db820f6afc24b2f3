// ── Firewall zone matching ──

use crate::model::FirewallRule;

/// Absent or blank on either side means "any zone".
fn zone_pair_overlaps(a: Option<&str>, b: Option<&str>) -> bool {
    fn present(zone: Option<&str>) -> Option<&str> {
        zone.map(str::trim).filter(|z| !z.is_empty())
    }
    match (present(a), present(b)) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Source zones and destination zones must both be compatible.
pub fn zones_overlap(r1: &FirewallRule, r2: &FirewallRule) -> bool {
    zone_pair_overlaps(r1.source.zone_id.as_deref(), r2.source.zone_id.as_deref())
        && zone_pair_overlaps(
            r1.destination.zone_id.as_deref(),
            r2.destination.zone_id.as_deref(),
        )
}
