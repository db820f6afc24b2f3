//! Per-dimension overlap predicates.
//!
//! Each submodule answers one question about a pair of rules: could any flow
//! satisfy both rules' selectors in this dimension? The answers are combined
//! by [`crate::overlap`]. All predicates are pure and symmetric.
//!
//! Network ids, IP lists and port lists share the match-opposite semantics
//! implemented once by [`overlaps_with_exceptions`].

pub mod cidr;
pub mod domain;
pub mod icmp;
pub mod port;
pub mod protocol;
pub mod target;
pub mod zone;

use std::collections::BTreeSet;

use crate::model::MacAddress;

// ── Exception sets ──────────────────────────────────────────────────

/// A listed selector value set, as seen by the exception-set routine.
pub trait ValueSet {
    type Item: ?Sized;

    fn items(&self) -> impl Iterator<Item = &Self::Item>;

    /// Some member shares at least one address, port or id with `item`.
    fn intersects(&self, item: &Self::Item) -> bool;

    /// Every address, port or id of `item` is listed here.
    fn covers(&self, item: &Self::Item) -> bool {
        self.intersects(item)
    }
}

/// Decide whether two listed selectors overlap, honoring match-opposite flags.
///
/// An inverted list matches the universe minus its members. Two inverted
/// lists are always considered overlapping: their complements only fail to
/// meet when the lists together cover the whole space, which is not checked.
pub fn overlaps_with_exceptions<A, B>(a: &A, a_inverted: bool, b: &B, b_inverted: bool) -> bool
where
    A: ValueSet + ?Sized,
    B: ValueSet<Item = A::Item> + ?Sized,
{
    match (a_inverted, b_inverted) {
        (false, false) => a.items().any(|item| b.intersects(item)),
        (false, true) => a.items().any(|item| !b.covers(item)),
        (true, false) => b.items().any(|item| !a.covers(item)),
        (true, true) => true,
    }
}

impl ValueSet for [String] {
    type Item = str;

    fn items(&self) -> impl Iterator<Item = &str> {
        self.iter().map(String::as_str)
    }

    fn intersects(&self, item: &str) -> bool {
        self.iter().any(|member| member == item)
    }
}

impl ValueSet for [MacAddress] {
    type Item = MacAddress;

    fn items(&self) -> impl Iterator<Item = &MacAddress> {
        self.iter()
    }

    fn intersects(&self, item: &MacAddress) -> bool {
        self.contains(item)
    }
}

impl ValueSet for BTreeSet<u16> {
    type Item = u16;

    fn items(&self) -> impl Iterator<Item = &u16> {
        self.iter()
    }

    fn intersects(&self, item: &u16) -> bool {
        self.contains(item)
    }
}
