// ── Identity types ──
//
// Rule identifiers come from two generations of controller APIs: UUIDs from
// the policy-based zone firewall and MongoDB ObjectIds from the legacy rule
// tables. MAC addresses arrive in whatever case and separator the controller
// happened to store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use uuid::Uuid;

// ── EntityId ────────────────────────────────────────────────────────

/// Opaque identifier of a firewall rule.
///
/// Parsed as a UUID when possible so that differently-cased or unhyphenated
/// spellings of the same policy id compare equal. The text is always kept as
/// it arrived, and that is what `Display` and serialization produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityId {
    Uuid { uuid: Uuid, raw: String },
    Legacy(String),
}

impl EntityId {
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid { uuid, .. } => Some(uuid),
            Self::Legacy(_) => None,
        }
    }

    pub fn as_legacy(&self) -> Option<&str> {
        match self {
            Self::Legacy(s) => Some(s),
            Self::Uuid { .. } => None,
        }
    }

    /// The identifier exactly as the snapshot spelled it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uuid { raw, .. } | Self::Legacy(raw) => raw,
        }
    }

    /// True when `raw` names this entity, in any UUID spelling.
    pub fn matches(&self, raw: &str) -> bool {
        *self == Self::from(raw)
    }
}

// Equality and hashing look at the parsed UUID, never its spelling.
impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Uuid { uuid: a, .. }, Self::Uuid { uuid: b, .. }) => a == b,
            (Self::Legacy(a), Self::Legacy(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Uuid { uuid, .. } => uuid.hash(state),
            Self::Legacy(s) => s.hash(state),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self::Uuid {
            uuid,
            raw: uuid.to_string(),
        }
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        match Uuid::parse_str(&raw) {
            Ok(uuid) => Self::Uuid { uuid, raw },
            Err(_) => Self::Legacy(raw),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        match id {
            EntityId::Uuid { raw, .. } | EntityId::Legacy(raw) => raw,
        }
    }
}

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
///
/// Normalization happens on construction and on deserialization, so plain
/// `==` is the case-insensitive comparison client selectors need.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Accepts colon-separated or dash-separated input in any case.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().trim().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for MacAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MacAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn policy_id_parses_as_uuid() {
        let id = EntityId::from("550e8400-e29b-41d4-a716-446655440000");
        assert!(id.as_uuid().is_some());
    }

    #[test]
    fn legacy_rule_id_is_kept_verbatim() {
        let id = EntityId::from("507f1f77bcf86cd799439011");
        assert_eq!(id.as_legacy(), Some("507f1f77bcf86cd799439011"));
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn uuid_match_ignores_case() {
        let id = EntityId::from("550e8400-e29b-41d4-a716-446655440000");
        assert!(id.matches("550E8400-E29B-41D4-A716-446655440000"));
        assert!(!id.matches("550e8400-e29b-41d4-a716-446655440001"));
    }

    #[test]
    fn uuid_spelling_survives_display_and_serde() {
        for raw in [
            "550E8400-E29B-41D4-A716-446655440000",
            "550E8400E29B41D4A716446655440000",
        ] {
            let id = EntityId::from(raw);
            assert!(id.as_uuid().is_some());
            assert_eq!(id.to_string(), raw);
            assert_eq!(id.as_str(), raw);

            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{raw}\""));
            let back: EntityId = serde_json::from_str(&json).unwrap();
            assert_eq!(back.to_string(), raw);
        }
    }

    #[test]
    fn uuid_spellings_compare_and_hash_equal() {
        use std::collections::HashSet;

        let upper = EntityId::from("550E8400E29B41D4A716446655440000");
        let canonical = EntityId::from("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(upper, canonical);

        let set: HashSet<EntityId> = [upper, canonical].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn entity_id_deserializes_from_plain_string() {
        let id: EntityId = serde_json::from_str("\"allow-dns\"").unwrap();
        assert_eq!(id, EntityId::Legacy("allow-dns".into()));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"allow-dns\"");
    }

    #[test]
    fn mac_address_normalizes_dashes_and_case() {
        let mac = MacAddress::new("AA-BB-CC-DD-EE-FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(mac, MacAddress::new("aa:bb:cc:dd:ee:ff"));
    }

    #[test]
    fn mac_address_normalizes_on_deserialize() {
        let mac: MacAddress = serde_json::from_str("\"AA:BB:CC:00:11:22\"").unwrap();
        assert_eq!(mac.as_str(), "aa:bb:cc:00:11:22");
    }
}
