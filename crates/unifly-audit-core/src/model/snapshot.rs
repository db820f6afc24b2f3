// ── Rule snapshots ──
//
// A snapshot is the normalized rule list of one site, serialized by the
// upstream parser. Loading validates what the matchers would otherwise
// silently tolerate: duplicate ids and malformed port specs.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entity_id::EntityId;
use super::firewall::FirewallRule;
use crate::error::CoreError;
use crate::matcher::port::PortSpec;

/// On-disk encoding of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SnapshotFormat {
    Json,
    Yaml,
    Toml,
}

impl SnapshotFormat {
    /// Pick a format from the file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default)]
    pub rules: Vec<FirewallRule>,
}

impl Snapshot {
    pub fn new(rules: Vec<FirewallRule>) -> Self {
        Self { site: None, rules }
    }

    /// Read, parse and validate a snapshot file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let format = SnapshotFormat::from_path(path);
        let raw = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), %format, bytes = raw.len(), "loading snapshot");
        Self::parse(&raw, format)
    }

    /// Parse and validate snapshot text.
    pub fn parse(raw: &str, format: SnapshotFormat) -> Result<Self, CoreError> {
        let snapshot: Self = match format {
            SnapshotFormat::Json => serde_json::from_str(raw)?,
            SnapshotFormat::Yaml => serde_yaml::from_str(raw)?,
            SnapshotFormat::Toml => toml::from_str(raw)?,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject duplicate ids and port specs the lenient matcher would skip.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen: HashSet<&EntityId> = HashSet::with_capacity(self.rules.len());
        for rule in &self.rules {
            if !seen.insert(&rule.id) {
                return Err(CoreError::DuplicateRule {
                    id: rule.id.to_string(),
                });
            }
            if let Some(port) = rule.destination.port.as_deref().filter(|p| !p.trim().is_empty()) {
                port.parse::<PortSpec>()
                    .map_err(|err| CoreError::InvalidRule {
                        rule: rule.id.to_string(),
                        reason: err.to_string(),
                    })?;
            }
        }
        Ok(())
    }

    /// Look a rule up by id.
    pub fn rule(&self, id: &str) -> Result<&FirewallRule, CoreError> {
        self.rules
            .iter()
            .find(|rule| rule.id.matches(id))
            .ok_or_else(|| CoreError::RuleNotFound { id: id.to_owned() })
    }
}
