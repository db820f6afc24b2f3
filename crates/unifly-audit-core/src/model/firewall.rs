// ── Firewall domain types ──
//
// Normalized rule records as produced by the snapshot parser. Every field
// that the controller may omit is optional here and resolves to a wildcard
// in the matchers, never to an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entity_id::{EntityId, MacAddress};

static ALL_PROTOCOLS: Protocol = Protocol::All;

// ── Protocol ────────────────────────────────────────────────────────

/// IP protocol selector.
///
/// Unknown controller tokens survive as [`Protocol::Other`] and only ever
/// match an identical token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Protocol {
    All,
    Tcp,
    Udp,
    TcpUdp,
    Icmp,
    Other(String),
}

impl Protocol {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::TcpUdp => "tcp_udp",
            Self::Icmp => "icmp",
            Self::Other(raw) => raw,
        }
    }

    /// Whether rules with this protocol carry a destination port.
    pub fn uses_ports(&self) -> bool {
        matches!(self, Self::Tcp | Self::Udp | Self::TcpUdp)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<String> for Protocol {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Self::All,
            "tcp" => Self::Tcp,
            "udp" => Self::Udp,
            "tcp_udp" => Self::TcpUdp,
            "icmp" => Self::Icmp,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for Protocol {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<Protocol> for String {
    fn from(p: Protocol) -> Self {
        p.as_str().to_owned()
    }
}

// ── Action ──────────────────────────────────────────────────────────

/// What a rule does with matched traffic. Only the audit pipeline reads it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RuleAction {
    #[serde(alias = "allow", alias = "accept", alias = "ACCEPT")]
    #[strum(to_string = "allow", serialize = "accept")]
    Allow,
    #[serde(alias = "block", alias = "drop", alias = "DROP")]
    #[strum(to_string = "block", serialize = "drop")]
    Block,
    #[serde(alias = "reject")]
    Reject,
}

impl RuleAction {
    /// `Block` and `Reject` both deny; they never conflict with each other.
    pub fn permits(self) -> bool {
        matches!(self, Self::Allow)
    }
}

// ── Matching target ─────────────────────────────────────────────────

/// Kind of a [`MatchTarget`], for display and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetKind {
    Any,
    Network,
    Ip,
    Client,
    Web,
}

/// What a source or destination selector matches.
///
/// Each variant carries only the list that is meaningful for it, so a
/// selector cannot consult a stale list left behind by another target type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchTarget {
    #[default]
    Any,
    Network {
        #[serde(default)]
        network_ids: Vec<String>,
        #[serde(default)]
        match_opposite: bool,
    },
    Ip {
        /// Literal addresses, CIDRs, or `a-b` ranges.
        #[serde(default)]
        ips: Vec<String>,
        #[serde(default)]
        match_opposite: bool,
    },
    Client {
        #[serde(default)]
        client_macs: Vec<MacAddress>,
    },
    Web {
        #[serde(default)]
        web_domains: Vec<String>,
    },
}

impl MatchTarget {
    pub fn networks<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Network {
            network_ids: ids.into_iter().map(Into::into).collect(),
            match_opposite: false,
        }
    }

    pub fn ips<I, S>(ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ip {
            ips: ips.into_iter().map(Into::into).collect(),
            match_opposite: false,
        }
    }

    pub fn clients<I, S>(macs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Client {
            client_macs: macs.into_iter().map(MacAddress::new).collect(),
        }
    }

    pub fn domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Web {
            web_domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    /// Flip the selector to match everything except its list.
    ///
    /// Client and web targets have no negation on the controller and are
    /// returned unchanged.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Network { network_ids, .. } => Self::Network {
                network_ids,
                match_opposite: true,
            },
            Self::Ip { ips, .. } => Self::Ip {
                ips,
                match_opposite: true,
            },
            other => other,
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Any => TargetKind::Any,
            Self::Network { .. } => TargetKind::Network,
            Self::Ip { .. } => TargetKind::Ip,
            Self::Client { .. } => TargetKind::Client,
            Self::Web { .. } => TargetKind::Web,
        }
    }

    /// Number of listed elements; zero for `Any`.
    pub fn len(&self) -> usize {
        match self {
            Self::Any => 0,
            Self::Network { network_ids, .. } => network_ids.len(),
            Self::Ip { ips, .. } => ips.len(),
            Self::Client { client_macs } => client_macs.len(),
            Self::Web { web_domains } => web_domains.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_inverted(&self) -> bool {
        match self {
            Self::Network { match_opposite, .. } | Self::Ip { match_opposite, .. } => {
                *match_opposite
            }
            _ => false,
        }
    }
}

impl fmt::Display for MatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = match self {
            Self::Any => return f.write_str("ANY"),
            Self::Network { network_ids, .. } => network_ids.join(","),
            Self::Ip { ips, .. } => ips.join(","),
            Self::Client { client_macs } => client_macs
                .iter()
                .map(MacAddress::as_str)
                .collect::<Vec<_>>()
                .join(","),
            Self::Web { web_domains } => web_domains.join(","),
        };
        let negation = if self.is_inverted() { "!" } else { "" };
        write!(f, "{}{negation}[{list}]", self.kind())
    }
}

// ── Selectors ───────────────────────────────────────────────────────

/// Source side of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub target: MatchTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
}

/// Destination side of a rule. Ports live here, never on the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(default)]
    pub target: MatchTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    /// Comma-separated ports and `low-high` ranges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default)]
    pub match_opposite_ports: bool,
}

// ── Rule ────────────────────────────────────────────────────────────

/// One normalized firewall rule.
///
/// `name`, `index`, `action` and `enabled` are read by the audit pipeline
/// only; overlap and scope analysis look at the selectors alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub destination: Destination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_typename: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl FirewallRule {
    /// An enabled rule that matches everything.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            index: None,
            action: None,
            enabled: true,
            protocol: None,
            source: Source::default(),
            destination: Destination::default(),
            icmp_typename: None,
        }
    }

    /// Protocol with absence resolved to `all`.
    pub fn effective_protocol(&self) -> &Protocol {
        self.protocol.as_ref().unwrap_or(&ALL_PROTOCOLS)
    }

    /// Name for reports, falling back to the id.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<Protocol>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, target: MatchTarget) -> Self {
        self.source.target = target;
        self
    }

    #[must_use]
    pub fn with_destination(mut self, target: MatchTarget) -> Self {
        self.destination.target = target;
        self
    }

    #[must_use]
    pub fn with_source_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.source.zone_id = Some(zone_id.into());
        self
    }

    #[must_use]
    pub fn with_destination_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.destination.zone_id = Some(zone_id.into());
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.destination.port = Some(port.into());
        self
    }

    #[must_use]
    pub fn with_opposite_ports(mut self) -> Self {
        self.destination.match_opposite_ports = true;
        self
    }

    #[must_use]
    pub fn with_icmp_typename(mut self, typename: impl Into<String>) -> Self {
        self.icmp_typename = Some(typename.into());
        self
    }
}
