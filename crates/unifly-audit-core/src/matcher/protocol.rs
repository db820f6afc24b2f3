// ── Protocol matching ──

use crate::model::{FirewallRule, Protocol};

/// Whether two protocol selectors share any traffic.
///
/// `all` overlaps everything and `tcp_udp` overlaps both of its halves.
/// Any other pair, unknown tokens included, overlaps only when equal.
pub fn protocol_pair_overlaps(a: &Protocol, b: &Protocol) -> bool {
    match (a, b) {
        (Protocol::All, _)
        | (_, Protocol::All)
        | (Protocol::TcpUdp, Protocol::Tcp | Protocol::Udp)
        | (Protocol::Tcp | Protocol::Udp, Protocol::TcpUdp) => true,
        _ => a == b,
    }
}

/// Protocol dimension of two rules, with absent protocols treated as `all`.
pub fn protocols_overlap(r1: &FirewallRule, r2: &FirewallRule) -> bool {
    protocol_pair_overlaps(r1.effective_protocol(), r2.effective_protocol())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(raw: &str) -> Protocol {
        Protocol::from(raw)
    }

    #[test]
    fn all_overlaps_everything() {
        for other in ["tcp", "udp", "icmp", "tcp_udp", "all", "gre"] {
            assert!(protocol_pair_overlaps(&p("all"), &p(other)), "all vs {other}");
            assert!(protocol_pair_overlaps(&p(other), &p("all")), "{other} vs all");
        }
    }

    #[test]
    fn tcp_udp_covers_its_halves_only() {
        assert!(protocol_pair_overlaps(&p("tcp_udp"), &p("tcp")));
        assert!(protocol_pair_overlaps(&p("udp"), &p("tcp_udp")));
        assert!(protocol_pair_overlaps(&p("tcp_udp"), &p("tcp_udp")));
        assert!(!protocol_pair_overlaps(&p("tcp_udp"), &p("icmp")));
    }

    #[test]
    fn distinct_protocols_do_not_overlap() {
        assert!(!protocol_pair_overlaps(&p("tcp"), &p("udp")));
        assert!(!protocol_pair_overlaps(&p("icmp"), &p("tcp")));
    }

    #[test]
    fn unknown_tokens_compare_literally() {
        assert!(protocol_pair_overlaps(&p("gre"), &p("gre")));
        assert!(!protocol_pair_overlaps(&p("gre"), &p("esp")));
        assert!(!protocol_pair_overlaps(&p("gre"), &p("tcp_udp")));
    }

    #[test]
    fn absent_protocol_behaves_as_all() {
        let any = FirewallRule::new("a");
        let icmp = FirewallRule::new("b").with_protocol("icmp");
        assert!(protocols_overlap(&any, &icmp));
        assert!(protocols_overlap(&icmp, &any));
    }
}
