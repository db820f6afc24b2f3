//! Whole-rule overlap scenarios and generated-rule properties.
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use unifly_audit_core::{
    Dimension, FirewallRule, MatchTarget, OverlapReport, destinations_overlap, icmp_types_overlap,
    is_narrower_scope, ports_overlap, protocols_overlap, rules_overlap, sources_overlap,
    zones_overlap,
};

// ── Scenarios ───────────────────────────────────────────────────────

fn ip_source(ips: &[&str], inverted: bool) -> FirewallRule {
    let target = MatchTarget::ips(ips.iter().copied());
    let target = if inverted { target.opposite() } else { target };
    FirewallRule::new("ip").with_source(target)
}

#[test]
fn broad_allow_overlaps_specific_deny_and_is_wider() {
    let allow_all = FirewallRule::new("allow-all").with_protocol("all");
    let deny_ssh = FirewallRule::new("deny-ssh")
        .with_protocol("tcp")
        .with_source(MatchTarget::networks(["guest"]))
        .with_destination(MatchTarget::networks(["corporate"]))
        .with_port("22");

    assert!(rules_overlap(&allow_all, &deny_ssh));
    assert!(is_narrower_scope(&deny_ssh, &allow_all));
}

#[test]
fn destination_zone_alone_separates_rules() {
    let base = FirewallRule::new("a")
        .with_protocol("tcp")
        .with_source(MatchTarget::networks(["lan"]))
        .with_port("443");
    let a = base.clone().with_destination_zone("zone-e0fa");
    let b = base.with_destination_zone("zone-e0fb");

    assert!(!rules_overlap(&a, &b));
    let report = OverlapReport::between(&a, &b);
    assert_eq!(report.blocking().collect::<Vec<_>>(), vec![Dimension::Zone]);
}

#[test]
fn excepted_ips_do_not_overlap() {
    let rule1 = ip_source(&["192.168.1.10", "192.168.1.20"], false);
    let rule2 = ip_source(&["192.168.1.10", "192.168.1.20", "192.168.1.30"], true);
    assert!(!sources_overlap(&rule1, &rule2));
    assert!(!sources_overlap(&rule2, &rule1));
}

#[test]
fn unexcepted_ips_overlap() {
    let rule1 = ip_source(&["192.168.1.10", "192.168.1.20"], false);
    let rule2 = ip_source(&["192.168.1.30", "192.168.1.40"], true);
    assert!(sources_overlap(&rule1, &rule2));
}

#[test]
fn doubly_inverted_disjoint_lists_overlap() {
    let rule1 = ip_source(&["192.168.1.10"], true);
    let rule2 = ip_source(&["192.168.1.20"], true);
    assert!(sources_overlap(&rule1, &rule2));
}

#[test]
fn icmp_rules_with_different_types_are_disjoint() {
    let echo = FirewallRule::new("echo")
        .with_protocol("icmp")
        .with_icmp_typename("echo-request");
    let redirect = FirewallRule::new("redirect")
        .with_protocol("icmp")
        .with_icmp_typename("redirect");
    assert!(!rules_overlap(&echo, &redirect));
}

#[test]
fn web_destination_never_meets_ip_destination() {
    let web = FirewallRule::new("web").with_destination(MatchTarget::domains(["example.com"]));
    let ip = FirewallRule::new("ip").with_destination(MatchTarget::ips(["93.184.216.34"]));
    assert!(!rules_overlap(&web, &ip));
}

// ── Generated rules ─────────────────────────────────────────────────

fn arb_target() -> impl Strategy<Value = MatchTarget> {
    let networks = prop::collection::vec(
        prop_oneof![Just("lan"), Just("iot"), Just("guest")],
        0..3,
    );
    let ips = prop::collection::vec(
        prop_oneof![
            Just("10.0.0.1"),
            Just("10.0.0.0/24"),
            Just("10.0.0.0/8"),
            Just("192.168.1.5"),
            Just("10.0.0.1-10.0.0.9"),
        ],
        0..3,
    );
    let macs = prop::collection::vec(
        prop_oneof![Just("AA:BB:CC:DD:EE:FF"), Just("aa:bb:cc:00:11:22")],
        0..3,
    );
    let domains = prop::collection::vec(
        prop_oneof![Just("example.com"), Just("api.example.com"), Just("notexample.com")],
        0..3,
    );

    prop_oneof![
        Just(MatchTarget::Any),
        (networks, any::<bool>()).prop_map(|(ids, inverted)| {
            let target = MatchTarget::networks(ids);
            if inverted { target.opposite() } else { target }
        }),
        (ips, any::<bool>()).prop_map(|(ips, inverted)| {
            let target = MatchTarget::ips(ips);
            if inverted { target.opposite() } else { target }
        }),
        macs.prop_map(MatchTarget::clients),
        domains.prop_map(MatchTarget::domains),
    ]
}

prop_compose! {
    fn arb_rule()(
        protocol in proptest::option::of(prop_oneof![
            Just("all"), Just("tcp"), Just("udp"), Just("tcp_udp"), Just("icmp"), Just("gre"),
        ]),
        source in arb_target(),
        destination in arb_target(),
        port in proptest::option::of(prop_oneof![
            Just("22"), Just("80,443"), Just("1000-2000"), Just("443, 8443"),
        ]),
        opposite_ports in any::<bool>(),
        icmp in proptest::option::of(prop_oneof![
            Just("ANY"), Just("echo-request"), Just("echo-reply"),
        ]),
        src_zone in proptest::option::of(prop_oneof![Just("internal"), Just("dmz")]),
        dst_zone in proptest::option::of(prop_oneof![Just("external"), Just("dmz")]),
    ) -> FirewallRule {
        let mut rule = FirewallRule::new("generated")
            .with_source(source)
            .with_destination(destination);
        rule.protocol = protocol.map(Into::into);
        rule.destination.port = port.map(Into::into);
        rule.destination.match_opposite_ports = opposite_ports;
        rule.icmp_typename = icmp.map(Into::into);
        rule.source.zone_id = src_zone.map(Into::into);
        rule.destination.zone_id = dst_zone.map(Into::into);
        rule
    }
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in arb_rule(), b in arb_rule()) {
        prop_assert_eq!(rules_overlap(&a, &b), rules_overlap(&b, &a));
        prop_assert_eq!(protocols_overlap(&a, &b), protocols_overlap(&b, &a));
        prop_assert_eq!(sources_overlap(&a, &b), sources_overlap(&b, &a));
        prop_assert_eq!(destinations_overlap(&a, &b), destinations_overlap(&b, &a));
        prop_assert_eq!(ports_overlap(&a, &b), ports_overlap(&b, &a));
        prop_assert_eq!(icmp_types_overlap(&a, &b), icmp_types_overlap(&b, &a));
        prop_assert_eq!(zones_overlap(&a, &b), zones_overlap(&b, &a));
    }

    #[test]
    fn wildcard_rule_overlaps_everything(rule in arb_rule()) {
        let wildcard = FirewallRule::new("wildcard");
        prop_assert!(rules_overlap(&wildcard, &rule));
    }

    #[test]
    fn report_agrees_with_short_circuit(a in arb_rule(), b in arb_rule()) {
        prop_assert_eq!(OverlapReport::between(&a, &b).overlaps(), rules_overlap(&a, &b));
    }

    #[test]
    fn overlap_is_deterministic(a in arb_rule(), b in arb_rule()) {
        prop_assert_eq!(rules_overlap(&a, &b), rules_overlap(&a.clone(), &b.clone()));
    }

    #[test]
    fn narrower_is_irreflexive_and_asymmetric(a in arb_rule(), b in arb_rule()) {
        prop_assert!(!is_narrower_scope(&a, &a));
        prop_assert!(!(is_narrower_scope(&a, &b) && is_narrower_scope(&b, &a)));
    }
}

// ── Concurrency ─────────────────────────────────────────────────────

#[test]
fn rules_can_be_compared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FirewallRule>();

    let rules: Vec<FirewallRule> = (0..8)
        .map(|i| {
            FirewallRule::new(format!("rule-{i}"))
                .with_protocol(if i % 2 == 0 { "tcp" } else { "udp" })
                .with_port(format!("{}", 1000 + i))
        })
        .collect();

    let sequential: Vec<bool> = rules
        .iter()
        .flat_map(|a| rules.iter().map(move |b| rules_overlap(a, b)))
        .collect();

    let shared = &rules;
    let parallel: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = shared
            .iter()
            .map(|a| {
                scope.spawn(move || {
                    shared
                        .iter()
                        .map(|b| rules_overlap(a, b))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    assert_eq!(sequential, parallel);
}
