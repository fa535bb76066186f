use std::collections::BTreeMap;

use proptest::prelude::*;

use meshmap_store::{DeviceMetrics, Identity, MapReport, Neighbor, Node, NodeDb, Position};
use meshmap_types::{NodeNum, PruneTtls, Timestamp, NEIGHBOR_LIMIT, SEEN_BY_LIMIT};

const NOW: u64 = 1_000_000;

fn stamp() -> impl Strategy<Value = Timestamp> {
    (NOW - 100_000..=NOW).prop_map(Timestamp::new)
}

fn arb_node() -> impl Strategy<Value = Node> {
    (
        prop::collection::btree_map("[a-z]{1,6}", stamp(), 0..25),
        prop::collection::btree_map(1u32..500, (stamp(), -20.0f32..20.0), 0..160),
        prop::option::of(stamp()),
        prop::option::of(stamp()),
        "[A-Za-z ]{0,8}",
        (-900_000_000i32..900_000_000, -1_800_000_000i32..1_800_000_000),
    )
        .prop_map(|(seen_by, neighbors, device, report, long_name, (lat, lon))| {
            let neighbors: BTreeMap<NodeNum, Neighbor> = neighbors
                .into_iter()
                .map(|(num, (updated, snr))| (NodeNum::new(num), Neighbor { snr, updated }))
                .collect();
            Node {
                identity: Identity {
                    long_name,
                    ..Identity::default()
                },
                position: Position {
                    latitude: lat,
                    longitude: lon,
                    ..Position::default()
                },
                device_metrics: DeviceMetrics {
                    battery_level: 50,
                    last_device_metrics: device,
                    ..DeviceMetrics::default()
                },
                map_report: MapReport {
                    region: "US".into(),
                    last_map_report: report,
                    ..MapReport::default()
                },
                neighbors: (!neighbors.is_empty()).then_some(neighbors),
                seen_by,
                ..Node::default()
            }
        })
}

proptest! {
    /// After pruning, the bounded collections respect their caps.
    #[test]
    fn prune_enforces_caps(mut node in arb_node()) {
        node.prune(&PruneTtls::default(), Timestamp::new(NOW));
        prop_assert!(node.seen_by.len() <= SEEN_BY_LIMIT);
        let neighbors = node.neighbors.as_ref().map_or(0, BTreeMap::len);
        prop_assert!(neighbors <= NEIGHBOR_LIMIT);
        prop_assert!(node.neighbors.as_ref().map_or(true, |n| !n.is_empty()));
    }

    /// Pruning twice at the same instant changes nothing the second time.
    #[test]
    fn prune_is_idempotent(node in arb_node(), ttl in 0u64..200_000) {
        let ttls = PruneTtls {
            seen_by_secs: ttl,
            neighbor_secs: ttl / 2,
            device_metrics_secs: ttl / 3,
            environment_metrics_secs: ttl / 3,
            map_report_secs: ttl,
        };
        let now = Timestamp::new(NOW);
        let mut once = node;
        once.prune(&ttls, now);
        let mut twice = once.clone();
        twice.prune(&ttls, now);
        prop_assert_eq!(once, twice);
    }

    /// Surviving entries are exactly the newest ones that have not expired.
    #[test]
    fn prune_keeps_newest_seen_by(node in arb_node(), ttl in 0u64..200_000) {
        let ttls = PruneTtls { seen_by_secs: ttl, ..PruneTtls::default() };
        let now = Timestamp::new(NOW);
        let fresh: Vec<Timestamp> = node
            .seen_by
            .values()
            .copied()
            .filter(|t| !t.is_older_than(ttl, now))
            .collect();
        let mut pruned = node;
        pruned.prune(&ttls, now);

        prop_assert_eq!(pruned.seen_by.len(), fresh.len().min(SEEN_BY_LIMIT));
        let mut sorted = fresh;
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        if let Some(cutoff) = sorted.get(SEEN_BY_LIMIT.saturating_sub(1)) {
            prop_assert!(pruned.seen_by.values().all(|t| t >= cutoff));
        }
    }

    /// Nodes whose relays all expire are removed from the table.
    #[test]
    fn forgotten_nodes_leave_the_table(
        nodes in prop::collection::vec(arb_node(), 0..12),
        ttl in 0u64..200_000,
    ) {
        let ttls = PruneTtls { seen_by_secs: ttl, ..PruneTtls::default() };
        let now = Timestamp::new(NOW);
        let mut db: NodeDb = nodes
            .into_iter()
            .enumerate()
            .map(|(i, n)| (NodeNum::new(i as u32 + 1), n))
            .collect();
        let before = db.len();
        let summary = db.prune(&ttls, now);
        prop_assert_eq!(summary.remaining + summary.removed, before);
        prop_assert_eq!(summary.remaining, db.len());
        prop_assert!(db.iter().all(|(_, n)| !n.seen_by.is_empty()));
    }

    /// Validity is exactly: seen by someone, named, and placed.
    #[test]
    fn validity_predicate(node in arb_node()) {
        let expected = !node.seen_by.is_empty()
            && !node.identity.long_name.is_empty()
            && (node.position.latitude != 0 || node.position.longitude != 0);
        prop_assert_eq!(node.is_valid(), expected);
    }

    /// The exported subset only ever contains valid nodes.
    #[test]
    fn valid_subset_is_valid(nodes in prop::collection::vec(arb_node(), 0..12)) {
        let db: NodeDb = nodes
            .into_iter()
            .enumerate()
            .map(|(i, n)| (NodeNum::new(i as u32 + 1), n))
            .collect();
        let valid = db.valid();
        prop_assert!(valid.iter().all(|(_, n)| n.is_valid()));
        prop_assert_eq!(
            valid.len(),
            db.iter().filter(|(_, n)| n.is_valid()).count()
        );
    }
}
