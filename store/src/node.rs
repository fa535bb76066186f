//! A tracked mesh participant and its independently aging attribute groups.
//!
//! The record serializes to the flat camelCase object of the snapshot file.
//! Zero-valued optional fields are omitted; identity, coordinates and
//! `seenBy` are always written.

use std::collections::BTreeMap;

use meshmap_types::{NodeNum, PruneTtls, Timestamp, NEIGHBOR_LIMIT, SEEN_BY_LIMIT};
use serde::{Deserialize, Serialize};

/// Replace non-finite readings with zero and keep three decimal places.
pub fn clean_float(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    ((f64::from(value) * 1000.0).round() / 1000.0) as f32
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn is_zero_f32(v: &f32) -> bool {
    *v == 0.0
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Who the node says it is. Never expires; overwritten by newer reports.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identity {
    pub long_name: String,
    pub short_name: String,
    pub hw_model: String,
    pub role: String,
}

/// Last reported location. Coordinates are degrees × 1e7.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub latitude: i32,
    pub longitude: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub altitude: i32,
    /// Significant bits kept in the coordinates.
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub precision: u32,
}

impl Position {
    /// `(0, 0)` is what a radio without a fix reports.
    pub fn is_unset(&self) -> bool {
        self.latitude == 0 && self.longitude == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceMetrics {
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub battery_level: u32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub voltage: f32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub ch_util: f32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub air_util_tx: f32,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub uptime: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_device_metrics: Option<Timestamp>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentMetrics {
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub temperature: f32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub relative_humidity: f32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub barometric_pressure: f32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub lux: f32,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub wind_direction: u32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub wind_speed: f32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub wind_gust: f32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub radiation: f32,
    #[serde(rename = "rainfall1", skip_serializing_if = "is_zero_f32")]
    pub rainfall_1h: f32,
    #[serde(rename = "rainfall24", skip_serializing_if = "is_zero_f32")]
    pub rainfall_24h: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_environment_metrics: Option<Timestamp>,
}

/// Gateway details that only arrive in map reports.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapReport {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fw_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub modem_preset: String,
    #[serde(skip_serializing_if = "is_false")]
    pub has_default_ch: bool,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub online_local_nodes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_map_report: Option<Timestamp>,
}

/// A directly heard neighbor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    #[serde(default, skip_serializing_if = "is_zero_f32")]
    pub snr: f32,
    pub updated: Timestamp,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(flatten)]
    pub map_report: MapReport,
    #[serde(flatten)]
    pub position: Position,
    #[serde(flatten)]
    pub device_metrics: DeviceMetrics,
    #[serde(flatten)]
    pub environment_metrics: EnvironmentMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbors: Option<BTreeMap<NodeNum, Neighbor>>,
    /// Relay topic → last time a report of this node arrived through it.
    #[serde(default)]
    pub seen_by: BTreeMap<String, Timestamp>,
}

impl Node {
    /// A node first heard through `topic` at `now`.
    pub fn new(topic: &str, now: Timestamp) -> Self {
        Self {
            seen_by: BTreeMap::from([(topic.to_string(), now)]),
            ..Self::default()
        }
    }

    pub fn update_user(&mut self, identity: Identity) {
        self.identity = identity;
    }

    pub fn update_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn update_device_metrics(&mut self, metrics: DeviceMetrics, now: Timestamp) {
        self.device_metrics = DeviceMetrics {
            voltage: clean_float(metrics.voltage),
            ch_util: clean_float(metrics.ch_util),
            air_util_tx: clean_float(metrics.air_util_tx),
            last_device_metrics: Some(now),
            ..metrics
        };
    }

    pub fn update_environment_metrics(&mut self, metrics: EnvironmentMetrics, now: Timestamp) {
        self.environment_metrics = EnvironmentMetrics {
            temperature: clean_float(metrics.temperature),
            relative_humidity: clean_float(metrics.relative_humidity),
            barometric_pressure: clean_float(metrics.barometric_pressure),
            lux: clean_float(metrics.lux),
            wind_direction: metrics.wind_direction,
            wind_speed: clean_float(metrics.wind_speed),
            wind_gust: clean_float(metrics.wind_gust),
            radiation: clean_float(metrics.radiation),
            rainfall_1h: clean_float(metrics.rainfall_1h),
            rainfall_24h: clean_float(metrics.rainfall_24h),
            last_environment_metrics: Some(now),
        };
    }

    pub fn update_map_report(&mut self, report: MapReport, now: Timestamp) {
        self.map_report = MapReport {
            last_map_report: Some(now),
            ..report
        };
    }

    pub fn update_neighbor(&mut self, neighbor: NodeNum, snr: f32, now: Timestamp) {
        self.neighbors.get_or_insert_with(BTreeMap::new).insert(
            neighbor,
            Neighbor {
                snr: clean_float(snr),
                updated: now,
            },
        );
    }

    pub fn touch_seen_by(&mut self, topic: &str, now: Timestamp) {
        self.seen_by.insert(topic.to_string(), now);
    }

    /// Whether the node is complete enough to export.
    pub fn is_valid(&self) -> bool {
        !self.seen_by.is_empty()
            && !self.identity.long_name.is_empty()
            && !self.position.is_unset()
    }

    /// Whether pruning left no relay observation behind.
    pub fn is_forgotten(&self) -> bool {
        self.seen_by.is_empty()
    }

    /// Drop expired observations, enforce the size caps, and clear whole
    /// groups whose stamp has expired.
    pub fn prune(&mut self, ttls: &PruneTtls, now: Timestamp) {
        self.seen_by
            .retain(|_, seen| !seen.is_older_than(ttls.seen_by_secs, now));
        evict_oldest(&mut self.seen_by, SEEN_BY_LIMIT, |seen| *seen);

        if let Some(neighbors) = &mut self.neighbors {
            neighbors.retain(|_, n| !n.updated.is_older_than(ttls.neighbor_secs, now));
            if neighbors.is_empty() {
                self.neighbors = None;
            } else {
                evict_oldest(neighbors, NEIGHBOR_LIMIT, |n| n.updated);
            }
        }

        if expired(
            self.device_metrics.last_device_metrics,
            ttls.device_metrics_secs,
            now,
        ) {
            self.device_metrics = DeviceMetrics::default();
        }
        if expired(
            self.environment_metrics.last_environment_metrics,
            ttls.environment_metrics_secs,
            now,
        ) {
            self.environment_metrics = EnvironmentMetrics::default();
        }
        if expired(self.map_report.last_map_report, ttls.map_report_secs, now) {
            self.map_report = MapReport::default();
        }
    }
}

fn expired(stamp: Option<Timestamp>, ttl_secs: u64, now: Timestamp) -> bool {
    stamp.is_some_and(|t| t.is_older_than(ttl_secs, now))
}

/// Remove the oldest entries until at most `limit` remain. Equal stamps are
/// evicted in key order.
fn evict_oldest<K, V>(map: &mut BTreeMap<K, V>, limit: usize, stamp: impl Fn(&V) -> Timestamp)
where
    K: Ord + Clone,
{
    let excess = map.len().saturating_sub(limit);
    if excess == 0 {
        return;
    }
    let mut by_age: Vec<(Timestamp, K)> = map.iter().map(|(k, v)| (stamp(v), k.clone())).collect();
    by_age.sort_by_key(|(t, _)| *t);
    for (_, key) in by_age.into_iter().take(excess) {
        map.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPIC: &str = "msh/US/2/map/";

    fn t(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn valid_node() -> Node {
        let mut node = Node::new(TOPIC, t(1_000));
        node.update_user(Identity {
            long_name: "Base Camp".into(),
            short_name: "BC".into(),
            hw_model: "TBEAM".into(),
            role: "ROUTER".into(),
        });
        node.update_position(Position {
            latitude: 377_749_000,
            longitude: -1_224_194_000,
            altitude: 12,
            precision: 16,
        });
        node
    }

    #[test]
    fn clean_float_rounds_and_sanitizes() {
        assert_eq!(clean_float(3.14159), 3.142);
        assert_eq!(clean_float(-2.71828), -2.718);
        assert_eq!(clean_float(f32::NAN), 0.0);
        assert_eq!(clean_float(f32::INFINITY), 0.0);
        assert_eq!(clean_float(f32::NEG_INFINITY), 0.0);
        assert_eq!(clean_float(12.0), 12.0);
    }

    #[test]
    fn new_node_is_seen_by_its_topic() {
        let node = Node::new(TOPIC, t(5));
        assert_eq!(node.seen_by.get(TOPIC), Some(&t(5)));
        assert!(!node.is_valid());
    }

    #[test]
    fn validity_needs_name_position_and_relay() {
        let node = valid_node();
        assert!(node.is_valid());

        let mut unnamed = node.clone();
        unnamed.identity.long_name.clear();
        assert!(!unnamed.is_valid());

        let mut unplaced = node.clone();
        unplaced.position = Position::default();
        assert!(!unplaced.is_valid());

        let mut on_equator = node.clone();
        on_equator.position.latitude = 0;
        assert!(on_equator.is_valid());

        let mut unseen = node;
        unseen.seen_by.clear();
        assert!(!unseen.is_valid());
    }

    #[test]
    fn device_metrics_are_cleaned_and_stamped() {
        let mut node = Node::new(TOPIC, t(0));
        node.update_device_metrics(
            DeviceMetrics {
                battery_level: 87,
                voltage: 4.123_456,
                ch_util: f32::NAN,
                air_util_tx: 1.000_4,
                uptime: 3_600,
                last_device_metrics: None,
            },
            t(42),
        );
        let m = &node.device_metrics;
        assert_eq!(m.battery_level, 87);
        assert_eq!(m.voltage, 4.123);
        assert_eq!(m.ch_util, 0.0);
        assert_eq!(m.air_util_tx, 1.0);
        assert_eq!(m.uptime, 3_600);
        assert_eq!(m.last_device_metrics, Some(t(42)));
    }

    #[test]
    fn environment_metrics_stamp_is_independent() {
        let mut node = Node::new(TOPIC, t(0));
        node.update_environment_metrics(
            EnvironmentMetrics {
                temperature: 21.456_7,
                wind_direction: 270,
                ..EnvironmentMetrics::default()
            },
            t(10),
        );
        assert_eq!(node.environment_metrics.temperature, 21.457);
        assert_eq!(node.environment_metrics.wind_direction, 270);
        assert_eq!(node.environment_metrics.last_environment_metrics, Some(t(10)));
        assert_eq!(node.device_metrics.last_device_metrics, None);
    }

    #[test]
    fn expired_seen_by_entries_are_dropped() {
        let ttls = PruneTtls::default();
        let mut node = Node::new("a", t(0));
        node.touch_seen_by("b", t(ttls.seen_by_secs));
        node.prune(&ttls, t(ttls.seen_by_secs + 1));
        assert_eq!(node.seen_by.len(), 1);
        assert!(node.seen_by.contains_key("b"));
    }

    #[test]
    fn seen_by_evicts_oldest_beyond_limit() {
        let mut node = Node::new("topic-00", t(100));
        for i in 1..15u64 {
            node.touch_seen_by(&format!("topic-{i:02}"), t(100 + i));
        }
        node.prune(&PruneTtls::default(), t(200));
        assert_eq!(node.seen_by.len(), SEEN_BY_LIMIT);
        assert!(!node.seen_by.contains_key("topic-04"));
        assert!(node.seen_by.contains_key("topic-05"));
        assert!(node.seen_by.contains_key("topic-14"));
    }

    #[test]
    fn seen_by_ties_evict_in_key_order() {
        let mut node = Node::new("k", t(50));
        for key in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "l"] {
            node.touch_seen_by(key, t(50));
        }
        assert_eq!(node.seen_by.len(), 12);
        node.prune(&PruneTtls::default(), t(50));
        assert_eq!(node.seen_by.len(), SEEN_BY_LIMIT);
        assert!(!node.seen_by.contains_key("a"));
        assert!(!node.seen_by.contains_key("b"));
        assert!(node.seen_by.contains_key("c"));
    }

    #[test]
    fn neighbors_collapse_when_all_expire() {
        let ttls = PruneTtls::default();
        let mut node = Node::new(TOPIC, t(0));
        node.update_neighbor(NodeNum::new(2), 5.5, t(0));
        node.prune(&ttls, t(ttls.neighbor_secs));
        assert_eq!(node.neighbors.as_ref().map(BTreeMap::len), Some(1));
        node.prune(&ttls, t(ttls.neighbor_secs + 1));
        assert!(node.neighbors.is_none());
    }

    #[test]
    fn neighbors_capped_oldest_first() {
        let mut node = Node::new(TOPIC, t(1_000));
        for i in 1..=(NEIGHBOR_LIMIT as u32 + 5) {
            node.update_neighbor(NodeNum::new(i), 1.0, t(1_000 + u64::from(i)));
        }
        node.prune(&PruneTtls::default(), t(1_200));
        let neighbors = node.neighbors.unwrap();
        assert_eq!(neighbors.len(), NEIGHBOR_LIMIT);
        assert!(!neighbors.contains_key(&NodeNum::new(5)));
        assert!(neighbors.contains_key(&NodeNum::new(6)));
    }

    #[test]
    fn groups_clear_as_a_whole_on_their_own_ttl() {
        let ttls = PruneTtls {
            device_metrics_secs: 10,
            environment_metrics_secs: 20,
            map_report_secs: 30,
            ..PruneTtls::default()
        };
        let mut node = valid_node();
        node.update_device_metrics(
            DeviceMetrics {
                battery_level: 50,
                ..DeviceMetrics::default()
            },
            t(1_000),
        );
        node.update_environment_metrics(
            EnvironmentMetrics {
                lux: 300.0,
                ..EnvironmentMetrics::default()
            },
            t(1_000),
        );
        node.update_map_report(
            MapReport {
                region: "US".into(),
                ..MapReport::default()
            },
            t(1_000),
        );

        node.prune(&ttls, t(1_015));
        assert_eq!(node.device_metrics, DeviceMetrics::default());
        assert_eq!(node.environment_metrics.lux, 300.0);
        assert_eq!(node.map_report.region, "US");

        node.prune(&ttls, t(1_031));
        assert_eq!(node.environment_metrics, EnvironmentMetrics::default());
        assert_eq!(node.map_report, MapReport::default());
        // Identity and position never expire.
        assert!(node.is_valid());
    }

    #[test]
    fn unstamped_groups_are_left_alone() {
        let mut node = valid_node();
        node.device_metrics.battery_level = 10;
        node.prune(&PruneTtls::default(), t(u64::MAX));
        assert_eq!(node.device_metrics.battery_level, 10);
    }

    #[test]
    fn serializes_flat_and_omits_zero_fields() {
        let mut node = valid_node();
        node.update_neighbor(NodeNum::new(42), 0.0, t(1_000));
        let json = serde_json::to_value(&node).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["longName"], "Base Camp");
        assert_eq!(obj["hwModel"], "TBEAM");
        assert_eq!(obj["latitude"], 377_749_000);
        assert_eq!(obj["precision"], 16);
        assert_eq!(obj["seenBy"][TOPIC], 1_000);
        assert_eq!(obj["neighbors"]["42"]["updated"], 1_000);
        assert!(obj["neighbors"]["42"].get("snr").is_none());
        for absent in [
            "fwVersion",
            "hasDefaultCh",
            "lastMapReport",
            "batteryLevel",
            "lastDeviceMetrics",
            "temperature",
            "rainfall1",
            "lastEnvironmentMetrics",
        ] {
            assert!(obj.get(absent).is_none(), "{absent} should be omitted");
        }
    }

    #[test]
    fn deserializes_snapshot_record() {
        let json = r#"{
            "longName": "Hilltop",
            "shortName": "HT",
            "hwModel": "RAK4631",
            "role": "CLIENT",
            "region": "EU_868",
            "lastMapReport": 1700000000,
            "latitude": 1,
            "longitude": 2,
            "batteryLevel": 101,
            "voltage": 4.2,
            "lastDeviceMetrics": 1700000100,
            "rainfall24": 1.5,
            "lastEnvironmentMetrics": 1700000200,
            "neighbors": {"99": {"snr": -7.25, "updated": 1700000300}},
            "seenBy": {"msh/EU_868/2/e/LongFast/!0000abcd": 1700000400}
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.identity.long_name, "Hilltop");
        assert_eq!(node.map_report.region, "EU_868");
        assert_eq!(node.map_report.last_map_report, Some(t(1_700_000_000)));
        assert_eq!(node.position.latitude, 1);
        assert_eq!(node.device_metrics.battery_level, 101);
        assert_eq!(node.device_metrics.voltage, 4.2);
        assert_eq!(node.environment_metrics.rainfall_24h, 1.5);
        let neighbors = node.neighbors.as_ref().unwrap();
        assert_eq!(neighbors[&NodeNum::new(99)].snr, -7.25);
        assert_eq!(node.seen_by.len(), 1);
        assert!(node.is_valid());
    }
}
