//! The node directory: every node observed and not yet forgotten.

use std::collections::BTreeMap;

use meshmap_types::{NodeNum, PruneTtls, Timestamp};
use serde::{Deserialize, Serialize};

use crate::Node;

/// Mapping of node number to node record.
///
/// Holds valid and incomplete nodes alike; only [`NodeDb::valid`] is ever
/// exported. Callers share one `NodeDb` behind a single lock. Sharding by
/// node number would be possible since every update touches one node, but
/// pruning and export walk the whole table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeDb {
    nodes: BTreeMap<NodeNum, Node>,
}

/// Result of a prune pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PruneSummary {
    pub remaining: usize,
    pub removed: usize,
}

impl NodeDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node for `num`, created as first heard through `topic` if absent.
    pub fn entry(&mut self, num: NodeNum, topic: &str, now: Timestamp) -> &mut Node {
        self.nodes
            .entry(num)
            .or_insert_with(|| Node::new(topic, now))
    }

    pub fn get(&self, num: NodeNum) -> Option<&Node> {
        self.nodes.get(&num)
    }

    pub fn contains(&self, num: NodeNum) -> bool {
        self.nodes.contains_key(&num)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeNum, &Node)> {
        self.nodes.iter()
    }

    /// Prune every node, then forget nodes no relay has seen within the TTL.
    pub fn prune(&mut self, ttls: &PruneTtls, now: Timestamp) -> PruneSummary {
        let before = self.nodes.len();
        self.nodes.retain(|_, node| {
            node.prune(ttls, now);
            !node.is_forgotten()
        });
        PruneSummary {
            remaining: self.nodes.len(),
            removed: before - self.nodes.len(),
        }
    }

    /// A copy holding only the nodes complete enough to export.
    pub fn valid(&self) -> NodeDb {
        NodeDb {
            nodes: self
                .nodes
                .iter()
                .filter(|(_, node)| node.is_valid())
                .map(|(num, node)| (*num, node.clone()))
                .collect(),
        }
    }
}

impl FromIterator<(NodeNum, Node)> for NodeDb {
    fn from_iter<I: IntoIterator<Item = (NodeNum, Node)>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
