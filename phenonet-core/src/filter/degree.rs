use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::{Edge, Node, NodeId};

/// Per-node count of visible incident edges, in node order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DegreeMap {
    order: Vec<NodeId>,
    counts: HashMap<NodeId, usize>,
}

impl DegreeMap {
    /// Degree of `id`; nodes outside the map have degree 0.
    pub fn get(&self, id: &str) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.counts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, usize)> + '_ {
        self.order.iter().map(|id| (id, self.get(id.as_str())))
    }

    /// Largest degree, 0 for an empty map.
    pub fn max(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }
}

impl Serialize for DegreeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (id, degree) in self.iter() {
            map.serialize_entry(id, &degree)?;
        }
        map.end()
    }
}

/// Count, for every node, the edges in `edges` that touch it.
///
/// Each edge adds one to its source and one to its target (a self-loop
/// counts twice). Endpoints that are not in `nodes` are ignored.
pub fn degree_map(nodes: &[Node], edges: &[Edge]) -> DegreeMap {
    let mut map = DegreeMap::default();
    for node in nodes {
        if map.counts.insert(node.id.clone(), 0).is_none() {
            map.order.push(node.id.clone());
        }
    }
    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            if let Some(count) = map.counts.get_mut(endpoint) {
                *count += 1;
            }
        }
    }
    map
}
