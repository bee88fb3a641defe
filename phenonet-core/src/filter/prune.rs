use std::collections::{BTreeSet, HashMap, HashSet};

use crate::types::{DerivedGraph, Edge, Node, NodeClass, NodeId};

/// Decides whether a node id is a primary (SNP-like) or secondary entity.
pub trait NodeClassifier {
    fn classify(&self, id: &NodeId) -> NodeClass;
}

impl<F> NodeClassifier for F
where
    F: Fn(&NodeId) -> NodeClass,
{
    fn classify(&self, id: &NodeId) -> NodeClass {
        self(id)
    }
}

/// Ids starting with `prefix` are primary; everything else is secondary.
#[derive(Debug, Clone)]
pub struct PrefixClassifier {
    pub prefix: String,
}

impl PrefixClassifier {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for PrefixClassifier {
    fn default() -> Self {
        Self::new("rs")
    }
}

impl NodeClassifier for PrefixClassifier {
    fn classify(&self, id: &NodeId) -> NodeClass {
        if id.as_str().starts_with(&self.prefix) {
            NodeClass::Primary
        } else {
            NodeClass::Secondary
        }
    }
}

/// Retention rules for [`prune_nodes`].
#[derive(Debug, Clone)]
pub struct PruneRules {
    /// Primary nodes need at least this many incident filtered edges.
    pub min_primary_degree: usize,
    /// Nodes kept regardless of degree or connectivity.
    pub anchors: BTreeSet<NodeId>,
}

impl Default for PruneRules {
    fn default() -> Self {
        Self {
            min_primary_degree: 2,
            anchors: BTreeSet::new(),
        }
    }
}

impl PruneRules {
    pub fn with_min_primary_degree(mut self, min: usize) -> Self {
        self.min_primary_degree = min;
        self
    }

    pub fn with_anchor(mut self, id: impl Into<NodeId>) -> Self {
        self.anchors.insert(id.into());
        self
    }

    pub fn is_anchor(&self, id: &NodeId) -> bool {
        self.anchors.contains(id)
    }
}

/// Derive a node set consistent with `edges`.
///
/// 1. Primary nodes are kept when they have at least
///    `min_primary_degree` incident edges.
/// 2. Secondary nodes are kept when they share an edge with a kept primary.
/// 3. Edges are kept when both endpoints are kept.
/// 4. Nodes left without any kept edge are dropped.
///
/// Anchors skip steps 1, 2 and 4; an anchor missing from `nodes` is
/// appended as a bare node. Output order is kept primaries, then kept
/// secondaries, then missing anchors, each in input order.
pub fn prune_nodes<C>(
    edges: &[Edge],
    nodes: &[Node],
    classifier: &C,
    rules: &PruneRules,
) -> DerivedGraph
where
    C: NodeClassifier + ?Sized,
{
    let class: HashMap<&NodeId, NodeClass> = nodes
        .iter()
        .map(|n| (&n.id, classifier.classify(&n.id)))
        .collect();
    let is_primary = |id: &NodeId| class.get(id) == Some(&NodeClass::Primary);
    let is_secondary = |id: &NodeId| class.get(id) == Some(&NodeClass::Secondary);

    // Step 1: primary degrees over the filtered edges.
    let mut primary_degree: HashMap<&NodeId, usize> = HashMap::new();
    for edge in edges {
        if is_primary(&edge.source) {
            *primary_degree.entry(&edge.source).or_default() += 1;
        }
        if edge.target != edge.source && is_primary(&edge.target) {
            *primary_degree.entry(&edge.target).or_default() += 1;
        }
    }
    let kept_primary: HashSet<&NodeId> = nodes
        .iter()
        .map(|n| &n.id)
        .filter(|id| is_primary(id))
        .filter(|id| {
            rules.is_anchor(id)
                || primary_degree.get(id).copied().unwrap_or(0) >= rules.min_primary_degree
        })
        .collect();

    // Step 2: secondaries linked to a kept primary.
    let mut linked_secondary: HashSet<&NodeId> = HashSet::new();
    for edge in edges {
        if kept_primary.contains(&edge.source) && is_secondary(&edge.target) {
            linked_secondary.insert(&edge.target);
        }
        if kept_primary.contains(&edge.target) && is_secondary(&edge.source) {
            linked_secondary.insert(&edge.source);
        }
    }
    let kept_secondary: HashSet<&NodeId> = nodes
        .iter()
        .map(|n| &n.id)
        .filter(|id| is_secondary(id))
        .filter(|id| rules.is_anchor(id) || linked_secondary.contains(id))
        .collect();

    // Step 3: edges between kept nodes.
    let kept = |id: &NodeId| kept_primary.contains(id) || kept_secondary.contains(id);
    let kept_edges: Vec<Edge> = edges
        .iter()
        .filter(|e| kept(&e.source) && kept(&e.target))
        .cloned()
        .collect();

    // Step 4: drop nodes whose edges all went away in step 3.
    let touched: HashSet<&NodeId> = kept_edges
        .iter()
        .flat_map(|e| [&e.source, &e.target])
        .collect();
    let survives = |id: &NodeId| rules.is_anchor(id) || touched.contains(id);

    let mut kept_nodes: Vec<Node> = nodes
        .iter()
        .filter(|n| kept_primary.contains(&n.id) && survives(&n.id))
        .cloned()
        .collect();
    kept_nodes.extend(
        nodes
            .iter()
            .filter(|n| kept_secondary.contains(&n.id) && survives(&n.id))
            .cloned(),
    );
    for anchor in &rules.anchors {
        if !class.contains_key(anchor) {
            kept_nodes.push(Node::new(anchor.clone()));
        }
    }

    DerivedGraph {
        nodes: kept_nodes,
        edges: kept_edges,
    }
}
