//! One filter pass: Edge Filter → Node Pruner → Degree Aggregator.

use std::collections::BTreeSet;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::config::PhenonetConfig;
use crate::filter::{
    DegreeMap, JoinKey, PrefixClassifier, PruneRules, degree_map, filter_edges, merge_comparison,
    prune_nodes,
};
use crate::threshold::ThresholdSet;
use crate::types::{Ancestry, AncestrySelection, DerivedGraph, Edge, Node, NodeId, Record};

/// Everything that selects what a pass shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewParams {
    pub selection: AncestrySelection,
    pub thresholds: ThresholdSet,
}

impl ViewParams {
    pub fn new(selection: AncestrySelection, thresholds: ThresholdSet) -> Self {
        Self {
            selection,
            thresholds,
        }
    }
}

/// The result of one pass, as handed to a renderer.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    /// Incremented by the controller for every published pass.
    pub generation: u64,
    pub params: ViewParams,
    pub anchors: Vec<NodeId>,
    pub graph: DerivedGraph,
    pub degrees: DegreeMap,
}

/// Fixed filtering behaviour shared by every view.
#[derive(Debug, Clone)]
pub struct FilterSettings {
    pub classifier: PrefixClassifier,
    pub min_primary_degree: usize,
    pub join_key: JoinKey,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            classifier: PrefixClassifier::default(),
            min_primary_degree: 2,
            join_key: JoinKey::Directed,
        }
    }
}

impl FilterSettings {
    pub fn from_config(config: &PhenonetConfig) -> Self {
        Self {
            classifier: PrefixClassifier::new(config.filter.primary_prefix.clone()),
            min_primary_degree: config.filter.min_primary_degree,
            join_key: config.filter.join_key,
        }
    }
}

/// Nodes in order of first appearance: each record contributes its source,
/// then its target. Display fields come from the first record mentioning
/// the node.
pub fn collect_nodes(records: &[Record]) -> Vec<Node> {
    let mut seen = BTreeSet::new();
    let mut nodes = Vec::new();
    for record in records {
        if seen.insert(&record.source) {
            let mut node = Node::new(record.source.clone());
            node.color.clone_from(&record.source_meta.color);
            node.category.clone_from(&record.source_meta.chromosome);
            nodes.push(node);
        }
        if seen.insert(&record.target) {
            let mut node = Node::new(record.target.clone());
            node.color.clone_from(&record.target_meta.color);
            node.label.clone_from(&record.target_meta.label);
            node.category.clone_from(&record.target_meta.category);
            nodes.push(node);
        }
    }
    nodes
}

/// One edge per record for the selected ancestry, merged with the second
/// ancestry in comparison mode. Edges without a usable weight are dropped.
pub fn association_edges(
    records: &[Record],
    selection: &AncestrySelection,
    join: JoinKey,
) -> Vec<Edge> {
    let edges_for = |ancestry: &Ancestry| -> Vec<Edge> {
        records
            .iter()
            .map(|r| Edge::from_stats(r.source.clone(), r.target.clone(), &r.stats_for(ancestry)))
            .collect()
    };

    let mut edges = edges_for(&selection.primary);
    if let Some(second) = &selection.secondary {
        edges = merge_comparison(&edges, &edges_for(second), join);
    }
    edges.retain(|e| !e.weight.is_nan());
    edges
}

/// Run the three pass stages over a prepared network.
pub fn derive_graph(
    nodes: &[Node],
    edges: &[Edge],
    params: &ViewParams,
    settings: &FilterSettings,
    anchors: &[NodeId],
) -> ViewSnapshot {
    let start = Instant::now();
    let filtered = filter_edges(edges, &params.thresholds, params.selection.mode());

    let rules = anchors.iter().fold(
        PruneRules::default().with_min_primary_degree(settings.min_primary_degree),
        |rules, anchor| rules.with_anchor(anchor.clone()),
    );
    let graph = prune_nodes(&filtered, nodes, &settings.classifier, &rules);
    let degrees = degree_map(&graph.nodes, &graph.edges);

    debug!(
        input_edges = edges.len(),
        filtered_edges = filtered.len(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        duration = ?start.elapsed(),
        "Derived graph"
    );

    ViewSnapshot {
        generation: 0,
        params: params.clone(),
        anchors: anchors.to_vec(),
        graph,
        degrees,
    }
}
