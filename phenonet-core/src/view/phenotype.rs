//! Phenotype view: one phenotype at the center, its strongest SNPs around
//! it, and the other phenotypes those SNPs are associated with.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::info;

use crate::config::{PhenonetConfig, PhenotypeViewSection};
use crate::error::ViewError;
use crate::filter::NodeClassifier;
use crate::load::{AssociationTable, load_phenotype};
use crate::pipeline::{
    FilterSettings, ViewParams, ViewSnapshot, association_edges, collect_nodes, derive_graph,
};
use crate::types::{AncestrySelection, Edge, Node, NodeClass, NodeId, Record};

use super::GraphView;

/// Nodes and edges before thresholds are applied.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Debug)]
pub struct PhenotypeView {
    records: Vec<Record>,
    anchor: NodeId,
    settings: FilterSettings,
    limits: PhenotypeViewSection,
}

impl PhenotypeView {
    /// Load `id`'s data files and center a view on it.
    pub fn open(config: &PhenonetConfig, data_dir: &Path, id: &str) -> crate::error::Result<Self> {
        let table = load_phenotype(config, data_dir, id)?;
        Ok(Self::new(table, NodeId::new(id.trim()), config)?)
    }

    pub fn new(table: AssociationTable, anchor: NodeId, config: &PhenonetConfig) -> Result<Self, ViewError> {
        if !table.records.iter().any(|r| r.target == anchor || r.source == anchor) {
            return Err(ViewError::UnknownNode(anchor.to_string()));
        }
        info!(anchor = %anchor, records = table.len(), "Built phenotype view");
        Ok(Self {
            records: table.records,
            anchor,
            settings: FilterSettings::from_config(config),
            limits: config.phenotype_view.clone(),
        })
    }

    pub fn anchor(&self) -> &NodeId {
        &self.anchor
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Build the unfiltered network for an ancestry selection.
    ///
    /// Only the anchor's `top_anchor_links` most significant SNPs are kept,
    /// and of the other phenotypes only the `top_secondary` best connected
    /// ones with at least two edges.
    pub fn network(&self, selection: &AncestrySelection) -> Network {
        let classifier = &self.settings.classifier;
        let is_primary = |id: &NodeId| classifier.classify(id) == NodeClass::Primary;
        let anchor = &self.anchor;

        let mut edges = association_edges(&self.records, selection, self.settings.join_key);
        let mut nodes = collect_nodes(&self.records);

        let endpoints: HashSet<&NodeId> = edges.iter().flat_map(|e| [&e.source, &e.target]).collect();
        nodes.retain(|n| &n.id == anchor || endpoints.contains(&n.id));

        // Strongest anchor associations define the SNP ring.
        let mut anchor_links: Vec<&Edge> = edges.iter().filter(|e| e.touches(anchor)).collect();
        anchor_links.sort_by(|a, b| a.pvalue.total_cmp(&b.pvalue));
        let top_primary: HashSet<NodeId> = anchor_links
            .iter()
            .take(self.limits.top_anchor_links)
            .filter_map(|e| e.other(anchor))
            .filter(|id| is_primary(id))
            .cloned()
            .collect();

        nodes.retain(|n| top_primary.contains(&n.id) || !is_primary(&n.id));
        edges.retain(|e| top_primary.contains(&e.source) || top_primary.contains(&e.target));

        // Best connected neighbouring phenotypes.
        let mut secondary_degree: HashMap<&NodeId, usize> = nodes
            .iter()
            .filter(|n| !is_primary(&n.id) && &n.id != anchor)
            .map(|n| (&n.id, 0))
            .collect();
        for edge in &edges {
            for endpoint in [&edge.source, &edge.target] {
                if let Some(count) = secondary_degree.get_mut(endpoint) {
                    *count += 1;
                }
            }
        }
        let mut ranked: Vec<(&NodeId, usize)> = nodes
            .iter()
            .filter_map(|n| secondary_degree.get(&n.id).map(|d| (&n.id, *d)))
            .filter(|(_, d)| *d > 1)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let top_secondary: HashSet<NodeId> = ranked
            .into_iter()
            .take(self.limits.top_secondary)
            .map(|(id, _)| id.clone())
            .collect();

        nodes.retain(|n| top_secondary.contains(&n.id) || is_primary(&n.id) || &n.id == anchor);
        edges.retain(|e| {
            top_secondary.contains(&e.source)
                || top_secondary.contains(&e.target)
                || e.touches(anchor)
        });

        if let Some(center) = nodes.iter_mut().find(|n| &n.id == anchor) {
            center.color.get_or_insert_with(|| "gray".to_string());
        }

        Network { nodes, edges }
    }
}

impl GraphView for PhenotypeView {
    fn name(&self) -> &'static str {
        "phenotype"
    }

    fn anchors(&self) -> Vec<NodeId> {
        vec![self.anchor.clone()]
    }

    fn derive(&self, params: &ViewParams) -> ViewSnapshot {
        let network = self.network(&params.selection);
        derive_graph(
            &network.nodes,
            &network.edges,
            params,
            &self.settings,
            &self.anchors(),
        )
    }
}
