//! Pair view: the SNPs two phenotypes have in common.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::info;

use crate::config::PhenonetConfig;
use crate::error::ViewError;
use crate::filter::NodeClassifier;
use crate::load::{AssociationTable, load_phenotype};
use crate::pipeline::{
    FilterSettings, ViewParams, ViewSnapshot, association_edges, collect_nodes, derive_graph,
};
use crate::types::{AncestrySelection, NodeClass, NodeId, Record};

use super::GraphView;
use super::phenotype::Network;

#[derive(Debug)]
pub struct PairView {
    records: Vec<Record>,
    left: NodeId,
    right: NodeId,
    settings: FilterSettings,
}

impl PairView {
    /// Build a pair view from `left`'s data files, which also hold its SNPs'
    /// associations with `right`.
    pub fn open(
        config: &PhenonetConfig,
        data_dir: &Path,
        left: &str,
        right: &str,
    ) -> crate::error::Result<Self> {
        let table = load_phenotype(config, data_dir, left)?;
        Ok(Self::new(
            table,
            NodeId::new(left.trim()),
            NodeId::new(right.trim()),
            config,
        )?)
    }

    /// Restrict `table` to the SNPs associated with both `left` and `right`.
    ///
    /// When more than `max_primaries` SNPs are shared they are ordered by
    /// chromosome and thinned to an evenly spaced subset.
    pub fn new(
        table: AssociationTable,
        left: NodeId,
        right: NodeId,
        config: &PhenonetConfig,
    ) -> Result<Self, ViewError> {
        let (left_rows, right_rows): (Vec<&Record>, Vec<&Record>) = table
            .records
            .iter()
            .filter(|r| r.target == left || r.target == right)
            .partition(|r| r.target == left);

        let right_sources: HashSet<&NodeId> = right_rows.iter().map(|r| &r.source).collect();
        let mut seen = HashSet::new();
        let mut common: Vec<&NodeId> = left_rows
            .iter()
            .map(|r| &r.source)
            .filter(|id| right_sources.contains(id) && seen.insert(*id))
            .collect();
        let shared = common.len();

        let max = config.pair_view.max_primaries.max(1);
        if common.len() > max {
            let chromosomes: HashMap<&NodeId, Option<&str>> = left_rows
                .iter()
                .rev()
                .map(|r| (&r.source, r.source_meta.chromosome.as_deref()))
                .collect();
            common.sort_by(|a, b| {
                let ca = chromosomes.get(a).copied().flatten();
                let cb = chromosomes.get(b).copied().flatten();
                compare_chromosomes(ca, cb)
            });
            let step = common.len().div_ceil(max);
            common = common.into_iter().step_by(step).collect();
        }

        let keep: HashSet<&NodeId> = common.into_iter().collect();
        let records: Vec<Record> = table
            .records
            .iter()
            .filter(|r| (r.target == left || r.target == right) && keep.contains(&r.source))
            .cloned()
            .collect();

        if records.is_empty() {
            return Err(ViewError::NoData(format!(
                "phenotypes {left} and {right} share no SNPs"
            )));
        }

        info!(
            left = %left,
            right = %right,
            shared,
            kept = keep.len(),
            "Built pair view"
        );
        Ok(Self {
            records,
            left,
            right,
            settings: FilterSettings::from_config(config),
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Unfiltered network: SNPs linked to both phenotypes and their edges.
    pub fn network(&self, selection: &AncestrySelection) -> Network {
        let classifier = &self.settings.classifier;
        let mut edges = association_edges(&self.records, selection, self.settings.join_key);

        let mut partners: HashMap<&NodeId, HashSet<&NodeId>> = HashMap::new();
        for edge in &edges {
            if classifier.classify(&edge.source) == NodeClass::Primary {
                partners.entry(&edge.source).or_default().insert(&edge.target);
            }
        }
        let linked: HashSet<NodeId> = partners
            .into_iter()
            .filter(|(_, targets)| targets.len() >= 2)
            .map(|(id, _)| id.clone())
            .collect();

        edges.retain(|e| linked.contains(&e.source));
        let mut nodes = collect_nodes(&self.records);
        nodes.retain(|n| {
            linked.contains(&n.id) || n.id == self.left || n.id == self.right
        });
        Network { nodes, edges }
    }
}

impl GraphView for PairView {
    fn name(&self) -> &'static str {
        "pair"
    }

    fn anchors(&self) -> Vec<NodeId> {
        vec![self.left.clone(), self.right.clone()]
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

/// Sort key for a chromosome name: autosomes numerically, then X, Y and
/// MT, then anything else lexically. Missing values sort last.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ChromosomeKey<'a> {
    Autosome(u32),
    Sex(u8),
    Mitochondrial,
    Other(&'a str),
    Missing,
}

fn chromosome_key(raw: Option<&str>) -> ChromosomeKey<'_> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return ChromosomeKey::Missing;
    };
    let name = raw
        .strip_prefix("chr")
        .or_else(|| raw.strip_prefix("CHR"))
        .unwrap_or(raw);
    if let Ok(n) = name.parse::<u32>() {
        return ChromosomeKey::Autosome(n);
    }
    match name.to_ascii_uppercase().as_str() {
        "X" => ChromosomeKey::Sex(0),
        "Y" => ChromosomeKey::Sex(1),
        "M" | "MT" => ChromosomeKey::Mitochondrial,
        _ => ChromosomeKey::Other(raw),
    }
}

pub fn compare_chromosomes(a: Option<&str>, b: Option<&str>) -> Ordering {
    chromosome_key(a).cmp(&chromosome_key(b))
}
