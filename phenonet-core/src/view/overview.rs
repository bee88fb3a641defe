//! Overview: the phenotype–phenotype graph with precomputed edge weights.
//!
//! The edge list carries one numeric column per ancestry, p-value cutoff and
//! direction, named `<ancestry>_<pvalue label>_<same_dir_weight|diff_dir_weight>`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PhenonetConfig;
use crate::error::{LoadError, ViewError};
use crate::filter::{DegreeMap, degree_map};
use crate::table::Table;
use crate::types::{Ancestry, Direction, Edge, MISSING_PVALUE, Node, NodeId, display_value, parse_number};

const SAME_SUFFIX: &str = "same_dir_weight";
const DIFF_SUFFIX: &str = "diff_dir_weight";

// ── Selection ──────────────────────────────────────────────────────

/// Which precomputed weight the overview edges show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// Sum of the same- and opposite-direction weights.
    #[default]
    Weight,
    /// Both ancestries agree on the effect direction.
    SameDirection,
    /// The ancestries disagree.
    DiffDirection,
}

impl EdgeType {
    fn direction(self) -> Direction {
        match self {
            Self::Weight => Direction::Neutral,
            Self::SameDirection => Direction::Positive,
            Self::DiffDirection => Direction::Negative,
        }
    }
}

impl FromStr for EdgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weight" => Ok(Self::Weight),
            "same" | "same_dir_weight" => Ok(Self::SameDirection),
            "diff" | "diff_dir_weight" => Ok(Self::DiffDirection),
            other => Err(format!("unknown edge type: {other} (expected weight, same or diff)")),
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Weight => "weight",
            Self::SameDirection => SAME_SUFFIX,
            Self::DiffDirection => DIFF_SUFFIX,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewSelection {
    pub ancestry: Ancestry,
    /// P-value label as written in column names, e.g. `1e-04`.
    pub pvalue_label: String,
    pub edge_type: EdgeType,
}

impl OverviewSelection {
    pub fn new(ancestry: Ancestry, pvalue_label: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            ancestry,
            pvalue_label: pvalue_label.into(),
            edge_type,
        }
    }

    fn column(&self, suffix: &str) -> String {
        format!("{}_{}_{suffix}", self.ancestry, self.pvalue_label)
    }

    pub fn same_column(&self) -> String {
        self.column(SAME_SUFFIX)
    }

    pub fn diff_column(&self) -> String {
        self.column(DIFF_SUFFIX)
    }

    fn pvalue(&self) -> f64 {
        parse_number(&self.pvalue_label).unwrap_or(MISSING_PVALUE)
    }
}

// ── Data ───────────────────────────────────────────────────────────

/// A phenotype from the node attribute table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewNode {
    #[serde(flatten)]
    pub node: Node,
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Degree as precomputed in the attribute table.
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct WeightedLink {
    source: NodeId,
    target: NodeId,
    weights: HashMap<String, f64>,
}

impl WeightedLink {
    /// Missing and non-numeric cells read as 0.
    fn weight(&self, column: &str) -> f64 {
        self.weights.get(column).copied().unwrap_or(0.0)
    }
}

/// Result of one overview pass.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewSnapshot {
    pub selection: OverviewSelection,
    pub min_degree: usize,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Degree under the current selection, for every node in the table.
    pub degrees: DegreeMap,
}

#[derive(Debug)]
pub struct Overview {
    nodes: Vec<OverviewNode>,
    links: Vec<WeightedLink>,
    columns: HashSet<String>,
    graph: UnGraph<NodeId, ()>,
    node_to_index: HashMap<NodeId, NodeIndex>,
}

impl Overview {
    /// Build from the node attribute table and the weighted edge list.
    ///
    /// Edges whose endpoints are not in the attribute table are skipped.
    pub fn from_tables(node_table: &Table, edge_table: &Table) -> Result<Self, LoadError> {
        let nodes = read_nodes(node_table)?;
        let source = edge_table.require("source")?;
        let target = edge_table.require("target")?;

        let weight_columns: Vec<(usize, &String)> = edge_table
            .headers()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != source && *i != target)
            .collect();
        let columns: HashSet<String> = weight_columns.iter().map(|(_, h)| (*h).clone()).collect();

        let mut graph = UnGraph::<NodeId, ()>::with_capacity(nodes.len(), edge_table.len());
        let mut node_to_index: HashMap<NodeId, NodeIndex> = HashMap::with_capacity(nodes.len());
        for n in &nodes {
            node_to_index
                .entry(n.node.id.clone())
                .or_insert_with(|| graph.add_node(n.node.id.clone()));
        }

        let mut links = Vec::with_capacity(edge_table.len());
        let mut skipped = 0usize;
        for row in edge_table.rows() {
            let src = NodeId::new(row[source].trim());
            let tgt = NodeId::new(row[target].trim());
            let (Some(&a), Some(&b)) = (node_to_index.get(&src), node_to_index.get(&tgt)) else {
                skipped += 1;
                continue;
            };
            graph.add_edge(a, b, ());

            let weights = weight_columns
                .iter()
                .filter_map(|(i, header)| parse_number(&row[*i]).map(|w| ((*header).clone(), w)))
                .collect();
            links.push(WeightedLink {
                source: src,
                target: tgt,
                weights,
            });
        }
        if skipped > 0 {
            warn!(skipped, "Skipped overview edges with unknown endpoints");
        }

        Ok(Self {
            nodes,
            links,
            columns,
            graph,
            node_to_index,
        })
    }

    /// Read the node attribute table and edge list named in the config.
    pub fn load(config: &PhenonetConfig, data_dir: &Path) -> Result<Self, LoadError> {
        let node_path = data_dir.join(&config.data.node_attributes);
        let edge_path = data_dir.join(&config.data.edgelist);
        let overview = Self::from_tables(&Table::from_path(&node_path)?, &Table::from_path(&edge_path)?)?;
        info!(
            nodes = overview.nodes.len(),
            edges = overview.links.len(),
            path = %data_dir.display(),
            "Loaded overview"
        );
        Ok(overview)
    }

    pub fn nodes(&self) -> &[OverviewNode] {
        &self.nodes
    }

    pub fn edge_count(&self) -> usize {
        self.links.len()
    }

    /// Largest precomputed degree, the upper end of the degree filter.
    pub fn max_degree(&self) -> usize {
        self.nodes.iter().map(|n| n.degree).max().unwrap_or(0)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    fn require(&self, column: String) -> Result<String, ViewError> {
        if self.has_column(&column) {
            Ok(column)
        } else {
            Err(ViewError::MissingColumn(column))
        }
    }

    /// All edges weighted by the selected column(s).
    pub fn edges_for(&self, selection: &OverviewSelection) -> Result<Vec<Edge>, ViewError> {
        let columns = match selection.edge_type {
            EdgeType::Weight => vec![
                self.require(selection.same_column())?,
                self.require(selection.diff_column())?,
            ],
            EdgeType::SameDirection => vec![self.require(selection.same_column())?],
            EdgeType::DiffDirection => vec![self.require(selection.diff_column())?],
        };
        let direction = selection.edge_type.direction();
        let pvalue = selection.pvalue();

        Ok(self
            .links
            .iter()
            .map(|link| Edge {
                source: link.source.clone(),
                target: link.target.clone(),
                weight: columns.iter().map(|c| link.weight(c)).sum(),
                direction,
                pvalue,
                pvalue2: None,
            })
            .collect())
    }

    /// Degree of every node counting edges with a non-zero same- or
    /// opposite-direction weight under `selection`. An absent column reads
    /// as zero weight.
    pub fn degrees(&self, selection: &OverviewSelection) -> DegreeMap {
        let same = selection.same_column();
        let diff = selection.diff_column();
        let present: Vec<Edge> = self
            .links
            .iter()
            .filter(|l| l.weight(&same) != 0.0 || l.weight(&diff) != 0.0)
            .map(|l| Edge {
                source: l.source.clone(),
                target: l.target.clone(),
                weight: l.weight(&same) + l.weight(&diff),
                direction: Direction::Neutral,
                pvalue: selection.pvalue(),
                pvalue2: None,
            })
            .collect();
        let nodes: Vec<Node> = self.nodes.iter().map(|n| n.node.clone()).collect();
        degree_map(&nodes, &present)
    }

    /// Nodes whose precomputed degree is at least `threshold`.
    pub fn filter_by_degree(&self, threshold: usize) -> Vec<&OverviewNode> {
        self.nodes.iter().filter(|n| n.degree >= threshold).collect()
    }

    /// Neighbours of `id` in table order.
    pub fn neighbors(&self, id: &NodeId) -> Result<Vec<&OverviewNode>, ViewError> {
        let idx = self
            .node_to_index
            .get(id)
            .ok_or_else(|| ViewError::UnknownNode(id.to_string()))?;
        let adjacent: HashSet<&NodeId> = self.graph.neighbors(*idx).map(|n| &self.graph[n]).collect();
        Ok(self
            .nodes
            .iter()
            .filter(|n| adjacent.contains(&n.node.id))
            .collect())
    }

    /// Nodes whose label contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&OverviewNode> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.nodes
            .iter()
            .filter(|n| n.node.display_name().to_lowercase().contains(&query))
            .collect()
    }

    /// Nodes passing the degree filter and the non-zero weighted edges
    /// between them.
    pub fn derive(&self, selection: &OverviewSelection, min_degree: usize) -> Result<OverviewSnapshot, ViewError> {
        let degrees = self.degrees(selection);
        let kept = self.filter_by_degree(min_degree);
        let ids: HashSet<&NodeId> = kept.iter().map(|n| &n.node.id).collect();
        let edges: Vec<Edge> = self
            .edges_for(selection)?
            .into_iter()
            .filter(|e| e.weight != 0.0 && ids.contains(&e.source) && ids.contains(&e.target))
            .collect();

        Ok(OverviewSnapshot {
            selection: selection.clone(),
            min_degree,
            nodes: kept.into_iter().map(|n| n.node.clone()).collect(),
            edges,
            degrees,
        })
    }
}

fn read_nodes(table: &Table) -> Result<Vec<OverviewNode>, LoadError> {
    let id = table.require("id")?;
    let known: BTreeMap<&str, Option<usize>> = ["x", "y", "size", "label", "hex", "phenotype_category", "degree"]
        .into_iter()
        .map(|name| (name, table.column(name)))
        .collect();
    let col = |name: &str| known.get(name).copied().flatten();
    let cell = |row: &[String], name: &str| -> Option<String> {
        col(name)
            .map(|i| row[i].trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let number = |row: &[String], name: &str| cell(row, name).as_deref().and_then(parse_number);

    let extra: Vec<(usize, &String)> = table
        .headers()
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != id && !known.contains_key(h.as_str()))
        .collect();

    let mut nodes = Vec::with_capacity(table.len());
    for row in table.rows() {
        let raw_id = row[id].trim();
        if raw_id.is_empty() {
            continue;
        }
        let mut node = Node::new(raw_id);
        node.label = cell(row, "label");
        node.color = cell(row, "hex");
        node.category = cell(row, "phenotype_category");
        node.size = number(row, "size");
        node.display = extra
            .iter()
            .filter(|(i, _)| !row[*i].is_empty())
            .map(|(i, h)| ((*h).clone(), display_value(&row[*i])))
            .collect();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let degree = number(row, "degree").map_or(0, |d| d.max(0.0) as usize);
        nodes.push(OverviewNode {
            node,
            x: number(row, "x"),
            y: number(row, "y"),
            degree,
        });
    }
    Ok(nodes)
}
