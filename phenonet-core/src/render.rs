//! Text, JSON and Graphviz output for derived graphs.

use std::fmt::Write;

use serde::Serialize;

use crate::pipeline::ViewSnapshot;
use crate::threshold::ThresholdSet;
use crate::types::{AncestrySelection, Direction, Edge, Node, NodeId};
use crate::view::OverviewSnapshot;

/// Output forms shared by every snapshot kind.
pub trait GraphRender: Serialize {
    fn to_text(&self) -> String;

    fn to_dot(&self) -> String;

    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn selection_label(selection: &AncestrySelection) -> String {
    match &selection.secondary {
        Some(second) => format!("{} vs {second}", selection.primary),
        None => selection.primary.to_string(),
    }
}

fn thresholds_label(t: &ThresholdSet) -> String {
    let mut label = format!("p < {:.0e}", t.p_max);
    if let Some(p2) = t.p_max2 {
        write!(label, ", p2 < {p2:.0e}").unwrap();
    }
    write!(label, ", |beta| > {}", t.beta_min).unwrap();
    if !t.direction.is_neutral() {
        write!(label, ", direction {}", t.direction).unwrap();
    }
    label
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let head: String = name.chars().take(width - 2).collect();
        format!("{head}..")
    } else {
        name.to_string()
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn edge_color(direction: Direction) -> &'static str {
    match direction {
        Direction::Positive => "steelblue",
        Direction::Negative => "firebrick",
        Direction::Neutral => "gray",
    }
}

fn write_dot(out: &mut String, nodes: &[Node], edges: &[Edge]) {
    writeln!(out, "graph phenonet {{").unwrap();
    writeln!(out, "  node [shape=ellipse];").unwrap();
    for node in nodes {
        write!(out, "  {} [label={}", quote(node.id.as_str()), quote(node.display_name())).unwrap();
        if let Some(color) = &node.color {
            write!(out, ", color={}", quote(color)).unwrap();
        }
        writeln!(out, "];").unwrap();
    }
    for edge in edges {
        writeln!(
            out,
            "  {} -- {} [penwidth={:.3}, color={}];",
            quote(edge.source.as_str()),
            quote(edge.target.as_str()),
            edge.weight,
            edge_color(edge.direction),
        )
        .unwrap();
    }
    writeln!(out, "}}").unwrap();
}

/// Graphviz document for a bare node list, e.g. neighbour or search hits.
pub fn nodes_to_dot(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_dot(&mut out, nodes, &[]);
    out
}

impl GraphRender for ViewSnapshot {
    fn to_text(&self) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "Graph for {} ({}): {} nodes, {} edges",
            selection_label(&self.params.selection),
            thresholds_label(&self.params.thresholds),
            self.graph.nodes.len(),
            self.graph.edges.len(),
        )
        .unwrap();
        let anchors: Vec<&str> = self.anchors.iter().map(NodeId::as_str).collect();
        writeln!(out, "Anchors: {}", anchors.join(", ")).unwrap();
        writeln!(out).unwrap();

        writeln!(out, "{:<16} {:<40} {:>6}", "Node", "Label", "Degree").unwrap();
        writeln!(out, "{:-<64}", "").unwrap();
        for node in &self.graph.nodes {
            writeln!(
                out,
                "{:<16} {:<40} {:>6}",
                truncate(node.id.as_str(), 16),
                truncate(node.label.as_deref().unwrap_or("-"), 40),
                self.degrees.get(node.id.as_str()),
            )
            .unwrap();
        }

        if !self.graph.edges.is_empty() {
            writeln!(out).unwrap();
            writeln!(out, "{:<16} {:<16} {:>8} {:>10} {:>4}", "Source", "Target", "Weight", "P", "Dir").unwrap();
            writeln!(out, "{:-<58}", "").unwrap();
            for edge in &self.graph.edges {
                writeln!(
                    out,
                    "{:<16} {:<16} {:>8.4} {:>10.2e} {:>4}",
                    truncate(edge.source.as_str(), 16),
                    truncate(edge.target.as_str(), 16),
                    edge.weight,
                    edge.pvalue,
                    edge.direction.to_string(),
                )
                .unwrap();
            }
        }
        out
    }

    fn to_dot(&self) -> String {
        let mut out = String::new();
        write_dot(&mut out, &self.graph.nodes, &self.graph.edges);
        out
    }
}

impl GraphRender for OverviewSnapshot {
    fn to_text(&self) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "Overview for {} at p {} ({}), degree >= {}: {} nodes, {} edges",
            self.selection.ancestry,
            self.selection.pvalue_label,
            self.selection.edge_type,
            self.min_degree,
            self.nodes.len(),
            self.edges.len(),
        )
        .unwrap();
        writeln!(out).unwrap();
        writeln!(out, "{:<16} {:<40} {:>6}", "Node", "Label", "Degree").unwrap();
        writeln!(out, "{:-<64}", "").unwrap();
        for node in &self.nodes {
            writeln!(
                out,
                "{:<16} {:<40} {:>6}",
                truncate(node.id.as_str(), 16),
                truncate(node.label.as_deref().unwrap_or("-"), 40),
                self.degrees.get(node.id.as_str()),
            )
            .unwrap();
        }
        out
    }

    fn to_dot(&self) -> String {
        let mut out = String::new();
        write_dot(&mut out, &self.nodes, &self.edges);
        out
    }
}
