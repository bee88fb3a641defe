use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Edge, NodeId};

/// How two edges are matched when merging ancestries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKey {
    /// `(source, target)` in literal order; `(a, b)` and `(b, a)` differ.
    #[default]
    Directed,
    /// Endpoint order is ignored.
    Undirected,
}

impl JoinKey {
    fn key<'a>(self, edge: &'a Edge) -> (&'a NodeId, &'a NodeId) {
        match self {
            Self::Directed => (&edge.source, &edge.target),
            Self::Undirected if edge.target < edge.source => (&edge.target, &edge.source),
            Self::Undirected => (&edge.source, &edge.target),
        }
    }
}

/// Maximum that propagates NaN, so a missing beta on either side
/// invalidates the merged edge.
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Keep the edges of `a` that also appear in `b`, combining their values.
///
/// The merged edge takes the larger weight, the product of both
/// directions (+1 when the ancestries agree, -1 when they disagree) and
/// carries `b`'s p-value as `pvalue2`. Output follows `a`'s order; when `b`
/// has several edges with the same key, the last one is used.
pub fn merge_comparison(a: &[Edge], b: &[Edge], join: JoinKey) -> Vec<Edge> {
    let lookup: HashMap<(&NodeId, &NodeId), &Edge> = b.iter().map(|e| (join.key(e), e)).collect();

    a.iter()
        .filter_map(|edge| {
            let other = lookup.get(&join.key(edge))?;
            Some(Edge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                weight: nan_max(edge.weight, other.weight),
                direction: edge.direction * other.direction,
                pvalue: edge.pvalue,
                pvalue2: Some(other.pvalue),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssociationStats, Direction};

    fn edge(src: &str, tgt: &str, beta: f64, pvalue: f64) -> Edge {
        Edge::from_stats(src.into(), tgt.into(), &AssociationStats::new(beta, pvalue))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn keeps_edges_present_in_both_lists() {
        let a = vec![
            edge("x", "y", 0.2, 0.01),
            edge("x", "z", 0.1, 0.02),
            edge("y", "z", -0.05, 0.5),
        ];
        let b = vec![edge("x", "y", 0.3, 0.03), edge("x", "z", -0.1, 0.04)];

        let merged = merge_comparison(&a, &b, JoinKey::Directed);
        assert_eq!(merged.len(), 2);

        let xy = &merged[0];
        assert_eq!((xy.source.as_str(), xy.target.as_str()), ("x", "y"));
        assert!(close(xy.weight, 0.3));
        assert_eq!(xy.direction, Direction::Positive);
        assert!(close(xy.pvalue, 0.01));
        assert!(close(xy.pvalue2.unwrap(), 0.03));

        let xz = &merged[1];
        assert_eq!((xz.source.as_str(), xz.target.as_str()), ("x", "z"));
        assert!(close(xz.weight, 0.1));
        assert_eq!(xz.direction, Direction::Negative);
        assert!(close(xz.pvalue, 0.02));
        assert!(close(xz.pvalue2.unwrap(), 0.04));
    }

    #[test]
    fn directed_key_is_orientation_sensitive() {
        let a = vec![edge("x", "y", 0.2, 0.01)];
        let b = vec![edge("y", "x", 0.3, 0.03)];
        assert!(merge_comparison(&a, &b, JoinKey::Directed).is_empty());

        let merged = merge_comparison(&a, &b, JoinKey::Undirected);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source.as_str(), "x");
    }

    #[test]
    fn missing_beta_on_either_side_yields_nan() {
        let a = vec![edge("x", "y", 0.2, 0.01)];
        let b = vec![edge("x", "y", f64::NAN, 1.0)];
        let merged = merge_comparison(&a, &b, JoinKey::Directed);
        assert!(merged[0].weight.is_nan());
        assert_eq!(merged[0].direction, Direction::Neutral);
    }

    #[test]
    fn last_duplicate_in_second_list_wins() {
        let a = vec![edge("x", "y", 0.2, 0.01)];
        let b = vec![edge("x", "y", 0.9, 0.5), edge("x", "y", 0.1, 0.07)];
        let merged = merge_comparison(&a, &b, JoinKey::Directed);
        assert!(close(merged[0].weight, 0.2));
        assert!(close(merged[0].pvalue2.unwrap(), 0.07));
    }

    #[test]
    fn empty_inputs() {
        assert!(merge_comparison(&[], &[edge("x", "y", 0.1, 0.1)], JoinKey::Directed).is_empty());
        assert!(merge_comparison(&[edge("x", "y", 0.1, 0.1)], &[], JoinKey::Directed).is_empty());
    }
}
