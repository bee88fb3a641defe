use crate::threshold::{FilterMode, ThresholdSet};
use crate::types::Edge;

/// True when `edge` passes every active predicate of `thresholds`.
///
/// Predicates run in order: p-value (both p-values in comparison mode),
/// then weight, then direction. NaN values fail every comparison.
pub fn edge_passes(edge: &Edge, thresholds: &ThresholdSet, mode: FilterMode) -> bool {
    let pvalue_ok = edge.pvalue < thresholds.p_max;
    let pvalue2_ok = match (mode, thresholds.p_max2) {
        (FilterMode::Comparison, Some(p_max2)) => edge.pvalue2.is_some_and(|p2| p2 < p_max2),
        _ => true,
    };
    let weight_ok = edge.weight > thresholds.beta_min;
    let direction_ok =
        thresholds.direction.is_neutral() || edge.direction == thresholds.direction;
    pvalue_ok && pvalue2_ok && weight_ok && direction_ok
}

/// Stable filter: surviving edges in input order.
pub fn filter_edges(edges: &[Edge], thresholds: &ThresholdSet, mode: FilterMode) -> Vec<Edge> {
    edges
        .iter()
        .filter(|e| edge_passes(e, thresholds, mode))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssociationStats, Direction};

    fn edge(src: &str, tgt: &str, beta: f64, pvalue: f64) -> Edge {
        Edge::from_stats(src.into(), tgt.into(), &AssociationStats::new(beta, pvalue))
    }

    fn ids(edges: &[Edge]) -> Vec<(&str, &str)> {
        edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect()
    }

    #[test]
    fn pvalue_cutoff_is_strict() {
        let edges = vec![edge("rs1", "a", 0.1, 1e-5), edge("rs2", "a", 0.1, 1e-4)];
        let kept = filter_edges(&edges, &ThresholdSet::default(), FilterMode::Single);
        assert_eq!(ids(&kept), [("rs1", "a")]);
    }

    #[test]
    fn beta_cutoff_is_strict_and_uses_magnitude() {
        let edges = vec![
            edge("rs1", "a", -0.3, 1e-6),
            edge("rs2", "a", 0.2, 1e-6),
            edge("rs3", "a", 0.1, 1e-6),
        ];
        let set = ThresholdSet::default().with_beta_min(0.2);
        assert_eq!(ids(&filter_edges(&edges, &set, FilterMode::Single)), [("rs1", "a")]);
    }

    #[test]
    fn nan_beta_never_passes() {
        let edges = vec![edge("rs1", "a", f64::NAN, 1e-9)];
        let set = ThresholdSet::default().with_beta_min(0.0);
        assert!(filter_edges(&edges, &set, FilterMode::Single).is_empty());
    }

    #[test]
    fn zero_beta_fails_default_cutoff() {
        let edges = vec![edge("rs1", "a", 0.0, 1e-9)];
        assert!(filter_edges(&edges, &ThresholdSet::default(), FilterMode::Single).is_empty());
    }

    #[test]
    fn direction_filter() {
        let edges = vec![edge("rs1", "a", -0.3, 1e-6), edge("rs2", "a", 0.3, 1e-6)];
        let neg = ThresholdSet::default().with_direction(Direction::Negative);
        assert_eq!(ids(&filter_edges(&edges, &neg, FilterMode::Single)), [("rs1", "a")]);
        let any = ThresholdSet::default();
        assert_eq!(filter_edges(&edges, &any, FilterMode::Single).len(), 2);
    }

    #[test]
    fn comparison_mode_checks_second_pvalue() {
        let mut with_p2 = edge("rs1", "a", 0.3, 1e-6);
        with_p2.pvalue2 = Some(1e-3);
        let mut strong_p2 = edge("rs2", "a", 0.3, 1e-6);
        strong_p2.pvalue2 = Some(1e-7);
        let no_p2 = edge("rs3", "a", 0.3, 1e-6);
        let edges = vec![with_p2, strong_p2, no_p2];

        let set = ThresholdSet::default().with_p_max2(Some(1e-4));
        let kept = filter_edges(&edges, &set, FilterMode::Comparison);
        assert_eq!(ids(&kept), [("rs2", "a")]);

        // Single mode ignores the second cutoff.
        assert_eq!(filter_edges(&edges, &set, FilterMode::Single).len(), 3);
    }

    #[test]
    fn comparison_without_second_cutoff_uses_primary_only() {
        let edges = vec![edge("rs1", "a", 0.3, 1e-6)];
        let kept = filter_edges(&edges, &ThresholdSet::default(), FilterMode::Comparison);
        assert_eq!(kept.len(), 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_edge() -> impl Strategy<Value = Edge> {
            (
                0u8..6,
                0u8..6,
                prop_oneof![Just(f64::NAN), -1.0f64..1.0],
                1e-12f64..1.0,
            )
                .prop_map(|(s, t, beta, p)| {
                    edge(&format!("rs{s}"), &format!("p{t}"), beta, p)
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn idempotent(edges in prop::collection::vec(arb_edge(), 0..40), exp in -12.0f64..0.0) {
                let set = ThresholdSet::default().with_p_max(10f64.powf(exp));
                let first = filter_edges(&edges, &set, FilterMode::Single);
                let second = filter_edges(&edges, &set, FilterMode::Single);
                prop_assert_eq!(ids(&first), ids(&second));
                let again = filter_edges(&first, &set, FilterMode::Single);
                prop_assert_eq!(ids(&again), ids(&first));
            }

            #[test]
            fn tighter_pvalue_never_grows(
                edges in prop::collection::vec(arb_edge(), 0..40),
                loose in -12.0f64..0.0,
                delta in 0.0f64..4.0,
            ) {
                let loose_set = ThresholdSet::default().with_p_max(10f64.powf(loose));
                let tight_set = loose_set.with_p_max(10f64.powf(loose - delta));
                let loose_n = filter_edges(&edges, &loose_set, FilterMode::Single).len();
                let tight_n = filter_edges(&edges, &tight_set, FilterMode::Single).len();
                prop_assert!(tight_n <= loose_n);
            }

            #[test]
            fn tighter_beta_never_grows(
                edges in prop::collection::vec(arb_edge(), 0..40),
                loose in 0.0f64..1.0,
                delta in 0.0f64..1.0,
            ) {
                let loose_set = ThresholdSet::default().with_p_max(1.0).with_beta_min(loose);
                let tight_set = loose_set.with_beta_min((loose + delta).min(1.0));
                let loose_n = filter_edges(&edges, &loose_set, FilterMode::Single).len();
                let tight_n = filter_edges(&edges, &tight_set, FilterMode::Single).len();
                prop_assert!(tight_n <= loose_n);
            }

            #[test]
            fn output_is_ordered_subsequence(edges in prop::collection::vec(arb_edge(), 0..40)) {
                let set = ThresholdSet::default().with_p_max(0.5);
                let kept = filter_edges(&edges, &set, FilterMode::Single);
                let mut cursor = edges.iter();
                for e in &kept {
                    prop_assert!(cursor.any(|c| c.source == e.source && c.target == e.target && c.pvalue.to_bits() == e.pvalue.to_bits()));
                }
            }
        }
    }
}
