// Benchmark one filter pass (filter, prune, degree) and the comparative merge
// at varying edge counts.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use phenonet_core::filter::{
    JoinKey, PrefixClassifier, PruneRules, degree_map, filter_edges, merge_comparison, prune_nodes,
};
use phenonet_core::threshold::{FilterMode, ThresholdSet};
use phenonet_core::types::{AssociationStats, Edge, Node, NodeId};

/// Build a synthetic SNP–phenotype network.
///
/// `snp_count` SNPs each link to three of 500 phenotypes chosen by prime
/// strides; betas and p-values are spread deterministically so a typical
/// cutoff keeps roughly a third of the edges.
#[allow(clippy::cast_precision_loss)]
fn build_synthetic_network(snp_count: usize, salt: usize) -> (Vec<Node>, Vec<Edge>) {
    const PHENOTYPES: usize = 500;
    let mut nodes: Vec<Node> = (0..snp_count).map(|i| Node::new(format!("rs{i}"))).collect();
    nodes.extend((0..PHENOTYPES).map(|p| Node::new(format!("{p}"))));

    let mut edges = Vec::with_capacity(snp_count * 3);
    for i in 0..snp_count {
        for prime in [7, 13, 31] {
            let target = (i.wrapping_mul(prime) + salt) % PHENOTYPES;
            let beta = ((i * prime) % 200) as f64 / 100.0 - 1.0;
            let exponent = -(((i + prime + salt) % 12) as f64);
            edges.push(Edge::from_stats(
                NodeId::new(format!("rs{i}")),
                NodeId::new(format!("{target}")),
                &AssociationStats::new(beta, 10f64.powf(exponent)),
            ));
        }
    }
    (nodes, edges)
}

fn bench_filter_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_pass");
    let thresholds = ThresholdSet::default();
    let classifier = PrefixClassifier::default();
    let rules = PruneRules::default().with_anchor("250");

    for snp_count in [1_000, 10_000, 50_000] {
        let network = build_synthetic_network(snp_count, 0);

        group.bench_with_input(
            BenchmarkId::new("snps", snp_count),
            &network,
            |b, (nodes, edges)| {
                b.iter(|| {
                    let filtered = filter_edges(edges, &thresholds, FilterMode::Single);
                    let graph = prune_nodes(&filtered, nodes, &classifier, &rules);
                    degree_map(&graph.nodes, &graph.edges)
                });
            },
        );
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_comparison");

    for snp_count in [1_000, 10_000, 50_000] {
        let (_, a) = build_synthetic_network(snp_count, 0);
        let (_, b) = build_synthetic_network(snp_count, 0);

        group.bench_with_input(
            BenchmarkId::new("snps", snp_count),
            &(a, b),
            |bench, (a, b)| {
                bench.iter(|| merge_comparison(a, b, JoinKey::Directed));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_filter_pass, bench_merge);
criterion_main!(benches);
