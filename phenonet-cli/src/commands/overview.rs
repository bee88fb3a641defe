use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use phenonet_core::config::PhenonetConfig;
use phenonet_core::render::nodes_to_dot;
use phenonet_core::threshold::pvalue_label;
use phenonet_core::types::{Ancestry, Node, NodeId};
use phenonet_core::view::{EdgeType, Overview, OverviewSelection};
use phenonet_core::view::overview::OverviewNode;

use super::{DataArgs, OutputFormat};

#[derive(Args, Debug)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Ancestry whose weights are shown (default from the config)
    #[arg(long)]
    pub ancestry: Option<String>,

    /// P-value column label (1e-04) or exponent (-4)
    #[arg(long, allow_hyphen_values = true)]
    pub pvalue: Option<String>,

    /// Edge weight: weight, same or diff
    #[arg(long, default_value = "weight")]
    pub edge_type: EdgeType,

    /// Hide phenotypes whose precomputed degree is below this
    #[arg(long, default_value = "0")]
    pub min_degree: usize,

    /// List the neighbours of this phenotype instead of the graph
    #[arg(long)]
    pub node: Option<String>,

    /// List phenotypes whose label contains this text
    #[arg(long)]
    pub search: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Normalize a p-value argument to a column label.
fn column_label(raw: Option<&str>, config: &PhenonetConfig) -> String {
    let Some(raw) = raw.map(str::trim) else {
        return pvalue_label(config.overview.default_exponent);
    };
    match raw.parse::<i32>() {
        Ok(exponent) => {
            if !config.overview.pvalue_exponents.contains(&exponent) {
                warn!(exponent, "P-value exponent has no precomputed weights");
            }
            pvalue_label(exponent)
        }
        Err(_) => raw.to_string(),
    }
}

pub fn run(args: &OverviewArgs) -> anyhow::Result<()> {
    let (config, data_dir) = args.data.resolve()?;
    let overview = Overview::load(&config, &data_dir)
        .with_context(|| format!("Cannot read overview tables from {}", data_dir.display()))?;

    if let Some(id) = &args.node {
        let neighbors = overview.neighbors(&NodeId::new(id.trim()))?;
        return print_nodes(&format!("Neighbors of {id}"), &neighbors, args.format);
    }
    if let Some(query) = &args.search {
        let hits = overview.search(query);
        return print_nodes(&format!("Matches for '{query}'"), &hits, args.format);
    }

    let ancestry = args
        .ancestry
        .as_deref()
        .map_or_else(|| config.default_ancestry(), Ancestry::new);
    let selection = OverviewSelection::new(
        ancestry,
        column_label(args.pvalue.as_deref(), &config),
        args.edge_type,
    );
    let snapshot = overview.derive(&selection, args.min_degree)?;
    info!(
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        max_degree = overview.max_degree(),
        "Rendered overview"
    );
    super::emit(&snapshot, args.format)
}

fn print_nodes(title: &str, nodes: &[&OverviewNode], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(nodes)?),
        OutputFormat::Dot => {
            let plain: Vec<Node> = nodes.iter().map(|n| n.node.clone()).collect();
            print!("{}", nodes_to_dot(&plain));
        }
        OutputFormat::Text => {
            println!("{title} ({}):", nodes.len());
            for n in nodes {
                println!("  {:<12} {:<40} {:>6}", n.node.id.as_str(), n.node.display_name(), n.degree);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pvalue_argument_becomes_column_label() {
        let config = PhenonetConfig::default();
        assert_eq!(column_label(None, &config), "1e-04");
        assert_eq!(column_label(Some("-8"), &config), "1e-08");
        assert_eq!(column_label(Some("1e-06"), &config), "1e-06");
    }
}
