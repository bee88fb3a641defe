use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use tracing::info;

use phenonet_core::pipeline::ViewParams;
use phenonet_core::types::NodeId;
use phenonet_core::view::{GraphView, PairView};

use super::{DataArgs, FilterArgs, OutputFormat};

#[derive(Args, Debug)]
pub struct PairArgs {
    /// First phenotype; its data file is loaded
    pub left: String,

    /// Second phenotype
    pub right: String,

    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Read parameter changes from stdin and recompute after each burst
    #[arg(long)]
    pub interactive: bool,
}

pub async fn run(args: PairArgs) -> anyhow::Result<()> {
    let (config, data_dir) = args.data.resolve()?;
    let params = args.filter.params(&config)?;

    let view = PairView::open(&config, &data_dir, &args.left, &args.right)
        .with_context(|| format!("Cannot open phenotypes {} and {}", args.left, args.right))?;
    let left = NodeId::new(args.left.trim());
    super::ensure_ancestries(view.records(), &left, &params.selection)?;

    if args.interactive {
        let window = Duration::from_millis(config.filter.debounce_ms);
        let view = Arc::new(view);
        let checked = Arc::clone(&view);
        let check = move |p: &ViewParams| {
            super::ensure_ancestries(checked.records(), &left, &p.selection)
        };
        return super::interactive::run(view, params, window, args.format, check).await;
    }

    let snapshot = view.derive(&params);
    info!(
        nodes = snapshot.graph.nodes.len(),
        edges = snapshot.graph.edges.len(),
        "Rendered pair view"
    );
    super::emit(&snapshot, args.format)
}
