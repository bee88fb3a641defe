use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use tracing::info;

use phenonet_core::pipeline::ViewParams;
use phenonet_core::view::{GraphView, PhenotypeView};

use super::{DataArgs, FilterArgs, OutputFormat};

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Phenotype at the center of the network
    pub center: String,

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

pub async fn run(args: ViewArgs) -> anyhow::Result<()> {
    let (config, data_dir) = args.data.resolve()?;
    let params = args.filter.params(&config)?;

    let view = PhenotypeView::open(&config, &data_dir, &args.center)
        .with_context(|| format!("Cannot open phenotype {}", args.center))?;
    super::ensure_ancestries(view.records(), view.anchor(), &params.selection)?;

    if args.interactive {
        let window = Duration::from_millis(config.filter.debounce_ms);
        let view = Arc::new(view);
        let checked = Arc::clone(&view);
        let check = move |p: &ViewParams| {
            super::ensure_ancestries(checked.records(), checked.anchor(), &p.selection)
        };
        return super::interactive::run(view, params, window, args.format, check).await;
    }

    let snapshot = view.derive(&params);
    info!(
        nodes = snapshot.graph.nodes.len(),
        edges = snapshot.graph.edges.len(),
        "Rendered phenotype view"
    );
    super::emit(&snapshot, args.format)
}
