//! Line-oriented parameter updates fed through a [`FilterController`].
//!
//! Each stdin line is one change, e.g. `pvalue -6`, `beta 0.2`,
//! `direction -1`, `ancestry afr`, `compare eur` or `compare none`. Each
//! candidate goes through `check` first; rejected lines are reported and
//! dropped. A summary line goes to stderr for every published snapshot; the
//! final snapshot is rendered to stdout once stdin closes.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use phenonet_core::controller::FilterController;
use phenonet_core::pipeline::ViewParams;
use phenonet_core::threshold::{parse_beta_cutoff, parse_direction, parse_pvalue_cutoff};
use phenonet_core::types::Ancestry;
use phenonet_core::view::GraphView;

use super::OutputFormat;

pub async fn run<F>(
    view: Arc<dyn GraphView>,
    initial: ViewParams,
    window: Duration,
    format: OutputFormat,
    check: F,
) -> anyhow::Result<()>
where
    F: Fn(&ViewParams) -> anyhow::Result<()>,
{
    let controller = FilterController::spawn(view, initial, window);

    let mut updates = controller.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = Arc::clone(&updates.borrow_and_update());
            eprintln!(
                "generation {}: {} nodes, {} edges",
                snapshot.generation,
                snapshot.graph.nodes.len(),
                snapshot.graph.edges.len()
            );
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Cannot read stdin")? {
        let update = apply(&line, controller.params())
            .and_then(|params| params.map(|p| check(&p).map(|()| p)).transpose());
        match update {
            Ok(Some(params)) => controller.set_params(params),
            Ok(None) => {}
            Err(e) => eprintln!("Ignored: {e:#}"),
        }
    }

    let target = controller.params();
    let mut rx = controller.subscribe();
    let last = Arc::clone(
        &*rx.wait_for(|s| s.params == target)
            .await
            .context("Filter controller stopped")?,
    );
    // The snapshot sender goes away with the controller task, so the
    // printer drains the last unseen snapshot and then stops.
    controller.shutdown().await;
    if let Err(e) = printer.await {
        debug!(error = %e, "Snapshot printer ended abnormally");
    }

    super::emit(&*last, format)
}

/// Apply one update line to `params`. Blank lines and `#` comments yield
/// `None`.
pub fn apply(line: &str, mut params: ViewParams) -> anyhow::Result<Option<ViewParams>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (key, value) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(k, v)| (k, v.trim()));

    let t = &mut params.thresholds;
    match key {
        "pvalue" => t.p_max = parse_pvalue_cutoff(value)?,
        "pvalue2" if value == "none" => t.p_max2 = None,
        "pvalue2" => t.p_max2 = Some(parse_pvalue_cutoff(value)?),
        "beta" => t.beta_min = parse_beta_cutoff(value)?,
        "direction" => t.direction = parse_direction(value)?,
        "ancestry" if !value.is_empty() => params.selection.primary = Ancestry::new(value),
        "compare" if value == "none" => params.selection.secondary = None,
        "compare" if !value.is_empty() => params.selection.secondary = Some(Ancestry::new(value)),
        _ => anyhow::bail!("unknown update: {line}"),
    }
    Ok(Some(params))
}
