use anyhow::Context;
use clap::Args;

use phenonet_core::load::load_phenotype;
use phenonet_core::types::{Ancestry, NodeId};
use phenonet_core::view::available_ancestries;

use super::DataArgs;

#[derive(Args, Debug)]
pub struct AncestriesArgs {
    /// Phenotype to inspect
    pub center: String,

    #[command(flatten)]
    pub data: DataArgs,

    /// Print a JSON array of available ancestries
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &AncestriesArgs) -> anyhow::Result<()> {
    let (config, data_dir) = args.data.resolve()?;
    let table = load_phenotype(&config, &data_dir, &args.center)
        .with_context(|| format!("Cannot load data for phenotype {}", args.center))?;
    let anchor = NodeId::new(args.center.trim());

    // Configured ancestries first, then any others the table carries.
    let mut known = config.known_ancestries();
    for ancestry in &table.ancestries {
        if !known.contains(ancestry) {
            known.push(ancestry.clone());
        }
    }
    let available = available_ancestries(&table.records, &anchor, &known);

    if args.json {
        let labels: Vec<&str> = available.iter().map(Ancestry::as_str).collect();
        println!("{}", serde_json::to_string_pretty(&labels)?);
        return Ok(());
    }

    println!("Ancestries for {anchor}:");
    for ancestry in &known {
        let status = if available.contains(ancestry) {
            "available"
        } else {
            "no data"
        };
        println!("  {:<8} {status}", ancestry.as_str());
    }
    Ok(())
}
