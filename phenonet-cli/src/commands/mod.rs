pub mod ancestries;
pub mod config;
pub mod interactive;
pub mod overview;
pub mod pair;
pub mod view;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand, ValueEnum};
use tracing::{debug, warn};

use phenonet_core::config::PhenonetConfig;
use phenonet_core::error::ViewError;
use phenonet_core::pipeline::ViewParams;
use phenonet_core::render::GraphRender;
use phenonet_core::threshold::ThresholdSet;
use phenonet_core::types::{Ancestry, AncestrySelection, NodeId, Record};
use phenonet_core::view::available_ancestries;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the network around one phenotype
    View(view::ViewArgs),
    /// Show the SNPs two phenotypes have in common
    Pair(pair::PairArgs),
    /// Explore the phenotype-phenotype overview graph
    Overview(overview::OverviewArgs),
    /// List which ancestries have data for a phenotype
    Ancestries(ancestries::AncestriesArgs),
    /// Print the effective configuration as TOML
    Config(config::ConfigArgs),
}

pub async fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::View(args) => view::run(args).await,
        Command::Pair(args) => pair::run(args).await,
        Command::Overview(args) => overview::run(&args),
        Command::Ancestries(args) => ancestries::run(&args),
        Command::Config(args) => config::run(&args),
    }
}

// ── Shared arguments ─────────────────────────────────────────────────

const DEFAULT_DATA_DIR: &str = "public/data";
const CONFIG_FILE: &str = "phenonet.toml";

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Directory holding node_files/, the edge list and node attributes
    /// (default: data.dir from the config, `public/data`)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: <data-dir>/phenonet.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl DataArgs {
    /// Load the config and resolve the data directory.
    pub fn resolve(&self) -> anyhow::Result<(PhenonetConfig, PathBuf)> {
        let config = self.load_config()?;
        let data_dir = self
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.data.dir));
        Ok((config, data_dir))
    }

    fn load_config(&self) -> anyhow::Result<PhenonetConfig> {
        if let Some(path) = &self.config {
            return PhenonetConfig::load(path)
                .with_context(|| format!("Cannot load config: {}", path.display()));
        }
        let dir = self
            .data_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DATA_DIR));
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "Using config from data directory");
            return PhenonetConfig::load(&candidate)
                .with_context(|| format!("Cannot load config: {}", candidate.display()));
        }
        Ok(PhenonetConfig::default())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Ancestry to show (default: ancestries.default from the config)
    #[arg(long)]
    pub ancestry: Option<String>,

    /// Second ancestry; enables comparison mode
    #[arg(long)]
    pub compare: Option<String>,

    /// P-value cutoff as an exponent (-4) or a literal (1e-04)
    #[arg(long, allow_hyphen_values = true)]
    pub pvalue: Option<String>,

    /// P-value cutoff for the compared ancestry
    #[arg(long, allow_hyphen_values = true)]
    pub pvalue2: Option<String>,

    /// Minimum absolute beta, in [0, 1]
    #[arg(long)]
    pub beta: Option<String>,

    /// Required effect direction: -1, 0 (any) or 1
    #[arg(long, allow_hyphen_values = true)]
    pub direction: Option<String>,
}

impl FilterArgs {
    /// Combine command-line cutoffs with config defaults.
    pub fn params(&self, config: &PhenonetConfig) -> anyhow::Result<ViewParams> {
        let primary = self
            .ancestry
            .as_deref()
            .map_or_else(|| config.default_ancestry(), Ancestry::new);
        let selection = match self.compare.as_deref() {
            Some(second) => AncestrySelection::compare(primary, Ancestry::new(second)),
            None => AncestrySelection::single(primary),
        };

        let pvalue = self
            .pvalue
            .clone()
            .unwrap_or_else(|| config.filter.pvalue_exponent.to_string());
        let beta = self
            .beta
            .clone()
            .unwrap_or_else(|| config.filter.beta_min.to_string());
        let thresholds = ThresholdSet::parse(
            &pvalue,
            self.pvalue2.as_deref(),
            &beta,
            self.direction.as_deref().unwrap_or("0"),
        )?;
        Ok(ViewParams::new(selection, thresholds))
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Dot,
}

pub fn emit<R: GraphRender>(snapshot: &R, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", snapshot.to_text()),
        OutputFormat::Json => println!("{}", snapshot.to_json()?),
        OutputFormat::Dot => print!("{}", snapshot.to_dot()),
    }
    Ok(())
}

/// Fail when a selected ancestry has no beta values for `anchor`.
pub fn ensure_ancestries(
    records: &[Record],
    anchor: &NodeId,
    selection: &AncestrySelection,
) -> anyhow::Result<()> {
    let selected: Vec<Ancestry> = std::iter::once(selection.primary.clone())
        .chain(selection.secondary.clone())
        .collect();
    let available = available_ancestries(records, anchor, &selected);
    for ancestry in selected {
        if !available.contains(&ancestry) {
            warn!(ancestry = %ancestry, anchor = %anchor, "Ancestry has no data for this phenotype");
            return Err(ViewError::AncestryUnavailable {
                ancestry: ancestry.to_string(),
                anchor: anchor.to_string(),
            }
            .into());
        }
    }
    Ok(())
}
