use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::filter::merge::JoinKey;
use crate::types::Ancestry;

/// Top-level Phenonet configuration, matching `phenonet.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhenonetConfig {
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub columns: ColumnSection,
    #[serde(default)]
    pub filter: FilterSection,
    #[serde(default)]
    pub phenotype_view: PhenotypeViewSection,
    #[serde(default)]
    pub pair_view: PairViewSection,
    #[serde(default)]
    pub ancestries: AncestrySection,
    #[serde(default)]
    pub overview: OverviewSection,
}

impl PhenonetConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.filter;
        if !f.pvalue_exponent.is_finite() || f.pvalue_exponent > 0.0 {
            return Err(ConfigError::Invalid(format!(
                "filter.pvalue_exponent must be <= 0, got {}",
                f.pvalue_exponent
            )));
        }
        if !(0.0..=1.0).contains(&f.beta_min) {
            return Err(ConfigError::Invalid(format!(
                "filter.beta_min must be within [0, 1], got {}",
                f.beta_min
            )));
        }
        if f.primary_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "filter.primary_prefix must not be empty".into(),
            ));
        }
        if self.phenotype_view.top_anchor_links == 0 || self.phenotype_view.top_secondary == 0 {
            return Err(ConfigError::Invalid(
                "phenotype_view limits must be positive".into(),
            ));
        }
        if self.pair_view.max_primaries == 0 {
            return Err(ConfigError::Invalid(
                "pair_view.max_primaries must be positive".into(),
            ));
        }
        if self.ancestries.known.is_empty() {
            return Err(ConfigError::Invalid("ancestries.known is empty".into()));
        }
        let default = Ancestry::new(&self.ancestries.default);
        if !self.known_ancestries().contains(&default) {
            return Err(ConfigError::Invalid(format!(
                "ancestries.default '{default}' is not in ancestries.known"
            )));
        }
        if self.overview.pvalue_exponents.iter().any(|e| *e > 0) {
            return Err(ConfigError::Invalid(
                "overview.pvalue_exponents must be <= 0".into(),
            ));
        }
        Ok(())
    }

    pub fn known_ancestries(&self) -> Vec<Ancestry> {
        self.ancestries.known.iter().map(|a| Ancestry::new(a)).collect()
    }

    pub fn default_ancestry(&self) -> Ancestry {
        Ancestry::new(&self.ancestries.default)
    }

    /// Directory holding one CSV per phenotype.
    pub fn node_files_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.data.node_files)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    pub dir: PathBuf,
    pub node_files: PathBuf,
    pub edgelist: PathBuf,
    pub node_attributes: PathBuf,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public/data"),
            node_files: PathBuf::from("node_files"),
            edgelist: PathBuf::from("edgelist_updated_scaled.csv"),
            node_attributes: PathBuf::from("node_attributes.csv"),
        }
    }
}

/// Column names in the per-phenotype association tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSection {
    pub source: String,
    pub target: String,
    pub source_color: String,
    pub target_color: String,
    pub target_label: String,
    pub target_category: String,
    pub chromosome: String,
    pub beta_prefix: String,
    pub pvalue_prefix: String,
}

impl Default for ColumnSection {
    fn default() -> Self {
        Self {
            source: "rsid".into(),
            target: "phe_id".into(),
            source_color: "rsid_hex".into(),
            target_color: "phe_hex".into(),
            target_label: "phe_label".into(),
            target_category: "phe_cat".into(),
            chromosome: "chrom".into(),
            beta_prefix: "beta.".into(),
            pvalue_prefix: "pval.".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Default p-value cutoff as a base-10 exponent.
    pub pvalue_exponent: f64,
    pub beta_min: f64,
    pub min_primary_degree: usize,
    /// Ids starting with this prefix are primary (SNP) nodes.
    pub primary_prefix: String,
    pub debounce_ms: u64,
    pub join_key: JoinKey,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            pvalue_exponent: -4.0,
            beta_min: 0.0,
            min_primary_degree: 2,
            primary_prefix: "rs".into(),
            debounce_ms: 200,
            join_key: JoinKey::Directed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhenotypeViewSection {
    /// Number of strongest anchor associations whose SNPs are shown.
    pub top_anchor_links: usize,
    /// Number of highest-degree neighbouring phenotypes shown.
    pub top_secondary: usize,
}

impl Default for PhenotypeViewSection {
    fn default() -> Self {
        Self {
            top_anchor_links: 100,
            top_secondary: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PairViewSection {
    /// Shared SNPs above this count are downsampled evenly by chromosome.
    pub max_primaries: usize,
}

impl Default for PairViewSection {
    fn default() -> Self {
        Self { max_primaries: 100 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AncestrySection {
    pub known: Vec<String>,
    pub default: String,
}

impl Default for AncestrySection {
    fn default() -> Self {
        Self {
            known: vec![
                "amr".into(),
                "eas".into(),
                "afr".into(),
                "eur".into(),
                "meta".into(),
            ],
            default: "meta".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewSection {
    /// Exponents with precomputed weight columns in the edge list.
    pub pvalue_exponents: Vec<i32>,
    pub default_exponent: i32,
}

impl Default for OverviewSection {
    fn default() -> Self {
        Self {
            pvalue_exponents: (-12..=-4).collect(),
            default_exponent: -4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PhenonetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_ancestry().as_str(), "meta");
        assert_eq!(config.known_ancestries().len(), 5);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = PhenonetConfig::from_toml(
            "[filter]\npvalue_exponent = -6.0\nbeta_min = 0.1\nmin_primary_degree = 3\n\
             primary_prefix = \"rs\"\ndebounce_ms = 100\njoin_key = \"undirected\"\n",
        )
        .unwrap();
        assert_eq!(config.filter.min_primary_degree, 3);
        assert_eq!(config.filter.join_key, JoinKey::Undirected);
        assert_eq!(config.columns.source, "rsid");
        assert_eq!(config.pair_view.max_primaries, 100);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = PhenonetConfig::from_toml("[pair_view]\nmax_primaries = 25\n[filter]\nbeta_min = 0.2\n").unwrap();
        assert_eq!(config.pair_view.max_primaries, 25);
        assert!((config.filter.beta_min - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.filter.debounce_ms, 200);
    }

    #[test]
    fn default_round_trips_through_toml() {
        let text = PhenonetConfig::default().to_toml().unwrap();
        let back = PhenonetConfig::from_toml(&text).unwrap();
        assert_eq!(back.overview.pvalue_exponents, (-12..=-4).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = PhenonetConfig::from_toml(
            "[filter]\npvalue_exponent = 2.0\nbeta_min = 0.0\nmin_primary_degree = 2\n\
             primary_prefix = \"rs\"\ndebounce_ms = 200\njoin_key = \"directed\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = PhenonetConfig::from_toml("[ancestries]\nknown = [\"eur\"]\ndefault = \"afr\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let err = PhenonetConfig::from_toml("[filter\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = PhenonetConfig::load(&dir.path().join("phenonet.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
