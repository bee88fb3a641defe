//! Turning CSV tables into immutable association records.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{ColumnSection, PhenonetConfig};
use crate::error::LoadError;
use crate::table::Table;
use crate::types::{
    Ancestry, AssociationStats, DisplayMetadata, EndpointMeta, NodeId, Record, display_value,
};

/// Records loaded from one or more association tables.
#[derive(Debug, Clone, Default)]
pub struct AssociationTable {
    pub records: Vec<Record>,
    /// Ancestries with a beta column, in header order.
    pub ancestries: Vec<Ancestry>,
}

impl AssociationTable {
    /// Convert a parsed table using the configured column names.
    ///
    /// Source and target columns are required. Every `beta.<ancestry>`
    /// header defines an ancestry; its `pval.<ancestry>` column is optional
    /// and reads as "never significant" when absent.
    pub fn from_table(table: &Table, columns: &ColumnSection) -> Result<Self, LoadError> {
        let source = table.require(&columns.source)?;
        let target = table.require(&columns.target)?;
        let source_color = table.column(&columns.source_color);
        let target_color = table.column(&columns.target_color);
        let target_label = table.column(&columns.target_label);
        let target_category = table.column(&columns.target_category);
        let chromosome = table.column(&columns.chromosome);

        let mut consumed: HashSet<usize> = [source, target].into_iter().collect();
        consumed.extend(
            [source_color, target_color, target_label, target_category, chromosome]
                .into_iter()
                .flatten(),
        );

        let mut ancestries = Vec::new();
        let mut stat_columns = Vec::new();
        for (i, header) in table.headers().iter().enumerate() {
            let Some(label) = header.strip_prefix(&columns.beta_prefix) else {
                continue;
            };
            let ancestry = Ancestry::new(label);
            let pval = table.column(&ancestry.column(&columns.pvalue_prefix));
            consumed.insert(i);
            if let Some(p) = pval {
                consumed.insert(p);
            }
            stat_columns.push((ancestry.clone(), i, pval));
            ancestries.push(ancestry);
        }
        // p-value columns without a matching beta column are not statistics
        // we can use, but they are still not display data.
        for (i, header) in table.headers().iter().enumerate() {
            if header.starts_with(&columns.pvalue_prefix) {
                consumed.insert(i);
            }
        }

        let cell = |row: &[String], col: Option<usize>| -> Option<String> {
            col.and_then(|c| row.get(c))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let mut records = Vec::with_capacity(table.len());
        let mut skipped = 0usize;
        for row in table.rows() {
            let (Some(src), Some(tgt)) = (cell(row, Some(source)), cell(row, Some(target))) else {
                skipped += 1;
                continue;
            };

            let stats: BTreeMap<Ancestry, AssociationStats> = stat_columns
                .iter()
                .map(|(ancestry, beta_col, pval_col)| {
                    let beta = row.get(*beta_col).map_or("", String::as_str);
                    let pval = pval_col.and_then(|c| row.get(c)).map_or("", String::as_str);
                    (ancestry.clone(), AssociationStats::parse(beta, pval))
                })
                .collect();

            let display: DisplayMetadata = table
                .headers()
                .iter()
                .enumerate()
                .filter(|(i, _)| !consumed.contains(i))
                .map(|(i, h)| (h.clone(), display_value(&row[i])))
                .collect();

            records.push(Record {
                source: NodeId::new(src),
                target: NodeId::new(tgt),
                stats,
                source_meta: EndpointMeta {
                    color: cell(row, source_color),
                    label: None,
                    category: None,
                    chromosome: cell(row, chromosome),
                },
                target_meta: EndpointMeta {
                    color: cell(row, target_color),
                    label: cell(row, target_label),
                    category: cell(row, target_category),
                    chromosome: None,
                },
                display,
            });
        }

        if skipped > 0 {
            debug!(skipped, "Skipped rows without source or target id");
        }

        Ok(Self {
            records,
            ancestries,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Locate the data files for one phenotype.
///
/// Either `<id>.csv`, or a chunked set `<id>_1.csv`, `<id>_2.csv`, ... that
/// is read in order and concatenated.
pub fn phenotype_files(dir: &Path, id: &str) -> Result<Vec<PathBuf>, LoadError> {
    let single = dir.join(format!("{id}.csv"));
    if single.is_file() {
        return Ok(vec![single]);
    }

    let chunks: Vec<PathBuf> = (1..)
        .map(|n| dir.join(format!("{id}_{n}.csv")))
        .take_while(|p| p.is_file())
        .collect();
    if chunks.is_empty() {
        return Err(LoadError::DataFileNotFound {
            id: id.to_string(),
            dir: dir.display().to_string(),
        });
    }
    Ok(chunks)
}

/// Load every association row for a phenotype from the data directory.
pub fn load_phenotype(
    config: &PhenonetConfig,
    data_dir: &Path,
    id: &str,
) -> Result<AssociationTable, LoadError> {
    let dir = config.node_files_dir(data_dir);
    let files = phenotype_files(&dir, id)?;

    let mut table = Table::default();
    for file in &files {
        let chunk = Table::from_path(file)?;
        debug!(path = %file.display(), rows = chunk.len(), "Read phenotype chunk");
        table.extend(&chunk);
    }

    let loaded = AssociationTable::from_table(&table, &config.columns)?;
    info!(
        phenotype = id,
        files = files.len(),
        rows = loaded.len(),
        ancestries = loaded.ancestries.len(),
        "Loaded phenotype data"
    );
    Ok(loaded)
}
