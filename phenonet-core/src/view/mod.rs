//! Views: the different ways of turning loaded records into a network that
//! a filter pass runs over.

pub mod overview;
pub mod pair;
pub mod phenotype;

use crate::pipeline::{ViewParams, ViewSnapshot};
use crate::types::{Ancestry, NodeId, Record};

pub use overview::{EdgeType, Overview, OverviewSelection, OverviewSnapshot};
pub use pair::PairView;
pub use phenotype::PhenotypeView;

/// A view that can be re-derived for any set of parameters.
pub trait GraphView: Send + Sync {
    /// Human-readable name for this view.
    fn name(&self) -> &'static str;

    /// Nodes that stay visible whatever the thresholds.
    fn anchors(&self) -> Vec<NodeId>;

    /// Run one filter pass.
    fn derive(&self, params: &ViewParams) -> ViewSnapshot;
}

/// Ancestries from `known` for which `anchor` has at least one usable beta.
///
/// Callers use this to warn about, and skip, ancestries that would render
/// an empty graph.
pub fn available_ancestries(records: &[Record], anchor: &NodeId, known: &[Ancestry]) -> Vec<Ancestry> {
    known
        .iter()
        .filter(|ancestry| {
            records
                .iter()
                .filter(|r| &r.target == anchor || &r.source == anchor)
                .any(|r| r.stats_for(ancestry).has_beta())
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnSection;
    use crate::load::AssociationTable;
    use crate::table::Table;

    #[test]
    fn ancestries_without_beta_are_unavailable() {
        let table = Table::parse(
            "rsid,phe_id,beta.eur,pval.eur,beta.afr,pval.afr,beta.eas,pval.eas\n\
             rs1,250,0.1,1e-6,NA,NA,0.2,0.1\n\
             rs2,250,0.2,1e-6,,,NA,NA\n\
             rs2,401,0.2,1e-6,0.5,1e-9,NA,NA\n",
        )
        .unwrap();
        let loaded = AssociationTable::from_table(&table, &ColumnSection::default()).unwrap();
        let known: Vec<Ancestry> = ["amr", "eas", "afr", "eur"].into_iter().map(Ancestry::new).collect();

        let available = available_ancestries(&loaded.records, &NodeId::new("250"), &known);
        assert_eq!(available, vec![Ancestry::new("eas"), Ancestry::new("eur")]);
    }
}
