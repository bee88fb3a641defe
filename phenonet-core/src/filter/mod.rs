//! The derived-graph pipeline: edge filtering, node pruning, comparative
//! merging and degree aggregation.
//!
//! Every function here is a pure function of its inputs. Unusable values are
//! normalized when records are loaded, so none of these can fail.

pub mod degree;
pub mod edge;
pub mod merge;
pub mod prune;

pub use degree::{DegreeMap, degree_map};
pub use edge::filter_edges;
pub use merge::{JoinKey, merge_comparison};
pub use prune::{NodeClassifier, PrefixClassifier, PruneRules, prune_nodes};
