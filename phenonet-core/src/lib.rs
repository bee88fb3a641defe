//! Phenonet core library: filtering and aggregation of phenotype association
//! graphs.
//!
//! Association records are loaded once ([`load`]) and never mutated. Each
//! change of thresholds or ancestry runs one pass through the
//! [`filter`] components (Edge Filter → Node Pruner → Degree Aggregator)
//! over the network a [`view`] prepares. [`controller::FilterController`]
//! debounces parameter bursts and publishes the resulting snapshots.

pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod load;
pub mod pipeline;
pub mod render;
pub mod table;
pub mod threshold;
pub mod types;
pub mod view;
