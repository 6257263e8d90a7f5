//! Rewrite passes over a [`DefinitionSet`](crate::ir::DefinitionSet)
//!
//! Every pass takes the whole set by value and returns a new one. Passes never
//! look at configuration beyond what they are handed, so each can be tested
//! in isolation and the orchestrator only has to sequence them.

pub mod atomic_ops;
pub mod combine_filters;
pub mod dedup;
pub mod rename;

pub use atomic_ops::strip_atomic_operations;
pub use combine_filters::combine_scalar_filters;
pub use dedup::{deduplicate_types, DedupOutcome};
pub use rename::{build_rename_table, rename_types};
