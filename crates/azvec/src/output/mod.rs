//! Output formatting for the azvec CLI.
//!
//! - [`indexes`] - Index list and stats output
//! - [`results`] - Query result and upsert output
//! - [`helpers`] - Common formatting utilities

pub mod helpers;
mod indexes;
mod results;

pub use indexes::{
    format_index_names_json, format_index_names_table, format_index_stats_json,
    format_index_stats_table,
};
pub use results::{
    format_query_results_json, format_query_results_table, format_upsert_json,
    format_upsert_table,
};
