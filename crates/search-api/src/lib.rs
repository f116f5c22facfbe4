//! Azure AI Search REST client library
//!
//! # Quick Start
//!
//! For convenient imports, use the prelude:
//!
//! ```
//! use azure_search_api_rs::prelude::*;
//! ```
//!
//! This re-exports the most commonly used types including [`SearchClient`](client::SearchClient),
//! error types, and the index/document/search models.

pub mod client;
mod documents;
pub mod error;
mod indexes;
pub mod models;
pub mod prelude;
mod retry;
