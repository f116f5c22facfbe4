//! Wire models for the Azure AI Search REST API.
//!
//! Index definitions, document batches, and search requests/responses.

mod document;
mod index;
mod search;

pub use document::*;
pub use index::*;
pub use search::*;
