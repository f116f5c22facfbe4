//! Vector-store adapter for Azure AI Search.
//!
//! - [`filter`]: structured filters and their translation to OData `$filter`
//!   strings.
//! - [`store`]: the [`VectorStore`](store::VectorStore) trait and its
//!   request/response types.
//! - [`azure`]: the implementation over the search service REST API.

pub mod azure;
pub mod error;
pub mod filter;
pub mod prelude;
pub mod store;
