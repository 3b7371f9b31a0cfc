//! Elasticsearch bridge for backend-agnostic data-set queries
//!
//! This crate compiles a typed [`Query`] tree into the engine's JSON Query DSL
//! and decodes the engine's responses back into typed records.
//!
//! # Operations
//!
//! - [`QueryCompiler::compile`] - Query tree to wire document
//! - [`EsClient::get_mappings`] - `GET /{index}/_mapping`
//! - [`EsClient::count`] - `GET /{indices}/{types}/_count`
//! - [`EsClient::search`] - `POST /{indices}/{types}/_search`
//!
//! # Query kinds
//!
//! Scoring (query context):
//! - `match_all`, `match`, `bool`, `filtered`
//!
//! Non-scoring (filter context):
//! - `term`, `range`, `exists`, `and`, `or`, `not`
//!
//! # Example
//!
//! ```no_run
//! use esbridge::{ClientBuilder, Query, RangeBounds, SearchRequest};
//!
//! # async fn run() -> esbridge::Result<()> {
//! let client = ClientBuilder::new()
//!     .server_url("http://localhost:9200")
//!     .cluster_name("elasticsearch")
//!     .index(["expenses"])
//!     .build()?;
//!
//! let request = SearchRequest::new(Query::and(vec![
//!     Query::term("status", "open"),
//!     Query::range("amount", RangeBounds::new().gte(100)),
//! ]));
//! let response = client.search(&request).await?;
//! println!("{} hits, columns {:?}", response.total_hits, response.column_ids);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod query;
pub mod response;

pub use client::{ClientBuilder, EsClient, SearchBackend, SearchRequest};
pub use config::{ConnectionConfig, EsConfig};
pub use error::{Error, ErrorKind, Result};
pub use query::{
    BoolQuery, Query, QueryCompiler, QueryKind, QueryList, RangeBounds, Scalar, SearchContext,
};
pub use response::{
    CountResponse, FieldMappingResponse, FieldType, IndexMappingResponse, IndexType,
    MappingsResponse, SearchHitResponse, SearchResponse, TypeMappingResponse,
};
