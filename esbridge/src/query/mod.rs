//! Query model and its compilation to the engine's Query DSL

pub mod compiler;
pub mod types;

pub use compiler::{classify, QueryCompiler, SearchContext};
pub use types::{BoolQuery, Query, QueryKind, QueryList, RangeBounds, Scalar};
