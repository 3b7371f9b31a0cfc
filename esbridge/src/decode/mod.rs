//! Decoders from engine response documents to typed results
//!
//! Decoders are pure: each call reads its own input document and builds
//! fresh output.

pub mod count;
pub mod mapping;
pub mod search;

pub use count::decode_count;
pub use mapping::decode_index_mapping;
pub use search::decode_search;

use serde_json::Value;

/// Render a source value as text.
///
/// Strings are kept verbatim, other scalars use their display form and
/// containers are written as compact JSON.
pub(crate) fn value_to_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => v.to_string(),
    }
}
