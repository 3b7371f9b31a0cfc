use crate::error::{Error, Result};
use crate::response::CountResponse;
use serde::Deserialize;
use serde_json::Value;

/// `_count` response structure
#[derive(Debug, Deserialize)]
struct EsCountResponse {
    count: f64,
    #[serde(rename = "_shards")]
    shards: EsCountShards,
}

#[derive(Debug, Deserialize)]
struct EsCountShards {
    total: u32,
}

/// Decode a `_count` response. Both `count` and `_shards.total` are required.
pub fn decode_count(document: &Value) -> Result<CountResponse> {
    let raw = EsCountResponse::deserialize(document).map_err(|source| Error::Decode {
        what: "count",
        source,
    })?;

    Ok(CountResponse {
        // The engine reports the count as a JSON number that may carry a fraction
        count: raw.count as u64,
        total_shards: raw.shards.total,
    })
}
