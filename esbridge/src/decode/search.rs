use crate::decode::value_to_text;
use crate::error::{Error, Result};
use crate::response::{SearchHitResponse, SearchResponse};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Status reported for every successfully decoded search
pub const SEARCH_STATUS_OK: u16 = 200;

/// `_search` response structure
#[derive(Debug, Deserialize)]
struct EsSearchResponse {
    took: u64,
    #[serde(rename = "_shards")]
    shards: EsShards,
    #[serde(default)]
    hits: Option<EsHits>,
}

#[derive(Debug, Deserialize)]
struct EsShards {
    total: u32,
    successful: u32,
    failed: u32,
}

#[derive(Debug, Deserialize)]
struct EsHits {
    total: EsTotalHits,
    #[serde(default)]
    max_score: Option<f32>,
    #[serde(default)]
    hits: Vec<EsHit>,
}

/// A plain number, or `{"value": n, "relation": ".."}` on newer engines
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EsTotalHits {
    Count(u64),
    Object { value: u64 },
}

impl EsTotalHits {
    fn value(&self) -> u64 {
        match self {
            EsTotalHits::Count(n) => *n,
            EsTotalHits::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EsHit {
    #[serde(rename = "_score", default)]
    score: Option<f32>,
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_type", default)]
    doc_type: Option<String>,
    #[serde(rename = "_version", default)]
    version: Option<u64>,
    #[serde(rename = "_source", default)]
    source: Option<Map<String, Value>>,
}

/// Decode a `_search` response.
///
/// A response without `hits` decodes to zero totals and no hits. Column ids
/// are derived from the hits' source fields, not supplied by the engine.
pub fn decode_search(document: &Value) -> Result<SearchResponse> {
    let raw = EsSearchResponse::deserialize(document).map_err(|source| Error::Decode {
        what: "search",
        source,
    })?;

    let (total_hits, max_score, hits) = match raw.hits {
        Some(hits) => (
            hits.total.value(),
            hits.max_score.unwrap_or(0.0),
            hits.hits.into_iter().map(convert_hit).collect::<Vec<_>>(),
        ),
        None => (0, 0.0, Vec::new()),
    };

    let column_ids = column_ids(&hits);

    Ok(SearchResponse {
        took_millis: raw.took,
        status: SEARCH_STATUS_OK,
        total_hits,
        max_score,
        total_shards: raw.shards.total,
        successful_shards: raw.shards.successful,
        failed_shards: raw.shards.failed,
        column_ids,
        hits,
    })
}

fn convert_hit(hit: EsHit) -> SearchHitResponse {
    let fields: IndexMap<String, String> = hit
        .source
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let text = value_to_text(&value);
            (name, text)
        })
        .collect();

    SearchHitResponse {
        score: hit.score.unwrap_or(0.0),
        index: hit.index,
        id: hit.id,
        doc_type: hit.doc_type.unwrap_or_default(),
        version: hit.version.unwrap_or(0),
        fields,
    }
}

/// Union of the hits' field names: the first hit's keys in its order, then
/// keys first seen in later hits
fn column_ids(hits: &[SearchHitResponse]) -> Vec<String> {
    let mut columns = IndexSet::new();
    for hit in hits {
        for name in hit.fields.keys() {
            if !columns.contains(name) {
                columns.insert(name.clone());
            }
        }
    }
    columns.into_iter().collect()
}
