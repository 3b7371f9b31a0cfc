//! Query tree to Elasticsearch Query DSL compiler

use crate::query::types::{BoolQuery, Query, QueryList, RangeBounds};
use serde_json::{Map, Value};

pub const SEARCH_API_FIELD: &str = "field";
pub const SEARCH_API_EXISTS: &str = "exists";
pub const SEARCH_API_TERM: &str = "term";
pub const SEARCH_API_LT: &str = "lt";
pub const SEARCH_API_LTE: &str = "lte";
pub const SEARCH_API_GT: &str = "gt";
pub const SEARCH_API_GTE: &str = "gte";
pub const SEARCH_API_RANGE: &str = "range";
pub const SEARCH_API_AND: &str = "and";
pub const SEARCH_API_OR: &str = "or";
pub const SEARCH_API_NOT: &str = "not";
pub const SEARCH_API_FILTER: &str = "filter";
pub const SEARCH_API_QUERY: &str = "query";
pub const SEARCH_API_MATCH: &str = "match";
pub const SEARCH_API_MATCH_ALL: &str = "match_all";
pub const SEARCH_API_MUST: &str = "must";
pub const SEARCH_API_MUST_NOT: &str = "must_not";
pub const SEARCH_API_SHOULD: &str = "should";
pub const SEARCH_API_BOOL: &str = "bool";

/// Top-level keys whose documents run in filter context
const FILTER_KEYS: [&str; 6] = [
    SEARCH_API_TERM,
    SEARCH_API_RANGE,
    SEARCH_API_EXISTS,
    SEARCH_API_NOT,
    SEARCH_API_OR,
    SEARCH_API_AND,
];

/// Where a compiled document is placed in the request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchContext {
    /// Scoring
    Query,
    /// Non-scoring
    Filter,
}

impl SearchContext {
    pub fn envelope_key(self) -> &'static str {
        match self {
            SearchContext::Query => SEARCH_API_QUERY,
            SearchContext::Filter => SEARCH_API_FILTER,
        }
    }
}

/// Classify an already-compiled document by its shape.
///
/// Only the outermost key decides: a `bool` that nests `term` clauses is
/// still query context.
pub fn classify(document: &Value) -> SearchContext {
    match document.as_object() {
        Some(object) if object.len() == 1 => {
            let is_filter = object
                .keys()
                .next()
                .map(|key| FILTER_KEYS.contains(&key.as_str()))
                .unwrap_or(false);
            if is_filter {
                SearchContext::Filter
            } else {
                SearchContext::Query
            }
        }
        _ => SearchContext::Query,
    }
}

/// Stateless compiler from [`Query`] trees to wire documents
pub struct QueryCompiler;

impl QueryCompiler {
    /// Compile a root query and wrap it under its `query` or `filter` envelope
    pub fn compile(query: &Query) -> Value {
        let document = Self::translate(query);
        let key = classify(&document).envelope_key();

        let mut envelope = Map::new();
        envelope.insert(key.to_string(), document);
        Value::Object(envelope)
    }

    /// Like [`compile`](Self::compile), mapping an absent root to `null`
    pub fn compile_optional(query: Option<&Query>) -> Value {
        query.map(Self::compile).unwrap_or(Value::Null)
    }

    /// Compile a single node without the context envelope
    pub fn translate(query: &Query) -> Value {
        match query {
            Query::Bool(clauses) => Self::translate_bool(clauses),
            Query::Match { field, value } => {
                single(SEARCH_API_MATCH, single(field, Value::String(value.to_string())))
            }
            Query::MatchAll => single(SEARCH_API_MATCH_ALL, Value::Object(Map::new())),
            Query::Filtered { query, filter } => {
                let mut result = Map::new();
                result.insert(
                    SEARCH_API_QUERY.to_string(),
                    Self::translate_optional(query.as_deref()),
                );
                result.insert(
                    SEARCH_API_FILTER.to_string(),
                    Self::translate_optional(filter.as_deref()),
                );
                Value::Object(result)
            }
            Query::And { filters } => single(SEARCH_API_AND, Self::translate_clauses(filters)),
            Query::Or { filters } => single(SEARCH_API_OR, Self::translate_clauses(filters)),
            Query::Not { filter } => single(SEARCH_API_NOT, Self::translate_clauses(filter)),
            Query::Exists { field } => single(
                SEARCH_API_EXISTS,
                single(SEARCH_API_FIELD, Value::String(field.clone())),
            ),
            Query::Term { field, value } => {
                single(SEARCH_API_TERM, single(field, Value::String(value.to_string())))
            }
            Query::Range { field, bounds } => {
                single(SEARCH_API_RANGE, single(field, Self::translate_bounds(bounds)))
            }
        }
    }

    fn translate_optional(query: Option<&Query>) -> Value {
        query.map(Self::translate).unwrap_or(Value::Null)
    }

    fn translate_clauses(clauses: &Option<QueryList>) -> Value {
        clauses
            .as_ref()
            .map(Self::translate_list)
            .unwrap_or(Value::Null)
    }

    /// One-or-many rule: a singleton collapses to the bare document
    fn translate_list(list: &QueryList) -> Value {
        match list {
            QueryList::Single(query) => Self::translate(query),
            QueryList::Many(queries) => match queries.as_slice() {
                [] => Value::Object(Map::new()),
                [only] => Self::translate(only),
                many => Value::Array(many.iter().map(Self::translate).collect()),
            },
        }
    }

    fn translate_bool(clauses: &BoolQuery) -> Value {
        let mut bool_object = Map::new();
        let sections = [
            (SEARCH_API_MUST, &clauses.must),
            (SEARCH_API_MUST_NOT, &clauses.must_not),
            (SEARCH_API_SHOULD, &clauses.should),
        ];
        for (key, list) in sections {
            if let Some(list) = list {
                bool_object.insert(key.to_string(), Self::translate_list(list));
            }
        }
        single(SEARCH_API_BOOL, Value::Object(bool_object))
    }

    fn translate_bounds(bounds: &RangeBounds) -> Value {
        let mut object = Map::new();
        let entries = [
            (SEARCH_API_LT, &bounds.lt),
            (SEARCH_API_LTE, &bounds.lte),
            (SEARCH_API_GT, &bounds.gt),
            (SEARCH_API_GTE, &bounds.gte),
        ];
        for (key, bound) in entries {
            if let Some(value) = bound {
                object.insert(key.to_string(), value.to_wire());
            }
        }
        Value::Object(object)
    }
}

fn single(key: &str, value: Value) -> Value {
    let mut object = Map::new();
    object.insert(key.to_string(), value);
    Value::Object(object)
}
