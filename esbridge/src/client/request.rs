use crate::query::{Query, QueryCompiler};
use serde_json::{Map, Value};

/// A search against a set of indices and types
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// `None` searches every document
    pub query: Option<Query>,
    /// Empty means the client's default index scope
    pub indices: Vec<String>,
    pub types: Vec<String>,
    /// Offset of the first hit
    pub start: usize,
    pub size: Option<usize>,
    /// Source fields to return; empty returns the whole `_source`
    pub fields: Vec<String>,
}

impl SearchRequest {
    pub fn new(query: Query) -> Self {
        Self {
            query: Some(query),
            ..Default::default()
        }
    }

    pub fn indices(mut self, indices: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.indices = indices.into_iter().map(Into::into).collect();
        self
    }

    pub fn types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn page(mut self, start: usize, size: usize) -> Self {
        self.start = start;
        self.size = Some(size);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Request body: the compiled query envelope plus paging and source filtering
    pub fn body(&self) -> Value {
        let mut body = match QueryCompiler::compile_optional(self.query.as_ref()) {
            Value::Object(envelope) => envelope,
            _ => Map::new(),
        };

        if self.start > 0 {
            body.insert("from".to_string(), Value::from(self.start));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), Value::from(size));
        }
        if !self.fields.is_empty() {
            body.insert(
                "_source".to_string(),
                Value::Array(self.fields.iter().cloned().map(Value::String).collect()),
            );
        }

        Value::Object(body)
    }
}
