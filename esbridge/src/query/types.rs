//! Backend-agnostic query model
//!
//! A [`Query`] is an immutable tree. Each variant carries exactly the
//! parameters meaningful for its kind; absent optional parameters mean
//! "no constraint".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Query node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Scoring combination of must / must_not / should clauses
    Bool(BoolQuery),

    /// Analyzed full-text match on one field
    Match { field: String, value: Scalar },

    /// Match every document
    MatchAll,

    /// A query restricted by a filter
    Filtered {
        #[serde(default)]
        query: Option<Box<Query>>,
        #[serde(default)]
        filter: Option<Box<Query>>,
    },

    /// All filters must match
    And {
        #[serde(default)]
        filters: Option<QueryList>,
    },

    /// Any filter must match
    Or {
        #[serde(default)]
        filters: Option<QueryList>,
    },

    /// Negated filter
    Not {
        #[serde(default)]
        filter: Option<QueryList>,
    },

    /// Field has a value
    Exists { field: String },

    /// Exact, non-analyzed value
    Term { field: String, value: Scalar },

    /// Bounded value range
    Range {
        field: String,
        #[serde(default)]
        bounds: RangeBounds,
    },
}

/// Node kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Bool,
    Match,
    MatchAll,
    Filtered,
    And,
    Or,
    Not,
    Exists,
    Term,
    Range,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "BOOL",
            Self::Match => "MATCH",
            Self::MatchAll => "MATCH_ALL",
            Self::Filtered => "FILTERED",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Exists => "EXISTS",
            Self::Term => "TERM",
            Self::Range => "RANGE",
        };
        f.write_str(name)
    }
}

/// A parameter holding either one nested query or a sequence of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryList {
    Many(Vec<Query>),
    Single(Box<Query>),
}

impl QueryList {
    pub fn len(&self) -> usize {
        match self {
            QueryList::Single(_) => 1,
            QueryList::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Query> for QueryList {
    fn from(query: Query) -> Self {
        QueryList::Single(Box::new(query))
    }
}

impl From<Vec<Query>> for QueryList {
    fn from(queries: Vec<Query>) -> Self {
        QueryList::Many(queries)
    }
}

/// Clauses of a `bool` query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must: Option<QueryList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_not: Option<QueryList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should: Option<QueryList>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, clauses: impl Into<QueryList>) -> Self {
        self.must = Some(clauses.into());
        self
    }

    pub fn must_not(mut self, clauses: impl Into<QueryList>) -> Self {
        self.must_not = Some(clauses.into());
        self
    }

    pub fn should(mut self, clauses: impl Into<QueryList>) -> Self {
        self.should = Some(clauses.into());
        self
    }
}

/// Range bounds. Any combination may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<Scalar>,
}

impl RangeBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lt(mut self, value: impl Into<Scalar>) -> Self {
        self.lt = Some(value.into());
        self
    }

    pub fn lte(mut self, value: impl Into<Scalar>) -> Self {
        self.lte = Some(value.into());
        self
    }

    pub fn gt(mut self, value: impl Into<Scalar>) -> Self {
        self.gt = Some(value.into());
        self
    }

    pub fn gte(mut self, value: impl Into<Scalar>) -> Self {
        self.gte = Some(value.into());
        self
    }
}

/// Scalar parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
}

impl Scalar {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Integer(_) | Scalar::Float(_))
    }

    /// Wire form: numbers stay numeric, everything else is written as text
    pub fn to_wire(&self) -> Value {
        match self {
            Scalar::Integer(n) => Value::Number((*n).into()),
            Scalar::Float(f) => Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(f.to_string())),
            other => Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Boolean(b) => write!(f, "{}", b),
            // TODO: format with the target field's mapping `format` once mappings are threaded into compilation
            Scalar::Date(d) => f.write_str(&d.to_rfc3339()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(value.into())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Integer(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::Date(value)
    }
}

impl Query {
    pub fn match_all() -> Self {
        Query::MatchAll
    }

    /// Full-text `match` on a field
    pub fn match_field(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Query::Match {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn term(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Query::Exists {
            field: field.into(),
        }
    }

    pub fn range(field: impl Into<String>, bounds: RangeBounds) -> Self {
        Query::Range {
            field: field.into(),
            bounds,
        }
    }

    pub fn and(filters: impl Into<QueryList>) -> Self {
        Query::And {
            filters: Some(filters.into()),
        }
    }

    pub fn or(filters: impl Into<QueryList>) -> Self {
        Query::Or {
            filters: Some(filters.into()),
        }
    }

    pub fn not(filter: impl Into<QueryList>) -> Self {
        Query::Not {
            filter: Some(filter.into()),
        }
    }

    pub fn bool(clauses: BoolQuery) -> Self {
        Query::Bool(clauses)
    }

    pub fn filtered(query: Query, filter: Query) -> Self {
        Query::Filtered {
            query: Some(Box::new(query)),
            filter: Some(Box::new(filter)),
        }
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Query::Bool(_) => QueryKind::Bool,
            Query::Match { .. } => QueryKind::Match,
            Query::MatchAll => QueryKind::MatchAll,
            Query::Filtered { .. } => QueryKind::Filtered,
            Query::And { .. } => QueryKind::And,
            Query::Or { .. } => QueryKind::Or,
            Query::Not { .. } => QueryKind::Not,
            Query::Exists { .. } => QueryKind::Exists,
            Query::Term { .. } => QueryKind::Term,
            Query::Range { .. } => QueryKind::Range,
        }
    }

    /// Target document field, for the kinds that have one
    pub fn field(&self) -> Option<&str> {
        match self {
            Query::Match { field, .. }
            | Query::Exists { field }
            | Query::Term { field, .. }
            | Query::Range { field, .. } => Some(field),
            _ => None,
        }
    }
}
