//! Typed results decoded from engine responses

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mappings of one or more indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingsResponse {
    pub status: u16,
    pub indices: Vec<IndexMappingResponse>,
}

impl MappingsResponse {
    pub fn index(&self, name: &str) -> Option<&IndexMappingResponse> {
        self.indices.iter().find(|i| i.index == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMappingResponse {
    pub index: String,
    pub types: Vec<TypeMappingResponse>,
}

impl IndexMappingResponse {
    pub fn type_mapping(&self, name: &str) -> Option<&TypeMappingResponse> {
        self.types.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMappingResponse {
    pub name: String,
    pub fields: Vec<FieldMappingResponse>,
}

impl TypeMappingResponse {
    pub fn field(&self, name: &str) -> Option<&FieldMappingResponse> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMappingResponse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_type: Option<IndexType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Core field datatypes declared in a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    String,
    Text,
    Keyword,
    Float,
    HalfFloat,
    ScaledFloat,
    Double,
    Byte,
    Short,
    Integer,
    Long,
    TokenCount,
    Date,
    Boolean,
    Binary,
    Ip,
    GeoPoint,
    Object,
    Nested,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Text => "TEXT",
            Self::Keyword => "KEYWORD",
            Self::Float => "FLOAT",
            Self::HalfFloat => "HALF_FLOAT",
            Self::ScaledFloat => "SCALED_FLOAT",
            Self::Double => "DOUBLE",
            Self::Byte => "BYTE",
            Self::Short => "SHORT",
            Self::Integer => "INTEGER",
            Self::Long => "LONG",
            Self::TokenCount => "TOKEN_COUNT",
            Self::Date => "DATE",
            Self::Boolean => "BOOLEAN",
            Self::Binary => "BINARY",
            Self::Ip => "IP",
            Self::GeoPoint => "GEO_POINT",
            Self::Object => "OBJECT",
            Self::Nested => "NESTED",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Float
                | Self::HalfFloat
                | Self::ScaledFloat
                | Self::Double
                | Self::Byte
                | Self::Short
                | Self::Integer
                | Self::Long
                | Self::TokenCount
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ();

    /// Case-insensitive; the engine reports lower-case names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field_type = match s.to_uppercase().as_str() {
            "STRING" => Self::String,
            "TEXT" => Self::Text,
            "KEYWORD" => Self::Keyword,
            "FLOAT" => Self::Float,
            "HALF_FLOAT" => Self::HalfFloat,
            "SCALED_FLOAT" => Self::ScaledFloat,
            "DOUBLE" => Self::Double,
            "BYTE" => Self::Byte,
            "SHORT" => Self::Short,
            "INTEGER" => Self::Integer,
            "LONG" => Self::Long,
            "TOKEN_COUNT" => Self::TokenCount,
            "DATE" => Self::Date,
            "BOOLEAN" => Self::Boolean,
            "BINARY" => Self::Binary,
            "IP" => Self::Ip,
            "GEO_POINT" => Self::GeoPoint,
            "OBJECT" => Self::Object,
            "NESTED" => Self::Nested,
            _ => return Err(()),
        };
        Ok(field_type)
    }
}

/// How a field is indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexType {
    Analyzed,
    NotAnalyzed,
    No,
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analyzed => write!(f, "ANALYZED"),
            Self::NotAnalyzed => write!(f, "NOT_ANALYZED"),
            Self::No => write!(f, "NO"),
        }
    }
}

impl FromStr for IndexType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ANALYZED" => Ok(Self::Analyzed),
            "NOT_ANALYZED" => Ok(Self::NotAnalyzed),
            "NO" => Ok(Self::No),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
    pub total_shards: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub took_millis: u64,
    pub status: u16,
    pub total_hits: u64,
    pub max_score: f32,
    pub total_shards: u32,
    pub successful_shards: u32,
    pub failed_shards: u32,
    /// Field names seen across the hits, first hit's order first
    pub column_ids: Vec<String>,
    pub hits: Vec<SearchHitResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHitResponse {
    pub score: f32,
    pub index: String,
    pub id: String,
    pub doc_type: String,
    pub version: u64,
    /// `_source` values rendered as text, in document order
    pub fields: IndexMap<String, String>,
}

impl SearchHitResponse {
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parse_case_insensitive() {
        assert_eq!("string".parse::<FieldType>(), Ok(FieldType::String));
        assert_eq!("geo_point".parse::<FieldType>(), Ok(FieldType::GeoPoint));
        assert_eq!("LONG".parse::<FieldType>(), Ok(FieldType::Long));
        assert!("geo_shape".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_type_display_roundtrip() {
        for ft in [FieldType::TokenCount, FieldType::Date, FieldType::HalfFloat] {
            assert_eq!(ft.to_string().parse::<FieldType>(), Ok(ft));
        }
        assert!(FieldType::Integer.is_numeric());
        assert!(!FieldType::Keyword.is_numeric());
    }

    #[test]
    fn test_index_type_parse() {
        assert_eq!("not_analyzed".parse::<IndexType>(), Ok(IndexType::NotAnalyzed));
        assert_eq!("no".parse::<IndexType>(), Ok(IndexType::No));
        assert!("maybe".parse::<IndexType>().is_err());
    }

    #[test]
    fn test_lookup_helpers() {
        let mappings = MappingsResponse {
            status: 200,
            indices: vec![IndexMappingResponse {
                index: "expenses".to_string(),
                types: vec![TypeMappingResponse {
                    name: "expense".to_string(),
                    fields: vec![FieldMappingResponse {
                        name: "amount".to_string(),
                        field_type: Some(FieldType::Double),
                        index_type: None,
                        format: None,
                    }],
                }],
            }],
        };

        let field = mappings
            .index("expenses")
            .and_then(|i| i.type_mapping("expense"))
            .and_then(|t| t.field("amount"))
            .unwrap();
        assert_eq!(field.field_type, Some(FieldType::Double));
        assert!(mappings.index("missing").is_none());
    }
}
