use crate::error::{Error, Result};
use crate::response::{
    FieldMappingResponse, FieldType, IndexMappingResponse, IndexType, TypeMappingResponse,
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Type name used for typeless (single-type) mappings
pub const DEFAULT_TYPE_NAME: &str = "_doc";

/// Root-level mapping parameters; their presence marks a typeless mapping
const ROOT_MAPPING_PARAMETERS: [&str; 13] = [
    "properties",
    "dynamic",
    "dynamic_templates",
    "dynamic_date_formats",
    "date_detection",
    "numeric_detection",
    "enabled",
    "_source",
    "_meta",
    "_routing",
    "_field_names",
    "_all",
    "runtime",
];

/// One index entry of a `_mapping` response
#[derive(Debug, Deserialize)]
struct EsIndexMapping {
    mappings: IndexMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct EsTypeMapping {
    #[serde(default)]
    properties: IndexMap<String, EsFieldMapping>,
}

#[derive(Debug, Deserialize)]
struct EsFieldMapping {
    #[serde(rename = "type")]
    field_type: Option<String>,
    /// A string (`analyzed`, `not_analyzed`, `no`) or a boolean on newer engines
    index: Option<Value>,
    format: Option<String>,
}

/// Decode the mapping of `index` from a `GET /{index}/_mapping` response.
///
/// When the engine resolved an alias the single entry is keyed by the
/// concrete index name; that entry is used.
pub fn decode_index_mapping(index: &str, document: &Value) -> Result<IndexMappingResponse> {
    let root = document
        .as_object()
        .ok_or_else(|| Error::MissingField(index.to_string()))?;

    let entry = root
        .get(index)
        .or_else(|| {
            if root.len() == 1 {
                root.values().next()
            } else {
                None
            }
        })
        .ok_or_else(|| Error::MissingField(index.to_string()))?;

    let raw = EsIndexMapping::deserialize(entry).map_err(|source| Error::Decode {
        what: "mapping",
        source,
    })?;

    let types = if is_typeless(&raw.mappings) {
        let typeless: serde_json::Map<String, Value> = raw.mappings.into_iter().collect();
        vec![convert_type(DEFAULT_TYPE_NAME, &Value::Object(typeless))?]
    } else {
        raw.mappings
            .iter()
            .map(|(name, mapping)| convert_type(name, mapping))
            .collect::<Result<Vec<_>>>()?
    };

    Ok(IndexMappingResponse {
        index: index.to_string(),
        types,
    })
}

/// A typed mapping holds only type-name keys with object values. Anything
/// else is a single typeless mapping.
fn is_typeless(mappings: &IndexMap<String, Value>) -> bool {
    mappings.iter().any(|(key, value)| {
        !value.is_object() || ROOT_MAPPING_PARAMETERS.contains(&key.as_str())
    })
}

fn convert_type(name: &str, mapping: &Value) -> Result<TypeMappingResponse> {
    let raw = EsTypeMapping::deserialize(mapping).map_err(|source| Error::Decode {
        what: "mapping",
        source,
    })?;

    let fields = raw
        .properties
        .iter()
        .map(|(field, prop)| convert_field(field, prop))
        .collect::<Result<Vec<_>>>()?;

    Ok(TypeMappingResponse {
        name: name.to_string(),
        fields,
    })
}

fn convert_field(name: &str, prop: &EsFieldMapping) -> Result<FieldMappingResponse> {
    let field_type = match prop.field_type.as_deref() {
        Some(value) => Some(value.parse::<FieldType>().map_err(|_| {
            Error::UnknownFieldType {
                field: name.to_string(),
                value: value.to_string(),
            }
        })?),
        None => None,
    };

    let index_type = match &prop.index {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(value.parse::<IndexType>().map_err(|_| {
            Error::UnknownIndexType {
                field: name.to_string(),
                value: value.clone(),
            }
        })?),
        Some(Value::Bool(false)) => Some(IndexType::No),
        // `true` is the engine default
        Some(Value::Bool(true)) => None,
        Some(other) => {
            return Err(Error::UnknownIndexType {
                field: name.to_string(),
                value: other.to_string(),
            })
        }
    };

    Ok(FieldMappingResponse {
        name: name.to_string(),
        field_type,
        index_type,
        format: prop.format.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_decode_typed_mapping() {
        let doc = json!({
            "expenses": {
                "mappings": {
                    "expense": {
                        "properties": {
                            "city": {"type": "string", "index": "not_analyzed"},
                            "amount": {"type": "float"},
                            "date": {"type": "date", "format": "MM-dd-YYYY"},
                            "employee": {"type": "string", "index": "analyzed"}
                        }
                    }
                }
            }
        });

        let mapping = decode_index_mapping("expenses", &doc).unwrap();
        assert_eq!(mapping.index, "expenses");
        assert_eq!(mapping.types.len(), 1);

        let expense = &mapping.types[0];
        assert_eq!(expense.name, "expense");
        let names: Vec<&str> = expense.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["city", "amount", "date", "employee"]);

        let city = expense.field("city").unwrap();
        assert_eq!(city.field_type, Some(FieldType::String));
        assert_eq!(city.index_type, Some(IndexType::NotAnalyzed));

        let date = expense.field("date").unwrap();
        assert_eq!(date.field_type, Some(FieldType::Date));
        assert_eq!(date.format.as_deref(), Some("MM-dd-YYYY"));
        assert!(date.index_type.is_none());
    }

    #[test]
    fn test_decode_multiple_types() {
        let doc = json!({
            "shop": {
                "mappings": {
                    "product": {"properties": {"name": {"type": "string"}}},
                    "order": {"properties": {"total": {"type": "double"}}}
                }
            }
        });

        let mapping = decode_index_mapping("shop", &doc).unwrap();
        let names: Vec<&str> = mapping.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["product", "order"]);
    }

    #[test]
    fn test_decode_typeless_mapping() {
        let doc = json!({
            "logs": {
                "mappings": {
                    "dynamic": "strict",
                    "properties": {
                        "message": {"type": "text"},
                        "level": {"type": "keyword", "index": false}
                    }
                }
            }
        });

        let mapping = decode_index_mapping("logs", &doc).unwrap();
        assert_eq!(mapping.types.len(), 1);
        assert_eq!(mapping.types[0].name, DEFAULT_TYPE_NAME);

        let level = mapping.types[0].field("level").unwrap();
        assert_eq!(level.field_type, Some(FieldType::Keyword));
        assert_eq!(level.index_type, Some(IndexType::No));
    }

    #[test]
    fn test_typeless_mapping_without_properties() {
        let doc = json!({"logs": {"mappings": {"dynamic": "strict"}}});
        let mapping = decode_index_mapping("logs", &doc).unwrap();
        assert_eq!(mapping.types.len(), 1);
        assert_eq!(mapping.types[0].name, DEFAULT_TYPE_NAME);
        assert!(mapping.types[0].fields.is_empty());

        let doc = json!({"logs": {"mappings": {"dynamic": false, "date_detection": true}}});
        let mapping = decode_index_mapping("logs", &doc).unwrap();
        assert_eq!(mapping.types[0].name, DEFAULT_TYPE_NAME);
    }

    #[test]
    fn test_root_metadata_field_is_not_a_type() {
        let doc = json!({"logs": {"mappings": {"_source": {"enabled": false}}}});
        let mapping = decode_index_mapping("logs", &doc).unwrap();
        assert_eq!(mapping.types.len(), 1);
        assert_eq!(mapping.types[0].name, DEFAULT_TYPE_NAME);
        assert!(mapping.type_mapping("_source").is_none());
    }

    #[test]
    fn test_default_type_in_typed_mapping() {
        let doc = json!({
            "shop": {"mappings": {
                "_default_": {"properties": {"created": {"type": "date"}}},
                "product": {"_source": {"enabled": true}, "properties": {"name": {"type": "keyword"}}}
            }}
        });
        let mapping = decode_index_mapping("shop", &doc).unwrap();
        let names: Vec<&str> = mapping.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["_default_", "product"]);
    }

    #[test]
    fn test_absent_type_and_index_are_unspecified() {
        let doc = json!({
            "people": {
                "mappings": {
                    "person": {
                        "properties": {
                            "address": {"properties": {"street": {"type": "string"}}},
                            "nick": {"type": "string", "index": true}
                        }
                    }
                }
            }
        });

        let mapping = decode_index_mapping("people", &doc).unwrap();
        let person = &mapping.types[0];
        let address = person.field("address").unwrap();
        assert!(address.field_type.is_none());
        assert!(address.index_type.is_none());
        assert!(person.field("nick").unwrap().index_type.is_none());
    }

    #[test]
    fn test_type_without_properties_has_no_fields() {
        let doc = json!({"empty": {"mappings": {"doc": {}}}});
        let mapping = decode_index_mapping("empty", &doc).unwrap();
        assert!(mapping.types[0].fields.is_empty());
    }

    #[test]
    fn test_unknown_field_type_is_error() {
        let doc = json!({
            "places": {"mappings": {"place": {"properties": {"area": {"type": "geo_shape"}}}}}
        });
        let err = decode_index_mapping("places", &doc).unwrap_err();
        assert!(matches!(
            &err,
            Error::UnknownFieldType { field, value } if field == "area" && value == "geo_shape"
        ));
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_unknown_index_type_is_error() {
        let doc = json!({
            "x": {"mappings": {"t": {"properties": {"f": {"type": "string", "index": "sometimes"}}}}}
        });
        assert!(matches!(
            decode_index_mapping("x", &doc),
            Err(Error::UnknownIndexType { .. })
        ));
    }

    #[test]
    fn test_alias_resolves_to_single_entry() {
        let doc = json!({
            "expenses-v2": {"mappings": {"expense": {"properties": {"amount": {"type": "float"}}}}}
        });
        let mapping = decode_index_mapping("expenses", &doc).unwrap();
        assert_eq!(mapping.index, "expenses");
        assert_eq!(mapping.types[0].fields.len(), 1);
    }

    #[test]
    fn test_missing_index_entry() {
        let doc = json!({"a": {"mappings": {}}, "b": {"mappings": {}}});
        assert!(matches!(
            decode_index_mapping("c", &doc),
            Err(Error::MissingField(name)) if name == "c"
        ));
    }

    #[test]
    fn test_missing_mappings_object() {
        let doc = json!({"a": {"settings": {}}});
        assert!(matches!(
            decode_index_mapping("a", &doc),
            Err(Error::Decode { what: "mapping", .. })
        ));
    }
}
