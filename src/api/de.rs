//! Lenient deserializers for backend documents
//!
//! References may arrive either as a bare id or as a populated document, and
//! human-facing numbers (order numbers, table numbers) as strings or numbers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value_to_id(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(map) => map
            .get("_id")
            .or_else(|| map.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// A reference that is either `"id"` or `{"_id": "id", ...}`
pub fn id_or_object<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_id(Value::deserialize(deserializer)?))
}

/// A list of references, each either an id or a populated document
pub fn ids_or_objects<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().filter_map(value_to_id).collect()),
        _ => Ok(Vec::new()),
    }
}

/// A label that may be sent as a string or a number
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Doc {
        #[serde(default, deserialize_with = "id_or_object")]
        owner: Option<String>,
        #[serde(default, deserialize_with = "ids_or_objects")]
        links: Vec<String>,
        #[serde(default, deserialize_with = "string_or_number")]
        number: String,
    }

    #[test]
    fn test_populated_and_bare_references() {
        let doc: Doc = serde_json::from_value(json!({
            "owner": {"_id": "u1", "name": "Asha"},
            "links": ["t1", {"_id": "t2"}, 5],
            "number": 12
        }))
        .unwrap();

        assert_eq!(doc.owner.as_deref(), Some("u1"));
        assert_eq!(doc.links, vec!["t1", "t2"]);
        assert_eq!(doc.number, "12");
    }

    #[test]
    fn test_missing_and_null_fields() {
        let doc: Doc = serde_json::from_value(json!({"owner": null})).unwrap();
        assert!(doc.owner.is_none());
        assert!(doc.links.is_empty());
        assert!(doc.number.is_empty());
    }
}
