//! Save envelope attached to persisted JSON documents.
//!
//! Guide and catalog files carry an `_metadata` object describing the file
//! itself. It is not part of either data model and is removed before the
//! document is deserialized.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::timestamp;

pub const ENVELOPE_KEY: &str = "_metadata";
pub const FILE_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize)]
struct Envelope<'a> {
    file_version: &'a str,
    saved_date: String,
    application: &'a str,
}

/// Serialize `value` to an object and attach the envelope.
pub fn wrap<T: Serialize>(value: &T, application: &str) -> serde_json::Result<Value> {
    let mut doc = serde_json::to_value(value)?;
    if let Value::Object(map) = &mut doc {
        let envelope = Envelope {
            file_version: FILE_VERSION,
            saved_date: timestamp::format(&Utc::now()),
            application,
        };
        map.insert(ENVELOPE_KEY.to_string(), serde_json::to_value(envelope)?);
    }
    Ok(doc)
}

/// Remove the envelope, returning it if one was present.
pub fn strip(doc: &mut Value) -> Option<Value> {
    doc.as_object_mut().and_then(|map: &mut Map<String, Value>| map.remove(ENVELOPE_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_object_when_wrapping_then_envelope_added() {
        let doc = wrap(&json!({"a": 1}), "treeguide").unwrap();
        assert_eq!(doc[ENVELOPE_KEY]["file_version"], "1.0");
        assert_eq!(doc[ENVELOPE_KEY]["application"], "treeguide");
        assert_eq!(doc["a"], 1);
    }

    #[test]
    fn given_wrapped_doc_when_stripping_then_original_remains() {
        let mut doc = wrap(&json!({"a": 1}), "treeguide").unwrap();
        assert!(strip(&mut doc).is_some());
        assert_eq!(doc, json!({"a": 1}));
        assert!(strip(&mut doc).is_none());
    }
}
