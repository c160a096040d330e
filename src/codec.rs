//! JSON session codec
//!
//! A session is encoded as `{"Values": {...}, "ID": "...", "Options": {...}}`.
//! Only string keys are supported. The encoded text must fit in a single
//! document, so its length is capped at [`MAX_LENGTH`] bytes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::SessionOptions;
use crate::error::SessionError;
use crate::session::{SessionData, SessionKey};

/// Maximum length of an encoded session, in bytes (2 MiB)
pub const MAX_LENGTH: usize = 2 << 20;

#[derive(Serialize)]
struct EncodedSession<'a> {
    #[serde(rename = "Values")]
    values: Map<String, Value>,
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Options", skip_serializing_if = "Option::is_none")]
    options: Option<&'a SessionOptions>,
}

#[derive(Deserialize)]
struct DecodedSession {
    #[serde(rename = "Values", default)]
    values: Map<String, Value>,
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(rename = "Options", default)]
    options: Option<SessionOptions>,
}

/// Encode session data to its stored JSON form.
///
/// `with_options` controls whether the cookie policy is written; header-based
/// sessions have none to persist.
pub fn encode(data: &SessionData, with_options: bool) -> Result<String, SessionError> {
    let mut values = Map::with_capacity(data.values.len());
    for (key, value) in &data.values {
        match key {
            SessionKey::Str(k) => {
                values.insert(k.clone(), value.clone());
            }
            other => return Err(SessionError::KeyTypeInvalid(other.to_string())),
        }
    }

    let encoded = EncodedSession {
        values,
        id: &data.id,
        options: if with_options {
            data.options.as_ref()
        } else {
            None
        },
    };
    let json = serde_json::to_string(&encoded).map_err(|e| SessionError::Marshal(e.to_string()))?;

    if json.len() > MAX_LENGTH {
        return Err(SessionError::MaxLengthExceeded {
            length: json.len(),
            max: MAX_LENGTH,
        });
    }
    Ok(json)
}

/// Decode session data from its stored JSON form.
///
/// Unknown fields are ignored and missing fields take their defaults.
pub fn decode(encoded: &str) -> Result<SessionData, SessionError> {
    let decoded: DecodedSession = serde_json::from_str(encoded)?;
    Ok(SessionData {
        id: decoded.id,
        values: decoded
            .values
            .into_iter()
            .map(|(k, v)| (SessionKey::Str(k), v))
            .collect(),
        options: decoded.options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SameSite;
    use serde_json::json;

    fn sample() -> SessionData {
        let mut data = SessionData::new(Some(SessionOptions {
            domain: "example.com".to_string(),
            same_site: Some(SameSite::Strict),
            ..Default::default()
        }));
        data.id = "abc123".to_string();
        data.set("testkey", "testvalue").unwrap();
        data.set("nested", json!({"list": [1, 2, {"deep": null}], "flag": true})).unwrap();
        data
    }

    #[test]
    fn test_round_trip_with_options() {
        let data = sample();
        let encoded = encode(&data, true).unwrap();
        assert_eq!(decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_options_omitted_for_header_sessions() {
        let data = sample();
        let encoded = encode(&data, false).unwrap();
        let raw: Value = serde_json::from_str(&encoded).unwrap();
        assert!(raw.get("Options").is_none());
        assert_eq!(raw["ID"], "abc123");
        assert_eq!(raw["Values"]["testkey"], "testvalue");

        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.options, None);
        assert_eq!(decoded.values, data.values);
    }

    #[test]
    fn test_non_string_key_rejected() {
        let mut data = sample();
        data.values.insert(SessionKey::Int(42), json!("answer"));
        match encode(&data, true) {
            Err(SessionError::KeyTypeInvalid(key)) => assert_eq!(key, "42"),
            other => panic!("expected KeyTypeInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_max_length() {
        let empty = SessionData::default();
        assert!(encode(&empty, false).is_ok());

        let mut big = SessionData::default();
        big.set("store", "firestore".repeat(1 << 20)).unwrap();
        let err = encode(&big, false).unwrap_err();
        assert!(err.to_string().contains("max length"));
        assert!(matches!(err, SessionError::MaxLengthExceeded { max: MAX_LENGTH, .. }));
    }

    #[test]
    fn test_max_length_boundary() {
        // {"Values":{"k":"<pad>"},"ID":""}
        let overhead = r#"{"Values":{"k":""},"ID":""}"#.len();

        let mut exact = SessionData::default();
        exact.set("k", "x".repeat(MAX_LENGTH - overhead)).unwrap();
        assert_eq!(encode(&exact, false).unwrap().len(), MAX_LENGTH);

        let mut over = SessionData::default();
        over.set("k", "x".repeat(MAX_LENGTH - overhead + 1)).unwrap();
        assert!(matches!(
            encode(&over, false),
            Err(SessionError::MaxLengthExceeded { length, .. }) if length == MAX_LENGTH + 1
        ));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let decoded = decode(r#"{"ID":"x","Values":{"a":1},"Extra":{"b":2}}"#).unwrap();
        assert_eq!(decoded.id, "x");
        assert_eq!(decoded.get::<i64>("a"), Some(1));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode("not json"), Err(SessionError::Unmarshal(_))));
    }
}
