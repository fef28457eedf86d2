//! Request body decoding
//!
//! The front end posts `application/x-www-form-urlencoded` bodies. JSON
//! object bodies are accepted as well; their scalar values are flattened to
//! strings so handlers see one shape.

use serde_json::Value;
use url::form_urlencoded;

use crate::error::ApiError;

/// Decoded key/value pairs of a request body, in body order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    fields: Vec<(String, String)>,
}

impl FormBody {
    /// Decode a body according to its content type.
    ///
    /// An empty body decodes to no fields. Invalid UTF-8, malformed JSON, a
    /// JSON body that is not an object, and multipart bodies are rejected.
    pub fn decode(content_type: Option<&str>, body: &[u8]) -> Result<Self, ApiError> {
        let media_type = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());

        if let Some(media_type) = media_type.as_deref() {
            if media_type.starts_with("multipart/") {
                return Err(ApiError::Decode(format!(
                    "Unsupported content type '{media_type}'"
                )));
            }
        }

        let text = std::str::from_utf8(body)
            .map_err(|e| ApiError::Decode(format!("Body is not valid UTF-8: {e}")))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let is_json = match media_type.as_deref() {
            Some(media_type) => media_type.ends_with("json"),
            None => text.trim_start().starts_with('{'),
        };

        if is_json {
            Self::from_json(text)
        } else {
            Ok(Self::from_urlencoded(text))
        }
    }

    /// Decode a urlencoded string; `+` is a space and `%XX` sequences decode
    pub fn from_urlencoded(text: &str) -> Self {
        let fields = form_urlencoded::parse(text.as_bytes())
            .into_owned()
            .collect();
        Self { fields }
    }

    fn from_json(text: &str) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ApiError::Decode(format!("Malformed JSON body: {e}")))?;

        let Value::Object(map) = value else {
            return Err(ApiError::Decode("JSON body must be an object".to_string()));
        };

        let fields = map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();
        Ok(Self { fields })
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key`, or the empty string when absent
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Value of the first key in `keys` that is present
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = "application/x-www-form-urlencoded";

    #[test]
    fn test_urlencoded_decoding() {
        let form = FormBody::decode(Some(FORM), b"description=Buy+milk+%26+eggs&taskid=t1").unwrap();
        assert_eq!(form.get("description"), Some("Buy milk & eggs"));
        assert_eq!(form.get("taskid"), Some("t1"));
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn test_reserved_characters_round_trip() {
        let original = "a&b=c+d%e#f?g/h i;j";
        let encoded: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("description", original)
            .finish();

        let form = FormBody::decode(Some(FORM), encoded.as_bytes()).unwrap();
        assert_eq!(form.get("description"), Some(original));
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        let form = FormBody::decode(
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
            b"description=x",
        )
        .unwrap();
        assert_eq!(form.get("description"), Some("x"));
    }

    #[test]
    fn test_missing_field_defaults_to_empty() {
        let form = FormBody::decode(Some(FORM), b"other=1").unwrap();
        assert_eq!(form.get("description"), None);
        assert_eq!(form.get_or_empty("description"), "");
    }

    #[test]
    fn test_empty_body() {
        let form = FormBody::decode(Some(FORM), b"").unwrap();
        assert!(form.is_empty());
        let form = FormBody::decode(None, b"").unwrap();
        assert!(form.is_empty());
    }

    #[test]
    fn test_first_value_wins() {
        let form = FormBody::from_urlencoded("description=first&description=second");
        assert_eq!(form.get("description"), Some("first"));
    }

    #[test]
    fn test_first_of() {
        let form = FormBody::from_urlencoded("taskId=t2");
        assert_eq!(form.first_of(&["taskid", "taskId"]), Some("t2"));
        assert_eq!(form.first_of(&["missing"]), None);
    }

    #[test]
    fn test_json_object_body() {
        let form = FormBody::decode(
            Some("application/json"),
            br#"{"description":"from json","done":true,"extra":null}"#,
        )
        .unwrap();
        assert_eq!(form.get("description"), Some("from json"));
        assert_eq!(form.get("done"), Some("true"));
        assert_eq!(form.get("extra"), Some(""));
    }

    #[test]
    fn test_json_sniffed_without_content_type() {
        let form = FormBody::decode(None, br#"{"description":"sniffed"}"#).unwrap();
        assert_eq!(form.get("description"), Some("sniffed"));
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            FormBody::decode(Some(FORM), &[0xff, 0xfe, 0x00]),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            FormBody::decode(Some("application/json"), b"{not json"),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            FormBody::decode(Some("application/json"), b"[1,2]"),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            FormBody::decode(Some("multipart/form-data; boundary=x"), b"--x"),
            Err(ApiError::Decode(_))
        ));
    }
}
