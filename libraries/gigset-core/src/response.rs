//! Decoding of function responses.
//!
//! Gateways wrap the function result in `{"statusCode", "headers", "body"}`
//! with `body` holding a JSON *string*, so the result is often encoded twice.
//! Each decoding boundary yields a tagged [`Body`] instead of failing.

use serde::Serialize;
use serde_json::Value;

/// A response body that is either JSON or plain text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    /// Decode response text. Empty text is `null`; unparsable text is kept verbatim.
    pub fn decode(text: &str) -> Self {
        if text.is_empty() {
            return Body::Json(Value::Null);
        }
        match serde_json::from_str(text) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(text.to_string()),
        }
    }

    /// The nested body of a gateway-style response.
    ///
    /// Only a JSON object whose `body` field is a string has one; anything
    /// else is its own inner body.
    pub fn inner(&self) -> Body {
        match self {
            Body::Json(Value::Object(map)) => match map.get("body") {
                Some(Value::String(nested)) => match serde_json::from_str(nested) {
                    Ok(value) => Body::Json(value),
                    Err(_) => Body::Text(nested.clone()),
                },
                _ => self.clone(),
            },
            _ => self.clone(),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Text(_) => None,
        }
    }

    /// Walk object fields; `None` when any step is missing or not an object.
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self.as_json()?;
        for key in path {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    /// Loose truthiness: empty text, `null`, `false`, `0` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Body::Json(value) => is_truthy(value),
            Body::Text(text) => !text.is_empty(),
        }
    }
}

/// Loose truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Status plus outer and inner body of one HTTP round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub ok: bool,
    pub body: Body,
    pub inner: Body,
}

impl ResponseEnvelope {
    pub fn from_text(status: u16, text: &str) -> Self {
        let body = Body::decode(text);
        let inner = body.inner();
        Self {
            status,
            ok: (200..300).contains(&status),
            body,
            inner,
        }
    }

    /// Pretty JSON of the whole envelope, as shown in the response preview.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}
