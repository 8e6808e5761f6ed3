//! `tools/call` result, resolved once at the client boundary.

use serde_json::{json, Map, Value};

use crate::RpcError;

/// Shapes a `tools/call` reply may take.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    /// `result` is an object carrying its own `content`
    ObjectWithContent(Map<String, Value>),
    /// `result` is itself the content list
    RawArray(Vec<Value>),
    /// Any other `result`, JSON serialized as a single text item
    ScalarText(String),
    /// No `result` at all, the raw response body
    Opaque(Value),
}

impl ToolResult {
    /// Resolve a decoded response body.
    ///
    /// Fails only when the envelope carries an `error`.
    pub fn from_envelope(body: Value) -> Result<Self, RpcError> {
        if let Some(error) = body.get("error").filter(|e| is_truthy(e)) {
            return Err(RpcError::from_protocol(
                error.get("message").and_then(Value::as_str),
            ));
        }

        let result = match body.get("result").filter(|r| is_truthy(r)) {
            Some(result) => result,
            None => return Ok(Self::Opaque(body)),
        };

        Ok(match result {
            Value::Object(map) if map.get("content").is_some_and(is_truthy) => {
                Self::ObjectWithContent(map.clone())
            }
            Value::Array(items) => Self::RawArray(items.clone()),
            other => Self::ScalarText(other.to_string()),
        })
    }

    /// The value a caller sees, always `{content: [...]}` shaped unless opaque.
    pub fn into_value(self) -> Value {
        match self {
            Self::ObjectWithContent(map) => Value::Object(map),
            Self::RawArray(items) => json!({ "content": items }),
            Self::ScalarText(text) => json!({ "content": [{ "type": "text", "text": text }] }),
            Self::Opaque(body) => body,
        }
    }

    /// Text of the reply, content items joined with `\n`.
    ///
    /// Each item contributes its `text`, else its `content`, else its JSON.
    pub fn text(&self) -> String {
        match self {
            Self::ObjectWithContent(map) => match map.get("content") {
                Some(Value::Array(items)) => join_items(items),
                _ => object_text(map),
            },
            Self::RawArray(items) => join_items(items),
            Self::ScalarText(text) => text.clone(),
            Self::Opaque(body) => match body {
                Value::Object(map) => match map.get("content") {
                    Some(Value::Array(items)) => join_items(items),
                    _ => object_text(map),
                },
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }
}

/// JavaScript-like truthiness of a JSON value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display form of a truthy value, strings unquoted
fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(v) if is_truthy(v) && !v.is_string() => Some(v.to_string()),
        _ => None,
    }
}

fn object_text(map: &Map<String, Value>) -> String {
    truthy_text(map.get("text")).unwrap_or_else(|| Value::Object(map.clone()).to_string())
}

fn join_items(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| {
            truthy_text(item.get("text"))
                .or_else(|| truthy_text(item.get("content")))
                .unwrap_or_else(|| item.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_object_with_content() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"content": [{"type": "text", "text": "a"}, {"type": "text", "text": "b"}]}
        });
        let result = ToolResult::from_envelope(body).unwrap();
        assert!(matches!(result, ToolResult::ObjectWithContent(_)));
        assert_eq!(result.text(), "a\nb");
        assert_eq!(
            result.into_value(),
            json!({"content": [{"type": "text", "text": "a"}, {"type": "text", "text": "b"}]})
        );
    }

    #[test]
    fn test_raw_array() {
        let body = json!({"result": [{"text": "x"}, {"content": "y"}, {"type": "image"}]});
        let result = ToolResult::from_envelope(body).unwrap();
        assert!(matches!(result, ToolResult::RawArray(ref items) if items.len() == 3));
        assert_eq!(result.text(), "x\ny\n{\"type\":\"image\"}");
        assert_eq!(
            result.into_value()["content"][1],
            json!({"content": "y"})
        );
    }

    #[test]
    fn test_scalar_text() {
        let result = ToolResult::from_envelope(json!({"result": {"now": "2026-01-19"}})).unwrap();
        assert_eq!(result, ToolResult::ScalarText(r#"{"now":"2026-01-19"}"#.to_owned()));
        assert_eq!(
            result.into_value(),
            json!({"content": [{"type": "text", "text": "{\"now\":\"2026-01-19\"}"}]})
        );

        let result = ToolResult::from_envelope(json!({"result": "plain"})).unwrap();
        assert_eq!(result.text(), r#""plain""#);
    }

    #[test]
    fn test_empty_content_is_not_content() {
        let result = ToolResult::from_envelope(json!({"result": {"content": ""}})).unwrap();
        assert!(matches!(result, ToolResult::ScalarText(_)));
    }

    #[test]
    fn test_opaque() {
        let body = json!({"jsonrpc": "2.0", "id": 1});
        let result = ToolResult::from_envelope(body.clone()).unwrap();
        assert_eq!(result, ToolResult::Opaque(body.clone()));
        assert_eq!(result.text(), body.to_string());

        let result = ToolResult::from_envelope(json!({"result": null, "text": "hi"})).unwrap();
        assert_eq!(result.text(), "hi");

        let result = ToolResult::from_envelope(Value::String("not json".to_owned())).unwrap();
        assert_eq!(result.text(), "not json");
    }

    #[test]
    fn test_error_envelope() {
        let body = json!({"error": {"code": -32602, "message": "Unknown tool"}});
        let err = ToolResult::from_envelope(body).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool");

        let body = json!({"error": {"code": -32602}});
        let err = ToolResult::from_envelope(body).unwrap_err();
        assert_eq!(err.to_string(), "请求失败");
    }
}
