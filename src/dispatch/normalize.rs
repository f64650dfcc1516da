//! Normalization of inbound function-call payloads.
//!
//! Agents send the same call in several shapes:
//!
//! ```text
//! {"function": "get_reservation", "arguments": {"phone_number": "+1..."}}
//! {"function": "get_reservation", "argument": {"parsed": [{"phone_number": "+1..."}]}}
//! {"function": "get_reservation", "phone_number": "+1..."}
//! ```
//!
//! When several are present, `arguments` wins over `argument.parsed[0]`,
//! which wins over flat top-level fields.

use serde_json::Value;

use crate::functions::Arguments;

/// Top-level keys that are never treated as flat arguments.
pub const RESERVED_KEYS: &[&str] = &[
    "function",
    "argument",
    "arguments",
    "action",
    "meta_data",
    "meta_data_token",
    "purpose",
    "argument_desc",
    "app_name",
    "version",
    "content_type",
    "content_disposition",
    "call_id",
    "caller_id_name",
    "caller_id_num",
    "ai_session_id",
    "conversation_id",
    "project_id",
    "space_id",
];

/// Which payload shape supplied the arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentSource {
    Arguments,
    Parsed,
    Flat,
}

/// Canonical `(function, arguments)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub function: String,
    pub arguments: Arguments,
    pub source: ArgumentSource,
}

impl FunctionCall {
    pub fn new(function: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            function: function.into(),
            arguments,
            source: ArgumentSource::Arguments,
        }
    }
}

/// A normalized webhook request.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookRequest {
    /// Invoke a function.
    Call(FunctionCall),
    /// Signature handshake: describe the listed functions (all if empty).
    Signature { functions: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("Request must be JSON")]
    NotJson,

    #[error("Missing 'function' in request")]
    MissingFunction,

    /// The function is named but its arguments cannot be read.
    #[error("{reason}")]
    MalformedArguments { function: String, reason: String },
}

/// Parse a raw body into a JSON object.
pub fn parse_body(body: &[u8]) -> Result<serde_json::Map<String, Value>, NormalizeError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(NormalizeError::NotJson),
    }
}

/// Turn a request object into its canonical form.
pub fn normalize(mut body: serde_json::Map<String, Value>) -> Result<WebhookRequest, NormalizeError> {
    if body.get("action").and_then(Value::as_str) == Some("get_signature") {
        let functions = body
            .get("functions")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        return Ok(WebhookRequest::Signature { functions });
    }

    let function = match body.get("function").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(NormalizeError::MissingFunction),
    };

    let malformed = |reason: &str| NormalizeError::MalformedArguments {
        function: function.clone(),
        reason: reason.to_string(),
    };

    if let Some(arguments) = body.remove("arguments").filter(|v| !v.is_null()) {
        let arguments = match arguments {
            Value::Object(map) => map,
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                _ => return Err(malformed("'arguments' string is not a JSON object")),
            },
            _ => return Err(malformed("'arguments' must be an object")),
        };
        return Ok(WebhookRequest::Call(FunctionCall {
            function,
            arguments,
            source: ArgumentSource::Arguments,
        }));
    }

    let parsed = body
        .get("argument")
        .and_then(|a| a.get("parsed"))
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .cloned();
    if let Some(first) = parsed {
        return match first {
            Value::Object(arguments) => Ok(WebhookRequest::Call(FunctionCall {
                function,
                arguments,
                source: ArgumentSource::Parsed,
            })),
            _ => Err(malformed("'argument.parsed[0]' must be an object")),
        };
    }

    let arguments: Arguments = body
        .into_iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .collect();
    Ok(WebhookRequest::Call(FunctionCall {
        function,
        arguments,
        source: ArgumentSource::Flat,
    }))
}
