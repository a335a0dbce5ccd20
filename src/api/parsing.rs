//! Extraction helpers for API Gateway proxy events (payload format 1.0 and 2.0).

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::errors::HookError;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// All string-valued headers of the event.
#[must_use]
pub fn headers_map(payload: &Value) -> HashMap<String, String> {
    payload
        .get("headers")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

#[must_use]
pub fn request_path(payload: &Value) -> &str {
    v_str(payload, &["rawPath"])
        .or_else(|| v_str(payload, &["path"]))
        .unwrap_or("/")
}

#[must_use]
pub fn request_method(payload: &Value) -> &str {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| v_str(payload, &["httpMethod"]))
        .unwrap_or("GET")
}

/// Raw request body. A missing body reads as empty.
///
/// # Errors
///
/// Returns an error if a base64-flagged body does not decode to UTF-8 text.
pub fn extract_body(payload: &Value) -> Result<String, HookError> {
    let Some(body) = payload.get("body").and_then(Value::as_str) else {
        return Ok(String::new());
    };

    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !is_base64 {
        return Ok(body.to_string());
    }

    let bytes = BASE64
        .decode(body)
        .map_err(|e| HookError::ParseError(format!("Invalid base64 body: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| HookError::ParseError(format!("Body is not valid UTF-8: {e}")))
}

/// Decodes a URL-encoded component, treating `+` as a space.
///
/// # Errors
///
/// Returns an error if the decoded bytes are not valid UTF-8.
pub fn decode_url_component(input: &str) -> Result<String, HookError> {
    let plus_as_space = input.replace('+', " ");
    percent_decode_str(&plus_as_space)
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|e| HookError::ParseError(format!("Failed to decode URL component: {e}")))
}

/// Parses `application/x-www-form-urlencoded` data. Later keys win.
///
/// # Errors
///
/// Returns an error if a key or value is not valid UTF-8 after decoding.
pub fn parse_form(form_data: &str) -> Result<HashMap<String, String>, HookError> {
    let mut map = HashMap::new();

    for pair in form_data.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        map.insert(decode_url_component(raw_key)?, decode_url_component(raw_value)?);
    }

    Ok(map)
}

/// Query string parameters, from `rawQueryString` or `queryStringParameters`.
#[must_use]
pub fn query_params(payload: &Value) -> HashMap<String, String> {
    if let Some(raw) = v_str(payload, &["rawQueryString"]).filter(|q| !q.is_empty()) {
        if let Ok(map) = parse_form(raw) {
            return map;
        }
    }

    payload
        .get("queryStringParameters")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Flag semantics of the admin pages: set unless absent, empty or `0`.
#[must_use]
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty() && v != "0")
}
