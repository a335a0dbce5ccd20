//! Response builders for the API Lambda.

use serde_json::{Value, json};

use crate::core::models::HandlerResult;

/// Returns a JSON response with the given status code.
#[must_use]
pub fn json_response(status_code: u16, body: &Value) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "application/json" },
        "body": body.to_string()
    })
}

/// Maps a hook result to a response: 200 when ok, 400 otherwise so SNS retries.
#[must_use]
pub fn hook_response(result: &HandlerResult) -> Value {
    let status = if result.ok { 200 } else { 400 };
    json_response(status, &result.to_json())
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json_response(status_code, &json!({ "ok": false, "error": message }))
}

/// Returns a 200 HTML page.
#[must_use]
pub fn html(body: &str) -> Value {
    json!({
        "statusCode": 200,
        "headers": { "Content-Type": "text/html; charset=utf-8" },
        "body": body
    })
}

/// Returns a 302 redirect response.
#[must_use]
pub fn redirect(url: &str) -> Value {
    json!({
        "statusCode": 302,
        "headers": { "Location": url },
        "body": ""
    })
}
