//! Utility functions shared by the HTTP and JSON-RPC bindings

use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

use crate::rpc::protocol::{error_codes, Response};

/// Helper function to extract a required argument from a JSON object
pub fn get_required_arg<T: DeserializeOwned>(
    args: &Value,
    key: &str,
    req_id: &Value,
) -> Result<T, Response> {
    from_value(args.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Missing or invalid required argument: '{}'", key),
        )
    })
}

/// Shortens a 0x address for display, keeping `head` and `tail` hex digits.
///
/// `shorten_address("0x1234567890abcdef1234567890abcdef12345678", 4, 3)` is `0x1234...678`.
pub fn shorten_address(address: &str, head: usize, tail: usize) -> String {
    let body = address.strip_prefix("0x").unwrap_or(address);
    if body.len() <= head + tail || !body.is_ascii() {
        return address.to_string();
    }
    format!("0x{}...{}", &body[..head], &body[body.len() - tail..])
}
