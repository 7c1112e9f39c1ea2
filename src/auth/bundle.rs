// src/auth/bundle.rs
//
// The token bundle is the raw JSON object the token endpoint returns
// (access_token, refresh_token, expiry fields, whatever else Tesla
// adds). It rides base64-encoded in an HttpOnly cookie; the server
// itself keeps no token state.

use base64::Engine;
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};

pub const BUNDLE_COOKIE: &str = "tesla_bundle";

pub fn encode_bundle(bundle: &Map<String, Value>) -> String {
    let json = Value::Object(bundle.clone()).to_string();
    base64::engine::general_purpose::STANDARD.encode(json.as_bytes())
}

/// Decode a cookie value back into the bundle. Any decode failure means
/// the cookie is stale or tampered with; treat it as logged out.
pub fn decode_bundle(value: &str) -> Option<Map<String, Value>> {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(value.trim().as_bytes())
        .ok()?;
    let json: Value = serde_json::from_slice(&decoded).ok()?;
    match json {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Check the `exp` claim of the access token's JWT payload against the
/// clock. Anything unparseable counts as expired.
pub fn access_token_is_valid(access_token: &str) -> bool {
    let Some(payload_segment) = access_token.split('.').nth(1) else {
        return false;
    };
    let Ok(payload) =
        base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(payload_segment.as_bytes())
    else {
        return false;
    };
    let Ok(claims) = serde_json::from_slice::<Value>(&payload) else {
        return false;
    };
    claims
        .get("exp")
        .and_then(Value::as_u64)
        .map(|exp| exp > now_unix())
        .unwrap_or(false)
}
