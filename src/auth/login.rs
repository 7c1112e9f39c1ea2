// src/auth/login.rs
//
// OAuth2 + PKCE parameters for the Tesla SSO login. The server never
// talks to the login page itself: the user opens the authorize URL,
// signs in, and pastes the resulting void-callback URL back to us.

use crate::errors::ServerError;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use url::Url;

pub const CLIENT_ID: &str = "ownerapi";
pub const REDIRECT_URI: &str = "https://auth.tesla.com/void/callback";
pub const AUTH_URL: &str = "https://auth.tesla.com/oauth2/v3/authorize";
pub const TOKEN_URL: &str = "https://auth.tesla.com/oauth2/v3/token";
pub const SCOPE: &str = "openid email offline_access";
pub const CODE_CHALLENGE_METHOD: &str = "S256";

#[derive(Debug, Clone)]
pub struct LoginParams {
    pub state: String,
    pub code_verifier: String,
    pub auth_url: String,
}

fn base64_url_nopad(bytes: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Fresh state + PKCE verifier/challenge and the composed authorize URL.
pub fn generate_login_params() -> LoginParams {
    let mut rng = OsRng;

    let mut state_bytes = [0u8; 16];
    rng.fill_bytes(&mut state_bytes);
    let state = hex_encode(&state_bytes);

    let mut verifier_bytes = [0u8; 32];
    rng.fill_bytes(&mut verifier_bytes);
    let code_verifier = base64_url_nopad(&verifier_bytes);

    let code_challenge = base64_url_nopad(&Sha256::digest(code_verifier.as_bytes()));

    let mut auth_url = Url::parse(AUTH_URL).expect("static authorize URL is valid");
    auth_url
        .query_pairs_mut()
        .append_pair("client_id", CLIENT_ID)
        .append_pair("redirect_uri", REDIRECT_URI)
        .append_pair("response_type", "code")
        .append_pair("scope", SCOPE)
        .append_pair("state", &state)
        .append_pair("code_challenge", &code_challenge)
        .append_pair("code_challenge_method", CODE_CHALLENGE_METHOD);

    LoginParams {
        state,
        code_verifier,
        auth_url: auth_url.to_string(),
    }
}

/// Pull the authorization `code` out of the pasted void-callback URL.
pub fn parse_redirect_url(redirected_url: &str) -> Result<String, ServerError> {
    let parsed = Url::parse(redirected_url.trim())
        .map_err(|e| ServerError::BadRequest(format!("not a valid URL: {e}")))?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| {
            ServerError::BadRequest("authorization code not found in the redirected URL".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_params_compose_a_pkce_authorize_url() {
        let params = generate_login_params();
        assert_eq!(params.state.len(), 32);
        assert!(params.code_verifier.len() >= 40);
        assert!(params.auth_url.starts_with(AUTH_URL));
        assert!(params.auth_url.contains("client_id=ownerapi"));
        assert!(params.auth_url.contains("code_challenge_method=S256"));
        assert!(params.auth_url.contains("code_challenge="));
        // The verifier itself must never appear in the URL.
        assert!(!params.auth_url.contains(&params.code_verifier));
    }

    #[test]
    fn redirect_url_parsing() {
        let code = parse_redirect_url(
            "https://auth.tesla.com/void/callback?code=abc123&state=xyz",
        )
        .unwrap();
        assert_eq!(code, "abc123");

        assert!(parse_redirect_url("https://auth.tesla.com/void/callback?state=x").is_err());
        assert!(parse_redirect_url("definitely not a url").is_err());
    }
}
