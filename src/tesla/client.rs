// src/tesla/client.rs
//
// Blocking client for the owner API: token exchange/refresh against the
// SSO endpoint, then the orders list and per-order task details. All
// responses stay serde_json::Value; the derivation core is built to
// take the payload exactly as Tesla sends it.

use crate::auth::bundle::access_token_is_valid;
use crate::auth::login::{CLIENT_ID, REDIRECT_URI, TOKEN_URL};
use log::{info, warn};
use reqwest::blocking::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

const ORDERS_URL: &str = "https://owner-api.teslamotors.com/api/1/users/orders";
const TASKS_URL: &str = "https://akamai-apigateway-vfx.tesla.com/tasks";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `deviceLanguage` / `deviceCountry` sent to the tasks gateway.
    pub device_language: String,
    pub device_country: String,
    /// Mobile app version the gateway expects to see.
    pub app_version: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            device_language: "en".to_string(),
            device_country: "DE".to_string(),
            app_version: "9.99.9-9999".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Defaults overridable from the environment.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(lang) = std::env::var("TESLA_DEVICE_LANGUAGE") {
            if !lang.trim().is_empty() {
                cfg.device_language = lang.trim().to_string();
            }
        }
        if let Ok(country) = std::env::var("TESLA_DEVICE_COUNTRY") {
            if !country.trim().is_empty() {
                cfg.device_country = country.trim().to_string();
            }
        }
        cfg
    }
}

pub struct TeslaClient {
    http: Client,
    cfg: ClientConfig,
}

impl TeslaClient {
    pub fn new(cfg: ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { http, cfg })
    }

    fn post_token_form(&self, form: &[(&str, &str)]) -> Result<Map<String, Value>, ApiError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(form)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let json: Value = response
            .json()
            .map_err(|e| ApiError::UnexpectedShape(e.to_string()))?;
        match json {
            Value::Object(map) => Ok(map),
            other => Err(ApiError::UnexpectedShape(format!(
                "token endpoint returned {other}"
            ))),
        }
    }

    /// Exchange the pasted authorization code (plus the PKCE verifier
    /// that produced its challenge) for a token bundle.
    pub fn exchange_code_for_tokens(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<Map<String, Value>, ApiError> {
        self.post_token_form(&[
            ("grant_type", "authorization_code"),
            ("client_id", CLIENT_ID),
            ("code", auth_code),
            ("redirect_uri", REDIRECT_URI),
            ("code_verifier", code_verifier),
        ])
    }

    pub fn refresh_tokens(&self, refresh_token: &str) -> Result<Map<String, Value>, ApiError> {
        self.post_token_form(&[
            ("grant_type", "refresh_token"),
            ("client_id", CLIENT_ID),
            ("refresh_token", refresh_token),
        ])
    }

    fn get_json(&self, url: &str, access_token: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        response
            .json()
            .map_err(|e| ApiError::UnexpectedShape(e.to_string()))
    }

    /// The order summaries under the owner API's `response` wrapper.
    pub fn retrieve_orders(&self, access_token: &str) -> Result<Vec<Value>, ApiError> {
        let json = self.get_json(ORDERS_URL, access_token, &[])?;
        match json.get("response") {
            Some(Value::Array(orders)) => Ok(orders.clone()),
            _ => Err(ApiError::UnexpectedShape(
                "orders payload has no response array".into(),
            )),
        }
    }

    /// The task bundle for one order from the tasks gateway.
    pub fn order_details(&self, order_id: &str, access_token: &str) -> Result<Value, ApiError> {
        self.get_json(
            TASKS_URL,
            access_token,
            &[
                ("deviceLanguage", self.cfg.device_language.as_str()),
                ("deviceCountry", self.cfg.device_country.as_str()),
                ("referenceNumber", order_id),
                ("appVersion", self.cfg.app_version.as_str()),
            ],
        )
    }

    /// Fetch every order and zip it with its details into the
    /// `{order, details}` envelopes the derivation core consumes.
    /// Orders without a reference number cannot be looked up and are
    /// skipped.
    pub fn collect_order_entries(&self, access_token: &str) -> Result<Vec<Value>, ApiError> {
        let orders = self.retrieve_orders(access_token)?;
        info!("fetched {} orders", orders.len());

        let mut entries = Vec::with_capacity(orders.len());
        for order in orders {
            let Some(order_id) = order
                .get("referenceNumber")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
            else {
                warn!("skipping order without a reference number");
                continue;
            };
            let details = self.order_details(order_id, access_token)?;
            entries.push(serde_json::json!({"order": order, "details": details}));
        }
        Ok(entries)
    }

    /// Validate or refresh a token bundle. Returns the active access
    /// token plus the (possibly updated) bundle for the caller to set
    /// back on the cookie; `None` means the user has to log in again.
    pub fn ensure_authenticated(
        &self,
        mut bundle: Map<String, Value>,
    ) -> Option<(String, Map<String, Value>)> {
        let access_token = bundle.get("access_token")?.as_str()?.to_string();
        let refresh_token = bundle.get("refresh_token")?.as_str()?.to_string();
        if access_token.is_empty() || refresh_token.is_empty() {
            return None;
        }

        if access_token_is_valid(&access_token) {
            return Some((access_token, bundle));
        }

        info!("access token expired, refreshing");
        match self.refresh_tokens(&refresh_token) {
            Ok(refreshed) => {
                let access_token = refreshed.get("access_token")?.as_str()?.to_string();
                // Merge to keep any extra fields Tesla returns.
                for (key, value) in refreshed {
                    bundle.insert(key, value);
                }
                Some((access_token, bundle))
            }
            Err(e) => {
                warn!("token refresh failed: {e}");
                None
            }
        }
    }
}
