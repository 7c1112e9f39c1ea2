use crate::auth::bundle::{decode_bundle, encode_bundle, BUNDLE_COOKIE};
use crate::auth::login::{generate_login_params, parse_redirect_url};
use crate::domain::view::build_order_view;
use crate::errors::{ResultResp, ServerError};
use crate::responses::{html_response, redirect_response};
use crate::templates;
use crate::tesla::TeslaClient;
use astra::Request;
use log::info;
use serde_json::{Map, Value};
use std::io::Read;

pub fn handle(mut req: Request, client: &TeslaClient) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => dashboard(&req, client),
        ("GET", "/login") => login_page(),
        ("POST", "/callback") => callback(&mut req, client),
        ("GET", "/refresh") => refresh(&req, client),
        ("GET", "/logout") => logout(),
        _ => Err(ServerError::NotFound),
    }
}

fn dashboard(req: &Request, client: &TeslaClient) -> ResultResp {
    let Some((access_token, bundle)) = authenticated_bundle(req, client) else {
        return Ok(redirect_response("/login", Some(&clearing_cookie())));
    };

    let entries = client.collect_order_entries(&access_token)?;
    let today = chrono::Local::now().date_naive();
    let orders: Vec<_> = entries
        .iter()
        .map(|entry| build_order_view(entry, today))
        .collect();

    let refreshed = query_flag(req, "refreshed");
    crate::responses::html_response_with_cookie(
        templates::pages::dashboard_page(&orders, refreshed),
        &bundle_cookie(&bundle),
    )
}

fn login_page() -> ResultResp {
    let params = generate_login_params();
    html_response(templates::pages::login_page(&params))
}

fn callback(req: &mut Request, client: &TeslaClient) -> ResultResp {
    let mut body = String::new();
    req.body_mut()
        .reader()
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable form body: {e}")))?;

    let mut redirected_url = None;
    let mut verifier = None;
    for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
        match key.as_ref() {
            "url" => redirected_url = Some(value.into_owned()),
            "verifier" => verifier = Some(value.into_owned()),
            _ => {}
        }
    }
    let redirected_url = redirected_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("missing redirected URL".into()))?;
    let verifier = verifier
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("missing code verifier".into()))?;

    let auth_code = parse_redirect_url(&redirected_url)?;
    let bundle = client.exchange_code_for_tokens(&auth_code, &verifier)?;
    info!("login completed, token bundle issued");

    Ok(redirect_response("/", Some(&bundle_cookie(&bundle))))
}

fn refresh(req: &Request, client: &TeslaClient) -> ResultResp {
    let Some((_, bundle)) = authenticated_bundle(req, client) else {
        return Ok(redirect_response("/login", Some(&clearing_cookie())));
    };
    Ok(redirect_response(
        "/?refreshed=1",
        Some(&bundle_cookie(&bundle)),
    ))
}

fn logout() -> ResultResp {
    crate::responses::html_response_with_cookie(
        templates::pages::logout_page(),
        &clearing_cookie(),
    )
}

/// Decode the bundle cookie and run it through token validation,
/// refreshing if needed.
fn authenticated_bundle(
    req: &Request,
    client: &TeslaClient,
) -> Option<(String, Map<String, Value>)> {
    let bundle = decode_bundle(&cookie_value(req, BUNDLE_COOKIE)?)?;
    client.ensure_authenticated(bundle)
}

fn cookie_value(req: &Request, name: &str) -> Option<String> {
    let header = req.headers().get("Cookie")?.to_str().ok()?;
    for pair in header.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if parts.next() == Some(name) {
            return parts.next().map(str::to_string);
        }
    }
    None
}

fn query_flag(req: &Request, name: &str) -> bool {
    let Some(query) = req.uri().query() else {
        return false;
    };
    url::form_urlencoded::parse(query.as_bytes()).any(|(key, value)| key == name && value == "1")
}

fn bundle_cookie(bundle: &Map<String, Value>) -> String {
    format!(
        "{BUNDLE_COOKIE}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age=2592000",
        encode_bundle(bundle)
    )
}

fn clearing_cookie() -> String {
    format!("{BUNDLE_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}
