// src/tests/router_tests/auth_flow_tests.rs
use crate::auth::login::AUTH_URL;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tesla::{ClientConfig, TeslaClient};
use astra::{Body, Request};
use http::Method;
use std::io::Read;

fn test_client() -> TeslaClient {
    TeslaClient::new(ClientConfig::default()).expect("client builds")
}

fn request(method: Method, uri: &str, body: Body) -> Request {
    let mut req = Request::new(body);
    *req.method_mut() = method;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

fn body_string(resp: astra::Response) -> String {
    let mut body = String::new();
    resp.into_body()
        .reader()
        .read_to_string(&mut body)
        .unwrap();
    body
}

#[test]
fn login_page_carries_the_authorize_url_and_verifier() -> Result<(), Box<dyn std::error::Error>> {
    let client = test_client();
    let req = request(Method::GET, "/login", Body::empty());

    let resp = handle(req, &client)?;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Cache-Control").unwrap().to_str()?,
        "no-store"
    );

    let body = body_string(resp);
    assert!(body.contains(AUTH_URL));
    assert!(body.contains("name=\"verifier\""));
    assert!(body.contains("action=\"/callback\""));

    Ok(())
}

#[test]
fn callback_without_form_fields_is_a_bad_request() {
    let client = test_client();
    let req = request(
        Method::POST,
        "/callback",
        Body::from(b"verifier=abc".to_vec()),
    );

    let err = handle(req, &client).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn callback_with_an_unparseable_redirect_url_is_a_bad_request() {
    let client = test_client();
    let req = request(
        Method::POST,
        "/callback",
        Body::from(b"url=not%20a%20url&verifier=abc".to_vec()),
    );

    let err = handle(req, &client).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn callback_with_a_codeless_redirect_url_is_a_bad_request() {
    let client = test_client();
    let req = request(
        Method::POST,
        "/callback",
        Body::from(
            b"url=https%3A%2F%2Fauth.tesla.com%2Fvoid%2Fcallback%3Fstate%3Dx&verifier=abc".to_vec(),
        ),
    );

    let err = handle(req, &client).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn logout_clears_the_bundle_cookie() -> Result<(), Box<dyn std::error::Error>> {
    let client = test_client();
    let req = request(Method::GET, "/logout", Body::empty());

    let resp = handle(req, &client)?;
    assert_eq!(resp.status(), 200);

    let cookie = resp.headers().get("Set-Cookie").unwrap().to_str()?;
    assert!(cookie.starts_with("tesla_bundle=;"));
    assert!(cookie.contains("Max-Age=0"));

    Ok(())
}
