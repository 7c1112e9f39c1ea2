// src/tests/router_tests/dashboard_tests.rs
use crate::errors::ServerError;
use crate::router::handle;
use crate::tesla::{ClientConfig, TeslaClient};
use astra::{Body, Request};
use http::Method;

fn test_client() -> TeslaClient {
    TeslaClient::new(ClientConfig::default()).expect("client builds")
}

fn get(uri: &str) -> Request {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

#[test]
fn dashboard_without_a_cookie_redirects_to_login() -> Result<(), Box<dyn std::error::Error>> {
    let client = test_client();

    let resp = handle(get("/"), &client)?;
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap().to_str()?, "/login");

    Ok(())
}

#[test]
fn dashboard_with_a_broken_cookie_redirects_and_clears_it(
) -> Result<(), Box<dyn std::error::Error>> {
    let client = test_client();
    let mut req = get("/");
    req.headers_mut()
        .insert("Cookie", "tesla_bundle=!!!garbage!!!".parse()?);

    let resp = handle(req, &client)?;
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap().to_str()?, "/login");

    let cookie = resp.headers().get("Set-Cookie").unwrap().to_str()?;
    assert!(cookie.contains("Max-Age=0"));

    Ok(())
}

#[test]
fn refresh_without_a_cookie_redirects_to_login() -> Result<(), Box<dyn std::error::Error>> {
    let client = test_client();

    let resp = handle(get("/refresh"), &client)?;
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap().to_str()?, "/login");

    Ok(())
}

#[test]
fn unknown_routes_are_not_found() {
    let client = test_client();

    let err = handle(get("/definitely-not-a-page"), &client).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}
