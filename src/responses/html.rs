use crate::errors::ResultResp;
use astra::{Body, Response, ResponseBuilder};
use maud::Markup;

// Token bundles ride in cookies, so nothing we serve may be cached.
const NO_STORE: &str = "no-store";

pub fn html_response(markup: Markup) -> ResultResp {
    let body = markup.into_string();

    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Cache-Control", NO_STORE)
        .body(Body::from(body))
        .unwrap();

    Ok(resp)
}

pub fn html_response_with_cookie(markup: Markup, set_cookie: &str) -> ResultResp {
    let body = markup.into_string();

    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Cache-Control", NO_STORE)
        .header("Set-Cookie", set_cookie)
        .body(Body::from(body))
        .unwrap();

    Ok(resp)
}

/// 303 See Other, optionally setting a cookie on the way out.
pub fn redirect_response(location: &str, set_cookie: Option<&str>) -> Response {
    let mut builder = ResponseBuilder::new()
        .status(303)
        .header("Location", location)
        .header("Cache-Control", NO_STORE);

    if let Some(cookie) = set_cookie {
        builder = builder.header("Set-Cookie", cookie);
    }

    builder.body(Body::empty()).unwrap()
}
