#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, response::Parts, Request};
use axum::Router;
use http_body_util::BodyExt as _;
use tower::ServiceExt as _;

/// Fire one request at the app and collect the response body as a string.
pub async fn send(app: &Router, request: Request<Body>) -> (Parts, String) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.expect("body read failed").to_bytes();
    (parts, String::from_utf8(bytes.to_vec()).expect("non-utf8 body"))
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> (Parts, String) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

/// POST an urlencoded form, the way the browser pages submit.
pub async fn post_form(
    app: &Router,
    uri: &str,
    form: &str,
    cookie: Option<&str>,
) -> (Parts, String) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(form.to_string())).unwrap()).await
}

/// Send a JSON body with the given method, as the API surface expects.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (Parts, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// The session cookie pair from a response, ready to echo back.
pub fn session_cookie(parts: &Parts) -> String {
    parts
        .headers
        .get(header::SET_COOKIE)
        .expect("no session cookie set")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub fn location(parts: &Parts) -> &str {
    parts
        .headers
        .get(header::LOCATION)
        .expect("no redirect location")
        .to_str()
        .unwrap()
}
