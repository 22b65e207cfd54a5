use axum::{body::Body, response::Response};

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    let location = response
        .headers()
        .get("hx-redirect")
        .unwrap_or_else(|| panic!("response has no hx-redirect header, want {endpoint}"))
        .to_str()
        .expect("hx-redirect header is not valid UTF-8");

    assert_eq!(location, endpoint);
}
