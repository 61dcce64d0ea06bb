use crate::common::{TestApp, routes};

async fn preflight(app: &TestApp, origin: &str) -> reqwest::Response {
    app.client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{}{}", app.addr, routes::RECENT),
        )
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .expect("Failed to send preflight")
}

#[tokio::test]
async fn no_configured_origins_allows_none() {
    let app = TestApp::spawn().await;
    let res = preflight(&app, "https://evil.test").await;
    assert!(res.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn configured_origin_is_echoed_and_others_are_not() {
    let app = TestApp::spawn_with_cors_origins(&["https://app.test"]).await;

    let res = preflight(&app, "https://app.test").await;
    assert_eq!(res.headers()["access-control-allow-origin"], "https://app.test");

    let res = preflight(&app, "https://evil.test").await;
    assert!(res.headers().get("access-control-allow-origin").is_none());
}
