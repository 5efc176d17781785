use dapp_engine::{FaviconError, FaviconResolver, FaviconSettings, HttpFaviconResolver};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, html: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn declared_icon_is_downloaded_and_inlined() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        r#"<html><head><link rel="icon" href="/static/logo.png" sizes="64x64"></head></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/static/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"abc".to_vec(), "image/png"))
        .mount(&server)
        .await;

    let info = HttpFaviconResolver::default()
        .resolve(&server.uri())
        .await
        .unwrap();
    let expected_url = format!("{}/static/logo.png", server.uri());
    assert_eq!(info.favicon_url.as_deref(), Some(expected_url.as_str()));
    assert_eq!(info.favicon_base64.as_deref(), Some("data:image/png;base64,YWJj"));
    let icon = info.icon.unwrap();
    assert_eq!(icon.href, expected_url);
    assert_eq!(icon.sizes.as_deref(), Some("64x64"));
}

#[tokio::test]
async fn falls_back_to_favicon_ico() {
    let server = MockServer::start().await;
    mount_page(&server, "<html><body>no icons here</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8, 0, 1, 0]))
        .mount(&server)
        .await;

    let info = HttpFaviconResolver::default()
        .resolve(&server.uri())
        .await
        .unwrap();
    assert_eq!(info.icon, None);
    assert_eq!(
        info.favicon_url,
        Some(format!("{}/favicon.ico", server.uri()))
    );
    assert_eq!(info.favicon_base64.as_deref(), Some("data:image/x-icon;base64,AAABAA=="));
}

#[tokio::test]
async fn html_served_as_favicon_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>spa</html>", "text/html"))
        .mount(&server)
        .await;

    let info = HttpFaviconResolver::default()
        .resolve(&server.uri())
        .await
        .unwrap();
    assert_eq!(info.icon, None);
    assert_eq!(info.favicon_url, None);
    assert_eq!(info.favicon_base64, None);
}

#[tokio::test]
async fn oversized_icon_is_not_inlined() {
    let server = MockServer::start().await;
    mount_page(&server, r#"<link rel="icon" href="/big.png">"#).await;
    Mock::given(method("GET"))
        .and(path("/big.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![7u8; 64], "image/png"))
        .mount(&server)
        .await;

    let settings = FaviconSettings {
        max_icon_bytes: 16,
        ..FaviconSettings::default()
    };
    let info = HttpFaviconResolver::new(settings)
        .resolve(&server.uri())
        .await
        .unwrap();
    assert_eq!(info.favicon_url, Some(format!("{}/big.png", server.uri())));
    assert_eq!(info.favicon_base64, None);
}

#[tokio::test]
async fn invalid_origin_is_an_error() {
    let err = HttpFaviconResolver::default()
        .resolve("not an origin")
        .await
        .unwrap_err();
    assert!(matches!(err, FaviconError::InvalidOrigin { .. }));
}
