//! Integration tests for fetching and analyzing pages
//!
//! These tests use wiremock to create mock HTTP servers that stand in for
//! the analyzed page and for the targets of its links.

use page_lens::config::{FetcherConfig, ProberConfig};
use page_lens::fetch::{build_http_client, fetch_document};
use page_lens::links::Prober;
use page_lens::{Analyzer, FetchError, HtmlVersion};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates an analyzer with the given probe timeout and concurrency cap
fn create_analyzer(timeout_ms: u64, max_concurrent_probes: usize) -> Analyzer {
    let config = ProberConfig {
        timeout_ms,
        max_concurrent_probes,
    };
    let prober = Prober::new(&config, "TestBot/1.0").expect("Failed to build prober");
    Analyzer::with_prober(prober)
}

async fn mount_head(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_links_classified_and_probed() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    // "/ok" and "ok" resolve to the same URL, which must be probed once
    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&site)
        .await;
    mount_head(&site, "/missing", 404).await;
    mount_head(&other, "/alive", 200).await;

    let html = format!(
        r##"<html><body>
            <a href="/ok">OK</a>
            <a href="ok">OK again</a>
            <a href="/missing">Missing</a>
            <a href="{other}/alive">Other site</a>
            <a href="#top">Top</a>
            <a href="javascript:void(0)">Script</a>
            <a href="/ok">Duplicate</a>
        </body></html>"##,
        other = other.uri()
    );
    let base_url = format!("{}/", site.uri());

    let result = create_analyzer(2000, 0).analyze(&html, &base_url).await;

    assert_eq!(
        result.links,
        vec![
            "/ok".to_string(),
            "ok".to_string(),
            "/missing".to_string(),
            format!("{}/alive", other.uri()),
        ]
    );
    assert_eq!(result.internal_links, 2);
    assert_eq!(result.external_links, 1);
    assert_eq!(result.inaccessible_links, 1);
    assert!(result.internal_links + result.external_links < result.links.len());
}

#[tokio::test]
async fn test_status_codes_decide_accessibility() {
    let site = MockServer::start().await;
    mount_head(&site, "/ok", 200).await;
    mount_head(&site, "/no-content", 204).await;
    mount_head(&site, "/not-modified", 304).await;
    mount_head(&site, "/error", 500).await;
    mount_head(&site, "/head-not-allowed", 405).await;
    let location = format!("{}/ok", site.uri());
    Mock::given(method("HEAD"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", location.as_str()))
        .mount(&site)
        .await;

    let html = r#"<body>
        <a href="/ok">a</a>
        <a href="/no-content">b</a>
        <a href="/not-modified">c</a>
        <a href="/moved">d</a>
        <a href="/error">e</a>
        <a href="/head-not-allowed">f</a>
        <a href="/unmounted">g</a>
    </body>"#;

    let result = create_analyzer(2000, 0)
        .analyze(html, &format!("{}/", site.uri()))
        .await;

    assert_eq!(result.internal_links, 7);
    assert_eq!(result.inaccessible_links, 3);
}

#[tokio::test]
async fn test_slow_link_times_out_without_blocking_others() {
    let site = MockServer::start().await;
    mount_head(&site, "/fast", 200).await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&site)
        .await;

    let html = r#"<a href="/fast">fast</a><a href="/slow">slow</a>"#;
    let started = Instant::now();
    let result = create_analyzer(200, 0)
        .analyze(html, &format!("{}/", site.uri()))
        .await;

    assert_eq!(result.internal_links, 2);
    assert_eq!(result.inaccessible_links, 1);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_unresolvable_href_listed_but_not_counted() {
    let site = MockServer::start().await;
    mount_head(&site, "/ok", 200).await;

    let html = r#"<a href="http://[::1">broken</a><a href="/ok">ok</a>"#;
    let result = create_analyzer(2000, 0)
        .analyze(html, &format!("{}/", site.uri()))
        .await;

    assert_eq!(
        result.links,
        vec!["http://[::1".to_string(), "/ok".to_string()]
    );
    assert_eq!(result.internal_links, 1);
    assert_eq!(result.external_links, 0);
    assert_eq!(result.inaccessible_links, 0);
}

#[tokio::test]
async fn test_unparsable_base_url_counts_everything_external() {
    let site = MockServer::start().await;
    mount_head(&site, "/ok", 200).await;

    let html = format!(
        r#"<a href="{}/ok">absolute</a><a href="/relative">relative</a>"#,
        site.uri()
    );
    let result = create_analyzer(2000, 0).analyze(&html, "not a url").await;

    assert!(result.error.is_none());
    assert_eq!(result.internal_links, 0);
    assert_eq!(result.external_links, 2);
    // a relative target with no base cannot be requested
    assert_eq!(result.inaccessible_links, 1);
}

#[tokio::test]
async fn test_bounded_probe_concurrency_gives_same_counts() {
    let site = MockServer::start().await;
    for route in ["/a", "/b", "/c"] {
        Mock::given(method("HEAD"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(50)))
            .mount(&site)
            .await;
    }
    mount_head(&site, "/gone", 410).await;

    let html = r#"<a href="/a">a</a><a href="/b">b</a><a href="/c">c</a><a href="/gone">gone</a>"#;
    let base_url = format!("{}/", site.uri());

    let bounded = create_analyzer(2000, 1).analyze(html, &base_url).await;
    let unbounded = create_analyzer(2000, 0).analyze(html, &base_url).await;

    assert_eq!(bounded.internal_links, 4);
    assert_eq!(bounded.inaccessible_links, 1);
    assert_eq!(bounded, unbounded);
}

#[tokio::test]
async fn test_analysis_is_repeatable() {
    let site = MockServer::start().await;
    mount_head(&site, "/docs", 200).await;
    mount_head(&site, "/old", 404).await;

    let html = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN">
        <html><head><title>Repeat</title></head>
        <body><h1>One</h1><h1>One</h1><a href="/docs">docs</a><a href="/old">old</a>
        <p>Sign in to comment</p></body></html>"#;
    let base_url = format!("{}/", site.uri());
    let analyzer = create_analyzer(2000, 0);

    let first = analyzer.analyze(html, &base_url).await;
    let second = analyzer.analyze(html, &base_url).await;

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first.html_version, Some(HtmlVersion::Html401));
    assert_eq!(first.headings.len(), 1);
    assert_eq!(first.inaccessible_links, 1);
    assert_eq!(
        first.login_indicators,
        vec!["page_text_contains_login".to_string()]
    );
}

#[tokio::test]
async fn test_fetch_then_analyze_page() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<!DOCTYPE html><html><head><title> Account </title></head><body>
                    <h1>Welcome back</h1>
                    <form><input type="text" name="user"><input type="password" name="pw"></form>
                    <a href="/reset">Forgot password?</a>
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&site)
        .await;
    mount_head(&site, "/reset", 200).await;

    let page_url = format!("{}/login", site.uri());
    let client = build_http_client(&FetcherConfig::default()).expect("Failed to build client");
    let page = fetch_document(&client, &page_url)
        .await
        .expect("Fetch should succeed");

    let result = create_analyzer(2000, 0)
        .analyze_bytes(&page.body, page.charset.as_deref(), &page_url)
        .await;

    assert_eq!(result.title, "Account");
    assert_eq!(result.html_version, Some(HtmlVersion::Html5));
    assert_eq!(result.headings.len(), 1);
    assert_eq!(result.links, vec!["/reset".to_string()]);
    assert_eq!(result.internal_links, 1);
    assert_eq!(result.inaccessible_links, 0);
    assert!(result.login_detected);
    assert_eq!(result.login_indicators, vec!["password_input".to_string()]);
}

#[tokio::test]
async fn test_invalid_document_bytes_yield_error_result() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/binary"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'<', b'p', b'>', 0xc3, 0x28]))
        .mount(&site)
        .await;

    let page_url = format!("{}/binary", site.uri());
    let client = build_http_client(&FetcherConfig::default()).expect("Failed to build client");
    let page = fetch_document(&client, &page_url)
        .await
        .expect("Fetch should succeed");

    let result = create_analyzer(2000, 0)
        .analyze_bytes(&page.body, page.charset.as_deref(), &page_url)
        .await;

    assert!(result.error.is_some());
    assert_eq!(result.title, "");
    assert_eq!(result.html_version, None);
    assert!(result.headings.is_empty());
    assert!(result.links.is_empty());
    assert_eq!(
        result.internal_links + result.external_links + result.inaccessible_links,
        0
    );
}

#[tokio::test]
async fn test_fetch_sends_configured_user_agent() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&site)
        .await;

    let config = FetcherConfig {
        user_agent: "TestBot/1.0".to_string(),
        ..FetcherConfig::default()
    };
    let client = build_http_client(&config).expect("Failed to build client");
    let page = fetch_document(&client, &format!("{}/", site.uri()))
        .await
        .expect("Fetch should succeed");

    assert_eq!(page.body, b"<html></html>".to_vec());
}

#[tokio::test]
async fn test_fetch_rejects_error_status() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;

    let client = build_http_client(&FetcherConfig::default()).expect("Failed to build client");

    let result = fetch_document(&client, &format!("{}/broken", site.uri())).await;
    assert!(matches!(result, Err(FetchError::Status(500))));

    let result = fetch_document(&client, &format!("{}/unmounted", site.uri())).await;
    assert!(matches!(result, Err(FetchError::Status(404))));
}

#[tokio::test]
async fn test_fetch_reports_connection_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        listener.local_addr().expect("Failed to read address").port()
    };

    let client = build_http_client(&FetcherConfig::default()).expect("Failed to build client");
    let result = fetch_document(&client, &format!("http://127.0.0.1:{}/", port)).await;

    assert!(matches!(result, Err(FetchError::Request(_))));
}

#[tokio::test]
async fn test_latin1_page_is_decoded_from_declared_charset() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/menu"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<html><head><title>Caf\xe9</title></head><body><h1>Men\xfa del d\xeda</h1></body></html>"
                .to_vec(),
            "text/html; charset=ISO-8859-1",
        ))
        .mount(&site)
        .await;

    let page_url = format!("{}/menu", site.uri());
    let client = build_http_client(&FetcherConfig::default()).expect("Failed to build client");
    let page = fetch_document(&client, &page_url)
        .await
        .expect("Fetch should succeed");

    assert!(page
        .charset
        .as_deref()
        .is_some_and(|charset| charset.eq_ignore_ascii_case("ISO-8859-1")));

    let result = create_analyzer(2000, 0)
        .analyze_bytes(&page.body, page.charset.as_deref(), &page_url)
        .await;

    assert!(result.error.is_none());
    assert_eq!(result.title, "Café");
    assert_eq!(result.headings.len(), 1);
    assert_eq!(result.headings[0].text, "Menú del día");
}

#[tokio::test]
async fn test_absolute_links_counted_as_written() {
    let site = MockServer::start().await;

    // "{site}" and "{site}/" are distinct targets, each probed on its own
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&site)
        .await;

    let html = format!(
        r#"<a href="{site}">bare</a><a href="{site}/">slash</a>"#,
        site = site.uri()
    );

    let result = create_analyzer(2000, 0)
        .analyze(&html, &format!("{}/", site.uri()))
        .await;

    assert_eq!(result.links.len(), 2);
    assert_eq!(result.internal_links, 2);
    assert_eq!(result.external_links, 0);
    assert_eq!(result.inaccessible_links, 0);
}
