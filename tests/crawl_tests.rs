//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use gossamer::config::CallbackRule;
use gossamer::frontier::SqliteStore;
use gossamer::{Crawler, FrontierStore, Page, Settings};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Settings scoped to a mock server, matched by host and port so two
/// servers on the same loopback address count as different domains.
fn settings_for(server: &MockServer) -> Settings {
    let domain = server
        .uri()
        .strip_prefix("http://")
        .expect("mock server uri is http")
        .to_string();

    Settings {
        domain,
        ..Settings::default()
    }
}

/// Default handler that records every routed page URL in order
fn recording_handler(seen: &Arc<Mutex<Vec<String>>>) -> Arc<dyn gossamer::PageHandler> {
    let seen = seen.clone();
    Arc::new(move |page: &Page| {
        seen.lock().unwrap().push(page.url.clone());
    })
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_visits_every_linked_page_once() {
    let server = MockServer::start().await;

    // The same target linked twice under different fragments must be
    // fetched once.
    mount_page(
        &server,
        "/",
        r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="/page2#top">Page 2</a>
            <a href="/page2#bottom">Page 2 again</a>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/page1", r#"<a href="/page2">cross link</a>"#).await;
    mount_page(&server, "/page2", "<html><body>leaf</body></html>").await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let stats = Crawler::new(settings_for(&server))
        .default_handler(recording_handler(&seen))
        .run()
        .await
        .expect("crawl failed");

    let mut urls = seen.lock().unwrap().clone();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            format!("{}/", server.uri()),
            format!("{}/page1", server.uri()),
            format!("{}/page2", server.uri()),
        ]
    );
    assert_eq!(stats.pages_fetched(), 3);
    assert_eq!(stats.fetch_failures(), 0);
}

#[tokio::test]
async fn test_valid_pattern_links_are_fetched_first() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/ordinary">o</a><a href="/target">t</a>"#,
    )
    .await;
    mount_page(&server, "/ordinary", "plain page").await;
    mount_page(&server, "/target", "priority page").await;

    let mut settings = settings_for(&server);
    settings.valid_link_patterns = vec!["/target$".to_string()];
    settings.thread_count = 1;

    let seen = Arc::new(Mutex::new(Vec::new()));
    Crawler::new(settings)
        .default_handler(recording_handler(&seen))
        .run()
        .await
        .expect("crawl failed");

    // With one worker per batch the high-priority match is dequeued
    // before the normal in-domain link discovered at the same time
    assert_eq!(
        seen.lock().unwrap().clone(),
        vec![
            format!("{}/", server.uri()),
            format!("{}/target", server.uri()),
            format!("{}/ordinary", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_excluded_links_are_never_fetched() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/photo.jpg">img</a><a href="/about">about</a>"#,
    )
    .await;
    mount_page(&server, "/about", "about page").await;

    // Any request for the excluded URL fails the test
    Mock::given(method("GET"))
        .and(path("/photo.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.exclude_link_patterns = vec![r"\.jpg$".to_string()];

    let seen = Arc::new(Mutex::new(Vec::new()));
    let stats = Crawler::new(settings)
        .default_handler(recording_handler(&seen))
        .run()
        .await
        .expect("crawl failed");

    assert_eq!(stats.pages_fetched(), 2);
    // Wiremock verifies the expect(0) when the mock server drops
}

#[tokio::test]
async fn test_stay_in_domain_skips_foreign_hosts() {
    let server = MockServer::start().await;
    let foreign = MockServer::start().await;

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="/local">local</a><a href="{}/far">far</a>"#,
            foreign.uri()
        ),
    )
    .await;
    mount_page(&server, "/local", "local page").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&foreign)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    Crawler::new(settings_for(&server))
        .default_handler(recording_handler(&seen))
        .run()
        .await
        .expect("crawl failed");

    let urls = seen.lock().unwrap().clone();
    assert_eq!(urls.len(), 2);
    assert!(urls.iter().all(|u| u.starts_with(&server.uri())));
    // Wiremock verifies the expect(0) when the foreign server drops
}

#[tokio::test]
async fn test_unscoped_crawl_follows_foreign_hosts() {
    let server = MockServer::start().await;
    let foreign = MockServer::start().await;

    mount_page(
        &server,
        "/",
        &format!(r#"<a href="{}/far">far</a>"#, foreign.uri()),
    )
    .await;
    mount_page(&foreign, "/far", "foreign page").await;

    let mut settings = settings_for(&server);
    settings.stay_in_domain = false;

    let seen = Arc::new(Mutex::new(Vec::new()));
    Crawler::new(settings)
        .default_handler(recording_handler(&seen))
        .run()
        .await
        .expect("crawl failed");

    assert!(seen
        .lock()
        .unwrap()
        .contains(&format!("{}/far", foreign.uri())));
}

#[tokio::test]
async fn test_matched_pages_route_to_named_handler() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/post/42">post</a><a href="/about">about</a>"#,
    )
    .await;
    mount_page(&server, "/post/42", "a post").await;
    mount_page(&server, "/about", "about page").await;

    let mut settings = settings_for(&server);
    settings.valid_link_patterns = vec![r"/post/(\d+)$".to_string()];
    settings.callback_patterns = vec![CallbackRule {
        pattern: "/post/".to_string(),
        handler: "posts".to_string(),
    }];

    let posts = Arc::new(Mutex::new(Vec::new()));
    let others = Arc::new(Mutex::new(Vec::new()));

    let posts_clone = posts.clone();
    Crawler::new(settings)
        .register_handler(
            "posts",
            Arc::new(move |page: &Page| {
                // The valid-pattern capture rides along with the page
                assert_eq!(page.matches, vec!["42".to_string()]);
                posts_clone.lock().unwrap().push(page.url.clone());
            }),
        )
        .default_handler(recording_handler(&others))
        .run()
        .await
        .expect("crawl failed");

    assert_eq!(
        posts.lock().unwrap().clone(),
        vec![format!("{}/post/42", server.uri())]
    );
    let other_urls = others.lock().unwrap().clone();
    assert!(other_urls.contains(&format!("{}/about", server.uri())));
    assert!(!other_urls.contains(&format!("{}/post/42", server.uri())));
}

#[tokio::test]
async fn test_unregistered_handler_id_fails_before_any_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.callback_patterns = vec![CallbackRule {
        pattern: "/post/".to_string(),
        handler: "missing".to_string(),
    }];

    let result = Crawler::new(settings).run().await;
    assert!(result.is_err());
    // Wiremock verifies the expect(0) when the mock server drops
}

#[tokio::test]
async fn test_silent_pages_fire_no_handler() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/archive/2020">a</a>"#).await;
    mount_page(&server, "/archive/2020", r#"<a href="/found">f</a>"#).await;
    mount_page(&server, "/found", "reached through a silent page").await;

    let mut settings = settings_for(&server);
    settings.silent_link_patterns = vec!["/archive/".to_string()];

    let seen = Arc::new(Mutex::new(Vec::new()));
    let stats = Crawler::new(settings)
        .default_handler(recording_handler(&seen))
        .run()
        .await
        .expect("crawl failed");

    // The silent page was fetched and its links followed, but it never
    // reached the handler
    assert_eq!(stats.pages_fetched(), 3);
    let mut urls = seen.lock().unwrap().clone();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            format!("{}/", server.uri()),
            format!("{}/found", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_append_to_links_is_sent_and_stripped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("token", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<a href="/next">next</a>"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .and(query_param("token", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("end"))
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.append_to_links = "?token=1".to_string();

    let seen = Arc::new(Mutex::new(Vec::new()));
    Crawler::new(settings)
        .default_handler(recording_handler(&seen))
        .run()
        .await
        .expect("crawl failed");

    // The suffix went out on the wire (or the mocks would not have
    // matched) but never appears in reported URLs
    let mut urls = seen.lock().unwrap().clone();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            format!("{}/", server.uri()),
            format!("{}/next", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_failed_fetch_is_not_retried_and_fires_no_handler() {
    let server = MockServer::start().await;

    // Port 1 is never listening, so this link fails at the transport
    mount_page(
        &server,
        "/",
        r#"<a href="http://127.0.0.1:1/dead">dead</a>"#,
    )
    .await;

    let mut settings = settings_for(&server);
    // Scope by bare host so the dead loopback URL stays in-domain
    settings.domain = "127.0.0.1".to_string();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let stats = Crawler::new(settings)
        .default_handler(recording_handler(&seen))
        .run()
        .await
        .expect("crawl failed");

    // The crawl terminated, so the failed URL was marked done rather
    // than re-queued
    assert_eq!(stats.fetch_failures(), 1);
    assert_eq!(stats.pages_fetched(), 1);
    assert_eq!(
        seen.lock().unwrap().clone(),
        vec![format!("{}/", server.uri())]
    );
}

#[tokio::test]
async fn test_non_2xx_pages_propagate_links_without_handler() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"<a href="/found">found</a>"#),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/found", "reached via a 404 body").await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    Crawler::new(settings_for(&server))
        .default_handler(recording_handler(&seen))
        .run()
        .await
        .expect("crawl failed");

    assert_eq!(
        seen.lock().unwrap().clone(),
        vec![format!("{}/found", server.uri())]
    );
}

#[tokio::test]
async fn test_sqlite_frontier_persists_the_crawl_record() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/page1">p</a>"#).await;
    mount_page(&server, "/page1", "leaf").await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("frontier.db");

    let seen = Arc::new(Mutex::new(Vec::new()));
    Crawler::new(settings_for(&server))
        .with_store(Box::new(SqliteStore::new(&db_path).unwrap()))
        .default_handler(recording_handler(&seen))
        .run()
        .await
        .expect("crawl failed");

    assert_eq!(seen.lock().unwrap().len(), 2);

    // Every visited URL is on disk in its terminal state
    let store = SqliteStore::new(&db_path).unwrap();
    assert_eq!(store.done_count().unwrap(), 2);
    assert_eq!(store.pending_count().unwrap(), 0);
}

#[tokio::test]
async fn test_hooks_bracket_the_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "just the seed").await;

    let order = Arc::new(Mutex::new(Vec::new()));

    let pre = order.clone();
    let post = order.clone();
    let during = order.clone();

    Crawler::new(settings_for(&server))
        .precrawl(move || pre.lock().unwrap().push("pre"))
        .postcrawl(move || post.lock().unwrap().push("post"))
        .default_handler(Arc::new(move |_: &Page| {
            during.lock().unwrap().push("page");
        }))
        .run()
        .await
        .expect("crawl failed");

    assert_eq!(order.lock().unwrap().clone(), vec!["pre", "page", "post"]);
}
