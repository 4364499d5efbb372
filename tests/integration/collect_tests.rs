//! Integration tests for the collector
//!
//! These tests use wiremock to create mock HTTP servers and drive complete
//! collection runs end-to-end.

use email_harvest::collector::{ResultCollector, RunOutcome};
use email_harvest::config::{CollectorConfig, Config, OutputConfig, SearchConfig, UserAgentConfig};
use email_harvest::output::{write_report, CsvSink};
use email_harvest::search::{FixedSearch, SearchQuery};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no request spacing
fn create_test_config(max_pages_per_domain: u32) -> Config {
    Config {
        collector: CollectorConfig {
            result_count: 10,
            min_delay: 0.0,
            max_delay: 0.0,
            max_pages_per_domain,
            fetch_timeout: 5.0,
            dedup_across_urls: false,
            respect_robots: false,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: Some("https://example.com/contact".to_string()),
            contact_email: Some("test@example.com".to_string()),
        },
        search: SearchConfig::default(),
        output: OutputConfig::default(),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Same server reached through a second host name, so it counts as another domain
fn localhost_uri(server: &MockServer) -> String {
    server.uri().replace("127.0.0.1", "localhost")
}

fn query() -> SearchQuery {
    SearchQuery::new("test query").unwrap()
}

fn collector(config: &Config, urls: Vec<String>) -> ResultCollector {
    ResultCollector::new(config, Box::new(FixedSearch::new(urls))).unwrap()
}

#[tokio::test]
async fn test_collects_normalized_emails_from_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/contact",
        "<p>Contact: John@Example.com or jane@example.com</p>",
    )
    .await;

    let url = format!("{}/contact", server.uri());
    let report = collector(&create_test_config(3), vec![url.clone()])
        .collect(&query())
        .await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    let pairs: Vec<(&str, &str)> = report
        .result
        .iter()
        .map(|r| (r.url.as_str(), r.email.as_str()))
        .collect();
    assert_eq!(pairs.len(), 2);
    assert!(pairs.contains(&(url.as_str(), "john@example.com")));
    assert!(pairs.contains(&(url.as_str(), "jane@example.com")));
    assert_eq!(report.stats.pages_fetched, 1);
}

#[tokio::test]
async fn test_page_budget_skips_without_fetching() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1"))
        .respond_with(html("<p>a@x.com</p>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2"))
        .respond_with(html("<p>b@x.com</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let urls = vec![
        format!("{}/1", server.uri()),
        format!("{}/2", server.uri()),
    ];
    let report = collector(&create_test_config(1), urls)
        .collect(&query())
        .await;

    assert_eq!(report.result.len(), 1);
    assert_eq!(report.result.records()[0].email, "a@x.com");
    assert_eq!(report.stats.skipped_budget, 1);
    assert_eq!(report.stats.pages_fetched, 1);
    // wiremock verifies the .expect() counts on drop
}

#[tokio::test]
async fn test_failed_fetch_does_not_stop_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>info@ok.example</p>").await;

    let urls = vec![
        format!("{}/missing", server.uri()),
        format!("{}/ok", server.uri()),
    ];
    let report = collector(&create_test_config(3), urls)
        .collect(&query())
        .await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.stats.http_errors, 1);
    assert_eq!(report.stats.pages_fetched, 1);
    assert_eq!(report.result.len(), 1);
    assert_eq!(report.result.records()[0].email, "info@ok.example");
}

#[tokio::test]
async fn test_failed_fetch_charges_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html("<p>info@ok.example</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let urls = vec![
        format!("{}/broken", server.uri()),
        format!("{}/ok", server.uri()),
    ];
    let report = collector(&create_test_config(1), urls)
        .collect(&query())
        .await;

    assert_eq!(report.stats.http_errors, 1);
    assert_eq!(report.stats.skipped_budget, 1);
    assert!(report.result.is_empty());
}

#[tokio::test]
async fn test_failing_domain_is_not_requested_past_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let urls: Vec<String> = (1..=5)
        .map(|i| format!("{}/page{}", server.uri(), i))
        .collect();
    let report = collector(&create_test_config(2), urls)
        .collect(&query())
        .await;

    assert_eq!(report.stats.http_errors, 2);
    assert_eq!(report.stats.skipped_budget, 3);
    assert_eq!(report.stats.pages_fetched, 0);
}

#[tokio::test]
async fn test_zero_email_page_charges_budget() {
    let server = MockServer::start().await;
    mount_page(&server, "/empty", "<p>nothing here</p>").await;
    mount_page(&server, "/full", "<p>a@x.com</p>").await;

    let urls = vec![
        format!("{}/empty", server.uri()),
        format!("{}/full", server.uri()),
    ];
    let report = collector(&create_test_config(1), urls)
        .collect(&query())
        .await;

    assert!(report.result.is_empty());
    assert_eq!(report.stats.skipped_budget, 1);
}

#[tokio::test]
async fn test_duplicate_pairs_and_cross_url_dedup() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "<p>x@y.com X@Y.COM</p>").await;
    mount_page(&server, "/b", "<p>x@y.com</p>").await;

    let urls = vec![format!("{}/a", server.uri()), format!("{}/b", server.uri())];

    let report = collector(&create_test_config(5), urls.clone())
        .collect(&query())
        .await;
    assert_eq!(report.result.len(), 2);
    assert_eq!(report.result.unique_emails().len(), 1);

    let mut config = create_test_config(5);
    config.collector.dedup_across_urls = true;
    let report = collector(&config, urls).collect(&query()).await;
    assert_eq!(report.result.len(), 1);
    assert_eq!(report.result.records()[0].url, format!("{}/a", server.uri()));
}

#[tokio::test]
async fn test_budget_is_per_domain() {
    let server = MockServer::start().await;
    mount_page(&server, "/p", "<p>a@x.com</p>").await;

    let urls = vec![
        format!("{}/p", server.uri()),
        format!("{}/p", localhost_uri(&server)),
    ];
    let report = collector(&create_test_config(1), urls)
        .collect(&query())
        .await;

    assert_eq!(report.stats.pages_fetched, 2);
    assert_eq!(report.stats.skipped_budget, 0);
    assert_eq!(report.result.len(), 2);
}

#[tokio::test]
async fn test_same_domain_requests_are_spaced() {
    let server = MockServer::start().await;
    mount_page(&server, "/1", "<p>a@x.com</p>").await;
    mount_page(&server, "/2", "<p>b@x.com</p>").await;

    let mut config = create_test_config(5);
    config.collector.min_delay = 0.3;
    config.collector.max_delay = 0.3;

    let urls = vec![format!("{}/1", server.uri()), format!("{}/2", server.uri())];
    let started = Instant::now();
    let report = collector(&config, urls).collect(&query()).await;

    assert_eq!(report.result.len(), 2);
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_first_request_to_domain_does_not_wait() {
    let server = MockServer::start().await;
    mount_page(&server, "/p", "<p>a@x.com</p>").await;

    let mut config = create_test_config(5);
    config.collector.min_delay = 5.0;
    config.collector.max_delay = 5.0;

    let urls = vec![
        format!("{}/p", server.uri()),
        format!("{}/p", localhost_uri(&server)),
    ];
    let started = Instant::now();
    let report = collector(&config, urls).collect(&query()).await;

    assert_eq!(report.stats.pages_fetched, 2);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_runs_on_same_collector_are_isolated() {
    let server = MockServer::start().await;
    mount_page(&server, "/p", "<p>a@x.com</p>").await;

    let collector = collector(&create_test_config(1), vec![format!("{}/p", server.uri())]);

    let first = collector.collect(&query()).await;
    let second = collector.collect(&query()).await;

    // A fresh budget and result set each time
    assert_eq!(first.result.len(), 1);
    assert_eq!(second.result.len(), 1);
    assert_eq!(second.stats.skipped_budget, 0);
}

#[tokio::test]
async fn test_cancelled_run_returns_partial_result() {
    let server = MockServer::start().await;
    mount_page(&server, "/1", "<p>a@x.com</p>").await;
    mount_page(&server, "/2", "<p>b@x.com</p>").await;

    let mut config = create_test_config(5);
    config.collector.min_delay = 30.0;
    config.collector.max_delay = 30.0;

    let urls = vec![format!("{}/1", server.uri()), format!("{}/2", server.uri())];
    let collector = collector(&config, urls);
    let token = collector.cancellation_token();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        token.cancel();
    });

    let started = Instant::now();
    let report = collector.collect(&query()).await;

    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert_eq!(report.result.len(), 1);
    assert_eq!(report.result.records()[0].email, "a@x.com");
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_rate_limited_response_backs_off_domain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    mount_page(&server, "/later", "<p>a@x.com</p>").await;

    let mut config = create_test_config(5);
    config.collector.min_delay = 0.0;
    config.collector.max_delay = 0.0;

    let urls = vec![
        format!("{}/busy", server.uri()),
        format!("{}/later", server.uri()),
    ];
    let collector = collector(&config, urls);
    let token = collector.cancellation_token();

    // The 1s minimum penalty delays the second request; cancel while it waits
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        token.cancel();
    });

    let report = collector.collect(&query()).await;

    assert_eq!(report.stats.rate_limited, 1);
    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert!(report.result.is_empty());
}

#[tokio::test]
async fn test_robots_disallow_skips_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("User-agent: *\nDisallow: /private", "text/plain"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(html("<p>secret@x.com</p>"))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/public", "<p>hello@x.com</p>").await;

    let mut config = create_test_config(5);
    config.collector.respect_robots = true;

    let urls = vec![
        format!("{}/private", server.uri()),
        format!("{}/public", server.uri()),
    ];
    let report = collector(&config, urls).collect(&query()).await;

    assert_eq!(report.stats.skipped_robots, 1);
    assert_eq!(report.result.len(), 1);
    assert_eq!(report.result.records()[0].email, "hello@x.com");
}

#[tokio::test]
async fn test_robots_fetch_is_spaced_from_page_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("User-agent: *\nAllow: /", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/team", "<p>team@x.com</p>").await;

    let mut config = create_test_config(5);
    config.collector.respect_robots = true;
    config.collector.min_delay = 0.3;
    config.collector.max_delay = 0.3;

    let started = Instant::now();
    let report = collector(&config, vec![format!("{}/team", server.uri())])
        .collect(&query())
        .await;

    assert_eq!(report.result.len(), 1);
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_duckduckgo_search_feeds_collector() {
    let search_server = MockServer::start().await;
    let site = MockServer::start().await;
    mount_page(&site, "/team", "<a href=\"mailto:Team@Site.example\">Email us</a>").await;

    let target = format!("{}/team", site.uri());
    let results = format!(
        r#"<html><body>
        <div class="result"><a class="result__a" href="/l/?uddg={}">Team</a></div>
        </body></html>"#,
        url::form_urlencoded::byte_serialize(target.as_bytes()).collect::<String>()
    );
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "test query"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(results, "text/html"))
        .mount(&search_server)
        .await;

    let mut config = create_test_config(3);
    config.search.endpoint = format!("{}/html/", search_server.uri());

    let report = ResultCollector::with_duckduckgo(&config)
        .unwrap()
        .collect(&query())
        .await;

    assert_eq!(report.result.len(), 1);
    assert_eq!(report.result.records()[0].url, target);
    assert_eq!(report.result.records()[0].email, "team@site.example");
}

#[tokio::test]
async fn test_search_failure_yields_empty_result() {
    let search_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&search_server)
        .await;

    let mut config = create_test_config(3);
    config.search.endpoint = format!("{}/html/", search_server.uri());

    let report = email_harvest::collector::collect(&config, "test query")
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert!(report.result.is_empty());
    assert_eq!(report.stats.urls_seen, 0);
}

#[tokio::test]
async fn test_report_written_as_csv() {
    let server = MockServer::start().await;
    mount_page(&server, "/c", "<p>b@x.com, a@x.com</p>").await;

    let url = format!("{}/c", server.uri());
    let report = collector(&create_test_config(3), vec![url.clone()])
        .collect(&query())
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("emails.csv");
    let mut sink = CsvSink::new(&csv_path);
    assert!(write_report(&report, &mut sink).unwrap());

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "URL,Email");
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&format!("{},a@x.com", url).as_str()));
    assert!(lines.contains(&format!("{},b@x.com", url).as_str()));
}

#[tokio::test]
async fn test_empty_run_writes_no_file() {
    let server = MockServer::start().await;
    mount_page(&server, "/none", "<p>no addresses</p>").await;

    let report = collector(&create_test_config(3), vec![format!("{}/none", server.uri())])
        .collect(&query())
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("emails.csv");
    let mut sink = CsvSink::new(&csv_path);

    assert!(!write_report(&report, &mut sink).unwrap());
    assert!(!csv_path.exists());
}
