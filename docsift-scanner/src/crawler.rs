use crate::error::{Result, ScanError};
use crate::filter::is_valid_subpage;
use crate::progress::{NoopReporter, ProgressReporter};
use crate::result::{CrawlTarget, PageRecord};
use crate::text::normalize_text;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_MAX_PAGES: usize = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Tunables for one crawler instance.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Ceiling on successfully fetched pages.
    pub max_pages: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause after every fetch attempt, successful or not.
    pub delay: Duration,
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            timeout: DEFAULT_TIMEOUT,
            delay: DEFAULT_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Breadth-first, same-domain crawler with a page ceiling.
///
/// Pages are fetched one at a time. The visited set and the queue live only
/// for the duration of a single [`Crawler::crawl`] call.
pub struct Crawler {
    client: Client,
    config: CrawlerConfig,
    reporter: Arc<dyn ProgressReporter>,
}

impl Crawler {
    pub fn new() -> Result<Self> {
        Self::with_config(CrawlerConfig::default())
    }

    pub fn with_config(config: CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            config,
            reporter: Arc::new(NoopReporter),
        })
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawl from `seed` and return the normalized text of every page fetched.
    ///
    /// Individual page failures are reported as warnings and skipped; only an
    /// unusable seed URL is an error.
    pub async fn crawl(&self, seed: &str) -> Result<Vec<PageRecord>> {
        let seed_url = Url::parse(seed)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed, e)))?;
        let domain = seed_url
            .host_str()
            .ok_or_else(|| ScanError::InvalidUrl(format!("{}: missing host", seed)))?
            .to_string();
        let seed = seed_url.to_string();
        let max_pages = self.config.max_pages;

        info!("Starting crawl of {} (max {} pages)", seed, max_pages);

        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<CrawlTarget> = VecDeque::new();
        queue.push_back(CrawlTarget::new(seed.clone(), domain));
        let mut pages = Vec::new();

        while visited.len() < max_pages {
            let Some(target) = queue.pop_front() else {
                break;
            };

            if visited.contains(&target.url) {
                debug!("Skipping already visited {}", target.url);
                continue;
            }

            debug!(domain = %target.domain, "Dequeued {}", target.url);
            self.reporter.on_status(&format!("Crawling: {}", target.url));

            match self.fetch_and_parse(&target.url).await {
                Ok((record, links)) => {
                    visited.insert(target.url.clone());
                    pages.push(record);

                    for link in links {
                        if is_valid_subpage(&link, &seed) && !visited.contains(&link) {
                            debug!("  -> Queuing {}", link);
                            queue.push_back(CrawlTarget::new(link, target.domain.clone()));
                        } else {
                            debug!("  -> Skipping {}", link);
                        }
                    }

                    self.reporter
                        .on_progress(visited.len() as f64 / max_pages as f64);
                }
                Err(e) => {
                    warn!("Crawl error for {}: {}", target.url, e);
                    let message = match &e {
                        ScanError::Status { url, status } => {
                            format!("Failed to access {} (Status {})", url, status)
                        }
                        other => format!("Error crawling {}: {}", target.url, other),
                    };
                    self.reporter.on_warning(&message);
                }
            }

            if !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        info!("Crawl complete. Visited {} pages", pages.len());
        Ok(pages)
    }

    async fn fetch_and_parse(&self, url: &str) -> Result<(PageRecord, Vec<String>)> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let links = extract_links(&body, url)?;
        let record = PageRecord::new(url.to_string(), normalize_text(&body));

        Ok((record, links))
    }
}

/// Every `a[href]` target in `html`, resolved against `current_url`, in
/// document order.
fn extract_links(html: &str, current_url: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let link_selector =
        Selector::parse("a[href]").map_err(|e| ScanError::ParseError(e.to_string()))?;

    let links = document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(current_url, href))
        .collect();

    Ok(links)
}

fn resolve_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();

    // Skip empty, javascript:, mailto:, tel:, etc.
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
    {
        return None;
    }

    let base_url = Url::parse(base).ok()?;
    let mut resolved = base_url.join(href).ok()?;
    resolved.set_fragment(None);

    Some(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[derive(Default)]
    struct RecordingReporter {
        progress: Mutex<Vec<f64>>,
        statuses: Mutex<Vec<String>>,
        warnings: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn on_progress(&self, fraction: f64) {
            self.progress.lock().unwrap().push(fraction);
        }

        fn on_status(&self, message: &str) {
            self.statuses.lock().unwrap().push(message.to_string());
        }

        fn on_warning(&self, message: &str) {
            self.warnings.lock().unwrap().push(message.to_string());
        }

        fn on_error(&self, _message: &str) {}
    }

    fn test_crawler(max_pages: usize) -> Crawler {
        let config = CrawlerConfig::default()
            .with_max_pages(max_pages)
            .with_delay(Duration::ZERO);
        Crawler::with_config(config).unwrap()
    }

    async fn mount_page(server: &MockServer, page_path: &str, html: String) {
        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(html),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn test_resolve_url_relative_and_absolute() {
        let base = "https://example.test/docs/intro";
        assert_eq!(
            resolve_url(base, "setup"),
            Some("https://example.test/docs/setup".to_string())
        );
        assert_eq!(
            resolve_url(base, "/api"),
            Some("https://example.test/api".to_string())
        );
        assert_eq!(
            resolve_url(base, "https://other.test/x"),
            Some("https://other.test/x".to_string())
        );
    }

    #[test]
    fn test_resolve_url_strips_fragment_and_skips_pseudo_links() {
        let base = "https://example.test/docs";
        assert_eq!(
            resolve_url(base, "/guide#install"),
            Some("https://example.test/guide".to_string())
        );
        assert_eq!(resolve_url(base, "#top"), None);
        assert_eq!(resolve_url(base, ""), None);
        assert_eq!(resolve_url(base, "javascript:void(0)"), None);
        assert_eq!(resolve_url(base, "mailto:docs@example.test"), None);
        assert_eq!(resolve_url(base, "tel:+100"), None);
    }

    #[test]
    fn test_extract_links_in_document_order() {
        let html = r#"<body>
            <a href="/b">B</a>
            <a>no href</a>
            <a href="c.html">C</a>
        </body>"#;
        let links = extract_links(html, "https://example.test/docs/").unwrap();
        assert_eq!(
            links,
            vec![
                "https://example.test/b".to_string(),
                "https://example.test/docs/c.html".to_string(),
            ]
        );
    }

    #[test]
    fn test_default_config() {
        let crawler = Crawler::new().unwrap();
        let config = crawler.config();
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.delay, Duration::from_secs(1));
        assert_eq!(config.user_agent, "Mozilla/5.0");
    }

    /// Seed with two same-domain links and one pdf: three pages, pdf untouched.
    #[tokio::test]
    async fn test_link_discovery_skips_denied_extensions() {
        let server = MockServer::start().await;
        let uri = server.uri();

        mount_page(
            &server,
            "/docs",
            format!(
                r#"<html><body>
                    <p>Welcome to the docs</p>
                    <a href="{uri}/docs/a">A</a>
                    <a href="/docs/b">B</a>
                    <a href="/docs/manual.pdf">Manual</a>
                </body></html>"#
            ),
        )
        .await;
        mount_page(&server, "/docs/a", "<html><body>Page A</body></html>".into()).await;
        mount_page(&server, "/docs/b", "<html><body>Page B</body></html>".into()).await;

        Mock::given(method("GET"))
            .and(path("/docs/manual.pdf"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let crawler = test_crawler(5);
        let pages = crawler.crawl(&format!("{}/docs", uri)).await.unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].url, format!("{}/docs", uri));
        assert_eq!(pages[0].text, "Welcome to the docs A B Manual");
        assert_eq!(pages[1].url, format!("{}/docs/a", uri));
        assert_eq!(pages[1].text, "Page A");
        assert_eq!(pages[2].url, format!("{}/docs/b", uri));
    }

    /// Ten pages that all link to each other: the ceiling stops the crawl at five.
    #[tokio::test]
    async fn test_fully_connected_graph_stops_at_ceiling() {
        let server = MockServer::start().await;
        let uri = server.uri();

        let mut links = String::new();
        for i in 0..10 {
            links.push_str(&format!(r#"<a href="{}/node{}">Node {}</a>"#, uri, i, i));
        }

        for i in 0..10 {
            Mock::given(method("GET"))
                .and(path(format!("/node{}", i)))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(format!("<html><body>{}</body></html>", links)),
                )
                .expect(0..=1)
                .mount(&server)
                .await;
        }

        let crawler = test_crawler(5);
        let pages = crawler.crawl(&format!("{}/node0", uri)).await.unwrap();

        assert_eq!(pages.len(), 5);
        let unique: HashSet<&str> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(unique.len(), 5);
    }

    #[tokio::test]
    async fn test_cycles_and_self_loops_visit_each_page_once() {
        let server = MockServer::start().await;
        let uri = server.uri();

        mount_page(
            &server,
            "/a",
            format!(
                r#"<a href="{uri}/a">self</a><a href="{uri}/b">b</a><a href="{uri}/a#x">self again</a>"#
            ),
        )
        .await;
        mount_page(
            &server,
            "/b",
            format!(r#"<a href="{uri}/a">a</a><a href="{uri}/b">self</a>"#),
        )
        .await;

        let crawler = test_crawler(5);
        let pages = crawler.crawl(&format!("{}/a", uri)).await.unwrap();

        let urls: Vec<&str> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec![format!("{}/a", uri), format!("{}/b", uri)]);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seed_without_trailing_slash_is_not_fetched_twice() {
        let server = MockServer::start().await;
        let uri = server.uri();

        mount_page(
            &server,
            "/",
            format!(r#"<a href="{uri}/">home</a><a href="/">root</a>"#),
        )
        .await;

        let crawler = test_crawler(5);
        let pages = crawler.crawl(&uri).await.unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].url, format!("{}/", uri));
    }

    #[tokio::test]
    async fn test_failed_pages_are_warned_and_skipped() {
        let server = MockServer::start().await;
        let uri = server.uri();

        mount_page(
            &server,
            "/",
            format!(r#"<a href="{uri}/missing">gone</a><a href="{uri}/ok">ok</a>"#),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_page(&server, "/ok", "<p>Fine</p>".into()).await;

        let reporter = Arc::new(RecordingReporter::default());
        let crawler = test_crawler(5).with_reporter(reporter.clone());
        let pages = crawler.crawl(&uri).await.unwrap();

        let urls: Vec<&str> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec![format!("{}/", uri), format!("{}/ok", uri)]);

        let warnings = reporter.warnings.lock().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("/missing"));
        assert!(warnings[0].contains("Status 404"));
    }

    #[tokio::test]
    async fn test_delay_follows_every_attempt_including_failures() {
        let server = MockServer::start().await;
        let uri = server.uri();

        mount_page(&server, "/", format!(r#"<a href="{uri}/missing">gone</a>"#)).await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let delay = Duration::from_millis(300);
        let reporter = Arc::new(RecordingReporter::default());
        let crawler = Crawler::with_config(
            CrawlerConfig::default()
                .with_max_pages(5)
                .with_delay(delay),
        )
        .unwrap()
        .with_reporter(reporter.clone());

        let started = std::time::Instant::now();
        let pages = crawler.crawl(&uri).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(pages.len(), 1);
        assert_eq!(reporter.warnings.lock().unwrap().len(), 1);
        // One pause after the seed, one after the 404.
        assert!(elapsed >= delay * 2, "elapsed {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_timeout_is_a_recoverable_warning() {
        let server = MockServer::start().await;
        let uri = server.uri();

        mount_page(&server, "/", format!(r#"<a href="{uri}/slow">slow</a>"#)).await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<p>Too late</p>")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = CrawlerConfig::default()
            .with_delay(Duration::ZERO)
            .with_timeout(Duration::from_millis(300));
        let reporter = Arc::new(RecordingReporter::default());
        let crawler = Crawler::with_config(config)
            .unwrap()
            .with_reporter(reporter.clone());

        let pages = crawler.crawl(&uri).await.unwrap();

        assert_eq!(pages.len(), 1);
        let warnings = reporter.warnings.lock().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Error crawling"));
    }

    #[tokio::test]
    async fn test_unreachable_seed_returns_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let reporter = Arc::new(RecordingReporter::default());
        let crawler = test_crawler(5).with_reporter(reporter.clone());
        let pages = crawler.crawl(&server.uri()).await.unwrap();

        assert!(pages.is_empty());
        assert_eq!(reporter.warnings.lock().unwrap().len(), 1);
        assert!(reporter.progress.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_seed_is_an_error() {
        let crawler = test_crawler(5);
        let result = crawler.crawl("not a url").await;
        assert!(matches!(result, Err(ScanError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_progress_and_status_are_reported() {
        let server = MockServer::start().await;
        let uri = server.uri();

        mount_page(
            &server,
            "/",
            format!(r#"<a href="{uri}/one">1</a><a href="{uri}/two">2</a>"#),
        )
        .await;
        mount_page(&server, "/one", "<p>One</p>".into()).await;
        mount_page(&server, "/two", "<p>Two</p>".into()).await;

        let reporter = Arc::new(RecordingReporter::default());
        let crawler = test_crawler(4).with_reporter(reporter.clone());
        crawler.crawl(&uri).await.unwrap();

        assert_eq!(*reporter.progress.lock().unwrap(), vec![0.25, 0.5, 0.75]);
        let statuses = reporter.statuses.lock().unwrap();
        assert_eq!(
            *statuses,
            vec![
                format!("Crawling: {}/", uri),
                format!("Crawling: {}/one", uri),
                format!("Crawling: {}/two", uri),
            ]
        );
    }

    #[tokio::test]
    async fn test_browser_user_agent_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "Mozilla/5.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Hi</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let crawler = test_crawler(5);
        let pages = crawler.crawl(&server.uri()).await.unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_ceiling_fetches_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let crawler = test_crawler(0);
        let pages = crawler.crawl(&server.uri()).await.unwrap();
        assert!(pages.is_empty());
    }
}
