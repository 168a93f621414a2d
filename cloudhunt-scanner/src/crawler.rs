use crate::domain::{
    base_url, base_url_of, netloc, netloc_of, normalize_url, url_extension, without_query,
};
use crate::error::{Result, ScanError};
use crate::http::{CRAWL_TIMEOUT_SECS, HttpProber, ProbeResponse};
use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Index of a node inside its `CrawlTree`
pub type NodeId = usize;

/// Depth budgets above this are clamped
pub const MAX_CRAWL_DEPTH: usize = 10;

/// Never fetched: either binary or useless for URL harvesting
pub const SKIP_EXTENSIONS: &[&str] = &[
    "exe", "bin", "pdf", "zip", "jpg", "png", "svg", "avi", "mp3", "mp4", "gz", "tar", "rar",
    "7z", "ttf", "otf", "woff", "woff2",
];

/// URLs found on one page, by where they were found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedUrls {
    pub js: Vec<String>,
    pub links: Vec<String>,
    pub styles: Vec<String>,
    pub images: Vec<String>,
    pub forms: Vec<String>,
    pub cors: Vec<String>,
    /// Absolute URLs embedded in fetched scripts (active crawl)
    pub js_plus: Vec<String>,
    /// Absolute URLs embedded in fetched stylesheets (active crawl)
    pub styles_plus: Vec<String>,
    /// Absolute URLs embedded in fetched JSON/XML files (active crawl)
    pub files: Vec<String>,
}

impl ExtractedUrls {
    pub fn all(&self) -> impl Iterator<Item = &String> {
        [
            &self.js,
            &self.links,
            &self.styles,
            &self.images,
            &self.forms,
            &self.cors,
            &self.js_plus,
            &self.styles_plus,
            &self.files,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlNode {
    pub url: String,
    pub scheme: String,
    /// `host[:port]`
    pub domain: String,
    /// The URL trimmed to its directory
    pub base_url: String,
    /// Remaining depth budget
    pub depth: usize,
    /// False when the page could not be fetched or was not HTML
    pub fetched: bool,
    pub urls: ExtractedUrls,
    pub children: Vec<NodeId>,
}

impl CrawlNode {
    fn new(url: &Url, depth: usize) -> Self {
        Self {
            url: url.to_string(),
            scheme: url.scheme().to_string(),
            domain: netloc(url),
            base_url: base_url(url),
            depth,
            fetched: false,
            urls: ExtractedUrls::default(),
            children: Vec::new(),
        }
    }
}

/// Result of one crawl invocation. Nodes live in an arena; node 0 is the seed.
#[derive(Debug, Clone, Default)]
pub struct CrawlTree {
    nodes: Vec<CrawlNode>,
    visited: HashSet<String>,
}

impl CrawlTree {
    fn push(&mut self, node: CrawlNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn root(&self) -> &CrawlNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&CrawlNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[CrawlNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn was_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Node ids of `id` and all its descendants
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Every absolute http(s) URL found in the tree, normalized, deduplicated
    /// and sorted. With `scope` only URLs on the seed's host are kept.
    pub fn list_urls(&self, scope: bool, full_query: bool) -> Vec<String> {
        if self.nodes.is_empty() {
            return Vec::new();
        }
        let root_domain = &self.root().domain;

        let urls: BTreeSet<String> = self
            .subtree(0)
            .into_iter()
            .flat_map(|id| self.nodes[id].urls.all())
            .filter(|url| url.starts_with("http"))
            .filter_map(|url| {
                let parsed = Url::parse(url).ok()?;
                normalize_url(&parsed, url, full_query)
            })
            .filter(|url| !scope || netloc_of(url).as_ref() == Some(root_domain))
            .collect();

        urls.into_iter().collect()
    }

    /// URLs pointing away from the seed's host
    pub fn list_out_urls(&self, full_query: bool) -> Vec<String> {
        if self.nodes.is_empty() {
            return Vec::new();
        }
        let root_domain = &self.root().domain;
        self.list_urls(false, full_query)
            .into_iter()
            .filter(|url| netloc_of(url).as_ref() != Some(root_domain))
            .collect()
    }

    pub fn list_dirs(&self, scope: bool) -> Vec<String> {
        dirs_of(self.list_urls(scope, false))
    }

    pub fn list_out_dirs(&self) -> Vec<String> {
        dirs_of(self.list_out_urls(false))
    }

    pub fn list_domains(&self) -> Vec<String> {
        let domains: BTreeSet<String> = self
            .list_urls(false, false)
            .iter()
            .filter_map(|url| netloc_of(url))
            .collect();
        domains.into_iter().collect()
    }
}

fn dirs_of(urls: Vec<String>) -> Vec<String> {
    let dirs: BTreeSet<String> = urls.iter().filter_map(|url| base_url_of(url)).collect();
    dirs.into_iter().collect()
}

/// Same-host crawler used to harvest candidate URLs from a seed site
#[derive(Clone)]
pub struct Crawler {
    http: HttpProber,
    active_crawl: bool,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: HttpProber::with_timeout(CRAWL_TIMEOUT_SECS)?,
            active_crawl: true,
            progress_callback: None,
        })
    }

    pub fn with_active_crawl(mut self, active_crawl: bool) -> Self {
        self.active_crawl = active_crawl;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl `seed` and up to `depth` levels of same-host links below it.
    /// Every invocation starts with an empty visited set.
    pub async fn crawl(&self, seed: &str, depth: usize) -> Result<CrawlTree> {
        let seed_url =
            Url::parse(seed).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed, e)))?;
        let depth = depth.min(MAX_CRAWL_DEPTH);
        info!("Starting crawl of {} (depth {})", seed_url, depth);

        let mut tree = CrawlTree::default();
        tree.visited.insert(seed_url.to_string());
        let root = tree.push(CrawlNode::new(&seed_url, depth));

        let mut work: VecDeque<NodeId> = VecDeque::from([root]);

        while let Some(id) = work.pop_front() {
            let url = tree.nodes[id].url.clone();
            if let Some(ref callback) = self.progress_callback {
                callback(url.clone());
            }

            let page = match self.fetch_page(&url).await {
                Ok(page) => page,
                Err(e) => {
                    debug!("Skipping {}: {}", url, e);
                    continue;
                }
            };

            let Ok(page_url) = Url::parse(&url) else {
                continue;
            };
            let mut urls = extract_page(page.body_text(), &page_url);
            urls.cors = extract_cors(&page);

            if self.active_crawl {
                urls.js_plus = self.crawl_raw_urls(&urls.js, &mut tree.visited).await;
                urls.styles_plus = self.crawl_raw_urls(&urls.styles, &mut tree.visited).await;
                let files: BTreeSet<String> = urls
                    .all()
                    .filter(|u| matches!(url_extension(u).as_deref(), Some("json" | "xml")))
                    .filter_map(|u| without_query(u))
                    .collect();
                let files: Vec<String> = files.into_iter().collect();
                urls.files = self.crawl_raw_urls(&files, &mut tree.visited).await;
            }

            let node = &mut tree.nodes[id];
            node.fetched = true;
            node.urls = urls;

            if node.depth == 0 {
                continue;
            }

            let child_depth = node.depth - 1;
            let domain = node.domain.clone();
            let candidates: BTreeSet<String> = node
                .urls
                .links
                .iter()
                .chain(node.urls.forms.iter())
                .filter(|u| netloc_of(u).as_ref() == Some(&domain))
                .filter(|u| !is_skipped(u))
                .cloned()
                .collect();

            for child in candidates {
                // check-and-insert in one step so siblings never queue the same page twice
                if !tree.visited.insert(child.clone()) {
                    continue;
                }
                let Ok(child_url) = Url::parse(&child) else {
                    continue;
                };
                let child_id = tree.push(CrawlNode::new(&child_url, child_depth));
                tree.nodes[id].children.push(child_id);
                work.push_back(child_id);
            }
        }

        info!(
            "Crawl complete. {} pages, {} URLs visited",
            tree.len(),
            tree.visited_count()
        );
        Ok(tree)
    }

    async fn fetch_page(&self, url: &str) -> Result<ProbeResponse> {
        let page = self.http.get(url).await?;
        let is_html = page
            .content_type()
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false);

        if !is_html {
            return Err(ScanError::UnexpectedContentType(
                page.content_type().unwrap_or("none").to_string(),
            ));
        }
        Ok(page)
    }

    /// Fetch each resource once and pull out the absolute URLs it mentions
    async fn crawl_raw_urls(&self, urls: &[String], visited: &mut HashSet<String>) -> Vec<String> {
        let mut found = BTreeSet::new();

        for url in urls {
            if !visited.insert(url.clone()) || is_skipped(url) {
                continue;
            }
            match self.http.get(url).await {
                Ok(response) => found.extend(extract_raw_links(response.body_text())),
                Err(e) => debug!("Raw fetch of {} failed: {}", url, e),
            }
        }

        found.into_iter().collect()
    }
}

fn is_skipped(url: &str) -> bool {
    url_extension(url).is_some_and(|ext| SKIP_EXTENSIONS.contains(&ext.as_str()))
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Quoted relative file references inside inline code, e.g. `"/js/app.min.js"`
fn inline_literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""([\w?/&=#.!-]*?\.\w{2,4})"|'([\w?/&=#.!-]*?\.\w{2,4})'"#).unwrap()
    })
}

fn raw_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://(?:[a-zA-Z0-9/?=_@.&+-]|%[0-9a-fA-F]{2})+").unwrap())
}

fn inline_literals(code: &str) -> impl Iterator<Item = &str> {
    inline_literal_regex()
        .captures_iter(code)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str())
}

/// Pull every URL reference out of an HTML page
pub fn extract_page(html: &str, page_url: &Url) -> ExtractedUrls {
    let document = Html::parse_document(html);
    let resolve = |src: &str, full_query: bool| normalize_url(page_url, src, full_query);

    let mut js = BTreeSet::new();
    for script in document.select(&selector("script")) {
        match script.value().attr("src") {
            Some(src) => js.extend(resolve(src, false)),
            None => {
                let code: String = script.text().collect();
                js.extend(inline_literals(&code).filter_map(|lit| resolve(lit, false)));
            }
        }
    }

    let mut styles: BTreeSet<String> = document
        .select(&selector("link[href]"))
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| resolve(href, false))
        .collect();
    for style in document.select(&selector("style")) {
        let css: String = style.text().collect();
        styles.extend(inline_literals(&css).filter_map(|lit| resolve(lit, false)));
    }

    let attr_urls = |css: &str, attr: &str, full_query: bool| -> Vec<String> {
        let found: BTreeSet<String> = document
            .select(&selector(css))
            .filter_map(|el| el.value().attr(attr))
            .filter_map(|value| resolve(value, full_query))
            .collect();
        found.into_iter().collect()
    };

    ExtractedUrls {
        js: js.into_iter().collect(),
        links: attr_urls("a[href]", "href", true),
        styles: styles.into_iter().collect(),
        images: attr_urls("img[src]", "src", false),
        forms: attr_urls("form[action]", "action", true),
        ..ExtractedUrls::default()
    }
}

/// Allowed CORS origins; a wildcard tells us nothing, so it yields none
pub fn extract_cors(response: &ProbeResponse) -> Vec<String> {
    let Some(header) = response.header("access-control-allow-origin") else {
        return Vec::new();
    };

    let origins: Vec<String> = header
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.iter().any(|origin| origin == "*") {
        return Vec::new();
    }
    origins
}

/// Absolute URLs mentioned anywhere in a text resource
pub fn extract_raw_links(source: &str) -> Vec<String> {
    let found: BTreeSet<String> = raw_link_regex()
        .find_iter(source)
        .map(|m| m.as_str().to_string())
        .collect();
    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    async fn mount_html(server: &MockServer, route: &str, html: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(html.into_bytes()),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn test_extract_page_categories() {
        let page = Url::parse("http://acme.com/shop/index.html").unwrap();
        let html = r#"<html><head>
            <script src="/static/app.js"></script>
            <script>var cfg = { logo: "img/logo.png", api: 'data/config.json' };</script>
            <link rel="stylesheet" href="css/site.css">
            <style>body { background: url("bg/tile.gif"); }</style>
            </head><body>
            <a href="cart.html?id=4#top">Cart</a>
            <a href="mailto:sales@acme.com">Mail</a>
            <img src="https://acme-media.s3.amazonaws.com/banner.jpg?v=1">
            <form action="/login?next=/shop"></form>
            </body></html>"#;

        let urls = extract_page(html, &page);

        assert_eq!(
            urls.js,
            vec![
                "http://acme.com/shop/data/config.json".to_string(),
                "http://acme.com/shop/img/logo.png".to_string(),
                "http://acme.com/static/app.js".to_string(),
            ]
        );
        assert_eq!(
            urls.styles,
            vec![
                "http://acme.com/shop/bg/tile.gif".to_string(),
                "http://acme.com/shop/css/site.css".to_string(),
            ]
        );
        assert_eq!(urls.links, vec!["http://acme.com/shop/cart.html?id=4".to_string()]);
        assert_eq!(
            urls.images,
            vec!["https://acme-media.s3.amazonaws.com/banner.jpg".to_string()]
        );
        assert_eq!(urls.forms, vec!["http://acme.com/login?next=/shop".to_string()]);
    }

    #[test]
    fn test_extract_raw_links() {
        let js = r#"fetch("https://api.acme.com/v1/users?limit=10");
            const cdn = 'https://acme.blob.core.windows.net/assets/app.css';"#;
        let links = extract_raw_links(js);
        assert_eq!(
            links,
            vec![
                "https://acme.blob.core.windows.net/assets/app.css".to_string(),
                "https://api.acme.com/v1/users?limit=10".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_cors_wildcard_is_ignored() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wild"))
            .respond_with(ResponseTemplate::new(200).insert_header("access-control-allow-origin", "*"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/list"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("access-control-allow-origin", "https://a.acme.com, https://b.acme.com"),
            )
            .mount(&mock_server)
            .await;

        let prober = HttpProber::new().unwrap();
        let wild = prober.get(&format!("{}/wild", mock_server.uri())).await.unwrap();
        let list = prober.get(&format!("{}/list", mock_server.uri())).await.unwrap();

        assert!(extract_cors(&wild).is_empty());
        assert_eq!(
            extract_cors(&list),
            vec!["https://a.acme.com".to_string(), "https://b.acme.com".to_string()]
        );
    }

    /// Test basic link discovery
    #[tokio::test]
    async fn test_link_discovery() {
        let mock_server = MockServer::start().await;

        let root_html = format!(
            r#"<html><body>
                <a href="{}/page1">Page 1</a>
                <a href="page2">Page 2</a>
            </body></html>"#,
            mock_server.uri()
        );
        mount_html(&mock_server, "/", root_html).await;
        mount_html(&mock_server, "/page1", "<html><body>P1</body></html>".to_string()).await;
        mount_html(&mock_server, "/page2", "<html><body>P2</body></html>".to_string()).await;

        let crawler = Crawler::new().unwrap().with_active_crawl(false);
        let tree = crawler.crawl(&format!("{}/", mock_server.uri()), 1).await.unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root().children.len(), 2);
        assert!(tree.nodes().iter().all(|node| node.fetched));
    }

    #[tokio::test]
    async fn test_duplicate_links_are_listed_once() {
        let mock_server = MockServer::start().await;

        let root_html = format!(
            r#"<html><body>
                <a href="/about">About</a>
                <a href="{}/about">About again</a>
            </body></html>"#,
            mock_server.uri()
        );
        mount_html(&mock_server, "/", root_html).await;
        mount_html(&mock_server, "/about", "<html></html>".to_string()).await;

        let crawler = Crawler::new().unwrap().with_active_crawl(false);
        let tree = crawler.crawl(&format!("{}/", mock_server.uri()), 1).await.unwrap();

        let about = format!("{}/about", mock_server.uri());
        let urls = tree.list_urls(false, false);
        assert_eq!(urls.iter().filter(|u| **u == about).count(), 1);
        assert_eq!(tree.root().children.len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_scope_links_are_not_followed() {
        let mock_server = MockServer::start().await;

        let root_html = r#"<html><body>
                <a href="https://partner.example.org/deals">Partner</a>
                <a href="/local">Local</a>
            </body></html>"#
            .to_string();
        mount_html(&mock_server, "/", root_html).await;
        mount_html(&mock_server, "/local", "<html></html>".to_string()).await;

        let crawler = Crawler::new().unwrap().with_active_crawl(false);
        let tree = crawler.crawl(&format!("{}/", mock_server.uri()), 2).await.unwrap();

        let scoped = tree.list_urls(true, false);
        assert!(scoped.iter().all(|u| !u.contains("example.org")));
        assert!(scoped.contains(&format!("{}/local", mock_server.uri())));

        assert!(tree.nodes().iter().all(|n| !n.url.contains("example.org")));
        assert_eq!(
            tree.list_out_urls(false),
            vec!["https://partner.example.org/deals".to_string()]
        );
        assert_eq!(tree.list_out_dirs(), vec!["https://partner.example.org".to_string()]);
    }

    #[tokio::test]
    async fn test_depth_budget_is_respected() {
        let mock_server = MockServer::start().await;

        mount_html(&mock_server, "/", r#"<a href="/one">1</a>"#.to_string()).await;
        mount_html(&mock_server, "/one", r#"<a href="/two">2</a>"#.to_string()).await;
        mount_html(&mock_server, "/two", r#"<a href="/three">3</a>"#.to_string()).await;

        let crawler = Crawler::new().unwrap().with_active_crawl(false);

        let shallow = crawler.crawl(&format!("{}/", mock_server.uri()), 0).await.unwrap();
        assert_eq!(shallow.len(), 1);

        let deeper = crawler.crawl(&format!("{}/", mock_server.uri()), 2).await.unwrap();
        assert_eq!(deeper.len(), 3);
        assert!(deeper.list_urls(true, false).contains(&format!("{}/three", mock_server.uri())));
    }

    #[tokio::test]
    async fn test_cycles_do_not_refetch() {
        let mock_server = MockServer::start().await;

        mount_html(&mock_server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#.to_string()).await;
        mount_html(&mock_server, "/a", r#"<a href="/b">b</a><a href="/">home</a>"#.to_string()).await;
        mount_html(&mock_server, "/b", r#"<a href="/a">a</a>"#.to_string()).await;

        let crawler = Crawler::new().unwrap().with_active_crawl(false);
        let tree = crawler.crawl(&format!("{}/", mock_server.uri()), 5).await.unwrap();

        assert_eq!(tree.len(), 3);
        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
    }

    #[tokio::test]
    async fn test_non_html_page_has_no_content() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string(r#"{"a": "https://acme.com/x"}"#),
            )
            .mount(&mock_server)
            .await;

        let crawler = Crawler::new().unwrap();
        let tree = crawler.crawl(&format!("{}/data", mock_server.uri()), 1).await.unwrap();

        assert_eq!(tree.len(), 1);
        assert!(!tree.root().fetched);
        assert!(tree.list_urls(false, false).is_empty());
    }

    #[tokio::test]
    async fn test_active_crawl_harvests_script_urls() {
        let mock_server = MockServer::start().await;

        mount_html(
            &mock_server,
            "/",
            r#"<html><head><script src="/app.js"></script></head></html>"#.to_string(),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/app.js"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/javascript")
                    .set_body_string(r#"const bucket = "https://acme-assets.s3.amazonaws.com/img/";"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let crawler = Crawler::new().unwrap();
        let tree = crawler.crawl(&format!("{}/", mock_server.uri()), 1).await.unwrap();

        assert_eq!(
            tree.root().urls.js_plus,
            vec!["https://acme-assets.s3.amazonaws.com/img/".to_string()]
        );
        assert!(
            tree.list_out_dirs()
                .contains(&"https://acme-assets.s3.amazonaws.com/img".to_string())
        );
        assert!(tree.was_visited(&format!("{}/app.js", mock_server.uri())));
    }

    #[tokio::test]
    async fn test_active_crawl_fetches_data_files_with_query() {
        let mock_server = MockServer::start().await;

        mount_html(&mock_server, "/", r#"<a href="/data.json?v=1">data</a>"#.to_string()).await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string(r#"{"cdn": "https://acme-x.s3.amazonaws.com/a/b"}"#),
            )
            .mount(&mock_server)
            .await;

        let crawler = Crawler::new().unwrap();
        let tree = crawler.crawl(&format!("{}/", mock_server.uri()), 0).await.unwrap();

        assert_eq!(
            tree.root().urls.files,
            vec!["https://acme-x.s3.amazonaws.com/a/b".to_string()]
        );
        assert!(tree.was_visited(&format!("{}/data.json", mock_server.uri())));
        assert!(
            tree.list_out_dirs()
                .contains(&"https://acme-x.s3.amazonaws.com/a".to_string())
        );
    }

    #[tokio::test]
    async fn test_each_crawl_starts_fresh() {
        let mock_server = MockServer::start().await;
        mount_html(&mock_server, "/", r#"<a href="/a">a</a>"#.to_string()).await;
        mount_html(&mock_server, "/a", "<html></html>".to_string()).await;

        let crawler = Crawler::new().unwrap().with_active_crawl(false);
        let first = crawler.crawl(&format!("{}/", mock_server.uri()), 1).await.unwrap();
        let second = crawler.crawl(&format!("{}/", mock_server.uri()), 1).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_seed_is_an_error() {
        let crawler = Crawler::new().unwrap();
        assert!(matches!(
            crawler.crawl("not a url", 1).await,
            Err(ScanError::InvalidUrl(_))
        ));
    }
}
