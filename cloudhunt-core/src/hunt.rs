use crate::permutation::generate_permutations;
use crate::report::should_display;
use cloudhunt_scanner::bucket::Bucket;
use cloudhunt_scanner::crawler::Crawler;
use cloudhunt_scanner::dns::DnsChecker;
use cloudhunt_scanner::domain::registrable_label;
use cloudhunt_scanner::http::HttpProber;
use cloudhunt_scanner::pool::WorkerPool;
use cloudhunt_scanner::probe::{BucketProber, build_tasks};
use cloudhunt_scanner::providers::Cloud;
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Providers in brute-force order
pub const BRUTEFORCE_ORDER: [Cloud; 3] = [Cloud::Google, Cloud::Aws, Cloud::Azure];

/// Options for configuring a hunt
#[derive(Debug, Clone)]
pub struct HuntOptions {
    /// Company name, base name or URL
    pub input: String,
    pub threads: usize,
    pub crawl_depth: usize,
    pub active_crawl: bool,
    pub open_only: bool,
    pub verbose: bool,
    pub base_only: bool,
    pub disable_bruteforce: bool,
    pub affixes: Vec<String>,
    pub resolvers: Vec<SocketAddr>,
    pub show_progress_bars: bool,
}

impl HuntOptions {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            threads: 10,
            crawl_depth: 1,
            active_crawl: true,
            open_only: false,
            verbose: false,
            base_only: false,
            disable_bruteforce: false,
            affixes: Vec::new(),
            resolvers: Vec::new(),
            show_progress_bars: false,
        }
    }
}

/// Callback for status messages
pub type HuntProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Callback for buckets as soon as they are classified
pub type HuntResultCallback = Arc<dyn Fn(&Bucket) + Send + Sync>;

/// What the user asked us to hunt for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuntTarget {
    pub base_name: String,
    /// Seed URL to crawl, when the input was a URL
    pub url: Option<String>,
}

impl HuntTarget {
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err("Input must not be empty".to_string());
        }

        if !input.starts_with("http") {
            return Ok(Self {
                base_name: input,
                url: None,
            });
        }

        let url = Url::parse(&input).map_err(|e| format!("Invalid URL {}: {}", input, e))?;
        let host = url
            .host_str()
            .ok_or_else(|| format!("URL {} has no host", input))?;

        Ok(Self {
            base_name: registrable_label(host),
            url: Some(input),
        })
    }
}

#[derive(Debug, Clone)]
pub struct HuntReport {
    pub base_name: String,
    /// Candidate URLs fingerprinted after the crawl
    pub endpoints: usize,
    /// Hostnames tried by brute force
    pub attempts: usize,
    pub buckets: Vec<Bucket>,
}

/// Names to brute force for `base_name`
pub fn candidate_names(base_name: &str, options: &HuntOptions) -> Vec<String> {
    if options.base_only {
        vec![base_name.to_string()]
    } else {
        generate_permutations(base_name, &options.affixes)
    }
}

/// Every name is tried against every service of every provider
pub fn attempt_count(names: usize) -> usize {
    let services: usize = BRUTEFORCE_ORDER.iter().map(|c| c.services().len()).sum();
    names * services
}

fn section_title(cloud: Cloud) -> &'static str {
    match cloud {
        Cloud::Google => "Google Cloud",
        Cloud::Aws => "Amazon Cloud",
        Cloud::Azure => "Azure Cloud",
        Cloud::Generic => "Generic",
    }
}

fn start_spinner(show: bool, message: String) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Some(pb)
}

fn advance(spinner: &Option<ProgressBar>, processed: &AtomicUsize, total: usize, what: &str) {
    let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
    if let Some(pb) = spinner {
        pb.set_message(format!("{} {}/{}", what, done, total));
    }
}

/// One hunt: optional crawl and fingerprinting, then brute force per provider
pub struct Hunt {
    options: HuntOptions,
    target: HuntTarget,
    prober: Arc<BucketProber>,
    crawler: Crawler,
    progress_callback: Option<HuntProgressCallback>,
    result_callback: Option<HuntResultCallback>,
}

impl Hunt {
    /// Validate the options and build the probing stack. Configuration problems
    /// surface here, before anything touches the network.
    pub fn new(options: HuntOptions) -> Result<Self, String> {
        let target = HuntTarget::parse(&options.input)?;
        let dns = DnsChecker::new(options.resolvers.clone()).map_err(|e| e.to_string())?;
        let http = HttpProber::new().map_err(|e| format!("Failed to create HTTP client: {}", e))?;
        let crawler = Crawler::new()
            .map_err(|e| format!("Failed to create crawler: {}", e))?
            .with_active_crawl(options.active_crawl);
        let prober = BucketProber::new(http, Arc::new(dns), &target.base_name);

        Ok(Self {
            options,
            target,
            prober: Arc::new(prober),
            crawler,
            progress_callback: None,
            result_callback: None,
        })
    }

    /// Replace the probing pipeline, e.g. with one using a different name check
    pub fn with_prober(mut self, prober: BucketProber) -> Self {
        self.prober = Arc::new(prober);
        self
    }

    pub fn with_progress_callback(mut self, callback: HuntProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_result_callback(mut self, callback: HuntResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    pub fn target(&self) -> &HuntTarget {
        &self.target
    }

    fn notify(&self, message: String) {
        if let Some(ref callback) = self.progress_callback {
            callback(message);
        }
    }

    pub async fn run(self) -> Result<HuntReport, String> {
        let mut report = HuntReport {
            base_name: self.target.base_name.clone(),
            endpoints: 0,
            attempts: 0,
            buckets: Vec::new(),
        };

        if let Some(ref url) = self.target.url {
            let urls = self.discover_endpoints(url).await;
            report.endpoints = urls.len();
            self.notify(format!("[>] {} possible endpoints found", urls.len()));
            report.buckets.extend(self.fingerprint_sweep(urls).await?);
        }

        if self.options.disable_bruteforce {
            return Ok(report);
        }

        let names = candidate_names(&self.target.base_name, &self.options);
        report.attempts = attempt_count(names.len());
        self.notify(format!("[>] Bruteforce {} name permutations.", names.len()));
        self.notify(format!("[>] {} tries, be patient.", report.attempts));

        for cloud in BRUTEFORCE_ORDER {
            self.notify(format!("\n[+] Check {}", section_title(cloud)));
            report.buckets.extend(self.bruteforce_sweep(cloud, &names).await?);
        }

        info!("Hunt for {} finished with {} buckets", report.base_name, report.buckets.len());
        Ok(report)
    }

    /// The seed URL plus every off-site directory the crawl turned up
    async fn discover_endpoints(&self, url: &str) -> Vec<String> {
        self.notify(format!("[>] Crawling {} ...", url));

        let spinner = start_spinner(self.options.show_progress_bars, "Crawling...".to_string());
        let pages = Arc::new(AtomicUsize::new(0));
        let crawler = {
            let pages = pages.clone();
            let pb = spinner.clone();
            self.crawler
                .clone()
                .with_progress_callback(Arc::new(move |page: String| {
                    let count = pages.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(ref pb) = pb {
                        pb.set_message(format!("Crawling {} ({} pages)", page, count));
                    }
                }))
        };

        let mut urls = vec![url.to_string()];
        match crawler.crawl(url, self.options.crawl_depth).await {
            Ok(tree) => urls.extend(tree.list_out_dirs()),
            Err(e) => warn!("Crawl of {} failed: {}", url, e),
        }

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        self.notify(format!("[>] {} pages crawled", pages.load(Ordering::Relaxed)));
        urls
    }

    fn worker_pool(&self, spinner: &Option<ProgressBar>) -> WorkerPool<Bucket> {
        let pool = WorkerPool::new(self.options.threads);
        let Some(ref callback) = self.result_callback else {
            return pool;
        };

        let callback = callback.clone();
        let open_only = self.options.open_only;
        let spinner = spinner.clone();
        pool.with_result_callback(Arc::new(move |bucket: &Bucket| {
            if !should_display(bucket, open_only) {
                return;
            }
            match &spinner {
                Some(pb) => pb.suspend(|| callback(bucket)),
                None => callback(bucket),
            }
        }))
    }

    async fn fingerprint_sweep(&self, urls: Vec<String>) -> Result<Vec<Bucket>, String> {
        let total = urls.len();
        let spinner = start_spinner(self.options.show_progress_bars, "Fingerprinting...".to_string());
        let pool = self.worker_pool(&spinner);

        let prober = self.prober.clone();
        let processed = Arc::new(AtomicUsize::new(0));
        let pb = spinner.clone();

        let buckets = pool
            .run(urls, move |url: String| {
                let prober = prober.clone();
                let processed = processed.clone();
                let pb = pb.clone();
                async move {
                    let bucket = prober.fingerprint(&url).await;
                    advance(&pb, &processed, total, "Fingerprinting");
                    bucket
                }
            })
            .await
            .map_err(|e| e.to_string())?;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        Ok(buckets)
    }

    async fn bruteforce_sweep(&self, cloud: Cloud, names: &[String]) -> Result<Vec<Bucket>, String> {
        let tasks = build_tasks(cloud, names);
        let total = tasks.len();
        let spinner = start_spinner(
            self.options.show_progress_bars,
            format!("Checking {} candidates...", total),
        );
        let pool = self.worker_pool(&spinner);

        let prober = self.prober.clone();
        let processed = Arc::new(AtomicUsize::new(0));
        let pb = spinner.clone();

        let buckets = pool
            .run(tasks, move |task| {
                let prober = prober.clone();
                let processed = processed.clone();
                let pb = pb.clone();
                async move {
                    let bucket = prober.probe(task).await;
                    advance(&pb, &processed, total, "Checking");
                    bucket
                }
            })
            .await
            .map_err(|e| e.to_string())?;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        Ok(buckets)
    }
}

/// Run a hunt with the given options
pub async fn execute_hunt(
    options: HuntOptions,
    progress_callback: Option<HuntProgressCallback>,
    result_callback: Option<HuntResultCallback>,
) -> Result<HuntReport, String> {
    let mut hunt = Hunt::new(options)?;
    if let Some(callback) = progress_callback {
        hunt = hunt.with_progress_callback(callback);
    }
    if let Some(callback) = result_callback {
        hunt = hunt.with_result_callback(callback);
    }
    hunt.run().await
}
