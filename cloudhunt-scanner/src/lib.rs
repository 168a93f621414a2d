pub mod acl;
pub mod bucket;
pub mod crawler;
pub mod dns;
pub mod domain;
pub mod error;
pub mod fingerprint;
pub mod http;
pub mod pool;
pub mod probe;
pub mod providers;

pub use acl::{AclEnumerator, ProviderEndpoints};
pub use bucket::{Bucket, Risk, State};
pub use crawler::{CrawlTree, Crawler};
pub use dns::{DnsChecker, NameCheck};
pub use error::ScanError;
pub use http::HttpProber;
pub use pool::WorkerPool;
pub use probe::{BucketProber, ProbeTask};
pub use providers::Cloud;
