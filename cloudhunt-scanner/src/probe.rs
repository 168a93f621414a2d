use crate::acl::{AclEnumerator, ProviderEndpoints};
use crate::bucket::{Bucket, HttpOutcome, classify};
use crate::dns::NameCheck;
use crate::http::HttpProber;
use crate::providers::{Cloud, Service};
use std::sync::Arc;
use tracing::debug;

/// One brute-force candidate: `{name}.{service domain}` under a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTask {
    pub cloud: Cloud,
    pub service_label: String,
    pub host: String,
    pub name: String,
}

impl ProbeTask {
    pub fn new(cloud: Cloud, service: &Service, name: &str) -> Self {
        Self {
            cloud,
            service_label: service.label.to_string(),
            host: format!("{}.{}", name, service.domain),
            name: name.to_string(),
        }
    }
}

/// Build the task queue for one provider: every service crossed with every name
pub fn build_tasks(cloud: Cloud, names: &[String]) -> Vec<ProbeTask> {
    cloud
        .services()
        .iter()
        .flat_map(|service| names.iter().map(move |name| ProbeTask::new(cloud, service, name)))
        .collect()
}

/// A classified candidate together with how far probing got
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub bucket: Bucket,
    pub resolved: bool,
    pub answered: bool,
}

impl ProbeOutcome {
    /// Unresolvable hosts are never reported; silent hosts only for Azure,
    /// whose services often refuse plain HTTP.
    pub fn is_reportable(&self) -> bool {
        self.resolved && (self.answered || self.bucket.cloud == Cloud::Azure)
    }
}

/// Runs the per-candidate pipeline: DNS check, HTTP probe, classification and
/// provider ACL enumeration.
pub struct BucketProber {
    http: HttpProber,
    dns: Arc<dyn NameCheck>,
    acl: AclEnumerator,
    seed_name: String,
}

impl BucketProber {
    pub fn new(http: HttpProber, dns: Arc<dyn NameCheck>, seed_name: &str) -> Self {
        Self {
            acl: AclEnumerator::new(http.clone(), seed_name),
            http,
            dns,
            seed_name: seed_name.to_string(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.acl = self.acl.with_endpoints(endpoints);
        self
    }

    pub fn seed_name(&self) -> &str {
        &self.seed_name
    }

    pub(crate) fn http(&self) -> &HttpProber {
        &self.http
    }

    pub(crate) fn is_seed(&self, name: &str) -> bool {
        name == self.seed_name
    }

    /// Classify `bucket` from an optional response and run the ACL checks.
    /// Nothing is enumerated for a non-Azure bucket that never answered.
    pub async fn assess(&self, bucket: &mut Bucket, outcome: Option<&HttpOutcome>) {
        bucket.apply(classify(self.is_seed(&bucket.name), outcome));
        if outcome.is_some() || bucket.cloud == Cloud::Azure {
            self.acl.enumerate(bucket).await;
        }
    }

    pub async fn inspect(&self, task: &ProbeTask) -> ProbeOutcome {
        debug!("checking {}", task.host);
        let mut bucket = Bucket::new(&task.name, &task.host, task.cloud, &task.service_label);

        if !self.dns.exists(&task.host).await {
            bucket.apply(classify(self.is_seed(&task.name), None));
            return ProbeOutcome {
                bucket,
                resolved: false,
                answered: false,
            };
        }

        let outcome = self
            .http
            .check_host(&task.host)
            .await
            .as_ref()
            .map(HttpOutcome::from);
        self.assess(&mut bucket, outcome.as_ref()).await;

        ProbeOutcome {
            bucket,
            resolved: true,
            answered: outcome.is_some(),
        }
    }

    /// The reportable bucket for `task`, if any
    pub async fn probe(&self, task: ProbeTask) -> Option<Bucket> {
        let outcome = self.inspect(&task).await;
        outcome.is_reportable().then_some(outcome.bucket)
    }
}
