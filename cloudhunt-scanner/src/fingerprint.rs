// Decide which cloud an arbitrary URL is hosted on

use crate::bucket::{Bucket, HttpOutcome};
use crate::domain::registrable_label;
use crate::http::ProbeResponse;
use crate::probe::BucketProber;
use crate::providers::{Cloud, GENERIC_CLOUD_DOMAINS};
use tracing::debug;
use url::Url;

/// Providers in the order they are tried
const FINGERPRINT_ORDER: [Cloud; 3] = [Cloud::Aws, Cloud::Google, Cloud::Azure];

/// Match a response and its host against the provider signatures. Google's
/// own properties under `.google.com` are never attributed to a tenant.
pub fn detect_cloud(url: &Url, response: &ProbeResponse) -> Option<Cloud> {
    let fqdn = url.host_str().unwrap_or_default().to_lowercase();

    let cloud = FINGERPRINT_ORDER.into_iter().find(|cloud| {
        cloud.signature_headers().iter().any(|h| response.has_header(h))
            || cloud.services().iter().any(|s| fqdn.contains(s.domain))
    })?;

    if cloud == Cloud::Google && fqdn.ends_with(".google.com") {
        return None;
    }

    Some(cloud)
}

/// Name to report for a fingerprinted URL
pub fn derive_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    let domain_name = registrable_label(&host);
    let first_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|segment| !segment.is_empty());

    if labels.len() > 3 {
        labels[0].to_string()
    } else if let Some(segment) = first_segment
        && GENERIC_CLOUD_DOMAINS.contains(&domain_name.as_str())
    {
        segment.to_string()
    } else {
        domain_name
    }
}

impl BucketProber {
    /// HEAD `url` and, if it is served by a known cloud, classify it as a bucket
    pub async fn fingerprint(&self, url: &str) -> Option<Bucket> {
        debug!("checking {}", url);

        let parsed = Url::parse(url).ok()?;
        let response = match self.http().head(url).await {
            Ok(response) => response,
            Err(e) => {
                debug!("No answer from {}: {}", url, e);
                return None;
            }
        };

        let cloud = detect_cloud(&parsed, &response)?;
        let name = derive_name(&parsed);
        let mut bucket = Bucket::new(&name, url, cloud, cloud.display_label());

        let outcome = HttpOutcome::from(&response);
        self.assess(&mut bucket, Some(&outcome)).await;

        Some(bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

    fn response_with(headers: &[(&'static str, &'static str)]) -> ProbeResponse {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }
        ProbeResponse {
            status: 200,
            headers: map,
            final_url: String::new(),
            history: Vec::new(),
            body: None,
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_detect_aws_by_header() {
        let response = response_with(&[("x-amz-request-id", "ABC123")]);
        assert_eq!(detect_cloud(&url("https://cdn.acme.com/"), &response), Some(Cloud::Aws));
    }

    #[test]
    fn test_detect_by_domain() {
        let plain = response_with(&[]);
        assert_eq!(
            detect_cloud(&url("https://acme.s3.amazonaws.com/"), &plain),
            Some(Cloud::Aws)
        );
        assert_eq!(
            detect_cloud(&url("https://storage.googleapis.com/acme/logo.png"), &plain),
            Some(Cloud::Google)
        );
        assert_eq!(
            detect_cloud(&url("https://acme.blob.core.windows.net/assets"), &plain),
            Some(Cloud::Azure)
        );
        assert_eq!(detect_cloud(&url("https://acme.com/"), &plain), None);
    }

    #[test]
    fn test_aws_wins_over_azure() {
        let response = response_with(&[("x-ms-request-id", "1"), ("x-amz-id-2", "2")]);
        assert_eq!(detect_cloud(&url("https://acme.com/"), &response), Some(Cloud::Aws));
    }

    #[test]
    fn test_google_properties_are_excluded() {
        let response = response_with(&[("x-cloud-trace-context", "abc")]);
        assert_eq!(detect_cloud(&url("https://mail.google.com/"), &response), None);
        assert_eq!(
            detect_cloud(&url("https://acme.com/"), &response),
            Some(Cloud::Google)
        );
    }

    #[test]
    fn test_derive_name_many_labels() {
        assert_eq!(derive_name(&url("https://acme-assets.s3.amazonaws.com/x")), "acme-assets");
    }

    #[test]
    fn test_derive_name_without_path() {
        assert_eq!(derive_name(&url("https://cdn.acme.com")), "acme");
        assert_eq!(derive_name(&url("https://cdn.acme.com/")), "acme");
    }

    #[test]
    fn test_derive_name_generic_domain_uses_path() {
        assert_eq!(
            derive_name(&url("https://storage.googleapis.com/acme-media/img.png")),
            "acme-media"
        );
        assert_eq!(derive_name(&url("https://s3.amazonaws.com/acme-logs/")), "acme-logs");
    }

    #[test]
    fn test_derive_name_tenant_domain_with_path() {
        assert_eq!(derive_name(&url("https://files.acme.com/static/app.js")), "acme");
    }
}
