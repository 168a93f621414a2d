// Permission enumeration for buckets that were found to exist

use crate::bucket::{Bucket, Risk, State};
use crate::error::{Result, ScanError};
use crate::http::{HttpProber, LISTING_TIMEOUT_SECS};
use crate::providers::{
    AZURE_BLOB_DOMAIN, AZURE_FILE_DOMAIN, COMMON_CONTAINERS, Cloud, GOOGLE_TEST_PERMISSIONS,
};
use futures::future::join_all;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Provider API locations. `{bucket}` and `{domain}` are substituted per request.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub aws_acl: String,
    pub google_iam: String,
    pub azure_base: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            aws_acl: "https://{bucket}.s3.amazonaws.com/?acl".to_string(),
            google_iam: "https://www.googleapis.com/storage/v1/b/{bucket}/iam/testPermissions"
                .to_string(),
            azure_base: "https://{domain}".to_string(),
        }
    }
}

/// What a provider check learned; applied to the bucket only when the whole check succeeded
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AclFindings {
    pub state: Option<State>,
    pub risk: Option<Risk>,
    pub details: Vec<String>,
    pub raw: Option<serde_json::Value>,
}

impl AclFindings {
    fn exposed(mut self) -> Self {
        self.state = Some(State::Open);
        self.risk = Some(Risk::High);
        self
    }

    pub fn apply_to(self, bucket: &mut Bucket) {
        if let Some(state) = self.state {
            bucket.state = state;
        }
        if let Some(risk) = self.risk {
            bucket.risk = risk;
        }
        bucket.details.extend(self.details);
        if self.raw.is_some() {
            bucket.acl = self.raw;
        }
    }
}

/// One grant out of an S3 access control policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclGrant {
    pub grantee: String,
    pub permission: String,
}

#[derive(Debug, Deserialize)]
struct TestPermissionsResponse {
    #[serde(default)]
    permissions: Vec<String>,
}

pub struct AclEnumerator {
    http: HttpProber,
    endpoints: ProviderEndpoints,
    seed_name: String,
}

impl AclEnumerator {
    pub fn new(http: HttpProber, seed_name: &str) -> Self {
        Self {
            http,
            endpoints: ProviderEndpoints::default(),
            seed_name: seed_name.to_string(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Run the provider-specific checks for `bucket`. Azure is always checked;
    /// AWS and Google only once the bucket is open. Failures leave the bucket untouched.
    pub async fn enumerate(&self, bucket: &mut Bucket) {
        let findings = match bucket.cloud {
            Cloud::Azure => self.azure(bucket).await,
            Cloud::Google if bucket.is_open() => self.google(bucket).await,
            Cloud::Aws if bucket.is_open() => self.aws(bucket).await,
            _ => return,
        };

        match findings {
            Ok(findings) => findings.apply_to(bucket),
            Err(e) => debug!("ACL enumeration for {} skipped: {}", bucket.domain, e),
        }
    }

    async fn azure(&self, bucket: &Bucket) -> Result<AclFindings> {
        let host = host_of(&bucket.domain);
        let base = self.endpoints.azure_base.replace("{domain}", &host);
        let timeout = Duration::from_secs(LISTING_TIMEOUT_SECS);
        let mut findings = AclFindings::default();

        if host.contains(AZURE_FILE_DOMAIN) {
            let url = format!("{}/?comp=list", base);
            match self.http.get_with_timeout(&url, timeout).await {
                Ok(response) if response.status == 200 => {
                    findings = findings.exposed();
                    findings.details.push("List Shares".to_string());
                }
                Ok(_) => {}
                Err(e) => debug!("Share listing on {} failed: {}", host, e),
            }
        }

        if host.contains(AZURE_BLOB_DOMAIN) {
            let containers = self.candidate_containers(&bucket.name);
            let checks = containers.iter().map(|container| {
                let url = format!("{}/{}?restype=container&comp=list", base, container);
                async move {
                    match self.http.get_with_timeout(&url, timeout).await {
                        Ok(response) => response.status == 200,
                        Err(e) => {
                            debug!("Container listing {} failed: {}", url, e);
                            false
                        }
                    }
                }
            });

            let listable: Vec<&str> = containers
                .iter()
                .zip(join_all(checks).await)
                .filter(|(_, ok)| *ok)
                .map(|(container, _)| container.as_str())
                .collect();

            if !listable.is_empty() {
                findings = findings.exposed();
                findings
                    .details
                    .push(format!("Containers: {}", listable.join(",")));
            }
        }

        Ok(findings)
    }

    fn candidate_containers(&self, name: &str) -> Vec<String> {
        let mut containers: Vec<String> = COMMON_CONTAINERS.iter().map(|c| c.to_string()).collect();
        containers.push(name.to_string());
        if name != self.seed_name {
            containers.push(self.seed_name.clone());
        }
        containers
    }

    async fn google(&self, bucket: &Bucket) -> Result<AclFindings> {
        let query: Vec<String> = GOOGLE_TEST_PERMISSIONS
            .iter()
            .map(|p| format!("permissions={}", p))
            .collect();
        let url = format!(
            "{}?{}",
            self.endpoints.google_iam.replace("{bucket}", &bucket.name),
            query.join("&")
        );

        let response = self.http.get(&url).await?;
        let parsed: TestPermissionsResponse = serde_json::from_str(response.body_text())
            .map_err(|e| ScanError::MalformedResponse(format!("testPermissions: {}", e)))?;

        let mut findings = AclFindings::default();
        if parsed.permissions.is_empty() {
            return Ok(findings);
        }

        let (symbols, escalate) = google_symbols(&parsed.permissions);
        if escalate {
            findings.risk = Some(Risk::High);
        }
        findings.details.push(format!("AllUsers [{}]", symbols));
        findings.raw = Some(serde_json::json!(parsed.permissions));

        Ok(findings)
    }

    async fn aws(&self, bucket: &Bucket) -> Result<AclFindings> {
        let url = self.endpoints.aws_acl.replace("{bucket}", &bucket.name);
        let response = self.http.get(&url).await?;
        let grants = parse_aws_acl(response.body_text())?;

        let mut findings = AclFindings::default();
        if grants.is_empty() {
            return Ok(findings);
        }

        let (details, escalate) = summarize_grants(&grants);
        if escalate {
            findings.risk = Some(Risk::High);
        }
        findings.details = details;
        findings.raw = serde_json::to_value(&grants).ok();

        Ok(findings)
    }
}

/// Host part of a bucket domain, which is either a bare host or a full URL
fn host_of(domain: &str) -> String {
    Url::parse(domain)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| domain.to_string())
}

/// Encode granted storage permissions as `L`, `R`, `W`, `V`. The flag is set
/// when a write or IAM permission was granted.
pub fn google_symbols(permissions: &[String]) -> (String, bool) {
    let has = |p: &str| permissions.iter().any(|granted| granted == p);
    let mut symbols = String::new();
    let mut escalate = false;

    if has("storage.objects.list") {
        symbols.push('L');
    }
    if has("storage.objects.get") {
        symbols.push('R');
    }
    if has("storage.objects.create") || has("storage.objects.delete") || has("storage.objects.update")
    {
        escalate = true;
        symbols.push('W');
    }
    if has("storage.buckets.setIamPolicy") {
        escalate = true;
        symbols.push('V');
    }

    (symbols, escalate)
}

fn grant_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<Grant>(.*?)</Grant>").unwrap())
}

fn grantee_type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"xsi:type\s*=\s*"([^"]+)""#).unwrap())
}

/// Decode the five predefined XML entities. `&amp;` goes last so `&amp;lt;`
/// stays `&lt;`.
fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn tag_value(block: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = block.find(&open)? + open.len();
    let end = block[start..].find(&close)? + start;
    Some(unescape_xml(block[start..end].trim()))
}

/// Parse the grants of an S3 `AccessControlPolicy` document
pub fn parse_aws_acl(xml: &str) -> Result<Vec<AclGrant>> {
    if !xml.contains("<AccessControlPolicy") {
        return Err(ScanError::MalformedResponse(
            "not an AccessControlPolicy document".to_string(),
        ));
    }

    let mut grants = Vec::new();
    for captures in grant_regex().captures_iter(xml) {
        let block = &captures[1];
        let grantee_type = grantee_type_regex()
            .captures(block)
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        let grantee = match (grantee_type.as_str(), tag_value(block, "DisplayName")) {
            ("CanonicalUser", Some(name)) if !name.is_empty() => name,
            ("Group", _) => tag_value(block, "URI")
                .and_then(|uri| uri.rsplit('/').next().map(String::from))
                .unwrap_or_else(|| "unknown".to_string()),
            _ => tag_value(block, "ID")
                .map(|id| id.chars().take(8).collect())
                .unwrap_or_else(|| "unknown".to_string()),
        };

        let Some(permission) = tag_value(block, "Permission") else {
            continue;
        };

        grants.push(AclGrant { grantee, permission });
    }

    Ok(grants)
}

/// One `"{grantee} [{symbols}]"` line per grantee, in first-seen order. The
/// flag is set when a write or full-control grant was present.
pub fn summarize_grants(grants: &[AclGrant]) -> (Vec<String>, bool) {
    let mut rights: Vec<(String, String)> = Vec::new();
    let mut escalate = false;

    for grant in grants {
        let symbol = match grant.permission.as_str() {
            "READ" | "READ_ACP" => 'R',
            "WRITE" | "WRITE_ACP" | "WRITE_ACL" => {
                escalate = true;
                'W'
            }
            "FULL_CONTROL" => {
                escalate = true;
                'F'
            }
            other => {
                debug!("Ignoring unknown S3 permission {}", other);
                continue;
            }
        };

        match rights.iter_mut().find(|(user, _)| *user == grant.grantee) {
            Some((_, symbols)) => {
                if !symbols.contains(symbol) {
                    symbols.push(symbol);
                }
            }
            None => rights.push((grant.grantee.clone(), symbol.to_string())),
        }
    }

    let details = rights
        .into_iter()
        .map(|(user, symbols)| format!("{} [{}]", user, symbols))
        .collect();

    (details, escalate)
}
