// JSON report and console rendering of hunt results

use cloudhunt_scanner::bucket::{Bucket, Risk, State};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One entry of the JSON report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRecord {
    pub cloud: String,
    pub name: String,
    pub domain: String,
    pub state: String,
    pub risk: String,
    pub details: Vec<String>,
}

impl From<&Bucket> for BucketRecord {
    fn from(bucket: &Bucket) -> Self {
        Self {
            cloud: bucket.cloud.as_str().to_string(),
            name: bucket.name.clone(),
            domain: bucket.domain.clone(),
            state: bucket.state.as_str().to_string(),
            risk: bucket.risk.as_str().to_string(),
            details: bucket.details.clone(),
        }
    }
}

pub fn default_report_path(base_name: &str) -> PathBuf {
    PathBuf::from(format!("{}-output.json", base_name))
}

pub fn render_json(buckets: &[Bucket]) -> Result<String, String> {
    let records: Vec<BucketRecord> = buckets.iter().map(BucketRecord::from).collect();
    serde_json::to_string_pretty(&records).map_err(|e| format!("Failed to serialize report: {}", e))
}

pub fn write_json_report(path: &Path, buckets: &[Bucket]) -> Result<(), String> {
    let json = render_json(buckets)?;
    let mut file = File::create(path)
        .map_err(|e| format!("Failed to create report {}: {}", path.display(), e))?;
    file.write_all(json.as_bytes())
        .map_err(|e| format!("Failed to write report {}: {}", path.display(), e))?;
    Ok(())
}

/// With `open_only` set, only open buckets are echoed
pub fn should_display(bucket: &Bucket, open_only: bool) -> bool {
    !open_only || bucket.state == State::Open
}

/// Column-aligned result line without colours
pub fn bucket_line(bucket: &Bucket) -> String {
    format!(
        "    {:<22}{:<42}\t{:<10}{}",
        bucket.service_label,
        bucket.domain,
        bucket.state.as_str(),
        bucket.details.join(" | ")
    )
}

/// Result line coloured by risk
pub fn format_bucket_line(bucket: &Bucket) -> String {
    let line = bucket_line(bucket);
    match bucket.risk {
        Risk::Low => line,
        Risk::Medium => line.blue().to_string(),
        Risk::High => line.red().to_string(),
    }
}

/// Raw ACL data as pretty JSON, for verbose output
pub fn format_acl(bucket: &Bucket) -> Option<String> {
    bucket
        .acl
        .as_ref()
        .and_then(|acl| serde_json::to_string_pretty(acl).ok())
}

pub fn summary_line(buckets: &[Bucket]) -> String {
    let open = buckets.iter().filter(|b| b.is_open()).count();
    let high = buckets.iter().filter(|b| b.risk == Risk::High).count();
    format!(
        "{} buckets found, {} open, {} high risk",
        buckets.len(),
        open,
        high
    )
}
