use serde::{Deserialize, Serialize};
use std::fmt;

/// Cloud provider a candidate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cloud {
    Generic,
    Aws,
    Azure,
    Google,
}

impl Cloud {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cloud::Generic => "generic",
            Cloud::Aws => "aws",
            Cloud::Azure => "azure",
            Cloud::Google => "google",
        }
    }

    /// Service label used for buckets found by fingerprinting
    pub fn display_label(&self) -> &'static str {
        match self {
            Cloud::Generic => "Generic",
            Cloud::Aws => "Aws Cloud",
            Cloud::Azure => "Azure Cloud",
            Cloud::Google => "Google Cloud",
        }
    }

    /// Service catalog probed during brute force
    pub fn services(&self) -> &'static [Service] {
        match self {
            Cloud::Generic => &[],
            Cloud::Aws => AWS_SERVICES,
            Cloud::Azure => AZURE_SERVICES,
            Cloud::Google => GOOGLE_SERVICES,
        }
    }

    /// Response headers that only this provider emits
    pub fn signature_headers(&self) -> &'static [&'static str] {
        match self {
            Cloud::Generic => &[],
            Cloud::Aws => &["x-amz-request-id", "x-amz-id-2"],
            Cloud::Azure => &["x-ms-request-id"],
            Cloud::Google => &[
                "x-guploader-uploadid",
                "x-goog-metageneration",
                "x-cloud-trace-context",
            ],
        }
    }
}

impl fmt::Display for Cloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named provider service and the domain its tenants live under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub label: &'static str,
    pub domain: &'static str,
}

const fn service(label: &'static str, domain: &'static str) -> Service {
    Service { label, domain }
}

pub const GOOGLE_SERVICES: &[Service] = &[
    service("Google Storage", "storage.googleapis.com"),
    service("Google App Engine", "appspot.com"),
];

pub const AWS_SERVICES: &[Service] = &[service("AWS Bucket", "s3.amazonaws.com")];

pub const AZURE_SERVICES: &[Service] = &[
    service("Storage Files", "file.core.windows.net"),
    service("Storage Blobs", "blob.core.windows.net"),
    service("Storage Queues", "queue.core.windows.net"),
    service("Storage Tables", "table.core.windows.net"),
    service("App Management", "scm.azurewebsites.net"),
    service("App Azure", "azurewebsites.net"),
    service("App Web", "p.azurewebsites.net"),
    service("CloudApp", "cloudapp.net"),
    service("Key Vaults", "vault.azure.net"),
    service("Azure CDN", "azureedge.net"),
    service("Search Appliance", "search.windows.net"),
    service("API Services", "azure-api.net"),
    service("Hosted Domain", "onmicrosoft.com"),
    service("Databases-Redis", "redis.cache.windows.net"),
    service("Databases-CosmosDB", "documents.azure.com"),
    service("Databases-MSSQL", "database.windows.net"),
    service("Email", "mail.protection.outlook.com"),
    service("SharePoint", "sharepoint.com"),
];

/// Registrable labels that belong to the providers themselves rather than a tenant
pub const GENERIC_CLOUD_DOMAINS: &[&str] = &[
    "amazonaws",
    "amazon",
    "google",
    "googleapis",
    "appspot",
    "azure",
    "azureedge",
    "windows",
];

pub const AZURE_FILE_DOMAIN: &str = "file.core.windows.net";
pub const AZURE_BLOB_DOMAIN: &str = "blob.core.windows.net";

/// Container names tried against every blob endpoint
pub const COMMON_CONTAINERS: &[&str] = &[
    "images",
    "mycontainer",
    "downloads",
    "backup",
    "backups",
    "web",
    "website",
    "private",
    "uploads",
    "page",
    "static",
    "logs",
    "admin",
];

/// Permissions asked of the storage IAM testPermissions endpoint
pub const GOOGLE_TEST_PERMISSIONS: &[&str] = &[
    "storage.buckets.delete",
    "storage.buckets.get",
    "storage.buckets.getIamPolicy",
    "storage.buckets.setIamPolicy",
    "storage.buckets.update",
    "storage.objects.create",
    "storage.objects.delete",
    "storage.objects.get",
    "storage.objects.list",
    "storage.objects.update",
];
