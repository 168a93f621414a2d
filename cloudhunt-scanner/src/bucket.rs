use crate::http::ProbeResponse;
use crate::providers::Cloud;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    Close,
    Domain,
    Private,
    Open,
    Unknown,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Close => "CLOSE",
            State::Domain => "DOMAIN",
            State::Private => "PRIVATE",
            State::Open => "OPEN",
            State::Unknown => "UNKNOWN",
        }
    }
}

/// Severity of a finding; ordering only matters for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl Risk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Risk::Low => "LOW",
            Risk::Medium => "MEDIUM",
            Risk::High => "HIGH",
        }
    }
}

/// A probed candidate and everything learned about it
#[derive(Debug, Clone, Serialize)]
pub struct Bucket {
    pub name: String,
    pub domain: String,
    pub cloud: Cloud,
    pub service_label: String,
    pub state: State,
    pub risk: Risk,
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acl: Option<serde_json::Value>,
}

impl Bucket {
    pub fn new(name: &str, domain: &str, cloud: Cloud, service_label: &str) -> Self {
        Self {
            name: name.to_string(),
            domain: domain.to_string(),
            cloud,
            service_label: service_label.to_string(),
            state: State::Close,
            risk: Risk::Low,
            details: Vec::new(),
            acl: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    /// Record the classifier's verdict
    pub fn apply(&mut self, classification: Classification) {
        self.state = classification.state;
        self.risk = classification.risk;
        self.details.extend(classification.details);
    }
}

/// The parts of an HTTP response the classifier looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOutcome {
    pub status: u16,
    pub content_type: Option<String>,
    pub final_url: String,
    pub history: Vec<u16>,
}

impl From<&ProbeResponse> for HttpOutcome {
    fn from(response: &ProbeResponse) -> Self {
        Self {
            status: response.status,
            content_type: response.content_type().map(String::from),
            final_url: response.final_url.clone(),
            history: response.history.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub state: State,
    pub risk: Risk,
    pub details: Vec<String>,
}

/// Map an HTTP outcome to an accessibility state and risk.
///
/// `is_seed_name` is set when the candidate name equals the seed base name;
/// such candidates start at `Medium`. A missing outcome means the host
/// resolved but never answered.
pub fn classify(is_seed_name: bool, outcome: Option<&HttpOutcome>) -> Classification {
    let Some(outcome) = outcome else {
        return Classification {
            state: State::Domain,
            risk: Risk::Low,
            details: Vec::new(),
        };
    };

    let mut risk = if is_seed_name { Risk::Medium } else { Risk::Low };
    let mut details = Vec::new();

    let mut state = match outcome.status {
        200 => {
            risk = Risk::Medium;
            if outcome
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.contains("application/xml"))
            {
                risk = Risk::High;
                details.push("LIST".to_string());
            }
            State::Open
        }
        400 | 401 | 403 => State::Private,
        500 | 502 | 503 => {
            risk = Risk::Medium;
            details.push("WebApp Error".to_string());
            State::Open
        }
        status => {
            risk = Risk::Medium;
            details.push(format!("Response: {}", status));
            State::Unknown
        }
    };

    if matches!(outcome.history.first(), Some(301 | 302)) {
        details.push(format!("Redirect {}", outcome.final_url));
        if outcome.final_url.contains("login") || outcome.final_url.contains("signin") {
            state = State::Private;
            risk = Risk::Low;
        }
    }

    Classification {
        state,
        risk,
        details,
    }
}
