//! Decoded response types

use serde::Deserialize;

/// Classification of one API response
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A non-empty page of items
    Page(Page),
    /// A valid response with zero results
    Empty,
    /// The subject is permanently unreachable
    Unreachable(Condition),
    /// The call should be retried
    TransientFault {
        /// Why the response was rejected
        reason: String,
    },
}

impl Decoded {
    /// Create a transient fault
    pub fn fault(reason: impl Into<String>) -> Self {
        Self::TransientFault {
            reason: reason.into(),
        }
    }
}

/// One non-empty page of a subject's timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Newest item id on this page
    pub newest_id: String,
    /// Oldest item id on this page
    pub oldest_id: String,
    /// Continuation token for older results
    pub next_token: Option<String>,
    /// Number of items on this page
    pub result_count: u64,
    /// Errors reported next to usable data
    pub advisories: Vec<ApiProblem>,
    /// Raw response payload
    pub body: String,
}

impl Page {
    /// Whether more older results exist for the current request
    pub fn has_continuation(&self) -> bool {
        self.next_token.is_some()
    }
}

/// Permanent per-subject condition reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// The account does not exist (any more)
    NotFound,
    /// The account is suspended
    Forbidden,
    /// The account is protected
    Unauthorized,
}

impl Condition {
    /// Quarantine category used in directory names
    pub fn category(self) -> &'static str {
        match self {
            Self::NotFound => "deleted",
            Self::Forbidden => "suspended",
            Self::Unauthorized => "protected",
        }
    }

    /// All conditions, in quarantine lookup order
    pub fn all() -> [Condition; 3] {
        [Self::NotFound, Self::Forbidden, Self::Unauthorized]
    }

    /// Classify a problem reported by the API
    pub fn classify(problem: &ApiProblem) -> Option<Self> {
        let kind = problem.kind.rsplit('/').next().unwrap_or_default();
        match (problem.title.as_str(), kind) {
            ("Not Found Error", _) | (_, "resource-not-found") => Some(Self::NotFound),
            ("Forbidden", _) | (_, "user-suspended") => Some(Self::Forbidden),
            ("Authorization Error", _) | (_, "not-authorized-for-resource") => {
                Some(Self::Unauthorized)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.category())
    }
}

/// An entry of the `errors` array of a response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiProblem {
    /// Short problem title
    #[serde(default)]
    pub title: String,
    /// Human-readable detail
    #[serde(default)]
    pub detail: String,
    /// Problem type URI
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Id of the resource the problem refers to
    #[serde(default)]
    pub resource_id: Option<String>,
}
