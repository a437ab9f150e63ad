//! Session failure reports

/// Where a session failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDomain {
    /// Failure of the tracking session itself
    Tracking,
    /// Anything else surfaced through the session callback
    Other,
}

/// Failure reported by the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    /// Origin of the failure
    pub domain: ErrorDomain,
    /// Localized description
    pub description: String,
    /// Why it failed, if known
    pub failure_reason: Option<String>,
    /// What the user can do, if known
    pub recovery_suggestion: Option<String>,
}

impl SessionError {
    /// Tracking failure with only a description
    pub fn tracking(description: impl Into<String>) -> Self {
        Self {
            domain: ErrorDomain::Tracking,
            description: description.into(),
            failure_reason: None,
            recovery_suggestion: None,
        }
    }

    /// Description, reason and suggestion (those present), one per line
    pub fn message(&self) -> String {
        std::iter::once(self.description.as_str())
            .chain(self.failure_reason.as_deref())
            .chain(self.recovery_suggestion.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
