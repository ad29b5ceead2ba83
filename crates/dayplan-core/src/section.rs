//! Per-section resolution result.

/// Outcome of resolving one section of the daily plan.
///
/// Resolution never fails: a section either has a summary, a message
/// explaining why not, or both (a summary that carries a caveat, such as a
/// rest day or an empty protocol).
#[derive(Debug, Clone, PartialEq)]
pub struct Section<T> {
    pub summary: Option<T>,
    pub message: Option<String>,
}

impl<T> Section<T> {
    /// A summary with nothing to report.
    pub fn resolved(summary: T) -> Self {
        Self {
            summary: Some(summary),
            message: None,
        }
    }

    /// A summary accompanied by an explanatory message.
    pub fn noted(summary: T, message: impl Into<String>) -> Self {
        Self {
            summary: Some(summary),
            message: Some(message.into()),
        }
    }

    /// No summary, only the reason.
    pub fn absent(message: impl Into<String>) -> Self {
        Self {
            summary: None,
            message: Some(message.into()),
        }
    }

    /// Split into the `(summary, message)` pair stored on the daily plan.
    pub fn into_parts(self) -> (Option<T>, Option<String>) {
        (self.summary, self.message)
    }
}
