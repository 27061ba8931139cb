use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// Callers can tell input problems apart from upstream-dependency
/// problems: `InvalidInput` and `NoBiomarkers` originate on the caller
/// side and are never worth retrying, while everything `is_upstream()`
/// came out of the model API boundary.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Malformed value supplied directly, bypassing extraction.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Extraction produced an empty biomarker set. Raised before any
    /// network call is attempted.
    #[error("no recognizable biomarkers in the input text")]
    NoBiomarkers,

    /// The model API answered with a non-2xx status. Body is surfaced
    /// verbatim, never swallowed.
    #[error("model API returned error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    /// The transport could not reach the model API at all.
    #[error("could not reach the model API: {0}")]
    UpstreamConnection(String),

    /// The model call exceeded the configured bound. Also covers
    /// advisory cancellation of an in-flight call.
    #[error("model call exceeded {0}s")]
    UpstreamTimeout(u64),

    /// The response decoded, but not into anything containing a reply.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

impl AdvisorError {
    /// True for failures originating at the model API boundary.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. }
                | Self::UpstreamConnection(_)
                | Self::UpstreamTimeout(_)
                | Self::MalformedResponse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_family_is_upstream() {
        assert!(AdvisorError::Upstream {
            status: 502,
            body: "bad gateway".into(),
        }
        .is_upstream());
        assert!(AdvisorError::UpstreamConnection("refused".into()).is_upstream());
        assert!(AdvisorError::UpstreamTimeout(120).is_upstream());
        assert!(AdvisorError::MalformedResponse("no choices".into()).is_upstream());
    }

    #[test]
    fn caller_side_errors_are_not_upstream() {
        assert!(!AdvisorError::InvalidInput("bad value".into()).is_upstream());
        assert!(!AdvisorError::NoBiomarkers.is_upstream());
    }

    #[test]
    fn upstream_display_carries_status_and_body() {
        let err = AdvisorError::Upstream {
            status: 429,
            body: "rate limited".into(),
        };
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("rate limited"));
    }
}
