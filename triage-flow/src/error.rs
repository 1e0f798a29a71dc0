use thiserror::Error;

pub type Result<T> = std::result::Result<T, TriageError>;

/// Failure taxonomy for the two remote calls. Every variant is caught at the
/// session phase boundary and turned into the session error slot; nothing
/// here is fatal.
#[derive(Error, Debug)]
pub enum TriageError {
    /// The backend was never reached (DNS, connection, transport). The
    /// display text stays generic; backend internals live in the source.
    #[error("network error, check your connection and try again")]
    Connectivity(#[source] reqwest::Error),

    /// The backend answered with a non-success status. Carries the upstream
    /// `detail` message verbatim when one was present, otherwise a
    /// status-coded fallback.
    #[error("{0}")]
    Application(String),

    /// A success response whose body does not parse into the expected shape.
    #[error("unexpected response from backend: {0}")]
    Malformed(String),
}

impl TriageError {
    /// Application error from an HTTP status and optional `detail` payload.
    pub fn application(status: u16, detail: Option<String>) -> Self {
        match detail.filter(|d| !d.trim().is_empty()) {
            Some(detail) => TriageError::Application(detail),
            None => TriageError::Application(format!("request failed (HTTP {status})")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_prefers_upstream_detail() {
        let err = TriageError::application(422, Some("no HPO ids selected".to_string()));
        assert_eq!(err.to_string(), "no HPO ids selected");
    }

    #[test]
    fn application_error_falls_back_to_status_code() {
        let err = TriageError::application(502, None);
        assert_eq!(err.to_string(), "request failed (HTTP 502)");

        let blank = TriageError::application(500, Some("   ".to_string()));
        assert_eq!(blank.to_string(), "request failed (HTTP 500)");
    }
}
