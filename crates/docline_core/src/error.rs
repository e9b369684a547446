use std::path::PathBuf;

/// Errors from looking up a mode in the registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("mode index {index} out of range (expected 0..{len})")]
    OutOfRange { index: usize, len: usize },

    #[error("unknown analysis mode: {0}")]
    UnknownMode(String),
}

/// Errors raised while turning parameter values into an analysis request.
///
/// Out-of-range integers are never an error; they are clamped and reported
/// as a [`crate::builder::ValidationClampedWarning`] instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("invalid value {value:?} for `{id}`: expected one of {options:?}")]
    InvalidEnumValue {
        id: String,
        value: String,
        options: Vec<String>,
    },

    #[error("`{id}` expects {expected} value, got {found}")]
    TypeMismatch {
        id: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors from attaching a source document to a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceFileError {
    #[error("source file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("unsupported source format {extension:?} for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// Transport-level failures observed while dispatching a request.
///
/// A non-2xx status is not a transport error; it is a failed
/// [`crate::request::AnalysisOutcome`] carrying the status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid backend address {url:?}: {message}")]
    InvalidEndpoint { url: String, message: String },

    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("could not read source file {}: {message}", .path.display())]
    SourceFile { path: PathBuf, message: String },
}

impl TransportError {
    /// Classify a reqwest failure for the given URL.
    ///
    /// A response the HTTP layer could not parse counts as malformed, even
    /// though reqwest reports it as a request error.
    pub(crate) fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        let url = url.to_string();
        let message = error_chain(err);
        if err.is_timeout() {
            TransportError::Timeout { url }
        } else if err.is_connect() {
            TransportError::Connect { url, message }
        } else if err.is_body() || err.is_decode() || unparseable_response(err) {
            TransportError::MalformedResponse { url, message }
        } else {
            TransportError::Request { url, message }
        }
    }
}

/// `err` and each of its sources, joined with `: `
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn unparseable_response(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(http) = cause.downcast_ref::<hyper::Error>() {
            return http.is_parse() || http.is_parse_status() || http.is_incomplete_message();
        }
        source = cause.source();
    }
    false
}
