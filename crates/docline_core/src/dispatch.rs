//! Sends analysis requests to the backend and classifies the result.
//!
//! One POST per call, no retries. The body is the JSON payload, or a
//! multipart form (`settings` + `file`) when a source file is attached.
//! Any 2xx status is success. Everything else, including transport
//! failures, becomes a failed [`AnalysisOutcome`].

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, multipart};

use crate::error::TransportError;
use crate::model::Endpoint;
use crate::request::{AnalysisOutcome, AnalysisRequest, BackendReply};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Backend base address, e.g. `http://localhost:8080`
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Anything that can carry an [`AnalysisRequest`] to a backend
pub trait Dispatch: Send {
    fn dispatch(&self, request: &AnalysisRequest) -> AnalysisOutcome;
}

#[derive(Debug, Clone)]
pub struct AnalysisDispatcher {
    client: Client,
    base_url: Url,
}

impl AnalysisDispatcher {
    pub fn new(config: DispatcherConfig) -> Result<Self, TransportError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| TransportError::InvalidEndpoint {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.host_str().is_none() {
            return Err(TransportError::InvalidEndpoint {
                url: config.base_url,
                message: "expected an http(s) address with a host".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Request {
                url: base_url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Host and port the backend is expected to listen on
    pub fn backend_addr(&self) -> Option<(String, u16)> {
        let host = self.base_url.host_str()?;
        let port = self.base_url.port_or_known_default()?;
        Some((host.to_string(), port))
    }

    /// Full URL of the route serving `endpoint`
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.route()
        )
    }

    /// Send `request` once, surfacing transport failures as errors.
    pub fn try_dispatch(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, TransportError> {
        let mode = request.mode();
        let url = self.endpoint_url(mode);

        let builder = self.client.post(&url);
        let builder = match request.source_file() {
            Some(file) => {
                let settings = request.body_json().map_err(|e| TransportError::Request {
                    url: url.clone(),
                    message: e.to_string(),
                })?;
                let form = multipart::Form::new()
                    .text("settings", settings)
                    .file("file", file.path())
                    .map_err(|e| TransportError::SourceFile {
                        path: file.path().to_path_buf(),
                        message: e.to_string(),
                    })?;
                builder.multipart(form)
            }
            None => builder.json(request.payload()),
        };

        tracing::info!(
            mode = %mode,
            url = %url,
            with_file = request.source_file().is_some(),
            "Dispatching analysis request"
        );

        let response = builder
            .send()
            .map_err(|e| TransportError::from_reqwest(&url, &e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| TransportError::from_reqwest(&url, &e))?;
        let reply = serde_json::from_slice::<BackendReply>(&body).ok();

        let outcome = AnalysisOutcome::from_status(mode, status, reply);
        if outcome.succeeded {
            tracing::info!(mode = %mode, status, "Analysis request accepted");
        } else {
            tracing::warn!(mode = %mode, status, "Analysis request rejected");
        }
        Ok(outcome)
    }
}

impl Dispatch for AnalysisDispatcher {
    /// Send `request` once. Never fails: transport errors fold into the outcome.
    fn dispatch(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        self.try_dispatch(request).unwrap_or_else(|error| {
            tracing::error!(mode = %request.mode(), error = %error, "Analysis dispatch failed");
            AnalysisOutcome::from_transport_error(request.mode(), error)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_route() {
        let dispatcher = AnalysisDispatcher::new(DispatcherConfig {
            base_url: "http://localhost:8080/".into(),
            timeout: None,
        })
        .unwrap();
        assert_eq!(
            dispatcher.endpoint_url(Endpoint::NgramFinder),
            "http://localhost:8080/ngram_finder"
        );
        assert_eq!(
            dispatcher.backend_addr(),
            Some(("localhost".to_string(), 8080))
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        for base in ["localhost:8080", "ftp://example.com", "not a url"] {
            let result = AnalysisDispatcher::new(DispatcherConfig {
                base_url: base.into(),
                timeout: None,
            });
            assert!(
                matches!(result, Err(TransportError::InvalidEndpoint { .. })),
                "accepted {base:?}"
            );
        }
    }

    #[test]
    fn test_default_port_from_scheme() {
        let dispatcher = AnalysisDispatcher::new(DispatcherConfig {
            base_url: "https://analysis.internal".into(),
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap();
        assert_eq!(
            dispatcher.backend_addr(),
            Some(("analysis.internal".to_string(), 443))
        );
    }
}
