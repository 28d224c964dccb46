//! Blocking transport backed by `ureq`.
//!
//! One `ureq::Agent` is built per client and reused for every call so
//! connections are pooled. Status codes are returned as data
//! (`http_status_as_error(false)`); interpreting them is the client's job.

use std::fmt;
use std::time::Duration;

use ureq::tls::TlsConfig;
use ureq::{Agent, RequestBuilder};

use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Transport-level options applied to every request.
///
/// Only the options listed here exist; there is no pass-through map for
/// arbitrary transport settings. Response bodies are read without a size
/// limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Verify the server's TLS certificate. Disable for self-signed test
    /// servers only.
    pub verify_tls: bool,
    /// Overall per-call timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            verify_tls: true,
            timeout: None,
        }
    }
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(options: &RequestOptions) -> Self {
        let tls = TlsConfig::builder()
            .disable_verification(!options.verify_tls)
            .build();
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(options.timeout)
            .tls_config(tls)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&RequestOptions::default())
    }
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let body = request.body.as_deref().unwrap_or_default();

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), request).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), request).call(),
            HttpMethod::Post => with_headers(self.agent.post(url), request).send(body.as_bytes()),
            HttpMethod::Put => with_headers(self.agent.put(url), request).send(body.as_bytes()),
            HttpMethod::Patch => with_headers(self.agent.patch(url), request).send(body.as_bytes()),
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    request
        .headers
        .iter()
        .fold(builder, |b, (k, v)| b.header(k.as_str(), v.as_str()))
}
