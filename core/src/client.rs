//! Session and request dispatch for the Touchwood API.
//!
//! # Design
//! `TouchwoodClient` is the single choke point for every endpoint call. A
//! call is split into three steps: `build_request` turns a path, method and
//! params into an `HttpRequest`, the transport executes it, and
//! `parse_response` decodes the body and maps error statuses. The first and
//! last steps are pure, so they are tested without a server.
//!
//! The only state that changes between calls is the cookie jar, which is
//! why `request` takes `&mut self`.

use serde_json::Value;
use url::form_urlencoded;
use url::Url;

use crate::config::ClientConfig;
use crate::cookies::CookieJar;
use crate::error::{ApiError, DecodeError, Result, TouchwoodError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, Params};
use crate::transport::{RequestOptions, UreqTransport};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const SESSION_COOKIE: &str = "sessionid";

/// Blocking client for the Touchwood REST API.
///
/// Endpoint operations come from the [`SupplierCatalog`] and
/// [`CartOperations`] traits, both implemented for every client.
///
/// [`SupplierCatalog`]: crate::endpoints::SupplierCatalog
/// [`CartOperations`]: crate::endpoints::CartOperations
#[derive(Debug, Clone)]
pub struct TouchwoodClient<T = UreqTransport> {
    base_url: String,
    origin: Url,
    api_version: String,
    access_token: Option<String>,
    headers: Vec<(String, String)>,
    cookies: CookieJar,
    transport: T,
}

/// Builder for [`TouchwoodClient`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    api_version: String,
    access_token: Option<String>,
    headers: Vec<(String, String)>,
    options: RequestOptions,
}

impl ClientBuilder {
    /// Bearer token sent as `Authorization: Bearer <token>`.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Extra header sent with every request. Overrides a default header of
    /// the same name. A `Cookie` header is merged with the session cookies;
    /// on a name clash the value given here wins.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Path segment placed between the base URL and every endpoint path.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn request_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Build a client using the default `ureq` transport.
    pub fn build(self) -> Result<TouchwoodClient> {
        let transport = UreqTransport::new(&self.options);
        self.build_with_transport(transport)
    }

    /// Build a client over a caller-supplied transport. Request options are
    /// not applied; the transport is expected to be configured already.
    pub fn build_with_transport<T: HttpTransport>(self, transport: T) -> Result<TouchwoodClient<T>> {
        let (base_url, origin) = validate_base_url(&self.base_url)?;
        Ok(TouchwoodClient {
            base_url,
            origin,
            api_version: self.api_version.trim_matches('/').to_string(),
            access_token: self.access_token.filter(|t| !t.is_empty()),
            headers: self.headers,
            cookies: CookieJar::new(),
            transport,
        })
    }
}

impl TouchwoodClient {
    /// Client for `base_url` with default options.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.into(),
            api_version: String::new(),
            access_token: None,
            headers: Vec::new(),
            options: RequestOptions::default(),
        }
    }

    /// Client configured from a [`ClientConfig`]. A configured session id is
    /// restored into the cookie jar as `sessionid`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Self::builder(config.api_server.clone())
            .api_version(config.api_version.clone())
            .request_options(config.request_options());
        if let Some(token) = &config.access_token {
            builder = builder.access_token(token.clone());
        }
        for (name, value) in &config.headers {
            builder = builder.header(name.clone(), value.clone());
        }

        let mut client = builder.build()?;
        if let Some(session_id) = config.session_id.as_deref().filter(|s| !s.is_empty()) {
            client.restore_session(session_id);
        }
        Ok(client)
    }
}

impl<T: HttpTransport> TouchwoodClient<T> {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Mutable access to the session cookies.
    pub fn cookies_mut(&mut self) -> &mut CookieJar {
        &mut self.cookies
    }

    /// Store `session_id` as the `sessionid` cookie for the API host.
    pub fn restore_session(&mut self, session_id: &str) {
        self.cookies.insert(SESSION_COOKIE, session_id, &self.origin);
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for an endpoint path, without query string.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.api_version.is_empty() {
            format!("{}/{path}", self.base_url)
        } else {
            format!("{}/{}/{path}", self.base_url, self.api_version)
        }
    }

    /// Describe the HTTP request for an endpoint call without sending it.
    ///
    /// GET and DELETE encode `params` in the query string; POST, PUT and
    /// PATCH send them as a form body. Never both.
    pub fn build_request(&self, path: &str, method: HttpMethod, params: &Params) -> HttpRequest {
        let mut url = self.url_for(path);
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        let mut body = None;

        if method.carries_body() {
            headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
            body = Some(encode_params(params));
        } else if !params.is_empty() {
            url.push('?');
            url.push_str(&encode_params(params));
        }

        if let Some(token) = &self.access_token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        for (name, value) in &self.headers {
            match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some(slot) => slot.1 = value.clone(),
                None => headers.push((name.clone(), value.clone())),
            }
        }
        let session = Url::parse(&url)
            .map(|target| self.cookies.request_pairs(&target))
            .unwrap_or_default();
        merge_cookies(&mut headers, session);

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    /// Decode a response body and map error statuses.
    ///
    /// The body is decoded before the status is inspected: the service
    /// answers with JSON on both paths, so a non-JSON body is a decode
    /// error regardless of status.
    pub fn parse_response(response: HttpResponse) -> Result<Value> {
        let text = String::from_utf8(response.body).map_err(DecodeError::from)?;
        let value: Value = serde_json::from_str(&text).map_err(DecodeError::from)?;

        if response.status >= 400 {
            tracing::warn!(status = response.status, "Touchwood API returned an error");
            return Err(ApiError::new(response.status, value).into());
        }
        Ok(value)
    }

    /// Perform one endpoint call: build, send, record cookies, parse.
    ///
    /// Transport failures propagate unchanged. There is no retry.
    pub fn request(&mut self, path: &str, method: HttpMethod, params: Params) -> Result<Value> {
        let request = self.build_request(path, method, &params);
        tracing::debug!(method = %request.method, url = %request.url, "dispatching request");

        let response = self
            .transport
            .execute(&request)
            .map_err(TouchwoodError::Transport)?;
        tracing::debug!(status = response.status, url = %request.url, "received response");

        if let Ok(url) = Url::parse(&request.url) {
            self.cookies.absorb(&response, &url);
        }
        Self::parse_response(response)
    }
}

fn encode_params(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter() {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Add `session` cookies to the `Cookie` header, creating it if needed.
/// Names already present in a caller-supplied header are left alone.
fn merge_cookies(headers: &mut Vec<(String, String)>, session: Vec<(String, String)>) {
    let pairs = |cookies: Vec<(String, String)>| -> Vec<String> {
        cookies
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect()
    };

    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case("cookie")) {
        Some((_, value)) => {
            let taken: Vec<String> = value
                .split(';')
                .filter_map(|pair| pair.split_once('='))
                .map(|(name, _)| name.trim().to_string())
                .collect();
            let extra: Vec<(String, String)> = session
                .into_iter()
                .filter(|(name, _)| !taken.contains(name))
                .collect();
            for pair in pairs(extra) {
                value.push_str("; ");
                value.push_str(&pair);
            }
        }
        None if !session.is_empty() => {
            headers.push(("cookie".to_string(), pairs(session).join("; ")));
        }
        None => {}
    }
}

fn validate_base_url(base_url: &str) -> Result<(String, Url)> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(TouchwoodError::InvalidArgument(
            "base URL must not be empty".to_string(),
        ));
    }
    let parsed = Url::parse(trimmed)
        .map_err(|e| TouchwoodError::InvalidArgument(format!("invalid base URL {trimmed}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(TouchwoodError::InvalidArgument(format!(
            "base URL must use http or https: {trimmed}"
        )));
    }
    Ok((trimmed.to_string(), parsed))
}
