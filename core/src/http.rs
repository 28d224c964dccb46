//! HTTP transport types shared by the client and its transports.
//!
//! # Design
//! Requests and responses are plain data. `TouchwoodClient` builds an
//! `HttpRequest`, hands it to an `HttpTransport`, and parses the returned
//! `HttpResponse`. Only the transport touches the network, so request
//! building and response parsing stay deterministic and testable without a
//! server.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::{DecodeError, TouchwoodError};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether params travel as a form body. GET and DELETE encode them in
    /// the query string instead and never carry a body.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = TouchwoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "patch" => Ok(HttpMethod::Patch),
            "delete" => Ok(HttpMethod::Delete),
            other => Err(TouchwoodError::InvalidArgument(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}

/// Ordered key/value parameters for an endpoint call.
///
/// Encoded as the query string for GET/DELETE and as an
/// `application/x-www-form-urlencoded` body for POST/PUT/PATCH.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace `key`. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flatten a serializable struct into params.
    ///
    /// The value must serialize to a JSON object of scalars. `null` fields
    /// are skipped, strings are taken verbatim, numbers and booleans use
    /// their JSON rendering.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self, TouchwoodError> {
        let json = serde_json::to_value(value).map_err(DecodeError::Json)?;
        let Value::Object(map) = json else {
            return Err(TouchwoodError::InvalidArgument(
                "params must serialize to a JSON object".to_string(),
            ));
        };

        let mut params = Params::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::String(s) => params.insert(key, s),
                Value::Bool(_) | Value::Number(_) => params.insert(key, value),
                Value::Array(_) | Value::Object(_) => {
                    return Err(TouchwoodError::InvalidArgument(format!(
                        "param `{key}` is not a scalar"
                    )));
                }
            }
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// An HTTP request described as plain data.
///
/// Built by `TouchwoodClient::build_request`; `url` is absolute and already
/// carries the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// The body is kept as raw bytes; UTF-8 and JSON decoding happen in
/// `TouchwoodClient::parse_response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// All header values matching `name`, case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Error produced when a request cannot complete at the network layer.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Executes one HTTP round trip.
///
/// Implementations must return non-2xx responses as `Ok(HttpResponse)`;
/// `Err` is reserved for failures where no response was received
/// (DNS, connect, TLS, I/O).
pub trait HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
