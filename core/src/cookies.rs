//! Session cookie store.
//!
//! The Touchwood service keys carts by a `sessionid` cookie. The jar is
//! owned by the client, updated from `Set-Cookie` headers after every
//! response, and replayed as a single `Cookie` header on the next request.
//! Matching on domain, path and expiry is done by `cookie_store`, the same
//! store `ureq` uses for its own cookie support.

use cookie_store::CookieStore;
use url::Url;

use crate::http::HttpResponse;

#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    store: CookieStore,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the first unexpired cookie called `name`, for any domain
    /// or path.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.store
            .iter_unexpired()
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value())
    }

    /// Store `name=value` for the host of `url`, valid on every path.
    pub fn insert(&mut self, name: &str, value: &str, url: &Url) {
        self.apply_set_cookie(&format!("{name}={value}; Path=/"), url);
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.store.iter_unexpired().next().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.store
            .iter_unexpired()
            .map(|cookie| (cookie.name(), cookie.value()))
    }

    /// `(name, value)` pairs that apply to a request for `url`.
    pub fn request_pairs(&self, url: &Url) -> Vec<(String, String)> {
        self.store
            .get_request_values(url)
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    /// Value for an outgoing `Cookie` header to `url`, or `None` when no
    /// cookie applies.
    pub fn header_value(&self, url: &Url) -> Option<String> {
        let pairs = self.request_pairs(url);
        if pairs.is_empty() {
            return None;
        }
        let pairs: Vec<String> = pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }

    /// Apply every `Set-Cookie` header of `response`, received for `url`.
    pub fn absorb(&mut self, response: &HttpResponse, url: &Url) {
        for header in response.header_values("set-cookie") {
            self.apply_set_cookie(header, url);
        }
    }

    /// Apply one `Set-Cookie` value. Expired cookies replace and remove a
    /// stored one; cookies for another domain are dropped.
    pub fn apply_set_cookie(&mut self, header: &str, url: &Url) {
        match self.store.parse(header, url) {
            Ok(_) => tracing::debug!(%url, "cookie applied"),
            Err(err) => tracing::debug!(%url, error = %err, "cookie ignored"),
        }
    }
}
