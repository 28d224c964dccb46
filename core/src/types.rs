//! Typed payloads for the cart endpoints.
//!
//! # Design
//! Endpoint methods take `Params` and return the JSON body untouched. The
//! request types here turn into `Params` for the common cases, and the
//! response views read the few fields callers branch on. Both are optional
//! conveniences; the raw forms stay authoritative.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DecodeError, Result};
use crate::http::Params;

/// Body for adding an article to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCartItem {
    /// Article id, e.g. `N900`.
    pub id: String,
    pub csrfmiddlewaretoken: String,
}

impl AddCartItem {
    pub fn new(article: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            id: article.into(),
            csrfmiddlewaretoken: csrf_token.into(),
        }
    }
}

impl From<AddCartItem> for Params {
    fn from(item: AddCartItem) -> Self {
        Params::new()
            .with("id", item.id)
            .with("csrfmiddlewaretoken", item.csrfmiddlewaretoken)
    }
}

/// Body for updating a cart item. Only the fields that are set are sent;
/// the server leaves the others unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCartItem {
    /// Quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aantal: Option<String>,
    /// Rebate percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub korting: Option<String>,
}

impl UpdateCartItem {
    pub fn quantity(mut self, aantal: impl ToString) -> Self {
        self.aantal = Some(aantal.to_string());
        self
    }

    pub fn rebate(mut self, korting: impl ToString) -> Self {
        self.korting = Some(korting.to_string());
        self
    }
}

impl From<UpdateCartItem> for Params {
    fn from(update: UpdateCartItem) -> Self {
        let mut params = Params::new();
        if let Some(aantal) = update.aantal {
            params.insert("aantal", aantal);
        }
        if let Some(korting) = update.korting {
            params.insert("korting", korting);
        }
        params
    }
}

/// `{"cid": ..}`, answered by add and by single-item delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemRef {
    #[serde(deserialize_with = "string_or_number")]
    pub cid: String,
}

/// `{"deleted": n}`, answered by deleting the whole cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedItems {
    pub deleted: u64,
}

/// `{"cid": .., "aantal": .., "korting": ..}`, answered by update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedCartItem {
    #[serde(deserialize_with = "string_or_number")]
    pub cid: String,
    #[serde(deserialize_with = "string_or_number")]
    pub aantal: String,
    #[serde(deserialize_with = "string_or_number")]
    pub korting: String,
}

macro_rules! impl_from_value {
    ($($ty:ty),*) => {$(
        impl $ty {
            /// Read this view from a decoded response body.
            pub fn from_value(value: &Value) -> Result<Self> {
                Self::deserialize(value).map_err(|e| DecodeError::Json(e).into())
            }
        }
    )*};
}

impl_from_value!(CartItemRef, DeletedItems, UpdatedCartItem);

/// The service is not consistent about numbers versus strings for ids and
/// amounts; accept both and keep the text.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
