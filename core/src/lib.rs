//! Blocking client for the Touchwood catalog and cart REST API.
//!
//! # Overview
//! Every endpoint method builds a path from its identifiers and hands it to
//! `TouchwoodClient::request`, which sends one HTTP request, decodes the
//! JSON body and maps error statuses to [`ApiError`].
//!
//! ```no_run
//! use touchwood::{AddCartItem, CartOperations, Params, SupplierCatalog, TouchwoodClient};
//!
//! # fn main() -> touchwood::Result<()> {
//! let mut api = TouchwoodClient::new("https://shop.example")?;
//! let suppliers = api.get_suppliers(None, Params::new())?;
//! let added = api.cart_add_item(AddCartItem::new("N900", "csrf-token").into())?;
//! # let _ = (suppliers, added);
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `TouchwoodClient` owns the session: base URL, API version prefix,
//!   headers and the cookie jar. Calls take `&mut self`; the client is not
//!   meant to be shared between threads without external locking.
//! - The network is behind the `HttpTransport` trait. `UreqTransport` is
//!   the default; tests substitute their own.
//! - Endpoints are grouped in the `SupplierCatalog` and `CartOperations`
//!   traits and return the response body as `serde_json::Value`.
//! - No retries, no caching, no timeouts unless configured.

pub mod client;
pub mod config;
pub mod cookies;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{ClientBuilder, TouchwoodClient};
pub use config::ClientConfig;
pub use cookies::CookieJar;
pub use endpoints::{CartOperations, Dispatch, SupplierCatalog};
pub use error::{ApiError, DecodeError, Result, TouchwoodError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, Params, TransportError};
pub use transport::{RequestOptions, UreqTransport};
pub use types::{AddCartItem, CartItemRef, DeletedItems, UpdateCartItem, UpdatedCartItem};
