//! Endpoint catalog, grouped by capability.
//!
//! Each group is a trait with provided methods on top of [`Dispatch`], so
//! every dispatcher (normally a [`TouchwoodClient`]) gets all of them.
//! Operations return the decoded JSON body verbatim.
//!
//! [`TouchwoodClient`]: crate::TouchwoodClient

pub mod cart;
pub mod catalog;
pub mod paths;

use serde_json::Value;

use crate::client::TouchwoodClient;
use crate::error::Result;
use crate::http::{HttpMethod, HttpTransport, Params};

pub use cart::CartOperations;
pub use catalog::SupplierCatalog;

/// Sends one endpoint call and returns the decoded body.
pub trait Dispatch {
    fn dispatch(&mut self, path: &str, method: HttpMethod, params: Params) -> Result<Value>;
}

impl<T: HttpTransport> Dispatch for TouchwoodClient<T> {
    fn dispatch(&mut self, path: &str, method: HttpMethod, params: Params) -> Result<Value> {
        self.request(path, method, params)
    }
}

impl<D: Dispatch + ?Sized> SupplierCatalog for D {}

impl<D: Dispatch + ?Sized> CartOperations for D {}
