//! Shopping cart endpoints.
//!
//! ```text
//! cart/items         GET     list all items in the cart
//! cart/items/:cid    GET     one item by cart id
//! cart/items         POST    add an item; body: id, csrfmiddlewaretoken
//! cart/items/:cid    PUT     update aantal and/or korting
//! cart/items         DELETE  delete all items  -> {"deleted": <count>}
//! cart/items/:cid    DELETE  delete one item   -> {"cid": <cid>}
//! ```
//!
//! The cart lives in the server-side session, so these calls rely on the
//! client replaying its `sessionid` cookie.

use serde_json::Value;

use super::{paths, Dispatch};
use crate::error::Result;
use crate::http::{HttpMethod, Params};

pub trait CartOperations: Dispatch {
    fn cart_get_items(&mut self, params: Params) -> Result<Value> {
        self.dispatch(&paths::cart_items(), HttpMethod::Get, params)
    }

    /// One cart item, keyed by its cart id. The answer has the same shape
    /// as the full listing: `{"items": {<cid>: {...}}}`.
    fn cart_get_item(&mut self, cid: &str, params: Params) -> Result<Value> {
        let path = paths::cart_item(cid)?;
        self.dispatch(&path, HttpMethod::Get, params)
    }

    /// Add an article. `params` must carry the article `id` and the
    /// `csrfmiddlewaretoken`; see [`AddCartItem`](crate::types::AddCartItem).
    /// Returns `{"cid": <new cart id>}`. Adding the same article twice
    /// yields two cart ids.
    fn cart_add_item(&mut self, params: Params) -> Result<Value> {
        self.dispatch(&paths::cart_items(), HttpMethod::Post, params)
    }

    /// Update quantity (`aantal`) and/or rebate (`korting`) of a cart item.
    /// Fields not present in `params` keep their value.
    fn cart_update_item(&mut self, cid: &str, params: Params) -> Result<Value> {
        let path = paths::cart_item(cid)?;
        self.dispatch(&path, HttpMethod::Put, params)
    }

    /// With `None`, delete every item and return `{"deleted": <count>}`.
    /// With `Some(cid)`, delete that item and return `{"cid": <cid>}`.
    ///
    /// `Some("")` is a single-item delete without an id and is rejected
    /// rather than widened into deleting the whole cart.
    fn cart_delete_item(&mut self, cid: Option<&str>, params: Params) -> Result<Value> {
        let path = match cid {
            Some(cid) => paths::cart_item(cid)?,
            None => paths::cart_items(),
        };
        self.dispatch(&path, HttpMethod::Delete, params)
    }

    /// Delete every item. Same as `cart_delete_item(None, params)`.
    fn cart_clear(&mut self, params: Params) -> Result<Value> {
        self.cart_delete_item(None, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TouchwoodClient;
    use crate::endpoints::testing::{CountingTransport, Recorder};
    use crate::error::TouchwoodError;

    #[test]
    fn add_posts_to_the_collection() {
        let mut api = Recorder::default();
        let params = Params::from([("id", "N900"), ("csrfmiddlewaretoken", "tok")]);
        api.cart_add_item(params.clone()).unwrap();
        let (path, method, sent) = api.last();
        assert_eq!(path, "cart/items");
        assert_eq!(method, HttpMethod::Post);
        assert_eq!(sent, &params);
    }

    #[test]
    fn delete_without_cid_targets_the_collection() {
        let mut api = Recorder::default();
        api.cart_delete_item(None, Params::new()).unwrap();
        assert_eq!(api.last().0, "cart/items");
        api.cart_clear(Params::new()).unwrap();
        assert_eq!(api.last().0, "cart/items");
        assert_eq!(api.last().1, HttpMethod::Delete);
    }

    #[test]
    fn delete_with_cid_targets_the_item() {
        let mut api = Recorder::default();
        api.cart_delete_item(Some("c-7"), Params::new()).unwrap();
        assert_eq!(api.last().0, "cart/items/c-7");
        assert_eq!(api.last().1, HttpMethod::Delete);
    }

    #[test]
    fn update_puts_to_the_item() {
        let mut api = Recorder::default();
        api.cart_update_item("c-7", Params::new().with("aantal", 2)).unwrap();
        let (path, method, params) = api.last();
        assert_eq!(path, "cart/items/c-7");
        assert_eq!(method, HttpMethod::Put);
        assert_eq!(params.get("aantal"), Some("2"));
    }

    #[test]
    fn empty_cid_fails_before_any_io() {
        let mut client = TouchwoodClient::builder("http://localhost:3000")
            .build_with_transport(CountingTransport::default())
            .unwrap();

        for result in [
            client.cart_get_item("", Params::new()),
            client.cart_update_item("", Params::new()),
            client.cart_delete_item(Some(""), Params::new()),
        ] {
            assert!(matches!(result, Err(TouchwoodError::InvalidArgument(_))));
        }
        assert_eq!(client.transport().calls.get(), 0);

        client.cart_get_items(Params::new()).unwrap();
        assert_eq!(client.transport().calls.get(), 1);
    }
}
