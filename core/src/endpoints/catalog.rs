//! Supplier, assortment and article endpoints.
//!
//! ```text
//! touchwood/leveranciers                                               GET
//! touchwood/leveranciers/:supplier                                     GET
//! touchwood/leveranciers/:supplier/assortimenten                       GET
//! touchwood/leveranciers/:supplier/assortimenten/:assortment/artikelen GET
//! .../artikelen/:article/{kenmerken,images,specs,maatvoering}          GET
//! ```

use serde_json::Value;

use super::{paths, Dispatch};
use crate::error::Result;
use crate::http::{HttpMethod, Params};

pub trait SupplierCatalog: Dispatch {
    /// All suppliers, or the details of `supplier` when given.
    fn get_suppliers(&mut self, supplier: Option<&str>, params: Params) -> Result<Value> {
        self.dispatch(&paths::suppliers(supplier), HttpMethod::Get, params)
    }

    /// Assortments offered by `supplier`.
    fn get_assortments(&mut self, supplier: &str, params: Params) -> Result<Value> {
        let path = paths::assortments(supplier)?;
        self.dispatch(&path, HttpMethod::Get, params)
    }

    /// Articles in one assortment.
    fn get_articles(&mut self, supplier: &str, assortment: &str, params: Params) -> Result<Value> {
        let path = paths::articles(supplier, assortment)?;
        self.dispatch(&path, HttpMethod::Get, params)
    }

    /// Properties (`kenmerken`) of an article.
    fn get_properties(
        &mut self,
        supplier: &str,
        assortment: &str,
        article: &str,
        params: Params,
    ) -> Result<Value> {
        let path = paths::properties(supplier, assortment, article)?;
        self.dispatch(&path, HttpMethod::Get, params)
    }

    fn get_images(
        &mut self,
        supplier: &str,
        assortment: &str,
        article: &str,
        params: Params,
    ) -> Result<Value> {
        let path = paths::images(supplier, assortment, article)?;
        self.dispatch(&path, HttpMethod::Get, params)
    }

    /// Configuration specs of an article.
    fn get_specs(
        &mut self,
        supplier: &str,
        assortment: &str,
        article: &str,
        params: Params,
    ) -> Result<Value> {
        let path = paths::specs(supplier, assortment, article)?;
        self.dispatch(&path, HttpMethod::Get, params)
    }

    /// Sizing options (`maatvoering`) of an article.
    fn get_sizing(
        &mut self,
        supplier: &str,
        assortment: &str,
        article: &str,
        params: Params,
    ) -> Result<Value> {
        let path = paths::sizing(supplier, assortment, article)?;
        self.dispatch(&path, HttpMethod::Get, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::testing::Recorder;
    use crate::error::TouchwoodError;

    #[test]
    fn suppliers_forward_extra_params() {
        let mut api = Recorder::default();
        api.get_suppliers(None, Params::new().with("land", "NL")).unwrap();
        let (path, method, params) = api.last();
        assert_eq!(path, "touchwood/leveranciers");
        assert_eq!(method, HttpMethod::Get);
        assert_eq!(params.get("land"), Some("NL"));
    }

    #[test]
    fn supplier_detail_adds_the_identifier() {
        let mut api = Recorder::default();
        api.get_suppliers(Some("hout-en-co"), Params::new()).unwrap();
        assert_eq!(api.last().0, "touchwood/leveranciers/hout-en-co");
    }

    #[test]
    fn every_article_resource_is_a_get() {
        let mut api = Recorder::default();
        api.get_properties("s", "a", "N900", Params::new()).unwrap();
        api.get_images("s", "a", "N900", Params::new()).unwrap();
        api.get_specs("s", "a", "N900", Params::new()).unwrap();
        api.get_sizing("s", "a", "N900", Params::new()).unwrap();

        let suffixes: Vec<_> = api
            .calls
            .iter()
            .map(|(path, method, _)| {
                assert_eq!(*method, HttpMethod::Get);
                path.rsplit('/').next().unwrap().to_string()
            })
            .collect();
        assert_eq!(suffixes, ["kenmerken", "images", "specs", "maatvoering"]);
    }

    #[test]
    fn missing_identifier_never_dispatches() {
        let mut api = Recorder::default();
        let err = api.get_articles("hout-en-co", "", Params::new()).unwrap_err();
        assert!(matches!(err, TouchwoodError::InvalidArgument(_)));
        assert!(api.calls.is_empty());
    }
}
