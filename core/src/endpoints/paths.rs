//! URL templates for every Touchwood resource.
//!
//! Identifiers are inserted positionally and are not escaped. Required
//! identifiers must be non-empty; an empty one yields
//! `TouchwoodError::InvalidArgument` before any request is built.

use crate::error::{Result, TouchwoodError};

/// Application namespace the catalog resources live under.
pub const CATALOG_ROOT: &str = "touchwood";

pub const CART_ITEMS: &str = "cart/items";

/// Reject an empty required identifier.
pub fn require<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(TouchwoodError::InvalidArgument(format!(
            "{name} must not be empty"
        )));
    }
    Ok(value)
}

/// An empty optional identifier counts as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `touchwood/leveranciers` or `touchwood/leveranciers/:supplier`.
pub fn suppliers(supplier: Option<&str>) -> String {
    match present(supplier) {
        Some(supplier) => format!("{CATALOG_ROOT}/leveranciers/{supplier}"),
        None => format!("{CATALOG_ROOT}/leveranciers"),
    }
}

pub fn assortments(supplier: &str) -> Result<String> {
    let supplier = require("supplier", supplier)?;
    Ok(format!("{CATALOG_ROOT}/leveranciers/{supplier}/assortimenten"))
}

pub fn articles(supplier: &str, assortment: &str) -> Result<String> {
    let base = assortments(supplier)?;
    let assortment = require("assortment", assortment)?;
    Ok(format!("{base}/{assortment}/artikelen"))
}

/// A sub-resource of a single article, e.g. `kenmerken`.
pub fn article_resource(
    supplier: &str,
    assortment: &str,
    article: &str,
    resource: &str,
) -> Result<String> {
    let base = articles(supplier, assortment)?;
    let article = require("article", article)?;
    Ok(format!("{base}/{article}/{resource}"))
}

pub fn properties(supplier: &str, assortment: &str, article: &str) -> Result<String> {
    article_resource(supplier, assortment, article, "kenmerken")
}

pub fn images(supplier: &str, assortment: &str, article: &str) -> Result<String> {
    article_resource(supplier, assortment, article, "images")
}

pub fn specs(supplier: &str, assortment: &str, article: &str) -> Result<String> {
    article_resource(supplier, assortment, article, "specs")
}

pub fn sizing(supplier: &str, assortment: &str, article: &str) -> Result<String> {
    article_resource(supplier, assortment, article, "maatvoering")
}

pub fn cart_items() -> String {
    CART_ITEMS.to_string()
}

/// `cart/items/:cid`.
pub fn cart_item(cid: &str) -> Result<String> {
    let cid = require("cid", cid)?;
    Ok(format!("{CART_ITEMS}/{cid}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplier_list_and_detail_differ_by_one_segment() {
        let list = suppliers(None);
        let detail = suppliers(Some("hout-en-co"));
        assert_eq!(list, "touchwood/leveranciers");
        assert_eq!(detail, format!("{list}/hout-en-co"));
    }

    #[test]
    fn empty_optional_supplier_selects_the_collection() {
        assert_eq!(suppliers(Some("")), suppliers(None));
    }

    #[test]
    fn article_templates_nest_under_the_assortment() {
        assert_eq!(
            articles("hout-en-co", "deuren").unwrap(),
            "touchwood/leveranciers/hout-en-co/assortimenten/deuren/artikelen"
        );
        let base = "touchwood/leveranciers/hout-en-co/assortimenten/deuren/artikelen/N900";
        assert_eq!(
            properties("hout-en-co", "deuren", "N900").unwrap(),
            format!("{base}/kenmerken")
        );
        assert_eq!(images("hout-en-co", "deuren", "N900").unwrap(), format!("{base}/images"));
        assert_eq!(specs("hout-en-co", "deuren", "N900").unwrap(), format!("{base}/specs"));
        assert_eq!(
            sizing("hout-en-co", "deuren", "N900").unwrap(),
            format!("{base}/maatvoering")
        );
    }

    #[test]
    fn cart_item_differs_from_collection_by_cid() {
        assert_eq!(cart_items(), "cart/items");
        assert_eq!(cart_item("c-1").unwrap(), "cart/items/c-1");
    }

    #[test]
    fn empty_required_identifiers_are_rejected() {
        assert!(matches!(
            assortments(""),
            Err(TouchwoodError::InvalidArgument(msg)) if msg.contains("supplier")
        ));
        assert!(matches!(
            articles("hout-en-co", " "),
            Err(TouchwoodError::InvalidArgument(msg)) if msg.contains("assortment")
        ));
        assert!(matches!(
            specs("hout-en-co", "deuren", ""),
            Err(TouchwoodError::InvalidArgument(msg)) if msg.contains("article")
        ));
        assert!(matches!(
            cart_item(""),
            Err(TouchwoodError::InvalidArgument(msg)) if msg.contains("cid")
        ));
    }
}
