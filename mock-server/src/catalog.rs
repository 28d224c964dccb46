//! Fixture catalog served by the mock: suppliers, assortments, articles
//! and the per-article detail resources.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Article summary, as listed in an assortment and embedded in cart items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub omschrijving: String,
    pub prijs: f64,
}

#[derive(Clone, Debug)]
pub struct ArticleRecord {
    pub article: Article,
    pub kenmerken: Value,
    pub images: Value,
    pub specs: Value,
    pub maatvoering: Value,
}

impl ArticleRecord {
    /// Detail resource by its path segment.
    pub fn resource(&self, name: &str) -> Option<&Value> {
        match name {
            "kenmerken" => Some(&self.kenmerken),
            "images" => Some(&self.images),
            "specs" => Some(&self.specs),
            "maatvoering" => Some(&self.maatvoering),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Assortment {
    pub naam: String,
    pub omschrijving: String,
    pub articles: Vec<ArticleRecord>,
}

#[derive(Clone, Debug)]
pub struct Supplier {
    pub naam: String,
    pub omschrijving: String,
    pub plaats: String,
    pub assortments: Vec<Assortment>,
}

impl Supplier {
    pub fn summary(&self) -> Value {
        json!({
            "naam": self.naam,
            "omschrijving": self.omschrijving,
            "plaats": self.plaats,
        })
    }

    pub fn assortment(&self, naam: &str) -> Option<&Assortment> {
        self.assortments.iter().find(|a| a.naam == naam)
    }
}

#[derive(Clone, Debug)]
pub struct Catalog {
    pub suppliers: Vec<Supplier>,
}

impl Catalog {
    pub fn supplier(&self, naam: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.naam == naam)
    }

    /// Find an article by id across every supplier and assortment.
    pub fn find_article(&self, id: &str) -> Option<&Article> {
        self.suppliers
            .iter()
            .flat_map(|s| &s.assortments)
            .flat_map(|a| &a.articles)
            .map(|r| &r.article)
            .find(|a| a.id == id)
    }

    pub fn fixture() -> Self {
        Catalog {
            suppliers: vec![
                Supplier {
                    naam: "hout-en-co".to_string(),
                    omschrijving: "Houten binnen- en buitendeuren".to_string(),
                    plaats: "Zwolle".to_string(),
                    assortments: vec![
                        Assortment {
                            naam: "deuren".to_string(),
                            omschrijving: "Binnendeuren".to_string(),
                            articles: vec![
                                door("N900", "Eiken binnendeur vlak", 249.0),
                                door("N901", "Eiken binnendeur met glas", 289.0),
                                door("N902", "Grenen binnendeur", 179.0),
                            ],
                        },
                        Assortment {
                            naam: "kozijnen".to_string(),
                            omschrijving: "Hardhouten kozijnen".to_string(),
                            articles: vec![frame("VEERE", "Kozijn Veere", 415.0)],
                        },
                    ],
                },
                Supplier {
                    naam: "trapwerk".to_string(),
                    omschrijving: "Trappen op maat".to_string(),
                    plaats: "Deventer".to_string(),
                    assortments: vec![Assortment {
                        naam: "trappen".to_string(),
                        omschrijving: "Open en dichte trappen".to_string(),
                        articles: vec![frame("T100", "Open trap beuken", 1150.0)],
                    }],
                },
            ],
        }
    }
}

fn door(id: &str, omschrijving: &str, prijs: f64) -> ArticleRecord {
    ArticleRecord {
        article: Article {
            id: id.to_string(),
            omschrijving: omschrijving.to_string(),
            prijs,
        },
        kenmerken: json!([
            {"naam": "houtsoort", "waarde": "eiken"},
            {"naam": "afwerking", "waarde": "geolied"},
        ]),
        images: json!([{"url": format!("/media/{id}/front.jpg"), "type": "front"}]),
        specs: json!([
            {"code": "draairichting", "opties": ["links", "rechts"]},
            {"code": "glas", "opties": ["geen", "helder", "mat"]},
        ]),
        maatvoering: json!({"breedte": [730, 780, 830, 880], "hoogte": [2015, 2115, 2315]}),
    }
}

fn frame(id: &str, omschrijving: &str, prijs: f64) -> ArticleRecord {
    ArticleRecord {
        article: Article {
            id: id.to_string(),
            omschrijving: omschrijving.to_string(),
            prijs,
        },
        kenmerken: json!([{"naam": "houtsoort", "waarde": "meranti"}]),
        images: json!([]),
        specs: json!([{"code": "kleur", "opties": ["wit", "zwart"]}]),
        maatvoering: json!({"op_maat": true}),
    }
}
