//! In-memory stand-in for the Touchwood REST service.
//!
//! Serves a fixed catalog under `/touchwood/leveranciers` and a per-session
//! cart under `/cart/items`. Sessions are tracked with a `sessionid` cookie
//! issued on first contact. Errors are answered as
//! `{"code": <status>, "message": <text>}`.

pub mod catalog;

use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub use catalog::{Article, Catalog};
use catalog::{Assortment, Supplier};

pub const SESSION_COOKIE: &str = "sessionid";
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartItem {
    pub cid: String,
    pub article: Article,
    pub aantal: String,
    pub korting: String,
}

pub type Cart = BTreeMap<String, CartItem>;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub carts: Arc<RwLock<HashMap<String, Cart>>>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            carts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

pub fn app() -> Router {
    app_with_state(AppState::new(Catalog::fixture()))
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/touchwood/leveranciers", get(list_suppliers))
        .route("/touchwood/leveranciers/{supplier}", get(get_supplier))
        .route(
            "/touchwood/leveranciers/{supplier}/assortimenten",
            get(list_assortments),
        )
        .route(
            "/touchwood/leveranciers/{supplier}/assortimenten/{assortment}/artikelen",
            get(list_articles),
        )
        .route(
            "/touchwood/leveranciers/{supplier}/assortimenten/{assortment}/artikelen/{article}/{resource}",
            get(article_resource),
        )
        .route(
            "/cart/items",
            get(list_items).post(add_item).delete(delete_all_items),
        )
        .route(
            "/cart/items/{cid}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .fallback(unknown_route)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Errors and sessions
// ---------------------------------------------------------------------------

/// Error answer in the service's `{code, message}` shape.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    fn body(&self) -> Value {
        json!({"code": self.status.as_u16(), "message": self.message})
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

type Reply = Result<(StatusCode, Value), ApiFailure>;

/// Cart session resolved from the `Cookie` header.
struct Session {
    id: String,
    fresh: bool,
}

impl Session {
    fn from_headers(headers: &HeaderMap) -> Self {
        let existing = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
            .map(|(_, value)| value.to_string());

        match existing {
            Some(id) => Session { id, fresh: false },
            None => Session {
                id: Uuid::new_v4().simple().to_string(),
                fresh: true,
            },
        }
    }

    /// Render `reply`, issuing the session cookie if it was just created.
    fn respond(&self, reply: Reply) -> Response {
        let mut response = match reply {
            Ok((status, body)) => (status, Json(body)).into_response(),
            Err(failure) => failure.into_response(),
        };
        if self.fresh {
            let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly", self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

async fn unknown_route() -> ApiFailure {
    ApiFailure::not_found("no such resource")
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

fn find_supplier<'a>(catalog: &'a Catalog, naam: &str) -> Result<&'a Supplier, ApiFailure> {
    catalog
        .supplier(naam)
        .ok_or_else(|| ApiFailure::not_found(format!("leverancier {naam} not found")))
}

fn find_assortment<'a>(
    catalog: &'a Catalog,
    supplier_naam: &str,
    naam: &str,
) -> Result<&'a Assortment, ApiFailure> {
    find_supplier(catalog, supplier_naam)?
        .assortment(naam)
        .ok_or_else(|| ApiFailure::not_found(format!("assortiment {naam} not found")))
}

async fn list_suppliers(State(state): State<AppState>) -> Json<Value> {
    let suppliers: Vec<Value> = state.catalog.suppliers.iter().map(|s| s.summary()).collect();
    Json(json!({"leveranciers": suppliers}))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(naam): Path<String>,
) -> Result<Json<Value>, ApiFailure> {
    let supplier = find_supplier(&state.catalog, &naam)?;
    Ok(Json(json!({"leveranciers": [supplier.summary()]})))
}

async fn list_assortments(
    State(state): State<AppState>,
    Path(naam): Path<String>,
) -> Result<Json<Value>, ApiFailure> {
    let supplier = find_supplier(&state.catalog, &naam)?;
    let assortments: Vec<Value> = supplier
        .assortments
        .iter()
        .map(|a| json!({"naam": a.naam, "omschrijving": a.omschrijving}))
        .collect();
    Ok(Json(json!({"assortimenten": assortments})))
}

async fn list_articles(
    State(state): State<AppState>,
    Path((supplier_naam, assortment_naam)): Path<(String, String)>,
) -> Result<Json<Value>, ApiFailure> {
    let assortment = find_assortment(&state.catalog, &supplier_naam, &assortment_naam)?;
    let articles: Vec<&Article> = assortment.articles.iter().map(|r| &r.article).collect();
    Ok(Json(json!({"artikelen": articles})))
}

async fn article_resource(
    State(state): State<AppState>,
    Path((supplier_naam, assortment_naam, article_id, resource)): Path<(
        String,
        String,
        String,
        String,
    )>,
) -> Result<Json<Value>, ApiFailure> {
    let assortment = find_assortment(&state.catalog, &supplier_naam, &assortment_naam)?;
    let record = assortment
        .articles
        .iter()
        .find(|r| r.article.id == article_id)
        .ok_or_else(|| ApiFailure::not_found(format!("artikel {article_id} not found")))?;
    let value = record
        .resource(&resource)
        .ok_or_else(|| ApiFailure::not_found(format!("no such resource: {resource}")))?;
    let mut body = serde_json::Map::new();
    body.insert(resource, value.clone());
    Ok(Json(Value::Object(body)))
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

async fn list_items(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = Session::from_headers(&headers);
    let carts = state.carts.read().await;
    let items = carts.get(&session.id).cloned().unwrap_or_default();
    session.respond(Ok((StatusCode::OK, json!({"items": items}))))
}

async fn get_item(
    State(state): State<AppState>,
    Path(cid): Path<String>,
    headers: HeaderMap,
) -> Response {
    let session = Session::from_headers(&headers);
    let carts = state.carts.read().await;
    let reply = carts
        .get(&session.id)
        .and_then(|cart| cart.get(&cid))
        .map(|item| {
            let items = Cart::from([(cid.clone(), item.clone())]);
            (StatusCode::OK, json!({"items": items}))
        })
        .ok_or_else(|| ApiFailure::not_found(format!("cart item {cid} not found")));
    session.respond(reply)
}

async fn add_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let session = Session::from_headers(&headers);
    let reply = add_to_cart(&state, &session, &form).await;
    session.respond(reply)
}

async fn add_to_cart(state: &AppState, session: &Session, form: &HashMap<String, String>) -> Reply {
    if form.get(CSRF_FIELD).map_or(true, |t| t.is_empty()) {
        return Err(ApiFailure::new(
            StatusCode::FORBIDDEN,
            "CSRF verification failed",
        ));
    }
    let article_id = form
        .get("id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiFailure::new(StatusCode::BAD_REQUEST, "missing article id"))?;
    let article = state
        .catalog
        .find_article(article_id)
        .cloned()
        .ok_or_else(|| ApiFailure::not_found(format!("artikel {article_id} not found")))?;

    let cid = Uuid::new_v4().simple().to_string();
    let item = CartItem {
        cid: cid.clone(),
        article,
        aantal: "1".to_string(),
        korting: "0.0".to_string(),
    };
    state
        .carts
        .write()
        .await
        .entry(session.id.clone())
        .or_default()
        .insert(cid.clone(), item);
    tracing::debug!(session = %session.id, %cid, article = %article_id, "cart item added");
    Ok((StatusCode::CREATED, json!({"cid": cid})))
}

async fn update_item(
    State(state): State<AppState>,
    Path(cid): Path<String>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let session = Session::from_headers(&headers);
    let reply = update_cart_item(&state, &session, &cid, &form).await;
    session.respond(reply)
}

async fn update_cart_item(
    state: &AppState,
    session: &Session,
    cid: &str,
    form: &HashMap<String, String>,
) -> Reply {
    let aantal = form.get("aantal");
    if let Some(aantal) = aantal {
        if aantal.parse::<u32>().map_or(true, |n| n == 0) {
            return Err(ApiFailure::new(
                StatusCode::BAD_REQUEST,
                format!("invalid aantal: {aantal}"),
            ));
        }
    }
    let korting = form.get("korting");
    if let Some(korting) = korting {
        if korting
            .parse::<f64>()
            .map_or(true, |k| !(0.0..=100.0).contains(&k))
        {
            return Err(ApiFailure::new(
                StatusCode::BAD_REQUEST,
                format!("invalid korting: {korting}"),
            ));
        }
    }

    let mut carts = state.carts.write().await;
    let item = carts
        .get_mut(&session.id)
        .and_then(|cart| cart.get_mut(cid))
        .ok_or_else(|| ApiFailure::not_found(format!("cart item {cid} not found")))?;
    if let Some(aantal) = aantal {
        item.aantal = aantal.clone();
    }
    if let Some(korting) = korting {
        item.korting = korting.clone();
    }
    Ok((
        StatusCode::OK,
        json!({"cid": item.cid, "aantal": item.aantal, "korting": item.korting}),
    ))
}

async fn delete_all_items(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = Session::from_headers(&headers);
    let deleted = state
        .carts
        .write()
        .await
        .remove(&session.id)
        .map_or(0, |cart| cart.len());
    session.respond(Ok((StatusCode::OK, json!({"deleted": deleted}))))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(cid): Path<String>,
    headers: HeaderMap,
) -> Response {
    let session = Session::from_headers(&headers);
    let removed = state
        .carts
        .write()
        .await
        .get_mut(&session.id)
        .and_then(|cart| cart.remove(&cid));
    let reply = match removed {
        Some(_) => Ok((StatusCode::OK, json!({"cid": cid}))),
        None => Err(ApiFailure::not_found(format!("cart item {cid} not found"))),
    };
    session.respond(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_item_serializes_with_nested_article() {
        let item = CartItem {
            cid: "c1".to_string(),
            article: Article {
                id: "N900".to_string(),
                omschrijving: "Deur".to_string(),
                prijs: 249.0,
            },
            aantal: "1".to_string(),
            korting: "0.0".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["article"]["id"], "N900");
        assert_eq!(json["aantal"], "1");
        assert_eq!(json["korting"], "0.0");
    }

    #[test]
    fn failure_body_has_code_and_message() {
        let failure = ApiFailure::not_found("gone");
        assert_eq!(failure.body(), json!({"code": 404, "message": "gone"}));
    }

    #[test]
    fn session_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("csrftoken=x; sessionid=abc"),
        );
        let session = Session::from_headers(&headers);
        assert_eq!(session.id, "abc");
        assert!(!session.fresh);
    }

    #[test]
    fn missing_cookie_starts_a_fresh_session() {
        let session = Session::from_headers(&HeaderMap::new());
        assert!(session.fresh);
        assert!(!session.id.is_empty());
    }

    #[test]
    fn fixture_articles_are_findable_by_id() {
        let catalog = Catalog::fixture();
        for id in ["N900", "N901", "N902", "VEERE"] {
            assert!(catalog.find_article(id).is_some(), "{id}");
        }
        assert!(catalog.find_article("nope").is_none());
    }
}
