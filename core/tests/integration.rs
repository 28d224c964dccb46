//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port, then drives a real
//! `TouchwoodClient` over `UreqTransport`. This checks that path building,
//! form encoding, cookie handling and error mapping agree with an actual
//! HTTP server.

use std::net::SocketAddr;

use touchwood::{
    AddCartItem, CartItemRef, CartOperations, ClientConfig, DeletedItems, Params,
    SupplierCatalog, TouchwoodClient, TouchwoodError, UpdateCartItem, UpdatedCartItem,
};

const CSRF: &str = "integration-token";

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: SocketAddr) -> TouchwoodClient {
    TouchwoodClient::new(&format!("http://{addr}")).unwrap()
}

fn add(api: &mut TouchwoodClient, article: &str) -> String {
    let body = api.cart_add_item(AddCartItem::new(article, CSRF).into()).unwrap();
    CartItemRef::from_value(&body).unwrap().cid
}

fn item_count(api: &mut TouchwoodClient) -> usize {
    let body = api.cart_get_items(Params::new()).unwrap();
    body["items"].as_object().unwrap().len()
}

#[test]
fn catalog_walk() {
    let mut api = client(start_server());

    let suppliers = api.get_suppliers(None, Params::new()).unwrap();
    let names: Vec<&str> = suppliers["leveranciers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["naam"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["hout-en-co", "trapwerk"]);

    let detail = api.get_suppliers(Some("trapwerk"), Params::new()).unwrap();
    let detail = detail["leveranciers"].as_array().unwrap();
    assert_eq!(detail.len(), 1);
    assert_eq!(detail[0]["plaats"], "Deventer");

    let assortments = api.get_assortments("hout-en-co", Params::new()).unwrap();
    assert_eq!(assortments["assortimenten"].as_array().unwrap().len(), 2);

    let articles = api.get_articles("hout-en-co", "deuren", Params::new()).unwrap();
    assert_eq!(articles["artikelen"][0]["id"], "N900");

    let properties = api
        .get_properties("hout-en-co", "deuren", "N900", Params::new())
        .unwrap();
    assert_eq!(properties["kenmerken"][0]["naam"], "houtsoort");

    let images = api.get_images("hout-en-co", "deuren", "N900", Params::new()).unwrap();
    assert_eq!(images["images"][0]["url"], "/media/N900/front.jpg");

    let specs = api.get_specs("hout-en-co", "deuren", "N900", Params::new()).unwrap();
    assert_eq!(specs["specs"][0]["code"], "draairichting");

    let sizing = api.get_sizing("trapwerk", "trappen", "T100", Params::new()).unwrap();
    assert_eq!(sizing["maatvoering"]["op_maat"], true);
}

#[test]
fn unknown_supplier_is_an_api_error() {
    let mut api = client(start_server());

    let err = api.get_assortments("onbekend", Params::new()).unwrap_err();
    let api_err = err.as_api().expect("api error");
    assert_eq!(api_err.status(), 404);
    assert!(api_err.is_not_found());
    assert_eq!(api_err.code().as_deref(), Some("404"));
    assert!(api_err.message().unwrap().contains("onbekend"));
    assert_eq!(err.status(), Some(404));
}

#[test]
fn cart_lifecycle() {
    let mut api = client(start_server());

    assert_eq!(item_count(&mut api), 0);
    assert!(api.cookies().get("sessionid").is_some(), "session cookie stored");

    // Same article twice gives two distinct lines.
    let first = add(&mut api, "N900");
    let second = add(&mut api, "N900");
    let third = add(&mut api, "VEERE");
    assert_ne!(first, second);
    assert_eq!(item_count(&mut api), 3);

    for cid in [&first, &second] {
        let item = api.cart_get_item(cid, Params::new()).unwrap();
        assert_eq!(item["items"][cid.as_str()]["article"]["id"], "N900");
        assert_eq!(item["items"][cid.as_str()]["aantal"], "1");
    }

    // Each duplicate is deleted on its own.
    let deleted = api.cart_delete_item(Some(first.as_str()), Params::new()).unwrap();
    assert_eq!(CartItemRef::from_value(&deleted).unwrap().cid, first);
    assert_eq!(item_count(&mut api), 2);
    let err = api.cart_get_item(&first, Params::new()).unwrap_err();
    assert_eq!(err.status(), Some(404));
    let item = api.cart_get_item(&second, Params::new()).unwrap();
    assert_eq!(item["items"][&second]["article"]["id"], "N900");
    let first = add(&mut api, "N900");
    assert_eq!(item_count(&mut api), 3);

    // Partial update: only the rebate changes.
    let updated = api
        .cart_update_item(&first, UpdateCartItem::default().rebate("7.5").into())
        .unwrap();
    let updated = UpdatedCartItem::from_value(&updated).unwrap();
    assert_eq!(updated.cid, first);
    assert_eq!(updated.korting, "7.5");
    assert_eq!(updated.aantal, "1");

    let updated = api
        .cart_update_item(&first, UpdateCartItem::default().quantity(3).into())
        .unwrap();
    let updated = UpdatedCartItem::from_value(&updated).unwrap();
    assert_eq!(updated.aantal, "3");
    assert_eq!(updated.korting, "7.5");

    // Single delete returns the cid and shrinks the cart by one.
    let deleted = api.cart_delete_item(Some(third.as_str()), Params::new()).unwrap();
    assert_eq!(CartItemRef::from_value(&deleted).unwrap().cid, third);
    assert_eq!(item_count(&mut api), 2);

    let err = api.cart_get_item(&third, Params::new()).unwrap_err();
    assert_eq!(err.status(), Some(404));

    // Delete all reports how many lines went.
    let cleared = api.cart_delete_item(None, Params::new()).unwrap();
    assert_eq!(DeletedItems::from_value(&cleared).unwrap().deleted, 2);
    assert_eq!(item_count(&mut api), 0);

    let cleared = api.cart_clear(Params::new()).unwrap();
    assert_eq!(DeletedItems::from_value(&cleared).unwrap().deleted, 0);
}

#[test]
fn add_without_csrf_token_is_forbidden() {
    let mut api = client(start_server());

    let err = api
        .cart_add_item(Params::new().with("id", "N900"))
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(item_count(&mut api), 0);
}

#[test]
fn invalid_update_is_rejected_by_the_server() {
    let mut api = client(start_server());
    let cid = add(&mut api, "N901");

    let err = api
        .cart_update_item(&cid, UpdateCartItem::default().rebate(150).into())
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[test]
fn carts_are_scoped_to_the_session() {
    let addr = start_server();
    let mut alice = client(addr);
    let mut bob = client(addr);

    add(&mut alice, "N900");
    assert_eq!(item_count(&mut alice), 1);
    assert_eq!(item_count(&mut bob), 0);

    // A fresh client restoring alice's session id sees her cart.
    let session_id = alice.cookies().get("sessionid").unwrap().to_string();
    let config = ClientConfig {
        api_server: format!("http://{addr}"),
        session_id: Some(session_id),
        ..ClientConfig::default()
    };
    let mut restored = TouchwoodClient::from_config(&config).unwrap();
    assert_eq!(item_count(&mut restored), 1);
}

#[test]
fn missing_identifiers_fail_without_io() {
    // Nothing listens here; reaching the network would give a transport error.
    let mut api = TouchwoodClient::new("http://127.0.0.1:9").unwrap();

    let err = api.cart_delete_item(Some(""), Params::new()).unwrap_err();
    assert!(matches!(err, TouchwoodError::InvalidArgument(_)));

    let err = api.get_articles("hout-en-co", "", Params::new()).unwrap_err();
    assert!(matches!(err, TouchwoodError::InvalidArgument(_)));

    let err = api.cart_get_items(Params::new()).unwrap_err();
    assert!(matches!(err, TouchwoodError::Transport(_)));
}
