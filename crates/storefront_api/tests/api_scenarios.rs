use rusqlite::Connection;
use serde_json::{json, Value};
use storefront_api::{handle, handle_request, ApiConfig, ApiRequest, ApiResponse, Method};
use storefront_core::db::open_db_in_memory;

fn send(conn: &Connection, method: Method, path: &str, body: Option<Value>) -> ApiResponse {
    let mut request = ApiRequest::new(method, path);
    request.body = body;
    handle(conn, &request)
}

fn get(conn: &Connection, path: &str) -> ApiResponse {
    send(conn, Method::Get, path, None)
}

#[test]
fn home_route_answers() {
    let conn = open_db_in_memory().unwrap();
    let response = get(&conn, "/");
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({ "message": "Home" }));
}

#[test]
fn storefront_walkthrough() {
    let conn = open_db_in_memory().unwrap();

    let created = send(
        &conn,
        Method::Post,
        "/users",
        Some(json!({ "name": "Ann", "email": "ann@example.com" })),
    );
    assert_eq!(created.status, 201);
    assert_eq!(created.body["message"], "New User added successfully");
    assert_eq!(created.body["user"]["id"], 1);
    assert_eq!(created.body["user"]["address"], Value::Null);

    let created = send(
        &conn,
        Method::Post,
        "/products",
        Some(json!({ "name": "Lamp", "price": 19.5 })),
    );
    assert_eq!(created.status, 201);
    assert_eq!(created.body["product"], json!({ "id": 1, "name": "Lamp", "price": 19.5 }));

    let created = send(
        &conn,
        Method::Post,
        "/orders",
        Some(json!({ "order_date": "2024-03-01", "user_id": 1 })),
    );
    assert_eq!(created.status, 201);
    assert_eq!(created.body["message"], "New Order Placed!");
    assert_eq!(created.body["order"]["order_date"], "2024-03-01");

    let attached = send(&conn, Method::Put, "/orders/1/add_product/1", None);
    assert_eq!(attached.status, 200);
    assert_eq!(attached.body["message"], "Successfully added item to order.");

    let again = send(&conn, Method::Put, "/orders/1/add_product/1", None);
    assert_eq!(again.status, 400);
    assert_eq!(again.body["message"], "Item is already included in this order.");

    let order = get(&conn, "/orders/1");
    assert_eq!(order.status, 200);
    assert_eq!(
        order.body,
        json!({ "id": 1, "order_date": "2024-03-01", "user_id": 1, "product_ids": [1] })
    );

    let missing = send(&conn, Method::Put, "/orders/1/add_product/9", None);
    assert_eq!(missing.status, 400);
    assert_eq!(missing.body["message"], "Invalid order id or product id.");
}

#[test]
fn validation_failures_report_field_errors() {
    let conn = open_db_in_memory().unwrap();

    let response = send(&conn, Method::Post, "/users", Some(json!({ "email": 5 })));
    assert_eq!(response.status, 400);
    assert_eq!(
        response.body["errors"]["name"],
        json!(["Missing data for required field."])
    );
    assert_eq!(response.body["errors"]["email"], json!(["Not a valid string."]));

    let response = send(
        &conn,
        Method::Post,
        "/products",
        Some(json!({ "name": "Lamp", "price": -1 })),
    );
    assert_eq!(response.status, 400);
    assert!(response.body["errors"]["price"].is_array());

    let response = send(&conn, Method::Post, "/users", None);
    assert_eq!(response.status, 400);
    assert!(response.body["errors"]["_schema"].is_array());

    assert_eq!(get(&conn, "/users").body, json!([]));
}

#[test]
fn order_for_unknown_user_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let response = send(
        &conn,
        Method::Post,
        "/orders",
        Some(json!({ "order_date": "2024-03-01", "user_id": 7 })),
    );
    assert_eq!(response.status, 400);
    assert_eq!(response.body["message"], "Invalid user id");
}

#[test]
fn update_and_delete_round_through_the_api() {
    let conn = open_db_in_memory().unwrap();
    send(&conn, Method::Post, "/products", Some(json!({ "name": "Lamp", "price": 3 })));

    let updated = send(
        &conn,
        Method::Put,
        "/products/1",
        Some(json!({ "name": "Desk lamp", "price": 4.25 })),
    );
    assert_eq!(updated.status, 200);
    assert_eq!(updated.body, json!({ "id": 1, "name": "Desk lamp", "price": 4.25 }));

    let deleted = send(&conn, Method::Delete, "/products/1", None);
    assert_eq!(deleted.status, 200);
    assert_eq!(deleted.body["message"], "successfully deleted product 1");

    let gone = get(&conn, "/products/1");
    assert_eq!(gone.status, 404);
    assert_eq!(gone.body["message"], "Product 1 not found");

    let gone = send(&conn, Method::Delete, "/products/1", None);
    assert_eq!(gone.status, 404);
}

#[test]
fn user_with_orders_cannot_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    send(&conn, Method::Post, "/users", Some(json!({ "name": "Ann" })));
    send(
        &conn,
        Method::Post,
        "/orders",
        Some(json!({ "order_date": "2024-03-01", "user_id": 1 })),
    );

    let response = send(&conn, Method::Delete, "/users/1", None);
    assert_eq!(response.status, 400);
    assert_eq!(
        response.body["message"],
        "User has existing orders and cannot be deleted."
    );
    assert_eq!(get(&conn, "/users/1").status, 200);
}

#[test]
fn unknown_routes_and_methods_are_reported() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(get(&conn, "/carts").status, 404);
    assert_eq!(get(&conn, "/users/abc").status, 404);

    let response = send(&conn, Method::Delete, "/users", None);
    assert_eq!(response.status, 405);
    assert!(response.body["message"]
        .as_str()
        .unwrap()
        .contains("GET, POST"));

    assert_eq!(get(&conn, "/orders").status, 405);
}

#[test]
fn handle_request_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let config = ApiConfig {
        db_path: dir.path().join("store.sqlite3"),
        log_level: "info".to_string(),
        log_dir: None,
    };

    let created = handle_request(
        &config,
        &ApiRequest::new(Method::Post, "/users").with_body(json!({ "name": "Ann" })),
    );
    assert_eq!(created.status, 201);

    let listed = handle_request(&config, &ApiRequest::new(Method::Get, "/users"));
    assert_eq!(listed.status, 200);
    assert_eq!(
        listed.body,
        json!([{ "id": 1, "name": "Ann", "email": null, "address": null }])
    );
}

#[test]
fn unreachable_database_maps_to_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ApiConfig {
        db_path: dir.path().join("missing").join("store.sqlite3"),
        log_level: "info".to_string(),
        log_dir: None,
    };

    let response = handle_request(&config, &ApiRequest::new(Method::Get, "/users"));
    assert_eq!(response.status, 500);
    assert!(!response.is_success());
}
