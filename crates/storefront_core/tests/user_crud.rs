use serde_json::json;
use storefront_core::db::open_db_in_memory;
use storefront_core::service::MSG_USER_HAS_ORDERS;
use storefront_core::{
    EntityKind, OrderService, ServiceError, SqliteOrderRepository, SqliteUserRepository, User,
    UserService,
};

fn user_service(conn: &rusqlite::Connection) -> UserService<SqliteUserRepository<'_>> {
    UserService::new(SqliteUserRepository::try_new(conn).unwrap())
}

fn user_count(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_then_get_returns_input_fields_with_new_id() {
    let conn = open_db_in_memory().unwrap();
    let service = user_service(&conn);

    let payloads = [
        json!({"name": "Alice"}),
        json!({"name": "Bob", "email": "bob@example.com"}),
        json!({"name": "Chloé", "email": "c@example.com", "address": "1 Rue de Rivoli"}),
        json!({"name": "Dan", "email": null, "address": "2 Main St"}),
    ];

    for (index, payload) in payloads.iter().enumerate() {
        let created = service.create(payload).unwrap();
        assert_eq!(created.id, index as i64 + 1);

        let loaded = service.get(created.id).unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.name, payload["name"].as_str().unwrap());
        assert_eq!(loaded.email.as_deref(), payload["email"].as_str());
        assert_eq!(loaded.address.as_deref(), payload["address"].as_str());
    }
}

#[test]
fn list_returns_users_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let service = user_service(&conn);
    assert!(service.list().unwrap().is_empty());

    service.create(&json!({"name": "first"})).unwrap();
    service.create(&json!({"name": "second"})).unwrap();

    let names = service
        .list()
        .unwrap()
        .into_iter()
        .map(|user| user.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn get_missing_user_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let err = user_service(&conn).get(7).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: EntityKind::User,
            id: 7
        }
    ));
}

#[test]
fn create_with_invalid_payload_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = user_service(&conn);

    let err = service
        .create(&json!({"email": 12, "address": "x".repeat(201)}))
        .unwrap_err();
    match err {
        ServiceError::Validation(errors) => {
            assert_eq!(
                errors.fields().collect::<Vec<_>>(),
                vec!["address", "email", "name"]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(user_count(&conn), 0);
}

#[test]
fn update_replaces_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = user_service(&conn);
    let created = service
        .create(&json!({"name": "Alice", "email": "a@example.com", "address": "Old Road"}))
        .unwrap();

    let updated = service
        .update(created.id, &json!({"name": "Alice B", "address": "New Road"}))
        .unwrap();

    assert_eq!(
        updated,
        User {
            id: created.id,
            name: "Alice B".to_string(),
            email: None,
            address: Some("New Road".to_string()),
        }
    );
    assert_eq!(service.get(created.id).unwrap(), updated);
}

#[test]
fn update_missing_user_is_not_found_even_with_invalid_payload() {
    let conn = open_db_in_memory().unwrap();
    let service = user_service(&conn);
    service.create(&json!({"name": "Alice"})).unwrap();

    let err = service.update(99, &json!({"name": "Ghost"})).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { id: 99, .. }));

    let err = service.update(99, &json!({})).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { id: 99, .. }));

    assert_eq!(service.get(1).unwrap().name, "Alice");
    assert_eq!(user_count(&conn), 1);
}

#[test]
fn update_with_invalid_payload_keeps_stored_row() {
    let conn = open_db_in_memory().unwrap();
    let service = user_service(&conn);
    let created = service.create(&json!({"name": "Alice"})).unwrap();

    let err = service.update(created.id, &json!({"name": ""})).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(service.get(created.id).unwrap(), created);
}

#[test]
fn serialized_user_round_trips_through_update() {
    let conn = open_db_in_memory().unwrap();
    let service = user_service(&conn);
    let created = service
        .create(&json!({"name": "Alice", "email": "a@example.com", "address": "1 Road"}))
        .unwrap();

    let echoed = serde_json::to_value(&created).unwrap();
    let updated = service.update(created.id, &echoed).unwrap();
    assert_eq!(updated, created);
}

#[test]
fn delete_is_not_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = user_service(&conn);
    let created = service.create(&json!({"name": "Alice"})).unwrap();

    service.delete(created.id).unwrap();
    assert!(matches!(
        service.get(created.id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));

    let err = service.delete(created.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[test]
fn delete_user_with_orders_is_refused() {
    let conn = open_db_in_memory().unwrap();
    let users = user_service(&conn);
    let orders = OrderService::new(SqliteOrderRepository::try_new(&conn).unwrap());

    let alice = users.create(&json!({"name": "Alice"})).unwrap();
    orders
        .create(&json!({"order_date": "2024-01-01", "user_id": alice.id}))
        .unwrap();

    let err = users.delete(alice.id).unwrap_err();
    match err {
        ServiceError::Conflict(message) => assert_eq!(message, MSG_USER_HAS_ORDERS),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(users.get(alice.id).unwrap(), alice);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = user_service(&conn);

    let first = service.create(&json!({"name": "first"})).unwrap();
    service.delete(first.id).unwrap();
    let second = service.create(&json!({"name": "second"})).unwrap();

    assert_eq!(second.id, first.id + 1);
}
