//! Route handlers: one service call per request.

use crate::response::ApiResponse;
use crate::router::{ApiRequest, Method, Route};
use rusqlite::Connection;
use serde_json::{json, Value};
use storefront_core::{
    OrderService, ProductService, ServiceResult, SqliteOrderRepository, SqliteProductRepository,
    SqliteUserRepository, UserService,
};

pub(crate) fn dispatch(
    conn: &Connection,
    route: Route,
    request: &ApiRequest,
) -> ServiceResult<ApiResponse> {
    let empty = Value::Null;
    let body = request.body.as_ref().unwrap_or(&empty);
    match (route, request.method) {
        (Route::Home, Method::Get) => Ok(ApiResponse::ok(json!({ "message": "Home" }))),

        (Route::Users, Method::Get) => {
            let users = user_service(conn)?.list()?;
            Ok(ApiResponse::ok(json!(users)))
        }
        (Route::Users, Method::Post) => {
            let user = user_service(conn)?.create(body)?;
            Ok(ApiResponse::created(json!({
                "message": "New User added successfully",
                "user": user,
            })))
        }
        (Route::User(id), Method::Get) => Ok(ApiResponse::ok(json!(user_service(conn)?.get(id)?))),
        (Route::User(id), Method::Put) => {
            let user = user_service(conn)?.update(id, body)?;
            Ok(ApiResponse::ok(json!(user)))
        }
        (Route::User(id), Method::Delete) => {
            user_service(conn)?.delete(id)?;
            Ok(ApiResponse::ok(json!({
                "message": format!("successfully deleted user {id}"),
            })))
        }

        (Route::Products, Method::Get) => {
            let products = product_service(conn)?.list()?;
            Ok(ApiResponse::ok(json!(products)))
        }
        (Route::Products, Method::Post) => {
            let product = product_service(conn)?.create(body)?;
            Ok(ApiResponse::created(json!({
                "message": "New product added!",
                "product": product,
            })))
        }
        (Route::Product(id), Method::Get) => {
            Ok(ApiResponse::ok(json!(product_service(conn)?.get(id)?)))
        }
        (Route::Product(id), Method::Put) => {
            let product = product_service(conn)?.update(id, body)?;
            Ok(ApiResponse::ok(json!(product)))
        }
        (Route::Product(id), Method::Delete) => {
            product_service(conn)?.delete(id)?;
            Ok(ApiResponse::ok(json!({
                "message": format!("successfully deleted product {id}"),
            })))
        }

        (Route::Orders, Method::Post) => {
            let order = order_service(conn)?.create(body)?;
            Ok(ApiResponse::created(json!({
                "message": "New Order Placed!",
                "order": order,
            })))
        }
        (Route::Order(id), Method::Get) => Ok(ApiResponse::ok(json!(order_service(conn)?.get(id)?))),
        (
            Route::OrderAddProduct {
                order_id,
                product_id,
            },
            Method::Put,
        ) => {
            order_service(conn)?.attach_product(order_id, product_id)?;
            Ok(ApiResponse::ok(json!({
                "message": "Successfully added item to order.",
            })))
        }

        (route, method) => Ok(ApiResponse::method_not_allowed(
            method,
            &request.path,
            route.allowed_methods(),
        )),
    }
}

fn user_service(conn: &Connection) -> ServiceResult<UserService<SqliteUserRepository<'_>>> {
    Ok(UserService::new(SqliteUserRepository::try_new(conn)?))
}

fn product_service(
    conn: &Connection,
) -> ServiceResult<ProductService<SqliteProductRepository<'_>>> {
    Ok(ProductService::new(SqliteProductRepository::try_new(conn)?))
}

fn order_service(conn: &Connection) -> ServiceResult<OrderService<SqliteOrderRepository<'_>>> {
    Ok(OrderService::new(SqliteOrderRepository::try_new(conn)?))
}
