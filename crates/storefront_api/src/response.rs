//! Response envelope and error-to-status mapping.
//!
//! | error | status |
//! |---|---|
//! | `Validation` | 400, `{"errors": {field: [..]}}` |
//! | `Referential`, `Conflict` | 400, `{"message": ..}` |
//! | `NotFound` | 404, `{"message": ..}` |
//! | `Repo` | 500, `{"message": ..}` |

use crate::router::Method;
use log::error;
use serde_json::{json, Value};
use storefront_core::{EntityKind, ServiceError};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: STATUS_OK,
            body,
        }
    }

    pub fn created(body: Value) -> Self {
        Self {
            status: STATUS_CREATED,
            body,
        }
    }

    /// `{"message": message}` with the given status.
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "message": message.into() }),
        }
    }

    pub fn route_not_found(path: &str) -> Self {
        Self::message(STATUS_NOT_FOUND, format!("No route for `{path}`"))
    }

    pub fn method_not_allowed(method: Method, path: &str, allowed: &[Method]) -> Self {
        let allowed = allowed
            .iter()
            .map(Method::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self::message(
            STATUS_METHOD_NOT_ALLOWED,
            format!("Method {method} not allowed on `{path}`; allowed: {allowed}"),
        )
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<ServiceError> for ApiResponse {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(errors) => Self {
                status: STATUS_BAD_REQUEST,
                body: json!({ "errors": errors }),
            },
            ServiceError::NotFound { entity, id } => {
                Self::message(STATUS_NOT_FOUND, not_found_message(entity, id))
            }
            ServiceError::Referential(message) | ServiceError::Conflict(message) => {
                Self::message(STATUS_BAD_REQUEST, message)
            }
            ServiceError::Repo(err) => {
                error!("event=api_request module=api status=error error_code=storage_failed error={err}");
                Self::message(STATUS_INTERNAL_ERROR, format!("Storage failure: {err}"))
            }
        }
    }
}

fn not_found_message(entity: EntityKind, id: i64) -> String {
    match entity {
        EntityKind::User => format!("User {id} not found"),
        EntityKind::Product => format!("Product {id} not found"),
        EntityKind::Order => format!("Order {id} not found"),
    }
}
