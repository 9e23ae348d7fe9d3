//! Entity use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, existence checks and repository calls per
//!   operation.
//! - Translate repository failures into the storefront error taxonomy.
//!
//! # Invariants
//! - Validation failures never reach the repository.
//! - Direct-id misses are `NotFound`; missing foreign references are
//!   `Referential`; duplicate associations and blocked deletes are
//!   `Conflict`.

use crate::model::EntityKind;
use crate::repo::RepoError;
use crate::validation::FieldErrors;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod order_service;
pub mod product_service;
pub mod user_service;

pub const MSG_INVALID_USER_ID: &str = "Invalid user id";
pub const MSG_INVALID_ORDER_OR_PRODUCT: &str = "Invalid order id or product id.";
pub const MSG_ALREADY_INCLUDED: &str = "Item is already included in this order.";
pub const MSG_USER_HAS_ORDERS: &str = "User has existing orders and cannot be deleted.";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error taxonomy shared by all entity services.
#[derive(Debug)]
pub enum ServiceError {
    /// Payload failed field validation; nothing was written.
    Validation(FieldErrors),
    /// Direct lookup by primary key found no row.
    NotFound { entity: EntityKind, id: i64 },
    /// A required foreign reference does not exist.
    Referential(String),
    /// The request conflicts with stored state.
    Conflict(String),
    /// Storage failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "validation failed: {errors}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Referential(message) => f.write_str(message),
            Self::Conflict(message) => f.write_str(message),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}
