//! Core domain logic for the storefront: users, products, orders and the
//! order/product association.
//! This crate owns validation, referential rules and persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::order::{AttachOutcome, Order, OrderDetail, OrderId, OrderInput};
pub use model::product::{Product, ProductId, ProductInput};
pub use model::user::{User, UserId, UserInput};
pub use model::EntityKind;
pub use repo::order_repo::{OrderRepository, SqliteOrderRepository};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::order_service::OrderService;
pub use service::product_service::ProductService;
pub use service::user_service::UserService;
pub use service::{ServiceError, ServiceResult};
pub use validation::{validate, FieldErrors, Schema, Validated};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
