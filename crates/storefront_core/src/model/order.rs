//! Order record and its product association.
//!
//! # Invariants
//! - `user_id` referenced an existing user when the order was created.
//! - An `(order_id, product_id)` pair is attached at most once.
//! - Attaching products never changes the order itself; there is no status.

use crate::model::product::ProductId;
use crate::model::user::UserId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type OrderId = i64;

/// Wire and storage format of `order_date`.
pub const ORDER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Serialized as `YYYY-MM-DD`.
    pub order_date: NaiveDate,
    pub user_id: UserId,
}

/// Validated create payload for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInput {
    pub order_date: NaiveDate,
    pub user_id: UserId,
}

/// Order header plus the ids of its attached products, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub product_ids: Vec<ProductId>,
}

/// Result of inserting an association pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// A new `(order_id, product_id)` row was written.
    Attached,
    /// The pair already existed; nothing was written.
    AlreadyIncluded,
}
