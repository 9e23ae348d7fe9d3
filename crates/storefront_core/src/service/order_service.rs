//! Order use-case service.
//!
//! # Responsibility
//! - Create orders for existing users.
//! - Attach products to existing orders, once per pair.
//!
//! # Invariants
//! - `attach_product` evaluates, in order: order and product existence,
//!   pair membership, then mutation. Existence errors win over duplicates.
//! - Both the existence error and the duplicate error leave storage untouched.

use super::{
    ServiceError, ServiceResult, MSG_ALREADY_INCLUDED, MSG_INVALID_ORDER_OR_PRODUCT,
    MSG_INVALID_USER_ID,
};
use crate::model::order::{AttachOutcome, Order, OrderDetail, OrderId, OrderInput};
use crate::model::product::ProductId;
use crate::model::EntityKind;
use crate::repo::order_repo::OrderRepository;
use crate::validation::validate;
use log::info;
use serde_json::Value;

/// Order service facade over repository implementations.
pub struct OrderService<R: OrderRepository> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates `payload` and creates an order with no products.
    ///
    /// Fails `Referential` when `user_id` does not name a stored user.
    pub fn create(&self, payload: &Value) -> ServiceResult<Order> {
        let input = validate::<OrderInput>(payload)?.value;
        if !self.repo.user_exists(input.user_id)? {
            info!(
                "event=order_create module=service status=rejected reason=unknown_user user_id={}",
                input.user_id
            );
            return Err(ServiceError::Referential(MSG_INVALID_USER_ID.to_string()));
        }

        let order = match self.repo.create_order(&input) {
            Ok(order) => order,
            // The user was deleted between the lookup and the insert.
            Err(err) if err.is_constraint_violation() => {
                return Err(ServiceError::Referential(MSG_INVALID_USER_ID.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        info!(
            "event=order_create module=service status=ok order_id={} user_id={}",
            order.id, order.user_id
        );
        Ok(order)
    }

    /// Returns the order with its attached product ids.
    pub fn get(&self, id: OrderId) -> ServiceResult<OrderDetail> {
        let order = self.repo.get_order(id)?.ok_or(ServiceError::NotFound {
            entity: EntityKind::Order,
            id,
        })?;
        let product_ids = self.repo.list_product_ids(id)?;
        Ok(OrderDetail { order, product_ids })
    }

    /// Associates `product_id` with `order_id`.
    ///
    /// # Errors
    /// - `Referential` when the order, the product, or both are missing.
    /// - `Conflict` when the pair is already associated.
    pub fn attach_product(&self, order_id: OrderId, product_id: ProductId) -> ServiceResult<()> {
        let order_exists = self.repo.get_order(order_id)?.is_some();
        let product_exists = self.repo.product_exists(product_id)?;
        if !(order_exists && product_exists) {
            info!(
                "event=order_attach_product module=service status=rejected reason=unknown_reference order_id={order_id} product_id={product_id}"
            );
            return Err(ServiceError::Referential(
                MSG_INVALID_ORDER_OR_PRODUCT.to_string(),
            ));
        }

        let outcome = match self.repo.attach_product(order_id, product_id) {
            Ok(outcome) => outcome,
            // Order or product removed after the existence checks.
            Err(err) if err.is_constraint_violation() => {
                return Err(ServiceError::Referential(
                    MSG_INVALID_ORDER_OR_PRODUCT.to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        match outcome {
            AttachOutcome::Attached => {
                info!(
                    "event=order_attach_product module=service status=ok order_id={order_id} product_id={product_id}"
                );
                Ok(())
            }
            AttachOutcome::AlreadyIncluded => {
                info!(
                    "event=order_attach_product module=service status=rejected reason=already_included order_id={order_id} product_id={product_id}"
                );
                Err(ServiceError::Conflict(MSG_ALREADY_INCLUDED.to_string()))
            }
        }
    }
}
