//! User use-case service.
//!
//! # Invariants
//! - `update` checks existence before validating, so a missing id is always
//!   reported as `NotFound` and nothing is written.
//! - `delete` refuses users that still own orders.

use super::{ServiceError, ServiceResult, MSG_USER_HAS_ORDERS};
use crate::model::user::{User, UserId, UserInput};
use crate::model::EntityKind;
use crate::repo::user_repo::UserRepository;
use crate::validation::validate;
use log::info;
use serde_json::Value;

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every user, insertion order.
    pub fn list(&self) -> ServiceResult<Vec<User>> {
        self.repo.list_users().map_err(Into::into)
    }

    pub fn get(&self, id: UserId) -> ServiceResult<User> {
        self.repo.get_user(id)?.ok_or(ServiceError::NotFound {
            entity: EntityKind::User,
            id,
        })
    }

    /// Validates `payload` and persists a new user.
    pub fn create(&self, payload: &Value) -> ServiceResult<User> {
        let input = validate::<UserInput>(payload)?.value;
        let user = self.repo.create_user(&input)?;
        info!(
            "event=user_create module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Replaces `name`, `email` and `address` of an existing user.
    ///
    /// Optional fields omitted from `payload` are cleared.
    pub fn update(&self, id: UserId, payload: &Value) -> ServiceResult<User> {
        self.get(id)?;
        let input = validate::<UserInput>(payload)?.value;
        let user = self.repo.update_user(id, &input)?;
        info!("event=user_update module=service status=ok user_id={id}");
        Ok(user)
    }

    pub fn delete(&self, id: UserId) -> ServiceResult<()> {
        self.get(id)?;

        let order_count = self.repo.count_orders(id)?;
        if order_count > 0 {
            info!(
                "event=user_delete module=service status=rejected user_id={id} order_count={order_count}"
            );
            return Err(ServiceError::Conflict(MSG_USER_HAS_ORDERS.to_string()));
        }

        match self.repo.delete_user(id) {
            Ok(()) => {
                info!("event=user_delete module=service status=ok user_id={id}");
                Ok(())
            }
            // An order may have been created between the count and the delete.
            Err(err) if err.is_constraint_violation() => {
                Err(ServiceError::Conflict(MSG_USER_HAS_ORDERS.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
