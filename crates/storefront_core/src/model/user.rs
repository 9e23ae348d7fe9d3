//! Customer record.

use serde::{Deserialize, Serialize};

pub type UserId = i64;

pub const USER_NAME_MAX_LEN: usize = 200;
pub const USER_ADDRESS_MAX_LEN: usize = 200;
pub const USER_EMAIL_MAX_LEN: usize = 200;

/// Persisted customer. Parent of zero or more orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Validated create/replace payload for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
}
