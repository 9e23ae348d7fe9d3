//! Catalog product record.

use serde::{Deserialize, Serialize};

pub type ProductId = i64;

pub const PRODUCT_NAME_MAX_LEN: usize = 225;

/// Persisted catalog entry.
///
/// `price` is a plain non-negative decimal; no currency or rounding contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
}

/// Validated create/replace payload for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
}
