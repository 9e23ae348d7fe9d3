//! Storefront domain model.
//!
//! # Responsibility
//! - Define persisted entities (`User`, `Product`, `Order`) and their
//!   validated input shapes.
//! - Hold column limits shared by validation and schema.
//!
//! # Invariants
//! - Entity ids are assigned by the store and never by callers.
//! - Input shapes carry no id; they are full-replace payloads.

use std::fmt::{Display, Formatter};

pub mod order;
pub mod product;
pub mod user;

/// Entity families known by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Product,
    Order,
}

impl EntityKind {
    /// Lowercase label used in messages and log events.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Product => "product",
            Self::Order => "order",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
