//! Field schemas for each entity input.
//!
//! Every declared field is read even after an earlier one fails, so a single
//! response lists all problems.

use super::{FieldReader, Schema};
use crate::model::order::{OrderInput, ORDER_DATE_FORMAT};
use crate::model::product::{ProductInput, PRODUCT_NAME_MAX_LEN};
use crate::model::user::{UserInput, USER_ADDRESS_MAX_LEN, USER_EMAIL_MAX_LEN, USER_NAME_MAX_LEN};
use crate::model::EntityKind;

impl Schema for UserInput {
    const KIND: EntityKind = EntityKind::User;
    const FIELDS: &'static [&'static str] = &["name", "email", "address"];

    fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let name = reader.required_string("name", USER_NAME_MAX_LEN);
        let email = reader.optional_string("email", USER_EMAIL_MAX_LEN);
        let address = reader.optional_string("address", USER_ADDRESS_MAX_LEN);

        Some(Self {
            name: name?,
            email: email?,
            address: address?,
        })
    }
}

impl Schema for ProductInput {
    const KIND: EntityKind = EntityKind::Product;
    const FIELDS: &'static [&'static str] = &["name", "price"];

    fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let name = reader.required_text("name", PRODUCT_NAME_MAX_LEN);
        let price = reader.required_non_negative("price");

        Some(Self {
            name: name?,
            price: price?,
        })
    }
}

impl Schema for OrderInput {
    const KIND: EntityKind = EntityKind::Order;
    const FIELDS: &'static [&'static str] = &["order_date", "user_id"];

    fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let order_date = reader.required_date("order_date", ORDER_DATE_FORMAT);
        let user_id = reader.required_id("user_id");

        Some(Self {
            order_date: order_date?,
            user_id: user_id?,
        })
    }
}
