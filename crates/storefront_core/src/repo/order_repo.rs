//! Order and order/product association persistence.
//!
//! # Responsibility
//! - Insert and read order headers.
//! - Own association writes for `order_products`.
//! - Answer existence lookups for the entities an order references.
//!
//! # Invariants
//! - `(order_id, product_id)` is the primary key of `order_products`; the
//!   store, not the caller, guarantees a pair is stored at most once.
//! - `attach_product` never fails on an existing pair; it reports it.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::order::{AttachOutcome, Order, OrderId, OrderInput, ORDER_DATE_FORMAT};
use crate::model::product::ProductId;
use crate::model::user::UserId;
use crate::model::EntityKind;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const ORDER_SELECT_SQL: &str = "SELECT
    id,
    order_date,
    user_id
FROM orders";

/// Repository interface for orders and their product associations.
pub trait OrderRepository {
    fn create_order(&self, input: &OrderInput) -> RepoResult<Order>;
    fn get_order(&self, id: OrderId) -> RepoResult<Option<Order>>;
    /// Product ids attached to one order, ascending.
    fn list_product_ids(&self, order_id: OrderId) -> RepoResult<Vec<ProductId>>;
    /// Inserts the pair unless it is already stored.
    fn attach_product(&self, order_id: OrderId, product_id: ProductId)
        -> RepoResult<AttachOutcome>;
    fn user_exists(&self, user_id: UserId) -> RepoResult<bool>;
    fn product_exists(&self, product_id: ProductId) -> RepoResult<bool>;
}

/// SQLite-backed order repository.
pub struct SqliteOrderRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrderRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users", "products", "orders", "order_products"])?;
        Ok(Self { conn })
    }
}

impl OrderRepository for SqliteOrderRepository<'_> {
    fn create_order(&self, input: &OrderInput) -> RepoResult<Order> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO orders (order_date, user_id) VALUES (?1, ?2);",
            params![
                input.order_date.format(ORDER_DATE_FORMAT).to_string(),
                input.user_id,
            ],
        )?;
        let id = tx.last_insert_rowid();
        let order = load_order(&tx, id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Order,
            id,
        })?;
        tx.commit()?;
        Ok(order)
    }

    fn get_order(&self, id: OrderId) -> RepoResult<Option<Order>> {
        load_order(self.conn, id)
    }

    fn list_product_ids(&self, order_id: OrderId) -> RepoResult<Vec<ProductId>> {
        let mut stmt = self.conn.prepare(
            "SELECT product_id
             FROM order_products
             WHERE order_id = ?1
             ORDER BY product_id ASC;",
        )?;
        let mut rows = stmt.query([order_id])?;
        let mut product_ids = Vec::new();
        while let Some(row) = rows.next()? {
            product_ids.push(row.get(0)?);
        }
        Ok(product_ids)
    }

    fn attach_product(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> RepoResult<AttachOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO order_products (order_id, product_id) VALUES (?1, ?2);",
            params![order_id, product_id],
        )?;
        tx.commit()?;

        Ok(if inserted == 0 {
            AttachOutcome::AlreadyIncluded
        } else {
            AttachOutcome::Attached
        })
    }

    fn user_exists(&self, user_id: UserId) -> RepoResult<bool> {
        row_exists(self.conn, "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);", user_id)
    }

    fn product_exists(&self, product_id: ProductId) -> RepoResult<bool> {
        row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1);",
            product_id,
        )
    }
}

fn row_exists(conn: &Connection, sql: &str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
    Ok(exists == 1)
}

fn load_order(conn: &Connection, id: OrderId) -> RepoResult<Option<Order>> {
    let mut stmt = conn.prepare(&format!("{ORDER_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_order_row(row)?));
    }
    Ok(None)
}

fn parse_order_row(row: &Row<'_>) -> RepoResult<Order> {
    let date_text: String = row.get("order_date")?;
    let order_date = NaiveDate::parse_from_str(&date_text, ORDER_DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date value `{date_text}` in orders.order_date"
        ))
    })?;

    Ok(Order {
        id: row.get("id")?,
        order_date,
        user_id: row.get("user_id")?,
    })
}
