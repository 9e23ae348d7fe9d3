//! Product repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Deleting a product removes its order associations in the same
//!   transaction (`ON DELETE CASCADE` on `order_products.product_id`).
//! - Persisted prices are finite and non-negative; rows violating that are
//!   reported as invalid data instead of being returned.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::product::{Product, ProductId, ProductInput};
use crate::model::EntityKind;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    price
FROM products";

/// Repository interface for product CRUD operations.
pub trait ProductRepository {
    fn list_products(&self) -> RepoResult<Vec<Product>>;
    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn create_product(&self, input: &ProductInput) -> RepoResult<Product>;
    fn update_product(&self, id: ProductId, input: &ProductInput) -> RepoResult<Product>;
    /// Removes one product together with its association rows.
    fn delete_product(&self, id: ProductId) -> RepoResult<()>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["products", "order_products"])?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn list_products(&self) -> RepoResult<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }
        Ok(products)
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        load_product(self.conn, id)
    }

    fn create_product(&self, input: &ProductInput) -> RepoResult<Product> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO products (name, price) VALUES (?1, ?2);",
            params![input.name.as_str(), input.price],
        )?;
        let product = load_required_product(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(product)
    }

    fn update_product(&self, id: ProductId, input: &ProductInput) -> RepoResult<Product> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE products
             SET
                name = ?2,
                price = ?3
             WHERE id = ?1;",
            params![id, input.name.as_str(), input.price],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Product,
                id,
            });
        }

        let product = load_required_product(&tx, id)?;
        tx.commit()?;
        Ok(product)
    }

    fn delete_product(&self, id: ProductId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM products WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Product,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }
}

fn load_product(conn: &Connection, id: ProductId) -> RepoResult<Option<Product>> {
    let mut stmt = conn.prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_product_row(row)?));
    }
    Ok(None)
}

fn load_required_product(conn: &Connection, id: ProductId) -> RepoResult<Product> {
    load_product(conn, id)?.ok_or(RepoError::NotFound {
        entity: EntityKind::Product,
        id,
    })
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let id: ProductId = row.get("id")?;
    let price: f64 = row.get("price")?;
    if !price.is_finite() || price < 0.0 {
        return Err(RepoError::InvalidData(format!(
            "invalid price `{price}` in products.price for id {id}"
        )));
    }

    Ok(Product {
        id,
        name: row.get("name")?,
        price,
    })
}
