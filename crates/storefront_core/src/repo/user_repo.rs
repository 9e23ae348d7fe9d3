//! User repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `update_user` replaces `name`, `email` and `address` as a whole.
//! - Deleting a user that still owns orders is rejected by the store
//!   (`ON DELETE RESTRICT`) and surfaces as a constraint violation.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::user::{User, UserId, UserInput};
use crate::model::EntityKind;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    address
FROM users";

/// Repository interface for user CRUD operations.
pub trait UserRepository {
    /// Returns all users in insertion (id) order.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Inserts one user and returns it with its store-assigned id.
    fn create_user(&self, input: &UserInput) -> RepoResult<User>;
    /// Overwrites all mutable columns; `NotFound` when the row is absent.
    fn update_user(&self, id: UserId, input: &UserInput) -> RepoResult<User>;
    /// Removes one user; `NotFound` when the row is absent.
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
    /// Number of orders whose `user_id` points at this user.
    fn count_orders(&self, id: UserId) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users", "orders"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        load_user(self.conn, id)
    }

    fn create_user(&self, input: &UserInput) -> RepoResult<User> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO users (name, email, address) VALUES (?1, ?2, ?3);",
            params![
                input.name.as_str(),
                input.email.as_deref(),
                input.address.as_deref(),
            ],
        )?;
        let user = load_required_user(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(user)
    }

    fn update_user(&self, id: UserId, input: &UserInput) -> RepoResult<User> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE users
             SET
                name = ?2,
                email = ?3,
                address = ?4
             WHERE id = ?1;",
            params![
                id,
                input.name.as_str(),
                input.email.as_deref(),
                input.address.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::User,
                id,
            });
        }

        let user = load_required_user(&tx, id)?;
        tx.commit()?;
        Ok(user)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::User,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn count_orders(&self, id: UserId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM orders WHERE user_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative order count `{count}`")))
    }
}

fn load_user(conn: &Connection, id: UserId) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_user_row(row)?));
    }
    Ok(None)
}

fn load_required_user(conn: &Connection, id: UserId) -> RepoResult<User> {
    load_user(conn, id)?.ok_or(RepoError::NotFound {
        entity: EntityKind::User,
        id,
    })
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        address: row.get("address")?,
    })
}
