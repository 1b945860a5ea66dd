//! Admin repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide account CRUD and credential lookup over the `admins` table.
//!
//! # Invariants
//! - Credential lookup matches username and password simultaneously and
//!   yields at most one account.
//! - Every mutating call runs inside one immediate transaction that commits
//!   before the call returns.

use crate::model::admin::{Admin, AdminId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, Row, TransactionBehavior};

const ADMIN_SELECT_SQL: &str = "SELECT id, username, password FROM admins";

const ADMIN_COLUMNS: &[&str] = &["id", "username", "password"];

/// Repository interface for admin-account operations.
pub trait AdminRepository {
    /// Persists a new account and returns the storage-assigned id.
    fn insert(&mut self, admin: &Admin) -> RepoResult<AdminId>;
    /// Overwrites both credential fields of the row keyed by the admin's id.
    fn update(&mut self, admin: &Admin) -> RepoResult<()>;
    /// Removes the row keyed by the admin's id.
    fn delete(&mut self, admin: &Admin) -> RepoResult<()>;
    /// Fetches one account by id; absence is a normal outcome.
    fn get(&self, id: AdminId) -> RepoResult<Option<Admin>>;
    /// Fetches one account whose presence the caller has already
    /// established; absence is a `NotFound` error.
    fn load(&self, id: AdminId) -> RepoResult<Admin>;
    /// Exact simultaneous match on both fields; zero matches and an invalid
    /// combination are the same absent result.
    fn find_by_credentials(&self, username: &str, password: &str) -> RepoResult<Option<Admin>>;
}

/// SQLite-backed admin repository.
pub struct SqliteAdminRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteAdminRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "admins", ADMIN_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl AdminRepository for SqliteAdminRepository<'_> {
    fn insert(&mut self, admin: &Admin) -> RepoResult<AdminId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO admins (username, password) VALUES (?1, ?2);",
            params![admin.username.as_str(), admin.password.as_str()],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!("event=admin_insert module=repo status=ok id={id}");
        Ok(id)
    }

    fn update(&mut self, admin: &Admin) -> RepoResult<()> {
        let id = admin.id.ok_or(RepoError::MissingId)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE admins SET username = ?1, password = ?2 WHERE id = ?3;",
            params![admin.username.as_str(), admin.password.as_str(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        info!("event=admin_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete(&mut self, admin: &Admin) -> RepoResult<()> {
        let id = admin.id.ok_or(RepoError::MissingId)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM admins WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        info!("event=admin_delete module=repo status=ok id={id}");
        Ok(())
    }

    fn get(&self, id: AdminId) -> RepoResult<Option<Admin>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ADMIN_SELECT_SQL}
             WHERE id = ?1;"
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_admin_row(row)?));
        }

        Ok(None)
    }

    fn load(&self, id: AdminId) -> RepoResult<Admin> {
        self.get(id)?.ok_or(RepoError::NotFound(id))
    }

    fn find_by_credentials(&self, username: &str, password: &str) -> RepoResult<Option<Admin>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ADMIN_SELECT_SQL}
             WHERE username = ?1 AND password = ?2;"
        ))?;

        let mut rows = stmt.query(params![username, password])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_admin_row(row)?));
        }

        Ok(None)
    }
}

fn parse_admin_row(row: &Row<'_>) -> RepoResult<Admin> {
    Ok(Admin {
        id: Some(row.get("id")?),
        username: row.get("username")?,
        password: row.get("password")?,
    })
}
