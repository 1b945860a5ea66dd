//! Pin/admin store use-case service.
//!
//! # Responsibility
//! - Provide the single CRUD entry point the request-handling layer talks to.
//! - Apply domain rules that span entities and storage, like the event-glyph
//!   remap on pin insertion.
//!
//! # Invariants
//! - Every public operation constructs a fresh repository over the injected
//!   connection and performs exactly one unit of work; nothing is shared
//!   across calls.
//! - Service APIs never bypass repository validation or transaction
//!   contracts.

use crate::model::admin::{Admin, AdminId};
use crate::model::pin::{event_icon, Pin, PinId};
use crate::repo::admin_repo::{AdminRepository, SqliteAdminRepository};
use crate::repo::pin_repo::{PinRepository, SqlitePinRepository};
use crate::repo::RepoResult;
use rusqlite::Connection;

/// Use-case service mediating all pin and admin storage access.
///
/// Callers supply a migrated connection once at construction; each operation
/// then opens its own transactional scope and releases it before returning.
pub struct StoreService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> StoreService<'conn> {
    /// Creates a service over a migrated, ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Persists a new pin and returns the storage-assigned id.
    ///
    /// Pins carrying a complete date range are events: their icon code is
    /// remapped to the event glyph at the same logical slot before the row
    /// is written. Location pins keep their icon unchanged.
    pub fn insert_pin(&mut self, pin: &Pin) -> RepoResult<PinId> {
        let mut repo = SqlitePinRepository::try_new(self.conn)?;
        if pin.has_date_range() {
            let mut staged = pin.clone();
            staged.set_icon_id(event_icon(pin.record().icon_id));
            repo.insert(&staged)
        } else {
            repo.insert(pin)
        }
    }

    /// Overwrites every mapped field of an existing pin row.
    pub fn update_pin(&mut self, pin: &Pin) -> RepoResult<()> {
        SqlitePinRepository::try_new(self.conn)?.update(pin)
    }

    /// Removes an existing pin row.
    pub fn delete_pin(&mut self, pin: &Pin) -> RepoResult<()> {
        SqlitePinRepository::try_new(self.conn)?.delete(pin)
    }

    /// Fetches one pin by id; absence is a normal outcome.
    pub fn get_pin(&mut self, id: PinId) -> RepoResult<Option<Pin>> {
        SqlitePinRepository::try_new(self.conn)?.get(id)
    }

    /// Fetches one pin whose presence the caller has already established.
    pub fn load_pin(&mut self, id: PinId) -> RepoResult<Pin> {
        SqlitePinRepository::try_new(self.conn)?.load(id)
    }

    /// Returns every pin in storage-determined order.
    pub fn all_pins(&mut self) -> RepoResult<Vec<Pin>> {
        SqlitePinRepository::try_new(self.conn)?.all()
    }

    /// Returns the total pin row count.
    pub fn pin_count(&mut self) -> RepoResult<u64> {
        SqlitePinRepository::try_new(self.conn)?.count()
    }

    /// Persists a new admin account and returns the storage-assigned id.
    pub fn insert_admin(&mut self, admin: &Admin) -> RepoResult<AdminId> {
        SqliteAdminRepository::try_new(self.conn)?.insert(admin)
    }

    /// Overwrites both credential fields of an existing account.
    pub fn update_admin(&mut self, admin: &Admin) -> RepoResult<()> {
        SqliteAdminRepository::try_new(self.conn)?.update(admin)
    }

    /// Removes an existing admin account.
    pub fn delete_admin(&mut self, admin: &Admin) -> RepoResult<()> {
        SqliteAdminRepository::try_new(self.conn)?.delete(admin)
    }

    /// Fetches one account by id; absence is a normal outcome.
    pub fn get_admin(&mut self, id: AdminId) -> RepoResult<Option<Admin>> {
        SqliteAdminRepository::try_new(self.conn)?.get(id)
    }

    /// Fetches one account whose presence the caller has already
    /// established.
    pub fn load_admin(&mut self, id: AdminId) -> RepoResult<Admin> {
        SqliteAdminRepository::try_new(self.conn)?.load(id)
    }

    /// Credential verification lookup: exact simultaneous match on both
    /// fields, or an absent result.
    pub fn admin_by_credentials(
        &mut self,
        username: &str,
        password: &str,
    ) -> RepoResult<Option<Admin>> {
        SqliteAdminRepository::try_new(self.conn)?.find_by_credentials(username, password)
    }
}
