//! Pin repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the canonical `locations` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Pin::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every mutating call runs inside one immediate transaction that commits
//!   before the call returns; the assigned identity is logged post-commit.

use crate::model::pin::{Pin, PinId, PinKind, PinRecord};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, Row, TransactionBehavior};

const PIN_SELECT_SQL: &str = "SELECT
    id,
    iconid,
    name,
    street,
    town,
    state,
    zip,
    coord,
    content,
    dateStart,
    dateEnd,
    thumbnail,
    link,
    api
FROM locations";

const PIN_COLUMNS: &[&str] = &[
    "id",
    "iconid",
    "name",
    "street",
    "town",
    "state",
    "zip",
    "coord",
    "content",
    "dateStart",
    "dateEnd",
    "thumbnail",
    "link",
    "api",
];

/// Repository interface for pin CRUD operations.
pub trait PinRepository {
    /// Persists a new row and returns the storage-assigned id. Any id
    /// already present on the pin is ignored.
    fn insert(&mut self, pin: &Pin) -> RepoResult<PinId>;
    /// Overwrites every mapped field of the row keyed by the pin's id.
    fn update(&mut self, pin: &Pin) -> RepoResult<()>;
    /// Removes the row keyed by the pin's id.
    fn delete(&mut self, pin: &Pin) -> RepoResult<()>;
    /// Fetches one pin by id; absence is a normal outcome, not an error.
    fn get(&self, id: PinId) -> RepoResult<Option<Pin>>;
    /// Fetches one pin whose presence the caller has already established;
    /// absence is a `NotFound` error.
    fn load(&self, id: PinId) -> RepoResult<Pin>;
    /// Returns every pin row. Order is storage-determined and must not be
    /// relied upon.
    fn all(&self) -> RepoResult<Vec<Pin>>;
    /// Returns the total number of rows, independent of any filter.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed pin repository.
pub struct SqlitePinRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePinRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "locations", PIN_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl PinRepository for SqlitePinRepository<'_> {
    fn insert(&mut self, pin: &Pin) -> RepoResult<PinId> {
        pin.validate()?;
        let record = pin.record();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO locations (
                iconid,
                name,
                street,
                town,
                state,
                zip,
                coord,
                content,
                dateStart,
                dateEnd,
                thumbnail,
                link,
                api
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                record.icon_id,
                record.name.as_str(),
                record.street.as_str(),
                record.town.as_str(),
                record.state.as_str(),
                record.zip.as_str(),
                record.coordinates.as_str(),
                record.content.as_str(),
                record.start_date.as_deref(),
                record.end_date.as_deref(),
                record.thumbnail.as_str(),
                record.link.as_str(),
                bool_to_int(record.api_sourced),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!("event=pin_insert module=repo status=ok id={id}");
        Ok(id)
    }

    fn update(&mut self, pin: &Pin) -> RepoResult<()> {
        pin.validate()?;
        let record = pin.record();
        let id = record.id.ok_or(RepoError::MissingId)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE locations
             SET
                iconid = ?1,
                name = ?2,
                street = ?3,
                town = ?4,
                state = ?5,
                zip = ?6,
                coord = ?7,
                content = ?8,
                dateStart = ?9,
                dateEnd = ?10,
                thumbnail = ?11,
                link = ?12,
                api = ?13
             WHERE id = ?14;",
            params![
                record.icon_id,
                record.name.as_str(),
                record.street.as_str(),
                record.town.as_str(),
                record.state.as_str(),
                record.zip.as_str(),
                record.coordinates.as_str(),
                record.content.as_str(),
                record.start_date.as_deref(),
                record.end_date.as_deref(),
                record.thumbnail.as_str(),
                record.link.as_str(),
                bool_to_int(record.api_sourced),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        info!("event=pin_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete(&mut self, pin: &Pin) -> RepoResult<()> {
        let id = pin.id().ok_or(RepoError::MissingId)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM locations WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        info!("event=pin_delete module=repo status=ok id={id}");
        Ok(())
    }

    fn get(&self, id: PinId) -> RepoResult<Option<Pin>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PIN_SELECT_SQL}
             WHERE id = ?1;"
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pin_row(row)?));
        }

        Ok(None)
    }

    fn load(&self, id: PinId) -> RepoResult<Pin> {
        self.get(id)?.ok_or(RepoError::NotFound(id))
    }

    fn all(&self) -> RepoResult<Vec<Pin>> {
        // No ORDER BY: the sequence is storage-determined by contract.
        let mut stmt = self.conn.prepare(&format!("{PIN_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut pins = Vec::new();

        while let Some(row) = rows.next()? {
            pins.push(parse_pin_row(row)?);
        }

        Ok(pins)
    }

    fn count(&self) -> RepoResult<u64> {
        let total = self
            .conn
            .query_row("SELECT COUNT(*) FROM locations;", [], |row| {
                row.get::<_, u64>(0)
            })?;
        Ok(total)
    }
}

/// Materializes one row as the storage-facing generic representation.
fn parse_pin_row(row: &Row<'_>) -> RepoResult<Pin> {
    let api_sourced = match row.get::<_, i64>("api")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid api flag `{other}` in locations.api"
            )));
        }
    };

    let record = PinRecord {
        id: Some(row.get("id")?),
        icon_id: row.get("iconid")?,
        name: row.get("name")?,
        street: row.get("street")?,
        town: row.get("town")?,
        state: row.get("state")?,
        zip: row.get("zip")?,
        coordinates: row.get("coord")?,
        content: row.get("content")?,
        start_date: row.get("dateStart")?,
        end_date: row.get("dateEnd")?,
        thumbnail: row.get("thumbnail")?,
        link: row.get("link")?,
        api_sourced,
    };

    let pin = Pin::from_record(PinKind::Generic, record);
    pin.validate()?;
    Ok(pin)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
