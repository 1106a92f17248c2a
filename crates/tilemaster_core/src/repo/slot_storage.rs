//! Slot persistence contract and SQLite implementation.
//!
//! # Responsibility
//! - Read and write opaque payloads under a fixed slot name.
//! - Keep SQL details inside the persistence boundary, so record stores can
//!   move to another backend without changes.
//!
//! # Invariants
//! - A slot holds at most one payload; writes overwrite it whole.
//! - `SqliteSlotStorage` only accepts fully migrated connections.

use crate::db::migrations::{current_user_version, latest_version};
use crate::repo::record_store::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};

const SLOTS_TABLE: &str = "kv_slots";
const REQUIRED_SLOT_COLUMNS: &[&str] = &["slot", "payload", "updated_at"];

/// Local key-value storage addressed by slot name.
pub trait SlotStorage {
    /// Returns the stored payload, or `None` when the slot was never written.
    fn read_slot(&self, slot: &str) -> StoreResult<Option<Vec<u8>>>;
    /// Replaces the payload stored under `slot`.
    fn write_slot(&self, slot: &str, payload: &[u8]) -> StoreResult<()>;
}

impl<T: SlotStorage + ?Sized> SlotStorage for &T {
    fn read_slot(&self, slot: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).read_slot(slot)
    }

    fn write_slot(&self, slot: &str, payload: &[u8]) -> StoreResult<()> {
        (**self).write_slot(slot, payload)
    }
}

/// SQLite-backed slot storage over the `kv_slots` table.
#[derive(Clone, Copy)]
pub struct SqliteSlotStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStorage<'conn> {
    /// Wraps a connection after checking its schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this binary expects.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_slots_schema(conn)?;
        Ok(Self { conn })
    }
}

impl SlotStorage for SqliteSlotStorage<'_> {
    fn read_slot(&self, slot: &str) -> StoreResult<Option<Vec<u8>>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM kv_slots WHERE slot = ?1;",
                [slot],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_slot(&self, slot: &str, payload: &[u8]) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (slot, payload) VALUES (?1, ?2)
             ON CONFLICT(slot) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![slot, payload],
        )?;
        Ok(())
    }
}

fn ensure_slots_schema(conn: &Connection) -> StoreResult<()> {
    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [SLOTS_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(StoreError::MissingRequiredTable(SLOTS_TABLE));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(kv_slots);")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;

    for required in REQUIRED_SLOT_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            return Err(StoreError::MissingRequiredColumn {
                table: SLOTS_TABLE,
                column: *required,
            });
        }
    }

    Ok(())
}
