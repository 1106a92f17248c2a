//! Generic in-memory record store with full-collection slot persistence.
//!
//! # Responsibility
//! - Provide add/update/delete/list over one record type.
//! - Serialize the whole collection to the record's slot after every
//!   successful mutation.
//! - Load the collection once when the store opens.
//!
//! # Invariants
//! - `list()` preserves insertion order; updates replace in place.
//! - Identifiers are unique within a store.
//! - Missing or undecodable slot payloads load as an empty collection.
//! - A collection holding a non-finite amount is never written; JSON has no
//!   encoding for it and the stored slot would stop decoding.
//! - Unknown identifiers are reported through return values, never errors.

use crate::db::DbError;
use crate::model::customer::Customer;
use crate::model::order::Order;
use crate::model::service_offering::ServiceOffering;
use crate::model::RecordId;
use crate::repo::slot_storage::SlotStorage;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from slot persistence and record store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Collection could not be serialized for its slot.
    Encode {
        slot: &'static str,
        source: serde_json::Error,
    },
    /// A record field holds NaN or an infinity and cannot be persisted.
    NonFiniteAmount {
        slot: &'static str,
        id: RecordId,
        field: &'static str,
    },
    /// `add` was given an explicit id that already exists in the store.
    DuplicateId(RecordId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { slot, source } => {
                write!(f, "failed to encode `{slot}` collection: {source}")
            }
            Self::NonFiniteAmount { slot, id, field } => write!(
                f,
                "`{field}` of record {id} in `{slot}` is not a finite number"
            ),
            Self::DuplicateId(id) => write!(f, "record id already exists: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "slot storage requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "slot storage requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "slot storage requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
            Self::NonFiniteAmount { .. } => None,
            Self::DuplicateId(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// A record type that can live in a `RecordStore`.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Storage slot holding the full collection of this record type.
    const SLOT: &'static str;

    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);

    /// Hook run on a record right before it is appended.
    fn prepare_insert(&mut self) {}

    /// Hook run on a replacement right before it overwrites `previous`.
    fn prepare_replace(&mut self, _previous: &Self) {}

    /// Numeric fields persisted as JSON numbers, by field name.
    fn amounts(&self) -> Vec<(&'static str, f64)> {
        Vec::new()
    }
}

/// Result of `RecordStore::update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A record with the same id was replaced and the slot rewritten.
    Replaced,
    /// No record has that id; nothing changed and nothing was written.
    NotFound,
}

impl UpdateOutcome {
    pub fn is_replaced(self) -> bool {
        matches!(self, Self::Replaced)
    }
}

/// Ordered collection of one record type, persisted whole on every change.
pub struct RecordStore<R, S> {
    storage: S,
    records: Vec<R>,
}

/// Store of tile service offerings (`services` slot).
pub type ServiceCatalogStore<S> = RecordStore<ServiceOffering, S>;
/// Store of customer contact records (`customers` slot).
pub type CustomerStore<S> = RecordStore<Customer, S>;
/// Store of orders (`orders` slot).
pub type OrderStore<S> = RecordStore<Order, S>;

impl<R: Record, S: SlotStorage> RecordStore<R, S> {
    /// Opens the store and loads its collection from storage.
    ///
    /// # Errors
    /// - Returns storage transport errors. Decode failures are not errors;
    ///   they yield an empty store.
    pub fn open(storage: S) -> StoreResult<Self> {
        let records = load_collection(&storage)?;
        Ok(Self { storage, records })
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Position of the record with `id` in list order.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    /// Appends a record and persists the collection.
    ///
    /// A nil id is replaced with a fresh v4 UUID. Returns the stored id.
    pub fn add(&mut self, mut record: R) -> StoreResult<RecordId> {
        if record.id().is_nil() {
            record.set_id(Uuid::new_v4());
        } else if self.position(record.id()).is_some() {
            return Err(StoreError::DuplicateId(record.id()));
        }

        record.prepare_insert();
        let id = record.id();
        self.records.push(record);

        if let Err(err) = self.save() {
            self.records.pop();
            return Err(err);
        }
        Ok(id)
    }

    /// Replaces the record with the same id, in place, and persists.
    pub fn update(&mut self, mut record: R) -> StoreResult<UpdateOutcome> {
        let Some(index) = self.position(record.id()) else {
            debug!(
                "event=store_update module=repo status=not_found slot={}",
                R::SLOT
            );
            return Ok(UpdateOutcome::NotFound);
        };

        record.prepare_replace(&self.records[index]);
        let previous = std::mem::replace(&mut self.records[index], record);

        if let Err(err) = self.save() {
            self.records[index] = previous;
            return Err(err);
        }
        Ok(UpdateOutcome::Replaced)
    }

    /// Removes the record with `id` and persists the remainder.
    ///
    /// Returns the removed record, or `None` when the id is unknown.
    pub fn delete(&mut self, id: RecordId) -> StoreResult<Option<R>> {
        match self.position(id) {
            Some(index) => self.remove_index(index),
            None => {
                debug!(
                    "event=store_delete module=repo status=not_found slot={}",
                    R::SLOT
                );
                Ok(None)
            }
        }
    }

    /// Removes the record at list `position` and persists the remainder.
    pub fn delete_at(&mut self, position: usize) -> StoreResult<Option<R>> {
        if position >= self.records.len() {
            debug!(
                "event=store_delete module=repo status=not_found slot={} position={} count={}",
                R::SLOT,
                position,
                self.records.len()
            );
            return Ok(None);
        }
        self.remove_index(position)
    }

    /// Writes the current collection to its slot.
    pub fn save(&self) -> StoreResult<()> {
        save_collection(&self.storage, &self.records)
    }

    fn remove_index(&mut self, index: usize) -> StoreResult<Option<R>> {
        let removed = self.records.remove(index);
        if let Err(err) = self.save() {
            self.records.insert(index, removed);
            return Err(err);
        }
        Ok(Some(removed))
    }
}

/// Serializes `records` as one JSON array into `R::SLOT`.
pub fn save_collection<R: Record, S: SlotStorage + ?Sized>(
    storage: &S,
    records: &[R],
) -> StoreResult<()> {
    let started_at = Instant::now();
    ensure_finite_amounts(records)?;
    let payload = serde_json::to_vec(records).map_err(|source| StoreError::Encode {
        slot: R::SLOT,
        source,
    })?;

    match storage.write_slot(R::SLOT, &payload) {
        Ok(()) => {
            debug!(
                "event=store_save module=repo status=ok slot={} count={} bytes={} duration_ms={}",
                R::SLOT,
                records.len(),
                payload.len(),
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=store_save module=repo status=error slot={} count={} error_code=slot_write_failed error={}",
                R::SLOT,
                records.len(),
                err
            );
            Err(err)
        }
    }
}

fn ensure_finite_amounts<R: Record>(records: &[R]) -> StoreResult<()> {
    for record in records {
        if let Some((field, _)) = record
            .amounts()
            .into_iter()
            .find(|(_, amount)| !amount.is_finite())
        {
            warn!(
                "event=store_save module=repo status=error slot={} count={} error_code=non_finite_amount field={}",
                R::SLOT,
                records.len(),
                field
            );
            return Err(StoreError::NonFiniteAmount {
                slot: R::SLOT,
                id: record.id(),
                field,
            });
        }
    }
    Ok(())
}

/// Loads the collection stored in `R::SLOT`.
///
/// Absent slots and payloads that fail to decode both yield an empty
/// collection; only storage transport errors are returned.
pub fn load_collection<R: Record, S: SlotStorage + ?Sized>(storage: &S) -> StoreResult<Vec<R>> {
    let Some(payload) = storage.read_slot(R::SLOT)? else {
        debug!(
            "event=store_load module=repo status=empty slot={} reason=absent",
            R::SLOT
        );
        return Ok(Vec::new());
    };

    match serde_json::from_slice::<Vec<R>>(&payload) {
        Ok(records) => {
            debug!(
                "event=store_load module=repo status=ok slot={} count={}",
                R::SLOT,
                records.len()
            );
            Ok(records)
        }
        Err(err) => {
            warn!(
                "event=store_load module=repo status=empty slot={} reason=decode_failed bytes={} category={:?} line={} column={}",
                R::SLOT,
                payload.len(),
                err.classify(),
                err.line(),
                err.column()
            );
            Ok(Vec::new())
        }
    }
}
