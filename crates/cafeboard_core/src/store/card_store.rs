//! Card collection store.
//!
//! # Responsibility
//! - Load the persisted card collection at startup.
//! - Append new cards with a read-modify-write of the whole collection.
//!
//! # Invariants
//! - Unparsable stored data loads as an empty collection and is logged.
//! - Entries that do not decode as a valid `CardRecord` are skipped on load
//!   but written back verbatim on append.
//! - A failed read never leads to a write: `append` reports it instead of
//!   replacing the collection.
//! - Append never reorders existing entries.

use crate::model::card::CardRecord;
use crate::store::kv::{KeyValueStorage, StorageError};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Write-path failures.
#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "card storage write failed: {err}"),
            Self::Serialize(err) => write!(f, "card serialization failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Raw read result before entries are decoded.
enum StoredCollection {
    Missing,
    Corrupt,
    Entries(Vec<Value>),
    ReadFailed(StorageError),
}

/// Persistent, ordered card collection under one storage key.
pub struct CardStore<K: KeyValueStorage> {
    storage: K,
    key: String,
}

impl<K: KeyValueStorage> CardStore<K> {
    pub fn new(storage: K, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads every decodable card, in stored order.
    ///
    /// Never fails: missing, unreadable or corrupt data yields an empty list.
    pub fn load_all(&self) -> Vec<CardRecord> {
        let entries = match self.read_collection() {
            StoredCollection::Missing
            | StoredCollection::Corrupt
            | StoredCollection::ReadFailed(_) => return Vec::new(),
            StoredCollection::Entries(entries) => entries,
        };

        let total = entries.len();
        let cards: Vec<CardRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match decode_entry(entry) {
                Ok(card) => Some(card),
                Err(err) => {
                    warn!(
                        "event=store_load module=store status=skipped index={} error={}",
                        index, err
                    );
                    None
                }
            })
            .collect();

        info!(
            "event=store_load module=store status=ok entries={} cards={}",
            total,
            cards.len()
        );
        cards
    }

    /// Appends one card and writes the full collection back.
    ///
    /// Returns the stored entry count after the write.
    ///
    /// # Errors
    /// - `StoreError::Storage` when the current collection cannot be read;
    ///   nothing is written in that case.
    /// - `StoreError::Storage` when the backend rejects the write (quota).
    /// - `StoreError::Serialize` when the collection cannot be encoded.
    pub fn append(&self, record: &CardRecord) -> Result<usize, StoreError> {
        let mut entries = match self.read_collection() {
            StoredCollection::Entries(entries) => entries,
            StoredCollection::Missing => Vec::new(),
            StoredCollection::ReadFailed(err) => {
                error!(
                    "event=store_append module=store status=error stage=read key={} error={}",
                    self.key, err
                );
                return Err(err.into());
            }
            StoredCollection::Corrupt => {
                warn!(
                    "event=store_append module=store status=overwrite_corrupt key={}",
                    self.key
                );
                Vec::new()
            }
        };
        entries.push(serde_json::to_value(record)?);
        let serialized = serde_json::to_string(&entries)?;

        if let Err(err) = self.storage.set_item(&self.key, &serialized) {
            error!(
                "event=store_append module=store status=error entries={} bytes={} error={}",
                entries.len(),
                serialized.len(),
                err
            );
            return Err(err.into());
        }

        debug!(
            "event=store_append module=store status=ok entries={} bytes={}",
            entries.len(),
            serialized.len()
        );
        Ok(entries.len())
    }

    /// Number of stored entries, decodable or not.
    pub fn len(&self) -> usize {
        match self.read_collection() {
            StoredCollection::Entries(entries) => entries.len(),
            StoredCollection::Missing
            | StoredCollection::Corrupt
            | StoredCollection::ReadFailed(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_collection(&self) -> StoredCollection {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StoredCollection::Missing,
            Err(err) => {
                error!(
                    "event=store_read module=store status=error key={} error={}",
                    self.key, err
                );
                return StoredCollection::ReadFailed(err);
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => StoredCollection::Entries(entries),
            Ok(Value::Null) => StoredCollection::Missing,
            Ok(_) => {
                warn!(
                    "event=store_read module=store status=corrupt key={} reason=not_array",
                    self.key
                );
                StoredCollection::Corrupt
            }
            Err(err) => {
                warn!(
                    "event=store_read module=store status=corrupt key={} bytes={} error={}",
                    self.key,
                    raw.len(),
                    err
                );
                StoredCollection::Corrupt
            }
        }
    }
}

/// Decodes one stored entry and re-checks the record invariants.
fn decode_entry(entry: Value) -> Result<CardRecord, String> {
    let card: CardRecord = serde_json::from_value(entry).map_err(|err| err.to_string())?;
    card.validate().map_err(|err| err.to_string())?;
    Ok(card)
}
