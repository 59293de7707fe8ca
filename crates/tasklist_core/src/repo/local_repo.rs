//! Slot-backed item store for the local (no-auth) variant.
//!
//! # Responsibility
//! - Load the serialized item list from one slot key at open.
//! - Rewrite the full list after every successful mutation.
//!
//! # Invariants
//! - Ids are timestamp-derived, strictly increasing, and never reused.
//! - `created_at` equals the id.
//! - A failed slot write rolls the in-memory list back.
//!
//! The local variant has exactly one implicit owner, so the `owner`
//! argument of the store contract is not consulted.

use crate::model::item::{normalize_text, Item, ItemId, ItemPatch, NewItem};
use crate::model::session::OwnerId;
use crate::model::view::SortOrder;
use crate::repo::item_repo::{validate_patch, ItemListQuery, ItemStore, StoreError, StoreResult};
use crate::repo::slot::KeyValueSlot;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Slot key holding the serialized item list.
pub const DEFAULT_SLOT_KEY: &str = "todos";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LocalRecord {
    id: i64,
    text: String,
    #[serde(default)]
    completed: bool,
}

impl LocalRecord {
    fn to_item(&self) -> Item {
        Item {
            id: ItemId::from(self.id),
            text: self.text.clone(),
            completed: self.completed,
            created_at: self.id,
        }
    }
}

/// Item store persisting to a `KeyValueSlot`.
pub struct LocalItemStore<K: KeyValueSlot> {
    slot: K,
    key: String,
    records: Vec<LocalRecord>,
    last_issued_id: i64,
}

impl<K: KeyValueSlot> LocalItemStore<K> {
    /// Opens the store using the default `todos` key.
    pub fn open(slot: K) -> StoreResult<Self> {
        Self::open_with_key(slot, DEFAULT_SLOT_KEY)
    }

    /// Reads and validates the slot once. A missing slot is an empty list.
    ///
    /// # Errors
    /// - `InvalidData` when the slot holds malformed JSON, empty text, or
    ///   duplicate ids.
    /// - `Slot` when the slot cannot be read.
    pub fn open_with_key(slot: K, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        let records = match slot.read(&key)? {
            Some(raw) => decode_records(&raw)?,
            None => Vec::new(),
        };
        let last_issued_id = records.iter().map(|record| record.id).max().unwrap_or(0);

        info!(
            "event=local_store_open module=repo status=ok key={key} item_count={}",
            records.len()
        );
        Ok(Self {
            slot,
            key,
            records,
            last_issued_id,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Releases the underlying slot.
    pub fn into_slot(self) -> K {
        self.slot
    }

    fn next_id(&mut self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        let id = now.max(self.last_issued_id.saturating_add(1));
        self.last_issued_id = id;
        id
    }

    fn position_of(&self, id: &ItemId) -> StoreResult<usize> {
        let numeric = id.as_str().parse::<i64>().ok();
        numeric
            .and_then(|value| self.records.iter().position(|record| record.id == value))
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Persists `next` as the new full list; the in-memory list only changes
    /// once the slot write succeeded.
    fn commit(&mut self, next: Vec<LocalRecord>) -> StoreResult<()> {
        let encoded = serde_json::to_string(&next)
            .map_err(|err| StoreError::InvalidData(format!("encode failed: {err}")))?;
        self.slot.write(&self.key, &encoded)?;
        self.records = next;
        debug!(
            "event=local_store_write module=repo status=ok key={} item_count={}",
            self.key,
            self.records.len()
        );
        Ok(())
    }
}

impl<K: KeyValueSlot> ItemStore for LocalItemStore<K> {
    fn add_item(&mut self, _owner: &OwnerId, item: &NewItem) -> StoreResult<ItemId> {
        let text = normalize_text(&item.text)?;
        // The id stays consumed even if the write fails.
        let id = self.next_id();

        let mut next = self.records.clone();
        next.push(LocalRecord {
            id,
            text,
            completed: false,
        });
        self.commit(next)?;
        Ok(ItemId::from(id))
    }

    fn update_item(
        &mut self,
        _owner: &OwnerId,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> StoreResult<()> {
        validate_patch(patch)?;
        let index = self.position_of(id)?;

        let mut next = self.records.clone();
        let record = &mut next[index];
        if let Some(text) = &patch.text {
            record.text = text.trim().to_string();
        }
        if let Some(completed) = patch.completed {
            record.completed = completed;
        }
        self.commit(next)
    }

    fn delete_item(&mut self, _owner: &OwnerId, id: &ItemId) -> StoreResult<()> {
        let index = self.position_of(id)?;
        let mut next = self.records.clone();
        next.remove(index);
        self.commit(next)
    }

    fn list_items(&self, _owner: &OwnerId, query: &ItemListQuery) -> StoreResult<Vec<Item>> {
        let mut items = self
            .records
            .iter()
            .filter(|record| query.completed.map_or(true, |value| value == record.completed))
            .map(LocalRecord::to_item)
            .collect::<Vec<_>>();

        match query.sort {
            Some(SortOrder::OldestFirst) => items.sort_by_key(|item| item.created_at),
            Some(SortOrder::NewestFirst) => {
                items.sort_by_key(|item| std::cmp::Reverse(item.created_at))
            }
            None => {}
        }
        Ok(items)
    }
}

fn decode_records(raw: &str) -> StoreResult<Vec<LocalRecord>> {
    // A literal `null` is what an unset browser slot round-trips to.
    let records: Option<Vec<LocalRecord>> = serde_json::from_str(raw)
        .map_err(|err| StoreError::InvalidData(format!("slot is not an item list: {err}")))?;
    let records = records.unwrap_or_default();

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.id) {
            return Err(StoreError::InvalidData(format!(
                "duplicate item id `{}` in slot",
                record.id
            )));
        }
        record.to_item().validate().map_err(|err| {
            StoreError::InvalidData(format!("item `{}` in slot: {err}", record.id))
        })?;
    }
    Ok(records)
}
