//! Item store contract and shared error type.

use crate::db::DbError;
use crate::model::item::{Item, ItemId, ItemPatch, ItemValidationError, NewItem};
use crate::model::session::OwnerId;
use crate::model::view::{SortOrder, ViewFilter};
use crate::repo::slot::SlotError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for item store operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(ItemValidationError),
    Db(DbError),
    Slot(SlotError),
    NotFound(ItemId),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Slot(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Slot(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
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

impl From<SlotError> for StoreError {
    fn from(value: SlotError) -> Self {
        Self::Slot(value)
    }
}

/// Read options for `list_items`.
///
/// `sort = None` keeps storage (insertion) order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemListQuery {
    pub completed: Option<bool>,
    pub sort: Option<SortOrder>,
}

impl ItemListQuery {
    pub fn new(filter: ViewFilter, sort: Option<SortOrder>) -> Self {
        Self {
            completed: filter.completed_constraint(),
            sort,
        }
    }
}

/// Owner-scoped item collection.
///
/// Implementations never return or mutate items belonging to a different
/// owner than the one passed in.
pub trait ItemStore {
    /// Persists a new incomplete item and returns its generated id.
    fn add_item(&mut self, owner: &OwnerId, item: &NewItem) -> StoreResult<ItemId>;
    /// Applies a partial update. Unknown ids yield `NotFound`.
    fn update_item(&mut self, owner: &OwnerId, id: &ItemId, patch: &ItemPatch)
        -> StoreResult<()>;
    /// Removes one item. Unknown ids yield `NotFound`.
    fn delete_item(&mut self, owner: &OwnerId, id: &ItemId) -> StoreResult<()>;
    fn list_items(&self, owner: &OwnerId, query: &ItemListQuery) -> StoreResult<Vec<Item>>;
}

impl<T: ItemStore + ?Sized> ItemStore for Box<T> {
    fn add_item(&mut self, owner: &OwnerId, item: &NewItem) -> StoreResult<ItemId> {
        (**self).add_item(owner, item)
    }

    fn update_item(
        &mut self,
        owner: &OwnerId,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> StoreResult<()> {
        (**self).update_item(owner, id, patch)
    }

    fn delete_item(&mut self, owner: &OwnerId, id: &ItemId) -> StoreResult<()> {
        (**self).delete_item(owner, id)
    }

    fn list_items(&self, owner: &OwnerId, query: &ItemListQuery) -> StoreResult<Vec<Item>> {
        (**self).list_items(owner, query)
    }
}

/// Rejects patches that would store empty text.
pub(crate) fn validate_patch(patch: &ItemPatch) -> StoreResult<()> {
    if let Some(text) = &patch.text {
        if text.trim().is_empty() {
            return Err(ItemValidationError::EmptyText.into());
        }
    }
    Ok(())
}
