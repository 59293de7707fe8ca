//! Wiring from configuration to a running controller.

use crate::config::StorageConfig;
use crate::controller::task_controller::TaskController;
use crate::db::{open_db, DbError};
use crate::identity::provider::AuthError;
use crate::identity::sqlite_provider::SqliteIdentityProvider;
use crate::repo::item_repo::{ItemStore, StoreError};
use crate::repo::local_repo::LocalItemStore;
use crate::repo::slot::{FileSlot, SlotError};
use crate::repo::sqlite_repo::SqliteItemStore;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DynItemStore = Box<dyn ItemStore + Send>;
/// Controller type shared by every configured variant.
pub type AppController = TaskController<DynItemStore>;

#[derive(Debug)]
pub enum OpenError {
    Db(DbError),
    Slot(SlotError),
    Store(StoreError),
    Auth(AuthError),
}

impl Display for OpenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database open failed: {err}"),
            Self::Slot(err) => write!(f, "slot open failed: {err}"),
            Self::Store(err) => write!(f, "item store open failed: {err}"),
            Self::Auth(err) => write!(f, "identity provider open failed: {err}"),
        }
    }
}

impl Error for OpenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Slot(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Auth(err) => Some(err),
        }
    }
}

impl From<DbError> for OpenError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<SlotError> for OpenError {
    fn from(value: SlotError) -> Self {
        Self::Slot(value)
    }
}

impl From<StoreError> for OpenError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<AuthError> for OpenError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

/// Opens the collaborators named by `storage` and starts a controller.
///
/// The remote variant opens two connections to the same file: one for the
/// identity provider and one for the item store.
pub fn open_controller(storage: &StorageConfig) -> Result<AppController, OpenError> {
    match storage {
        StorageConfig::Local { dir, key } => {
            let slot = FileSlot::open(dir)?;
            let store: DynItemStore = Box::new(LocalItemStore::open_with_key(slot, key.as_str())?);
            Ok(TaskController::local(store)?)
        }
        StorageConfig::Remote { db_path } => {
            let provider = SqliteIdentityProvider::new(open_db(db_path)?)?;
            let store: DynItemStore = Box::new(SqliteItemStore::new(open_db(db_path)?));
            Ok(TaskController::remote(Box::new(provider), store))
        }
    }
}
