//! Core of the task list: domain model, item stores, identity provider and
//! the view controller state machine.
//! UI shells only forward gestures and paint `ViewModel`s.

pub mod bootstrap;
pub mod config;
pub mod controller;
pub mod db;
pub mod identity;
pub mod logging;
pub mod model;
pub mod repo;

pub use bootstrap::{open_controller, AppController, DynItemStore, OpenError};
pub use config::{AppConfig, ConfigError, StorageConfig};
pub use controller::render::{render, ItemRow, Row, ViewModel, EMPTY_LIST_MESSAGE};
pub use controller::state::{AppState, Phase, Variant};
pub use controller::task_controller::{
    BoxedIdentityProvider, Feedback, Gesture, TaskController, EMPTY_EDIT_ALERT,
};
pub use identity::provider::{AuthError, AuthResult, IdentityProvider, SessionListeners};
pub use identity::sqlite_provider::SqliteIdentityProvider;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemId, ItemPatch, ItemValidationError, NewItem};
pub use model::session::{Identity, OwnerId, SessionChanged};
pub use model::view::{EditState, SortOrder, ViewFilter, ViewState};
pub use repo::item_repo::{ItemListQuery, ItemStore, StoreError, StoreResult};
pub use repo::local_repo::{LocalItemStore, DEFAULT_SLOT_KEY};
pub use repo::slot::{FileSlot, KeyValueSlot, MemorySlot, SlotError};
pub use repo::sqlite_repo::SqliteItemStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
