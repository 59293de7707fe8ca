//! Item store contracts and adapters.
//!
//! # Responsibility
//! - Define the owner-scoped `ItemStore` contract consumed by the controller.
//! - Provide the SQLite adapter (remote variant) and the key-value slot
//!   adapter (local variant).
//!
//! # Invariants
//! - Write paths validate item text before persistence.
//! - A failed write leaves the stored collection exactly as before.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod item_repo;
pub mod local_repo;
pub mod slot;
pub mod sqlite_repo;
