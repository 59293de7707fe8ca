//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical item record shared by local and remote stores.
//! - Define session identity and process-local view state.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId` that is never reused.
//! - View state is never persisted.

pub mod item;
pub mod session;
pub mod view;
