//! Identity session collaborator.
//!
//! # Responsibility
//! - Define the sign-up / sign-in / sign-out contract and the session
//!   subscription consumed by the controller.
//! - Provide a SQLite-backed adapter with a persisted active session.
//!
//! # Invariants
//! - At most one identity is active per provider.
//! - Every subscriber receives the current state on subscribe and one event
//!   per subsequent transition.

pub mod provider;
pub mod sqlite_provider;
