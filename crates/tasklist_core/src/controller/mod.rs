//! View controller: the task-list state machine.
//!
//! # Responsibility
//! - Own process-local application state (phase, view state, displayed items).
//! - Turn gestures into collaborator calls and re-derive the displayed list.
//! - Render state into a shell-agnostic view model.
//!
//! # Invariants
//! - Every successful mutation is followed by a full re-query with the active
//!   filter and sort; failures leave state exactly as before.
//! - At most one item is in edit state.
//! - Rendering is a pure function of `AppState`.

pub mod render;
pub mod state;
pub mod task_controller;
