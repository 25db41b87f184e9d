//! # Slotwise Core
//!
//! Domain types and pure scheduling logic for expert availability and
//! appointment handling. Nothing in this crate performs I/O: callers hand in
//! the current state (schedules, blocks, appointments, "now") and receive a
//! new state or a decision back.
//!
//! - [`models`]: wire-compatible data model
//! - [`scheduling`]: slot validation, weekly schedule edits, date blocks,
//!   appointment classification and the status state machine

pub mod errors;
pub mod models;
pub mod scheduling;
