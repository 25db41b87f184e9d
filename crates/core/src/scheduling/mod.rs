//! Scheduling rules, leaf first: slot validation, the weekly schedule,
//! date blocks, appointment classification and status transitions.

pub mod blocks;
pub mod classifier;
pub mod lifecycle;
pub mod optimistic;
pub mod validator;
pub mod weekly;
