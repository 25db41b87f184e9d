pub mod appointment;
pub mod block;
pub mod schedule;
pub mod session;
pub mod time_slot;
