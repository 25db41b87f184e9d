pub mod appointments;
pub mod blocks;
pub mod schedule;
