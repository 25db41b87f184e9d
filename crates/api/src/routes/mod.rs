pub mod appointments;
pub mod blocks;
pub mod health;
pub mod schedule;
