mod appointments_test;
mod config_test;
mod schedule_test;
