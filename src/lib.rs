pub mod schedule;
pub mod server;
