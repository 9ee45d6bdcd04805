//! Everything that talks to, or reshapes data from, the timetable_export.cgi endpoint.
pub mod classifier;
pub mod date_range;
pub mod error;
pub mod helpers;
pub mod models;
pub mod schedule_getter;
pub mod teacher_load;
