pub mod appointments;
pub mod auth;
pub mod catalog;
pub mod deductions;
pub mod professionals;
pub mod profile;
pub mod schedule;
pub mod uploads;
