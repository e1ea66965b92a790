pub mod appointment_service;
pub mod approval_service;
pub mod auth_service;
pub mod catalog_service;
pub mod deduction_service;
pub mod profile_service;
pub mod schedule_service;
pub mod session_service;
pub mod stats_service;
pub mod upload_service;
