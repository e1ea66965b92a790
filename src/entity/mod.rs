pub mod appointment_requests;
pub mod appointments;
pub mod audit_logs;
pub mod individual_deductions;
pub mod media_uploads;
pub mod professional_approvals;
pub mod professional_availability;
pub mod profiles;
pub mod schedule_blocks;
pub mod sea_orm_active_enums;
pub mod services;
pub mod sessions;
pub mod shops;
pub mod standard_deductions;
pub mod users;

pub use appointment_requests::Entity as AppointmentRequests;
pub use appointments::Entity as Appointments;
pub use audit_logs::Entity as AuditLogs;
pub use individual_deductions::Entity as IndividualDeductions;
pub use media_uploads::Entity as MediaUploads;
pub use professional_approvals::Entity as ProfessionalApprovals;
pub use professional_availability::Entity as ProfessionalAvailability;
pub use profiles::Entity as Profiles;
pub use schedule_blocks::Entity as ScheduleBlocks;
pub use services::Entity as Services;
pub use sessions::Entity as Sessions;
pub use shops::Entity as Shops;
pub use standard_deductions::Entity as StandardDeductions;
pub use users::Entity as Users;
