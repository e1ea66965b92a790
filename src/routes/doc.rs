use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        appointments::{
            AppointmentList, AppointmentView, CreateAppointmentRequest,
            UpdateAppointmentStatusRequest,
        },
        auth::{
            Account, LoginRequest, LoginResponse, LogoutResponse, ManagerRegistration,
            ProfessionalRegistration, RegisterRequest,
        },
        catalog::{CreateServiceRequest, ServiceList, UpdateServiceRequest},
        deductions::{
            CreateIndividualDeductionRequest, CreateStandardDeductionRequest,
            IndividualDeductionList, StandardDeductionList, UpdateStandardDeductionRequest,
        },
        professionals::{DecisionRequest, DecisionResponse, ProfessionalList, ProfessionalView},
        profile::{AvailabilityRequest, UpsertProfileRequest},
        schedule::{
            AppointmentRequestList, AvailabilityList, BlockList, CreateAvailabilityRequest,
            CreateBlockRequest, NewAppointmentRequest, UpdateRequestStatus,
        },
        uploads::{UploadRequest, UploadResponse},
    },
    entity::sea_orm_active_enums::{
        ApprovalAction, ApprovalStatus, AppointmentStatus, PaymentMethod, RequestStatus, Role,
        ServiceCategory, UploadKind,
    },
    middleware::auth::SESSION_COOKIE,
    models::{
        Appointment, AppointmentRequest, ApprovalDecision, AvailabilityWindow, IndividualDeduction,
        Profile, ScheduleBlock, Service, Shop, StandardDeduction, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        appointments, auth, catalog, deductions, health, professionals, profile, schedule, stats,
        uploads,
    },
    stats::{ProfessionalStats, RevenueByDay, StatsReport},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        profile::me,
        profile::upsert_profile,
        profile::set_availability,
        catalog::list_services,
        catalog::create_service,
        catalog::update_service,
        catalog::delete_service,
        deductions::list_standard,
        deductions::create_standard,
        deductions::update_standard,
        deductions::delete_standard,
        deductions::list_individual,
        deductions::create_individual,
        deductions::delete_individual,
        appointments::list_appointments,
        appointments::create_appointment,
        appointments::update_status,
        professionals::list_professionals,
        professionals::list_pending,
        professionals::decide,
        schedule::list_availability,
        schedule::create_availability,
        schedule::list_blocks,
        schedule::create_block,
        schedule::list_requests,
        schedule::create_request,
        schedule::update_request_status,
        uploads::upload,
        stats::shop_stats
    ),
    components(
        schemas(
            User,
            Shop,
            Profile,
            Service,
            Appointment,
            StandardDeduction,
            IndividualDeduction,
            ApprovalDecision,
            AvailabilityWindow,
            ScheduleBlock,
            AppointmentRequest,
            Role,
            ApprovalStatus,
            ApprovalAction,
            ServiceCategory,
            PaymentMethod,
            AppointmentStatus,
            UploadKind,
            RequestStatus,
            RegisterRequest,
            ManagerRegistration,
            ProfessionalRegistration,
            LoginRequest,
            LoginResponse,
            LogoutResponse,
            Account,
            UpsertProfileRequest,
            AvailabilityRequest,
            CreateServiceRequest,
            UpdateServiceRequest,
            ServiceList,
            CreateStandardDeductionRequest,
            UpdateStandardDeductionRequest,
            CreateIndividualDeductionRequest,
            StandardDeductionList,
            IndividualDeductionList,
            CreateAppointmentRequest,
            UpdateAppointmentStatusRequest,
            AppointmentView,
            AppointmentList,
            ProfessionalView,
            ProfessionalList,
            DecisionRequest,
            DecisionResponse,
            CreateAvailabilityRequest,
            CreateBlockRequest,
            NewAppointmentRequest,
            UpdateRequestStatus,
            AvailabilityList,
            BlockList,
            AppointmentRequestList,
            UploadRequest,
            UploadResponse,
            StatsReport,
            ProfessionalStats,
            RevenueByDay,
            Meta,
            ApiResponse<StatsReport>,
            ApiResponse<AppointmentList>,
            ApiResponse<Account>
        )
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and logout"),
        (name = "Profile", description = "Current account and profile"),
        (name = "Services", description = "Service catalog of a shop"),
        (name = "Deductions", description = "Standard and individual deductions"),
        (name = "Appointments", description = "Logged appointments and their review"),
        (name = "Professionals", description = "Team list and approval workflow"),
        (name = "Schedule", description = "Availability, blocked periods and appointment requests"),
        (name = "Uploads", description = "Profile pictures and payment receipts"),
        (name = "Stats", description = "Shop financial summary"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
