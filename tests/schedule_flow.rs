mod common;

use std::sync::Arc;

use chrono::{Duration, NaiveTime, Utc};
use common::FakeMediaHost;
use luxe_salon_api::{
    dto::{
        catalog::CreateServiceRequest,
        schedule::{
            CreateAvailabilityRequest, CreateBlockRequest, NewAppointmentRequest, ScheduleQuery,
            UpdateRequestStatus,
        },
    },
    entity::sea_orm_active_enums::{RequestStatus, ServiceCategory},
    error::AppError,
    middleware::auth::AuthUser,
    services::{catalog_service, schedule_service, session_service},
};
use uuid::Uuid;

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn walk_in(professional_id: Option<Uuid>, customer: &str) -> NewAppointmentRequest {
    NewAppointmentRequest {
        professional_id,
        service_id: None,
        customer_name: customer.into(),
        customer_phone: "(11) 95555-4444".into(),
        requested_at: Utc::now() + Duration::days(2),
    }
}

#[tokio::test]
async fn professionals_publish_hours_and_handle_requests() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url, Arc::new(FakeMediaHost::default())).await?;

    let shop = common::new_shop(&state).await?;
    let manager = &shop.manager;
    let ana = common::approved_professional(&state, manager, &shop.shop_code).await?;
    let bia = common::approved_professional(&state, manager, &shop.shop_code).await?;

    let monday = schedule_service::create_availability(
        &state,
        &ana,
        CreateAvailabilityRequest {
            weekday: 0,
            start_time: hour(9),
            end_time: hour(18),
        },
    )
    .await?
    .data
    .expect("availability");
    assert_eq!(monday.professional_id, ana.user_id);
    assert!(monday.active);

    let bad_day = schedule_service::create_availability(
        &state,
        &ana,
        CreateAvailabilityRequest {
            weekday: 7,
            start_time: hour(9),
            end_time: hour(18),
        },
    )
    .await;
    assert!(matches!(bad_day, Err(AppError::Validation { field: "weekday", .. })));

    let inverted = schedule_service::create_availability(
        &state,
        &ana,
        CreateAvailabilityRequest {
            weekday: 2,
            start_time: hour(18),
            end_time: hour(9),
        },
    )
    .await;
    assert!(matches!(inverted, Err(AppError::Validation { field: "endTime", .. })));

    let by_manager = schedule_service::create_availability(
        &state,
        manager,
        CreateAvailabilityRequest {
            weekday: 1,
            start_time: hour(9),
            end_time: hour(12),
        },
    )
    .await;
    assert!(matches!(by_manager, Err(AppError::Forbidden(_))));

    let start = Utc::now() + Duration::days(1);
    let block = schedule_service::create_block(
        &state,
        &ana,
        CreateBlockRequest {
            start_at: start,
            end_at: start + Duration::hours(2),
            reason: Some("  Consulta médica ".into()),
        },
    )
    .await?
    .data
    .expect("block");
    assert_eq!(block.reason.as_deref(), Some("Consulta médica"));

    let empty_block = schedule_service::create_block(
        &state,
        &ana,
        CreateBlockRequest {
            start_at: start,
            end_at: start,
            reason: None,
        },
    )
    .await;
    assert!(matches!(empty_block, Err(AppError::Validation { field: "endAt", .. })));

    // Bia sees none of Ana's rows; the manager sees the whole shop.
    let bia_hours =
        schedule_service::list_availability(&state, &bia, ScheduleQuery::default()).await?;
    assert!(bia_hours.data.expect("availability").items.is_empty());
    let bia_blocks = schedule_service::list_blocks(&state, &bia, ScheduleQuery::default()).await?;
    assert!(bia_blocks.data.expect("blocks").items.is_empty());
    let shop_hours =
        schedule_service::list_availability(&state, manager, ScheduleQuery::default()).await?;
    assert_eq!(shop_hours.data.expect("availability").items.len(), 1);

    // Professionals file only for themselves.
    let for_other =
        schedule_service::create_request(&state, &ana, walk_in(Some(bia.user_id), "Caio")).await;
    assert!(matches!(for_other, Err(AppError::Forbidden(_))));

    let own = schedule_service::create_request(&state, &ana, walk_in(None, "Caio"))
        .await?
        .data
        .expect("request");
    assert_eq!(own.professional_id, Some(ana.user_id));
    assert_eq!(own.status, RequestStatus::Requested);

    let service = catalog_service::create_service(
        &state,
        manager,
        CreateServiceRequest {
            name: "Manicure".into(),
            category: ServiceCategory::Female,
            price: 4000,
            commission_rate: 50,
            description: None,
            active: None,
        },
    )
    .await?
    .data
    .expect("service");

    let assigned = schedule_service::create_request(
        &state,
        manager,
        NewAppointmentRequest {
            service_id: Some(service.id),
            ..walk_in(Some(bia.user_id), "Duda")
        },
    )
    .await?
    .data
    .expect("request");
    assert_eq!(assigned.professional_id, Some(bia.user_id));
    assert_eq!(assigned.service_id, Some(service.id));

    let unassigned = schedule_service::create_request(&state, manager, walk_in(None, "Enzo"))
        .await?
        .data
        .expect("request");
    assert_eq!(unassigned.professional_id, None);

    let stranger =
        schedule_service::create_request(&state, manager, walk_in(Some(Uuid::new_v4()), "Enzo"))
            .await;
    assert!(matches!(stranger, Err(AppError::NotFound(_))));

    let bad_phone = schedule_service::create_request(
        &state,
        &ana,
        NewAppointmentRequest {
            customer_phone: "12".into(),
            ..walk_in(None, "Caio")
        },
    )
    .await;
    assert!(matches!(bad_phone, Err(AppError::Validation { field: "phone", .. })));

    // Ana cannot touch Bia's request, the manager can.
    let not_hers = schedule_service::update_request_status(
        &state,
        &ana,
        assigned.id,
        UpdateRequestStatus {
            status: RequestStatus::Cancelled,
        },
    )
    .await;
    assert!(matches!(not_hers, Err(AppError::NotFound(_))));

    let confirmed = schedule_service::update_request_status(
        &state,
        &bia,
        assigned.id,
        UpdateRequestStatus {
            status: RequestStatus::Confirmed,
        },
    )
    .await?
    .data
    .expect("request");
    assert_eq!(confirmed.status, RequestStatus::Confirmed);

    let rescheduled = schedule_service::update_request_status(
        &state,
        manager,
        assigned.id,
        UpdateRequestStatus {
            status: RequestStatus::Rescheduled,
        },
    )
    .await?
    .data
    .expect("request");
    assert_eq!(rescheduled.status, RequestStatus::Rescheduled);

    let ana_requests =
        schedule_service::list_requests(&state, &ana, ScheduleQuery::default()).await?;
    let ana_requests = ana_requests.data.expect("requests").items;
    assert_eq!(ana_requests.len(), 1);
    assert_eq!(ana_requests[0].id, own.id);

    let all = schedule_service::list_requests(&state, manager, ScheduleQuery::default()).await?;
    assert_eq!(all.data.expect("requests").items.len(), 3);

    let open = schedule_service::list_requests(
        &state,
        manager,
        ScheduleQuery {
            status: Some(RequestStatus::Requested),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(open.data.expect("requests").items.len(), 2);

    let bia_only = schedule_service::list_requests(
        &state,
        manager,
        ScheduleQuery {
            professional_id: Some(bia.user_id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(bia_only.data.expect("requests").items.len(), 1);

    Ok(())
}

#[tokio::test]
async fn schedule_is_closed_to_pending_professionals_and_other_shops() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url, Arc::new(FakeMediaHost::default())).await?;

    let shop = common::new_shop(&state).await?;
    let other = common::new_shop(&state).await?;

    let request = schedule_service::create_request(&state, &shop.manager, walk_in(None, "Fabi"))
        .await?
        .data
        .expect("request");

    let cross_shop = schedule_service::update_request_status(
        &state,
        &other.manager,
        request.id,
        UpdateRequestStatus {
            status: RequestStatus::Expired,
        },
    )
    .await;
    assert!(matches!(cross_shop, Err(AppError::NotFound(_))));

    let foreign_service = catalog_service::create_service(
        &state,
        &other.manager,
        CreateServiceRequest {
            name: "Corte".into(),
            category: ServiceCategory::General,
            price: 2500,
            commission_rate: 40,
            description: None,
            active: None,
        },
    )
    .await?
    .data
    .expect("service");
    let with_foreign_service = schedule_service::create_request(
        &state,
        &shop.manager,
        NewAppointmentRequest {
            service_id: Some(foreign_service.id),
            ..walk_in(None, "Gil")
        },
    )
    .await;
    assert!(matches!(with_foreign_service, Err(AppError::NotFound(_))));

    let (pending_id, _) = common::register_professional(&state, &shop.shop_code).await?;
    let pending = AuthUser {
        user_id: pending_id,
        session_id: Uuid::new_v4(),
        profile: session_service::load_profile(&state, pending_id).await?,
    };
    let hours =
        schedule_service::list_availability(&state, &pending, ScheduleQuery::default()).await;
    assert!(matches!(hours, Err(AppError::Forbidden(_))));
    let filed = schedule_service::create_request(&state, &pending, walk_in(None, "Hugo")).await;
    assert!(matches!(filed, Err(AppError::Forbidden(_))));

    Ok(())
}
