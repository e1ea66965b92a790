mod common;

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use common::FakeMediaHost;
use luxe_salon_api::{
    dto::{
        appointments::CreateAppointmentRequest, catalog::CreateServiceRequest,
        professionals::DecisionRequest, uploads::UploadRequest,
    },
    entity::{
        Appointments, Users,
        sea_orm_active_enums::{ApprovalAction, PaymentMethod, ServiceCategory, UploadKind},
    },
    error::AppError,
    media::UnconfiguredMediaHost,
    services::{appointment_service, approval_service, catalog_service, upload_service},
};
use sea_orm::EntityTrait;
use uuid::Uuid;

fn small_image() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode([137u8, 80, 78, 71, 1, 2, 3, 4]))
}

#[tokio::test]
async fn uploads_update_profile_picture_and_receipts() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let media = Arc::new(FakeMediaHost::default());
    let state = common::setup_state(&database_url, media.clone()).await?;

    let shop = common::new_shop(&state).await?;
    let (pro_id, pro_email) = common::register_professional(&state, &shop.shop_code).await?;
    approval_service::decide(
        &state,
        &shop.manager,
        pro_id,
        DecisionRequest {
            action: ApprovalAction::Approve,
        },
    )
    .await?;
    let pro = common::authenticate(&state, &pro_email).await?;

    let avatar = upload_service::upload(
        &state,
        &pro,
        UploadRequest {
            kind: UploadKind::Profile,
            data_base64: small_image(),
            appointment_id: None,
        },
    )
    .await?
    .data
    .expect("upload");

    let expected_folder = format!("salons/{}/professionals/{}/profile", shop.shop_id, pro.user_id);
    assert!(avatar.secure_url.contains(&expected_folder));
    let account = Users::find_by_id(pro.user_id).one(&state.orm).await?.expect("user");
    assert_eq!(account.profile_image_url, Some(avatar.secure_url.clone()));

    let service = catalog_service::create_service(
        &state,
        &shop.manager,
        CreateServiceRequest {
            name: "Corte".into(),
            category: ServiceCategory::General,
            price: 4000,
            commission_rate: 50,
            description: None,
            active: None,
        },
    )
    .await?
    .data
    .expect("service");
    let appointment = appointment_service::create_appointment(
        &state,
        &pro,
        CreateAppointmentRequest {
            service_id: service.id,
            customer_name: "Helena".into(),
            payment_method: PaymentMethod::Cash,
            transaction_id: None,
            proof_url: None,
            date: None,
        },
    )
    .await?
    .data
    .expect("appointment");

    let receipt = upload_service::upload(
        &state,
        &pro,
        UploadRequest {
            kind: UploadKind::Payment,
            data_base64: small_image(),
            appointment_id: Some(appointment.id),
        },
    )
    .await?
    .data
    .expect("upload");
    assert!(receipt.secure_url.contains("/receipts/"));
    let stored = Appointments::find_by_id(appointment.id)
        .one(&state.orm)
        .await?
        .expect("appointment");
    assert_eq!(stored.proof_url, Some(receipt.secure_url));

    // Only the author's own appointments can receive a receipt.
    let someone_elses = upload_service::upload(
        &state,
        &shop.manager,
        UploadRequest {
            kind: UploadKind::Payment,
            data_base64: small_image(),
            appointment_id: Some(appointment.id),
        },
    )
    .await;
    assert!(matches!(someone_elses, Err(AppError::NotFound(_))));

    let unknown = upload_service::upload(
        &state,
        &pro,
        UploadRequest {
            kind: UploadKind::Payment,
            data_base64: small_image(),
            appointment_id: Some(Uuid::new_v4()),
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    let too_big = upload_service::upload(
        &state,
        &pro,
        UploadRequest {
            kind: UploadKind::Profile,
            data_base64: STANDARD.encode(vec![0u8; 4096]),
            appointment_id: None,
        },
    )
    .await;
    assert!(matches!(
        too_big,
        Err(AppError::Validation { field: "dataBase64", .. })
    ));

    assert_eq!(media.calls.lock().expect("media calls").len(), 2);
    Ok(())
}

#[tokio::test]
async fn uploads_report_missing_or_failing_media_host() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };

    let state = common::setup_state(&database_url, Arc::new(UnconfiguredMediaHost)).await?;
    let shop = common::new_shop(&state).await?;
    let unconfigured = upload_service::upload(
        &state,
        &shop.manager,
        UploadRequest {
            kind: UploadKind::Profile,
            data_base64: small_image(),
            appointment_id: None,
        },
    )
    .await;
    assert!(matches!(unconfigured, Err(AppError::Unavailable(_))));

    let failing = FakeMediaHost {
        fail: true,
        ..Default::default()
    };
    let state = common::setup_state(&database_url, Arc::new(failing)).await?;
    let shop = common::new_shop(&state).await?;
    let upstream = upload_service::upload(
        &state,
        &shop.manager,
        UploadRequest {
            kind: UploadKind::Profile,
            data_base64: small_image(),
            appointment_id: None,
        },
    )
    .await;
    assert!(matches!(upstream, Err(AppError::Upstream(_))));

    Ok(())
}
