use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::uploads::{UploadRequest, UploadResponse},
    entity::{
        appointments::{
            ActiveModel as AppointmentActive, Column as AppointmentCol, Entity as Appointments,
        },
        media_uploads::ActiveModel as UploadActive,
        sea_orm_active_enums::UploadKind,
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_shop_member},
    response::{ApiResponse, Meta},
    state::AppState,
};

const DEFAULT_MIME: &str = "image/jpeg";

/// A validated payload, ready to forward to the media host.
#[derive(Debug)]
pub struct PreparedUpload {
    pub data_uri: String,
    pub size: usize,
}

/// Check that `raw` is base64 (optionally wrapped in a `data:` URI) and that
/// the decoded bytes fit in `max_bytes`.
pub fn prepare_payload(raw: &str, max_bytes: usize) -> AppResult<PreparedUpload> {
    let raw = raw.trim();
    let (mime, encoded) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (header, body) = rest
                .split_once(',')
                .ok_or_else(|| AppError::validation("dataBase64", "Malformed data URI"))?;
            let mime = header
                .strip_suffix(";base64")
                .ok_or_else(|| {
                    AppError::validation("dataBase64", "Data URI must be base64 encoded")
                })?;
            (if mime.is_empty() { DEFAULT_MIME } else { mime }, body)
        }
        None => (DEFAULT_MIME, raw),
    };

    if encoded.is_empty() {
        return Err(AppError::validation("dataBase64", "File is empty"));
    }
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| AppError::validation("dataBase64", "Invalid base64 payload"))?;
    if bytes.is_empty() {
        return Err(AppError::validation("dataBase64", "File is empty"));
    }
    if bytes.len() > max_bytes {
        return Err(AppError::validation(
            "dataBase64",
            format!("File exceeds the {max_bytes} bytes limit"),
        ));
    }

    Ok(PreparedUpload {
        data_uri: format!("data:{mime};base64,{encoded}"),
        size: bytes.len(),
    })
}

pub fn upload_folder(kind: UploadKind, shop_id: Uuid, user_id: Uuid) -> String {
    match kind {
        UploadKind::Profile => format!("salons/{shop_id}/professionals/{user_id}/profile"),
        UploadKind::Payment => format!("salons/{shop_id}/payments/{user_id}/receipts"),
    }
}

pub async fn upload(
    state: &AppState,
    user: &AuthUser,
    payload: UploadRequest,
) -> AppResult<ApiResponse<UploadResponse>> {
    let scope = ensure_shop_member(user)?;
    let prepared = prepare_payload(&payload.data_base64, state.config.upload_max_bytes)?;

    let appointment = match (payload.kind, payload.appointment_id) {
        (UploadKind::Payment, Some(appointment_id)) => Some(
            Appointments::find()
                .filter(
                    Condition::all()
                        .add(AppointmentCol::Id.eq(appointment_id))
                        .add(AppointmentCol::ShopId.eq(scope.shop_id))
                        .add(AppointmentCol::ProfessionalId.eq(user.user_id)),
                )
                .one(&state.orm)
                .await?
                .ok_or_else(|| AppError::not_found("Appointment"))?,
        ),
        _ => None,
    };

    let folder = upload_folder(payload.kind, scope.shop_id, user.user_id);
    let asset = state.media.upload(&prepared.data_uri, &folder).await?;
    tracing::info!(
        user_id = %user.user_id,
        kind = ?payload.kind,
        bytes = prepared.size,
        public_id = %asset.public_id,
        "media uploaded"
    );

    let txn = state.orm.begin().await?;

    let record = UploadActive {
        id: Set(Uuid::new_v4()),
        kind: Set(payload.kind),
        shop_id: Set(scope.shop_id),
        uploader_user_id: Set(user.user_id),
        appointment_id: Set(appointment.as_ref().map(|a| a.id)),
        secure_url: Set(asset.secure_url.clone()),
        public_id: Set(asset.public_id.clone()),
        asset_id: Set(asset.asset_id.clone()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    match payload.kind {
        UploadKind::Profile => {
            let mut account: UserActive = Users::find_by_id(user.user_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::not_found("User"))?
                .into();
            account.profile_image_url = Set(Some(asset.secure_url.clone()));
            account.updated_at = Set(Utc::now().into());
            account.update(&txn).await?;
        }
        UploadKind::Payment => {
            if let Some(appointment) = appointment {
                let mut active: AppointmentActive = appointment.into();
                active.proof_url = Set(Some(asset.secure_url.clone()));
                active.updated_at = Set(Utc::now().into());
                active.update(&txn).await?;
            }
        }
    }

    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "media_upload",
        "media_uploads",
        serde_json::json!({ "upload_id": record.id, "kind": record.kind }),
    )
    .await;

    Ok(ApiResponse::success(
        "Uploaded",
        UploadResponse {
            id: record.id,
            secure_url: record.secure_url,
            public_id: record.public_id,
            asset_id: record.asset_id,
        },
        Some(Meta::empty()),
    ))
}
