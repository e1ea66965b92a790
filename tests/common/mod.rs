#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use luxe_salon_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        auth::{LoginRequest, ManagerRegistration, ProfessionalRegistration, RegisterRequest},
        professionals::DecisionRequest,
    },
    entity::sea_orm_active_enums::ApprovalAction,
    error::{AppError, AppResult},
    media::{MediaHost, UploadedAsset},
    middleware::auth::AuthUser,
    services::{approval_service, auth_service, session_service},
    state::AppState,
};
use tokio::sync::OnceCell;
use uuid::Uuid;

pub const PASSWORD: &str = "secret123";

/// Records every upload and answers with a predictable asset.
#[derive(Default)]
pub struct FakeMediaHost {
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, _data_base64: &str, folder: &str) -> AppResult<UploadedAsset> {
        if self.fail {
            return Err(AppError::Upstream("Upload to media host failed".into()));
        }
        let mut calls = self.calls.lock().expect("media calls lock");
        calls.push(folder.to_string());
        let n = calls.len();
        Ok(UploadedAsset {
            secure_url: format!("https://media.test/{folder}/{n}.jpg"),
            public_id: format!("{folder}/{n}"),
            asset_id: format!("asset-{n}"),
        })
    }
}

pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            None
        }
    }
}

pub fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        app_env: "test".into(),
        jwt_secret: "test-secret".into(),
        allowed_origins: vec!["http://localhost:5173".into()],
        email_domain: "luxe.com".into(),
        session_ttl_hours: 24,
        session_long_ttl_days: 7,
        body_limit_bytes: 8 * 1024 * 1024,
        upload_max_bytes: 1024,
        login_max_attempts: 10,
        login_window_seconds: 60,
        media: None,
    }
}

static MIGRATED: OnceCell<()> = OnceCell::const_new();

pub async fn setup_state(
    database_url: &str,
    media: Arc<dyn MediaHost>,
) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    // Tests in one binary share the schema; migrate once per process.
    MIGRATED
        .get_or_try_init(|| async { run_migrations(&orm).await })
        .await?;
    Ok(AppState::new(orm, test_config(database_url), media))
}

/// A fresh email prefix so concurrent tests never share accounts or shops.
pub fn unique_prefix(label: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{label}.{}", &id[..12])
}

pub fn email_for(prefix: &str) -> String {
    format!("{prefix}@luxe.com")
}

pub fn manager_registration(prefix: &str) -> RegisterRequest {
    RegisterRequest::Manager(ManagerRegistration {
        manager_name: "Ana Gerente".into(),
        shop_name: "Salão Luxe".into(),
        phone: "(11) 98888-7777".into(),
        email_prefix: prefix.to_string(),
        password: PASSWORD.into(),
        confirm_password: PASSWORD.into(),
    })
}

pub fn professional_registration(prefix: &str, shop_code: &str) -> RegisterRequest {
    RegisterRequest::Professional(ProfessionalRegistration {
        name: "Bruno Barbeiro".into(),
        phone: "11977776666".into(),
        email_prefix: prefix.to_string(),
        password: PASSWORD.into(),
        confirm_password: PASSWORD.into(),
        shop_code: shop_code.to_string(),
    })
}

/// Log in and resolve the issued token the way the request extractor does.
pub async fn authenticate(state: &AppState, email: &str) -> AppResult<AuthUser> {
    let (_, issued) = auth_service::login(
        state,
        LoginRequest {
            email: email.to_string(),
            password: PASSWORD.into(),
            keep_connected: false,
        },
    )
    .await?;

    let session = session_service::resolve(state, &issued.token).await?;
    let profile = session_service::load_profile(state, session.user_id).await?;
    Ok(AuthUser {
        user_id: session.user_id,
        session_id: session.id,
        profile,
    })
}

pub struct ShopFixture {
    pub manager: AuthUser,
    pub shop_id: Uuid,
    pub shop_code: String,
}

/// Registers a manager with a new shop and logs them in.
pub async fn new_shop(state: &AppState) -> anyhow::Result<ShopFixture> {
    let prefix = unique_prefix("mgr");
    let (resp, _) = auth_service::register(state, manager_registration(&prefix)).await?;
    let shop = resp
        .data
        .and_then(|account| account.shop)
        .expect("manager registration returns the shop");
    let manager = authenticate(state, &email_for(&prefix)).await?;
    Ok(ShopFixture {
        manager,
        shop_id: shop.id,
        shop_code: shop.code,
    })
}

/// Registers a professional against `shop_code` and returns their user id.
pub async fn register_professional(
    state: &AppState,
    shop_code: &str,
) -> anyhow::Result<(Uuid, String)> {
    let prefix = unique_prefix("pro");
    let registration = professional_registration(&prefix, shop_code);
    let (resp, _) = auth_service::register(state, registration).await?;
    let user_id = resp.data.expect("account").user.id;
    Ok((user_id, email_for(&prefix)))
}

/// Registers a professional and has the shop manager approve them.
pub async fn approved_professional(
    state: &AppState,
    manager: &AuthUser,
    shop_code: &str,
) -> anyhow::Result<AuthUser> {
    let (pro_id, email) = register_professional(state, shop_code).await?;
    approval_service::decide(
        state,
        manager,
        pro_id,
        DecisionRequest {
            action: ApprovalAction::Approve,
        },
    )
    .await?;
    Ok(authenticate(state, &email).await?)
}
