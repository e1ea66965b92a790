use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{Duration, TimeZone, Utc};
use luxe_salon_api::{
    config::AppConfig,
    entity::{
        sea_orm_active_enums::{ApprovalAction, ApprovalStatus, PaymentMethod, UploadKind},
        sessions,
    },
    error::AppError,
    media::sign_upload,
    rate_limit::LoginLimiter,
    routes::params::{MAX_PAGE, Pagination},
    services::{
        appointment_service::{parse_date_bound, utc_day_bounds},
        approval_service::{Transition, transition},
        session_service::{decode_token, issue_token, needs_refresh},
        upload_service::{prepare_payload, upload_folder},
    },
    shop_code, validation,
};
use uuid::Uuid;

fn config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        app_env: "test".into(),
        jwt_secret: "rules-secret".into(),
        allowed_origins: Vec::new(),
        email_domain: "luxe.com".into(),
        session_ttl_hours: 24,
        session_long_ttl_days: 7,
        body_limit_bytes: 1024,
        upload_max_bytes: 1024,
        login_max_attempts: 10,
        login_window_seconds: 60,
        media: None,
    }
}

#[test]
fn registration_fields_are_validated_with_field_hints() {
    assert_eq!(validation::require_name("name", "  Ana  ").unwrap(), "Ana");
    assert!(matches!(
        validation::require_name("managerName", " A "),
        Err(AppError::Validation { field: "managerName", .. })
    ));

    assert!(validation::require_phone("(11) 98888-7777").is_ok());
    assert!(matches!(
        validation::require_phone("12345"),
        Err(AppError::Validation { field: "phone", .. })
    ));

    assert_eq!(
        validation::require_email_prefix("Joao.Silva").unwrap(),
        "joao.silva"
    );
    assert!(validation::require_email_prefix("ab").is_err());
    assert!(validation::require_email_prefix("joao_silva").is_err());
    assert!(validation::require_email_prefix(&"a".repeat(51)).is_err());
    assert_eq!(
        validation::build_email("joao.silva", "luxe.com"),
        "joao.silva@luxe.com"
    );

    assert!(validation::require_password("abc12345", "abc12345").is_ok());
    assert!(validation::require_password("short1", "short1").is_err());
    assert!(validation::require_password("abc 12345", "abc 12345").is_err());
    assert!(matches!(
        validation::require_password("abc12345", "abc12346"),
        Err(AppError::Validation { field: "confirmPassword", .. })
    ));

    assert_eq!(validation::require_shop_code(" lx-ab12cd ").unwrap(), "LX-AB12CD");
    assert!(validation::require_shop_code("LX").is_err());
    assert!(validation::require_shop_code("LX-0123456789").is_err());
}

#[test]
fn amounts_and_rates_stay_in_range() {
    assert_eq!(validation::require_commission_rate(0).unwrap(), 0);
    assert_eq!(validation::require_commission_rate(100).unwrap(), 100);
    assert!(validation::require_commission_rate(-1).is_err());
    assert!(validation::require_commission_rate(101).is_err());
    assert_eq!(validation::require_amount("amount", 0).unwrap(), 0);
    assert!(validation::require_amount("amount", -1).is_err());
    assert_eq!(
        validation::require_amount("price", validation::MAX_AMOUNT).unwrap(),
        i64::from(i32::MAX)
    );
    assert!(matches!(
        validation::require_amount("price", validation::MAX_AMOUNT + 1),
        Err(AppError::Validation { field: "price", .. })
    ));
    assert!(validation::require_amount("amount", i64::MAX).is_err());
}

#[test]
fn pagination_clamps_page_and_size() {
    let (page, per_page, offset) = Pagination::default().normalize();
    assert_eq!((page, per_page, offset), (1, 20, 0));

    let (page, per_page, offset) = Pagination {
        page: Some(3),
        per_page: Some(500),
    }
    .normalize();
    assert_eq!((page, per_page, offset), (3, 100, 200));

    let (page, _, offset) = Pagination {
        page: Some(i64::MAX),
        per_page: Some(100),
    }
    .normalize();
    assert_eq!(page, MAX_PAGE);
    assert_eq!(offset, (MAX_PAGE - 1) * 100);

    let (page, per_page, offset) = Pagination {
        page: Some(i64::MIN),
        per_page: Some(0),
    }
    .normalize();
    assert_eq!((page, per_page, offset), (1, 1, 0));
}

#[test]
fn shop_codes_have_prefix_and_upper_alphanumeric_suffix() {
    for _ in 0..50 {
        let code = shop_code::generate_candidate();
        assert_eq!(code.len(), shop_code::PREFIX.len() + shop_code::SUFFIX_LEN);
        let suffix = code.strip_prefix(shop_code::PREFIX).expect("prefix");
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
        assert!(validation::require_shop_code(&code).is_ok());
    }
}

#[test]
fn digital_payments_require_proof() {
    assert!(!PaymentMethod::Cash.requires_proof());
    assert!(PaymentMethod::Pix.requires_proof());
    assert!(PaymentMethod::Card.requires_proof());
}

#[test]
fn approval_transitions() {
    use ApprovalAction::{Approve, Reject};
    use ApprovalStatus::{Active, PendingApproval, Rejected};

    assert_eq!(transition(PendingApproval, Approve).unwrap(), Transition::Approve);
    assert_eq!(transition(PendingApproval, Reject).unwrap(), Transition::Reject);
    assert_eq!(transition(Active, Approve).unwrap(), Transition::ReplayApprove);
    assert!(matches!(transition(Active, Reject), Err(AppError::Conflict(_))));
    assert!(matches!(transition(Rejected, Approve), Err(AppError::Conflict(_))));
    assert!(matches!(transition(Rejected, Reject), Err(AppError::Conflict(_))));
}

#[test]
fn date_filters_accept_days_and_timestamps() {
    let start = parse_date_bound("startDate", "2025-03-10", false).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());

    let end = parse_date_bound("endDate", "2025-03-10", true).unwrap();
    assert!(end > Utc.with_ymd_and_hms(2025, 3, 10, 23, 59, 59).unwrap());
    assert!(end < Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap());

    let exact = parse_date_bound("startDate", "2025-03-10T12:30:00-03:00", false).unwrap();
    assert_eq!(exact, Utc.with_ymd_and_hms(2025, 3, 10, 15, 30, 0).unwrap());

    assert!(matches!(
        parse_date_bound("endDate", "10/03/2025", true),
        Err(AppError::Validation { field: "endDate", .. })
    ));

    let late = Utc.with_ymd_and_hms(2025, 3, 10, 22, 15, 0).unwrap();
    let (day_start, day_end) = utc_day_bounds(late);
    assert_eq!(day_start, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
    assert_eq!(day_end, Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap());
}

#[test]
fn upload_payloads_are_checked_before_forwarding() {
    let raw = STANDARD.encode(b"fake image bytes");

    let plain = prepare_payload(&raw, 1024).unwrap();
    assert_eq!(plain.size, 16);
    assert_eq!(plain.data_uri, format!("data:image/jpeg;base64,{raw}"));

    let uri = format!("data:image/png;base64,{raw}");
    assert_eq!(prepare_payload(&uri, 1024).unwrap().data_uri, uri);

    assert!(matches!(
        prepare_payload("not base64!", 1024),
        Err(AppError::Validation { field: "dataBase64", .. })
    ));
    assert!(prepare_payload("", 1024).is_err());
    assert!(prepare_payload("data:image/png,abc", 1024).is_err());
    assert!(prepare_payload(&raw, 8).is_err());

    let shop = Uuid::new_v4();
    let user = Uuid::new_v4();
    assert_eq!(
        upload_folder(UploadKind::Profile, shop, user),
        format!("salons/{shop}/professionals/{user}/profile")
    );
    assert_eq!(
        upload_folder(UploadKind::Payment, shop, user),
        format!("salons/{shop}/payments/{user}/receipts")
    );
}

#[test]
fn media_signature_is_sha256_hex_of_sorted_params_and_secret() {
    assert_eq!(
        sign_upload("salons/demo", 1_700_000_000, "abc123"),
        "5d201228974806873bea42261e48a1e1b5b58c418ce6d4eb67eea3b561fbe532"
    );
}

fn session(ttl_seconds: i64, remaining: Duration) -> sessions::Model {
    let now = Utc::now();
    sessions::Model {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        expires_at: (now + remaining).into(),
        ttl_seconds,
        created_at: now.into(),
        last_seen_at: now.into(),
    }
}

#[test]
fn session_lifetimes_and_sliding_refresh() {
    let config = config();
    assert_eq!(config.session_ttl_seconds(false), 24 * 60 * 60);
    assert_eq!(config.session_ttl_seconds(true), 7 * 24 * 60 * 60);

    let fresh = session(3600, Duration::minutes(50));
    assert!(!needs_refresh(&fresh, Utc::now()));
    let stale = session(3600, Duration::minutes(20));
    assert!(needs_refresh(&stale, Utc::now()));
}

#[test]
fn session_tokens_round_trip_and_reject_tampering() {
    let config = config();
    let model = session(3600, Duration::hours(1));
    let token = issue_token(&config, &model, Utc::now()).unwrap();

    let (user_id, session_id) = decode_token(&config, &token).unwrap();
    assert_eq!(user_id, model.user_id);
    assert_eq!(session_id, model.id);

    let other = AppConfig {
        jwt_secret: "another-secret".into(),
        ..config.clone()
    };
    assert!(matches!(
        decode_token(&other, &token),
        Err(AppError::Unauthorized(_))
    ));
    assert!(decode_token(&config, "garbage").is_err());
}

#[test]
fn session_token_comes_from_cookie_then_bearer_header() {
    use axum::http::{HeaderMap, HeaderValue, header};
    use luxe_salon_api::middleware::auth::extract_token;

    let mut headers = HeaderMap::new();
    assert_eq!(extract_token(&headers), None);

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
    assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));

    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("theme=dark; luxe_session=from-cookie"),
    );
    assert_eq!(extract_token(&headers).as_deref(), Some("from-cookie"));
}

#[test]
fn login_limiter_uses_a_sliding_window_per_key() {
    use std::time::{Duration as StdDuration, Instant};

    let limiter = LoginLimiter::new(3, StdDuration::from_secs(60));
    let start = Instant::now();
    for i in 0..3 {
        assert!(limiter.hit_at("login:10.0.0.1", start + StdDuration::from_secs(i)).is_ok());
    }
    assert!(matches!(
        limiter.hit_at("login:10.0.0.1", start + StdDuration::from_secs(10)),
        Err(AppError::TooManyRequests(_))
    ));
    assert!(limiter.hit_at("login:10.0.0.2", start + StdDuration::from_secs(10)).is_ok());

    // The first attempt leaves the window after 60s, freeing one slot.
    assert!(limiter.hit_at("login:10.0.0.1", start + StdDuration::from_secs(61)).is_ok());
    assert!(limiter.hit_at("login:10.0.0.1", start + StdDuration::from_secs(61)).is_err());
}
