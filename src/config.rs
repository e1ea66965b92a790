use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub app_env: String,
    pub jwt_secret: String,
    pub allowed_origins: Vec<String>,
    pub email_domain: String,
    pub session_ttl_hours: i64,
    pub session_long_ttl_days: i64,
    pub body_limit_bytes: usize,
    pub upload_max_bytes: usize,
    pub login_max_attempts: usize,
    pub login_window_seconds: u64,
    /// Upload forwarding is disabled when any media credential is missing.
    pub media: Option<MediaConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let email_domain = env::var("EMAIL_DOMAIN").unwrap_or_else(|_| "luxe.com".to_string());

        let media = match (
            env::var("MEDIA_CLOUD_NAME"),
            env::var("MEDIA_API_KEY"),
            env::var("MEDIA_API_SECRET"),
        ) {
            (Ok(cloud_name), Ok(api_key), Ok(api_secret)) => Some(MediaConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            app_env,
            jwt_secret,
            allowed_origins,
            email_domain,
            session_ttl_hours: parse_or("SESSION_TTL_HOURS", 24),
            session_long_ttl_days: parse_or("SESSION_LONG_TTL_DAYS", 7),
            body_limit_bytes: parse_or("BODY_LIMIT_BYTES", 8 * 1024 * 1024),
            upload_max_bytes: parse_or("UPLOAD_MAX_BYTES", 5 * 1024 * 1024),
            login_max_attempts: parse_or("LOGIN_MAX_ATTEMPTS", 10),
            login_window_seconds: parse_or("LOGIN_WINDOW_SECONDS", 60),
            media,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// Session lifetime in seconds; `keep_connected` selects the long lifetime.
    pub fn session_ttl_seconds(&self, keep_connected: bool) -> i64 {
        if keep_connected {
            self.session_long_ttl_days * 24 * 60 * 60
        } else {
            self.session_ttl_hours * 60 * 60
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}
