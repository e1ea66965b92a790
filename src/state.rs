use std::{sync::Arc, time::Duration};

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, media::MediaHost, rate_limit::LoginLimiter};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub media: Arc<dyn MediaHost>,
    pub login_limiter: Arc<LoginLimiter>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: AppConfig, media: Arc<dyn MediaHost>) -> Self {
        let login_limiter = LoginLimiter::new(
            config.login_max_attempts,
            Duration::from_secs(config.login_window_seconds),
        );
        Self {
            orm,
            config: Arc::new(config),
            media,
            login_limiter: Arc::new(login_limiter),
        }
    }
}
