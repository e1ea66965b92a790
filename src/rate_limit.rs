use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use dashmap::DashMap;

use crate::error::{AppError, AppResult};

/// Keys kept before idle windows are swept.
const SWEEP_THRESHOLD: usize = 4096;

/// Sliding-window counter per key (client IP for logins).
#[derive(Debug)]
pub struct LoginLimiter {
    max_attempts: usize,
    window: Duration,
    hits: DashMap<String, VecDeque<Instant>>,
}

impl LoginLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            hits: DashMap::new(),
        }
    }

    pub fn hit(&self, key: &str) -> AppResult<()> {
        self.hit_at(key, Instant::now())
    }

    /// Records one attempt at `now`; fails once `max_attempts` were already
    /// recorded inside the window.
    pub fn hit_at(&self, key: &str, now: Instant) -> AppResult<()> {
        if self.hits.len() > SWEEP_THRESHOLD {
            let window = self.window;
            self.hits
                .retain(|_, queue| queue.back().is_some_and(|t| now.duration_since(*t) <= window));
        }

        let mut queue = self.hits.entry(key.to_string()).or_default();
        while queue
            .front()
            .is_some_and(|t| now.duration_since(*t) > self.window)
        {
            queue.pop_front();
        }

        if queue.len() >= self.max_attempts {
            tracing::warn!(key, attempts = queue.len(), "login rate limit exceeded");
            return Err(AppError::TooManyRequests(
                "Too many login attempts, try again later".into(),
            ));
        }
        queue.push_back(now);
        Ok(())
    }
}
