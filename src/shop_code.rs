use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::{
    entity::shops::{Column as ShopCol, Entity as Shops},
    error::{AppError, AppResult},
};

pub const PREFIX: &str = "LX-";
pub const SUFFIX_LEN: usize = 6;
pub const MAX_ATTEMPTS: usize = 10;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A random candidate such as `LX-7QK2M9`.
pub fn generate_candidate() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{PREFIX}{suffix}")
}

/// Pick a code not used by any shop, giving up after [`MAX_ATTEMPTS`].
pub async fn allocate<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    for attempt in 1..=MAX_ATTEMPTS {
        let candidate = generate_candidate();
        let taken = Shops::find()
            .filter(ShopCol::Code.eq(candidate.as_str()))
            .count(conn)
            .await?;
        if taken == 0 {
            return Ok(candidate);
        }
        tracing::debug!(attempt, "shop code collision");
    }

    Err(AppError::Internal(anyhow::anyhow!(
        "could not allocate a unique shop code after {MAX_ATTEMPTS} attempts"
    )))
}
