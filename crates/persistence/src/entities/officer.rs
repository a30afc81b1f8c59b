//! Officer credential entity.

use domain::models::Officer;
use sqlx::FromRow;

/// Database row mapping for the officers table.
#[derive(Debug, Clone, FromRow)]
pub struct OfficerEntity {
    pub badge_number: String,
    pub full_name: String,
    pub email: String,
    /// PHC-format hash string stored as raw bytes.
    pub password_hash: Vec<u8>,
}

impl From<OfficerEntity> for Officer {
    fn from(entity: OfficerEntity) -> Self {
        Self {
            badge_number: entity.badge_number,
            full_name: entity.full_name,
            email: entity.email,
            // A hash that is not valid UTF-8 can never verify; lossy decoding
            // keeps such rows failing closed.
            password_hash: String::from_utf8_lossy(&entity.password_hash).into_owned(),
        }
    }
}
