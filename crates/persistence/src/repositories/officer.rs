//! Repository for officer credential operations.

use sqlx::SqlitePool;

use crate::entities::OfficerEntity;
use crate::metrics::QueryTimer;

/// Repository for the officers table.
#[derive(Clone)]
pub struct OfficerRepository {
    pool: SqlitePool,
}

impl OfficerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Finds an officer by badge number.
    ///
    /// Returns `None` if no officer with the given badge exists.
    pub async fn find_by_badge(
        &self,
        badge_number: &str,
    ) -> Result<Option<OfficerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_officer_by_badge");
        let result = sqlx::query_as::<_, OfficerEntity>(
            r#"
            SELECT badge_number, full_name, email, password_hash
            FROM officers
            WHERE badge_number = ?1
            "#,
        )
        .bind(badge_number)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result
    }

    /// Inserts a new officer.
    ///
    /// A duplicate badge number surfaces as a database error for which
    /// `is_unique_violation()` is true.
    pub async fn insert(
        &self,
        badge_number: &str,
        full_name: &str,
        email: &str,
        password_hash: &[u8],
    ) -> Result<OfficerEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_officer");
        let result = sqlx::query_as::<_, OfficerEntity>(
            r#"
            INSERT INTO officers (badge_number, full_name, email, password_hash)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING badge_number, full_name, email, password_hash
            "#,
        )
        .bind(badge_number)
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        result
    }

    /// Lists all officers ordered by badge number.
    pub async fn list(&self) -> Result<Vec<OfficerEntity>, sqlx::Error> {
        sqlx::query_as::<_, OfficerEntity>(
            r#"
            SELECT badge_number, full_name, email, password_hash
            FROM officers
            ORDER BY badge_number
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM officers")
            .fetch_one(&self.pool)
            .await
    }
}
