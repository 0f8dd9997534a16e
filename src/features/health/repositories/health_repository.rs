use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::AppError;
use crate::features::health::models::HealthCheck;

/// Persistence for liveness rows
#[async_trait]
pub trait HealthRepository: Send + Sync {
    /// Insert one `healthcheck` row, letting the store assign id and timestamp
    async fn insert(&self) -> Result<HealthCheck, AppError>;
}

pub struct PgHealthRepository {
    pool: PgPool,
}

impl PgHealthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthRepository for PgHealthRepository {
    async fn insert(&self) -> Result<HealthCheck, AppError> {
        let row = sqlx::query_as::<_, HealthCheck>(
            r#"
            INSERT INTO healthcheck DEFAULT VALUES
            RETURNING id, datetime
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
