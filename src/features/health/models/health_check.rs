use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row written to `healthcheck` for every successful health check
#[derive(Debug, Clone, FromRow)]
pub struct HealthCheck {
    pub id: i32,
    pub datetime: DateTime<Utc>,
}
