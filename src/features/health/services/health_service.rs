use std::sync::Arc;
use tracing::debug;

use crate::core::error::Result;
use crate::core::metrics::{time_dependency, DEP_DATABASE};
use crate::features::health::repositories::HealthRepository;
use crate::shared::constants::ROUTE_HEALTHZ;

/// Service behind the liveness check
pub struct HealthService {
    repository: Arc<dyn HealthRepository>,
}

impl HealthService {
    pub fn new(repository: Arc<dyn HealthRepository>) -> Self {
        Self { repository }
    }

    /// Record that a health check happened. Not retried on failure.
    pub async fn record_check(&self) -> Result<()> {
        let row = time_dependency(ROUTE_HEALTHZ, DEP_DATABASE, self.repository.insert()).await?;
        debug!("Health check recorded: id={}, datetime={}", row.id, row.datetime);
        Ok(())
    }
}
