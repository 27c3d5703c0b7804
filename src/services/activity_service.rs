// src/services/activity_service.rs

use crate::{
    common::error::AppError,
    db::ActivityRepository,
    models::activity::{ActivityEntry, ActivityQuery, NewActivity},
};

#[derive(Clone)]
pub struct ActivityService {
    activity_repo: ActivityRepository,
}

impl ActivityService {
    pub fn new(activity_repo: ActivityRepository) -> Self {
        Self { activity_repo }
    }

    /// Appends an entry after the action it describes has been committed.
    /// A failed write is logged and swallowed; the action itself already happened.
    pub async fn record(&self, entry: NewActivity) {
        let pool = self.activity_repo.pool();
        if let Err(e) = self.activity_repo.insert(pool, &entry).await {
            tracing::warn!(
                error = %e,
                action = ?entry.action,
                entity_type = ?entry.entity_type,
                "Failed to write activity log entry"
            );
        }
    }

    pub async fn recent(&self, query: &ActivityQuery) -> Result<Vec<ActivityEntry>, AppError> {
        self.activity_repo.recent(query).await
    }
}
