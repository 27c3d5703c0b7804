// src/models/activity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::auth::User;

const DEFAULT_ACTIVITY_LIMIT: u32 = 50;
const MAX_ACTIVITY_LIMIT: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "activity_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Login,
    Create,
    Update,
    Delete,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "activity_entity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityEntity {
    User,
    Product,
    Category,
    Invoice,
    InstallmentPlan,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub action: ActivityAction,
    pub entity_type: ActivityEntity,
    pub entity_id: Option<Uuid>,
    #[schema(example = "Created product: Samsung 55\" TV")]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// One row to append to the log.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<Uuid>,
    pub action: ActivityAction,
    pub entity_type: ActivityEntity,
    pub entity_id: Option<Uuid>,
    pub description: String,
}

impl NewActivity {
    pub fn by(
        actor: &User,
        action: ActivityAction,
        entity_type: ActivityEntity,
        entity_id: Uuid,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Some(actor.id),
            action,
            entity_type,
            entity_id: Some(entity_id),
            description: description.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    pub user_id: Option<Uuid>,
    pub entity_type: Option<ActivityEntity>,
    pub entity_id: Option<Uuid>,
    /// Most recent entries first; defaults to 50, capped at 200.
    pub limit: Option<u32>,
}

impl ActivityQuery {
    pub fn limit(&self) -> i64 {
        i64::from(
            self.limit
                .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
                .clamp(1, MAX_ACTIVITY_LIMIT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(ActivityQuery::default().limit(), 50);
        let q = ActivityQuery { limit: Some(0), ..Default::default() };
        assert_eq!(q.limit(), 1);
        let q = ActivityQuery { limit: Some(10_000), ..Default::default() };
        assert_eq!(q.limit(), 200);
    }

    #[test]
    fn entity_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&ActivityEntity::InstallmentPlan).unwrap(),
            "\"installment_plan\""
        );
        assert_eq!(serde_json::to_string(&ActivityAction::Login).unwrap(), "\"login\"");
    }
}
