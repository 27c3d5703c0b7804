// src/models/category.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_CATEGORY_COLOR: &str = "#1e88e5";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    #[schema(example = "Televisions")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "tv")]
    pub icon: Option<String>,
    #[schema(example = "#1e88e5")]
    pub color: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub category: Category,
    pub products_count: i64,
}

// `#rgb` or `#rrggbb`
fn validate_color(color: &str) -> Result<(), ValidationError> {
    let hex = color.strip_prefix('#').unwrap_or("");
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        let mut err = ValidationError::new("color");
        err.message = Some("Color must be a hex value such as #1e88e5.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, max = 100, message = "Name is required."))]
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    #[validate(length(max = 50))]
    pub icon: Option<String>,
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryPayload {
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    #[validate(length(max = 50))]
    pub icon: Option<String>,
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    /// Matches name or description.
    pub search: Option<String>,
    pub include_inactive: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteCategoryQuery {
    /// Category that inherits the deleted one's products; none leaves them uncategorized.
    pub move_to: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(color: Option<&str>) -> CreateCategoryPayload {
        CreateCategoryPayload {
            name: "Phones".into(),
            description: None,
            parent_id: None,
            icon: None,
            color: color.map(str::to_string),
            sort_order: None,
        }
    }

    #[test]
    fn hex_colors_are_accepted() {
        assert!(payload(Some("#1e88e5")).validate().is_ok());
        assert!(payload(Some("#FFF")).validate().is_ok());
        assert!(payload(None).validate().is_ok());
    }

    #[test]
    fn malformed_colors_are_rejected() {
        for color in ["1e88e5", "#1e88e", "#zzzzzz", "red", "#"] {
            let errors = payload(Some(color)).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("color"), "{color} passed");
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut p = payload(None);
        p.name = String::new();
        assert!(p.validate().is_err());
    }
}
