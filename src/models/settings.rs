// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_SHOP_NAME: &str = "Installment Ledger";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    #[schema(example = "Al Noor Electronics")]
    pub shop_name: Option<String>,

    #[schema(example = "+963 11 222 3333")]
    pub phone: Option<String>,

    #[schema(example = "Main Street 12, Damascus")]
    pub address: Option<String>,

    #[schema(example = "$")]
    pub currency_symbol: String,

    #[schema(example = "Thank you for your business")]
    pub receipt_footer: Option<String>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            shop_name: None,
            phone: None,
            address: None,
            currency_symbol: "$".to_string(),
            receipt_footer: None,
            updated_at: None,
        }
    }
}

impl ShopSettings {
    pub fn display_name(&self) -> &str {
        self.shop_name.as_deref().unwrap_or(DEFAULT_SHOP_NAME)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(length(max = 120))]
    #[schema(example = "Al Noor Electronics")]
    pub shop_name: Option<String>,

    #[validate(length(max = 40))]
    pub phone: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 8, message = "Currency symbol must have 1 to 8 characters."))]
    pub currency_symbol: Option<String>,

    #[validate(length(max = 255))]
    pub receipt_footer: Option<String>,
}
