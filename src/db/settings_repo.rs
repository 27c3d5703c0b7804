// src/db/settings_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::settings::{ShopSettings, UpdateSettingsRequest},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The single settings row, or defaults while the shop has not saved any.
    pub async fn get_settings(&self) -> Result<ShopSettings, AppError> {
        let settings = sqlx::query_as::<_, ShopSettings>(
            r#"
            SELECT shop_name, phone, address, currency_symbol, receipt_footer, updated_at
            FROM shop_settings
            WHERE id
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings.unwrap_or_default())
    }

    /// Upsert; absent fields keep their stored value.
    pub async fn update_settings(&self, input: &UpdateSettingsRequest) -> Result<ShopSettings, AppError> {
        let settings = sqlx::query_as::<_, ShopSettings>(
            r#"
            INSERT INTO shop_settings (id, shop_name, phone, address, currency_symbol, receipt_footer)
            VALUES (TRUE, $1, $2, $3, COALESCE($4, '$'), $5)
            ON CONFLICT (id) DO UPDATE SET
                shop_name       = COALESCE($1, shop_settings.shop_name),
                phone           = COALESCE($2, shop_settings.phone),
                address         = COALESCE($3, shop_settings.address),
                currency_symbol = COALESCE($4, shop_settings.currency_symbol),
                receipt_footer  = COALESCE($5, shop_settings.receipt_footer),
                updated_at      = NOW()
            RETURNING shop_name, phone, address, currency_symbol, receipt_footer, updated_at
            "#,
        )
        .bind(&input.shop_name)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.currency_symbol)
        .bind(&input.receipt_footer)
        .fetch_one(&self.pool)
        .await?;
        Ok(settings)
    }
}
