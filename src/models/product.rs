// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::invoice::SaleType;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    #[schema(example = "Samsung 55\" TV")]
    pub name: String,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[schema(example = "1200.00")]
    pub cash_price: Decimal,
    #[schema(example = "1440.00")]
    pub installment_price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub quantity: i32,
    pub min_quantity: i32,
    pub warranty_months: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Default unit price for a sale of the given type.
    pub fn price_for(&self, sale_type: SaleType) -> Decimal {
        match sale_type {
            SaleType::Cash => self.cash_price,
            SaleType::Installment => self.installment_price.unwrap_or(self.cash_price),
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}

/// Money columns are NUMERIC(12,2).
pub const MONEY_SCALE: u32 = 2;

pub(crate) fn has_money_scale(val: &Decimal) -> bool {
    val.normalize().scale() <= MONEY_SCALE
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("Value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

/// Non-negative amount with at most two decimal places.
pub(crate) fn validate_money(val: &Decimal) -> Result<(), ValidationError> {
    validate_not_negative(val)?;
    if !has_money_scale(val) {
        let mut err = ValidationError::new("scale");
        err.add_param("max".into(), &MONEY_SCALE);
        err.message = Some("Amounts cannot have more than two decimal places.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, max = 200, message = "Name is required."))]
    pub name: String,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,

    #[validate(custom(function = "validate_money"))]
    pub cash_price: Decimal,
    #[validate(custom(function = "validate_money"))]
    pub installment_price: Option<Decimal>,
    #[validate(custom(function = "validate_money"))]
    pub cost_price: Option<Decimal>,

    #[validate(range(min = 0, message = "Quantity cannot be negative."))]
    #[serde(default)]
    pub quantity: i32,
    #[validate(range(min = 0, message = "Minimum quantity cannot be negative."))]
    pub min_quantity: Option<i32>,
    #[validate(range(min = 0, max = 120))]
    #[serde(default)]
    pub warranty_months: i32,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, max = 200, message = "Name cannot be empty."))]
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(custom(function = "validate_money"))]
    pub cash_price: Option<Decimal>,
    #[validate(custom(function = "validate_money"))]
    pub installment_price: Option<Decimal>,
    #[validate(custom(function = "validate_money"))]
    pub cost_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Quantity cannot be negative."))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0))]
    pub min_quantity: Option<i32>,
    #[validate(range(min = 0, max = 120))]
    pub warranty_months: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Matches name, barcode or brand.
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub low_stock: Option<bool>,
    /// Include inactive products.
    pub include_inactive: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(installment_price: Option<Decimal>) -> Product {
        Product {
            id: Uuid::new_v4(),
            category_id: None,
            name: "Washer".into(),
            description: None,
            barcode: None,
            sku: None,
            brand: None,
            model: None,
            cash_price: dec!(500.00),
            installment_price,
            cost_price: Some(dec!(350.00)),
            quantity: 4,
            min_quantity: 5,
            warranty_months: 12,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn installment_price_falls_back_to_cash_price() {
        assert_eq!(product(None).price_for(SaleType::Installment), dec!(500.00));
        assert_eq!(product(Some(dec!(600.00))).price_for(SaleType::Installment), dec!(600.00));
        assert_eq!(product(Some(dec!(600.00))).price_for(SaleType::Cash), dec!(500.00));
    }

    #[test]
    fn low_stock_is_inclusive() {
        assert!(product(None).is_low_stock());
    }

    #[test]
    fn negative_prices_fail_validation() {
        assert!(validate_not_negative(&dec!(-0.01)).is_err());
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
    }

    #[test]
    fn money_rejects_sub_cent_precision() {
        assert!(validate_money(&dec!(99.999)).is_err());
        assert!(validate_money(&dec!(99.99)).is_ok());
        assert!(validate_money(&dec!(100.000)).is_ok());
        assert!(validate_money(&dec!(-1.00)).is_err());
    }

    #[test]
    fn product_payload_rejects_three_decimal_price() {
        let payload = CreateProductPayload {
            name: "Fridge".into(),
            category_id: None,
            description: None,
            barcode: None,
            sku: None,
            brand: None,
            model: None,
            cash_price: dec!(899.995),
            installment_price: None,
            cost_price: None,
            quantity: 1,
            min_quantity: None,
            warranty_months: 0,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("cash_price"));
    }
}
