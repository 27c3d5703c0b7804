// src/models/installment_plan.rs

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, models::product::has_money_scale};

/// A named set of sale terms: how many months and how much must be paid up front.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    pub id: Uuid,
    #[schema(example = "12 months")]
    pub name: String,
    #[schema(example = 12)]
    pub months: i32,
    /// Markup percentage shown to the customer; prices are not recomputed from it.
    #[schema(example = "20.00")]
    pub interest_rate: Decimal,
    /// Minimum down payment, as a percentage of the invoice total.
    #[schema(example = "10.00")]
    pub min_down_payment: Decimal,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InstallmentPlan {
    /// Smallest down payment the plan accepts on `total`, rounded up to the cent.
    pub fn required_down_payment(&self, total: Decimal) -> Decimal {
        (total * self.min_down_payment / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity)
    }

    /// Checks a sale against the plan and returns the number of months to schedule.
    pub fn terms_for(
        &self,
        requested_months: Option<u32>,
        total: Decimal,
        down_payment: Decimal,
    ) -> Result<u32, AppError> {
        if !self.is_active {
            return Err(AppError::InvalidInput(format!(
                "Installment plan '{}' is no longer offered",
                self.name
            )));
        }

        let months = u32::try_from(self.months)
            .map_err(|_| AppError::InvalidInput(format!("Plan '{}' has no valid term", self.name)))?;
        if let Some(requested) = requested_months {
            if requested != months {
                return Err(AppError::InvalidInput(format!(
                    "Plan '{}' runs {} months, not {}",
                    self.name, months, requested
                )));
            }
        }

        let required = self.required_down_payment(total);
        if down_payment < required {
            return Err(AppError::InvalidInput(format!(
                "Plan '{}' requires a down payment of at least {}",
                self.name, required
            )));
        }
        Ok(months)
    }
}

fn validate_percent(val: &Decimal) -> Result<(), ValidationError> {
    if *val < Decimal::ZERO || *val > Decimal::ONE_HUNDRED || !has_money_scale(val) {
        let mut err = ValidationError::new("percent");
        err.message = Some("Percentages go from 0 to 100 with at most two decimals.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanPayload {
    #[validate(length(min = 1, max = 100, message = "Name is required."))]
    pub name: String,
    #[validate(range(min = 1, max = 120, message = "Months must be between 1 and 120."))]
    pub months: i32,
    #[validate(custom(function = "validate_percent"))]
    pub interest_rate: Option<Decimal>,
    #[validate(custom(function = "validate_percent"))]
    pub min_down_payment: Option<Decimal>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanPayload {
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty."))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 120, message = "Months must be between 1 and 120."))]
    pub months: Option<i32>,
    #[validate(custom(function = "validate_percent"))]
    pub interest_rate: Option<Decimal>,
    #[validate(custom(function = "validate_percent"))]
    pub min_down_payment: Option<Decimal>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PlanQuery {
    /// Include plans that are no longer offered.
    pub include_inactive: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn plan(months: i32, min_down_payment: Decimal) -> InstallmentPlan {
        InstallmentPlan {
            id: Uuid::new_v4(),
            name: format!("{months} months"),
            months,
            interest_rate: dec!(15),
            min_down_payment,
            is_active: true,
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn plan_supplies_the_term_when_none_is_given() {
        let p = plan(6, Decimal::ZERO);
        assert_eq!(p.terms_for(None, dec!(600), Decimal::ZERO).unwrap(), 6);
        assert_eq!(p.terms_for(Some(6), dec!(600), Decimal::ZERO).unwrap(), 6);
    }

    #[test]
    fn conflicting_term_is_rejected() {
        let p = plan(6, Decimal::ZERO);
        assert!(matches!(
            p.terms_for(Some(12), dec!(600), Decimal::ZERO),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn down_payment_below_plan_minimum_is_rejected() {
        let p = plan(12, dec!(10));
        assert_eq!(p.required_down_payment(dec!(1200)), dec!(120.00));
        assert!(p.terms_for(None, dec!(1200), dec!(119.99)).is_err());
        assert_eq!(p.terms_for(None, dec!(1200), dec!(120)).unwrap(), 12);
    }

    #[test]
    fn required_down_payment_rounds_up_to_the_cent() {
        let p = plan(12, dec!(10));
        assert_eq!(p.required_down_payment(dec!(999.95)), dec!(100.00));
    }

    #[test]
    fn inactive_plan_is_rejected() {
        let mut p = plan(3, Decimal::ZERO);
        p.is_active = false;
        assert!(p.terms_for(None, dec!(300), Decimal::ZERO).is_err());
    }

    #[test]
    fn percentages_outside_range_fail_validation() {
        let payload = CreatePlanPayload {
            name: "Long".into(),
            months: 24,
            interest_rate: Some(dec!(100.5)),
            min_down_payment: Some(dec!(-1)),
            sort_order: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("interest_rate"));
        assert!(errors.field_errors().contains_key("min_down_payment"));
    }
}
