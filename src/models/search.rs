// src/models/search.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::AppError,
    models::{customer::Customer, invoice::InvoiceSummary, product::Product},
};

/// Hits per entity kind.
pub const SEARCH_LIMIT: i64 = 10;
const MIN_TERM_CHARS: usize = 2;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// At least two characters after trimming.
    pub q: Option<String>,
}

impl SearchQuery {
    pub fn term(&self) -> Result<&str, AppError> {
        let term = self.q.as_deref().map(str::trim).unwrap_or_default();
        if term.chars().count() < MIN_TERM_CHARS {
            return Err(AppError::InvalidInput(
                "Search term must have at least 2 characters".into(),
            ));
        }
        Ok(term)
    }
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub invoices: Vec<InvoiceSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(q: Option<&str>) -> SearchQuery {
        SearchQuery { q: q.map(str::to_string) }
    }

    #[test]
    fn short_or_blank_terms_are_rejected() {
        assert!(matches!(query(None).term(), Err(AppError::InvalidInput(_))));
        assert!(query(Some("a")).term().is_err());
        assert!(query(Some("  x  ")).term().is_err());
    }

    #[test]
    fn term_is_trimmed_and_counted_in_characters() {
        assert_eq!(query(Some("  tv ")).term().unwrap(), "tv");
        assert_eq!(query(Some("تل")).term().unwrap(), "تل");
    }
}
