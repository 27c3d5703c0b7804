// src/services/search_service.rs

use crate::{
    common::error::AppError,
    db::SearchRepository,
    models::search::{SearchQuery, SearchResults},
};

#[derive(Clone)]
pub struct SearchService {
    repo: SearchRepository,
}

impl SearchService {
    pub fn new(repo: SearchRepository) -> Self {
        Self { repo }
    }

    /// Active products by name or barcode, active customers by name or phone,
    /// and invoices by number; at most ten of each.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, AppError> {
        let term = query.term()?;

        let (products, customers, invoices) = tokio::try_join!(
            self.repo.products(term),
            self.repo.customers(term),
            self.repo.invoices(term),
        )?;

        Ok(SearchResults {
            products,
            customers,
            invoices,
        })
    }
}
