// src/db/counter_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};

use crate::common::error::AppError;

/// Document families numbered per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Invoice,
    Receipt,
}

impl DocumentKind {
    fn scope(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Receipt => "receipt",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "INV",
            DocumentKind::Receipt => "RCP",
        }
    }

    /// `PREFIX-YYYYMMDD-NNNN`; the sequence widens past 9999 instead of wrapping.
    pub fn format(&self, day: NaiveDate, sequence: i32) -> String {
        format!("{}-{}-{:04}", self.prefix(), day.format("%Y%m%d"), sequence)
    }
}

// Stateless: always runs on the caller's transaction.
#[derive(Clone, Default)]
pub struct CounterRepository;

impl CounterRepository {
    /// Atomically reserves the next number of `kind` for `day`. Must run inside
    /// the transaction that inserts the numbered document.
    pub async fn next_number<'e, E>(
        &self,
        executor: E,
        kind: DocumentKind,
        day: NaiveDate,
    ) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let value: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO document_counters (scope, day, last_value)
            VALUES ($1, $2, 1)
            ON CONFLICT (scope, day)
            DO UPDATE SET last_value = document_counters.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(kind.scope())
        .bind(day)
        .fetch_one(executor)
        .await?;

        Ok(kind.format(day, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_zero_padded_per_day() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(DocumentKind::Invoice.format(day, 1), "INV-20260305-0001");
        assert_eq!(DocumentKind::Receipt.format(day, 42), "RCP-20260305-0042");
        assert_eq!(DocumentKind::Receipt.format(day, 12345), "RCP-20260305-12345");
    }
}
