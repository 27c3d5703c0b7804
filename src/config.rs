// src/config.rs

use anyhow::{Context, anyhow};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{sync::Arc, time::Duration};

use crate::{
    db::{
        ActivityRepository, ApiKeyRepository, CategoryRepository, CounterRepository,
        CustomerRepository, DashboardRepository, InstallmentRepository, InvoiceRepository,
        PaymentRepository, PlanRepository, ProductRepository, ReportRepository,
        SearchRepository, SettingsRepository, UserRepository,
    },
    services::{
        activity_service::ActivityService, auth::AuthService, category_service::CategoryService,
        customer_service::CustomerService, dashboard_service::DashboardService,
        document_service::DocumentService, invoice_service::InvoiceService,
        ledger_service::LedgerService, payment_service::PaymentService,
        plan_service::PlanService, product_service::ProductService,
        report_service::ReportService, search_service::SearchService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_JWT_TTL_HOURS: i64 = 168;
const DEFAULT_FONTS_DIR: &str = "./fonts";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub jwt_ttl_hours: i64,
    pub fonts_dir: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| anyhow!("{} must be set", key));

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {}", raw))?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let jwt_ttl_hours = match get("JWT_TTL_HOURS") {
            Some(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("JWT_TTL_HOURS is not a number: {}", raw))?,
            None => DEFAULT_JWT_TTL_HOURS,
        };
        if jwt_ttl_hours <= 0 {
            return Err(anyhow!("JWT_TTL_HOURS must be positive"));
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            db_max_connections,
            jwt_ttl_hours,
            fonts_dir: get("FONTS_DIR").unwrap_or_else(|| DEFAULT_FONTS_DIR.to_string()),
            admin_email: get("ADMIN_EMAIL"),
            admin_password: get("ADMIN_PASSWORD"),
        })
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,

    pub settings_repo: SettingsRepository,

    pub auth_service: AuthService,
    pub activity_service: ActivityService,
    pub category_service: CategoryService,
    pub plan_service: PlanService,
    pub search_service: SearchService,
    pub product_service: ProductService,
    pub customer_service: CustomerService,
    pub invoice_service: InvoiceService,
    pub ledger_service: LedgerService,
    pub payment_service: PaymentService,
    pub report_service: ReportService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
}

impl AppState {
    /// Opens the pool eagerly; fails fast when the database is unreachable.
    pub async fn connect(config: Config) -> anyhow::Result<Self> {
        let db_pool = config
            .pool_options()
            .connect(&config.database_url)
            .await
            .context("failed to connect to the database")?;

        tracing::info!("Database connection established");

        Ok(Self::new(config, db_pool))
    }

    /// Builds the state around a pool that only connects on first use.
    pub fn connect_lazy(config: Config) -> anyhow::Result<Self> {
        let db_pool = config
            .pool_options()
            .connect_lazy(&config.database_url)
            .context("invalid DATABASE_URL")?;
        Ok(Self::new(config, db_pool))
    }

    pub fn new(config: Config, db_pool: PgPool) -> Self {
        // --- Repositories ---
        let user_repo = UserRepository::new(db_pool.clone());
        let api_key_repo = ApiKeyRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let invoice_repo = InvoiceRepository::new(db_pool.clone());
        let installment_repo = InstallmentRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let counter_repo = CounterRepository;
        let report_repo = ReportRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let category_repo = CategoryRepository::new(db_pool.clone());
        let plan_repo = PlanRepository::new(db_pool.clone());
        let activity_repo = ActivityRepository::new(db_pool.clone());
        let search_repo = SearchRepository::new(db_pool.clone());

        // --- Services ---
        let activity_service = ActivityService::new(activity_repo.clone());
        let auth_service = AuthService::new(
            user_repo,
            api_key_repo,
            activity_service.clone(),
            config.jwt_secret.clone(),
            config.jwt_ttl_hours,
        );
        let category_service = CategoryService::new(
            db_pool.clone(),
            category_repo.clone(),
            activity_service.clone(),
        );
        let plan_service = PlanService::new(plan_repo.clone(), activity_service.clone());
        let search_service = SearchService::new(search_repo);
        let product_service = ProductService::new(
            db_pool.clone(),
            product_repo.clone(),
            category_repo,
            activity_service.clone(),
        );
        let customer_service = CustomerService::new(db_pool.clone(), customer_repo.clone());
        let invoice_service = InvoiceService::new(
            db_pool.clone(),
            invoice_repo.clone(),
            installment_repo.clone(),
            payment_repo.clone(),
            product_repo,
            customer_repo,
            counter_repo.clone(),
            plan_repo,
            activity_repo,
        );
        let ledger_service = LedgerService::new(
            db_pool.clone(),
            invoice_repo,
            installment_repo.clone(),
            payment_repo.clone(),
            counter_repo,
        );
        let payment_service = PaymentService::new(payment_repo.clone());
        let report_service = ReportService::new(report_repo, ledger_service.clone());
        let dashboard_service = DashboardService::new(dashboard_repo, ledger_service.clone());
        let document_service = DocumentService::new(
            payment_repo,
            settings_repo.clone(),
            config.fonts_dir.clone(),
        );

        Self {
            db_pool,
            config: Arc::new(config),
            settings_repo,
            auth_service,
            activity_service,
            category_service,
            plan_service,
            search_service,
            product_service,
            customer_service,
            invoice_service,
            ledger_service,
            payment_service,
            report_service,
            dashboard_service,
            document_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_keys_are_absent() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/ledger"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.jwt_ttl_hours, 168);
        assert_eq!(config.fonts_dir, "./fonts");
        assert!(config.admin_email.is_none());
    }

    #[test]
    fn missing_required_key_is_an_error() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let result = Config::from_lookup(lookup(&[("DATABASE_URL", "  "), ("JWT_SECRET", "s")]));
        assert!(result.is_err());
    }

    #[test]
    fn numeric_overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("JWT_TTL_HOURS", "8"),
            ("ADMIN_EMAIL", "owner@shop.test"),
        ]))
        .unwrap();
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.jwt_ttl_hours, 8);
        assert_eq!(config.admin_email.as_deref(), Some("owner@shop.test"));
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("JWT_TTL_HOURS", "forever"),
        ]));
        assert!(result.is_err());
    }
}
