pub mod activity_repo;
pub use activity_repo::ActivityRepository;
pub mod api_key_repo;
pub use api_key_repo::ApiKeyRepository;
pub mod category_repo;
pub use category_repo::CategoryRepository;
pub mod counter_repo;
pub use counter_repo::{CounterRepository, DocumentKind};
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod installment_repo;
pub use installment_repo::InstallmentRepository;
pub mod invoice_repo;
pub use invoice_repo::{InvoiceRepository, NewInvoice};
pub mod payment_repo;
pub use payment_repo::{NewPayment, PaymentRepository};
pub mod plan_repo;
pub use plan_repo::PlanRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod search_repo;
pub use search_repo::SearchRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
