// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Installment Ledger API", description = "Point of sale with installment credit"),
    paths(
        handlers::health,

        // --- Auth & users ---
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::list_users,
        handlers::auth::create_user,
        handlers::auth::update_user,
        handlers::auth::create_api_key,
        handlers::auth::list_api_keys,
        handlers::auth::revoke_api_key,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Catalog ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::categories::create_category,
        handlers::categories::list_categories,
        handlers::categories::get_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Ledger ---
        handlers::invoices::create_invoice,
        handlers::invoices::list_invoices,
        handlers::invoices::get_invoice,
        handlers::invoices::cancel_invoice,
        handlers::installment_plans::list_plans,
        handlers::installment_plans::get_plan,
        handlers::installment_plans::create_plan,
        handlers::installment_plans::update_plan,
        handlers::installment_plans::delete_plan,
        handlers::installments::list_installments,
        handlers::installments::get_installment,
        handlers::installments::due_today,
        handlers::installments::overdue,
        handlers::installments::stats,
        handlers::installments::calendar,
        handlers::installments::pay_installment,
        handlers::installments::sweep,
        handlers::payments::list_payments,
        handlers::payments::today_payments,
        handlers::payments::get_payment,
        handlers::payments::receipt_pdf,

        // --- Reports & dashboard ---
        handlers::reports::profits,
        handlers::reports::sales,
        handlers::reports::collections,
        handlers::reports::overdue,
        handlers::dashboard::get_stats,
        handlers::search::search,
        handlers::activity::list_activity,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::ApiKeySummary,
            models::auth::CreatedApiKey,
            models::auth::CreateApiKeyPayload,

            // --- Settings ---
            models::settings::ShopSettings,
            models::settings::UpdateSettingsRequest,

            // --- Catalog ---
            models::product::Product,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,
            models::category::Category,
            models::category::CategorySummary,
            models::category::CreateCategoryPayload,
            models::category::UpdateCategoryPayload,
            models::customer::Customer,
            models::customer::CustomerDetail,
            models::customer::CreateCustomerPayload,
            models::customer::UpdateCustomerPayload,

            // --- Ledger ---
            models::invoice::SaleType,
            models::invoice::InvoiceStatus,
            models::invoice::Invoice,
            models::invoice::InvoiceItem,
            models::invoice::InvoiceSummary,
            models::invoice::InvoiceDetail,
            models::invoice::InvoiceLinePayload,
            models::invoice::CreateInvoicePayload,
            models::installment::InstallmentStatus,
            models::installment::Installment,
            models::installment::InstallmentView,
            models::installment::InstallmentStats,
            models::installment::CalendarDay,
            models::installment::PaymentOutcome,
            models::installment::PayInstallmentPayload,
            models::installment_plan::InstallmentPlan,
            models::installment_plan::CreatePlanPayload,
            models::installment_plan::UpdatePlanPayload,
            models::payment::PaymentMethod,
            models::payment::Payment,
            models::payment::PaymentView,
            models::payment::TodayPayments,
            handlers::installments::SweepResult,

            // --- Reports & dashboard ---
            models::report::Period,
            models::report::ProfitRow,
            models::report::ProfitTotals,
            models::report::DailyTotal,
            models::report::SalesReport,
            models::report::CollectionsReport,
            models::report::OverdueCustomerRow,
            models::dashboard::DashboardStats,
            models::search::SearchResults,

            // --- Activity ---
            models::activity::ActivityAction,
            models::activity::ActivityEntity,
            models::activity::ActivityEntry,
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Login"),
        (name = "Users", description = "Staff accounts"),
        (name = "API keys", description = "Machine access keys"),
        (name = "Settings", description = "Shop settings"),
        (name = "Products", description = "Catalog and stock"),
        (name = "Categories", description = "Product categories"),
        (name = "Installment plans", description = "Standard sale terms"),
        (name = "Customers", description = "Credit customers"),
        (name = "Invoices", description = "Cash and installment sales"),
        (name = "Installments", description = "Schedules, collections and overdue tracking"),
        (name = "Payments", description = "Receipts"),
        (name = "Reports", description = "Profit, sales, collections and overdue reports"),
        (name = "Dashboard", description = "Daily figures"),
        (name = "Search", description = "Search across products, customers and invoices"),
        (name = "Activity", description = "Audit trail of staff actions")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-KEY"))),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_ledger_paths_and_security_schemes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/installments/{id}/pay"));
        assert!(doc.paths.paths.contains_key("/api/invoices/{id}/cancel"));
        assert!(doc.paths.paths.contains_key("/api/categories/{id}"));
        assert!(doc.paths.paths.contains_key("/api/installment-plans"));
        assert!(doc.paths.paths.contains_key("/api/search"));
        assert!(doc.paths.paths.contains_key("/api/activity"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
        assert!(components.security_schemes.contains_key("api_key"));
    }
}
