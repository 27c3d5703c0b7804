// src/routes.rs

use axum::{
    Json, Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::auth_guard,
};

pub fn build_router(app_state: AppState) -> Router {
    // Public
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/", get(handlers::auth::list_users).post(handlers::auth::create_user))
        .route("/me", get(handlers::auth::get_me))
        .route("/{id}", put(handlers::auth::update_user));

    let api_key_routes = Router::new()
        .route("/", get(handlers::auth::list_api_keys).post(handlers::auth::create_api_key))
        .route("/{id}", delete(handlers::auth::revoke_api_key));

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    let category_routes = Router::new()
        .route(
            "/",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/{id}",
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        );

    let plan_routes = Router::new()
        .route(
            "/",
            get(handlers::installment_plans::list_plans).post(handlers::installment_plans::create_plan),
        )
        .route(
            "/{id}",
            get(handlers::installment_plans::get_plan)
                .put(handlers::installment_plans::update_plan)
                .delete(handlers::installment_plans::delete_plan),
        );

    let customer_routes = Router::new()
        .route(
            "/",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        );

    let invoice_routes = Router::new()
        .route(
            "/",
            get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
        )
        .route("/{id}", get(handlers::invoices::get_invoice))
        .route("/{id}/cancel", post(handlers::invoices::cancel_invoice));

    let installment_routes = Router::new()
        .route("/", get(handlers::installments::list_installments))
        .route("/today", get(handlers::installments::due_today))
        .route("/overdue", get(handlers::installments::overdue))
        .route("/stats", get(handlers::installments::stats))
        .route("/calendar", get(handlers::installments::calendar))
        .route("/sweep", post(handlers::installments::sweep))
        .route("/{id}", get(handlers::installments::get_installment))
        .route("/{id}/pay", post(handlers::installments::pay_installment));

    let payment_routes = Router::new()
        .route("/", get(handlers::payments::list_payments))
        .route("/today", get(handlers::payments::today_payments))
        .route("/{id}", get(handlers::payments::get_payment))
        .route("/{id}/receipt.pdf", get(handlers::payments::receipt_pdf));

    let report_routes = Router::new()
        .route("/profits", get(handlers::reports::profits))
        .route("/sales", get(handlers::reports::sales))
        .route("/collections", get(handlers::reports::collections))
        .route("/overdue", get(handlers::reports::overdue));

    // Everything below requires a bearer token or an API key
    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/api-keys", api_key_routes)
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .nest("/products", product_routes)
        .nest("/categories", category_routes)
        .nest("/installment-plans", plan_routes)
        .nest("/customers", customer_routes)
        .nest("/invoices", invoice_routes)
        .nest("/installments", installment_routes)
        .nest("/payments", payment_routes)
        .nest("/reports", report_routes)
        .route("/dashboard/stats", get(handlers::dashboard::get_stats))
        .route("/activity", get(handlers::activity::list_activity))
        .route("/search", get(handlers::search::search))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/auth", auth_routes)
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
