// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de conta (protegidas)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Onboarding / setup da empresa
    let setup_routes = Router::new()
        .route("/company", post(handlers::setup::setup_company))
        .route(
            "/onboarding-progress",
            get(handlers::setup::onboarding_progress),
        )
        .route(
            "/complete-onboarding",
            post(handlers::setup::complete_onboarding),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let company_routes = Router::new()
        .route("/me", get(handlers::setup::my_company))
        .route("/stats", get(handlers::setup::company_stats))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Cadastro: categorias, atributos e modelos
    let catalog_routes = Router::new()
        .route(
            "/categories",
            post(handlers::catalog::create_category).get(handlers::catalog::list_categories),
        )
        .route(
            "/categories/{id}",
            axum::routing::put(handlers::catalog::rename_category)
                .delete(handlers::catalog::delete_category),
        )
        .route(
            "/categories/{id}/products",
            get(handlers::catalog::category_products),
        )
        .route(
            "/attributes/global",
            post(handlers::catalog::create_global_attribute)
                .get(handlers::catalog::list_global_attributes),
        )
        .route(
            "/attributes/global/{id}",
            delete(handlers::catalog::delete_global_attribute),
        )
        .route(
            "/attributes/custom",
            post(handlers::catalog::create_custom_attribute)
                .get(handlers::catalog::list_custom_attributes),
        )
        .route(
            "/attributes/custom/{id}",
            delete(handlers::catalog::delete_custom_attribute),
        )
        .route(
            "/templates",
            post(handlers::catalog::create_template).get(handlers::catalog::list_templates),
        )
        .route("/templates/{id}", delete(handlers::catalog::delete_template))
        .route(
            "/templates/{id}/structure",
            get(handlers::catalog::template_structure),
        )
        .route(
            "/templates/{id}/attributes",
            post(handlers::catalog::add_template_attribute),
        )
        .route(
            "/templates/{id}/attributes/reorder",
            patch(handlers::catalog::reorder_template_attributes),
        );

    let product_routes = Router::new()
        .route(
            "/products",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route("/products/low-stock", get(handlers::products::low_stock))
        .route(
            "/products/validate-specifications",
            post(handlers::products::validate_specifications),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/products/{id}/stock-details",
            get(handlers::products::stock_details),
        )
        .route(
            "/products/{id}/movement-history",
            get(handlers::products::movement_history),
        );

    let warehouse_routes = Router::new()
        .route(
            "/warehouses",
            post(handlers::warehouses::create_warehouse)
                .get(handlers::warehouses::list_warehouses),
        )
        .route(
            "/warehouses/{id}",
            get(handlers::warehouses::get_warehouse)
                .put(handlers::warehouses::update_warehouse)
                .delete(handlers::warehouses::delete_warehouse),
        )
        .route(
            "/warehouses/{id}/inventory",
            get(handlers::warehouses::warehouse_inventory),
        )
        .route(
            "/warehouses/{id}/stats",
            get(handlers::warehouses::warehouse_stats),
        )
        .route(
            "/warehouses/{id}/movements",
            get(handlers::warehouses::warehouse_movements),
        );

    // Núcleo de estoque: saldos e movimentações
    let stock_routes = Router::new()
        .route("/stock/records", get(handlers::stock::list_records))
        .route(
            "/stock/records/{id}/reconcile",
            post(handlers::stock::reconcile_record),
        )
        .route(
            "/stock/movements",
            post(handlers::stock::create_movement).get(handlers::stock::list_movements),
        )
        .route(
            "/stock/movements/adjustment",
            post(handlers::stock::create_adjustment),
        )
        .route(
            "/stock/movements/summary",
            get(handlers::stock::movement_summary),
        )
        .route(
            "/stock/movements/recent",
            get(handlers::stock::recent_movements),
        )
        .route(
            "/stock/movements/{id}",
            delete(handlers::stock::delete_movement),
        );

    let report_routes = Router::new()
        .route(
            "/inventory-valuation",
            get(handlers::reports::inventory_valuation),
        )
        .route("/stock-alerts", get(handlers::reports::stock_alerts))
        .route("/movements", get(handlers::reports::movement_report))
        .route(
            "/category-analysis",
            get(handlers::reports::category_analysis),
        )
        .route("/top-products", get(handlers::reports::top_products));

    // Todas as rotas de inventário exigem autenticação + empresa
    let inventory_routes = catalog_routes
        .merge(product_routes)
        .merge(warehouse_routes)
        .merge(stock_routes)
        .nest("/reports", report_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/setup", setup_routes)
        .nest("/api/v1/companies", company_routes)
        .nest("/api/v1", inventory_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
