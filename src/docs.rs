// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Setup / Company ---
        handlers::setup::setup_company,
        handlers::setup::onboarding_progress,
        handlers::setup::complete_onboarding,
        handlers::setup::my_company,
        handlers::setup::company_stats,

        // --- Catalog ---
        handlers::catalog::list_categories,
        handlers::catalog::create_category,
        handlers::catalog::rename_category,
        handlers::catalog::delete_category,
        handlers::catalog::category_products,
        handlers::catalog::list_global_attributes,
        handlers::catalog::create_global_attribute,
        handlers::catalog::delete_global_attribute,
        handlers::catalog::list_custom_attributes,
        handlers::catalog::create_custom_attribute,
        handlers::catalog::delete_custom_attribute,
        handlers::catalog::list_templates,
        handlers::catalog::create_template,
        handlers::catalog::template_structure,
        handlers::catalog::add_template_attribute,
        handlers::catalog::reorder_template_attributes,
        handlers::catalog::delete_template,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::validate_specifications,
        handlers::products::stock_details,
        handlers::products::movement_history,
        handlers::products::low_stock,

        // --- Warehouses ---
        handlers::warehouses::list_warehouses,
        handlers::warehouses::create_warehouse,
        handlers::warehouses::get_warehouse,
        handlers::warehouses::update_warehouse,
        handlers::warehouses::delete_warehouse,
        handlers::warehouses::warehouse_inventory,
        handlers::warehouses::warehouse_stats,
        handlers::warehouses::warehouse_movements,

        // --- Stock ---
        handlers::stock::list_movements,
        handlers::stock::create_movement,
        handlers::stock::create_adjustment,
        handlers::stock::movement_summary,
        handlers::stock::recent_movements,
        handlers::stock::delete_movement,
        handlers::stock::list_records,
        handlers::stock::reconcile_record,

        // --- Reports ---
        handlers::reports::inventory_valuation,
        handlers::reports::stock_alerts,
        handlers::reports::movement_report,
        handlers::reports::category_analysis,
        handlers::reports::top_products,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::AccountRole,
            models::auth::Account,
            models::auth::RegisterPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Company ---
            models::company::Company,
            models::company::CompanyStats,
            services::company_service::SetupDefaults,
            services::company_service::SetupOutcome,
            services::company_service::OnboardingStepMap,
            services::company_service::OnboardingProgress,
            handlers::setup::SetupCompanyPayload,

            // --- Catalog ---
            models::catalog::Category,
            models::catalog::AttributeDataType,
            models::catalog::GlobalAttribute,
            models::catalog::CustomAttribute,
            models::catalog::Template,
            models::catalog::TemplateAttribute,
            models::catalog::AttributeRef,
            models::catalog::TemplateAttributeDef,
            services::catalog_service::TemplateStructure,
            handlers::catalog::CategoryPayload,
            handlers::catalog::AttributePayload,
            handlers::catalog::TemplatePayload,
            handlers::catalog::AddTemplateAttributePayload,
            handlers::catalog::AttributeOrderEntry,
            handlers::catalog::ReorderAttributesPayload,

            // --- Products ---
            models::product::Product,
            models::product::ProductSummary,
            models::product::ProductWarehouseStock,
            models::product::ProductStockDetails,
            services::product_service::SpecValidationOutcome,
            handlers::products::ProductPayload,
            handlers::products::ValidateSpecificationsPayload,

            // --- Warehouses ---
            models::warehouse::Warehouse,
            models::warehouse::WarehouseStats,
            handlers::warehouses::WarehousePayload,

            // --- Stock ---
            models::stock::MovementType,
            models::stock::MovementReason,
            models::stock::StockRecord,
            models::stock::StockRecordView,
            models::stock::StockMovement,
            models::stock::StockMovementView,
            models::stock::ReconcileOutcome,
            handlers::stock::CreateMovementPayload,
            handlers::stock::AdjustmentPayload,

            // --- Reports ---
            models::reports::WarehouseValuation,
            models::reports::InventoryValuation,
            models::reports::AlertGroup,
            models::reports::StockAlerts,
            models::reports::MovementTypeAggregate,
            models::reports::MovementReasonAggregate,
            models::reports::ProductMovementAggregate,
            models::reports::MovementReport,
            models::reports::MovementSummary,
            models::reports::CategoryAnalysisEntry,
            models::reports::CategoryAnalysis,
            models::reports::TopProducts,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Setup", description = "Onboarding e Setup da Empresa"),
        (name = "Company", description = "Dados e Indicadores da Empresa"),
        (name = "Catalog", description = "Categorias, Atributos e Modelos de Produto"),
        (name = "Products", description = "Produtos e Especificações Dinâmicas"),
        (name = "Warehouses", description = "Depósitos"),
        (name = "Stock", description = "Saldos e Movimentações de Estoque"),
        (name = "Reports", description = "Relatórios de Inventário")
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
    }
}
