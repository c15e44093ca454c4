// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{company::CompanyScope, roles::AdminUser},
    models::product::{Product, ProductStockDetails, ProductSummary},
    models::stock::StockMovementView,
    services::product_service::{ProductInput, SpecValidationOutcome},
};

// ---
// Validação customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn default_specifications() -> Value {
    Value::Object(serde_json::Map::new())
}

// ---
// Payload: produto (create e update usam o mesmo formato)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub category_id: Uuid,
    pub template_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    pub sku: String,

    pub barcode: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub cost: Decimal,

    pub unit_of_measure: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub minimum_stock: Decimal,

    // Mapa slug -> valor, validado contra o modelo escolhido
    #[serde(default = "default_specifications")]
    #[schema(value_type = Object)]
    pub specifications: Value,
}

impl ProductPayload {
    fn into_input(self) -> ProductInput {
        ProductInput {
            category_id: self.category_id,
            template_id: self.template_id,
            name: self.name,
            sku: self.sku,
            barcode: self.barcode,
            price: self.price,
            cost: self.cost,
            unit_of_measure: self.unit_of_measure,
            minimum_stock: self.minimum_stock,
            specifications: self.specifications,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    responses((status = 200, body = [ProductSummary]))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductSummary>>, AppError> {
    let products = app_state
        .product_service
        .list(company.0, query.search.as_deref())
        .await?;
    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = ProductPayload,
    responses((status = 201, body = Product))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .product_service
        .create(company.0, payload.into_input())
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    responses((status = 200, body = Product))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = app_state.product_service.find(company.0, id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Products",
    request_body = ProductPayload,
    responses((status = 200, body = Product))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .product_service
        .update(company.0, id, payload.into_input())
        .await?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Products",
    responses((status = 204))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete(company.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Validação avulsa de especificações
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSpecificationsPayload {
    pub template_id: Uuid,

    #[schema(value_type = Object)]
    pub specifications: Value,
}

#[utoipa::path(
    post,
    path = "/api/v1/products/validate-specifications",
    tag = "Products",
    request_body = ValidateSpecificationsPayload,
    responses((status = 200, body = SpecValidationOutcome))
)]
pub async fn validate_specifications(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Json(payload): Json<ValidateSpecificationsPayload>,
) -> Result<Json<SpecValidationOutcome>, AppError> {
    let outcome = app_state
        .product_service
        .validate_specifications(company.0, payload.template_id, &payload.specifications)
        .await?;
    Ok(Json(outcome))
}

// ---
// Estoque do produto
// ---

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/stock-details",
    tag = "Products",
    responses((status = 200, body = ProductStockDetails))
)]
pub async fn stock_details(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductStockDetails>, AppError> {
    let details = app_state.product_service.stock_details(company.0, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/movement-history",
    tag = "Products",
    responses((status = 200, body = [StockMovementView]))
)]
pub async fn movement_history(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StockMovementView>>, AppError> {
    let movements = app_state.stock_service.product_movements(company.0, id).await?;
    Ok(Json(movements))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/low-stock",
    tag = "Products",
    responses((status = 200, body = [ProductSummary]))
)]
pub async fn low_stock(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<Vec<ProductSummary>>, AppError> {
    let products = app_state.product_service.low_stock(company.0).await?;
    Ok(Json(products))
}
