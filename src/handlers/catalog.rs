// src/handlers/catalog.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{company::CompanyScope, roles::AdminUser},
    models::catalog::{
        AttributeDataType, Category, CustomAttribute, GlobalAttribute, Template,
        TemplateAttribute,
    },
    models::product::ProductSummary,
    services::catalog_service::TemplateStructure,
};

// ---
// Categorias
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "Catalog",
    responses((status = 200, body = [Category]))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = app_state.catalog_service.list_categories(company.0).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "Catalog",
    request_body = CategoryPayload,
    responses((status = 201, body = Category))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let category = app_state
        .catalog_service
        .create_category(company.0, payload.name.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    request_body = CategoryPayload,
    responses((status = 200, body = Category))
)]
pub async fn rename_category(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let category = app_state
        .catalog_service
        .rename_category(company.0, id, payload.name.trim())
        .await?;

    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    responses((status = 204))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_category(company.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}/products",
    tag = "Catalog",
    responses((status = 200, body = [ProductSummary]))
)]
pub async fn category_products(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ProductSummary>>, AppError> {
    let products = app_state
        .product_service
        .list_by_category(company.0, id)
        .await?;
    Ok(Json(products))
}

// ---
// Atributos
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub data_type: AttributeDataType,
    pub unit_of_measure: Option<String>,
    pub description: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/attributes/global",
    tag = "Catalog",
    responses((status = 200, body = [GlobalAttribute]))
)]
pub async fn list_global_attributes(
    State(app_state): State<AppState>,
    _company: CompanyScope,
) -> Result<Json<Vec<GlobalAttribute>>, AppError> {
    let attributes = app_state.catalog_service.list_global_attributes().await?;
    Ok(Json(attributes))
}

#[utoipa::path(
    post,
    path = "/api/v1/attributes/global",
    tag = "Catalog",
    request_body = AttributePayload,
    responses((status = 201, body = GlobalAttribute))
)]
pub async fn create_global_attribute(
    State(app_state): State<AppState>,
    _company: CompanyScope,
    _admin: AdminUser,
    Json(payload): Json<AttributePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let attribute = app_state
        .catalog_service
        .create_global_attribute(
            payload.name.trim(),
            payload.data_type,
            payload.unit_of_measure.as_deref(),
            payload.description.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(attribute)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attributes/global/{id}",
    tag = "Catalog",
    responses((status = 204))
)]
pub async fn delete_global_attribute(
    State(app_state): State<AppState>,
    _company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_global_attribute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/attributes/custom",
    tag = "Catalog",
    responses((status = 200, body = [CustomAttribute]))
)]
pub async fn list_custom_attributes(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<Vec<CustomAttribute>>, AppError> {
    let attributes = app_state
        .catalog_service
        .list_custom_attributes(company.0)
        .await?;
    Ok(Json(attributes))
}

#[utoipa::path(
    post,
    path = "/api/v1/attributes/custom",
    tag = "Catalog",
    request_body = AttributePayload,
    responses((status = 201, body = CustomAttribute))
)]
pub async fn create_custom_attribute(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Json(payload): Json<AttributePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let attribute = app_state
        .catalog_service
        .create_custom_attribute(
            company.0,
            payload.name.trim(),
            payload.data_type,
            payload.unit_of_measure.as_deref(),
            payload.description.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(attribute)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attributes/custom/{id}",
    tag = "Catalog",
    responses((status = 204))
)]
pub async fn delete_custom_attribute(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_custom_attribute(company.0, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Modelos de produto
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTemplateAttributePayload {
    // Exatamente um dos dois deve vir preenchido
    pub global_attribute_id: Option<Uuid>,
    pub custom_attribute_id: Option<Uuid>,

    #[serde(default)]
    pub is_required: bool,

    pub default_value: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOrderEntry {
    pub id: Uuid,
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderAttributesPayload {
    pub attributes: Vec<AttributeOrderEntry>,
}

#[utoipa::path(
    get,
    path = "/api/v1/templates",
    tag = "Catalog",
    responses((status = 200, body = [Template]))
)]
pub async fn list_templates(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<Vec<Template>>, AppError> {
    let templates = app_state.catalog_service.list_templates(company.0).await?;
    Ok(Json(templates))
}

#[utoipa::path(
    post,
    path = "/api/v1/templates",
    tag = "Catalog",
    request_body = TemplatePayload,
    responses((status = 201, body = Template))
)]
pub async fn create_template(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Json(payload): Json<TemplatePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let template = app_state
        .catalog_service
        .create_template(company.0, payload.name.trim(), payload.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(template)))
}

#[utoipa::path(
    get,
    path = "/api/v1/templates/{id}/structure",
    tag = "Catalog",
    responses((status = 200, body = TemplateStructure))
)]
pub async fn template_structure(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplateStructure>, AppError> {
    let structure = app_state
        .catalog_service
        .template_structure(company.0, id)
        .await?;
    Ok(Json(structure))
}

#[utoipa::path(
    post,
    path = "/api/v1/templates/{id}/attributes",
    tag = "Catalog",
    request_body = AddTemplateAttributePayload,
    responses((status = 201, body = TemplateAttribute))
)]
pub async fn add_template_attribute(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddTemplateAttributePayload>,
) -> Result<impl IntoResponse, AppError> {
    let attribute = app_state
        .catalog_service
        .add_template_attribute(
            company.0,
            id,
            payload.global_attribute_id,
            payload.custom_attribute_id,
            payload.is_required,
            payload.default_value.as_deref(),
            payload.sort_order,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(attribute)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/templates/{id}/attributes/reorder",
    tag = "Catalog",
    request_body = ReorderAttributesPayload,
    responses((status = 200, body = TemplateStructure))
)]
pub async fn reorder_template_attributes(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReorderAttributesPayload>,
) -> Result<Json<TemplateStructure>, AppError> {
    let orders: Vec<(Uuid, i32)> = payload
        .attributes
        .iter()
        .map(|entry| (entry.id, entry.sort_order))
        .collect();

    app_state
        .catalog_service
        .reorder_template_attributes(company.0, id, &orders)
        .await?;

    let structure = app_state
        .catalog_service
        .template_structure(company.0, id)
        .await?;
    Ok(Json(structure))
}

#[utoipa::path(
    delete,
    path = "/api/v1/templates/{id}",
    tag = "Catalog",
    responses((status = 204))
)]
pub async fn delete_template(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_template(company.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
