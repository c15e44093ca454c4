// src/handlers/warehouses.rs

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
    models::{
        stock::{StockMovementView, StockRecordView},
        warehouse::{Warehouse, WarehouseStats},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehousePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub address: Option<String>,

    #[serde(default)]
    pub is_main: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses",
    tag = "Warehouses",
    responses((status = 200, body = [Warehouse]))
)]
pub async fn list_warehouses(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<Vec<Warehouse>>, AppError> {
    let warehouses = app_state.warehouse_service.list(company.0).await?;
    Ok(Json(warehouses))
}

#[utoipa::path(
    post,
    path = "/api/v1/warehouses",
    tag = "Warehouses",
    request_body = WarehousePayload,
    responses((status = 201, body = Warehouse))
)]
pub async fn create_warehouse(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Json(payload): Json<WarehousePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let warehouse = app_state
        .warehouse_service
        .create(
            company.0,
            payload.name.trim(),
            payload.address.as_deref(),
            payload.is_main,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(warehouse)))
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}",
    tag = "Warehouses",
    responses((status = 200, body = Warehouse))
)]
pub async fn get_warehouse(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Warehouse>, AppError> {
    let warehouse = app_state.warehouse_service.find(company.0, id).await?;
    Ok(Json(warehouse))
}

#[utoipa::path(
    put,
    path = "/api/v1/warehouses/{id}",
    tag = "Warehouses",
    request_body = WarehousePayload,
    responses((status = 200, body = Warehouse))
)]
pub async fn update_warehouse(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<WarehousePayload>,
) -> Result<Json<Warehouse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let warehouse = app_state
        .warehouse_service
        .update(
            company.0,
            id,
            payload.name.trim(),
            payload.address.as_deref(),
            payload.is_main,
        )
        .await?;

    Ok(Json(warehouse))
}

#[utoipa::path(
    delete,
    path = "/api/v1/warehouses/{id}",
    tag = "Warehouses",
    responses((status = 204))
)]
pub async fn delete_warehouse(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.warehouse_service.delete(company.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}/inventory",
    tag = "Warehouses",
    responses((status = 200, body = [StockRecordView]))
)]
pub async fn warehouse_inventory(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StockRecordView>>, AppError> {
    let inventory = app_state.warehouse_service.inventory(company.0, id).await?;
    Ok(Json(inventory))
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}/stats",
    tag = "Warehouses",
    responses((status = 200, body = WarehouseStats))
)]
pub async fn warehouse_stats(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Path(id): Path<Uuid>,
) -> Result<Json<WarehouseStats>, AppError> {
    let stats = app_state.warehouse_service.stats(company.0, id).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}/movements",
    tag = "Warehouses",
    responses((status = 200, body = [StockMovementView]))
)]
pub async fn warehouse_movements(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StockMovementView>>, AppError> {
    let movements = app_state.warehouse_service.movements(company.0, id).await?;
    Ok(Json(movements))
}
