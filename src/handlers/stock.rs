// src/handlers/stock.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, company::CompanyScope, roles::AdminUser},
    models::{
        reports::MovementSummary,
        stock::{
            MovementReason, MovementType, ReconcileOutcome, StockMovement, StockMovementView,
            StockRecordView,
        },
    },
    services::stock_service::{NewAdjustment, NewMovement},
};

// ---
// Validação customizada
// ---
fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("A quantidade deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: criar movimentação
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementPayload {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub movement_type: MovementType,

    #[validate(custom(function = "validate_positive"))]
    pub quantity: Decimal,

    pub reason: MovementReason,

    pub reference_document: Option<String>,
    pub notes: Option<String>,
    pub unit_cost: Option<Decimal>,

    // Obrigatório apenas para transferências
    pub to_warehouse_id: Option<Uuid>,
}

// ---
// Payload: ajuste (define o saldo em um valor alvo)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentPayload {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub new_quantity: Decimal,

    #[validate(length(min = 1, message = "A justificativa do ajuste é obrigatória."))]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct MovementListQuery {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub hours: Option<i64>,
}

// ---
// Movimentações
// ---

#[utoipa::path(
    get,
    path = "/api/v1/stock/movements",
    tag = "Stock",
    responses((status = 200, body = [StockMovementView]))
)]
pub async fn list_movements(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Query(query): Query<MovementListQuery>,
) -> Result<Json<Vec<StockMovementView>>, AppError> {
    let movements = app_state
        .stock_service
        .list_movements(company.0, query.date_from, query.date_to)
        .await?;
    Ok(Json(movements))
}

#[utoipa::path(
    post,
    path = "/api/v1/stock/movements",
    tag = "Stock",
    request_body = CreateMovementPayload,
    responses((status = 201, body = StockMovement))
)]
pub async fn create_movement(
    State(app_state): State<AppState>,
    company: CompanyScope,
    user: AuthenticatedUser,
    Json(payload): Json<CreateMovementPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movement = app_state
        .stock_service
        .create_movement(
            company.0,
            user.0.id,
            NewMovement {
                product_id: payload.product_id,
                warehouse_id: payload.warehouse_id,
                movement_type: payload.movement_type,
                quantity: payload.quantity,
                reason: payload.reason,
                unit_cost: payload.unit_cost,
                reference_document: payload.reference_document,
                notes: payload.notes,
                to_warehouse_id: payload.to_warehouse_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(movement)))
}

#[utoipa::path(
    post,
    path = "/api/v1/stock/movements/adjustment",
    tag = "Stock",
    request_body = AdjustmentPayload,
    responses((status = 201, body = StockMovement))
)]
pub async fn create_adjustment(
    State(app_state): State<AppState>,
    company: CompanyScope,
    user: AuthenticatedUser,
    Json(payload): Json<AdjustmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movement = app_state
        .stock_service
        .adjust(
            company.0,
            user.0.id,
            NewAdjustment {
                product_id: payload.product_id,
                warehouse_id: payload.warehouse_id,
                new_quantity: payload.new_quantity,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(movement)))
}

#[utoipa::path(
    get,
    path = "/api/v1/stock/movements/summary",
    tag = "Stock",
    responses((status = 200, body = MovementSummary))
)]
pub async fn movement_summary(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Query(query): Query<MovementListQuery>,
) -> Result<Json<MovementSummary>, AppError> {
    let summary = app_state
        .report_service
        .movement_summary(company.0, query.date_from, query.date_to)
        .await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1/stock/movements/recent",
    tag = "Stock",
    responses((status = 200, body = [StockMovementView]))
)]
pub async fn recent_movements(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<StockMovementView>>, AppError> {
    let hours = query.hours.unwrap_or(24).clamp(1, 24 * 30);
    let movements = app_state
        .stock_service
        .recent_movements(company.0, hours, 50)
        .await?;
    Ok(Json(movements))
}

// O livro-razão é append-only: a exclusão é sempre recusada, com a
// orientação de registrar um ajuste compensatório.
#[utoipa::path(
    delete,
    path = "/api/v1/stock/movements/{id}",
    tag = "Stock",
    responses((status = 400, description = "Movimentações nunca são excluídas"))
)]
pub async fn delete_movement(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.stock_service.delete_movement(company.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Saldos
// ---

#[utoipa::path(
    get,
    path = "/api/v1/stock/records",
    tag = "Stock",
    responses((status = 200, body = [StockRecordView]))
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<Vec<StockRecordView>>, AppError> {
    let records = app_state.stock_service.list_records(company.0).await?;
    Ok(Json(records))
}

// Ferramenta de reparo (admin): reconstrói o saldo a partir do
// histórico de movimentações e corrige divergências.
#[utoipa::path(
    post,
    path = "/api/v1/stock/records/{id}/reconcile",
    tag = "Stock",
    responses((status = 200, body = ReconcileOutcome))
)]
pub async fn reconcile_record(
    State(app_state): State<AppState>,
    company: CompanyScope,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ReconcileOutcome>, AppError> {
    let outcome = app_state.stock_service.reconcile(company.0, id).await?;
    Ok(Json(outcome))
}
