// src/handlers/reports.rs

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::company::CompanyScope,
    models::reports::{CategoryAnalysis, InventoryValuation, MovementReport, StockAlerts, TopProducts},
};

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct TopProductsQuery {
    pub metric: Option<String>,
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/inventory-valuation",
    tag = "Reports",
    responses((status = 200, body = InventoryValuation))
)]
pub async fn inventory_valuation(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<InventoryValuation>, AppError> {
    let report = app_state.report_service.inventory_valuation(company.0).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/stock-alerts",
    tag = "Reports",
    responses((status = 200, body = StockAlerts))
)]
pub async fn stock_alerts(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<StockAlerts>, AppError> {
    let report = app_state.report_service.stock_alerts(company.0).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/movements",
    tag = "Reports",
    responses((status = 200, body = MovementReport))
)]
pub async fn movement_report(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<MovementReport>, AppError> {
    let report = app_state
        .report_service
        .movement_report(company.0, query.date_from, query.date_to)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/category-analysis",
    tag = "Reports",
    responses((status = 200, body = CategoryAnalysis))
)]
pub async fn category_analysis(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<CategoryAnalysis>, AppError> {
    let report = app_state.report_service.category_analysis(company.0).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/top-products",
    tag = "Reports",
    responses((status = 200, body = TopProducts))
)]
pub async fn top_products(
    State(app_state): State<AppState>,
    company: CompanyScope,
    Query(query): Query<TopProductsQuery>,
) -> Result<Json<TopProducts>, AppError> {
    let metric = query.metric.as_deref().unwrap_or("stock_value");
    let limit = query.limit.unwrap_or(10);

    let report = app_state
        .report_service
        .top_products(company.0, metric, limit)
        .await?;
    Ok(Json(report))
}
