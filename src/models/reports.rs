// src/models/reports.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::product::ProductSummary;
use crate::models::stock::{MovementReason, MovementType};

// --- Valorização do inventário ---

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseValuation {
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub products: i64,
    pub total_items: Decimal,
    pub total_value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValuation {
    pub total_value: Decimal,
    pub total_items: Decimal,
    pub by_warehouse: Vec<WarehouseValuation>,
    pub generated_at: DateTime<Utc>,
}

// --- Alertas de estoque ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertGroup {
    pub count: i64,
    pub products: Vec<ProductSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAlerts {
    pub low_stock: AlertGroup,
    pub out_of_stock: AlertGroup,
    pub generated_at: DateTime<Utc>,
}

// --- Relatório de movimentações ---

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementTypeAggregate {
    pub movement_type: MovementType,
    pub count: i64,
    pub total_quantity: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementReasonAggregate {
    pub reason: MovementReason,
    pub count: i64,
    pub total_quantity: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductMovementAggregate {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_sku: String,
    pub total_movements: i64,
    pub total_quantity: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementReport {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub total_movements: i64,
    pub by_type: Vec<MovementTypeAggregate>,
    pub by_reason: Vec<MovementReasonAggregate>,
    pub top_products: Vec<ProductMovementAggregate>,
    pub generated_at: DateTime<Utc>,
}

// Resumo rápido usado em GET /stock/movements/summary
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementSummary {
    pub total_movements: i64,
    pub total_in: Decimal,
    pub total_out: Decimal,
    pub total_transfers: i64,
    pub by_type: Vec<MovementTypeAggregate>,
    pub by_reason: Vec<MovementReasonAggregate>,
}

// --- Análise por categoria ---

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalysisEntry {
    pub id: Uuid,
    pub name: String,
    pub total_products: i64,
    pub total_stock: Decimal,
    pub total_value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalysis {
    pub categories: Vec<CategoryAnalysisEntry>,
    pub generated_at: DateTime<Utc>,
}

// --- Top produtos ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProducts {
    pub metric: String,
    pub limit: i64,
    pub products: Vec<ProductSummary>,
    pub generated_at: DateTime<Utc>,
}
