// src/models/stock.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Saldo de estoque ---

// Saldo atual de UM produto em UM depósito. Fonte única da verdade:
// só o ledger de movimentações escreve em current_quantity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub current_quantity: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Saldo com os nomes de produto/depósito já resolvidos (listagens)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockRecordView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_sku: String,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub current_quantity: Decimal,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Movimentações ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "stock_movement_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    In,
    Out,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "stock_movement_reason", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementReason {
    Sale,
    Purchase,
    Loss,
    Return,
    Adjustment,
    Transfer,
}

// Uma entrada imutável do livro-razão. Depois de criada, nunca é
// alterada nem excluída; correções entram como movimentação de ajuste.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub stock_record_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: Decimal,

    // Saldo do StockRecord imediatamente após aplicar esta movimentação.
    // Snapshot pontual: não é re-derivável por consulta.
    pub resulting_balance: Decimal,

    pub reason: MovementReason,
    pub account_id: Uuid,
    pub unit_cost: Option<Decimal>,
    pub reference_document: Option<String>,
    pub notes: Option<String>,

    // Preenchidos apenas em transferências
    pub from_warehouse_id: Option<Uuid>,
    pub to_warehouse_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

// Movimentação com nomes resolvidos, para listagens e respostas da API
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementView {
    pub id: Uuid,
    pub stock_record_id: Uuid,
    pub product_name: String,
    pub product_sku: String,
    pub warehouse_name: String,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub resulting_balance: Decimal,
    pub reason: MovementReason,
    pub account_email: String,
    pub unit_cost: Option<Decimal>,
    pub reference_document: Option<String>,
    pub notes: Option<String>,
    pub from_warehouse_name: Option<String>,
    pub to_warehouse_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Resultado da reconciliação de um saldo contra o histórico
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    pub reconciled: bool,
    pub old_quantity: Decimal,
    pub new_quantity: Decimal,
    pub difference: Decimal,
}
