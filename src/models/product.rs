// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub company_id: Uuid,
    pub category_id: Uuid,
    pub template_id: Uuid,
    pub name: String,
    pub sku: String,
    pub barcode: Option<String>,
    pub price: Decimal,
    pub cost: Decimal,
    pub unit_of_measure: Option<String>,
    pub minimum_stock: Decimal,

    // Mapa slug -> valor, já validado contra o modelo do produto
    #[schema(value_type = Object)]
    pub specifications: Value,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem de produtos, com o agregado de estoque embutido.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub barcode: Option<String>,
    pub price: Decimal,
    pub cost: Decimal,
    pub unit_of_measure: Option<String>,
    pub minimum_stock: Decimal,
    pub category_name: String,
    pub template_name: String,
    pub total_stock: Decimal,
    pub below_minimum: bool,
    pub is_active: bool,
}

// Estoque de um produto em um depósito específico
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductWarehouseStock {
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub is_main: bool,
    pub quantity: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStockDetails {
    pub product_id: Uuid,
    pub total_stock: Decimal,
    pub stock_by_warehouse: Vec<ProductWarehouseStock>,
}
