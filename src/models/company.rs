// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// A empresa é a raiz do multi-tenant: todo recurso pertence a uma empresa.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub rut: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Contadores exibidos no painel da empresa
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStats {
    pub total_products: i64,
    pub total_categories: i64,
    pub total_templates: i64,
    pub total_warehouses: i64,
    pub total_accounts: i64,
}
