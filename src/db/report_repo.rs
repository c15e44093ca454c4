// src/db/report_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::reports::{
        CategoryAnalysisEntry, MovementReasonAggregate, MovementTypeAggregate,
        ProductMovementAggregate, WarehouseValuation,
    },
};

// Agregações de leitura para os relatórios. Nenhuma escrita acontece aqui.
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Valor do inventário a custo, agrupado por depósito.
    pub async fn valuation_by_warehouse(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<WarehouseValuation>, AppError> {
        let rows = sqlx::query_as::<_, WarehouseValuation>(
            r#"
            SELECT w.id AS warehouse_id, w.name AS warehouse_name,
                   COUNT(sr.id) AS products,
                   COALESCE(SUM(sr.current_quantity), 0) AS total_items,
                   COALESCE(SUM(sr.current_quantity * p.cost), 0) AS total_value
            FROM warehouses w
            LEFT JOIN stock_records sr ON sr.warehouse_id = w.id AND sr.is_active
            LEFT JOIN products p ON p.id = sr.product_id AND p.is_active
            WHERE w.company_id = $1 AND w.is_active
            GROUP BY w.id, w.name
            ORDER BY w.name ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_movements(
        &self,
        company_id: Uuid,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM stock_movements m
            JOIN stock_records sr ON sr.id = m.stock_record_id
            JOIN products p ON p.id = sr.product_id
            WHERE p.company_id = $1
              AND ($2::timestamptz IS NULL OR m.created_at >= $2)
              AND ($3::timestamptz IS NULL OR m.created_at <= $3)
            "#,
        )
        .bind(company_id)
        .bind(date_from)
        .bind(date_to)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn movements_by_type(
        &self,
        company_id: Uuid,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<MovementTypeAggregate>, AppError> {
        let rows = sqlx::query_as::<_, MovementTypeAggregate>(
            r#"
            SELECT m.movement_type, COUNT(*) AS count,
                   COALESCE(SUM(m.quantity), 0) AS total_quantity
            FROM stock_movements m
            JOIN stock_records sr ON sr.id = m.stock_record_id
            JOIN products p ON p.id = sr.product_id
            WHERE p.company_id = $1
              AND ($2::timestamptz IS NULL OR m.created_at >= $2)
              AND ($3::timestamptz IS NULL OR m.created_at <= $3)
            GROUP BY m.movement_type
            ORDER BY m.movement_type
            "#,
        )
        .bind(company_id)
        .bind(date_from)
        .bind(date_to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn movements_by_reason(
        &self,
        company_id: Uuid,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<MovementReasonAggregate>, AppError> {
        let rows = sqlx::query_as::<_, MovementReasonAggregate>(
            r#"
            SELECT m.reason, COUNT(*) AS count,
                   COALESCE(SUM(m.quantity), 0) AS total_quantity
            FROM stock_movements m
            JOIN stock_records sr ON sr.id = m.stock_record_id
            JOIN products p ON p.id = sr.product_id
            WHERE p.company_id = $1
              AND ($2::timestamptz IS NULL OR m.created_at >= $2)
              AND ($3::timestamptz IS NULL OR m.created_at <= $3)
            GROUP BY m.reason
            ORDER BY m.reason
            "#,
        )
        .bind(company_id)
        .bind(date_from)
        .bind(date_to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn top_products_by_movement(
        &self,
        company_id: Uuid,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<ProductMovementAggregate>, AppError> {
        let rows = sqlx::query_as::<_, ProductMovementAggregate>(
            r#"
            SELECT p.id AS product_id, p.name AS product_name, p.sku AS product_sku,
                   COUNT(*) AS total_movements,
                   COALESCE(SUM(m.quantity), 0) AS total_quantity
            FROM stock_movements m
            JOIN stock_records sr ON sr.id = m.stock_record_id
            JOIN products p ON p.id = sr.product_id
            WHERE p.company_id = $1
              AND ($2::timestamptz IS NULL OR m.created_at >= $2)
              AND ($3::timestamptz IS NULL OR m.created_at <= $3)
            GROUP BY p.id, p.name, p.sku
            ORDER BY total_movements DESC
            LIMIT $4
            "#,
        )
        .bind(company_id)
        .bind(date_from)
        .bind(date_to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Estoque e valor a custo por categoria, do mais valioso para o menos.
    pub async fn category_analysis(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<CategoryAnalysisEntry>, AppError> {
        let rows = sqlx::query_as::<_, CategoryAnalysisEntry>(
            r#"
            SELECT c.id, c.name,
                   COUNT(DISTINCT p.id) FILTER (WHERE p.is_active) AS total_products,
                   COALESCE(SUM(sr.current_quantity), 0) AS total_stock,
                   COALESCE(SUM(sr.current_quantity * p.cost), 0) AS total_value
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id AND p.is_active
            LEFT JOIN stock_records sr ON sr.product_id = p.id AND sr.is_active
            WHERE c.company_id = $1 AND c.is_active
            GROUP BY c.id, c.name
            ORDER BY total_value DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
