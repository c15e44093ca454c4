// src/db/warehouse_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        stock::{StockMovementView, StockRecordView},
        warehouse::{Warehouse, WarehouseStats},
    },
};

#[derive(Clone)]
pub struct WarehouseRepository {
    pool: PgPool,
}

impl WarehouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, company_id: Uuid) -> Result<Vec<Warehouse>, AppError> {
        let warehouses = sqlx::query_as::<_, Warehouse>(
            "SELECT * FROM warehouses WHERE company_id = $1 AND is_active ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(warehouses)
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<Warehouse>, AppError> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            "SELECT * FROM warehouses WHERE id = $1 AND company_id = $2 AND is_active",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(warehouse)
    }

    // Busca sem escopo de empresa; o serviço compara company_id para
    // diferenciar "não existe" de "pertence a outra empresa".
    pub async fn find_any(&self, id: Uuid) -> Result<Option<Warehouse>, AppError> {
        let warehouse =
            sqlx::query_as::<_, Warehouse>("SELECT * FROM warehouses WHERE id = $1 AND is_active")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(warehouse)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
        address: Option<&str>,
        is_main: bool,
    ) -> Result<Warehouse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Warehouse>(
            r#"
            INSERT INTO warehouses (company_id, name, address, is_main)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(address)
        .bind(is_main)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::WarehouseNameAlreadyExists(name.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
        name: &str,
        address: Option<&str>,
        is_main: bool,
    ) -> Result<Option<Warehouse>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            UPDATE warehouses
            SET name = $3, address = $4, is_main = $5, updated_at = now()
            WHERE id = $1 AND company_id = $2 AND is_active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(name)
        .bind(address)
        .bind(is_main)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::WarehouseNameAlreadyExists(name.to_string());
                }
            }
            AppError::from(e)
        })?;
        Ok(warehouse)
    }

    /// Desmarca o depósito principal atual da empresa. Usado na mesma
    /// transação que marca o novo principal, mantendo no máximo um.
    pub async fn clear_main_flag<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE warehouses SET is_main = FALSE, updated_at = now() WHERE company_id = $1 AND is_main",
        )
        .bind(company_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    // Pré-condição de exclusão: nenhum saldo positivo no depósito.
    pub async fn has_positive_stock(&self, warehouse_id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM stock_records WHERE warehouse_id = $1 AND is_active AND current_quantity > 0)",
        )
        .bind(warehouse_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn deactivate<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE warehouses SET is_active = FALSE, updated_at = now() WHERE id = $1 AND company_id = $2 AND is_active",
        )
        .bind(id)
        .bind(company_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn stats(&self, warehouse_id: Uuid) -> Result<WarehouseStats, AppError> {
        let stats = sqlx::query_as::<_, WarehouseStats>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE sr.current_quantity > 0) AS total_products,
                COALESCE(SUM(sr.current_quantity), 0) AS total_items,
                COALESCE(SUM(sr.current_quantity * p.cost), 0) AS total_value,
                COUNT(*) FILTER (WHERE sr.current_quantity > 0 AND sr.current_quantity < p.minimum_stock) AS low_stock_products,
                COUNT(*) FILTER (WHERE sr.current_quantity = 0) AS out_of_stock_products
            FROM stock_records sr
            JOIN products p ON p.id = sr.product_id
            WHERE sr.warehouse_id = $1 AND sr.is_active
            "#,
        )
        .bind(warehouse_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Inventário completo do depósito (só saldos positivos).
    pub async fn inventory(&self, warehouse_id: Uuid) -> Result<Vec<StockRecordView>, AppError> {
        let records = sqlx::query_as::<_, StockRecordView>(
            r#"
            SELECT sr.id, sr.product_id, p.name AS product_name, p.sku AS product_sku,
                   sr.warehouse_id, w.name AS warehouse_name,
                   sr.current_quantity, sr.updated_at
            FROM stock_records sr
            JOIN products p ON p.id = sr.product_id
            JOIN warehouses w ON w.id = sr.warehouse_id
            WHERE sr.warehouse_id = $1 AND sr.is_active AND sr.current_quantity > 0
            ORDER BY p.name ASC
            "#,
        )
        .bind(warehouse_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn recent_movements(
        &self,
        warehouse_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StockMovementView>, AppError> {
        let movements = sqlx::query_as::<_, StockMovementView>(
            r#"
            SELECT m.id, m.stock_record_id,
                   p.name AS product_name, p.sku AS product_sku,
                   w.name AS warehouse_name,
                   m.movement_type, m.quantity, m.resulting_balance, m.reason,
                   a.email AS account_email,
                   m.unit_cost, m.reference_document, m.notes,
                   wf.name AS from_warehouse_name, wt.name AS to_warehouse_name,
                   m.created_at
            FROM stock_movements m
            JOIN stock_records sr ON sr.id = m.stock_record_id
            JOIN products p ON p.id = sr.product_id
            JOIN warehouses w ON w.id = sr.warehouse_id
            JOIN accounts a ON a.id = m.account_id
            LEFT JOIN warehouses wf ON wf.id = m.from_warehouse_id
            LEFT JOIN warehouses wt ON wt.id = m.to_warehouse_id
            WHERE sr.warehouse_id = $1
            ORDER BY m.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(warehouse_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }
}
