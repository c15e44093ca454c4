// src/services/warehouse_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::WarehouseRepository,
    models::{
        stock::{StockMovementView, StockRecordView},
        warehouse::{Warehouse, WarehouseStats},
    },
};

const RECENT_MOVEMENTS_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct WarehouseService {
    repo: WarehouseRepository,
    pool: PgPool,
}

impl WarehouseService {
    pub fn new(repo: WarehouseRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, company_id: Uuid) -> Result<Vec<Warehouse>, AppError> {
        self.repo.list(company_id).await
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Warehouse, AppError> {
        self.repo
            .find(company_id, id)
            .await?
            .ok_or(AppError::WarehouseNotFound)
    }

    /// Cria o depósito. Marcar como principal desmarca o principal
    /// anterior na mesma transação: nunca há dois.
    pub async fn create(
        &self,
        company_id: Uuid,
        name: &str,
        address: Option<&str>,
        is_main: bool,
    ) -> Result<Warehouse, AppError> {
        let mut tx = self.pool.begin().await?;

        if is_main {
            self.repo.clear_main_flag(&mut *tx, company_id).await?;
        }
        let warehouse = self
            .repo
            .create(&mut *tx, company_id, name, address, is_main)
            .await?;

        tx.commit().await?;
        Ok(warehouse)
    }

    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        name: &str,
        address: Option<&str>,
        is_main: bool,
    ) -> Result<Warehouse, AppError> {
        let mut tx = self.pool.begin().await?;

        if is_main {
            self.repo.clear_main_flag(&mut *tx, company_id).await?;
        }
        let warehouse = self
            .repo
            .update(&mut *tx, company_id, id, name, address, is_main)
            .await?
            .ok_or(AppError::WarehouseNotFound)?;

        tx.commit().await?;
        Ok(warehouse)
    }

    /// Soft delete, recusado enquanto houver saldo positivo no depósito.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let warehouse = self.find(company_id, id).await?;

        if self.repo.has_positive_stock(warehouse.id).await? {
            return Err(AppError::WarehouseHasStock);
        }

        let removed = self.repo.deactivate(&self.pool, company_id, id).await?;
        if !removed {
            return Err(AppError::WarehouseNotFound);
        }
        Ok(())
    }

    pub async fn stats(&self, company_id: Uuid, id: Uuid) -> Result<WarehouseStats, AppError> {
        let warehouse = self.find(company_id, id).await?;
        self.repo.stats(warehouse.id).await
    }

    pub async fn inventory(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Vec<StockRecordView>, AppError> {
        let warehouse = self.find(company_id, id).await?;
        self.repo.inventory(warehouse.id).await
    }

    pub async fn movements(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Vec<StockMovementView>, AppError> {
        let warehouse = self.find(company_id, id).await?;
        self.repo
            .recent_movements(warehouse.id, RECENT_MOVEMENTS_LIMIT)
            .await
    }
}
