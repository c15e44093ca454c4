// src/services/report_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, ReportRepository},
    models::{
        reports::{
            AlertGroup, CategoryAnalysis, InventoryValuation, MovementReport, MovementSummary,
            MovementTypeAggregate, StockAlerts, TopProducts,
        },
        stock::MovementType,
    },
};

const DEFAULT_TOP_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    product_repo: ProductRepository,
}

impl ReportService {
    pub fn new(report_repo: ReportRepository, product_repo: ProductRepository) -> Self {
        Self {
            report_repo,
            product_repo,
        }
    }

    /// Valor do inventário a custo, total e por depósito.
    pub async fn inventory_valuation(
        &self,
        company_id: Uuid,
    ) -> Result<InventoryValuation, AppError> {
        let by_warehouse = self.report_repo.valuation_by_warehouse(company_id).await?;

        let total_value = by_warehouse.iter().map(|w| w.total_value).sum();
        let total_items = by_warehouse.iter().map(|w| w.total_items).sum();

        Ok(InventoryValuation {
            total_value,
            total_items,
            by_warehouse,
            generated_at: Utc::now(),
        })
    }

    /// Produtos abaixo do mínimo e produtos zerados.
    pub async fn stock_alerts(&self, company_id: Uuid) -> Result<StockAlerts, AppError> {
        let low_stock = self.product_repo.low_stock(company_id).await?;
        let out_of_stock = self.product_repo.out_of_stock(company_id).await?;

        Ok(StockAlerts {
            low_stock: AlertGroup {
                count: low_stock.len() as i64,
                products: low_stock,
            },
            out_of_stock: AlertGroup {
                count: out_of_stock.len() as i64,
                products: out_of_stock,
            },
            generated_at: Utc::now(),
        })
    }

    pub async fn movement_report(
        &self,
        company_id: Uuid,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<MovementReport, AppError> {
        let total_movements = self
            .report_repo
            .count_movements(company_id, date_from, date_to)
            .await?;
        let by_type = self
            .report_repo
            .movements_by_type(company_id, date_from, date_to)
            .await?;
        let by_reason = self
            .report_repo
            .movements_by_reason(company_id, date_from, date_to)
            .await?;
        let top_products = self
            .report_repo
            .top_products_by_movement(company_id, date_from, date_to, DEFAULT_TOP_LIMIT)
            .await?;

        Ok(MovementReport {
            date_from,
            date_to,
            total_movements,
            by_type,
            by_reason,
            top_products,
            generated_at: Utc::now(),
        })
    }

    /// Resumo rápido para o painel de movimentações.
    pub async fn movement_summary(
        &self,
        company_id: Uuid,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<MovementSummary, AppError> {
        let total_movements = self
            .report_repo
            .count_movements(company_id, date_from, date_to)
            .await?;
        let by_type = self
            .report_repo
            .movements_by_type(company_id, date_from, date_to)
            .await?;
        let by_reason = self
            .report_repo
            .movements_by_reason(company_id, date_from, date_to)
            .await?;

        fn quantity_of(aggs: &[MovementTypeAggregate], ty: MovementType) -> Decimal {
            aggs.iter()
                .find(|agg| agg.movement_type == ty)
                .map(|agg| agg.total_quantity)
                .unwrap_or(Decimal::ZERO)
        }

        let total_in = quantity_of(&by_type, MovementType::In);
        let total_out = quantity_of(&by_type, MovementType::Out);
        let total_transfers = by_type
            .iter()
            .find(|agg| agg.movement_type == MovementType::Transfer)
            .map(|agg| agg.count)
            .unwrap_or(0);

        Ok(MovementSummary {
            total_movements,
            total_in,
            total_out,
            total_transfers,
            by_type,
            by_reason,
        })
    }

    pub async fn category_analysis(&self, company_id: Uuid) -> Result<CategoryAnalysis, AppError> {
        let categories = self.report_repo.category_analysis(company_id).await?;
        Ok(CategoryAnalysis {
            categories,
            generated_at: Utc::now(),
        })
    }

    /// Top produtos pela métrica pedida. Métrica desconhecida cai no
    /// valor de estoque.
    pub async fn top_products(
        &self,
        company_id: Uuid,
        metric: &str,
        limit: i64,
    ) -> Result<TopProducts, AppError> {
        let (metric, order_by) = match metric {
            "stock_quantity" => ("stock_quantity", "COALESCE(s.total, 0)"),
            "price" => ("price", "p.price"),
            _ => ("stock_value", "COALESCE(s.total, 0) * p.cost"),
        };

        let limit = limit.clamp(1, 100);
        let products = self
            .product_repo
            .top_products(company_id, order_by, limit)
            .await?;

        Ok(TopProducts {
            metric: metric.to_string(),
            limit,
            products,
            generated_at: Utc::now(),
        })
    }
}
