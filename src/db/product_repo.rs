// src/db/product_repo.rs

use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{Product, ProductSummary, ProductWarehouseStock},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

// Base compartilhada pelas listagens: produto + nomes + agregado de estoque.
const SUMMARY_SELECT: &str = r#"
    SELECT p.id, p.name, p.sku, p.barcode, p.price, p.cost, p.unit_of_measure,
           p.minimum_stock,
           c.name AS category_name,
           t.name AS template_name,
           COALESCE(s.total, 0) AS total_stock,
           COALESCE(s.total, 0) < p.minimum_stock AS below_minimum,
           p.is_active
    FROM products p
    JOIN categories c ON c.id = p.category_id
    JOIN templates t ON t.id = p.template_id
    LEFT JOIN (
        SELECT product_id, SUM(current_quantity) AS total
        FROM stock_records
        WHERE is_active
        GROUP BY product_id
    ) s ON s.product_id = p.id
"#;

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_products(
        &self,
        company_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<ProductSummary>, AppError> {
        let query = format!(
            r#"{SUMMARY_SELECT}
            WHERE p.company_id = $1 AND p.is_active
              AND ($2::text IS NULL OR p.name ILIKE '%' || $2 || '%' OR p.sku ILIKE '%' || $2 || '%')
            ORDER BY p.name ASC
            "#
        );
        let products = sqlx::query_as::<_, ProductSummary>(&query)
            .bind(company_id)
            .bind(search)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn list_by_category(
        &self,
        company_id: Uuid,
        category_id: Uuid,
    ) -> Result<Vec<ProductSummary>, AppError> {
        let query = format!(
            r#"{SUMMARY_SELECT}
            WHERE p.company_id = $1 AND p.category_id = $2 AND p.is_active
            ORDER BY p.name ASC
            "#
        );
        let products = sqlx::query_as::<_, ProductSummary>(&query)
            .bind(company_id)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Produtos ativos com estoque total positivo porém abaixo do mínimo.
    pub async fn low_stock(&self, company_id: Uuid) -> Result<Vec<ProductSummary>, AppError> {
        let query = format!(
            r#"{SUMMARY_SELECT}
            WHERE p.company_id = $1 AND p.is_active
              AND COALESCE(s.total, 0) > 0
              AND COALESCE(s.total, 0) < p.minimum_stock
            ORDER BY p.name ASC
            "#
        );
        let products = sqlx::query_as::<_, ProductSummary>(&query)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Produtos ativos sem nenhum estoque em nenhum depósito.
    pub async fn out_of_stock(&self, company_id: Uuid) -> Result<Vec<ProductSummary>, AppError> {
        let query = format!(
            r#"{SUMMARY_SELECT}
            WHERE p.company_id = $1 AND p.is_active
              AND COALESCE(s.total, 0) = 0
            ORDER BY p.name ASC
            "#
        );
        let products = sqlx::query_as::<_, ProductSummary>(&query)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Top produtos por métrica. A coluna de ordenação é escolhida aqui
    /// a partir de um conjunto fechado; nada vindo do cliente entra no SQL.
    pub async fn top_products(
        &self,
        company_id: Uuid,
        order_by: &'static str,
        limit: i64,
    ) -> Result<Vec<ProductSummary>, AppError> {
        let query = format!(
            r#"{SUMMARY_SELECT}
            WHERE p.company_id = $1 AND p.is_active
            ORDER BY {order_by} DESC
            LIMIT $2
            "#
        );
        let products = sqlx::query_as::<_, ProductSummary>(&query)
            .bind(company_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_product(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 AND company_id = $2 AND is_active",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    // Busca sem escopo de empresa; o serviço compara company_id para
    // diferenciar "não existe" de "pertence a outra empresa".
    pub async fn find_product_any(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 AND is_active")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(product)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        category_id: Uuid,
        template_id: Uuid,
        name: &str,
        sku: &str,
        barcode: Option<&str>,
        price: Decimal,
        cost: Decimal,
        unit_of_measure: Option<&str>,
        minimum_stock: Decimal,
        specifications: &Value,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products
                (company_id, category_id, template_id, name, sku, barcode,
                 price, cost, unit_of_measure, minimum_stock, specifications)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(category_id)
        .bind(template_id)
        .bind(name)
        .bind(sku)
        .bind(barcode)
        .bind(price)
        .bind(cost)
        .bind(unit_of_measure)
        .bind(minimum_stock)
        .bind(specifications)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists(sku.to_string());
                }
            }
            e.into()
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
        category_id: Uuid,
        template_id: Uuid,
        name: &str,
        sku: &str,
        barcode: Option<&str>,
        price: Decimal,
        cost: Decimal,
        unit_of_measure: Option<&str>,
        minimum_stock: Decimal,
        specifications: &Value,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET category_id = $3, template_id = $4, name = $5, sku = $6, barcode = $7,
                price = $8, cost = $9, unit_of_measure = $10, minimum_stock = $11,
                specifications = $12, updated_at = now()
            WHERE id = $1 AND company_id = $2 AND is_active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(category_id)
        .bind(template_id)
        .bind(name)
        .bind(sku)
        .bind(barcode)
        .bind(price)
        .bind(cost)
        .bind(unit_of_measure)
        .bind(minimum_stock)
        .bind(specifications)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists(sku.to_string());
                }
            }
            AppError::from(e)
        })?;
        Ok(product)
    }

    pub async fn total_stock(&self, product_id: Uuid) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(current_quantity), 0) FROM stock_records WHERE product_id = $1 AND is_active",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn stock_by_warehouse(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<ProductWarehouseStock>, AppError> {
        let stock = sqlx::query_as::<_, ProductWarehouseStock>(
            r#"
            SELECT w.id AS warehouse_id, w.name AS warehouse_name, w.is_main,
                   sr.current_quantity AS quantity
            FROM stock_records sr
            JOIN warehouses w ON w.id = sr.warehouse_id
            WHERE sr.product_id = $1 AND sr.is_active AND w.is_active
            ORDER BY w.name ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stock)
    }

    pub async fn deactivate_product<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = now() WHERE id = $1 AND company_id = $2 AND is_active",
        )
        .bind(id)
        .bind(company_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
