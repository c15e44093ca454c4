// src/db/company_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::company::{Company, CompanyStats},
};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

// Flags consultadas pelo progresso de onboarding
#[derive(Debug, sqlx::FromRow)]
pub struct OnboardingSteps {
    pub has_categories: bool,
    pub has_templates: bool,
    pub has_products: bool,
    pub has_stock: bool,
    pub has_team: bool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    pub async fn create_company<'e, E>(
        &self,
        executor: E,
        name: &str,
        rut: &str,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (name, rut) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(rut)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::RutAlreadyExists;
                }
            }
            e.into()
        })
    }

    /// Passos do onboarding em uma ida ao banco.
    pub async fn onboarding_steps(&self, company_id: Uuid) -> Result<OnboardingSteps, AppError> {
        let steps = sqlx::query_as::<_, OnboardingSteps>(
            r#"
            SELECT
                EXISTS(SELECT 1 FROM categories WHERE company_id = $1 AND is_active) AS has_categories,
                EXISTS(SELECT 1 FROM templates  WHERE company_id = $1 AND is_active) AS has_templates,
                EXISTS(SELECT 1 FROM products   WHERE company_id = $1 AND is_active) AS has_products,
                EXISTS(
                    SELECT 1 FROM stock_records sr
                    JOIN products p ON p.id = sr.product_id
                    WHERE p.company_id = $1 AND sr.current_quantity > 0
                ) AS has_stock,
                (SELECT COUNT(*) FROM accounts WHERE company_id = $1 AND is_active) > 1 AS has_team
            "#,
        )
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(steps)
    }

    // Contadores do painel, tudo em uma ida ao banco
    pub async fn stats(&self, company_id: Uuid) -> Result<CompanyStats, AppError> {
        let stats = sqlx::query_as::<_, CompanyStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM products   WHERE company_id = $1 AND is_active) AS total_products,
                (SELECT COUNT(*) FROM categories WHERE company_id = $1 AND is_active) AS total_categories,
                (SELECT COUNT(*) FROM templates  WHERE company_id = $1 AND is_active) AS total_templates,
                (SELECT COUNT(*) FROM warehouses WHERE company_id = $1 AND is_active) AS total_warehouses,
                (SELECT COUNT(*) FROM accounts   WHERE company_id = $1 AND is_active) AS total_accounts
            "#,
        )
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
