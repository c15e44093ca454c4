// src/services/company_service.rs

use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AccountRepository, CatalogRepository, CompanyRepository, WarehouseRepository},
    models::{
        auth::{Account, AccountRole},
        company::{Company, CompanyStats},
        warehouse::Warehouse,
    },
};

// IDs dos registros padrão criados no setup
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetupDefaults {
    pub category_id: Uuid,
    pub template_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetupOutcome {
    pub company: Company,
    pub account: Account,
    pub warehouse: Warehouse,
    pub defaults: SetupDefaults,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStepMap {
    pub create_category: bool,
    pub create_template: bool,
    pub create_product: bool,
    pub add_stock: bool,
    pub invite_team: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProgress {
    pub has_company: bool,
    pub completed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<OnboardingStepMap>,
    pub onboarding_completed: bool,
}

#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
    account_repo: AccountRepository,
    warehouse_repo: WarehouseRepository,
    catalog_repo: CatalogRepository,
    pool: PgPool,
}

impl CompanyService {
    pub fn new(
        company_repo: CompanyRepository,
        account_repo: AccountRepository,
        warehouse_repo: WarehouseRepository,
        catalog_repo: CatalogRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            company_repo,
            account_repo,
            warehouse_repo,
            catalog_repo,
            pool,
        }
    }

    /// Setup inicial: cria a empresa, torna a conta chamadora admin e
    /// semeia depósito principal, categoria e modelo padrão — tudo ou nada.
    pub async fn setup_company(
        &self,
        account: &Account,
        name: &str,
        rut: &str,
    ) -> Result<SetupOutcome, AppError> {
        if account.company_id.is_some() {
            return Err(AppError::AccountAlreadyInCompany);
        }

        let mut tx = self.pool.begin().await?;

        // 1. Cria a empresa
        let company = self.company_repo.create_company(&mut *tx, name, rut).await?;

        // 2. A conta que fez o setup vira a dona (admin)
        let account = self
            .account_repo
            .assign_company(&mut *tx, account.id, company.id, AccountRole::Admin)
            .await?;

        // 3. Depósito principal
        let warehouse = self
            .warehouse_repo
            .create(&mut *tx, company.id, "Depósito Principal", None, true)
            .await?;

        // 4. Categoria e modelo padrão, para o catálogo não nascer vazio
        let category = self
            .catalog_repo
            .create_category(&mut *tx, company.id, "Geral")
            .await?;
        let template = self
            .catalog_repo
            .create_template(
                &mut *tx,
                company.id,
                "Modelo Básico",
                Some("Modelo inicial para produtos"),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Empresa '{}' criada pela conta {}", company.name, account.email);

        Ok(SetupOutcome {
            company,
            account,
            warehouse,
            defaults: SetupDefaults {
                category_id: category.id,
                template_id: template.id,
            },
        })
    }

    pub async fn onboarding_progress(
        &self,
        account: &Account,
    ) -> Result<OnboardingProgress, AppError> {
        let Some(company_id) = account.company_id else {
            return Ok(OnboardingProgress {
                has_company: false,
                completed: 0.0,
                company_id: None,
                steps: None,
                onboarding_completed: account.onboarding_completed,
            });
        };

        let steps = self.company_repo.onboarding_steps(company_id).await?;

        let flags = [
            steps.has_categories,
            steps.has_templates,
            steps.has_products,
            steps.has_stock,
            steps.has_team,
        ];
        let completed_steps = flags.iter().filter(|f| **f).count();
        let completed = (completed_steps as f64 / flags.len() as f64) * 100.0;

        Ok(OnboardingProgress {
            has_company: true,
            completed,
            company_id: Some(company_id),
            steps: Some(OnboardingStepMap {
                create_category: steps.has_categories,
                create_template: steps.has_templates,
                create_product: steps.has_products,
                add_stock: steps.has_stock,
                invite_team: steps.has_team,
            }),
            onboarding_completed: account.onboarding_completed,
        })
    }

    pub async fn complete_onboarding(&self, account: &Account) -> Result<(), AppError> {
        if account.company_id.is_none() {
            return Err(AppError::CompanyRequired);
        }
        self.account_repo.set_onboarding_completed(account.id).await
    }

    pub async fn my_company(&self, company_id: Uuid) -> Result<Company, AppError> {
        self.company_repo
            .find_by_id(company_id)
            .await?
            .ok_or(AppError::CompanyRequired)
    }

    pub async fn stats(&self, company_id: Uuid) -> Result<CompanyStats, AppError> {
        self.company_repo.stats(company_id).await
    }
}
