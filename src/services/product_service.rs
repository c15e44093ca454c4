// src/services/product_service.rs

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, ProductRepository},
    models::product::{Product, ProductStockDetails, ProductSummary},
    services::specifications::{self, SpecErrors},
};

#[derive(Debug, Clone)]
pub struct ProductInput {
    pub category_id: Uuid,
    pub template_id: Uuid,
    pub name: String,
    pub sku: String,
    pub barcode: Option<String>,
    pub price: Decimal,
    pub cost: Decimal,
    pub unit_of_measure: Option<String>,
    pub minimum_stock: Decimal,
    pub specifications: Value,
}

// Resposta do endpoint avulso de validação de especificações
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecValidationOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub validated_specifications: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<SpecErrors>,
}

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    catalog_repo: CatalogRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(
        product_repo: ProductRepository,
        catalog_repo: CatalogRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            product_repo,
            catalog_repo,
            pool,
        }
    }

    pub async fn list(
        &self,
        company_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<ProductSummary>, AppError> {
        self.product_repo.list_products(company_id, search).await
    }

    pub async fn list_by_category(
        &self,
        company_id: Uuid,
        category_id: Uuid,
    ) -> Result<Vec<ProductSummary>, AppError> {
        self.catalog_repo
            .find_category(company_id, category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        self.product_repo
            .list_by_category(company_id, category_id)
            .await
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_product(company_id, id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        input: ProductInput,
    ) -> Result<Product, AppError> {
        let (specifications, sku) = self.prepare(company_id, &input).await?;

        self.product_repo
            .create_product(
                &self.pool,
                company_id,
                input.category_id,
                input.template_id,
                input.name.trim(),
                &sku,
                normalized_barcode(&input.barcode).as_deref(),
                input.price,
                input.cost,
                input.unit_of_measure.as_deref(),
                input.minimum_stock,
                &specifications,
            )
            .await
    }

    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: ProductInput,
    ) -> Result<Product, AppError> {
        // Garante 404 correto antes de validar o resto
        self.find(company_id, id).await?;

        let (specifications, sku) = self.prepare(company_id, &input).await?;

        self.product_repo
            .update_product(
                &self.pool,
                company_id,
                id,
                input.category_id,
                input.template_id,
                input.name.trim(),
                &sku,
                normalized_barcode(&input.barcode).as_deref(),
                input.price,
                input.cost,
                input.unit_of_measure.as_deref(),
                input.minimum_stock,
                &specifications,
            )
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    // Validações compartilhadas por create/update: escopo da empresa
    // para categoria e modelo, e especificações contra o modelo.
    async fn prepare(
        &self,
        company_id: Uuid,
        input: &ProductInput,
    ) -> Result<(Value, String), AppError> {
        let category = self
            .catalog_repo
            .find_category_any(input.category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;
        if category.company_id != company_id {
            return Err(AppError::CrossCompanyReference("category"));
        }

        let template = self
            .catalog_repo
            .find_template_any(input.template_id)
            .await?
            .ok_or(AppError::TemplateNotFound)?;
        if template.company_id != company_id {
            return Err(AppError::CrossCompanyReference("template"));
        }

        let specs_map = as_spec_map(&input.specifications)?;
        let defs = self
            .catalog_repo
            .list_template_attribute_defs(template.id)
            .await?;

        let validated = specifications::validate_specifications(&defs, &specs_map)
            .map_err(AppError::SpecificationValidation)?;

        // SKU normalizado em maiúsculas
        let sku = input.sku.trim().to_uppercase();

        Ok((specifications::to_json(validated), sku))
    }

    /// Validação avulsa, sem persistir nada. Erros viram payload de
    /// resposta (valid=false), não erro HTTP.
    pub async fn validate_specifications(
        &self,
        company_id: Uuid,
        template_id: Uuid,
        raw: &Value,
    ) -> Result<SpecValidationOutcome, AppError> {
        let template = self
            .catalog_repo
            .find_template(company_id, template_id)
            .await?
            .ok_or(AppError::TemplateNotFound)?;

        let specs_map = as_spec_map(raw)?;
        let defs = self
            .catalog_repo
            .list_template_attribute_defs(template.id)
            .await?;

        match specifications::validate_specifications(&defs, &specs_map) {
            Ok(validated) => Ok(SpecValidationOutcome {
                valid: true,
                validated_specifications: Some(specifications::to_json(validated)),
                errors: None,
            }),
            Err(errors) => Ok(SpecValidationOutcome {
                valid: false,
                validated_specifications: None,
                errors: Some(errors),
            }),
        }
    }

    pub async fn stock_details(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> Result<ProductStockDetails, AppError> {
        let product = self.find(company_id, product_id).await?;

        let total_stock = self.product_repo.total_stock(product.id).await?;
        let stock_by_warehouse = self.product_repo.stock_by_warehouse(product.id).await?;

        Ok(ProductStockDetails {
            product_id: product.id,
            total_stock,
            stock_by_warehouse,
        })
    }

    pub async fn low_stock(&self, company_id: Uuid) -> Result<Vec<ProductSummary>, AppError> {
        self.product_repo.low_stock(company_id).await
    }

    /// Soft delete, recusado enquanto houver estoque em qualquer depósito.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let product = self.find(company_id, id).await?;

        let total = self.product_repo.total_stock(product.id).await?;
        if total > Decimal::ZERO {
            return Err(AppError::ProductHasStock);
        }

        let removed = self
            .product_repo
            .deactivate_product(&self.pool, company_id, id)
            .await?;
        if !removed {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }
}

fn as_spec_map(raw: &Value) -> Result<Map<String, Value>, AppError> {
    match raw {
        Value::Object(map) => Ok(map.clone()),
        _ => {
            let mut errors = SpecErrors::new();
            errors.insert(
                "specifications".to_string(),
                "deve ser um objeto JSON".to_string(),
            );
            Err(AppError::SpecificationValidation(errors))
        }
    }
}

fn normalized_barcode(barcode: &Option<String>) -> Option<String> {
    barcode
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
}
