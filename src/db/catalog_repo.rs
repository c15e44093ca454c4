// src/db/catalog_repo.rs

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{
        AttributeDataType, AttributeRef, Category, CustomAttribute, GlobalAttribute, Template,
        TemplateAttribute, TemplateAttributeDef,
    },
};

// Repositório do "cadastro": categorias, atributos e modelos de produto.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

// Linha crua do join de atributos de modelo. As duas FKs anuláveis
// colapsam em `AttributeRef` ao virar `TemplateAttributeDef`.
#[derive(sqlx::FromRow)]
struct TemplateAttributeRow {
    id: Uuid,
    global_attribute_id: Option<Uuid>,
    custom_attribute_id: Option<Uuid>,
    is_required: bool,
    default_value: Option<String>,
    sort_order: i32,
    slug: String,
    name: String,
    data_type: AttributeDataType,
    unit_of_measure: Option<String>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

impl TemplateAttributeRow {
    fn into_def(self) -> Result<TemplateAttributeDef, AppError> {
        let attribute = match (self.global_attribute_id, self.custom_attribute_id) {
            (Some(id), None) => AttributeRef::Global(id),
            (None, Some(id)) => AttributeRef::Custom(id),
            // O CHECK da tabela impede isto; se aparecer, o banco está corrompido.
            _ => {
                return Err(AppError::InternalServerError(anyhow!(
                    "template_attribute {} sem atributo resolvível",
                    self.id
                )));
            }
        };

        Ok(TemplateAttributeDef {
            id: self.id,
            attribute,
            slug: self.slug,
            name: self.name,
            data_type: self.data_type,
            unit_of_measure: self.unit_of_measure,
            is_required: self.is_required,
            default_value: self.default_value,
            sort_order: self.sort_order,
        })
    }
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Categorias
    // ---

    pub async fn list_categories(&self, company_id: Uuid) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE company_id = $1 AND is_active ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn find_category(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = $1 AND company_id = $2 AND is_active",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn find_category_any(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1 AND is_active")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(category)
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (company_id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(company_id)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CategoryNameAlreadyExists(name.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn rename_category<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $3, updated_at = now()
            WHERE id = $1 AND company_id = $2 AND is_active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(name)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CategoryNameAlreadyExists(name.to_string());
                }
            }
            AppError::from(e)
        })?;
        Ok(category)
    }

    pub async fn deactivate_category<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE categories SET is_active = FALSE, updated_at = now() WHERE id = $1 AND company_id = $2 AND is_active",
        )
        .bind(id)
        .bind(company_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // Pré-condição de exclusão: a categoria não pode ter produtos ativos.
    pub async fn category_has_active_products(&self, category_id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE category_id = $1 AND is_active)",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    // ---
    // Atributos globais e por empresa
    // ---

    pub async fn list_global_attributes(&self) -> Result<Vec<GlobalAttribute>, AppError> {
        let attributes = sqlx::query_as::<_, GlobalAttribute>(
            "SELECT * FROM global_attributes ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(attributes)
    }

    pub async fn find_global_attribute(
        &self,
        id: Uuid,
    ) -> Result<Option<GlobalAttribute>, AppError> {
        let attribute =
            sqlx::query_as::<_, GlobalAttribute>("SELECT * FROM global_attributes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(attribute)
    }

    pub async fn create_global_attribute<'e, E>(
        &self,
        executor: E,
        name: &str,
        slug: &str,
        data_type: AttributeDataType,
        unit_of_measure: Option<&str>,
        description: Option<&str>,
    ) -> Result<GlobalAttribute, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, GlobalAttribute>(
            r#"
            INSERT INTO global_attributes (name, slug, data_type, unit_of_measure, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(data_type)
        .bind(unit_of_measure)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::AttributeSlugAlreadyExists(slug.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn list_custom_attributes(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<CustomAttribute>, AppError> {
        let attributes = sqlx::query_as::<_, CustomAttribute>(
            "SELECT * FROM custom_attributes WHERE company_id = $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attributes)
    }

    pub async fn find_custom_attribute(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<CustomAttribute>, AppError> {
        let attribute = sqlx::query_as::<_, CustomAttribute>(
            "SELECT * FROM custom_attributes WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(attribute)
    }

    pub async fn create_custom_attribute<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
        slug: &str,
        data_type: AttributeDataType,
        unit_of_measure: Option<&str>,
        description: Option<&str>,
    ) -> Result<CustomAttribute, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, CustomAttribute>(
            r#"
            INSERT INTO custom_attributes (company_id, name, slug, data_type, unit_of_measure, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(slug)
        .bind(data_type)
        .bind(unit_of_measure)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::AttributeSlugAlreadyExists(slug.to_string());
                }
            }
            e.into()
        })
    }

    // Pré-condição de exclusão: atributo referenciado por algum modelo fica.
    pub async fn attribute_in_use(&self, attribute: AttributeRef) -> Result<bool, AppError> {
        let (column, id) = match attribute {
            AttributeRef::Global(id) => ("global_attribute_id", id),
            AttributeRef::Custom(id) => ("custom_attribute_id", id),
        };
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM template_attributes WHERE {column} = $1 AND is_active)"
        );
        let exists = sqlx::query_scalar::<_, bool>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn delete_global_attribute<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM global_attributes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_custom_attribute<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM custom_attributes WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Modelos de produto
    // ---

    pub async fn list_templates(&self, company_id: Uuid) -> Result<Vec<Template>, AppError> {
        let templates = sqlx::query_as::<_, Template>(
            "SELECT * FROM templates WHERE company_id = $1 AND is_active ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(templates)
    }

    pub async fn find_template(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Template>, AppError> {
        let template = sqlx::query_as::<_, Template>(
            "SELECT * FROM templates WHERE id = $1 AND company_id = $2 AND is_active",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(template)
    }

    pub async fn find_template_any(&self, id: Uuid) -> Result<Option<Template>, AppError> {
        let template =
            sqlx::query_as::<_, Template>("SELECT * FROM templates WHERE id = $1 AND is_active")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(template)
    }

    pub async fn create_template<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Template, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Template>(
            "INSERT INTO templates (company_id, name, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(company_id)
        .bind(name)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::TemplateNameAlreadyExists(name.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn deactivate_template<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE templates SET is_active = FALSE, updated_at = now() WHERE id = $1 AND company_id = $2 AND is_active",
        )
        .bind(id)
        .bind(company_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn template_has_active_products(&self, template_id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE template_id = $1 AND is_active)",
        )
        .bind(template_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Atributos ativos do modelo, já resolvidos e em ordem de exibição.
    pub async fn list_template_attribute_defs(
        &self,
        template_id: Uuid,
    ) -> Result<Vec<TemplateAttributeDef>, AppError> {
        let rows = sqlx::query_as::<_, TemplateAttributeRow>(
            r#"
            SELECT ta.id, ta.global_attribute_id, ta.custom_attribute_id,
                   ta.is_required, ta.default_value, ta.sort_order, ta.created_at,
                   COALESCE(ga.slug, ca.slug) AS slug,
                   COALESCE(ga.name, ca.name) AS name,
                   COALESCE(ga.data_type, ca.data_type) AS data_type,
                   COALESCE(ga.unit_of_measure, ca.unit_of_measure) AS unit_of_measure
            FROM template_attributes ta
            LEFT JOIN global_attributes ga ON ga.id = ta.global_attribute_id
            LEFT JOIN custom_attributes ca ON ca.id = ta.custom_attribute_id
            WHERE ta.template_id = $1 AND ta.is_active
            ORDER BY ta.sort_order ASC, ta.created_at ASC
            "#,
        )
        .bind(template_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TemplateAttributeRow::into_def).collect()
    }

    pub async fn add_template_attribute<'e, E>(
        &self,
        executor: E,
        template_id: Uuid,
        attribute: AttributeRef,
        is_required: bool,
        default_value: Option<&str>,
        sort_order: i32,
    ) -> Result<TemplateAttribute, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (global_id, custom_id) = match attribute {
            AttributeRef::Global(id) => (Some(id), None),
            AttributeRef::Custom(id) => (None, Some(id)),
        };

        let attribute = sqlx::query_as::<_, TemplateAttribute>(
            r#"
            INSERT INTO template_attributes
                (template_id, global_attribute_id, custom_attribute_id, is_required, default_value, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(template_id)
        .bind(global_id)
        .bind(custom_id)
        .bind(is_required)
        .bind(default_value)
        .bind(sort_order)
        .fetch_one(executor)
        .await?;

        Ok(attribute)
    }

    pub async fn update_attribute_order<'e, E>(
        &self,
        executor: E,
        template_id: Uuid,
        template_attribute_id: Uuid,
        sort_order: i32,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE template_attributes SET sort_order = $3 WHERE id = $2 AND template_id = $1",
        )
        .bind(template_id)
        .bind(template_attribute_id)
        .bind(sort_order)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
