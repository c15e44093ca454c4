// src/services/catalog_service.rs

use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{
        AttributeDataType, AttributeRef, Category, CustomAttribute, GlobalAttribute, Template,
        TemplateAttribute, TemplateAttributeDef,
    },
};

// Modelo + atributos resolvidos em ordem de exibição
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStructure {
    pub template: Template,
    pub attributes: Vec<TemplateAttributeDef>,
}

/// Gera o slug usado como chave no mapa de especificações.
/// Equivalente ASCII minúsculo do nome, com hífens nos separadores.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suprime hífen inicial

    for c in name.trim().chars() {
        let mapped = match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => Some('a'),
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => Some('e'),
            'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => Some('i'),
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => Some('o'),
            'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => Some('u'),
            'ñ' | 'Ñ' => Some('n'),
            'ç' | 'Ç' => Some('c'),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        };

        match mapped {
            Some(c) => {
                slug.push(c);
                last_dash = false;
            }
            None if !last_dash => {
                slug.push('-');
                last_dash = true;
            }
            None => {}
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // =========================================================================
    //  1. CATEGORIAS
    // =========================================================================

    pub async fn list_categories(&self, company_id: Uuid) -> Result<Vec<Category>, AppError> {
        self.repo.list_categories(company_id).await
    }

    pub async fn create_category(
        &self,
        company_id: Uuid,
        name: &str,
    ) -> Result<Category, AppError> {
        self.repo.create_category(&self.pool, company_id, name).await
    }

    pub async fn rename_category(
        &self,
        company_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Category, AppError> {
        self.repo
            .rename_category(&self.pool, company_id, id, name)
            .await?
            .ok_or(AppError::CategoryNotFound)
    }

    /// Soft delete, recusado enquanto a categoria tiver produtos ativos.
    pub async fn delete_category(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let category = self
            .repo
            .find_category(company_id, id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        if self.repo.category_has_active_products(category.id).await? {
            return Err(AppError::CategoryHasProducts);
        }

        let removed = self.repo.deactivate_category(&self.pool, company_id, id).await?;
        if !removed {
            return Err(AppError::CategoryNotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  2. ATRIBUTOS
    // =========================================================================

    pub async fn list_global_attributes(&self) -> Result<Vec<GlobalAttribute>, AppError> {
        self.repo.list_global_attributes().await
    }

    pub async fn create_global_attribute(
        &self,
        name: &str,
        data_type: AttributeDataType,
        unit_of_measure: Option<&str>,
        description: Option<&str>,
    ) -> Result<GlobalAttribute, AppError> {
        let slug = slugify(name);
        self.repo
            .create_global_attribute(&self.pool, name, &slug, data_type, unit_of_measure, description)
            .await
    }

    pub async fn list_custom_attributes(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<CustomAttribute>, AppError> {
        self.repo.list_custom_attributes(company_id).await
    }

    pub async fn create_custom_attribute(
        &self,
        company_id: Uuid,
        name: &str,
        data_type: AttributeDataType,
        unit_of_measure: Option<&str>,
        description: Option<&str>,
    ) -> Result<CustomAttribute, AppError> {
        let slug = slugify(name);
        self.repo
            .create_custom_attribute(
                &self.pool,
                company_id,
                name,
                &slug,
                data_type,
                unit_of_measure,
                description,
            )
            .await
    }

    pub async fn delete_global_attribute(&self, id: Uuid) -> Result<(), AppError> {
        self.repo
            .find_global_attribute(id)
            .await?
            .ok_or(AppError::AttributeNotFound)?;

        if self.repo.attribute_in_use(AttributeRef::Global(id)).await? {
            return Err(AppError::AttributeInUse);
        }

        let removed = self.repo.delete_global_attribute(&self.pool, id).await?;
        if !removed {
            return Err(AppError::AttributeNotFound);
        }
        Ok(())
    }

    pub async fn delete_custom_attribute(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError> {
        self.repo
            .find_custom_attribute(company_id, id)
            .await?
            .ok_or(AppError::AttributeNotFound)?;

        if self.repo.attribute_in_use(AttributeRef::Custom(id)).await? {
            return Err(AppError::AttributeInUse);
        }

        let removed = self
            .repo
            .delete_custom_attribute(&self.pool, company_id, id)
            .await?;
        if !removed {
            return Err(AppError::AttributeNotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  3. MODELOS DE PRODUTO
    // =========================================================================

    pub async fn list_templates(&self, company_id: Uuid) -> Result<Vec<Template>, AppError> {
        self.repo.list_templates(company_id).await
    }

    pub async fn create_template(
        &self,
        company_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Template, AppError> {
        self.repo
            .create_template(&self.pool, company_id, name, description)
            .await
    }

    pub async fn template_structure(
        &self,
        company_id: Uuid,
        template_id: Uuid,
    ) -> Result<TemplateStructure, AppError> {
        let template = self
            .repo
            .find_template(company_id, template_id)
            .await?
            .ok_or(AppError::TemplateNotFound)?;

        let attributes = self.repo.list_template_attribute_defs(template.id).await?;

        Ok(TemplateStructure {
            template,
            attributes,
        })
    }

    /// Anexa um atributo (global OU personalizado) ao modelo.
    pub async fn add_template_attribute(
        &self,
        company_id: Uuid,
        template_id: Uuid,
        global_attribute_id: Option<Uuid>,
        custom_attribute_id: Option<Uuid>,
        is_required: bool,
        default_value: Option<&str>,
        sort_order: i32,
    ) -> Result<TemplateAttribute, AppError> {
        let template = self
            .repo
            .find_template(company_id, template_id)
            .await?
            .ok_or(AppError::TemplateNotFound)?;

        // O par de Options do payload colapsa no enum aqui; "ambos" e
        // "nenhum" param antes de chegar ao banco.
        let attribute = match (global_attribute_id, custom_attribute_id) {
            (Some(id), None) => {
                self.repo
                    .find_global_attribute(id)
                    .await?
                    .ok_or(AppError::AttributeNotFound)?;
                AttributeRef::Global(id)
            }
            (None, Some(id)) => {
                self.repo
                    .find_custom_attribute(company_id, id)
                    .await?
                    .ok_or(AppError::AttributeNotFound)?;
                AttributeRef::Custom(id)
            }
            _ => return Err(AppError::ExactlyOneAttributeRequired),
        };

        self.repo
            .add_template_attribute(
                &self.pool,
                template.id,
                attribute,
                is_required,
                default_value,
                sort_order,
            )
            .await
    }

    /// Reordena os atributos do modelo em uma transação só.
    pub async fn reorder_template_attributes(
        &self,
        company_id: Uuid,
        template_id: Uuid,
        orders: &[(Uuid, i32)],
    ) -> Result<Vec<TemplateAttributeDef>, AppError> {
        let template = self
            .repo
            .find_template(company_id, template_id)
            .await?
            .ok_or(AppError::TemplateNotFound)?;

        let mut tx = self.pool.begin().await?;
        for (attribute_id, sort_order) in orders {
            let updated = self
                .repo
                .update_attribute_order(&mut *tx, template.id, *attribute_id, *sort_order)
                .await?;
            if !updated {
                return Err(AppError::AttributeNotFound);
            }
        }
        tx.commit().await?;

        self.repo.list_template_attribute_defs(template.id).await
    }

    pub async fn delete_template(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let template = self
            .repo
            .find_template(company_id, id)
            .await?
            .ok_or(AppError::TemplateNotFound)?;

        if self.repo.template_has_active_products(template.id).await? {
            return Err(AppError::TemplateHasProducts);
        }

        let removed = self.repo.deactivate_template(&self.pool, company_id, id).await?;
        if !removed {
            return Err(AppError::TemplateNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slug_basico() {
        assert_eq!(slugify("Storage"), "storage");
        assert_eq!(slugify("Tamanho da Tela"), "tamanho-da-tela");
    }

    #[test]
    fn slug_remove_acentos() {
        assert_eq!(slugify("Año de Fabricación"), "ano-de-fabricacion");
        assert_eq!(slugify("Memória RAM"), "memoria-ram");
    }

    #[test]
    fn slug_comprime_separadores() {
        assert_eq!(slugify("  Peso (kg)  "), "peso-kg");
        assert_eq!(slugify("a--b"), "a-b");
    }
}
