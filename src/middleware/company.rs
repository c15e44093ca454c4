// src/middleware/company.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Account};

// Extrator do escopo de empresa. Toda rota de inventário exige que a
// conta já tenha concluído o setup; contas sem empresa são rejeitadas
// antes de qualquer consulta.
#[derive(Debug, Clone, Copy)]
pub struct CompanyScope(pub Uuid);

impl<S> FromRequestParts<S> for CompanyScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account = parts
            .extensions
            .get::<Account>()
            .ok_or(AppError::InvalidToken)?;

        account
            .company_id
            .map(CompanyScope)
            .ok_or(AppError::CompanyRequired)
    }
}
