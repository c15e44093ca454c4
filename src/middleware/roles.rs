// src/middleware/roles.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::auth::Account};

// Guardião de papel: só deixa passar contas admin. Vendedores podem
// registrar movimentações, mas não mexem no cadastro nem reconciliam.
pub struct AdminUser(pub Account);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account = parts
            .extensions
            .get::<Account>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        if !account.is_admin() {
            return Err(AppError::Forbidden);
        }

        Ok(AdminUser(account))
    }
}
