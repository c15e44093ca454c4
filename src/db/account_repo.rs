// src/db/account_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Account, AccountRole},
};

// O repositório de contas, responsável por todas as interações com a
// tabela 'accounts'.
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca uma conta pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    // Busca uma conta pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    // Cria uma nova conta (ainda sem empresa)
    pub async fn create_account<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (email, password_hash) VALUES ($1, $2) RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    /// Vincula a conta a uma empresa com o papel informado (setup).
    pub async fn assign_company<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
        company_id: Uuid,
        role: AccountRole,
    ) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET company_id = $2, role = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(company_id)
        .bind(role)
        .fetch_optional(executor)
        .await?;

        account.ok_or(AppError::AccountNotFound)
    }

    pub async fn set_onboarding_completed(&self, account_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE accounts SET onboarding_completed = TRUE, updated_at = now() WHERE id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
