// src/services/auth_service.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AccountRepository,
    models::auth::{Account, Claims},
};

#[derive(Clone)]
pub struct AuthService {
    account_repo: AccountRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(account_repo: AccountRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self {
            account_repo,
            jwt_secret,
            pool,
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<String, AppError> {
        // 1. Hashing fora da transação (não toca no banco e é pesado)
        let password_clone = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 2. Cria a conta
        let mut tx = self.pool.begin().await?;
        let account = self
            .account_repo
            .create_account(&mut *tx, email, &password_hash)
            .await?;
        tx.commit().await?;

        tracing::info!("Conta criada: {}", account.email);

        // 3. Gera o token
        self.create_token(account.id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let account = self
            .account_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !account.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = account.password_hash.clone();

        // Executa a verificação em uma thread separada
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(account.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Account, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.account_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::AccountNotFound)
    }

    fn create_token(&self, account_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: account_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
