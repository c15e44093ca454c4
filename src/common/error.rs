// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

// Erro de domínio da aplicação. O `IntoResponse` no fim do arquivo é o
// único lugar que conhece códigos HTTP; serviços e repositórios só
// falam em termos destas variantes.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Validação de entrada ---
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Especificações inválidas")]
    SpecificationValidation(BTreeMap<String, String>),

    #[error("A quantidade deve ser maior que zero")]
    InvalidQuantity,

    #[error("A nova quantidade é igual à quantidade atual")]
    NoOpAdjustment,

    // --- Regras do ledger ---
    #[error("Estoque insuficiente (disponível: {available})")]
    InsufficientStock { available: Decimal },

    // --- Violações de invariante ---
    #[error("Transferências exigem depósito de origem e de destino")]
    TransferRequiresBothWarehouses,

    #[error("O depósito de destino deve ser diferente do de origem")]
    SameWarehouseTransfer,

    #[error("O recurso '{0}' pertence a outra empresa")]
    CrossCompanyReference(&'static str),

    #[error("Movimentações de estoque não podem ser excluídas")]
    MovementsImmutable,

    #[error("Informe exatamente um atributo: global ou personalizado")]
    ExactlyOneAttributeRequired,

    // --- Autenticação / autorização ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Conta não encontrada")]
    AccountNotFound,

    #[error("A conta ainda não pertence a uma empresa")]
    CompanyRequired,

    #[error("A conta já pertence a uma empresa")]
    AccountAlreadyInCompany,

    #[error("Permissão insuficiente para esta ação")]
    Forbidden,

    // --- Não encontrado (ou fora do escopo da empresa) ---
    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Depósito não encontrado")]
    WarehouseNotFound,

    #[error("Categoria não encontrada")]
    CategoryNotFound,

    #[error("Modelo não encontrado")]
    TemplateNotFound,

    #[error("Atributo não encontrado")]
    AttributeNotFound,

    #[error("Saldo de estoque não encontrado")]
    StockRecordNotFound,

    // --- Conflitos de unicidade ---
    #[error("Já existe um produto com o SKU '{0}' nesta empresa")]
    SkuAlreadyExists(String),

    #[error("Já existe uma categoria chamada '{0}'")]
    CategoryNameAlreadyExists(String),

    #[error("Já existe um modelo chamado '{0}'")]
    TemplateNameAlreadyExists(String),

    #[error("Já existe um depósito chamado '{0}'")]
    WarehouseNameAlreadyExists(String),

    #[error("Já existe um atributo com o slug '{0}'")]
    AttributeSlugAlreadyExists(String),

    #[error("Já existe uma empresa com este RUT")]
    RutAlreadyExists,

    // --- Exclusão bloqueada por dependentes ---
    #[error("A categoria possui produtos ativos e não pode ser excluída")]
    CategoryHasProducts,

    #[error("O modelo possui produtos ativos e não pode ser excluído")]
    TemplateHasProducts,

    #[error("O atributo está em uso por um modelo e não pode ser excluído")]
    AttributeInUse,

    #[error("O depósito ainda possui estoque e não pode ser excluído")]
    WarehouseHasStock,

    #[error("O produto ainda possui estoque e não pode ser excluído")]
    ProductHasStock,

    // --- Infraestrutura ---
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Mesmo formato de resposta, mas com os erros por slug de atributo.
            AppError::SpecificationValidation(details) => {
                let body = Json(json!({
                    "error": "Uma ou mais especificações são inválidas.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // O chamador precisa do disponível para montar uma mensagem útil.
            AppError::InsufficientStock { available } => {
                let body = Json(json!({
                    "error": format!("Estoque insuficiente. Disponível: {}", available),
                    "available": *available,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidQuantity
            | AppError::NoOpAdjustment
            | AppError::TransferRequiresBothWarehouses
            | AppError::SameWarehouseTransfer
            | AppError::MovementsImmutable
            | AppError::ExactlyOneAttributeRequired => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::CrossCompanyReference(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::CompanyRequired | AppError::AccountAlreadyInCompany => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }

            AppError::InvalidCredentials | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),

            AppError::AccountNotFound
            | AppError::ProductNotFound
            | AppError::WarehouseNotFound
            | AppError::CategoryNotFound
            | AppError::TemplateNotFound
            | AppError::AttributeNotFound
            | AppError::StockRecordNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::EmailAlreadyExists
            | AppError::RutAlreadyExists
            | AppError::SkuAlreadyExists(_)
            | AppError::CategoryNameAlreadyExists(_)
            | AppError::TemplateNameAlreadyExists(_)
            | AppError::WarehouseNameAlreadyExists(_)
            | AppError::AttributeSlugAlreadyExists(_) => (StatusCode::CONFLICT, self.to_string()),

            AppError::CategoryHasProducts
            | AppError::TemplateHasProducts
            | AppError::AttributeInUse
            | AppError::WarehouseHasStock
            | AppError::ProductHasStock => (StatusCode::BAD_REQUEST, self.to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
