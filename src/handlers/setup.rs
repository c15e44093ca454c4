// src/handlers/setup.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, company::CompanyScope},
    models::company::{Company, CompanyStats},
    services::company_service::{OnboardingProgress, SetupOutcome},
};

// ---
// Payload: criação da empresa (onboarding)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetupCompanyPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub company_name: String,

    #[validate(length(min = 1, message = "O RUT da empresa é obrigatório."))]
    pub company_rut: String,
}

// Cria a empresa e torna a conta chamadora a administradora dela.
#[utoipa::path(
    post,
    path = "/api/v1/setup/company",
    tag = "Setup",
    request_body = SetupCompanyPayload,
    responses((status = 201, body = SetupOutcome))
)]
pub async fn setup_company(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<SetupCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let outcome = app_state
        .company_service
        .setup_company(&user.0, &payload.company_name, &payload.company_rut)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

#[utoipa::path(
    get,
    path = "/api/v1/setup/onboarding-progress",
    tag = "Setup",
    responses((status = 200, body = OnboardingProgress))
)]
pub async fn onboarding_progress(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<OnboardingProgress>, AppError> {
    let progress = app_state.company_service.onboarding_progress(&user.0).await?;
    Ok(Json(progress))
}

#[utoipa::path(
    post,
    path = "/api/v1/setup/complete-onboarding",
    tag = "Setup",
    responses((status = 204))
)]
pub async fn complete_onboarding(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    app_state.company_service.complete_onboarding(&user.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/companies/me",
    tag = "Company",
    responses((status = 200, body = Company))
)]
pub async fn my_company(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<Company>, AppError> {
    let found = app_state.company_service.my_company(company.0).await?;
    Ok(Json(found))
}

#[utoipa::path(
    get,
    path = "/api/v1/companies/stats",
    tag = "Company",
    responses((status = 200, body = CompanyStats))
)]
pub async fn company_stats(
    State(app_state): State<AppState>,
    company: CompanyScope,
) -> Result<Json<CompanyStats>, AppError> {
    let stats = app_state.company_service.stats(company.0).await?;
    Ok(Json(stats))
}
