// src/handlers/donors.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, config::AppState};

// Rejeita nome vazio ou só de espaços.
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("O campo não pode ser vazio.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: DonorPayload (criação e atualização usam o mesmo formato)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorPayload {
    #[validate(custom(function = "validate_not_blank", message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(email(message = "E-mail inválido."))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub address: Option<String>,
}

// ---
// Handler: get_all_donors
// ---
#[utoipa::path(
    get,
    path = "/api/donors",
    responses((status = 200, body = [crate::models::donor::Donor])),
    tag = "donors"
)]
pub async fn get_all_donors(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let donors = app_state
        .donor_service
        .get_all_donors(&app_state.db_pool)
        .await?;
    Ok((StatusCode::OK, Json(donors)))
}

// ---
// Handler: create_donor
// ---
// O donor_code sai daqui já atribuído (sequência 501, 502, ...).
#[utoipa::path(
    post,
    path = "/api/donors",
    request_body = DonorPayload,
    responses(
        (status = 201, body = crate::models::donor::Donor),
        (status = 400, description = "Validação"),
    ),
    tag = "donors"
)]
pub async fn create_donor(
    State(app_state): State<AppState>,
    Json(payload): Json<DonorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let donor = app_state
        .donor_service
        .create_donor(
            &app_state.db_pool,
            payload.name.trim(),
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(donor)))
}

// ---
// Handler: update_donor (só contato; donor_code é imutável)
// ---
#[utoipa::path(
    put,
    path = "/api/donors/{id}",
    params(("id" = Uuid, Path, description = "Id do doador")),
    request_body = DonorPayload,
    responses(
        (status = 200, body = crate::models::donor::Donor),
        (status = 404, description = "Doador não encontrado"),
    ),
    tag = "donors"
)]
pub async fn update_donor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DonorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let donor = app_state
        .donor_service
        .update_donor(
            &app_state.db_pool,
            id,
            payload.name.trim(),
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
        )
        .await?;
    Ok((StatusCode::OK, Json(donor)))
}

// ---
// Handler: toggle_donor_status
// ---
#[utoipa::path(
    patch,
    path = "/api/donors/{id}/toggle-status",
    params(("id" = Uuid, Path, description = "Id do doador")),
    responses(
        (status = 200, body = crate::models::donor::Donor),
        (status = 404, description = "Doador não encontrado"),
    ),
    tag = "donors"
)]
pub async fn toggle_donor_status(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let donor = app_state
        .donor_service
        .toggle_donor_status(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(donor)))
}
