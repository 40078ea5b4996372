// src/handlers/lookups.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, config::AppState, models::catalog::LookupKind};

// Rejeita nome vazio ou só de espaços (cadastro "" não pode existir).
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("O campo não pode ser vazio.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateLookupPayload
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLookupPayload {
    #[serde(rename = "type")]
    pub kind: LookupKind,

    #[validate(custom(function = "validate_not_blank", message = "O nome é obrigatório."))]
    pub name: String,
}

// ---
// Handler: get_lookups (autores + categorias + idiomas)
// ---
#[utoipa::path(
    get,
    path = "/api/lookups",
    responses((status = 200, body = crate::models::catalog::LookupsResponse)),
    tag = "lookups"
)]
pub async fn get_lookups(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let lookups = app_state
        .catalog_service
        .get_lookups(&app_state.db_pool)
        .await?;
    Ok((StatusCode::OK, Json(lookups)))
}

// ---
// Handler: create_lookup
// ---
// Um endpoint só para os três cadastros; o match é exaustivo sobre o tipo.
#[utoipa::path(
    post,
    path = "/api/lookups",
    request_body = CreateLookupPayload,
    responses(
        (status = 201, description = "Cadastro criado"),
        (status = 400, description = "Nome vazio ou tipo inválido"),
        (status = 409, description = "Nome já cadastrado"),
    ),
    tag = "lookups"
)]
pub async fn create_lookup(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateLookupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = match payload.kind {
        LookupKind::Author => {
            let author = app_state
                .catalog_service
                .create_author(&app_state.db_pool, &payload.name)
                .await?;
            Json(serde_json::to_value(author).unwrap_or_default())
        }
        LookupKind::Category => {
            let category = app_state
                .catalog_service
                .create_category(&app_state.db_pool, &payload.name)
                .await?;
            Json(serde_json::to_value(category).unwrap_or_default())
        }
        LookupKind::Language => {
            let language = app_state
                .catalog_service
                .create_language(&app_state.db_pool, &payload.name)
                .await?;
            Json(serde_json::to_value(language).unwrap_or_default())
        }
    };

    Ok((StatusCode::CREATED, response))
}
