// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError, config::AppState, models::inventory::BookCondition,
};

// ---
// Validação customizada
// ---
// `length(min = 1)` deixaria passar um título só de espaços; aqui o
// valor é conferido já aparado.
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("O campo não pode ser vazio.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: Intake
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntakePayload {
    #[validate(custom(function = "validate_not_blank", message = "O título é obrigatório."))]
    pub title: String,

    // Ou um autor existente, ou o nome de um novo (consistência checada abaixo).
    pub author_id: Option<Uuid>,
    pub new_author_name: Option<String>,

    #[validate(required(message = "O campo 'languageId' é obrigatório."))]
    pub language_id: Option<Uuid>,

    #[validate(required(message = "O campo 'categoryId' é obrigatório."))]
    pub category_id: Option<Uuid>,

    #[validate(required(message = "O campo 'donorId' é obrigatório."))]
    pub donor_id: Option<Uuid>,

    pub condition: BookCondition,

    pub shelf_location: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub buying_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub selling_price: Decimal,

    #[serde(default)]
    pub is_free_donation: bool,

    pub note: Option<String>,
}

impl IntakePayload {
    // Regras que o derive não expressa: precisamos de UM caminho de autor.
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        let has_new_author = self
            .new_author_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if self.author_id.is_none() && !has_new_author {
            let mut err = ValidationError::new("AuthorRequired");
            err.message =
                Some("Informe um autor existente ou o nome de um novo autor.".into());
            return Err(err);
        }
        Ok(())
    }
}

// ---
// Handler: intake (entrada de exemplar doado)
// ---
#[utoipa::path(
    post,
    path = "/api/intake",
    request_body = IntakePayload,
    responses(
        (status = 201, description = "Exemplar criado com código e serial", body = crate::models::inventory::BookCopy),
        (status = 400, description = "Validação, doador ou cadastro auxiliar inválido"),
        (status = 409, description = "Título duplicado (corrida de intake)"),
    ),
    tag = "inventory"
)]
pub async fn intake(
    State(app_state): State<AppState>,
    Json(payload): Json<IntakePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    payload.validate_consistency().map_err(|e| {
        // ValidationErrors manual para manter o padrão de resposta.
        let mut errors = validator::ValidationErrors::new();
        errors.add("authorId", e);
        AppError::ValidationError(errors)
    })?;

    let new_copy = app_state
        .intake_service
        .assign_identity(
            &app_state.db_pool,
            payload.title.trim(),
            payload.author_id,
            payload.new_author_name.as_deref(),
            payload.language_id.unwrap(),
            payload.category_id.unwrap(),
            payload.donor_id.unwrap(),
            payload.condition,
            payload.shelf_location.as_deref(),
            payload.buying_price,
            payload.selling_price,
            payload.is_free_donation,
            payload.note.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(new_copy)))
}

// ---
// Handler: get_inventory (estoque com nomes resolvidos)
// ---
#[utoipa::path(
    get,
    path = "/api/inventory",
    responses((status = 200, body = [crate::models::inventory::BookCopyDetails])),
    tag = "inventory"
)]
pub async fn get_inventory(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let copies = app_state
        .catalog_service
        .get_inventory(&app_state.db_pool)
        .await?;
    Ok((StatusCode::OK, Json(copies)))
}

// ---
// Handler: get_titles
// ---
#[utoipa::path(
    get,
    path = "/api/inventory/titles",
    responses((status = 200, body = [crate::models::catalog::BookTitle])),
    tag = "inventory"
)]
pub async fn get_titles(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let titles = app_state
        .catalog_service
        .get_all_titles(&app_state.db_pool)
        .await?;
    Ok((StatusCode::OK, Json(titles)))
}

// ---
// Handler: get_copy_by_code (scan da etiqueta no PDV)
// ---
#[utoipa::path(
    get,
    path = "/api/inventory/book-copy/{code}",
    params(("code" = String, Path, description = "Código impresso na etiqueta")),
    responses(
        (status = 200, body = crate::models::inventory::BookCopyDetails),
        (status = 404, description = "Código desconhecido"),
    ),
    tag = "inventory"
)]
pub async fn get_copy_by_code(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let copy = app_state
        .catalog_service
        .get_copy_by_code(&app_state.db_pool, &code)
        .await?;
    Ok((StatusCode::OK, Json(copy)))
}
