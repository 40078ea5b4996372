// src/handlers/pos.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, config::AppState, models::sales::CartLine};

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
// Payload: SalePayload
// ---
// Serialize também: o validador de `length` em SalePayload.items devolve
// o valor ofensor nos params do erro.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleLinePayload {
    pub book_copy_id: Uuid,

    // Preço praticado no caixa; pode diferir do preço de etiqueta.
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalePayload {
    #[validate(length(min = 1, message = "A venda precisa de ao menos um exemplar."), nested)]
    pub items: Vec<SaleLinePayload>,

    pub sold_party_name: Option<String>,
    pub sold_party_contact: Option<String>,
}

// ---
// Handler: finalize_sale (checkout do PDV)
// ---
#[utoipa::path(
    post,
    path = "/api/pos/sale",
    request_body = SalePayload,
    responses(
        (status = 201, description = "Venda registrada, exemplares baixados", body = crate::models::sales::SaleWithItems),
        (status = 400, description = "Carrinho inválido, exemplar inexistente ou já vendido"),
    ),
    tag = "pos"
)]
pub async fn finalize_sale(
    State(app_state): State<AppState>,
    Json(payload): Json<SalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cart: Vec<CartLine> = payload
        .items
        .iter()
        .map(|line| CartLine {
            book_copy_id: line.book_copy_id,
            price: line.price,
        })
        .collect();

    let sale = app_state
        .pos_service
        .finalize_sale(
            &app_state.db_pool,
            &cart,
            payload.sold_party_name.as_deref(),
            payload.sold_party_contact.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrinho_vazio_reprova_na_validacao() {
        let payload = SalePayload {
            items: vec![],
            sold_party_name: None,
            sold_party_contact: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn item_com_preco_negativo_reprova_na_validacao() {
        let payload = SalePayload {
            items: vec![SaleLinePayload {
                book_copy_id: Uuid::new_v4(),
                price: Decimal::from(-1),
            }],
            sold_party_name: None,
            sold_party_contact: None,
        };
        assert!(payload.validate().is_err());
    }
}
