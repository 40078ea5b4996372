// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::db_utils::decimal_column;

// --- 1. Venda ---
// Criada uma única vez por checkout e imutável depois disso.
// Invariante monetário: total = subtotal + tax (tax fixo em zero por ora).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub sold_at: DateTime<Utc>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub sold_party_name: Option<String>,
    pub sold_party_contact: Option<String>,
}

impl FromRow<'_, SqliteRow> for Sale {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sold_at: row.try_get("sold_at")?,
            subtotal: decimal_column(row, "subtotal")?,
            tax: decimal_column(row, "tax")?,
            total: decimal_column(row, "total")?,
            sold_party_name: row.try_get("sold_party_name")?,
            sold_party_contact: row.try_get("sold_party_contact")?,
        })
    }
}

// --- 2. Item da venda ---
// Um por exemplar vendido. `price_at_sale` é o preço praticado no caixa,
// que pode diferir do `selling_price` cadastrado no intake.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub book_copy_id: Uuid,
    pub price_at_sale: Decimal,
}

impl FromRow<'_, SqliteRow> for SaleItem {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sale_id: row.try_get("sale_id")?,
            book_copy_id: row.try_get("book_copy_id")?,
            price_at_sale: decimal_column(row, "price_at_sale")?,
        })
    }
}

// --- 3. Venda com itens (resposta do checkout, para o recibo) ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

// --- 4. Linha do carrinho proposta pelo caixa ---
// Entrada da finalização; ainda não é nada persistido.
#[derive(Debug, Clone, Copy)]
pub struct CartLine {
    pub book_copy_id: Uuid,
    pub price: Decimal,
}
