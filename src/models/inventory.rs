// src/models/inventory.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::db_utils::decimal_column;

// --- 1. Condição física do exemplar ---
// Enum fechado: todo ponto de decisão faz match exaustivo, nada de
// comparação de strings espalhada pelos handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookCondition {
    New,
    Good,
    Medium,
    Poor,
}

impl BookCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCondition::New => "New",
            BookCondition::Good => "Good",
            BookCondition::Medium => "Medium",
            BookCondition::Poor => "Poor",
        }
    }
}

impl fmt::Display for BookCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Condição de livro desconhecida: {0}")]
pub struct InvalidBookCondition(pub String);

impl FromStr for BookCondition {
    type Err = InvalidBookCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(BookCondition::New),
            "Good" => Ok(BookCondition::Good),
            "Medium" => Ok(BookCondition::Medium),
            "Poor" => Ok(BookCondition::Poor),
            other => Err(InvalidBookCondition(other.to_string())),
        }
    }
}

// --- 2. Exemplar físico ---
// `serial_number` é a sequência 1, 2, 3... por título.
// `book_code` é derivado: book_id + donor_code + serial com 4 dígitos.
// Ambos são atribuídos no intake e imutáveis.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCopy {
    pub id: Uuid,
    pub book_title_id: Uuid,
    pub donor_id: Uuid,
    pub shelf_location: Option<String>,
    pub condition: BookCondition,
    pub buying_price: Decimal,
    pub selling_price: Decimal,
    pub is_free_donation: bool,
    pub note: Option<String>,
    pub serial_number: i64,
    pub book_code: String,
    pub is_sold: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Mapeamento manual: o driver SQLite não decodifica Decimal nem o enum
// de condição, então os preços ficam como TEXT no banco e são convertidos
// aqui (ver common::db_utils).
impl FromRow<'_, SqliteRow> for BookCopy {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let condition: String = row.try_get("condition")?;
        Ok(Self {
            id: row.try_get("id")?,
            book_title_id: row.try_get("book_title_id")?,
            donor_id: row.try_get("donor_id")?,
            shelf_location: row.try_get("shelf_location")?,
            condition: condition.parse().map_err(|e: InvalidBookCondition| {
                sqlx::Error::ColumnDecode {
                    index: "condition".into(),
                    source: Box::new(e),
                }
            })?,
            buying_price: decimal_column(row, "buying_price")?,
            selling_price: decimal_column(row, "selling_price")?,
            is_free_donation: row.try_get("is_free_donation")?,
            note: row.try_get("note")?,
            serial_number: row.try_get("serial_number")?,
            book_code: row.try_get("book_code")?,
            is_sold: row.try_get("is_sold")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

// --- 3. Exemplar com os nomes resolvidos ---
// É o formato que as telas de estoque e de PDV consomem: o exemplar
// mais título, autor, categoria, idioma, doador e os dois segmentos
// que compõem o código.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCopyDetails {
    #[serde(flatten)]
    pub copy: BookCopy,
    pub title: String,
    pub author: String,
    pub category: String,
    pub language: String,
    pub donor: String,
    pub book_id: String,
    pub donor_code: String,
}

impl FromRow<'_, SqliteRow> for BookCopyDetails {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            copy: BookCopy::from_row(row)?,
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            category: row.try_get("category")?,
            language: row.try_get("language")?,
            donor: row.try_get("donor")?,
            book_id: row.try_get("book_id")?,
            donor_code: row.try_get("donor_code")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condicao_ida_e_volta() {
        for cond in [
            BookCondition::New,
            BookCondition::Good,
            BookCondition::Medium,
            BookCondition::Poor,
        ] {
            assert_eq!(cond.as_str().parse::<BookCondition>().unwrap(), cond);
        }
    }

    #[test]
    fn condicao_desconhecida_falha() {
        assert!("Terrible".parse::<BookCondition>().is_err());
    }
}
