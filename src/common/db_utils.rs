// src/common/db_utils.rs

use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

// ---
// Helpers de conversão de colunas
// ---
// O driver SQLite não tem tipo decimal nativo; valores monetários são
// gravados como TEXT ("21.49") e reconstruídos aqui. Falha de parse é
// erro de decodificação da linha, não um 500 genérico sem contexto.

pub(crate) fn decimal_column(row: &SqliteRow, name: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(name)?;
    Decimal::from_str_exact(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: name.to_string(),
        source: Box::new(e),
    })
}

/// Verdadeiro se o erro for violação de constraint UNIQUE cuja mensagem
/// menciona o fragmento dado (ex.: "book_copies.book_code").
/// O SQLite não expõe o nome da constraint como o Postgres expõe,
/// então o roteamento é pela mensagem mesmo.
pub(crate) fn is_unique_violation_on(err: &sqlx::Error, fragment: &str) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        db_err.is_unique_violation() && db_err.message().contains(fragment)
    } else {
        false
    }
}
