// src/db/inventory_repo.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    common::db_utils::is_unique_violation_on,
    common::error::AppError,
    models::inventory::{BookCondition, BookCopy, BookCopyDetails},
};

// SELECT compartilhado pelas consultas "com nomes resolvidos".
const COPY_DETAILS_SELECT: &str = r#"
    SELECT
        bc.id, bc.book_title_id, bc.donor_id, bc.shelf_location, bc.condition,
        bc.buying_price, bc.selling_price, bc.is_free_donation, bc.note,
        bc.serial_number, bc.book_code, bc.is_sold, bc.created_at, bc.updated_at,
        bt.title AS title,
        a.name   AS author,
        c.name   AS category,
        l.name   AS language,
        d.name   AS donor,
        bt.book_id   AS book_id,
        d.donor_code AS donor_code
    FROM book_copies bc
    JOIN book_titles bt ON bt.id = bc.book_title_id
    JOIN authors    a ON a.id = bt.author_id
    JOIN categories c ON c.id = bt.category_id
    JOIN languages  l ON l.id = bt.language_id
    JOIN donors     d ON d.id = bc.donor_id
"#;

#[derive(Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---

    pub async fn get_all_copy_details<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<BookCopyDetails>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{} ORDER BY bc.created_at DESC", COPY_DETAILS_SELECT);
        let copies = sqlx::query_as::<_, BookCopyDetails>(&sql)
            .fetch_all(executor)
            .await?;
        Ok(copies)
    }

    /// Busca pelo código impresso/escaneado na etiqueta.
    pub async fn find_copy_details_by_code<'e, E>(
        &self,
        executor: E,
        book_code: &str,
    ) -> Result<Option<BookCopyDetails>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{} WHERE bc.book_code = ?", COPY_DETAILS_SELECT);
        let copy = sqlx::query_as::<_, BookCopyDetails>(&sql)
            .bind(book_code)
            .fetch_optional(executor)
            .await?;
        Ok(copy)
    }

    pub async fn find_copy<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<BookCopy>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let copy = sqlx::query_as::<_, BookCopy>("SELECT * FROM book_copies WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(copy)
    }

    /// Quantos exemplares esse título já tem. O serial do próximo é isso + 1,
    /// e a conta só vale dentro da transação que insere o exemplar.
    pub async fn count_copies_for_title<'e, E>(
        &self,
        executor: E,
        book_title_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM book_copies WHERE book_title_id = ?")
                .bind(book_title_id)
                .fetch_one(executor)
                .await?;
        Ok(count)
    }

    // ---
    // Funções de "Escrita" (Transacionais)
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn create_copy<'e, E>(
        &self,
        executor: E,
        book_title_id: Uuid,
        donor_id: Uuid,
        shelf_location: Option<&str>,
        condition: BookCondition,
        buying_price: Decimal,
        selling_price: Decimal,
        is_free_donation: bool,
        note: Option<&str>,
        serial_number: i64,
        book_code: &str,
    ) -> Result<BookCopy, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, BookCopy>(
            r#"
            INSERT INTO book_copies (
                id, book_title_id, donor_id, shelf_location, condition,
                buying_price, selling_price, is_free_donation, note,
                serial_number, book_code, is_sold, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_title_id)
        .bind(donor_id)
        .bind(shelf_location)
        .bind(condition.as_str())
        .bind(buying_price.to_string())
        .bind(selling_price.to_string())
        .bind(is_free_donation)
        .bind(note)
        .bind(serial_number)
        .bind(book_code)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Colisão de book_code ou de (título, serial): a atribuição de
            // serial furou a transação. Integridade, não re-tentável.
            if is_unique_violation_on(&e, "book_copies") {
                return AppError::DuplicateBookCode(book_code.to_string());
            }
            e.into()
        })
    }

    /// Marca como vendido SOMENTE se ainda estiver disponível.
    /// Retorna o número de linhas afetadas: 0 significa que outro caixa
    /// chegou primeiro, e a venda inteira deve ser abortada.
    pub async fn mark_copy_sold<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE book_copies SET is_sold = 1, updated_at = ? WHERE id = ? AND is_sold = 0",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
