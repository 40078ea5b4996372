// src/db/sales_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    common::db_utils::is_unique_violation_on,
    common::error::AppError,
    models::sales::{Sale, SaleItem},
};

#[derive(Clone)]
pub struct SalesRepository {
    pool: SqlitePool,
}

impl SalesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_sale<'e, E>(
        &self,
        executor: E,
        sold_at: DateTime<Utc>,
        subtotal: Decimal,
        tax: Decimal,
        total: Decimal,
        sold_party_name: Option<&str>,
        sold_party_contact: Option<&str>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (id, sold_at, subtotal, tax, total, sold_party_name, sold_party_contact)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sold_at)
        .bind(subtotal.to_string())
        .bind(tax.to_string())
        .bind(total.to_string())
        .bind(sold_party_name)
        .bind(sold_party_contact)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    pub async fn create_sale_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        book_copy_id: Uuid,
        price_at_sale: Decimal,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (id, sale_id, book_copy_id, price_at_sale)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sale_id)
        .bind(book_copy_id)
        .bind(price_at_sale.to_string())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Um exemplar só pode aparecer em UMA venda, para sempre.
            // A constraint única de book_copy_id é a última linha de defesa.
            if is_unique_violation_on(&e, "sale_items.book_copy_id") {
                return AppError::AlreadySold(book_copy_id.to_string());
            }
            e.into()
        })
    }
}
