// src/db/donor_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    common::db_utils::is_unique_violation_on,
    common::error::AppError,
    models::donor::Donor,
};

/// Semente da sequência de `donor_code` quando não há doadores.
const FIRST_DONOR_CODE: i64 = 501;

#[derive(Clone)]
pub struct DonorRepository {
    pool: SqlitePool,
}

impl DonorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all_donors<'e, E>(&self, executor: E) -> Result<Vec<Donor>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let donors =
            sqlx::query_as::<_, Donor>("SELECT * FROM donors ORDER BY created_at DESC")
                .fetch_all(executor)
                .await?;
        Ok(donors)
    }

    pub async fn find_donor<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Donor>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let donor = sqlx::query_as::<_, Donor>("SELECT * FROM donors WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(donor)
    }

    /// Próximo `donor_code`: maior existente + 1, semente 501.
    /// Chamar dentro da mesma transação que insere o doador; a constraint
    /// UNIQUE de `donor_code` segura a corrida entre dois cadastros.
    pub async fn next_donor_code<'e, E>(&self, executor: E) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let latest: Option<(String,)> = sqlx::query_as(
            "SELECT donor_code FROM donors ORDER BY CAST(donor_code AS INTEGER) DESC LIMIT 1",
        )
        .fetch_optional(executor)
        .await?;

        let next = match latest {
            Some((code,)) => {
                let current: i64 = code.parse().map_err(|e| {
                    AppError::InternalServerError(anyhow::anyhow!(
                        "donor_code não numérico no cadastro ({}): {}",
                        code,
                        e
                    ))
                })?;
                current + 1
            }
            None => FIRST_DONOR_CODE,
        };
        Ok(next.to_string())
    }

    pub async fn create_donor<'e, E>(
        &self,
        executor: E,
        donor_code: &str,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Donor, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, Donor>(
            r#"
            INSERT INTO donors (id, donor_code, name, email, phone, address, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(donor_code)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, "donors.donor_code") {
                return AppError::UniqueConstraintViolation(
                    "Código de doador já utilizado; tente novamente.".to_string(),
                );
            }
            e.into()
        })
    }

    /// Atualiza só os dados de contato. `donor_code` nunca muda.
    pub async fn update_donor<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Option<Donor>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let donor = sqlx::query_as::<_, Donor>(
            r#"
            UPDATE donors
            SET name = ?, email = ?, phone = ?, address = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(donor)
    }

    pub async fn toggle_donor_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Donor>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let donor = sqlx::query_as::<_, Donor>(
            r#"
            UPDATE donors
            SET is_active = NOT is_active, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(donor)
    }
}
