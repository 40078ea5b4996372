// src/services/donor_service.rs

use sqlx::{Acquire, Executor, Sqlite};
use uuid::Uuid;

use crate::{common::error::AppError, db::DonorRepository, models::donor::Donor};

#[derive(Clone)]
pub struct DonorService {
    donor_repo: DonorRepository,
}

impl DonorService {
    pub fn new(donor_repo: DonorRepository) -> Self {
        Self { donor_repo }
    }

    pub async fn get_all_donors<'e, E>(&self, executor: E) -> Result<Vec<Donor>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.donor_repo.get_all_donors(executor).await
    }

    // --- CADASTRO DE DOADOR ---
    // Sequência e inserção na mesma transação; a UNIQUE de donor_code
    // resolve o empate se dois cadastros rodarem juntos.
    pub async fn create_donor<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Donor, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Acquire<'e, Database = Sqlite>,
    {
        let mut tx = executor.begin().await?;
        let donor_code = self.donor_repo.next_donor_code(&mut *tx).await?;
        let donor = self
            .donor_repo
            .create_donor(&mut *tx, &donor_code, name, email, phone, address)
            .await?;
        tx.commit().await?;
        Ok(donor)
    }

    pub async fn update_donor<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Donor, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.donor_repo
            .update_donor(executor, id, name, email, phone, address)
            .await?
            .ok_or_else(|| AppError::NotFound("Doador não encontrado.".to_string()))
    }

    pub async fn toggle_donor_status<'e, E>(&self, executor: E, id: Uuid) -> Result<Donor, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.donor_repo
            .toggle_donor_status(executor, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Doador não encontrado.".to_string()))
    }
}
