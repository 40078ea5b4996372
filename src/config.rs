// src/config.rs

use crate::{
    db::{CatalogRepository, DonorRepository, InventoryRepository, SalesRepository},
    services::{CatalogService, DonorService, IntakeService, PosService},
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::{env, str::FromStr, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub catalog_service: CatalogService,
    pub donor_service: DonorService,
    pub intake_service: IntakeService,
    pub pos_service: PosService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar,
    // a aplicação não deve iniciar.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://sebo.db".to_string());

        // WAL: leituras não bloqueiam a escrita dos terminais do caixa.
        let options = SqliteConnectOptions::from_str(&database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool))
    }

    // --- Monta o gráfico de dependências ---
    // Separado de `new` para os testes montarem o estado sobre um
    // banco em memória.
    pub fn from_pool(db_pool: SqlitePool) -> Self {
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let donor_repo = DonorRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());

        let catalog_service = CatalogService::new(catalog_repo.clone(), inventory_repo.clone());
        let donor_service = DonorService::new(donor_repo.clone());
        let intake_service =
            IntakeService::new(catalog_repo, donor_repo, inventory_repo.clone());
        let pos_service = PosService::new(inventory_repo, sales_repo);

        Self {
            db_pool,
            catalog_service,
            donor_service,
            intake_service,
            pos_service,
        }
    }
}
