// src/services/catalog_service.rs

use sqlx::{Executor, Sqlite};

use crate::{
    common::error::AppError,
    db::{CatalogRepository, InventoryRepository},
    models::catalog::{Author, BookTitle, Category, Language, LookupsResponse},
    models::inventory::BookCopyDetails,
};

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    inventory_repo: InventoryRepository,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository, inventory_repo: InventoryRepository) -> Self {
        Self {
            catalog_repo,
            inventory_repo,
        }
    }

    /// Os três cadastros auxiliares numa resposta só, como a tela de
    /// intake consome.
    pub async fn get_lookups(&self, pool: &sqlx::SqlitePool) -> Result<LookupsResponse, AppError> {
        let authors = self.catalog_repo.get_all_authors(pool).await?;
        let categories = self.catalog_repo.get_all_categories(pool).await?;
        let languages = self.catalog_repo.get_all_languages(pool).await?;
        Ok(LookupsResponse {
            authors,
            categories,
            languages,
        })
    }

    pub async fn create_author<'e, E>(&self, executor: E, name: &str) -> Result<Author, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.catalog_repo.create_author(executor, name.trim()).await
    }

    pub async fn create_category<'e, E>(&self, executor: E, name: &str) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.catalog_repo.create_category(executor, name.trim()).await
    }

    pub async fn create_language<'e, E>(&self, executor: E, name: &str) -> Result<Language, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.catalog_repo.create_language(executor, name.trim()).await
    }

    pub async fn get_all_titles<'e, E>(&self, executor: E) -> Result<Vec<BookTitle>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.catalog_repo.get_all_titles(executor).await
    }

    pub async fn get_inventory<'e, E>(&self, executor: E) -> Result<Vec<BookCopyDetails>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.inventory_repo.get_all_copy_details(executor).await
    }

    /// Lookup pela etiqueta escaneada no PDV.
    pub async fn get_copy_by_code<'e, E>(
        &self,
        executor: E,
        book_code: &str,
    ) -> Result<BookCopyDetails, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.inventory_repo
            .find_copy_details_by_code(executor, book_code)
            .await?
            .ok_or_else(|| AppError::NotFound("Exemplar não encontrado.".to_string()))
    }
}
