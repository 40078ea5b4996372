// src/db/catalog_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    common::db_utils::is_unique_violation_on,
    common::error::AppError,
    models::catalog::{Author, BookTitle, Category, Language},
};

/// Semente da sequência de `book_id` quando o catálogo está vazio.
const FIRST_BOOK_ID: i64 = 1000;

#[derive(Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---

    pub async fn get_all_authors<'e, E>(&self, executor: E) -> Result<Vec<Author>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, name, created_at FROM authors ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(authors)
    }

    pub async fn get_all_languages<'e, E>(&self, executor: E) -> Result<Vec<Language>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let languages = sqlx::query_as::<_, Language>(
            "SELECT id, name, created_at FROM languages ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(languages)
    }

    pub async fn get_all_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(categories)
    }

    pub async fn find_author<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Author>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let author =
            sqlx::query_as::<_, Author>("SELECT id, name, created_at FROM authors WHERE id = ?")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(author)
    }

    pub async fn find_language<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Language>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let language =
            sqlx::query_as::<_, Language>("SELECT id, name, created_at FROM languages WHERE id = ?")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(language)
    }

    pub async fn find_category<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(category)
    }

    // ---
    // Funções de "Escrita"
    // ---

    pub async fn create_author<'e, E>(&self, executor: E, name: &str) -> Result<Author, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (id, name, created_at)
            VALUES (?, ?, ?)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, "authors.name") {
                return AppError::UniqueConstraintViolation(format!(
                    "O autor '{}' já está cadastrado.",
                    name
                ));
            }
            e.into()
        })?;
        Ok(author)
    }

    pub async fn create_language<'e, E>(&self, executor: E, name: &str) -> Result<Language, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let language = sqlx::query_as::<_, Language>(
            r#"
            INSERT INTO languages (id, name, created_at)
            VALUES (?, ?, ?)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, "languages.name") {
                return AppError::UniqueConstraintViolation(format!(
                    "O idioma '{}' já está cadastrado.",
                    name
                ));
            }
            e.into()
        })?;
        Ok(language)
    }

    pub async fn create_category<'e, E>(&self, executor: E, name: &str) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, created_at)
            VALUES (?, ?, ?)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, "categories.name") {
                return AppError::UniqueConstraintViolation(format!(
                    "A categoria '{}' já está cadastrada.",
                    name
                ));
            }
            e.into()
        })?;
        Ok(category)
    }

    // ---
    // Títulos de catálogo
    // ---

    pub async fn get_all_titles<'e, E>(&self, executor: E) -> Result<Vec<BookTitle>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let titles = sqlx::query_as::<_, BookTitle>(
            "SELECT * FROM book_titles ORDER BY CAST(book_id AS INTEGER) ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(titles)
    }

    /// Busca o título pela chave lógica: título case-insensitive +
    /// autor + idioma + categoria exatos.
    pub async fn find_title_by_identity<'e, E>(
        &self,
        executor: E,
        title: &str,
        author_id: Uuid,
        language_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<BookTitle>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let found = sqlx::query_as::<_, BookTitle>(
            r#"
            SELECT * FROM book_titles
            WHERE title = ? COLLATE NOCASE
              AND author_id = ? AND language_id = ? AND category_id = ?
            "#,
        )
        .bind(title)
        .bind(author_id)
        .bind(language_id)
        .bind(category_id)
        .fetch_optional(executor)
        .await?;
        Ok(found)
    }

    /// Próximo `book_id` da sequência: maior existente + 1, semente 1000.
    /// Só faz sentido dentro da mesma transação que insere o título;
    /// o índice único da chave lógica é a rede de proteção contra corrida.
    pub async fn next_book_id<'e, E>(&self, executor: E) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let latest: Option<(String,)> = sqlx::query_as(
            "SELECT book_id FROM book_titles ORDER BY CAST(book_id AS INTEGER) DESC LIMIT 1",
        )
        .fetch_optional(executor)
        .await?;

        let next = match latest {
            Some((book_id,)) => {
                let current: i64 = book_id.parse().map_err(|e| {
                    AppError::InternalServerError(anyhow::anyhow!(
                        "book_id não numérico no catálogo ({}): {}",
                        book_id,
                        e
                    ))
                })?;
                current + 1
            }
            None => FIRST_BOOK_ID,
        };
        Ok(next.to_string())
    }

    pub async fn create_title<'e, E>(
        &self,
        executor: E,
        book_id: &str,
        title: &str,
        author_id: Uuid,
        language_id: Uuid,
        category_id: Uuid,
    ) -> Result<BookTitle, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, BookTitle>(
            r#"
            INSERT INTO book_titles (id, book_id, title, author_id, language_id, category_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(title)
        .bind(author_id)
        .bind(language_id)
        .bind(category_id)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Tanto a chave lógica quanto a sequência de book_id indicam
            // o mesmo problema: outro intake criou esse título primeiro.
            if is_unique_violation_on(&e, "book_titles") {
                return AppError::DuplicateTitle;
            }
            e.into()
        })
    }
}
