// src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Cadastros auxiliares (Autor, Idioma, Categoria) ---
// As três tabelas têm o mesmo formato, mas são entidades distintas:
// o intake referencia cada uma por id próprio.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// --- 2. Título de catálogo ---
// Representa a combinação única (título, autor, idioma, categoria).
// O `book_id` é uma sequência numérica em string ("1000", "1001", ...),
// atribuída na primeira entrada dessa combinação e nunca alterada.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookTitle {
    pub id: Uuid,
    pub book_id: String,
    pub title: String,
    pub author_id: Uuid,
    pub language_id: Uuid,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 3. Tipo de cadastro auxiliar (para o endpoint genérico de lookups) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    Author,
    Category,
    Language,
}

// --- 4. Resposta agregada do GET /api/lookups ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupsResponse {
    pub authors: Vec<Author>,
    pub categories: Vec<Category>,
    pub languages: Vec<Language>,
}
