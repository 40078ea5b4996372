// src/models/donor.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Doador ---
// `donor_code` é uma sequência numérica em string ("501", "502", ...),
// atribuída na criação e imutável. Ela entra na composição do código
// de livro, então nunca pode ser reaproveitada.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: Uuid,
    pub donor_code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
