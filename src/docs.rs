// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Lookups ---
        handlers::lookups::get_lookups,
        handlers::lookups::create_lookup,

        // --- Donors ---
        handlers::donors::get_all_donors,
        handlers::donors::create_donor,
        handlers::donors::update_donor,
        handlers::donors::toggle_donor_status,

        // --- Inventory ---
        handlers::inventory::intake,
        handlers::inventory::get_inventory,
        handlers::inventory::get_titles,
        handlers::inventory::get_copy_by_code,

        // --- POS ---
        handlers::pos::finalize_sale,
    ),
    components(
        schemas(
            // --- Catalog ---
            models::catalog::Author,
            models::catalog::Category,
            models::catalog::Language,
            models::catalog::BookTitle,
            models::catalog::LookupKind,
            models::catalog::LookupsResponse,

            // --- Donors ---
            models::donor::Donor,

            // --- Inventory ---
            models::inventory::BookCondition,
            models::inventory::BookCopy,
            models::inventory::BookCopyDetails,

            // --- Sales ---
            models::sales::Sale,
            models::sales::SaleItem,
            models::sales::SaleWithItems,

            // --- Payloads ---
            handlers::lookups::CreateLookupPayload,
            handlers::donors::DonorPayload,
            handlers::inventory::IntakePayload,
            handlers::pos::SaleLinePayload,
            handlers::pos::SalePayload,
        )
    ),
    tags(
        (name = "lookups", description = "Cadastros auxiliares (autores, categorias, idiomas)"),
        (name = "donors", description = "Doadores e seus códigos sequenciais"),
        (name = "inventory", description = "Intake e consulta do acervo"),
        (name = "pos", description = "Ponto de venda (checkout)")
    )
)]
pub struct ApiDoc;
