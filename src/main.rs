//src/main.rs

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

// O router fica separado do main para os testes montarem a
// aplicação inteira sobre um banco em memória.
fn build_router(app_state: AppState) -> Router {
    let lookup_routes = Router::new().route(
        "/",
        get(handlers::lookups::get_lookups).post(handlers::lookups::create_lookup),
    );

    let donor_routes = Router::new()
        .route(
            "/",
            get(handlers::donors::get_all_donors).post(handlers::donors::create_donor),
        )
        .route("/{id}", put(handlers::donors::update_donor))
        .route(
            "/{id}/toggle-status",
            patch(handlers::donors::toggle_donor_status),
        );

    let inventory_routes = Router::new()
        .route("/", get(handlers::inventory::get_inventory))
        .route("/titles", get(handlers::inventory::get_titles))
        .route(
            "/book-copy/{code}",
            get(handlers::inventory::get_copy_by_code),
        );

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/lookups", lookup_routes)
        .nest("/api/donors", donor_routes)
        .nest("/api/inventory", inventory_routes)
        .route("/api/intake", post(handlers::inventory::intake))
        .route("/api/pos/sale", post(handlers::pos::finalize_sale))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = build_router(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
