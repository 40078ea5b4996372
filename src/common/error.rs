use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Taxonomia: validação (400), não-encontrado (400/404 conforme o fluxo),
// conflito (409), falha de transação (500). Nenhum erro é rebaixado
// silenciosamente para um valor padrão.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // O intake referencia cadastros que precisam existir.
    #[error("Doador inválido ou inexistente")]
    DonorNotFound,

    #[error("Cadastro auxiliar não encontrado: {0}")]
    LookupNotFound(&'static str),

    #[error("Informe um autor existente ou o nome de um novo autor")]
    AuthorRequired,

    #[error("Preço de venda menor que o preço de compra")]
    SellingPriceBelowCost,

    // Corrida de intake: duas criações simultâneas do mesmo título lógico.
    // A segunda falha aqui em vez de duplicar a linha.
    #[error("Título já cadastrado para esse autor, idioma e categoria")]
    DuplicateTitle,

    // Colisão de código de livro. Se isso disparar, a atribuição de
    // serial furou a transação: erro de integridade, nunca re-tentado.
    #[error("Código de livro duplicado: {0}")]
    DuplicateBookCode(String),

    // Erros do fluxo de venda.
    #[error("Carrinho inválido: {0}")]
    InvalidCart(String),

    #[error("Exemplar não encontrado: {0}")]
    BookCopyNotFound(uuid::Uuid),

    #[error("Exemplar já vendido (código {0})")]
    AlreadySold(String),

    // Recurso inexistente em consultas/CRUD (scan de código, doadores).
    #[error("{0}")]
    NotFound(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados: qualquer falha do sqlx que
    // não foi mapeada para um conflito específico. A transação inteira
    // é desfeita; nada é aplicado pela metade.
    #[error("Falha na transação com o banco de dados")]
    TransactionFailed(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::DonorNotFound => {
                (StatusCode::BAD_REQUEST, "Doador inválido ou inexistente.".to_string())
            }
            AppError::LookupNotFound(kind) => (
                StatusCode::BAD_REQUEST,
                format!("Cadastro auxiliar não encontrado: {}.", kind),
            ),
            AppError::AuthorRequired => (
                StatusCode::BAD_REQUEST,
                "Informe um autor existente ou o nome de um novo autor.".to_string(),
            ),
            AppError::SellingPriceBelowCost => (
                StatusCode::BAD_REQUEST,
                "O preço de venda não pode ser menor que o preço de compra.".to_string(),
            ),
            AppError::InvalidCart(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BookCopyNotFound(id) => (
                StatusCode::BAD_REQUEST,
                format!("Exemplar não encontrado: {}.", id),
            ),
            AppError::AlreadySold(code) => (
                StatusCode::BAD_REQUEST,
                format!("Este exemplar já foi vendido (código {}).", code),
            ),

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),

            AppError::DuplicateTitle => (
                StatusCode::CONFLICT,
                "Título já cadastrado para esse autor, idioma e categoria.".to_string(),
            ),
            AppError::UniqueConstraintViolation(msg) => (StatusCode::CONFLICT, msg),

            // Colisão de código indica bug na atribuição de serial.
            // Loga alto e devolve 500: isso não é recuperável pelo caixa.
            AppError::DuplicateBookCode(ref code) => {
                tracing::error!("Violação de integridade: código de livro duplicado ({})", code);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro de integridade no catálogo. Contate o administrador.".to_string(),
                )
            }

            // Todos os outros erros (TransactionFailed, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
