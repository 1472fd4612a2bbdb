// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::models::purchase::InvoiceStatus;

// Nosso tipo de erro único: services e repositórios retornam AppError,
// e os handlers apenas propagam com `?`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Sessão ausente ou inválida")]
    Unauthorized,

    #[error("Acesso negado")]
    Forbidden,

    // Operação proibida por regra de negócio (ex: apagar o super admin)
    #[error("Ação negada: {0}")]
    ActionDenied(String),

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition {
        from: InvoiceStatus,
        to: InvoiceStatus,
    },

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::ActionDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Achata os erros de validação, inclusive os de structs e listas aninhadas:
// "items[0].quantity" => ["Quantity must be at least 1."]
fn collect_details(
    errors: &ValidationErrors,
    prefix: &str,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = format!("{}{}", prefix, field);
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors.iter().map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => e.code.to_string(),
                });
                out.entry(path).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_details(inner, &format!("{}.", path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(inner, &format!("{}[{}].", path, index), out);
                }
            }
        }
    }
}

// Rejeições dos extratores do axum viram 400 com o corpo {message}
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                collect_details(errors, "", &mut details);
                let body = Json(json!({
                    "message": "One or more fields are invalid.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::BadRequest(msg) => msg.clone(),
            // Mensagem genérica: nunca revelamos se o usuário existe.
            AppError::InvalidCredentials => "Invalid username or password".to_string(),
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Forbidden => "Forbidden".to_string(),
            AppError::ActionDenied(msg) => msg.clone(),
            AppError::NotFound(what) => format!("{} not found", what),
            AppError::Conflict(msg) => msg.clone(),
            AppError::InvalidStatusTransition { from, to } => {
                format!("Cannot change invoice status from '{}' to '{}'", from, to)
            }

            // Todos os outros erros viram 500; o detalhe só vai para o log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "An unexpected error occurred.".to_string()
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
