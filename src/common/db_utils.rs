// src/common/db_utils.rs

use crate::common::error::AppError;

// ---
// Helpers de tradução de erros do Postgres
// ---

/// Converte violação de chave única (23505) em `AppError::Conflict` com a
/// mensagem informada. Qualquer outro erro segue como `DatabaseError`.
pub(crate) fn unique_violation(e: sqlx::Error, message: impl Into<String>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(message.into());
        }
    }
    e.into()
}

/// Converte violação de chave estrangeira (23503) em `AppError::Conflict`.
/// Usado nos DELETEs de linhas ainda referenciadas.
pub(crate) fn foreign_key_violation(e: sqlx::Error, message: impl Into<String>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::Conflict(message.into());
        }
    }
    e.into()
}
