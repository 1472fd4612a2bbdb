// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::authorize,
    models::auth::{Role, Session},
};

/// 1. O Trait que define um conjunto de papéis permitidos
pub trait RoleSet: Send + Sync + 'static {
    fn allowed() -> &'static [Role];
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub Session, PhantomData<T>);

impl<T> RequireRole<T> {
    pub fn session(&self) -> &Session {
        &self.0
    }
}

// 3. Implementação do FromRequestParts: depende da sessão que o
// middleware de auth deixou nas extensions
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AppError::Unauthorized)?;

        authorize(&session, T::allowed())?;

        Ok(RequireRole(session, PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS CONJUNTOS (TIPOS)
// ---

pub struct AdminOnly;
impl RoleSet for AdminOnly {
    fn allowed() -> &'static [Role] { &[Role::Admin] }
}
