// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Role, Session},
};

pub const SESSION_COOKIE: &str = "sweetbite_session";

// Papéis que entram no painel administrativo
pub const BACKOFFICE_ROLES: &[Role] = &[Role::Admin, Role::Manager, Role::Staff];

/// Token de sessão: cookie primeiro, depois `Authorization: Bearer`.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Segunda checagem: papel permitido, ou o flag legado isAdmin.
pub fn authorize(session: &Session, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&session.role) || session.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

async fn resolve_session(app_state: &AppState, request: &mut Request) -> Result<Session, AppError> {
    let token = session_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let session = app_state.auth_service.authenticate(&token).await?;

    // Insere a sessão nos "extensions" da requisição
    request.extensions_mut().insert(session.clone());
    Ok(session)
}

// Só exige uma sessão válida (rotas /api/auth/me, /password)
pub async fn session_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    resolve_session(&app_state, &mut request).await?;
    Ok(next.run(request).await)
}

// Sessão válida + papel de back office
pub async fn backoffice_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = resolve_session(&app_state, &mut request).await?;

    if let Err(e) = authorize(&session, BACKOFFICE_ROLES) {
        tracing::warn!(
            user_id = %session.user.id,
            role = session.role.as_str(),
            path = %request.uri().path(),
            "Acesso negado ao painel"
        );
        return Err(e);
    }

    Ok(next.run(request).await)
}

// Extrator para obter a sessão diretamente nos handlers
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::auth::{User, UserStatus};

    fn session(role: Role, is_admin: bool) -> Session {
        Session {
            user: User {
                id: Uuid::new_v4(),
                username: "ana".to_string(),
                email: "ana@sweetbite.com".to_string(),
                password_hash: String::new(),
                full_name: None,
                role,
                status: UserStatus::Active,
                is_admin,
                is_super_admin: false,
                created_at: Utc::now(),
                last_login: None,
            },
            role,
            is_admin,
        }
    }

    #[test]
    fn backoffice_roles_are_allowed() {
        for role in [Role::Admin, Role::Manager, Role::Staff] {
            assert!(authorize(&session(role, false), BACKOFFICE_ROLES).is_ok());
        }
    }

    #[test]
    fn customers_are_forbidden_unless_legacy_admin() {
        assert!(matches!(
            authorize(&session(Role::Customer, false), BACKOFFICE_ROLES),
            Err(AppError::Forbidden)
        ));
        assert!(authorize(&session(Role::Customer, true), BACKOFFICE_ROLES).is_ok());
        assert!(authorize(&session(Role::Staff, false), &[Role::Admin]).is_err());
    }

    #[test]
    fn token_comes_from_cookie_or_bearer_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark; sweetbite_session=from-cookie"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));
    }
}
