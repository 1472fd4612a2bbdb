// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::JsonBody,
    },
    config::AppState,
    middleware::auth::{CurrentSession, SESSION_COOKIE},
    models::auth::{AuthResponse, ChangePasswordPayload, LoginUserPayload, User},
};

// Cookie HttpOnly com o token de sessão; expira junto com o token
fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Result<Cookie<'static>, AppError> {
    let mut cookie = Cookie::parse(format!("{}={}; Max-Age={}", SESSION_COOKIE, token, max_age_secs))
        .map_err(|e| anyhow::anyhow!("Cookie de sessão inválido: {}", e))?;
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    Ok(cookie)
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado; o token também vai no cookie de sessão", body = AuthResponse),
        (status = 401, description = "Usuário ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<LoginUserPayload>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let (token, user) = app_state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    let cookie = session_cookie(
        &token,
        app_state.auth_service.session_ttl().num_seconds(),
        app_state.config.cookie_secure,
    )?;

    Ok((jar.add(cookie), Json(AuthResponse { token, user })))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Cookie de sessão removido")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário da sessão", body = User),
        (status = 401, description = "Sessão ausente ou inválida")
    ),
    security(("session" = []))
)]
pub async fn get_me(CurrentSession(session): CurrentSession) -> Json<User> {
    Json(session.user)
}

#[utoipa::path(
    put,
    path = "/api/auth/password",
    tag = "Auth",
    request_body = ChangePasswordPayload,
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 400, description = "Senha atual incorreta ou nova senha inválida"),
        (status = 401, description = "Sessão ausente ou inválida")
    ),
    security(("session" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    JsonBody(payload): JsonBody<ChangePasswordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    app_state
        .auth_service
        .change_password(&session.user, &payload.current_password, &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
