// src/lib.rs

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::{
    net::TcpListener,
    signal::{
        ctrl_c,
        unix::{signal, SignalKind},
    },
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{fmt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::{backoffice_guard, session_guard};

// CORS só é configurado quando há uma origem explícita (frontend em outro host).
// Com cookie de sessão, a origem precisa ser exata e com credentials.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::new();
    };

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(_) => {
            tracing::warn!("CORS_ORIGIN inválido ({}); CORS desativado", origin);
            CorsLayer::new()
        }
    }
}

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação: login/logout públicos, o resto exige sessão
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .merge(
            Router::new()
                .route("/me", get(handlers::auth::get_me))
                .route("/password", put(handlers::auth::change_password))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    session_guard,
                )),
        );

    // Back-office: sessão + papel de equipe. Usuários e settings ainda
    // exigem admin no próprio handler.
    let admin_routes = Router::new()
        .route("/products", post(handlers::catalog::create_product))
        .route(
            "/products/{id}",
            put(handlers::catalog::update_product).delete(handlers::catalog::delete_product),
        )
        .route("/categories", post(handlers::catalog::create_category))
        .route(
            "/categories/{id}",
            put(handlers::catalog::update_category).delete(handlers::catalog::delete_category),
        )
        .route(
            "/suppliers",
            get(handlers::purchases::list_suppliers).post(handlers::purchases::create_supplier),
        )
        .route(
            "/suppliers/{id}",
            get(handlers::purchases::get_supplier)
                .put(handlers::purchases::update_supplier)
                .delete(handlers::purchases::delete_supplier),
        )
        .route(
            "/purchases",
            get(handlers::purchases::list_purchases).post(handlers::purchases::create_purchase),
        )
        .route(
            "/purchases/{id}",
            get(handlers::purchases::get_purchase).delete(handlers::purchases::delete_purchase),
        )
        .route(
            "/purchases/{id}/status",
            put(handlers::purchases::update_purchase_status),
        )
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route(
            "/settings/store",
            get(handlers::settings::get_store_settings)
                .put(handlers::settings::update_store_settings),
        )
        .route(
            "/settings/payment",
            get(handlers::settings::get_payment_settings)
                .put(handlers::settings::update_payment_settings),
        )
        .route("/newsletter", get(handlers::newsletter::list_subscribers))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            backoffice_guard,
        ));

    // Vitrine pública. `/products/featured` precisa vir antes de `/products/{slug}`
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/products", get(handlers::catalog::list_products))
        .route("/products/featured", get(handlers::catalog::featured_products))
        .route("/products/{slug}", get(handlers::catalog::get_product))
        .route("/categories", get(handlers::catalog::list_categories))
        .route("/cart/quote", post(handlers::cart::quote_cart))
        .route("/newsletter", post(handlers::newsletter::subscribe))
        .route("/settings/public", get(handlers::settings::get_public_settings));

    let cors = cors_layer(app_state.config.cors_origin.as_deref());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(
            "/api",
            public_routes
                .nest("/auth", auth_routes)
                .nest("/admin", admin_routes),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sweetbite=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    let app_state = AppState::new(config).await?;
    let app = build_router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Servidor encerrado");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Falha ao instalar o handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Ctrl+C recebido, encerrando");
    };

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("SIGTERM recebido, encerrando");
            }
            Err(e) => {
                tracing::error!("Falha ao instalar o handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
