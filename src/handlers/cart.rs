// src/handlers/cart.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::JsonBody,
    },
    config::AppState,
    models::cart::{CartQuote, CartQuoteRequest},
};

#[utoipa::path(
    post,
    path = "/api/cart/quote",
    tag = "Cart",
    request_body = CartQuoteRequest,
    responses(
        (status = 200, description = "Carrinho precificado com os preços atuais", body = CartQuote),
        (status = 400, description = "Carrinho vazio ou quantidade inválida")
    )
)]
pub async fn quote_cart(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<CartQuoteRequest>,
) -> Result<Json<CartQuote>, AppError> {
    payload.validate()?;

    let quote = app_state.cart_service.quote(&payload).await?;
    Ok(Json(quote))
}
