// tests/api.rs

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use common::{as_f64, spawn_app, ADMIN, CUSTOMER, STAFF};

#[tokio::test]
async fn health_check_responds_ok() {
    let app = spawn_app().await;

    let response = app.get("/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!("OK"));
}

// ---
// Vitrine
// ---

#[tokio::test]
async fn catalog_filters_by_category_and_flag() {
    let app = spawn_app().await;

    let response = app.get("/api/products?category=cakes&featured=true", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let products = response.body["products"].as_array().expect("products");
    assert!(!products.is_empty());
    for product in products {
        assert_eq!(product["category"]["slug"], "cakes");
        assert_eq!(product["featured"], true);
    }
    assert_eq!(response.body["total"].as_u64(), Some(products.len() as u64));
}

#[tokio::test]
async fn catalog_sorts_by_price_and_paginates() {
    let app = spawn_app().await;

    let response = app.get("/api/products?sort=price_asc&limit=3", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let prices: Vec<f64> = response.body["products"]
        .as_array()
        .expect("products")
        .iter()
        .map(|p| as_f64(&p["price"]))
        .collect();
    assert_eq!(prices.len(), 3);
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    assert!(response.body["total"].as_u64().unwrap_or(0) > 3);
}

#[tokio::test]
async fn catalog_rejects_unknown_sort_and_bad_price_range() {
    let app = spawn_app().await;

    let sort = app.get("/api/products?sort=cheapest", None).await;
    assert_eq!(sort.status, StatusCode::BAD_REQUEST);

    let price = app.get("/api/products?price=abc", None).await;
    assert_eq!(price.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn featured_route_is_not_taken_as_a_slug() {
    let app = spawn_app().await;

    let featured = app.get("/api/products/featured", None).await;
    assert_eq!(featured.status, StatusCode::OK);
    let featured = featured.body.as_array().expect("array");
    assert!(featured.iter().all(|p| p["featured"] == true));

    let missing = app.get("/api/products/does-not-exist", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let found = app.get("/api/products/strawberry-dream-cake", None).await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["name"], "Strawberry Dream Cake");
}

#[tokio::test]
async fn lists_demo_categories() {
    let app = spawn_app().await;

    let response = app.get("/api/categories", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().map(Vec::len), Some(4));
}

// ---
// Carrinho
// ---

#[tokio::test]
async fn cart_quote_uses_catalog_prices_and_reports_unavailable() {
    let app = spawn_app().await;
    let cake = app.product_id("strawberry-dream-cake").await;
    let ghost = "00000000-0000-0000-0000-000000000001";

    let response = app
        .request(
            Method::POST,
            "/api/cart/quote",
            None,
            Some(json!({ "items": [
                { "productId": cake, "quantity": 2 },
                { "productId": ghost, "quantity": 1 }
            ]})),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!((as_f64(&response.body["cart"]["subtotal"]) - 49.98).abs() < 1e-9);
    assert_eq!(response.body["unavailable"], json!([ghost]));
    assert_eq!(response.body["deliveryFree"], false);
    assert!((as_f64(&response.body["total"]) - 49.98).abs() < 1e-9);
}

#[tokio::test]
async fn cart_quote_rejects_empty_cart() {
    let app = spawn_app().await;

    let response = app
        .request(Method::POST, "/api/cart/quote", None, Some(json!({ "items": [] })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ---
// Autenticação
// ---

#[tokio::test]
async fn login_sets_http_only_session_cookie() {
    let app = spawn_app().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": ADMIN.0, "password": ADMIN.1 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["username"], ADMIN.0);
    assert!(response.body["user"].get("passwordHash").is_none());

    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie")
        .to_string();
    assert!(cookie.starts_with("sweetbite_session="));
    assert!(cookie.contains("HttpOnly"));

    // O cookie sozinho autentica
    let session = cookie.split(';').next().expect("par nome=valor").to_string();
    let me = app
        .send(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, session)
                .body(Body::empty())
                .expect("request"),
        )
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["isSuperAdmin"], true);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = spawn_app().await;

    let wrong = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": ADMIN.0, "password": "nope-nope" })),
        )
        .await;
    let unknown = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "ghost", "password": "nope-nope" })),
        )
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    // Mesma mensagem nos dois casos
    assert_eq!(wrong.body, unknown.body);
}

#[tokio::test]
async fn me_requires_a_session() {
    let app = spawn_app().await;

    assert_eq!(app.get("/api/auth/me", None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.get("/api/auth/me", Some("garbage")).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn change_password_checks_current_password() {
    let app = spawn_app().await;
    let token = app.login(STAFF).await;

    let wrong = app
        .request(
            Method::PUT,
            "/api/auth/password",
            Some(&token),
            Some(json!({ "currentPassword": "not-it", "newPassword": "brand-new-pass" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);

    let ok = app
        .request(
            Method::PUT,
            "/api/auth/password",
            Some(&token),
            Some(json!({ "currentPassword": STAFF.1, "newPassword": "brand-new-pass" })),
        )
        .await;
    assert_eq!(ok.status, StatusCode::NO_CONTENT);

    app.login((STAFF.0, "brand-new-pass")).await;
}

// ---
// Autorização do painel
// ---

#[tokio::test]
async fn customers_cannot_enter_the_back_office() {
    let app = spawn_app().await;
    let token = app.login(CUSTOMER).await;

    let response = app.get("/api/admin/suppliers", Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let anonymous = app.get("/api/admin/suppliers", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn staff_reaches_the_panel_but_not_admin_only_areas() {
    let app = spawn_app().await;
    let token = app.login(STAFF).await;

    assert_eq!(app.get("/api/admin/suppliers", Some(&token)).await.status, StatusCode::OK);
    assert_eq!(app.get("/api/admin/users", Some(&token)).await.status, StatusCode::FORBIDDEN);
    assert_eq!(
        app.get("/api/admin/settings/store", Some(&token)).await.status,
        StatusCode::FORBIDDEN
    );
}

// ---
// Catálogo (admin)
// ---

#[tokio::test]
async fn admin_creates_product_with_derived_slug() {
    let app = spawn_app().await;
    let token = app.login(ADMIN).await;

    let categories = app.get("/api/categories", None).await;
    let category_id = categories.body[0]["id"].as_str().expect("id").to_string();

    let payload = json!({
        "name": "Pistachio Éclair",
        "price": 4.5,
        "categoryId": category_id,
        "stock": 10
    });
    let created = app
        .request(Method::POST, "/api/admin/products", Some(&token), Some(payload.clone()))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let slug = created.body["slug"].as_str().expect("slug").to_string();

    let public = app.get(&format!("/api/products/{slug}"), None).await;
    assert_eq!(public.status, StatusCode::OK);

    // Mesmo nome => mesmo slug => conflito
    let duplicate = app
        .request(Method::POST, "/api/admin/products", Some(&token), Some(payload))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn category_with_products_cannot_be_deleted() {
    let app = spawn_app().await;
    let token = app.login(ADMIN).await;

    let categories = app.get("/api/categories", None).await;
    let category_id = categories.body[0]["id"].as_str().expect("id").to_string();

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/admin/categories/{category_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

// ---
// Compras e estoque
// ---

#[tokio::test]
async fn receiving_a_purchase_increments_stock_once() {
    let app = spawn_app().await;
    let token = app.login(STAFF).await;
    let cake = app.product_id("strawberry-dream-cake").await;

    let supplier = app
        .request(
            Method::POST,
            "/api/admin/suppliers",
            Some(&token),
            Some(json!({ "name": "Moinho Dourado", "email": "vendas@moinho.test" })),
        )
        .await;
    assert_eq!(supplier.status, StatusCode::CREATED);
    let supplier_id = supplier.body["id"].as_str().expect("id").to_string();

    let invoice = app
        .request(
            Method::POST,
            "/api/admin/purchases",
            Some(&token),
            Some(json!({
                "supplierId": supplier_id,
                "invoiceNumber": "INV-001",
                // Ignorado: o servidor recalcula
                "totalAmount": 1,
                "items": [{ "productId": cake, "quantity": 5, "unitCost": 10.5 }]
            })),
        )
        .await;
    assert_eq!(invoice.status, StatusCode::CREATED);
    assert_eq!(invoice.body["status"], "pending");
    assert!((as_f64(&invoice.body["totalAmount"]) - 52.5).abs() < 1e-9);
    let invoice_id = invoice.body["id"].as_str().expect("id").to_string();

    // Pendente não mexe no estoque
    let before = app.get("/api/products/strawberry-dream-cake", None).await;
    assert_eq!(before.body["stock"], 20);

    let status_uri = format!("/api/admin/purchases/{invoice_id}/status");
    let received = app
        .request(Method::PUT, &status_uri, Some(&token), Some(json!({ "status": "received" })))
        .await;
    assert_eq!(received.status, StatusCode::OK);
    assert_eq!(received.body["status"], "received");

    // Repetir o mesmo status não incrementa de novo
    let again = app
        .request(Method::PUT, &status_uri, Some(&token), Some(json!({ "status": "received" })))
        .await;
    assert_eq!(again.status, StatusCode::OK);

    let after = app.get("/api/products/strawberry-dream-cake", None).await;
    assert_eq!(after.body["stock"], 25);

    let back = app
        .request(Method::PUT, &status_uri, Some(&token), Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(back.status, StatusCode::CONFLICT);

    let delete = app
        .request(
            Method::DELETE,
            &format!("/api/admin/purchases/{invoice_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(delete.status, StatusCode::CONFLICT);

    let listed = app.get("/api/admin/purchases", Some(&token)).await;
    assert_eq!(listed.body[0]["supplierName"], "Moinho Dourado");
}

#[tokio::test]
async fn purchase_for_unknown_supplier_is_not_found() {
    let app = spawn_app().await;
    let token = app.login(ADMIN).await;
    let cake = app.product_id("strawberry-dream-cake").await;

    let response = app
        .request(
            Method::POST,
            "/api/admin/purchases",
            Some(&token),
            Some(json!({
                "supplierId": "00000000-0000-0000-0000-000000000002",
                "invoiceNumber": "INV-404",
                "items": [{ "productId": cake, "quantity": 1, "unitCost": 1 }]
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// ---
// Usuários
// ---

#[tokio::test]
async fn super_admin_and_own_account_are_protected() {
    let app = spawn_app().await;
    let token = app.login(ADMIN).await;

    let users = app.get("/api/admin/users", Some(&token)).await;
    assert_eq!(users.status, StatusCode::OK);
    let super_admin_id = users.body
        .as_array()
        .expect("users")
        .iter()
        .find(|u| u["isSuperAdmin"] == true)
        .and_then(|u| u["id"].as_str())
        .expect("super admin")
        .to_string();

    // Apagar a própria conta
    let own = app
        .request(
            Method::DELETE,
            &format!("/api/admin/users/{super_admin_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(own.status, StatusCode::FORBIDDEN);

    // Um segundo admin também não consegue apagar nem rebaixar o super admin
    let created = app
        .request(
            Method::POST,
            "/api/admin/users",
            Some(&token),
            Some(json!({
                "username": "second-admin",
                "email": "Second@SweetBite.test",
                "password": "second-pass-123",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["email"], "second@sweetbite.test");
    assert_eq!(created.body["isAdmin"], true);

    let second = app.login(("second-admin", "second-pass-123")).await;
    let delete = app
        .request(
            Method::DELETE,
            &format!("/api/admin/users/{super_admin_id}"),
            Some(&second),
            None,
        )
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let demote = app
        .request(
            Method::PUT,
            &format!("/api/admin/users/{super_admin_id}"),
            Some(&second),
            Some(json!({ "role": "staff" })),
        )
        .await;
    assert_eq!(demote.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let app = spawn_app().await;
    let token = app.login(ADMIN).await;

    let response = app
        .request(
            Method::POST,
            "/api/admin/users",
            Some(&token),
            Some(json!({
                "username": STAFF.0,
                "email": "other@sweetbite.test",
                "password": "whatever-123",
                "role": "staff"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

// ---
// Configurações
// ---

#[tokio::test]
async fn store_settings_are_validated_and_published() {
    let app = spawn_app().await;
    let token = app.login(ADMIN).await;

    let mut settings = json!({
        "storeName": "SweetBite Gulshan",
        "storeEmail": "gulshan@sweetbite.com",
        "storeAddress": "Road 11, Gulshan, Dhaka",
        "storeCurrency": "bdt",
        "taxRate": -1,
        "freeDeliveryThreshold": 40
    });

    let invalid = app
        .request(Method::PUT, "/api/admin/settings/store", Some(&token), Some(settings.clone()))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    settings["taxRate"] = json!(5);
    let saved = app
        .request(Method::PUT, "/api/admin/settings/store", Some(&token), Some(settings))
        .await;
    assert_eq!(saved.status, StatusCode::OK);
    assert_eq!(saved.body["storeCurrency"], "BDT");

    let public = app.get("/api/settings/public", None).await;
    assert_eq!(public.status, StatusCode::OK);
    assert_eq!(public.body["storeName"], "SweetBite Gulshan");

    // O frete grátis passa a valer a partir de 40
    let cake = app.product_id("strawberry-dream-cake").await;
    let quote = app
        .request(
            Method::POST,
            "/api/cart/quote",
            None,
            Some(json!({ "items": [{ "productId": cake, "quantity": 2 }] })),
        )
        .await;
    assert_eq!(quote.body["deliveryFree"], true);
    assert!((as_f64(&quote.body["tax"]) - 2.5).abs() < 1e-9);
}

#[tokio::test]
async fn payment_settings_need_at_least_one_method() {
    let app = spawn_app().await;
    let token = app.login(ADMIN).await;

    let response = app
        .request(
            Method::PUT,
            "/api/admin/settings/payment",
            Some(&token),
            Some(json!({
                "enableCashOnDelivery": false,
                "enableBkash": false,
                "enableNagad": false
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ---
// Newsletter
// ---

#[tokio::test]
async fn newsletter_subscription_is_idempotent() {
    let app = spawn_app().await;

    let first = app
        .request(
            Method::POST,
            "/api/newsletter",
            None,
            Some(json!({ "email": "Fan@Example.com" })),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .request(
            Method::POST,
            "/api/newsletter",
            None,
            Some(json!({ "email": "fan@example.com" })),
        )
        .await;
    assert_eq!(second.status, StatusCode::OK);

    let invalid = app
        .request(Method::POST, "/api/newsletter", None, Some(json!({ "email": "nope" })))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let token = app.login(STAFF).await;
    let subscribers = app.get("/api/admin/newsletter", Some(&token)).await;
    assert_eq!(subscribers.body.as_array().map(Vec::len), Some(1));
    assert_eq!(subscribers.body[0]["email"], "fan@example.com");
}

// ---
// Entrada malformada
// ---

#[tokio::test]
async fn malformed_query_path_and_body_are_json_bad_requests() {
    let app = spawn_app().await;

    let query = app.get("/api/products?limit=abc", None).await;
    assert_eq!(query.status, StatusCode::BAD_REQUEST);
    assert!(query.body["message"].is_string());

    let bad_uuid = app
        .request(
            Method::POST,
            "/api/cart/quote",
            None,
            Some(json!({ "items": [{ "productId": "not-a-uuid", "quantity": 1 }] })),
        )
        .await;
    assert_eq!(bad_uuid.status, StatusCode::BAD_REQUEST);
    assert!(bad_uuid.body["message"].is_string());

    let truncated = Request::builder()
        .method(Method::POST)
        .uri("/api/cart/quote")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"items\": ["))
        .expect("request");
    let truncated = app.send(truncated).await;
    assert_eq!(truncated.status, StatusCode::BAD_REQUEST);
    assert!(truncated.body["message"].is_string());

    let token = app.login(STAFF).await;
    let path = app.get("/api/admin/suppliers/not-a-uuid", Some(&token)).await;
    assert_eq!(path.status, StatusCode::BAD_REQUEST);
    assert!(path.body["message"].is_string());
}

#[tokio::test]
async fn nested_item_errors_are_reported_by_path() {
    let app = spawn_app().await;
    let cake = app.product_id("strawberry-dream-cake").await;

    let response = app
        .request(
            Method::POST,
            "/api/cart/quote",
            None,
            Some(json!({ "items": [{ "productId": cake, "quantity": 0 }] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["details"]["items[0].quantity"].is_array());
}

#[tokio::test]
async fn purchase_amounts_must_fit_in_cents_columns() {
    let app = spawn_app().await;
    let token = app.login(ADMIN).await;
    let cake = app.product_id("strawberry-dream-cake").await;

    let supplier = app
        .request(
            Method::POST,
            "/api/admin/suppliers",
            Some(&token),
            Some(json!({ "name": "Moinho Dourado" })),
        )
        .await;
    let supplier_id = supplier.body["id"].as_str().expect("id").to_string();

    let huge = app
        .request(
            Method::POST,
            "/api/admin/purchases",
            Some(&token),
            Some(json!({
                "supplierId": supplier_id,
                "invoiceNumber": "INV-HUGE",
                "items": [{ "productId": cake, "quantity": 1000, "unitCost": 1e26 }]
            })),
        )
        .await;
    assert_eq!(huge.status, StatusCode::BAD_REQUEST);

    // Duas linhas de 0.004 somariam 0.008 aqui e 0.00 nas colunas NUMERIC(_, 2)
    let fractional = app
        .request(
            Method::POST,
            "/api/admin/purchases",
            Some(&token),
            Some(json!({
                "supplierId": supplier_id,
                "invoiceNumber": "INV-FRAC",
                "items": [
                    { "productId": cake, "quantity": 1, "unitCost": 0.004 },
                    { "productId": cake, "quantity": 1, "unitCost": 0.004 }
                ]
            })),
        )
        .await;
    assert_eq!(fractional.status, StatusCode::BAD_REQUEST);

    let listed = app.get("/api/admin/purchases", Some(&token)).await;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn tax_rate_is_a_percentage() {
    let app = spawn_app().await;
    let token = app.login(ADMIN).await;

    let settings = json!({
        "storeName": "SweetBite",
        "storeEmail": "hello@sweetbite.com",
        "storeAddress": "Road 11, Gulshan, Dhaka",
        "storeCurrency": "BDT",
        "taxRate": 1e27
    });
    let response = app
        .request(Method::PUT, "/api/admin/settings/store", Some(&token), Some(settings))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // Nada foi salvo: a cotação continua funcionando
    let cake = app.product_id("strawberry-dream-cake").await;
    let quote = app
        .request(
            Method::POST,
            "/api/cart/quote",
            None,
            Some(json!({ "items": [{ "productId": cake, "quantity": 1000 }] })),
        )
        .await;
    assert_eq!(quote.status, StatusCode::OK);
}
