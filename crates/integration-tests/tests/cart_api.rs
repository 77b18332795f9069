//! Integration tests for the cart API client over HTTP.
//!
//! Each test starts its own fake cart server on an ephemeral port.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use acadshop_core::{CartLineId, ProductId};
use acadshop_integration_tests::{ADD_FORM_ACTION, FakeCartServer, FakeProduct, InjectedFailure};
use acadshop_storefront::api::{AddToCartForm, CartApi, CartApiClient};
use acadshop_storefront::error::{CartError, ErrorKind};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn catalog() -> Vec<FakeProduct> {
    vec![
        FakeProduct::new(1, "Chuteira Society", dec("129.90"))
            .with_image("/static/images/chuteira.jpg")
            .with_stock(5),
        FakeProduct::new(2, "Meião", dec("29.90")),
        FakeProduct::new(3, "Camisa Oficial", dec("249.90"))
            .with_description("Camisa oficial temporada 2024"),
    ]
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_read_empty_cart() {
    let server = FakeCartServer::start(catalog()).await;
    let client = CartApiClient::new(&server.config());

    let snapshot = client.read_cart().await.unwrap();

    assert!(snapshot.is_empty());
    assert_eq!(snapshot.total_items, 0);
    assert_eq!(snapshot.subtotal, Decimal::ZERO);
    assert_eq!(snapshot.shipping, dec("15.90"));
    assert_eq!(snapshot.total, dec("15.90"));
}

#[tokio::test]
async fn test_read_decodes_lines_and_totals() {
    let server = FakeCartServer::start(catalog()).await;
    let chuteira = server.seed_line(1, 1);
    server.seed_line(2, 2);
    let client = CartApiClient::new(&server.config());

    let snapshot = client.read_cart().await.unwrap();

    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.total_items, 3);
    assert_eq!(snapshot.subtotal, dec("189.70"));
    assert_eq!(snapshot.shipping, dec("15.90"));
    assert_eq!(snapshot.total, dec("205.60"));

    let first = snapshot.items.first().unwrap();
    assert_eq!(first.id, chuteira);
    assert_eq!(first.product.name, "Chuteira Society");
    assert_eq!(first.product.description, "");
    assert!(first.size.is_none());
}

#[tokio::test]
async fn test_free_shipping_from_threshold() {
    let server = FakeCartServer::start(catalog()).await;
    server.seed_line(3, 1);
    let client = CartApiClient::new(&server.config());

    let snapshot = client.read_cart().await.unwrap();

    assert_eq!(snapshot.shipping, Decimal::ZERO);
    assert_eq!(snapshot.total, snapshot.subtotal);
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_update_returns_new_snapshot() {
    let server = FakeCartServer::start(catalog()).await;
    let line = server.seed_line(2, 1);
    let client = CartApiClient::new(&server.config());

    let snapshot = client.update_item(line, 4).await.unwrap();

    assert_eq!(snapshot.total_items, 4);
    assert_eq!(snapshot.items.first().unwrap().total_price, dec("119.60"));
    assert_eq!(server.line_quantity(line), Some(4));
}

#[tokio::test]
async fn test_update_over_stock_is_api_error() {
    let server = FakeCartServer::start(catalog()).await;
    let line = server.seed_line(1, 1);
    let client = CartApiClient::new(&server.config());

    let err = client.update_item(line, 6).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert!(err.to_string().contains("Estoque insuficiente"));
    assert_eq!(server.line_quantity(line), Some(1));
}

#[tokio::test]
async fn test_remove_returns_new_snapshot() {
    let server = FakeCartServer::start(catalog()).await;
    let line = server.seed_line(2, 1);
    let client = CartApiClient::new(&server.config());

    let snapshot = client.remove_item(line).await.unwrap();

    assert!(snapshot.is_empty());
    assert_eq!(server.line_count(), 0);
}

#[tokio::test]
async fn test_remove_unknown_line_is_api_error() {
    let server = FakeCartServer::start(catalog()).await;
    let client = CartApiClient::new(&server.config());

    let err = client.remove_item(CartLineId::new(404)).await.unwrap_err();

    match err {
        CartError::Api(message) => assert_eq!(message, "Item do carrinho não encontrado"),
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_add_form() {
    let server = FakeCartServer::start(catalog()).await;
    let client = CartApiClient::new(&server.config());

    let form = AddToCartForm {
        product_id: ProductId::new(2),
        quantity: 3,
        size: Some("M".to_string()),
        color: None,
    };
    client.submit_add_form(ADD_FORM_ACTION, &form).await.unwrap();

    let snapshot = client.read_cart().await.unwrap();
    assert_eq!(snapshot.total_items, 3);
    assert_eq!(snapshot.items.first().unwrap().size.as_deref(), Some("M"));
}

#[tokio::test]
async fn test_submit_add_form_unknown_product_is_network_error() {
    let server = FakeCartServer::start(catalog()).await;
    let client = CartApiClient::new(&server.config());

    let form = AddToCartForm {
        product_id: ProductId::new(99),
        quantity: 1,
        size: None,
        color: None,
    };
    let err = client.submit_add_form(ADD_FORM_ACTION, &form).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(server.line_count(), 0);
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_server_error_without_body_is_network_error() {
    let server = FakeCartServer::start(catalog()).await;
    let line = server.seed_line(2, 1);
    let client = CartApiClient::new(&server.config());

    server.fail_next(InjectedFailure::ServerError);
    let err = client.update_item(line, 2).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(server.line_quantity(line), Some(1));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = FakeCartServer::start(catalog()).await;
    let client = CartApiClient::new(&server.config());

    server.fail_next(InjectedFailure::MalformedBody);
    let err = client.read_cart().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn test_error_body_shape() {
    let server = FakeCartServer::start(catalog()).await;

    let response = reqwest::Client::new()
        .post(server.base_url().join("/api/cart/remove").unwrap())
        .json(&serde_json::json!({ "item_id": 12 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Item do carrinho não encontrado");
}
