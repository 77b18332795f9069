//! Integration tests for the Acadshop cart layer.
//!
//! The tests in `tests/` run the real [`CartApiClient`] and controller over
//! HTTP against [`FakeCartServer`], an in-process axum app that speaks the
//! cart API: snapshot reads, JSON update/remove with `{error}` bodies, the
//! form-encoded add action, and the storefront's shipping rule.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p acadshop-integration-tests
//! ```
//!
//! [`CartApiClient`]: acadshop_storefront::api::CartApiClient

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use acadshop_core::{CartLineId, ProductId};
use acadshop_storefront::api::AddToCartForm;
use acadshop_storefront::config::CartClientConfig;
use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// Subtotal from which shipping is free.
pub const FREE_SHIPPING_FROM: Decimal = Decimal::from_parts(199, 0, 0, false, 0);

/// Path the product page's add-to-cart form posts to.
pub const ADD_FORM_ACTION: &str = "/carrinho/adicionar";

/// Flat shipping charged below [`FREE_SHIPPING_FROM`].
pub const FLAT_SHIPPING: Decimal = Decimal::from_parts(1590, 0, 0, false, 2);

// =============================================================================
// Catalog and cart state
// =============================================================================

/// A product the fake server can put in the cart.
#[derive(Debug, Clone)]
pub struct FakeProduct {
    pub id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub price: Decimal,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub stock: u32,
}

impl FakeProduct {
    /// Product with plenty of stock and no image or descriptions.
    #[must_use]
    pub fn new(id: i32, name: &str, price: Decimal) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.to_string(),
            image: None,
            price,
            description: None,
            short_description: None,
            stock: 100,
        }
    }

    /// Set the available stock.
    #[must_use]
    pub const fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }

    /// Set the long description.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Clone)]
struct StoredLine {
    id: CartLineId,
    product_id: ProductId,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
}

/// A failure the next request will answer with instead of its normal reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    /// 500 with a plain-text body.
    ServerError,
    /// 200 with a body that is not JSON.
    MalformedBody,
}

#[derive(Debug, Default)]
struct FakeCart {
    products: Vec<FakeProduct>,
    lines: Vec<StoredLine>,
    next_line_id: i32,
    fail_next: Option<InjectedFailure>,
    requests: Vec<String>,
}

impl FakeCart {
    fn product(&self, id: ProductId) -> Option<&FakeProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    fn snapshot(&self) -> WireSnapshot {
        let items: Vec<WireLine> = self
            .lines
            .iter()
            .filter_map(|line| {
                let product = self.product(line.product_id)?;
                Some(WireLine {
                    id: line.id,
                    product: WireProduct {
                        id: product.id,
                        name: product.name.clone(),
                        image: product.image.clone(),
                        price: product.price,
                        description: product.description.clone(),
                        short_description: product.short_description.clone(),
                    },
                    quantity: line.quantity,
                    size: line.size.clone(),
                    color: line.color.clone(),
                    total_price: product.price * Decimal::from(line.quantity),
                })
            })
            .collect();

        let subtotal: Decimal = items.iter().map(|line| line.total_price).sum();
        let shipping = if subtotal < FREE_SHIPPING_FROM {
            FLAT_SHIPPING
        } else {
            Decimal::ZERO
        };

        WireSnapshot {
            total_items: items.iter().map(|line| line.quantity).sum(),
            items,
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
struct WireSnapshot {
    items: Vec<WireLine>,
    total_items: u32,
    #[serde(with = "rust_decimal::serde::float")]
    subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
}

#[derive(Debug, Serialize)]
struct WireLine {
    id: CartLineId,
    product: WireProduct,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    total_price: Decimal,
}

#[derive(Debug, Serialize)]
struct WireProduct {
    id: ProductId,
    name: String,
    image: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    description: Option<String>,
    short_description: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

#[derive(Debug, Deserialize)]
struct UpdateBody {
    item_id: CartLineId,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct RemoveBody {
    item_id: CartLineId,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            error: message.into(),
        }),
    )
        .into_response()
}

fn injected_response(failure: InjectedFailure) -> Response {
    match failure {
        InjectedFailure::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
        InjectedFailure::MalformedBody => (StatusCode::OK, "<html>not json</html>").into_response(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

type SharedCart = Arc<Mutex<FakeCart>>;

fn lock(cart: &SharedCart) -> MutexGuard<'_, FakeCart> {
    cart.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Record the request and take any injected failure.
fn begin(cart: &mut FakeCart, route: &str) -> Option<Response> {
    cart.requests.push(route.to_string());
    cart.fail_next.take().map(injected_response)
}

async fn read_cart(State(cart): State<SharedCart>) -> Response {
    let mut cart = lock(&cart);
    if let Some(failure) = begin(&mut cart, "GET /api/cart") {
        return failure;
    }
    Json(cart.snapshot()).into_response()
}

async fn update_item(State(cart): State<SharedCart>, Json(body): Json<UpdateBody>) -> Response {
    let mut cart = lock(&cart);
    if let Some(failure) = begin(&mut cart, "POST /api/cart/update") {
        return failure;
    }

    let Some(index) = cart.lines.iter().position(|l| l.id == body.item_id) else {
        return error_response(StatusCode::NOT_FOUND, "Item do carrinho não encontrado");
    };

    if body.quantity <= 0 {
        cart.lines.remove(index);
        return Json(cart.snapshot()).into_response();
    }

    let stock = cart
        .lines
        .get(index)
        .and_then(|line| cart.product(line.product_id))
        .map_or(0, |product| product.stock);
    let requested = u32::try_from(body.quantity).unwrap_or(u32::MAX);
    if requested > stock {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Estoque insuficiente. Disponível: {stock} unidades"),
        );
    }

    if let Some(line) = cart.lines.get_mut(index) {
        line.quantity = requested;
    }
    Json(cart.snapshot()).into_response()
}

async fn remove_item(State(cart): State<SharedCart>, Json(body): Json<RemoveBody>) -> Response {
    let mut cart = lock(&cart);
    if let Some(failure) = begin(&mut cart, "POST /api/cart/remove") {
        return failure;
    }

    let before = cart.lines.len();
    cart.lines.retain(|line| line.id != body.item_id);
    if cart.lines.len() == before {
        return error_response(StatusCode::NOT_FOUND, "Item do carrinho não encontrado");
    }
    Json(cart.snapshot()).into_response()
}

async fn add_item(State(cart): State<SharedCart>, Form(form): Form<AddToCartForm>) -> Response {
    let mut cart = lock(&cart);
    if let Some(failure) = begin(&mut cart, "POST /carrinho/adicionar") {
        return failure;
    }

    let Some(stock) = cart.product(form.product_id).map(|p| p.stock) else {
        return error_response(StatusCode::NOT_FOUND, "Produto não encontrado");
    };

    let existing = cart.lines.iter().position(|line| {
        line.product_id == form.product_id && line.size == form.size && line.color == form.color
    });
    let in_cart = existing
        .and_then(|index| cart.lines.get(index))
        .map_or(0, |line| line.quantity);

    if in_cart.saturating_add(form.quantity) > stock {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!(
                "Estoque insuficiente. Disponível: {} unidades",
                stock.saturating_sub(in_cart)
            ),
        );
    }

    if let Some(line) = existing.and_then(|index| cart.lines.get_mut(index)) {
        line.quantity += form.quantity;
    } else {
        cart.next_line_id += 1;
        let id = CartLineId::new(cart.next_line_id);
        cart.lines.push(StoredLine {
            id,
            product_id: form.product_id,
            quantity: form.quantity,
            size: form.size,
            color: form.color,
        });
    }

    (StatusCode::OK, "Produto adicionado ao carrinho").into_response()
}

// =============================================================================
// FakeCartServer
// =============================================================================

/// In-process cart API bound to an ephemeral localhost port.
pub struct FakeCartServer {
    addr: SocketAddr,
    cart: SharedCart,
    task: tokio::task::JoinHandle<()>,
}

impl FakeCartServer {
    /// Start a server selling `products` with an empty cart.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(products: Vec<FakeProduct>) -> Self {
        let cart: SharedCart = Arc::new(Mutex::new(FakeCart {
            products,
            ..FakeCart::default()
        }));

        let app = Router::new()
            .route("/api/cart", get(read_cart))
            .route("/api/cart/update", post(update_item))
            .route("/api/cart/remove", post(remove_item))
            .route(ADD_FORM_ACTION, post(add_item))
            .with_state(Arc::clone(&cart));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake cart server");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake cart server address");

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Fake cart server stopped: {e}");
            }
        });

        Self { addr, cart, task }
    }

    /// Base URL of the server.
    ///
    /// # Panics
    ///
    /// Never in practice; the address is always a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Invalid fake server URL")
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn config(&self) -> CartClientConfig {
        CartClientConfig::new(self.base_url())
    }

    /// Put a line in the cart directly and return its ID.
    pub fn seed_line(&self, product_id: i32, quantity: u32) -> CartLineId {
        let mut cart = lock(&self.cart);
        cart.next_line_id += 1;
        let id = CartLineId::new(cart.next_line_id);
        cart.lines.push(StoredLine {
            id,
            product_id: ProductId::new(product_id),
            quantity,
            size: None,
            color: None,
        });
        id
    }

    /// Make the next request fail.
    pub fn fail_next(&self, failure: InjectedFailure) {
        lock(&self.cart).fail_next = Some(failure);
    }

    /// Quantity of a line, if it is still in the cart.
    #[must_use]
    pub fn line_quantity(&self, id: CartLineId) -> Option<u32> {
        lock(&self.cart)
            .lines
            .iter()
            .find(|line| line.id == id)
            .map(|line| line.quantity)
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn line_count(&self) -> usize {
        lock(&self.cart).lines.len()
    }

    /// Routes hit so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.cart).requests.clone()
    }
}

impl Drop for FakeCartServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
