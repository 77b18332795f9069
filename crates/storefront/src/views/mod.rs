//! Cart surfaces.
//!
//! The side cart and the sidebar are the same view at two verbosity levels:
//! both map snapshot lines through [`CartRowView`] and format money through
//! [`Price`]. [`CartSurfaces::paint`] is the single fan-out that puts one
//! snapshot on every surface.

pub mod badge;

use acadshop_core::{CartLineId, Price};
use askama::Template;
use rust_decimal::Decimal;

use crate::api::{CartLine, CartSnapshot};
use crate::config::CartClientConfig;
use crate::error::Result;
use crate::page::HostPage;

pub use badge::render_badge;

/// Characters of the long description kept when no short one exists.
const DESCRIPTION_PREVIEW_CHARS: usize = 50;

const DEFAULT_SIZE_LABEL: &str = "Único";
const DEFAULT_COLOR_LABEL: &str = "Única";

/// How much detail a cart view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Side cart: image, name, description, line price, quantity, remove.
    Compact,
    /// Sidebar: adds variant details and +/- controls, plus totals.
    Full,
}

// =============================================================================
// View Models
// =============================================================================

/// One cart line, ready for a template.
#[derive(Debug, Clone)]
pub struct CartRowView {
    pub id: CartLineId,
    pub name: String,
    pub image: String,
    pub description: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    /// Quantity requested by the "-" control (0 removes the line).
    pub decrement_quantity: i64,
    /// Quantity requested by the "+" control.
    pub increment_quantity: i64,
    pub line_price: String,
}

impl CartRowView {
    /// Map a snapshot line, substituting `placeholder_image` for a missing
    /// image.
    #[must_use]
    pub fn from_line(line: &CartLine, placeholder_image: &str) -> Self {
        let product = &line.product;
        let image = product
            .image
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(placeholder_image)
            .to_string();

        let description = product
            .short_description
            .as_deref()
            .filter(|s| !s.is_empty())
            .map_or_else(|| preview(&product.description), str::to_string);

        Self {
            id: line.id,
            name: product.name.clone(),
            image,
            description,
            size: line
                .size
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SIZE_LABEL.to_string()),
            color: line
                .color
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_COLOR_LABEL.to_string()),
            quantity: line.quantity,
            decrement_quantity: i64::from(line.quantity) - 1,
            increment_quantity: i64::from(line.quantity) + 1,
            line_price: format_brl(line.total_price),
        }
    }
}

/// First characters of a long description, with an ellipsis when cut.
fn preview(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        let head: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        description.to_string()
    }
}

/// Format an amount as `R$ 1234,50`.
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    Price::brl(amount).display()
}

// =============================================================================
// Templates
// =============================================================================

/// Line rows for either panel.
#[derive(Template)]
#[template(path = "partials/cart_lines.html")]
struct CartLinesTemplate<'a> {
    rows: &'a [CartRowView],
    full: bool,
    placeholder: &'a str,
}

/// Empty-cart block for either panel.
#[derive(Template)]
#[template(path = "partials/cart_empty.html")]
struct CartEmptyTemplate<'a> {
    full: bool,
    continue_url: &'a str,
}

/// Output of rendering one snapshot at one verbosity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCart {
    pub html: String,
    pub is_empty: bool,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

/// A cart view at a fixed verbosity.
#[derive(Debug, Clone)]
pub struct CartView {
    verbosity: Verbosity,
    placeholder_image: String,
    continue_shopping_url: String,
}

impl CartView {
    /// Create a view.
    #[must_use]
    pub fn new(
        verbosity: Verbosity,
        placeholder_image: impl Into<String>,
        continue_shopping_url: impl Into<String>,
    ) -> Self {
        Self {
            verbosity,
            placeholder_image: placeholder_image.into(),
            continue_shopping_url: continue_shopping_url.into(),
        }
    }

    /// Render a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn render(&self, snapshot: &CartSnapshot) -> Result<RenderedCart> {
        let full = self.verbosity == Verbosity::Full;

        let html = if snapshot.is_empty() {
            CartEmptyTemplate {
                full,
                continue_url: &self.continue_shopping_url,
            }
            .render()?
        } else {
            let rows: Vec<CartRowView> = snapshot
                .items
                .iter()
                .map(|line| CartRowView::from_line(line, &self.placeholder_image))
                .collect();
            CartLinesTemplate {
                rows: &rows,
                full,
                placeholder: &self.placeholder_image,
            }
            .render()?
        };

        Ok(RenderedCart {
            html,
            is_empty: snapshot.is_empty(),
            subtotal: format_brl(snapshot.subtotal),
            shipping: format_brl(snapshot.shipping),
            total: format_brl(snapshot.total),
        })
    }
}

// =============================================================================
// Fan-out
// =============================================================================

/// Badge, side cart, and sidebar, painted together.
#[derive(Debug, Clone)]
pub struct CartSurfaces {
    side_cart: CartView,
    sidebar: CartView,
}

impl CartSurfaces {
    /// Create the surfaces with explicit asset paths.
    #[must_use]
    pub fn new(placeholder_image: &str, continue_shopping_url: &str) -> Self {
        Self {
            side_cart: CartView::new(Verbosity::Compact, placeholder_image, continue_shopping_url),
            sidebar: CartView::new(Verbosity::Full, placeholder_image, continue_shopping_url),
        }
    }

    /// Create the surfaces from client configuration.
    #[must_use]
    pub fn from_config(config: &CartClientConfig) -> Self {
        Self::new(&config.placeholder_image, &config.continue_shopping_url)
    }

    /// Paint every surface from one snapshot.
    ///
    /// Both panels are rendered before anything is written, so a render
    /// failure leaves the page exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn paint(&self, page: &mut HostPage, snapshot: &CartSnapshot) -> Result<()> {
        let compact = self.side_cart.render(snapshot)?;
        let full = self.sidebar.render(snapshot)?;

        page.badge = render_badge(snapshot.total_items);

        page.side_cart.items_html = compact.html;
        if let Some(total) = page.side_cart.total.as_mut() {
            *total = format!("Total: {}", compact.total);
        }

        page.sidebar.content_html = full.html;
        page.sidebar.footer_visible = !full.is_empty;
        page.sidebar.subtotal = full.subtotal;
        page.sidebar.shipping = full.shipping;
        page.sidebar.total = full.total;

        Ok(())
    }
}
