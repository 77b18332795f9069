//! Cart commands.
//!
//! Each command runs one controller operation against the live cart API and
//! prints the page the way the storefront would show it.

use std::str::FromStr;

use acadshop_core::{CartLineId, ProductId, QuantityBounds};
use acadshop_storefront::api::{AddToCartForm, CartApiClient};
use acadshop_storefront::config::CartClientConfig;
use acadshop_storefront::error::CartError;
use acadshop_storefront::page::{HostPage, NotificationLevel, PanelKind};
use acadshop_storefront::sync::{CartAction, CartSyncController};
use acadshop_storefront::views::CartSurfaces;
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// An ID argument is not an integer.
    #[error("Invalid {0}: {1}")]
    InvalidId(&'static str, String),

    /// `click` was given attributes no control carries.
    #[error("Unknown cart action: {0}")]
    UnknownAction(String),

    /// The cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A controller bound to the configured storefront.
pub struct Session {
    controller: CartSyncController<CartApiClient>,
}

impl Session {
    /// Build the API client, surfaces, and controller from configuration.
    #[must_use]
    pub fn new(config: &CartClientConfig) -> Self {
        Self {
            controller: CartSyncController::new(
                CartApiClient::new(config),
                CartSurfaces::from_config(config),
                HostPage::with_side_cart_total(),
            ),
        }
    }

    /// Open the sidebar and print every surface.
    pub async fn show(&self) {
        self.controller.open_sidebar().await;
        print_page(&self.controller.page());
    }

    /// Open the side cart and print it.
    pub async fn side_cart(&self) -> Result<(), CommandError> {
        let result = self.controller.open_side_panel().await;
        print_page(&self.controller.page());
        Ok(result?)
    }

    /// Submit the add-to-cart form.
    pub async fn add(
        &self,
        action: &str,
        product: &str,
        raw_quantity: &str,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<(), CommandError> {
        let product_id = parse_id::<ProductId>("product ID", product)?;
        let bounds = QuantityBounds::default();
        let quantity = u32::try_from(bounds.clamp_input(raw_quantity)).unwrap_or(1);

        let form = AddToCartForm {
            product_id,
            quantity,
            size: size.filter(|s| !s.trim().is_empty()),
            color: color.filter(|c| !c.trim().is_empty()),
        };

        let result = self.controller.on_add(action, &form).await;
        print_page(&self.controller.page());
        Ok(result?)
    }

    /// Change a line's quantity.
    pub async fn update(&self, item: &str, quantity: i64) -> Result<(), CommandError> {
        let item_id = parse_id::<CartLineId>("item ID", item)?;
        let result = self.controller.on_quantity_change(item_id, quantity).await;
        print_page(&self.controller.page());
        Ok(result?)
    }

    /// Remove a line.
    pub async fn remove(&self, item: &str) -> Result<(), CommandError> {
        let item_id = parse_id::<CartLineId>("item ID", item)?;
        let result = self.controller.on_remove(item_id).await;
        print_page(&self.controller.page());
        Ok(result?)
    }

    /// Dispatch the action a rendered control would trigger.
    pub async fn click(
        &self,
        action: &str,
        item: Option<&str>,
        quantity: Option<&str>,
    ) -> Result<(), CommandError> {
        let parsed = CartAction::from_data_attributes(action, item, quantity)
            .ok_or_else(|| CommandError::UnknownAction(action.to_string()))?;

        tracing::debug!(?parsed, "Dispatching cart action");
        let result = self.controller.dispatch(parsed).await;
        print_page(&self.controller.page());
        Ok(result?)
    }
}

fn parse_id<T: FromStr>(what: &'static str, raw: &str) -> Result<T, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidId(what, raw.to_string()))
}

#[allow(clippy::print_stdout)]
fn print_page(page: &HostPage) {
    if page.badge.visible {
        println!("Badge: {}", page.badge.text);
    } else {
        println!("Badge: hidden");
    }

    if page.panel(PanelKind::SideCart).is_open() {
        println!("\n== Side cart ==\n{}", page.side_cart.items_html.trim());
        if let Some(total) = &page.side_cart.total {
            println!("{total}");
        }
    }

    if page.panel(PanelKind::Sidebar).is_open() {
        println!("\n== Cart ==\n{}", page.sidebar.content_html.trim());
        if page.sidebar.footer_visible {
            println!("Subtotal: {}", page.sidebar.subtotal);
            println!("Frete: {}", page.sidebar.shipping);
            println!("Total: {}", page.sidebar.total);
        }
    }

    for notification in &page.notifications {
        let tag = match notification.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Danger => "error",
        };
        println!("[{tag}] {}", notification.message);
    }
}
