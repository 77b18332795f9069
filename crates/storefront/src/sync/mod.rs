//! Cart state synchronization.
//!
//! [`CartSyncController`] runs every cart action as "mutate, then reconcile":
//! the mutation goes to the server, and only the snapshot the server answers
//! with is painted. Nothing is changed on the page before the server confirms,
//! so a failed action leaves every surface as it was and needs no rollback.
//!
//! Every snapshot, whatever produced it, goes through one fan-out that paints
//! the badge, the side cart, and the sidebar together. Snapshots carry the
//! [`Ticket`] of the request that fetched them and stale ones are dropped.

pub mod actions;
pub mod sequence;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use acadshop_core::CartLineId;
use tracing::{debug, info, instrument, warn};

use crate::api::{AddToCartForm, CartApi, CartSnapshot};
use crate::error::{Result, add_breadcrumb};
use crate::page::{CloseTrigger, HostPage, Notification, PanelKind};
use crate::views::CartSurfaces;

pub use actions::CartAction;
pub use sequence::{AppliedMark, Sequencer, Ticket};

const ADD_SUCCESS_MESSAGE: &str = "Produto adicionado ao carrinho!";
const ADD_FAILED_MESSAGE: &str = "Erro ao adicionar produto ao carrinho.";
const UPDATE_FAILED_MESSAGE: &str = "Erro ao atualizar item do carrinho";
const REMOVE_FAILED_MESSAGE: &str = "Erro ao remover item do carrinho.";
const LOAD_FAILED_MESSAGE: &str = "Erro ao carregar o carrinho.";

/// Page plus the ticket of the snapshot currently painted on it.
#[derive(Debug, Default)]
struct PageState {
    page: HostPage,
    applied: AppliedMark,
}

/// Coordinates cart mutations and the surfaces that display the cart.
pub struct CartSyncController<A> {
    api: A,
    surfaces: CartSurfaces,
    sequencer: Sequencer,
    state: Mutex<PageState>,
}

impl<A: CartApi> CartSyncController<A> {
    /// Create a controller painting onto `page`.
    #[must_use]
    pub fn new(api: A, surfaces: CartSurfaces, page: HostPage) -> Self {
        Self {
            api,
            surfaces,
            sequencer: Sequencer::new(),
            state: Mutex::new(PageState {
                page,
                applied: AppliedMark::default(),
            }),
        }
    }

    /// The cart API this controller talks to.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Copy of the page as currently painted.
    #[must_use]
    pub fn page(&self) -> HostPage {
        self.lock().page.clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notification: Notification) {
        self.lock().page.notify(notification);
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Paint `snapshot` on every surface unless a newer one is already shown.
    ///
    /// Returns `Ok(false)` when the snapshot was stale and dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a surface fails to render; the page is untouched.
    pub fn reconcile_all(&self, ticket: Ticket, snapshot: &CartSnapshot) -> Result<bool> {
        let mut state = self.lock();

        if state.applied.is_stale(ticket) {
            debug!(
                ticket = ticket.get(),
                applied = ?state.applied.last().map(Ticket::get),
                "Dropping stale cart snapshot"
            );
            return Ok(false);
        }

        self.surfaces.paint(&mut state.page, snapshot)?;
        state.applied.advance(ticket);

        debug!(
            ticket = ticket.get(),
            total_items = snapshot.total_items,
            lines = snapshot.items.len(),
            "Cart surfaces reconciled"
        );
        Ok(true)
    }

    /// Read the cart and paint it. Failures are logged and swallowed.
    async fn refresh_quietly(&self, context: &'static str) {
        let ticket = self.sequencer.issue();
        let result = self
            .api
            .read_cart()
            .await
            .and_then(|snapshot| self.reconcile_all(ticket, &snapshot).map(|_| ()));

        if let Err(e) = result {
            warn!(context, error = %e, "Background cart refresh failed");
        }
    }

    /// Initialise the badge (and both panels) on page load.
    #[instrument(skip(self))]
    pub async fn refresh_badge(&self) {
        self.refresh_quietly("page_load").await;
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Submit the add-to-cart form, then reconcile every surface.
    ///
    /// The form is marked busy until the submission resolves. The follow-up
    /// read is a background refresh: if it fails the add still succeeded and
    /// only a log line is written.
    ///
    /// # Errors
    ///
    /// Returns the submission error after it has been shown to the user.
    #[instrument(skip(self, form), fields(product_id = %form.product_id))]
    pub async fn on_add(&self, action: &str, form: &AddToCartForm) -> Result<()> {
        let product_id = form.product_id.to_string();
        add_breadcrumb("cart", "Add to cart", Some(&[("product_id", product_id.as_str())]));

        self.lock().page.add_form_busy = true;
        let submitted = self.api.submit_add_form(action, form).await;
        self.lock().page.add_form_busy = false;

        if let Err(e) = submitted {
            e.report("add_to_cart");
            self.notify(Notification::danger(e.user_message(ADD_FAILED_MESSAGE)));
            return Err(e);
        }

        info!(quantity = form.quantity, "Product added to cart");
        self.notify(Notification::success(ADD_SUCCESS_MESSAGE));
        self.refresh_quietly("after_add").await;
        Ok(())
    }

    /// Change a line's quantity; zero or less removes the line instead.
    ///
    /// # Errors
    ///
    /// Returns the failure after it has been shown to the user.
    #[instrument(skip(self))]
    pub async fn on_quantity_change(&self, item_id: CartLineId, new_quantity: i64) -> Result<()> {
        let Ok(quantity) = u32::try_from(new_quantity) else {
            return if new_quantity <= 0 {
                self.on_remove(item_id).await
            } else {
                self.apply_update(item_id, u32::MAX).await
            };
        };

        if quantity == 0 {
            return self.on_remove(item_id).await;
        }

        self.apply_update(item_id, quantity).await
    }

    async fn apply_update(&self, item_id: CartLineId, quantity: u32) -> Result<()> {
        let id = item_id.to_string();
        let qty = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Update quantity",
            Some(&[("item_id", id.as_str()), ("quantity", qty.as_str())]),
        );

        let ticket = self.sequencer.issue();
        let result = self
            .api
            .update_item(item_id, quantity)
            .await
            .and_then(|snapshot| self.reconcile_all(ticket, &snapshot).map(|_| ()));

        if let Err(e) = result {
            e.report("update_item");
            self.notify(Notification::danger(e.user_message(UPDATE_FAILED_MESSAGE)));
            return Err(e);
        }
        Ok(())
    }

    /// Remove a line and reconcile every surface from the server's answer,
    /// whichever panel the removal came from.
    ///
    /// # Errors
    ///
    /// Returns the failure after it has been shown to the user.
    #[instrument(skip(self))]
    pub async fn on_remove(&self, item_id: CartLineId) -> Result<()> {
        let id = item_id.to_string();
        add_breadcrumb("cart", "Remove line", Some(&[("item_id", id.as_str())]));

        let ticket = self.sequencer.issue();
        let result = self
            .api
            .remove_item(item_id)
            .await
            .and_then(|snapshot| self.reconcile_all(ticket, &snapshot).map(|_| ()));

        if let Err(e) = result {
            e.report("remove_item");
            self.notify(Notification::danger(e.user_message(REMOVE_FAILED_MESSAGE)));
            return Err(e);
        }
        Ok(())
    }

    // =========================================================================
    // Panels
    // =========================================================================

    /// Fetch the cart, paint it, then slide the side cart in.
    ///
    /// # Errors
    ///
    /// Returns the failure after it has been shown to the user; the panel
    /// stays closed.
    #[instrument(skip(self))]
    pub async fn open_side_panel(&self) -> Result<()> {
        let ticket = self.sequencer.issue();
        let result = self
            .api
            .read_cart()
            .await
            .and_then(|snapshot| self.reconcile_all(ticket, &snapshot).map(|_| ()));

        if let Err(e) = result {
            e.report("open_side_panel");
            self.notify(Notification::danger(e.user_message(LOAD_FAILED_MESSAGE)));
            return Err(e);
        }

        self.lock().page.open_panel(PanelKind::SideCart);
        Ok(())
    }

    /// Slide the sidebar in, then refresh it in the background.
    #[instrument(skip(self))]
    pub async fn open_sidebar(&self) {
        self.lock().page.open_panel(PanelKind::Sidebar);
        self.refresh_quietly("open_sidebar").await;
    }

    /// Close the side cart.
    pub fn close_side_panel(&self, trigger: CloseTrigger) {
        self.lock().page.close_panel(PanelKind::SideCart, trigger);
    }

    /// Close the sidebar.
    pub fn close_sidebar(&self, trigger: CloseTrigger) {
        self.lock().page.close_panel(PanelKind::Sidebar, trigger);
    }

    /// Close the notification at `index`.
    pub fn dismiss_notification(&self, index: usize) -> Option<Notification> {
        self.lock().page.dismiss_notification(index)
    }

    /// Drop success notifications whose display time has passed.
    pub fn expire_notifications(&self, now: Instant) -> usize {
        self.lock().page.expire_notifications(now)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Run a delegated UI action.
    ///
    /// # Errors
    ///
    /// Returns the failure of the action, already shown to the user.
    pub async fn dispatch(&self, action: CartAction) -> Result<()> {
        match action {
            CartAction::SetQuantity { item_id, quantity } => {
                self.on_quantity_change(item_id, quantity).await
            }
            CartAction::Remove { item_id } => self.on_remove(item_id).await,
            CartAction::Open(PanelKind::SideCart) => self.open_side_panel().await,
            CartAction::Open(PanelKind::Sidebar) => {
                self.open_sidebar().await;
                Ok(())
            }
            CartAction::Close(PanelKind::SideCart, trigger) => {
                self.close_side_panel(trigger);
                Ok(())
            }
            CartAction::Close(PanelKind::Sidebar, trigger) => {
                self.close_sidebar(trigger);
                Ok(())
            }
        }
    }
}
