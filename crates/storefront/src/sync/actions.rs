//! Event delegation for cart controls.
//!
//! Rendered rows carry their action as data (`data-cart-action`,
//! `data-item-id`, `data-quantity`) instead of naming a global handler. The
//! page forwards the attributes of whatever was clicked to
//! [`CartAction::from_data_attributes`] and hands the result to
//! [`super::CartSyncController::dispatch`].

use acadshop_core::CartLineId;

use crate::page::{CloseTrigger, PanelKind};

/// A user intent on one of the cart surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    /// Set a line's quantity; zero or less removes it.
    SetQuantity { item_id: CartLineId, quantity: i64 },
    /// Remove a line.
    Remove { item_id: CartLineId },
    /// Open a panel.
    Open(PanelKind),
    /// Close a panel.
    Close(PanelKind, CloseTrigger),
}

impl CartAction {
    /// Parse the data attributes of a clicked control.
    ///
    /// Returns `None` for unknown actions and for missing or malformed ids
    /// and quantities.
    #[must_use]
    pub fn from_data_attributes(
        action: &str,
        item_id: Option<&str>,
        quantity: Option<&str>,
    ) -> Option<Self> {
        match action {
            "update" => Some(Self::SetQuantity {
                item_id: item_id?.parse().ok()?,
                quantity: quantity?.trim().parse().ok()?,
            }),
            "remove" => Some(Self::Remove {
                item_id: item_id?.parse().ok()?,
            }),
            "open-side-cart" => Some(Self::Open(PanelKind::SideCart)),
            "open-sidebar" => Some(Self::Open(PanelKind::Sidebar)),
            "close-side-cart" => Some(Self::Close(PanelKind::SideCart, CloseTrigger::Button)),
            "close-sidebar" => Some(Self::Close(PanelKind::Sidebar, CloseTrigger::Button)),
            _ => None,
        }
    }

    /// Click on a panel's backdrop.
    #[must_use]
    pub const fn overlay_click(kind: PanelKind) -> Self {
        Self::Close(kind, CloseTrigger::Overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update() {
        assert_eq!(
            CartAction::from_data_attributes("update", Some("7"), Some("0")),
            Some(CartAction::SetQuantity {
                item_id: CartLineId::new(7),
                quantity: 0
            })
        );
    }

    #[test]
    fn test_parse_remove() {
        assert_eq!(
            CartAction::from_data_attributes("remove", Some("12"), None),
            Some(CartAction::Remove {
                item_id: CartLineId::new(12)
            })
        );
    }

    #[test]
    fn test_parse_panel_actions() {
        assert_eq!(
            CartAction::from_data_attributes("open-side-cart", None, None),
            Some(CartAction::Open(PanelKind::SideCart))
        );
        assert_eq!(
            CartAction::from_data_attributes("close-sidebar", None, None),
            Some(CartAction::Close(PanelKind::Sidebar, CloseTrigger::Button))
        );
        assert_eq!(
            CartAction::overlay_click(PanelKind::Sidebar),
            CartAction::Close(PanelKind::Sidebar, CloseTrigger::Overlay)
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(CartAction::from_data_attributes("update", Some("7"), None), None);
        assert_eq!(CartAction::from_data_attributes("remove", Some("x"), None), None);
        assert_eq!(CartAction::from_data_attributes("checkout", None, None), None);
    }
}
