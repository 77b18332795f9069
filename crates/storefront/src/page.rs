//! Host page elements the cart surfaces write into.
//!
//! The storefront layout owns the actual markup; this module models the
//! handful of elements the cart layer is allowed to touch: the header badge,
//! both cart panels with their overlays, the body scroll lock, the busy flag of
//! the add-to-cart form, and the notification stack.

use std::time::{Duration, Instant};

/// How long a success notification stays up before dismissing itself.
pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// Open/closed state of a cart panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// Which cart panel an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Compact quick-view panel.
    SideCart,
    /// Full cart sidebar.
    Sidebar,
}

/// What closed a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    Button,
    Overlay,
    Programmatic,
}

/// `overflow` of the page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyOverflow {
    /// No inline overflow; the page scrolls normally.
    #[default]
    Unset,
    /// Scroll locked while a panel is open.
    Hidden,
}

/// Header cart badge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BadgeElement {
    pub text: String,
    pub visible: bool,
}

/// A sliding panel and its backdrop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelElement {
    pub state: PanelState,
    pub overlay_active: bool,
}

impl PanelElement {
    /// Whether the panel is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == PanelState::Open
    }

    /// Inline transform for the sidebar's slide.
    #[must_use]
    pub const fn transform(&self) -> &'static str {
        match self.state {
            PanelState::Open => "translateX(0)",
            PanelState::Closed => "translateX(100%)",
        }
    }
}

/// Side cart container, its item list, and the optional total line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SideCartElements {
    pub panel: PanelElement,
    pub items_html: String,
    /// `None` when the layout has no total element.
    pub total: Option<String>,
}

/// Full cart sidebar content and footer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidebarElements {
    pub panel: PanelElement,
    pub content_html: String,
    pub footer_visible: bool,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Danger,
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// `None` means the user has to dismiss it.
    pub dismiss_after: Option<Duration>,
    pub shown_at: Instant,
}

impl Notification {
    /// Blocking error message.
    #[must_use]
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Danger,
            message: message.into(),
            dismiss_after: None,
            shown_at: Instant::now(),
        }
    }

    /// Self-dismissing confirmation.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            dismiss_after: Some(SUCCESS_DISMISS_AFTER),
            shown_at: Instant::now(),
        }
    }

    /// Whether a self-dismissing notification is past its time at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.dismiss_after
            .is_some_and(|after| now.saturating_duration_since(self.shown_at) >= after)
    }
}

/// Everything the cart layer writes on the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostPage {
    pub badge: BadgeElement,
    pub side_cart: SideCartElements,
    pub sidebar: SidebarElements,
    pub body_overflow: BodyOverflow,
    pub add_form_busy: bool,
    pub notifications: Vec<Notification>,
}

impl HostPage {
    /// A page whose layout includes the side cart total line.
    #[must_use]
    pub fn with_side_cart_total() -> Self {
        let mut page = Self::default();
        page.side_cart.total = Some(String::new());
        page
    }

    fn panel_mut(&mut self, kind: PanelKind) -> &mut PanelElement {
        match kind {
            PanelKind::SideCart => &mut self.side_cart.panel,
            PanelKind::Sidebar => &mut self.sidebar.panel,
        }
    }

    /// Panel state for `kind`.
    #[must_use]
    pub const fn panel(&self, kind: PanelKind) -> &PanelElement {
        match kind {
            PanelKind::SideCart => &self.side_cart.panel,
            PanelKind::Sidebar => &self.sidebar.panel,
        }
    }

    /// Slide a panel in, show its overlay, and lock page scroll.
    pub fn open_panel(&mut self, kind: PanelKind) {
        let panel = self.panel_mut(kind);
        panel.state = PanelState::Open;
        panel.overlay_active = true;
        self.body_overflow = BodyOverflow::Hidden;
    }

    /// Slide a panel out and hide its overlay.
    ///
    /// The scroll lock is released whenever no panel is left open, whatever
    /// closed this one.
    pub fn close_panel(&mut self, kind: PanelKind, trigger: CloseTrigger) {
        let panel = self.panel_mut(kind);
        panel.state = PanelState::Closed;
        panel.overlay_active = false;

        if !self.side_cart.panel.is_open() && !self.sidebar.panel.is_open() {
            self.body_overflow = BodyOverflow::Unset;
        }

        tracing::debug!(?kind, ?trigger, overflow = ?self.body_overflow, "Cart panel closed");
    }

    /// Push a notification.
    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Close the notification at `index`, as its close button does.
    ///
    /// Returns the removed notification, or `None` if the index is gone.
    pub fn dismiss_notification(&mut self, index: usize) -> Option<Notification> {
        (index < self.notifications.len()).then(|| self.notifications.remove(index))
    }

    /// Drop every self-dismissing notification whose time is up at `now`.
    ///
    /// Returns how many were removed.
    pub fn expire_notifications(&mut self, now: Instant) -> usize {
        let before = self.notifications.len();
        self.notifications.retain(|n| !n.is_expired(now));
        before - self.notifications.len()
    }

    /// Most recent notification, if any.
    #[must_use]
    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}
