//! Header cart badge.

use crate::page::BadgeElement;

/// Badge state for a cart holding `count` items.
///
/// An empty cart hides the badge instead of showing "0".
#[must_use]
pub fn render_badge(count: u32) -> BadgeElement {
    if count > 0 {
        BadgeElement {
            text: count.to_string(),
            visible: true,
        }
    } else {
        BadgeElement {
            text: String::new(),
            visible: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_visible_with_exact_count() {
        for count in [1, 2, 17, 999] {
            let badge = render_badge(count);
            assert!(badge.visible);
            assert_eq!(badge.text, count.to_string());
        }
    }

    #[test]
    fn test_badge_hidden_when_empty() {
        let badge = render_badge(0);
        assert!(!badge.visible);
        assert_ne!(badge.text, "0");
    }
}
