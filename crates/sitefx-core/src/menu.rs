#![forbid(unsafe_code)]

//! Mobile menu toggle.
//!
//! One open/closed flag drives both the toggle button and the menu
//! container. Clicks on the button stop propagation so the document-level
//! outside-click handler never sees the click that opened the menu.

use tracing::debug;

/// Result of feeding one click into [`MenuToggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuTransition {
    /// Menu state after the click.
    pub open: bool,
    /// Whether the state flipped (the host only touches classes when true).
    pub changed: bool,
    /// Whether the host must stop the click from bubbling further.
    pub stop_propagation: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuToggle {
    open: bool,
}

impl MenuToggle {
    #[must_use]
    pub const fn new() -> Self {
        Self { open: false }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    fn set(&mut self, open: bool, stop_propagation: bool, cause: &'static str) -> MenuTransition {
        let changed = self.open != open;
        self.open = open;
        if changed {
            debug!(target: "sitefx::menu", open, cause, "menu state changed");
        }
        MenuTransition {
            open,
            changed,
            stop_propagation,
        }
    }

    /// Click on the toggle button.
    pub fn on_button_click(&mut self) -> MenuTransition {
        self.set(!self.open, true, "button")
    }

    /// Click anywhere in the document that reached the document listener.
    pub fn on_document_click(&mut self, inside_menu: bool, on_button: bool) -> MenuTransition {
        if self.open && !inside_menu && !on_button {
            return self.set(false, false, "outside_click");
        }
        self.set(self.open, false, "outside_click")
    }

    /// Click on one of the navigation links inside the menu.
    pub fn on_link_click(&mut self) -> MenuTransition {
        self.set(false, false, "link")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_closed() {
        assert!(!MenuToggle::new().is_open());
    }

    #[test]
    fn button_toggles_and_stops_propagation() {
        let mut menu = MenuToggle::new();
        let opened = menu.on_button_click();
        assert_eq!(
            opened,
            MenuTransition {
                open: true,
                changed: true,
                stop_propagation: true,
            }
        );
        let closed = menu.on_button_click();
        assert!(!closed.open);
        assert!(closed.changed);
        assert!(closed.stop_propagation);
    }

    #[test]
    fn outside_click_closes_open_menu() {
        let mut menu = MenuToggle::new();
        menu.on_button_click();
        let t = menu.on_document_click(false, false);
        assert!(!t.open);
        assert!(t.changed);
        assert!(!t.stop_propagation);
    }

    #[test]
    fn click_inside_menu_keeps_it_open() {
        let mut menu = MenuToggle::new();
        menu.on_button_click();
        let t = menu.on_document_click(true, false);
        assert!(t.open);
        assert!(!t.changed);
    }

    #[test]
    fn click_on_button_target_is_not_an_outside_click() {
        let mut menu = MenuToggle::new();
        menu.on_button_click();
        assert!(menu.on_document_click(false, true).open);
    }

    #[test]
    fn outside_click_on_closed_menu_is_a_noop() {
        let mut menu = MenuToggle::new();
        let t = menu.on_document_click(false, false);
        assert!(!t.open);
        assert!(!t.changed);
    }

    #[test]
    fn link_click_closes() {
        let mut menu = MenuToggle::new();
        menu.on_button_click();
        let t = menu.on_link_click();
        assert!(!t.open);
        assert!(t.changed);
        // A second link click on the closed menu changes nothing.
        assert!(!menu.on_link_click().changed);
    }
}
