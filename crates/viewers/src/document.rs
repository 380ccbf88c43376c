//! Minimal model of a page the overlay is injected into.
//!
//! Tracks top-level elements, injected libraries and key listeners so that overlay
//! replacement and dismissal can be exercised without a browser.

use std::collections::BTreeSet;

use crate::overlay::{render_html, Role, UiNode, OVERLAY_ID, DISMISS_SCRIPT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    /// Click on an element with the given role. Clicks bubble to the backdrop but only
    /// dismiss when the backdrop itself is the target.
    Click(Role),
    KeyDown(String),
}

impl OverlayEvent {
    pub fn escape() -> Self {
        OverlayEvent::KeyDown("Escape".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyListener {
    overlay: u64,
}

#[derive(Debug, Default)]
pub struct PageDocument {
    body: Vec<(u64, UiNode)>,
    key_listeners: Vec<KeyListener>,
    scripts: BTreeSet<String>,
    next_node: u64,
}

impl PageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.contains(name)
    }

    /// Returns false when the library was already present.
    pub fn inject_script(&mut self, name: &str) -> bool {
        self.scripts.insert(name.to_string())
    }

    pub fn append(&mut self, node: UiNode) -> u64 {
        self.next_node += 1;
        self.body.push((self.next_node, node));
        self.next_node
    }

    pub fn element_count(&self, id: &str) -> usize {
        self.body.iter().filter(|(_, n)| n.id() == Some(id)).count()
    }

    pub fn overlay(&self) -> Option<&UiNode> {
        self.body
            .iter()
            .map(|(_, n)| n)
            .find(|n| n.id() == Some(OVERLAY_ID))
    }

    pub fn key_listener_count(&self) -> usize {
        self.key_listeners.len()
    }

    /// Insert an overlay, replacing any previous one together with its listener.
    pub fn show_overlay(&mut self, overlay: UiNode) {
        self.remove_overlay();
        let handle = self.append(overlay);
        self.key_listeners.push(KeyListener { overlay: handle });
    }

    /// Returns whether an overlay was removed.
    pub fn remove_overlay(&mut self) -> bool {
        let Some(pos) = self.body.iter().position(|(_, n)| n.id() == Some(OVERLAY_ID)) else {
            return false;
        };
        let (handle, _) = self.body.remove(pos);
        self.key_listeners.retain(|l| l.overlay != handle);
        true
    }

    /// Deliver a user event. Returns whether it dismissed the overlay.
    pub fn dispatch(&mut self, event: &OverlayEvent) -> bool {
        match event {
            OverlayEvent::Click(Role::CloseButton) | OverlayEvent::Click(Role::Backdrop) => {
                self.remove_overlay()
            }
            OverlayEvent::Click(_) => false,
            OverlayEvent::KeyDown(key) if key == "Escape" => {
                let Some(listener) = self.key_listeners.first().copied() else {
                    return false;
                };
                self.key_listeners.retain(|l| *l != listener);
                let pos = self.body.iter().position(|(h, _)| *h == listener.overlay);
                match pos {
                    Some(pos) => {
                        self.body.remove(pos);
                        true
                    }
                    None => false,
                }
            }
            OverlayEvent::KeyDown(_) => false,
        }
    }

    /// Markup of the body content, with dismissal wiring when an overlay is present.
    pub fn body_html(&self) -> String {
        let mut out: String = self.body.iter().map(|(_, n)| render_html(n)).collect();
        if self.overlay().is_some() {
            out.push_str(DISMISS_SCRIPT);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::PulldownMarkdown;
    use crate::overlay::build_overlay;

    fn overlay(text: &str) -> UiNode {
        build_overlay(text, false, Some(&PulldownMarkdown))
    }

    #[test]
    fn test_second_overlay_replaces_first() {
        let mut doc = PageDocument::new();
        doc.append(UiNode::Text("page content".into()));
        doc.show_overlay(overlay("first"));
        doc.show_overlay(overlay("second"));

        assert_eq!(doc.element_count(OVERLAY_ID), 1);
        assert_eq!(doc.key_listener_count(), 1);
        assert!(doc.overlay().unwrap().text_content().contains("second"));
        assert!(doc.body_html().starts_with("page content"));
    }

    #[test]
    fn test_escape_dismisses_once() {
        let mut doc = PageDocument::new();
        doc.show_overlay(overlay("report"));

        assert!(doc.dispatch(&OverlayEvent::escape()));
        assert_eq!(doc.element_count(OVERLAY_ID), 0);
        assert_eq!(doc.key_listener_count(), 0);

        // Listener is gone, so a second Escape does nothing.
        assert!(!doc.dispatch(&OverlayEvent::escape()));
        assert_eq!(doc.key_listener_count(), 0);
    }

    #[test]
    fn test_close_button_and_backdrop() {
        let mut doc = PageDocument::new();
        doc.show_overlay(overlay("report"));
        assert!(doc.dispatch(&OverlayEvent::Click(Role::CloseButton)));
        assert_eq!(doc.key_listener_count(), 0);

        doc.show_overlay(overlay("report"));
        assert!(doc.dispatch(&OverlayEvent::Click(Role::Backdrop)));
        assert!(doc.overlay().is_none());
    }

    #[test]
    fn test_clicks_inside_panel_keep_overlay() {
        let mut doc = PageDocument::new();
        doc.show_overlay(overlay("report"));
        assert!(!doc.dispatch(&OverlayEvent::Click(Role::Panel)));
        assert!(!doc.dispatch(&OverlayEvent::Click(Role::Body)));
        assert!(!doc.dispatch(&OverlayEvent::KeyDown("Enter".into())));
        assert_eq!(doc.element_count(OVERLAY_ID), 1);
    }

    #[test]
    fn test_inject_script_is_idempotent() {
        let mut doc = PageDocument::new();
        assert!(doc.inject_script("marked"));
        assert!(!doc.inject_script("marked"));
        assert!(doc.has_script("marked"));
    }

    #[test]
    fn test_body_html_includes_dismiss_wiring() {
        let mut doc = PageDocument::new();
        assert!(!doc.body_html().contains("<script>"));
        doc.show_overlay(overlay("report"));
        assert!(doc.body_html().contains("removeEventListener"));
    }
}
