//! In-page result overlay.
//!
//! The overlay is described as a [`UiNode`] tree by [`build_overlay`], a pure function of the
//! message. [`render_html`] turns a tree into markup for injection into a page; dismissal
//! behaviour lives in [`crate::document`].

use crate::escape::escape_html;
use crate::markdown::MarkdownRenderer;

/// Element id of the overlay root. At most one element with this id exists in a page.
pub const OVERLAY_ID: &str = "agreement-lens-overlay";

pub const SUCCESS_TITLE: &str = "Analysis Result";
pub const ERROR_TITLE: &str = "Error";

const BACKDROP_STYLE: &str = "position:fixed;inset:0;z-index:2147483647;\
background:rgba(0,0,0,0.55);display:flex;align-items:center;justify-content:center;";
const PANEL_STYLE: &str = "background:#fff;color:#222;width:min(860px,92vw);max-height:86vh;\
border-radius:10px;box-shadow:0 12px 40px rgba(0,0,0,0.35);display:flex;flex-direction:column;\
font-family:system-ui,sans-serif;";
const HEADER_STYLE: &str = "display:flex;justify-content:space-between;align-items:center;\
padding:14px 20px;border-bottom:1px solid #e5e5e5;";
const CLOSE_STYLE: &str = "border:none;background:none;font-size:24px;line-height:1;cursor:pointer;";
const BODY_STYLE: &str = "padding:16px 20px;overflow-y:auto;line-height:1.55;";
const ERROR_BODY_STYLE: &str = "padding:16px 20px;overflow-y:auto;color:#b00020;white-space:pre-wrap;";

/// What part of the overlay an element plays. Used to route clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Backdrop,
    Panel,
    Header,
    Title,
    CloseButton,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiNode {
    Element {
        tag: &'static str,
        id: Option<String>,
        role: Option<Role>,
        style: Option<&'static str>,
        children: Vec<UiNode>,
    },
    /// Text content, escaped when rendered.
    Text(String),
    /// Pre-rendered HTML, inserted as-is.
    Html(String),
}

impl UiNode {
    fn element(tag: &'static str, role: Role, style: &'static str, children: Vec<UiNode>) -> Self {
        UiNode::Element {
            tag,
            id: None,
            role: Some(role),
            style: Some(style),
            children,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            UiNode::Element { id, .. } => id.as_deref(),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            UiNode::Element { role, .. } => *role,
            _ => None,
        }
    }

    pub fn children(&self) -> &[UiNode] {
        match self {
            UiNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first search for the first node with the given role.
    pub fn find(&self, role: Role) -> Option<&UiNode> {
        if self.role() == Some(role) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(role))
    }

    /// Concatenated text of this node and its descendants, as a reader would see it.
    pub fn text_content(&self) -> String {
        match self {
            UiNode::Text(text) => text.clone(),
            UiNode::Html(html) => html.clone(),
            UiNode::Element { children, .. } => children.iter().map(|c| c.text_content()).collect(),
        }
    }
}

/// Describe the overlay for `message`.
///
/// Errors are always plain text. A successful report is rendered as Markdown when a renderer
/// is available in the page, otherwise shown as plain text.
pub fn build_overlay(
    message: &str,
    is_error: bool,
    markdown: Option<&dyn MarkdownRenderer>,
) -> UiNode {
    let title = if is_error { ERROR_TITLE } else { SUCCESS_TITLE };

    let content = match (is_error, markdown) {
        (false, Some(renderer)) => match renderer.render(message) {
            Ok(html) => UiNode::Html(html),
            Err(e) => UiNode::Text(format!("Error parsing markdown result: {}", e)),
        },
        _ => UiNode::Text(message.to_string()),
    };
    let body_style = if is_error { ERROR_BODY_STYLE } else { BODY_STYLE };

    let header = UiNode::element(
        "div",
        Role::Header,
        HEADER_STYLE,
        vec![
            UiNode::Element {
                tag: "h2",
                id: None,
                role: Some(Role::Title),
                style: Some("margin:0;font-size:20px;"),
                children: vec![UiNode::Text(title.to_string())],
            },
            UiNode::Element {
                tag: "button",
                id: None,
                role: Some(Role::CloseButton),
                style: Some(CLOSE_STYLE),
                children: vec![UiNode::Text("\u{00d7}".to_string())],
            },
        ],
    );
    let body = UiNode::element("div", Role::Body, body_style, vec![content]);
    let panel = UiNode::element("div", Role::Panel, PANEL_STYLE, vec![header, body]);

    UiNode::Element {
        tag: "div",
        id: Some(OVERLAY_ID.to_string()),
        role: Some(Role::Backdrop),
        style: Some(BACKDROP_STYLE),
        children: vec![panel],
    }
}

fn role_attr(role: Role) -> &'static str {
    match role {
        Role::Backdrop => "backdrop",
        Role::Panel => "panel",
        Role::Header => "header",
        Role::Title => "title",
        Role::CloseButton => "close",
        Role::Body => "body",
    }
}

/// Render a tree to HTML markup.
pub fn render_html(node: &UiNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &UiNode) {
    match node {
        UiNode::Text(text) => out.push_str(&escape_html(text)),
        UiNode::Html(html) => out.push_str(html),
        UiNode::Element {
            tag,
            id,
            role,
            style,
            children,
        } => {
            out.push('<');
            out.push_str(tag);
            if let Some(id) = id {
                out.push_str(&format!(" id=\"{}\"", escape_html(id)));
            }
            if let Some(role) = role {
                out.push_str(&format!(" data-role=\"{}\"", role_attr(*role)));
            }
            if let Some(style) = style {
                out.push_str(&format!(" style=\"{}\"", style));
            }
            if *tag == "button" {
                out.push_str(" type=\"button\" aria-label=\"Close\"");
            }
            out.push('>');
            for child in children {
                write_node(out, child);
            }
            out.push_str(&format!("</{}>", tag));
        }
    }
}

/// Dismissal wiring for a rendered overlay: close button, click outside the panel, and a
/// one-shot Escape listener.
pub const DISMISS_SCRIPT: &str = r#"<script>
(function () {
  var overlay = document.getElementById("agreement-lens-overlay");
  if (!overlay) return;
  function onKey(e) { if (e.key === "Escape") close(); }
  function close() {
    overlay.remove();
    document.removeEventListener("keydown", onKey);
  }
  overlay.querySelector('[data-role="close"]').addEventListener("click", close);
  overlay.addEventListener("click", function (e) { if (e.target === overlay) close(); });
  document.addEventListener("keydown", onKey);
})();
</script>"#;
