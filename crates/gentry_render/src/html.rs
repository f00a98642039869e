//! HTML box layout.

use gentry_tree::Node;
use tracing::debug;

use crate::{RenderConfig, RenderError, Renderer, display_value};

const PROLOG: &str = r#"<html>
<head><title>Tree</title></head>
<style>
.column, .group, .outercontainer, .parent, .leaf, .properties { display:flex; flex-direction:column;}
.children, .groupitems, .property { display: flex; flex-direction:row; align-items:stretch;}
.children {border-top: black solid 1pt;}
.parent {border-left: black solid 1pt; font-weight:bold;}
.outercontainer { width:fit-content;}
.leaf, .parent {padding: 0.5em;}
.leaf {font-weight: bold;}
.leaf:last-of-type { padding-right: 1em;}
.groupname {padding: 0.2em; font-size:8pt;}
.group { background: #b8b8b8; background: linear-gradient(90deg, rgb(230 230 230) 0%, rgb(237 237 237) 25%, rgba(255, 255, 255, 1) 100%);}
.key { padding-right:1em; }
</style>
<body><div class="outercontainer">
"#;

const EPILOG: &str = "</div></body>\n</html>";

/// Renders a tree as nested flex boxes: each parent above a row of its
/// groups, each group a labelled row of its children.
#[derive(Debug, Clone, Default)]
pub struct HtmlLayout {
    config: RenderConfig,
}

impl HtmlLayout {
    /// Creates a layout with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a layout with the given configuration.
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Renders the box markup of `node` without the page around it.
    pub fn render_box(&self, node: &Node) -> String {
        let name = escape(&node.label);
        let props = self.properties(node);

        if node.is_leaf() {
            return format!(
                "<div class=\"leaf\"><div class=\"nodename\">{name}</div>{props}</div>\n"
            );
        }

        let mut groups = String::new();
        for (group, children) in node.children() {
            let items: String = children.iter().map(|child| self.render_box(child)).collect();
            groups.push_str(&format!(
                "<div class=\"group\">\n<div class=\"groupname\">{}</div>\n<div class=\"groupitems\">{items}</div>\n</div>\n",
                escape(group)
            ));
        }

        format!(
            "<div class=\"column\">\n<div class=\"parent\"><div class=\"nodename\">{name}</div>{props}</div>\n<div class=\"children\">{groups}</div>\n</div>"
        )
    }

    fn properties(&self, node: &Node) -> String {
        if !self.config.appearance(node.kind()).include_properties {
            return String::new();
        }

        let rows: String = node
            .properties
            .iter()
            .map(|(key, value)| {
                format!(
                    "<div class=\"property\"><div class=\"key\">{}</div><div class=\"value\">{}</div></div>",
                    escape(key),
                    escape(&display_value(value))
                )
            })
            .collect();
        format!("<div class=\"properties\">{rows}</div>")
    }
}

impl Renderer for HtmlLayout {
    fn render(&self, root: &Node) -> Result<String, RenderError> {
        debug!(root = %root, "Rendering HTML layout");
        Ok(format!("{PROLOG}{}{EPILOG}", self.render_box(root)))
    }
}

/// Escapes text for HTML element content.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
