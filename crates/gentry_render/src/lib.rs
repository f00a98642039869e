//! # gentry_render
//!
//! Renderers for [`gentry_tree`] trees.
//!
//! Renderers only rely on the public tree surface: a node's label, its kind,
//! its properties and its ordered map of child groups. They never dispatch on
//! node kinds, so any tree can be rendered.
//!
//! - [`HtmlLayout`] produces a standalone HTML page of nested boxes
//! - [`Mermaid`] produces a Mermaid flowchart with one subgraph per group
//! - [`JsonRenderer`] dumps the tree as JSON
//!
//! ## Example
//!
//! ```rust
//! use gentry_render::{Mermaid, Renderer};
//! use gentry_tree::Node;
//!
//! let root = Node::new("root").with_group("kids", vec![Node::new("leaf")]);
//! let graph = Mermaid::new().render(&root).unwrap();
//! assert!(graph.contains("subgraph subgraph0[kids]"));
//! ```

mod config;
mod error;
mod html;
mod json;
mod mermaid;

use gentry_tree::Node;
use serde_json::Value;

pub use config::{Appearance, KindAppearance, RenderConfig, Shape, Style};
pub use error::RenderError;
pub use html::HtmlLayout;
pub use json::JsonRenderer;
pub use mermaid::{Mermaid, mermaid_safe};

/// Turns a tree into text.
pub trait Renderer {
    /// Renders the tree rooted at `root`.
    fn render(&self, root: &Node) -> Result<String, RenderError>;
}

/// Formats a property value for display. Strings appear without quotes.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("ELO 2235")), "ELO 2235");
        assert_eq!(display_value(&json!(2023)), "2023");
        assert_eq!(display_value(&json!(1.5)), "1.5");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!(null)), "null");
    }

    #[test]
    fn test_renderers_are_interchangeable() {
        let renderers: Vec<Box<dyn Renderer>> = vec![
            Box::new(HtmlLayout::new()),
            Box::new(Mermaid::new()),
            Box::new(JsonRenderer::new()),
        ];
        let root = Node::new("root").with_group("kids", vec![Node::new("leaf")]);
        for renderer in &renderers {
            let text = renderer.render(&root).unwrap();
            assert!(text.contains("root"));
            assert!(text.contains("leaf"));
        }
    }
}
