//! JSON dump of a tree.

use gentry_tree::Node;
use tracing::debug;

use crate::{RenderError, Renderer};

/// Serializes a tree as JSON: `type`, `label`, and `properties` and
/// `children` when non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables indented output.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, root: &Node) -> Result<String, RenderError> {
        debug!(root = %root, pretty = self.pretty, "Rendering JSON");
        let json = if self.pretty {
            serde_json::to_string_pretty(root)?
        } else {
            serde_json::to_string(root)?
        };
        Ok(json)
    }
}
