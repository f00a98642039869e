//! Renderer configuration.
//!
//! Appearance can be set globally and overridden per node kind. Overrides are
//! looked up along the node kind's lineage, so a kind without its own entry
//! picks up the settings of the kind it extends.

use std::fmt;
use std::fs;
use std::path::Path;

use gentry_tree::NodeKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::RenderError;

/// Mermaid node shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Rounded,
    Subprocess,
    Rect,
    Stadium,
    Cyl,
    Circle,
    Odd,
    Diamond,
    Hex,
    Braces,
    Doc,
    Delay,
    Tri,
    Docs,
    Processes,
    Flag,
    None,
}

impl Shape {
    /// Returns the Mermaid shape keyword.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Shape::Rounded => "rounded",
            Shape::Subprocess => "subprocess",
            Shape::Rect => "rect",
            Shape::Stadium => "stadium",
            Shape::Cyl => "cyl",
            Shape::Circle => "circle",
            Shape::Odd => "odd",
            Shape::Diamond => "diamond",
            Shape::Hex => "hex",
            Shape::Braces => "braces",
            Shape::Doc => "doc",
            Shape::Delay => "delay",
            Shape::Tri => "tri",
            Shape::Docs => "docs",
            Shape::Processes => "processes",
            Shape::Flag => "flag",
            Shape::None => "none",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mermaid class styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    #[default]
    None,
    Keyword,
    Loop,
    Function,
    Constant,
    Operator,
    Variable,
    Choice,
    SubgraphEven,
    SubgraphOdd,
}

impl Style {
    /// Styles that get a `classDef`, in emission order.
    pub const DEFINED: [Style; 8] = [
        Style::Keyword,
        Style::Function,
        Style::Loop,
        Style::Operator,
        Style::Constant,
        Style::Variable,
        Style::SubgraphEven,
        Style::SubgraphOdd,
    ];

    /// Returns the Mermaid class name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Style::None => "none",
            Style::Keyword => "keyword",
            Style::Loop => "loop",
            Style::Function => "function",
            Style::Constant => "constant",
            Style::Operator => "operator",
            Style::Variable => "variable",
            Style::Choice => "choice",
            Style::SubgraphEven => "subgraph_even",
            Style::SubgraphOdd => "subgraph_odd",
        }
    }

    /// Returns the `classDef` body, if the style defines one.
    pub const fn definition(&self) -> Option<&'static str> {
        match self {
            Style::Keyword => Some("fill:#dFd"),
            Style::Function => {
                Some("fill:#bff,font-size:20px,stroke-width:2px,font-weight:bold")
            }
            Style::Loop => Some("fill:#fdd"),
            Style::Operator => Some("font-weight:bold,font-size:20px"),
            Style::Constant => Some("color:#3a3"),
            Style::Variable => Some("color:#a33"),
            Style::SubgraphEven => Some("fill:#eff"),
            Style::SubgraphOdd => Some("fill:#eee"),
            Style::None | Style::Choice => None,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-kind appearance overrides. Unset fields fall through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindAppearance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_properties: Option<bool>,
}

/// Fully resolved appearance of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub shape: Shape,
    pub style: Style,
    pub include_properties: bool,
}

/// Configuration shared by the renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Whether node properties are rendered.
    pub include_properties: bool,

    /// Default node shape.
    pub shape: Shape,

    /// Default node style.
    pub style: Style,

    /// Overrides keyed by kind name.
    pub kinds: IndexMap<String, KindAppearance>,
}

impl RenderConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        serde_json::from_str(json)
            .map_err(|e| RenderError::config(format!("Invalid config: {}", e)))
    }

    /// Sets the default for property rendering.
    pub fn with_properties(mut self, include: bool) -> Self {
        self.include_properties = include;
        self
    }

    /// Adds or replaces the override for one kind.
    pub fn with_kind(mut self, kind: impl Into<String>, appearance: KindAppearance) -> Self {
        self.kinds.insert(kind.into(), appearance);
        self
    }

    /// Resolves the appearance of a node of `kind`.
    pub fn appearance(&self, kind: &NodeKind) -> Appearance {
        let overrides: Vec<&KindAppearance> = kind
            .lineage()
            .filter_map(|k| self.kinds.get(k.name()))
            .collect();

        let shape = overrides
            .iter()
            .find_map(|a| a.shape)
            .unwrap_or(self.shape);
        let style = overrides
            .iter()
            .find_map(|a| a.style)
            .unwrap_or(self.style);
        let include_properties = overrides
            .iter()
            .find_map(|a| a.include_properties)
            .unwrap_or(self.include_properties);

        Appearance {
            shape,
            style,
            include_properties,
        }
    }
}
