//! Mermaid flowchart markup.
//!
//! The output is a fenced `mermaid` block containing a top-down graph. Each
//! group of a parent becomes a subgraph linked from the parent, and leaves are
//! emitted inside the subgraph of their group.

use gentry_tree::Node;
use tracing::debug;

use crate::{Appearance, RenderConfig, RenderError, Renderer, Shape, Style, display_value};

const INDENT: &str = "    ";

/// Renders a tree as a Mermaid `graph TD` block.
#[derive(Debug, Clone, Default)]
pub struct Mermaid {
    config: RenderConfig,
}

impl Mermaid {
    /// Creates a renderer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer with the given configuration.
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl Renderer for Mermaid {
    fn render(&self, root: &Node) -> Result<String, RenderError> {
        debug!(root = %root, "Rendering Mermaid graph");

        let class_defs = Style::DEFINED
            .iter()
            .filter_map(|style| {
                style
                    .definition()
                    .map(|definition| format!("classDef {style} {definition}"))
            })
            .collect::<Vec<_>>()
            .join("\n\t");

        let mut writer = Writer {
            config: &self.config,
            nodes: 0,
            subgraphs: 0,
        };
        let id = writer.next_node();
        let body = writer.node(root, 0, id);

        Ok(format!("```mermaid\ngraph TD\n\t{class_defs}\n\n{body}\n```"))
    }
}

/// Escapes labels Mermaid would otherwise read as list or operator markup.
pub fn mermaid_safe(name: &str) -> String {
    if name.starts_with(['-', '+', '*']) {
        format!("\\\\{name}")
    } else {
        name.to_string()
    }
}

/// State of one render. Node and subgraph ids are unique within it.
struct Writer<'c> {
    config: &'c RenderConfig,
    nodes: usize,
    subgraphs: usize,
}

impl Writer<'_> {
    fn next_node(&mut self) -> usize {
        self.nodes += 1;
        self.nodes - 1
    }

    fn next_subgraph(&mut self) -> usize {
        self.subgraphs += 1;
        self.subgraphs - 1
    }

    fn node(&mut self, node: &Node, depth: usize, id: usize) -> String {
        let declaration = self.declaration(node, id);
        if node.is_leaf() {
            return declaration;
        }

        let indent = INDENT.repeat(depth + 1);
        let subgraph_style = if depth % 2 == 1 {
            Style::SubgraphEven
        } else {
            Style::SubgraphOdd
        };

        let mut parts = Vec::new();
        for (group, children) in node.children() {
            let group_id = format!("subgraph{}", self.next_subgraph());
            parts.push(format!(
                "{indent}{group_id}:::{subgraph_style}\n\
                 {indent}{declaration} --> {group_id}\n\
                 {indent}subgraph {group_id}[{group}]\n\
                 {indent}        direction TB\n"
            ));

            for child in children {
                let child_id = self.next_node();
                if child.is_leaf() {
                    parts.push(format!("{indent}{}", self.declaration(child, child_id)));
                } else {
                    parts.push(self.node(child, depth + 1, child_id));
                }
            }

            parts.push(format!("{indent}end"));
        }

        parts.join("\n")
    }

    fn declaration(&self, node: &Node, id: usize) -> String {
        let Appearance {
            shape,
            style,
            include_properties,
        } = self.config.appearance(node.kind());

        let mut label = if node.label.is_empty() {
            node.kind_name().to_string()
        } else {
            node.label.clone()
        };
        if include_properties {
            let props: Vec<String> = node
                .properties
                .iter()
                .map(|(key, value)| format!("{key}={}", display_value(value)))
                .collect();
            label.push_str(&format!("\\n({})", props.join(",\\n")));
        }

        let class = match style {
            Style::None => String::new(),
            style => format!(":::{style}"),
        };
        let shape = match shape {
            Shape::None => Shape::Rounded,
            shape => shape,
        };

        format!(
            "{}{id}{class}@{{shape: {shape}, label: \"{}\"}}",
            node.kind_name(),
            mermaid_safe(&label).replace('"', "#quot;")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KindAppearance;
    use gentry_tree::NodeKind;
    use pretty_assertions::assert_eq;

    fn dummy() -> NodeKind {
        NodeKind::builder("DummyNode").build().unwrap()
    }

    #[test]
    fn test_simple() {
        let result = Mermaid::new().render(&Node::of(&dummy(), "A")).unwrap();
        assert!(result.starts_with("```mermaid\ngraph TD\n"));
        assert!(result.contains(r#"DummyNode0@{shape: rounded, label: "A"}"#));
        assert!(result.ends_with("\n```"));
    }

    #[test]
    fn test_class_defs() {
        let result = Mermaid::new().render(&Node::new("A")).unwrap();
        assert!(result.contains("\tclassDef keyword fill:#dFd\n"));
        assert!(result.contains("classDef subgraph_odd fill:#eee"));
        assert!(!result.contains("classDef none"));
        assert!(!result.contains("classDef choice"));
    }

    #[test]
    fn test_with_properties() {
        let node = Node::of(&dummy(), "B").with_properties([("x", 1), ("y", 2)]);
        let result = Mermaid::with_config(RenderConfig::new().with_properties(true))
            .render(&node)
            .unwrap();
        assert!(result.contains("x=1"));
        assert!(result.contains("y=2"));
        assert!(result.contains(r#"label: "B\n(x=1,\ny=2)""#));
    }

    #[test]
    fn test_with_children() {
        let node = Node::of(&dummy(), "parent")
            .with_group("group", vec![Node::of(&dummy(), "child")]);
        let result = Mermaid::new().render(&node).unwrap();

        assert!(result.contains("parent"));
        assert!(result.contains("child"));
        assert!(result.contains("subgraph subgraph0[group]"));
        assert!(result.contains("    subgraph0:::subgraph_odd\n"));
        assert!(result.contains(
            r#"    DummyNode0@{shape: rounded, label: "parent"} --> subgraph0"#
        ));
        assert!(result.contains(r#"    DummyNode1@{shape: rounded, label: "child"}"#));
        assert!(result.contains("    end"));
    }

    #[test]
    fn test_nested_subgraph_style_alternates_and_ids_unique() {
        let kind = dummy();
        let mid1 = Node::of(&kind, "mid1").with_group("kids", vec![Node::of(&kind, "a")]);
        let mid2 = Node::of(&kind, "mid2").with_group("kids", vec![Node::of(&kind, "b")]);
        let root = Node::of(&kind, "root").with_group("kids", vec![mid1, mid2]);

        let result = Mermaid::new().render(&root).unwrap();
        assert!(result.contains("    subgraph0:::subgraph_odd\n"));
        assert!(result.contains("        subgraph1:::subgraph_even\n"));
        assert!(result.contains("        subgraph2:::subgraph_even\n"));
        assert!(result.contains(r#"DummyNode1@{shape: rounded, label: "mid1"}"#));
        assert!(result.contains(r#"DummyNode2@{shape: rounded, label: "a"}"#));
        assert!(result.contains(r#"DummyNode3@{shape: rounded, label: "mid2"}"#));
        assert!(result.contains(r#"DummyNode4@{shape: rounded, label: "b"}"#));
    }

    #[test]
    fn test_styles_and_shapes() {
        let kind = dummy();
        let config = RenderConfig::new().with_kind(
            "DummyNode",
            KindAppearance {
                shape: Some(Shape::Circle),
                style: Some(Style::Function),
                include_properties: None,
            },
        );
        let result = Mermaid::with_config(config)
            .render(&Node::of(&kind, "C"))
            .unwrap();
        assert!(result.contains("shape: circle"));
        assert!(result.contains(r#"DummyNode0:::function@{shape: circle, label: "C"}"#));
    }

    #[test]
    fn test_shape_none_falls_back_to_rounded() {
        let config = RenderConfig {
            shape: Shape::None,
            ..Default::default()
        };
        let result = Mermaid::with_config(config).render(&Node::new("A")).unwrap();
        assert!(result.contains("shape: rounded"));
    }

    #[test]
    fn test_empty_label_uses_kind_name() {
        let result = Mermaid::new().render(&Node::of(&dummy(), "")).unwrap();
        assert!(result.contains(r#"label: "DummyNode""#));
    }

    #[test]
    fn test_mermaid_safe_escapes() {
        assert_eq!(mermaid_safe("-foo"), "\\\\-foo");
        assert_eq!(mermaid_safe("+bar"), "\\\\+bar");
        assert_eq!(mermaid_safe("*baz"), "\\\\*baz");
        assert_eq!(mermaid_safe("baz"), "baz");
        assert_eq!(mermaid_safe(""), "");
    }

    #[test]
    fn test_quotes_in_label() {
        let result = Mermaid::new().render(&Node::new(r#"say "hi""#)).unwrap();
        assert!(result.contains("label: \"say #quot;hi#quot;\""));
    }
}
