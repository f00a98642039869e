//! Node definition and group redirection.
//!
//! Every node stores its children in a single ordered map from group name to
//! child sequence. Generic tools (visitors, renderers) only ever look at that
//! map, while the groups declared on a node's [`NodeKind`] can additionally be
//! reached by name through [`Node::get_group`] and [`Node::set_group`].

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::{NodeKind, TreeError};

/// Opaque per-node payload. Never traversed.
pub type Properties = IndexMap<String, Value>;

/// Grouped children, keyed by group name in insertion order.
pub type Children = IndexMap<String, Vec<Node>>;

/// A value assigned through [`Node::set_group`].
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// A sequence of nodes.
    Nodes(Vec<Node>),
    /// Any other value.
    Value(Value),
}

impl Attribute {
    fn describe(&self) -> String {
        match self {
            Attribute::Nodes(_) => "list".to_string(),
            Attribute::Value(value) => value_type_name(value).to_string(),
        }
    }
}

impl From<Vec<Node>> for Attribute {
    fn from(nodes: Vec<Node>) -> Self {
        Attribute::Nodes(nodes)
    }
}

impl From<Value> for Attribute {
    fn from(value: Value) -> Self {
        Attribute::Value(value)
    }
}

/// A borrowed attribute, as returned by [`Node::attribute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeRef<'a> {
    /// The node label.
    Label(&'a str),
    /// The node properties.
    Properties(&'a Properties),
    /// A declared group or an ordinary attribute holding nodes.
    Nodes(&'a [Node]),
    /// An ordinary attribute.
    Value(&'a Value),
}

/// A labelled tree element with grouped children and opaque properties.
///
/// Children are owned. Placing the same subtree under two parents means
/// cloning it; the tree model has no way to express cycles.
///
/// # Example
///
/// ```rust
/// use gentry_tree::{Node, NodeKind};
///
/// let kind = NodeKind::define("MyTree", ["left", "right"]).unwrap();
/// let mut root = Node::of(&kind, "root");
///
/// root.get_group("left").unwrap().push(Node::of(&kind, "l"));
/// root.set_group("right", vec![Node::of(&kind, "r")]).unwrap();
///
/// assert_eq!(root.group("left").unwrap()[0].label, "l");
/// assert!(!root.is_leaf());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,

    /// Display name, not necessarily unique.
    pub label: String,

    children: Children,

    /// Arbitrary payload.
    pub properties: Properties,

    attributes: IndexMap<String, Attribute>,
}

impl Node {
    /// Creates a node of the built-in `Tree` kind.
    pub fn new(label: impl Into<String>) -> Self {
        Self::of(&NodeKind::tree(), label)
    }

    /// Creates a node of the given kind.
    pub fn of(kind: &NodeKind, label: impl Into<String>) -> Self {
        Self {
            kind: kind.clone(),
            label: label.into(),
            children: Children::new(),
            properties: Properties::new(),
            attributes: IndexMap::new(),
        }
    }

    /// Adds initial children. Group names are not restricted to the kind's
    /// declared groups.
    pub fn with_children<I, K>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<Node>)>,
        K: Into<String>,
    {
        self.children
            .extend(children.into_iter().map(|(group, nodes)| (group.into(), nodes)));
        self
    }

    /// Adds a single initial group.
    pub fn with_group(self, group: impl Into<String>, nodes: Vec<Node>) -> Self {
        self.with_children([(group, nodes)])
    }

    /// Adds initial properties.
    pub fn with_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.properties.extend(
            properties
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        self
    }

    /// Returns the kind of this node.
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the kind name, used for dispatch and rendering.
    #[inline]
    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    /// Returns all grouped children.
    #[inline]
    pub fn children(&self) -> &Children {
        &self.children
    }

    /// Returns all grouped children for modification.
    #[inline]
    pub fn children_mut(&mut self) -> &mut Children {
        &mut self.children
    }

    /// Returns true if no group holds any child.
    pub fn is_leaf(&self) -> bool {
        self.children.values().all(Vec::is_empty)
    }

    /// Returns the stored sequence of a declared group, creating it on first
    /// access. Changes made through the returned reference are visible to
    /// every later reader of the group.
    pub fn get_group(&mut self, name: &str) -> Result<&mut Vec<Node>, TreeError> {
        if !self.kind.has_group(name) {
            return Err(TreeError::attribute_not_found(name, &*self));
        }
        Ok(self.children.entry(name.to_string()).or_default())
    }

    /// Returns the children of a declared group without creating an entry.
    pub fn group(&self, name: &str) -> Result<&[Node], TreeError> {
        if !self.kind.has_group(name) {
            return Err(TreeError::attribute_not_found(name, self));
        }
        Ok(self.children.get(name).map_or(&[][..], Vec::as_slice))
    }

    /// Assigns an attribute.
    ///
    /// - declared group: `value` must be a node sequence and replaces the group
    /// - `label`: `value` must be a string
    /// - `properties`: `value` must be an object
    /// - anything else is stored as an ordinary attribute
    pub fn set_group(&mut self, name: &str, value: impl Into<Attribute>) -> Result<(), TreeError> {
        let value = value.into();

        if self.kind.has_group(name) {
            return match value {
                Attribute::Nodes(nodes) => {
                    self.children.insert(name.to_string(), nodes);
                    Ok(())
                }
                other => Err(TreeError::type_mismatch(name, "list", other.describe())),
            };
        }

        match (name, value) {
            ("label", Attribute::Value(Value::String(label))) => self.label = label,
            ("label", other) => {
                return Err(TreeError::type_mismatch(name, "str", other.describe()));
            }
            ("properties", Attribute::Value(Value::Object(map))) => {
                self.properties = map.into_iter().collect();
            }
            ("properties", other) => {
                return Err(TreeError::type_mismatch(name, "dict", other.describe()));
            }
            (_, value) => {
                self.attributes.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    /// Reads an attribute: the label, the properties, a declared group or an
    /// ordinary attribute, in that order.
    pub fn attribute(&self, name: &str) -> Result<AttributeRef<'_>, TreeError> {
        match name {
            "label" => return Ok(AttributeRef::Label(&self.label)),
            "properties" => return Ok(AttributeRef::Properties(&self.properties)),
            _ => {}
        }

        if self.kind.has_group(name) {
            return self.group(name).map(AttributeRef::Nodes);
        }

        match self.attributes.get(name) {
            Some(Attribute::Nodes(nodes)) => Ok(AttributeRef::Nodes(nodes)),
            Some(Attribute::Value(value)) => Ok(AttributeRef::Value(value)),
            None => Err(TreeError::attribute_not_found(name, self)),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(label={}, groups={{", self.kind.name(), self.label)?;
        for (i, group) in self.kind.groups().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(group)?;
        }
        f.write_str("})")
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let has_properties = !self.properties.is_empty();
        let has_children = !self.children.is_empty();

        let mut len = 2; // type, label
        if has_properties {
            len += 1;
        }
        if has_children {
            len += 1;
        }

        let mut state = serializer.serialize_struct("Node", len)?;
        state.serialize_field("type", self.kind.name())?;
        state.serialize_field("label", &self.label)?;
        if has_properties {
            state.serialize_field("properties", &self.properties)?;
        }
        if has_children {
            state.serialize_field("children", &self.children)?;
        }
        state.end()
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "array",
        Value::Object(_) => "dict",
    }
}
