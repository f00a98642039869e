//! # gentry_tree
//!
//! Generic tree with declared child groups and visitor dispatch.
//!
//! ## Architecture
//!
//! - [`NodeKind`] is the dynamic type of a node: a name, a set of declared
//!   group names validated once at definition time, and the kind it extends
//! - [`Node`] stores a label, grouped ordered children and opaque properties;
//!   declared groups are reachable by name through [`Node::get_group`] and
//!   [`Node::set_group`]
//! - [`Visitor`] walks a tree bottom-up, resolving a handler per node through
//!   an explicit registry instead of reflection
//! - [`Count`] is the minimal concrete visitor and the template for others
//!
//! ## Example
//!
//! ```rust
//! use gentry_tree::{Count, Node, NodeKind};
//!
//! let kind = NodeKind::define("A", ["left", "right"]).unwrap();
//!
//! let mut root = Node::of(&kind, "root");
//! root.get_group("left").unwrap().push(Node::of(&kind, "left"));
//! root.set_group("right", vec![Node::of(&kind, "right")]).unwrap();
//!
//! assert_eq!(Count::new().count(&root).unwrap(), 3);
//! ```

mod count;
mod error;
mod kind;
mod node;
pub mod visitor;

pub use count::{Count, sum_numeric};
pub use error::TreeError;
pub use kind::{CHILDREN_KEY, INTERNAL_PREFIX, KindBuilder, NodeKind, RESERVED_NAMES, TREE_KIND, is_identifier};
pub use node::{Attribute, AttributeRef, Children, Node, Properties};

// Re-export commonly used visitor items for convenience
pub use visitor::{VisitOutput, Visitor, VisitorRun};
