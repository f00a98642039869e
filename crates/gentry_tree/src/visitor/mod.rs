//! Bottom-up traversal with per-kind dispatch.
//!
//! # Overview
//!
//! - [`Visitor`] - a visitor class: lineage of class names plus handler registry
//! - [`VisitorRun`] - one traversal with its strictness flag and last result
//! - [`VisitOutput`] - nested result mirroring the shape of the tree
//!
//! Children are visited before their parent, group by group in insertion
//! order and within a group in sequence order.
//!
//! # Examples
//!
//! ## Generic fallback with one override
//!
//! ```rust
//! use gentry_tree::{Node, NodeKind, Visitor};
//!
//! let family = NodeKind::define("Family", ["members"]).unwrap();
//! let person = NodeKind::define("Person", ["children"]).unwrap();
//!
//! let root = Node::of(&family, "The Andersons")
//!     .with_group("members", vec![Node::of(&person, "Anna")]);
//!
//! let names = Visitor::new("Names")
//!     .generic(|node: &Node| node.label.clone())
//!     .specific("Family", |node: &Node| format!("family {}", node.label));
//!
//! let output = names.visit(&root).unwrap();
//! assert_eq!(output.value, "family The Andersons");
//! assert_eq!(output.group("members")[0].value, "Anna");
//! ```
//!
//! ## Strict mode
//!
//! ```rust
//! use gentry_tree::{Node, TreeError, Visitor};
//!
//! let visitor = Visitor::new("Validator").generic(|_: &Node| true);
//! let root = Node::new("root");
//!
//! let result = visitor.run(&root).strict(true).into_result();
//! assert!(matches!(result, Err(TreeError::DispatchNotFound { .. })));
//! ```

mod output;
mod registry;
mod run;

pub use output::VisitOutput;
pub use registry::{Handler, Visitor, handler_name};
pub use run::VisitorRun;
