//! Visitor classes and handler resolution.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::{Node, TreeError};

use super::VisitorRun;

/// A per-node handler.
pub type Handler<T> = Arc<dyn Fn(&Node) -> T + Send + Sync>;

/// Registry key: the class a handler belongs to and, for specific handlers,
/// the exact kind name it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HandlerKey {
    class: String,
    kind: Option<String>,
}

/// A visitor class: a lineage of class names plus a handler registry.
///
/// Handlers are registered under a class name, either for one exact node
/// kind ("specific") or for any kind ("generic"). A derived class starts from
/// a copy of its parent's registry and may override single entries.
///
/// # Dispatch
///
/// For a node of kind `K`, each class `A` in the lineage is tried, most
/// derived first:
///
/// 1. the specific handler `(A, K)`, if registered
/// 2. otherwise, unless strict, the generic handler of `A`, if registered
///
/// Only the exact kind name is looked up. A node whose kind derives from a
/// kind with a specific handler does not use that handler.
///
/// # Example
///
/// ```rust
/// use gentry_tree::{Node, Visitor};
///
/// let labels = Visitor::new("Labels").generic(|node: &Node| node.label.clone());
/// let output = labels.visit(&Node::new("root")).unwrap();
/// assert_eq!(output.value, "root");
/// ```
pub struct Visitor<T> {
    name: String,
    lineage: Vec<String>,
    handlers: HashMap<HandlerKey, Handler<T>>,
}

impl<T> Visitor<T> {
    /// Creates a root visitor class.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            lineage: vec![name.to_lowercase()],
            name,
            handlers: HashMap::new(),
        }
    }

    /// Creates a subclass inheriting every handler of this class.
    pub fn derive(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        let mut lineage = Vec::with_capacity(self.lineage.len() + 1);
        lineage.push(name.to_lowercase());
        lineage.extend(self.lineage.iter().cloned());
        Self {
            name,
            lineage,
            handlers: self.handlers.clone(),
        }
    }

    /// Returns the class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the lower-cased class names, most derived first.
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// Registers the generic handler of this class.
    pub fn generic<F>(self, handler: F) -> Self
    where
        F: Fn(&Node) -> T + Send + Sync + 'static,
    {
        let class = self.lineage[0].clone();
        self.register(class, None, Arc::new(handler))
    }

    /// Registers a handler for one node kind on this class.
    pub fn specific<F>(self, kind: &str, handler: F) -> Self
    where
        F: Fn(&Node) -> T + Send + Sync + 'static,
    {
        let class = self.lineage[0].clone();
        self.register(class, Some(kind.to_string()), Arc::new(handler))
    }

    /// Registers (or overrides) the generic handler of an ancestor class.
    pub fn generic_in<F>(self, class: &str, handler: F) -> Self
    where
        F: Fn(&Node) -> T + Send + Sync + 'static,
    {
        self.register(class.to_lowercase(), None, Arc::new(handler))
    }

    /// Registers (or overrides) a kind handler under an ancestor class.
    ///
    /// This is how a subclass of `Count` replaces `count_Family`.
    pub fn specific_in<F>(self, class: &str, kind: &str, handler: F) -> Self
    where
        F: Fn(&Node) -> T + Send + Sync + 'static,
    {
        self.register(class.to_lowercase(), Some(kind.to_string()), Arc::new(handler))
    }

    fn register(mut self, class: String, kind: Option<String>, handler: Handler<T>) -> Self {
        if !self.lineage.contains(&class) {
            warn!(
                visitor = %self.name,
                %class,
                "Handler registered under a class outside the visitor lineage is unreachable"
            );
        }
        self.handlers.insert(HandlerKey { class, kind }, handler);
        self
    }

    /// Resolves the handler for a node.
    pub fn handler_for(&self, node: &Node, strict: bool) -> Result<&Handler<T>, TreeError> {
        let kind = node.kind_name();

        for class in &self.lineage {
            let specific = HandlerKey {
                class: class.clone(),
                kind: Some(kind.to_string()),
            };
            if let Some(handler) = self.handlers.get(&specific) {
                trace!(visitor = %self.name, handler = %handler_name(class, Some(kind)), "Resolved handler");
                return Ok(handler);
            }

            if strict {
                continue;
            }

            let generic = HandlerKey {
                class: class.clone(),
                kind: None,
            };
            if let Some(handler) = self.handlers.get(&generic) {
                trace!(visitor = %self.name, handler = %handler_name(class, None), %kind, "Resolved handler");
                return Ok(handler);
            }
        }

        let class = &self.lineage[0];
        Err(TreeError::DispatchNotFound {
            visitor: self.name.clone(),
            specific: handler_name(class, Some(kind)),
            generic: handler_name(class, None),
            kind: kind.to_string(),
        })
    }

    /// Starts a traversal rooted at `root`.
    pub fn run<'v, 'n>(&'v self, root: &'n Node) -> VisitorRun<'v, 'n, T> {
        VisitorRun::new(self, root)
    }

    /// Visits `root` in non-strict mode and returns the output.
    pub fn visit(&self, root: &Node) -> Result<super::VisitOutput<T>, TreeError> {
        self.run(root).into_result()
    }
}

impl<T> Clone for Visitor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            lineage: self.lineage.clone(),
            handlers: self.handlers.clone(),
        }
    }
}

impl<T> fmt::Debug for Visitor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<String> = self
            .handlers
            .keys()
            .map(|key| handler_name(&key.class, key.kind.as_deref()))
            .collect();
        handlers.sort();

        f.debug_struct("Visitor")
            .field("name", &self.name)
            .field("lineage", &self.lineage)
            .field("handlers", &handlers)
            .finish()
    }
}

/// Formats a handler name: `class` for generic handlers, `class_Kind` for
/// kind-specific ones.
pub fn handler_name(class: &str, kind: Option<&str>) -> String {
    match kind {
        Some(kind) => format!("{class}_{kind}"),
        None => class.to_string(),
    }
}
