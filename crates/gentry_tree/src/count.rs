//! Node counting, the reference concrete visitor.
//!
//! `Count` registers a single generic handler returning 1. Visitors derived
//! from it can override the handler for one kind to change that node's own
//! contribution; the contributions of its descendants are unaffected.
//!
//! ```rust
//! use gentry_tree::{Count, Node, NodeKind};
//!
//! let family = NodeKind::define("Family", ["members"]).unwrap();
//! let root = Node::of(&family, "The Andersons")
//!     .with_group("members", vec![Node::new("Anna"), Node::new("Bob")]);
//!
//! assert_eq!(Count::new().count(&root).unwrap(), 3);
//!
//! let persons_only = Count::visitor()
//!     .derive("FamilyCount")
//!     .specific_in(Count::CLASS, "Family", |_| 0);
//! assert_eq!(Count::with_visitor(persons_only).count(&root).unwrap(), 2);
//! ```

use serde_json::Value;

use crate::{Node, TreeError, Visitor};

/// Counts the nodes of a tree.
#[derive(Debug, Clone)]
pub struct Count {
    visitor: Visitor<i64>,
    strict: bool,
}

impl Count {
    /// Class name of the base counting visitor.
    pub const CLASS: &'static str = "Count";

    /// Creates the standard counter.
    pub fn new() -> Self {
        Self::with_visitor(Self::visitor())
    }

    /// Returns the base visitor class, to derive specialised counters from.
    pub fn visitor() -> Visitor<i64> {
        Visitor::new(Self::CLASS).generic(|_: &Node| 1)
    }

    /// Creates a counter using a derived visitor.
    pub fn with_visitor(visitor: Visitor<i64>) -> Self {
        Self {
            visitor,
            strict: false,
        }
    }

    /// Sets strict dispatch.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Counts the nodes under `root`, including `root`.
    pub fn count(&self, root: &Node) -> Result<i64, TreeError> {
        let output = self.visitor.run(root).strict(self.strict).into_result()?;
        sum_numeric(&output.to_value()?)
    }
}

impl Default for Count {
    fn default() -> Self {
        Self::new()
    }
}

/// Sums every integer found in a nested structure of objects and arrays.
///
/// Any other value (strings, booleans, null, fractional numbers) contributes
/// zero. Fails with [`TreeError::Overflow`] if an integer or a partial sum
/// does not fit in an `i64`.
pub fn sum_numeric(value: &Value) -> Result<i64, TreeError> {
    match value {
        Value::Object(map) => checked_sum(map.values()),
        Value::Array(items) => checked_sum(items.iter()),
        Value::Number(n) => match n.as_i64() {
            Some(v) => Ok(v),
            None if n.is_u64() => Err(TreeError::overflow(n)),
            None => Ok(0),
        },
        _ => Ok(0),
    }
}

fn checked_sum<'a>(mut values: impl Iterator<Item = &'a Value>) -> Result<i64, TreeError> {
    values.try_fold(0i64, |total, value| {
        total
            .checked_add(sum_numeric(value)?)
            .ok_or_else(|| TreeError::overflow(value))
    })
}
