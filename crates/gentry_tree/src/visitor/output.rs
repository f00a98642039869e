//! Nested visit results.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::{CHILDREN_KEY, TreeError};

/// The result of visiting one node, with the results of its children.
///
/// Serializes as `{"<Kind>": value, "children": {"<group>": [..]}}`, the
/// shape consumed by [`crate::sum_numeric`].
#[derive(Debug, Clone, PartialEq)]
pub struct VisitOutput<T> {
    /// Kind name of the visited node.
    pub kind: String,
    /// Handler result for the visited node.
    pub value: T,
    /// Child results per group, in the node's group order. Groups without
    /// children are absent.
    pub children: IndexMap<String, Vec<VisitOutput<T>>>,
}

impl<T> VisitOutput<T> {
    /// Returns the results of one group, empty if the group had no children.
    pub fn group(&self, name: &str) -> &[VisitOutput<T>] {
        self.children.get(name).map_or(&[][..], Vec::as_slice)
    }

    /// Iterates every handler result in post-order.
    pub fn values(&self) -> Vec<&T> {
        let mut values = Vec::new();
        self.collect_values(&mut values);
        values
    }

    fn collect_values<'a>(&'a self, values: &mut Vec<&'a T>) {
        for child in self.children.values().flatten() {
            child.collect_values(values);
        }
        values.push(&self.value);
    }
}

impl<T: Serialize> VisitOutput<T> {
    /// Converts the output into a nested JSON value.
    pub fn to_value(&self) -> Result<Value, TreeError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<T: Serialize> Serialize for VisitOutput<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&self.kind, &self.value)?;
        map.serialize_entry(CHILDREN_KEY, &self.children)?;
        map.end()
    }
}
