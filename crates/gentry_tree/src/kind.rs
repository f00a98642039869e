//! Node kinds and their group declarations.
//!
//! A [`NodeKind`] plays the role of a node's dynamic type: it carries the name
//! that visitors dispatch on and the set of group names that may be accessed
//! directly on nodes of that kind.
//!
//! # Group inheritance
//!
//! A kind that does not declare groups inherits the set of the kind it extends.
//! A kind that declares groups replaces that set; the two are never merged.
//!
//! ```rust
//! use gentry_tree::NodeKind;
//!
//! let person = NodeKind::define("Person", ["children"]).unwrap();
//! let grandmother = NodeKind::builder("GrandMother").extends(&person).build().unwrap();
//! let mother = NodeKind::builder("Mother")
//!     .extends(&person)
//!     .groups(["girls", "boys"])
//!     .build()
//!     .unwrap();
//!
//! assert!(grandmother.has_group("children"));
//! assert!(mother.has_group("girls"));
//! assert!(!mother.has_group("children"));
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexSet;
use serde_json::Value;
use tracing::debug;

use crate::TreeError;

/// Names that are fields of every node and can never be groups.
pub const RESERVED_NAMES: [&str; 2] = ["label", "properties"];

/// Prefix reserved for internal attributes.
pub const INTERNAL_PREFIX: char = '_';

/// Name of the built-in root kind.
pub const TREE_KIND: &str = "Tree";

/// Key under which visit output nests child results. Not usable as a kind
/// name, since the kind name is the key of the handler result.
pub const CHILDREN_KEY: &str = "children";

static TREE: OnceLock<NodeKind> = OnceLock::new();

/// The dynamic type of a node.
///
/// Cheap to clone; all clones share the same definition.
#[derive(Clone)]
pub struct NodeKind(Arc<KindDef>);

struct KindDef {
    name: String,
    groups: IndexSet<String>,
    parent: Option<NodeKind>,
}

impl NodeKind {
    /// Returns the built-in `Tree` kind that every lineage ends in.
    pub fn tree() -> NodeKind {
        TREE.get_or_init(|| {
            NodeKind(Arc::new(KindDef {
                name: TREE_KIND.to_string(),
                groups: IndexSet::new(),
                parent: None,
            }))
        })
        .clone()
    }

    /// Starts defining a new kind extending `Tree`.
    pub fn builder(name: impl Into<String>) -> KindBuilder {
        KindBuilder {
            name: name.into(),
            parent: NodeKind::tree(),
            groups: None,
        }
    }

    /// Defines a kind extending `Tree` with the given groups.
    pub fn define<I, S>(name: impl Into<String>, groups: I) -> Result<NodeKind, TreeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(name).groups(groups).build()
    }

    /// Defines a kind from a dynamically typed group declaration.
    ///
    /// `None` inherits the parent's groups. Otherwise the declaration must be an
    /// array whose items are all strings.
    pub fn from_declaration(
        name: impl Into<String>,
        parent: &NodeKind,
        declaration: Option<&Value>,
    ) -> Result<NodeKind, TreeError> {
        let name = name.into();
        let builder = Self::builder(name.clone()).extends(parent);

        let Some(declaration) = declaration else {
            return builder.build();
        };

        let items = declaration.as_array().ok_or_else(|| {
            TreeError::group_declaration(&name, format!("groups {declaration} is not a set"))
        })?;

        let mut groups = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str() {
                Some(group) => groups.push(group.to_string()),
                None => {
                    return Err(TreeError::group_declaration(
                        &name,
                        format!("groups item {item} is not a str"),
                    ));
                }
            }
        }

        builder.groups(groups).build()
    }

    /// Returns the kind name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the group names nodes of this kind expose.
    pub fn groups(&self) -> &IndexSet<String> {
        &self.0.groups
    }

    /// Returns true if `name` is a declared (or inherited) group.
    pub fn has_group(&self, name: &str) -> bool {
        self.0.groups.contains(name)
    }

    /// Returns the kind this one was derived from.
    pub fn parent(&self) -> Option<&NodeKind> {
        self.0.parent.as_ref()
    }

    /// Iterates this kind and its ancestors, most-derived first.
    pub fn lineage(&self) -> impl Iterator<Item = &NodeKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    /// Returns true if this kind is `other` or derives from it.
    pub fn is_a(&self, other: &NodeKind) -> bool {
        self.lineage().any(|kind| kind == other)
    }
}

/// Kinds are equal only if they come from the same definition.
impl PartialEq for NodeKind {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeKind {}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeKind")
            .field("name", &self.0.name)
            .field("groups", &self.0.groups)
            .finish()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Builder for [`NodeKind`]. Validation happens in [`KindBuilder::build`].
#[derive(Debug)]
pub struct KindBuilder {
    name: String,
    parent: NodeKind,
    groups: Option<Vec<String>>,
}

impl KindBuilder {
    /// Sets the kind to derive from.
    pub fn extends(mut self, parent: &NodeKind) -> Self {
        self.parent = parent.clone();
        self
    }

    /// Declares the groups of this kind, replacing any inherited set.
    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Validates the declaration and produces the kind.
    pub fn build(self) -> Result<NodeKind, TreeError> {
        if !is_identifier(&self.name) {
            return Err(TreeError::group_declaration(
                &self.name,
                format!("kind name {:?} is not a valid identifier", self.name),
            ));
        }
        if self.name == CHILDREN_KEY {
            return Err(TreeError::group_declaration(
                &self.name,
                format!("kind name {CHILDREN_KEY:?} collides with the visit output key"),
            ));
        }

        let groups = match self.groups {
            Some(declared) => {
                let mut groups = IndexSet::with_capacity(declared.len());
                for group in declared {
                    validate_group(&self.name, &group)?;
                    groups.insert(group);
                }
                groups
            }
            None => self.parent.groups().clone(),
        };

        debug!(kind = %self.name, parent = %self.parent, ?groups, "Defined node kind");

        Ok(NodeKind(Arc::new(KindDef {
            name: self.name,
            groups,
            parent: Some(self.parent),
        })))
    }
}

fn validate_group(kind: &str, group: &str) -> Result<(), TreeError> {
    let reason = if group.starts_with(INTERNAL_PREFIX) {
        "starts with underscore"
    } else if !is_identifier(group) {
        "not a valid identifier"
    } else if RESERVED_NAMES.contains(&group) {
        "is a reserved name"
    } else {
        return Ok(());
    };
    Err(TreeError::group_declaration(
        kind,
        format!("groups item {group} {reason}"),
    ))
}

/// Returns true if `name` is an identifier: a letter or underscore followed by
/// letters, digits or underscores.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_tree_kind_has_no_groups() {
        let tree = NodeKind::tree();
        assert_eq!(tree.name(), "Tree");
        assert!(tree.groups().is_empty());
        assert!(tree.parent().is_none());
    }

    #[test]
    fn test_define_groups() {
        let kind = NodeKind::define("A", ["left", "right"]).unwrap();
        assert!(kind.has_group("left"));
        assert!(kind.has_group("right"));
        assert!(!kind.has_group("children"));
        assert_eq!(kind.parent(), Some(&NodeKind::tree()));
    }

    #[test]
    fn test_groups_inherited_without_declaration() {
        let a = NodeKind::define("A", ["left", "right"]).unwrap();
        let b = NodeKind::builder("B").extends(&a).build().unwrap();
        assert_eq!(b.groups(), a.groups());
    }

    #[test]
    fn test_declared_groups_replace_parent_groups() {
        let base = NodeKind::define("Base", ["foo"]).unwrap();
        let sub = NodeKind::builder("Sub")
            .extends(&base)
            .groups(["bar"])
            .build()
            .unwrap();
        assert!(sub.has_group("bar"));
        assert!(!sub.has_group("foo"));
    }

    #[test]
    fn test_lineage_most_derived_first() {
        let person = NodeKind::define("Person", ["children"]).unwrap();
        let child = NodeKind::builder("Child").extends(&person).build().unwrap();
        let names: Vec<&str> = child.lineage().map(NodeKind::name).collect();
        assert_eq!(names, vec!["Child", "Person", "Tree"]);
        assert!(child.is_a(&person));
        assert!(!person.is_a(&child));
    }

    #[test]
    fn test_equality_is_identity() {
        let a = NodeKind::define("Twin", ["kids"]).unwrap();
        let b = NodeKind::define("Twin", ["kids"]).unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);

        let person = NodeKind::define("Person", ["children"]).unwrap();
        let other_person = NodeKind::define("Person", ["children"]).unwrap();
        let child = NodeKind::builder("Child").extends(&person).build().unwrap();
        assert!(child.is_a(&person));
        assert!(!child.is_a(&other_person));
        assert!(child.is_a(&NodeKind::tree()));
    }

    #[test]
    fn test_duplicate_groups_collapse() {
        let kind = NodeKind::define("A", ["left", "left"]).unwrap();
        assert_eq!(kind.groups().len(), 1);
    }

    #[rstest]
    #[case::reserved_label("label")]
    #[case::reserved_properties("properties")]
    #[case::underscore("_bad")]
    #[case::not_identifier("not-valid!")]
    #[case::leading_digit("1st")]
    #[case::empty("")]
    fn test_invalid_group_names(#[case] group: &str) {
        let err = NodeKind::define("Bad", [group]).unwrap_err();
        assert!(matches!(err, TreeError::GroupDeclaration { ref kind, .. } if kind == "Bad"));
    }

    #[test]
    fn test_invalid_kind_name() {
        let err = NodeKind::define("not a name", ["ok"]).unwrap_err();
        assert!(matches!(err, TreeError::GroupDeclaration { .. }));
    }

    #[test]
    fn test_children_kind_name_rejected() {
        let err = NodeKind::builder("children").build().unwrap_err();
        assert!(matches!(err, TreeError::GroupDeclaration { ref kind, .. } if kind == "children"));
        assert!(err.to_string().contains("visit output key"));

        // Only the exact key is taken.
        assert!(NodeKind::builder("Children").build().is_ok());
    }

    #[test]
    fn test_declaration_not_a_set() {
        let err =
            NodeKind::from_declaration("Bad", &NodeKind::tree(), Some(&json!("children")))
                .unwrap_err();
        assert!(err.to_string().contains("is not a set"));
    }

    #[test]
    fn test_declaration_non_string_item() {
        let err = NodeKind::from_declaration("Bad3", &NodeKind::tree(), Some(&json!([123])))
            .unwrap_err();
        assert!(err.to_string().contains("123 is not a str"));
    }

    #[test]
    fn test_declaration_valid() {
        let kind =
            NodeKind::from_declaration("Mother", &NodeKind::tree(), Some(&json!(["girls", "boys"])))
                .unwrap();
        assert!(kind.has_group("girls"));
        assert!(kind.has_group("boys"));
    }

    #[test]
    fn test_declaration_absent_inherits() {
        let person = NodeKind::define("Person", ["children"]).unwrap();
        let kind = NodeKind::from_declaration("Child", &person, None).unwrap();
        assert!(kind.has_group("children"));
    }

    #[rstest]
    #[case("kids", true)]
    #[case("_kids", true)]
    #[case("kinder2", true)]
    #[case("ñandú", true)]
    #[case("2kids", false)]
    #[case("with space", false)]
    #[case("dash-ed", false)]
    fn test_is_identifier(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(name), expected);
    }
}
