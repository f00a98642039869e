//! A single traversal.

use indexmap::IndexMap;
use tracing::debug;

use crate::{Node, TreeError};

use super::{VisitOutput, Visitor};

/// One bottom-up traversal of a tree by a [`Visitor`].
///
/// Holds the root, the strictness flag and the last computed result.
pub struct VisitorRun<'v, 'n, T> {
    visitor: &'v Visitor<T>,
    root: &'n Node,
    strict: bool,
    result: Option<VisitOutput<T>>,
}

impl<'v, 'n, T> VisitorRun<'v, 'n, T> {
    pub(crate) fn new(visitor: &'v Visitor<T>, root: &'n Node) -> Self {
        Self {
            visitor,
            root,
            strict: false,
            result: None,
        }
    }

    /// Requires a kind-specific handler for every visited node.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns whether the run is strict.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns the root node.
    pub fn root(&self) -> &'n Node {
        self.root
    }

    /// Visits the tree and stores the result.
    ///
    /// A dispatch failure anywhere aborts the traversal and leaves the
    /// previous result in place.
    pub fn visit(&mut self) -> Result<&VisitOutput<T>, TreeError> {
        debug!(visitor = %self.visitor.name(), root = %self.root, strict = self.strict, "Visiting tree");
        let output = self.walk(self.root)?;
        Ok(self.result.insert(output))
    }

    /// Returns the last computed result.
    pub fn result(&self) -> Option<&VisitOutput<T>> {
        self.result.as_ref()
    }

    /// Visits the tree and returns the result by value.
    pub fn into_result(self) -> Result<VisitOutput<T>, TreeError> {
        debug!(visitor = %self.visitor.name(), root = %self.root, strict = self.strict, "Visiting tree");
        self.walk(self.root)
    }

    fn walk(&self, node: &Node) -> Result<VisitOutput<T>, TreeError> {
        let mut children: IndexMap<String, Vec<VisitOutput<T>>> = IndexMap::new();
        for (group, nodes) in node.children() {
            for child in nodes {
                let output = self.walk(child)?;
                children.entry(group.clone()).or_default().push(output);
            }
        }

        let handler = self.visitor.handler_for(node, self.strict)?;
        Ok(VisitOutput {
            kind: node.kind_name().to_string(),
            value: handler(node),
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeKind;
    use pretty_assertions::assert_eq;

    fn make_simple_tree() -> Node {
        let kind = NodeKind::define("MyTree", ["left", "right"]).unwrap();
        let mut root = Node::of(&kind, "root");
        root.get_group("left").unwrap().push(Node::of(&kind, "left"));
        root.get_group("right").unwrap().push(Node::of(&kind, "right"));
        root
    }

    fn labels() -> Visitor<String> {
        Visitor::new("MyVisitor").generic(|node: &Node| format!("visited:{}", node.label))
    }

    #[test]
    fn test_visit_basic() {
        let root = make_simple_tree();
        let visitor = labels();
        let mut run = visitor.run(&root);
        let output = run.visit().unwrap();

        assert_eq!(output.kind, "MyTree");
        assert_eq!(output.value, "visited:root");
        assert_eq!(output.group("left")[0].value, "visited:left");
        assert_eq!(output.group("right")[0].value, "visited:right");
        assert!(run.result().is_some());
    }

    #[test]
    fn test_run_accessors() {
        let root = make_simple_tree();
        let visitor = labels();

        let run = visitor.run(&root);
        assert!(!run.is_strict());
        assert!(std::ptr::eq(run.root(), &root));

        let run = run.strict(true);
        assert!(run.is_strict());
        assert_eq!(run.root().label, "root");
    }

    #[test]
    fn test_visit_strict_with_specific_handlers() {
        let root = make_simple_tree();
        let visitor = Visitor::new("MyVisitor").specific("MyTree", |_: &Node| "ok");
        let output = visitor.run(&root).strict(true).into_result().unwrap();

        assert_eq!(output.value, "ok");
        assert_eq!(output.group("left").len(), 1);
        assert_eq!(output.group("left")[0].value, "ok");
        assert_eq!(output.group("right").len(), 1);
        assert_eq!(output.group("right")[0].value, "ok");
    }

    #[test]
    fn test_visit_missing_handler_aborts() {
        let root = make_simple_tree();
        let visitor: Visitor<()> = Visitor::new("MyVisitor");
        let mut run = visitor.run(&root).strict(true);

        assert!(matches!(
            run.visit(),
            Err(TreeError::DispatchNotFound { .. })
        ));
        assert!(run.result().is_none());
    }

    #[test]
    fn test_post_order() {
        let root = make_simple_tree();
        let output = labels().visit(&root).unwrap();
        let order: Vec<&str> = output.values().into_iter().map(String::as_str).collect();
        assert_eq!(order, vec!["visited:left", "visited:right", "visited:root"]);
    }

    #[test]
    fn test_empty_group_is_absent() {
        let kind = NodeKind::define("MyTree", ["left", "right"]).unwrap();
        let mut root = Node::of(&kind, "root");
        root.get_group("left").unwrap();
        root.get_group("right").unwrap().push(Node::of(&kind, "r"));

        let output = labels().visit(&root).unwrap();
        let groups: Vec<&String> = output.children.keys().collect();
        assert_eq!(groups, vec!["right"]);
    }

    #[test]
    fn test_group_order_follows_insertion() {
        let root = Node::new("root")
            .with_group("zeta", vec![Node::new("z")])
            .with_group("alpha", vec![Node::new("a1"), Node::new("a2")]);

        let output = labels().visit(&root).unwrap();
        let groups: Vec<&String> = output.children.keys().collect();
        assert_eq!(groups, vec!["zeta", "alpha"]);
        assert_eq!(output.group("alpha")[1].value, "visited:a2");
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let root = make_simple_tree();
        let visitor = labels();
        let first = visitor.visit(&root).unwrap();
        let second = visitor.visit(&root).unwrap();
        assert_eq!(first, second);
    }
}
