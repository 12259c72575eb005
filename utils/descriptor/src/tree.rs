//! Traversal and inspection of descriptor trees.

use std::collections::HashSet;

use crate::node::Descriptor;

/// Visits every node depth-first, parent before children, left to right.
///
/// The visitor receives the node and its child-index path from the root; the
/// root's path is empty.
pub fn walk<F>(descriptor: &Descriptor, mut visitor: F)
where
    F: FnMut(&Descriptor, &[usize]),
{
    let mut path = Vec::new();
    walk_inner(descriptor, &mut path, &mut visitor);
}

fn walk_inner<F>(node: &Descriptor, path: &mut Vec<usize>, visitor: &mut F)
where
    F: FnMut(&Descriptor, &[usize]),
{
    visitor(node, path.as_slice());
    for (index, child) in node.child_nodes().iter().enumerate() {
        path.push(index);
        walk_inner(child, path, visitor);
        path.pop();
    }
}

/// Rebuilds a tree by applying `f` to every node.
///
/// `f` runs on a node before its subtree, and its output decides everything:
/// the children that get transformed are the children of the returned node. A
/// returned node without `children` ends the descent there, so callers that
/// want to keep the original children must copy them over.
pub fn transform<F>(descriptor: &Descriptor, mut f: F) -> Descriptor
where
    F: FnMut(&Descriptor) -> Descriptor,
{
    transform_inner(descriptor, &mut f)
}

fn transform_inner<F>(node: &Descriptor, f: &mut F) -> Descriptor
where
    F: FnMut(&Descriptor) -> Descriptor,
{
    let mut rewritten = f(node);
    if let Some(children) = rewritten.children.take() {
        rewritten.children = Some(
            children
                .iter()
                .map(|child| transform_inner(child, f))
                .collect(),
        );
    }
    rewritten
}

/// Collects every node matching `predicate`, in pre-order.
///
/// The root and reserved nodes are candidates like any other node.
pub fn find<F>(descriptor: &Descriptor, predicate: F) -> Vec<&Descriptor>
where
    F: Fn(&Descriptor) -> bool,
{
    let mut found = Vec::new();
    find_inner(descriptor, &predicate, &mut found);
    found
}

fn find_inner<'a, F>(node: &'a Descriptor, predicate: &F, found: &mut Vec<&'a Descriptor>)
where
    F: Fn(&Descriptor) -> bool,
{
    if predicate(node) {
        found.push(node);
    }
    for child in node.child_nodes() {
        find_inner(child, predicate, found);
    }
}

/// Returns the distinct component types used in the tree, in order of first
/// appearance. Reserved types are never included.
#[must_use]
pub fn used_types(descriptor: &Descriptor) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut types = Vec::new();
    collect_types(descriptor, &mut seen, &mut types);
    types
}

fn collect_types<'a>(node: &'a Descriptor, seen: &mut HashSet<&'a str>, types: &mut Vec<&'a str>) {
    if !node.kind().is_reserved() && seen.insert(node.ty.as_str()) {
        types.push(node.ty.as_str());
    }
    for child in node.child_nodes() {
        collect_types(child, seen, types);
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    /// `true` when every used type is known.
    pub valid: bool,
    /// Used types missing from the known set, in order of first appearance.
    pub unknown_types: Vec<String>,
}

/// Checks the tree's component types against a set of known types.
///
/// Unknown types are reported, never raised.
pub fn validate<I, S>(descriptor: &Descriptor, known_types: I) -> Validation
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let known: HashSet<String> = known_types
        .into_iter()
        .map(|ty| ty.as_ref().to_owned())
        .collect();
    let unknown_types: Vec<String> = used_types(descriptor)
        .into_iter()
        .filter(|ty| !known.contains(*ty))
        .map(str::to_owned)
        .collect();
    Validation {
        valid: unknown_types.is_empty(),
        unknown_types,
    }
}

/// Number of nodes in the tree, root included.
#[must_use]
pub fn count(descriptor: &Descriptor) -> usize {
    let mut total = 0;
    walk(descriptor, |_, _| total += 1);
    total
}

/// Length of the longest root-to-leaf chain; a lone root has depth 1.
#[must_use]
pub fn depth(descriptor: &Descriptor) -> usize {
    let mut deepest = 0;
    walk(descriptor, |_, path| deepest = deepest.max(path.len() + 1));
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{EMPTY_TYPE, FRAGMENT_TYPE};

    fn sample() -> Descriptor {
        Descriptor::new("root")
            .child(
                Descriptor::new("row")
                    .child(Descriptor::new("text"))
                    .child(Descriptor::empty())
                    .child(Descriptor::new("button")),
            )
            .child(Descriptor::fragment([
                Descriptor::new("text"),
                Descriptor::new("image"),
            ]))
    }

    #[test]
    fn walk_visits_in_pre_order_with_paths() {
        let mut visits = Vec::new();
        walk(&sample(), |node, path| {
            visits.push((node.ty.clone(), path.to_vec()));
        });

        let expected: Vec<(String, Vec<usize>)> = vec![
            ("root".into(), vec![]),
            ("row".into(), vec![0]),
            ("text".into(), vec![0, 0]),
            (EMPTY_TYPE.into(), vec![0, 1]),
            ("button".into(), vec![0, 2]),
            (FRAGMENT_TYPE.into(), vec![1]),
            ("text".into(), vec![1, 0]),
            ("image".into(), vec![1, 1]),
        ];
        assert_eq!(visits, expected);
    }

    #[test]
    fn walk_visits_each_node_once() {
        let tree = sample();
        assert_eq!(count(&tree), 8);
        assert_eq!(depth(&tree), 3);
        assert_eq!(count(&Descriptor::new("leaf")), 1);
    }

    #[test]
    fn transform_rewrites_without_touching_input() {
        let tree = sample();
        let renamed = transform(&tree, |node| {
            let mut node = node.clone();
            if node.ty == "text" {
                node.ty = "label".into();
            }
            node
        });

        assert_eq!(used_types(&renamed), ["root", "row", "label", "button", "image"]);
        assert_eq!(used_types(&tree), ["root", "row", "text", "button", "image"]);
    }

    #[test]
    fn transform_drops_children_the_callback_omits() {
        let tree = sample();
        let flat = transform(&tree, |node| Descriptor::new(node.ty.clone()));
        assert_eq!(flat, Descriptor::new("root"));
    }

    #[test]
    fn transform_descends_into_returned_children() {
        let tree = Descriptor::new("a").child(Descriptor::new("b"));
        let out = transform(&tree, |node| {
            if node.ty == "a" {
                Descriptor::new("a2").child(Descriptor::new("c"))
            } else {
                Descriptor::new(format!("{}!", node.ty))
            }
        });
        assert_eq!(out, Descriptor::new("a2").child(Descriptor::new("c!")));
    }

    #[test]
    fn find_includes_root_and_reserved_nodes() {
        let tree = sample();
        let all = find(&tree, |_| true);
        assert_eq!(all.len(), 8);
        assert_eq!(all[0].ty, "root");

        let reserved = find(&tree, |node| node.kind().is_reserved());
        let types: Vec<_> = reserved.iter().map(|n| n.ty.as_str()).collect();
        assert_eq!(types, [EMPTY_TYPE, FRAGMENT_TYPE]);
    }

    #[test]
    fn used_types_skips_reserved() {
        let tree = sample();
        let types = used_types(&tree);
        assert!(!types.contains(&EMPTY_TYPE));
        assert!(!types.contains(&FRAGMENT_TYPE));
        assert!(used_types(&Descriptor::fragment([Descriptor::empty()])).is_empty());
    }

    #[test]
    fn validate_reports_unknown_types() {
        let tree = sample();
        let report = validate(&tree, ["root", "row", "text"]);
        assert!(!report.valid);
        assert_eq!(report.unknown_types, ["button", "image"]);

        let report = validate(&tree, used_types(&tree));
        assert!(report.valid);
        assert!(report.unknown_types.is_empty());
    }
}
