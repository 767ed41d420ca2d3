//! Flat descriptor list → arena tree.
//!
//! Nodes live in a `Vec` addressed by [`NodeIndex`]. The parent link is a plain
//! index; child order lists are owned by the tree, not by the node records.
//! Malformed input (duplicate ids, extra roots, unresolved parents, cycles) is
//! dropped and reported, never followed.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{LayoutError, report};
use crate::ir::{NodeDescriptor, Side};

pub type NodeIndex = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub id: String,
    pub width: f32,
    pub height: f32,
    pub expanded: bool,
    pub preferred_side: Side,
    pub layer_index: usize,
    pub parent: Option<NodeIndex>,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    nodes: Vec<NodeBox>,
    children: Vec<Vec<NodeIndex>>,
    lookup: HashMap<String, NodeIndex>,
    root: Option<NodeIndex>,
}

impl LayoutTree {
    pub fn build(descriptors: &[NodeDescriptor]) -> (Self, Vec<LayoutError>) {
        let mut diagnostics = Vec::new();

        // First occurrence of each id wins.
        let mut accepted: Vec<&NodeDescriptor> = Vec::with_capacity(descriptors.len());
        let mut seen: HashSet<&str> = HashSet::with_capacity(descriptors.len());
        for desc in descriptors {
            if !seen.insert(desc.id.as_str()) {
                report(
                    &mut diagnostics,
                    LayoutError::DuplicateId {
                        id: desc.id.clone(),
                    },
                );
                continue;
            }
            accepted.push(desc);
        }

        let mut root_desc: Option<usize> = None;
        let mut dropped_roots: HashSet<&str> = HashSet::new();
        for (pos, desc) in accepted.iter().enumerate() {
            if desc.parent_id.is_some() {
                continue;
            }
            match root_desc {
                None => root_desc = Some(pos),
                Some(root) => {
                    dropped_roots.insert(desc.id.as_str());
                    report(
                        &mut diagnostics,
                        LayoutError::ExtraRoot {
                            id: desc.id.clone(),
                            root: accepted[root].id.clone(),
                        },
                    );
                }
            }
        }

        let Some(root_pos) = root_desc else {
            if !accepted.is_empty() {
                report(
                    &mut diagnostics,
                    LayoutError::MissingRoot {
                        count: accepted.len(),
                    },
                );
            }
            return (Self::default(), diagnostics);
        };

        let mut by_parent: HashMap<&str, Vec<usize>> = HashMap::new();
        for (pos, desc) in accepted.iter().enumerate() {
            if let Some(parent_id) = desc.parent_id.as_deref() {
                by_parent.entry(parent_id).or_default().push(pos);
            }
        }

        let mut tree = Self::default();
        let mut reached = vec![false; accepted.len()];
        let mut queue: VecDeque<(usize, Option<NodeIndex>)> = VecDeque::new();
        queue.push_back((root_pos, None));
        reached[root_pos] = true;
        while let Some((pos, parent)) = queue.pop_front() {
            let desc = accepted[pos];
            let layer_index = parent
                .map(|p| tree.nodes[p].layer_index + 1)
                .unwrap_or(0);
            let idx = tree.push(desc, parent, layer_index, &mut diagnostics);
            if let Some(kids) = by_parent.get(desc.id.as_str()) {
                for &child_pos in kids {
                    if reached[child_pos] {
                        continue;
                    }
                    reached[child_pos] = true;
                    queue.push_back((child_pos, Some(idx)));
                }
            }
        }

        let known: HashMap<&str, usize> = accepted
            .iter()
            .enumerate()
            .map(|(pos, desc)| (desc.id.as_str(), pos))
            .collect();
        for (pos, desc) in accepted.iter().enumerate() {
            if reached[pos] || dropped_roots.contains(desc.id.as_str()) {
                continue;
            }
            let error = classify_detached(pos, &accepted, &known);
            report(&mut diagnostics, error);
        }

        tree.root = Some(0);
        tracing::debug!(
            nodes = tree.nodes.len(),
            dropped = descriptors.len() - tree.nodes.len(),
            "built layout tree"
        );
        (tree, diagnostics)
    }

    fn push(
        &mut self,
        desc: &NodeDescriptor,
        parent: Option<NodeIndex>,
        layer_index: usize,
        diagnostics: &mut Vec<LayoutError>,
    ) -> NodeIndex {
        let valid = |v: f32| v.is_finite() && v >= 0.0;
        let (width, height) = if valid(desc.width) && valid(desc.height) {
            (desc.width, desc.height)
        } else {
            report(
                diagnostics,
                LayoutError::InvalidSize {
                    id: desc.id.clone(),
                    width: desc.width,
                    height: desc.height,
                },
            );
            (
                if valid(desc.width) { desc.width } else { 0.0 },
                if valid(desc.height) { desc.height } else { 0.0 },
            )
        };
        let idx = self.nodes.len();
        self.nodes.push(NodeBox {
            id: desc.id.clone(),
            width,
            height,
            expanded: desc.expanded,
            preferred_side: desc.preferred_side.unwrap_or_default(),
            layer_index,
            parent,
        });
        self.children.push(Vec::new());
        self.lookup.insert(desc.id.clone(), idx);
        if let Some(parent) = parent {
            self.children[parent].push(idx);
        }
        idx
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: NodeIndex) -> &NodeBox {
        &self.nodes[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.lookup.get(id).copied()
    }

    /// Children that take part in layout: none when the node is collapsed.
    pub fn visible_children(&self, idx: NodeIndex) -> &[NodeIndex] {
        if self.nodes[idx].expanded {
            &self.children[idx]
        } else {
            &[]
        }
    }

    /// Pre-order over the nodes reachable through expanded ancestors.
    pub fn visible_preorder(&self) -> Vec<NodeIndex> {
        match self.root {
            Some(root) => self.visible_preorder_from(root),
            None => Vec::new(),
        }
    }

    pub fn visible_preorder_from(&self, start: NodeIndex) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            for &child in self.visible_children(idx).iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Post-order (children before parents) over the visible nodes.
    pub fn visible_postorder(&self) -> Vec<NodeIndex> {
        let mut order = self.visible_preorder();
        // Reversed pre-order still lists every child before its parent.
        order.reverse();
        order
    }
}

fn classify_detached(
    pos: usize,
    accepted: &[&NodeDescriptor],
    known: &HashMap<&str, usize>,
) -> LayoutError {
    let desc = accepted[pos];
    let Some(parent_id) = desc.parent_id.as_deref() else {
        return LayoutError::Unreachable {
            id: desc.id.clone(),
        };
    };
    if !known.contains_key(parent_id) {
        return LayoutError::UnresolvedParent {
            id: desc.id.clone(),
            parent_id: parent_id.to_string(),
        };
    }
    // Walk the parent chain; revisiting a node means this chain loops.
    let mut visited: HashSet<usize> = HashSet::new();
    let mut current = pos;
    loop {
        if !visited.insert(current) {
            return LayoutError::CyclicParent {
                id: desc.id.clone(),
            };
        }
        let next = accepted[current]
            .parent_id
            .as_deref()
            .and_then(|parent| known.get(parent).copied());
        match next {
            Some(next) => current = next,
            None => {
                return LayoutError::Unreachable {
                    id: desc.id.clone(),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>) -> NodeDescriptor {
        NodeDescriptor::new(id, parent, 100.0, 40.0)
    }

    #[test]
    fn layer_index_follows_parent() {
        let (tree, diagnostics) = LayoutTree::build(&[
            node("root", None),
            node("a", Some("root")),
            node("b", Some("a")),
            node("c", Some("root")),
        ]);
        assert!(diagnostics.is_empty());
        let b = tree.index_of("b").unwrap();
        let a = tree.index_of("a").unwrap();
        assert_eq!(tree.node(b).layer_index, 2);
        assert_eq!(tree.node(b).parent, Some(a));
        let root = tree.root().unwrap();
        let kids: Vec<&str> = tree
            .visible_children(root)
            .iter()
            .map(|&idx| tree.node(idx).id.as_str())
            .collect();
        assert_eq!(kids, vec!["a", "c"]);
    }

    #[test]
    fn children_listed_before_parent_are_attached() {
        let (tree, diagnostics) =
            LayoutTree::build(&[node("leaf", Some("mid")), node("mid", Some("root")), node("root", None)]);
        assert!(diagnostics.is_empty());
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node(tree.index_of("leaf").unwrap()).layer_index, 2);
    }

    #[test]
    fn malformed_nodes_are_dropped_with_diagnostics() {
        let (tree, diagnostics) = LayoutTree::build(&[
            node("root", None),
            node("a", Some("root")),
            node("a", Some("root")),
            node("orphan", Some("ghost")),
            node("x", Some("y")),
            node("y", Some("x")),
            node("self", Some("self")),
            node("second", None),
            node("under-second", Some("second")),
            node("under-orphan", Some("orphan")),
        ]);
        assert_eq!(tree.len(), 2);
        assert!(diagnostics.contains(&LayoutError::DuplicateId { id: "a".into() }));
        assert!(diagnostics.contains(&LayoutError::UnresolvedParent {
            id: "orphan".into(),
            parent_id: "ghost".into()
        }));
        assert!(diagnostics.contains(&LayoutError::CyclicParent { id: "x".into() }));
        assert!(diagnostics.contains(&LayoutError::CyclicParent { id: "y".into() }));
        assert!(diagnostics.contains(&LayoutError::CyclicParent { id: "self".into() }));
        assert!(diagnostics.contains(&LayoutError::ExtraRoot {
            id: "second".into(),
            root: "root".into()
        }));
        assert!(diagnostics.contains(&LayoutError::Unreachable {
            id: "under-second".into()
        }));
        assert!(diagnostics.contains(&LayoutError::Unreachable {
            id: "under-orphan".into()
        }));
    }

    #[test]
    fn no_root_reports_missing_root() {
        let (tree, diagnostics) = LayoutTree::build(&[node("a", Some("b")), node("b", Some("a"))]);
        assert!(tree.is_empty());
        assert!(diagnostics.contains(&LayoutError::MissingRoot { count: 2 }));
    }

    #[test]
    fn collapsed_nodes_hide_descendants() {
        let (tree, _) = LayoutTree::build(&[
            node("root", None),
            node("a", Some("root")).collapsed(),
            node("a1", Some("a")),
            node("b", Some("root")),
        ]);
        let visible: Vec<&str> = tree
            .visible_preorder()
            .into_iter()
            .map(|idx| tree.node(idx).id.as_str())
            .collect();
        assert_eq!(visible, vec!["root", "a", "b"]);
        let post: Vec<&str> = tree
            .visible_postorder()
            .into_iter()
            .map(|idx| tree.node(idx).id.as_str())
            .collect();
        assert_eq!(post.last(), Some(&"root"));
    }

    #[test]
    fn invalid_sizes_are_clamped() {
        let mut bad = node("root", None);
        bad.width = f32::NAN;
        bad.height = -4.0;
        let (tree, diagnostics) = LayoutTree::build(&[bad]);
        let root = tree.node(0);
        assert_eq!((root.width, root.height), (0.0, 0.0));
        assert_eq!(diagnostics.len(), 1);
    }
}
