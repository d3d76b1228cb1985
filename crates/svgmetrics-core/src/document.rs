//! Node arena, identifier index and tree navigation.

use crate::error::{Diagnostic, Error, Result};
use crate::node::Node;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Stable index of a node inside one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Assembles a tree, then freezes it into a [`Document`].
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    nodes: Vec<Node>,
}

impl DocumentBuilder {
    pub fn new(mut root: Node) -> Self {
        root.parent = None;
        root.children.clear();
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends `node` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId> {
        if parent.0 >= self.nodes.len() {
            return Err(Error::NodeNotInDocument { node: parent });
        }
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Builds the identifier index in document order; the first element carrying an
    /// identifier wins and later duplicates are reported.
    pub fn build(self) -> Document {
        let mut ids: FxHashMap<String, NodeId> = FxHashMap::default();
        let mut diagnostics = Vec::new();

        let mut stack = vec![NodeId(0)];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if let Some(key) = node.id.as_deref().filter(|k| !k.is_empty()) {
                if ids.contains_key(key) {
                    tracing::warn!(id = key, "duplicate element id; keeping the first");
                    diagnostics.push(Diagnostic::DuplicateId {
                        id: key.to_string(),
                    });
                } else {
                    ids.insert(key.to_string(), id);
                }
            }
            stack.extend(node.children.iter().rev().copied());
        }

        Document {
            nodes: self.nodes,
            ids,
            diagnostics,
        }
    }
}

/// An immutable SVG element tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    ids: FxHashMap<String, NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(Error::NodeNotInDocument { node: id })
    }

    /// Looks up an element by its bare identifier (no `#`).
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    pub fn has(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent())
    }

    /// Nodes from the root down to and including `target`.
    pub fn path_from_root(&self, target: NodeId) -> Result<Vec<NodeId>> {
        let mut path = vec![target];
        let mut cur = self.node(target)?.parent();
        while let Some(p) = cur {
            path.push(p);
            cur = self.node(p)?.parent();
        }
        path.reverse();
        Ok(path)
    }

    /// Data errors found while building the document.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::shape::Shape;

    fn svg() -> Node {
        Node::new(NodeKind::Svg(Default::default()))
    }

    #[test]
    fn ids_are_indexed_in_document_order() {
        let mut b = DocumentBuilder::new(svg());
        let g = b.append(b.root(), Node::new(NodeKind::Group)).unwrap();
        let late = b
            .append(b.root(), Node::new(NodeKind::Group).with_id("dup"))
            .unwrap();
        // Appended after `late`, but comes first in document order.
        let early = b
            .append(g, Node::new(NodeKind::Shape(Shape::rect(0.0, 0.0, 1.0, 1.0))).with_id("dup"))
            .unwrap();
        let doc = b.build();

        assert_eq!(doc.find("dup"), Some(early));
        assert_ne!(doc.find("dup"), Some(late));
        assert_eq!(
            doc.diagnostics(),
            &[Diagnostic::DuplicateId {
                id: "dup".to_string()
            }]
        );
    }

    #[test]
    fn path_from_root_is_unique_chain() {
        let mut b = DocumentBuilder::new(svg());
        let g = b.append(b.root(), Node::new(NodeKind::Group)).unwrap();
        let r = b
            .append(g, Node::new(NodeKind::Shape(Shape::rect(0.0, 0.0, 1.0, 1.0))))
            .unwrap();
        let doc = b.build();
        assert_eq!(doc.path_from_root(r).unwrap(), vec![doc.root(), g, r]);
    }

    #[test]
    fn foreign_node_ids_are_rejected() {
        let mut b = DocumentBuilder::new(svg());
        let g = b.append(b.root(), Node::new(NodeKind::Group)).unwrap();
        let _ = b.append(g, Node::new(NodeKind::Group)).unwrap();
        let big = b.build();
        let far = big.path_from_root(NodeId(2)).unwrap()[2];

        let small = DocumentBuilder::new(svg()).build();
        assert!(matches!(
            small.node(far),
            Err(Error::NodeNotInDocument { .. })
        ));
        assert!(!small.has("anything"));
    }

    #[test]
    fn appending_to_unknown_parent_fails() {
        let mut b = DocumentBuilder::new(svg());
        assert!(b.append(NodeId(7), Node::new(NodeKind::Group)).is_err());
    }
}
