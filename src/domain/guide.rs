//! The guide aggregate: metadata plus a graph of nodes with a designated root.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{GuideMetadata, Node, NodeId};

/// Solution text written into answers whose target node was removed.
pub const REMOVED_PATH_SOLUTION: &str = "Path removed - please update this solution";

/// A troubleshooting guide.
///
/// Structural validity is advisory: a guide may hold dangling links, orphans
/// or cycles while it is being edited. See [`Guide::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GuideRecord")]
pub struct Guide {
    pub metadata: GuideMetadata,
    root_node_id: Option<NodeId>,
    nodes: BTreeMap<NodeId, Node>,
}

/// Shape of a guide as stored on disk, before normalization.
#[derive(Debug, Deserialize)]
pub struct GuideRecord {
    metadata: GuideMetadata,
    #[serde(default)]
    root_node_id: Option<NodeId>,
    #[serde(default)]
    nodes: BTreeMap<NodeId, Node>,
}

impl From<GuideRecord> for Guide {
    fn from(record: GuideRecord) -> Self {
        let nodes = record
            .nodes
            .into_iter()
            .map(|(key, mut node)| {
                if node.node_id != key {
                    warn!(
                        "node stored under key {} carries id {}, using the key",
                        key, node.node_id
                    );
                    node.node_id = key.clone();
                }
                (key, node)
            })
            .collect();
        Self {
            metadata: record.metadata,
            root_node_id: record.root_node_id.filter(|id| !id.is_empty()),
            nodes,
        }
    }
}

impl Guide {
    pub fn new(metadata: GuideMetadata) -> Self {
        debug!("created guide '{}'", metadata.title);
        Self {
            metadata,
            root_node_id: None,
            nodes: BTreeMap::new(),
        }
    }

    /// Insert (or replace) a node under its own id. The node becomes root when
    /// `is_root` is set or when no root exists yet.
    pub fn add_node(&mut self, node: Node, is_root: bool) {
        let node_id = node.node_id.clone();
        if is_root || self.root_node_id.is_none() {
            debug!("node {} is now root", node_id);
            self.root_node_id = Some(node_id.clone());
        }
        if self.nodes.insert(node_id.clone(), node).is_some() {
            debug!("replaced node {}", node_id);
        } else {
            debug!("added node {}", node_id);
        }
        self.touch();
    }

    /// Remove a node and turn every answer pointing at it into a placeholder
    /// solution. Refuses unknown ids and the current root.
    pub fn remove_node(&mut self, node_id: &str) -> bool {
        if self.root_node_id.as_deref() == Some(node_id) {
            warn!("refusing to remove root node {}", node_id);
            return false;
        }
        if self.nodes.remove(node_id).is_none() {
            warn!("cannot remove unknown node {}", node_id);
            return false;
        }

        let rewritten = self.detach_references(node_id);
        info!(
            "removed node {} ({} answers converted to solutions)",
            node_id, rewritten
        );
        self.touch();
        true
    }

    /// Second phase of removal: rewrite every answer that links to `node_id`
    /// into a solution carrying [`REMOVED_PATH_SOLUTION`]. Returns the number
    /// of answers rewritten.
    pub fn detach_references(&mut self, node_id: &str) -> usize {
        let mut rewritten = 0;
        for node in self.nodes.values_mut() {
            for answer in node
                .answers
                .iter_mut()
                .filter(|a| a.next_node_id.as_deref() == Some(node_id))
            {
                answer.convert_to_solution(REMOVED_PATH_SOLUTION);
                rewritten += 1;
                debug!(
                    "answer {} of node {} no longer leads to {}",
                    answer.answer_id, node.node_id, node_id
                );
            }
        }
        rewritten
    }

    pub fn get_node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Mutable access to a node. Does not touch the modified date; call
    /// [`Guide::touch`] after editing.
    pub fn node_mut(&mut self, node_id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub fn get_root_node(&self) -> Option<&Node> {
        self.root_node_id
            .as_deref()
            .and_then(|id| self.nodes.get(id))
    }

    pub fn root_node_id(&self) -> Option<&NodeId> {
        self.root_node_id.as_ref()
    }

    /// Make an existing node the root.
    pub fn set_root(&mut self, node_id: &str) -> bool {
        match self.nodes.get_key_value(node_id) {
            Some((id, _)) => {
                self.root_node_id = Some(id.clone());
                debug!("node {} is now root", node_id);
                self.touch();
                true
            }
            None => {
                warn!("cannot make unknown node {} root", node_id);
                false
            }
        }
    }

    /// Nodes one continuation hop away, in answer order. Solutions and links
    /// to missing nodes are skipped.
    pub fn get_child_nodes(&self, node_id: &str) -> Vec<&Node> {
        self.get_node(node_id)
            .map(|node| {
                node.answers
                    .iter()
                    .filter_map(|a| a.continuation())
                    .filter_map(|next| self.nodes.get(next))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mark the guide as modified now.
    pub fn touch(&mut self) {
        self.metadata.update_modified_date();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide() -> Guide {
        Guide::new(GuideMetadata::new("Toaster", "Toaster does not heat"))
    }

    #[test]
    fn given_empty_guide_when_adding_first_node_then_it_becomes_root() {
        let mut g = guide();
        g.add_node(Node::with_id("a", "Q1"), false);
        g.add_node(Node::with_id("b", "Q2"), false);

        assert_eq!(g.root_node_id().map(|id| id.as_str()), Some("a"));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn given_explicit_root_flag_when_adding_then_root_moves() {
        let mut g = guide();
        g.add_node(Node::with_id("a", "Q1"), false);
        g.add_node(Node::with_id("b", "Q2"), true);

        assert_eq!(g.get_root_node().map(|n| n.question.as_str()), Some("Q2"));
    }

    #[test]
    fn given_node_when_adding_then_touches_modified_date() {
        let mut g = guide();
        let before = g.metadata.last_modified_date;
        g.add_node(Node::with_id("a", "Q1"), false);
        assert!(g.metadata.last_modified_date >= before);
    }

    #[test]
    fn given_root_when_removing_then_refused() {
        let mut g = guide();
        g.add_node(Node::with_id("a", "Q1"), false);
        let before = g.clone();

        assert!(!g.remove_node("a"));
        assert_eq!(g, before);
    }

    #[test]
    fn given_unknown_node_when_removing_then_refused() {
        let mut g = guide();
        g.add_node(Node::with_id("a", "Q1"), false);
        assert!(!g.remove_node("zzz"));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn given_references_when_detaching_then_every_link_rewritten() {
        let mut g = guide();
        let mut a = Node::with_id("a", "Q1");
        a.add_continuation("to b", "b");
        a.add_continuation("to c", "c");
        let mut c = Node::with_id("c", "Q3");
        c.add_continuation("back to b", "b");
        g.add_node(a, false);
        g.add_node(Node::with_id("b", "Q2"), false);
        g.add_node(c, false);

        assert!(g.remove_node("b"));

        assert!(g.get_node("b").is_none());
        let rewritten: Vec<_> = g
            .nodes()
            .flat_map(|n| n.answers.iter())
            .filter(|a| a.solution_text.as_deref() == Some(REMOVED_PATH_SOLUTION))
            .collect();
        assert_eq!(rewritten.len(), 2);
        assert!(rewritten
            .iter()
            .all(|a| a.is_solution && a.next_node_id.is_none()));
        assert_eq!(g.get_node("a").unwrap().answers[1].next_node_id.as_deref(), Some("c"));
    }

    #[test]
    fn given_unknown_id_when_setting_root_then_refused() {
        let mut g = guide();
        g.add_node(Node::with_id("a", "Q1"), false);
        assert!(!g.set_root("nope"));
        assert!(g.set_root("a"));
    }

    #[test]
    fn given_mixed_answers_when_getting_children_then_only_resolvable_continuations() {
        let mut g = guide();
        let mut a = Node::with_id("a", "Q1");
        a.add_solution("done", "S");
        a.add_continuation("to c", "c");
        a.add_continuation("to missing", "missing");
        a.add_continuation("to b", "b");
        g.add_node(a, false);
        g.add_node(Node::with_id("b", "Q2"), false);
        g.add_node(Node::with_id("c", "Q3"), false);

        let children: Vec<_> = g
            .get_child_nodes("a")
            .iter()
            .map(|n| n.node_id.as_str())
            .collect();
        assert_eq!(children, vec!["c", "b"]);
        assert!(g.get_child_nodes("missing").is_empty());
    }

    #[test]
    fn given_mismatched_key_when_deserializing_then_key_wins() {
        let json = r#"{
            "metadata": {"title": "T", "description": "D"},
            "root_node_id": "a",
            "nodes": {"a": {"node_id": "other", "question": "Q", "answers": []}}
        }"#;
        let g: Guide = serde_json::from_str(json).unwrap();
        assert_eq!(g.get_node("a").unwrap().node_id, "a");
    }

    #[test]
    fn given_empty_root_string_when_deserializing_then_no_root() {
        let json = r#"{"metadata": {"title": "T", "description": "D"}, "root_node_id": "", "nodes": {}}"#;
        let g: Guide = serde_json::from_str(json).unwrap();
        assert!(g.root_node_id().is_none());
        assert!(g.is_empty());
    }
}
