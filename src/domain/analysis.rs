//! Graph algorithms over a guide: path enumeration, statistics and
//! structural validation.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Guide, NodeDefect, NodeId};

/// Aggregate numbers derived from a guide's paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideStatistics {
    pub total_nodes: usize,
    pub total_paths: usize,
    pub shortest_path: usize,
    pub longest_path: usize,
    pub average_path_length: f64,
    pub total_solutions: usize,
}

/// One structural problem found by [`Guide::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuideIssue {
    #[error("Guide has no root node")]
    MissingRoot,

    #[error("Root node {0} not found in nodes")]
    RootNotFound(NodeId),

    #[error("Node {node_id}: {defect}")]
    InvalidNode { node_id: NodeId, defect: NodeDefect },

    #[error("Node {node_id} references non-existent node {target}")]
    DanglingReference { node_id: NodeId, target: NodeId },

    #[error("Node {0} is not reachable from root")]
    Unreachable(NodeId),

    #[error("Guide contains circular references (cycles)")]
    CycleDetected,
}

/// Result of a full structural check. Issues appear in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<GuideIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// `(is_valid, messages)` view.
    pub fn into_parts(self) -> (bool, Vec<String>) {
        (self.is_valid(), self.messages())
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for issue in &self.issues {
            writeln!(f, "{}", issue)?;
        }
        Ok(())
    }
}

enum Visit<'a> {
    Enter(&'a NodeId),
    Exit(&'a NodeId),
}

impl Guide {
    /// Every root-to-end node sequence, depth first in answer order.
    ///
    /// Revisiting a node already on the current path ends that path as-is. A
    /// node without solutions or continuations still ends a path. Links to
    /// missing nodes contribute nothing.
    pub fn get_all_paths(&self) -> Vec<Vec<NodeId>> {
        let mut paths = Vec::new();
        if let Some(root) = self.root_node_id() {
            self.collect_paths(root, Vec::new(), &mut paths);
        }
        paths
    }

    fn collect_paths(&self, node_id: &NodeId, mut path: Vec<NodeId>, paths: &mut Vec<Vec<NodeId>>) {
        if path.contains(node_id) {
            paths.push(path);
            return;
        }
        let Some(node) = self.get_node(node_id) else {
            return;
        };
        path.push(node_id.clone());

        let mut ended = false;
        let mut continued = false;
        for answer in &node.answers {
            if answer.is_solution {
                paths.push(path.clone());
                ended = true;
            } else if let Some(next) = answer.linked_node() {
                continued = true;
                self.collect_paths(next, path.clone(), paths);
            }
        }

        if !ended && !continued {
            paths.push(path);
        }
    }

    pub fn get_statistics(&self) -> GuideStatistics {
        let lengths: Vec<usize> = self.get_all_paths().iter().map(Vec::len).collect();
        let total_solutions = self
            .nodes()
            .flat_map(|n| n.answers.iter())
            .filter(|a| a.is_solution)
            .count();

        let average_path_length = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
        };

        GuideStatistics {
            total_nodes: self.len(),
            total_paths: lengths.len(),
            shortest_path: lengths.iter().copied().min().unwrap_or(0),
            longest_path: lengths.iter().copied().max().unwrap_or(0),
            average_path_length,
            total_solutions,
        }
    }

    /// Full structural check. Collects every issue instead of stopping at the
    /// first one.
    #[instrument(level = "debug", skip(self), fields(title = %self.metadata.title))]
    pub fn validate(&self) -> ValidationReport {
        let mut issues = Vec::new();

        match self.root_node_id() {
            None => issues.push(GuideIssue::MissingRoot),
            Some(root) if !self.contains(root) => {
                issues.push(GuideIssue::RootNotFound(root.clone()))
            }
            Some(_) => {}
        }

        for node in self.nodes() {
            if let Err(defect) = node.validity() {
                issues.push(GuideIssue::InvalidNode {
                    node_id: node.node_id.clone(),
                    defect,
                });
            }
            for target in node.answers.iter().filter_map(|a| a.linked_node()) {
                if !self.contains(target) {
                    issues.push(GuideIssue::DanglingReference {
                        node_id: node.node_id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        if self.root_node_id().is_some() {
            let reachable = self.reachable_nodes();
            issues.extend(
                self.nodes()
                    .filter(|n| !reachable.contains(&n.node_id))
                    .map(|n| GuideIssue::Unreachable(n.node_id.clone())),
            );
        }

        if self.has_cycles() {
            issues.push(GuideIssue::CycleDetected);
        }

        debug!("validation found {} issues", issues.len());
        ValidationReport { issues }
    }

    /// Ids reachable from root over continuation edges. The root id itself is
    /// included even when no such node exists.
    pub fn reachable_nodes(&self) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        let Some(root) = self.root_node_id() else {
            return visited;
        };

        let mut to_visit = vec![root.clone()];
        while let Some(node_id) = to_visit.pop() {
            if !visited.insert(node_id.clone()) {
                continue;
            }
            if let Some(node) = self.get_node(&node_id) {
                to_visit.extend(node.answers.iter().filter_map(|a| a.continuation()).cloned());
            }
        }
        visited
    }

    /// True if any continuation cycle exists anywhere in the node map,
    /// reachable from root or not.
    pub fn has_cycles(&self) -> bool {
        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut on_stack: BTreeSet<&NodeId> = BTreeSet::new();

        for start in self.nodes().map(|n| &n.node_id) {
            if visited.contains(start) {
                continue;
            }

            let mut stack = vec![Visit::Enter(start)];
            while let Some(visit) = stack.pop() {
                match visit {
                    Visit::Enter(node_id) => {
                        if !visited.insert(node_id) {
                            continue;
                        }
                        on_stack.insert(node_id);
                        stack.push(Visit::Exit(node_id));

                        let Some(node) = self.get_node(node_id) else {
                            continue;
                        };
                        for next in node.answers.iter().filter_map(|a| a.continuation()) {
                            if on_stack.contains(next) {
                                debug!("cycle through {} -> {}", node_id, next);
                                return true;
                            }
                            if !visited.contains(next) {
                                stack.push(Visit::Enter(next));
                            }
                        }
                    }
                    Visit::Exit(node_id) => {
                        on_stack.remove(node_id);
                    }
                }
            }
        }
        false
    }
}
