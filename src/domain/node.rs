//! Nodes and answers: the atomic decision unit of a guide.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{AnswerId, NodeId};

/// Minimum number of answers a well-formed node offers.
pub const MIN_ANSWERS: usize = 2;

/// One choice at a node: either a continuation to another node or a solution.
///
/// Construction never checks the solution/continuation invariant so that an
/// author can hold half-edited answers; `Node::validity` reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default = "AnswerId::generate")]
    pub answer_id: AnswerId,
    pub answer_text: String,
    #[serde(default)]
    pub next_node_id: Option<NodeId>,
    #[serde(default)]
    pub is_solution: bool,
    #[serde(default)]
    pub solution_text: Option<String>,
}

impl Answer {
    pub fn new(
        answer_text: impl Into<String>,
        next_node_id: Option<NodeId>,
        is_solution: bool,
        solution_text: Option<String>,
    ) -> Self {
        Self {
            answer_id: AnswerId::generate(),
            answer_text: answer_text.into(),
            next_node_id,
            is_solution,
            solution_text,
        }
    }

    /// Target of this answer when it is a usable edge: not a solution and
    /// carrying a non-empty node id.
    pub fn continuation(&self) -> Option<&NodeId> {
        if self.is_solution {
            return None;
        }
        self.linked_node()
    }

    /// Non-empty `next_node_id`, regardless of the solution flag.
    pub fn linked_node(&self) -> Option<&NodeId> {
        self.next_node_id.as_ref().filter(|id| !id.is_empty())
    }

    /// Turn this answer into a terminal solution, dropping its link.
    pub fn convert_to_solution(&mut self, solution_text: impl Into<String>) {
        self.next_node_id = None;
        self.is_solution = true;
        self.solution_text = Some(solution_text.into());
    }

    fn has_solution_text(&self) -> bool {
        self.solution_text
            .as_deref()
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }
}

/// First rule a node breaks, in check order.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeDefect {
    #[error("Node must have a question")]
    MissingQuestion,

    #[error("Node must have at least 2 answers")]
    TooFewAnswers,

    #[error("All answers must have text")]
    EmptyAnswerText,

    #[error("Solution answers must have solution text")]
    MissingSolutionText,

    #[error("Non-solution answers must link to next node")]
    MissingNextNode,
}

/// A question with an ordered list of answers.
///
/// Answer order is presentation order and drives path enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default = "NodeId::generate")]
    pub node_id: NodeId,
    pub question: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub help_text: Option<String>,
    /// Informational back-reference; traversal never follows it.
    #[serde(default)]
    pub parent_node_id: Option<NodeId>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Node {
    pub fn new(question: impl Into<String>) -> Self {
        Self::with_id(NodeId::generate(), question)
    }

    pub fn with_id(node_id: impl Into<NodeId>, question: impl Into<String>) -> Self {
        let node = Self {
            node_id: node_id.into(),
            question: question.into(),
            description: None,
            help_text: None,
            parent_node_id: None,
            answers: Vec::new(),
        };
        debug!("created node {}", node.node_id);
        node
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent_node_id = Some(parent.into());
        self
    }

    /// Append an answer with a fresh id. No validation happens here.
    pub fn add_answer(
        &mut self,
        answer_text: impl Into<String>,
        next_node_id: Option<NodeId>,
        is_solution: bool,
        solution_text: Option<String>,
    ) -> &Answer {
        let answer = Answer::new(answer_text, next_node_id, is_solution, solution_text);
        debug!(
            "added answer {} '{}' to node {}",
            answer.answer_id, answer.answer_text, self.node_id
        );
        self.answers.push(answer);
        &self.answers[self.answers.len() - 1]
    }

    /// Append an answer leading to `next`.
    pub fn add_continuation(
        &mut self,
        answer_text: impl Into<String>,
        next: impl Into<NodeId>,
    ) -> &Answer {
        self.add_answer(answer_text, Some(next.into()), false, None)
    }

    /// Append a terminal answer.
    pub fn add_solution(
        &mut self,
        answer_text: impl Into<String>,
        solution_text: impl Into<String>,
    ) -> &Answer {
        self.add_answer(answer_text, None, true, Some(solution_text.into()))
    }

    /// Remove an answer by id. Other nodes are not affected.
    pub fn remove_answer(&mut self, answer_id: &str) -> bool {
        let before = self.answers.len();
        self.answers.retain(|a| a.answer_id.as_str() != answer_id);
        let removed = self.answers.len() < before;
        if removed {
            debug!("removed answer {} from node {}", answer_id, self.node_id);
        } else {
            warn!("answer {} not found in node {}", answer_id, self.node_id);
        }
        removed
    }

    pub fn answer(&self, answer_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.answer_id.as_str() == answer_id)
    }

    pub fn answer_mut(&mut self, answer_id: &str) -> Option<&mut Answer> {
        self.answers
            .iter_mut()
            .find(|a| a.answer_id.as_str() == answer_id)
    }

    /// True when no answer leads anywhere (vacuously true without answers).
    pub fn is_leaf(&self) -> bool {
        self.answers.iter().all(|a| a.is_solution)
    }

    /// Local well-formedness check. Link targets are not resolved here.
    pub fn validity(&self) -> Result<(), NodeDefect> {
        if self.question.is_empty() {
            return Err(NodeDefect::MissingQuestion);
        }
        if self.answers.len() < MIN_ANSWERS {
            return Err(NodeDefect::TooFewAnswers);
        }
        for answer in &self.answers {
            if answer.answer_text.is_empty() {
                return Err(NodeDefect::EmptyAnswerText);
            }
            if answer.is_solution && !answer.has_solution_text() {
                return Err(NodeDefect::MissingSolutionText);
            }
            if !answer.is_solution && answer.linked_node().is_none() {
                return Err(NodeDefect::MissingNextNode);
            }
        }
        Ok(())
    }

    /// Pass/fail plus the first violation message (empty on success).
    pub fn is_valid(&self) -> (bool, String) {
        match self.validity() {
            Ok(()) => (true, String::new()),
            Err(defect) => (false, defect.to_string()),
        }
    }
}
