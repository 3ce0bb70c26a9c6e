//! Stepping through a guide one answer at a time.

use tracing::{debug, error, info};

use crate::domain::{DomainError, Guide, Node, NodeId};

pub const SOLUTION_FALLBACK: &str = "Solution found!";
pub const MISSING_STEP: &str = "Error: Next step not found";
pub const END_OF_PATH: &str = "End of troubleshooting path reached";

/// What a choice led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<'g> {
    Node(&'g Node),
    Solution(String),
}

/// A walk through a borrowed guide, starting at its root.
#[derive(Debug, Clone)]
pub struct GuideSession<'g> {
    guide: &'g Guide,
    current: &'g Node,
    history: Vec<NodeId>,
    outcome: Option<String>,
}

impl<'g> GuideSession<'g> {
    pub fn start(guide: &'g Guide) -> Result<Self, DomainError> {
        let root = guide.get_root_node().ok_or(DomainError::NoRoot)?;
        info!("starting guide '{}'", guide.metadata.title);
        Ok(Self {
            guide,
            current: root,
            history: Vec::new(),
            outcome: None,
        })
    }

    /// Node currently shown. After the session finished this is the node
    /// whose answer ended it.
    pub fn current(&self) -> &'g Node {
        self.current
    }

    pub fn guide(&self) -> &'g Guide {
        self.guide
    }

    /// Pick the answer at `index` (zero based) of the current node.
    pub fn choose(&mut self, index: usize) -> Result<Step<'g>, DomainError> {
        if self.outcome.is_some() {
            return Err(DomainError::SessionFinished);
        }
        let current: &'g Node = self.current;
        let answer = current.answers.get(index).ok_or(DomainError::InvalidChoice {
            index,
            available: current.answers.len(),
        })?;

        self.history.push(current.node_id.clone());

        if answer.is_solution {
            let text = answer
                .solution_text
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(SOLUTION_FALLBACK);
            return Ok(self.finish(text));
        }

        match answer.linked_node() {
            Some(next_id) => match self.guide.get_node(next_id) {
                Some(next) => {
                    debug!("moved from {} to {}", current.node_id, next.node_id);
                    self.current = next;
                    Ok(Step::Node(next))
                }
                None => {
                    error!("next node not found: {}", next_id);
                    Ok(self.finish(MISSING_STEP))
                }
            },
            None => Ok(self.finish(END_OF_PATH)),
        }
    }

    fn finish(&mut self, text: &str) -> Step<'g> {
        info!("guide '{}' finished", self.guide.metadata.title);
        self.outcome = Some(text.to_string());
        Step::Solution(text.to_string())
    }

    /// Return to the previous node, also out of a finished state. Returns
    /// false when there is nothing to go back to.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        match self.guide.get_node(&previous) {
            Some(node) => {
                self.current = node;
                self.outcome = None;
                true
            }
            None => {
                error!("previous node not found: {}", previous);
                false
            }
        }
    }

    pub fn restart(&mut self) -> Result<(), DomainError> {
        self.current = self.guide.get_root_node().ok_or(DomainError::NoRoot)?;
        self.history.clear();
        self.outcome = None;
        debug!("restarted guide '{}'", self.guide.metadata.title);
        Ok(())
    }

    /// Ids of the nodes answered so far, oldest first.
    pub fn history(&self) -> &[NodeId] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref()
    }

    /// 1-based position of the current step.
    pub fn step_count(&self) -> usize {
        self.history.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GuideMetadata;

    fn guide() -> Guide {
        let mut guide = Guide::new(GuideMetadata::new("Kettle", "Water stays cold"));
        let mut root = Node::with_id("root", "Is the kettle plugged in?");
        root.add_solution("No", "Plug it in");
        root.add_continuation("Yes", "switch");
        root.add_continuation("Not sure", "ghost");
        root.add_answer("Skip", None, false, None);
        let mut switch = Node::with_id("switch", "Does the light turn on?");
        switch.add_solution("No", "");
        switch.add_solution("Yes", "Descale the element");
        guide.add_node(root, false);
        guide.add_node(switch, false);
        guide
    }

    #[test]
    fn given_guide_without_root_when_starting_then_no_root_error() {
        let guide = Guide::new(GuideMetadata::new("Empty", ""));
        assert_eq!(GuideSession::start(&guide).unwrap_err(), DomainError::NoRoot);
    }

    #[test]
    fn given_continuation_when_choosing_then_moves_to_next_node() {
        let guide = guide();
        let mut session = GuideSession::start(&guide).unwrap();

        let step = session.choose(1).unwrap();

        assert!(matches!(step, Step::Node(n) if n.node_id == "switch"));
        assert_eq!(session.history(), &[NodeId::from("root")]);
        assert_eq!(session.step_count(), 2);
    }

    #[test]
    fn given_solution_when_choosing_then_finishes_with_text() {
        let guide = guide();
        let mut session = GuideSession::start(&guide).unwrap();

        let step = session.choose(0).unwrap();

        assert_eq!(step, Step::Solution("Plug it in".into()));
        assert!(session.is_finished());
        assert_eq!(session.choose(0), Err(DomainError::SessionFinished));
    }

    #[test]
    fn given_empty_solution_text_when_choosing_then_generic_message() {
        let guide = guide();
        let mut session = GuideSession::start(&guide).unwrap();
        session.choose(1).unwrap();
        assert_eq!(session.choose(0).unwrap(), Step::Solution(SOLUTION_FALLBACK.into()));
    }

    #[test]
    fn given_missing_target_when_choosing_then_error_outcome() {
        let guide = guide();
        let mut session = GuideSession::start(&guide).unwrap();
        assert_eq!(session.choose(2).unwrap(), Step::Solution(MISSING_STEP.into()));
    }

    #[test]
    fn given_answer_without_link_when_choosing_then_end_of_path() {
        let guide = guide();
        let mut session = GuideSession::start(&guide).unwrap();
        assert_eq!(session.choose(3).unwrap(), Step::Solution(END_OF_PATH.into()));
    }

    #[test]
    fn given_out_of_range_index_when_choosing_then_invalid_choice() {
        let guide = guide();
        let mut session = GuideSession::start(&guide).unwrap();
        assert_eq!(
            session.choose(9),
            Err(DomainError::InvalidChoice {
                index: 9,
                available: 4
            })
        );
        assert!(session.history().is_empty());
    }

    #[test]
    fn given_finished_session_when_going_back_then_reopens_last_node() {
        let guide = guide();
        let mut session = GuideSession::start(&guide).unwrap();
        session.choose(1).unwrap();
        session.choose(1).unwrap();

        assert!(session.back());
        assert!(!session.is_finished());
        assert_eq!(session.current().node_id, "switch");
        assert!(session.back());
        assert_eq!(session.current().node_id, "root");
        assert!(!session.back());
    }

    #[test]
    fn given_progress_when_restarting_then_back_at_root() {
        let guide = guide();
        let mut session = GuideSession::start(&guide).unwrap();
        session.choose(1).unwrap();
        session.restart().unwrap();
        assert_eq!(session.current().node_id, "root");
        assert!(session.history().is_empty());
    }
}
