use super::question::QuestionRecord;

/// Depth-1 undo/redo over completed questions.
///
/// `history` holds the last solved question, `future` the question displaced
/// by a step back. Stepping back consumes `history` and stepping forward
/// consumes `future`, so at most one of them is occupied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationHistory {
    history: Option<QuestionRecord>,
    future: Option<QuestionRecord>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `record` for back-navigation when it was answered correctly
    pub fn record_if_eligible(&mut self, record: &QuestionRecord) -> bool {
        if record.is_solved() {
            self.history = Some(record.clone());
            true
        } else {
            false
        }
    }

    /// Swap the kept question into `current`, parking the displaced one in `future`
    pub fn step_back(&mut self, current: &mut QuestionRecord) -> bool {
        match self.history.take() {
            Some(previous) => {
                let displaced = std::mem::replace(current, previous);
                self.future = Some(displaced);
                true
            }
            None => false,
        }
    }

    /// Restore the parked question; the one stepped back to is dropped
    pub fn step_forward(&mut self, current: &mut QuestionRecord) -> bool {
        match self.future.take() {
            Some(next) => {
                *current = next;
                true
            }
            None => false,
        }
    }

    pub fn history(&self) -> Option<&QuestionRecord> {
        self.history.as_ref()
    }

    pub fn future(&self) -> Option<&QuestionRecord> {
        self.future.as_ref()
    }

    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }

    pub fn has_future(&self) -> bool {
        self.future.is_some()
    }

    pub fn clear(&mut self) {
        self.history = None;
        self.future = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Entity, PoseSlot};

    fn record(name: &str, sequence_number: u32, answered: bool, correct: bool) -> QuestionRecord {
        QuestionRecord {
            entity: Entity {
                name: name.to_string(),
                category: None,
                description: String::new(),
                poses: Vec::new(),
            },
            options: vec![name.to_string(), "B".to_string(), "C".to_string()],
            displayed_pose: PoseSlot::F2,
            answered,
            correct,
            feedback_text: "text".to_string(),
            sequence_number,
        }
    }

    #[test]
    fn test_only_solved_questions_are_recorded() {
        let mut nav = NavigationHistory::new();
        assert!(!nav.record_if_eligible(&record("A", 1, false, false)));
        assert!(!nav.has_history());

        assert!(nav.record_if_eligible(&record("A", 1, true, true)));
        assert!(nav.record_if_eligible(&record("B", 2, true, true)));
        assert_eq!(nav.history().map(|r| r.sequence_number), Some(2));
    }

    #[test]
    fn test_step_back_then_forward_restores_current() {
        let mut nav = NavigationHistory::new();
        nav.record_if_eligible(&record("A", 1, true, true));

        let before = record("B", 2, false, false);
        let mut current = before.clone();

        assert!(nav.step_back(&mut current));
        assert_eq!(current.sequence_number, 1);
        assert!(!nav.has_history());
        assert!(nav.has_future());

        assert!(nav.step_forward(&mut current));
        assert_eq!(current, before);
        assert!(!nav.has_history());
        assert!(!nav.has_future());
    }

    #[test]
    fn test_steps_without_targets_are_noops() {
        let mut nav = NavigationHistory::new();
        let before = record("A", 1, false, false);
        let mut current = before.clone();

        assert!(!nav.step_back(&mut current));
        assert!(!nav.step_forward(&mut current));
        assert_eq!(current, before);
        assert_eq!(nav, NavigationHistory::new());
    }
}
