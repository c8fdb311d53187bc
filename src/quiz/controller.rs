//! Session controller: the quiz state machine.
//!
//! Every operation is defensive. Calls that make no sense in the current
//! state are logged at debug level and leave the state untouched, because
//! the device has no channel to receive an error.

use super::feedback;
use super::question::{QuestionGenerator, QuestionRecord};
use super::session::{BrowseState, Mode, QuizSession, RateCycle};
use crate::catalog::{Catalog, Entity, PoseSlot};
use crate::config::Config;
use crate::error::QuizError;
use crate::input::{Command, PlaybackGesture, RouteContext};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Side effect a command asks of the host beyond the state change itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Speak the current feedback again even though it did not change
    RepeatSpeech,
}

pub struct SessionController {
    catalog: Arc<Catalog>,
    generator: QuestionGenerator,
    rng: StdRng,
    mode: Mode,
    playback: RateCycle,
}

impl SessionController {
    pub fn new(catalog: Arc<Catalog>, config: &Config) -> Self {
        Self::with_rng(catalog, config, StdRng::from_entropy())
    }

    /// Controller with a caller-supplied random source
    pub fn with_rng(catalog: Arc<Catalog>, config: &Config, rng: StdRng) -> Self {
        Self {
            catalog,
            generator: QuestionGenerator::new(config.quiz.min_pose_content_len),
            rng,
            mode: Mode::Menu,
            playback: RateCycle::new(config.speech.playback_rates.clone()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_active(&self) -> bool {
        !self.mode.is_menu()
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        match &self.mode {
            Mode::Quiz(session) => Some(session),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&QuestionRecord> {
        self.quiz().map(|session| &session.current)
    }

    pub fn playback_rate(&self) -> f32 {
        self.playback.current()
    }

    pub fn min_pose_content_len(&self) -> usize {
        self.generator.min_pose_content_len()
    }

    /// Text the speech collaborator should be reading, if any
    pub fn feedback_text(&self) -> Option<&str> {
        match &self.mode {
            Mode::Menu => None,
            Mode::Quiz(session) => Some(session.current.feedback_text.as_str()),
            Mode::Browse(state) => Some(state.feedback_text.as_str()),
        }
    }

    /// Key table the router should apply right now
    pub fn route_context(&self) -> RouteContext {
        match &self.mode {
            Mode::Menu => RouteContext::Menu,
            Mode::Quiz(session) if session.current.answered => RouteContext::Answered,
            Mode::Quiz(_) => RouteContext::Unanswered,
            Mode::Browse(_) => RouteContext::Browsing,
        }
    }

    /// Menu -> quiz over the whole catalog or one category
    pub fn start_session(&mut self, category: Option<&str>) -> Result<(), QuizError> {
        if !self.mode.is_menu() {
            debug!("start_session ignored in {} mode", self.mode.name());
            return Ok(());
        }

        let pool = self.catalog.pool(category);
        let first = self.generator.generate(&pool, category, 1, &mut self.rng)?;
        info!(
            "Quiz started{} with {} candidates",
            category.map(|c| format!(" in category '{}'", c)).unwrap_or_default(),
            pool.len()
        );
        self.mode = Mode::Quiz(QuizSession::new(category.map(str::to_string), first));
        Ok(())
    }

    /// Menu -> dictionary browsing from the first entry
    pub fn start_browse(&mut self) -> Result<(), QuizError> {
        if !self.mode.is_menu() {
            debug!("start_browse ignored in {} mode", self.mode.name());
            return Ok(());
        }
        let Some(entity) = self.catalog.get(0) else {
            return Err(QuizError::EmptyPool { category: None });
        };

        let slot = Self::primary_slot(entity, self.generator.min_pose_content_len());
        self.mode = Mode::Browse(BrowseState {
            index: 0,
            slot,
            feedback_text: feedback::browse_entry(entity, slot),
        });
        info!("Browsing {} catalog entries", self.catalog.len());
        Ok(())
    }

    /// Any active mode -> menu; clears the session and resets the playback rate
    pub fn end_session(&mut self) {
        if self.mode.is_menu() {
            debug!("end_session ignored in menu");
            return;
        }
        info!("Leaving {} mode", self.mode.name());
        self.mode = Mode::Menu;
        self.playback.reset();
    }

    /// Check `selected` against the current question
    pub fn submit_answer(&mut self, selected: &str) {
        let min_len = self.generator.min_pose_content_len();
        let Mode::Quiz(session) = &mut self.mode else {
            debug!("submit_answer ignored outside a quiz");
            return;
        };
        let current = &mut session.current;
        if current.answered {
            debug!("Question {} already answered", current.sequence_number);
            return;
        }

        current.correct = selected == current.entity.name;
        if current.correct {
            current.answered = true;
            current.feedback_text = feedback::correct_answer(&current.entity, min_len);
            info!("Question {} answered correctly", current.sequence_number);
        } else {
            current.feedback_text =
                feedback::wrong_answer(selected, &current.options, session.navigation.has_history());
            info!("Question {}: wrong answer '{}'", current.sequence_number, selected);
        }
    }

    /// Answer with the option behind function key `index`
    pub fn select_option(&mut self, index: usize) {
        let Some(option) = self.current().and_then(|q| q.options.get(index)).cloned() else {
            debug!("No option at index {}", index);
            return;
        };
        self.submit_answer(&option);
    }

    /// Next question: restore a parked question, or record the current one and draw a new one
    pub fn advance(&mut self) {
        let catalog = Arc::clone(&self.catalog);
        let min_len = self.generator.min_pose_content_len();
        match &mut self.mode {
            Mode::Menu => debug!("advance ignored in menu"),
            Mode::Browse(state) => {
                let index = (state.index + 1) % catalog.len().max(1);
                Self::browse_to(&catalog, state, index, min_len);
            }
            Mode::Quiz(session) => {
                if session.navigation.step_forward(&mut session.current) {
                    info!("Returned to question {}", session.current.sequence_number);
                    return;
                }

                let pool = catalog.pool(session.category.as_deref());
                let next_sequence = session.last_sequence + 1;
                let question =
                    match self
                        .generator
                        .generate(&pool, session.category.as_deref(), next_sequence, &mut self.rng)
                    {
                        Ok(question) => question,
                        Err(err) => {
                            debug!("advance failed: {}", err);
                            return;
                        }
                    };

                session.navigation.record_if_eligible(&session.current);
                session.last_sequence = next_sequence;
                session.current = question;
                debug!("Question {} drawn", next_sequence);
            }
        }
    }

    /// Previous question, when one was solved before this one
    pub fn go_back(&mut self) {
        let catalog = Arc::clone(&self.catalog);
        let min_len = self.generator.min_pose_content_len();
        match &mut self.mode {
            Mode::Menu => debug!("go_back ignored in menu"),
            Mode::Browse(state) => {
                let len = catalog.len().max(1);
                let index = (state.index + len - 1) % len;
                Self::browse_to(&catalog, state, index, min_len);
            }
            Mode::Quiz(session) => {
                if !session.navigation.step_back(&mut session.current) {
                    debug!("No previous question to return to");
                    return;
                }
                let current = &mut session.current;
                current.displayed_pose = Self::primary_slot(&current.entity, min_len);
                info!("Back to question {}", current.sequence_number);
            }
        }
    }

    /// Show another pose of the entity; only after the question is solved
    pub fn switch_pose_variant(&mut self, slot: PoseSlot) {
        let catalog = Arc::clone(&self.catalog);
        let min_len = self.generator.min_pose_content_len();
        match &mut self.mode {
            Mode::Menu => debug!("switch_pose_variant ignored in menu"),
            Mode::Quiz(session) => {
                let current = &mut session.current;
                if !current.answered {
                    debug!("Pose switch ignored before the answer");
                } else if !current.entity.has_content(slot, min_len) {
                    debug!("{} has no content in {:?}", current.entity.name, slot);
                } else {
                    current.displayed_pose = slot;
                }
            }
            Mode::Browse(state) => match catalog.get(state.index) {
                Some(entity) if entity.has_content(slot, min_len) => {
                    state.slot = slot;
                    state.feedback_text = feedback::browse_entry(entity, slot);
                }
                _ => debug!("Browse entry has no content in {:?}", slot),
            },
        }
    }

    fn browse_to(catalog: &Catalog, state: &mut BrowseState, index: usize, min_len: usize) {
        if let Some(entity) = catalog.get(index) {
            state.index = index;
            state.slot = Self::primary_slot(entity, min_len);
            state.feedback_text = feedback::browse_entry(entity, state.slot);
        }
    }

    /// First slot with usable content
    fn primary_slot(entity: &Entity, min_len: usize) -> PoseSlot {
        entity.valid_slots(min_len).first().copied().unwrap_or(PoseSlot::F1)
    }

    /// Next rate in the cycle
    pub fn cycle_playback_rate(&mut self) -> f32 {
        let rate = self.playback.advance();
        info!("Playback rate set to {}x", rate);
        rate
    }

    /// Pick a rate directly; rates outside the configured set are ignored
    pub fn set_playback_rate(&mut self, rate: f32) -> bool {
        let accepted = self.playback.set(rate);
        if !accepted {
            debug!("Unsupported playback rate {}", rate);
        }
        accepted
    }

    /// Dispatch a routed command
    pub fn apply(&mut self, command: Command) -> Effect {
        if self.mode.is_menu() {
            debug!("{:?} ignored in menu", command);
            return Effect::None;
        }
        match command {
            Command::SelectOption(index) => self.select_option(index),
            Command::NavigateBack => self.go_back(),
            Command::NavigateForward => self.advance(),
            Command::SwitchPoseVariant(slot) => self.switch_pose_variant(slot),
            Command::CyclePlaybackOrRepeat(PlaybackGesture::CycleRate) => {
                self.cycle_playback_rate();
            }
            Command::CyclePlaybackOrRepeat(PlaybackGesture::Repeat) => return Effect::RepeatSpeech,
        }
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PoseVariant;

    fn entity(name: &str, frames: &[&str]) -> Entity {
        Entity {
            name: name.to_string(),
            category: Some("forest".to_string()),
            description: format!("About the {}", name),
            poses: frames
                .iter()
                .enumerate()
                .map(|(i, frame)| PoseVariant {
                    frame: frame.to_string(),
                    label: format!("pose{}", i + 1),
                })
                .collect(),
        }
    }

    fn controller() -> SessionController {
        let catalog = Catalog::new(vec![
            entity("Fox", &["pose-content-aaaaaaaaaa", "pose-content-bbbbbbbbbb"]),
            entity("Wolf", &["pose-content-cccccccccc"]),
            entity("Bear", &["short", "pose-content-dddddddddd"]),
        ]);
        SessionController::with_rng(Arc::new(catalog), &Config::default(), StdRng::seed_from_u64(11))
    }

    fn answer_correctly(controller: &mut SessionController) {
        let name = controller.current().unwrap().entity.name.clone();
        controller.submit_answer(&name);
    }

    fn wrong_name(controller: &SessionController) -> String {
        let current = controller.current().unwrap();
        current.options.iter().find(|o| **o != current.entity.name).unwrap().clone()
    }

    #[test]
    fn test_start_session_resets_sequence() {
        let mut controller = controller();
        assert_eq!(controller.route_context(), RouteContext::Menu);
        controller.start_session(None).unwrap();
        assert_eq!(controller.current().unwrap().sequence_number, 1);
        assert_eq!(controller.route_context(), RouteContext::Unanswered);
    }

    #[test]
    fn test_correct_answer_is_idempotent() {
        let mut controller = controller();
        controller.start_session(None).unwrap();
        answer_correctly(&mut controller);

        let after_first = controller.current().unwrap().clone();
        assert!(after_first.answered && after_first.correct);
        assert!(!after_first.feedback_text.is_empty());

        controller.submit_answer("Wolf");
        controller.submit_answer(&after_first.entity.name);
        assert_eq!(controller.current().unwrap(), &after_first);
        assert_eq!(controller.route_context(), RouteContext::Answered);
    }

    #[test]
    fn test_wrong_answer_stays_unanswered() {
        let mut controller = controller();
        controller.start_session(None).unwrap();
        let wrong = wrong_name(&controller);
        controller.submit_answer(&wrong);

        let current = controller.current().unwrap();
        assert!(!current.answered);
        assert!(!current.correct);
        assert!(current.feedback_text.contains(&wrong));
        assert!(!current.feedback_text.contains(crate::constants::PROMPT_BACK_HINT));
    }

    #[test]
    fn test_advance_increments_sequence_and_records_history() {
        let mut controller = controller();
        controller.start_session(None).unwrap();
        answer_correctly(&mut controller);
        let solved = controller.current().unwrap().clone();

        controller.advance();
        let session = controller.quiz().unwrap();
        assert_eq!(session.current.sequence_number, 2);
        assert_eq!(session.navigation.history(), Some(&solved));
        assert!(!session.current.answered);
    }

    #[test]
    fn test_skipping_unanswered_question_keeps_no_history() {
        let mut controller = controller();
        controller.start_session(None).unwrap();
        controller.advance();
        let session = controller.quiz().unwrap();
        assert_eq!(session.current.sequence_number, 2);
        assert!(!session.navigation.has_history());
    }

    #[test]
    fn test_back_then_forward_restores_exact_question() {
        let mut controller = controller();
        controller.start_session(None).unwrap();
        answer_correctly(&mut controller);
        controller.advance();
        let before = controller.current().unwrap().clone();

        controller.go_back();
        let session = controller.quiz().unwrap();
        assert_eq!(session.current.sequence_number, 1);
        assert_eq!(session.current.displayed_pose, session.current.entity.valid_slots(10)[0]);
        assert!(session.navigation.has_future());

        controller.advance();
        let session = controller.quiz().unwrap();
        assert_eq!(session.current, before);
        assert!(!session.navigation.has_history());
        assert!(!session.navigation.has_future());

        // Sequence numbers continue from the highest handed out
        controller.advance();
        assert_eq!(controller.current().unwrap().sequence_number, 3);
    }

    #[test]
    fn test_go_back_without_history_is_noop() {
        let mut controller = controller();
        controller.start_session(None).unwrap();
        let before = controller.quiz().unwrap().clone();
        controller.go_back();
        assert_eq!(controller.quiz().unwrap(), &before);
    }

    #[test]
    fn test_wrong_answer_mentions_back_navigation_when_available() {
        let mut controller = controller();
        controller.start_session(None).unwrap();
        answer_correctly(&mut controller);
        controller.advance();
        let wrong = wrong_name(&controller);
        controller.submit_answer(&wrong);
        assert!(controller
            .current()
            .unwrap()
            .feedback_text
            .contains(crate::constants::PROMPT_BACK_HINT));
    }

    #[test]
    fn test_pose_switch_requires_answer_and_content() {
        let mut controller = controller();
        controller.start_session(None).unwrap();
        let before = controller.current().unwrap().displayed_pose;
        controller.switch_pose_variant(PoseSlot::F3);
        assert_eq!(controller.current().unwrap().displayed_pose, before);

        answer_correctly(&mut controller);
        // No entity in this catalog has a third pose
        controller.switch_pose_variant(PoseSlot::F3);
        assert_eq!(controller.current().unwrap().displayed_pose, before);

        let valid = controller.current().unwrap().entity.valid_slots(10);
        let target = *valid.last().unwrap();
        controller.switch_pose_variant(target);
        assert_eq!(controller.current().unwrap().displayed_pose, target);
    }

    #[test]
    fn test_end_session_clears_everything() {
        let mut controller = controller();
        controller.start_session(None).unwrap();
        controller.cycle_playback_rate();
        assert_eq!(controller.playback_rate(), 2.0);

        controller.end_session();
        assert!(controller.current().is_none());
        assert!(controller.feedback_text().is_none());
        assert_eq!(controller.playback_rate(), 1.0);
        assert_eq!(controller.mode(), &Mode::Menu);
    }

    #[test]
    fn test_unknown_category_cannot_start() {
        let mut controller = controller();
        let err = controller.start_session(Some("ocean")).unwrap_err();
        assert!(matches!(err, QuizError::EmptyPool { .. }));
        assert_eq!(controller.mode(), &Mode::Menu);
    }

    #[test]
    fn test_commands_are_ignored_in_menu() {
        let mut controller = controller();
        assert_eq!(controller.apply(Command::NavigateForward), Effect::None);
        assert_eq!(
            controller.apply(Command::CyclePlaybackOrRepeat(PlaybackGesture::CycleRate)),
            Effect::None
        );
        assert_eq!(controller.playback_rate(), 1.0);
        assert_eq!(controller.mode(), &Mode::Menu);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut controller = controller();
        controller.start_session(None).unwrap();
        let index = {
            let current = controller.current().unwrap();
            current.options.iter().position(|o| *o == current.entity.name).unwrap()
        };
        controller.apply(Command::SelectOption(index));
        assert!(controller.current().unwrap().answered);

        assert_eq!(
            controller.apply(Command::CyclePlaybackOrRepeat(PlaybackGesture::Repeat)),
            Effect::RepeatSpeech
        );
        controller.apply(Command::CyclePlaybackOrRepeat(PlaybackGesture::CycleRate));
        assert_eq!(controller.playback_rate(), 2.0);
    }

    #[test]
    fn test_browse_wraps_and_switches_pose() {
        let mut controller = controller();
        controller.start_browse().unwrap();
        assert_eq!(controller.route_context(), RouteContext::Browsing);
        assert!(controller.feedback_text().unwrap().starts_with("Fox"));

        controller.go_back();
        assert!(controller.feedback_text().unwrap().starts_with("Bear"));

        // Bear's first pose is a placeholder, its second is real
        controller.switch_pose_variant(PoseSlot::F2);
        match controller.mode() {
            Mode::Browse(state) => assert_eq!(state.slot, PoseSlot::F2),
            other => panic!("unexpected mode {:?}", other),
        }

        controller.advance();
        assert!(controller.feedback_text().unwrap().starts_with("Fox"));
    }
}
