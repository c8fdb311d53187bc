//! Session state owned by the controller.

use super::history::NavigationHistory;
use super::question::QuestionRecord;
use crate::catalog::PoseSlot;

/// A running quiz: the question on display plus the undo/redo ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    pub category: Option<String>,
    pub current: QuestionRecord,
    pub navigation: NavigationHistory,
    /// Highest sequence number handed out so far
    pub last_sequence: u32,
}

impl QuizSession {
    pub fn new(category: Option<String>, first: QuestionRecord) -> Self {
        Self {
            category,
            last_sequence: first.sequence_number,
            current: first,
            navigation: NavigationHistory::new(),
        }
    }
}

/// Dictionary browsing position.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseState {
    pub index: usize,
    pub slot: PoseSlot,
    pub feedback_text: String,
}

/// Top-level controller mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Mode {
    #[default]
    Menu,
    Quiz(QuizSession),
    Browse(BrowseState),
}

impl Mode {
    pub fn is_menu(&self) -> bool {
        matches!(self, Mode::Menu)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Menu => "menu",
            Mode::Quiz(_) => "quiz",
            Mode::Browse(_) => "browse",
        }
    }
}

/// Ordered playback rates; a double press advances through them and wraps.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCycle {
    rates: Vec<f32>,
    index: usize,
}

impl RateCycle {
    /// An empty list falls back to normal speed only
    pub fn new(rates: Vec<f32>) -> Self {
        let rates = if rates.is_empty() { vec![1.0] } else { rates };
        Self { rates, index: 0 }
    }

    pub fn current(&self) -> f32 {
        self.rates[self.index]
    }

    pub fn advance(&mut self) -> f32 {
        self.index = (self.index + 1) % self.rates.len();
        self.current()
    }

    /// Jump to `rate` if it is one of the configured rates
    pub fn set(&mut self, rate: f32) -> bool {
        match self.rates.iter().position(|r| (*r - rate).abs() < f32::EPSILON) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn rates(&self) -> &[f32] {
        &self.rates
    }
}
