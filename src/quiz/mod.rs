//! Quiz core.
//!
//! - [`question`] - question records and the random generator
//! - [`history`] - depth-1 undo/redo over solved questions
//! - [`session`] - session state and playback rate cycle
//! - [`controller`] - the state machine driving all of the above
//! - [`feedback`] - spoken phrases

pub mod controller;
pub mod feedback;
pub mod history;
pub mod question;
pub mod session;

pub use controller::{Effect, SessionController};
pub use history::NavigationHistory;
pub use question::{QuestionGenerator, QuestionRecord};
pub use session::{BrowseState, Mode, QuizSession, RateCycle};
