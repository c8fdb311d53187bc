//! tactile-quiz - a multiple-choice quiz played on a tactile braille display
//!
//! The display exposes four function keys and two panning keys and reports
//! presses asynchronously. This library turns those raw key codes into quiz
//! actions, keeps quiz progress with single-level back/forward navigation,
//! and derives the graphic and braille frames plus the spoken feedback the
//! host should present.
//!
//! # Modules
//!
//! * [`catalog`] - Entities, pose variants and the braille table
//! * [`config`] - Application configuration management
//! * [`input`] - Key code routing, debounce and F4 double-press detection
//! * [`quiz`] - Question generation, navigation history and the session controller
//! * [`encoder`] - Graphic and braille frame derivation
//! * [`device`] - Device and speech collaborator traits
//! * [`runtime`] - Event loop connecting everything to the collaborators

/// Catalog of entities shown in the quiz
pub mod catalog;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and spoken phrases
pub mod constants;

/// Device adapter and speech engine interfaces
pub mod device;

/// Frame derivation for the tactile display
pub mod encoder;

/// Error types surfaced to the host
pub mod error;

/// Raw key handling
pub mod input;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Quiz state machine
pub mod quiz;

/// Event loop driving a session against real collaborators
pub mod runtime;

pub use error::{DeviceError, QuizError};
