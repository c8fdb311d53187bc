//! Constants used throughout the application
//!
//! This module centralizes spoken phrases, protocol values, and other constant
//! values to improve maintainability and consistency.

// Device protocol
/// Minimum number of characters a pose frame must carry to count as real content
pub const DEFAULT_MIN_POSE_CONTENT_LEN: usize = 10;
/// Window in which a repeated key code is treated as a duplicate of the previous one
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
/// Window in which a second F4 press turns a repeat into a rate change
pub const DEFAULT_DOUBLE_PRESS_WINDOW_MS: u64 = 500;
/// Number of answer options presented per question
pub const OPTION_COUNT: usize = 3;
/// Braille token sent for labels missing from the braille table
pub const BLANK_BRAILLE_TOKEN: &str = "000000";
/// Default device name shown when connecting
pub const DEFAULT_DEVICE_NAME: &str = "DotPad";

// Playback
pub const DEFAULT_PLAYBACK_RATES: [f32; 3] = [1.0, 2.0, 4.0];

// Spoken ordinals for the three function keys
pub const ORDINALS: [&str; 3] = ["first", "second", "third"];

// Quiz phrases
pub const PROMPT_QUESTION: &str = "Which one is this?";
pub const PROMPT_CORRECT: &str = "Correct!";
pub const PROMPT_POSE_HINT: &str = "Press F1 to F3 to feel the other poses.";
pub const PROMPT_NEXT_HINT: &str = "Press the right arrow for the next question.";
pub const PROMPT_BACK_HINT: &str = "Press the left arrow to review the previous question.";
pub const PROMPT_WRONG: &str = "is not correct.";
pub const PROMPT_TRY_AGAIN: &str = "Try again.";
pub const POSE_LABEL_NONE: &str = "none";

// Dictionary phrases
pub const PROMPT_BROWSE_HINT: &str = "Use the arrows to move between entries.";

// Host messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const ERROR_NO_CATALOG: &str = "❌ Error: no catalog file configured";
pub const MSG_CONNECTED: &str = "✅ Device connected";
pub const MSG_DISCONNECTED: &str = "❌ Device disconnected";
pub const MSG_MENU_HELP: &str =
    "Commands: start [category], browse, menu, next, prev, repeat, answer <name>, rate <1|2|4>, connect, disconnect, categories, quit. Digits 0-5 are device keys.";

// Log file
pub const LOG_FILE_NAME: &str = "tactile-quiz.log";
pub const APP_DIR_NAME: &str = "tactile-quiz";
