//! Device key input.
//!
//! - [`keys`] - raw code table for the six physical buttons
//! - [`double_press`] - F4 single/double press state machine
//! - [`router`] - debounce and context-sensitive mapping to [`Command`]s

pub mod double_press;
pub mod keys;
pub mod router;

pub use double_press::{DoublePress, PendingPress, PlaybackGesture, PressState};
pub use keys::DeviceKey;
pub use router::{Command, KeyRouter, RouteContext, Routed};
