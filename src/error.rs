//! Error types surfaced to the host.
//!
//! Stale or out-of-state input is never an error: it is absorbed and logged.
//! Only catalog precondition violations and transport failures reach the host.

/// Reasons a session cannot produce a question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("Cannot start session: no entity with usable pose content{}", category_suffix(.category))]
    EmptyPool { category: Option<String> },

    #[error("Cannot start session: at least 3 distinct names are required, found {found}")]
    NotEnoughOptions { found: usize },
}

fn category_suffix(category: &Option<String>) -> String {
    match category {
        Some(category) => format!(" in category '{}'", category),
        None => String::new(),
    }
}

/// Failures reported by a device adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("Device is not connected")]
    NotConnected,

    #[error("Connection to '{0}' failed")]
    ConnectFailed(String),

    #[error("Transmit failed: {0}")]
    TransmitFailed(String),

    #[error("Device channel closed")]
    Closed,
}
