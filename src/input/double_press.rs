//! Single versus double press detection for the F4 key.

use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// What the F4 key asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackGesture {
    /// Single press: read the current feedback again
    Repeat,
    /// Double press: move to the next playback rate
    CycleRate,
}

/// An armed single-press timer. The host schedules the expiry and reports
/// it back with [`DoublePress::on_timer_elapsed`]; the token is cancelled when
/// a second press or a cancellation disarms the timer.
#[derive(Debug, Clone)]
pub struct PendingPress {
    pub generation: u64,
    pub deadline: Instant,
    pub token: CancellationToken,
}

#[derive(Debug, Clone, Default)]
pub enum PressState {
    #[default]
    Idle,
    AwaitingSecondPress(PendingPress),
}

/// Outcome of one press.
#[derive(Debug, Clone)]
pub struct PressOutcome {
    /// A gesture that is complete now
    pub gesture: Option<PlaybackGesture>,
    /// A freshly armed timer the host must schedule
    pub armed: Option<PendingPress>,
}

#[derive(Debug)]
pub struct DoublePress {
    window: Duration,
    state: PressState,
    next_generation: u64,
}

impl DoublePress {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: PressState::Idle,
            next_generation: 1,
        }
    }

    pub fn state(&self) -> &PressState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, PressState::AwaitingSecondPress(_))
    }

    pub fn press(&mut self, now: Instant) -> PressOutcome {
        match std::mem::take(&mut self.state) {
            PressState::AwaitingSecondPress(pending) if now < pending.deadline => {
                pending.token.cancel();
                PressOutcome {
                    gesture: Some(PlaybackGesture::CycleRate),
                    armed: None,
                }
            }
            PressState::AwaitingSecondPress(stale) => {
                // The expiry has not been delivered yet; the first press still counts.
                stale.token.cancel();
                PressOutcome {
                    gesture: Some(PlaybackGesture::Repeat),
                    armed: Some(self.arm(now)),
                }
            }
            PressState::Idle => PressOutcome {
                gesture: None,
                armed: Some(self.arm(now)),
            },
        }
    }

    fn arm(&mut self, now: Instant) -> PendingPress {
        let pending = PendingPress {
            generation: self.next_generation,
            deadline: now + self.window,
            token: CancellationToken::new(),
        };
        self.next_generation += 1;
        self.state = PressState::AwaitingSecondPress(pending.clone());
        pending
    }

    /// Timer expiry for `generation`; stale generations are ignored
    pub fn on_timer_elapsed(&mut self, generation: u64) -> Option<PlaybackGesture> {
        match &self.state {
            PressState::AwaitingSecondPress(pending) if pending.generation == generation => {
                self.state = PressState::Idle;
                Some(PlaybackGesture::Repeat)
            }
            _ => None,
        }
    }

    /// Poll-based expiry for hosts that do not run timers
    pub fn poll_expired(&mut self, now: Instant) -> Option<PlaybackGesture> {
        match &self.state {
            PressState::AwaitingSecondPress(pending) if now >= pending.deadline => {
                let generation = pending.generation;
                self.on_timer_elapsed(generation)
            }
            _ => None,
        }
    }

    /// Disarm without emitting anything
    pub fn cancel(&mut self) {
        if let PressState::AwaitingSecondPress(pending) = std::mem::take(&mut self.state) {
            pending.token.cancel();
        }
    }
}
