use super::double_press::{DoublePress, PendingPress, PlaybackGesture};
use super::keys::DeviceKey;
use crate::catalog::PoseSlot;
use crate::config::InputConfig;
use log::debug;
use tokio::time::{Duration, Instant};

/// Semantic commands the controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectOption(usize),
    NavigateBack,
    NavigateForward,
    CyclePlaybackOrRepeat(PlaybackGesture),
    SwitchPoseVariant(PoseSlot),
}

/// Which key table applies, taken from the controller's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteContext {
    /// No session: device keys are ignored
    Menu,
    Unanswered,
    Answered,
    Browsing,
}

/// Result of routing one raw code.
#[derive(Debug, Clone, Default)]
pub struct Routed {
    pub command: Option<Command>,
    /// Single-press timer armed by this code; the host schedules it
    pub armed: Option<PendingPress>,
}

impl Routed {
    fn command(command: Command) -> Self {
        Self {
            command: Some(command),
            armed: None,
        }
    }

    fn ignored() -> Self {
        Self::default()
    }
}

/// Turns raw key codes into commands.
#[derive(Debug)]
pub struct KeyRouter {
    debounce: Duration,
    last_accepted: Option<Instant>,
    double_press: DoublePress,
}

impl KeyRouter {
    pub fn new(debounce: Duration, double_press_window: Duration) -> Self {
        Self {
            debounce,
            last_accepted: None,
            double_press: DoublePress::new(double_press_window),
        }
    }

    pub fn from_config(config: &InputConfig) -> Self {
        Self::new(config.debounce(), config.double_press_window())
    }

    pub fn route(&mut self, code: &str, context: RouteContext, now: Instant) -> Routed {
        let Some(key) = DeviceKey::from_code(code) else {
            debug!("Unmapped key code {:?}", code);
            return Routed::ignored();
        };

        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.debounce {
                debug!("Debounced key {:?}", key);
                return Routed::ignored();
            }
        }
        self.last_accepted = Some(now);

        if context == RouteContext::Menu {
            debug!("Key {:?} ignored outside a session", key);
            return Routed::ignored();
        }

        if key == DeviceKey::F4 {
            let outcome = self.double_press.press(now);
            return Routed {
                command: outcome.gesture.map(Command::CyclePlaybackOrRepeat),
                armed: outcome.armed,
            };
        }

        match Self::map(key, context) {
            Some(command) => Routed::command(command),
            None => {
                debug!("Key {:?} has no meaning in {:?}", key, context);
                Routed::ignored()
            }
        }
    }

    fn map(key: DeviceKey, context: RouteContext) -> Option<Command> {
        match (context, key) {
            (_, DeviceKey::Left) => Some(Command::NavigateBack),
            (_, DeviceKey::Right) => Some(Command::NavigateForward),
            (RouteContext::Unanswered, key) => key.function_index().map(Command::SelectOption),
            (RouteContext::Answered | RouteContext::Browsing, key) => key
                .function_index()
                .and_then(PoseSlot::from_index)
                .map(Command::SwitchPoseVariant),
            (RouteContext::Menu, _) => None,
        }
    }

    /// Deliver the expiry of a scheduled single-press timer
    pub fn on_timer_elapsed(&mut self, generation: u64) -> Option<Command> {
        self.double_press
            .on_timer_elapsed(generation)
            .map(Command::CyclePlaybackOrRepeat)
    }

    /// Expire a pending single press by wall clock
    pub fn poll_expired(&mut self, now: Instant) -> Option<Command> {
        self.double_press.poll_expired(now).map(Command::CyclePlaybackOrRepeat)
    }

    pub fn has_pending_press(&self) -> bool {
        self.double_press.is_pending()
    }

    /// Drop any armed single-press timer; used when a session ends
    pub fn cancel_pending(&mut self) {
        self.double_press.cancel();
    }
}
