//! Host loop tying the controller to the device and speech collaborators.
//!
//! Events arrive on one channel and are handled one at a time to completion:
//! raw key codes from the device listener, expiries of the F4 single-press
//! timer, and commands from the host's own interface. After each event the
//! frames and speech are re-derived and only what changed is sent out.

use crate::config::Config;
use crate::constants::{MSG_CONNECTED, MSG_DISCONNECTED};
use crate::device::{DeviceAdapter, DeviceHandle, SpeechEngine};
use crate::encoder::{self, Frames};
use crate::error::DeviceError;
use crate::input::{KeyRouter, PendingPress};
use crate::quiz::{Effect, SessionController};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Commands from the host interface (buttons on a page, CLI input).
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    StartQuiz(Option<String>),
    StartBrowse,
    EndSession,
    Answer(String),
    Next,
    Previous,
    RepeatSpeech,
    SetPlaybackRate(f32),
    Connect,
    Disconnect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    Key(String),
    PressTimerElapsed(u64),
    Ui(UiCommand),
    Shutdown,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected(DeviceHandle),
}

pub struct QuizRuntime {
    controller: SessionController,
    router: KeyRouter,
    device: Arc<dyn DeviceAdapter>,
    speech: Arc<dyn SpeechEngine>,
    device_name: String,
    auto_connect: bool,
    speech_enabled: bool,
    connection: ConnectionState,
    event_tx: mpsc::UnboundedSender<RuntimeEvent>,
    event_rx: mpsc::UnboundedReceiver<RuntimeEvent>,
    sent_frames: Frames,
    spoken: Option<Utterance>,
    status: Option<String>,
}

/// What was last handed to the speech engine. The question number makes a
/// freshly drawn question with an identical prompt count as new speech.
#[derive(Debug, Clone, PartialEq)]
struct Utterance {
    question: Option<u32>,
    text: String,
    rate: f32,
}

impl QuizRuntime {
    pub fn new(
        controller: SessionController,
        device: Arc<dyn DeviceAdapter>,
        speech: Arc<dyn SpeechEngine>,
        config: &Config,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            router: KeyRouter::from_config(&config.input),
            device,
            speech,
            device_name: config.device.name.clone(),
            auto_connect: config.device.auto_connect,
            speech_enabled: config.speech.enabled,
            connection: ConnectionState::Disconnected,
            event_tx,
            event_rx,
            sent_frames: Frames::default(),
            spoken: None,
            status: None,
        }
    }

    /// Handle for feeding events into the loop
    pub fn sender(&self) -> mpsc::UnboundedSender<RuntimeEvent> {
        self.event_tx.clone()
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn router(&self) -> &KeyRouter {
        &self.router
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection, ConnectionState::Connected(_))
    }

    /// Last message meant for the host, such as a session that could not start
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Process events until shutdown
    pub async fn run(&mut self) -> anyhow::Result<()> {
        if self.auto_connect {
            if let Err(e) = self.connect().await {
                warn!("Initial connection failed: {}", e);
            }
        }

        while self.step().await {}

        if let ConnectionState::Connected(handle) = std::mem::take(&mut self.connection) {
            if let Err(e) = self.device.disconnect(&handle).await {
                warn!("Disconnect failed: {}", e);
            }
        }
        self.router.cancel_pending();
        self.speech.cancel_speech();
        info!("Runtime stopped");
        Ok(())
    }

    /// Wait for one event and handle it; false once the loop should stop
    pub async fn step(&mut self) -> bool {
        match self.event_rx.recv().await {
            Some(RuntimeEvent::Shutdown) | None => false,
            Some(event) => {
                self.handle_event(event).await;
                true
            }
        }
    }

    pub async fn handle_event(&mut self, event: RuntimeEvent) {
        let effect = match event {
            RuntimeEvent::Key(code) => self.handle_key(&code),
            RuntimeEvent::PressTimerElapsed(generation) => match self.router.on_timer_elapsed(generation) {
                Some(command) => self.controller.apply(command),
                None => {
                    debug!("Stale press timer {}", generation);
                    Effect::None
                }
            },
            RuntimeEvent::Ui(command) => self.handle_ui(command).await,
            RuntimeEvent::Shutdown => Effect::None,
        };
        self.present(effect == Effect::RepeatSpeech).await;
    }

    fn handle_key(&mut self, code: &str) -> Effect {
        let routed = self
            .router
            .route(code, self.controller.route_context(), Instant::now());
        if let Some(pending) = routed.armed {
            self.schedule_press_timer(pending);
        }
        match routed.command {
            Some(command) => self.controller.apply(command),
            None => Effect::None,
        }
    }

    fn schedule_press_timer(&self, pending: PendingPress) {
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = pending.token.cancelled() => {}
                _ = tokio::time::sleep_until(pending.deadline) => {
                    let _ = tx.send(RuntimeEvent::PressTimerElapsed(pending.generation));
                }
            }
        });
    }

    async fn handle_ui(&mut self, command: UiCommand) -> Effect {
        self.status = None;
        match command {
            UiCommand::StartQuiz(category) => {
                if let Err(e) = self.controller.start_session(category.as_deref()) {
                    warn!("{}", e);
                    self.status = Some(e.to_string());
                }
            }
            UiCommand::StartBrowse => {
                if let Err(e) = self.controller.start_browse() {
                    warn!("{}", e);
                    self.status = Some(e.to_string());
                }
            }
            UiCommand::EndSession => {
                // Cancel before teardown so a pending single press cannot fire into the menu
                self.router.cancel_pending();
                self.controller.end_session();
            }
            UiCommand::Answer(name) => self.controller.submit_answer(&name),
            UiCommand::Next => self.controller.advance(),
            UiCommand::Previous => self.controller.go_back(),
            UiCommand::RepeatSpeech => return Effect::RepeatSpeech,
            UiCommand::SetPlaybackRate(rate) => {
                self.controller.set_playback_rate(rate);
            }
            UiCommand::Connect => {
                if let Err(e) = self.connect().await {
                    warn!("Connection failed: {}", e);
                    self.status = Some(e.to_string());
                }
            }
            UiCommand::Disconnect => self.disconnect().await,
        }
        Effect::None
    }

    /// Pair with the device and subscribe to its keys
    pub async fn connect(&mut self) -> Result<(), DeviceError> {
        if self.is_connected() {
            return Ok(());
        }

        let handle = self.device.request_device(&self.device_name).await?;
        if !self.device.connect(&handle).await? {
            return Err(DeviceError::ConnectFailed(handle.name));
        }

        let tx = self.event_tx.clone();
        if let Err(e) = self
            .device
            .add_key_event_listener(
                &handle,
                Box::new(move |code| {
                    let _ = tx.send(RuntimeEvent::Key(code));
                }),
            )
            .await
        {
            self.release(&handle).await;
            return Err(e);
        }

        info!("Connected to '{}'", handle.name);
        self.connection = ConnectionState::Connected(handle);
        self.status = Some(MSG_CONNECTED.to_string());
        // Whatever the device showed before is unknown
        self.sent_frames = Frames::default();
        self.present(false).await;
        Ok(())
    }

    async fn disconnect(&mut self) {
        if let ConnectionState::Connected(handle) = std::mem::take(&mut self.connection) {
            self.release(&handle).await;
            self.status = Some(MSG_DISCONNECTED.to_string());
        }
    }

    /// Best-effort disconnect so the handle's key listener goes away with it
    async fn release(&self, handle: &DeviceHandle) {
        if let Err(e) = self.device.disconnect(handle).await {
            warn!("Disconnect failed: {}", e);
        }
    }

    async fn mark_disconnected(&mut self, error: DeviceError) {
        warn!("Device transmit failed: {}", error);
        if let ConnectionState::Connected(handle) = std::mem::take(&mut self.connection) {
            self.release(&handle).await;
        }
        self.status = Some(format!("{}: {}", MSG_DISCONNECTED, error));
    }

    async fn present(&mut self, repeat_speech: bool) {
        self.transmit_frames().await;
        self.update_speech(repeat_speech);
    }

    async fn transmit_frames(&mut self) {
        let ConnectionState::Connected(handle) = &self.connection else {
            return;
        };
        let handle = handle.clone();
        let frames = encoder::encode(&self.controller);

        if !frames.graphic.is_empty() && frames.graphic != self.sent_frames.graphic {
            if let Err(e) = self.device.send_graphic_frame(&handle, &frames.graphic).await {
                self.mark_disconnected(e).await;
                return;
            }
        }
        if !frames.text.is_empty() && frames.text != self.sent_frames.text {
            if let Err(e) = self.device.send_text_frame(&handle, &frames.text).await {
                self.sent_frames.graphic = frames.graphic;
                self.mark_disconnected(e).await;
                return;
            }
        }
        self.sent_frames = frames;
    }

    fn update_speech(&mut self, repeat: bool) {
        if !self.speech_enabled {
            return;
        }
        let wanted = self.controller.feedback_text().map(|text| Utterance {
            question: self.controller.current().map(|q| q.sequence_number),
            text: text.to_string(),
            rate: self.controller.playback_rate(),
        });

        if !repeat && wanted == self.spoken {
            return;
        }

        self.speech.cancel_speech();
        if let Some(utterance) = &wanted {
            self.speech.speak(&utterance.text, utterance.rate);
        }
        self.spoken = wanted;
    }
}
