//! Collaborators at the edge of the core: the tactile display and the speech engine.
//!
//! The core never talks to Bluetooth or a speech synthesizer directly; hosts
//! plug in implementations of these traits. [`console`] provides stdout-backed
//! ones for the command line binary.

use crate::error::DeviceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod console;

pub use console::{ConsoleDevice, ConsoleSpeech};

/// Opaque reference to a paired device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceHandle {
    pub id: Uuid,
    pub name: String,
}

impl DeviceHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Receives raw key codes ("0".."5") from the device.
pub type KeyListener = Box<dyn Fn(String) + Send + Sync + 'static>;

/// Tactile display transport.
///
/// Implementations must keep at most one transmission in flight per handle.
#[async_trait]
pub trait DeviceAdapter: Send + Sync {
    async fn request_device(&self, name: &str) -> Result<DeviceHandle, DeviceError>;

    async fn connect(&self, handle: &DeviceHandle) -> Result<bool, DeviceError>;

    async fn disconnect(&self, handle: &DeviceHandle) -> Result<(), DeviceError>;

    async fn add_key_event_listener(&self, handle: &DeviceHandle, listener: KeyListener) -> Result<(), DeviceError>;

    async fn send_graphic_frame(&self, handle: &DeviceHandle, frame: &str) -> Result<(), DeviceError>;

    async fn send_text_frame(&self, handle: &DeviceHandle, frame: &str) -> Result<(), DeviceError>;
}

/// Text-to-speech sink. Calls are fire-and-forget.
pub trait SpeechEngine: Send + Sync {
    fn speak(&self, text: &str, rate: f32);

    fn cancel_speech(&self);
}
