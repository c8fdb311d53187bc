use super::{DeviceAdapter, DeviceHandle, KeyListener, SpeechEngine};
use crate::error::DeviceError;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Mutex;

/// Stand-in display that prints frames to stdout and takes key codes from the host.
#[derive(Default)]
pub struct ConsoleDevice {
    listener: Mutex<Option<KeyListener>>,
    connected: Mutex<bool>,
}

impl ConsoleDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a physical key press
    pub fn press(&self, code: &str) -> Result<(), DeviceError> {
        let listener = self.listener.lock().map_err(|_| DeviceError::Closed)?;
        match listener.as_ref() {
            Some(listener) => {
                listener(code.to_string());
                Ok(())
            }
            None => Err(DeviceError::NotConnected),
        }
    }

    fn ensure_connected(&self) -> Result<(), DeviceError> {
        match self.connected.lock() {
            Ok(connected) if *connected => Ok(()),
            Ok(_) => Err(DeviceError::NotConnected),
            Err(_) => Err(DeviceError::Closed),
        }
    }
}

#[async_trait]
impl DeviceAdapter for ConsoleDevice {
    async fn request_device(&self, name: &str) -> Result<DeviceHandle, DeviceError> {
        Ok(DeviceHandle::new(name))
    }

    async fn connect(&self, handle: &DeviceHandle) -> Result<bool, DeviceError> {
        let mut connected = self.connected.lock().map_err(|_| DeviceError::Closed)?;
        *connected = true;
        info!("Console device '{}' connected", handle.name);
        Ok(true)
    }

    async fn disconnect(&self, handle: &DeviceHandle) -> Result<(), DeviceError> {
        *self.connected.lock().map_err(|_| DeviceError::Closed)? = false;
        *self.listener.lock().map_err(|_| DeviceError::Closed)? = None;
        info!("Console device '{}' disconnected", handle.name);
        Ok(())
    }

    async fn add_key_event_listener(&self, _handle: &DeviceHandle, listener: KeyListener) -> Result<(), DeviceError> {
        *self.listener.lock().map_err(|_| DeviceError::Closed)? = Some(listener);
        Ok(())
    }

    async fn send_graphic_frame(&self, _handle: &DeviceHandle, frame: &str) -> Result<(), DeviceError> {
        self.ensure_connected()?;
        println!("[graphic] {}", frame);
        Ok(())
    }

    async fn send_text_frame(&self, _handle: &DeviceHandle, frame: &str) -> Result<(), DeviceError> {
        self.ensure_connected()?;
        println!("[braille] {}", frame);
        Ok(())
    }
}

/// Prints what would be spoken.
#[derive(Debug, Default)]
pub struct ConsoleSpeech;

impl SpeechEngine for ConsoleSpeech {
    fn speak(&self, text: &str, rate: f32) {
        println!("🔊 ({}x) {}", rate, text);
    }

    fn cancel_speech(&self) {
        debug!("Speech cancelled");
    }
}
