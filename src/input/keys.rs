/// Physical buttons on the tactile display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKey {
    F1,
    F2,
    F3,
    F4,
    Left,
    Right,
}

impl DeviceKey {
    /// Map a raw device key code; the device sends "1".."4" for the function
    /// keys and "0"/"5" for the panning keys
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(DeviceKey::F1),
            "2" => Some(DeviceKey::F2),
            "3" => Some(DeviceKey::F3),
            "4" => Some(DeviceKey::F4),
            "0" => Some(DeviceKey::Left),
            "5" => Some(DeviceKey::Right),
            _ => None,
        }
    }

    /// Position of a function key among F1..F3
    pub fn function_index(self) -> Option<usize> {
        match self {
            DeviceKey::F1 => Some(0),
            DeviceKey::F2 => Some(1),
            DeviceKey::F3 => Some(2),
            _ => None,
        }
    }
}
