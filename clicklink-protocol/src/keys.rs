//! Message keys and button values shared with the phone application

/// Dictionary keys understood by both ends of the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKey {
    /// A button was pressed on the watch (watch → phone)
    Button,
    /// Ask the watch to vibrate (phone → watch)
    ///
    /// Defined for both directions, only ever received by the watch.
    Vibrate,
}

// Wire format values
pub const KEY_BUTTON: u32 = 0;
pub const KEY_VIBRATE: u32 = 1;

impl MessageKey {
    /// Parse a key from its wire value
    pub fn from_u32(key: u32) -> Option<Self> {
        match key {
            KEY_BUTTON => Some(MessageKey::Button),
            KEY_VIBRATE => Some(MessageKey::Vibrate),
            _ => None,
        }
    }

    /// Convert to wire value
    pub fn to_u32(self) -> u32 {
        match self {
            MessageKey::Button => KEY_BUTTON,
            MessageKey::Vibrate => KEY_VIBRATE,
        }
    }
}

/// Physical buttons forwarded to the phone
///
/// The back button is reserved by the system and never forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Up,
    Select,
    Down,
}

// Wire format values
pub const BUTTON_UP: i32 = 0;
pub const BUTTON_SELECT: i32 = 1;
pub const BUTTON_DOWN: i32 = 2;

impl ButtonId {
    /// All forwarded buttons, top to bottom
    pub const ALL: [ButtonId; 3] = [ButtonId::Up, ButtonId::Select, ButtonId::Down];

    /// Convert to wire value
    pub fn to_i32(self) -> i32 {
        match self {
            ButtonId::Up => BUTTON_UP,
            ButtonId::Select => BUTTON_SELECT,
            ButtonId::Down => BUTTON_DOWN,
        }
    }

    /// Name shown on the watch when this button is pressed
    pub fn label(self) -> &'static str {
        match self {
            ButtonId::Up => "Up",
            ButtonId::Select => "Select",
            ButtonId::Down => "Down",
        }
    }
}
