//! Configuration type definitions

use heapless::String;

use crate::traits::LogLevel;

/// Maximum length of the start-up label
pub const MAX_TEXT_LEN: usize = 64;

/// Prompt shown until the first button press or message
pub const DEFAULT_INITIAL_TEXT: &str = "Open Android app and press any button";

/// Display outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenShape {
    #[default]
    Rect,
    Round,
}

/// Horizontal placement of the label lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LabelAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Sizes and timeouts of the message channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppMessageConfig {
    /// Largest inbound dictionary accepted, in bytes
    pub inbox_size: u16,
    /// Largest outbound dictionary accepted, in bytes
    pub outbox_size: u16,
    /// How long an outbound push may wait for ACK/NACK
    pub ack_timeout_ms: u32,
}

impl Default for AppMessageConfig {
    fn default() -> Self {
        Self {
            inbox_size: 64,
            outbox_size: 64,
            ack_timeout_ms: 3000,
        }
    }
}

/// Label presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    pub initial_text: String<MAX_TEXT_LEN>,
    pub screen: ScreenShape,
    pub alignment: LabelAlignment,
    /// Pixel inset used for text flow on round screens
    pub text_flow_inset: u8,
}

impl Default for UiConfig {
    fn default() -> Self {
        let mut initial_text = String::new();
        let _ = initial_text.push_str(DEFAULT_INITIAL_TEXT);
        Self {
            initial_text,
            screen: ScreenShape::Rect,
            alignment: LabelAlignment::Center,
            text_flow_inset: 5,
        }
    }
}

/// Vibration motor timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VibesConfig {
    pub short_pulse_ms: u16,
}

impl Default for VibesConfig {
    fn default() -> Self {
        Self { short_pulse_ms: 100 }
    }
}

/// Serial link to the phone bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    pub baudrate: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { baudrate: 115200 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogConfig {
    /// Records below this severity are discarded
    pub level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub app_message: AppMessageConfig,
    pub ui: UiConfig,
    pub vibes: VibesConfig,
    pub link: LinkConfig,
    pub log: LogConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ui.initial_text.as_str(), DEFAULT_INITIAL_TEXT);
        assert_eq!(config.ui.screen, ScreenShape::Rect);
        assert_eq!(config.ui.alignment, LabelAlignment::Center);
        assert_eq!(config.ui.text_flow_inset, 5);
        assert_eq!(config.app_message.ack_timeout_ms, 3000);
        assert_eq!(config.log.level, LogLevel::Info);
    }
}
