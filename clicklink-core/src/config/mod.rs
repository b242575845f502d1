//! Application configuration
//!
//! Defines the configuration values and a small no_std reader for the
//! `watch.toml` file embedded into the firmware.

pub mod parser;
pub mod types;

pub use parser::{parse_config, ParseError};
pub use types::{
    AppConfig, AppMessageConfig, LabelAlignment, LinkConfig, LogConfig, ScreenShape, UiConfig,
    VibesConfig, MAX_TEXT_LEN,
};
