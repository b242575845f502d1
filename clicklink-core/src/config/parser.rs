//! Minimal reader for `watch.toml`
//!
//! Handles only the subset the watch configuration uses:
//! - `[section]` headers
//! - `key = value` pairs (integer, quoted string)
//! - `#` comments, whole-line or trailing
//!
//! Escapes, multi-line strings, arrays and tables are not supported. Keys
//! left out keep their defaults; unknown sections and keys are errors so a
//! typo cannot silently fall back to a default.

use crate::traits::LogLevel;

use super::types::{AppConfig, LabelAlignment, ScreenShape, MAX_TEXT_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section header not recognized
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String longer than its buffer
    ValueTooLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    AppMessage,
    Ui,
    Vibes,
    Link,
    Log,
}

/// Parse configuration text into an [`AppConfig`]
pub fn parse_config(input: &str) -> Result<AppConfig, ParseError> {
    let mut config = AppConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ParseError::InvalidSection);
            }
            section = parse_section_header(header[1..header.len() - 1].trim())?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

fn parse_section_header(name: &str) -> Result<Section, ParseError> {
    match name {
        "app_message" => Ok(Section::AppMessage),
        "ui" => Ok(Section::Ui),
        "vibes" => Ok(Section::Vibes),
        "link" => Ok(Section::Link),
        "log" => Ok(Section::Log),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    config: &mut AppConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::AppMessage, "inbox_size") => config.app_message.inbox_size = parse_int(value)?,
        (Section::AppMessage, "outbox_size") => config.app_message.outbox_size = parse_int(value)?,
        (Section::AppMessage, "ack_timeout_ms") => {
            config.app_message.ack_timeout_ms = parse_int(value)?
        }
        (Section::Ui, "initial_text") => {
            let text = parse_string(value)?;
            if text.len() > MAX_TEXT_LEN {
                return Err(ParseError::ValueTooLong);
            }
            config.ui.initial_text.clear();
            config
                .ui
                .initial_text
                .push_str(text)
                .map_err(|_| ParseError::ValueTooLong)?;
        }
        (Section::Ui, "screen") => config.ui.screen = parse_screen(parse_string(value)?)?,
        (Section::Ui, "alignment") => {
            config.ui.alignment = parse_alignment(parse_string(value)?)?
        }
        (Section::Ui, "text_flow_inset") => config.ui.text_flow_inset = parse_int(value)?,
        (Section::Vibes, "short_pulse_ms") => config.vibes.short_pulse_ms = parse_int(value)?,
        (Section::Link, "baudrate") => config.link.baudrate = parse_int(value)?,
        (Section::Log, "level") => config.log.level = parse_level(parse_string(value)?)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in text.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return text[..i].trim(),
            _ => {}
        }
    }
    text
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_screen(value: &str) -> Result<ScreenShape, ParseError> {
    match value {
        "rect" => Ok(ScreenShape::Rect),
        "round" => Ok(ScreenShape::Round),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_alignment(value: &str) -> Result<LabelAlignment, ParseError> {
    match value {
        "left" => Ok(LabelAlignment::Left),
        "center" => Ok(LabelAlignment::Center),
        "right" => Ok(LabelAlignment::Right),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_level(value: &str) -> Result<LogLevel, ParseError> {
    match value {
        "error" => Ok(LogLevel::Error),
        "warning" => Ok(LogLevel::Warning),
        "info" => Ok(LogLevel::Info),
        "debug" => Ok(LogLevel::Debug),
        "verbose" => Ok(LogLevel::DebugVerbose),
        _ => Err(ParseError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
# Watch configuration
[app_message]
inbox_size = 128
outbox_size = 32   # plenty for one int
ack_timeout_ms = 1500

[ui]
initial_text = "Press a # button"
screen = "round"
alignment = "left"
text_flow_inset = 7

[vibes]
short_pulse_ms = 80

[link]
baudrate = 9600

[log]
level = "debug"
"#;

    #[test]
    fn test_full_config() {
        let config = parse_config(FULL).unwrap();
        assert_eq!(config.app_message.inbox_size, 128);
        assert_eq!(config.app_message.outbox_size, 32);
        assert_eq!(config.app_message.ack_timeout_ms, 1500);
        assert_eq!(config.ui.initial_text.as_str(), "Press a # button");
        assert_eq!(config.ui.screen, ScreenShape::Round);
        assert_eq!(config.ui.alignment, LabelAlignment::Left);
        assert_eq!(config.ui.text_flow_inset, 7);
        assert_eq!(config.vibes.short_pulse_ms, 80);
        assert_eq!(config.link.baudrate, 9600);
        assert_eq!(config.log.level, LogLevel::Debug);
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
        assert_eq!(parse_config("# nothing\n\n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_keeps_defaults() {
        let config = parse_config("[vibes]\nshort_pulse_ms = 250\n").unwrap();
        assert_eq!(config.vibes.short_pulse_ms, 250);
        assert_eq!(config.ui, AppConfig::default().ui);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(parse_config("[motors]\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[ui\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_config("[ui]\nfont = \"gothic\"\n"),
            Err(ParseError::UnknownKey)
        );
        // Keys before any section
        assert_eq!(parse_config("baudrate = 1\n"), Err(ParseError::UnknownKey));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[link]\nbaudrate = fast\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[app_message]\ninbox_size = 70000\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[ui]\nscreen = \"hexagon\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[ui]\nalignment = \"justify\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[log]\nlevel = info\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_invalid_line() {
        assert_eq!(parse_config("[ui]\nscreen\n"), Err(ParseError::InvalidLine));
        assert_eq!(parse_config("[ui]\nscreen =\n"), Err(ParseError::InvalidLine));
    }

    #[test]
    fn test_text_too_long() {
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        let input = format!("[ui]\ninitial_text = \"{}\"\n", long);
        assert_eq!(parse_config(&input), Err(ParseError::ValueTooLong));
    }
}
