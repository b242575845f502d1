//! Recording collaborators for host tests

use std::string::String;
use std::vec::Vec;

use clicklink_protocol::Dictionary;

use crate::traits::{AppLog, AppMessageResult, Diagnostic, Haptics, Outbox, TextDisplay};

#[derive(Default)]
pub struct MockDisplay {
    pub texts: Vec<String>,
}

impl MockDisplay {
    pub fn current(&self) -> Option<&str> {
        self.texts.last().map(String::as_str)
    }
}

impl TextDisplay for MockDisplay {
    fn set_text(&mut self, text: &str) {
        self.texts.push(text.into());
    }
}

#[derive(Default)]
pub struct MockHaptics {
    pub pulses: usize,
}

impl Haptics for MockHaptics {
    fn short_pulse(&mut self) {
        self.pulses += 1;
    }
}

#[derive(Default)]
pub struct MockOutbox {
    pub sent: Vec<Dictionary>,
    pub refuse_with: Option<AppMessageResult>,
}

impl Outbox for MockOutbox {
    fn send(&mut self, dictionary: &Dictionary) -> Result<(), AppMessageResult> {
        if let Some(reason) = self.refuse_with {
            return Err(reason);
        }
        self.sent.push(dictionary.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLog {
    pub entries: Vec<Diagnostic>,
}

impl AppLog for MockLog {
    fn log(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}
