//! defmt-backed application log

use defmt::*;

use clicklink_core::traits::{AppLog, Diagnostic, LogLevel};

/// Forwards diagnostics to defmt, dropping those below `min`
pub struct DefmtLog {
    min: LogLevel,
}

impl DefmtLog {
    pub fn new(min: LogLevel) -> Self {
        Self { min }
    }
}

impl AppLog for DefmtLog {
    fn log(&mut self, diagnostic: Diagnostic) {
        let level = diagnostic.level();
        if !level.passes(self.min) {
            return;
        }
        match level {
            LogLevel::Error => error!("{}", diagnostic),
            LogLevel::Warning => warn!("{}", diagnostic),
            LogLevel::Info => info!("{}", diagnostic),
            LogLevel::Debug => debug!("{}", diagnostic),
            LogLevel::DebugVerbose => trace!("{}", diagnostic),
        }
    }
}
