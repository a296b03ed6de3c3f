//! Diagnostics collaborator used by the decoder.
//!
//! The decoder only knows about [`DiagnosticSink`]. Applications hand in
//! whatever they like: the [`LogSink`] forwarding to the `log` facade, a
//! closure, or [`NullSink`].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Debug,
}

impl Severity {
    pub fn to_level(&self) -> log::Level {
        match self {
            Severity::Error => log::Level::Error,
            Severity::Warning => log::Level::Warn,
            Severity::Info => log::Level::Info,
            Severity::Debug => log::Level::Debug,
        }
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn log(&self, message: &str, severity: Severity);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str, Severity) + Send + Sync,
{
    fn log(&self, message: &str, severity: Severity) {
        self(message, severity)
    }
}

/// Forwards every diagnostic to the `log` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn log(&self, message: &str, severity: Severity) {
        log::log!(severity.to_level(), "{}", message);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn log(&self, _message: &str, _severity: Severity) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_is_a_sink() {
        let seen: Mutex<Vec<(String, Severity)>> = Mutex::new(Vec::new());
        let sink = |msg: &str, sev: Severity| seen.lock().unwrap().push((msg.to_string(), sev));

        sink.log("hello", Severity::Warning);
        DiagnosticSink::log(&sink, "again", Severity::Debug);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ("hello".to_string(), Severity::Warning));
        assert_eq!(seen[1].1, Severity::Debug);
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(Severity::Error.to_level(), log::Level::Error);
        assert_eq!(Severity::Warning.to_level(), log::Level::Warn);
        assert_eq!(Severity::Info.to_level(), log::Level::Info);
        assert_eq!(Severity::Debug.to_level(), log::Level::Debug);
    }

    #[test]
    fn test_log_and_null_sinks_do_not_panic() {
        LogSink.log("forwarded", Severity::Info);
        NullSink.log("dropped", Severity::Error);
    }
}
