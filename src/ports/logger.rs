//! The `Logger` capability contract (§4.1, §9).
//!
//! Structured logging with key-value fields, threaded explicitly through
//! `Deps` rather than relying on process-wide state (§9's redesign note: "the
//! original implementation relied on process-wide package logs; in the
//! redesign, a `Logger` is threaded through `Deps` and every operation takes
//! it explicitly").
//!
//! The `cli` feature additionally initializes the global `log`/`env_logger`
//! facade at the binary boundary (see `src/main.rs`); the two coexist the
//! same way they do in the teacher crate, where narrow typed logging lives
//! alongside ordinary `log::debug!` calls.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// A single structured field attached to a log event.
pub type Field<'a> = (&'a str, &'a dyn std::fmt::Display);

pub trait Logger {
    fn log(&self, level: Level, message: &str, fields: &[Field<'_>]);

    fn debug(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::Debug, message, fields);
    }
    fn info(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::Info, message, fields);
    }
    fn warn(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::Warn, message, fields);
    }
    fn error(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::Error, message, fields);
    }
}

/// A logger that discards every event. Used by tests and by callers that
/// don't care about structured output but still need to satisfy `Deps`.
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: Level, _message: &str, _fields: &[Field<'_>]) {}
}
