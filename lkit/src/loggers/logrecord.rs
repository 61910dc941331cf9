use std::fmt::Write as _;

use chrono::{DateTime, Local};

use super::callsite::{capture_stack, Callsite};
use super::level::Level;
use super::logmgr::LogSettings;
use crate::utils::misc::strkit::{format_time, is_not_blank};

/// # Logrecord
///
/// One emitted log event. Built once by the dispatcher, then shared by
/// reference with every handler; there is no way to change it afterwards.
///
/// The record borrows the manager's [`LogSettings`] so handlers can resolve
/// the prefix and the store path that were in force when it was emitted.
#[derive(Debug, Clone)]
pub struct Logrecord<'a> {
    level: Level,
    message: String,
    callsite: Callsite,
    time: DateTime<Local>,
    /// Only `Error` records carry a stack.
    stack: Option<Vec<Callsite>>,
    settings: &'a LogSettings,
}

impl<'a> Logrecord<'a> {
    /// Creates a record. For `Level::Error` the current stack is captured
    /// here; if nothing resolves, the call site itself becomes the single
    /// frame so the trace is never empty.
    pub fn new(
        level: Level,
        message: String,
        callsite: Callsite,
        time: DateTime<Local>,
        settings: &'a LogSettings,
    ) -> Self {
        // No `bool::then` here: its core frame would end the skipped machinery run.
        let stack = if level == Level::Error {
            let mut stack = capture_stack();
            if stack.is_empty() {
                stack.push(callsite.clone());
            }
            Some(stack)
        } else {
            None
        };

        Self {
            level,
            message,
            callsite,
            time,
            stack,
            settings,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// The message after placeholder substitution.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn callsite(&self) -> &Callsite {
        &self.callsite
    }

    pub fn time(&self) -> &DateTime<Local> {
        &self.time
    }

    pub fn stack(&self) -> Option<&[Callsite]> {
        self.stack.as_deref()
    }

    pub fn settings(&self) -> &'a LogSettings {
        self.settings
    }

    /// # Format Line
    ///
    /// Renders the record the way both built-in handlers print it:
    ///
    /// ```text
    /// ACORN [ERROR] 2024-03-05 07:08:09 src/main.rs:14 : id 1 name wty
    ///    src/main.rs:14
    ///    /rustc/.../library/core/src/ops/function.rs:250
    /// ```
    ///
    /// The prefix and its trailing space only appear when the prefix is not
    /// blank. Stack lines are indented by three spaces and only follow
    /// `Error` records.
    pub fn format_line(&self) -> String {
        let mut line = String::with_capacity(64 + self.message.len());

        let prefix = self.settings.prefix();
        if is_not_blank(prefix) {
            line.push_str(prefix);
            line.push(' ');
        }

        let _ = write!(
            line,
            "[{}] {} {} : {}",
            self.level,
            format_time(&self.time),
            self.callsite,
            self.message
        );

        if let Some(stack) = &self.stack {
            for site in stack {
                let _ = write!(line, "\n   {}", site);
            }
        }

        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap()
    }

    fn record<'a>(level: Level, settings: &'a LogSettings) -> Logrecord<'a> {
        Logrecord::new(
            level,
            "id 1 name wty".to_string(),
            Callsite::new("src/main.rs", 14),
            fixed_time(),
            settings,
        )
    }

    #[test]
    fn line_without_prefix() {
        let settings = LogSettings::default();
        let line = record(Level::Info, &settings).format_line();
        assert_eq!(line, "[INFO] 2024-03-05 07:08:09 src/main.rs:14 : id 1 name wty");
    }

    #[test]
    fn line_with_prefix() {
        let mut settings = LogSettings::default();
        settings.prefix = "ACORN".to_string();
        let line = record(Level::Debug, &settings).format_line();
        assert_eq!(line, "ACORN [DEBUG] 2024-03-05 07:08:09 src/main.rs:14 : id 1 name wty");
    }

    #[test]
    fn blank_prefix_is_omitted() {
        let mut settings = LogSettings::default();
        settings.prefix = "   ".to_string();
        let line = record(Level::Warn, &settings).format_line();
        assert!(line.starts_with("[WARN] "), "{}", line);
    }

    #[test]
    fn only_error_records_carry_a_stack() {
        let settings = LogSettings::default();
        for level in Level::ALL {
            let rec = record(level, &settings);
            let line = rec.format_line();
            if level == Level::Error {
                let stack = rec.stack().expect("error records carry a stack");
                assert!(!stack.is_empty());
                assert_eq!(line.lines().count(), 1 + stack.len());
                assert!(line.lines().skip(1).all(|l| l.starts_with("   ")));
            } else {
                assert!(rec.stack().is_none());
                assert_eq!(line.lines().count(), 1);
            }
        }
    }
}
