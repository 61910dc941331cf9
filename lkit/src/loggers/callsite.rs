use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// File used when a frame cannot be resolved.
pub const UNKNOWN_FILE: &str = "???";

/// # Callsite
///
/// A `file:line` pair identifying where a record was emitted, or one frame of
/// an ERROR stack trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callsite {
    file: Cow<'static, str>,
    line: u32,
}

impl Callsite {
    /// A blank `file` degrades to [`Callsite::unknown`].
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        let file = file.into();
        if file.trim().is_empty() {
            return Self::unknown();
        }
        Self { file, line }
    }

    /// `???:0`.
    pub fn unknown() -> Self {
        Self {
            file: Cow::Borrowed(UNKNOWN_FILE),
            line: 0,
        }
    }

    /// The call site of the nearest function up the stack that is not
    /// `#[track_caller]`.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn is_unknown(&self) -> bool {
        self.file == UNKNOWN_FILE && self.line == 0
    }
}

impl fmt::Display for Callsite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// # Capture Stack
///
/// Walks the current thread's stack and returns every resolvable frame,
/// innermost first, starting at the first frame above the logging machinery.
///
/// The machinery is the innermost unbroken run of `lkit::loggers` frames
/// (test modules excepted), plus the `backtrace` frames below it and any
/// `log` facade frames directly above it. Everything outward of that run is
/// kept, including user code that was itself called from `lkit::loggers`
/// (e.g. through `with_default`). Frames without file/line debug info are
/// skipped, so a stripped binary may yield an empty list.
pub fn capture_stack() -> Vec<Callsite> {
    let mut frames: Vec<(String, Option<Callsite>)> = Vec::new();

    backtrace::trace(|frame| {
        // Inlined calls resolve to several symbols for one frame.
        backtrace::resolve_frame(frame, |symbol| {
            // `{:#}` drops the mangling hash so prefixes compare cleanly.
            let name = symbol.name().map(|n| format!("{:#}", n)).unwrap_or_default();
            let site = match (symbol.filename(), symbol.lineno()) {
                (Some(file), Some(line)) => Some(Callsite::new(file.display().to_string(), line)),
                _ => None,
            };
            frames.push((name, site));
        });
        true
    });

    let start = machinery_len(frames.iter().map(|(name, _)| name.as_str()));
    frames.into_iter().skip(start).filter_map(|(_, site)| site).collect()
}

/// Number of innermost frames belonging to the capture itself. Without
/// symbol names nothing can be told apart, so nothing is skipped.
fn machinery_len<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
    let names: Vec<&str> = names.into_iter().collect();
    let Some(first) = names.iter().position(|name| is_machinery(name)) else {
        return 0;
    };
    let mut end = first
        + names[first..]
            .iter()
            .take_while(|name| is_machinery(name))
            .count();
    end += names[end..]
        .iter()
        .take_while(|name| is_facade(name))
        .count();
    end
}

fn is_machinery(symbol: &str) -> bool {
    let symbol = symbol.trim_start_matches('<');
    symbol.starts_with("lkit::loggers::") && !symbol.contains("::tests::")
}

fn is_facade(symbol: &str) -> bool {
    symbol.trim_start_matches('<').starts_with("log::__private_api::")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_reports_this_file_and_line() {
        let expected = line!() + 1;
        let site = Callsite::caller();
        assert!(site.file().ends_with("callsite.rs"), "{}", site);
        assert_eq!(site.line(), expected);
        assert!(!site.is_unknown());
    }

    #[test]
    fn blank_file_degrades_to_unknown() {
        let site = Callsite::new("  ", 12);
        assert!(site.is_unknown());
        assert_eq!(site.to_string(), "???:0");
    }

    #[test]
    fn machinery_detection() {
        assert!(!is_machinery("backtrace::backtrace::trace_unsynchronized"));
        assert!(is_machinery("lkit::loggers::logmgr::LogMgr::dispatch"));
        assert!(is_machinery("<lkit::loggers::bridge::Bridge as log::Log>::log"));
        assert!(!is_machinery("lkit::loggers::logmgr::tests::error_records_carry_a_stack"));
        assert!(!is_machinery("my_app::main"));
    }

    #[test]
    fn skips_only_the_innermost_machinery_run() {
        let names = [
            "backtrace::backtrace::libunwind::trace::trace_fn",
            "_Unwind_Backtrace",
            "backtrace::backtrace::trace",
            "lkit::loggers::callsite::capture_stack",
            "lkit::loggers::logrecord::Logrecord::new",
            "lkit::loggers::logmgr::LogMgr::dispatch",
            "lkit::loggers::logmgr::LogMgr::error",
            "my_app::report",
            "my_app::main::{{closure}}",
            "lkit::loggers::logmgr::with_default",
            "my_app::main",
        ];
        assert_eq!(machinery_len(names), 7);
    }

    #[test]
    fn facade_frames_above_the_bridge_are_skipped() {
        let names = [
            "backtrace::backtrace::trace",
            "lkit::loggers::callsite::capture_stack",
            "lkit::loggers::logmgr::LogMgr::dispatch",
            "<lkit::loggers::bridge::Bridge as log::Log>::log",
            "log::__private_api::log_impl",
            "log::__private_api::log",
            "my_app::main",
        ];
        assert_eq!(machinery_len(names), 6);
    }

    #[test]
    fn unnamed_frames_skip_nothing() {
        assert_eq!(machinery_len(["", "", ""]), 0);
    }

    #[test]
    fn captured_stack_only_holds_resolved_frames() {
        let stack = capture_stack();
        // Debug test builds keep line tables, so at least this test frame resolves.
        if cfg!(debug_assertions) {
            assert!(!stack.is_empty());
        }
        assert!(stack.iter().all(|site| !site.is_unknown()));
    }
}
