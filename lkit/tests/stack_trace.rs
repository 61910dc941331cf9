use std::sync::{Arc, Mutex};

use lkit::{Callsite, ConsoleOut, Level, LogError, LogHandler, LogMgr, Logrecord};

/// Keeps the stack of every record it is handed.
struct StackKeeper {
    stacks: Arc<Mutex<Vec<Vec<Callsite>>>>,
}

impl LogHandler for StackKeeper {
    fn name(&self) -> &str {
        "stacks"
    }

    fn handle(&self, record: &Logrecord<'_>) -> Result<(), LogError> {
        let stack = record.stack().map(<[_]>::to_vec).unwrap_or_default();
        self.stacks.lock().unwrap().push(stack);
        Ok(())
    }
}

fn quiet_mgr() -> (LogMgr, Arc<Mutex<Vec<Vec<Callsite>>>>) {
    let stacks = Arc::new(Mutex::new(Vec::new()));
    let mut mgr = LogMgr::with_console(ConsoleOut::from_writer(std::io::sink()));
    mgr.set_level(Level::Error).add_handler(Box::new(StackKeeper {
        stacks: Arc::clone(&stacks),
    }));
    (mgr, stacks)
}

/// Returns the line of its `error` call.
#[inline(never)]
fn report_failure(mgr: &LogMgr) -> u32 {
    let line = line!() + 1;
    mgr.error("helper failed {}", &[3.into()]);
    line
}

fn in_this_file(site: &Callsite) -> bool {
    site.file().ends_with("stack_trace.rs")
}

#[test]
fn stack_starts_at_the_emitting_frame() {
    let (mgr, stacks) = quiet_mgr();

    let helper_line = report_failure(&mgr);

    let stacks = stacks.lock().unwrap();
    let first = &stacks[0][0];
    if cfg!(debug_assertions) {
        assert!(in_this_file(first), "{}", first);
        assert_eq!(first.line(), helper_line);
    }
}

#[test]
fn user_frames_called_from_inside_lkit_are_kept() {
    let (mgr, stacks) = quiet_mgr();

    let closure_line = line!() + 1;
    let helper_line = lkit::with_default(|_| report_failure(&mgr));

    let stacks = stacks.lock().unwrap();
    let stack = &stacks[0];
    assert!(!stack.is_empty());
    if cfg!(debug_assertions) {
        assert!(in_this_file(&stack[0]), "{}", stack[0]);
        assert_eq!(stack[0].line(), helper_line);

        let closure = stack
            .iter()
            .position(|site| in_this_file(site) && site.line() == closure_line);
        assert!(matches!(closure, Some(i) if i > 0), "{:?}", stack);
    }
}
