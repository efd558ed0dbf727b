//! Evaluation trace: a per-thread capture buffer plus `eval_trace!`, which also forwards to
//! the `log` facade at TRACE under `nexus_agg::eval`. Tests enable capture on their own
//! thread and assert on what the evaluator reported, without touching the global logger.

use std::cell::RefCell;

pub const EVAL_TARGET: &str = "nexus_agg::eval";

thread_local! {
    static CAPTURE: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Stops capturing on drop.
#[must_use = "capture stops when the guard is dropped"]
pub struct CaptureGuard;

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURE.with(|c| *c.borrow_mut() = None);
    }
}

/// Starts capturing trace lines emitted on the current thread.
pub fn capture() -> CaptureGuard {
    CAPTURE.with(|c| *c.borrow_mut() = Some(Vec::new()));
    CaptureGuard
}

#[must_use]
pub fn is_capturing() -> bool {
    CAPTURE.with(|c| c.borrow().is_some())
}

pub fn record(line: &str) {
    CAPTURE.with(|c| {
        if let Some(buf) = c.borrow_mut().as_mut() {
            buf.push(line.to_owned());
        }
    });
}

/// Removes and returns captured lines. Empty when capture is off.
pub fn take() -> Vec<String> {
    CAPTURE.with(|c| c.borrow_mut().as_mut().map(std::mem::take).unwrap_or_default())
}

/// Emits an evaluation trace line. Formatting is skipped unless someone is listening.
#[macro_export]
macro_rules! eval_trace {
    ($($arg:tt)*) => {{
        if $crate::utils::devlog::is_capturing()
            || $crate::__log::log_enabled!(
                target: $crate::utils::devlog::EVAL_TARGET,
                $crate::__log::Level::Trace
            )
        {
            let __line = format!($($arg)*);
            $crate::utils::devlog::record(&__line);
            $crate::__log::trace!(target: $crate::utils::devlog::EVAL_TARGET, "{}", __line);
        }
    }};
}
