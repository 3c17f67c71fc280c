//! Lightweight performance instrumentation.
//!
//! Scopes are free when disabled. When enabled, each scope reports its
//! elapsed time as a `debug` event on the `marktree::perf` target.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Log target of scope timings.
pub const TARGET: &str = "marktree::perf";

static ENABLED: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Scope {
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(target: TARGET, scope = self.name, elapsed_ms, "perf");
    }
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// `RUST_LOG` filter with a `WARN` default, opening the perf target when
/// timings were requested.
///
/// # Errors
///
/// Returns an error if the perf directive fails to parse.
pub fn log_filter(perf: bool) -> Result<EnvFilter, ParseError> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    if !perf {
        return Ok(filter);
    }
    Ok(filter.add_directive(format!("{TARGET}=debug").parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_log_filter_opens_perf_target_when_requested() {
        let filter = log_filter(true).unwrap().to_string();
        assert!(filter.contains("marktree::perf=debug"), "filter was {filter}");

        let filter = log_filter(false).unwrap().to_string();
        assert!(!filter.contains("marktree::perf"), "filter was {filter}");
    }

    #[test]
    fn test_scope_measures_elapsed_time() {
        let scope = scope("test.sleep");
        std::thread::sleep(Duration::from_millis(2));
        assert!(scope.elapsed() >= Duration::from_millis(2));
    }
}
