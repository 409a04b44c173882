//! Scoped instrumentation around one extraction

use crate::ExtractionMetrics;
use std::time::{Duration, Instant};

/// Error type recorded when a timer is dropped without an outcome
pub const ABANDONED: &str = "abandoned";

/// Records one extraction attempt and its outcome
///
/// Starting the timer records the attempt. Exactly one outcome is recorded
/// together with the elapsed time: [`success`](Self::success),
/// [`failure`](Self::failure), or an `abandoned` failure when the timer is
/// dropped first (e.g. the extraction future was cancelled).
#[derive(Debug)]
#[must_use = "dropping the timer immediately records an abandoned extraction"]
pub struct ExtractionTimer<'a> {
    metrics: &'a ExtractionMetrics,
    content_type: String,
    started: Instant,
    finished: bool,
}

impl<'a> ExtractionTimer<'a> {
    /// Record an attempt and start timing
    pub fn start(metrics: &'a ExtractionMetrics, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        metrics.record_attempt(&content_type);
        Self {
            metrics,
            content_type,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Content type the attempt is recorded under
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Time since the attempt started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Record success and return the elapsed time
    pub fn success(mut self) -> Duration {
        self.metrics.record_success(&self.content_type);
        self.finish()
    }

    /// Record a failure of the given kind and return the elapsed time
    pub fn failure(mut self, error_type: &str) -> Duration {
        self.metrics.record_failure(&self.content_type, error_type);
        self.finish()
    }

    fn finish(&mut self) -> Duration {
        self.finished = true;
        let elapsed = self.elapsed();
        self.metrics
            .observe_duration(&self.content_type, elapsed.as_secs_f64());
        elapsed
    }
}

impl Drop for ExtractionTimer<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.metrics.record_failure(&self.content_type, ABANDONED);
            self.finish();
        }
    }
}
