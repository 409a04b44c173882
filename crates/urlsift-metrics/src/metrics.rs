//! Extraction metrics registry

use crate::family::{CounterFamily, HistogramFamily};
use crate::quality::calculate_extraction_quality;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use urlsift_domain::{ExtractionResult, TokenUsage};

const CONTENT_SIZE_BUCKETS: &[f64] = &[
    1_000.0, 5_000.0, 10_000.0, 50_000.0, 100_000.0, 500_000.0, 1_000_000.0,
];
const DURATION_BUCKETS: &[f64] = &[0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0];
const QUALITY_BUCKETS: &[f64] = &[0.2, 0.4, 0.6, 0.8, 0.9, 1.0];

const MICRODOLLARS: u64 = 1_000_000;

/// Counters and histograms for extraction attempts
///
/// Shared by reference (typically behind an `Arc`) between concurrent
/// extractions. No recording method fails or panics.
#[derive(Debug)]
pub struct ExtractionMetrics {
    attempts: CounterFamily,
    successes: CounterFamily,
    failures: CounterFamily,
    validation_errors: CounterFamily,
    tokens: CounterFamily,
    cost: CounterFamily,
    content_size: HistogramFamily,
    duration: HistogramFamily,
    quality: HistogramFamily,
}

impl ExtractionMetrics {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            attempts: CounterFamily::new(
                "urlsift_extraction_attempts_total",
                "Extraction attempts",
                &["content_type"],
            ),
            successes: CounterFamily::new(
                "urlsift_extraction_success_total",
                "Successful extractions",
                &["content_type"],
            ),
            failures: CounterFamily::new(
                "urlsift_extraction_failures_total",
                "Failed extractions",
                &["content_type", "error_type"],
            ),
            validation_errors: CounterFamily::new(
                "urlsift_validation_errors_total",
                "Schema validation errors",
                &["content_type", "error_type"],
            ),
            tokens: CounterFamily::new(
                "urlsift_llm_tokens_total",
                "LLM tokens consumed",
                &["model", "kind"],
            ),
            cost: CounterFamily::scaled(
                "urlsift_llm_cost_usd_total",
                "Estimated LLM cost in US dollars",
                &["model"],
                MICRODOLLARS,
            ),
            content_size: HistogramFamily::new(
                "urlsift_content_size_bytes",
                "Size of page content submitted for extraction",
                &["content_type"],
                CONTENT_SIZE_BUCKETS,
            ),
            duration: HistogramFamily::new(
                "urlsift_extraction_duration_seconds",
                "Extraction wall time",
                &["content_type"],
                DURATION_BUCKETS,
            ),
            quality: HistogramFamily::new(
                "urlsift_extraction_quality_score",
                "Heuristic quality of extraction results",
                &["content_type"],
                QUALITY_BUCKETS,
            ),
        }
    }

    /// Record an extraction attempt
    pub fn record_attempt(&self, content_type: &str) {
        self.attempts.inc(&[content_type]);
    }

    /// Record a successful extraction
    pub fn record_success(&self, content_type: &str) {
        self.successes.inc(&[content_type]);
    }

    /// Record a failed extraction
    pub fn record_failure(&self, content_type: &str, error_type: &str) {
        debug!("Extraction failure ({}): {}", content_type, error_type);
        self.failures.inc(&[content_type, error_type]);
    }

    /// Record a schema validation error
    pub fn record_validation_error(&self, content_type: &str, error_type: &str) {
        self.validation_errors.inc(&[content_type, error_type]);
    }

    /// Record token usage reported by a model
    pub fn record_usage(&self, model: &str, usage: &TokenUsage) {
        self.tokens.add(&[model, "prompt"], usage.prompt_tokens);
        self.tokens.add(&[model, "completion"], usage.completion_tokens);
        self.tokens.add(&[model, "total"], usage.total_tokens);
    }

    /// Record an estimated cost in dollars
    ///
    /// Negative or non-finite amounts are ignored.
    pub fn record_cost(&self, model: &str, usd: f64) {
        self.cost.add_scaled(&[model], usd);
    }

    /// Observe the size of page content
    pub fn observe_content_size(&self, content_type: &str, bytes: usize) {
        self.content_size.observe(&[content_type], bytes as f64);
    }

    /// Observe extraction wall time
    pub fn observe_duration(&self, content_type: &str, secs: f64) {
        self.duration.observe(&[content_type], secs);
    }

    /// Observe a quality score
    pub fn observe_quality(&self, content_type: &str, score: f64) {
        self.quality.observe(&[content_type], score);
    }

    /// Record usage and quality of a finished result, returning the score
    pub fn observe_result(&self, content_type: &str, result: &ExtractionResult) -> f64 {
        if let (Some(model), Some(usage)) = (result.model(), result.usage()) {
            self.record_usage(model, &usage);
        }
        let score = calculate_extraction_quality(result, content_type);
        self.observe_quality(content_type, score);
        score
    }

    /// Attempts recorded for a content type
    pub fn attempts(&self, content_type: &str) -> u64 {
        self.attempts.get(&[content_type])
    }

    /// Successes recorded for a content type
    pub fn successes(&self, content_type: &str) -> u64 {
        self.successes.get(&[content_type])
    }

    /// Failures recorded for a content type and error type
    pub fn failures(&self, content_type: &str, error_type: &str) -> u64 {
        self.failures.get(&[content_type, error_type])
    }

    /// Validation errors recorded for a content type and error type
    pub fn validation_errors(&self, content_type: &str, error_type: &str) -> u64 {
        self.validation_errors.get(&[content_type, error_type])
    }

    /// Tokens recorded for a model (`kind` is prompt, completion or total)
    pub fn tokens(&self, model: &str, kind: &str) -> u64 {
        self.tokens.get(&[model, kind])
    }

    /// Dollars recorded for a model
    pub fn cost(&self, model: &str) -> f64 {
        self.cost.get_scaled(&[model])
    }

    /// Number of durations observed and their sum in seconds
    pub fn duration_stats(&self, content_type: &str) -> (u64, f64) {
        self.duration.count_and_sum(&[content_type])
    }

    /// Number of quality scores observed and their sum
    pub fn quality_stats(&self, content_type: &str) -> (u64, f64) {
        self.quality.count_and_sum(&[content_type])
    }

    /// Point-in-time totals
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut by_content_type: BTreeMap<String, ContentTypeStats> = BTreeMap::new();

        for (labels, value) in self.attempts.series() {
            by_content_type.entry(labels[0].clone()).or_default().attempts = value;
        }
        for (labels, value) in self.successes.series() {
            by_content_type.entry(labels[0].clone()).or_default().successes = value;
        }
        for (labels, value) in self.failures.series() {
            by_content_type.entry(labels[0].clone()).or_default().failures += value;
        }
        for (labels, value) in self.validation_errors.series() {
            by_content_type
                .entry(labels[0].clone())
                .or_default()
                .validation_errors += value;
        }

        let total_tokens = self
            .tokens
            .series()
            .into_iter()
            .filter(|(labels, _)| labels.get(1).map(String::as_str) == Some("total"))
            .map(|(_, value)| value)
            .sum();

        MetricsSnapshot {
            attempts: self.attempts.total(),
            successes: self.successes.total(),
            failures: self.failures.total(),
            validation_errors: self.validation_errors.total(),
            total_tokens,
            cost_usd: self.cost.total() as f64 / MICRODOLLARS as f64,
            by_content_type,
        }
    }

    /// Prometheus text exposition of every family
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        self.attempts.render(&mut out);
        self.successes.render(&mut out);
        self.failures.render(&mut out);
        self.validation_errors.render(&mut out);
        self.tokens.render(&mut out);
        self.cost.render(&mut out);
        self.content_size.render(&mut out);
        self.duration.render(&mut out);
        self.quality.render(&mut out);
        out
    }

    /// Failures of every error type for a content type
    pub fn total_failures(&self, content_type: &str) -> u64 {
        self.failures.total_for(content_type)
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.attempts.clear();
        self.successes.clear();
        self.failures.clear();
        self.validation_errors.clear();
        self.tokens.clear();
        self.cost.clear();
        self.content_size.clear();
        self.duration.clear();
        self.quality.clear();
    }
}

impl Default for ExtractionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-content-type totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentTypeStats {
    /// Attempts
    pub attempts: u64,
    /// Successes
    pub successes: u64,
    /// Failures of any error type
    pub failures: u64,
    /// Validation errors of any error type
    pub validation_errors: u64,
}

/// Point-in-time view of [`ExtractionMetrics`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Attempts across all content types
    pub attempts: u64,
    /// Successes across all content types
    pub successes: u64,
    /// Failures across all content types
    pub failures: u64,
    /// Validation errors across all content types
    pub validation_errors: u64,
    /// Tokens across all models
    pub total_tokens: u64,
    /// Dollars across all models
    pub cost_usd: f64,
    /// Totals per content type
    pub by_content_type: BTreeMap<String, ContentTypeStats>,
}

impl MetricsSnapshot {
    /// Fraction of attempts that succeeded (0.0 with no attempts)
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Extraction Metrics Summary".to_string(),
            "==========================".to_string(),
            format!("Attempts: {}", self.attempts),
            format!("Successes: {}", self.successes),
            format!("Failures: {}", self.failures),
            format!("Validation errors: {}", self.validation_errors),
            format!("Success rate: {:.1}%", self.success_rate() * 100.0),
            format!("Tokens: {}", self.total_tokens),
            format!("Cost: ${:.4}", self.cost_usd),
        ];

        if !self.by_content_type.is_empty() {
            lines.push(String::new());
            lines.push("By content type:".to_string());
            for (content_type, stats) in &self.by_content_type {
                lines.push(format!(
                    "  {}: {} attempts, {} ok, {} failed",
                    content_type, stats.attempts, stats.successes, stats.failures
                ));
            }
        }

        lines.join("\n")
    }
}
