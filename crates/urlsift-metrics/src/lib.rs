//! urlsift Metrics
//!
//! Observes every extraction attempt without ever failing it:
//!
//! - Attempt/success/failure/validation-error counters per content type
//! - Token and cost counters per model
//! - Content size, duration and quality histograms
//! - A heuristic quality score for extraction results
//! - Prometheus text exposition for a `/metrics` scrape
//!
//! # Examples
//!
//! ```
//! use urlsift_metrics::{ExtractionMetrics, ExtractionTimer};
//!
//! let metrics = ExtractionMetrics::new();
//! let timer = ExtractionTimer::start(&metrics, "news");
//! // ... run the extraction ...
//! timer.success();
//!
//! assert_eq!(metrics.attempts("news"), 1);
//! assert_eq!(metrics.successes("news"), 1);
//! ```

#![warn(missing_docs)]

mod family;
mod metrics;
mod quality;
mod timer;

pub use metrics::{ContentTypeStats, ExtractionMetrics, MetricsSnapshot};
pub use quality::{calculate_extraction_quality, quality_fields, METADATA_FIELDS};
pub use timer::{ExtractionTimer, ABANDONED};
