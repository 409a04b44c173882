//! Labelled metric families backed by atomics
//!
//! Series are created lazily under a write lock; every later update only
//! takes the read lock and an atomic add. A poisoned lock is recovered
//! rather than propagated.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Labels = Vec<String>;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn key(labels: &[&str]) -> Labels {
    labels.iter().map(|l| l.to_string()).collect()
}

/// Monotonic counters keyed by label values
///
/// Values are stored as integers in units of `1 / scale`, so fractional
/// amounts (e.g. dollars) can still be added atomically.
#[derive(Debug)]
pub(crate) struct CounterFamily {
    name: &'static str,
    help: &'static str,
    label_names: &'static [&'static str],
    scale: u64,
    series: RwLock<HashMap<Labels, AtomicU64>>,
}

impl CounterFamily {
    pub(crate) fn new(
        name: &'static str,
        help: &'static str,
        label_names: &'static [&'static str],
    ) -> Self {
        Self::scaled(name, help, label_names, 1)
    }

    pub(crate) fn scaled(
        name: &'static str,
        help: &'static str,
        label_names: &'static [&'static str],
        scale: u64,
    ) -> Self {
        Self {
            name,
            help,
            label_names,
            scale: scale.max(1),
            series: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn inc(&self, labels: &[&str]) {
        self.add(labels, 1);
    }

    /// Add raw units
    pub(crate) fn add(&self, labels: &[&str], amount: u64) {
        let key = key(labels);
        if let Some(counter) = read(&self.series).get(&key) {
            counter.fetch_add(amount, Ordering::Relaxed);
            return;
        }
        write(&self.series)
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(amount, Ordering::Relaxed);
    }

    /// Add a fractional amount, rounded to the family's scale
    pub(crate) fn add_scaled(&self, labels: &[&str], amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.add(labels, (amount * self.scale as f64).round() as u64);
    }

    /// Raw value of one series
    pub(crate) fn get(&self, labels: &[&str]) -> u64 {
        read(&self.series)
            .get(&key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Value of one series in family units
    pub(crate) fn get_scaled(&self, labels: &[&str]) -> f64 {
        self.get(labels) as f64 / self.scale as f64
    }

    /// All series with raw values, sorted by labels
    pub(crate) fn series(&self) -> Vec<(Labels, u64)> {
        let mut series: Vec<(Labels, u64)> = read(&self.series)
            .iter()
            .map(|(labels, c)| (labels.clone(), c.load(Ordering::Relaxed)))
            .collect();
        series.sort();
        series
    }

    /// Sum over all series, in raw units
    pub(crate) fn total(&self) -> u64 {
        read(&self.series)
            .values()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }

    /// Sum over series whose first label equals `first`
    pub(crate) fn total_for(&self, first: &str) -> u64 {
        read(&self.series)
            .iter()
            .filter(|(labels, _)| labels.first().map(String::as_str) == Some(first))
            .map(|(_, c)| c.load(Ordering::Relaxed))
            .sum()
    }

    pub(crate) fn render(&self, out: &mut String) {
        header(out, self.name, self.help, "counter");
        for (labels, raw) in self.series() {
            let value = raw as f64 / self.scale as f64;
            let _ = writeln!(
                out,
                "{}{} {}",
                self.name,
                format_labels(self.label_names, &labels, None),
                value
            );
        }
    }

    pub(crate) fn clear(&self) {
        write(&self.series).clear();
    }
}

#[derive(Debug)]
struct HistogramSeries {
    buckets: Vec<AtomicU64>,
    count: AtomicU64,
    sum_bits: AtomicU64,
}

impl HistogramSeries {
    fn new(len: usize) -> Self {
        Self {
            buckets: (0..len).map(|_| AtomicU64::new(0)).collect(),
            count: AtomicU64::new(0),
            sum_bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    fn observe(&self, bounds: &[f64], value: f64) {
        if let Some(index) = bounds.iter().position(|bound| value <= *bound) {
            self.buckets[index].fetch_add(1, Ordering::Relaxed);
        }
        self.count.fetch_add(1, Ordering::Relaxed);
        let _ = self
            .sum_bits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + value).to_bits())
            });
    }

    fn sum(&self) -> f64 {
        f64::from_bits(self.sum_bits.load(Ordering::Relaxed))
    }
}

/// Histograms with fixed upper bounds keyed by label values
#[derive(Debug)]
pub(crate) struct HistogramFamily {
    name: &'static str,
    help: &'static str,
    label_names: &'static [&'static str],
    bounds: &'static [f64],
    series: RwLock<HashMap<Labels, HistogramSeries>>,
}

impl HistogramFamily {
    pub(crate) fn new(
        name: &'static str,
        help: &'static str,
        label_names: &'static [&'static str],
        bounds: &'static [f64],
    ) -> Self {
        Self {
            name,
            help,
            label_names,
            bounds,
            series: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn observe(&self, labels: &[&str], value: f64) {
        if value.is_nan() {
            return;
        }
        let key = key(labels);
        if let Some(series) = read(&self.series).get(&key) {
            series.observe(self.bounds, value);
            return;
        }
        write(&self.series)
            .entry(key)
            .or_insert_with(|| HistogramSeries::new(self.bounds.len()))
            .observe(self.bounds, value);
    }

    /// Observation count and sum of one series
    pub(crate) fn count_and_sum(&self, labels: &[&str]) -> (u64, f64) {
        read(&self.series)
            .get(&key(labels))
            .map(|s| (s.count.load(Ordering::Relaxed), s.sum()))
            .unwrap_or((0, 0.0))
    }

    pub(crate) fn render(&self, out: &mut String) {
        header(out, self.name, self.help, "histogram");
        let series = read(&self.series);
        let mut keys: Vec<&Labels> = series.keys().collect();
        keys.sort();

        for labels in keys {
            let Some(s) = series.get(labels) else { continue };
            let mut cumulative = 0;
            for (bound, bucket) in self.bounds.iter().zip(&s.buckets) {
                cumulative += bucket.load(Ordering::Relaxed);
                let le = bound.to_string();
                let _ = writeln!(
                    out,
                    "{}_bucket{} {}",
                    self.name,
                    format_labels(self.label_names, labels, Some(&le)),
                    cumulative
                );
            }
            let count = s.count.load(Ordering::Relaxed);
            let _ = writeln!(
                out,
                "{}_bucket{} {}",
                self.name,
                format_labels(self.label_names, labels, Some("+Inf")),
                count
            );
            let plain = format_labels(self.label_names, labels, None);
            let _ = writeln!(out, "{}_sum{} {}", self.name, plain, s.sum());
            let _ = writeln!(out, "{}_count{} {}", self.name, plain, count);
        }
    }

    pub(crate) fn clear(&self) {
        write(&self.series).clear();
    }
}

fn header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

fn format_labels(names: &[&str], values: &[String], le: Option<&str>) -> String {
    let mut pairs: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{}=\"{}\"", name, escape(value)))
        .collect();
    if let Some(le) = le {
        pairs.push(format!("le=\"{}\"", le));
    }
    if pairs.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", pairs.join(","))
    }
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
