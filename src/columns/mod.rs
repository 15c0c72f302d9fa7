//! Column-level evaluation
//!
//! Turns a metric name plus keyword arguments into a [`Scorer`], then maps
//! it over two nullable string columns in parallel.

pub mod apply;
pub mod metric;

pub use apply::{apply, apply_utf8, ApplyOptions, Column, DEFAULT_PARALLEL_THRESHOLD};
pub use metric::{Metric, MetricKwargs, OutputKind, Scorer, METRIC_NAMES};
