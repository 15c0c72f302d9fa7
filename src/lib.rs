//! dlsim - Damerau-Levenshtein similarity for string columns
//!
//! A family of edit-distance metrics built on the unrestricted
//! Damerau-Levenshtein distance, plus a column layer that evaluates them
//! over nullable string columns in parallel.
//!
//! # Features
//! - Full, normalized, partial (best-window) and geometric-weighted variants
//! - Positional weighting with a geometric decay, per string or per word
//! - Char or grapheme-cluster units
//! - Literal broadcasting and null propagation for column inputs
//!
//! # Example
//! ```
//! use dlsim::algorithms::{damerau_levenshtein, partial_damerau_levenshtein};
//!
//! assert_eq!(damerau_levenshtein("ca", "abc"), 2);
//! assert_eq!(partial_damerau_levenshtein("abc", "xabcy"), 0);
//! ```

pub mod algorithms;
pub mod columns;
pub mod dispatch;
mod error;

pub use algorithms::{EditDistance, EditMatrix, GeometricRatio, RatioPolicy, Segmentation};
pub use columns::{apply, apply_utf8, ApplyOptions, Column, Metric, MetricKwargs, Scorer};
pub use error::{Error, Result, Side};
