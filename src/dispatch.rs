//! Null-aware row entry points.
//!
//! One function per output type of the core metrics. A missing value on
//! either side short-circuits to `None` without running the algorithm;
//! otherwise the string function is called and its result widened to the
//! column type (`i64` for distances, `f64` for normalized scores).

use crate::algorithms::{self, GeometricRatio};

/// Damerau-Levenshtein distance, or `None` if either side is null.
#[inline]
#[must_use]
pub fn damerau_levenshtein(a: Option<&str>, b: Option<&str>) -> Option<i64> {
    let (a, b) = a.zip(b)?;
    Some(algorithms::damerau_levenshtein(a, b) as i64)
}

#[inline]
#[must_use]
pub fn normalized_damerau_levenshtein(a: Option<&str>, b: Option<&str>) -> Option<f64> {
    let (a, b) = a.zip(b)?;
    Some(algorithms::normalized_damerau_levenshtein(a, b))
}

/// Best-window distance, or `None` if either side is null.
#[inline]
#[must_use]
pub fn partial_damerau_levenshtein(a: Option<&str>, b: Option<&str>) -> Option<i64> {
    let (a, b) = a.zip(b)?;
    Some(algorithms::partial_damerau_levenshtein(a, b) as i64)
}

#[inline]
#[must_use]
pub fn partial_normalized_damerau_levenshtein(a: Option<&str>, b: Option<&str>) -> Option<f64> {
    let (a, b) = a.zip(b)?;
    Some(algorithms::partial_normalized_damerau_levenshtein(a, b))
}

/// Geometric blend of partial and global normalized distances.
///
/// The ratio is validated when the [`GeometricRatio`] is built, so a row
/// call cannot fail.
#[inline]
#[must_use]
pub fn geometric_weighted_damerau_levenshtein(
    a: Option<&str>,
    b: Option<&str>,
    ratio: GeometricRatio,
) -> Option<f64> {
    let (a, b) = a.zip(b)?;
    Some(algorithms::geometric_weighted_damerau_levenshtein(a, b, ratio))
}
