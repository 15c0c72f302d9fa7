//! Partial (best-window) Damerau-Levenshtein matching.
//!
//! Slides the shorter sequence across the longer one and keeps the window
//! with the smallest distance. Which input is "shorter" is decided by unit
//! count, never by argument order, so every function here is symmetric.
//!
//! Windows are compared as slices of the already-collected units; no
//! substring is allocated per offset.

use super::damerau::EditMatrix;
use super::normalize::{normalized_distance, GeometricRatio};
use super::{chars_of, EditDistance, Units};
use std::hash::Hash;

/// Best alignment of the shorter sequence inside the longer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialMatch {
    /// Minimum distance over all windows
    pub distance: usize,
    /// Offset of the first window reaching `distance`, in units of the longer input
    pub offset: usize,
    /// Window length (the shorter input's unit count)
    pub len: usize,
}

impl PartialMatch {
    /// Distance divided by the window length (0.0 for an empty window).
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> f64 {
        normalized_distance(self.distance, self.len, self.len)
    }
}

/// Find the best window using a caller-owned scratch matrix.
pub fn partial_match_with<T>(a: &[T], b: &[T], matrix: &mut EditMatrix) -> PartialMatch
where
    T: Eq + Hash + Copy,
{
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let len = shorter.len();

    // The empty sequence matches perfectly anywhere
    if len == 0 {
        return PartialMatch {
            distance: 0,
            offset: 0,
            len: 0,
        };
    }

    let mut best = PartialMatch {
        distance: usize::MAX,
        offset: 0,
        len,
    };

    for (offset, window) in longer.windows(len).enumerate() {
        let distance = matrix.distance(shorter, window);
        if distance < best.distance {
            best.distance = distance;
            best.offset = offset;
            if distance == 0 {
                break; // Can't do better than a perfect window
            }
        }
    }

    best
}

/// Find the best window between two unit slices.
#[must_use]
pub fn partial_match_units<T>(a: &[T], b: &[T]) -> PartialMatch
where
    T: Eq + Hash + Copy,
{
    let len = a.len().min(b.len());
    partial_match_with(a, b, &mut EditMatrix::with_capacity(len, len))
}

/// Find the best window between two strings, counted in chars.
///
/// # Examples
/// ```
/// use dlsim::algorithms::partial::partial_match;
///
/// let found = partial_match("abc", "xxabcy");
/// assert_eq!((found.distance, found.offset, found.len), (0, 2, 3));
/// ```
#[must_use]
pub fn partial_match(a: &str, b: &str) -> PartialMatch {
    let a_chars: Units<char> = chars_of(a);
    let b_chars: Units<char> = chars_of(b);
    partial_match_units(&a_chars, &b_chars)
}

/// Minimum distance between the shorter string and any equal-length window
/// of the longer one.
///
/// # Examples
/// ```
/// use dlsim::algorithms::partial::partial_damerau_levenshtein;
///
/// assert_eq!(partial_damerau_levenshtein("abc", "xabcy"), 0);
/// ```
#[inline]
#[must_use]
pub fn partial_damerau_levenshtein(a: &str, b: &str) -> usize {
    partial_match(a, b).distance
}

/// Partial distance divided by the shorter string's length.
#[inline]
#[must_use]
pub fn partial_normalized_damerau_levenshtein(a: &str, b: &str) -> f64 {
    partial_match(a, b).normalized()
}

/// Geometric blend of the partial and the global normalized distance, over
/// already-collected units.
///
/// `ratio` 0.0 reproduces the global normalized distance exactly, 1.0 the
/// partial normalized distance.
pub fn geometric_weighted_with<T>(
    a: &[T],
    b: &[T],
    ratio: GeometricRatio,
    matrix: &mut EditMatrix,
) -> f64
where
    T: Eq + Hash + Copy,
{
    let local = partial_match_with(a, b, matrix).normalized();
    let global = normalized_distance(matrix.distance(a, b), a.len(), b.len());
    ratio.blend(local, global)
}

/// Geometric blend of the partial and global normalized distances between
/// two strings.
///
/// # Examples
/// ```
/// use dlsim::algorithms::normalize::GeometricRatio;
/// use dlsim::algorithms::partial::geometric_weighted_damerau_levenshtein;
///
/// let ratio = GeometricRatio::new(1.0).unwrap();
/// assert_eq!(geometric_weighted_damerau_levenshtein("abc", "xabcy", ratio), 0.0);
/// ```
#[must_use]
pub fn geometric_weighted_damerau_levenshtein(a: &str, b: &str, ratio: GeometricRatio) -> f64 {
    let a_chars: Units<char> = chars_of(a);
    let b_chars: Units<char> = chars_of(b);
    let mut matrix = EditMatrix::with_capacity(a_chars.len(), b_chars.len());
    geometric_weighted_with(&a_chars, &b_chars, ratio, &mut matrix)
}

/// Partial Damerau-Levenshtein calculator
///
/// Stateless calculator - all instances are equivalent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialDamerauLevenshtein;

impl PartialDamerauLevenshtein {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EditDistance for PartialDamerauLevenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        partial_damerau_levenshtein(a, b)
    }

    /// Normalized by the window length rather than the longer input
    fn normalized_distance(&self, a: &str, b: &str) -> f64 {
        partial_normalized_damerau_levenshtein(a, b)
    }

    fn name(&self) -> &'static str {
        "partial_damerau_levenshtein"
    }
}

/// Sanity helper for tests: brute force over explicit substrings.
#[cfg(test)]
fn brute_force_partial(a: &str, b: &str) -> usize {
    use super::damerau::damerau_levenshtein_units;

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };
    if shorter.is_empty() {
        return 0;
    }
    (0..=longer.len() - shorter.len())
        .map(|s| damerau_levenshtein_units(&shorter, &longer[s..s + shorter.len()]))
        .min()
        .unwrap_or(0)
}
