//! Damerau-Levenshtein distance family
//!
//! Each metric is a standalone function over `&str` for composability,
//! with generic `*_units` forms over any comparable unit slice and a
//! trait-based interface for callers that want a calculator value.

pub mod damerau;
pub mod normalize;
pub mod partial;
pub mod weighted;

pub use damerau::*;
pub use normalize::*;
pub use partial::*;
pub use weighted::*;

use serde::Deserialize;
use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

/// Unit buffer sized so typical strings never touch the heap.
pub type Units<T> = SmallVec<[T; 64]>;

/// How a string is split into comparable units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segmentation {
    /// Unicode scalar values
    #[default]
    Chars,
    /// Extended grapheme clusters, so "e" + combining accent is one unit
    Graphemes,
}

/// Collect the Unicode scalar values of `s`.
#[inline]
#[must_use]
pub fn chars_of(s: &str) -> Units<char> {
    s.chars().collect()
}

/// Collect the extended grapheme clusters of `s`.
#[inline]
#[must_use]
pub fn graphemes_of(s: &str) -> Units<&str> {
    s.graphemes(true).collect()
}

/// Number of units `s` holds under `segmentation`.
#[inline]
#[must_use]
pub fn unit_count(s: &str, segmentation: Segmentation) -> usize {
    match segmentation {
        Segmentation::Chars => s.chars().count(),
        Segmentation::Graphemes => s.graphemes(true).count(),
    }
}

/// Trait for edit distance calculators that return integer distances.
pub trait EditDistance: Send + Sync {
    fn distance(&self, a: &str, b: &str) -> usize;

    /// Distance scaled into [0.0, 1.0] (0.0 means identical)
    fn normalized_distance(&self, a: &str, b: &str) -> f64 {
        let dist = self.distance(a, b);
        normalize::normalized_distance(dist, a.chars().count(), b.chars().count())
    }

    /// Name of the algorithm for debugging/logging
    fn name(&self) -> &'static str;
}
