//! Damerau-Levenshtein distance implementation
//!
//! Extends Levenshtein with transpositions of adjacent units.
//!
//! The default variant is the unrestricted ("true") algorithm, which keeps a
//! last-occurrence table per unit so that units may still be edited after
//! being transposed. `"ca"` to `"abc"` therefore costs 2 (swap, then insert),
//! where the restricted optimal string alignment (OSA) variant needs 3.
//!
//! # Scratch reuse
//!
//! [`EditMatrix`] owns the DP table as one flat buffer. A caller evaluating
//! many pairs (a column worker, say) can keep one matrix and call
//! [`EditMatrix::distance`] repeatedly; every call fully reinitializes the
//! cells it reads, so no pair observes another pair's state.
//!
//! # Long inputs
//!
//! The table needs `O(m*n)` space. Past [`MAX_QUADRATIC_LENGTH`] units on
//! either side, [`EditMatrix::distance`] falls back to the three-row OSA
//! computation instead of allocating the full table.

use super::normalize::normalized_distance;
use super::{chars_of, graphemes_of, unit_count, EditDistance, Segmentation, Units};
use ahash::AHashMap;
use smallvec::SmallVec;
use std::hash::Hash;

/// Longest input (in units) for which the full DP table is allocated.
pub const MAX_QUADRATIC_LENGTH: usize = 10_000;

/// Reusable DP table for the unrestricted Damerau-Levenshtein distance.
///
/// The table has `(m + 2) x (n + 2)` cells: row and column 0 hold an
/// "infinity" sentinel so the transposition lookback never needs a bounds
/// branch, row and column 1 hold the empty-prefix costs.
#[derive(Debug, Clone, Default)]
pub struct EditMatrix {
    cells: Vec<usize>,
}

impl EditMatrix {
    #[must_use]
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Pre-size the buffer for pairs up to `m` x `n` units.
    #[must_use]
    pub fn with_capacity(m: usize, n: usize) -> Self {
        Self {
            cells: Vec::with_capacity((m + 2) * (n + 2)),
        }
    }

    /// Number of cells currently allocated.
    pub fn capacity(&self) -> usize {
        self.cells.capacity()
    }

    /// Unrestricted Damerau-Levenshtein distance between two unit slices.
    ///
    /// Inputs longer than [`MAX_QUADRATIC_LENGTH`] get the OSA distance,
    /// which can exceed the unrestricted one, and leave the table untouched.
    pub fn distance<T>(&mut self, a: &[T], b: &[T]) -> usize
    where
        T: Eq + Hash + Copy,
    {
        if a == b {
            return 0;
        }

        let m = a.len();
        let n = b.len();

        if m == 0 {
            return n;
        }
        if n == 0 {
            return m;
        }
        if m > MAX_QUADRATIC_LENGTH || n > MAX_QUADRATIC_LENGTH {
            return optimal_string_alignment_units(a, b);
        }

        let width = n + 2;
        let at = |i: usize, j: usize| i * width + j;
        let max_dist = m + n;

        self.cells.clear();
        self.cells.resize((m + 2) * width, 0);
        let d = &mut self.cells;

        d[0] = max_dist;
        for i in 0..=m {
            d[at(i + 1, 0)] = max_dist;
            d[at(i + 1, 1)] = i;
        }
        for j in 0..=n {
            d[at(0, j + 1)] = max_dist;
            d[at(1, j + 1)] = j;
        }

        // Last row (1-based) in which each unit of `a` was seen
        let mut last_row: AHashMap<T, usize> = AHashMap::with_capacity(m.min(64));

        for i in 1..=m {
            // Last column in this row where a[i - 1] matched
            let mut last_match_col = 0usize;

            for j in 1..=n {
                let k = last_row.get(&b[j - 1]).copied().unwrap_or(0);
                let l = last_match_col;

                let cost = if a[i - 1] == b[j - 1] {
                    last_match_col = j;
                    0
                } else {
                    1
                };

                d[at(i + 1, j + 1)] = (d[at(i, j)] + cost) // substitution
                    .min(d[at(i + 1, j)] + 1) // insertion
                    .min(d[at(i, j + 1)] + 1) // deletion
                    .min(d[at(k, l)] + (i - k - 1) + 1 + (j - l - 1)); // transposition
            }

            last_row.insert(a[i - 1], i);
        }

        d[at(m + 1, n + 1)]
    }
}

/// Damerau-Levenshtein distance calculator
///
/// Uses the unrestricted algorithm. Units are chars unless configured
/// for grapheme clusters.
///
/// # Complexity
/// - Time: O(m*n) where m and n are unit counts
/// - Space: O(m*n)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamerauLevenshtein {
    pub segmentation: Segmentation,
}

impl DamerauLevenshtein {
    #[must_use]
    pub fn new() -> Self {
        Self {
            segmentation: Segmentation::Chars,
        }
    }

    #[must_use]
    pub fn with_segmentation(segmentation: Segmentation) -> Self {
        Self { segmentation }
    }
}

impl EditDistance for DamerauLevenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        match self.segmentation {
            Segmentation::Chars => damerau_levenshtein(a, b),
            Segmentation::Graphemes => damerau_levenshtein_grapheme(a, b),
        }
    }

    /// Divides by the longer input counted in the same units as the distance
    fn normalized_distance(&self, a: &str, b: &str) -> f64 {
        normalized_distance(
            self.distance(a, b),
            unit_count(a, self.segmentation),
            unit_count(b, self.segmentation),
        )
    }

    fn name(&self) -> &'static str {
        "damerau_levenshtein"
    }
}

/// Unrestricted Damerau-Levenshtein distance over arbitrary units.
#[inline]
#[must_use]
pub fn damerau_levenshtein_units<T>(a: &[T], b: &[T]) -> usize
where
    T: Eq + Hash + Copy,
{
    EditMatrix::with_capacity(a.len(), b.len()).distance(a, b)
}

/// Damerau-Levenshtein distance between two strings, counted in chars.
///
/// # Examples
/// ```
/// use dlsim::algorithms::damerau::damerau_levenshtein;
///
/// assert_eq!(damerau_levenshtein("kitten", "sitting"), 3);
/// assert_eq!(damerau_levenshtein("ca", "abc"), 2);
/// ```
#[inline]
#[must_use]
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a_chars = chars_of(a);
    let b_chars = chars_of(b);
    damerau_levenshtein_units(&a_chars, &b_chars)
}

/// Damerau-Levenshtein distance treating grapheme clusters as single units.
#[must_use]
pub fn damerau_levenshtein_grapheme(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a_graphemes = graphemes_of(a);
    let b_graphemes = graphemes_of(b);
    damerau_levenshtein_units(&a_graphemes, &b_graphemes)
}

/// Damerau-Levenshtein distance divided by the longer string's char count.
///
/// 0.0 means identical (including two empty strings), 1.0 means every
/// position of the longer string had to be edited.
///
/// # Examples
/// ```
/// use dlsim::algorithms::damerau::normalized_damerau_levenshtein;
///
/// assert_eq!(normalized_damerau_levenshtein("", ""), 0.0);
/// assert_eq!(normalized_damerau_levenshtein("ab", "abcd"), 0.5);
/// ```
#[must_use]
pub fn normalized_damerau_levenshtein(a: &str, b: &str) -> f64 {
    let a_chars = chars_of(a);
    let b_chars = chars_of(b);
    normalized_distance(
        damerau_levenshtein_units(&a_chars, &b_chars),
        a_chars.len(),
        b_chars.len(),
    )
}

/// Optimal string alignment distance (restricted Damerau-Levenshtein)
/// over arbitrary units.
///
/// No substring is edited more than once, so this can exceed the
/// unrestricted distance; see [`optimal_string_alignment`]. Needs only
/// three rows of `O(n)` space.
#[must_use]
pub fn optimal_string_alignment_units<T>(a: &[T], b: &[T]) -> usize
where
    T: PartialEq,
{
    if a == b {
        return 0;
    }

    let m = a.len();
    let n = b.len();

    if m == 0 || n == 0 {
        return m.max(n);
    }

    // Three rows for the transposition lookback
    let mut prev2_row: SmallVec<[usize; 64]> = smallvec::smallvec![0; n + 1];
    let mut prev_row: SmallVec<[usize; 64]> = (0..=n).collect();
    let mut curr_row: SmallVec<[usize; 64]> = smallvec::smallvec![0; n + 1];

    for i in 1..=m {
        curr_row[0] = i;

        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);

            curr_row[j] = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);

            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                curr_row[j] = curr_row[j].min(prev2_row[j - 2] + 1);
            }
        }

        std::mem::swap(&mut prev2_row, &mut prev_row);
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

/// Optimal string alignment distance between two strings, counted in chars.
///
/// Example where OSA differs from the unrestricted distance:
/// - "CA" -> "ABC": OSA = 3, true Damerau-Levenshtein = 2
#[inline]
#[must_use]
pub fn optimal_string_alignment(a: &str, b: &str) -> usize {
    let a_chars: Units<char> = chars_of(a);
    let b_chars: Units<char> = chars_of(b);
    optimal_string_alignment_units(&a_chars, &b_chars)
}
