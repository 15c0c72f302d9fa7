//! Position-weighted Damerau-Levenshtein distance.
//!
//! Every unit position carries a weight from a descending geometric
//! sequence, so edits near the start of a string cost more than edits near
//! the end. Useful for codes and names where the prefix is the most
//! discriminative part.
//!
//! # Cost model
//! - deletion of `a[i]`: `w_a[i]`
//! - insertion of `b[j]`: `w_b[j]`
//! - substitution: `max(w_a[i], w_b[j])`
//! - transposition: weighted cost of the units skipped between the swapped
//!   pair, plus the mean of the two swapped positions' substitution weights
//!
//! With uniform weights of 1.0 the distance equals the plain unrestricted
//! Damerau-Levenshtein distance.

use super::{chars_of, Units};
use crate::error::{Error, Result};
use ahash::AHashMap;
use serde::Deserialize;
use std::hash::Hash;
use std::str::FromStr;

/// Decay of the per-position weights.
///
/// A ratio above 1.0 is inverted so the sequence always descends; exactly
/// 1.0 yields uniform weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricDecay(f64);

impl GeometricDecay {
    pub fn new(k: f64) -> Result<Self> {
        if !k.is_finite() || k <= 0.0 {
            return Err(Error::invalid(
                "weighted_geometric_ratio",
                k,
                "geometric ratio must be a positive finite number",
            ));
        }
        Ok(Self(if k > 1.0 { 1.0 / k } else { k }))
    }

    /// Effective (descending) ratio.
    #[inline]
    pub fn ratio(self) -> f64 {
        self.0
    }

    /// `n` descending weights scaled so they sum to `n`.
    #[must_use]
    pub fn weights(self, n: usize) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }
        if (self.0 - 1.0).abs() < f64::EPSILON {
            return vec![1.0; n];
        }

        let mut weights = Vec::with_capacity(n);
        let mut current = 1.0_f64;
        let mut sum = 0.0_f64;
        for _ in 0..n {
            weights.push(current);
            sum += current;
            current *= self.0;
        }

        let scale = n as f64 / sum;
        for w in &mut weights {
            *w *= scale;
        }
        weights
    }
}

/// Weighted unrestricted Damerau-Levenshtein over arbitrary units.
///
/// `weight_a` and `weight_b` must have one entry per unit of `a` and `b`.
pub fn weighted_damerau_levenshtein<T>(
    a: &[T],
    b: &[T],
    weight_a: &[f64],
    weight_b: &[f64],
) -> Result<f64>
where
    T: Eq + Hash + Copy,
{
    if weight_a.len() != a.len() || weight_b.len() != b.len() {
        return Err(Error::invalid(
            "weights",
            format!("{}/{}", weight_a.len(), weight_b.len()),
            "need exactly one weight per unit",
        ));
    }
    Ok(weighted_dl_inner(a, b, weight_a, weight_b))
}

/// Weighted distance for weight slices already matched to the units.
fn weighted_dl_inner<T>(a: &[T], b: &[T], weight_a: &[f64], weight_b: &[f64]) -> f64
where
    T: Eq + Hash + Copy,
{
    let m = a.len();
    let n = b.len();

    let prefix_a = prefix_sums(weight_a);
    let prefix_b = prefix_sums(weight_b);

    if m == 0 {
        return prefix_b[n];
    }
    if n == 0 {
        return prefix_a[m];
    }

    let width = n + 2;
    let at = |i: usize, j: usize| i * width + j;
    let max_dist = prefix_a[m] + prefix_b[n] + 1.0;

    let mut d = vec![0.0_f64; (m + 2) * width];
    d[0] = max_dist;
    for i in 0..=m {
        d[at(i + 1, 0)] = max_dist;
        d[at(i + 1, 1)] = prefix_a[i];
    }
    for j in 0..=n {
        d[at(0, j + 1)] = max_dist;
        d[at(1, j + 1)] = prefix_b[j];
    }

    let mut last_row: AHashMap<T, usize> = AHashMap::with_capacity(m.min(64));

    for i in 1..=m {
        let mut last_match_col = 0usize;

        for j in 1..=n {
            let k = last_row.get(&b[j - 1]).copied().unwrap_or(0);
            let l = last_match_col;

            let is_match = a[i - 1] == b[j - 1];
            let pair_weight = weight_a[i - 1].max(weight_b[j - 1]);

            let deletion = d[at(i, j + 1)] + weight_a[i - 1];
            let insertion = d[at(i + 1, j)] + weight_b[j - 1];
            let substitution = d[at(i, j)] + if is_match { 0.0 } else { pair_weight };

            let skipped = (prefix_a[i - 1] - prefix_a[k]) + (prefix_b[j - 1] - prefix_b[l]);
            let swap = if k > 0 && l > 0 {
                (pair_weight + weight_a[k - 1].max(weight_b[l - 1])) / 2.0
            } else {
                pair_weight
            };
            let transposition = d[at(k, l)] + skipped + swap;

            d[at(i + 1, j + 1)] = substitution
                .min(deletion)
                .min(insertion)
                .min(transposition);

            if is_match {
                last_match_col = j;
            }
        }

        last_row.insert(a[i - 1], i);
    }

    d[at(m + 1, n + 1)]
}

fn prefix_sums(weights: &[f64]) -> Vec<f64> {
    let mut prefix = Vec::with_capacity(weights.len() + 1);
    let mut acc = 0.0;
    prefix.push(acc);
    for &w in weights {
        acc += w;
        prefix.push(acc);
    }
    prefix
}

/// Position-weighted distance over already-collected units.
///
/// Both inputs share one weight sequence sized for the longer input, so an
/// early unit weighs the same regardless of which side is longer.
#[must_use]
pub fn positional_weighted_units<T>(a: &[T], b: &[T], decay: GeometricDecay, normalized: bool) -> f64
where
    T: Eq + Hash + Copy,
{
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 0.0;
    }

    let shared = decay.weights(max_len);
    let dist = weighted_dl_inner(a, b, &shared[..a.len()], &shared[..b.len()]);

    if normalized {
        dist / max_len as f64
    } else {
        dist
    }
}

/// Position-weighted Damerau-Levenshtein between two strings, counted in chars.
///
/// # Examples
/// ```
/// use dlsim::algorithms::weighted::{positional_weighted_damerau_levenshtein, GeometricDecay};
///
/// let decay = GeometricDecay::new(0.5).unwrap();
/// let head = positional_weighted_damerau_levenshtein("xbcd", "abcd", decay, false);
/// let tail = positional_weighted_damerau_levenshtein("abcx", "abcd", decay, false);
/// assert!(head > tail);
/// ```
#[must_use]
pub fn positional_weighted_damerau_levenshtein(
    a: &str,
    b: &str,
    decay: GeometricDecay,
    normalized: bool,
) -> f64 {
    let a_chars: Units<char> = chars_of(a);
    let b_chars: Units<char> = chars_of(b);
    positional_weighted_units(&a_chars, &b_chars, decay, normalized)
}

/// How word-level distances are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByWordsAggregation {
    Max,
    #[default]
    Mean,
    Min,
}

impl FromStr for ByWordsAggregation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "max" => Ok(Self::Max),
            "mean" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            _ => Err(Error::invalid("agg", s, "expected one of: max, mean, min")),
        }
    }
}

/// Compare two strings word by word and aggregate.
///
/// Words are split on whitespace and paired positionally up to the shorter
/// word count; surplus words of the longer side are ignored. Returns 0.0 if
/// either side has no words.
pub fn aggregate_by_words<F>(a: &str, b: &str, agg: ByWordsAggregation, mut word_distance: F) -> f64
where
    F: FnMut(&str, &str) -> f64,
{
    let a_words: Vec<&str> = a.split_whitespace().collect();
    let b_words: Vec<&str> = b.split_whitespace().collect();

    if a_words.is_empty() || b_words.is_empty() {
        return 0.0;
    }

    let (shorter, longer) = if a_words.len() < b_words.len() {
        (a_words, b_words)
    } else {
        (b_words, a_words)
    };

    let distances = shorter
        .iter()
        .zip(longer.iter())
        .map(|(s, l)| word_distance(s, l));

    match agg {
        ByWordsAggregation::Max => distances.fold(f64::NEG_INFINITY, f64::max),
        ByWordsAggregation::Mean => distances.sum::<f64>() / shorter.len() as f64,
        ByWordsAggregation::Min => distances.fold(f64::INFINITY, f64::min),
    }
}

/// Word-by-word position-weighted distance.
///
/// # Examples
/// ```
/// use dlsim::algorithms::weighted::{
///     positional_weighted_damerau_levenshtein_by_words, ByWordsAggregation, GeometricDecay,
/// };
///
/// let decay = GeometricDecay::new(1.0).unwrap();
/// let d = positional_weighted_damerau_levenshtein_by_words(
///     "john smith", "jon smith", decay, false, ByWordsAggregation::Max,
/// );
/// assert_eq!(d, 1.0);
/// ```
#[must_use]
pub fn positional_weighted_damerau_levenshtein_by_words(
    a: &str,
    b: &str,
    decay: GeometricDecay,
    normalized: bool,
    agg: ByWordsAggregation,
) -> f64 {
    aggregate_by_words(a, b, agg, |x, y| {
        positional_weighted_damerau_levenshtein(x, y, decay, normalized)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::damerau::damerau_levenshtein;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_decay_validation() {
        assert!(GeometricDecay::new(0.0).is_err());
        assert!(GeometricDecay::new(-1.0).is_err());
        assert!(GeometricDecay::new(f64::NAN).is_err());
        assert_eq!(GeometricDecay::new(4.0).unwrap().ratio(), 0.25);
        assert_eq!(GeometricDecay::new(0.25).unwrap().ratio(), 0.25);
    }

    #[test]
    fn test_weights_sum_to_len() {
        for k in [0.1, 0.5, 0.9, 1.0, 3.0] {
            let decay = GeometricDecay::new(k).unwrap();
            for n in [1usize, 2, 5, 17] {
                let w = decay.weights(n);
                assert_eq!(w.len(), n);
                assert!(approx_eq(w.iter().sum::<f64>(), n as f64), "k={k} n={n}");
                assert!(w.windows(2).all(|p| p[0] >= p[1]));
            }
        }
        assert!(GeometricDecay::new(0.5).unwrap().weights(0).is_empty());
        assert_eq!(GeometricDecay::new(1.0).unwrap().weights(3), vec![1.0; 3]);
    }

    #[test]
    fn test_uniform_weights_match_plain_distance() {
        let decay = GeometricDecay::new(1.0).unwrap();
        let pairs = [
            ("", ""),
            ("", "abc"),
            ("ca", "abc"),
            ("kitten", "sitting"),
            ("00210000", "001020000"),
            ("abcdef", "badcfe"),
        ];
        for (a, b) in pairs {
            let weighted = positional_weighted_damerau_levenshtein(a, b, decay, false);
            assert_eq!(weighted, damerau_levenshtein(a, b) as f64, "{a} / {b}");
        }
    }

    #[test]
    fn test_early_edits_cost_more() {
        let decay = GeometricDecay::new(0.5).unwrap();
        let head = positional_weighted_damerau_levenshtein("xbcd", "abcd", decay, false);
        let tail = positional_weighted_damerau_levenshtein("abcx", "abcd", decay, false);
        assert!(head > tail);
        // Weights for n=4, k=0.5 are 1, .5, .25, .125 scaled by 4/1.875
        assert!(approx_eq(head, 4.0 / 1.875));
        assert!(approx_eq(tail, 0.125 * 4.0 / 1.875));
    }

    #[test]
    fn test_identical_and_empty() {
        let decay = GeometricDecay::new(0.7).unwrap();
        assert_eq!(positional_weighted_damerau_levenshtein("same", "same", decay, true), 0.0);
        assert_eq!(positional_weighted_damerau_levenshtein("", "", decay, true), 0.0);
        // Deleting everything costs the full weight mass, which equals the length
        let all = positional_weighted_damerau_levenshtein("abc", "", decay, false);
        assert!(approx_eq(all, 3.0));
        assert!(approx_eq(positional_weighted_damerau_levenshtein("abc", "", decay, true), 1.0));
    }

    #[test]
    fn test_weighted_symmetry() {
        let decay = GeometricDecay::new(0.6).unwrap();
        let pairs = [("ca", "abc"), ("kitten", "sitting"), ("hello", "yellow")];
        for (a, b) in pairs {
            let ab = positional_weighted_damerau_levenshtein(a, b, decay, true);
            let ba = positional_weighted_damerau_levenshtein(b, a, decay, true);
            assert!(approx_eq(ab, ba), "{a} / {b}");
        }
    }

    #[test]
    fn test_weight_length_mismatch() {
        let a = ['a', 'b'];
        let b = ['a'];
        assert!(weighted_damerau_levenshtein(&a, &b, &[1.0], &[1.0]).is_err());
        assert_eq!(weighted_damerau_levenshtein(&a, &b, &[1.0, 2.0], &[1.0]), Ok(2.0));
    }

    #[test]
    fn test_positional_uses_shared_weight_prefixes() {
        let decay = GeometricDecay::new(0.5).unwrap();
        for (a, b) in [("xbcd", "abcd"), ("ab", "abcd"), ("", "abc"), ("ca", "abc")] {
            let a_chars: Vec<char> = a.chars().collect();
            let b_chars: Vec<char> = b.chars().collect();
            let shared = decay.weights(a_chars.len().max(b_chars.len()));
            let explicit = weighted_damerau_levenshtein(
                &a_chars,
                &b_chars,
                &shared[..a_chars.len()],
                &shared[..b_chars.len()],
            )
            .unwrap();
            assert_eq!(
                positional_weighted_damerau_levenshtein(a, b, decay, false),
                explicit,
                "{a} / {b}"
            );
        }
    }

    #[test]
    fn test_by_words_aggregation() {
        let decay = GeometricDecay::new(1.0).unwrap();
        let run = |agg| {
            positional_weighted_damerau_levenshtein_by_words(
                "john smith jr",
                "jon smyth",
                decay,
                false,
                agg,
            )
        };
        // Pairs: (jon, john) = 1, (smyth, smith) = 1
        assert_eq!(run(ByWordsAggregation::Max), 1.0);
        assert_eq!(run(ByWordsAggregation::Min), 1.0);
        assert_eq!(run(ByWordsAggregation::Mean), 1.0);

        let mixed = |agg| {
            positional_weighted_damerau_levenshtein_by_words("ab cd", "ab xy", decay, false, agg)
        };
        assert_eq!(mixed(ByWordsAggregation::Max), 2.0);
        assert_eq!(mixed(ByWordsAggregation::Min), 0.0);
        assert_eq!(mixed(ByWordsAggregation::Mean), 1.0);
    }

    #[test]
    fn test_by_words_empty() {
        let decay = GeometricDecay::new(0.5).unwrap();
        for agg in [ByWordsAggregation::Max, ByWordsAggregation::Mean, ByWordsAggregation::Min] {
            assert_eq!(
                positional_weighted_damerau_levenshtein_by_words("   ", "abc", decay, true, agg),
                0.0
            );
        }
    }

    #[test]
    fn test_aggregation_parse() {
        assert_eq!("MAX".parse::<ByWordsAggregation>(), Ok(ByWordsAggregation::Max));
        assert!("median".parse::<ByWordsAggregation>().is_err());
        let agg: ByWordsAggregation = serde_json::from_str("\"min\"").unwrap();
        assert_eq!(agg, ByWordsAggregation::Min);
    }
}
