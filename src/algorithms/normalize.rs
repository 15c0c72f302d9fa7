//! Score normalization
//!
//! Converts raw edit distances into bounded dissimilarity scores, and blends
//! two scores with a weighted geometric mean.

use crate::error::{Error, Result};
use serde::Deserialize;
use tracing::warn;

/// Scale a raw distance by the longer of the two lengths.
///
/// Returns a dissimilarity in [0.0, 1.0]: 0.0 for identical inputs, 1.0 when
/// every unit of the longer input has to be edited. Two empty inputs score
/// 0.0. Use [`similarity`] for the `1 - x` convention.
#[inline]
#[must_use]
pub fn normalized_distance(distance: usize, len_a: usize, len_b: usize) -> f64 {
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        0.0
    } else {
        distance as f64 / max_len as f64
    }
}

/// Flip a normalized dissimilarity into a similarity.
#[inline]
#[must_use]
pub fn similarity(normalized: f64) -> f64 {
    1.0 - normalized
}

/// Weighted geometric mean `local^ratio * global^(1 - ratio)`.
///
/// `0^0` is 1 (as `f64::powf` defines it), so a zero base with a zero weight
/// drops out of the product. A zero base with a positive weight makes the
/// result 0 even when the other factor is infinite (a ratio outside
/// [0.0, 1.0] puts a negative exponent on one side), so the result is never
/// NaN for finite scores and ratios.
#[inline]
#[must_use]
pub fn weighted_geometric_mean(local: f64, global: f64, ratio: f64) -> f64 {
    let global_weight = 1.0 - ratio;
    if (local == 0.0 && ratio > 0.0) || (global == 0.0 && global_weight > 0.0) {
        return 0.0;
    }
    local.powf(ratio) * global.powf(global_weight)
}

/// What to do with a geometric blend ratio outside [0.0, 1.0].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioPolicy {
    /// Fail with `Error::InvalidParameter`
    #[default]
    Reject,
    /// Clamp into [0.0, 1.0] and log a warning
    Clamp,
    /// Accept as-is; scores may leave [0.0, 1.0]
    PassThrough,
}

/// Validated weight of the local (partial) score in a geometric blend.
///
/// 0.0 gives all weight to the global score, 1.0 all weight to the local one.
/// Non-finite values are always rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricRatio(f64);

impl GeometricRatio {
    /// Accept `ratio` only if it lies in [0.0, 1.0].
    pub fn new(ratio: f64) -> Result<Self> {
        Self::with_policy(ratio, RatioPolicy::Reject)
    }

    pub fn with_policy(ratio: f64, policy: RatioPolicy) -> Result<Self> {
        if !ratio.is_finite() {
            return Err(Error::invalid(
                "weighted_geometric_ratio",
                ratio,
                "must be a finite number",
            ));
        }
        if (0.0..=1.0).contains(&ratio) {
            return Ok(Self(ratio));
        }
        match policy {
            RatioPolicy::Reject => Err(Error::invalid(
                "weighted_geometric_ratio",
                ratio,
                "must be in range [0.0, 1.0]",
            )),
            RatioPolicy::Clamp => {
                let clamped = ratio.clamp(0.0, 1.0);
                warn!(ratio, clamped, "weighted_geometric_ratio out of range, clamping");
                Ok(Self(clamped))
            }
            RatioPolicy::PassThrough => Ok(Self(ratio)),
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Blend a local and a global score with this ratio.
    #[inline]
    #[must_use]
    pub fn blend(self, local: f64, global: f64) -> f64 {
        weighted_geometric_mean(local, global, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_distance() {
        assert_eq!(normalized_distance(0, 0, 0), 0.0);
        assert_eq!(normalized_distance(3, 0, 3), 1.0);
        assert_eq!(normalized_distance(1, 4, 2), 0.25);
        assert_eq!(similarity(normalized_distance(1, 4, 2)), 0.75);
    }

    #[test]
    fn test_geometric_mean_endpoints() {
        assert_eq!(weighted_geometric_mean(0.25, 0.5, 0.0), 0.5);
        assert_eq!(weighted_geometric_mean(0.25, 0.5, 1.0), 0.25);
        assert_eq!(weighted_geometric_mean(0.0, 0.5, 0.0), 0.5);
        assert_eq!(weighted_geometric_mean(0.25, 0.0, 1.0), 0.25);
        assert_eq!(weighted_geometric_mean(0.0, 0.5, 0.5), 0.0);
        assert_eq!(weighted_geometric_mean(0.0, 0.0, 0.0), 0.0);
        assert!(!weighted_geometric_mean(0.0, 0.0, 1.0).is_nan());
    }

    #[test]
    fn test_geometric_mean_out_of_range_ratio() {
        for ratio in [2.0, -1.0, 1.5, -0.5] {
            for (local, global) in [(0.0, 0.0), (0.0, 0.5), (0.5, 0.0), (0.0, 1.0), (1.0, 0.0)] {
                let blended = weighted_geometric_mean(local, global, ratio);
                assert!(!blended.is_nan(), "{local} {global} {ratio}");
            }
        }
        assert_eq!(weighted_geometric_mean(0.0, 0.0, 2.0), 0.0);
        assert_eq!(weighted_geometric_mean(0.0, 0.0, -1.0), 0.0);
        // 0.5^2 * 0.25^-1
        assert_eq!(weighted_geometric_mean(0.5, 0.25, 2.0), 1.0);
        assert_eq!(weighted_geometric_mean(0.5, 0.0, 2.0), f64::INFINITY);
    }

    #[test]
    fn test_geometric_mean_midpoint() {
        let blended = weighted_geometric_mean(0.25, 1.0, 0.5);
        assert!((blended - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_reject() {
        assert!(GeometricRatio::new(0.0).is_ok());
        assert!(GeometricRatio::new(1.0).is_ok());
        assert!(matches!(
            GeometricRatio::new(1.5),
            Err(Error::InvalidParameter { name: "weighted_geometric_ratio", .. })
        ));
        assert!(GeometricRatio::new(-0.1).is_err());
        assert!(GeometricRatio::new(f64::NAN).is_err());
    }

    #[test]
    fn test_ratio_policies() {
        let clamped = GeometricRatio::with_policy(1.5, RatioPolicy::Clamp).unwrap();
        assert_eq!(clamped.get(), 1.0);
        let clamped = GeometricRatio::with_policy(-2.0, RatioPolicy::Clamp).unwrap();
        assert_eq!(clamped.get(), 0.0);
        let passed = GeometricRatio::with_policy(1.5, RatioPolicy::PassThrough).unwrap();
        assert_eq!(passed.get(), 1.5);
        assert!(GeometricRatio::with_policy(f64::INFINITY, RatioPolicy::PassThrough).is_err());
    }

    #[test]
    fn test_ratio_policy_deserialize() {
        let policy: RatioPolicy = serde_json::from_str("\"pass_through\"").unwrap();
        assert_eq!(policy, RatioPolicy::PassThrough);
    }
}
