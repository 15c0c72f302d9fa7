//! Metric selection and per-row evaluation.
//!
//! Metrics are dispatched through an enum rather than `Box<dyn Fn>`, so the
//! per-row match inlines and the compiler can see the concrete algorithm at
//! each call site.

use serde::Deserialize;

use crate::algorithms::{
    aggregate_by_words, chars_of, geometric_weighted_with, graphemes_of, normalized_distance,
    partial_match_with, positional_weighted_units, ByWordsAggregation, EditMatrix,
    GeometricDecay, GeometricRatio, RatioPolicy, Segmentation,
};
use crate::error::{Error, Result};
use std::hash::Hash;

/// Keyword arguments accepted by [`Scorer::from_name`].
///
/// Field names and defaults follow the keyword arguments a host engine
/// passes alongside the metric name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricKwargs {
    /// Blend ratio for the geometric metric, decay for the positional ones
    #[serde(default = "default_weighted_geometric_ratio")]
    pub weighted_geometric_ratio: f64,
    /// Normalize positional distances by the longer length
    #[serde(default)]
    pub normalized: bool,
    #[serde(default)]
    pub agg: ByWordsAggregation,
    #[serde(default)]
    pub segmentation: Segmentation,
    #[serde(default)]
    pub ratio_policy: RatioPolicy,
}

fn default_weighted_geometric_ratio() -> f64 {
    1.0
}

impl Default for MetricKwargs {
    fn default() -> Self {
        Self {
            weighted_geometric_ratio: default_weighted_geometric_ratio(),
            normalized: false,
            agg: ByWordsAggregation::default(),
            segmentation: Segmentation::default(),
            ratio_policy: RatioPolicy::default(),
        }
    }
}

/// Column type a metric produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Int64,
    Float64,
}

/// Distance metric enum for zero-overhead dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    DamerauLevenshtein,
    NormalizedDamerauLevenshtein,
    PartialDamerauLevenshtein,
    PartialNormalizedDamerauLevenshtein,
    GeometricWeighted(GeometricRatio),
    PositionalWeighted {
        decay: GeometricDecay,
        normalized: bool,
    },
    PositionalWeightedByWords {
        decay: GeometricDecay,
        normalized: bool,
        agg: ByWordsAggregation,
    },
}

/// Names accepted by [`Scorer::from_name`].
pub const METRIC_NAMES: [&str; 7] = [
    "damerau_levenshtein",
    "normalized_damerau_levenshtein",
    "partial_damerau_levenshtein",
    "partial_normalized_damerau_levenshtein",
    "geometric_weighted_damerau_levenshtein",
    "positional_weighted_damerau_levenshtein",
    "positional_weighted_damerau_levenshtein_by_words",
];

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DamerauLevenshtein => METRIC_NAMES[0],
            Self::NormalizedDamerauLevenshtein => METRIC_NAMES[1],
            Self::PartialDamerauLevenshtein => METRIC_NAMES[2],
            Self::PartialNormalizedDamerauLevenshtein => METRIC_NAMES[3],
            Self::GeometricWeighted(_) => METRIC_NAMES[4],
            Self::PositionalWeighted { .. } => METRIC_NAMES[5],
            Self::PositionalWeightedByWords { .. } => METRIC_NAMES[6],
        }
    }

    pub fn output_kind(&self) -> OutputKind {
        match self {
            Self::DamerauLevenshtein | Self::PartialDamerauLevenshtein => OutputKind::Int64,
            _ => OutputKind::Float64,
        }
    }

    /// Integer distance over units; `None` for metrics that produce floats.
    fn distance_units<T>(&self, a: &[T], b: &[T], matrix: &mut EditMatrix) -> Option<usize>
    where
        T: Eq + Hash + Copy,
    {
        match self {
            Self::DamerauLevenshtein => Some(matrix.distance(a, b)),
            Self::PartialDamerauLevenshtein => Some(partial_match_with(a, b, matrix).distance),
            _ => None,
        }
    }

    /// Score over units; the by-words metric is handled on whole strings.
    fn score_units<T>(&self, a: &[T], b: &[T], matrix: &mut EditMatrix) -> f64
    where
        T: Eq + Hash + Copy,
    {
        match *self {
            Self::DamerauLevenshtein => matrix.distance(a, b) as f64,
            Self::PartialDamerauLevenshtein => partial_match_with(a, b, matrix).distance as f64,
            Self::NormalizedDamerauLevenshtein => {
                normalized_distance(matrix.distance(a, b), a.len(), b.len())
            }
            Self::PartialNormalizedDamerauLevenshtein => {
                partial_match_with(a, b, matrix).normalized()
            }
            Self::GeometricWeighted(ratio) => geometric_weighted_with(a, b, ratio, matrix),
            Self::PositionalWeighted { decay, normalized }
            | Self::PositionalWeightedByWords {
                decay, normalized, ..
            } => positional_weighted_units(a, b, decay, normalized),
        }
    }
}

/// A metric bound to a unit segmentation; what the column layer evaluates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    metric: Metric,
    segmentation: Segmentation,
}

impl Scorer {
    #[must_use]
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            segmentation: Segmentation::Chars,
        }
    }

    #[must_use]
    pub fn with_segmentation(mut self, segmentation: Segmentation) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// Build a scorer from a metric name and its keyword arguments.
    ///
    /// Ratios are validated here, once, rather than per row.
    pub fn from_name(name: &str, kwargs: &MetricKwargs) -> Result<Self> {
        let metric = match name {
            "damerau_levenshtein" => Metric::DamerauLevenshtein,
            "normalized_damerau_levenshtein" => Metric::NormalizedDamerauLevenshtein,
            "partial_damerau_levenshtein" => Metric::PartialDamerauLevenshtein,
            "partial_normalized_damerau_levenshtein" => {
                Metric::PartialNormalizedDamerauLevenshtein
            }
            "geometric_weighted_damerau_levenshtein" => Metric::GeometricWeighted(
                GeometricRatio::with_policy(kwargs.weighted_geometric_ratio, kwargs.ratio_policy)?,
            ),
            "positional_weighted_damerau_levenshtein" => Metric::PositionalWeighted {
                decay: GeometricDecay::new(kwargs.weighted_geometric_ratio)?,
                normalized: kwargs.normalized,
            },
            "positional_weighted_damerau_levenshtein_by_words" => {
                Metric::PositionalWeightedByWords {
                    decay: GeometricDecay::new(kwargs.weighted_geometric_ratio)?,
                    normalized: kwargs.normalized,
                    agg: kwargs.agg,
                }
            }
            _ => {
                return Err(Error::invalid(
                    "metric",
                    name,
                    "unknown metric, see METRIC_NAMES for valid options",
                ))
            }
        };
        Ok(Self::new(metric).with_segmentation(kwargs.segmentation))
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn segmentation(&self) -> Segmentation {
        self.segmentation
    }

    pub fn output_kind(&self) -> OutputKind {
        self.metric.output_kind()
    }

    /// Integer distance for one row; `None` if the metric produces floats.
    #[inline]
    pub fn distance(&self, a: &str, b: &str, matrix: &mut EditMatrix) -> Option<usize> {
        match self.segmentation {
            Segmentation::Chars => {
                let (a, b) = (chars_of(a), chars_of(b));
                self.metric.distance_units(&a, &b, matrix)
            }
            Segmentation::Graphemes => {
                let (a, b) = (graphemes_of(a), graphemes_of(b));
                self.metric.distance_units(&a, &b, matrix)
            }
        }
    }

    /// Score for one row. Integer metrics are widened to `f64`.
    #[inline]
    pub fn score(&self, a: &str, b: &str, matrix: &mut EditMatrix) -> f64 {
        if let Metric::PositionalWeightedByWords { agg, .. } = self.metric {
            return aggregate_by_words(a, b, agg, |x, y| self.score_units(x, y, matrix));
        }
        self.score_units(a, b, matrix)
    }

    fn score_units(&self, a: &str, b: &str, matrix: &mut EditMatrix) -> f64 {
        match self.segmentation {
            Segmentation::Chars => {
                let (a, b) = (chars_of(a), chars_of(b));
                self.metric.score_units(&a, &b, matrix)
            }
            Segmentation::Graphemes => {
                let (a, b) = (graphemes_of(a), graphemes_of(b));
                self.metric.score_units(&a, &b, matrix)
            }
        }
    }
}
