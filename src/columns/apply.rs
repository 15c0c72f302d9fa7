//! Element-wise evaluation of a [`Scorer`] over two string columns.
//!
//! Rows are split into one contiguous slice per rayon worker, each worker
//! evaluates its slice with its own scratch [`EditMatrix`], and the slices
//! are concatenated back in row order. Small inputs skip the pool entirely.

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, trace};

use super::metric::{OutputKind, Scorer};
use crate::algorithms::EditMatrix;
use crate::error::{Error, Result, Side};

/// Minimum row count for parallel evaluation.
///
/// Below this, sequential processing is faster than coordinating the
/// thread pool for typical string lengths.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 100;

/// Execution options for [`apply`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApplyOptions {
    /// Size of a dedicated worker pool; `None` uses the global rayon pool
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            workers: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Result column; nulls are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Int64(values) => values.len(),
            Column::Float64(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_int64(&self) -> Option<&[Option<i64>]> {
        match self {
            Column::Int64(values) => Some(values),
            Column::Float64(_) => None,
        }
    }

    pub fn as_float64(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Float64(values) => Some(values),
            Column::Int64(_) => None,
        }
    }
}

/// Evaluate `scorer` row by row over `left` and `right`.
///
/// The columns must have the same length, or one of them must have length 1
/// (a literal compared against every row of the other). A null on either
/// side yields a null row.
///
/// # Examples
/// ```
/// use dlsim::columns::{apply, ApplyOptions, Column, Metric, Scorer};
///
/// let scorer = Scorer::new(Metric::DamerauLevenshtein);
/// let left = [Some("kitten"), None, Some("ca")];
/// let right = [Some("sitting"), Some("x"), Some("abc")];
/// let out = apply(&scorer, &left, &right, &ApplyOptions::default()).unwrap();
/// assert_eq!(out, Column::Int64(vec![Some(3), None, Some(2)]));
/// ```
pub fn apply(
    scorer: &Scorer,
    left: &[Option<&str>],
    right: &[Option<&str>],
    options: &ApplyOptions,
) -> Result<Column> {
    let len = output_len(left.len(), right.len())?;

    debug!(
        metric = scorer.metric().name(),
        rows = len,
        left_rows = left.len(),
        right_rows = right.len(),
        "applying metric over columns"
    );

    match scorer.output_kind() {
        OutputKind::Int64 => evaluate(left, right, len, options, |a, b, matrix| {
            scorer.distance(a, b, matrix).map(|d| d as i64)
        })
        .map(Column::Int64),
        OutputKind::Float64 => evaluate(left, right, len, options, |a, b, matrix| {
            Some(scorer.score(a, b, matrix))
        })
        .map(Column::Float64),
    }
}

/// Like [`apply`], but over raw bytes that must be valid UTF-8.
///
/// Validation runs over both columns before any distance is computed; the
/// first invalid row fails the whole call.
pub fn apply_utf8(
    scorer: &Scorer,
    left: &[Option<&[u8]>],
    right: &[Option<&[u8]>],
    options: &ApplyOptions,
) -> Result<Column> {
    let left = decode_column(left, Side::Left)?;
    let right = decode_column(right, Side::Right)?;
    apply(scorer, &left, &right, options)
}

fn decode_column<'a>(column: &[Option<&'a [u8]>], side: Side) -> Result<Vec<Option<&'a str>>> {
    column
        .iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .map(|bytes| {
                    std::str::from_utf8(bytes).map_err(|source| Error::Encoding {
                        row,
                        side,
                        source,
                    })
                })
                .transpose()
        })
        .collect()
}

fn output_len(left: usize, right: usize) -> Result<usize> {
    if left == right {
        Ok(left)
    } else if left == 1 {
        Ok(right)
    } else if right == 1 {
        Ok(left)
    } else {
        Err(Error::LengthMismatch { left, right })
    }
}

/// Row value, broadcasting a length-1 column.
#[inline]
fn value_at<'a>(column: &[Option<&'a str>], row: usize) -> Option<&'a str> {
    if column.len() == 1 {
        column[0]
    } else {
        column[row]
    }
}

/// Split `len` rows into at most `n` contiguous `(offset, len)` slices; the
/// last slice takes the remainder.
fn split_offsets(len: usize, n: usize) -> Vec<(usize, usize)> {
    let n = n.min(len).max(1);
    if n == 1 {
        return vec![(0, len)];
    }

    let chunk_size = len / n;
    (0..n)
        .map(|partition| {
            let offset = partition * chunk_size;
            let count = if partition == n - 1 {
                len - offset
            } else {
                chunk_size
            };
            (offset, count)
        })
        .collect()
}

fn evaluate<O, F>(
    left: &[Option<&str>],
    right: &[Option<&str>],
    len: usize,
    options: &ApplyOptions,
    row_fn: F,
) -> Result<Vec<Option<O>>>
where
    O: Send,
    F: Fn(&str, &str, &mut EditMatrix) -> Option<O> + Sync,
{
    let eval_slice = |matrix: &mut EditMatrix, offset: usize, count: usize| -> Vec<Option<O>> {
        (offset..offset + count)
            .map(|row| match (value_at(left, row), value_at(right, row)) {
                (Some(a), Some(b)) => row_fn(a, b, matrix),
                _ => None,
            })
            .collect()
    };

    if len < options.parallel_threshold {
        let mut matrix = EditMatrix::new();
        return Ok(eval_slice(&mut matrix, 0, len));
    }

    let run = || {
        let splits = split_offsets(len, rayon::current_num_threads());
        trace!(slices = splits.len(), rows = len, "evaluating in parallel");

        let slices: Vec<Vec<Option<O>>> = splits
            .into_par_iter()
            .map_init(EditMatrix::new, |matrix, (offset, count)| {
                eval_slice(matrix, offset, count)
            })
            .collect();

        let mut out = Vec::with_capacity(len);
        for slice in slices {
            out.extend(slice);
        }
        out
    };

    match options.workers {
        Some(workers) if workers > 0 => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| Error::ThreadPool(e.to_string()))?;
            Ok(pool.install(run))
        }
        _ => Ok(run()),
    }
}
