//! Sequence length statistics.
//!
//! These are computed from a length column of a rearrangement table, independently of the
//! clonal count distribution, and are attached to a [`Repertoire`](crate::Repertoire) when it is
//! built with a length column.

use std::{collections::BTreeMap, fmt};

use crate::table::Row;

/// Sequence lengths with per-sequence integer weights.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lengths {
    lengths: Vec<usize>,
    weights: Vec<u64>,
}

impl Lengths {
    /// Creates new lengths, each with weight one.
    pub fn unweighted(lengths: Vec<usize>) -> Self {
        let weights = vec![1; lengths.len()];
        Self { lengths, weights }
    }

    /// Returns `true` if there are no lengths.
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Returns the number of lengths.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// Returns the lengths.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Returns the weights, in the same order as the lengths.
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }
}

impl FromIterator<(usize, u64)> for Lengths {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (usize, u64)>,
    {
        let (lengths, weights) = iter.into_iter().unzip();
        Self { lengths, weights }
    }
}

/// Extracts sequence lengths from rows.
///
/// Rows where the length column is missing are skipped. If `amino_acid` is `true`, the length is
/// the number of characters in the cell, otherwise the cell is taken to be a nucleotide sequence
/// and its length is divided by three (rounding down). The weight of each row is taken from the
/// weight column, rounded to the nearest integer, when provided and numeric, and is one otherwise.
pub fn extract_lengths<I>(
    rows: I,
    length_column: &str,
    weight_column: Option<&str>,
    amino_acid: bool,
) -> Lengths
where
    I: IntoIterator,
    I::Item: Row,
{
    rows.into_iter()
        .filter_map(|row| {
            let sequence = row.get(length_column)?;

            let characters = sequence.chars().count();
            let length = if amino_acid {
                characters
            } else {
                characters / 3
            };

            let weight = weight_column
                .and_then(|column| row.get(column))
                .and_then(|cell| cell.trim().parse::<f64>().ok())
                .filter(|weight| weight.is_finite())
                .map(|weight| weight.round().max(0.0) as u64)
                .unwrap_or(1);

            Some((length, weight))
        })
        .collect()
}

/// Returns the total weight at each length, ordered by length.
pub fn length_distribution(lengths: &Lengths) -> BTreeMap<usize, u64> {
    lengths
        .lengths
        .iter()
        .zip(lengths.weights.iter())
        .fold(BTreeMap::new(), |mut distribution, (&length, &weight)| {
            *distribution.entry(length).or_insert(0) += weight;
            distribution
        })
}

/// Summary statistics of sequence lengths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LengthStats {
    /// Mean length.
    pub mean: f64,
    /// Median length.
    pub median: f64,
    /// Standard deviation of lengths.
    ///
    /// The sample standard deviation when unweighted, and the population standard deviation of
    /// the weighted distribution otherwise.
    pub std: f64,
    /// Minimum length, ignoring weights.
    pub min: usize,
    /// Maximum length, ignoring weights.
    pub max: usize,
    /// Number of sequences, i.e. the sum of weights.
    pub n: u64,
    /// Whether the statistics were weighted by abundance.
    pub weighted: bool,
    /// Name of the column lengths were extracted from.
    pub column: String,
    /// Whether lengths are amino acid lengths of the column values.
    pub amino_acid: bool,
}

impl LengthStats {
    /// Extracts lengths from rows and computes their statistics.
    ///
    /// See [`extract_lengths`] for details.
    pub fn from_rows<I>(
        rows: I,
        length_column: &str,
        weight_column: Option<&str>,
        amino_acid: bool,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Row,
    {
        let lengths = extract_lengths(rows, length_column, weight_column, amino_acid);

        Self {
            column: length_column.to_string(),
            amino_acid,
            ..compute_length_stats(&lengths)
        }
    }
}

/// Computes length statistics.
///
/// When all weights are one, plain statistics of the lengths are used. Otherwise, the mean,
/// standard deviation, and median are those of the distribution where each length is repeated
/// according to its weight. Empty input gives all-zero statistics.
pub fn compute_length_stats(lengths: &Lengths) -> LengthStats {
    let total_weight = lengths.weights.iter().sum::<u64>();
    if lengths.is_empty() || total_weight == 0 {
        return LengthStats::default();
    }

    let min = lengths.lengths.iter().copied().min().unwrap_or(0);
    let max = lengths.lengths.iter().copied().max().unwrap_or(0);

    if lengths.weights.iter().all(|&w| w == 1) {
        LengthStats {
            mean: mean(&lengths.lengths),
            median: median(&lengths.lengths),
            std: sample_std(&lengths.lengths),
            min,
            max,
            n: lengths.len() as u64,
            weighted: false,
            ..Default::default()
        }
    } else {
        let total = total_weight as f64;

        let mean = lengths
            .lengths
            .iter()
            .zip(lengths.weights.iter())
            .map(|(&l, &w)| l as f64 * w as f64)
            .sum::<f64>()
            / total;

        let variance = lengths
            .lengths
            .iter()
            .zip(lengths.weights.iter())
            .map(|(&l, &w)| w as f64 * (l as f64 - mean).powi(2))
            .sum::<f64>()
            / total;

        LengthStats {
            mean,
            median: weighted_median(lengths),
            std: variance.sqrt(),
            min,
            max,
            n: total_weight,
            weighted: true,
            ..Default::default()
        }
    }
}

fn mean(values: &[usize]) -> f64 {
    values.iter().sum::<usize>() as f64 / values.len() as f64
}

fn median(values: &[usize]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}

fn sample_std(values: &[usize]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let mean = mean(values);
    let sum_sq = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>();

    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Median of the lengths when each is repeated by its weight, without materialising the
/// repetition.
fn weighted_median(lengths: &Lengths) -> f64 {
    let mut pairs = lengths
        .lengths
        .iter()
        .copied()
        .zip(lengths.weights.iter().copied())
        .filter(|&(_, w)| w > 0)
        .collect::<Vec<_>>();
    pairs.sort_unstable_by_key(|&(l, _)| l);

    let total = pairs.iter().map(|&(_, w)| w).sum::<u64>();

    // Returns the element at the given zero-based position in the expanded, sorted lengths
    let nth = |position: u64| {
        let mut cumulative = 0;
        for &(length, weight) in pairs.iter() {
            cumulative += weight;
            if cumulative > position {
                return length;
            }
        }
        // Unreachable for position < total
        pairs.last().map(|&(l, _)| l).unwrap_or(0)
    };

    if total % 2 == 0 {
        (nth(total / 2 - 1) + nth(total / 2)) as f64 / 2.0
    } else {
        nth(total / 2) as f64
    }
}

/// An error associated with a length statistic that is not available.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MissingLengthStats {
    /// The requested statistic.
    pub statistic: &'static str,
}

impl fmt::Display for MissingLengthStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot compute {} for repertoire without length statistics \
            (a length column must be provided when building the repertoire)",
            self.statistic
        )
    }
}

impl std::error::Error for MissingLengthStats {}

#[cfg(test)]
mod tests {
    use super::*;

    use indexmap::IndexMap;

    fn row(cells: &[(&str, &str)]) -> IndexMap<String, String> {
        cells
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_lengths_amino_acid() {
        let rows = [
            row(&[("junction_aa", "CASSF"), ("duplicate_count", "2.6")]),
            row(&[("junction_aa", ""), ("duplicate_count", "4")]),
            row(&[("junction_aa", "CAF"), ("duplicate_count", "x")]),
            row(&[("junction_aa", "CASF")]),
        ];

        let lengths = extract_lengths(&rows, "junction_aa", Some("duplicate_count"), true);

        assert_eq!(lengths.lengths(), [5, 3, 4]);
        assert_eq!(lengths.weights(), [3, 1, 1]);
    }

    #[test]
    fn test_extract_lengths_nucleotide() {
        let rows = [
            row(&[("junction", "TGTGCCAGC")]),
            row(&[("junction", "TGTGCCAGCAG")]),
        ];

        let lengths = extract_lengths(&rows, "junction", None, false);

        assert_eq!(lengths.lengths(), [3, 3]);
        assert_eq!(lengths.weights(), [1, 1]);
    }

    #[test]
    fn test_unweighted_stats() {
        let stats = compute_length_stats(&Lengths::unweighted(vec![12, 15, 14, 11]));

        assert!(!stats.weighted);
        assert_eq!(stats.n, 4);
        assert_approx_eq!(stats.mean, 13.0);
        assert_approx_eq!(stats.median, 13.0);
        assert_approx_eq!(stats.std, (10f64 / 3.0).sqrt());
        assert_eq!((stats.min, stats.max), (11, 15));
    }

    #[test]
    fn test_weighted_stats() {
        let lengths = Lengths::from_iter([(3, 10), (4, 5), (2, 3), (5, 2)]);
        let stats = compute_length_stats(&lengths);

        assert!(stats.weighted);
        assert_eq!(stats.n, 20);
        assert_approx_eq!(stats.mean, 3.3);
        assert_approx_eq!(stats.median, 3.0);
        assert_approx_eq!(stats.std, 0.71f64.sqrt());
        assert_eq!((stats.min, stats.max), (2, 5));
    }

    #[test]
    fn test_weighted_median_between_lengths() {
        let lengths = Lengths::from_iter([(10, 2), (20, 2)]);
        assert_approx_eq!(compute_length_stats(&lengths).median, 15.0);
    }

    #[test]
    fn test_empty_stats() {
        let stats = compute_length_stats(&Lengths::default());

        assert_eq!(stats, LengthStats::default());
        assert_eq!(stats.n, 0);
    }

    #[test]
    fn test_from_rows_records_column() {
        let rows = [row(&[("cdr3_aa", "CASS")]), row(&[("cdr3_aa", "CASSL")])];
        let stats = LengthStats::from_rows(&rows, "cdr3_aa", None, true);

        assert_eq!(stats.column, "cdr3_aa");
        assert!(stats.amino_acid);
        assert_approx_eq!(stats.mean, 4.5);
    }

    #[test]
    fn test_length_distribution() {
        let lengths = Lengths::from_iter([(3, 10), (4, 5), (3, 2), (2, 1)]);

        assert_eq!(
            length_distribution(&lengths).into_iter().collect::<Vec<_>>(),
            [(2, 1), (3, 12), (4, 5)]
        );
    }
}
