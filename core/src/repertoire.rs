//! Clonal count distributions.

use std::{fmt, path::PathBuf};

pub mod aggregate;

mod collection;
pub use collection::RepertoireCollection;

pub mod lineage;
pub use lineage::LineageKey;

use crate::length::{LengthStats, MissingLengthStats};

/// The clonal count distribution of a single sample.
///
/// Counts are sorted in descending order on construction, with lineage identifiers permuted
/// along. The repertoire is immutable after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Repertoire {
    counts: Vec<f64>,
    lineage_ids: Vec<String>,
    donor_id: String,
    total_count: f64,
    length_stats: Option<LengthStats>,
    metadata: Metadata,
}

/// Provenance of a [`Repertoire`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Metadata {
    /// Path of the file the repertoire was read from.
    pub source: Option<PathBuf>,
    /// Name of the lineage key strategy used to aggregate the repertoire.
    pub lineage_key: Option<String>,
}

impl Repertoire {
    /// Creates a new repertoire from counts and corresponding lineage identifiers.
    ///
    /// # Errors
    ///
    /// If the number of counts and identifiers differ, or if any count is negative or NaN.
    pub fn new(counts: Vec<f64>, lineage_ids: Vec<String>) -> Result<Self, ConstructionError> {
        if counts.len() != lineage_ids.len() {
            return Err(ConstructionError::LengthMismatch {
                counts: counts.len(),
                lineage_ids: lineage_ids.len(),
            });
        }

        if let Some((index, &count)) = counts.iter().enumerate().find(|(_, c)| !(**c >= 0.0)) {
            return Err(ConstructionError::NegativeCount { index, count });
        }

        let mut order = (0..counts.len()).collect::<Vec<_>>();
        order.sort_by(|&i, &j| counts[j].total_cmp(&counts[i]));

        let mut lineage_ids = lineage_ids.into_iter().map(Some).collect::<Vec<_>>();
        let lineage_ids = order
            .iter()
            .map(|&i| lineage_ids[i].take().unwrap_or_default())
            .collect();
        let counts = order.iter().map(|&i| counts[i]).collect::<Vec<_>>();

        let total_count = counts.iter().sum();

        Ok(Self {
            counts,
            lineage_ids,
            donor_id: String::new(),
            total_count,
            length_stats: None,
            metadata: Metadata::default(),
        })
    }

    /// Creates a new repertoire from counts, naming lineages `lineage_1`, `lineage_2`, ... in
    /// input order.
    pub fn from_counts<I>(counts: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator,
        I::Item: Into<f64>,
    {
        let counts = counts.into_iter().map(Into::into).collect::<Vec<f64>>();
        let lineage_ids = (1..=counts.len()).map(|i| format!("lineage_{i}")).collect();

        Self::new(counts, lineage_ids)
    }

    /// Sets the donor identifier.
    pub fn with_donor_id<S>(mut self, donor_id: S) -> Self
    where
        S: Into<String>,
    {
        self.donor_id = donor_id.into();
        self
    }

    /// Attaches length statistics.
    pub fn with_length_stats(mut self, length_stats: Option<LengthStats>) -> Self {
        self.length_stats = length_stats;
        self
    }

    /// Sets the metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the counts in descending order.
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Returns the donor identifier.
    pub fn donor_id(&self) -> &str {
        &self.donor_id
    }

    /// Returns the frequencies in descending order.
    ///
    /// If the total count is zero, the frequencies are empty.
    pub fn frequencies(&self) -> Vec<f64> {
        if self.total_count == 0.0 {
            Vec::new()
        } else {
            self.counts.iter().map(|c| c / self.total_count).collect()
        }
    }

    /// Returns `true` if length statistics are attached.
    pub fn has_length_stats(&self) -> bool {
        self.length_stats.is_some()
    }

    /// Returns the lineage identifiers, in the same order as the counts.
    pub fn lineage_ids(&self) -> &[String] {
        &self.lineage_ids
    }

    /// Returns the length statistics, if attached.
    pub fn length_stats(&self) -> Option<&LengthStats> {
        self.length_stats.as_ref()
    }

    /// Returns the metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the number of lineages.
    pub fn richness(&self) -> usize {
        self.counts.len()
    }

    /// Returns the sum of counts.
    pub fn total_count(&self) -> f64 {
        self.total_count
    }

    fn require_length_stats(
        &self,
        statistic: &'static str,
    ) -> Result<&LengthStats, MissingLengthStats> {
        self.length_stats
            .as_ref()
            .ok_or(MissingLengthStats { statistic })
    }

    /// Returns the mean sequence length.
    pub fn mean_length(&self) -> Result<f64, MissingLengthStats> {
        self.require_length_stats("mean length").map(|s| s.mean)
    }

    /// Returns the median sequence length.
    pub fn median_length(&self) -> Result<f64, MissingLengthStats> {
        self.require_length_stats("median length")
            .map(|s| s.median)
    }

    /// Returns the standard deviation of sequence lengths.
    pub fn std_length(&self) -> Result<f64, MissingLengthStats> {
        self.require_length_stats("length standard deviation")
            .map(|s| s.std)
    }

    /// Returns the minimum sequence length.
    pub fn min_length(&self) -> Result<f64, MissingLengthStats> {
        self.require_length_stats("minimum length")
            .map(|s| s.min as f64)
    }

    /// Returns the maximum sequence length.
    pub fn max_length(&self) -> Result<f64, MissingLengthStats> {
        self.require_length_stats("maximum length")
            .map(|s| s.max as f64)
    }

    pub(crate) fn into_parts(self) -> (Vec<f64>, Vec<String>, String, Metadata) {
        (self.counts, self.lineage_ids, self.donor_id, self.metadata)
    }
}

/// An error associated with constructing a [`Repertoire`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConstructionError {
    /// The number of counts and lineage identifiers differ.
    LengthMismatch {
        /// Number of counts.
        counts: usize,
        /// Number of lineage identifiers.
        lineage_ids: usize,
    },
    /// A count is negative or NaN.
    NegativeCount {
        /// Index of the count in the input.
        index: usize,
        /// The count.
        count: f64,
    },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::LengthMismatch {
                counts,
                lineage_ids,
            } => write!(
                f,
                "expected as many lineage ids as counts, \
                found {counts} counts and {lineage_ids} lineage ids"
            ),
            ConstructionError::NegativeCount { index, count } => write!(
                f,
                "expected non-negative counts, found count {count} at index {index}"
            ),
        }
    }
}

impl std::error::Error for ConstructionError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorted_on_construction() {
        let repertoire =
            Repertoire::new(vec![1., 5., 3., 5.], ids(&["a", "b", "c", "d"])).unwrap();

        assert_eq!(repertoire.counts(), [5., 5., 3., 1.]);
        assert_eq!(repertoire.lineage_ids(), ["b", "d", "c", "a"]);
        assert_eq!(repertoire.total_count(), 14.);
        assert_eq!(repertoire.richness(), 4);
        assert_eq!(repertoire.donor_id(), "");
    }

    #[test]
    fn test_from_counts_ids_follow_counts() {
        let repertoire = Repertoire::from_counts([2u32, 7, 4]).unwrap();

        assert_eq!(repertoire.counts(), [7., 4., 2.]);
        assert_eq!(
            repertoire.lineage_ids(),
            ["lineage_2", "lineage_3", "lineage_1"]
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            Repertoire::new(vec![1., 2.], ids(&["a"])),
            Err(ConstructionError::LengthMismatch {
                counts: 2,
                lineage_ids: 1
            })
        );
    }

    #[test]
    fn test_negative_count() {
        assert_eq!(
            Repertoire::new(vec![1., -2.], ids(&["a", "b"])),
            Err(ConstructionError::NegativeCount {
                index: 1,
                count: -2.
            })
        );
    }

    #[test]
    fn test_nan_count() {
        assert!(matches!(
            Repertoire::new(vec![f64::NAN], ids(&["a"])),
            Err(ConstructionError::NegativeCount { index: 0, .. })
        ));
    }

    #[test]
    fn test_frequencies() {
        let repertoire = Repertoire::from_counts([1., 3.]).unwrap();

        assert_approx_eq!(repertoire.frequencies(), vec![0.75, 0.25]);
        assert_approx_eq!(repertoire.frequencies().iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_frequencies_zero_total() {
        let repertoire = Repertoire::from_counts([0., 0.]).unwrap();

        assert!(repertoire.frequencies().is_empty());
        assert_eq!(repertoire.richness(), 2);
    }

    #[test]
    fn test_empty() {
        let repertoire = Repertoire::from_counts(Vec::<f64>::new()).unwrap();

        assert_eq!(repertoire.richness(), 0);
        assert_eq!(repertoire.total_count(), 0.);
        assert!(repertoire.frequencies().is_empty());
    }

    #[test]
    fn test_length_accessors() {
        let repertoire = Repertoire::from_counts([1.]).unwrap();

        assert!(!repertoire.has_length_stats());
        assert_eq!(
            repertoire.mean_length(),
            Err(MissingLengthStats {
                statistic: "mean length"
            })
        );

        let repertoire = repertoire.with_length_stats(Some(LengthStats {
            mean: 14.5,
            max: 20,
            ..Default::default()
        }));

        assert!(repertoire.has_length_stats());
        assert_eq!(repertoire.mean_length(), Ok(14.5));
        assert_eq!(repertoire.max_length(), Ok(20.));
    }
}
