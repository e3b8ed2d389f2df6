//! Composable metric evaluation.
//!
//! A [`Metric`] names a single statistic of a [`Repertoire`], and metrics combine into ordered
//! [`MetricSet`]s using `+`:
//!
//! ```
//! use repstat_core::{metric::{Metric, DIVERSITY_METRICS}, Repertoire};
//!
//! let repertoire = Repertoire::from_counts([5., 3., 1., 1.])?;
//!
//! let set = Metric::ShannonEntropy + Metric::Clonality;
//! let metrics = repertoire.compute_metrics(&set)?;
//! assert_eq!(metrics.get("shannon_entropy"), Some(repertoire.shannon_entropy()));
//! assert_eq!(metrics.get("d50"), None);
//!
//! let set = DIVERSITY_METRICS + Metric::D50;
//! assert_eq!(set.len(), 7);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{borrow::Cow, fmt, ops::Add, str::FromStr};

use crate::{length::MissingLengthStats, Repertoire, RepertoireCollection};

mod metrics;
pub use metrics::Metrics;

pub mod table;
pub use table::MetricsTable;

#[derive(Clone, Copy)]
enum MetricFn {
    Count(fn(&Repertoire) -> f64),
    Length(fn(&Repertoire) -> Result<f64, MissingLengthStats>),
}

/// A statistic of a repertoire.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Metric {
    /// Number of lineages.
    Richness,
    /// Sum of counts.
    TotalCount,
    /// Sum of counts, reported as sequencing depth.
    Depth,
    /// Shannon entropy.
    ShannonEntropy,
    /// Exponential of the Shannon entropy.
    ShannonDiversity,
    /// Pielou's evenness, reported as normalized Shannon entropy.
    NormalizedShannon,
    /// Simpson index.
    SimpsonIndex,
    /// One minus the Simpson index.
    SimpsonDiversity,
    /// Inverse of the Simpson index.
    InverseSimpson,
    /// Largest lineage frequency.
    BergerParker,
    /// Pielou's evenness.
    Evenness,
    /// One minus Pielou's evenness.
    Clonality,
    /// Gini coefficient of lineage frequencies.
    GiniCoefficient,
    /// Number of largest lineages covering half of all counts.
    D50,
    /// Chao1 richness estimate.
    Chao1,
    /// Mean sequence length.
    MeanLength,
    /// Median sequence length.
    MedianLength,
    /// Standard deviation of sequence lengths.
    StdLength,
    /// Minimum sequence length.
    MinLength,
    /// Maximum sequence length.
    MaxLength,
}

impl Metric {
    /// All metrics.
    pub const VARIANTS: [Metric; 20] = [
        Metric::Richness,
        Metric::TotalCount,
        Metric::Depth,
        Metric::ShannonEntropy,
        Metric::ShannonDiversity,
        Metric::NormalizedShannon,
        Metric::SimpsonIndex,
        Metric::SimpsonDiversity,
        Metric::InverseSimpson,
        Metric::BergerParker,
        Metric::Evenness,
        Metric::Clonality,
        Metric::GiniCoefficient,
        Metric::D50,
        Metric::Chao1,
        Metric::MeanLength,
        Metric::MedianLength,
        Metric::StdLength,
        Metric::MinLength,
        Metric::MaxLength,
    ];

    /// Calculates the metric for a repertoire.
    ///
    /// # Errors
    ///
    /// If the metric is a length metric and the repertoire has no length statistics.
    pub fn calculate(self, repertoire: &Repertoire) -> Result<f64, MissingLengthStats> {
        match self.function() {
            MetricFn::Count(f) => Ok(f(repertoire)),
            MetricFn::Length(f) => f(repertoire),
        }
    }

    fn function(self) -> MetricFn {
        match self {
            Metric::Richness => MetricFn::Count(|r| r.richness() as f64),
            Metric::TotalCount | Metric::Depth => MetricFn::Count(Repertoire::total_count),
            Metric::ShannonEntropy => MetricFn::Count(Repertoire::shannon_entropy),
            Metric::ShannonDiversity => MetricFn::Count(Repertoire::shannon_diversity),
            Metric::NormalizedShannon | Metric::Evenness => MetricFn::Count(Repertoire::evenness),
            Metric::SimpsonIndex => MetricFn::Count(Repertoire::simpson_index),
            Metric::SimpsonDiversity => MetricFn::Count(Repertoire::simpson_diversity),
            Metric::InverseSimpson => MetricFn::Count(Repertoire::inverse_simpson),
            Metric::BergerParker => MetricFn::Count(Repertoire::berger_parker),
            Metric::Clonality => MetricFn::Count(Repertoire::clonality),
            Metric::GiniCoefficient => MetricFn::Count(Repertoire::gini_coefficient),
            Metric::D50 => MetricFn::Count(|r| r.d50() as f64),
            Metric::Chao1 => MetricFn::Count(Repertoire::chao1),
            Metric::MeanLength => MetricFn::Length(Repertoire::mean_length),
            Metric::MedianLength => MetricFn::Length(Repertoire::median_length),
            Metric::StdLength => MetricFn::Length(Repertoire::std_length),
            Metric::MinLength => MetricFn::Length(Repertoire::min_length),
            Metric::MaxLength => MetricFn::Length(Repertoire::max_length),
        }
    }

    /// Returns `true` if the metric requires length statistics.
    pub fn is_length(&self) -> bool {
        matches!(
            self,
            Metric::MeanLength
                | Metric::MedianLength
                | Metric::StdLength
                | Metric::MinLength
                | Metric::MaxLength
        )
    }

    /// Returns the name of the metric, used as key in results.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Richness => "richness",
            Metric::TotalCount => "total_count",
            Metric::Depth => "depth",
            Metric::ShannonEntropy => "shannon_entropy",
            Metric::ShannonDiversity => "shannon_diversity",
            Metric::NormalizedShannon => "normalized_shannon",
            Metric::SimpsonIndex => "simpson_index",
            Metric::SimpsonDiversity => "simpson_diversity",
            Metric::InverseSimpson => "inverse_simpson",
            Metric::BergerParker => "berger_parker",
            Metric::Evenness => "evenness",
            Metric::Clonality => "clonality",
            Metric::GiniCoefficient => "gini_coefficient",
            Metric::D50 => "d50",
            Metric::Chao1 => "chao1",
            Metric::MeanLength => "mean_length",
            Metric::MedianLength => "median_length",
            Metric::StdLength => "std_length",
            Metric::MinLength => "min_length",
            Metric::MaxLength => "max_length",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::VARIANTS
            .into_iter()
            .find(|metric| metric.name() == s)
            .ok_or_else(|| ParseMetricError(s.to_string()))
    }
}

impl<T> Add<T> for Metric
where
    T: Into<MetricSet>,
{
    type Output = MetricSet;

    fn add(self, rhs: T) -> Self::Output {
        MetricSet::from(self) + rhs
    }
}

/// An ordered collection of metrics.
///
/// Duplicates are allowed, and are computed once per occurrence under the same key.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MetricSet(Cow<'static, [Metric]>);

macro_rules! metric_set {
    ($($metric:ident),+ $(,)?) => {
        MetricSet(Cow::Borrowed(&[$(Metric::$metric),+]))
    };
}

/// Richness, diversity, and clonality metrics, excluding depth and length metrics.
pub const ALL_METRICS: MetricSet = metric_set![
    Richness,
    TotalCount,
    ShannonEntropy,
    ShannonDiversity,
    NormalizedShannon,
    SimpsonIndex,
    SimpsonDiversity,
    InverseSimpson,
    BergerParker,
    Evenness,
    Clonality,
    GiniCoefficient,
    D50,
    Chao1,
];

/// Shannon and Simpson family metrics.
pub const DIVERSITY_METRICS: MetricSet = metric_set![
    ShannonEntropy,
    ShannonDiversity,
    NormalizedShannon,
    SimpsonIndex,
    SimpsonDiversity,
    InverseSimpson,
];

/// Dominance and inequality metrics.
pub const CLONALITY_METRICS: MetricSet =
    metric_set![Clonality, GiniCoefficient, BergerParker, D50];

/// Observed and estimated richness.
pub const RICHNESS_METRICS: MetricSet = metric_set![Richness, Chao1, TotalCount];

/// Metrics that are comparatively stable across sequencing depths.
pub const ROBUST_METRICS: MetricSet = metric_set![
    Depth,
    SimpsonDiversity,
    InverseSimpson,
    BergerParker,
    Clonality,
    GiniCoefficient,
];

/// Sequence length metrics.
pub const LENGTH_METRICS: MetricSet =
    metric_set![MeanLength, MedianLength, StdLength, MinLength, MaxLength];

impl MetricSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self(Cow::Borrowed(&[]))
    }

    /// Returns the predefined set with the provided name, if any.
    ///
    /// Names are `all_metrics`, `diversity_metrics`, `clonality_metrics`, `richness_metrics`,
    /// `robust_metrics`, and `length_metrics`, none of which is a metric name.
    pub fn predefined(name: &str) -> Option<Self> {
        Some(match name {
            "all_metrics" => ALL_METRICS,
            "diversity_metrics" => DIVERSITY_METRICS,
            "clonality_metrics" => CLONALITY_METRICS,
            "richness_metrics" => RICHNESS_METRICS,
            "robust_metrics" => ROBUST_METRICS,
            "length_metrics" => LENGTH_METRICS,
            _ => return None,
        })
    }

    /// Computes the metrics in the set for a repertoire.
    ///
    /// # Errors
    ///
    /// If the set contains a length metric and the repertoire has no length statistics.
    pub fn compute(&self, repertoire: &Repertoire) -> Result<Metrics, Error> {
        let mut metrics = Metrics::new(repertoire.donor_id());

        for &metric in self.iter() {
            let value = metric.calculate(repertoire).map_err(|source| Error {
                donor_id: repertoire.donor_id().to_string(),
                source,
            })?;
            metrics.insert(metric, value);
        }

        Ok(metrics)
    }

    /// Returns `true` if the set contains the metric.
    pub fn contains(&self, metric: Metric) -> bool {
        self.0.contains(&metric)
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the metrics in the set, in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Metric> {
        self.0.iter()
    }

    /// Returns the number of metrics in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if any metric in the set requires length statistics.
    pub fn requires_length_stats(&self) -> bool {
        self.iter().any(Metric::is_length)
    }
}

impl<T> Add<T> for MetricSet
where
    T: Into<MetricSet>,
{
    type Output = MetricSet;

    fn add(mut self, rhs: T) -> Self::Output {
        self.0.to_mut().extend(rhs.into().iter());
        self
    }
}

impl Extend<Metric> for MetricSet {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Metric>,
    {
        self.0.to_mut().extend(iter)
    }
}

impl From<Metric> for MetricSet {
    fn from(metric: Metric) -> Self {
        Self(Cow::Owned(vec![metric]))
    }
}

impl From<Vec<Metric>> for MetricSet {
    fn from(metrics: Vec<Metric>) -> Self {
        Self(Cow::Owned(metrics))
    }
}

impl FromIterator<Metric> for MetricSet {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Metric>,
    {
        Self(Cow::Owned(iter.into_iter().collect()))
    }
}

impl<'a> IntoIterator for &'a MetricSet {
    type Item = &'a Metric;
    type IntoIter = std::slice::Iter<'a, Metric>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromStr for MetricSet {
    type Err = ParseMetricError;

    /// Parses a comma-separated list of metric names and predefined set names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',').map(str::trim).try_fold(Self::new(), |set, name| {
            match MetricSet::predefined(name) {
                Some(predefined) => Ok(set + predefined),
                None => name.parse::<Metric>().map(|metric| set + metric),
            }
        })
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, metric) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{metric}")?;
        }

        Ok(())
    }
}

/// Computes metrics for a repertoire.
///
/// See [`MetricSet::compute`].
pub fn compute_metrics(repertoire: &Repertoire, metrics: &MetricSet) -> Result<Metrics, Error> {
    metrics.compute(repertoire)
}

/// Computes [`ALL_METRICS`] for a repertoire.
///
/// Infallible, since the set has no length metrics.
pub fn compute_all_metrics(repertoire: &Repertoire) -> Metrics {
    let mut metrics = Metrics::new(repertoire.donor_id());

    for &metric in ALL_METRICS.iter() {
        match metric.function() {
            MetricFn::Count(f) => metrics.insert(metric, f(repertoire)),
            MetricFn::Length(_) => unreachable!("no length metrics in set of all metrics"),
        }
    }

    metrics
}

/// Computes metrics for each repertoire in a collection.
///
/// Results are in the same order as the collection.
pub fn compute_collection_metrics(
    collection: &RepertoireCollection,
    metrics: &MetricSet,
) -> Result<Vec<Metrics>, Error> {
    collection.iter().map(|r| metrics.compute(r)).collect()
}

impl Repertoire {
    /// Computes metrics for the repertoire.
    ///
    /// See [`MetricSet::compute`].
    pub fn compute_metrics(&self, metrics: &MetricSet) -> Result<Metrics, Error> {
        metrics.compute(self)
    }
}

impl RepertoireCollection {
    /// Computes metrics for each repertoire in the collection.
    ///
    /// See [`compute_collection_metrics`].
    pub fn compute_metrics(&self, metrics: &MetricSet) -> Result<Vec<Metrics>, Error> {
        compute_collection_metrics(self, metrics)
    }
}

/// An error associated with computing a metric for a repertoire.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    /// Donor of the repertoire.
    pub donor_id: String,
    /// The missing statistics.
    pub source: MissingLengthStats,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.donor_id.is_empty() {
            write!(f, "{}", self.source)
        } else {
            write!(f, "donor '{}': {}", self.donor_id, self.source)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// An error associated with parsing a metric or metric set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseMetricError(String);

impl fmt::Display for ParseMetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metric or metric set '{}'", self.0)
    }
}

impl std::error::Error for ParseMetricError {}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::LengthStats;

    fn repertoire() -> Repertoire {
        Repertoire::from_counts([10., 5., 3., 1., 1.])
            .unwrap()
            .with_donor_id("d1")
    }

    #[test]
    fn test_round_trip() {
        let r = repertoire();
        let metrics = r
            .compute_metrics(&(Metric::ShannonEntropy + Metric::Clonality))
            .unwrap();

        assert_eq!(metrics.get("shannon_entropy"), Some(r.shannon_entropy()));
        assert_eq!(metrics.get("clonality"), Some(r.clonality()));
        assert_eq!(metrics.get("d50"), None);
        assert_eq!(metrics.get_metric(Metric::D50), None);
        assert_eq!(metrics.donor_id(), "d1");
    }

    #[test]
    fn test_missing_differs_from_zero() {
        let r = Repertoire::from_counts([4.]).unwrap();
        let metrics = r.compute_metrics(&(Metric::Evenness + Metric::D50)).unwrap();

        assert_eq!(metrics.get("evenness"), Some(0.0));
        assert_eq!(metrics.get("gini_coefficient"), None);
    }

    #[test]
    fn test_add_preserves_order() {
        let set = Metric::D50 + Metric::Richness + RICHNESS_METRICS;

        assert_eq!(
            set.iter().copied().collect::<Vec<_>>(),
            [
                Metric::D50,
                Metric::Richness,
                Metric::Richness,
                Metric::Chao1,
                Metric::TotalCount
            ]
        );
    }

    #[test]
    fn test_add_associative() {
        let a = || Metric::Clonality;
        let b = || DIVERSITY_METRICS;
        let c = || Metric::Chao1 + Metric::D50;

        assert_eq!((a() + b()) + c(), a() + (b() + c()));
    }

    #[test]
    fn test_duplicates_computed_once_per_key() {
        let r = repertoire();
        let metrics = r
            .compute_metrics(&(Metric::Richness + Metric::D50 + Metric::Richness))
            .unwrap();

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics.names().collect::<Vec<_>>(), ["richness", "d50"]);
    }

    #[test]
    fn test_predefined_sets() {
        assert_eq!(ALL_METRICS.len(), 14);
        assert!(!ALL_METRICS.contains(Metric::Depth));
        assert!(!ALL_METRICS.requires_length_stats());
        assert!(ROBUST_METRICS.contains(Metric::Depth));
        assert_eq!(LENGTH_METRICS.len(), 5);
        assert!(LENGTH_METRICS.iter().all(Metric::is_length));
    }

    #[test]
    fn test_compute_all_metrics() {
        let r = repertoire();
        let metrics = compute_all_metrics(&r);

        assert_eq!(metrics.len(), 14);
        assert_eq!(metrics, compute_metrics(&r, &ALL_METRICS).unwrap());
        assert_eq!(metrics.get("total_count"), Some(20.));
        assert_eq!(metrics.get("normalized_shannon"), metrics.get("evenness"));
    }

    #[test]
    fn test_depth_alias() {
        let r = repertoire();

        assert_eq!(
            Metric::Depth.calculate(&r),
            Metric::TotalCount.calculate(&r)
        );
        assert_ne!(Metric::Depth.name(), Metric::TotalCount.name());
    }

    #[test]
    fn test_length_metric_without_stats() {
        let result = repertoire().compute_metrics(&LENGTH_METRICS);

        assert_eq!(
            result,
            Err(Error {
                donor_id: String::from("d1"),
                source: MissingLengthStats {
                    statistic: "mean length"
                }
            })
        );
    }

    #[test]
    fn test_length_metric_with_stats() {
        let r = repertoire().with_length_stats(Some(LengthStats {
            mean: 13.5,
            median: 13.,
            std: 1.5,
            min: 10,
            max: 17,
            n: 20,
            ..Default::default()
        }));
        let metrics = r.compute_metrics(&LENGTH_METRICS).unwrap();

        assert_eq!(metrics.get("mean_length"), Some(13.5));
        assert_eq!(metrics.get("min_length"), Some(10.));
        assert_eq!(metrics.get("max_length"), Some(17.));
    }

    #[test]
    fn test_collection_metrics() {
        let collection = RepertoireCollection::new(vec![
            repertoire(),
            Repertoire::from_counts([1., 1.]).unwrap().with_donor_id("d2"),
        ]);
        let results = collection.compute_metrics(&RICHNESS_METRICS).unwrap();

        assert_eq!(
            results.iter().map(Metrics::donor_id).collect::<Vec<_>>(),
            collection.donor_ids()
        );
        assert_eq!(results[1].get("richness"), Some(2.));
    }

    #[test]
    fn test_metric_from_str() {
        for metric in Metric::VARIANTS {
            assert_eq!(metric.name().parse::<Metric>(), Ok(metric));
        }
        assert!("simpson".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_set_from_str() {
        assert_eq!(
            "richness, clonality".parse::<MetricSet>(),
            Ok(Metric::Richness + Metric::Clonality)
        );
        assert_eq!("all_metrics".parse::<MetricSet>(), Ok(ALL_METRICS));
        assert_eq!(
            "length_metrics,d50".parse::<MetricSet>(),
            Ok(LENGTH_METRICS + Metric::D50)
        );
        assert_eq!(
            "richness,unknown".parse::<MetricSet>(),
            Err(ParseMetricError(String::from("unknown")))
        );
    }

    #[test]
    fn test_metric_names_are_not_set_names() {
        for metric in Metric::VARIANTS {
            assert_eq!(MetricSet::predefined(metric.name()), None);
            assert_eq!(metric.name().parse::<MetricSet>(), Ok(MetricSet::from(metric)));
        }
        assert_eq!("richness".parse::<MetricSet>().map(|s| s.len()), Ok(1));
        assert_eq!(
            "richness_metrics".parse::<MetricSet>(),
            Ok(RICHNESS_METRICS)
        );
    }

    #[test]
    fn test_metric_set_display() {
        assert_eq!(
            (Metric::Richness + Metric::D50).to_string(),
            "richness,d50"
        );
    }
}
