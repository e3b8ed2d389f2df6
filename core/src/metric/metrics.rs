use indexmap::IndexMap;

use super::Metric;

/// Computed metrics of a single repertoire.
///
/// Looking up a metric that was not computed gives `None`, which is distinct from any computed
/// value.
#[derive(Clone, Debug, PartialEq)]
pub struct Metrics {
    donor_id: String,
    values: IndexMap<&'static str, f64>,
}

impl Metrics {
    pub(crate) fn new<S>(donor_id: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            donor_id: donor_id.into(),
            values: IndexMap::new(),
        }
    }

    /// Returns `true` if the metric with the provided name was computed.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the donor identifier of the repertoire.
    pub fn donor_id(&self) -> &str {
        &self.donor_id
    }

    /// Returns the value of the metric with the provided name, if computed.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Returns the value of the metric, if computed.
    pub fn get_metric(&self, metric: Metric) -> Option<f64> {
        self.get(metric.name())
    }

    pub(crate) fn insert(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric.name(), value);
    }

    /// Returns `true` if no metrics were computed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over names and values of computed metrics, in order of computation.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(&name, &value)| (name, value))
    }

    /// Returns the number of computed metrics.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns an iterator over names of computed metrics, in order of computation.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}
