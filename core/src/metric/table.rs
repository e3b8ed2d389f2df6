//! Tabular view of computed metrics.

use super::Metrics;

/// Name of the donor identifier column.
pub const DONOR_ID_COLUMN: &str = "donor_id";

/// Computed metrics of one or more repertoires, as a table with one row per repertoire.
///
/// Columns are the union of computed metrics in order of first appearance. Metrics not computed
/// for a repertoire are `None` in its row.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricsTable {
    columns: Vec<&'static str>,
    rows: Vec<MetricsRow>,
}

/// A row of a [`MetricsTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct MetricsRow {
    /// Donor identifier.
    pub donor_id: String,
    /// Metric values, aligned with the metric columns of the table.
    pub values: Vec<Option<f64>>,
}

impl MetricsTable {
    /// Creates a new table from computed metrics.
    pub fn new(metrics: &[Metrics]) -> Self {
        let mut columns: Vec<&'static str> = Vec::new();
        for name in metrics.iter().flat_map(Metrics::names) {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }

        let rows = metrics
            .iter()
            .map(|m| MetricsRow {
                donor_id: m.donor_id().to_string(),
                values: columns.iter().map(|name| m.get(name)).collect(),
            })
            .collect();

        Self { columns, rows }
    }

    /// Returns the header, starting with the donor identifier column.
    pub fn header(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(DONOR_ID_COLUMN).chain(self.columns.iter().copied())
    }

    /// Returns the names of the metric columns.
    pub fn metric_columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }
}

impl From<&Metrics> for MetricsTable {
    fn from(metrics: &Metrics) -> Self {
        Self::new(std::slice::from_ref(metrics))
    }
}

impl From<&[Metrics]> for MetricsTable {
    fn from(metrics: &[Metrics]) -> Self {
        Self::new(metrics)
    }
}
