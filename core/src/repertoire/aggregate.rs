//! Aggregation of rearrangement tables into repertoires.

use std::{fmt, ops::AddAssign, path::PathBuf};

use indexmap::IndexMap;

use crate::{
    length::LengthStats,
    table::{self, Row, Table, TableRow},
};

use super::{ConstructionError, LineageKey, Metadata, Repertoire, RepertoireCollection};

/// A builder to aggregate tables into repertoires.
#[derive(Debug)]
pub struct Builder {
    lineage_key: LineageKey,
    count_column: Option<String>,
    donor_column: Option<String>,
    length_column: Option<String>,
    amino_acid: bool,
    source: Option<PathBuf>,
}

impl Builder {
    /// Creates a new builder grouping rows by the provided lineage key.
    pub fn new(lineage_key: LineageKey) -> Self {
        Self {
            lineage_key,
            count_column: None,
            donor_column: None,
            length_column: None,
            amino_acid: false,
            source: None,
        }
    }

    /// Aggregates a table into a single repertoire.
    ///
    /// Rows are grouped by lineage key, and the counts of each group are summed. The donor id is
    /// the first value in the donor column, if set, and empty otherwise.
    ///
    /// # Errors
    ///
    /// If any of the configured columns are not in the table.
    pub fn aggregate(&self, table: &Table) -> Result<(Repertoire, Summary), Error> {
        self.check_columns(table)?;

        let rows = table.rows().collect::<Vec<_>>();
        self.aggregate_rows(&rows)
    }

    /// Aggregates a table into one repertoire per donor.
    ///
    /// Repertoires are ordered by the first occurrence of each donor in the table. Rows without a
    /// donor are skipped. If no donor column is set, this is equivalent to [`Self::aggregate`]
    /// with a single repertoire in the collection.
    ///
    /// # Errors
    ///
    /// If any of the configured columns are not in the table.
    pub fn aggregate_by_donor(
        &self,
        table: &Table,
    ) -> Result<(RepertoireCollection, Summary), Error> {
        let donor_column = match &self.donor_column {
            Some(column) => column,
            None => {
                let (repertoire, summary) = self.aggregate(table)?;
                return Ok((RepertoireCollection::new(vec![repertoire]), summary));
            }
        };

        self.check_columns(table)?;

        let (groups, missing_donor) = group_by_donor(table.rows(), donor_column);
        let mut summary = Summary {
            rows: missing_donor,
            missing_donor,
            ..Default::default()
        };

        let repertoires = groups
            .iter()
            .map(|(donor, rows)| {
                self.aggregate_rows(rows).map(|(repertoire, group_summary)| {
                    summary += group_summary;
                    repertoire.with_donor_id(donor.as_str())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((RepertoireCollection::new(repertoires), summary))
    }

    fn aggregate_rows(&self, rows: &[TableRow<'_>]) -> Result<(Repertoire, Summary), Error> {
        let mut summary = Summary::default();
        let mut groups: IndexMap<String, f64> = IndexMap::new();
        let mut donor_id = None;

        for row in rows {
            summary.rows += 1;

            let key = match self.lineage_key.key(row) {
                Some(key) => key,
                None => {
                    summary.missing_key += 1;
                    continue;
                }
            };

            let count = match &self.count_column {
                Some(column) => match parse_count(row.get(column)) {
                    Some(count) => count,
                    None => {
                        summary.invalid_count += 1;
                        continue;
                    }
                },
                None => 1.0,
            };

            if donor_id.is_none() {
                donor_id = self
                    .donor_column
                    .as_deref()
                    .and_then(|column| row.get(column))
                    .map(String::from);
            }

            *groups.entry(key).or_insert(0.0) += count;
        }

        let length_stats = self.length_column.as_deref().map(|column| {
            LengthStats::from_rows(
                rows.iter(),
                column,
                self.count_column.as_deref(),
                self.amino_acid,
            )
        });

        let (lineage_ids, counts) = groups.into_iter().unzip();
        let repertoire = Repertoire::new(counts, lineage_ids)?
            .with_donor_id(donor_id.unwrap_or_default())
            .with_length_stats(length_stats)
            .with_metadata(Metadata {
                source: self.source.clone(),
                lineage_key: Some(self.lineage_key.name()),
            });

        Ok((repertoire, summary))
    }

    fn check_columns(&self, table: &Table) -> Result<(), Error> {
        let optional = [&self.count_column, &self.donor_column, &self.length_column];

        table
            .check_columns(
                self.lineage_key
                    .columns()
                    .into_iter()
                    .chain(optional.into_iter().flatten().map(String::as_str)),
            )
            .map_err(Error::from)
    }

    /// Sets whether lengths are amino acid lengths.
    ///
    /// By default, the length column is assumed to contain nucleotide sequences.
    pub fn set_amino_acid(mut self, amino_acid: bool) -> Self {
        self.amino_acid = amino_acid;
        self
    }

    /// Sets the column to take counts from.
    ///
    /// By default, each row counts once. Rows with missing, non-numeric or negative counts are
    /// skipped.
    pub fn set_count_column(mut self, count_column: Option<String>) -> Self {
        self.count_column = count_column;
        self
    }

    /// Sets the column to take donor ids from.
    pub fn set_donor_column(mut self, donor_column: Option<String>) -> Self {
        self.donor_column = donor_column;
        self
    }

    /// Sets the column to compute length statistics from.
    ///
    /// By default, no length statistics are computed. Lengths are weighted by the count column,
    /// if set.
    pub fn set_length_column(mut self, length_column: Option<String>) -> Self {
        self.length_column = length_column;
        self
    }

    /// Sets the source path recorded in repertoire metadata.
    pub fn set_source(mut self, source: Option<PathBuf>) -> Self {
        self.source = source;
        self
    }
}

/// Groups rows by the value in the donor column, in first-seen order of donors.
///
/// Rows without a donor are skipped, and their number is returned alongside the groups.
pub fn group_by_donor<I, R>(rows: I, donor_column: &str) -> (IndexMap<String, Vec<R>>, usize)
where
    I: IntoIterator<Item = R>,
    R: Row,
{
    let mut groups: IndexMap<String, Vec<R>> = IndexMap::new();
    let mut missing = 0;

    for row in rows {
        match row.get(donor_column).map(String::from) {
            Some(donor) => groups.entry(donor).or_default().push(row),
            None => missing += 1,
        }
    }

    (groups, missing)
}

fn parse_count(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|count| count.is_finite() && *count >= 0.0)
}

/// Tally of rows seen during aggregation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Total number of rows.
    pub rows: usize,
    /// Rows skipped due to a missing lineage key component.
    pub missing_key: usize,
    /// Rows skipped due to a missing, non-numeric or negative count.
    pub invalid_count: usize,
    /// Rows skipped due to a missing donor, when splitting by donor.
    pub missing_donor: usize,
}

impl Summary {
    /// Returns the number of rows aggregated.
    pub fn used(&self) -> usize {
        self.rows - self.skipped()
    }

    /// Returns the number of rows skipped.
    pub fn skipped(&self) -> usize {
        self.missing_key + self.invalid_count + self.missing_donor
    }
}

impl AddAssign for Summary {
    fn add_assign(&mut self, other: Self) {
        self.rows += other.rows;
        self.missing_key += other.missing_key;
        self.invalid_count += other.invalid_count;
        self.missing_donor += other.missing_donor;
    }
}

/// An error associated with aggregating a table.
#[derive(Debug)]
pub enum Error {
    /// The aggregated counts do not form a valid repertoire.
    Construction(ConstructionError),
    /// Error accessing the table.
    Table(table::Error),
}

impl From<ConstructionError> for Error {
    fn from(e: ConstructionError) -> Self {
        Self::Construction(e)
    }
}

impl From<table::Error> for Error {
    fn from(e: table::Error) -> Self {
        Self::Table(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Construction(e) => write!(f, "{e}"),
            Error::Table(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}
