//! Delimiter-separated tables of rearrangements.
//!
//! A [`Table`] is a fully read, header-indexed table of string cells. Access to cells goes
//! through the [`Row`] trait, which returns `None` for empty cells as well as for columns that
//! are not present, so that missing data has to be handled explicitly downstream.

use std::{fmt, io};

use indexmap::IndexMap;

pub mod read;

/// Named-column access to a single row.
pub trait Row {
    /// Returns the cell in the provided column, or `None` if the column does not exist or the
    /// cell is empty.
    fn get(&self, column: &str) -> Option<&str>;
}

impl Row for IndexMap<String, String> {
    fn get(&self, column: &str) -> Option<&str> {
        IndexMap::get(self, column)
            .map(String::as_str)
            .filter(|cell| !cell.is_empty())
    }
}

impl<R> Row for &R
where
    R: Row + ?Sized,
{
    fn get(&self, column: &str) -> Option<&str> {
        R::get(*self, column)
    }
}

/// A table with a header and string cells.
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: IndexMap<String, usize>,
    records: Vec<csv::StringRecord>,
}

impl Table {
    /// Creates a new table from a header and records.
    pub fn new<I, S>(header: I, records: Vec<csv::StringRecord>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = header
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.into(), i))
            .collect();

        Self { columns, records }
    }

    /// Creates a new table from string slices.
    pub fn from_rows(header: &[&str], rows: &[&[&str]]) -> Self {
        let records = rows
            .iter()
            .map(|row| csv::StringRecord::from(row.to_vec()))
            .collect();

        Self::new(header.iter().copied(), records)
    }

    /// Returns an error naming the first of the provided columns not present in the table.
    pub fn check_columns<'a, I>(&self, columns: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match columns.into_iter().find(|c| !self.has_column(c)) {
            Some(column) => Err(Error::UnknownColumn {
                column: column.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Returns the column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Returns `true` if the table has a column with the provided name.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.records.iter().map(move |record| TableRow {
            columns: &self.columns,
            record,
        })
    }
}

/// A row in a [`Table`].
#[derive(Clone, Copy, Debug)]
pub struct TableRow<'a> {
    columns: &'a IndexMap<String, usize>,
    record: &'a csv::StringRecord,
}

impl<'a> Row for TableRow<'a> {
    fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .get(column)
            .and_then(|&i| self.record.get(i))
            .filter(|cell| !cell.is_empty())
    }
}

/// An error associated with reading or accessing a table.
#[derive(Debug)]
pub enum Error {
    /// CSV parsing error.
    Csv(csv::Error),
    /// I/O error.
    Io(io::Error),
    /// A requested column is not in the table header.
    UnknownColumn {
        /// The requested column.
        column: String,
    },
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Csv(e) => write!(f, "{e}"),
            Error::Io(e) => write!(f, "{e}"),
            Error::UnknownColumn { column } => write!(f, "column '{column}' not found in table"),
        }
    }
}

impl std::error::Error for Error {}
