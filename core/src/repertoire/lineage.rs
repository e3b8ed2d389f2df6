//! Lineage key strategies.
//!
//! A lineage key groups rearrangements into clones when aggregating a table into a
//! [`Repertoire`](super::Repertoire).

use std::fmt;

use crate::table::Row;

/// Separator between components of compound lineage keys.
pub const KEY_SEPARATOR: char = '|';

type KeyFn = dyn Fn(&dyn Row) -> Option<String> + Send + Sync;

/// A strategy to extract a lineage key from a row.
///
/// Rows for which no key can be extracted, because some component is missing, are excluded from
/// aggregation.
pub enum LineageKey {
    /// Use a precomputed lineage identifier column, such as `clone_id`.
    Column(String),
    /// Use V gene, J gene, and CDR3 columns.
    Genes {
        /// V gene call column.
        v: String,
        /// J gene call column.
        j: String,
        /// CDR3 or junction column.
        cdr3: String,
        /// Whether to keep only the first of multiple comma-separated gene calls.
        first_allele: bool,
    },
    /// Use an arbitrary function of the row.
    Custom {
        /// Name of the strategy, recorded in repertoire metadata.
        name: String,
        /// Key extraction function.
        key: Box<KeyFn>,
    },
}

impl LineageKey {
    /// Default V gene call column.
    pub const DEFAULT_V_COLUMN: &'static str = "v_call";
    /// Default J gene call column.
    pub const DEFAULT_J_COLUMN: &'static str = "j_call";
    /// Default CDR3 column.
    pub const DEFAULT_CDR3_COLUMN: &'static str = "junction_aa";

    /// Creates a strategy using a precomputed lineage identifier column.
    pub fn column<S>(column: S) -> Self
    where
        S: Into<String>,
    {
        Self::Column(column.into())
    }

    /// Creates a strategy using a custom key function.
    pub fn custom<S, F>(name: S, key: F) -> Self
    where
        S: Into<String>,
        F: Fn(&dyn Row) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom {
            name: name.into(),
            key: Box::new(key),
        }
    }

    /// Creates a strategy using the default V gene, J gene, and CDR3 columns.
    pub fn genes(first_allele: bool) -> Self {
        Self::Genes {
            v: String::from(Self::DEFAULT_V_COLUMN),
            j: String::from(Self::DEFAULT_J_COLUMN),
            cdr3: String::from(Self::DEFAULT_CDR3_COLUMN),
            first_allele,
        }
    }

    /// Returns the columns required by the strategy.
    ///
    /// Custom strategies declare no columns.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            LineageKey::Column(column) => vec![column.as_str()],
            LineageKey::Genes { v, j, cdr3, .. } => vec![v.as_str(), j.as_str(), cdr3.as_str()],
            LineageKey::Custom { .. } => Vec::new(),
        }
    }

    /// Returns the key of the row, or `None` if any component of the key is missing.
    pub fn key<R>(&self, row: &R) -> Option<String>
    where
        R: Row,
    {
        match self {
            LineageKey::Column(column) => row.get(column).map(String::from),
            LineageKey::Genes {
                v,
                j,
                cdr3,
                first_allele: truncate,
            } => {
                let (v, j) = if *truncate {
                    (first_allele(row.get(v))?, first_allele(row.get(j))?)
                } else {
                    (row.get(v)?, row.get(j)?)
                };
                let cdr3 = row.get(cdr3)?;

                Some(format!("{v}{KEY_SEPARATOR}{j}{KEY_SEPARATOR}{cdr3}"))
            }
            LineageKey::Custom { key, .. } => key(row),
        }
    }

    /// Returns a short description of the strategy.
    pub fn name(&self) -> String {
        match self {
            LineageKey::Column(column) => format!("column:{column}"),
            LineageKey::Genes {
                v,
                j,
                cdr3,
                first_allele,
            } => {
                let suffix = if *first_allele { ":first_allele" } else { "" };
                format!("genes:{v}/{j}/{cdr3}{suffix}")
            }
            LineageKey::Custom { name, .. } => name.clone(),
        }
    }
}

impl fmt::Debug for LineageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineageKey::Column(column) => f.debug_tuple("Column").field(column).finish(),
            LineageKey::Genes {
                v,
                j,
                cdr3,
                first_allele,
            } => f
                .debug_struct("Genes")
                .field("v", v)
                .field("j", j)
                .field("cdr3", cdr3)
                .field("first_allele", first_allele)
                .finish(),
            LineageKey::Custom { name, .. } => {
                f.debug_struct("Custom").field("name", name).finish()
            }
        }
    }
}

/// Returns the first of possibly multiple comma-separated gene calls, trimmed of whitespace.
///
/// Missing calls stay missing.
pub fn first_allele(call: Option<&str>) -> Option<&str> {
    call.and_then(|call| call.split(',').next())
        .map(str::trim)
        .filter(|call| !call.is_empty())
}

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
    fn test_first_allele() {
        assert_eq!(
            first_allele(Some("IGHV1-2*02, IGHV1-2*04")),
            Some("IGHV1-2*02")
        );
        assert_eq!(first_allele(Some(" IGHJ4*02 ")), Some("IGHJ4*02"));
        assert_eq!(first_allele(None), None);
    }

    #[test]
    fn test_column_key() {
        let key = LineageKey::column("clone_id");

        assert_eq!(key.key(&row(&[("clone_id", "7")])), Some(String::from("7")));
        assert_eq!(key.key(&row(&[("clone_id", "")])), None);
        assert_eq!(key.name(), "column:clone_id");
    }

    #[test]
    fn test_genes_key() {
        let row = row(&[
            ("v_call", "IGHV3-23*01,IGHV3-23D*01"),
            ("j_call", "IGHJ4*02"),
            ("junction_aa", "CARDYW"),
        ]);

        assert_eq!(
            LineageKey::genes(true).key(&row),
            Some(String::from("IGHV3-23*01|IGHJ4*02|CARDYW"))
        );
        assert_eq!(
            LineageKey::genes(false).key(&row),
            Some(String::from("IGHV3-23*01,IGHV3-23D*01|IGHJ4*02|CARDYW"))
        );
    }

    #[test]
    fn test_genes_key_missing_component() {
        let row = row(&[("v_call", "IGHV3-23*01"), ("junction_aa", "CARDYW")]);

        assert_eq!(LineageKey::genes(true).key(&row), None);
    }

    #[test]
    fn test_custom_key() {
        let key = LineageKey::custom("cdr3_length", |row: &dyn Row| {
            row.get("junction_aa").map(|s| s.len().to_string())
        });

        assert_eq!(
            key.key(&row(&[("junction_aa", "CASSF")])),
            Some(String::from("5"))
        );
        assert_eq!(key.name(), "cdr3_length");
        assert!(key.columns().is_empty());
    }
}
