use std::path::PathBuf;

use anyhow::{anyhow, Error};

use clap::Args;
use repstat_core::{
    repertoire::aggregate::{self, Summary},
    table, Input, LineageKey, Repertoire, RepertoireCollection, Table,
};

/// Arguments shared by subcommands reading repertoires from rearrangement tables.
#[derive(Args, Debug)]
pub struct RepertoireArgs {
    /// Input rearrangement tables.
    ///
    /// Tables may be gzipped. If no file is provided, stdin will be used. Each input gives one
    /// repertoire named after the file, unless a donor column is provided.
    #[arg(value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Delimiter between columns of the input tables.
    #[arg(long, default_value_t = '\t', value_name = "CHAR")]
    pub input_delimiter: char,

    /// Column of precomputed lineage identifiers.
    ///
    /// Rows with the same identifier are grouped into one lineage. Defaults to 'clone_id' unless
    /// lineages are defined by genes.
    #[arg(short = 'k', long, conflicts_with = "genes", value_name = "COLUMN")]
    pub key_column: Option<String>,

    /// Define lineages by V gene, J gene, and CDR3.
    #[arg(long)]
    pub genes: bool,

    /// Column of V gene calls.
    #[arg(long, default_value = "v_call", requires = "genes", value_name = "COLUMN")]
    pub v_column: String,

    /// Column of J gene calls.
    #[arg(long, default_value = "j_call", requires = "genes", value_name = "COLUMN")]
    pub j_column: String,

    /// Column of CDR3 sequences.
    #[arg(long, default_value = "junction_aa", requires = "genes", value_name = "COLUMN")]
    pub cdr3_column: String,

    /// Use all comma-separated gene calls in lineage keys.
    ///
    /// By default, only the first of multiple gene calls is used.
    #[arg(long, requires = "genes")]
    pub all_alleles: bool,

    /// Column of counts.
    ///
    /// By default, each row counts once. Rows with missing or invalid counts are skipped.
    #[arg(short = 'c', long, value_name = "COLUMN")]
    pub count_column: Option<String>,

    /// Column of donor identifiers.
    ///
    /// If provided, each input is split into one repertoire per donor. Rows without a donor are
    /// skipped.
    #[arg(short = 'D', long, value_name = "COLUMN")]
    pub donor_column: Option<String>,

    /// Column of sequences to compute length statistics from.
    ///
    /// Lengths are weighted by the count column, if provided.
    #[arg(short = 'l', long, value_name = "COLUMN")]
    pub length_column: Option<String>,

    /// Treat the length column as amino acid sequences.
    ///
    /// By default, the length column is assumed to contain nucleotide sequences, and lengths are
    /// divided by three.
    #[arg(long)]
    pub amino_acid: bool,
}

impl RepertoireArgs {
    const DEFAULT_KEY_COLUMN: &'static str = "clone_id";

    pub fn lineage_key(&self) -> LineageKey {
        if self.genes {
            LineageKey::Genes {
                v: self.v_column.clone(),
                j: self.j_column.clone(),
                cdr3: self.cdr3_column.clone(),
                first_allele: !self.all_alleles,
            }
        } else {
            LineageKey::column(
                self.key_column
                    .as_deref()
                    .unwrap_or(Self::DEFAULT_KEY_COLUMN),
            )
        }
    }

    /// Reads the input tables, in order.
    pub fn read_tables(&self) -> Result<Vec<(Input, Table)>, Error> {
        let inputs = if self.inputs.is_empty() {
            vec![Input::new(None)?]
        } else {
            self.inputs
                .iter()
                .map(|path| Input::new(Some(path.clone())))
                .collect::<Result<Vec<_>, _>>()?
        };

        let delimiter = u8::try_from(self.input_delimiter)
            .map_err(|_| anyhow!("input delimiter must be a single byte"))?;

        let mut tables = Vec::with_capacity(inputs.len());
        for input in inputs {
            let table = table::read::Builder::default()
                .set_delimiter(delimiter)
                .read_input(&input)
                .map_err(|e| anyhow!("failed to read '{}': {e}", input.name()))?;

            log::info!(
                "Read {} rows with {} columns from '{}'.",
                table.len(),
                table.columns().count(),
                input.name()
            );

            tables.push((input, table));
        }

        Ok(tables)
    }

    /// Reads the input tables and aggregates them into repertoires.
    pub fn read_repertoires(&self) -> Result<RepertoireCollection, Error> {
        let mut repertoires = Vec::new();

        for (input, table) in self.read_tables()? {
            let builder = aggregate::Builder::new(self.lineage_key())
                .set_count_column(self.count_column.clone())
                .set_donor_column(self.donor_column.clone())
                .set_length_column(self.length_column.clone())
                .set_amino_acid(self.amino_acid)
                .set_source(input.as_path().map(PathBuf::from));

            let summary = if self.donor_column.is_some() {
                let (collection, summary) = builder.aggregate_by_donor(&table)?;
                repertoires.extend(collection);
                summary
            } else {
                let (repertoire, summary) = builder.aggregate(&table)?;
                repertoires.push(repertoire.with_donor_id(input.name()));
                summary
            };

            warn_skipped(&input, &summary);
        }

        log::debug!("Aggregated {} repertoires.", repertoires.len());
        for repertoire in repertoires.iter() {
            log_repertoire(repertoire);
        }

        Ok(RepertoireCollection::new(repertoires))
    }
}

fn warn_skipped(input: &Input, summary: &Summary) {
    let name = input.name();

    for (count, reason) in [
        (summary.missing_key, "missing lineage key"),
        (summary.invalid_count, "missing or invalid count"),
        (summary.missing_donor, "missing donor"),
    ] {
        if count > 0 {
            log::warn!("Skipped {count} rows in '{name}' due to {reason}.");
        }
    }

    log::info!(
        "Aggregated {} of {} rows in '{name}'.",
        summary.used(),
        summary.rows
    );
}

fn log_repertoire(repertoire: &Repertoire) {
    log::debug!(
        "Repertoire '{}' has {} lineages with total count {}.",
        repertoire.donor_id(),
        repertoire.richness(),
        repertoire.total_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind as ClapErrorKind;

    use crate::{
        stat::Stat,
        tests::{parse_subcmd, try_parse_subcmd},
    };

    #[test]
    fn test_default_lineage_key() {
        let args = parse_subcmd::<Stat>("repstat stat input.tsv");

        assert!(matches!(
            args.repertoire.lineage_key(),
            LineageKey::Column(column) if column == "clone_id"
        ));
    }

    #[test]
    fn test_genes_lineage_key() {
        let args = parse_subcmd::<Stat>("repstat stat --genes --cdr3-column cdr3 input.tsv");

        assert!(matches!(
            args.repertoire.lineage_key(),
            LineageKey::Genes { v, cdr3, first_allele: true, .. } if v == "v_call" && cdr3 == "cdr3"
        ));
    }

    #[test]
    fn test_key_column_and_genes_conflict() {
        let result = try_parse_subcmd::<Stat>("repstat stat -k clone_id --genes input.tsv");

        assert_eq!(result.unwrap_err().kind(), ClapErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_all_alleles_requires_genes() {
        let result = try_parse_subcmd::<Stat>("repstat stat --all-alleles input.tsv");

        assert_eq!(
            result.unwrap_err().kind(),
            ClapErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_multiple_inputs() {
        let args = parse_subcmd::<Stat>("repstat stat -c duplicate_count a.tsv b.tsv.gz");

        assert_eq!(
            args.repertoire.inputs,
            [PathBuf::from("a.tsv"), PathBuf::from("b.tsv.gz")]
        );
        assert_eq!(
            args.repertoire.count_column.as_deref(),
            Some("duplicate_count")
        );
    }
}
