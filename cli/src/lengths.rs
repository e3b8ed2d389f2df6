use anyhow::{anyhow, Error};

use clap::Parser;
use indexmap::IndexMap;
use repstat_core::{
    length::{extract_lengths, length_distribution},
    repertoire::aggregate::group_by_donor,
};

use crate::{args::RepertoireArgs, output::Writer};

/// Print the distribution of sequence lengths of repertoires.
///
/// Prints one row per repertoire and length with the total weight at that length. Lengths are
/// weighted by the count column, if provided. Requires a length column.
#[derive(Debug, Parser)]
pub struct Lengths {
    #[command(flatten)]
    repertoire: RepertoireArgs,

    /// Delimiter between columns.
    #[arg(short = 'd', long, default_value_t = '\t', value_name = "CHAR")]
    delimiter: char,

    /// Do not print a header with column names.
    #[arg(long)]
    no_header: bool,
}

impl Lengths {
    pub fn run(self) -> Result<(), Error> {
        let args = &self.repertoire;
        let length_column = args
            .length_column
            .as_deref()
            .ok_or_else(|| anyhow!("a length column is required (use -l/--length-column)"))?;

        let mut writer = Writer::stdout(self.delimiter, 0);
        if !self.no_header {
            writer.write_with_delimiter(["donor_id", "length", "weight"])?;
        }

        for (input, table) in args.read_tables()? {
            let columns = std::iter::once(length_column)
                .chain(args.count_column.as_deref())
                .chain(args.donor_column.as_deref());
            table.check_columns(columns)?;

            let groups = match args.donor_column.as_deref() {
                Some(column) => {
                    let (groups, missing) = group_by_donor(table.rows(), column);
                    if missing > 0 {
                        log::warn!(
                            "Skipped {missing} rows in '{}' due to missing donor.",
                            input.name()
                        );
                    }
                    groups
                }
                None => IndexMap::from([(input.name(), table.rows().collect::<Vec<_>>())]),
            };

            for (donor, rows) in groups {
                let lengths = extract_lengths(
                    rows,
                    length_column,
                    args.count_column.as_deref(),
                    args.amino_acid,
                );

                log::debug!(
                    "Extracted {} lengths for '{donor}' from '{}'.",
                    lengths.len(),
                    input.name()
                );

                for (length, weight) in length_distribution(&lengths) {
                    writer.write_with_delimiter([
                        donor.clone(),
                        length.to_string(),
                        weight.to_string(),
                    ])?;
                }
            }
        }

        Ok(())
    }
}
