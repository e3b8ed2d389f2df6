use anyhow::Error;

use clap::Parser;
use repstat_core::{hill_numbers, HillNumber};

use crate::{args::RepertoireArgs, output::Writer};

/// Calculate Hill numbers of repertoires.
///
/// Prints one row per repertoire and order.
#[derive(Debug, Parser)]
pub struct Hill {
    #[command(flatten)]
    repertoire: RepertoireArgs,

    /// Orders of Hill numbers to calculate.
    ///
    /// Use comma to separate orders, and 'inf' for the infinite order.
    #[arg(
        short = 'o',
        long,
        use_value_delimiter = true,
        value_delimiter = ',',
        default_values_t = HillNumber::DEFAULT_ORDERS,
        value_name = "Q,..."
    )]
    orders: Vec<f64>,

    /// Delimiter between columns.
    #[arg(short = 'd', long, default_value_t = '\t', value_name = "CHAR")]
    delimiter: char,

    /// Precision to use when printing Hill numbers.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    precision: usize,

    /// Do not print a header with column names.
    #[arg(long)]
    no_header: bool,
}

impl Hill {
    pub fn run(self) -> Result<(), Error> {
        let collection = self.repertoire.read_repertoires()?;

        let mut writer = Writer::stdout(self.delimiter, self.precision);
        if !self.no_header {
            writer.write_with_delimiter(["donor_id", "order", "value"])?;
        }

        for repertoire in collection.iter() {
            for hill in hill_numbers(repertoire, &self.orders) {
                let value = writer.format_value(Some(hill.value));
                writer.write_with_delimiter([
                    repertoire.donor_id().to_string(),
                    hill.order.to_string(),
                    value,
                ])?;
            }
        }

        Ok(())
    }
}
