use anyhow::Error;

use clap::Parser;
use repstat_core::rarefy::seeded_rng;

use crate::{args::RepertoireArgs, output::Writer};

/// Rarefy repertoires to a common depth.
///
/// Prints the rarefied counts with one row per lineage.
#[derive(Debug, Parser)]
pub struct Rarefy {
    #[command(flatten)]
    repertoire: RepertoireArgs,

    /// Depth to rarefy to.
    ///
    /// By default, the smallest total count among the input repertoires is used.
    #[arg(long, value_name = "INT")]
    depth: Option<usize>,

    /// Seed for the random number generator.
    ///
    /// By default, the random number generator is seeded from system entropy.
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,

    /// Delimiter between columns.
    #[arg(short = 'd', long, default_value_t = '\t', value_name = "CHAR")]
    delimiter: char,

    /// Do not print a header with column names.
    #[arg(long)]
    no_header: bool,
}

impl Rarefy {
    pub fn run(self) -> Result<(), Error> {
        let collection = self.repertoire.read_repertoires()?;

        let mut rng = seeded_rng(self.seed);
        let rarefied = collection.rarefy(self.depth, &mut rng)?;

        let mut writer = Writer::stdout(self.delimiter, 0);
        if !self.no_header {
            writer.write_with_delimiter(["donor_id", "lineage_id", "count"])?;
        }

        for repertoire in rarefied.iter() {
            log::debug!(
                "Rarefied '{}' to {} lineages.",
                repertoire.donor_id(),
                repertoire.richness()
            );

            for (id, count) in repertoire.lineage_ids().iter().zip(repertoire.counts()) {
                writer.write_with_delimiter([
                    repertoire.donor_id().to_string(),
                    id.clone(),
                    count.to_string(),
                ])?;
            }
        }

        Ok(())
    }
}
