use anyhow::{anyhow, Error};

use clap::Parser;
use repstat_core::MetricSet;

use crate::args::RepertoireArgs;

mod runner;
use runner::Runner;

/// Calculate diversity and clonality metrics of repertoires.
#[derive(Debug, Parser)]
pub struct Stat {
    #[command(flatten)]
    pub(crate) repertoire: RepertoireArgs,

    /// Metrics to calculate.
    ///
    /// More than one metric can be output. Use comma to separate metrics. Predefined sets of
    /// metrics can be used by name: 'all_metrics', 'diversity_metrics', 'clonality_metrics',
    /// 'richness_metrics', 'robust_metrics', and 'length_metrics'. Length metrics require a
    /// length column.
    #[arg(short = 'm', long, default_value = "all_metrics", value_name = "METRIC,...")]
    pub metrics: MetricSet,

    /// Rarefy repertoires to this depth before calculating metrics.
    #[arg(long, value_name = "INT")]
    pub rarefy: Option<usize>,

    /// Seed for rarefaction.
    ///
    /// By default, the random number generator is seeded from system entropy.
    #[arg(long, requires = "rarefy", value_name = "INT")]
    pub seed: Option<u64>,

    /// Delimiter between metrics.
    #[arg(short = 'd', long, default_value_t = '\t', value_name = "CHAR")]
    pub delimiter: char,

    /// Precision to use when printing metrics.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    pub precision: usize,

    /// Do not print a header with the names of metrics.
    #[arg(long)]
    pub no_header: bool,
}

impl Stat {
    pub fn run(self) -> Result<(), Error> {
        if self.metrics.requires_length_stats() && self.repertoire.length_column.is_none() {
            return Err(anyhow!(
                "length metrics require a length column (use -l/--length-column)"
            ));
        }

        let mut runner = Runner::try_from(&self)?;
        runner.run()
    }
}
