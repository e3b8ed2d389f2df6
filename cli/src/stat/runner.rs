use std::io;

use anyhow::Error;

use repstat_core::{rarefy, MetricSet, MetricsTable, RepertoireCollection};

use crate::output::Writer;

use super::Stat;

#[derive(Debug)]
pub struct Runner<W> {
    writer: Writer<W>,
    collection: RepertoireCollection,
    metrics: MetricSet,
    header: bool,
}

impl<W> Runner<W>
where
    W: io::Write,
{
    pub fn new(
        writer: Writer<W>,
        collection: RepertoireCollection,
        metrics: MetricSet,
        header: bool,
    ) -> Self {
        Self {
            writer,
            collection,
            metrics,
            header,
        }
    }

    pub fn run(&mut self) -> Result<(), Error> {
        let results = self.collection.compute_metrics(&self.metrics)?;
        let table = MetricsTable::new(&results);

        if self.header {
            self.writer.write_with_delimiter(table.header())?;
        }

        for row in table.rows() {
            let values = row
                .values
                .iter()
                .map(|&value| self.writer.format_value(value))
                .collect::<Vec<_>>();

            self.writer
                .write_with_delimiter(std::iter::once(row.donor_id.clone()).chain(values))?;
        }

        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.writer.into_inner()
    }
}

impl TryFrom<&Stat> for Runner<io::StdoutLock<'static>> {
    type Error = Error;

    fn try_from(args: &Stat) -> Result<Self, Self::Error> {
        let mut collection = args.repertoire.read_repertoires()?;

        if let Some(depth) = args.rarefy {
            log::info!("Rarefying {} repertoires to depth {depth}.", collection.len());

            let mut rng = rarefy::seeded_rng(args.seed);
            collection = collection.rarefy(Some(depth), &mut rng)?;
        }

        Ok(Self::new(
            Writer::stdout(args.delimiter, args.precision),
            collection,
            args.metrics.clone(),
            !args.no_header,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use repstat_core::{Metric, Repertoire};

    fn run(collection: RepertoireCollection, metrics: MetricSet) -> Result<String, Error> {
        let mut runner = Runner::new(Writer::new(Vec::new(), '\t', 3), collection, metrics, true);
        runner.run()?;

        Ok(String::from_utf8(runner.into_output())?)
    }

    #[test]
    fn test_one_row_per_repertoire() {
        let collection = RepertoireCollection::new(vec![
            Repertoire::from_counts([3., 1.]).unwrap().with_donor_id("a"),
            Repertoire::from_counts([2.]).unwrap().with_donor_id("b"),
        ]);

        assert_eq!(
            run(collection, Metric::Richness + Metric::BergerParker).unwrap(),
            "donor_id\trichness\tberger_parker\na\t2.000\t0.750\nb\t1.000\t1.000\n"
        );
    }

    #[test]
    fn test_missing_length_stats() {
        let collection = RepertoireCollection::new(vec![Repertoire::from_counts([3., 1.])
            .unwrap()
            .with_donor_id("a")]);

        let result = run(collection, MetricSet::from(Metric::MeanLength));

        assert!(result.unwrap_err().to_string().starts_with("donor 'a'"));
    }
}
