//! Rarefaction of repertoires to a common sequencing depth.

use std::fmt;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{repertoire::ConstructionError, Repertoire, RepertoireCollection};

/// Subsamples a repertoire without replacement to the provided depth.
///
/// Each unit of count is a draw tagged by its lineage, and `depth` draws are sampled uniformly
/// without replacement. Lineages that are not drawn are removed. The donor identifier and
/// metadata are kept, while length statistics are dropped since they describe the original
/// sequences.
///
/// # Errors
///
/// If the depth is zero or exceeds the total count, or if any count is not an integer. No
/// sampling takes place in that case.
pub fn rarefy<R>(repertoire: &Repertoire, depth: usize, rng: &mut R) -> Result<Repertoire, Error>
where
    R: Rng + ?Sized,
{
    let total = check(repertoire, depth)?;

    let cumulative = repertoire
        .counts()
        .iter()
        .scan(0, |acc, &count| {
            *acc += count as usize;
            Some(*acc)
        })
        .collect::<Vec<_>>();

    let mut counts = vec![0usize; cumulative.len()];
    for draw in rand::seq::index::sample(rng, total, depth).iter() {
        counts[cumulative.partition_point(|&end| end <= draw)] += 1;
    }

    let (_, lineage_ids, donor_id, metadata) = repertoire.clone().into_parts();
    let (counts, lineage_ids): (Vec<f64>, Vec<String>) = counts
        .into_iter()
        .zip(lineage_ids)
        .filter(|&(count, _)| count > 0)
        .map(|(count, id)| (count as f64, id))
        .unzip();

    Ok(Repertoire::new(counts, lineage_ids)?
        .with_donor_id(donor_id)
        .with_metadata(metadata))
}

/// Subsamples a repertoire without replacement to the provided depth using a seeded generator.
///
/// If no seed is provided, the generator is seeded from system entropy.
///
/// See [`rarefy`].
pub fn rarefy_with_seed(
    repertoire: &Repertoire,
    depth: usize,
    seed: Option<u64>,
) -> Result<Repertoire, Error> {
    rarefy(repertoire, depth, &mut seeded_rng(seed))
}

/// Returns a generator seeded from the provided seed, or from system entropy if none is provided.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn check(repertoire: &Repertoire, depth: usize) -> Result<usize, Error> {
    if let Some((index, &count)) = repertoire
        .counts()
        .iter()
        .enumerate()
        .find(|(_, count)| count.fract() != 0.0)
    {
        return Err(Error::NonIntegralCount { index, count });
    }

    let total = repertoire.total_count() as usize;

    if depth == 0 {
        Err(Error::ZeroDepth)
    } else if depth > total {
        Err(Error::DepthExceedsTotal { depth, total })
    } else {
        Ok(total)
    }
}

impl Repertoire {
    /// Subsamples the repertoire without replacement to the provided depth.
    ///
    /// See [`rarefy`].
    pub fn rarefy<R>(&self, depth: usize, rng: &mut R) -> Result<Self, Error>
    where
        R: Rng + ?Sized,
    {
        rarefy(self, depth, rng)
    }
}

impl RepertoireCollection {
    /// Subsamples each repertoire in the collection without replacement to a common depth.
    ///
    /// If no depth is provided, the smallest total count in the collection is used.
    ///
    /// See [`rarefy`].
    pub fn rarefy<R>(&self, depth: Option<usize>, rng: &mut R) -> Result<Self, Error>
    where
        R: Rng + ?Sized,
    {
        let depth = match depth {
            Some(depth) => depth,
            None => self.min_total_count().unwrap_or(0.0) as usize,
        };

        self.iter().map(|r| rarefy(r, depth, rng)).collect()
    }
}

/// An error associated with rarefaction.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The rarefied repertoire could not be constructed.
    Construction(ConstructionError),
    /// The requested depth exceeds the total count.
    DepthExceedsTotal {
        /// Requested depth.
        depth: usize,
        /// Total count of the repertoire.
        total: usize,
    },
    /// A count is not an integer.
    NonIntegralCount {
        /// Index of the count in the repertoire.
        index: usize,
        /// The count.
        count: f64,
    },
    /// The requested depth is zero.
    ZeroDepth,
}

impl From<ConstructionError> for Error {
    fn from(e: ConstructionError) -> Self {
        Self::Construction(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Construction(e) => write!(f, "{e}"),
            Error::DepthExceedsTotal { depth, total } => write!(
                f,
                "rarefaction depth must not exceed total count \
                (found depth {depth} and total count {total})"
            ),
            Error::NonIntegralCount { index, count } => write!(
                f,
                "rarefaction requires integer counts (found count {count} at index {index})"
            ),
            Error::ZeroDepth => f.write_str("rarefaction depth must be positive"),
        }
    }
}

impl std::error::Error for Error {}
