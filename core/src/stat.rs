//! Diversity and clonality statistics.
//!
//! Functions taking frequencies expect them to sum to one (or be empty), and to be sorted in
//! descending order, as returned by [`Repertoire::frequencies`]. Each function returns a defined
//! value for empty input rather than failing.

use crate::Repertoire;

pub mod hill;
pub use hill::HillNumber;

/// Shannon entropy, H = -Σ pᵢ ln(pᵢ), skipping zero frequencies.
pub fn shannon_entropy(frequencies: &[f64]) -> f64 {
    -frequencies
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p * p.ln())
        .sum::<f64>()
}

/// Simpson index, D = Σ pᵢ².
pub fn simpson_index(frequencies: &[f64]) -> f64 {
    frequencies.iter().map(|p| p * p).sum()
}

/// Simpson diversity, 1 - D.
pub fn simpson_diversity(frequencies: &[f64]) -> f64 {
    1.0 - simpson_index(frequencies)
}

/// Inverse Simpson index, 1 / D, which is infinite when D is zero.
pub fn inverse_simpson(frequencies: &[f64]) -> f64 {
    let d = simpson_index(frequencies);

    if d > 0.0 {
        1.0 / d
    } else {
        f64::INFINITY
    }
}

/// Berger-Parker index, the largest frequency.
///
/// The frequencies must be sorted in descending order, since this reads the first frequency.
pub fn berger_parker(frequencies: &[f64]) -> f64 {
    frequencies.first().copied().unwrap_or(0.0)
}

/// Pielou's evenness, J = H / ln(S), where S is the number of lineages.
///
/// Zero with at most one lineage.
pub fn evenness(frequencies: &[f64]) -> f64 {
    evenness_from_entropy(shannon_entropy(frequencies), frequencies.len())
}

fn evenness_from_entropy(entropy: f64, richness: usize) -> f64 {
    if richness <= 1 {
        0.0
    } else {
        entropy / (richness as f64).ln()
    }
}

/// Clonality, 1 - J.
///
/// One with at most one lineage.
pub fn clonality(frequencies: &[f64]) -> f64 {
    clonality_from_entropy(shannon_entropy(frequencies), frequencies.len())
}

fn clonality_from_entropy(entropy: f64, richness: usize) -> f64 {
    if richness <= 1 {
        1.0
    } else {
        1.0 - evenness_from_entropy(entropy, richness)
    }
}

/// Gini coefficient of the frequencies.
///
/// With frequencies sorted in ascending order p₍₁₎ ≤ … ≤ p₍ₙ₎, this is
/// G = 2 Σ i p₍ᵢ₎ / (n Σ p) - (n + 1) / n. Zero with at most one lineage or zero total.
pub fn gini_coefficient(frequencies: &[f64]) -> f64 {
    let n = frequencies.len();
    let sum = frequencies.iter().sum::<f64>();

    if n <= 1 || sum == 0.0 {
        return 0.0;
    }

    let mut ascending = frequencies.to_vec();
    ascending.sort_by(f64::total_cmp);

    let weighted_sum = ascending
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1) as f64 * p)
        .sum::<f64>();

    let n = n as f64;
    2.0 * weighted_sum / (n * sum) - (n + 1.0) / n
}

/// D50, the smallest number of lineages that together account for at least half of all counts.
///
/// The counts must be sorted in descending order. Zero for empty counts or zero total.
pub fn d50(counts: &[f64]) -> usize {
    let total = counts.iter().sum::<f64>();

    if total == 0.0 {
        return 0;
    }

    let half = total / 2.0;
    let mut cumulative = 0.0;
    for (i, count) in counts.iter().enumerate() {
        cumulative += count;
        if cumulative >= half {
            return i + 1;
        }
    }

    counts.len()
}

/// Chao1 richness estimator.
///
/// With S observed lineages, f₁ singletons and f₂ doubletons, this is S + f₁² / (2 f₂) when there
/// are doubletons, the bias-corrected S + f₁ (f₁ - 1) / 2 when there are singletons but no
/// doubletons, and S otherwise. Counts are rounded to the nearest integer before singletons and
/// doubletons are counted.
pub fn chao1(counts: &[f64]) -> f64 {
    let observed = counts.len() as f64;

    let (f1, f2) = counts
        .iter()
        .map(|count| count.round())
        .fold((0.0, 0.0), |(f1, f2), count| {
            if count == 1.0 {
                (f1 + 1.0, f2)
            } else if count == 2.0 {
                (f1, f2 + 1.0)
            } else {
                (f1, f2)
            }
        });

    if f2 > 0.0 {
        observed + f1 * f1 / (2.0 * f2)
    } else if f1 > 0.0 {
        observed + f1 * (f1 - 1.0) / 2.0
    } else {
        observed
    }
}

impl Repertoire {
    /// Returns the Shannon entropy.
    ///
    /// See [`shannon_entropy`].
    pub fn shannon_entropy(&self) -> f64 {
        shannon_entropy(&self.frequencies())
    }

    /// Returns the Shannon diversity, the exponential of the Shannon entropy.
    pub fn shannon_diversity(&self) -> f64 {
        self.shannon_entropy().exp()
    }

    /// Returns the Simpson index.
    ///
    /// See [`simpson_index`].
    pub fn simpson_index(&self) -> f64 {
        simpson_index(&self.frequencies())
    }

    /// Returns the Simpson diversity.
    ///
    /// See [`simpson_diversity`].
    pub fn simpson_diversity(&self) -> f64 {
        simpson_diversity(&self.frequencies())
    }

    /// Returns the inverse Simpson index.
    ///
    /// See [`inverse_simpson`].
    pub fn inverse_simpson(&self) -> f64 {
        inverse_simpson(&self.frequencies())
    }

    /// Returns the Berger-Parker index.
    ///
    /// See [`berger_parker`].
    pub fn berger_parker(&self) -> f64 {
        berger_parker(&self.frequencies())
    }

    /// Returns Pielou's evenness, using the richness as number of lineages.
    ///
    /// See [`evenness`].
    pub fn evenness(&self) -> f64 {
        evenness_from_entropy(self.shannon_entropy(), self.richness())
    }

    /// Returns the clonality.
    ///
    /// See [`clonality`].
    pub fn clonality(&self) -> f64 {
        clonality_from_entropy(self.shannon_entropy(), self.richness())
    }

    /// Returns the Gini coefficient.
    ///
    /// See [`gini_coefficient`].
    pub fn gini_coefficient(&self) -> f64 {
        gini_coefficient(&self.frequencies())
    }

    /// Returns D50.
    ///
    /// See [`d50`].
    pub fn d50(&self) -> usize {
        d50(self.counts())
    }

    /// Returns the Chao1 richness estimate.
    ///
    /// See [`chao1`].
    pub fn chao1(&self) -> f64 {
        chao1(self.counts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repertoire(counts: &[f64]) -> Repertoire {
        Repertoire::from_counts(counts.iter().copied()).unwrap()
    }

    #[test]
    fn test_perfect_evenness() {
        for n in [2, 5, 17] {
            let r = repertoire(&vec![3.; n]);
            let ln_n = (n as f64).ln();

            assert_approx_eq!(r.shannon_entropy(), ln_n);
            assert_approx_eq!(r.simpson_index(), 1.0 / n as f64);
            assert_approx_eq!(r.clonality(), 0.0);
            assert_approx_eq!(r.evenness(), 1.0);
            assert_approx_eq!(r.gini_coefficient(), 0.0);
        }
    }

    #[test]
    fn test_single_lineage() {
        let r = repertoire(&[42.]);

        assert_eq!(r.shannon_entropy(), 0.0);
        assert_eq!(r.simpson_index(), 1.0);
        assert_eq!(r.clonality(), 1.0);
        assert_eq!(r.evenness(), 0.0);
        assert_eq!(r.d50(), 1);
        assert_eq!(r.gini_coefficient(), 0.0);
        assert_eq!(r.berger_parker(), 1.0);
    }

    #[test]
    fn test_empty() {
        let r = repertoire(&[]);

        assert_eq!(r.shannon_entropy(), 0.0);
        assert_eq!(r.simpson_index(), 0.0);
        assert_eq!(r.inverse_simpson(), f64::INFINITY);
        assert_eq!(r.berger_parker(), 0.0);
        assert_eq!(r.evenness(), 0.0);
        assert_eq!(r.clonality(), 1.0);
        assert_eq!(r.gini_coefficient(), 0.0);
        assert_eq!(r.d50(), 0);
        assert_eq!(r.chao1(), 0.0);
    }

    #[test]
    fn test_evenness_clonality_complement() {
        let r = repertoire(&[10., 4., 3., 1., 1.]);

        assert_approx_eq!(r.evenness() + r.clonality(), 1.0);
        assert!(r.clonality() > 0.0 && r.clonality() < 1.0);
    }

    #[test]
    fn test_shannon_entropy_skips_zeros() {
        assert_approx_eq!(shannon_entropy(&[0.5, 0.5, 0.0]), 2f64.ln());
    }

    #[test]
    fn test_simpson() {
        let r = repertoire(&[3., 1.]);

        assert_approx_eq!(r.simpson_index(), 0.625);
        assert_approx_eq!(r.simpson_diversity(), 0.375);
        assert_approx_eq!(r.inverse_simpson(), 1.6);
        assert_approx_eq!(r.berger_parker(), 0.75);
    }

    #[test]
    fn test_gini_uneven() {
        assert_approx_eq!(gini_coefficient(&[0.75, 0.25]), 0.25);
        assert_approx_eq!(gini_coefficient(&[0.25, 0.75]), 0.25);
        assert_approx_eq!(repertoire(&[1., 0., 0., 0.]).gini_coefficient(), 0.75);
    }

    #[test]
    fn test_d50() {
        assert_eq!(repertoire(&[50., 30., 10., 5., 5.]).d50(), 1);
        assert_eq!(repertoire(&[40., 30., 20., 10.]).d50(), 2);
        assert_eq!(repertoire(&[20., 20., 20., 20., 20.]).d50(), 3);
    }

    #[test]
    fn test_chao1_no_rare_lineages() {
        let r = repertoire(&[100., 50., 30.]);

        assert_eq!(r.chao1(), 3.0);
        assert_eq!(r.chao1(), r.richness() as f64);
    }

    #[test]
    fn test_chao1_singletons_and_doubletons() {
        assert_eq!(repertoire(&[100., 50., 2., 2., 1., 1., 1.]).chao1(), 9.25);
    }

    #[test]
    fn test_chao1_singletons_only() {
        // f1 = 3, f2 = 0
        assert_eq!(repertoire(&[10., 1., 1., 1.]).chao1(), 7.0);
    }

    #[test]
    fn test_chao1_rounds_counts() {
        assert_eq!(
            chao1(&[100.2, 1.9, 2.1, 0.6, 1.4]),
            chao1(&[100., 2., 2., 1., 1.])
        );
    }
}
