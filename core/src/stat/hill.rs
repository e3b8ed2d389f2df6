//! Hill numbers.

use crate::Repertoire;

const ORDER_TOLERANCE: f64 = 1e-10;

/// A Hill number, or effective number of lineages, of some order.
///
/// Order zero is the richness, order one is the exponential of the Shannon entropy, order two is
/// the inverse Simpson index, and the infinite order is the inverse of the Berger-Parker index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HillNumber {
    /// The order q.
    pub order: f64,
    /// The Hill number.
    pub value: f64,
    /// Richness of the repertoire the number was computed from.
    pub richness: usize,
    /// Total count of the repertoire the number was computed from.
    pub total_count: f64,
}

impl HillNumber {
    /// Orders of a default Hill profile.
    pub const DEFAULT_ORDERS: [f64; 4] = [0., 1., 2., f64::INFINITY];

    /// Returns the Hill number of the provided order for a repertoire.
    pub fn from_repertoire(repertoire: &Repertoire, order: f64) -> Self {
        Self::from_frequencies_with_context(repertoire, &repertoire.frequencies(), order)
    }

    fn from_frequencies_with_context(
        repertoire: &Repertoire,
        frequencies: &[f64],
        order: f64,
    ) -> Self {
        Self {
            order,
            value: hill_number(frequencies, order),
            richness: repertoire.richness(),
            total_count: repertoire.total_count(),
        }
    }
}

/// Returns the Hill number of order q of the frequencies, D = (Σ pᵢ^q)^(1 / (1 - q)).
///
/// Only positive frequencies contribute. Orders within a small tolerance of zero and one are
/// treated as exactly zero and one, and infinite order gives the inverse of the largest frequency.
/// Zero for empty frequencies.
pub fn hill_number(frequencies: &[f64], order: f64) -> f64 {
    let positive = frequencies.iter().copied().filter(|&p| p > 0.0);

    if frequencies.is_empty() {
        0.0
    } else if order.abs() < ORDER_TOLERANCE {
        positive.count() as f64
    } else if (order - 1.0).abs() < ORDER_TOLERANCE {
        let entropy = -positive.map(|p| p * p.ln()).sum::<f64>();
        entropy.exp()
    } else if order == f64::INFINITY {
        let max = positive.fold(0.0, f64::max);
        if max > 0.0 {
            1.0 / max
        } else {
            0.0
        }
    } else {
        positive
            .map(|p| p.powf(order))
            .sum::<f64>()
            .powf(1.0 / (1.0 - order))
    }
}

/// Returns the Hill numbers of a repertoire for each of the provided orders.
pub fn hill_numbers(repertoire: &Repertoire, orders: &[f64]) -> Vec<HillNumber> {
    let frequencies = repertoire.frequencies();

    orders
        .iter()
        .map(|&order| HillNumber::from_frequencies_with_context(repertoire, &frequencies, order))
        .collect()
}

impl Repertoire {
    /// Returns the Hill number of the provided order.
    ///
    /// See [`hill_number`].
    pub fn hill_number(&self, order: f64) -> HillNumber {
        HillNumber::from_repertoire(self, order)
    }
}
