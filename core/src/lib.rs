#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Diversity and clonality statistics for immune repertoires.
//!
//! This serves as the core library implementation for the `repstat` CLI, but can also be used as
//! a free-standing library for working with clonal count distributions.
//!
//! # Overview
//!
//! The core struct is a [`Repertoire`], which holds the counts of each lineage (clone) in a
//! sample, sorted in descending order. Repertoires can be built directly from counts, or
//! aggregated from a rearrangement [`table`] using a [`LineageKey`].
//!
//! Statistics are available as methods on the repertoire, or can be combined into a
//! [`MetricSet`] and computed together into named [`Metrics`].
//!
//! # Example
//!
//! As a very brief introduction to the API, let's create a repertoire from counts, and then
//! compute its clonality along with a few other metrics.
//!
//! ```
//! use repstat_core::{Metric, Repertoire};
//!
//! // Create a repertoire of four lineages
//! let repertoire = Repertoire::from_counts([5., 5., 5., 5.])?;
//!
//! // A perfectly even repertoire has zero clonality
//! assert!(repertoire.clonality().abs() < 1e-12);
//!
//! // Compute richness and D50 together
//! let metrics = repertoire.compute_metrics(&(Metric::Richness + Metric::D50))?;
//! assert_eq!(metrics.get("richness"), Some(4.));
//! assert_eq!(metrics.get("d50"), Some(2.));
//! assert_eq!(metrics.get("chao1"), None);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(test)]
#[macro_use]
pub(crate) mod approx;

pub mod input;
pub use input::Input;

pub mod length;
pub use length::LengthStats;

pub mod metric;
pub use metric::{compute_metrics, Metric, MetricSet, Metrics, MetricsTable};

pub mod rarefy;
pub use rarefy::{rarefy, rarefy_with_seed};

pub mod repertoire;
pub use repertoire::{LineageKey, Repertoire, RepertoireCollection};

pub mod stat;
pub use stat::{hill::hill_numbers, HillNumber};

pub mod table;
pub use table::Table;
