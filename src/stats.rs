//! Summary statistics derived from an exact [`Distribution`].

use std::collections::BTreeMap;

use crate::dist::Distribution;

/// Statistics of a completed distribution: its range, total number of combinations, the likelihood of every outcome,
/// the expected value and the most likely outcome.
///
/// # Examples
/// ```
/// use dicestats::{dist::Distribute, DiceStatistics, Expr};
///
/// let expr: Expr = "2d6".parse()?;
/// let stats = DiceStatistics::from_distribution(expr.distribution()?)?;
/// assert_eq!((stats.min_value, stats.max_value), (2, 12));
/// assert_eq!(stats.total, 36.0);
/// assert_eq!(stats.most_common, 7);
/// assert!((stats.average - 7.0).abs() < 1e-9);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct DiceStatistics {
	/// Lowest possible outcome
	pub min_value: i64,

	/// Highest possible outcome
	pub max_value: i64,

	/// Distribution the statistics were derived from
	pub results: Distribution,

	/// Total weight across every outcome (the number of combinations, unless the distribution was rescaled)
	pub total: f64,

	/// Likelihood of each outcome, as a percentage from 0 to 100
	pub percentages: BTreeMap<i64, f64>,

	/// Expected value
	pub average: f64,

	/// Most likely outcome (the lowest one when several are equally likely)
	pub most_common: i64,
}

impl DiceStatistics {
	/// Derives the statistics of a distribution.
	///
	/// # Errors
	/// If the distribution has no outcomes, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicestats::{stats::Error, DiceStatistics, Distribution};
	///
	/// let dist: Distribution = [(3, 5.0), (5, 5.0)].into_iter().collect();
	/// let stats = DiceStatistics::from_distribution(dist)?;
	/// assert_eq!(stats.most_common, 3);
	/// assert_eq!(stats.percentages[&5], 50.0);
	///
	/// let empty = DiceStatistics::from_distribution(Distribution::default());
	/// assert!(matches!(empty, Err(Error::EmptyDistribution)));
	/// # Ok::<(), Error>(())
	/// ```
	#[expect(clippy::cast_precision_loss, reason = "Percentages and averages are inherently approximate")]
	pub fn from_distribution(results: Distribution) -> Result<Self, Error> {
		let (Some(min_value), Some(max_value)) = (results.min(), results.max()) else {
			return Err(Error::EmptyDistribution);
		};

		let total = results.total();

		let percentages = results
			.iter()
			.map(|(outcome, weight)| (outcome, weight / total * 100.0))
			.collect();
		let average: f64 = results
			.iter()
			.map(|(outcome, weight)| outcome as f64 * (weight / total))
			.sum();

		// Iteration is in ascending order and only a strictly greater weight replaces the current pick
		let mut most_common = (min_value, 0.0);
		for (outcome, weight) in results.iter() {
			if weight > most_common.1 {
				most_common = (outcome, weight);
			}
		}

		Ok(Self {
			min_value,
			max_value,
			results,
			total,
			percentages,
			average,
			most_common: most_common.0,
		})
	}

	/// Gets every outcome along with its percentage, in ascending order of outcome.
	#[must_use]
	pub fn sorted_percentages(&self) -> Vec<(i64, f64)> {
		self.percentages.iter().map(|(&outcome, &pct)| (outcome, pct)).collect()
	}

	/// Gets every possible outcome in ascending order.
	#[must_use]
	pub fn sorted_outcomes(&self) -> Vec<i64> {
		self.results.outcomes().collect()
	}

	/// Gets the percentage of the most likely outcome.
	#[must_use]
	pub fn max_percentage(&self) -> f64 {
		self.percentages.values().copied().fold(0.0, f64::max)
	}

	/// Gets the percentage of a specific outcome (zero if it isn't possible).
	#[must_use]
	pub fn percentage(&self, outcome: i64) -> f64 {
		self.percentages.get(&outcome).copied().unwrap_or_default()
	}
}

impl TryFrom<Distribution> for DiceStatistics {
	type Error = Error;

	fn try_from(dist: Distribution) -> Result<Self, Self::Error> {
		Self::from_distribution(dist)
	}
}

/// Error that can occur while deriving [`DiceStatistics`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// The distribution has no outcomes, such as when every combination divides by zero.
	#[error("distribution has no outcomes")]
	EmptyDistribution,
}
