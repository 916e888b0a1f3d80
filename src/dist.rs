//! Exact probability distributions of dice and full dice expressions, computed without any sampling.
//!
//! Every sub-expression becomes a [`Distribution`]: a mapping from each possible integer outcome to its weight, the
//! number of equally likely die-face combinations that produce it. Child distributions are combined pairwise (see
//! [`Distribution::combine()`]), so a set of dice is built up one die at a time instead of enumerating every
//! combination of faces.
//!
//! Weights are [`f64`], so they're exact integers as long as the total number of combinations stays below 2^53 and
//! relative beyond that. Once the total would grow past [`RESCALE_THRESHOLD`], weights are divided by their total so
//! that only their proportions are kept.

use std::collections::{btree_map, BTreeMap};

use tracing::{debug, trace};

use crate::{
	dice::{Dice, Error as DiceError, Modifier},
	expr::Expr,
};

/// Total weight above which a distribution's weights are rescaled to proportions
pub const RESCALE_THRESHOLD: f64 = 1e280;

/// Exact distribution of the outcomes of a dice expression.
///
/// Outcomes are kept in ascending order. Every weight is positive, and the sum of all weights is the number of equally
/// likely combinations of die faces the distribution was built from (minus any combinations that produced no outcome,
/// such as a division by zero), unless it had to be rescaled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Distribution {
	/// Weight of each outcome
	counts: BTreeMap<i64, f64>,
}

impl Distribution {
	/// Creates a distribution with a single certain outcome.
	///
	/// # Examples
	/// ```
	/// use dicestats::Distribution;
	///
	/// let dist = Distribution::constant(5);
	/// assert_eq!(dist.iter().collect::<Vec<_>>(), vec![(5, 1.0)]);
	/// ```
	#[must_use]
	pub fn constant(value: i64) -> Self {
		Self {
			counts: BTreeMap::from([(value, 1.0)]),
		}
	}

	/// Creates the distribution of a single die with the given number of sides, where every face from 1 to `sides` is
	/// equally likely. A die without sides has an empty distribution.
	///
	/// # Examples
	/// ```
	/// use dicestats::Distribution;
	///
	/// let dist = Distribution::uniform(4);
	/// assert_eq!(dist.iter().collect::<Vec<_>>(), vec![(1, 1.0), (2, 1.0), (3, 1.0), (4, 1.0)]);
	/// ```
	#[must_use]
	pub fn uniform(sides: u32) -> Self {
		(1..=i64::from(sides)).map(|face| (face, 1.0)).collect()
	}

	/// Combines two independent distributions into a new one by applying `op` to every pair of outcomes. The weight of
	/// each resulting outcome is the sum of the products of the weights of every pair that produced it. Pairs for which
	/// `op` returns `Ok(None)` are left out of the result entirely.
	///
	/// When the product of both totals would exceed [`RESCALE_THRESHOLD`], both inputs are treated as proportions of
	/// their totals instead.
	///
	/// # Errors
	/// If `op` fails, an error is returned.
	///
	/// # Examples
	/// ```
	/// use dicestats::{dist::Overflow, Distribution};
	///
	/// let d6 = Distribution::uniform(6);
	/// let sum = d6.combine(&d6, |a, b| a.checked_add(b).map(Some).ok_or(Overflow))?;
	/// assert_eq!(sum.count(7), 6.0);
	/// assert_eq!(sum.total(), 36.0);
	/// # Ok::<(), Overflow>(())
	/// ```
	pub fn combine<F>(&self, other: &Self, op: F) -> Result<Self, Overflow>
	where
		F: Fn(i64, i64) -> Result<Option<i64>, Overflow>,
	{
		let (total_a, total_b) = (self.total(), other.total());
		let (scale_a, scale_b) = if total_a * total_b > RESCALE_THRESHOLD {
			(total_a, total_b)
		} else {
			(1.0, 1.0)
		};

		let mut counts = BTreeMap::new();
		for (&a, &weight_a) in &self.counts {
			for (&b, &weight_b) in &other.counts {
				let Some(outcome) = op(a, b)? else {
					continue;
				};

				*counts.entry(outcome).or_insert(0.0) += weight_a / scale_a * (weight_b / scale_b);
			}
		}
		counts.retain(|_, weight| *weight > 0.0);

		Ok(Self { counts })
	}

	/// Creates a new distribution with every outcome negated and the weights unchanged.
	///
	/// # Errors
	/// If an outcome is [`i64::MIN`], it can't be negated and an error is returned.
	pub fn negate(&self) -> Result<Self, Overflow> {
		let counts = self
			.counts
			.iter()
			.map(|(&outcome, &weight)| outcome.checked_neg().map(|neg| (neg, weight)).ok_or(Overflow))
			.collect::<Result<_, Overflow>>()?;
		Ok(Self { counts })
	}

	/// Calculates the total weight of the distribution (the number of combinations, unless it was rescaled).
	#[must_use]
	pub fn total(&self) -> f64 {
		self.counts.values().sum()
	}

	/// Gets the weight of an outcome (zero if it isn't possible).
	#[must_use]
	pub fn count(&self, outcome: i64) -> f64 {
		self.counts.get(&outcome).copied().unwrap_or_default()
	}

	/// Gets the probability of an outcome, from 0 to 1.
	#[must_use]
	pub fn probability(&self, outcome: i64) -> f64 {
		let total = self.total();
		if total > 0.0 {
			self.count(outcome) / total
		} else {
			0.0
		}
	}

	/// Iterates over every outcome and its weight, in ascending order of outcome.
	pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
		self.counts.iter().map(|(&outcome, &weight)| (outcome, weight))
	}

	/// Iterates over every possible outcome in ascending order.
	pub fn outcomes(&self) -> impl Iterator<Item = i64> + '_ {
		self.counts.keys().copied()
	}

	/// Gets the lowest possible outcome, if any.
	#[must_use]
	pub fn min(&self) -> Option<i64> {
		self.counts.first_key_value().map(|(&outcome, _)| outcome)
	}

	/// Gets the highest possible outcome, if any.
	#[must_use]
	pub fn max(&self) -> Option<i64> {
		self.counts.last_key_value().map(|(&outcome, _)| outcome)
	}

	/// Gets the number of distinct outcomes.
	#[must_use]
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	/// Checks whether the distribution has no outcomes at all.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}
}

impl FromIterator<(i64, f64)> for Distribution {
	/// Builds a distribution from outcome/weight pairs. Weights for repeated outcomes are added together, and weights
	/// that aren't positive are ignored.
	///
	/// # Examples
	/// ```
	/// use dicestats::Distribution;
	///
	/// let dist: Distribution = [(3, 2.0), (1, 0.0), (3, 3.0), (5, 5.0)].into_iter().collect();
	/// assert_eq!(dist.iter().collect::<Vec<_>>(), vec![(3, 5.0), (5, 5.0)]);
	/// ```
	fn from_iter<T: IntoIterator<Item = (i64, f64)>>(iter: T) -> Self {
		let mut counts = BTreeMap::new();
		for (outcome, weight) in iter.into_iter().filter(|&(_, weight)| weight > 0.0) {
			*counts.entry(outcome).or_insert(0.0) += weight;
		}
		Self { counts }
	}
}

impl<'a> IntoIterator for &'a Distribution {
	type Item = (&'a i64, &'a f64);
	type IntoIter = btree_map::Iter<'a, i64, f64>;

	fn into_iter(self) -> Self::IntoIter {
		self.counts.iter()
	}
}

/// Trait for anything with an exact distribution of outcomes
pub trait Distribute {
	/// Computes the exact distribution of outcomes.
	///
	/// # Errors
	/// If the value can't be rolled or its distribution can't be represented, an error variant is returned.
	fn distribution(&self) -> Result<Distribution, Error>;
}

impl Distribute for Dice {
	/// Computes the distribution of the dice. Without a modifier, the sum is built up one die at a time, each step
	/// sliding a window of `sides` weights over the previous one. With [`Modifier::KeepHigh`], the weight of `v` is
	/// `v^count - (v - 1)^count`, the number of combinations whose highest die is exactly `v` ([`Modifier::KeepLow`]
	/// mirrors it).
	///
	/// # Examples
	/// ```
	/// use dicestats::{dist::Distribute, Dice};
	///
	/// let dist = Dice::builder().count(2).sides(20).keep_high().build().distribution()?;
	/// assert_eq!(dist.total(), 400.0);
	/// assert_eq!(dist.count(1), 1.0);
	/// assert_eq!(dist.count(20), 39.0);
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	fn distribution(&self) -> Result<Distribution, Error> {
		self.validate().map_err(|err| Error::Dice(self.clone(), err))?;

		let dist: Distribution = match self.modifier {
			None => {
				// Outcomes run from `count` to `count * sides`, which must fit
				i64::from(self.count)
					.checked_mul(i64::from(self.sides))
					.ok_or_else(|| Error::DiceOverflow(self.clone()))?;
				let sides = usize::try_from(self.sides).map_err(|_err| Error::DiceOverflow(self.clone()))?;
				(i64::from(self.count)..).zip(sum_weights(self.count, sides)).collect()
			}
			Some(modifier) => extreme_weights(self.count, self.sides, modifier).collect(),
		};

		debug!(dice = %self, outcomes = dist.len(), "computed dice distribution");
		Ok(dist)
	}
}

/// Builds the weights of the sum of `count` dice with `sides` sides each, from the lowest sum up.
///
/// Each step slides a window of `sides` weights over the previous ones. The weights of a sum of dice are symmetric and
/// rise to a single peak, so only the lower half is summed and the upper half mirrors it.
fn sum_weights(count: u32, sides: usize) -> Vec<f64> {
	let mut weights = vec![1.0; sides];

	for _ in 1..count {
		let len = weights.len() + sides - 1;
		let mut window = 0.0;
		let half = (0..len.div_ceil(2))
			.map(|i| {
				window += weights.get(i).copied().unwrap_or_default();
				if let Some(old) = i.checked_sub(sides) {
					window -= weights.get(old).copied().unwrap_or_default();
				}
				window
			})
			.collect::<Vec<f64>>();
		weights = half.iter().chain(half.iter().rev().skip(len % 2)).copied().collect();

		let total: f64 = weights.iter().sum();
		if total > RESCALE_THRESHOLD {
			trace!(count, sides, "rescaling dice weights");
			for weight in &mut weights {
				*weight /= total;
			}
		}
	}

	weights
}

/// Builds the weight of every face when only the highest or lowest of `count` dice is kept.
fn extreme_weights(count: u32, sides: u32, modifier: Modifier) -> impl Iterator<Item = (i64, f64)> {
	let exp = f64::from(count);
	let scale = if f64::from(sides).powf(exp) > RESCALE_THRESHOLD {
		f64::from(sides)
	} else {
		1.0
	};

	// Number of combinations (or proportion, once scaled) where every die is at most `face`
	let at_most = move |face: u32| (f64::from(face) / scale).powf(exp);

	(1..=sides).map(move |face| {
		let kept = match modifier {
			Modifier::KeepHigh => face,
			Modifier::KeepLow => sides - face + 1,
		};
		(i64::from(face), at_most(kept) - at_most(kept - 1))
	})
}

impl Distribute for Expr {
	/// Computes the distribution of the whole expression, treating every dice term as an independent random variable.
	///
	/// Numbers are truncated toward zero, division truncates and leaves out every combination with a zero divisor,
	/// and a negative exponent truncates the real result toward zero (see [`power()`]).
	///
	/// # Examples
	/// ```
	/// use dicestats::{dist::Distribute, Expr};
	///
	/// let expr: Expr = "1d6 / 2".parse()?;
	/// let dist = expr.distribution()?;
	/// assert_eq!(dist.iter().collect::<Vec<_>>(), vec![(0, 1.0), (1, 2.0), (2, 2.0), (3, 1.0)]);
	///
	/// let expr: Expr = "1d4 / (1d2 - 1)".parse()?;
	/// assert_eq!(expr.distribution()?.total(), 4.0);
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	fn distribution(&self) -> Result<Distribution, Error> {
		let dist = match self {
			Self::Num(x) => Distribution::constant(truncate(*x).ok_or_else(|| Error::Overflow(self.clone()))?),
			Self::Dice(dice, _) => dice.distribution()?,

			Self::Neg(x) => x
				.distribution()?
				.negate()
				.map_err(|_err| Error::Overflow(self.clone()))?,

			Self::Add(a, b) => combine_operands(self, a, b, checked(i64::checked_add))?,
			Self::Sub(a, b) => combine_operands(self, a, b, checked(i64::checked_sub))?,
			Self::Mul(a, b) => combine_operands(self, a, b, checked(i64::checked_mul))?,
			Self::Div(a, b) => combine_operands(self, a, b, |x, y| {
				if y == 0 {
					Ok(None)
				} else {
					x.checked_div(y).map(Some).ok_or(Overflow)
				}
			})?,
			Self::Pow(a, b) => combine_operands(self, a, b, power)?,
		};

		trace!(expr = %self, outcomes = dist.len(), "computed expression distribution");
		Ok(dist)
	}
}

/// Raises `base` to the power of `exp`, truncating the result toward zero.
///
/// A negative exponent results in `1` for a base of `1`, `1` or `-1` (by parity) for a base of `-1`, no outcome at all
/// for a base of `0` (the same as division by zero), and `0` for any other base.
///
/// # Errors
/// If the result doesn't fit in an [`i64`], an error is returned.
///
/// # Examples
/// ```
/// use dicestats::dist::power;
///
/// assert_eq!(power(2, 10)?, Some(1024));
/// assert_eq!(power(-1, -3)?, Some(-1));
/// assert_eq!(power(2, -1)?, Some(0));
/// assert_eq!(power(0, -1)?, None);
/// assert!(power(2, 64).is_err());
/// # Ok::<(), dicestats::dist::Overflow>(())
/// ```
pub fn power(base: i64, exp: i64) -> Result<Option<i64>, Overflow> {
	let odd = exp.rem_euclid(2) == 1;
	if exp < 0 {
		return Ok(match base {
			0 => None,
			1 => Some(1),
			-1 => Some(if odd { -1 } else { 1 }),
			_ => Some(0),
		});
	}

	match u32::try_from(exp) {
		Ok(exp) => base.checked_pow(exp).map(Some).ok_or(Overflow),
		Err(_) => match base {
			0 | 1 => Ok(Some(base)),
			-1 => Ok(Some(if odd { -1 } else { 1 })),
			_ => Err(Overflow),
		},
	}
}

/// Computes the distributions of both operands of a binary expression and combines them with `op`.
fn combine_operands<F>(expr: &Expr, a: &Expr, b: &Expr, op: F) -> Result<Distribution, Error>
where
	F: Fn(i64, i64) -> Result<Option<i64>, Overflow>,
{
	a.distribution()?
		.combine(&b.distribution()?, op)
		.map_err(|_err| Error::Overflow(expr.clone()))
}

/// Adapts a checked integer operation for use with [`Distribution::combine()`].
fn checked(op: fn(i64, i64) -> Option<i64>) -> impl Fn(i64, i64) -> Result<Option<i64>, Overflow> {
	move |a, b| op(a, b).map(Some).ok_or(Overflow)
}

/// Truncates a number toward zero, if it's finite and fits in an [`i64`].
#[expect(
	clippy::cast_possible_truncation,
	clippy::cast_precision_loss,
	reason = "Range is checked before casting"
)]
fn truncate(x: f64) -> Option<i64> {
	let x = x.trunc();
	(x.is_finite() && x >= i64::MIN as f64 && x < i64::MAX as f64).then_some(x as i64)
}

/// Integer overflow while combining distributions
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("integer overflow")]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Overflow;

/// Error that can occur while computing a [`Distribution`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// An outcome of the expression's distribution doesn't fit its integer type.
	#[error("integer overflow while computing the distribution of {0}")]
	Overflow(Expr),

	/// An outcome of the dice's distribution doesn't fit its integer type.
	#[error("integer overflow while computing the distribution of {0}")]
	DiceOverflow(Dice),

	/// The dice can't be rolled.
	#[error("dice error while computing the distribution of {0}: {1}")]
	Dice(Dice, #[source] DiceError),
}
