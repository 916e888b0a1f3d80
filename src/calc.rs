//! High-level entry points that take dice expression text all the way to a rolled [`Calculation`], an exact
//! [`Distribution`], or [`DiceStatistics`].

use std::fmt;

use tracing::{debug, trace};

#[cfg(feature = "fastrand")]
use crate::dice::roller::FastRand as FastRandRoller;
use crate::{
	dice::{Dice, Roller},
	dist::{self, Distribute, Distribution},
	expr::{CalcError, Describe, EvalError, Evaled, Expr},
	parse,
	stats::{self, DiceStatistics},
};

/// Bounds on the dice any single term of an expression may contain, checked before anything is rolled or computed.
///
/// # Examples
/// ```
/// use dicestats::{Calculator, Error, Limits};
///
/// let calc = Calculator::default().with_limits(Limits { max_count: 10, max_sides: 20 });
/// assert!(calc.distribution("10d20").is_ok());
/// assert!(matches!(calc.distribution("11d20"), Err(Error::LimitExceeded { .. })));
/// assert!(matches!(calc.distribution("1d21"), Err(Error::LimitExceeded { .. })));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Limits {
	/// Maximum number of dice in a single term
	pub max_count: u32,

	/// Maximum number of sides per die
	pub max_sides: u32,
}

impl Limits {
	/// Default limits: 100 dice of up to 1000 sides per term.
	pub const DEFAULT: Self = Self {
		max_count: 100,
		max_sides: 1000,
	};

	/// Creates limits that allow any dice at all.
	#[must_use]
	pub const fn unbounded() -> Self {
		Self {
			max_count: u32::MAX,
			max_sides: u32::MAX,
		}
	}

	/// Ensures every set of dice in an expression is within the limits.
	///
	/// # Errors
	/// If any dice have too many dice or too many sides, [`Error::LimitExceeded`] is returned for the first of them.
	pub fn check(&self, expr: &Expr) -> Result<(), Error> {
		match expr
			.dice_terms()
			.into_iter()
			.find(|dice| dice.count > self.max_count || dice.sides > self.max_sides)
		{
			Some(dice) => Err(Error::LimitExceeded {
				dice: dice.clone(),
				limits: *self,
			}),
			None => Ok(()),
		}
	}
}

impl Default for Limits {
	#[inline]
	fn default() -> Self {
		Self::DEFAULT
	}
}

impl fmt::Display for Limits {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} dice of up to {} sides", self.max_count, self.max_sides)
	}
}

/// Result of rolling a dice expression
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Calculation {
	/// Expression text that was rolled (trimmed of surrounding whitespace)
	pub expression: String,

	/// Expression text with every dice term replaced by what was rolled for it, such as `(3d6: 4, 1, 6) + 5`
	pub breakdown: String,

	/// Final result of the expression
	pub result: f64,
}

impl fmt::Display for Calculation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} = {}", self.breakdown, self.result)
	}
}

/// Rolls and analyzes dice expressions using a specific [`Roller`] within a set of [`Limits`].
///
/// # Examples
/// ```
/// use dicestats::{dice::roller::Iter as IterRoller, Calculator};
///
/// let mut calc = Calculator::new(IterRoller::new([4, 1, 6]));
/// let calculation = calc.calculate("3d6 + 5")?;
/// assert_eq!(calculation.result, 16.0);
/// assert_eq!(calculation.breakdown, "(3d6: 4, 1, 6) + 5");
///
/// let stats = calc.statistics("3d6 + 5")?;
/// assert_eq!((stats.min_value, stats.max_value), (8, 23));
/// # Ok::<(), dicestats::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Calculator<R: Roller> {
	/// Roller used for every dice term
	roller: R,

	/// Bounds on the dice terms
	limits: Limits,
}

impl<R: Roller> Calculator<R> {
	/// Creates a calculator that rolls with the given roller and has the default limits.
	#[must_use]
	pub const fn new(roller: R) -> Self {
		Self {
			roller,
			limits: Limits::DEFAULT,
		}
	}

	/// Replaces the calculator's limits.
	#[must_use]
	pub fn with_limits(mut self, limits: Limits) -> Self {
		self.limits = limits;
		self
	}

	/// Gets the calculator's limits.
	#[must_use]
	pub const fn limits(&self) -> Limits {
		self.limits
	}

	/// Gets mutable access to the calculator's roller.
	pub fn roller_mut(&mut self) -> &mut R {
		&mut self.roller
	}

	/// Parses an expression and checks it against the calculator's limits.
	///
	/// # Errors
	/// If the input isn't a valid expression or it exceeds the limits, an error variant is returned.
	pub fn parse(&self, input: &str) -> Result<Expr, Error> {
		parse_within(input.trim(), self.limits)
	}

	/// Rolls an expression, producing its result along with a breakdown of every roll that was made.
	///
	/// # Errors
	/// If the input isn't a valid expression, exceeds the limits, or divides by zero, an error variant is returned.
	pub fn calculate(&mut self, input: &str) -> Result<Calculation, Error> {
		let input = input.trim();
		let expr = parse_within(input, self.limits)?;
		let evaled = expr.eval(&mut self.roller)?;
		let result = evaled.calc()?;
		let breakdown = breakdown(input, &evaled);

		debug!(input, %breakdown, result, "rolled expression");
		Ok(Calculation {
			expression: input.to_owned(),
			breakdown,
			result,
		})
	}

	/// Computes the exact distribution of an expression. Nothing is rolled.
	///
	/// # Errors
	/// If the input isn't a valid expression, exceeds the limits, or its distribution can't be represented, an error
	/// variant is returned.
	pub fn distribution(&self, input: &str) -> Result<Distribution, Error> {
		distribution_within(input.trim(), self.limits)
	}

	/// Computes the statistics of the exact distribution of an expression. Nothing is rolled.
	///
	/// # Errors
	/// In addition to the errors of [`Self::distribution()`], if the distribution has no outcomes at all (such as for
	/// `1/0`), an error variant is returned.
	pub fn statistics(&self, input: &str) -> Result<DiceStatistics, Error> {
		statistics_within(input.trim(), self.limits)
	}
}

#[cfg(feature = "fastrand")]
impl Default for Calculator<FastRandRoller> {
	/// Creates a calculator with a [`FastRandRoller`] and the default limits.
	fn default() -> Self {
		Self::new(FastRandRoller::default())
	}
}

/// Rolls an expression with a [`FastRandRoller`] and the default limits. Requires the `fastrand` feature (enabled by
/// default).
///
/// # Errors
/// See [`Calculator::calculate()`].
///
/// # Examples
/// ```
/// let calculation = dicestats::calculate("2d20H + 3")?;
/// assert!((4.0..=23.0).contains(&calculation.result));
/// assert!(calculation.breakdown.starts_with("(2d20: "));
/// # Ok::<(), dicestats::Error>(())
/// ```
#[cfg(feature = "fastrand")]
pub fn calculate(input: &str) -> Result<Calculation, Error> {
	Calculator::default().calculate(input)
}

/// Computes the exact distribution of an expression with the default limits.
///
/// # Errors
/// See [`Calculator::distribution()`].
///
/// # Examples
/// ```
/// let dist = dicestats::distribution("2d6")?;
/// assert_eq!(dist.count(7), 6.0);
/// assert_eq!(dist.total(), 36.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn distribution(input: &str) -> Result<Distribution, Error> {
	distribution_within(input.trim(), Limits::DEFAULT)
}

/// Computes the statistics of the exact distribution of an expression with the default limits.
///
/// # Errors
/// See [`Calculator::statistics()`].
///
/// # Examples
/// ```
/// let stats = dicestats::statistics("1d6")?;
/// assert_eq!(stats.total, 6.0);
/// assert!((stats.average - 3.5).abs() < 1e-9);
/// assert!(dicestats::statistics("1/0").is_err());
/// # Ok::<(), dicestats::Error>(())
/// ```
pub fn statistics(input: &str) -> Result<DiceStatistics, Error> {
	statistics_within(input.trim(), Limits::DEFAULT)
}

/// Parses already-trimmed input and checks it against the limits.
fn parse_within(input: &str, limits: Limits) -> Result<Expr, Error> {
	let expr: Expr = input.parse()?;
	limits.check(&expr)?;
	trace!(input, %expr, "parsed expression");
	Ok(expr)
}

/// Computes the distribution of already-trimmed input within the limits.
fn distribution_within(input: &str, limits: Limits) -> Result<Distribution, Error> {
	let dist = parse_within(input, limits)?.distribution()?;
	debug!(input, outcomes = dist.len(), "computed distribution");
	Ok(dist)
}

/// Computes the statistics of already-trimmed input within the limits.
fn statistics_within(input: &str, limits: Limits) -> Result<DiceStatistics, Error> {
	let stats = DiceStatistics::from_distribution(distribution_within(input, limits)?)?;
	debug!(
		input,
		min = stats.min_value,
		max = stats.max_value,
		average = stats.average,
		"computed statistics"
	);
	Ok(stats)
}

/// Builds the breakdown of an evaluated expression by replacing the text of every dice term in the input it was parsed
/// from with the description of its rolls. Replacements go from the end of the input backward so that the spans of
/// earlier terms stay accurate.
fn breakdown(input: &str, evaled: &Evaled) -> String {
	let mut text = input.to_owned();
	for (rolled, span) in evaled.rolls().into_iter().rev() {
		if text.is_char_boundary(span.start) && text.is_char_boundary(span.end) {
			text.replace_range(span.clone(), &rolled.describe(None));
		}
	}
	text
}

/// Error that can occur anywhere between receiving expression text and producing a result
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The input isn't a valid dice expression.
	#[error(transparent)]
	Format(#[from] parse::Error),

	/// A set of dice in the expression couldn't be rolled.
	#[error(transparent)]
	Eval(#[from] EvalError),

	/// The rolled expression couldn't be calculated, such as when dividing by zero.
	#[error(transparent)]
	Arithmetic(#[from] CalcError),

	/// The distribution of the expression couldn't be computed.
	#[error(transparent)]
	Distribution(#[from] dist::Error),

	/// Statistics couldn't be derived from the distribution.
	#[error(transparent)]
	Statistics(#[from] stats::Error),

	/// A set of dice in the expression exceeds the limits.
	#[error("{dice} exceeds the limit of {limits}")]
	LimitExceeded {
		/// Dice that exceeded the limits
		dice: Dice,

		/// Limits that were exceeded
		limits: Limits,
	},
}
