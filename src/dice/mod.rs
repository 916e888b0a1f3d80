//! All functionality for directly creating dice, rolling them, and working with their resulting rolls.
//!
//! This is the home of the dice "primitives". For using as part of a larger expression, see [`Expr::Dice`].
//!
//! [`Expr::Dice`]: crate::expr::Expr::Dice

pub mod modifier;
pub mod roller;

use std::{borrow::Cow, cmp, fmt};

pub use self::{modifier::Modifier, roller::Roller};
use crate::expr::Describe;

/// A set of one or more rollable dice with a specific number of sides, along with an optional modifier to apply to
/// any resulting rolls from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Dice {
	/// Number of dice to roll
	pub count: u32,

	/// Number of sides for each die
	pub sides: u32,

	/// Modifier to automatically apply to rolls from this set of dice
	pub modifier: Option<Modifier>,
}

impl Dice {
	/// Creates a new set of dice matching this one but without a modifier.
	#[must_use]
	#[inline]
	pub const fn plain(&self) -> Self {
		Self::new(self.count, self.sides)
	}

	/// Creates a new set of dice with a given count and number of sides.
	#[must_use]
	pub const fn new(count: u32, sides: u32) -> Self {
		Self {
			count,
			sides,
			modifier: None,
		}
	}

	/// Creates a new dice builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}

	/// Ensures the dice can actually be rolled (at least one die with at least one side).
	///
	/// # Errors
	/// If the count or the number of sides is zero, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicestats::dice::{Dice, Error};
	///
	/// assert!(Dice::new(2, 6).validate().is_ok());
	/// assert!(matches!(Dice::new(0, 6).validate(), Err(Error::ZeroCount(..))));
	/// assert!(matches!(Dice::new(2, 0).validate(), Err(Error::ZeroSides(..))));
	/// ```
	pub fn validate(&self) -> Result<(), Error> {
		if self.count == 0 {
			Err(Error::ZeroCount(self.clone()))
		} else if self.sides == 0 {
			Err(Error::ZeroSides(self.clone()))
		} else {
			Ok(())
		}
	}
}

impl Default for Dice {
	/// Creates the default dice (1d20).
	#[inline]
	fn default() -> Self {
		Self::new(1, 20)
	}
}

impl fmt::Display for Dice {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}d{}", self.count, self.sides)?;
		if let Some(modifier) = self.modifier {
			write!(f, "{modifier}")?;
		}
		Ok(())
	}
}

/// Single die produced from rolling [`Dice`] and optionally applying their [`Modifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DieRoll {
	/// Value that was rolled
	pub val: u32,

	/// Modifier that caused the drop of this die, if any
	pub dropped_by: Option<Modifier>,
}

impl DieRoll {
	/// Marks this die roll as dropped by a given modifier, setting [`Self::dropped_by`].
	///
	/// # Panics
	/// Panics if `Self::dropped_by` is already [`Some`].
	pub fn drop(&mut self, from: Modifier) {
		assert!(
			self.dropped_by.is_none(),
			"marking a die as dropped that has already been marked as dropped by another modifier"
		);
		self.dropped_by = Some(from);
	}

	/// Indicates whether this die roll has been dropped by a modifier.
	#[must_use]
	#[inline]
	pub const fn is_dropped(&self) -> bool {
		self.dropped_by.is_some()
	}

	/// Indicates whether this die roll is being kept (has *not* been dropped by a modifier).
	/// This is the direct inverse of [`DieRoll::is_dropped()`].
	#[must_use]
	#[inline]
	pub const fn is_kept(&self) -> bool {
		self.dropped_by.is_none()
	}

	/// Creates a new die roll with the given value.
	#[must_use]
	pub const fn new(val: u32) -> Self {
		Self { val, dropped_by: None }
	}
}

impl PartialOrd for DieRoll {
	fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for DieRoll {
	fn cmp(&self, other: &Self) -> cmp::Ordering {
		self.val.cmp(&other.val)
	}
}

impl fmt::Display for DieRoll {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The format of a die roll is simply the plain numeric value of the roll.
	/// If the roll was dropped, it is appended with ` (d)`.
	///
	/// # Examples
	/// ```
	/// use dicestats::dice::{DieRoll, Modifier};
	///
	/// let mut roll = DieRoll::new(16);
	/// assert_eq!(roll.to_string(), "16");
	///
	/// roll.drop(Modifier::KeepLow);
	/// assert_eq!(roll.to_string(), "16 (d)");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.val, if self.is_dropped() { " (d)" } else { "" })
	}
}

/// Representation of the result from rolling [`Dice`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Rolled<'a> {
	/// Each individual die roll that was made
	pub rolls: Vec<DieRoll>,

	/// Dice that were rolled to produce this
	pub dice: Cow<'a, Dice>,
}

impl Rolled<'_> {
	/// Calculates the total of all kept roll values. Without a modifier that is the sum of every die; with one it is
	/// the single die the modifier kept.
	///
	/// # Errors
	/// If there is an integer overflow while summing the die rolls, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicestats::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
	///
	/// let dice = Dice::new(4, 8);
	/// let rolled = FastRandRoller::default().roll(&dice)?;
	/// let total = rolled.total()?;
	/// assert_eq!(total, rolled.rolls.iter().map(|roll| u64::from(roll.val)).sum());
	/// # Ok::<(), dicestats::dice::Error>(())
	/// ```
	pub fn total(&self) -> Result<u64, Error> {
		let mut sum: u64 = 0;

		// Sum all rolls that haven't been dropped
		for r in self.rolls.iter().filter(|roll| roll.is_kept()) {
			sum = sum
				.checked_add(u64::from(r.val))
				.ok_or_else(|| Error::Overflow(self.clone().into_owned()))?;
		}

		Ok(sum)
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Rolled<'static> {
		Rolled {
			rolls: self.rolls,
			dice: Cow::Owned(self.dice.into_owned()),
		}
	}

	/// Creates a new rolled set of dice from a given set of dice and an iterator of values.
	/// The dice's modifier is not applied.
	#[must_use]
	pub fn from_dice_and_rolls(dice: &Dice, rolls: impl IntoIterator<Item = u32>) -> Rolled {
		Rolled {
			rolls: rolls.into_iter().map(DieRoll::new).collect(),
			dice: Cow::Borrowed(dice),
		}
	}
}

impl Describe for Rolled<'_> {
	/// Builds the breakdown of a roll: the plain dice that were rolled followed by every individual value rolled, all
	/// wrapped in parentheses. Dropped dice are listed like any other since the breakdown shows what was rolled, not
	/// what was kept.
	///
	/// If `list_limit` is specified and there are more rolls than it, the list of rolled dice will be truncated and
	/// appended with "X more..." (where X is the remaining roll count past the max).
	///
	/// # Examples
	/// ```
	/// use dicestats::{dice::{Dice, Rolled}, expr::Describe};
	///
	/// let dice = Dice::builder().count(4).sides(6).keep_high().build();
	/// let rolled = Rolled::from_dice_and_rolls(&dice, [6, 2, 5, 3]);
	///
	/// assert_eq!(rolled.describe(None), "(4d6: 6, 2, 5, 3)");
	/// assert_eq!(rolled.describe(Some(2)), "(4d6: 6, 2, 2 more...)");
	/// ```
	fn describe(&self, list_limit: Option<usize>) -> String {
		let list_limit = list_limit.unwrap_or(usize::MAX);
		let total_rolls = self.rolls.len();
		let truncated_rolls = total_rolls.saturating_sub(list_limit);

		format!(
			"({}: {}{})",
			self.dice.plain(),
			self.rolls
				.iter()
				.take(list_limit)
				.map(|roll| roll.val.to_string())
				.collect::<Vec<_>>()
				.join(", "),
			if truncated_rolls > 0 {
				format!(", {truncated_rolls} more...")
			} else {
				String::new()
			}
		)
	}
}

impl fmt::Display for Rolled<'_> {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// Unlike [`Describe::describe()`], this keeps the modifier and marks dropped dice (see [`DieRoll::fmt()`]).
	///
	/// # Examples
	/// ```
	/// use dicestats::dice::{Dice, Modifier, Rolled};
	///
	/// let dice = Dice::builder().count(2).sides(20).keep_high().build();
	/// let mut rolled = Rolled::from_dice_and_rolls(&dice, [5, 17]);
	/// Modifier::KeepHigh.apply(&mut rolled);
	/// assert_eq!(rolled.to_string(), "2d20H[5 (d), 17]");
	/// ```
	///
	/// [`DieRoll::fmt()`]: ./struct.DieRoll.html#method.fmt
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{}[{}]",
			self.dice,
			self.rolls
				.iter()
				.map(ToString::to_string)
				.collect::<Vec<_>>()
				.join(", ")
		)
	}
}

/// An error resulting from a dice operation
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// There was an integer overflow when performing mathematical operations on roll values.
	/// This normally should not ever happen given the types used for die counts, sides, and totals.
	#[error("integer overflow")]
	Overflow(Rolled<'static>),

	/// The dice don't contain any dice to roll.
	#[error("{0} doesn't roll any dice")]
	ZeroCount(Dice),

	/// The dice don't have any sides to roll.
	#[error("{0} has dice without any sides")]
	ZeroSides(Dice),
}

/// Builds [`Dice`] with a fluent interface.
///
/// # Examples
///
/// ## Basic dice
/// ```
/// use dicestats::Dice;
///
/// let dice = Dice::builder().count(2).sides(6).build();
/// assert_eq!(dice, Dice::new(2, 6));
/// ```
///
/// ## With a modifier
/// ```
/// use dicestats::dice::{Dice, Modifier};
///
/// let dice = Dice::builder().count(2).sides(20).keep_high().build();
/// assert_eq!(
/// 	dice,
/// 	Dice {
/// 		count: 2,
/// 		sides: 20,
/// 		modifier: Some(Modifier::KeepHigh),
/// 	},
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(Dice);

impl Builder {
	/// Sets the number of dice to roll.
	#[must_use]
	pub const fn count(mut self, count: u32) -> Self {
		self.0.count = count;
		self
	}

	/// Sets the number of sides per die.
	#[must_use]
	pub const fn sides(mut self, sides: u32) -> Self {
		self.0.sides = sides;
		self
	}

	/// Sets the modifier of the dice, replacing any existing one.
	#[must_use]
	pub const fn modifier(mut self, modifier: Option<Modifier>) -> Self {
		self.0.modifier = modifier;
		self
	}

	/// Sets a keep highest modifier on the dice.
	#[must_use]
	pub const fn keep_high(self) -> Self {
		self.modifier(Some(Modifier::KeepHigh))
	}

	/// Sets a keep lowest modifier on the dice.
	#[must_use]
	pub const fn keep_low(self) -> Self {
		self.modifier(Some(Modifier::KeepLow))
	}

	/// Finalizes the dice.
	#[must_use]
	pub fn build(self) -> Dice {
		self.0
	}
}
