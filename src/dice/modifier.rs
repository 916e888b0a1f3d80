//! Dice modifiers and their related types.

use core::fmt;

use super::Rolled;

/// Selection routines that can be applied to [`Dice`](super::Dice) to reduce a set of [`Rolled`] dice to a single
/// kept die as part of their rolling process.
///
/// In dice notation a modifier is written as a single letter either before the dice (`H2d20`) or after them
/// (`2d20H`). When both are written, the one after the dice wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Modifier {
	/// Keeps only the highest die, dropping the rest.
	///
	/// # Examples
	/// ```
	/// use dicestats::dice::{roller::{Iter as IterRoller, Roller}, Dice, Modifier};
	///
	/// // Build the 4d6H dice set and create a roller that has predetermined values for the dice rolls
	/// let dice = Dice::builder().count(4).sides(6).keep_high().build();
	/// let mut rng = IterRoller::new([3, 6, 1, 6]);
	/// let rolled = rng.roll(&dice)?;
	///
	/// // Only one of the tied sixes survives, everything else is marked as dropped by the modifier
	/// assert_eq!(rolled.rolls.iter().filter(|roll| roll.is_kept()).count(), 1);
	/// assert_eq!(rolled.total()?, 6);
	/// # Ok::<(), dicestats::dice::Error>(())
	/// ```
	KeepHigh,

	/// Keeps only the lowest die, dropping the rest.
	///
	/// # Examples
	/// ```
	/// use dicestats::dice::{roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// let dice = Dice::builder().count(3).sides(20).keep_low().build();
	/// let mut rng = IterRoller::new([14, 2, 9]);
	/// let rolled = rng.roll(&dice)?;
	/// assert_eq!(rolled.total()?, 2);
	/// # Ok::<(), dicestats::dice::Error>(())
	/// ```
	KeepLow,
}

impl Modifier {
	/// Applies the modifier to a set of rolled dice, marking every die it doesn't keep as dropped.
	pub fn apply(self, rolled: &mut Rolled) {
		let mut refs = rolled
			.rolls
			.iter_mut()
			.filter(|roll| roll.is_kept())
			.collect::<Vec<_>>();
		refs.sort();
		if self == Self::KeepHigh {
			refs.reverse();
		}
		refs.iter_mut().skip(1).for_each(|roll| roll.drop(self));
	}

	/// Gets the modifier a notation letter stands for, if any.
	///
	/// # Examples
	/// ```
	/// use dicestats::dice::Modifier;
	///
	/// assert_eq!(Modifier::from_symbol('H'), Some(Modifier::KeepHigh));
	/// assert_eq!(Modifier::from_symbol('L'), Some(Modifier::KeepLow));
	/// assert_eq!(Modifier::from_symbol('h'), None);
	/// ```
	#[must_use]
	pub const fn from_symbol(symbol: char) -> Option<Self> {
		match symbol {
			'H' => Some(Self::KeepHigh),
			'L' => Some(Self::KeepLow),
			_ => None,
		}
	}

	/// Gets the notation letter for the modifier.
	#[must_use]
	pub const fn symbol(self) -> char {
		match self {
			Self::KeepHigh => 'H',
			Self::KeepLow => 'L',
		}
	}
}

impl fmt::Display for Modifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.symbol())
	}
}
