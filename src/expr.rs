//! AST-like data structures for evaluating full mathematical dice expressions and working with their results.

use std::{fmt, ops::Range};

use crate::dice::{Dice, Error as DiceError, Roller, Rolled};

/// Byte range of a piece of the original input text an expression was parsed from
pub type Span = Range<usize>;

/// Generates an implementation of [`HasOpType`] for an enum type.
/// This is very tightly coupled with the expected variants:
/// `Num`, `Dice`, `Neg`, `Add`, `Sub`, `Mul`, `Div`, and `Pow`.
macro_rules! op_type_impl {
	($name:ty) => {
		impl HasOpType for $name {
			fn op_type(&self) -> OpType {
				match self {
					Self::Num(..) | Self::Dice(..) => OpType::Value,
					Self::Neg(..) => OpType::Unary,
					Self::Add(..) | Self::Sub(..) => OpType::Additive,
					Self::Mul(..) | Self::Div(..) => OpType::Multiplicative,
					Self::Pow(..) => OpType::Exponential,
				}
			}
		}
	};
}

/// Individual elements of a full mathematical dice expression
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Expr {
	/// Standalone number
	Num(f64),

	/// Dice literal, along with where it was found in the input text
	Dice(Dice, Span),

	/// Negation of an expression (makes the result of it negative)
	Neg(Box<Self>),

	/// Sum of two expressions
	Add(Box<Self>, Box<Self>),

	/// Difference of two expressions
	Sub(Box<Self>, Box<Self>),

	/// Product of two expressions (explicit `*` or implicit juxtaposition)
	Mul(Box<Self>, Box<Self>),

	/// Quotient of two expressions
	Div(Box<Self>, Box<Self>),

	/// First expression raised to the power of the second
	Pow(Box<Self>, Box<Self>),
}

op_type_impl!(Expr);

impl Expr {
	/// Evaluates the expression. For most types of expressions, this will directly result in a 1:1 equivalent
	/// [`Evaled`], with the notable exception of [`Expr::Dice`]. For dice expressions, the dice they contain are
	/// rolled with the given roller, resulting in an [`Evaled::Dice`] with the [`Rolled`] set of dice.
	///
	/// # Errors
	/// If an error occurs during dice rolling, an error variant will be returned.
	///
	/// # Examples
	/// ```
	/// use dicestats::{dice::roller::Iter as IterRoller, expr::Expr};
	///
	/// let expr: Expr = "3d6 + 5".parse()?;
	/// let evaled = expr.eval(&mut IterRoller::new([4, 1, 6]))?;
	/// assert_eq!(evaled.calc()?, 16.0);
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn eval(&self, rng: &mut impl Roller) -> Result<Evaled, EvalError> {
		Ok(match self {
			Self::Num(x) => Evaled::Num(*x),
			Self::Dice(dice, span) => Evaled::Dice(
				rng.roll(dice).map_err(|err| EvalError::Dice(self.clone(), err))?,
				span.clone(),
			),

			Self::Neg(x) => Evaled::Neg(Box::new(x.eval(rng)?)),

			Self::Add(a, b) => Evaled::Add(Box::new(a.eval(rng)?), Box::new(b.eval(rng)?)),
			Self::Sub(a, b) => Evaled::Sub(Box::new(a.eval(rng)?), Box::new(b.eval(rng)?)),
			Self::Mul(a, b) => Evaled::Mul(Box::new(a.eval(rng)?), Box::new(b.eval(rng)?)),
			Self::Div(a, b) => Evaled::Div(Box::new(a.eval(rng)?), Box::new(b.eval(rng)?)),
			Self::Pow(a, b) => Evaled::Pow(Box::new(a.eval(rng)?), Box::new(b.eval(rng)?)),
		})
	}

	/// Checks whether the expression is deterministic (will always yield the same value with every evaluation).
	/// A [`Self::Num`] will always return `true`, a [`Self::Dice`] will always return `false` unless the dice they
	/// contain only have one side, and all unary and binary expressions forward the check to their children.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		match self {
			Self::Num(..) => true,
			Self::Dice(dice, _) => dice.sides == 1,
			Self::Neg(x) => x.is_deterministic(),
			Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) | Self::Pow(a, b) => {
				a.is_deterministic() && b.is_deterministic()
			}
		}
	}

	/// Collects every set of dice in the expression, in the order they appear in the input text.
	#[must_use]
	pub fn dice_terms(&self) -> Vec<&Dice> {
		let mut terms = Vec::new();
		self.collect_dice(&mut terms);
		terms
	}

	/// Pushes every set of dice in the expression onto `terms`, left to right.
	fn collect_dice<'e>(&'e self, terms: &mut Vec<&'e Dice>) {
		match self {
			Self::Num(..) => {}
			Self::Dice(dice, _) => terms.push(dice),
			Self::Neg(x) => x.collect_dice(terms),
			Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) | Self::Pow(a, b) => {
				a.collect_dice(terms);
				b.collect_dice(terms);
			}
		}
	}
}

impl Describe for Expr {
	/// Builds a full usable expression string from the expressions. Operations are grouped with parentheses whenever
	/// the order of operations could be considered ambiguous, such as when mixing addition and multiplication together.
	/// All strings output from this should result in the exact same expression layout when re-parsing them.
	///
	/// `list_limit` does not affect the output of this implementation in any way since there are no possible lists of
	/// elements included, so it is always safe to pass `None`.
	fn describe(&self, _list_limit: Option<usize>) -> String {
		match self {
			Self::Num(x) => x.to_string(),
			Self::Dice(dice, _) => dice.to_string(),

			Self::Neg(x) => describe_neg(x.as_ref(), None),

			Self::Add(a, b) => self.describe_binary_expr('+', a.as_ref(), b.as_ref(), None),
			Self::Sub(a, b) => self.describe_binary_expr('-', a.as_ref(), b.as_ref(), None),
			Self::Mul(a, b) => self.describe_binary_expr('*', a.as_ref(), b.as_ref(), None),
			Self::Div(a, b) => self.describe_binary_expr('/', a.as_ref(), b.as_ref(), None),
			Self::Pow(a, b) => self.describe_binary_expr('^', a.as_ref(), b.as_ref(), None),
		}
	}
}

impl fmt::Display for Expr {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Individual elements of an evaluated mathematical dice expression
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Evaled<'a> {
	/// Standalone number
	Num(f64),

	/// Rolled dice, along with where the dice were found in the input text
	Dice(Rolled<'a>, Span),

	/// Negation of an expression (makes the result of it negative)
	Neg(Box<Self>),

	/// Sum of two expressions
	Add(Box<Self>, Box<Self>),

	/// Difference of two expressions
	Sub(Box<Self>, Box<Self>),

	/// Product of two expressions
	Mul(Box<Self>, Box<Self>),

	/// Quotient of two expressions
	Div(Box<Self>, Box<Self>),

	/// First expression raised to the power of the second
	Pow(Box<Self>, Box<Self>),
}

op_type_impl!(Evaled<'_>);

impl Evaled<'_> {
	/// Calculates the final result of the evaluated expression and all of its children (if any).
	///
	/// # Errors
	/// If a divisor evaluates to exactly zero, or there is an error calculating the total of a set of dice rolls, an
	/// error variant will be returned.
	///
	/// # Examples
	/// ```
	/// use dicestats::{dice::roller::Max as MaxRoller, expr::{CalcError, Expr}};
	///
	/// let expr: Expr = "2d6 / (1d4 - 4)".parse()?;
	/// let result = expr.eval(&mut MaxRoller)?.calc();
	/// assert!(matches!(result, Err(CalcError::Division(..))));
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	#[expect(clippy::cast_precision_loss, reason = "Dice totals are far below 2^52 in practice")]
	pub fn calc(&self) -> Result<f64, CalcError> {
		match self {
			Self::Num(x) => Ok(*x),
			Self::Dice(rolled, _) => Ok(rolled
				.total()
				.map_err(|err| CalcError::Dice(self.clone().into_owned(), err))? as f64),

			Self::Neg(x) => Ok(-x.calc()?),

			Self::Add(a, b) => Ok(a.calc()? + b.calc()?),
			Self::Sub(a, b) => Ok(a.calc()? - b.calc()?),
			Self::Mul(a, b) => Ok(a.calc()? * b.calc()?),
			Self::Div(a, b) => {
				let a_val = a.calc()?;
				let b_val = b.calc()?;
				if b_val == 0.0 {
					Err(CalcError::Division(self.clone().into_owned()))
				} else {
					Ok(a_val / b_val)
				}
			}
			Self::Pow(a, b) => Ok(a.calc()?.powf(b.calc()?)),
		}
	}

	/// Collects every set of rolled dice in the evaluated expression along with where their dice were found in the
	/// input text, in the order they appear there.
	#[must_use]
	pub fn rolls(&self) -> Vec<(&Rolled, &Span)> {
		let mut rolls = Vec::new();
		self.collect_rolls(&mut rolls);
		rolls
	}

	/// Pushes every set of rolled dice in the evaluated expression onto `rolls`, left to right.
	fn collect_rolls<'e>(&'e self, rolls: &mut Vec<(&'e Rolled<'e>, &'e Span)>) {
		match self {
			Self::Num(..) => {}
			Self::Dice(rolled, span) => rolls.push((rolled, span)),
			Self::Neg(x) => x.collect_rolls(rolls),
			Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) | Self::Pow(a, b) => {
				a.collect_rolls(rolls);
				b.collect_rolls(rolls);
			}
		}
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Evaled<'static> {
		match self {
			Self::Num(x) => Evaled::Num(x),
			Self::Dice(rolled, span) => Evaled::Dice(rolled.into_owned(), span),
			Self::Neg(x) => Evaled::Neg(Box::new(x.into_owned())),
			Self::Add(a, b) => Evaled::Add(Box::new(a.into_owned()), Box::new(b.into_owned())),
			Self::Sub(a, b) => Evaled::Sub(Box::new(a.into_owned()), Box::new(b.into_owned())),
			Self::Mul(a, b) => Evaled::Mul(Box::new(a.into_owned()), Box::new(b.into_owned())),
			Self::Div(a, b) => Evaled::Div(Box::new(a.into_owned()), Box::new(b.into_owned())),
			Self::Pow(a, b) => Evaled::Pow(Box::new(a.into_owned()), Box::new(b.into_owned())),
		}
	}
}

impl Describe for Evaled<'_> {
	fn describe(&self, list_limit: Option<usize>) -> String {
		match self {
			Self::Num(x) => x.to_string(),
			Self::Dice(roll, _) => roll.describe(list_limit),

			Self::Neg(x) => describe_neg(x.as_ref(), list_limit),

			Self::Add(a, b) => self.describe_binary_expr('+', a.as_ref(), b.as_ref(), list_limit),
			Self::Sub(a, b) => self.describe_binary_expr('-', a.as_ref(), b.as_ref(), list_limit),
			Self::Mul(a, b) => self.describe_binary_expr('*', a.as_ref(), b.as_ref(), list_limit),
			Self::Div(a, b) => self.describe_binary_expr('/', a.as_ref(), b.as_ref(), list_limit),
			Self::Pow(a, b) => self.describe_binary_expr('^', a.as_ref(), b.as_ref(), list_limit),
		}
	}
}

impl fmt::Display for Evaled<'_> {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Error that can occur during [`Expr::eval()`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EvalError {
	/// Dice-related error (likely during rolling)
	#[error("dice error while evaluating \"{0}\": {1}")]
	Dice(Expr, #[source] DiceError),
}

/// Error that can occur during [`Evaled::calc()`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum CalcError {
	/// Dice-related error (likely during totalling)
	#[error("dice error while calculating ({0}): {1}")]
	Dice(Evaled<'static>, #[source] DiceError),

	/// Division by a divisor that evaluated to exactly zero
	#[error("division by zero while calculating {0}")]
	Division(Evaled<'static>),
}

/// Operation type for an individual expression, in ascending order of binding strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum OpType {
	/// Additive operation (sum or difference)
	Additive,

	/// Multiplicative operation (product or quotient)
	Multiplicative,

	/// Exponentiation
	Exponential,

	/// Unary operation
	Unary,

	/// Single value, no operation
	Value,
}

/// Trait that offers [`OpType`]-related information
pub trait HasOpType {
	/// Gets the type of this expression.
	fn op_type(&self) -> OpType;

	/// Checks whether this expression is a single value.
	fn is_value(&self) -> bool {
		self.op_type() == OpType::Value
	}
}

/// Trait to allow creation of expanded descriptions with an optional max number of individual listed results where
/// applicable
pub trait Describe {
	/// Builds a detailed expression string with additional information about non-deterministic elements.
	/// Any elements of the expression that can have a different result between multiple evaluations or multiple results
	/// should list all of the specific individual results that occurred (ideally, up to `list_limit` of them).
	#[must_use]
	fn describe(&self, list_limit: Option<usize>) -> String;
}

/// Trait for describing binary expressions with influence from own type.
/// Used for wrapping parentheses around operands that bind more loosely than the operation itself.
trait DescribeBinaryExpr: HasOpType + Describe {
	/// Builds a detailed description for a binary expression with parentheses added wherever re-parsing the
	/// description would otherwise group the operands differently. Every operation is left-associative, so a right
	/// operand of equal binding strength is wrapped as well.
	fn describe_binary_expr(
		&self,
		op: char,
		a: &impl DescribeBinaryExpr,
		b: &impl DescribeBinaryExpr,
		list_limit: Option<usize>,
	) -> String {
		let own = self.op_type();
		format!(
			"{} {} {}",
			if a.op_type() < own {
				paren_wrap(a.describe(list_limit))
			} else {
				a.describe(list_limit)
			},
			op,
			if b.op_type() <= own {
				paren_wrap(b.describe(list_limit))
			} else {
				b.describe(list_limit)
			}
		)
	}
}

impl<T: HasOpType + Describe> DescribeBinaryExpr for T {}

/// Builds a description of a negation, wrapping anything but a single value in parentheses.
fn describe_neg(x: &(impl HasOpType + Describe), list_limit: Option<usize>) -> String {
	if x.is_value() {
		format!("-{}", x.describe(list_limit))
	} else {
		format!("-({})", x.describe(list_limit))
	}
}

/// Wraps a string in parentheses.
#[must_use]
fn paren_wrap(mut text: String) -> String {
	text.insert(0, '(');
	text.push(')');
	text
}
