//! Parsers for dice notation and full dice expressions, built with [chumsky].
//!
//! Both evaluators work from the same [`Expr`] tree produced here, so there is exactly one grammar:
//!
//! - A dice term is an optional `H`/`L` prefix modifier, an optional count, `d`, a number of sides, and an optional
//!   `H`/`L` suffix modifier (`2d20H`, `H2d20`, `d6`). The suffix wins when both modifiers are written. The prefix
//!   may be separated from its dice by whitespace (`H 2d20`), but it must be followed by dice.
//! - `+`/`-` bind loosest, then `*`/`/` and implicit multiplication (`2(1d4)`, `2d6 3`), then `^`, which is
//!   left-associative, then unary `-`.

use chumsky::prelude::*;

use crate::{
	dice::{Dice, Modifier},
	expr::Expr,
};

/// Extra parser state carrying the rich error type used by every parser in this module
type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Constructor of a binary expression
type BinOp = fn(Box<Expr>, Box<Expr>) -> Expr;

/// Generates a parser that specifically handles dice terms like "d20", "2d20H", "L4d6", etc.
pub fn dice_part<'src>() -> impl Parser<'src, &'src str, Dice, Extra<'src>> + Clone {
	// Parser for the keep highest/lowest modifier letters
	let modifier = one_of("HL").try_map(|symbol, span| {
		Modifier::from_symbol(symbol).ok_or_else(|| Rich::custom(span, format!("Unknown dice modifier {symbol}")))
	});

	// Parser for the number of sides, which may be the unusable "x" placeholder
	let sides = choice((text::digits(10).to_slice().map(Some), one_of("xX").to(None)));

	modifier
		.clone()
		.then_ignore(text::whitespace())
		.or_not()
		.then(text::digits(10).to_slice().or_not())
		.then_ignore(just('d'))
		.then(sides)
		.then(modifier.or_not())
		.validate(|(((prefix, count), sides), suffix), e, emitter| {
			let span = e.span();
			let count = match count.map(str::parse::<u32>) {
				None => 1,
				Some(Ok(0)) => {
					emitter.emit(Rich::custom(span, "Dice count must be at least 1"));
					1
				}
				Some(Ok(count)) => count,
				Some(Err(err)) => {
					emitter.emit(Rich::custom(span, format!("Dice count: {err}")));
					1
				}
			};
			let sides = match sides.map(str::parse::<u32>) {
				None => {
					emitter.emit(Rich::custom(
						span,
						"dx requires a number of sides, such as d20 or d100",
					));
					1
				}
				Some(Ok(0)) => {
					emitter.emit(Rich::custom(span, "Dice sides must be at least 1"));
					1
				}
				Some(Ok(sides)) => sides,
				Some(Err(err)) => {
					emitter.emit(Rich::custom(span, format!("Dice sides: {err}")));
					1
				}
			};

			Dice {
				count,
				sides,
				modifier: suffix.or(prefix),
			}
		})
}

/// Generates a parser that specifically handles dice terms like "d20", "2d20H", "L4d6", etc.
/// and expects end of input
pub fn dice<'src>() -> impl Parser<'src, &'src str, Dice, Extra<'src>> + Clone {
	dice_part().padded().then_ignore(end())
}

/// Generates a parser that handles full expressions including mathematical operations, grouping with parentheses,
/// dice expressions, etc.
pub fn expr_part<'src>() -> impl Parser<'src, &'src str, Expr, Extra<'src>> + Clone {
	// Helper function for operators
	let op = |c| just(c).padded();

	recursive(|expr| {
		// Parser for numbers, with an optional fractional part
		let num = text::digits(10)
			.then(just('.').then(text::digits(10)).or_not())
			.to_slice()
			.try_map(|s: &str, span| {
				s.parse()
					.map(Expr::Num)
					.map_err(|err| Rich::custom(span, format!("Number: {err}")))
			});

		// Parser for dice expressions, remembering where the dice are in the input
		let dice = dice_part().try_map(|dice, span: SimpleSpan| Ok(Expr::Dice(dice, span.start..span.end)));

		// Parser for single values and expressions enclosed in parentheses
		let atom = choice((dice, num, expr.delimited_by(just('('), just(')')))).padded();

		// Parser for negative sign
		let unary = op('-').repeated().foldr(atom, |_op, rhs| Expr::Neg(Box::new(rhs)));

		// Parser for exponentiation (left-associative)
		let power = unary.clone().foldl(op('^').ignore_then(unary).repeated(), |lhs, rhs| {
			Expr::Pow(Box::new(lhs), Box::new(rhs))
		});

		// Parser for a value directly following another one with no operator in between, which multiplies them
		let implicit = one_of("0123456789(dHL").rewind().ignore_then(power.clone());

		// Parser for multiplication and division (explicit or implicit)
		let product = power.clone().foldl(
			choice((
				op('*').to(Expr::Mul as BinOp).then(power.clone()),
				op('/').to(Expr::Div as BinOp).then(power),
				implicit.map(|rhs| (Expr::Mul as BinOp, rhs)),
			))
			.repeated(),
			|lhs, (op, rhs)| op(Box::new(lhs), Box::new(rhs)),
		);

		// Parser for addition and subtraction operators
		product.clone().foldl(
			choice((op('+').to(Expr::Add as BinOp), op('-').to(Expr::Sub as BinOp)))
				.then(product)
				.repeated(),
			|lhs, (op, rhs)| op(Box::new(lhs), Box::new(rhs)),
		)
	})
}

/// Generates a parser that handles full expressions including mathematical operations, grouping with parentheses,
/// dice expressions, etc. and expects end of input
pub fn expr<'src>() -> impl Parser<'src, &'src str, Expr, Extra<'src>> + Clone {
	expr_part().padded().then_ignore(end())
}

/// Malformed dice notation or expression syntax
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid expression at position {position}: {details}")]
#[non_exhaustive]
pub struct Error {
	/// Description of everything wrong with the input
	pub details: String,

	/// Byte offset of the first problem in the input
	pub position: usize,
}

impl Error {
	/// Collects the errors reported by a parser into a single error.
	fn from_rich(errs: &[Rich<'_, char>]) -> Self {
		Self {
			details: errs.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "),
			position: errs.first().map_or(0, |err| err.span().start),
		}
	}
}

impl std::str::FromStr for Dice {
	type Err = Error;

	/// Parses a single dice term.
	///
	/// # Examples
	/// ```
	/// use dicestats::dice::Dice;
	///
	/// let dice: Dice = "2d20H".parse()?;
	/// assert_eq!(dice, Dice::builder().count(2).sides(20).keep_high().build());
	///
	/// let dice: Dice = "d6".parse()?;
	/// assert_eq!(dice, Dice::new(1, 6));
	///
	/// assert!("2dx".parse::<Dice>().is_err());
	/// # Ok::<(), dicestats::parse::Error>(())
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		dice().parse(s).into_result().map_err(|errs| Error::from_rich(&errs))
	}
}

impl std::str::FromStr for Expr {
	type Err = Error;

	/// Parses a full dice expression.
	///
	/// # Examples
	/// ```
	/// use dicestats::{dice::Dice, expr::Expr};
	///
	/// let expr: Expr = "1d4 + 2".parse()?;
	/// assert_eq!(
	/// 	expr,
	/// 	Expr::Add(Box::new(Expr::Dice(Dice::new(1, 4), 0..3)), Box::new(Expr::Num(2.0)))
	/// );
	///
	/// assert!("1d4 + ".parse::<Expr>().is_err());
	/// assert!("2d20 H".parse::<Expr>().is_err());
	/// # Ok::<(), dicestats::parse::Error>(())
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		expr().parse(s).into_result().map_err(|errs| Error::from_rich(&errs))
	}
}
