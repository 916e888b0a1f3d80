use chumsky::Parser;

use crate::{
	dice::{roller::Max as MaxRoller, Dice, Modifier},
	expr::Expr,
	parse, parser,
};

fn calc(input: &str) -> f64 {
	let ast = parser().parse(input).unwrap();
	ast.eval(&mut MaxRoller).unwrap().calc().unwrap()
}

fn dice(input: &str) -> Dice {
	match input.parse::<Expr>().unwrap() {
		Expr::Dice(dice, _) => dice,
		other => panic!("expected dice, got {other:?}"),
	}
}

#[test]
fn basic_arithmetic() {
	assert_eq!(calc("42 + 69"), 111.0);
	assert_eq!(calc("42 - 69"), -27.0);
	assert_eq!(calc("42 * 69"), 2898.0);
	assert_eq!(calc("50 / 8"), 6.25);
	assert_eq!(calc("1.5 * 4"), 6.0);
}

#[test]
fn operator_precedence() {
	assert_eq!(calc("2 + 3 * 4"), 14.0);
	assert_eq!(calc("(2 + 3) * 4"), 20.0);
	assert_eq!(calc("2 * 3 ^ 2"), 18.0);
	assert_eq!(calc("-2 ^ 2"), 4.0);
	assert_eq!(calc("10 - 4 - 3"), 3.0);
	assert_eq!(calc("--3"), 3.0);
}

#[test]
fn power_is_left_associative() {
	assert_eq!(calc("2^3^2"), 64.0);
	assert_eq!(calc("2 ^ 3 ^ 2"), 64.0);
}

#[test]
fn implicit_multiplication() {
	assert_eq!(calc("2(3)"), 6.0);
	assert_eq!(calc("(2)(3)"), 6.0);
	assert_eq!(calc("2 (1 + 2)"), 6.0);
	assert_eq!(calc("2d6 3"), 36.0);
	assert_eq!(calc("2 d6"), 12.0);
	assert_eq!(calc("3 H2d20"), 60.0);
	assert_eq!(calc("2-3"), -1.0);
	assert_eq!(calc("2 - 3"), -1.0);
}

#[test]
fn dice_terms() {
	assert_eq!(dice("d20"), Dice::new(1, 20));
	assert_eq!(dice("3d6"), Dice::new(3, 6));
	assert_eq!(dice("03d006"), Dice::new(3, 6));
	assert_eq!(dice("2d20H"), Dice::builder().count(2).sides(20).keep_high().build());
	assert_eq!(dice("4d6L"), Dice::builder().count(4).sides(6).keep_low().build());
}

#[test]
fn prefix_modifiers() {
	assert_eq!(dice("H2d20"), dice("2d20H"));
	assert_eq!(dice("H 2d20"), dice("2d20H"));
	assert_eq!(dice("L3d8"), Dice::builder().count(3).sides(8).keep_low().build());

	// The suffix wins over the prefix
	assert_eq!(dice("L2d20H").modifier, Some(Modifier::KeepHigh));
}

#[test]
fn modifier_letters_match_their_symbols() {
	for modifier in [Modifier::KeepHigh, Modifier::KeepLow] {
		let symbol = modifier.symbol();
		assert_eq!(dice(&format!("2d20{symbol}")).modifier, Some(modifier));
		assert_eq!(dice(&format!("{symbol}2d20")).modifier, Some(modifier));
	}

	assert!("2d20h".parse::<Dice>().is_err());
	assert!("l2d20".parse::<Dice>().is_err());
}

#[test]
fn dice_spans() {
	let expr: Expr = "1d4 + H 2d20".parse().unwrap();
	let Expr::Add(a, b) = expr else {
		panic!("expected addition");
	};
	assert_eq!(*a, Expr::Dice(Dice::new(1, 4), 0..3));
	assert_eq!(*b, Expr::Dice(Dice::builder().count(2).sides(20).keep_high().build(), 6..12));
}

#[test]
fn invalid_dice() {
	for input in ["0d6", "2d0", "2dx", "dX", "99999999999d6", "2d99999999999", "d"] {
		assert!(input.parse::<Expr>().is_err(), "{input} should not parse");
	}
}

#[test]
fn dangling_modifiers() {
	for input in ["2d20 H", "H 5", "H", "H(2d6)", "2 + L"] {
		assert!(input.parse::<Expr>().is_err(), "{input} should not parse");
	}
}

#[test]
fn malformed_expressions() {
	for input in ["", "   ", "1 +", "(1d4", "1d4)", "3 $ 4", "2..5", "*3", "1d4 4d"] {
		assert!(input.parse::<Expr>().is_err(), "{input} should not parse");
	}
}

#[test]
fn error_position_points_at_problem() {
	let err = "1d4 + 2 $".parse::<Expr>().unwrap_err();
	assert_eq!(err.position, 8);
	assert!(!err.details.is_empty());
}

#[test]
fn standalone_dice_parser() {
	assert_eq!(
		parse::dice().parse(" 2d20L ").into_result().unwrap(),
		Dice::builder().count(2).sides(20).keep_low().build()
	);
	assert!(parse::dice().parse("2d20 + 1").into_result().is_err());
}
