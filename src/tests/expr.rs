use crate::{
	dice::{
		roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Val as ValRoller},
		Dice,
	},
	expr::{CalcError, Describe, EvalError, Evaled, Expr, HasOpType, OpType},
};

fn num(x: f64) -> Box<Expr> {
	Box::new(Expr::Num(x))
}

#[test]
fn basic_negation() {
	let expr = Expr::Neg(num(42.0));
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert_eq!(result.unwrap(), -42.0);
}

#[test]
fn basic_addition() {
	let expr = Expr::Add(num(42.0), num(69.0));
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert_eq!(result.unwrap(), 111.0);
}

#[test]
fn basic_subtraction() {
	let expr = Expr::Sub(num(42.0), num(69.0));
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert_eq!(result.unwrap(), -27.0);
}

#[test]
fn basic_multiplication() {
	let expr = Expr::Mul(num(42.0), num(69.0));
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert_eq!(result.unwrap(), 2898.0);
}

#[test]
fn basic_division_keeps_fraction() {
	let expr = Expr::Div(num(50.0), num(8.0));
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert_eq!(result.unwrap(), 6.25);
}

#[test]
fn basic_power() {
	let expr = Expr::Pow(num(2.0), num(10.0));
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert_eq!(result.unwrap(), 1024.0);
}

#[test]
fn complex_math() {
	// (-5 * (3 + 1)) - (-4 / 2)
	let expr = Expr::Sub(
		Box::new(Expr::Mul(
			Box::new(Expr::Neg(num(5.0))),
			Box::new(Expr::Add(num(3.0), num(1.0))),
		)),
		Box::new(Expr::Div(Box::new(Expr::Neg(num(4.0))), num(2.0))),
	);
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert_eq!(result.unwrap(), -18.0);
}

#[test]
fn division_by_zero() {
	let expr = Expr::Div(num(1.0), Box::new(Expr::Sub(num(2.0), num(2.0))));
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert!(matches!(result, Err(CalcError::Division(..))));
}

#[test]
fn dice_term_within_range() {
	let expr = Expr::Add(Box::new(Expr::Dice(Dice::new(3, 6), 0..3)), num(5.0));
	let mut roller = FastRandRoller::with_seed(7);

	for _ in 0..200 {
		let evaled = expr.eval(&mut roller).unwrap();
		let result = evaled.calc().unwrap();
		assert!((8.0..=23.0).contains(&result));

		let rolls = evaled.rolls();
		assert_eq!(rolls.len(), 1);
		assert_eq!(rolls[0].0.rolls.len(), 3);
		assert!(rolls[0].0.rolls.iter().all(|roll| (1..=6).contains(&roll.val)));
	}
}

#[test]
fn dice_term_with_fixed_rolls() {
	let expr = Expr::Mul(
		Box::new(Expr::Dice(Dice::builder().count(2).sides(20).keep_high().build(), 0..5)),
		num(2.0),
	);
	let result = expr.eval(&mut IterRoller::new([5, 17])).unwrap().calc();
	assert_eq!(result.unwrap(), 34.0);
}

#[test]
fn invalid_dice_fail_evaluation() {
	let expr = Expr::Dice(Dice::new(0, 6), 0..3);
	assert!(matches!(expr.eval(&mut MaxRoller), Err(EvalError::Dice(..))));
}

#[test]
fn rolls_in_source_order() {
	let expr = Expr::Sub(
		Box::new(Expr::Dice(Dice::new(1, 4), 0..3)),
		Box::new(Expr::Neg(Box::new(Expr::Dice(Dice::new(2, 8), 7..10)))),
	);
	let evaled = expr.eval(&mut MaxRoller).unwrap();
	let spans = evaled.rolls().into_iter().map(|(_, span)| span.clone()).collect::<Vec<_>>();
	assert_eq!(spans, vec![0..3, 7..10]);
	assert_eq!(evaled.calc().unwrap(), 20.0);
}

#[test]
fn determinism() {
	assert!(Expr::Add(num(1.0), num(2.0)).is_deterministic());
	assert!(Expr::Dice(Dice::new(4, 1), 0..3).is_deterministic());
	assert!(!Expr::Neg(Box::new(Expr::Dice(Dice::new(1, 6), 1..4))).is_deterministic());
}

#[test]
fn describe_adds_needed_parentheses() {
	let expr = Expr::Mul(
		Box::new(Expr::Add(num(1.0), Box::new(Expr::Dice(Dice::new(1, 4), 4..7)))),
		num(2.0),
	);
	assert_eq!(expr.describe(None), "(1 + 1d4) * 2");

	let expr = Expr::Sub(num(5.0), Box::new(Expr::Sub(num(3.0), num(1.0))));
	assert_eq!(expr.to_string(), "5 - (3 - 1)");

	let expr = Expr::Pow(Box::new(Expr::Pow(num(2.0), num(3.0))), num(2.0));
	assert_eq!(expr.to_string(), "2 ^ 3 ^ 2");

	let expr = Expr::Neg(Box::new(Expr::Add(num(1.0), num(2.0))));
	assert_eq!(expr.to_string(), "-(1 + 2)");
}

#[test]
fn describe_evaled_lists_rolls() {
	let expr = Expr::Add(Box::new(Expr::Dice(Dice::new(3, 6), 0..3)), num(5.0));
	let evaled = expr.eval(&mut ValRoller(4)).unwrap();
	assert_eq!(evaled.describe(None), "(3d6: 4, 4, 4) + 5");
	assert_eq!(evaled.describe(Some(1)), "(3d6: 4, 2 more...) + 5");
}

#[test]
fn op_types() {
	assert_eq!(Expr::Num(1.0).op_type(), OpType::Value);
	assert_eq!(Expr::Neg(num(1.0)).op_type(), OpType::Unary);
	assert_eq!(Expr::Pow(num(1.0), num(1.0)).op_type(), OpType::Exponential);
	assert!(Expr::Div(num(1.0), num(1.0)).op_type() < OpType::Unary);
	assert!(!Expr::Neg(num(1.0)).is_value());
	assert!(Evaled::Num(1.0).is_value());
}
