use crate::{
	dice::Dice,
	dist::{power, Distribute, Distribution, Error, Overflow},
	expr::Expr,
};

fn dist(input: &str) -> Distribution {
	input.parse::<Expr>().unwrap().distribution().unwrap()
}

fn pairs(dist: &Distribution) -> Vec<(i64, f64)> {
	dist.iter().collect()
}

#[test]
fn single_die_is_uniform() {
	for sides in [1, 2, 6, 20, 100] {
		let dist = Dice::new(1, sides).distribution().unwrap();
		assert_eq!(dist.len(), sides as usize);
		assert_eq!(dist.total(), f64::from(sides));
		assert!(dist.iter().all(|(_, count)| count == 1.0));
		assert_eq!(dist.min(), Some(1));
		assert_eq!(dist.max(), Some(i64::from(sides)));
	}
}

#[test]
fn two_d6_table() {
	assert_eq!(
		pairs(&dist("2d6")),
		vec![
			(2, 1.0),
			(3, 2.0),
			(4, 3.0),
			(5, 4.0),
			(6, 5.0),
			(7, 6.0),
			(8, 5.0),
			(9, 4.0),
			(10, 3.0),
			(11, 2.0),
			(12, 1.0)
		]
	);
}

#[test]
fn total_is_sides_to_the_count() {
	for (count, sides) in [(3, 6), (4, 4), (5, 10), (10, 20)] {
		let dice = Dice::new(count, sides);
		assert_eq!(dice.distribution().unwrap().total(), f64::from(sides).powi(i32::try_from(count).unwrap()));
	}
}

#[test]
fn keep_high_counts() {
	let dist = dist("2d20H");
	assert_eq!(dist.total(), 400.0);
	for v in 1..=20 {
		assert_eq!(dist.count(v), (2 * v - 1) as f64);
	}
}

#[test]
fn keep_low_counts() {
	let dist = dist("2d20L");
	assert_eq!(dist.total(), 400.0);
	for v in 1..=20 {
		assert_eq!(dist.count(v), (41 - 2 * v) as f64);
	}
}

#[test]
fn keep_high_of_three() {
	// P(max <= v) = v^3 / 6^3, so count(v) = v^3 - (v - 1)^3
	let dist = dist("3d6H");
	for v in 1_i32..=6 {
		let expected = v.pow(3) - (v - 1).pow(3);
		assert_eq!(dist.count(i64::from(v)), f64::from(expected));
	}
}

#[test]
fn prefix_and_suffix_modifiers_agree() {
	assert_eq!(dist("H 2d20"), dist("2d20H"));
	assert_eq!(dist("L4d6"), dist("4d6L"));
}

#[test]
fn constant_offsets() {
	let dist = dist("3d6 + 5");
	assert_eq!(dist.min(), Some(8));
	assert_eq!(dist.max(), Some(23));
	assert_eq!(dist.total(), 216.0);
}

#[test]
fn negation() {
	assert_eq!(pairs(&dist("-1d4")), vec![(-4, 1.0), (-3, 1.0), (-2, 1.0), (-1, 1.0)]);
	assert_eq!(pairs(&dist("1 - 1d4")), vec![(-3, 1.0), (-2, 1.0), (-1, 1.0), (0, 1.0)]);
}

#[test]
fn multiplication() {
	assert_eq!(pairs(&dist("2 * 1d3")), vec![(2, 1.0), (4, 1.0), (6, 1.0)]);
	assert_eq!(pairs(&dist("2(1d3)")), vec![(2, 1.0), (4, 1.0), (6, 1.0)]);
	assert_eq!(pairs(&dist("1d2 * 1d2")), vec![(1, 1.0), (2, 2.0), (4, 1.0)]);
}

#[test]
fn division_truncates() {
	assert_eq!(pairs(&dist("1d6 / 2")), vec![(0, 1.0), (1, 2.0), (2, 2.0), (3, 1.0)]);
	assert_eq!(pairs(&dist("-1d6 / 4")), vec![(-1, 3.0), (0, 3.0)]);
}

#[test]
fn division_by_zero_drops_pairs() {
	let dist = dist("1d6 / (1d2 - 1)");
	assert_eq!(dist.total(), 6.0);
	assert_eq!(pairs(&dist), vec![(1, 1.0), (2, 1.0), (3, 1.0), (4, 1.0), (5, 1.0), (6, 1.0)]);

	assert!(self::dist("1 / 0").is_empty());
}

#[test]
fn decimals_truncate() {
	assert_eq!(pairs(&dist("2.9")), vec![(2, 1.0)]);
	assert_eq!(pairs(&dist("1d2 + 0.5")), vec![(1, 1.0), (2, 1.0)]);
}

#[test]
fn powers() {
	assert_eq!(pairs(&dist("2^3^2")), vec![(64, 1.0)]);
	assert_eq!(pairs(&dist("1d3 ^ 2")), vec![(1, 1.0), (4, 1.0), (9, 1.0)]);
	assert_eq!(pairs(&dist("2 ^ (1d2 - 2)")), vec![(0, 1.0), (1, 1.0)]);
}

#[test]
fn power_edge_cases() {
	assert_eq!(power(0, 0), Ok(Some(1)));
	assert_eq!(power(5, 0), Ok(Some(1)));
	assert_eq!(power(-3, 3), Ok(Some(-27)));
	assert_eq!(power(1, -5), Ok(Some(1)));
	assert_eq!(power(-1, -2), Ok(Some(1)));
	assert_eq!(power(-1, -3), Ok(Some(-1)));
	assert_eq!(power(7, -1), Ok(Some(0)));
	assert_eq!(power(0, -1), Ok(None));
	assert_eq!(power(1, i64::MAX), Ok(Some(1)));
	assert_eq!(power(-1, i64::MAX), Ok(Some(-1)));
	assert_eq!(power(0, i64::MAX), Ok(Some(0)));
	assert_eq!(power(2, 63), Err(Overflow));
	assert_eq!(power(10, i64::MAX), Err(Overflow));
}

#[test]
fn overflow_is_reported() {
	let result = "2 ^ 64".parse::<Expr>().unwrap().distribution();
	assert!(matches!(result, Err(Error::Overflow(..))));

	let result = Dice::new(u32::MAX, u32::MAX).distribution();
	assert!(matches!(result, Err(Error::DiceOverflow(..))));
}

#[test]
fn large_pools_have_distributions() {
	let dist = Dice::new(100, 100).distribution().unwrap();
	assert_eq!(dist.min(), Some(100));
	assert_eq!(dist.max(), Some(10_000));
	assert_eq!(dist.len(), 9901);
	assert!(dist.total().is_finite());
	assert_eq!(dist.count(100), 1.0);
	assert_eq!(dist.count(101), 100.0);
	assert!(dist.count(5050) > dist.count(5049));
	assert_eq!(dist.count(5049), dist.count(5051));

	let dist = self::dist("20d100H");
	assert_eq!(dist.min(), Some(1));
	assert_eq!(dist.max(), Some(100));
	assert_eq!(dist.count(1), 1.0);
	assert!((dist.probability(100) - (1.0 - 0.99_f64.powi(20))).abs() < 1e-12);
}

#[test]
fn huge_pools_are_rescaled() {
	let dist = Dice::new(100, 1000).distribution().unwrap();
	assert_eq!(dist.min(), Some(100));
	assert_eq!(dist.max(), Some(100_000));
	assert!(dist.total().is_finite());
	assert!(dist.iter().all(|(_, weight)| weight > 0.0));

	let heavy: Distribution = [(0, 1e200), (1, 1e200)].into_iter().collect();
	let sum = heavy.combine(&heavy, |x, y| Ok(Some(x + y))).unwrap();
	assert_eq!(pairs(&sum), vec![(0, 0.25), (1, 0.5), (2, 0.25)]);
	assert_eq!(sum.probability(1), 0.5);
}

#[test]
fn distributions_are_repeatable() {
	let input = "3d6H * 2d4 - 1d8 / (1d3 - 2)";
	let expr = input.parse::<Expr>().unwrap();
	assert_eq!(expr.distribution().unwrap(), expr.distribution().unwrap());
	assert_eq!(crate::distribution(input).unwrap(), crate::distribution(input).unwrap());
	assert_eq!(crate::distribution(input).unwrap(), expr.distribution().unwrap());
}

#[test]
fn invalid_dice() {
	assert!(matches!(Dice::new(0, 6).distribution(), Err(Error::Dice(..))));
	assert!(matches!(Dice::new(3, 0).distribution(), Err(Error::Dice(..))));
}

#[test]
fn combining_leaves_inputs_untouched() {
	let a = Distribution::uniform(4);
	let b = Distribution::constant(10);
	let sum = a.combine(&b, |x, y| Ok(Some(x + y))).unwrap();
	assert_eq!(pairs(&sum), vec![(11, 1.0), (12, 1.0), (13, 1.0), (14, 1.0)]);
	assert_eq!(a, Distribution::uniform(4));
	assert_eq!(b, Distribution::constant(10));
}

#[test]
fn outcomes_are_ascending() {
	let dist = dist("1d6 - 3d4 * 2");
	let outcomes = dist.outcomes().collect::<Vec<_>>();
	assert!(outcomes.windows(2).all(|w| w[0] < w[1]));
	assert!(dist.iter().all(|(_, count)| count > 0.0));
}
