#![feature(test)]

extern crate test;

use test::Bencher;

use dicestats::{dice::roller::FastRand, Calculator};

#[bench]
fn e2e_basic(b: &mut Bencher) {
	let mut calc = Calculator::new(FastRand::default());
	b.iter(|| calc.calculate("4d8 + 4").unwrap());
}

#[bench]
fn e2e_complex(b: &mut Bencher) {
	let mut calc = Calculator::new(FastRand::default());
	b.iter(|| calc.calculate("4d8H + 2d10 * (-3d6 - 6 / 2 ^ 4)").unwrap());
}

#[bench]
fn e2e_statistics_basic(b: &mut Bencher) {
	b.iter(|| dicestats::statistics("3d6 + 5").unwrap());
}

#[bench]
fn e2e_statistics_complex(b: &mut Bencher) {
	b.iter(|| dicestats::statistics("(2d20H + 5) * 2 - 1d4 / (1d3 - 1)").unwrap());
}
