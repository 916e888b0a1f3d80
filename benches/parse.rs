#![feature(test)]

extern crate test;

use chumsky::Parser;
use dicestats::{dice::Dice, expr::Expr};
use test::Bencher;

const LONG_EXPR: &str = "(4d6L + 2d20H * 3) / (1d4 + 1) - H 3d8 ^ 2 + 2(1d10 - 5) * -(6d6 + 12d12L) + 100d2 / 7";

#[bench]
fn parse_basic(b: &mut Bencher) {
	let parser = dicestats::parser();
	b.iter(|| parser.parse("4d8 + 4").unwrap());
}

#[bench]
fn parse_complex(b: &mut Bencher) {
	let parser = dicestats::parser();
	b.iter(|| parser.parse("4d8H + 2d10 * (-3d6 - 6 / 2 ^ 4)").unwrap());
}

#[bench]
fn parse_long(b: &mut Bencher) {
	let parser = dicestats::parser();
	b.iter(|| parser.parse(LONG_EXPR).unwrap())
}

#[bench]
fn parser_creation(b: &mut Bencher) {
	b.iter(dicestats::parser);
}

#[bench]
fn parse_from_str(b: &mut Bencher) {
	b.iter(|| "2d20H + 5".parse::<Expr>().unwrap());
}

#[bench]
fn parse_dice_from_str(b: &mut Bencher) {
	b.iter(|| "L4d6".parse::<Dice>().unwrap());
}
