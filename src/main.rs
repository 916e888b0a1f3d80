use std::{
	env,
	io::{self, IsTerminal, Write},
	ops::Range,
	process::ExitCode,
};

use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use dicestats::{dice::roller::FastRand as FastRandRoller, Calculator, Error};
use tracing_subscriber::EnvFilter;

/// Options gathered from the command line
#[derive(Debug, Default)]
struct Options {
	/// Whether to show the statistics of the expression instead of rolling it
	stats: bool,

	/// Seed for the roller, if a reproducible roll is wanted
	seed: Option<u64>,

	/// Expression text, possibly split across several arguments
	words: Vec<String>,
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(io::stderr)
		.init();

	let opts = match parse_args(env::args().skip(1)) {
		Ok(opts) => opts,
		Err(msg) => {
			eprintln!("{msg}");
			eprintln!("Usage: dicestats [--stats|-s] [--seed N] <expression...>");
			return ExitCode::FAILURE;
		}
	};

	let input = if opts.words.is_empty() {
		match read_line() {
			Ok(line) => line,
			Err(err) => {
				eprintln!("Unable to read expression: {err}");
				return ExitCode::FAILURE;
			}
		}
	} else {
		// Combine all args so the expression can be left unquoted even with spaces
		opts.words.join(" ")
	};

	let outcome = if opts.stats {
		print_statistics(&input)
	} else {
		let mut calc = opts
			.seed
			.map_or_else(Calculator::default, |seed| Calculator::new(FastRandRoller::with_seed(seed)));
		calc.calculate(&input).map(|calculation| println!("{calculation}"))
	};

	match outcome {
		Ok(()) => ExitCode::SUCCESS,
		Err(Error::Format(err)) => {
			let input = input.trim();
			let span = error_span(input, err.position);
			let report = Report::build(ReportKind::Error, span.clone())
				.with_config(Config::default().with_index_type(IndexType::Byte))
				.with_message("Invalid dice expression")
				.with_label(Label::new(span).with_message(&err.details))
				.finish()
				.eprint(Source::from(input));
			if report.is_err() {
				eprintln!("Error: {err}");
			}
			ExitCode::FAILURE
		}
		Err(err) => {
			eprintln!("Error: {err}");
			ExitCode::FAILURE
		}
	}
}

/// Gets the byte span of the character at a parse error's byte position, clamped to the input.
fn error_span(input: &str, position: usize) -> Range<usize> {
	let mut start = position.min(input.len());
	while !input.is_char_boundary(start) {
		start -= 1;
	}
	let len = input[start..].chars().next().map_or(0, char::len_utf8);
	start..start + len
}

/// Gathers the options and expression words from the command line arguments (excluding the executable name).
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
	let mut opts = Options::default();
	let mut args = args.into_iter();

	while let Some(arg) = args.next() {
		match arg.as_str() {
			"--stats" | "-s" => opts.stats = true,
			"--seed" => {
				let seed = args.next().ok_or("--seed requires a value")?;
				opts.seed = Some(seed.parse().map_err(|err| format!("Invalid seed \"{seed}\": {err}"))?);
			}
			_ => opts.words.push(arg),
		}
	}

	Ok(opts)
}

/// Reads a single expression line from stdin, prompting for it first if stdin is interactive.
fn read_line() -> io::Result<String> {
	let stdin = io::stdin();
	if stdin.is_terminal() {
		print!("Enter dice expression: ");
		io::stdout().flush()?;
	}

	let mut line = String::new();
	stdin.read_line(&mut line)?;
	Ok(line)
}

/// Prints the statistics of an expression along with the likelihood of every outcome.
fn print_statistics(input: &str) -> Result<(), Error> {
	let stats = dicestats::statistics(input)?;

	println!("Range: {} to {}", stats.min_value, stats.max_value);
	if stats.total < 1e15 {
		println!("Combinations: {:.0}", stats.total);
	} else {
		println!("Combinations: {:.4e}", stats.total);
	}
	println!("Average: {:.4}", stats.average);
	println!("Most common: {}", stats.most_common);
	println!();

	let max = stats.max_percentage();
	for (outcome, pct) in stats.sorted_percentages() {
		let bar = if max > 0.0 { "#".repeat((pct / max * 40.0).round() as usize) } else { String::new() };
		println!("{outcome:>6} {pct:>8.4}% {bar}");
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_span_uses_byte_offsets() {
		let input = "é + $";
		let span = error_span(input, input.find('$').unwrap());
		assert_eq!(span, 5..6);
		assert_eq!(&input[span], "$");

		let input = "1 + é";
		let span = error_span(input, 4);
		assert_eq!(&input[span], "é");
	}

	#[test]
	fn error_span_is_clamped() {
		assert_eq!(error_span("1 +", 3), 3..3);
		assert_eq!(error_span("1 +", 10), 3..3);
		assert_eq!(error_span("é", 1), 0..2);
	}

	#[test]
	fn args_are_parsed() {
		let opts = parse_args(["--stats", "--seed", "7", "2d6", "+", "1"].map(String::from)).unwrap();
		assert!(opts.stats);
		assert_eq!(opts.seed, Some(7));
		assert_eq!(opts.words.join(" "), "2d6 + 1");
		assert!(parse_args(["--seed".to_owned()]).is_err());
	}
}
