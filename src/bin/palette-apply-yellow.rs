//! Colorizes 4-shade grayscale sprites with the yellow version's SGB or
//! GBC palettes, selected by the leading mode argument.

#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	const_format::concatcp,
	sgbpal::{forEachPngFile, initLogger, pal::Family, sprite::colorize},
	std::{env, process::exit},
};

const USAGE: &str = concatcp!("Usage: ", env!("CARGO_BIN_NAME"), " mode palette_name pic.png");

fn main() {
	initLogger();
	let args: Vec<String> = env::args().skip(1).collect();
	if args.is_empty() {
		println!("{USAGE}");
		return;
	}
	if args[0].eq_ignore_ascii_case("-help") {
		println!(
			"{USAGE}\n\nSGB palette list and RGB888 values:\n{}\n\nGBC palette list and RGB888 values:\n{}",
			Family::YellowSgb.listing(),
			Family::YellowGbc.listing()
		);
		return;
	}
	let family = match args[0].to_lowercase().as_str() {
		"sgb" => Family::YellowSgb,
		"gbc" => Family::YellowGbc,
		_ => {
			eprintln!("Please enter a valid palette mode!\nYou can choose between sgb or gbc\n{USAGE}");
			exit(1);
		}
	};
	if args.len() == 1 {
		eprintln!("Please enter valid palette name and PNG file(s)!\n{USAGE}");
		exit(1);
	}
	let Some(target) = family.find(&args[1]) else {
		eprintln!("Incorrect palette name!\nType -help to see all palettes");
		exit(1);
	};
	if args.len() == 2 {
		eprintln!("Please enter at least one valid PNG file!\n{USAGE}");
		exit(1);
	}
	forEachPngFile(&args[2..], |path| colorize(path, &target));
}
