//! Colorizes 4-shade grayscale sprites with one of the first-generation
//! SGB palettes. Images become indexed, with a palette sorted
//! {white, light color, dark color, black}.

#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	const_format::concatcp,
	sgbpal::{forEachPngFile, initLogger, pal::Family, sprite::colorize},
	std::{env, process::exit},
};

const USAGE: &str = concatcp!("Usage: ", env!("CARGO_BIN_NAME"), " palette_name pic.png");

fn main() {
	initLogger();
	let args: Vec<String> = env::args().skip(1).collect();
	if args.is_empty() {
		println!("{USAGE}");
		return;
	}
	if args[0].eq_ignore_ascii_case("-help") {
		println!("{USAGE}\n\nPalette list and RGB888 values:\n{}", Family::Gen1.listing());
		return;
	}
	let Some(target) = Family::Gen1.find(&args[0]) else {
		eprintln!("Incorrect palette name!\nType -help to see all palettes");
		exit(1);
	};
	if args.len() == 1 {
		eprintln!("Please enter at least one valid PNG file!\n{USAGE}");
		exit(1);
	}
	forEachPngFile(&args[1..], |path| colorize(path, &target));
}
