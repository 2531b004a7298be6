//! Converts the red/blue-version white of already-colorized sprites back
//! to the green one, re-encoding as an adaptive indexed PNG.

#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	const_format::concatcp,
	sgbpal::{
		forEachPngFile, initLogger,
		sprite::{swapWhite, GREEN_WHITE, RED_BLUE_WHITE},
	},
	std::{env, process::exit},
};

const USAGE: &str = concatcp!("Usage: ", env!("CARGO_BIN_NAME"), " pic.png");

fn main() {
	initLogger();
	let args: Vec<String> = env::args().skip(1).collect();
	if args.is_empty() {
		eprintln!("{USAGE}");
		exit(1);
	}
	forEachPngFile(&args, |path| swapWhite(path, RED_BLUE_WHITE, GREEN_WHITE));
}
