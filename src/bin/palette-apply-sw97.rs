//! Colorizes 4-shade grayscale sprites with the SGB palettes from the
//! 1997 Space World prototype build, normal or shiny.

#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	const_format::concatcp,
	sgbpal::{forEachPngFile, initLogger, pal::Family, sprite::colorize},
	std::{env, process::exit},
};

const USAGE: &str = concatcp!("Usage: ", env!("CARGO_BIN_NAME"), " (shiny) palette_name pic.png");

fn main() {
	initLogger();
	let args: Vec<String> = env::args().skip(1).collect();
	if args.is_empty() {
		println!("{USAGE}");
		return;
	}
	if args[0].eq_ignore_ascii_case("-help") {
		println!(
			"{USAGE}\n\nPalette list and RGB888 values:\n{}\n\nShiny palette list and RGB888 values:\n{}",
			Family::SpaceWorld97.listing(),
			Family::SpaceWorld97Shiny.listing()
		);
		return;
	}
	let (family, rest) = if args[0].eq_ignore_ascii_case("shiny") {
		(Family::SpaceWorld97Shiny, &args[1..])
	} else {
		(Family::SpaceWorld97, &args[..])
	};
	if rest.is_empty() {
		eprintln!("Please enter valid palette name and PNG file(s)!\n{USAGE}");
		exit(1);
	}
	let Some(target) = family.find(&rest[0]) else {
		eprintln!("Incorrect palette name!\nType -help to see all palettes");
		exit(1);
	};
	if rest.len() == 1 {
		eprintln!("Please enter at least one valid PNG file!\n{USAGE}");
		exit(1);
	}
	forEachPngFile(&rest[1..], |path| colorize(path, &target));
}
