#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

pub const RGB_SIZE: usize = 3;
pub const RGBA_SIZE: usize = 4;
pub const NUM_SHADES: usize = 4;

pub mod rgb {
	use glam::IVec3;

	pub const CHANNEL_MAX: i32 = 31;
	pub const BLACK: IVec3 = IVec3::ZERO;
	pub const WHITE: IVec3 = IVec3 { x: CHANNEL_MAX, y: CHANNEL_MAX, z: CHANNEL_MAX };

	#[inline]
	pub fn rgb8ToRgb5(c: IVec3) -> IVec3 {
		c / 8
	}

	// Nominal inverse of rgb8ToRgb5: the dropped low bits stay gone, so the
	// round-trip is only guaranteed for 5-bit inputs, not arbitrary 8-bit ones.
	#[inline]
	pub fn rgb5ToRgb8(c: IVec3) -> IVec3 {
		c * 8 + c / 4
	}

	#[inline]
	pub fn invert(c: IVec3) -> IVec3 {
		IVec3::splat(CHANNEL_MAX) - c
	}

	// Squares the raw 5-bit channels. Shade order of every already-converted
	// asset depends on this exact form, photometric or not.
	pub fn luminance(c: IVec3) -> f64 {
		let squared = c * c;
		0.299 * f64::from(squared.x) + 0.587 * f64::from(squared.y) + 0.114 * f64::from(squared.z)
	}

	#[cfg(test)]
	mod tests {
		use {
			super::{invert, luminance, rgb5ToRgb8, rgb8ToRgb5, BLACK, WHITE},
			crate::pal::Family,
			glam::IVec3,
		};

		#[test]
		fn rgb5ToRgb8KnownValues() {
			assert_eq!(rgb5ToRgb8(WHITE), IVec3::new(255, 255, 255));
			assert_eq!(rgb5ToRgb8(IVec3::new(30, 31, 29)), IVec3::new(247, 255, 239));
			assert_eq!(rgb5ToRgb8(IVec3::new(21, 21, 21)), IVec3::new(173, 173, 173));
			assert_eq!(rgb5ToRgb8(IVec3::new(10, 10, 10)), IVec3::new(82, 82, 82));
			assert_eq!(rgb5ToRgb8(BLACK), BLACK);
		}

		#[test]
		fn tableShadesSurviveTheRoundTrip() {
			for family in Family::ALL {
				for &(name, shades) in family.table() {
					for shade in shades.map(IVec3::from_array) {
						assert_eq!(rgb8ToRgb5(rgb5ToRgb8(shade)), shade, "{family:?} {name}");
					}
				}
			}
		}

		#[test]
		fn invertMirrorsEveryChannel() {
			assert_eq!(invert(IVec3::new(31, 0, 0)), IVec3::new(0, 31, 31));
			assert_eq!(invert(WHITE), BLACK);
			assert_eq!(invert(invert(IVec3::new(7, 19, 2))), IVec3::new(7, 19, 2));
		}

		#[test]
		fn luminanceOrdersShadesDarkestLast() {
			let descending = [WHITE, IVec3::new(21, 21, 21), IVec3::new(10, 10, 10), BLACK];
			for pair in descending.windows(2) {
				assert!(luminance(pair[0]) > luminance(pair[1]));
			}
			// green outweighs red outweighs blue
			assert!(luminance(IVec3::new(0, 31, 31)) > luminance(IVec3::new(31, 0, 0)));
			assert!(luminance(IVec3::new(31, 0, 0)) > luminance(IVec3::new(0, 0, 31)));
		}
	}
}

pub mod pal {
	use {
		crate::{rgb::rgb5ToRgb8, NUM_SHADES, RGB_SIZE},
		glam::IVec3,
	};

	pub const NUM_PALETTES: usize = 10;

	// 5-bit shades, lightest first, as they go into a PLTE after widening.
	pub type Shades = [[i32; RGB_SIZE]; NUM_SHADES];

	#[derive(Clone, Copy, PartialEq, Eq, Debug)]
	pub enum Family {
		Gen1,
		SpaceWorld97,
		SpaceWorld97Shiny,
		YellowSgb,
		YellowGbc,
	}

	impl Family {
		pub const ALL: [Family; 5] = [
			Family::Gen1,
			Family::SpaceWorld97,
			Family::SpaceWorld97Shiny,
			Family::YellowSgb,
			Family::YellowGbc,
		];

		pub fn table(self) -> &'static [(&'static str, Shades); NUM_PALETTES] {
			match self {
				Family::Gen1 => &GEN1,
				Family::SpaceWorld97 => &SPACE_WORLD_97,
				Family::SpaceWorld97Shiny => &SPACE_WORLD_97_SHINY,
				Family::YellowSgb => &YELLOW_SGB,
				Family::YellowGbc => &YELLOW_GBC,
			}
		}

		pub fn find(self, name: &str) -> Option<[IVec3; NUM_SHADES]> {
			let name = name.to_lowercase();
			self.table()
				.iter()
				.find(|&&(paletteName, _)| paletteName == name)
				.map(|&(_, shades)| shades.map(IVec3::from_array))
		}

		// One "- name: (r, g, b), ..." line per palette, in RGB888, for -help.
		pub fn listing(self) -> String {
			let lines: Vec<String> = self
				.table()
				.iter()
				.map(|&(name, shades)| {
					let [white, light, dark, black] = shades.map(|shade| {
						let IVec3 { x, y, z } = rgb5ToRgb8(IVec3::from_array(shade));
						format!("({x}, {y}, {z})")
					});
					format!("- {name}: {white}, {light}, {dark}, {black}")
				})
				.collect();
			lines.join("\n")
		}
	}

	static GEN1: [(&str, Shades); NUM_PALETTES] = [
		("mewmon", [[30, 31, 29], [30, 22, 17], [16, 14, 19], [3, 2, 2]]),
		("bluemon", [[30, 31, 29], [18, 20, 27], [11, 15, 23], [3, 2, 2]]),
		("redmon", [[30, 31, 29], [31, 20, 10], [26, 10, 6], [3, 2, 2]]),
		("cyanmon", [[30, 31, 29], [21, 25, 29], [14, 19, 25], [3, 2, 2]]),
		("purplemon", [[30, 31, 29], [27, 22, 24], [21, 15, 23], [3, 2, 2]]),
		("brownmon", [[30, 31, 29], [28, 20, 15], [21, 14, 9], [3, 2, 2]]),
		("greenmon", [[30, 31, 29], [20, 26, 16], [9, 20, 11], [3, 2, 2]]),
		("pinkmon", [[30, 31, 29], [30, 22, 24], [28, 15, 21], [3, 2, 2]]),
		("yellowmon", [[30, 31, 29], [31, 28, 14], [26, 20, 0], [3, 2, 2]]),
		("graymon", [[30, 31, 29], [26, 21, 22], [15, 15, 18], [3, 2, 2]]),
	];

	static SPACE_WORLD_97: [(&str, Shades); NUM_PALETTES] = [
		("mewmon", [[28, 28, 28], [30, 22, 17], [16, 14, 19], [4, 4, 4]]),
		("bluemon", [[28, 28, 28], [18, 20, 27], [11, 15, 23], [4, 4, 4]]),
		("redmon", [[28, 28, 28], [31, 20, 10], [26, 10, 6], [4, 4, 4]]),
		("cyanmon", [[28, 28, 28], [21, 25, 29], [14, 19, 25], [4, 4, 4]]),
		("purplemon", [[28, 28, 28], [27, 22, 24], [21, 15, 23], [4, 4, 4]]),
		("brownmon", [[28, 28, 28], [28, 20, 15], [21, 14, 9], [4, 4, 4]]),
		("greenmon", [[28, 28, 28], [20, 26, 16], [9, 20, 11], [4, 4, 4]]),
		("pinkmon", [[28, 28, 28], [30, 22, 24], [28, 15, 21], [4, 4, 4]]),
		("yellowmon", [[28, 28, 28], [31, 28, 14], [26, 20, 0], [4, 4, 4]]),
		("graymon", [[28, 28, 28], [26, 21, 22], [15, 15, 18], [4, 4, 4]]),
	];

	static SPACE_WORLD_97_SHINY: [(&str, Shades); NUM_PALETTES] = [
		("mewmon", [[28, 28, 28], [23, 19, 13], [14, 12, 17], [4, 4, 4]]),
		("bluemon", [[28, 28, 28], [16, 18, 21], [10, 12, 18], [4, 4, 4]]),
		("redmon", [[28, 28, 28], [22, 15, 16], [17, 2, 5], [4, 4, 4]]),
		("cyanmon", [[28, 28, 28], [15, 20, 20], [5, 16, 16], [4, 4, 4]]),
		("purplemon", [[28, 28, 28], [23, 15, 19], [14, 4, 12], [4, 4, 4]]),
		("brownmon", [[28, 28, 28], [20, 17, 18], [18, 13, 11], [4, 4, 4]]),
		("greenmon", [[28, 28, 28], [23, 21, 16], [12, 12, 10], [4, 4, 4]]),
		("pinkmon", [[28, 28, 28], [21, 25, 29], [30, 22, 24], [4, 4, 4]]),
		("yellowmon", [[28, 28, 28], [26, 23, 16], [29, 14, 9], [4, 4, 4]]),
		("graymon", [[28, 28, 28], [18, 18, 18], [10, 10, 10], [4, 4, 4]]),
	];

	static YELLOW_SGB: [(&str, Shades); NUM_PALETTES] = [
		("mewmon", [[31, 31, 30], [31, 30, 2], [27, 16, 16], [6, 6, 6]]),
		("bluemon", [[31, 31, 30], [21, 22, 31], [9, 10, 20], [6, 6, 6]]),
		("redmon", [[31, 31, 30], [31, 24, 11], [26, 9, 6], [6, 6, 6]]),
		("cyanmon", [[31, 31, 30], [26, 28, 31], [7, 24, 28], [6, 6, 6]]),
		("purplemon", [[31, 31, 30], [27, 22, 30], [22, 15, 23], [6, 6, 6]]),
		("brownmon", [[31, 31, 30], [26, 23, 18], [18, 14, 10], [6, 6, 6]]),
		("greenmon", [[31, 31, 30], [24, 28, 18], [13, 21, 15], [6, 6, 6]]),
		("pinkmon", [[31, 31, 30], [31, 24, 26], [31, 18, 21], [6, 6, 6]]),
		("yellowmon", [[31, 31, 30], [31, 31, 19], [28, 23, 9], [6, 6, 6]]),
		("graymon", [[31, 31, 30], [25, 25, 18], [16, 16, 14], [6, 6, 6]]),
	];

	static YELLOW_GBC: [(&str, Shades); NUM_PALETTES] = [
		("mewmon", [[31, 31, 31], [31, 31, 0], [31, 1, 1], [3, 3, 3]]),
		("bluemon", [[31, 31, 31], [16, 18, 31], [0, 1, 25], [3, 3, 3]]),
		("redmon", [[31, 31, 31], [31, 17, 0], [31, 0, 0], [3, 3, 3]]),
		("cyanmon", [[31, 31, 31], [16, 26, 31], [0, 17, 31], [3, 3, 3]]),
		("purplemon", [[31, 31, 31], [25, 15, 31], [19, 0, 2], [3, 3, 3]]),
		("brownmon", [[31, 31, 31], [29, 18, 10], [17, 9, 5], [3, 3, 3]]),
		("greenmon", [[31, 31, 31], [17, 31, 11], [1, 22, 6], [3, 3, 3]]),
		("pinkmon", [[31, 31, 31], [31, 15, 18], [31, 0, 6], [3, 3, 3]]),
		("yellowmon", [[31, 31, 31], [31, 31, 0], [28, 14, 0], [3, 3, 3]]),
		("graymon", [[31, 31, 31], [20, 23, 10], [11, 11, 5], [3, 3, 3]]),
	];

	#[cfg(test)]
	mod tests {
		use {
			super::{Family, NUM_PALETTES},
			crate::rgb::CHANNEL_MAX,
			glam::IVec3,
		};

		#[test]
		fn tablesAreWellFormed() {
			for family in Family::ALL {
				let mut names = Vec::new();
				for &(name, shades) in family.table() {
					assert_eq!(name, name.to_lowercase(), "{family:?}");
					assert!(!names.contains(&name), "{family:?} {name}");
					names.push(name);
					for channel in shades.into_iter().flatten() {
						assert!((0..=CHANNEL_MAX).contains(&channel), "{family:?} {name}");
					}
				}
				assert_eq!(names.len(), NUM_PALETTES);
			}
		}

		#[test]
		fn everyFamilySharesTheSameNames() {
			let gen1Names: Vec<&str> = Family::Gen1.table().iter().map(|&(name, _)| name).collect();
			for family in Family::ALL {
				let names: Vec<&str> = family.table().iter().map(|&(name, _)| name).collect();
				assert_eq!(names, gen1Names, "{family:?}");
			}
		}

		#[test]
		fn findIsCaseInsensitive() {
			let redmon = Family::Gen1.find("REDMON").unwrap();
			assert_eq!(redmon[0], IVec3::new(30, 31, 29));
			assert_eq!(redmon[1], IVec3::new(31, 20, 10));
			assert_eq!(redmon, Family::Gen1.find("redmon").unwrap());
			assert!(Family::Gen1.find("bogusname").is_none());
		}

		#[test]
		fn shinyAndGbcTablesReallyDiffer() {
			assert_ne!(Family::SpaceWorld97.find("redmon"), Family::SpaceWorld97Shiny.find("redmon"));
			assert_ne!(Family::YellowSgb.find("redmon"), Family::YellowGbc.find("redmon"));
		}

		#[test]
		fn listingMatchesTheHelpFormat() {
			let listing = Family::Gen1.listing();
			assert_eq!(listing.lines().count(), NUM_PALETTES);
			assert_eq!(
				listing.lines().next().unwrap(),
				"- mewmon: (247, 255, 239), (247, 181, 140), (132, 115, 156), (24, 16, 16)"
			);
			assert!(listing.lines().all(|line| line.starts_with("- ")));
		}
	}
}

pub mod sprite {
	use {
		crate::{
			rgb::{invert, luminance, rgb5ToRgb8, rgb8ToRgb5, BLACK, WHITE},
			NUM_SHADES, RGBA_SIZE, RGB_SIZE,
		},
		glam::IVec3,
		png::{BitDepth, ColorType, Compression, Transformations},
		std::{
			fs::File,
			io::{self, BufWriter},
			path::Path,
		},
		thiserror::Error,
	};

	// The white triplets the two swap tools exchange, in RGB888. Each is the
	// widened form of the matching family's lightest shade.
	pub const GREEN_WHITE: [u8; RGB_SIZE] = [247, 255, 239];
	pub const RED_BLUE_WHITE: [u8; RGB_SIZE] = [255, 239, 255];

	const SWAP_MAX_COLORS: u32 = 5;

	const GRAYSCALE_PALETTES: [[IVec3; NUM_SHADES]; 2] = [
		[WHITE, IVec3 { x: 21, y: 21, z: 21 }, IVec3 { x: 10, y: 10, z: 10 }, BLACK],
		[WHITE, IVec3 { x: 20, y: 20, z: 20 }, IVec3 { x: 10, y: 10, z: 10 }, BLACK],
	];

	#[derive(Debug, Error)]
	pub enum SpriteError {
		#[error("{0} colors beside black and white, a 4-shade sprite has at most 2")]
		TooManyColors(usize),
		#[error("palette {0:?} is not one of the plain grayscale forms")]
		NotGrayscale([IVec3; NUM_SHADES]),
		#[error("color {0} is missing from the resolved palette")]
		StrayColor(IVec3),
		#[error(transparent)]
		Decode(#[from] png::DecodingError),
		#[error(transparent)]
		Encode(#[from] png::EncodingError),
		#[error(transparent)]
		Quantize(#[from] imagequant::Error),
		#[error(transparent)]
		Io(#[from] io::Error),
	}

	pub struct Sprite {
		pub width: u32,
		pub height: u32,
		pub rgba: Vec<u8>,
	}

	impl Sprite {
		// Decodes any PNG the codec expands to 8-bit samples and widens the
		// result to interleaved RGBA8 rows.
		pub fn load(path: &Path) -> Result<Sprite, SpriteError> {
			let mut decoder = png::Decoder::new(File::open(path)?);
			decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
			let mut reader = decoder.read_info()?;
			let mut data = vec![0; reader.output_buffer_size()];
			let info = reader.next_frame(&mut data)?;
			data.truncate(info.buffer_size());
			let rgba = match info.color_type {
				ColorType::Rgba => data,
				ColorType::Rgb => {
					data.chunks_exact(RGB_SIZE).flat_map(|px| [px[0], px[1], px[2], u8::MAX]).collect()
				}
				ColorType::Grayscale => data.iter().flat_map(|&v| [v, v, v, u8::MAX]).collect(),
				ColorType::GrayscaleAlpha => {
					data.chunks_exact(2).flat_map(|px| [px[0], px[0], px[0], px[1]]).collect()
				}
				// EXPAND already turned indexed data into its RGB expansion
				ColorType::Indexed => unreachable!(),
			};
			Ok(Sprite { width: info.width, height: info.height, rgba })
		}
	}

	// Lazy 5-bit view of interleaved RGBA8 bytes; alpha is read but ignored.
	pub fn rgb5Pixels(rgba: &[u8]) -> impl Iterator<Item = IVec3> + '_ {
		rgba.chunks_exact(RGBA_SIZE).map(|px| rgb8ToRgb5(IVec3::new(px[0] as _, px[1] as _, px[2] as _)))
	}

	// Distinct foreground tones in first-seen order, pure black and pure white excluded.
	pub fn foregroundColors(rgba: &[u8]) -> Vec<IVec3> {
		let mut colors = Vec::new();
		for color in rgb5Pixels(rgba) {
			if color != BLACK && color != WHITE && !colors.contains(&color) {
				colors.push(color);
			}
		}
		colors
	}

	/*
		Palette resolution:

		0 foreground tones -> the two mid-gray stand-ins
		1 foreground tone  -> the tone and its inverse
		2 foreground tones -> as sampled
		3 or more          -> not a 4-shade sprite, fail

		The two tones plus black and white, sorted by luminance descending,
		are the palette: index 0 lightest, index 3 darkest.
	*/
	pub fn resolvePalette(foreground: &[IVec3]) -> Result<[IVec3; NUM_SHADES], SpriteError> {
		let mut tones = match *foreground {
			[] => vec![IVec3 { x: 21, y: 21, z: 21 }, IVec3 { x: 10, y: 10, z: 10 }],
			[tone] => vec![tone, invert(tone)],
			[_, _] => foreground.to_vec(),
			_ => return Err(SpriteError::TooManyColors(foreground.len())),
		};
		tones.extend([BLACK, WHITE]);
		tones.sort_by(|a, b| luminance(*b).total_cmp(&luminance(*a)));
		assert_eq!(tones.len(), NUM_SHADES);
		Ok([tones[0], tones[1], tones[2], tones[3]])
	}

	pub fn isGrayscale(palette: &[IVec3; NUM_SHADES]) -> bool {
		GRAYSCALE_PALETTES.iter().any(|grayscale| palette == grayscale)
	}

	// Every pixel becomes its 0..4 position within the palette. A color outside
	// the palette means the sampler and resolver did not cover the image.
	pub fn reindex(rgba: &[u8], palette: &[IVec3; NUM_SHADES]) -> Result<Vec<u8>, SpriteError> {
		rgb5Pixels(rgba)
			.map(|color| {
				palette
					.iter()
					.position(|&shade| shade == color)
					.map(|index| index as u8)
					.ok_or(SpriteError::StrayColor(color))
			})
			.collect()
	}

	pub fn writeIndexed(
		path: &Path, width: u32, height: u32, indices: &[u8], palette: Vec<u8>,
	) -> Result<(), SpriteError> {
		let mut png = png::Encoder::new(BufWriter::new(File::create(path)?), width, height);
		png.set_color(ColorType::Indexed);
		png.set_depth(BitDepth::Eight);
		png.set_palette(palette);
		png.set_compression(Compression::Best);
		png.write_header()?.write_image_data(indices)?;
		Ok(())
	}

	/*
		colorize:

		decode -> sample foreground tones -> resolve the 4-shade palette
		-> reject anything but the two plain grayscale forms, before the file
		   is touched -> re-index every pixel -> overwrite as an indexed PNG
		   whose PLTE is the target family entry widened to RGB888
	*/
	pub fn colorize(path: &Path, target: &[IVec3; NUM_SHADES]) -> Result<(), SpriteError> {
		let sprite = Sprite::load(path)?;
		let palette = resolvePalette(&foregroundColors(&sprite.rgba))?;
		if !isGrayscale(&palette) {
			return Err(SpriteError::NotGrayscale(palette));
		}
		let indices = reindex(&sprite.rgba, &palette)?;
		let palette8 = target
			.iter()
			.flat_map(|&shade| {
				let IVec3 { x, y, z } = rgb5ToRgb8(shade);
				[x as u8, y as u8, z as u8]
			})
			.collect();
		writeIndexed(path, sprite.width, sprite.height, &indices, palette8)
	}

	// Exact-triplet white swap over RGB888 data, then an adaptive-palette
	// re-encode capped at SWAP_MAX_COLORS entries, overwriting the input.
	pub fn swapWhite(path: &Path, from: [u8; RGB_SIZE], to: [u8; RGB_SIZE]) -> Result<(), SpriteError> {
		let Sprite { width, height, rgba } = Sprite::load(path)?;
		let pixels: Vec<imagequant::RGBA> = rgba
			.chunks_exact(RGBA_SIZE)
			.map(|px| {
				let [r, g, b] = if [px[0], px[1], px[2]] == from { to } else { [px[0], px[1], px[2]] };
				imagequant::RGBA { r, g, b, a: u8::MAX }
			})
			.collect();
		let mut liq = imagequant::new();
		liq.set_max_colors(SWAP_MAX_COLORS)?;
		let mut image = liq.new_image(&pixels[..], width as usize, height as usize, 0.0)?;
		let mut result = liq.quantize(&mut image)?;
		let (palette, indices) = result.remapped(&mut image)?;
		let palette = palette.iter().flat_map(|color| [color.r, color.g, color.b]).collect();
		writeIndexed(path, width, height, &indices, palette)
	}

}

use {crate::sprite::SpriteError, log::warn, std::path::Path};

pub fn initLogger() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
		.format_timestamp(None)
		.init();
}

// The batch boundary: every per-file failure becomes one stderr line and the
// run moves on. Only argument validation, upstream in the binaries, is fatal.
pub fn forEachPngFile(paths: &[String], mut perFile: impl FnMut(&Path) -> Result<(), SpriteError>) {
	for path in paths {
		if !path.to_lowercase().ends_with(".png") {
			warn!("{path} is not a .png file!");
			continue;
		}
		if let Err(error) = perFile(Path::new(path)) {
			warn!("{path}: {error}");
		}
	}
}

#[cfg(test)]
mod tests {
	use {
		super::{forEachPngFile, sprite::SpriteError},
		std::path::PathBuf,
	};

	#[test]
	fn batchSkipsNonPngAndKeepsGoingPastFailures() {
		let args = ["sprite.txt".to_string(), "a.png".to_string(), "B.PNG".to_string()];
		let mut seen = Vec::new();
		forEachPngFile(&args, |path| {
			seen.push(path.to_path_buf());
			if seen.len() == 1 {
				Err(SpriteError::TooManyColors(3))
			} else {
				Ok(())
			}
		});
		assert_eq!(seen, [PathBuf::from("a.png"), PathBuf::from("B.PNG")]);
	}
}
