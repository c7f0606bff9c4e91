//! Turn white card backgrounds into alpha transparency.
//!
//! Card faces are usually scanned or rendered onto solid white. This crate
//! "unmattes" such images: every opaque pixel gets as much transparency as
//! possible while compositing the result over white still reproduces the
//! original color. Pure white becomes fully transparent, pure black is left
//! unchanged, and pixels that already carry transparency pass through.
//!
//! # Quick Start
//!
//! ```no_run
//! use card_unmatte::unmatting::unmatte;
//!
//! let img = image::open("AS.png").unwrap().to_rgba8();
//! let transparent = unmatte(&img);
//! transparent.save("AS_transparent.png").unwrap();
//! ```
//!
//! # Batch conversion
//!
//! [`process_directory`] converts every file whose name before the first `.`
//! is two characters long (`AS.webp`, `10.png`, ...) and writes the results
//! to an output directory, lossless WebP by default.
//!
//! ```no_run
//! use std::path::Path;
//! use card_unmatte::{process_directory, ProcessOptions};
//!
//! let results = process_directory(Path::new("cards"), Path::new("out"), &ProcessOptions::default());
//! for r in results.iter().filter(|r| !r.success) {
//!     eprintln!("{}: {}", r.path.display(), r.message);
//! }
//! ```

#![deny(missing_docs)]

mod engine;
pub mod error;
pub mod unmatting;

pub use engine::{
    convert_file, default_output_path, is_card_image, load_image, output_path_for,
    process_directory, process_file, save_image, OutputFormat, ProcessOptions, ProcessResult,
};
pub use error::{Error, Result};
