//! File and directory drivers around the unmatting transform.

use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ImageError, ImageFormat, ImageReader, RgbaImage};
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::unmatting;

/// Number of characters a card file name has before its first `.`.
const CARD_NAME_LEN: usize = 2;

/// Container format for the converted images. Both keep the alpha channel losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Lossless WebP.
    #[default]
    #[cfg_attr(feature = "cli", value(name = "webp"))]
    WebP,
    /// PNG.
    Png,
}

impl OutputFormat {
    /// File extension written for this format, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Png => "png",
        }
    }

    /// The matching [`ImageFormat`].
    #[must_use]
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::WebP => ImageFormat::WebP,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// Options controlling batch conversion.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Output container format.
    pub format: OutputFormat,
    /// Stop a directory batch at the first failed file.
    pub fail_fast: bool,
    /// Enable verbose output.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input file (or directory, for batch setup failures).
    pub path: PathBuf,
    /// Path the converted image was written to, if any.
    pub output: Option<PathBuf>,
    /// Whether processing succeeded.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            output: None,
            success: false,
            message,
        }
    }
}

/// Check whether a file follows the card naming convention.
///
/// The part of the file name before the first `.` must be exactly two
/// characters, e.g. `AS.webp` (ace of spades) or `10.png`.
#[must_use]
pub fn is_card_image(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let base = name.split('.').next().unwrap_or_default();
    base.chars().count() == CARD_NAME_LEN
}

/// Output path for `input` inside `output_dir`: same file stem, extension of `format`.
///
/// Example: `"cards/10.png"` becomes `"out/10.webp"` for [`OutputFormat::WebP`].
#[must_use]
pub fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{stem}.{}", format.extension()))
}

/// Generate a default output path for single-file mode.
///
/// Example: `"AS.png"` becomes `"AS_transparent.webp"` for [`OutputFormat::WebP`].
#[must_use]
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_transparent.{}", format.extension()))
}

/// Load an image and convert it to RGBA8.
///
/// The format is guessed from the file contents, falling back to the extension.
/// Images without an alpha channel come back fully opaque.
///
/// # Errors
///
/// Returns [`Error::Read`] if the file cannot be opened and [`Error::Decode`]
/// if its contents are not a supported image.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let read_err = |source| Error::Read {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(read_err)?;
    let img = reader.decode().map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    trace!(
        "decoded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img.to_rgba8())
}

/// Encode an RGBA image and write it to `path`, creating parent directories.
///
/// The image is encoded fully in memory first, so a failed encode never leaves
/// a partial file behind.
///
/// # Errors
///
/// Returns [`Error::Io`] if the parent directory cannot be created and
/// [`Error::Encode`] if encoding or writing the file fails.
pub fn save_image(img: &RgbaImage, path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let encode_err = |source| Error::Encode {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = Vec::new();
    let encoded = match format {
        OutputFormat::WebP => img.write_with_encoder(WebPEncoder::new_lossless(&mut bytes)),
        OutputFormat::Png => img.write_with_encoder(PngEncoder::new(&mut bytes)),
    };
    encoded.map_err(encode_err)?;

    fs::write(path, &bytes).map_err(|e| encode_err(ImageError::IoError(e)))?;
    trace!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Convert one file: load, unmatte, save.
///
/// # Errors
///
/// Propagates the errors of [`load_image`] and [`save_image`].
pub fn convert_file(input: &Path, output: &Path, format: OutputFormat) -> Result<()> {
    let source = load_image(input)?;
    let converted = unmatting::unmatte(&source);
    save_image(&converted, output, format)
}

/// Process a single image file and report the outcome.
#[must_use]
pub fn process_file(input: &Path, output: &Path, opts: &ProcessOptions) -> ProcessResult {
    debug!("converting {} -> {}", input.display(), output.display());
    match convert_file(input, output, opts.format) {
        Ok(()) => ProcessResult {
            path: input.to_path_buf(),
            output: Some(output.to_path_buf()),
            success: true,
            message: format!("Written to {}", output.display()),
        },
        Err(e) => {
            debug!("conversion of {} failed: {e}", input.display());
            ProcessResult::failed(input, e.to_string())
        }
    }
}

/// Process every card image in a directory.
///
/// Only regular files accepted by [`is_card_image`] are converted, in file
/// name order; everything else is skipped silently. Each result lands in
/// `output_dir` at [`output_path_for`]. Failures are recorded and the batch
/// continues unless [`ProcessOptions::fail_fast`] is set.
#[must_use]
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    opts: &ProcessOptions,
) -> Vec<ProcessResult> {
    let mut entries: Vec<PathBuf> = match fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_card_image(p))
            .collect(),
        Err(e) => {
            return vec![ProcessResult::failed(
                input_dir,
                format!("Failed to read directory: {e}"),
            )];
        }
    };
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(
        "{} card image(s) found in {}",
        entries.len(),
        input_dir.display()
    );

    if !output_dir.exists() {
        if let Err(e) = fs::create_dir_all(output_dir) {
            return vec![ProcessResult::failed(
                output_dir,
                format!("Failed to create output directory: {e}"),
            )];
        }
    }

    let mut results = Vec::with_capacity(entries.len());
    for input_path in entries {
        let output_path = output_path_for(&input_path, output_dir, opts.format);
        let result = process_file(&input_path, &output_path, opts);
        let stop = !result.success && opts.fail_fast;
        results.push(result);
        if stop {
            debug!("stopping batch after first failure");
            break;
        }
    }
    results
}
