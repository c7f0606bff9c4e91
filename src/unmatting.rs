//! Color-to-alpha math for white backgrounds.
//!
//! A card scan is an image that was flattened onto white via forward alpha blending:
//! `flattened = alpha * color + (1 - alpha) * 255`
//!
//! For every opaque pixel this module picks the smallest alpha (the most
//! transparency) for which some color reproduces `flattened` exactly, and
//! returns that color with that alpha. Pure white becomes fully transparent,
//! pure black stays opaque black.

use image::{Rgb, Rgba, RgbaImage};

/// Fully opaque alpha value. Pixels below it are passed through untouched.
const OPAQUE: u8 = 255;

/// Scale a normalized value back to a channel.
///
/// Rounds to nearest with ties away from zero (`f64::round`).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Recover the transparent form of a single pixel.
///
/// Pixels that already carry transparency (`alpha < 255`) are returned
/// verbatim. For opaque pixels, the channel furthest from white decides the
/// alpha, and the remaining channels are rescaled so that compositing the
/// result over white gives back the input color.
#[must_use]
pub fn unmatte_pixel(pixel: Rgba<u8>) -> Rgba<u8> {
    let Rgba([r, g, b, a]) = pixel;
    if a < OPAQUE {
        return pixel;
    }

    let inverse = |c: u8| 1.0 - f64::from(c) / 255.0;
    let (r_inv, g_inv, b_inv) = (inverse(r), inverse(g), inverse(b));
    let max_inv = r_inv.max(g_inv).max(b_inv);

    if max_inv <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    // The dominant channel lands on exactly 0.0 here, so it survives the
    // blend with white unchanged.
    let out = |c_inv: f64| to_channel(1.0 - c_inv / max_inv);
    Rgba([out(r_inv), out(g_inv), out(b_inv), to_channel(max_inv)])
}

/// Unmatte every pixel of `image` into a newly allocated buffer.
///
/// The result has the same dimensions as the input; the input is not modified.
#[must_use]
pub fn unmatte(image: &RgbaImage) -> RgbaImage {
    let mut output = RgbaImage::new(image.width(), image.height());
    for (dst, src) in output.pixels_mut().zip(image.pixels()) {
        *dst = unmatte_pixel(*src);
    }
    output
}

/// Composite a pixel over opaque white using the standard alpha-over blend.
///
/// `result = color * alpha + 255 * (1 - alpha)`, rounded to nearest.
#[must_use]
pub fn composite_over_white(pixel: Rgba<u8>) -> Rgb<u8> {
    let Rgba([r, g, b, a]) = pixel;
    let alpha = f64::from(a) / 255.0;
    let blend = |c: u8| to_channel((f64::from(c) * alpha + 255.0 * (1.0 - alpha)) / 255.0);
    Rgb([blend(r), blend(g), blend(b)])
}
