//! Color encoding and image output.
//!
//! Pixels arrive as raw sample sums; encoding averages over the sample
//! count, gamma-corrects, and quantizes to 8-bit channels. Output formats
//! are ASCII PPM ("P3") and PNG through the `image` crate.

use crate::integrator::ImageBuffer;
use crate::material::Color;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Encode an accumulated pixel sum as 8-bit RGB.
///
/// Averages over the sample count, gamma-corrects each channel, clamps to
/// [0, 0.999], scales by 256, and truncates.
pub fn encode_color(pixel_sum: Color, samples_per_pixel: u32) -> [u8; 3] {
    let scale = 1.0 / samples_per_pixel as f64;
    let r = linear_to_gamma(scale * pixel_sum.x);
    let g = linear_to_gamma(scale * pixel_sum.y);
    let b = linear_to_gamma(scale * pixel_sum.z);

    [
        (256.0 * r.clamp(0.0, 0.999)) as u8,
        (256.0 * g.clamp(0.0, 0.999)) as u8,
        (256.0 * b.clamp(0.0, 0.999)) as u8,
    ]
}

/// Write the image as ASCII PPM ("P3"), rows from the top edge down.
pub fn write_ppm<W: Write>(writer: &mut W, image: &ImageBuffer) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b] = encode_color(image.get(x, y), image.samples_per_pixel);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
    }

    Ok(())
}

/// Save the image as a PPM file.
pub fn save_ppm(image: &ImageBuffer, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ppm(&mut writer, image)?;
    writer.flush()
}

/// Save the image as a PNG file.
pub fn save_png(image: &ImageBuffer, path: &Path) -> Result<(), image::ImageError> {
    let mut out = image::RgbImage::new(image.width, image.height);

    for y in 0..image.height {
        for x in 0..image.width {
            let rgb = encode_color(image.get(x, y), image.samples_per_pixel);
            out.put_pixel(x, y, image::Rgb(rgb));
        }
    }

    out.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_white_single_sample() {
        assert_eq!(encode_color(Color::new(1.0, 1.0, 1.0), 1), [255, 255, 255]);
    }

    #[test]
    fn test_encode_black_any_samples() {
        assert_eq!(encode_color(Color::ZERO, 1), [0, 0, 0]);
        assert_eq!(encode_color(Color::ZERO, 100), [0, 0, 0]);
    }

    #[test]
    fn test_encode_averages_over_samples() {
        // Four samples summing to (1, 1, 1): average 0.25, gamma 0.5
        assert_eq!(encode_color(Color::new(1.0, 1.0, 1.0), 4), [128, 128, 128]);
    }

    #[test]
    fn test_encode_clamps_overbright() {
        assert_eq!(encode_color(Color::new(40.0, 40.0, 40.0), 1), [255, 255, 255]);
    }

    #[test]
    fn test_encode_negative_maps_to_zero() {
        assert_eq!(encode_color(Color::new(-1.0, -0.5, 0.0), 1), [0, 0, 0]);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(1.0), 1.0);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ppm_single_white_pixel() {
        let mut image = ImageBuffer::new(1, 1, 1);
        image.set(0, 0, Color::new(1.0, 1.0, 1.0));

        let mut out = Vec::new();
        write_ppm(&mut out, &image).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "P3\n1 1\n255\n255 255 255\n");
    }

    #[test]
    fn test_ppm_rows_run_top_to_bottom() {
        let mut image = ImageBuffer::new(1, 2, 1);
        image.set(0, 0, Color::new(1.0, 1.0, 1.0)); // top row
        image.set(0, 1, Color::ZERO); // bottom row

        let mut out = Vec::new();
        write_ppm(&mut out, &image).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "P3\n1 2\n255\n255 255 255\n0 0 0\n"
        );
    }
}
