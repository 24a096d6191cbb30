use crate::errors::Result;
use crate::image_loader::{self, Histogram, ImageLocation};
use crate::plot::ConsolePlot;
use crate::settings::SourceConfig;
use image::GenericImageView;
use std::io::Write;

/// Load one image and print its size and console histogram to `out`.
pub fn run_plot<W: Write>(source: &str, config: &SourceConfig, out: &mut W) -> Result<()> {
    let location = ImageLocation::parse(source);
    let image = image_loader::load(&location, config)?;

    let (width, height) = image.dimensions();
    writeln!(out, "Size: {} x {}", height, width)?;

    let histogram = Histogram::from_image(&image);
    for line in ConsolePlot::new(&histogram) {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    #[test]
    fn test_console_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 50, Rgb([30, 30, 30])))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let mut out = Vec::new();
        run_plot(path.to_str().unwrap(), &SourceConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Size: 50 x 200");
        assert_eq!(lines.len(), 1 + 85);
        // 10_000 pixels in bucket 30 -> 20 dots on the line for level 30.
        assert_eq!(lines[1 + 10], format!("30 {}", ".".repeat(20)));
        assert_eq!(lines[1], "0 ");
    }

    #[test]
    fn test_console_fails_fast_on_bad_input() {
        let mut out = Vec::new();
        let err = run_plot("/no/such/image.png", &SourceConfig::default(), &mut out).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
        assert!(out.is_empty());
    }
}
