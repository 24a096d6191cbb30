use crate::image_loader::Histogram;
use crate::settings::PlotConfig;
use image::{Rgba, RgbaImage};

/// Pixel count represented by one marked row.
pub const PIXELS_PER_ROW: u32 = 1000;
pub const BAR_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Draw one bottom-anchored column per bucket on a transparent canvas.
///
/// Column `x` is bucket `x`; its height is `count / PIXELS_PER_ROW` rows,
/// clipped to the canvas. Buckets past the canvas width are dropped.
pub fn render_raster(histogram: &Histogram, config: &PlotConfig) -> RgbaImage {
    let (width, height) = (config.canvas_width, config.canvas_height);
    let mut canvas = RgbaImage::new(width, height);

    for (x, &count) in histogram.counts().iter().enumerate() {
        let x = x as u32;
        if x >= width {
            break;
        }

        let run = (count / PIXELS_PER_ROW).min(height);
        for y in (height - run)..height {
            canvas.put_pixel(x, y, BAR_COLOR);
        }
    }

    canvas
}

/// Rows marked in `column`, counted from the bottom.
pub fn bar_height(canvas: &RgbaImage, column: u32) -> u32 {
    (0..canvas.height())
        .rev()
        .take_while(|&y| canvas.get_pixel(column, y)[3] != 0)
        .count() as u32
}
