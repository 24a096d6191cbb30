use crate::encode::DATA_URI_PREFIX;
use crate::image_loader::{decode_bytes, Histogram, BUCKETS};
use crate::plot::{bar_height, render_raster, ConsolePlot};
use crate::settings::{BatchConfig, PlotConfig};
use crate::task_scheduler::{process_one, ImageJob};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_decoded_histogram_sums_to_pixel_count() {
    let img = RgbImage::from_fn(123, 45, |x, y| Rgb([(x * 2) as u8, (y * 5) as u8, 17]));
    let decoded = decode_bytes("mem", &png_bytes(&img)).unwrap();

    let hist = Histogram::from_image(&decoded);
    assert_eq!(hist.total(), 123 * 45);
}

#[test]
fn test_both_renderers_see_same_histogram_differently() {
    let mut counts = [0u32; BUCKETS];
    counts[9] = 3_000;
    counts[10] = 100_000;
    counts[11] = 3_000;
    let hist = Histogram::from_counts(counts);

    let line = ConsolePlot::new(&hist).nth(3).unwrap();
    assert_eq!((line.level, line.peak, line.width), (9, 100_000, 200));

    let canvas = render_raster(&hist, &PlotConfig::default());
    assert_eq!(bar_height(&canvas, 9), 3);
    assert_eq!(bar_height(&canvas, 10), 100);
    assert_eq!(bar_height(&canvas, 11), 3);
}

#[test]
fn test_single_image_pipeline_from_url_location_fails_cleanly() {
    // Unroutable port on localhost: connection refused, not a panic.
    let job = ImageJob::new(0, "http://127.0.0.1:9/none.png");
    let mut config = BatchConfig::default();
    config.source.fetch_timeout_secs = 2;

    let err = process_one(&job, &config).unwrap_err();
    assert!(matches!(
        err,
        crate::HistError::Network { .. } | crate::HistError::Timeout { .. }
    ));
}

#[test]
fn test_custom_canvas_flows_through_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dark.png");
    std::fs::write(&path, png_bytes(&RgbImage::from_pixel(64, 64, Rgb([0, 0, 0])))).unwrap();

    let config = BatchConfig {
        plot: PlotConfig {
            canvas_width: 128,
            canvas_height: 2,
        },
        ..BatchConfig::default()
    };
    let artifact = process_one(&ImageJob::new(0, path.to_string_lossy()), &config).unwrap();

    use base64::Engine as _;
    let png = base64::engine::general_purpose::STANDARD
        .decode(artifact.data_uri.strip_prefix(DATA_URI_PREFIX).unwrap())
        .unwrap();
    let plot = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(plot.dimensions(), (128, 2));
    // 4096 pixels -> 4 rows, clipped to 2.
    assert_eq!(bar_height(&plot, 0), 2);
}
