use image::DynamicImage;

/// Number of brightness buckets.
pub const BUCKETS: usize = 256;

/// Pixel counts per brightness bucket (0-255).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u32; BUCKETS],
}

/// Unweighted mean of the three 8-bit channels, rounded down.
#[inline]
pub fn brightness(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

impl Histogram {
    /// Scan every pixel once and count its brightness bucket. Alpha is ignored.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let mut counts = [0u32; BUCKETS];

        for pixel in rgb.pixels() {
            counts[brightness(pixel[0], pixel[1], pixel[2]) as usize] += 1;
        }

        Self { counts }
    }

    pub fn from_counts(counts: [u32; BUCKETS]) -> Self {
        Self { counts }
    }

    pub fn counts(&self) -> &[u32; BUCKETS] {
        &self.counts
    }

    pub fn get(&self, bucket: u8) -> u32 {
        self.counts[bucket as usize]
    }

    /// Sum of all buckets, equal to the source image's pixel count.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(bucket, count)` pairs for every bucket with a nonzero count.
    pub fn nonzero_buckets(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(bucket, &count)| (bucket as u8, count))
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::from_counts([0; BUCKETS])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_two_by_two_scenario() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 255, 255]));
        img.put_pixel(1, 0, Rgb([0, 0, 0]));
        img.put_pixel(0, 1, Rgb([128, 128, 128]));
        img.put_pixel(1, 1, Rgb([128, 128, 128]));

        let hist = Histogram::from_image(&DynamicImage::ImageRgb8(img));

        assert_eq!(hist.get(255), 1);
        assert_eq!(hist.get(0), 1);
        assert_eq!(hist.get(128), 2);
        assert_eq!(hist.nonzero_buckets().count(), 3);
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn test_uniform_image_has_single_bucket() {
        let img = RgbImage::from_pixel(37, 19, Rgb([10, 40, 100]));
        let hist = Histogram::from_image(&DynamicImage::ImageRgb8(img));

        let nonzero: Vec<_> = hist.nonzero_buckets().collect();
        assert_eq!(nonzero, vec![(50, 37 * 19)]);
    }

    #[test]
    fn test_empty_image_is_all_zero() {
        let hist = Histogram::from_image(&DynamicImage::new_rgb8(0, 0));
        assert_eq!(hist, Histogram::default());
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.max_count(), 0);
    }

    #[test]
    fn test_sum_matches_pixel_count_for_gradient() {
        let img = RgbImage::from_fn(300, 7, |x, y| {
            Rgb([(x % 256) as u8, (y * 30) as u8, ((x + y) % 256) as u8])
        });
        let hist = Histogram::from_image(&DynamicImage::ImageRgb8(img));
        assert_eq!(hist.total(), 300 * 7);
    }

    #[test]
    fn test_alpha_is_ignored() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([90, 90, 90, 0]));
        let hist = Histogram::from_image(&DynamicImage::ImageRgba8(img));
        assert_eq!(hist.get(90), 16);
    }

    #[test]
    fn test_brightness_rounds_down() {
        assert_eq!(brightness(255, 255, 255), 255);
        assert_eq!(brightness(1, 1, 0), 0);
        assert_eq!(brightness(2, 2, 1), 1);
        assert_eq!(brightness(255, 0, 0), 85);
    }
}
