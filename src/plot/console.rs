use crate::image_loader::{Histogram, BUCKETS};
use std::fmt;

/// Buckets per console line.
pub const GROUP_SIZE: usize = 3;
/// Displayed width = peak * SCALE_NUMERATOR / SCALE_DENOMINATOR.
pub const SCALE_NUMERATOR: u64 = 20;
pub const SCALE_DENOMINATOR: u64 = 10_000;
pub const FILLER: char = '.';

/// One line of the console chart: a bucket triple starting at `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleLine {
    pub level: u8,
    /// Largest count among the triple's buckets.
    pub peak: u32,
    /// Number of filler characters.
    pub width: usize,
}

impl fmt::Display for ConsoleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.level)?;
        for _ in 0..self.width {
            write!(f, "{}", FILLER)?;
        }
        Ok(())
    }
}

/// Lazy bar chart over a histogram, one [`ConsoleLine`] per bucket triple.
///
/// Levels run `0, 3, ..., 252`, so 85 lines total; bucket 255 never starts
/// a triple. Clone the plot to iterate again.
#[derive(Debug, Clone)]
pub struct ConsolePlot<'a> {
    histogram: &'a Histogram,
    level: usize,
}

impl<'a> ConsolePlot<'a> {
    pub fn new(histogram: &'a Histogram) -> Self {
        Self { histogram, level: 0 }
    }

    pub fn line_count() -> usize {
        (BUCKETS - GROUP_SIZE).div_ceil(GROUP_SIZE)
    }
}

impl Iterator for ConsolePlot<'_> {
    type Item = ConsoleLine;

    fn next(&mut self) -> Option<ConsoleLine> {
        if self.level >= BUCKETS - GROUP_SIZE {
            return None;
        }

        let counts = self.histogram.counts();
        let peak = counts[self.level..self.level + GROUP_SIZE]
            .iter()
            .copied()
            .max()
            .unwrap_or(0);
        let width = (peak as u64 * SCALE_NUMERATOR / SCALE_DENOMINATOR) as usize;

        let line = ConsoleLine {
            level: self.level as u8,
            peak,
            width,
        };
        self.level += GROUP_SIZE;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (BUCKETS - GROUP_SIZE).saturating_sub(self.level).div_ceil(GROUP_SIZE);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ConsolePlot<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_85_lines() {
        let hist = Histogram::default();
        let plot = ConsolePlot::new(&hist);
        assert_eq!(plot.len(), 85);
        assert_eq!(ConsolePlot::line_count(), 85);

        let lines: Vec<_> = plot.collect();
        assert_eq!(lines.len(), 85);
        assert_eq!(lines.first().map(|l| l.level), Some(0));
        assert_eq!(lines.last().map(|l| l.level), Some(252));
        assert!(lines.iter().all(|l| l.width == 0));
    }

    #[test]
    fn test_triple_uses_peak_not_average() {
        let mut counts = [0u32; BUCKETS];
        counts[3] = 500;
        counts[4] = 10_000;
        counts[5] = 500;
        let hist = Histogram::from_counts(counts);

        let line = ConsolePlot::new(&hist).nth(1).unwrap();
        assert_eq!(line.level, 3);
        assert_eq!(line.peak, 10_000);
        assert_eq!(line.width, 20);
        assert_eq!(line.to_string(), format!("3 {}", ".".repeat(20)));
    }

    #[test]
    fn test_scale_rounds_down() {
        let mut counts = [0u32; BUCKETS];
        counts[0] = 499;
        counts[6] = 500;
        let hist = Histogram::from_counts(counts);

        let widths: Vec<_> = ConsolePlot::new(&hist).map(|l| l.width).take(3).collect();
        assert_eq!(widths, vec![0, 0, 1]);
    }

    #[test]
    fn test_bucket_255_not_plotted() {
        let mut counts = [0u32; BUCKETS];
        counts[255] = u32::MAX;
        let hist = Histogram::from_counts(counts);
        assert!(ConsolePlot::new(&hist).all(|l| l.peak == 0));
    }

    #[test]
    fn test_plot_is_restartable() {
        let mut counts = [7_000u32; BUCKETS];
        counts[100] = 90_000;
        let hist = Histogram::from_counts(counts);

        let plot = ConsolePlot::new(&hist);
        let first: Vec<_> = plot.clone().collect();
        let second: Vec<_> = plot.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_line_format() {
        let line = ConsoleLine {
            level: 42,
            peak: 0,
            width: 0,
        };
        assert_eq!(line.to_string(), "42 ");
    }
}
