use crate::types::TimeRange;

/// Horizontal mapping: pixels per second, scroll offset and an optional
/// lane offset (the ruler draws time 0 slightly inset). Nothing else
/// converts between time and pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub scale: f64,
    pub scroll_left: f64,
    pub lane_offset: f64,
}

impl Projector {
    pub fn new(scale: f64, scroll_left: f64) -> Self {
        Self {
            scale,
            scroll_left,
            lane_offset: 0.0,
        }
    }

    pub fn with_lane_offset(mut self, lane_offset: f64) -> Self {
        self.lane_offset = lane_offset;
        self
    }

    pub fn time_to_pixel(&self, t: f64) -> f64 {
        t * self.scale - self.scroll_left + self.lane_offset
    }

    pub fn pixel_to_time(&self, x: f64) -> f64 {
        (x - self.lane_offset + self.scroll_left) / self.scale
    }

    /// Screen span of a time range.
    pub fn range_to_pixels(&self, range: &TimeRange) -> (f64, f64) {
        (self.time_to_pixel(range.start), self.time_to_pixel(range.end))
    }

    /// Pixel width of a duration. Independent of scroll and lane offset.
    pub fn width_of(&self, seconds: f64) -> f64 {
        self.time_to_pixel(seconds) - self.time_to_pixel(0.0)
    }

    /// Duration covered by a pixel width.
    pub fn duration_of(&self, pixels: f64) -> f64 {
        self.pixel_to_time(pixels) - self.pixel_to_time(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn maps_time_to_pixel() {
        let p = Projector::new(100.0, 50.0);
        assert!((p.time_to_pixel(2.0) - 150.0).abs() < EPS);
        assert!((p.pixel_to_time(150.0) - 2.0).abs() < EPS);
    }

    #[test]
    fn roundtrip_across_scales() {
        for scale in [10.0, 37.5, 100.0, 199.0] {
            let p = Projector::new(scale, 123.25).with_lane_offset(15.0);
            for x in [-40.0, 0.0, 17.3, 640.0] {
                assert!((p.time_to_pixel(p.pixel_to_time(x)) - x).abs() < EPS);
            }
            for t in [0.0, 0.2, 4.75, 61.0] {
                assert!((p.pixel_to_time(p.time_to_pixel(t)) - t).abs() < EPS);
            }
        }
    }

    #[test]
    fn widths_ignore_scroll() {
        let p = Projector::new(80.0, 999.0).with_lane_offset(7.0);
        assert!((p.width_of(2.5) - 200.0).abs() < EPS);
        assert!((p.duration_of(40.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn range_projection() {
        let p = Projector::new(100.0, 100.0);
        let (a, b) = p.range_to_pixels(&TimeRange::new(1.0, 3.0));
        assert!((a - 0.0).abs() < EPS);
        assert!((b - 200.0).abs() < EPS);
    }
}
