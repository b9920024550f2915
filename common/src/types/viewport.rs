use serde::{Deserialize, Serialize};

/// The visible map region. `zoom_level` is the latitude span in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// (latitude, longitude)
    pub center: (f64, f64),
    pub zoom_level: f64,
    /// (latitude delta, longitude delta)
    pub span: (f64, f64),
}

impl Viewport {
    pub fn new(center: (f64, f64), span: (f64, f64)) -> Self {
        Self {
            center,
            zoom_level: span.0,
            span,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.center.0.is_finite()
            && self.center.1.is_finite()
            && self.zoom_level.is_finite()
            && self.span.0.is_finite()
            && self.span.1.is_finite()
    }

    /// Two viewports showing the same number of points are similar when zoom
    /// and both center coordinates differ by at most `tolerance`.
    pub fn is_similar(
        &self,
        point_count: usize,
        other: &Viewport,
        other_point_count: usize,
        tolerance: f64,
    ) -> bool {
        point_count == other_point_count
            && (self.zoom_level - other.zoom_level).abs() <= tolerance
            && (self.center.0 - other.center.0).abs() <= tolerance
            && (self.center.1 - other.center.1).abs() <= tolerance
    }
}
