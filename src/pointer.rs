//! Pointer tracking: turns a cursor position into a face target.

use crate::face::FaceParameters;

/// Axis-aligned box in client coordinates (mirrors `DOMRect`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Geometry captured at the moment of a pointer move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub container: Rect,
    pub happy: Rect,
    pub unhappy: Rect,
}

fn distance(x: f64, y: f64, (cx, cy): (f64, f64)) -> f64 {
    let dx = x - cx;
    let dy = y - cy;
    (dx * dx + dy * dy).sqrt()
}

/// `(d_unhappy / (d_unhappy + d_happy))^exponent`: 1 on the happy button, 0 on the unhappy one.
pub fn happiness_target(sample: &PointerSample, exponent: f64) -> f64 {
    let dist_unhappy = distance(sample.x, sample.y, sample.unhappy.center());
    let dist_happy = distance(sample.x, sample.y, sample.happy.center());
    let total = dist_unhappy + dist_happy;
    // Both centers coincide under the pointer: treat as equidistant.
    let ratio = if total > 0.0 { dist_unhappy / total } else { 0.5 };
    ratio.powf(exponent)
}

/// Pointer position relative to the container, unclamped.
pub fn normalized_position(sample: &PointerSample) -> (f64, f64) {
    let c = &sample.container;
    let px = if c.width > 0.0 { (sample.x - c.x) / c.width } else { 0.5 };
    let py = if c.height > 0.0 { (sample.y - c.y) / c.height } else { 0.5 };
    (px, py)
}

/// Face target for a pointer move. Any pointer interaction clears `derp`.
pub fn track(sample: &PointerSample, exponent: f64) -> FaceParameters {
    let (px, py) = normalized_position(sample);
    FaceParameters {
        happiness: happiness_target(sample, exponent),
        derp: 0.0,
        px,
        py,
    }
}
