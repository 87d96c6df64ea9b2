//! Percentage-space geometry for hazard zones.
//!
//! Zones are stored on a 0-100 scale relative to the image (origin top-left),
//! independent of how large the image is drawn. A pointer event is converted
//! into that space using the box the image currently occupies on screen,
//! never its natural pixel size.

use serde::{Deserialize, Serialize};

/// Point on the 0-100 scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle on the 0-100 scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PercentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PercentRect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Edge-inclusive containment.
    ///
    /// ```
    /// use firm_games::games::hazard::{PercentPoint, PercentRect};
    ///
    /// let rect = PercentRect::new(10.0, 10.0, 20.0, 5.0);
    /// assert!(rect.contains(PercentPoint::new(30.0, 15.0)));
    /// assert!(!rect.contains(PercentPoint::new(30.1, 15.0)));
    /// ```
    #[must_use]
    pub fn contains(&self, point: PercentPoint) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// The on-screen box the image is rendered into, in client pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderedBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RenderedBox {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Convert a client-space point into percentage space.
    ///
    /// Returns `None` for a collapsed box (zero or negative size), where no
    /// meaningful conversion exists.
    #[must_use]
    pub fn to_percent(&self, client_x: f64, client_y: f64) -> Option<PercentPoint> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(PercentPoint {
            x: (client_x - self.left) / self.width * 100.0,
            y: (client_y - self.top) / self.height * 100.0,
        })
    }
}

/// A click on the image, with the box it was rendered in at the time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub rendered: RenderedBox,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(client_x: f64, client_y: f64, rendered: RenderedBox) -> Self {
        Self { client_x, client_y, rendered }
    }

    /// Build an event that lands on `point` of a 100x100 box at the origin.
    ///
    /// Handy when the caller already works in percentage space.
    #[must_use]
    pub const fn at_percent(point: PercentPoint) -> Self {
        Self {
            client_x: point.x,
            client_y: point.y,
            rendered: RenderedBox::new(0.0, 0.0, 100.0, 100.0),
        }
    }

    #[must_use]
    pub fn percent(&self) -> Option<PercentPoint> {
        self.rendered.to_percent(self.client_x, self.client_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_uses_rendered_box() {
        // 800x400 image drawn at 200x100, offset by (50, 20)
        let rendered = RenderedBox::new(50.0, 20.0, 200.0, 100.0);
        let point = rendered.to_percent(150.0, 45.0).unwrap();
        assert!((point.x - 50.0).abs() < 1e-9);
        assert!((point.y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_zone_hit_at_any_scale() {
        let zone = PercentRect::new(40.0, 40.0, 20.0, 20.0);
        for scale in [0.5, 1.0, 3.0] {
            let rendered = RenderedBox::new(0.0, 0.0, 640.0 * scale, 480.0 * scale);
            let event = PointerEvent::new(320.0 * scale, 240.0 * scale, rendered);
            assert!(zone.contains(event.percent().unwrap()));
        }
    }

    #[test]
    fn test_collapsed_box() {
        assert!(RenderedBox::new(0.0, 0.0, 0.0, 100.0).to_percent(1.0, 1.0).is_none());
    }

    #[test]
    fn test_edges_inclusive() {
        let rect = PercentRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(PercentPoint::new(0.0, 0.0)));
        assert!(rect.contains(PercentPoint::new(10.0, 10.0)));
        assert!(!rect.contains(PercentPoint::new(-0.01, 5.0)));
    }
}
