//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::CommonError;

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For projected CRS (EPSG:3857, sinusoidal), coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse a BBOX parameter string: "minx,miny,maxx,maxy"
    pub fn from_string(s: &str) -> Result<Self, CommonError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(CommonError::InvalidBbox(format!(
                "expected 4 comma-separated values, got '{}'",
                s
            )));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|_| CommonError::InvalidBbox(format!("not a number: '{}'", part)))?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Compute the intersection of two bounding boxes.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }

        Some(BoundingBox {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Unwrap an extent that crosses the antimeridian into a continuous
    /// longitude branch by shifting the eastern bound through +360.
    ///
    /// `(170, -5, -170, 5)` becomes `(170, -5, 190, 5)`. An extent that does
    /// not cross (max_x > min_x already) is returned unchanged.
    pub fn unwrap_antimeridian(&self) -> Self {
        if self.max_x > self.min_x {
            return *self;
        }
        Self {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x + 360.0,
            max_y: self.max_y,
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        // Global coverage in geographic coordinates
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }
}
