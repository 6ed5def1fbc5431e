//! Target grid geometry: affine transforms, grid specifications, tiles.

use serde::{Deserialize, Serialize};
use swath_common::{BoundingBox, CrsCode};

use crate::error::{Result, SwathGridError};

/// Absolute tolerance for comparing affine coefficients. Far below any
/// meaningful cell size in degrees or meters, far above f64 rounding noise
/// at planetary coordinate magnitudes.
const TRANSFORM_EPSILON: f64 = 1e-6;

/// A 6-coefficient affine transform between grid cell indices and target
/// CRS positions.
///
/// `(x, y) = (origin_x + col * pixel_width + row * row_rotation,
///            origin_y + col * column_rotation + row * pixel_height)`
///
/// North-up grids have `pixel_width > 0`, `pixel_height < 0` and zero
/// rotation terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridTransform {
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_x: f64,
    pub column_rotation: f64,
    pub pixel_height: f64,
    pub origin_y: f64,
}

impl GridTransform {
    /// An axis-aligned north-up transform with square cells.
    pub fn north_up(origin_x: f64, origin_y: f64, resolution: f64) -> Self {
        Self {
            pixel_width: resolution,
            row_rotation: 0.0,
            origin_x,
            column_rotation: 0.0,
            pixel_height: -resolution,
            origin_y,
        }
    }

    /// Map fractional cell indices to target CRS coordinates.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.column_rotation + row * self.pixel_height,
        )
    }

    /// Determinant of the 2x2 linear part.
    pub fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.column_rotation
    }

    /// Map target CRS coordinates back to fractional cell indices.
    ///
    /// Callers must only invoke this on a transform whose determinant has
    /// been checked (GridSpec construction enforces it).
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.determinant();
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.column_rotation * dx + self.pixel_width * dy) / det;
        (col, row)
    }

    /// Whether this transform has no rotation terms.
    pub fn is_axis_aligned(&self) -> bool {
        self.row_rotation == 0.0 && self.column_rotation == 0.0
    }

    /// Coefficient-wise comparison within [`TRANSFORM_EPSILON`].
    pub fn approx_eq(&self, other: &GridTransform) -> bool {
        (self.pixel_width - other.pixel_width).abs() <= TRANSFORM_EPSILON
            && (self.row_rotation - other.row_rotation).abs() <= TRANSFORM_EPSILON
            && (self.origin_x - other.origin_x).abs() <= TRANSFORM_EPSILON
            && (self.column_rotation - other.column_rotation).abs() <= TRANSFORM_EPSILON
            && (self.pixel_height - other.pixel_height).abs() <= TRANSFORM_EPSILON
            && (self.origin_y - other.origin_y).abs() <= TRANSFORM_EPSILON
    }
}

/// Specification of a regular target grid: affine transform, integer shape,
/// and coordinate reference system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub transform: GridTransform,
    pub width: usize,
    pub height: usize,
    pub crs: CrsCode,
}

impl GridSpec {
    /// Create a grid spec, validating shape and transform invertibility.
    pub fn new(transform: GridTransform, width: usize, height: usize, crs: CrsCode) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SwathGridError::InvalidBounds(format!(
                "grid shape must be non-empty, got {}x{}",
                width, height
            )));
        }

        let det = transform.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(SwathGridError::NonInvertibleTransform { determinant: det });
        }

        Ok(Self {
            transform,
            width,
            height,
            crs,
        })
    }

    /// Derive a north-up grid covering `bbox` at `resolution` (target CRS
    /// units per cell).
    ///
    /// Fails fast when `max_x <= min_x` or `max_y <= min_y`; extents that
    /// cross the antimeridian must go through
    /// [`GridSpec::from_bounds_antimeridian`] instead.
    pub fn from_bounds(bbox: &BoundingBox, resolution: f64, crs: CrsCode) -> Result<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(SwathGridError::InvalidResolution(resolution));
        }
        if bbox.max_x <= bbox.min_x {
            return Err(SwathGridError::InvalidBounds(format!(
                "east ({}) must exceed west ({}); antimeridian crossing requires from_bounds_antimeridian",
                bbox.max_x, bbox.min_x
            )));
        }
        if bbox.max_y <= bbox.min_y {
            return Err(SwathGridError::InvalidBounds(format!(
                "north ({}) must exceed south ({})",
                bbox.max_y, bbox.min_y
            )));
        }

        let width = (bbox.width() / resolution).ceil() as usize;
        let height = (bbox.height() / resolution).ceil() as usize;
        let transform = GridTransform::north_up(bbox.min_x, bbox.max_y, resolution);

        Self::new(transform, width, height, crs)
    }

    /// Derive a grid for an extent that crosses the antimeridian.
    ///
    /// The eastern bound is unwrapped through +360 into a continuous
    /// longitude branch, so cells east of 180° carry x coordinates above
    /// 180. Only meaningful for geographic targets.
    pub fn from_bounds_antimeridian(
        bbox: &BoundingBox,
        resolution: f64,
        crs: CrsCode,
    ) -> Result<Self> {
        if !crs.is_geographic() {
            return Err(SwathGridError::ConfigError(format!(
                "antimeridian-crossing extents are only supported on geographic grids, not {}",
                crs
            )));
        }
        if bbox.max_x > bbox.min_x {
            return Err(SwathGridError::InvalidBounds(format!(
                "extent ({}, {}) does not cross the antimeridian",
                bbox.min_x, bbox.max_x
            )));
        }

        Self::from_bounds(&bbox.unwrap_antimeridian(), resolution, crs)
    }

    /// Snap this grid's origin onto the cell lattice of `reference`, so the
    /// two grids overlap on an exact integer sub-window.
    ///
    /// Tiles resampled onto grids aligned to a common reference can be
    /// combined cell-wise without sub-cell misregistration.
    pub fn aligned_to(&self, reference: &GridSpec) -> Result<GridSpec> {
        if self.crs != reference.crs {
            return Err(SwathGridError::GridMismatch(format!(
                "cannot align {} grid to {} reference",
                self.crs, reference.crs
            )));
        }
        if !self.transform.is_axis_aligned() || !reference.transform.is_axis_aligned() {
            return Err(SwathGridError::GridMismatch(
                "alignment requires axis-aligned grids".to_string(),
            ));
        }

        let t = &self.transform;
        let r = &reference.transform;
        if (t.pixel_width - r.pixel_width).abs() > TRANSFORM_EPSILON
            || (t.pixel_height - r.pixel_height).abs() > TRANSFORM_EPSILON
        {
            return Err(SwathGridError::GridMismatch(format!(
                "resolution ({}, {}) differs from reference ({}, {})",
                t.pixel_width, t.pixel_height, r.pixel_width, r.pixel_height
            )));
        }

        let cols = ((t.origin_x - r.origin_x) / r.pixel_width).round();
        let rows = ((t.origin_y - r.origin_y) / r.pixel_height).round();

        let mut snapped = *r;
        snapped.origin_x = r.origin_x + cols * r.pixel_width;
        snapped.origin_y = r.origin_y + rows * r.pixel_height;

        GridSpec::new(snapped, self.width, self.height, self.crs)
    }

    /// Target CRS coordinates of a cell's center.
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Map a target CRS position to the cell containing it, or `None` when
    /// it falls outside the grid.
    pub fn world_to_cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let (col_f, row_f) = self.transform.invert(x, y);
        let col = col_f.floor();
        let row = row_f.floor();

        // NaN passes every range comparison below, so reject it first.
        if !(0.0..self.width as f64).contains(&col) || !(0.0..self.height as f64).contains(&row) {
            return None;
        }
        Some((col as usize, row as usize))
    }

    /// Row-major flat index for a cell.
    pub fn flat_index(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Check if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid resolution as `(pixel_width, pixel_height)`.
    pub fn resolution(&self) -> (f64, f64) {
        (self.transform.pixel_width, self.transform.pixel_height)
    }

    /// Extent of the grid in target CRS coordinates.
    pub fn bbox(&self) -> BoundingBox {
        let (x0, y0) = self.transform.apply(0.0, 0.0);
        let (x1, y1) = self
            .transform
            .apply(self.width as f64, self.height as f64);
        BoundingBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// Whether tiles on this grid may be combined cell-wise with tiles on
    /// `other`: identical shape, CRS, and affine transform.
    pub fn compatible_with(&self, other: &GridSpec) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.crs == other.crs
            && self.transform.approx_eq(&other.transform)
    }
}

/// One swath resampled onto a [`GridSpec`].
///
/// Values are either valid measurements or the NaN no-data sentinel. Bands
/// are stored as contiguous `height * width` planes.
#[derive(Debug, Clone)]
pub struct GriddedTile {
    pub data: Vec<f32>,
    pub bands: usize,
    pub spec: GridSpec,
}

impl GriddedTile {
    /// Create an all-no-data tile.
    pub fn new_filled(spec: GridSpec, bands: usize) -> Self {
        let len = spec.len() * bands.max(1);
        Self {
            data: vec![f32::NAN; len],
            bands: bands.max(1),
            spec,
        }
    }

    /// Number of cells in one band plane.
    pub fn band_len(&self) -> usize {
        self.spec.len()
    }

    /// Value at `(band, row, col)`.
    pub fn get(&self, band: usize, row: usize, col: usize) -> Option<f32> {
        if band >= self.bands || row >= self.spec.height || col >= self.spec.width {
            return None;
        }
        let idx = band * self.band_len() + self.spec.flat_index(col, row);
        self.data.get(idx).copied()
    }

    /// Set the value at `(band, row, col)`. Out-of-range indices are ignored.
    pub fn set(&mut self, band: usize, row: usize, col: usize, value: f32) {
        if band >= self.bands || row >= self.spec.height || col >= self.spec.width {
            return;
        }
        let idx = band * self.spec.len() + self.spec.flat_index(col, row);
        self.data[idx] = value;
    }

    /// Number of cells holding a valid (non-NaN) value, across all bands.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Whether every cell is no-data.
    pub fn is_all_nodata(&self) -> bool {
        self.valid_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_apply_invert_round_trip() {
        let spec = GridSpec::from_bounds(
            &BoundingBox::new(-76.75, 36.97, -75.74, 39.01),
            0.01,
            CrsCode::Epsg4326,
        )
        .unwrap();

        // Cell centers map through forward then inverse to the same cell.
        for &(col, row) in &[(0usize, 0usize), (3, 7), (100, 50)] {
            if col >= spec.width || row >= spec.height {
                continue;
            }
            let (x, y) = spec.cell_center(col, row);
            let (c, r) = spec.world_to_cell(x, y).unwrap();
            assert_eq!((c, r), (col, row));
        }
    }

    #[test]
    fn test_from_bounds_shape() {
        let spec = GridSpec::from_bounds(
            &BoundingBox::new(0.0, 0.0, 2.0, 2.0),
            1.0,
            CrsCode::Epsg4326,
        )
        .unwrap();

        assert_eq!(spec.width, 2);
        assert_eq!(spec.height, 2);
        assert!((spec.transform.origin_x - 0.0).abs() < f64::EPSILON);
        assert!((spec.transform.origin_y - 2.0).abs() < f64::EPSILON);
        assert!((spec.transform.pixel_height - -1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_world_to_cell_rejects_non_finite() {
        let spec = GridSpec::from_bounds(
            &BoundingBox::new(0.0, 0.0, 2.0, 2.0),
            1.0,
            CrsCode::Epsg4326,
        )
        .unwrap();

        assert_eq!(spec.world_to_cell(f64::NAN, 0.5), None);
        assert_eq!(spec.world_to_cell(0.5, f64::NAN), None);
        assert_eq!(spec.world_to_cell(f64::INFINITY, 0.5), None);
        assert_eq!(spec.world_to_cell(0.5, 0.5), Some((0, 1)));
    }

    #[test]
    fn test_from_bounds_rejects_degenerate_extent() {
        let flipped = BoundingBox::new(10.0, 0.0, 0.0, 10.0);
        assert!(GridSpec::from_bounds(&flipped, 1.0, CrsCode::Epsg4326).is_err());

        let flat = BoundingBox::new(0.0, 10.0, 10.0, 10.0);
        assert!(GridSpec::from_bounds(&flat, 1.0, CrsCode::Epsg4326).is_err());

        let ok = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(GridSpec::from_bounds(&ok, 0.0, CrsCode::Epsg4326).is_err());
        assert!(GridSpec::from_bounds(&ok, f64::NAN, CrsCode::Epsg4326).is_err());
    }

    #[test]
    fn test_from_bounds_antimeridian() {
        let crossing = BoundingBox::new(170.0, -5.0, -170.0, 5.0);
        let spec =
            GridSpec::from_bounds_antimeridian(&crossing, 1.0, CrsCode::Epsg4326).unwrap();
        assert_eq!(spec.width, 20);
        assert_eq!(spec.height, 10);
        assert!((spec.transform.origin_x - 170.0).abs() < f64::EPSILON);

        // Non-crossing extents must use from_bounds.
        let normal = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(GridSpec::from_bounds_antimeridian(&normal, 1.0, CrsCode::Epsg4326).is_err());

        // Projected targets cannot unwrap through the antimeridian.
        assert!(GridSpec::from_bounds_antimeridian(&crossing, 1.0, CrsCode::Epsg3857).is_err());
    }

    #[test]
    fn test_non_invertible_transform_rejected() {
        let degenerate = GridTransform {
            pixel_width: 1.0,
            row_rotation: 1.0,
            origin_x: 0.0,
            column_rotation: 1.0,
            pixel_height: 1.0,
            origin_y: 0.0,
        };
        let result = GridSpec::new(degenerate, 4, 4, CrsCode::Epsg4326);
        assert!(matches!(
            result,
            Err(SwathGridError::NonInvertibleTransform { .. })
        ));
    }

    #[test]
    fn test_aligned_to_snaps_origin() {
        let reference = GridSpec::from_bounds(
            &BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            0.5,
            CrsCode::Epsg4326,
        )
        .unwrap();

        // Origin offset by a non-integer number of cells.
        let skewed = GridSpec::from_bounds(
            &BoundingBox::new(1.23, 0.0, 6.23, 4.8),
            0.5,
            CrsCode::Epsg4326,
        )
        .unwrap();

        let aligned = skewed.aligned_to(&reference).unwrap();

        // Snapped origin sits on the reference lattice.
        let dx = (aligned.transform.origin_x - reference.transform.origin_x)
            / reference.transform.pixel_width;
        let dy = (aligned.transform.origin_y - reference.transform.origin_y)
            / reference.transform.pixel_height;
        assert!((dx - dx.round()).abs() < 1e-9);
        assert!((dy - dy.round()).abs() < 1e-9);

        // Shape is preserved.
        assert_eq!(aligned.width, skewed.width);
        assert_eq!(aligned.height, skewed.height);
    }

    #[test]
    fn test_aligned_to_rejects_mismatched_resolution() {
        let reference = GridSpec::from_bounds(
            &BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            0.5,
            CrsCode::Epsg4326,
        )
        .unwrap();
        let other = GridSpec::from_bounds(
            &BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            0.25,
            CrsCode::Epsg4326,
        )
        .unwrap();

        assert!(other.aligned_to(&reference).is_err());
    }

    #[test]
    fn test_compatible_with() {
        let bbox = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
        let a = GridSpec::from_bounds(&bbox, 1.0, CrsCode::Epsg4326).unwrap();
        let b = GridSpec::from_bounds(&bbox, 1.0, CrsCode::Epsg4326).unwrap();
        assert!(a.compatible_with(&b));

        let shifted = GridSpec::from_bounds(
            &BoundingBox::new(0.5, 0.0, 2.5, 2.0),
            1.0,
            CrsCode::Epsg4326,
        )
        .unwrap();
        assert!(!a.compatible_with(&shifted));

        let other_crs = GridSpec::from_bounds(&bbox, 1.0, CrsCode::Epsg3857).unwrap();
        assert!(!a.compatible_with(&other_crs));
    }

    #[test]
    fn test_tile_get_set() {
        let spec = GridSpec::from_bounds(
            &BoundingBox::new(0.0, 0.0, 3.0, 3.0),
            1.0,
            CrsCode::Epsg4326,
        )
        .unwrap();
        let mut tile = GriddedTile::new_filled(spec, 2);

        assert!(tile.is_all_nodata());
        tile.set(1, 2, 0, 42.0);
        assert_eq!(tile.get(1, 2, 0), Some(42.0));
        assert!(tile.get(0, 2, 0).unwrap().is_nan());
        assert_eq!(tile.get(2, 0, 0), None);
        assert_eq!(tile.valid_count(), 1);
    }
}
