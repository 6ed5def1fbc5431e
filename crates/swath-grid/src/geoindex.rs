//! Spatial indexing of swath geolocation.
//!
//! Swath pixels are addressed by row/column, not by latitude/longitude, so
//! gridding needs an explicit pixel-to-cell mapping: project each pixel's
//! coordinates into the grid's CRS, invert the grid's affine transform, and
//! floor to integer cell indices. The mapping is computed once per
//! swath/grid pair and reused across all variables and bands.

use swath_common::CrsCode;

use crate::error::{Result, SwathGridError};
use crate::swath::Swath;
use crate::types::GridSpec;

/// The arena of source-pixel to target-cell assignments for one swath on
/// one grid.
///
/// Both sides are row-major flat indices. Multiple source pixels mapping to
/// the same cell is expected; the resampler's reduction policy decides what
/// happens on collision.
#[derive(Debug, Clone, Default)]
pub struct CellMapping {
    pub pairs: Vec<(usize, usize)>,
}

impl CellMapping {
    /// Number of mapped pixels.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// An empty mapping means the swath contributes nothing to the grid.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Wraps a swath's per-pixel coordinate arrays and answers cell queries.
#[derive(Debug)]
pub struct GeolocationIndex<'a> {
    latitude: &'a [f64],
    longitude: &'a [f64],
    rows: usize,
    cols: usize,
    source_crs: CrsCode,
}

impl<'a> GeolocationIndex<'a> {
    /// Build an index over a swath's geolocation arrays.
    pub fn for_swath(swath: &'a Swath) -> Self {
        Self {
            latitude: &swath.latitude,
            longitude: &swath.longitude,
            rows: swath.rows,
            cols: swath.cols,
            source_crs: swath.crs,
        }
    }

    /// Compute the pixel-to-cell mapping for a target grid.
    ///
    /// Pixels with NaN geolocation, outside the target projection's domain,
    /// or landing outside the grid are dropped. A swath with no valid
    /// pixels yields an empty mapping, not an error.
    pub fn map_to_grid(&self, spec: &GridSpec) -> Result<CellMapping> {
        let geographic_source = self.source_crs.is_geographic();
        if !geographic_source && self.source_crs != spec.crs {
            return Err(SwathGridError::CrsMismatch {
                source_crs: self.source_crs.to_string(),
                target_crs: spec.crs.to_string(),
            });
        }

        let mut pairs = Vec::new();
        for (i, (&lat, &lon)) in self.latitude.iter().zip(self.longitude).enumerate() {
            if lat.is_nan() || lon.is_nan() {
                continue;
            }

            // When source and grid share a projected CRS, the "geolocation"
            // arrays already carry planar coordinates.
            let (mut x, y) = if geographic_source {
                match projection::project(spec.crs, lon, lat) {
                    Some(point) => point,
                    None => continue,
                }
            } else {
                (lon, lat)
            };

            // Geographic grids built over the antimeridian carry x beyond
            // 180; unwrap source longitudes into the grid's branch. For
            // ordinary grids the shifted value lands outside and is dropped
            // by the bounds check below.
            if spec.crs.is_geographic() && x < spec.transform.origin_x {
                x += 360.0;
            }

            if let Some((col, row)) = spec.world_to_cell(x, y) {
                pairs.push((i, spec.flat_index(col, row)));
            }
        }

        Ok(CellMapping { pairs })
    }

    /// Find the source pixel nearest to a target coordinate, as
    /// `(row, col)`, or `None` when the swath has no valid geolocation.
    ///
    /// For geographic sources the comparison is equirectangular with a
    /// cos(latitude) correction, which is adequate at swath scales; for
    /// projected sources it is planar. Linear scan; intended for sparse
    /// point matchups, not bulk gridding.
    pub fn nearest_pixel(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let mut best: Option<(usize, f64)> = None;

        for (i, (&lat, &lon)) in self.latitude.iter().zip(self.longitude).enumerate() {
            if lat.is_nan() || lon.is_nan() {
                continue;
            }

            let d2 = if self.source_crs.is_geographic() {
                let mut dx = (lon - x).abs();
                if dx > 180.0 {
                    dx = 360.0 - dx;
                }
                let dx = dx * y.to_radians().cos();
                let dy = lat - y;
                dx * dx + dy * dy
            } else {
                let dx = lon - x;
                let dy = lat - y;
                dx * dx + dy * dy
            };

            match best {
                Some((_, best_d2)) if best_d2 <= d2 => {}
                _ => best = Some((i, d2)),
            }
        }

        best.map(|(i, _)| (i / self.cols, i % self.cols))
    }

    /// Swath shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}
