//! Synthetic swath generators for tests and demos.
//!
//! These generators create predictable, verifiable swaths so tests can
//! assert exact cell values instead of eyeballing output.

use swath_common::{BoundingBox, CrsCode};

use crate::swath::{Swath, SwathVariable};
use crate::types::GridSpec;

/// Creates a regular swath covering a bounding box.
///
/// Pixel centers are laid out on a `rows x cols` lattice inside `bbox`,
/// and each value is calculated as `col * 1000 + row`, so
/// `swath[row][col] == col * 1000 + row` can be checked after any
/// transformation that preserves pixel identity.
pub fn create_regular_swath(bbox: &BoundingBox, rows: usize, cols: usize, variable: &str) -> Swath {
    let lon_step = bbox.width() / cols as f64;
    let lat_step = bbox.height() / rows as f64;

    let mut latitude = Vec::with_capacity(rows * cols);
    let mut longitude = Vec::with_capacity(rows * cols);
    let mut values = Vec::with_capacity(rows * cols);

    for row in 0..rows {
        // Row 0 is the northernmost scan line, matching instrument order.
        let lat = bbox.max_y - (row as f64 + 0.5) * lat_step;
        for col in 0..cols {
            let lon = bbox.min_x + (col as f64 + 0.5) * lon_step;
            latitude.push(lat);
            longitude.push(lon);
            values.push((col * 1000 + row) as f32);
        }
    }

    Swath::new(rows, cols, latitude, longitude)
        .unwrap()
        .with_variable(SwathVariable::new(variable, values))
        .unwrap()
}

/// Creates a single-row swath with explicit pixel positions and values.
///
/// Useful for planting known values in known grid cells.
pub fn create_point_swath(points: &[(f64, f64, f32)], variable: &str) -> Swath {
    let latitude = points.iter().map(|&(lat, _, _)| lat).collect();
    let longitude = points.iter().map(|&(_, lon, _)| lon).collect();
    let values = points.iter().map(|&(_, _, v)| v).collect();

    Swath::new(1, points.len(), latitude, longitude)
        .unwrap()
        .with_variable(SwathVariable::new(variable, values))
        .unwrap()
}

/// Creates a point swath carrying a quality bitmask alongside the values.
///
/// `points` gives `(lat, lon, value, flag_bits)` per pixel.
pub fn create_flagged_swath(points: &[(f64, f64, f32, u32)], variable: &str) -> Swath {
    let latitude = points.iter().map(|&(lat, _, _, _)| lat).collect();
    let longitude = points.iter().map(|&(_, lon, _, _)| lon).collect();
    let values = points.iter().map(|&(_, _, v, _)| v).collect();
    let bits: Vec<u32> = points.iter().map(|&(_, _, _, b)| b).collect();

    Swath::new(1, points.len(), latitude, longitude)
        .unwrap()
        .with_variable(SwathVariable::new(variable, values))
        .unwrap()
        .with_quality(bits)
        .unwrap()
}

/// A 2x2 geographic grid over `(0, 0)..(2, 2)` at 1-degree resolution.
///
/// Small enough to enumerate every cell by hand in assertions.
pub fn grid_2x2() -> GridSpec {
    GridSpec::from_bounds(
        &BoundingBox::new(0.0, 0.0, 2.0, 2.0),
        1.0,
        CrsCode::Epsg4326,
    )
    .unwrap()
}
