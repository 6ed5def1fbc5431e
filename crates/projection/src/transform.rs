//! Projection dispatch over well-known CRS codes.

use swath_common::CrsCode;

use crate::{geographic, mercator, sinusoidal};

/// Project geographic WGS84 coordinates (lon/lat degrees) into the target
/// CRS plane.
///
/// Returns `None` when the point is outside the target projection's domain
/// or the input is not finite.
pub fn project(crs: CrsCode, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
    match crs {
        CrsCode::Epsg4326 => geographic::forward(lon_deg, lat_deg),
        CrsCode::Epsg3857 => mercator::forward(lon_deg, lat_deg),
        CrsCode::Sinusoidal => sinusoidal::forward(lon_deg, lat_deg),
    }
}

/// Unproject target CRS plane coordinates back to lon/lat degrees.
pub fn unproject(crs: CrsCode, x: f64, y: f64) -> Option<(f64, f64)> {
    match crs {
        CrsCode::Epsg4326 => geographic::inverse(x, y),
        CrsCode::Epsg3857 => mercator::inverse(x, y),
        CrsCode::Sinusoidal => sinusoidal::inverse(x, y),
    }
}
