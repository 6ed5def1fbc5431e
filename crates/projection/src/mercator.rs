//! Web Mercator (EPSG:3857) projection.
//!
//! Spherical Mercator on the WGS84 semi-major axis, the de facto standard
//! for web map tiles. Latitudes beyond the Mercator cutoff (~85.05°) are
//! outside the projection's domain.

use std::f64::consts::PI;

use crate::geographic::normalize_lon;

/// WGS84 semi-major axis (meters).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit where the projected y coordinate equals the x extent.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Project lon/lat degrees to Web Mercator meters.
pub fn forward(lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
    if !lon_deg.is_finite() || !lat_deg.is_finite() {
        return None;
    }
    if lat_deg.abs() > MAX_LATITUDE {
        return None;
    }

    let lon = normalize_lon(lon_deg).to_radians();
    let lat = lat_deg.to_radians();

    let x = EARTH_RADIUS * lon;
    let y = EARTH_RADIUS * (PI / 4.0 + lat / 2.0).tan().ln();
    Some((x, y))
}

/// Unproject Web Mercator meters back to lon/lat degrees.
pub fn inverse(x: f64, y: f64) -> Option<(f64, f64)> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();

    if lat.abs() > MAX_LATITUDE + 1e-9 {
        return None;
    }
    Some((normalize_lon(lon), lat))
}
