//! Sinusoidal equal-area projection.
//!
//! The sphere-based sinusoidal projection used for gridded ocean color and
//! land products (MODIS/VIIRS Level-3 tiles). Equal-area, which makes it the
//! conventional target for swath binning: every grid cell covers the same
//! surface area regardless of latitude.

use crate::geographic::normalize_lon;

/// Authalic sphere radius used by the MODIS sinusoidal grid (meters).
pub const EARTH_RADIUS: f64 = 6_371_007.181;

/// Project lon/lat degrees to sinusoidal meters.
pub fn forward(lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
    if !lon_deg.is_finite() || !lat_deg.is_finite() {
        return None;
    }
    if !(-90.0..=90.0).contains(&lat_deg) {
        return None;
    }

    let lon = normalize_lon(lon_deg).to_radians();
    let lat = lat_deg.to_radians();

    let x = EARTH_RADIUS * lon * lat.cos();
    let y = EARTH_RADIUS * lat;
    Some((x, y))
}

/// Unproject sinusoidal meters back to lon/lat degrees.
///
/// Returns `None` for points outside the lens-shaped valid region (where
/// the recovered longitude would exceed 180°).
pub fn inverse(x: f64, y: f64) -> Option<(f64, f64)> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    let lat = y / EARTH_RADIUS;
    if lat.abs() > std::f64::consts::FRAC_PI_2 {
        return None;
    }

    let cos_lat = lat.cos();
    if cos_lat.abs() < 1e-12 {
        // At the poles every x collapses to the same point.
        return if x.abs() < 1e-6 {
            Some((0.0, lat.to_degrees()))
        } else {
            None
        };
    }

    let lon = x / (EARTH_RADIUS * cos_lat);
    if lon.abs() > std::f64::consts::PI + 1e-9 {
        return None;
    }
    Some((normalize_lon(lon.to_degrees()), lat.to_degrees()))
}
