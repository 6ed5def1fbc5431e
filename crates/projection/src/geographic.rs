//! Geographic (lon/lat) coordinate handling.
//!
//! The "projection" for a geographic target grid is a pass-through with
//! longitude normalization; the grid's affine transform already works in
//! degrees.

/// Normalize a longitude to the [-180, 180) branch.
pub fn normalize_lon(lon_deg: f64) -> f64 {
    let mut lon = lon_deg;
    while lon >= 180.0 {
        lon -= 360.0;
    }
    while lon < -180.0 {
        lon += 360.0;
    }
    lon
}

/// Map geographic coordinates onto the geographic plane.
///
/// Returns `None` for latitudes outside [-90, 90] or non-finite input.
pub fn forward(lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
    if !lon_deg.is_finite() || !lat_deg.is_finite() {
        return None;
    }
    if !(-90.0..=90.0).contains(&lat_deg) {
        return None;
    }
    Some((normalize_lon(lon_deg), lat_deg))
}

/// Inverse of [`forward`]: planar degrees back to lon/lat degrees.
pub fn inverse(x: f64, y: f64) -> Option<(f64, f64)> {
    if !x.is_finite() || !y.is_finite() || !(-90.0..=90.0).contains(&y) {
        return None;
    }
    Some((normalize_lon(x), y))
}
