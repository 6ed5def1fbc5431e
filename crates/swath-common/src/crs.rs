//! Coordinate Reference System identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommonError;

/// Well-known CRS codes supported as resampling targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    Epsg3857,
    /// Sinusoidal equal-area on the authalic sphere (meters), the
    /// conventional ocean-color Level-3 mapping
    Sinusoidal,
}

impl CrsCode {
    /// Parse a CRS identifier string.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326" or "CRS:84"
    /// - "EPSG:3857"
    /// - "ESRI:53008" or "SINUSOIDAL"
    pub fn parse(s: &str) -> Result<Self, CommonError> {
        let normalized = s.to_uppercase();

        match normalized.as_str() {
            "EPSG:4326" | "CRS:84" => Ok(CrsCode::Epsg4326),
            "EPSG:3857" | "EPSG:900913" => Ok(CrsCode::Epsg3857),
            "ESRI:53008" | "SINUSOIDAL" => Ok(CrsCode::Sinusoidal),
            _ => Err(CommonError::InvalidCrs(s.to_string())),
        }
    }

    /// Check if this is a geographic (lon/lat degree) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326)
    }
}

impl Default for CrsCode {
    fn default() -> Self {
        // Satellite swath geolocation arrays are lon/lat degrees unless
        // stated otherwise.
        CrsCode::Epsg4326
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Epsg3857 => "EPSG:3857",
            CrsCode::Sinusoidal => "ESRI:53008",
        };
        write!(f, "{}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        assert_eq!(CrsCode::parse("EPSG:4326").unwrap(), CrsCode::Epsg4326);
        assert_eq!(CrsCode::parse("crs:84").unwrap(), CrsCode::Epsg4326);
        assert_eq!(CrsCode::parse("EPSG:3857").unwrap(), CrsCode::Epsg3857);
        assert_eq!(CrsCode::parse("epsg:900913").unwrap(), CrsCode::Epsg3857);
        assert_eq!(CrsCode::parse("sinusoidal").unwrap(), CrsCode::Sinusoidal);
        assert_eq!(CrsCode::parse("ESRI:53008").unwrap(), CrsCode::Sinusoidal);
    }

    #[test]
    fn test_parse_unknown_code() {
        assert!(CrsCode::parse("EPSG:9999").is_err());
    }

    #[test]
    fn test_is_geographic() {
        assert!(CrsCode::Epsg4326.is_geographic());
        assert!(!CrsCode::Epsg3857.is_geographic());
        assert!(!CrsCode::Sinusoidal.is_geographic());
    }

    #[test]
    fn test_display_round_trip() {
        for crs in [CrsCode::Epsg4326, CrsCode::Epsg3857, CrsCode::Sinusoidal] {
            assert_eq!(CrsCode::parse(&crs.to_string()).unwrap(), crs);
        }
    }
}
