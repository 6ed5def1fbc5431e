//! Source observations in instrument geometry.

use chrono::{DateTime, Utc};
use swath_common::CrsCode;

use crate::error::{Result, SwathGridError};

/// One named data variable on a swath.
///
/// Data is stored row-major per band: `(bands, rows, cols)` flattened with
/// band planes contiguous. A plain 2D variable has `bands == 1`.
#[derive(Debug, Clone)]
pub struct SwathVariable {
    pub name: String,
    pub data: Vec<f32>,
    pub bands: usize,
    pub valid_min: Option<f32>,
    pub valid_max: Option<f32>,
}

impl SwathVariable {
    /// Create a single-band variable.
    pub fn new(name: &str, data: Vec<f32>) -> Self {
        Self {
            name: name.to_string(),
            data,
            bands: 1,
            valid_min: None,
            valid_max: None,
        }
    }

    /// Create a multi-band variable with contiguous band planes.
    pub fn banded(name: &str, data: Vec<f32>, bands: usize) -> Self {
        Self {
            name: name.to_string(),
            data,
            bands: bands.max(1),
            valid_min: None,
            valid_max: None,
        }
    }

    /// Attach a valid range; values outside it resample as no-data.
    pub fn with_valid_range(mut self, min: f32, max: f32) -> Self {
        self.valid_min = Some(min);
        self.valid_max = Some(max);
        self
    }

    /// One band plane of `pixel_count` values.
    pub fn band_slice(&self, band: usize, pixel_count: usize) -> &[f32] {
        let start = band * pixel_count;
        &self.data[start..start + pixel_count]
    }

    /// Whether a value is a usable measurement: finite and inside the valid
    /// range when one is declared.
    pub fn is_valid(&self, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        if let Some(min) = self.valid_min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.valid_max {
            if value > max {
                return false;
            }
        }
        true
    }
}

/// A source observation: per-pixel geolocation, data variables, an optional
/// quality bitmask, and scalar metadata.
///
/// Immutable after construction; discarded after resampling. Geolocation
/// arrays and every variable share the same `(rows, cols)` leading shape,
/// enforced by the builder methods.
#[derive(Debug, Clone)]
pub struct Swath {
    pub rows: usize,
    pub cols: usize,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    pub variables: Vec<SwathVariable>,
    pub quality: Option<Vec<u32>>,
    pub acquired_at: Option<DateTime<Utc>>,
    pub crs: CrsCode,
}

impl Swath {
    /// Create a swath from its geolocation arrays.
    pub fn new(rows: usize, cols: usize, latitude: Vec<f64>, longitude: Vec<f64>) -> Result<Self> {
        let pixels = rows * cols;
        if latitude.len() != pixels || longitude.len() != pixels {
            return Err(SwathGridError::ShapeMismatch(format!(
                "geolocation arrays ({}, {}) do not match swath shape {}x{}",
                latitude.len(),
                longitude.len(),
                rows,
                cols
            )));
        }

        Ok(Self {
            rows,
            cols,
            latitude,
            longitude,
            variables: Vec::new(),
            quality: None,
            acquired_at: None,
            crs: CrsCode::default(),
        })
    }

    /// Attach a data variable, checking its shape against the swath.
    pub fn with_variable(mut self, variable: SwathVariable) -> Result<Self> {
        let expected = variable.bands * self.pixel_count();
        if variable.data.len() != expected {
            return Err(SwathGridError::ShapeMismatch(format!(
                "variable '{}' has {} values, expected {} ({} band(s) of {}x{})",
                variable.name,
                variable.data.len(),
                expected,
                variable.bands,
                self.rows,
                self.cols
            )));
        }
        self.variables.push(variable);
        Ok(self)
    }

    /// Attach the integer quality bitmask variable.
    pub fn with_quality(mut self, bitmask: Vec<u32>) -> Result<Self> {
        if bitmask.len() != self.pixel_count() {
            return Err(SwathGridError::ShapeMismatch(format!(
                "quality bitmask has {} values, expected {}x{}",
                bitmask.len(),
                self.rows,
                self.cols
            )));
        }
        self.quality = Some(bitmask);
        Ok(self)
    }

    /// Attach the acquisition timestamp.
    pub fn with_timestamp(mut self, acquired_at: DateTime<Utc>) -> Self {
        self.acquired_at = Some(acquired_at);
        self
    }

    /// Override the source CRS (default: geographic WGS84).
    pub fn with_crs(mut self, crs: CrsCode) -> Self {
        self.crs = crs;
        self
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&SwathVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Number of source pixels.
    pub fn pixel_count(&self) -> usize {
        self.rows * self.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_enforcement() {
        assert!(Swath::new(2, 3, vec![0.0; 6], vec![0.0; 6]).is_ok());
        assert!(Swath::new(2, 3, vec![0.0; 5], vec![0.0; 6]).is_err());

        let swath = Swath::new(2, 2, vec![0.0; 4], vec![0.0; 4]).unwrap();
        assert!(swath
            .clone()
            .with_variable(SwathVariable::new("chlor_a", vec![1.0; 4]))
            .is_ok());
        assert!(swath
            .clone()
            .with_variable(SwathVariable::new("chlor_a", vec![1.0; 5]))
            .is_err());
        assert!(swath
            .clone()
            .with_variable(SwathVariable::banded("rrs", vec![1.0; 12], 3))
            .is_ok());
        assert!(swath.clone().with_quality(vec![0; 4]).is_ok());
        assert!(swath.with_quality(vec![0; 3]).is_err());
    }

    #[test]
    fn test_valid_range() {
        let var = SwathVariable::new("chlor_a", vec![]).with_valid_range(0.0, 100.0);
        assert!(var.is_valid(0.5));
        assert!(!var.is_valid(-0.1));
        assert!(!var.is_valid(250.0));
        assert!(!var.is_valid(f32::NAN));

        let unbounded = SwathVariable::new("raw", vec![]);
        assert!(unbounded.is_valid(-1e9));
        assert!(!unbounded.is_valid(f32::NAN));
    }

    #[test]
    fn test_band_slice() {
        let var = SwathVariable::banded("rrs", (0..12).map(|v| v as f32).collect(), 3);
        assert_eq!(var.band_slice(0, 4), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(var.band_slice(2, 4), &[8.0, 9.0, 10.0, 11.0]);
    }
}
