//! Chunked aggregation of gridded tiles.
//!
//! Tiles arrive as an unbounded stream (one per granule, one per day) and
//! are folded into per-cell running sums. Combination is cell-wise addition
//! of sums and counts, so it is associative and commutative up to
//! floating-point rounding: tiles may be processed in any order, and
//! partial aggregates computed by independent workers can be merged
//! pairwise with the same final result. Memory stays O(grid size) no
//! matter how many tiles are combined.

use crate::error::{Result, SwathGridError};
use crate::types::{GriddedTile, GridSpec};

/// Per-cell running `(sum, sum_of_squares, count)` over one grid.
///
/// Sums accumulate in f64 to keep long aggregations stable even though
/// tile values are f32.
#[derive(Debug, Clone)]
pub struct PartialAggregate {
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
    count: Vec<u32>,
    bands: usize,
    spec: GridSpec,
}

impl PartialAggregate {
    /// Create an empty aggregate for a grid.
    pub fn new(spec: GridSpec, bands: usize) -> Self {
        let bands = bands.max(1);
        let len = spec.len() * bands;
        Self {
            sum: vec![0.0; len],
            sum_sq: vec![0.0; len],
            count: vec![0; len],
            bands,
            spec,
        }
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Cells per band plane.
    pub fn band_len(&self) -> usize {
        self.spec.len()
    }

    /// Add one observation to a cell.
    pub fn accumulate(&mut self, band: usize, cell: usize, value: f64) {
        let idx = band * self.spec.len() + cell;
        self.sum[idx] += value;
        self.sum_sq[idx] += value * value;
        self.count[idx] += 1;
    }

    /// Fold a resampled tile in cell-wise. No-data cells leave the
    /// aggregate untouched.
    ///
    /// The compatibility check happens before any mutation, so a rejected
    /// tile never leaves the aggregate partially updated.
    pub fn combine_tile(&mut self, tile: &GriddedTile) -> Result<()> {
        if !self.spec.compatible_with(&tile.spec) {
            return Err(SwathGridError::GridMismatch(format!(
                "tile grid ({}x{}, {}) is not the aggregation grid ({}x{}, {})",
                tile.spec.width,
                tile.spec.height,
                tile.spec.crs,
                self.spec.width,
                self.spec.height,
                self.spec.crs
            )));
        }
        if tile.bands != self.bands {
            return Err(SwathGridError::GridMismatch(format!(
                "tile has {} band(s), aggregate has {}",
                tile.bands, self.bands
            )));
        }

        for (idx, &value) in tile.data.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            let v = f64::from(value);
            self.sum[idx] += v;
            self.sum_sq[idx] += v * v;
            self.count[idx] += 1;
        }

        Ok(())
    }

    /// Merge another partial aggregate into this one, cell-wise.
    pub fn merge(&mut self, other: &PartialAggregate) -> Result<()> {
        if !self.spec.compatible_with(&other.spec) || self.bands != other.bands {
            return Err(SwathGridError::GridMismatch(
                "cannot merge partial aggregates over different grids".to_string(),
            ));
        }

        for (a, b) in self.sum.iter_mut().zip(&other.sum) {
            *a += b;
        }
        for (a, b) in self.sum_sq.iter_mut().zip(&other.sum_sq) {
            *a += b;
        }
        for (a, b) in self.count.iter_mut().zip(&other.count) {
            *a += b;
        }

        Ok(())
    }

    /// Sum at `(band, cell)`.
    pub fn sum_at(&self, band: usize, cell: usize) -> f64 {
        self.sum[band * self.spec.len() + cell]
    }

    /// Sum of squares at `(band, cell)`.
    pub fn sum_sq_at(&self, band: usize, cell: usize) -> f64 {
        self.sum_sq[band * self.spec.len() + cell]
    }

    /// Contribution count at `(band, cell)`.
    pub fn count_at(&self, band: usize, cell: usize) -> u32 {
        self.count[band * self.spec.len() + cell]
    }

    /// Total contributions across all cells and bands.
    pub fn total_contributions(&self) -> u64 {
        self.count.iter().map(|&c| u64::from(c)).sum()
    }
}

/// Streaming combiner over one grid.
///
/// Owns the single mutable [`PartialAggregate`]; callers feed it tiles (or
/// whole partials from other workers) one at a time and each tile may be
/// dropped as soon as `combine` returns.
#[derive(Debug)]
pub struct ChunkedAggregator {
    partial: PartialAggregate,
}

impl ChunkedAggregator {
    pub fn new(spec: GridSpec, bands: usize) -> Self {
        Self {
            partial: PartialAggregate::new(spec, bands),
        }
    }

    /// Start from an existing partial aggregate.
    pub fn from_partial(partial: PartialAggregate) -> Self {
        Self { partial }
    }

    /// Fold one tile in. Mismatched grids are a configuration error and
    /// leave the aggregate unchanged.
    pub fn combine(&mut self, tile: &GriddedTile) -> Result<()> {
        self.partial.combine_tile(tile)
    }

    /// Fold another worker's partial aggregate in.
    pub fn absorb(&mut self, other: &PartialAggregate) -> Result<()> {
        self.partial.merge(other)
    }

    pub fn partial(&self) -> &PartialAggregate {
        &self.partial
    }

    /// Finish aggregation and take the accumulated partial.
    pub fn finish(self) -> PartialAggregate {
        self.partial
    }
}
