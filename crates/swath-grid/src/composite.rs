//! Finalizing aggregates into user-facing statistics.

use crate::aggregate::PartialAggregate;
use crate::types::GriddedTile;

/// Derives composite statistics from a finished [`PartialAggregate`].
///
/// All outputs are pure functions of the aggregate; nothing here mutates
/// state, so statistics can be computed on demand and in any order.
#[derive(Debug)]
pub struct Compositor<'a> {
    partial: &'a PartialAggregate,
}

impl<'a> Compositor<'a> {
    pub fn new(partial: &'a PartialAggregate) -> Self {
        Self { partial }
    }

    /// Cell-wise mean: `sum / count`, NaN where no contributions landed.
    pub fn mean(&self) -> GriddedTile {
        self.finalize(|sum, _sum_sq, count| sum / f64::from(count))
    }

    /// Cell-wise population variance: `sum_sq / count - mean^2`.
    ///
    /// NaN where `count == 0`; by convention 0 where `count == 1` (a single
    /// sample has no spread). Tiny negative values from rounding are
    /// clamped to 0.
    pub fn variance(&self) -> GriddedTile {
        self.finalize(|sum, sum_sq, count| {
            let n = f64::from(count);
            let mean = sum / n;
            (sum_sq / n - mean * mean).max(0.0)
        })
    }

    /// Per-cell contribution count, as a tile for coverage maps.
    ///
    /// Zero-contribution cells are 0 here, not NaN: absence of data is
    /// itself the measurement a coverage map reports.
    pub fn count(&self) -> GriddedTile {
        let mut tile = GriddedTile::new_filled(self.partial.spec().clone(), self.partial.bands());
        for band in 0..self.partial.bands() {
            for cell in 0..self.partial.band_len() {
                tile.data[band * self.partial.band_len() + cell] =
                    self.partial.count_at(band, cell) as f32;
            }
        }
        tile
    }

    fn finalize<F>(&self, f: F) -> GriddedTile
    where
        F: Fn(f64, f64, u32) -> f64,
    {
        let mut tile = GriddedTile::new_filled(self.partial.spec().clone(), self.partial.bands());
        let band_len = self.partial.band_len();

        for band in 0..self.partial.bands() {
            for cell in 0..band_len {
                let count = self.partial.count_at(band, cell);
                if count == 0 {
                    continue; // stays NaN
                }
                let value = f(
                    self.partial.sum_at(band, cell),
                    self.partial.sum_sq_at(band, cell),
                    count,
                );
                tile.data[band * band_len + cell] = value as f32;
            }
        }

        tile
    }
}
