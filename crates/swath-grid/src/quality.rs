//! Quality masking: turning a bitmask variable into a boolean keep mask.

use swath_common::QualityFlagSet;

use crate::error::Result;

/// A resolved include/exclude flag selection.
///
/// Flag names are resolved against the vocabulary once, at configuration
/// time; unknown names fail there rather than partway through a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSelection {
    pub include_mask: u32,
    pub exclude_mask: u32,
}

impl FlagSelection {
    /// A selection that keeps every pixel.
    pub fn keep_all() -> Self {
        Self {
            include_mask: 0,
            exclude_mask: 0,
        }
    }

    /// Resolve flag names against a vocabulary, failing fast on typos.
    pub fn resolve(
        flag_set: &QualityFlagSet,
        include: &[String],
        exclude: &[String],
    ) -> Result<Self> {
        let include_mask = flag_set.combined_mask(include.iter().map(|s| s.as_str()))?;
        let exclude_mask = flag_set.combined_mask(exclude.iter().map(|s| s.as_str()))?;
        Ok(Self {
            include_mask,
            exclude_mask,
        })
    }

    /// Whether a selection has no effect.
    pub fn is_empty(&self) -> bool {
        self.include_mask == 0 && self.exclude_mask == 0
    }

    /// Decide one pixel: all include flags set, no exclude flag set.
    pub fn keeps(&self, bits: u32) -> bool {
        (bits & self.include_mask) == self.include_mask && (bits & self.exclude_mask) == 0
    }

    /// Apply the selection to a whole bitmask array.
    pub fn apply(&self, bitmask: &[u32]) -> Vec<bool> {
        bitmask.iter().map(|&bits| self.keeps(bits)).collect()
    }
}

/// Build a boolean keep mask from a bitmask array and named flag sets.
///
/// A pixel is kept when all `include` flags are set (if any are given) and
/// none of the `exclude` flags are set. Empty selections keep everything.
/// Unknown flag names are configuration errors.
pub fn build_mask(
    bitmask: &[u32],
    flag_set: &QualityFlagSet,
    include: &[String],
    exclude: &[String],
) -> Result<Vec<bool>> {
    let selection = FlagSelection::resolve(flag_set, include, exclude)?;
    Ok(selection.apply(bitmask))
}
