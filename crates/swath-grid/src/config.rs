//! Configuration surface for compositing jobs.

use serde::{Deserialize, Serialize};
use swath_common::{BoundingBox, CrsCode, QualityFlagSet};

use crate::error::Result;
use crate::quality::FlagSelection;
use crate::resample::ResamplingMode;
use crate::types::GridSpec;

/// Options describing one compositing job.
///
/// `validate`/`build` resolve everything that can fail (extent, resolution,
/// flag names) before the first swath is touched, so a batch over many
/// granules fails fast instead of partway through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeConfig {
    /// Target extent `(west, south, east, north)` in target CRS units.
    pub bounding_box: BoundingBox,

    /// Grid cell size in target CRS units.
    pub resolution: f64,

    /// Target coordinate reference system.
    pub target_crs: CrsCode,

    /// Flags that must all be set for a pixel to be kept.
    pub quality_include: Vec<String>,

    /// Flags that must not be set for a pixel to be kept.
    pub quality_exclude: Vec<String>,

    /// Collision policy for swath pixels sharing a target cell.
    pub resampling_mode: ResamplingMode,

    /// The extent crosses the antimeridian (east bound west of west bound).
    pub antimeridian: bool,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            bounding_box: BoundingBox::default(),
            resolution: 0.25,
            target_crs: CrsCode::Epsg4326,
            quality_include: Vec::new(),
            quality_exclude: Vec::new(),
            resampling_mode: ResamplingMode::MeanAccumulate,
            antimeridian: false,
        }
    }
}

impl CompositeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SWATH_BBOX") {
            if let Ok(bbox) = BoundingBox::from_string(&val) {
                config.bounding_box = bbox;
            }
        }

        if let Ok(val) = std::env::var("SWATH_RESOLUTION") {
            if let Ok(resolution) = val.parse() {
                config.resolution = resolution;
            }
        }

        if let Ok(val) = std::env::var("SWATH_TARGET_CRS") {
            if let Ok(crs) = CrsCode::parse(&val) {
                config.target_crs = crs;
            }
        }

        if let Ok(val) = std::env::var("SWATH_QUALITY_INCLUDE") {
            config.quality_include = split_names(&val);
        }

        if let Ok(val) = std::env::var("SWATH_QUALITY_EXCLUDE") {
            config.quality_exclude = split_names(&val);
        }

        if let Ok(val) = std::env::var("SWATH_RESAMPLING_MODE") {
            config.resampling_mode = ResamplingMode::parse(&val);
        }

        if let Ok(val) = std::env::var("SWATH_ANTIMERIDIAN") {
            config.antimeridian = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration against a flag vocabulary.
    pub fn validate(&self, flags: &QualityFlagSet) -> Result<()> {
        self.build(flags).map(|_| ())
    }

    /// Resolve the configuration into a ready-to-run job: target grid plus
    /// resolved flag selection. All configuration errors surface here.
    pub fn build(&self, flags: &QualityFlagSet) -> Result<CompositeJob> {
        let spec = if self.antimeridian {
            GridSpec::from_bounds_antimeridian(&self.bounding_box, self.resolution, self.target_crs)?
        } else {
            GridSpec::from_bounds(&self.bounding_box, self.resolution, self.target_crs)?
        };

        let selection = FlagSelection::resolve(flags, &self.quality_include, &self.quality_exclude)?;

        Ok(CompositeJob {
            spec,
            selection,
            mode: self.resampling_mode,
        })
    }
}

/// A validated compositing job: everything the pipeline needs, with all
/// fallible resolution already done.
#[derive(Debug, Clone)]
pub struct CompositeJob {
    pub spec: GridSpec,
    pub selection: FlagSelection,
    pub mode: ResamplingMode,
}

fn split_names(s: &str) -> Vec<String> {
    s.split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
