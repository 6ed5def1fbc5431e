//! Swath-to-grid resampling and chunked compositing.
//!
//! This crate turns irregular satellite swath observations (per-pixel
//! latitude/longitude arrays plus science variables) into regular gridded
//! composites. It provides:
//!
//! - **Geolocation indexing**: project swath pixels into a target grid and
//!   bin them by nearest cell
//! - **Quality screening**: bitmask flag selection with fail-fast name
//!   resolution
//! - **Chunked aggregation**: fold any number of granules into per-cell
//!   running sums with O(grid) memory
//! - **Compositing**: mean, variance, and coverage-count layers from a
//!   finished aggregate
//!
//! # Architecture
//!
//! ```text
//! Swath granules
//!      │
//!      ▼
//! GeolocationIndex::map_to_grid(spec)      (pixel → cell pairs)
//!      │
//!      ├─► build_mask(bitmask, flags)      (keep / drop per pixel)
//!      │
//!      ▼
//! Resampler                                (nearest or mean-accumulate)
//!      │
//!      ▼
//! ChunkedAggregator::combine(tile)         (any order, any grouping)
//!      │
//!      ▼
//! Compositor::mean() / variance() / count()
//! ```
//!
//! # Example
//!
//! ```ignore
//! use swath_grid::{composite_swaths, CompositeConfig, Compositor};
//! use swath_common::QualityFlagSet;
//!
//! let config = CompositeConfig::from_env();
//! let flags = QualityFlagSet::ocean_color_l2();
//! let partial = composite_swaths(&config, &flags, &swaths, "chlor_a")?;
//! let mean = Compositor::new(&partial).mean();
//! ```

pub mod aggregate;
pub mod composite;
pub mod config;
pub mod error;
pub mod geoindex;
pub mod pipeline;
pub mod quality;
pub mod resample;
pub mod swath;
pub mod testdata;
pub mod types;

// Re-export commonly used types at crate root
pub use aggregate::{ChunkedAggregator, PartialAggregate};
pub use composite::Compositor;
pub use config::{CompositeConfig, CompositeJob};
pub use error::{Result, SwathGridError};
pub use geoindex::{CellMapping, GeolocationIndex};
pub use pipeline::{aggregate_swaths, composite_swaths};
pub use quality::{build_mask, FlagSelection};
pub use resample::{Resampler, ResamplingMode};
pub use swath::{Swath, SwathVariable};
pub use types::{GriddedTile, GridSpec, GridTransform};
