//! Coordinate reference system transformations.
//!
//! Implements map projections from scratch without external dependencies.
//! All projections map geographic WGS84 coordinates (lon/lat degrees) to
//! planar target coordinates and back. Points outside a projection's domain
//! map to `None` rather than producing garbage coordinates.

pub mod geographic;
pub mod mercator;
pub mod sinusoidal;
pub mod transform;

pub use transform::{project, unproject};
