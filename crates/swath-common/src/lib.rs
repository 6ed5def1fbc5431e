//! Common types shared across the swath-gridder crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod flags;

pub use bbox::BoundingBox;
pub use crs::CrsCode;
pub use error::{CommonError, CommonResult};
pub use flags::{QualityFlag, QualityFlagSet};
