//! Parallel map → associative reduce over many swaths.
//!
//! Each worker independently resamples swaths into per-worker partial
//! aggregates; the reduce step merges partials pairwise. No ordering is
//! required between workers because combination is associative and
//! commutative, and every tile is exclusively owned by one worker until it
//! has been folded in. The aggregate is only ever mutated by a completed
//! combine, so abandoning one swath's resampling cannot corrupt the result.

use rayon::prelude::*;
use tracing::{debug, info};

use swath_common::QualityFlagSet;

use crate::aggregate::PartialAggregate;
use crate::config::{CompositeConfig, CompositeJob};
use crate::error::{Result, SwathGridError};
use crate::geoindex::GeolocationIndex;
use crate::resample::{Resampler, ResamplingMode};
use crate::swath::Swath;

/// Resample and aggregate a batch of swaths for one variable.
///
/// Configuration errors surface before any swath is processed. The call
/// always produces an aggregate: swaths that contribute nothing (outside
/// the grid, fully masked) simply add nothing, and an empty batch yields an
/// empty single-band aggregate.
pub fn composite_swaths(
    config: &CompositeConfig,
    flags: &QualityFlagSet,
    swaths: &[Swath],
    variable: &str,
) -> Result<PartialAggregate> {
    let job = config.build(flags)?;
    aggregate_swaths(&job, swaths, variable)
}

/// Run the map/reduce over an already validated job.
pub fn aggregate_swaths(
    job: &CompositeJob,
    swaths: &[Swath],
    variable: &str,
) -> Result<PartialAggregate> {
    info!(
        granules = swaths.len(),
        variable,
        grid = %format!("{}x{}", job.spec.width, job.spec.height),
        mode = %job.mode,
        "aggregating swaths"
    );

    let reduced = swaths
        .par_iter()
        .enumerate()
        .map(|(i, swath)| {
            let partial = resample_one(job, swath, variable)?;
            debug!(
                granule = i,
                contributions = partial.total_contributions(),
                "resampled granule"
            );
            Ok(partial)
        })
        .try_reduce_with(|mut left, right| {
            left.merge(&right)?;
            Ok(left)
        });

    match reduced {
        Some(result) => result,
        // Empty batch: a legitimate empty aggregate, not a failure.
        None => Ok(PartialAggregate::new(job.spec.clone(), 1)),
    }
}

/// Resample a single swath into its own partial aggregate.
pub fn resample_one(job: &CompositeJob, swath: &Swath, variable: &str) -> Result<PartialAggregate> {
    let keep = match (&swath.quality, job.selection.is_empty()) {
        (_, true) => None,
        (Some(bitmask), false) => Some(job.selection.apply(bitmask)),
        (None, false) => {
            return Err(SwathGridError::ConfigError(
                "quality flags configured but swath carries no bitmask variable".to_string(),
            ))
        }
    };

    let mapping = GeolocationIndex::for_swath(swath).map_to_grid(&job.spec)?;
    let resampler = Resampler::new(job.spec.clone(), job.mode);

    match job.mode {
        ResamplingMode::MeanAccumulate => {
            resampler.resample_partial(swath, variable, &mapping, keep.as_deref())
        }
        ResamplingMode::Nearest => {
            let tile = resampler.resample_tile(swath, variable, &mapping, keep.as_deref())?;
            let mut partial = PartialAggregate::new(job.spec.clone(), tile.bands);
            partial.combine_tile(&tile)?;
            Ok(partial)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::Compositor;
    use crate::swath::SwathVariable;
    use swath_common::BoundingBox;

    fn config_2x2() -> CompositeConfig {
        CompositeConfig {
            bounding_box: BoundingBox::new(0.0, 0.0, 2.0, 2.0),
            resolution: 1.0,
            ..Default::default()
        }
    }

    fn swath_with_values(lat: Vec<f64>, lon: Vec<f64>, values: Vec<f32>) -> Swath {
        let cols = values.len();
        Swath::new(1, cols, lat, lon)
            .unwrap()
            .with_variable(SwathVariable::new("chlor_a", values))
            .unwrap()
    }

    #[test]
    fn test_empty_batch_completes() {
        let flags = QualityFlagSet::ocean_color_l2();
        let partial = composite_swaths(&config_2x2(), &flags, &[], "chlor_a").unwrap();
        assert_eq!(partial.total_contributions(), 0);
        assert!(Compositor::new(&partial).mean().is_all_nodata());
    }

    #[test]
    fn test_swaths_outside_grid_contribute_nothing() {
        let flags = QualityFlagSet::ocean_color_l2();
        let inside = swath_with_values(vec![1.5], vec![0.5], vec![10.0]);
        let outside = swath_with_values(vec![50.0], vec![120.0], vec![99.0]);

        let partial =
            composite_swaths(&config_2x2(), &flags, &[inside, outside], "chlor_a").unwrap();
        assert_eq!(partial.total_contributions(), 1);

        let mean = Compositor::new(&partial).mean();
        assert_eq!(mean.get(0, 0, 0), Some(10.0));
    }

    #[test]
    fn test_quality_selection_without_bitmask_is_config_error() {
        let flags = QualityFlagSet::ocean_color_l2();
        let config = CompositeConfig {
            quality_exclude: vec!["LAND".to_string()],
            ..config_2x2()
        };
        let swath = swath_with_values(vec![1.5], vec![0.5], vec![10.0]);

        let result = composite_swaths(&config, &flags, &[swath], "chlor_a");
        assert!(matches!(result, Err(SwathGridError::ConfigError(_))));
    }

    #[test]
    fn test_parallel_reduce_matches_sequential() {
        let flags = QualityFlagSet::ocean_color_l2();
        let config = config_2x2();
        let job = config.build(&flags).unwrap();

        let swaths: Vec<Swath> = (0..16)
            .map(|i| swath_with_values(vec![1.5], vec![0.5], vec![i as f32]))
            .collect();

        let parallel = aggregate_swaths(&job, &swaths, "chlor_a").unwrap();

        let mut sequential = PartialAggregate::new(job.spec.clone(), 1);
        for swath in &swaths {
            let partial = resample_one(&job, swath, "chlor_a").unwrap();
            sequential.merge(&partial).unwrap();
        }

        assert_eq!(parallel.count_at(0, 0), sequential.count_at(0, 0));
        assert!((parallel.sum_at(0, 0) - sequential.sum_at(0, 0)).abs() < 1e-9);
    }
}
