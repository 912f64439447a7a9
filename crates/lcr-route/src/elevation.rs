//! Elevation sampling collaborator.
//!
//! Elevation rasters live outside this workspace; the post-processor only
//! asks a sampler for heights at points along the route.

use lcr_core::GeoPoint;

/// Height lookup at a geographic point.
///
/// Return `NaN` where no data is available; such samples are left out of the
/// profile and the elevation statistics.
///
/// Any `Fn(GeoPoint) -> f64` closure is a sampler:
///
/// ```rust,ignore
/// let flat = |_p: GeoPoint| 120.0;
/// engine.generate(&request, &flat, &cancel)?;
/// ```
pub trait ElevationSampler {
    fn sample(&self, point: GeoPoint) -> f64;
}

impl<F> ElevationSampler for F
where
    F: Fn(GeoPoint) -> f64,
{
    #[inline]
    fn sample(&self, point: GeoPoint) -> f64 {
        self(point)
    }
}

/// Sampler with no data anywhere.
pub fn no_elevation(_point: GeoPoint) -> f64 {
    f64::NAN
}
