//! Measured depth to true vertical depth

use crate::types::WellPathGeometry;

/// TVD at `measured_depth`: the negated Z of the interpolated path point.
///
/// Well path geometry has Z pointing up, so depth below datum is `-z`.
pub fn tvd_from_measured_depth<G>(geometry: &G, measured_depth: f64) -> f64
where
    G: WellPathGeometry + ?Sized,
{
    -geometry.point_at_measured_depth(measured_depth).z
}
