//! GPS noise for externally visible positions.

use ft_core::{GeoPoint, RandomSource};

/// Displaces reported coordinates to emulate receiver inaccuracy.
///
/// The agent's true location is never passed through here; only copies
/// written into probes, traces and trip routes are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoNoise {
    /// Standard deviation of the displacement, kilometres.
    pub accuracy_km: f64,
}

impl GeoNoise {
    pub fn new(accuracy_km: f64) -> Self {
        Self { accuracy_km }
    }

    /// Displace `p` by `N(0,1) * accuracy_km` kilometres at bearing
    /// `N(0,1) * 360`.  With zero (or invalid) accuracy `p` is returned as is
    /// and `rng` is not consumed.
    pub fn jitter<R: RandomSource + ?Sized>(&self, p: GeoPoint, rng: &mut R) -> GeoPoint {
        if !(self.accuracy_km > 0.0) || !self.accuracy_km.is_finite() {
            return p;
        }
        let distance = rng.normal(0.0, 1.0) * self.accuracy_km;
        let bearing = rng.normal(0.0, 1.0) * 360.0;
        p.destination(distance, bearing)
    }

    /// Jitter every vertex of a polyline independently.
    pub fn jitter_line<R: RandomSource + ?Sized>(&self, coords: &[GeoPoint], rng: &mut R) -> Vec<GeoPoint> {
        coords.iter().map(|&p| self.jitter(p, rng)).collect()
    }
}
