//! Geographic coordinate types and geodesic utilities.
//!
//! `GeoPoint` uses `f64` longitude/latitude.  GPS jitter is applied at the
//! metre scale, which single precision cannot resolve away from the equator.
//!
//! All distances on the public API are **kilometres** unless the method name
//! says otherwise (`distance_m`).  Bearings are compass degrees, clockwise
//! from north.

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `[lon, lat]`, the GeoJSON coordinate order.
    #[inline]
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Haversine great-circle distance in kilometres.
    #[inline]
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        self.distance_m(other) / 1000.0
    }

    /// Initial bearing from `self` towards `other`, normalised to `[0, 360)`.
    pub fn bearing_to(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        normalize_bearing(y.atan2(x).to_degrees())
    }

    /// The point reached by travelling `distance_km` from `self` along the
    /// great circle with initial `bearing` (degrees).
    ///
    /// Negative distances travel in the opposite direction.
    pub fn destination(self, distance_km: f64, bearing: f64) -> GeoPoint {
        let lat1 = self.lat.to_radians();
        let lon1 = self.lon.to_radians();
        let theta = bearing.to_radians();
        let delta = distance_km * 1000.0 / EARTH_RADIUS_M;

        let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
        let lon2 = lon1
            + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

        GeoPoint::new(lon2.to_degrees(), lat2.to_degrees())
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

/// Wrap any finite angle into `[0, 360)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly `360.0`; that
/// case folds back to `0.0` so the half-open bound always holds.
#[inline]
pub fn normalize_bearing(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Signed shortest rotation from bearing `from` to bearing `to`, in
/// `[-180, 180]`.  Positive is clockwise (a right turn).
#[inline]
pub fn turn_delta(from: f64, to: f64) -> f64 {
    let diff = to - from;
    if diff.abs() > 180.0 {
        diff - 360.0 * diff.signum()
    } else {
        diff
    }
}

// ── LineString ────────────────────────────────────────────────────────────────

/// A polyline of at least two coordinates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineString {
    coords: Vec<GeoPoint>,
}

impl LineString {
    /// Validate and wrap `coords`.
    ///
    /// # Errors
    ///
    /// Fails with fewer than two coordinates or a non-finite coordinate.
    pub fn new(coords: Vec<GeoPoint>) -> CoreResult<Self> {
        if coords.len() < 2 {
            return Err(CoreError::DegenerateLine(coords.len()));
        }
        if let Some(bad) = coords.iter().find(|c| !c.is_finite()) {
            return Err(CoreError::NonFinite { lon: bad.lon, lat: bad.lat });
        }
        Ok(Self { coords })
    }

    #[inline]
    pub fn coords(&self) -> &[GeoPoint] {
        &self.coords
    }

    #[inline]
    pub fn first(&self) -> GeoPoint {
        self.coords[0]
    }

    #[inline]
    pub fn last(&self) -> GeoPoint {
        self.coords[self.coords.len() - 1]
    }

    /// Total length in kilometres.
    pub fn length_km(&self) -> f64 {
        self.coords
            .windows(2)
            .map(|w| w[0].distance_km(w[1]))
            .sum()
    }

    /// The point `distance_km` along the line from its start.
    ///
    /// Clamps to the first coordinate for non-positive (or NaN) distances and
    /// to the last coordinate past the end.
    pub fn along(&self, distance_km: f64) -> GeoPoint {
        if !(distance_km > 0.0) {
            return self.first();
        }
        let mut travelled = 0.0;
        for w in self.coords.windows(2) {
            let seg = w[0].distance_km(w[1]);
            if travelled + seg >= distance_km {
                let overshoot = distance_km - travelled;
                if overshoot <= 0.0 {
                    return w[0];
                }
                return w[0].destination(overshoot, w[0].bearing_to(w[1]));
            }
            travelled += seg;
        }
        self.last()
    }
}
