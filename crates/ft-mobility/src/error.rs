use ft_core::CoreError;
use ft_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("malformed route: {0}")]
    MalformedRoute(&'static str),

    #[error("routing request timed out after {0} ms")]
    Timeout(u64),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;

/// Route selection or placement gave up.
#[derive(Debug, Error, PartialEq)]
pub enum SelectError {
    #[error("no usable route after {attempts} attempts (radius reached {radius_km:.3} km)")]
    Exhausted { attempts: u32, radius_km: f64 },

    #[error("no placement after {attempts} attempts")]
    PlacementExhausted { attempts: u32 },
}
