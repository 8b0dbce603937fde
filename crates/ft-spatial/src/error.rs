//! Spatial-subsystem error type.

use thiserror::Error;

use ft_core::{CoreError, GeoPoint, NodeId};

/// Errors produced by `ft-spatial` and by [`RoutingService`][crate::RoutingService]
/// implementations.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("cannot snap {0}: the road network is empty")]
    EmptyNetwork(GeoPoint),

    #[error("invalid quadkey {0:?}")]
    InvalidQuadkey(String),

    #[error("invalid density score {score} for cell {quadkey}")]
    InvalidScore { quadkey: String, score: f64 },

    #[error("cover of radius {radius_km} km at zoom {zoom} needs {tiles} tiles (limit {limit})")]
    CoverTooLarge {
        radius_km: f64,
        zoom:      u8,
        tiles:     u64,
        limit:     u64,
    },

    #[error("no cell with a positive density score to sample from")]
    NoWeightedCell,

    #[error("routing service failure: {0}")]
    Service(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
