//! Spatial-density weights: quadkey → non-negative score.
//!
//! # CSV format
//!
//! ```csv
//! quadkey,score
//! 0320101102,14.5
//! 0320101103,2
//! ```
//!
//! Cells absent from the table score `0` and are never sampled.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ft_core::GeoPoint;

use crate::tile::{Tile, cover_disk};
use crate::{SpatialError, SpatialResult};

// ── SpatialWeights ────────────────────────────────────────────────────────────

/// Read-only density lookup consumed by placement and route selection.
///
/// Implementations must be `Send + Sync`: one table is shared by every agent
/// in the fleet.
pub trait SpatialWeights: Send + Sync {
    /// Zoom level at which [`cover`](Self::cover) enumerates cells.
    fn zoom(&self) -> u8;

    /// All scored cell keys, parallel to [`scores`](Self::scores).
    fn keys(&self) -> &[String];

    /// Scores parallel to [`keys`](Self::keys).
    fn scores(&self) -> &[f64];

    /// Score of `quadkey`, `0.0` when absent.
    fn score(&self, quadkey: &str) -> f64;

    /// Quadkeys of the cells at [`zoom`](Self::zoom) overlapping the disk of
    /// `radius_km` around `center`.
    fn cover(&self, center: GeoPoint, radius_km: f64, max_tiles: u64) -> SpatialResult<Vec<String>> {
        Ok(cover_disk(center, radius_km, self.zoom(), max_tiles)?
            .iter()
            .map(Tile::quadkey)
            .collect())
    }
}

// ── DensityTable ──────────────────────────────────────────────────────────────

/// In-memory [`SpatialWeights`] backed by a hash index over two parallel
/// vectors, so placement can hand `scores()` straight to a weighted sampler.
#[derive(Debug, Clone)]
pub struct DensityTable {
    zoom:   u8,
    keys:   Vec<String>,
    scores: Vec<f64>,
    index:  HashMap<String, usize>,
}

impl DensityTable {
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom,
            keys:   Vec::new(),
            scores: Vec::new(),
            index:  HashMap::new(),
        }
    }

    /// Insert or replace the score of `quadkey`.
    ///
    /// # Errors
    ///
    /// Rejects malformed quadkeys and negative or non-finite scores.
    pub fn insert(&mut self, quadkey: &str, score: f64) -> SpatialResult<()> {
        Tile::from_quadkey(quadkey)?;
        if !score.is_finite() || score < 0.0 {
            return Err(SpatialError::InvalidScore { quadkey: quadkey.to_owned(), score });
        }
        match self.index.get(quadkey) {
            Some(&i) => self.scores[i] = score,
            None => {
                self.index.insert(quadkey.to_owned(), self.keys.len());
                self.keys.push(quadkey.to_owned());
                self.scores.push(score);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl SpatialWeights for DensityTable {
    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn keys(&self) -> &[String] {
        &self.keys
    }

    fn scores(&self) -> &[f64] {
        &self.scores
    }

    fn score(&self, quadkey: &str) -> f64 {
        self.index.get(quadkey).map_or(0.0, |&i| self.scores[i])
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DensityRecord {
    quadkey: String,
    score:   f64,
}

/// Load a [`DensityTable`] from a CSV file.
pub fn load_density_csv(path: &Path, zoom: u8) -> SpatialResult<DensityTable> {
    let file = std::fs::File::open(path)?;
    load_density_reader(file, zoom)
}

/// Load a [`DensityTable`] from any reader producing the CSV format above.
pub fn load_density_reader<R: Read>(reader: R, zoom: u8) -> SpatialResult<DensityTable> {
    let mut table = DensityTable::new(zoom);
    let mut rdr = csv::Reader::from_reader(reader);
    for record in rdr.deserialize::<DensityRecord>() {
        let record = record?;
        table.insert(record.quadkey.trim(), record.score)?;
    }
    log::debug!("loaded density table: {} cells at zoom {}", table.len(), zoom);
    Ok(table)
}
