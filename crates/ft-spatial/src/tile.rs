//! Web-Mercator tiles and quadkeys.
//!
//! A quadkey encodes a tile's `(x, y)` at zoom `z` as `z` base-4 digits,
//! most significant level first.  Its length is therefore its zoom level.
//!
//! ```text
//!   digit = (x bit at level) + 2 * (y bit at level)
//! ```

use std::f64::consts::PI;

use ft_core::GeoPoint;

use crate::{SpatialError, SpatialResult};

/// Latitude limit of the Web-Mercator projection.
pub const MAX_LAT: f64 = 85.051_128_779_806_59;

/// Highest supported zoom level (quadkeys of up to 23 digits).
pub const MAX_ZOOM: u8 = 23;

// ── BBox ──────────────────────────────────────────────────────────────────────

/// Geographic bounding box in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BBox {
    pub west:  f64,
    pub south: f64,
    pub east:  f64,
    pub north: f64,
}

impl BBox {
    /// The point of the box closest to `p` (planar clamp in degree space).
    #[inline]
    pub fn clamp(&self, p: GeoPoint) -> GeoPoint {
        GeoPoint::new(p.lon.clamp(self.west, self.east), p.lat.clamp(self.south, self.north))
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.west..=self.east).contains(&p.lon) && (self.south..=self.north).contains(&p.lat)
    }
}

// ── Tile ──────────────────────────────────────────────────────────────────────

/// A Web-Mercator tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl Tile {
    /// Tile at zoom `z` containing `p`.  Coordinates outside the projection
    /// are clamped onto the edge tiles.
    pub fn containing(p: GeoPoint, z: u8) -> Tile {
        let n = (1u64 << z) as f64;
        let lat = p.lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
        let x = ((p.lon + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();
        let max = n - 1.0;
        Tile {
            x: x.clamp(0.0, max) as u32,
            y: y.clamp(0.0, max) as u32,
            z,
        }
    }

    /// Parse a quadkey string.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidQuadkey`] for empty keys, keys longer than
    /// [`MAX_ZOOM`], or characters outside `0..=3`.
    pub fn from_quadkey(key: &str) -> SpatialResult<Tile> {
        if key.is_empty() || key.len() > MAX_ZOOM as usize {
            return Err(SpatialError::InvalidQuadkey(key.to_owned()));
        }
        let z = key.len() as u8;
        let (mut x, mut y) = (0u32, 0u32);
        for (i, ch) in key.bytes().enumerate() {
            let mask = 1u32 << (z as usize - i - 1);
            match ch {
                b'0' => {}
                b'1' => x |= mask,
                b'2' => y |= mask,
                b'3' => {
                    x |= mask;
                    y |= mask;
                }
                _ => return Err(SpatialError::InvalidQuadkey(key.to_owned())),
            }
        }
        Ok(Tile { x, y, z })
    }

    pub fn quadkey(&self) -> String {
        let mut key = String::with_capacity(self.z as usize);
        for level in (1..=self.z).rev() {
            let mask = 1u32 << (level - 1);
            let mut digit = b'0';
            if self.x & mask != 0 {
                digit += 1;
            }
            if self.y & mask != 0 {
                digit += 2;
            }
            key.push(digit as char);
        }
        key
    }

    pub fn bbox(&self) -> BBox {
        let n = (1u64 << self.z) as f64;
        BBox {
            west:  self.x as f64 / n * 360.0 - 180.0,
            east:  (self.x + 1) as f64 / n * 360.0 - 180.0,
            north: tile_lat(self.y as f64, n),
            south: tile_lat((self.y + 1) as f64, n),
        }
    }
}

fn tile_lat(y: f64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees()
}

// ── Disk cover ────────────────────────────────────────────────────────────────

/// Tiles at `zoom` that intersect the disk of `radius_km` around `center`.
///
/// A tile intersects when the nearest point of its bounding box lies within
/// `radius_km` (haversine).  A non-positive radius covers exactly the tile
/// containing `center`.
///
/// # Errors
///
/// [`SpatialError::CoverTooLarge`] when the disk's bounding box spans more
/// than `max_tiles` tiles.
pub fn cover_disk(center: GeoPoint, radius_km: f64, zoom: u8, max_tiles: u64) -> SpatialResult<Vec<Tile>> {
    if !(radius_km > 0.0) {
        return Ok(vec![Tile::containing(center, zoom)]);
    }

    let north = center.destination(radius_km, 0.0).lat.min(MAX_LAT);
    let south = center.destination(radius_km, 180.0).lat.max(-MAX_LAT);
    let east  = center.destination(radius_km, 90.0).lon.min(180.0);
    let west  = center.destination(radius_km, 270.0).lon.max(-180.0);

    let top_left     = Tile::containing(GeoPoint::new(west, north), zoom);
    let bottom_right = Tile::containing(GeoPoint::new(east, south), zoom);

    let span_x = (bottom_right.x - top_left.x) as u64 + 1;
    let span_y = (bottom_right.y - top_left.y) as u64 + 1;
    let tiles = span_x * span_y;
    if tiles > max_tiles {
        return Err(SpatialError::CoverTooLarge { radius_km, zoom, tiles, limit: max_tiles });
    }

    let mut out = Vec::new();
    for y in top_left.y..=bottom_right.y {
        for x in top_left.x..=bottom_right.x {
            let tile = Tile { x, y, z: zoom };
            let bbox = tile.bbox();
            if bbox.contains(center) || center.distance_km(bbox.clamp(center)) <= radius_km {
                out.push(tile);
            }
        }
    }
    Ok(out)
}
