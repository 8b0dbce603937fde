//! Synthetic grid city.
//!
//! A square street grid centred on a fixed downtown point, with faster
//! arterials every fourth street, plus a density table that peaks downtown
//! and falls off with distance.

use ft_core::GeoPoint;
use ft_spatial::{DensityTable, RoadNetwork, RoadNetworkBuilder, SpatialResult, Tile};

/// Downtown, roughly the centre of Lyon.
pub const DOWNTOWN: GeoPoint = GeoPoint { lon: 4.8357, lat: 45.7640 };

/// Streets per side.
const GRID: usize = 25;

/// Street spacing in degrees (~200 m at this latitude).
const SPACING_LON: f64 = 0.0026;
const SPACING_LAT: f64 = 0.0018;

const STREET_KMH:   f64 = 30.0;
const ARTERIAL_KMH: f64 = 50.0;

pub fn build_network() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let half = (GRID / 2) as f64;

    let nodes: Vec<_> = (0..GRID * GRID)
        .map(|i| {
            let (row, col) = ((i / GRID) as f64, (i % GRID) as f64);
            b.add_node(GeoPoint::new(
                DOWNTOWN.lon + (col - half) * SPACING_LON,
                DOWNTOWN.lat + (row - half) * SPACING_LAT,
            ))
        })
        .collect();

    let speed = |street: usize| if street % 4 == 0 { ARTERIAL_KMH } else { STREET_KMH };

    for row in 0..GRID {
        for col in 0..GRID {
            let here = nodes[row * GRID + col];
            if col + 1 < GRID {
                b.add_road_at_speed(here, nodes[row * GRID + col + 1], speed(row));
            }
            if row + 1 < GRID {
                b.add_road_at_speed(here, nodes[(row + 1) * GRID + col], speed(col));
            }
        }
    }
    b.build()
}

/// Score every tile at `zoom` that overlaps the grid: `1 / (1 + d²)` with
/// `d` the distance in km from the tile centre to downtown.
pub fn build_density(zoom: u8) -> SpatialResult<DensityTable> {
    let half = (GRID / 2) as f64;
    let sw = Tile::containing(
        GeoPoint::new(DOWNTOWN.lon - half * SPACING_LON, DOWNTOWN.lat - half * SPACING_LAT),
        zoom,
    );
    let ne = Tile::containing(
        GeoPoint::new(DOWNTOWN.lon + half * SPACING_LON, DOWNTOWN.lat + half * SPACING_LAT),
        zoom,
    );

    let mut table = DensityTable::new(zoom);
    // Tile rows grow southward.
    for y in ne.y..=sw.y {
        for x in sw.x..=ne.x {
            let tile = Tile { x, y, z: zoom };
            let bb = tile.bbox();
            let centre = GeoPoint::new((bb.west + bb.east) / 2.0, (bb.south + bb.north) / 2.0);
            let d = centre.distance_km(DOWNTOWN);
            table.insert(&tile.quadkey(), 1.0 / (1.0 + d * d))?;
        }
    }
    Ok(table)
}
