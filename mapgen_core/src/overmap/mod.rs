//! The overmap layer: 180×180×21 grids of overmap-terrain ids with per-cell
//! vision/exploration state, and a buffer keyed by absolute overmap
//! coordinates. Reuses `crate::content::OvermapTerrain` for overmap-terrain
//! content records, in the same style `crate::submap` already establishes
//! for the tile store.

pub mod generator;

use std::collections::HashMap;

use mapgen_types::Identifier;

use crate::error::{OvermapError, WarningSink};

pub const OVERMAP_SIZE: usize = 180;
pub const OVERMAP_LAYERS: usize = 21;
pub const OVERMAP_CELLS: usize = OVERMAP_SIZE * OVERMAP_SIZE;

/// Ground-floor index into an overmap's 21 z-layers, indexed by z-offset
/// from the underground floor.
pub const GROUND_Z_INDEX: i32 = 10;

fn z_to_index(z: i32) -> Option<usize> {
    let index = z + GROUND_Z_INDEX;
    if index < 0 || index as usize >= OVERMAP_LAYERS {
        None
    } else {
        Some(index as usize)
    }
}

fn cell_index(x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x as usize >= OVERMAP_SIZE || y as usize >= OVERMAP_SIZE {
        None
    } else {
        Some(y as usize * OVERMAP_SIZE + x as usize)
    }
}

/// Out-of-bounds reads return `OvermapCell::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OvermapCell {
    pub terrain: Identifier,
    pub vision: u8,
    pub explored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extra {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub id: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub x: i32,
    pub y: i32,
    pub size: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Radio {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub strength: i32,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct OvermapLayer {
    cells: Vec<OvermapCell>,
}

impl OvermapLayer {
    fn blank() -> Self {
        Self {
            cells: vec![OvermapCell::default(); OVERMAP_CELLS],
        }
    }

    pub fn get(&self, x: i32, y: i32) -> OvermapCell {
        match cell_index(x, y) {
            Some(i) => self.cells[i].clone(),
            None => OvermapCell::default(),
        }
    }

    pub fn set(&mut self, x: i32, y: i32, cell: OvermapCell) {
        if let Some(i) = cell_index(x, y) {
            self.cells[i] = cell;
        }
    }
}

/// Out-of-bounds mutation at any coordinate is a no-op.
#[derive(Debug, Clone)]
pub struct Overmap {
    layers: Vec<OvermapLayer>,
    pub cities: Vec<City>,
    pub radios: Vec<Radio>,
    pub notes: Vec<Note>,
    pub extras: Vec<Extra>,
}

impl Overmap {
    pub fn blank() -> Self {
        Self {
            layers: (0..OVERMAP_LAYERS).map(|_| OvermapLayer::blank()).collect(),
            cities: Vec::new(),
            radios: Vec::new(),
            notes: Vec::new(),
            extras: Vec::new(),
        }
    }

    pub fn get_cell(&self, x: i32, y: i32, z: i32) -> OvermapCell {
        match z_to_index(z) {
            Some(i) => self.layers[i].get(x, y),
            None => OvermapCell::default(),
        }
    }

    pub fn set_cell(&mut self, x: i32, y: i32, z: i32, cell: OvermapCell) {
        if let Some(i) = z_to_index(z) {
            self.layers[i].set(x, y, cell);
        }
    }

    pub fn validate_z(z: i32) -> Result<(), OvermapError> {
        if z_to_index(z).is_some() {
            Ok(())
        } else {
            Err(OvermapError::InvalidZLevel(z))
        }
    }
}

impl Default for Overmap {
    fn default() -> Self {
        Self::blank()
    }
}

/// One unit here is one 180×180 overmap page, not one OMT.
pub type OvermapCoord = (i32, i32);

#[derive(Debug, Default)]
pub struct OvermapBuffer {
    overmaps: HashMap<OvermapCoord, Overmap>,
    terrain_cache: crate::content::ContentStore<crate::content::OvermapTerrain>,
}

impl OvermapBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terrain_cache(terrain_cache: crate::content::ContentStore<crate::content::OvermapTerrain>) -> Self {
        Self {
            overmaps: HashMap::new(),
            terrain_cache,
        }
    }

    pub fn get(&self, coord: OvermapCoord) -> Option<&Overmap> {
        self.overmaps.get(&coord)
    }

    pub fn get_mut(&mut self, coord: OvermapCoord) -> Option<&mut Overmap> {
        self.overmaps.get_mut(&coord)
    }

    pub fn insert(&mut self, coord: OvermapCoord, overmap: Overmap) {
        self.overmaps.insert(coord, overmap);
    }

    pub fn get_or_generate(&mut self, coord: OvermapCoord, sink: &mut WarningSink) -> &Overmap {
        self.overmaps.entry(coord).or_insert_with(|| {
            generator::OvermapGenerator::new(&self.terrain_cache).generate(coord, sink)
        })
    }

    pub fn terrain_cache(&self) -> &crate::content::ContentStore<crate::content::OvermapTerrain> {
        &self.terrain_cache
    }

    /// The four cardinal neighbors currently loaded, in north/east/south/west
    /// order; unloaded neighbors are simply absent, never generated as a
    /// side effect.
    pub fn get_neighbors(&self, coord: OvermapCoord) -> [Option<&Overmap>; 4] {
        let (x, y) = coord;
        [
            self.overmaps.get(&(x, y - 1)),
            self.overmaps.get(&(x + 1, y)),
            self.overmaps.get(&(x, y + 1)),
            self.overmaps.get(&(x - 1, y)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_read_returns_default() {
        let overmap = Overmap::blank();
        assert_eq!(overmap.get_cell(-1, 0, 0), OvermapCell::default());
        assert_eq!(overmap.get_cell(0, 0, 99), OvermapCell::default());
        assert_eq!(overmap.get_cell(200, 200, 0), OvermapCell::default());
    }

    #[test]
    fn out_of_bounds_write_is_noop() {
        let mut overmap = Overmap::blank();
        let before = overmap.get_cell(0, 0, 0);
        overmap.set_cell(-5, -5, 0, OvermapCell {
            terrain: "t_forest".into(),
            vision: 4,
            explored: true,
        });
        assert_eq!(overmap.get_cell(0, 0, 0), before);
    }

    #[test]
    fn in_bounds_roundtrip() {
        let mut overmap = Overmap::blank();
        overmap.set_cell(90, 90, 0, OvermapCell {
            terrain: "t_forest".into(),
            vision: 2,
            explored: true,
        });
        let cell = overmap.get_cell(90, 90, 0);
        assert_eq!(cell.terrain, "t_forest".into());
        assert_eq!(cell.vision, 2);
        assert!(cell.explored);
    }

    #[test]
    fn validate_z_rejects_out_of_range() {
        assert!(Overmap::validate_z(0).is_ok());
        assert!(Overmap::validate_z(-11).is_err());
        assert!(Overmap::validate_z(11).is_err());
    }

    #[test]
    fn get_neighbors_only_returns_loaded() {
        let mut buffer = OvermapBuffer::new();
        buffer.insert((0, 0), Overmap::blank());
        buffer.insert((1, 0), Overmap::blank());

        let neighbors = buffer.get_neighbors((0, 0));
        assert!(neighbors[0].is_none());
        assert!(neighbors[1].is_some());
        assert!(neighbors[2].is_none());
        assert!(neighbors[3].is_none());
    }
}
