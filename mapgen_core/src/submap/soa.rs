//! Expanded (structure-of-arrays) submap storage: four parallel fixed-length
//! arrays of 144 cells plus three sparse maps keyed by `(x, y)`.
//! Column-major storage beats array-of-struct for scan-heavy
//! rendering/rotation work.

use std::collections::HashMap;

use super::{SpawnPoint, SUBMAP_CELLS, SUBMAP_SIZE};

pub type Coord = (u8, u8);

fn index(x: u8, y: u8) -> usize {
    y as usize * SUBMAP_SIZE + x as usize
}

#[derive(Debug, Clone)]
pub struct MapTileSoa {
    pub terrain: [u32; SUBMAP_CELLS],
    pub furniture: [u32; SUBMAP_CELLS],
    pub lum: [u8; SUBMAP_CELLS],
    pub radiation: [u16; SUBMAP_CELLS],
    pub items: HashMap<Coord, Vec<u32>>,
    pub fields: HashMap<Coord, Vec<u32>>,
    pub traps: HashMap<Coord, u32>,
}

impl MapTileSoa {
    pub fn filled_with(terrain: u32) -> Self {
        Self {
            terrain: [terrain; SUBMAP_CELLS],
            furniture: [0; SUBMAP_CELLS],
            lum: [0; SUBMAP_CELLS],
            radiation: [0; SUBMAP_CELLS],
            items: HashMap::new(),
            fields: HashMap::new(),
            traps: HashMap::new(),
        }
    }

    pub fn terrain_at(&self, x: u8, y: u8) -> u32 {
        self.terrain[index(x, y)]
    }

    pub fn furniture_at(&self, x: u8, y: u8) -> u32 {
        self.furniture[index(x, y)]
    }

    pub fn set_terrain(&mut self, x: u8, y: u8, id: u32) {
        self.terrain[index(x, y)] = id;
    }

    pub fn set_furniture(&mut self, x: u8, y: u8, id: u32) {
        self.furniture[index(x, y)] = id;
    }

    pub fn set_trap(&mut self, x: u8, y: u8, id: u32) {
        self.traps.insert((x, y), id);
    }

    pub fn trap_at(&self, x: u8, y: u8) -> Option<u32> {
        self.traps.get(&(x, y)).copied()
    }

    pub fn add_item(&mut self, x: u8, y: u8, item_id: u32) {
        self.items.entry((x, y)).or_default().push(item_id);
    }

    pub fn add_field(&mut self, x: u8, y: u8, field_id: u32) {
        self.fields.entry((x, y)).or_default().push(field_id);
    }

    /// Demotes to a uniform terrain id if every cell shares one terrain and
    /// no sparse extras exist. `spawns` is submap-level metadata and is
    /// intentionally not part of this check.
    pub fn is_uniform(&self) -> Option<u32> {
        let first = self.terrain[0];
        let all_same_terrain = self.terrain.iter().all(|&t| t == first);
        let no_furniture = self.furniture.iter().all(|&f| f == 0);
        let no_radiation = self.radiation.iter().all(|&r| r == 0);
        let no_extras =
            self.items.is_empty() && self.fields.is_empty() && self.traps.is_empty();
        if all_same_terrain && no_furniture && no_radiation && no_extras {
            Some(first)
        } else {
            None
        }
    }

    /// Rotates 90 degrees clockwise: `(x, y) -> (size-1-y, x)`.
    pub fn rotate_cw(&self, spawns: &mut [SpawnPoint]) -> Self {
        let size = SUBMAP_SIZE as u8;
        let mut rotated = Self::filled_with(0);
        for y in 0..size {
            for x in 0..size {
                let (nx, ny) = (size - 1 - y, x);
                rotated.set_terrain(nx, ny, self.terrain_at(x, y));
                rotated.set_furniture(nx, ny, self.furniture_at(x, y));
                rotated.lum[index(nx, ny)] = self.lum[index(x, y)];
                rotated.radiation[index(nx, ny)] = self.radiation[index(x, y)];
            }
        }
        for (&(x, y), v) in &self.traps {
            rotated.traps.insert((size - 1 - y, x), *v);
        }
        for (&(x, y), v) in &self.items {
            rotated.items.insert((size - 1 - y, x), v.clone());
        }
        for (&(x, y), v) in &self.fields {
            rotated.fields.insert((size - 1 - y, x), v.clone());
        }
        for sp in spawns.iter_mut() {
            let (x, y) = (sp.x, sp.y);
            sp.x = size - 1 - y;
            sp.y = x;
        }
        rotated
    }

    pub fn mirror(&self, horizontal: bool, vertical: bool, spawns: &mut [SpawnPoint]) -> Self {
        let size = SUBMAP_SIZE as u8;
        let mut mirrored = Self::filled_with(0);
        for y in 0..size {
            for x in 0..size {
                let nx = if horizontal { size - 1 - x } else { x };
                let ny = if vertical { size - 1 - y } else { y };
                mirrored.set_terrain(nx, ny, self.terrain_at(x, y));
                mirrored.set_furniture(nx, ny, self.furniture_at(x, y));
                mirrored.lum[index(nx, ny)] = self.lum[index(x, y)];
                mirrored.radiation[index(nx, ny)] = self.radiation[index(x, y)];
            }
        }
        let flip = |x: u8, y: u8| {
            (
                if horizontal { size - 1 - x } else { x },
                if vertical { size - 1 - y } else { y },
            )
        };
        for (&(x, y), v) in &self.traps {
            mirrored.traps.insert(flip(x, y), *v);
        }
        for (&(x, y), v) in &self.items {
            mirrored.items.insert(flip(x, y), v.clone());
        }
        for (&(x, y), v) in &self.fields {
            mirrored.fields.insert(flip(x, y), v.clone());
        }
        for sp in spawns.iter_mut() {
            let (x, y) = flip(sp.x, sp.y);
            sp.x = x;
            sp.y = y;
        }
        mirrored
    }
}
