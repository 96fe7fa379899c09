//! The tile store: a fixed 12×12 submap, either uniform (one terrain id for
//! every cell) or expanded (structure-of-arrays). The two representations
//! are tied by `uniform != null XOR expanded != null`; writes that would
//! violate uniformity lazily expand first.

pub mod soa;

use soa::MapTileSoa;

pub const SUBMAP_SIZE: usize = 12;
pub const SUBMAP_CELLS: usize = SUBMAP_SIZE * SUBMAP_SIZE;

pub const NULL_TERRAIN_ID: u32 = 0;
pub const NULL_FURNITURE_ID: u32 = 0;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnPoint {
    pub x: u8,
    pub y: u8,
    pub monster_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub terrain: u32,
    pub furniture: u32,
    pub lum: u8,
    pub radiation: u16,
    pub trap: Option<u32>,
}

#[derive(Debug, Clone)]
enum Storage {
    Uniform(u32),
    Expanded(Box<MapTileSoa>),
}

/// A 12×12 cell grid, one unit of map storage. A single owner mutates it
/// during generation; afterward it's read-only under the owning game-map
/// grid.
#[derive(Debug, Clone)]
pub struct Submap {
    storage: Storage,
    pub spawns: Vec<SpawnPoint>,
    pub field_count: u32,
    pub last_touched: u64,
}

impl Submap {
    pub fn new_uniform(terrain: u32) -> Self {
        Self {
            storage: Storage::Uniform(terrain),
            spawns: Vec::new(),
            field_count: 0,
            last_touched: 0,
        }
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self.storage, Storage::Uniform(_))
    }

    pub fn uniform_terrain(&self) -> Option<u32> {
        match self.storage {
            Storage::Uniform(t) => Some(t),
            Storage::Expanded(_) => None,
        }
    }

    fn expand(&mut self) {
        if let Storage::Uniform(t) = self.storage {
            self.storage = Storage::Expanded(Box::new(MapTileSoa::filled_with(t)));
        }
    }

    pub fn get_tile(&self, x: u8, y: u8) -> Tile {
        match &self.storage {
            Storage::Uniform(t) => Tile {
                terrain: *t,
                furniture: NULL_FURNITURE_ID,
                lum: 0,
                radiation: 0,
                trap: None,
            },
            Storage::Expanded(soa) => Tile {
                terrain: soa.terrain_at(x, y),
                furniture: soa.furniture_at(x, y),
                lum: soa.lum[y as usize * SUBMAP_SIZE + x as usize],
                radiation: soa.radiation[y as usize * SUBMAP_SIZE + x as usize],
                trap: soa.trap_at(x, y),
            },
        }
    }

    pub fn get_terrain(&self, x: u8, y: u8) -> u32 {
        match &self.storage {
            Storage::Uniform(t) => *t,
            Storage::Expanded(soa) => soa.terrain_at(x, y),
        }
    }

    pub fn set_terrain(&mut self, x: u8, y: u8, id: u32) {
        if let Storage::Uniform(t) = self.storage {
            if t == id {
                return;
            }
        }
        self.expand();
        if let Storage::Expanded(soa) = &mut self.storage {
            soa.set_terrain(x, y, id);
        }
    }

    pub fn set_furniture(&mut self, x: u8, y: u8, id: u32) {
        if let Storage::Uniform(_) = self.storage {
            if id == NULL_FURNITURE_ID {
                return;
            }
        }
        self.expand();
        if let Storage::Expanded(soa) = &mut self.storage {
            soa.set_furniture(x, y, id);
        }
    }

    pub fn set_trap(&mut self, x: u8, y: u8, id: u32) {
        self.expand();
        if let Storage::Expanded(soa) = &mut self.storage {
            soa.set_trap(x, y, id);
        }
    }

    pub fn add_item(&mut self, x: u8, y: u8, item_id: u32) {
        self.expand();
        if let Storage::Expanded(soa) = &mut self.storage {
            soa.add_item(x, y, item_id);
        }
    }

    pub fn items_at(&self, x: u8, y: u8) -> &[u32] {
        match &self.storage {
            Storage::Uniform(_) => &[],
            Storage::Expanded(soa) => soa.items.get(&(x, y)).map(|v| v.as_slice()).unwrap_or(&[]),
        }
    }

    pub fn add_field(&mut self, x: u8, y: u8, field_id: u32) {
        self.field_count += 1;
        self.expand();
        if let Storage::Expanded(soa) = &mut self.storage {
            soa.add_field(x, y, field_id);
        }
    }

    pub fn fields_at(&self, x: u8, y: u8) -> &[u32] {
        match &self.storage {
            Storage::Uniform(_) => &[],
            Storage::Expanded(soa) => soa.fields.get(&(x, y)).map(|v| v.as_slice()).unwrap_or(&[]),
        }
    }

    /// Converts back to uniform if every cell shares one terrain and no
    /// sparse extras are present. A no-op on an already-uniform submap.
    pub fn optimize(&mut self) {
        if let Storage::Expanded(soa) = &self.storage {
            if let Some(t) = soa.is_uniform() {
                self.storage = Storage::Uniform(t);
            }
        }
    }

    /// Rotates clockwise by `turns` quarter-turns (mod 4). A uniform submap
    /// is fixed under rotation.
    pub fn rotate(&mut self, turns: i32) {
        let turns = turns.rem_euclid(4);
        if turns == 0 {
            return;
        }
        self.expand();
        for _ in 0..turns {
            if let Storage::Expanded(soa) = &self.storage {
                let rotated = soa.rotate_cw(&mut self.spawns);
                self.storage = Storage::Expanded(Box::new(rotated));
            }
        }
    }

    /// Horizontal and/or vertical mirror. A uniform submap is fixed.
    pub fn mirror(&mut self, horizontal: bool, vertical: bool) {
        if !horizontal && !vertical {
            return;
        }
        self.expand();
        if let Storage::Expanded(soa) = &self.storage {
            let mirrored = soa.mirror(horizontal, vertical, &mut self.spawns);
            self.storage = Storage::Expanded(Box::new(mirrored));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_roundtrips_rotation() {
        let mut s = Submap::new_uniform(5);
        s.rotate(4);
        assert!(s.is_uniform());
        assert_eq!(s.uniform_terrain(), Some(5));
    }

    #[test]
    fn setting_same_terrain_stays_uniform() {
        let mut s = Submap::new_uniform(5);
        s.set_terrain(3, 3, 5);
        assert!(s.is_uniform());
    }

    #[test]
    fn setting_different_terrain_expands() {
        let mut s = Submap::new_uniform(5);
        s.set_terrain(3, 3, 9);
        assert!(!s.is_uniform());
        assert_eq!(s.get_terrain(3, 3), 9);
        assert_eq!(s.get_terrain(0, 0), 5);
    }

    #[test]
    fn optimize_is_idempotent_and_noop_on_uniform() {
        let mut s = Submap::new_uniform(5);
        s.optimize();
        assert!(s.is_uniform());

        let mut t = Submap::new_uniform(5);
        t.set_terrain(0, 0, 9);
        t.set_terrain(0, 0, 5);
        t.optimize();
        assert!(t.is_uniform());
        t.optimize();
        assert!(t.is_uniform());
    }

    #[test]
    fn rotate_four_times_is_identity() {
        let mut s = Submap::new_uniform(1);
        s.set_terrain(0, 0, 2);
        s.set_terrain(11, 0, 3);
        let before: Vec<u32> = (0..12)
            .flat_map(|y| (0..12).map(move |x| (x, y)))
            .map(|(x, y)| s.get_terrain(x, y))
            .collect();
        s.rotate(4);
        let after: Vec<u32> = (0..12)
            .flat_map(|y| (0..12).map(move |x| (x, y)))
            .map(|(x, y)| s.get_terrain(x, y))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn rotate_then_inverse_is_identity() {
        for r in 1..=3 {
            let mut s = Submap::new_uniform(1);
            s.set_terrain(2, 5, 7);
            let before: Vec<u32> = (0..12)
                .flat_map(|y| (0..12).map(move |x| (x, y)))
                .map(|(x, y)| s.get_terrain(x, y))
                .collect();
            s.rotate(r);
            s.rotate(-r);
            let after: Vec<u32> = (0..12)
                .flat_map(|y| (0..12).map(move |x| (x, y)))
                .map(|(x, y)| s.get_terrain(x, y))
                .collect();
            assert_eq!(before, after, "failed for r={r}");
        }
    }

    #[test]
    fn horizontal_mirror_twice_is_identity() {
        let mut s = Submap::new_uniform(1);
        s.set_terrain(2, 5, 7);
        let before: Vec<u32> = (0..12)
            .flat_map(|y| (0..12).map(move |x| (x, y)))
            .map(|(x, y)| s.get_terrain(x, y))
            .collect();
        s.mirror(true, false);
        s.mirror(true, false);
        let after: Vec<u32> = (0..12)
            .flat_map(|y| (0..12).map(move |x| (x, y)))
            .map(|(x, y)| s.get_terrain(x, y))
            .collect();
        assert_eq!(before, after);
    }
}
