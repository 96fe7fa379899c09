//! The game map: an 11×11×21 grid of submap slots owning exactly one
//! [`Submap`] each, or none. A slot is either null or holds exactly one
//! submap, and no submap is ever shared between two slots.

use crate::error::GameMapError;
use crate::submap::Submap;

pub const GAME_MAP_GRID: usize = 11;
pub const GAME_MAP_LAYERS: usize = 21;
pub const GAME_MAP_SLOTS: usize = GAME_MAP_GRID * GAME_MAP_GRID * GAME_MAP_LAYERS;

/// Ground-floor index into the grid's 21 z-layers, matching
/// `crate::overmap::GROUND_Z_INDEX`'s convention.
pub const GROUND_Z_INDEX: i32 = 10;

fn slot_index(x: i32, y: i32, z: i32) -> Result<usize, GameMapError> {
    let zi = z + GROUND_Z_INDEX;
    if x < 0
        || y < 0
        || zi < 0
        || x as usize >= GAME_MAP_GRID
        || y as usize >= GAME_MAP_GRID
        || zi as usize >= GAME_MAP_LAYERS
    {
        return Err(GameMapError::OutOfBounds { x, y, z });
    }
    let zi = zi as usize;
    let x = x as usize;
    let y = y as usize;
    Ok((zi * GAME_MAP_GRID + y) * GAME_MAP_GRID + x)
}

/// An 11×11×21 grid of submap slots. Single-writer: `&mut self` is required
/// for every mutation, so two generation calls can never race on the same
/// grid; serializing concurrent inserts is left to the caller.
#[derive(Debug, Default)]
pub struct GameMap {
    slots: Vec<Option<Submap>>,
}

impl GameMap {
    pub fn new() -> Self {
        Self {
            slots: (0..GAME_MAP_SLOTS).map(|_| None).collect(),
        }
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> Result<Option<&Submap>, GameMapError> {
        let idx = slot_index(x, y, z)?;
        Ok(self.slots[idx].as_ref())
    }

    pub fn get_mut(&mut self, x: i32, y: i32, z: i32) -> Result<Option<&mut Submap>, GameMapError> {
        let idx = slot_index(x, y, z)?;
        Ok(self.slots[idx].as_mut())
    }

    /// Installs `submap` into the slot at `(x,y,z)`, returning whatever
    /// submap previously occupied it (`None` if the slot was empty). Taking
    /// `submap` by value and returning the displaced occupant is what keeps
    /// a submap from ever living in two slots at once.
    pub fn install(&mut self, x: i32, y: i32, z: i32, submap: Submap) -> Result<Option<Submap>, GameMapError> {
        let idx = slot_index(x, y, z)?;
        Ok(self.slots[idx].replace(submap))
    }

    /// Removes and returns the submap at `(x,y,z)`, leaving the slot null.
    pub fn take(&mut self, x: i32, y: i32, z: i32) -> Result<Option<Submap>, GameMapError> {
        let idx = slot_index(x, y, z)?;
        Ok(self.slots[idx].take())
    }

    pub fn is_occupied(&self, x: i32, y: i32, z: i32) -> Result<bool, GameMapError> {
        Ok(self.get(x, y, z)?.is_some())
    }
}
