//! Typed content loaders: terrain, furniture, trap and overmap-terrain
//! records, each deserialized through a `#[content_entry]`-generated `*Raw`
//! struct and resolved via [`loader::resolve_inheritance`]. Palettes and
//! mapgen templates have their own loaders (`crate::palette`, `crate::mapgen`)
//! since their raw JSON shape does not fit the flat `#[content_entry]` record
//! (and in practice never carries `copy-from`).

pub mod furniture;
pub mod loader;
pub mod overmap_terrain;
pub mod store;
pub mod terrain;
pub mod trap;

pub use furniture::Furniture;
pub use overmap_terrain::OvermapTerrain;
pub use store::ContentStore;
pub use terrain::Terrain;
pub use trap::Trap;

use crate::error::WarningSink;

/// The four typed content stores populated by [`load`]. Content records are
/// immutable after this point and may be shared by reference across
/// concurrent generation calls.
#[derive(Debug)]
pub struct ContentRegistry {
    pub terrain: ContentStore<Terrain>,
    pub furniture: ContentStore<Furniture>,
    pub trap: ContentStore<Trap>,
    pub overmap_terrain: ContentStore<OvermapTerrain>,
}

impl Default for ContentRegistry {
    /// Reserves int id 0 as the null entry in the terrain, furniture and
    /// trap stores before any content loads, so an unresolved reference that
    /// falls back to bare `0` always means "nothing".
    fn default() -> Self {
        let mut registry = Self {
            terrain: ContentStore::new(),
            furniture: ContentStore::new(),
            trap: ContentStore::new(),
            overmap_terrain: ContentStore::new(),
        };
        registry.terrain.insert(mapgen_types::NULL_TERRAIN.into(), Terrain::default());
        registry.furniture.insert(mapgen_types::NULL_FURNITURE.into(), Furniture::default());
        registry.trap.insert(mapgen_types::NULL_TRAP.into(), Trap::default());
        registry
    }
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_terrain(&mut self, raws: Vec<terrain::TerrainRaw>, sink: &mut WarningSink) {
        for raw in loader::resolve_inheritance(raws, sink) {
            for concrete in raw.into_concrete() {
                self.terrain.insert(concrete.id.clone(), concrete);
            }
        }
    }

    pub fn load_furniture(&mut self, raws: Vec<furniture::FurnitureRaw>, sink: &mut WarningSink) {
        for raw in loader::resolve_inheritance(raws, sink) {
            for concrete in raw.into_concrete() {
                self.furniture.insert(concrete.id.clone(), concrete);
            }
        }
    }

    pub fn load_trap(&mut self, raws: Vec<trap::TrapRaw>, sink: &mut WarningSink) {
        for raw in loader::resolve_inheritance(raws, sink) {
            for concrete in raw.into_concrete() {
                self.trap.insert(concrete.id.clone(), concrete);
            }
        }
    }

    pub fn load_overmap_terrain(
        &mut self,
        raws: Vec<overmap_terrain::OvermapTerrainRaw>,
        sink: &mut WarningSink,
    ) {
        for raw in loader::resolve_inheritance(raws, sink) {
            for concrete in raw.into_concrete() {
                self.overmap_terrain.insert(concrete.id.clone(), concrete);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapgen_types::{IdentityField, MaybeVec};

    #[test]
    fn null_terrain_furniture_and_trap_reserve_int_id_zero() {
        let registry = ContentRegistry::new();
        assert_eq!(registry.terrain.int_id_of(&mapgen_types::NULL_TERRAIN.into()), Some(0));
        assert_eq!(registry.furniture.int_id_of(&mapgen_types::NULL_FURNITURE.into()), Some(0));
        assert_eq!(registry.trap.int_id_of(&mapgen_types::NULL_TRAP.into()), Some(0));
    }

    #[test]
    fn loading_real_content_does_not_shift_the_null_reservation() {
        let mut registry = ContentRegistry::new();
        let mut sink = WarningSink::new();
        let raw = terrain::TerrainRaw {
            identity: IdentityField::Concrete {
                id: MaybeVec::Single("t_floor".into()),
            },
            flags: vec![],
            copy_from: None,
            extend: None,
            delete: None,
            name: None,
            symbol: None,
            color: None,
            move_cost: Some(2),
            visibility: None,
            connect_groups: None,
            connects_to: None,
        };
        registry.load_terrain(vec![raw], &mut sink);
        assert_eq!(registry.terrain.int_id_of(&mapgen_types::NULL_TERRAIN.into()), Some(0));
        assert_ne!(registry.terrain.int_id_of(&"t_floor".into()), Some(0));
    }

    #[test]
    fn terrain_get_by_string_id_matches_get_by_int_id() {
        let mut registry = ContentRegistry::new();
        let mut sink = WarningSink::new();
        let raw = terrain::TerrainRaw {
            identity: IdentityField::Concrete {
                id: MaybeVec::Single("t_floor".into()),
            },
            flags: vec![],
            copy_from: None,
            extend: None,
            delete: None,
            name: Some("floor".to_string()),
            symbol: Some('.'),
            color: None,
            move_cost: Some(2),
            visibility: None,
            connect_groups: None,
            connects_to: None,
        };
        registry.load_terrain(vec![raw], &mut sink);

        let id = "t_floor".into();
        let int_id = registry.terrain.int_id_of(&id).unwrap();
        assert_eq!(
            registry.terrain.get(&id).unwrap().move_cost(),
            registry.terrain.get_by_int_id(int_id).unwrap().move_cost()
        );
    }
}
