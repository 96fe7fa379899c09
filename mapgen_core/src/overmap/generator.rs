//! The overmap generator: stamps a base terrain across a freshly loaded
//! overmap and scatters a handful of cities. Deliberately lighter-weight
//! than `crate::mapgen::generator`: no per-cell symbol table or
//! place-directive language at this layer, only a base fill plus city
//! placement.

use crate::content::{ContentStore, OvermapTerrain};
use crate::error::WarningSink;
use crate::rng::rng_for;

use super::{City, Overmap, OvermapCell, OvermapCoord, OVERMAP_SIZE};

const MIN_CITIES: u32 = 2;
const MAX_CITIES: u32 = 6;
const MIN_CITY_SIZE: i32 = 2;
const MAX_CITY_SIZE: i32 = 6;

/// Picks the base (open-land) and city-center overmap-terrain ids out of
/// the loaded `OvermapTerrain` store by the flags the content pack tags them
/// with, falling back to the first and last entries respectively so
/// generation still produces *something* over a sparse test registry.
pub struct OvermapGenerator<'a> {
    terrain: &'a ContentStore<OvermapTerrain>,
}

impl<'a> OvermapGenerator<'a> {
    pub fn new(terrain: &'a ContentStore<OvermapTerrain>) -> Self {
        Self { terrain }
    }

    fn base_terrain(&self) -> mapgen_types::Identifier {
        self.terrain
            .iter()
            .find(|(_, t)| t.has_flag("OVERMAP_DEFAULT"))
            .or_else(|| self.terrain.iter().next())
            .map(|(_, t)| t.id.clone())
            .unwrap_or_default()
    }

    fn city_terrain(&self) -> mapgen_types::Identifier {
        self.terrain
            .iter()
            .find(|(_, t)| t.has_flag("CITY_CENTER"))
            .map(|(_, t)| t.id.clone())
            .unwrap_or_else(|| self.base_terrain())
    }

    pub fn generate(&self, coord: OvermapCoord, sink: &mut WarningSink) -> Overmap {
        let mut overmap = Overmap::blank();
        let base = self.base_terrain();
        if base.as_str().is_empty() {
            sink.warn(crate::error::WarningKind::MissingReference, "overmap base terrain");
        }

        for y in 0..OVERMAP_SIZE as i32 {
            for x in 0..OVERMAP_SIZE as i32 {
                overmap.set_cell(
                    x,
                    y,
                    0,
                    OvermapCell {
                        terrain: base.clone(),
                        vision: 0,
                        explored: false,
                    },
                );
            }
        }

        let mut rng = rng_for(split_coord_seed(coord), "overmap-cities");
        let city_terrain = self.city_terrain();
        let count = rng.random_range(MIN_CITIES..=MAX_CITIES);
        for i in 0..count {
            let cx = rng.random_range(0..OVERMAP_SIZE as i32);
            let cy = rng.random_range(0..OVERMAP_SIZE as i32);
            let size = rng.random_range(MIN_CITY_SIZE..=MAX_CITY_SIZE);

            for dy in -size..=size {
                for dx in -size..=size {
                    if dx * dx + dy * dy > size * size {
                        continue;
                    }
                    overmap.set_cell(
                        cx + dx,
                        cy + dy,
                        0,
                        OvermapCell {
                            terrain: city_terrain.clone(),
                            vision: 0,
                            explored: false,
                        },
                    );
                }
            }

            overmap.cities.push(City {
                x: cx,
                y: cy,
                size,
                name: format!("city-{i}"),
            });
        }

        overmap
    }
}

fn split_coord_seed(coord: OvermapCoord) -> u64 {
    crate::rng::split_seed(0, coord)
}

use rand::Rng;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::overmap_terrain::OvermapTerrainRaw;
    use mapgen_types::{IdentityField, MaybeVec};

    fn registry() -> ContentStore<OvermapTerrain> {
        let mut store = ContentStore::new();
        let mut sink = WarningSink::new();
        let raws = vec![
            OvermapTerrainRaw {
                identity: IdentityField::Concrete {
                    id: MaybeVec::Single("forest".into()),
                },
                flags: vec!["OVERMAP_DEFAULT".to_string()],
                copy_from: None,
                extend: None,
                delete: None,
                name: None,
                symbol: None,
                sym_color: None,
                mapgen: None,
            },
            OvermapTerrainRaw {
                identity: IdentityField::Concrete {
                    id: MaybeVec::Single("city_center".into()),
                },
                flags: vec!["CITY_CENTER".to_string()],
                copy_from: None,
                extend: None,
                delete: None,
                name: None,
                symbol: None,
                sym_color: None,
                mapgen: None,
            },
        ];
        for raw in crate::content::loader::resolve_inheritance(raws, &mut sink) {
            for concrete in raw.into_concrete() {
                store.insert(concrete.id.clone(), concrete);
            }
        }
        store
    }

    #[test]
    fn fills_base_terrain_and_places_some_cities() {
        let terrain = registry();
        let mut sink = WarningSink::new();
        let overmap = OvermapGenerator::new(&terrain).generate((0, 0), &mut sink);

        assert_eq!(overmap.get_cell(0, 0, 0).terrain, "forest".into());
        assert!(!overmap.cities.is_empty());
        assert!(overmap.cities.iter().all(|c| c.size >= MIN_CITY_SIZE && c.size <= MAX_CITY_SIZE));
    }

    #[test]
    fn deterministic_for_same_coordinate() {
        let terrain = registry();
        let mut sink1 = WarningSink::new();
        let mut sink2 = WarningSink::new();
        let a = OvermapGenerator::new(&terrain).generate((5, -3), &mut sink1);
        let b = OvermapGenerator::new(&terrain).generate((5, -3), &mut sink2);
        assert_eq!(a.cities, b.cities);
    }
}
