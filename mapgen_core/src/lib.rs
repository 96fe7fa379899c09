//! The map-generation pipeline, leaves-first: typed content loaders with
//! `copy-from` inheritance ([`content`]), a parameterized palette resolver
//! ([`palette`]), the mapgen interpreter that turns a resolved template into
//! one or more submaps ([`mapgen`]), structure-of-arrays tile storage
//! ([`submap`]), the 11×11×21 game-map grid that owns submaps after
//! generation ([`gamemap`]), and the 180×180×21 overmap layer ([`overmap`]).

pub mod content;
pub mod error;
pub mod gamemap;
pub mod mapgen;
pub mod overmap;
pub mod palette;
pub mod rng;
pub mod submap;

use serde::Deserialize;

use content::furniture::FurnitureRaw;
use content::overmap_terrain::OvermapTerrainRaw;
use content::terrain::TerrainRaw;
use content::trap::TrapRaw;
use content::ContentRegistry;
use content::ContentStore;
use error::{WarningKind, WarningSink};
use mapgen::{MapgenRaw, MapgenStore};
use palette::Palette;

/// One JSON array entry, dispatched by its `type` field. Record types this
/// core has no typed store for fall through to `Unknown`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonEntry {
    Mapgen(MapgenRaw),
    Palette(Palette),
    Terrain(TerrainRaw),
    Furniture(FurnitureRaw),
    Trap(TrapRaw),
    OvermapTerrain(OvermapTerrainRaw),
    #[serde(other)]
    Unknown,
}

/// Every loaded content type plus the mapgen and palette stores built from
/// it: the one aggregate a caller needs to drive the pipeline end to end.
#[derive(Debug, Default)]
pub struct WorldData {
    pub content: ContentRegistry,
    pub palettes: ContentStore<Palette>,
    pub mapgens: MapgenStore,
}

impl WorldData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one JSON document (an array of typed records) and merges its
    /// content into this [`WorldData`]. A top level that isn't a JSON array
    /// is a hard `serde_json::Error`; malformed *records* within an
    /// otherwise valid array are skipped individually and logged through
    /// `sink` as `WarningKind::InvalidRecord` - loading always succeeds.
    pub fn load_json(&mut self, json: &str, sink: &mut WarningSink) -> serde_json::Result<()> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        self.load_values(values, sink);
        Ok(())
    }

    pub fn load_json_value(
        &mut self,
        value: serde_json::Value,
        sink: &mut WarningSink,
    ) -> serde_json::Result<()> {
        let values: Vec<serde_json::Value> = serde_json::from_value(value)?;
        self.load_values(values, sink);
        Ok(())
    }

    fn load_values(&mut self, values: Vec<serde_json::Value>, sink: &mut WarningSink) {
        let mut entries = Vec::with_capacity(values.len());
        for value in values {
            let id = record_id(&value);
            match serde_json::from_value::<JsonEntry>(value) {
                Ok(entry) => entries.push(entry),
                Err(_) => sink.warn(WarningKind::InvalidRecord, id),
            }
        }
        self.register(entries, sink);
    }

    fn register(&mut self, entries: Vec<JsonEntry>, sink: &mut WarningSink) {
        let mut terrain_raws = Vec::new();
        let mut furniture_raws = Vec::new();
        let mut trap_raws = Vec::new();
        let mut overmap_terrain_raws = Vec::new();

        for entry in entries {
            match entry {
                JsonEntry::Terrain(raw) => terrain_raws.push(raw),
                JsonEntry::Furniture(raw) => furniture_raws.push(raw),
                JsonEntry::Trap(raw) => trap_raws.push(raw),
                JsonEntry::OvermapTerrain(raw) => overmap_terrain_raws.push(raw),
                JsonEntry::Palette(palette) => {
                    self.palettes.insert(palette.id.clone(), palette);
                }
                JsonEntry::Mapgen(raw) => {
                    for (name, parsed, weight) in raw.into_registrations(sink) {
                        self.mapgens.register(name, parsed, weight);
                    }
                }
                JsonEntry::Unknown => {}
            }
        }

        self.content.load_terrain(terrain_raws, sink);
        self.content.load_furniture(furniture_raws, sink);
        self.content.load_trap(trap_raws, sink);
        self.content.load_overmap_terrain(overmap_terrain_raws, sink);
    }
}

fn record_id(value: &serde_json::Value) -> String {
    value
        .get("id")
        .or_else(|| value.get("om_terrain"))
        .or_else(|| value.get("nested_mapgen_id"))
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_mixed_json_array_into_the_right_stores() {
        let json = r#"[
            { "type": "terrain", "id": "t_floor", "name": "floor", "symbol": ".", "move_cost": 2 },
            { "type": "furniture", "id": "f_chair", "name": "chair", "symbol": "c" },
            {
                "type": "palette",
                "id": "p_test",
                "terrain": { "#": "t_floor" }
            },
            {
                "type": "mapgen",
                "om_terrain": "test_omt",
                "object": {
                    "fill_ter": "t_floor",
                    "rows": ["            "]
                }
            },
            { "type": "some_unrelated_record_kind", "id": "whatever" }
        ]"#;

        let mut world = WorldData::new();
        let mut sink = WarningSink::new();
        world.load_json(json, &mut sink).expect("valid json");

        assert!(world.content.terrain.contains(&"t_floor".into()));
        assert!(world.content.furniture.contains(&"f_chair".into()));
        assert!(world.palettes.get(&"p_test".into()).is_some());
        assert!(world.mapgens.contains(&"test_omt".into()));
    }

    #[test]
    fn malformed_top_level_json_is_a_hard_error() {
        let mut world = WorldData::new();
        let mut sink = WarningSink::new();
        assert!(world.load_json("not json", &mut sink).is_err());
    }

    #[test]
    fn one_malformed_record_is_skipped_without_failing_the_whole_load() {
        let json = r#"[
            { "type": "terrain", "id": "t_floor", "name": "floor", "symbol": ".", "move_cost": 2 },
            { "type": "terrain", "move_cost": "not a number" },
            { "type": "furniture", "id": "f_chair", "name": "chair", "symbol": "c" }
        ]"#;

        let mut world = WorldData::new();
        let mut sink = WarningSink::new();
        world.load_json(json, &mut sink).expect("valid top-level json");

        assert!(world.content.terrain.contains(&"t_floor".into()));
        assert!(world.content.furniture.contains(&"f_chair".into()));
        assert_eq!(sink.count(), 1);
    }
}
