//! Mapgen templates: a character grid plus symbol tables plus place
//! directives. Raw JSON deserializes into [`MapgenRaw`] (mirroring the
//! `{ type, id|om_terrain, object: {...} }` envelope) and is flattened into
//! the [`Mapgen`] shape the palette resolver and generator actually work
//! with.

pub mod generator;
pub mod place;

use std::collections::HashMap;

use indexmap::IndexMap;
use mapgen_types::{Identifier, MappingValue, NumberOrRange, ParameterId, Weighted};
use serde::{Deserialize, Serialize};

pub use generator::{GenerationContext, MapGenGenerator};
pub use place::*;

use crate::error::{GenerationError, WarningKind, WarningSink};
use crate::palette::{MappingTable, PaletteReference, Parameter};

pub const SUBMAP_SIZE: u32 = 12;

/// A mapgen's `om_terrain` binding: one id, a flat list registering the
/// same parsed template under several ids, or a 2-D grid of ids for a
/// template spanning multiple OMTs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OmTerrain {
    Single(String),
    Duplicate(Vec<String>),
    Nested(Vec<Vec<String>>),
}

impl OmTerrain {
    fn names(&self) -> Vec<Identifier> {
        match self {
            OmTerrain::Single(s) => vec![s.as_str().into()],
            OmTerrain::Duplicate(v) => v.iter().map(|s| s.as_str().into()).collect(),
            OmTerrain::Nested(rows) => rows
                .iter()
                .flatten()
                .map(|s| s.as_str().into())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Mirror {
    #[serde(default)]
    pub horizontal: bool,
    #[serde(default)]
    pub vertical: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MapgenObject {
    pub mapgensize: Option<(u32, u32)>,
    pub fill_ter: Option<Identifier>,
    #[serde(default)]
    pub rows: Vec<String>,
    #[serde(default)]
    pub palettes: Vec<PaletteReference>,
    #[serde(default)]
    pub terrain: MappingTable,
    #[serde(default)]
    pub furniture: MappingTable,
    #[serde(default)]
    pub items: MappingTable,
    #[serde(default)]
    pub nested: MappingTable,
    #[serde(default)]
    pub traps: MappingTable,
    #[serde(default)]
    pub place_items: Vec<PlaceItems>,
    #[serde(default)]
    pub place_monsters: Vec<PlaceMonsters>,
    #[serde(default)]
    pub place_vehicles: Vec<PlaceVehicles>,
    #[serde(default)]
    pub place_nested: Vec<PlaceNested>,
    #[serde(default)]
    pub place_traps: Vec<PlaceTraps>,
    #[serde(default)]
    pub place_rubble: Vec<PlaceRubble>,
    #[serde(default)]
    pub place_graffiti: Vec<PlaceGraffiti>,
    #[serde(default)]
    pub place_npcs: Vec<PlaceNpcs>,
    #[serde(default)]
    pub flags: Vec<String>,
    pub rotation: Option<NumberOrRange<i32>>,
    pub mirror: Option<Mirror>,
}

/// Raw deserialized shape of one JSON mapgen record: the
/// `{ type, id|om_terrain, method?, weight?, object }` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct MapgenRaw {
    pub om_terrain: Option<OmTerrain>,
    pub nested_mapgen_id: Option<Identifier>,
    pub update_mapgen_id: Option<Identifier>,
    pub method: Option<String>,
    pub weight: Option<i32>,
    pub object: MapgenObject,
}

impl MapgenRaw {
    /// Flattens this raw record into one parsed [`Mapgen`] plus every name
    /// it should be registered under (from `om_terrain`, `nested_mapgen_id`,
    /// and `update_mapgen_id`), each with this record's pool weight.
    pub fn into_registrations(self, sink: &mut WarningSink) -> Vec<(Identifier, Mapgen, i32)> {
        let mut names = Vec::new();
        if let Some(om) = &self.om_terrain {
            names.extend(om.names());
        }
        if let Some(id) = &self.nested_mapgen_id {
            names.push(id.clone());
        }
        if let Some(id) = &self.update_mapgen_id {
            names.push(id.clone());
        }
        if names.is_empty() {
            return Vec::new();
        }

        let primary = names[0].clone();
        let weight = self.weight.unwrap_or(100);
        let parsed = Mapgen::from_object(primary, self.object, sink);

        names
            .into_iter()
            .map(|name| (name, parsed.clone(), weight))
            .collect()
    }
}

/// A parsed mapgen template: a character grid, five symbol tables, palette
/// references, and place directives. This is both the pre- and
/// post-palette-merge shape; the resolver returns one of these with the
/// tables replaced.
#[derive(Debug, Clone)]
pub struct Mapgen {
    pub id: Identifier,
    pub width: u32,
    pub height: u32,
    pub rows: Vec<String>,
    pub fill_ter: Option<Identifier>,
    pub terrain: MappingTable,
    pub furniture: MappingTable,
    pub items: MappingTable,
    pub nested: MappingTable,
    pub traps: MappingTable,
    pub palettes: Vec<PaletteReference>,
    pub parameters: IndexMap<ParameterId, Parameter>,
    pub place_items: Vec<PlaceItems>,
    pub place_monsters: Vec<PlaceMonsters>,
    pub place_vehicles: Vec<PlaceVehicles>,
    pub place_nested: Vec<PlaceNested>,
    pub place_traps: Vec<PlaceTraps>,
    pub place_rubble: Vec<PlaceRubble>,
    pub place_graffiti: Vec<PlaceGraffiti>,
    pub place_npcs: Vec<PlaceNpcs>,
    pub flags: Vec<String>,
    pub rotation: Option<NumberOrRange<i32>>,
    pub mirror: Option<Mirror>,
}

impl Mapgen {
    pub fn blank(id: Identifier, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            rows: Vec::new(),
            fill_ter: None,
            terrain: HashMap::new(),
            furniture: HashMap::new(),
            items: HashMap::new(),
            nested: HashMap::new(),
            traps: HashMap::new(),
            palettes: Vec::new(),
            parameters: IndexMap::new(),
            place_items: Vec::new(),
            place_monsters: Vec::new(),
            place_vehicles: Vec::new(),
            place_nested: Vec::new(),
            place_traps: Vec::new(),
            place_rubble: Vec::new(),
            place_graffiti: Vec::new(),
            place_npcs: Vec::new(),
            flags: Vec::new(),
            rotation: None,
            mirror: None,
        }
    }

    fn from_object(id: Identifier, object: MapgenObject, sink: &mut WarningSink) -> Self {
        let (width, height) = object.mapgensize.unwrap_or_else(|| {
            let height = object.rows.len() as u32;
            let width = object.rows.first().map(|r| r.chars().count()).unwrap_or(0) as u32;
            (width, height)
        });

        if height > 0 && object.rows.len() as u32 != height {
            sink.warn(WarningKind::TemplateBounds, id.as_str());
        } else if let Some(bad_row) = object.rows.iter().find(|r| r.chars().count() as u32 != width) {
            let _ = bad_row;
            sink.warn(WarningKind::TemplateBounds, id.as_str());
        }

        Self {
            id,
            width,
            height,
            rows: object.rows,
            fill_ter: object.fill_ter,
            terrain: object.terrain,
            furniture: object.furniture,
            items: object.items,
            nested: object.nested,
            traps: object.traps,
            palettes: object.palettes,
            parameters: IndexMap::new(),
            place_items: object.place_items,
            place_monsters: object.place_monsters,
            place_vehicles: object.place_vehicles,
            place_nested: object.place_nested,
            place_traps: object.place_traps,
            place_rubble: object.place_rubble,
            place_graffiti: object.place_graffiti,
            place_npcs: object.place_npcs,
            flags: object.flags,
            rotation: object.rotation,
            mirror: object.mirror,
        }
    }

    pub fn validate_bounds(&self) -> Result<(), GenerationError> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        if self.width % SUBMAP_SIZE != 0 || self.height % SUBMAP_SIZE != 0 {
            return Err(GenerationError::TemplateBoundsError);
        }
        if self.rows.len() as u32 != self.height {
            return Err(GenerationError::TemplateBoundsError);
        }
        if self.rows.iter().any(|r| r.chars().count() as u32 != self.width) {
            return Err(GenerationError::TemplateBoundsError);
        }
        Ok(())
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// A named pool of candidate mapgens (several JSON entries may register the
/// same name with different weights); generation draws one per call.
#[derive(Debug, Default)]
pub struct MapgenStore {
    by_name: HashMap<Identifier, Vec<Weighted<Mapgen>>>,
}

impl MapgenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: Identifier, mapgen: Mapgen, weight: i32) {
        self.by_name
            .entry(name)
            .or_default()
            .push(Weighted::new(mapgen, weight));
    }

    pub fn candidates(&self, name: &Identifier) -> Option<&[Weighted<Mapgen>]> {
        self.by_name.get(name).map(|v| v.as_slice())
    }

    pub fn pick<'a>(&'a self, name: &Identifier, rng: &mut dyn rand::RngCore) -> Option<&'a Mapgen> {
        let pool = self.by_name.get(name)?;
        if pool.is_empty() {
            return None;
        }
        Some(mapgen_types::weighted_pick(pool, rng))
    }

    pub fn contains(&self, name: &Identifier) -> bool {
        self.by_name.contains_key(name)
    }
}

pub fn table_entry<'a>(table: &'a MappingTable, c: char) -> Option<&'a MappingValue> {
    table.get(&c)
}
