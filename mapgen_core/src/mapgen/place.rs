//! Place directives: imperative instructions that populate a region of a
//! submap once the terrain/furniture/trap grid is laid down. These are
//! opaque at the interpreter level except for nested mapgen, which must
//! actually be resolved and recursed into.

use mapgen_types::{Identifier, MappingValue, MaybeVec, MaybeWeighted, NumberOrRange};
use serde::{Deserialize, Serialize};

fn default_repeat() -> NumberOrRange<i32> {
    NumberOrRange::Number(1)
}

fn default_chance() -> i32 {
    100
}

/// Common envelope every `place_*` entry carries: where (a point; location
/// constraints like rectangles or radii all resolve to a concrete `(x, y)`
/// to draw from at execution time), how many times, and how likely each
/// instance is to actually materialize.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaceDirective<T> {
    pub x: NumberOrRange<i32>,
    pub y: NumberOrRange<i32>,

    #[serde(default = "default_repeat")]
    pub repeat: NumberOrRange<i32>,

    #[serde(default = "default_chance")]
    pub chance: i32,

    #[serde(flatten)]
    pub inner: T,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemPayload {
    pub item: MappingValue,
    pub faction: Option<Identifier>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MonsterKind {
    Monster { monster: MappingValue },
    Group { group: MappingValue },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonsterPayload {
    #[serde(flatten)]
    pub kind: MonsterKind,
    pub pack_size: Option<NumberOrRange<i32>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehiclePayload {
    pub vehicle: MappingValue,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrapPayload {
    pub trap: MappingValue,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RubblePayload {
    pub rubble_type: Option<Identifier>,
    pub floor_type: Option<Identifier>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraffitiPayload {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NpcPayload {
    pub class: Identifier,
}

/// A nested mapgen selection: a weighted pool of nested-mapgen ids to draw
/// from (or a bare id with implicit weight 1).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NestedPayload {
    pub chunks: MaybeVec<MaybeWeighted<Identifier>>,
}

pub type PlaceItems = PlaceDirective<ItemPayload>;
pub type PlaceMonsters = PlaceDirective<MonsterPayload>;
pub type PlaceVehicles = PlaceDirective<VehiclePayload>;
pub type PlaceTraps = PlaceDirective<TrapPayload>;
pub type PlaceRubble = PlaceDirective<RubblePayload>;
pub type PlaceGraffiti = PlaceDirective<GraffitiPayload>;
pub type PlaceNpcs = PlaceDirective<NpcPayload>;
pub type PlaceNested = PlaceDirective<NestedPayload>;
