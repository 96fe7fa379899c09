//! Palette records: reusable character → mapping symbol tables, composable
//! by reference from a mapgen or from another palette. Covers the five
//! tables this crate resolves per cell (terrain, furniture, items, nested,
//! traps); other per-character tables (npcs, sealed_item, liquids, ...) are
//! UI/gameplay facets outside this core's scope.

pub mod resolver;

use std::collections::HashMap;

use indexmap::IndexMap;
use mapgen_types::{Comment, Distribution, Identifier, MappingValue, ParameterId};
use serde::{Deserialize, Serialize};

pub use resolver::{PaletteResolver, ResolverConfig};

/// `https://github.com/CleverRaven/Cataclysm-DDA/blob/master/doc/JSON/MAPGEN.md#mapgen-parameters`
/// By default a parameter's scope is the overmap special being generated.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ParameterScope {
    #[default]
    OvermapSpecial,
    Nest,
    Omt,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub ty: Option<String>,

    #[serde(rename = "//")]
    pub comment: Comment,

    #[serde(default)]
    pub scope: ParameterScope,

    pub default: Distribution,
}

/// A mapgen's or palette's `palettes` list entry: a plain id, or `{param:
/// NAME}` resolved at merge time via the parameter-selection procedure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PaletteReference {
    Id(Identifier),
    Param { param: ParameterId },
}

pub type MappingTable = HashMap<char, MappingValue>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Palette {
    pub id: Identifier,

    #[serde(rename = "//")]
    pub comment: Comment,

    #[serde(default)]
    pub parameters: IndexMap<ParameterId, Parameter>,

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
    /// A fifth table alongside terrain/furniture/items/nested: per-cell
    /// resolution resolves traps the same way it resolves terrain and
    /// furniture.
    #[serde(default)]
    pub traps: MappingTable,
}
