use mapgen_macros::content_entry;
use mapgen_types::Identifier;
use serde::{Deserialize, Serialize};

/// The id bound into one overmap cell: its display name/symbol and the
/// mapgen it stamps when an OMT of this type is generated.
#[content_entry]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OvermapTerrain {
    pub id: Identifier,
    pub name: Option<String>,
    pub symbol: Option<char>,
    pub sym_color: Option<String>,
    pub mapgen: Option<Vec<Identifier>>,
    pub flags: Vec<String>,
}

impl OvermapTerrain {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}
