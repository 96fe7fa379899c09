use mapgen_macros::content_entry;
use mapgen_types::{Identifier, MaybeVec};
use serde::{Deserialize, Serialize};

/// A furniture piece: an optional second layer over terrain (a chair on
/// floor, a wreck on rubble).
#[content_entry]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Furniture {
    pub id: Identifier,
    pub name: Option<String>,
    pub symbol: Option<char>,
    pub color: Option<String>,
    pub move_cost_mod: Option<i32>,
    pub connect_groups: Option<MaybeVec<Identifier>>,
    pub connects_to: Option<MaybeVec<Identifier>>,
    pub flags: Vec<String>,
}

impl Default for Furniture {
    /// The null furniture installed at int id 0, mirroring `Terrain`'s
    /// reservation so an unset cell's furniture id (0) always means "no
    /// furniture" rather than whatever loaded first.
    fn default() -> Self {
        Self {
            id: mapgen_types::NULL_FURNITURE.into(),
            name: None,
            symbol: None,
            color: None,
            move_cost_mod: None,
            connect_groups: None,
            connects_to: None,
            flags: Vec::new(),
        }
    }
}

impl Furniture {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}
