use mapgen_macros::content_entry;
use mapgen_types::Identifier;
use serde::{Deserialize, Serialize};

/// A trap definition: symbol, trigger weight (how likely it is to spring),
/// and the action tag dispatched when it does. Shares most of its shape
/// with the terrain/furniture records, with the trap-only fields added.
#[content_entry]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Trap {
    pub id: Identifier,
    pub name: Option<String>,
    pub symbol: Option<char>,
    pub color: Option<String>,
    pub visibility: Option<i32>,
    pub trigger_weight: Option<i32>,
    pub action: Option<String>,
    pub flags: Vec<String>,
}

impl Default for Trap {
    /// The null trap installed at int id 0, mirroring `Terrain`'s
    /// reservation (submap cells carry an `Option<u32>` trap id, but the
    /// generic content-store reservation stays uniform across terrain,
    /// furniture and trap).
    fn default() -> Self {
        Self {
            id: mapgen_types::NULL_TRAP.into(),
            name: None,
            symbol: None,
            color: None,
            visibility: None,
            trigger_weight: Some(0),
            action: None,
            flags: Vec::new(),
        }
    }
}

impl Trap {
    pub fn trigger_weight(&self) -> i32 {
        self.trigger_weight.unwrap_or(100).max(0)
    }
}
