use mapgen_macros::content_entry;
use mapgen_types::{Identifier, MaybeVec};
use serde::{Deserialize, Serialize};

/// A ground-level terrain definition: the base layer every cell always has
/// exactly one of. Carries a visibility metric and connect-group fields
/// alongside the usual symbol/color/move-cost properties.
#[content_entry]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Terrain {
    pub id: Identifier,
    pub name: Option<String>,
    pub symbol: Option<char>,
    pub color: Option<String>,
    pub move_cost: Option<i32>,
    pub visibility: Option<i32>,
    pub connect_groups: Option<MaybeVec<Identifier>>,
    pub connects_to: Option<MaybeVec<Identifier>>,
    pub flags: Vec<String>,
}

impl Default for Terrain {
    /// The null terrain installed at int id 0, reserved for the
    /// null/missing terrain. [`super::ContentRegistry::new`] inserts this
    /// before any loaded content so the reservation holds regardless of
    /// load order.
    fn default() -> Self {
        Self {
            id: mapgen_types::NULL_TERRAIN.into(),
            name: None,
            symbol: None,
            color: None,
            move_cost: Some(0),
            visibility: None,
            connect_groups: None,
            connects_to: None,
            flags: Vec::new(),
        }
    }
}

impl Terrain {
    pub fn move_cost(&self) -> i32 {
        self.move_cost.unwrap_or(0).max(0)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn connects_to(&self, other: &Identifier) -> bool {
        self.connects_to
            .as_ref()
            .map(|c| c.iter().any(|id| id == other))
            .unwrap_or(false)
    }
}
