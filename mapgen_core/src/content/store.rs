//! Generic content store: every loaded subsystem (terrain, furniture, traps,
//! overmap-terrain) ends up in one of these, keyed by both its stable string
//! id and a dense integer id assigned at load time (spec's "Integer
//! interning of content ids" design note).

use std::collections::HashMap;

use mapgen_types::Identifier;

/// Point-lookup store for one content type. String ids are retained for
/// diagnostics and JSON round-trip; the dense `u32` id is what the hot path
/// (tile storage, symbol resolution) actually carries around.
#[derive(Debug, Clone, Default)]
pub struct ContentStore<T> {
    by_string_id: HashMap<Identifier, u32>,
    by_int_id: Vec<T>,
}

impl<T> ContentStore<T> {
    pub fn new() -> Self {
        Self {
            by_string_id: HashMap::new(),
            by_int_id: Vec::new(),
        }
    }

    /// Inserts a record under `id`, assigning it the next dense integer id.
    /// Re-inserting an id that already exists overwrites its entry in place
    /// and keeps its original integer id.
    pub fn insert(&mut self, id: Identifier, value: T) -> u32 {
        if let Some(&existing) = self.by_string_id.get(&id) {
            self.by_int_id[existing as usize] = value;
            return existing;
        }
        let int_id = self.by_int_id.len() as u32;
        self.by_int_id.push(value);
        self.by_string_id.insert(id, int_id);
        int_id
    }

    pub fn get(&self, id: &Identifier) -> Option<&T> {
        self.by_string_id
            .get(id)
            .and_then(|&int_id| self.by_int_id.get(int_id as usize))
    }

    pub fn get_by_int_id(&self, int_id: u32) -> Option<&T> {
        self.by_int_id.get(int_id as usize)
    }

    pub fn int_id_of(&self, id: &Identifier) -> Option<u32> {
        self.by_string_id.get(id).copied()
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.by_string_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_int_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_int_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &T)> {
        self.by_string_id
            .iter()
            .map(move |(id, &int_id)| (id, &self.by_int_id[int_id as usize]))
    }
}
