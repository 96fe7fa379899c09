//! Merges a mapgen's five symbol tables with those of its transitively
//! referenced palettes: own properties first, then recurse into referenced
//! palettes, first match wins. Parameter defaults and palette selection draw
//! from a per-call seeded RNG rather than a shared global one, so two
//! resolutions with the same seed produce identical output.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use mapgen_types::{Identifier, ParameterId, ResolveIdentifier};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::content::ContentStore;
use crate::error::{WarningKind, WarningSink};
use crate::mapgen::Mapgen;
use crate::palette::{Palette, PaletteReference, Parameter};

/// Configuration for one resolution run: a seed for the resolver's own
/// weighted-choice draws (palette selection, parameter defaults), and any
/// caller-supplied parameter overrides.
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    pub seed: u64,
    pub parameter_overrides: HashMap<ParameterId, Identifier>,
    pub debug: bool,
}

pub struct PaletteResolver {
    config: ResolverConfig,
    rng: StdRng,
}

impl PaletteResolver {
    pub fn new(config: ResolverConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Merges `mapgen`'s palette references into its own four tables and
    /// returns a new mapgen with the merged tables; `mapgen` itself is not
    /// mutated.
    pub fn resolve(
        &mut self,
        mapgen: &Mapgen,
        store: &ContentStore<Palette>,
        sink: &mut WarningSink,
    ) -> Mapgen {
        let immutable_terrain: HashSet<char> = mapgen.terrain.keys().copied().collect();
        let immutable_furniture: HashSet<char> = mapgen.furniture.keys().copied().collect();
        let immutable_items: HashSet<char> = mapgen.items.keys().copied().collect();
        let immutable_nested: HashSet<char> = mapgen.nested.keys().copied().collect();
        let immutable_traps: HashSet<char> = mapgen.traps.keys().copied().collect();

        let mut resolved = mapgen.clone();

        let mut known_parameters: IndexMap<ParameterId, Parameter> = IndexMap::new();
        let mut prescanned = HashSet::new();
        self.prescan_parameters(&mapgen.palettes, store, &mut known_parameters, &mut prescanned);
        resolved.parameters = known_parameters.clone();

        let palette_ids = self.resolve_palette_refs(&mapgen.palettes, &known_parameters, sink);

        let mut visited = Vec::new();
        for id in palette_ids {
            self.merge_palette(
                &id,
                store,
                &mut resolved,
                &immutable_terrain,
                &immutable_furniture,
                &immutable_items,
                &immutable_nested,
                &immutable_traps,
                &known_parameters,
                &mut visited,
                sink,
            );
        }

        resolved
    }

    fn prescan_parameters(
        &self,
        refs: &[PaletteReference],
        store: &ContentStore<Palette>,
        known: &mut IndexMap<ParameterId, Parameter>,
        visited: &mut HashSet<Identifier>,
    ) {
        for r in refs {
            let PaletteReference::Id(id) = r else {
                continue;
            };
            if !visited.insert(id.clone()) {
                continue;
            }
            let Some(palette) = store.get(id) else {
                continue;
            };
            for (name, param) in &palette.parameters {
                known.entry(name.clone()).or_insert_with(|| param.clone());
            }
            self.prescan_parameters(&palette.palettes, store, known, visited);
        }
    }

    fn resolve_palette_refs(
        &mut self,
        refs: &[PaletteReference],
        known_parameters: &IndexMap<ParameterId, Parameter>,
        sink: &mut WarningSink,
    ) -> Vec<Identifier> {
        let mut resolved_parameters: IndexMap<ParameterId, Identifier> = IndexMap::new();
        let mut ids = Vec::with_capacity(refs.len());
        for r in refs {
            match r {
                PaletteReference::Id(id) => ids.push(id.clone()),
                PaletteReference::Param { param } => {
                    if let Some(over) = self.config.parameter_overrides.get(param) {
                        resolved_parameters.insert(param.clone(), over.clone());
                        ids.push(over.clone());
                        continue;
                    }
                    let Some(def) = known_parameters.get(param) else {
                        sink.warn(WarningKind::UnknownParameter, param.0.as_str());
                        continue;
                    };
                    match def.default.resolve(&resolved_parameters, &mut self.rng) {
                        Ok(id) => {
                            resolved_parameters.insert(param.clone(), id.clone());
                            ids.push(id);
                        }
                        Err(_) => sink.warn(WarningKind::UnknownParameter, param.0.as_str()),
                    }
                }
            }
        }
        ids
    }

    #[allow(clippy::too_many_arguments)]
    fn merge_palette(
        &mut self,
        id: &Identifier,
        store: &ContentStore<Palette>,
        into: &mut Mapgen,
        immutable_terrain: &HashSet<char>,
        immutable_furniture: &HashSet<char>,
        immutable_items: &HashSet<char>,
        immutable_nested: &HashSet<char>,
        immutable_traps: &HashSet<char>,
        known_parameters: &IndexMap<ParameterId, Parameter>,
        visited: &mut Vec<Identifier>,
        sink: &mut WarningSink,
    ) {
        if visited.contains(id) {
            sink.warn(WarningKind::CyclicPalette, id.as_str());
            return;
        }
        let Some(palette) = store.get(id) else {
            sink.warn(WarningKind::PaletteNotFound, id.as_str());
            return;
        };

        visited.push(id.clone());

        merge_table(&mut into.terrain, &palette.terrain, immutable_terrain);
        merge_table(&mut into.furniture, &palette.furniture, immutable_furniture);
        merge_table(&mut into.items, &palette.items, immutable_items);
        merge_table(&mut into.nested, &palette.nested, immutable_nested);
        merge_table(&mut into.traps, &palette.traps, immutable_traps);

        let nested_ids = self.resolve_palette_refs(&palette.palettes, known_parameters, sink);
        for nested_id in &nested_ids {
            self.merge_palette(
                nested_id,
                store,
                into,
                immutable_terrain,
                immutable_furniture,
                immutable_items,
                immutable_nested,
                immutable_traps,
                known_parameters,
                visited,
                sink,
            );
        }

        visited.pop();
    }
}

fn merge_table(
    into: &mut HashMap<char, mapgen_types::MappingValue>,
    from: &HashMap<char, mapgen_types::MappingValue>,
    immutable: &HashSet<char>,
) {
    for (&c, v) in from {
        if immutable.contains(&c) || into.contains_key(&c) {
            continue;
        }
        into.insert(c, v.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::Mapgen;
    use mapgen_types::MappingValue;

    fn mapgen_with_terrain(entries: &[(char, &str)]) -> Mapgen {
        let mut m = Mapgen::blank("test".into(), 12, 12);
        for (c, id) in entries {
            m.terrain.insert(*c, MappingValue::Single((*id).into()));
        }
        m
    }

    #[test]
    fn mapgens_own_mapping_beats_palette() {
        let mut palette = Palette {
            id: "p".into(),
            ..Default::default()
        };
        palette.terrain.insert('#', MappingValue::Single("t_wall".into()));
        palette.terrain.insert('.', MappingValue::Single("t_floor".into()));

        let mut store = ContentStore::new();
        store.insert("p".into(), palette);

        let mut mapgen = mapgen_with_terrain(&[('#', "t_wall_glass")]);
        mapgen.palettes.push(PaletteReference::Id("p".into()));

        let mut resolver = PaletteResolver::new(ResolverConfig::default());
        let mut sink = WarningSink::new();
        let resolved = resolver.resolve(&mapgen, &store, &mut sink);

        assert_eq!(resolved.terrain.get(&'#').unwrap(), &MappingValue::Single("t_wall_glass".into()));
        assert_eq!(resolved.terrain.get(&'.').unwrap(), &MappingValue::Single("t_floor".into()));
    }

    #[test]
    fn cyclic_palettes_terminate_and_merge_once() {
        let mut a = Palette {
            id: "a".into(),
            ..Default::default()
        };
        a.terrain.insert('a', MappingValue::Single("t_a".into()));
        a.palettes.push(PaletteReference::Id("b".into()));

        let mut b = Palette {
            id: "b".into(),
            ..Default::default()
        };
        b.terrain.insert('b', MappingValue::Single("t_b".into()));
        b.palettes.push(PaletteReference::Id("a".into()));

        let mut store = ContentStore::new();
        store.insert("a".into(), a);
        store.insert("b".into(), b);

        let mut mapgen = Mapgen::blank("test".into(), 12, 12);
        mapgen.palettes.push(PaletteReference::Id("a".into()));

        let mut resolver = PaletteResolver::new(ResolverConfig::default());
        let mut sink = WarningSink::new();
        let resolved = resolver.resolve(&mapgen, &store, &mut sink);

        assert_eq!(resolved.terrain.get(&'a').unwrap(), &MappingValue::Single("t_a".into()));
        assert_eq!(resolved.terrain.get(&'b').unwrap(), &MappingValue::Single("t_b".into()));
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn outer_palette_beats_nested_palette_on_conflict() {
        let mut inner = Palette {
            id: "inner".into(),
            ..Default::default()
        };
        inner.terrain.insert('#', MappingValue::Single("t_inner".into()));

        let mut outer = Palette {
            id: "outer".into(),
            ..Default::default()
        };
        outer.terrain.insert('#', MappingValue::Single("t_outer".into()));
        outer.palettes.push(PaletteReference::Id("inner".into()));

        let mut store = ContentStore::new();
        store.insert("inner".into(), inner);
        store.insert("outer".into(), outer);

        let mut mapgen = Mapgen::blank("test".into(), 12, 12);
        mapgen.palettes.push(PaletteReference::Id("outer".into()));

        let mut resolver = PaletteResolver::new(ResolverConfig::default());
        let mut sink = WarningSink::new();
        let resolved = resolver.resolve(&mapgen, &store, &mut sink);

        assert_eq!(resolved.terrain.get(&'#').unwrap(), &MappingValue::Single("t_outer".into()));
    }
}
