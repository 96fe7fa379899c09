//! The mapgen interpreter: consumes a palette-resolved [`Mapgen`] plus the
//! content stores and a [`GenerationContext`], and materializes one or more
//! [`Submap`]s. Handles row slicing into a grid of maps, per-cell
//! terrain/furniture/trap resolution, and nested-chunk resolution, drawing
//! from the per-call seeded streams `crate::rng` derives rather than a
//! shared global RNG.

use std::collections::HashMap;

use indexmap::IndexMap;
use mapgen_types::{Identifier, MappingValue, MaybeVec, MaybeWeighted, ParameterId, ResolveIdentifier};
use rand::{Rng, RngCore};

use crate::content::ContentRegistry;
use crate::error::{WarningKind, WarningSink};
use crate::palette::{Palette, PaletteResolver, ResolverConfig};
use crate::rng::rng_for;
use crate::submap::{SpawnPoint, Submap, SUBMAP_SIZE};

use super::place::*;
use super::{Mapgen, MapgenStore};

pub const MAX_NESTED_DEPTH: u32 = 8;

#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    pub seed: u64,
    pub abs_x: i32,
    pub abs_y: i32,
    pub abs_z: i32,
    pub parameter_overrides: HashMap<ParameterId, Identifier>,
    pub depth: u32,
}

impl GenerationContext {
    pub fn new(seed: u64, abs_x: i32, abs_y: i32, abs_z: i32) -> Self {
        Self {
            seed,
            abs_x,
            abs_y,
            abs_z,
            parameter_overrides: HashMap::new(),
            depth: 0,
        }
    }

    fn child(&self, salt: impl std::hash::Hash) -> Self {
        Self {
            seed: crate::rng::split_seed(self.seed, salt),
            abs_x: self.abs_x,
            abs_y: self.abs_y,
            abs_z: self.abs_z,
            parameter_overrides: self.parameter_overrides.clone(),
            depth: self.depth + 1,
        }
    }
}

#[derive(Debug)]
pub struct MultiSubmapResult {
    pub submaps: Vec<Submap>,
    pub submap_grid_width: u32,
    pub submap_grid_height: u32,
}

pub struct MapGenGenerator<'a> {
    pub content: &'a ContentRegistry,
    pub palettes: &'a crate::content::ContentStore<Palette>,
    pub mapgens: &'a MapgenStore,
}

/// Resolves `mapgen.parameters` to concrete ids for this generation call:
/// `ctx.parameter_overrides` wins where present, otherwise each parameter's
/// default is drawn fresh from a seed derived from `ctx.seed`, in
/// declaration order so a later default can reference an earlier draw.
fn resolve_symbol_parameters(
    mapgen: &Mapgen,
    ctx: &GenerationContext,
    sink: &mut WarningSink,
) -> IndexMap<ParameterId, Identifier> {
    let mut resolved = IndexMap::new();
    let mut rng = rng_for(ctx.seed, "parameters");
    for (name, param) in &mapgen.parameters {
        if let Some(over) = ctx.parameter_overrides.get(name) {
            resolved.insert(name.clone(), over.clone());
            continue;
        }
        match param.default.resolve(&resolved, &mut rng) {
            Ok(id) => {
                resolved.insert(name.clone(), id);
            }
            Err(_) => sink.warn(WarningKind::UnknownParameter, name.0.as_str()),
        }
    }
    resolved
}

impl<'a> MapGenGenerator<'a> {
    pub fn new(
        content: &'a ContentRegistry,
        palettes: &'a crate::content::ContentStore<Palette>,
        mapgens: &'a MapgenStore,
    ) -> Self {
        Self {
            content,
            palettes,
            mapgens,
        }
    }

    pub fn generate(&self, mapgen: &Mapgen, ctx: &GenerationContext, sink: &mut WarningSink) -> Submap {
        if mapgen.validate_bounds().is_err() {
            sink.warn(WarningKind::TemplateBounds, mapgen.id.as_str());
        }

        if mapgen.rows.is_empty() {
            return Submap::new_uniform(self.fill_terrain_id(mapgen, sink));
        }

        let params = resolve_symbol_parameters(mapgen, ctx, sink);
        let mut submap = self.populate_submap(mapgen, 0, 0, ctx, &params, sink);
        self.apply_transform(mapgen, &mut submap, ctx);
        submap.optimize();
        submap
    }

    pub fn generate_multiple(
        &self,
        mapgen: &Mapgen,
        ctx: &GenerationContext,
        sink: &mut WarningSink,
    ) -> MultiSubmapResult {
        if mapgen.validate_bounds().is_err() {
            sink.warn(WarningKind::TemplateBounds, mapgen.id.as_str());
        }

        let grid_w = (mapgen.width / SUBMAP_SIZE as u32).max(1);
        let grid_h = (mapgen.height / SUBMAP_SIZE as u32).max(1);

        let mut submaps = Vec::with_capacity((grid_w * grid_h) as usize);
        if mapgen.rows.is_empty() {
            let fill = self.fill_terrain_id(mapgen, sink);
            for _ in 0..(grid_w * grid_h) {
                submaps.push(Submap::new_uniform(fill));
            }
            return MultiSubmapResult {
                submaps,
                submap_grid_width: grid_w,
                submap_grid_height: grid_h,
            };
        }

        let params = resolve_symbol_parameters(mapgen, ctx, sink);
        for gy in 0..grid_h {
            for gx in 0..grid_w {
                let mut submap = self.populate_submap(
                    mapgen,
                    gy * SUBMAP_SIZE as u32,
                    gx * SUBMAP_SIZE as u32,
                    ctx,
                    &params,
                    sink,
                );
                self.apply_transform(mapgen, &mut submap, ctx);
                submap.optimize();
                submaps.push(submap);
            }
        }

        MultiSubmapResult {
            submaps,
            submap_grid_width: grid_w,
            submap_grid_height: grid_h,
        }
    }

    fn fill_terrain_id(&self, mapgen: &Mapgen, sink: &mut WarningSink) -> u32 {
        match &mapgen.fill_ter {
            None => 0,
            Some(id) => self.content.terrain.int_id_of(id).unwrap_or_else(|| {
                sink.warn(WarningKind::MissingReference, id.as_str());
                0
            }),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn populate_submap(
        &self,
        mapgen: &Mapgen,
        row_off: u32,
        col_off: u32,
        ctx: &GenerationContext,
        params: &IndexMap<ParameterId, Identifier>,
        sink: &mut WarningSink,
    ) -> Submap {
        let fill = self.fill_terrain_id(mapgen, sink);
        let mut submap = Submap::new_uniform(fill);

        for y in 0..SUBMAP_SIZE as u32 {
            let row = mapgen
                .rows
                .get((row_off + y) as usize)
                .map(String::as_str)
                .unwrap_or("");
            let chars: Vec<char> = row.chars().collect();
            for x in 0..SUBMAP_SIZE as u32 {
                let Some(&c) = chars.get((col_off + x) as usize) else {
                    continue;
                };
                if c == ' ' {
                    continue;
                }
                self.resolve_cell(mapgen, &mut submap, x as u8, y as u8, c, ctx, params, sink);
            }
        }

        self.run_directives(mapgen, &mut submap, row_off, col_off, ctx, params, sink);

        submap
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_cell(
        &self,
        mapgen: &Mapgen,
        submap: &mut Submap,
        x: u8,
        y: u8,
        c: char,
        ctx: &GenerationContext,
        params: &IndexMap<ParameterId, Identifier>,
        sink: &mut WarningSink,
    ) {
        let mut any_table_has_char = false;

        if let Some(mapping) = mapgen.terrain.get(&c) {
            any_table_has_char = true;
            let mut rng = rng_for(ctx.seed, ("terrain", x, y));
            if let Some(id) = resolve_mapping(mapping, params, &mut rng, sink) {
                match self.content.terrain.int_id_of(&id) {
                    Some(int_id) => submap.set_terrain(x, y, int_id),
                    None => sink.warn(WarningKind::MissingReference, id.as_str()),
                }
            }
        }

        if let Some(mapping) = mapgen.furniture.get(&c) {
            any_table_has_char = true;
            let mut rng = rng_for(ctx.seed, ("furniture", x, y));
            if let Some(id) = resolve_mapping(mapping, params, &mut rng, sink) {
                match self.content.furniture.int_id_of(&id) {
                    Some(int_id) => submap.set_furniture(x, y, int_id),
                    None => sink.warn(WarningKind::MissingReference, id.as_str()),
                }
            }
        }

        if let Some(mapping) = mapgen.traps.get(&c) {
            any_table_has_char = true;
            let mut rng = rng_for(ctx.seed, ("trap", x, y));
            if let Some(id) = resolve_mapping(mapping, params, &mut rng, sink) {
                match self.content.trap.int_id_of(&id) {
                    Some(int_id) => submap.set_trap(x, y, int_id),
                    None => sink.warn(WarningKind::MissingReference, id.as_str()),
                }
            }
        }

        if let Some(mapping) = mapgen.items.get(&c) {
            any_table_has_char = true;
            let mut rng = rng_for(ctx.seed, ("items", x, y));
            if let Some(id) = resolve_mapping(mapping, params, &mut rng, sink) {
                let item_id = self.intern_opaque(&id);
                submap.add_item(x, y, item_id);
            }
        }

        if let Some(mapping) = mapgen.nested.get(&c) {
            any_table_has_char = true;
            if ctx.depth >= MAX_NESTED_DEPTH {
                sink.warn(WarningKind::DepthLimitExceeded, format!("depth {}", ctx.depth));
            } else {
                let mut rng = rng_for(ctx.seed, ("nested-cell", x, y));
                if let Some(chunk_id) = resolve_mapping(mapping, params, &mut rng, sink) {
                    if !chunk_id.is_null() {
                        let child_ctx = ctx.child(("nested-cell", x, y));
                        if let Some(nested) = self.generate_nested(&chunk_id, &child_ctx, sink) {
                            splice(submap, &nested, x, y);
                        }
                    }
                }
            }
        }

        if !any_table_has_char && mapgen.fill_ter.is_none() {
            sink.warn(WarningKind::UnresolvedSymbol, c.to_string());
        }
    }

    #[allow(clippy::too_many_arguments)]
    #[allow(clippy::too_many_arguments)]
    fn run_directives(
        &self,
        mapgen: &Mapgen,
        submap: &mut Submap,
        row_off: u32,
        col_off: u32,
        ctx: &GenerationContext,
        params: &IndexMap<ParameterId, Identifier>,
        sink: &mut WarningSink,
    ) {
        let bounds = (col_off as i32, row_off as i32, SUBMAP_SIZE as i32);

        for (idx, d) in mapgen.place_items.iter().enumerate() {
            self.for_each_instance(d, bounds, ctx, ("place_items", idx), |lx, ly, rng| {
                if let Some(id) = resolve_mapping(&d.inner.item, params, rng, sink) {
                    let item_id = self.intern_opaque(&id);
                    submap.add_item(lx, ly, item_id);
                }
            });
        }

        for (idx, d) in mapgen.place_monsters.iter().enumerate() {
            self.for_each_instance(d, bounds, ctx, ("place_monsters", idx), |lx, ly, rng| {
                let mapping = match &d.inner.kind {
                    MonsterKind::Monster { monster } => monster,
                    MonsterKind::Group { group } => group,
                };
                if let Some(id) = resolve_mapping(mapping, params, rng, sink) {
                    let monster_id = self.intern_opaque(&id);
                    submap.spawns.push(SpawnPoint {
                        x: lx,
                        y: ly,
                        monster_id,
                    });
                }
            });
        }

        for (idx, d) in mapgen.place_traps.iter().enumerate() {
            self.for_each_instance(d, bounds, ctx, ("place_traps", idx), |lx, ly, rng| {
                if let Some(id) = resolve_mapping(&d.inner.trap, params, rng, sink) {
                    match self.content.trap.int_id_of(&id) {
                        Some(int_id) => submap.set_trap(lx, ly, int_id),
                        None => sink.warn(WarningKind::MissingReference, id.as_str()),
                    }
                }
            });
        }

        // place_vehicles / place_rubble / place_graffiti / place_npcs name
        // subsystems external to this crate (no backing content store or
        // submap field exists for them); the draws still run, chance- and
        // repeat-gated the same as every other directive, so RNG consumption
        // stays in source order, but nothing is written back into the submap.
        for (idx, d) in mapgen.place_vehicles.iter().enumerate() {
            self.for_each_instance(d, bounds, ctx, ("place_vehicles", idx), |_, _, rng| {
                let _ = resolve_mapping(&d.inner.vehicle, params, rng, sink);
            });
        }
        for (idx, d) in mapgen.place_rubble.iter().enumerate() {
            self.for_each_instance(d, bounds, ctx, ("place_rubble", idx), |_, _, _rng| {});
        }
        for (idx, d) in mapgen.place_graffiti.iter().enumerate() {
            self.for_each_instance(d, bounds, ctx, ("place_graffiti", idx), |_, _, _rng| {});
        }
        for (idx, d) in mapgen.place_npcs.iter().enumerate() {
            self.for_each_instance(d, bounds, ctx, ("place_npcs", idx), |_, _, _rng| {});
        }

        for (idx, d) in mapgen.place_nested.iter().enumerate() {
            self.place_nested(d, idx, submap, bounds, ctx, sink);
        }
    }

    /// Shared draw loop for every `place_*` directive except nested mapgen.
    fn for_each_instance(
        &self,
        d: &PlaceDirective<impl Sized>,
        bounds: (i32, i32, i32),
        ctx: &GenerationContext,
        salt: impl std::hash::Hash + Clone,
        mut write: impl FnMut(u8, u8, &mut dyn RngCore),
    ) {
        let (col_off, row_off, size) = bounds;
        let mut rng = rng_for(ctx.seed, salt);
        let count = d.repeat.sample(&mut rng).max(0);
        for _ in 0..count {
            if d.chance < 100 {
                let roll = rng.random_range(0..100);
                if roll >= d.chance {
                    continue;
                }
            }
            let gx = d.x.sample(&mut rng);
            let gy = d.y.sample(&mut rng);
            if gx < col_off || gx >= col_off + size || gy < row_off || gy >= row_off + size {
                continue;
            }
            write((gx - col_off) as u8, (gy - row_off) as u8, &mut rng);
        }
    }

    fn place_nested(
        &self,
        d: &PlaceNested,
        idx: usize,
        submap: &mut Submap,
        bounds: (i32, i32, i32),
        ctx: &GenerationContext,
        sink: &mut WarningSink,
    ) {
        if ctx.depth >= MAX_NESTED_DEPTH {
            sink.warn(WarningKind::DepthLimitExceeded, format!("depth {}", ctx.depth));
            return;
        }

        let (col_off, row_off, size) = bounds;
        let mut rng = rng_for(ctx.seed, ("place_nested", idx));
        let count = d.repeat.sample(&mut rng).max(0);

        for instance in 0..count {
            if d.chance < 100 {
                let roll = rng.random_range(0..100);
                if roll >= d.chance {
                    continue;
                }
            }
            let gx = d.x.sample(&mut rng);
            let gy = d.y.sample(&mut rng);
            if gx < col_off || gx >= col_off + size || gy < row_off || gy >= row_off + size {
                continue;
            }
            let (anchor_x, anchor_y) = ((gx - col_off) as u8, (gy - row_off) as u8);

            let Some(chunk_id) = pick_nested_chunk(&d.inner.chunks, &mut rng) else {
                continue;
            };
            if chunk_id.is_null() {
                continue;
            }

            let child_ctx = ctx.child(("place_nested", idx, instance));
            let Some(nested) = self.generate_nested(&chunk_id, &child_ctx, sink) else {
                continue;
            };

            splice(submap, &nested, anchor_x, anchor_y);
        }
    }

    fn generate_nested(&self, id: &Identifier, ctx: &GenerationContext, sink: &mut WarningSink) -> Option<Submap> {
        let mut pick_rng = rng_for(ctx.seed, "nested-pick");
        let raw = self.mapgens.pick(id, &mut pick_rng)?;

        let mut resolver = PaletteResolver::new(ResolverConfig {
            seed: ctx.seed,
            parameter_overrides: ctx.parameter_overrides.clone(),
            debug: false,
        });
        let resolved = resolver.resolve(raw, self.palettes, sink);
        Some(self.generate(&resolved, ctx, sink))
    }

    fn apply_transform(&self, mapgen: &Mapgen, submap: &mut Submap, ctx: &GenerationContext) {
        if let Some(rotation) = &mapgen.rotation {
            let mut rng = rng_for(ctx.seed, "rotation");
            let turns = rotation.sample(&mut rng);
            submap.rotate(turns);
        }
        if let Some(mirror) = &mapgen.mirror {
            submap.mirror(mirror.horizontal, mirror.vertical);
        }
    }

    /// No item/monster content store is modeled here; ids are interned
    /// from a hash of their string form instead.
    fn intern_opaque(&self, id: &Identifier) -> u32 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        id.as_str().hash(&mut hasher);
        (hasher.finish() & 0xFFFF_FFFF) as u32
    }
}

fn resolve_mapping(
    mapping: &MappingValue,
    params: &IndexMap<ParameterId, Identifier>,
    rng: &mut dyn RngCore,
    sink: &mut WarningSink,
) -> Option<Identifier> {
    match mapping.resolve(params, rng) {
        Ok(id) => Some(id),
        Err(e) => {
            sink.warn(WarningKind::MissingReference, e.to_string());
            None
        }
    }
}

fn pick_nested_chunk(chunks: &MaybeVec<MaybeWeighted<Identifier>>, rng: &mut dyn RngCore) -> Option<Identifier> {
    match chunks {
        MaybeVec::Single(mw) => Some(mw.clone().into_data()),
        MaybeVec::Vec(v) => {
            if v.is_empty() {
                return None;
            }
            let weighted: Vec<mapgen_types::Weighted<Identifier>> =
                v.iter().cloned().map(MaybeWeighted::to_weighted).collect();
            Some(mapgen_types::weighted_pick(&weighted, rng).clone())
        }
    }
}

/// Drops anything that would fall outside the parent submap.
fn splice(parent: &mut Submap, nested: &Submap, anchor_x: u8, anchor_y: u8) {
    let size = SUBMAP_SIZE as u8;
    for ny in 0..size {
        let py = anchor_y.saturating_add(ny);
        if py >= size {
            continue;
        }
        for nx in 0..size {
            let px = anchor_x.saturating_add(nx);
            if px >= size {
                continue;
            }
            let tile = nested.get_tile(nx, ny);
            parent.set_terrain(px, py, tile.terrain);
            if tile.furniture != 0 {
                parent.set_furniture(px, py, tile.furniture);
            }
            if let Some(trap) = tile.trap {
                parent.set_trap(px, py, trap);
            }
            for &item_id in nested.items_at(nx, ny) {
                parent.add_item(px, py, item_id);
            }
            for &field_id in nested.fields_at(nx, ny) {
                parent.add_field(px, py, field_id);
            }
        }
    }
    for spawn in &nested.spawns {
        let px = anchor_x.saturating_add(spawn.x);
        let py = anchor_y.saturating_add(spawn.y);
        if px < size && py < size {
            parent.spawns.push(SpawnPoint {
                x: px,
                y: py,
                monster_id: spawn.monster_id,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentRegistry, ContentStore};
    use crate::palette::Palette;
    use mapgen_types::{IdentityField, MaybeVec as MV};

    fn registry_with_terrain(ids: &[&str]) -> ContentRegistry {
        let mut registry = ContentRegistry::new();
        let mut sink = WarningSink::new();
        let raws: Vec<crate::content::terrain::TerrainRaw> = ids
            .iter()
            .map(|id| crate::content::terrain::TerrainRaw {
                identity: IdentityField::Concrete {
                    id: MV::Single((*id).into()),
                },
                flags: vec![],
                copy_from: None,
                extend: None,
                delete: None,
                name: None,
                symbol: None,
                color: None,
                move_cost: Some(2),
                visibility: None,
                connect_groups: None,
                connects_to: None,
            })
            .collect();
        registry.load_terrain(raws, &mut sink);
        registry
    }

    #[test]
    fn uniform_submap_from_blank_mapgen() {
        let registry = registry_with_terrain(&["t_floor"]);
        let palettes: ContentStore<Palette> = ContentStore::new();
        let mapgens = MapgenStore::new();
        let gen = MapGenGenerator::new(&registry, &palettes, &mapgens);

        let mut mapgen = Mapgen::blank("test".into(), 12, 12);
        mapgen.fill_ter = Some("t_floor".into());
        mapgen.rows = vec![" ".repeat(12); 12];

        let mut sink = WarningSink::new();
        let ctx = GenerationContext::new(1, 0, 0, 0);
        let submap = gen.generate(&mapgen, &ctx, &mut sink);

        assert!(submap.is_uniform());
        let floor_id = registry.terrain.int_id_of(&"t_floor".into()).unwrap();
        assert_eq!(submap.uniform_terrain(), Some(floor_id));
    }

    #[test]
    fn wall_border_stays_expanded() {
        let registry = registry_with_terrain(&["t_wall", "t_floor"]);
        let palettes: ContentStore<Palette> = ContentStore::new();
        let mapgens = MapgenStore::new();
        let gen = MapGenGenerator::new(&registry, &palettes, &mapgens);

        let mut mapgen = Mapgen::blank("test".into(), 12, 12);
        mapgen.terrain.insert('#', MappingValue::Single("t_wall".into()));
        mapgen.terrain.insert('.', MappingValue::Single("t_floor".into()));
        let mut rows = vec!["#".repeat(12)];
        for _ in 0..10 {
            rows.push(format!("#{}#", ".".repeat(10)));
        }
        rows.push("#".repeat(12));
        mapgen.rows = rows;

        let mut sink = WarningSink::new();
        let ctx = GenerationContext::new(1, 0, 0, 0);
        let submap = gen.generate(&mapgen, &ctx, &mut sink);

        assert!(!submap.is_uniform());
        let wall = registry.terrain.int_id_of(&"t_wall".into()).unwrap();
        let floor = registry.terrain.int_id_of(&"t_floor".into()).unwrap();
        assert_eq!(submap.get_terrain(0, 0), wall);
        assert_eq!(submap.get_terrain(11, 11), wall);
        assert_eq!(submap.get_terrain(5, 5), floor);
    }

    #[test]
    fn weighted_furniture_converges_to_ratio() {
        let mut registry = ContentRegistry::new();
        let mut sink = WarningSink::new();
        let chair_raw = crate::content::furniture::FurnitureRaw {
            identity: IdentityField::Concrete {
                id: MV::Single("f_chair".into()),
            },
            flags: vec![],
            copy_from: None,
            extend: None,
            delete: None,
            name: None,
            symbol: None,
            color: None,
            move_cost_mod: None,
            connect_groups: None,
            connects_to: None,
        };
        let null_raw = crate::content::furniture::FurnitureRaw {
            identity: IdentityField::Concrete {
                id: MV::Single("f_null".into()),
            },
            ..chair_raw.clone()
        };
        registry.load_furniture(vec![chair_raw, null_raw], &mut sink);
        registry.load_terrain(
            vec![crate::content::terrain::TerrainRaw {
                identity: IdentityField::Concrete {
                    id: MV::Single("t_floor".into()),
                },
                flags: vec![],
                copy_from: None,
                extend: None,
                delete: None,
                name: None,
                symbol: None,
                color: None,
                move_cost: Some(2),
                visibility: None,
                connect_groups: None,
                connects_to: None,
            }],
            &mut sink,
        );

        let palettes: ContentStore<Palette> = ContentStore::new();
        let mapgens = MapgenStore::new();
        let gen = MapGenGenerator::new(&registry, &palettes, &mapgens);

        let mut mapgen = Mapgen::blank("test".into(), 12, 12);
        mapgen.fill_ter = Some("t_floor".into());
        mapgen.furniture.insert(
            'c',
            MappingValue::Distribution(MV::Vec(vec![
                MaybeWeighted::Weighted(mapgen_types::Weighted::new("f_chair", 3)),
                MaybeWeighted::Weighted(mapgen_types::Weighted::new("f_null", 1)),
            ])),
        );
        let mut rows = vec![" ".repeat(12); 12];
        rows[0].replace_range(0..1, "c");
        mapgen.rows = rows;

        let chair_id = registry.furniture.int_id_of(&"f_chair".into()).unwrap();
        let mut chair_count = 0;
        let trials = 2000;
        for seed in 0..trials {
            let ctx = GenerationContext::new(seed, 0, 0, 0);
            let submap = gen.generate(&mapgen, &ctx, &mut sink);
            if submap.get_tile(0, 0).furniture == chair_id {
                chair_count += 1;
            }
        }
        let ratio = chair_count as f64 / trials as f64;
        assert!((ratio - 0.75).abs() < 0.05, "ratio was {ratio}");
    }

    #[test]
    fn seed_determinism_same_seed_same_output() {
        let registry = registry_with_terrain(&["t_floor", "t_wall"]);
        let palettes: ContentStore<Palette> = ContentStore::new();
        let mapgens = MapgenStore::new();
        let gen = MapGenGenerator::new(&registry, &palettes, &mapgens);

        let mut mapgen = Mapgen::blank("test".into(), 12, 12);
        mapgen.terrain.insert(
            'x',
            MappingValue::Distribution(MV::Vec(vec![
                MaybeWeighted::Weighted(mapgen_types::Weighted::new("t_floor", 1)),
                MaybeWeighted::Weighted(mapgen_types::Weighted::new("t_wall", 1)),
            ])),
        );
        let mut rows = vec![" ".repeat(12); 12];
        rows[3].replace_range(3..4, "x");
        mapgen.rows = rows;

        let mut sink1 = WarningSink::new();
        let mut sink2 = WarningSink::new();
        let ctx1 = GenerationContext::new(777, 1, 2, 0);
        let ctx2 = GenerationContext::new(777, 1, 2, 0);
        let a = gen.generate(&mapgen, &ctx1, &mut sink1);
        let b = gen.generate(&mapgen, &ctx2, &mut sink2);
        assert_eq!(a.get_terrain(3, 3), b.get_terrain(3, 3));
    }

    #[test]
    fn item_table_places_item_without_place_items_directive() {
        let registry = registry_with_terrain(&["t_floor"]);
        let palettes: ContentStore<Palette> = ContentStore::new();
        let mapgens = MapgenStore::new();
        let gen = MapGenGenerator::new(&registry, &palettes, &mapgens);

        let mut mapgen = Mapgen::blank("test".into(), 12, 12);
        mapgen.fill_ter = Some("t_floor".into());
        mapgen.items.insert('i', MappingValue::Single("jug_plastic".into()));
        let mut rows = vec![" ".repeat(12); 12];
        rows[4].replace_range(4..5, "i");
        mapgen.rows = rows;

        let mut sink = WarningSink::new();
        let ctx = GenerationContext::new(9, 0, 0, 0);
        let submap = gen.generate(&mapgen, &ctx, &mut sink);

        assert!(!submap.items_at(4, 4).is_empty());
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn nested_table_stamps_chunk_at_single_cell() {
        let registry = registry_with_terrain(&["t_floor", "t_wall"]);
        let palettes: ContentStore<Palette> = ContentStore::new();
        let mut mapgens = MapgenStore::new();

        let mut chunk = Mapgen::blank("chunk".into(), 12, 12);
        chunk.fill_ter = Some("t_wall".into());
        chunk.rows = vec![" ".repeat(12); 12];
        mapgens.register("chunk".into(), chunk, 100);

        let gen = MapGenGenerator::new(&registry, &palettes, &mapgens);

        let mut mapgen = Mapgen::blank("test".into(), 12, 12);
        mapgen.fill_ter = Some("t_floor".into());
        mapgen.nested.insert('n', MappingValue::Single("chunk".into()));
        let mut rows = vec![" ".repeat(12); 12];
        rows[0].replace_range(0..1, "n");
        mapgen.rows = rows;

        let mut sink = WarningSink::new();
        let ctx = GenerationContext::new(3, 0, 0, 0);
        let submap = gen.generate(&mapgen, &ctx, &mut sink);

        let wall = registry.terrain.int_id_of(&"t_wall".into()).unwrap();
        assert_eq!(submap.get_terrain(0, 0), wall);
    }

    #[test]
    fn nested_chunks_carry_their_items_and_spawns_into_the_parent() {
        let registry = registry_with_terrain(&["t_floor"]);
        let palettes: ContentStore<Palette> = ContentStore::new();
        let mut mapgens = MapgenStore::new();

        let mut chunk = Mapgen::blank("chunk".into(), 12, 12);
        chunk.fill_ter = Some("t_floor".into());
        chunk.items.insert('i', MappingValue::Single("jug_plastic".into()));
        chunk.place_monsters.push(PlaceMonsters {
            x: mapgen_types::NumberOrRange::Number(2),
            y: mapgen_types::NumberOrRange::Number(3),
            repeat: mapgen_types::NumberOrRange::Number(1),
            chance: 100,
            inner: MonsterPayload {
                kind: MonsterKind::Monster {
                    monster: MappingValue::Single("mon_zombie".into()),
                },
                pack_size: None,
            },
        });
        let mut chunk_rows = vec![" ".repeat(12); 12];
        chunk_rows[0].replace_range(0..1, "i");
        chunk.rows = chunk_rows;
        mapgens.register("chunk".into(), chunk, 100);

        let gen = MapGenGenerator::new(&registry, &palettes, &mapgens);

        let mut mapgen = Mapgen::blank("test".into(), 12, 12);
        mapgen.fill_ter = Some("t_floor".into());
        mapgen.nested.insert('n', MappingValue::Single("chunk".into()));
        let mut rows = vec![" ".repeat(12); 12];
        rows[0].replace_range(0..1, "n");
        mapgen.rows = rows;

        let mut sink = WarningSink::new();
        let ctx = GenerationContext::new(5, 0, 0, 0);
        let submap = gen.generate(&mapgen, &ctx, &mut sink);

        assert!(!submap.items_at(0, 0).is_empty());
        assert!(submap.spawns.iter().any(|sp| sp.x == 2 && sp.y == 3));
    }
}
