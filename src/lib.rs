//! `mapgen-engine`: the umbrella crate for the procedural map-generation
//! pipeline. The pipeline itself lives in [`mapgen_core`] (content loaders,
//! palette resolver, mapgen interpreter, tile store, game map, overmap
//! layer); this crate re-exports its public surface so a caller depends on
//! one crate name rather than reaching into the workspace directly.

pub use mapgen_core::*;

pub use mapgen_types;
