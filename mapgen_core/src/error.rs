//! Per-subsystem error enums and the deduplicated warning sink loaders and
//! the generator share. Loading and generation never propagate these to the
//! caller (spec'd failure semantics are "skip and warn"); they exist so
//! internal call sites can reason about *why* something fell back, and so
//! tests can assert on it.

use std::collections::HashSet;

use log::warn;
use strum_macros::Display;

/// A warning kind paired with the offending id, deduplicated so a content
/// pack with a thousand copies of the same mistake logs it once.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum WarningKind {
    MissingParent,
    CyclicInheritance,
    InvalidRecord,
    PaletteNotFound,
    CyclicPalette,
    UnknownParameter,
    MissingReference,
    UnresolvedSymbol,
    DepthLimitExceeded,
    TemplateBounds,
}

/// Collects (kind, id) warnings and logs each exactly once. Shared by the
/// loader, the palette resolver and the generator so a single content pack
/// produces one coherent log rather than one line per occurrence.
#[derive(Debug, Default)]
pub struct WarningSink {
    seen: HashSet<(WarningKind, String)>,
}

impl WarningSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, kind: WarningKind, id: impl Into<String>) {
        let id = id.into();
        if self.seen.insert((kind, id.clone())) {
            warn!("{kind}: {id}");
        }
    }

    pub fn count(&self) -> usize {
        self.seen.len()
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ContentLoadError {
    #[error("parent '{0}' not found")]
    MissingParent(String),
    #[error("cyclic copy-from chain reached '{0}' again")]
    CyclicInheritance(String),
    #[error("record '{0}' is missing a required field or has an invalid type")]
    InvalidRecord(String),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette '{0}' not found")]
    PaletteNotFound(String),
    #[error("cyclic palette reference reached '{0}' again")]
    CyclicPalette(String),
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("unknown {kind} id '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("character '{0}' has no mapping and no fill_ter")]
    UnresolvedSymbol(char),
    #[error("nested mapgen depth exceeded limit of {limit}")]
    DepthLimitExceeded { limit: u32 },
    #[error("template rows disagree with declared width/height")]
    TemplateBoundsError,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SubmapError {
    #[error("coordinate ({0}, {1}) is out of bounds for a {2}x{2} submap")]
    OutOfBounds(i32, i32, u32),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum OvermapError {
    #[error("z-offset {0} is out of bounds")]
    InvalidZLevel(i32),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum GameMapError {
    #[error("slot ({x}, {y}, {z}) is out of bounds for the game map grid")]
    OutOfBounds { x: i32, y: i32, z: i32 },
}
