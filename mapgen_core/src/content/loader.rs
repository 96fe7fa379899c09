//! Generic `copy-from` inheritance resolver. Every content type (terrain,
//! furniture, trap, overmap-terrain) deserializes into a `*Raw` struct
//! generated by `#[content_entry]`; this module runs the same two-pass
//! algorithm (index by id, then resolve each concrete record against its
//! parent chain) over any of them via the `ImportRecord` trait, so the
//! per-type loaders in `terrain.rs`/`furniture.rs`/etc. are thin wrappers.
//!
//! A path-local visited set detects `copy-from` cycles, turning what would
//! otherwise be unbounded recursion into a warning.

use std::collections::HashMap;

use indexmap::IndexMap;
use mapgen_types::{DeleteOp, ExtendOp, Identifier, ImportRecord};

use crate::error::{WarningKind, WarningSink};

fn apply_flags_ops(flags: Vec<String>, extend: Option<&ExtendOp>, delete: Option<&DeleteOp>) -> Vec<String> {
    let mut flags = flags;
    if let Some(extend) = extend {
        if let Some(extra) = &extend.flags {
            for f in extra {
                if !flags.contains(f) {
                    flags.push(f.clone());
                }
            }
        }
    }
    if let Some(delete) = delete {
        if let Some(removed) = &delete.flags {
            flags.retain(|f| !removed.contains(f));
        }
    }
    flags
}

/// Resolve `copy-from` inheritance across `raws`, returning every record
/// (abstract and concrete) with its parent chain folded in, `extend`/
/// `delete` applied to its flags, and cycles broken with a warning. Callers
/// fan the result out to concrete structs via each type's generated
/// `into_concrete`.
pub fn resolve_inheritance<R: ImportRecord>(raws: Vec<R>, sink: &mut WarningSink) -> Vec<R> {
    let by_id: IndexMap<Identifier, R> = raws
        .iter()
        .map(|r| (r.identity().primary_id(), r.clone()))
        .collect();

    let mut resolved: HashMap<Identifier, R> = HashMap::new();
    let mut visiting: Vec<Identifier> = Vec::new();

    for id in by_id.keys() {
        resolve_one(id, &by_id, &mut resolved, &mut visiting, sink);
    }

    by_id
        .keys()
        .map(|id| resolved.get(id).cloned().expect("every id resolved above"))
        .collect()
}

fn resolve_one<R: ImportRecord>(
    id: &Identifier,
    by_id: &IndexMap<Identifier, R>,
    resolved: &mut HashMap<Identifier, R>,
    visiting: &mut Vec<Identifier>,
    sink: &mut WarningSink,
) -> R {
    if let Some(r) = resolved.get(id) {
        return r.clone();
    }

    let record = by_id.get(id).expect("id was taken from by_id's own keys").clone();

    let Some(parent_id) = record.copy_from().cloned() else {
        let mut base = record;
        let flags = apply_flags_ops(base.flags().to_vec(), base.extend(), base.delete());
        base.set_flags(flags);
        resolved.insert(id.clone(), base.clone());
        return base;
    };

    if visiting.contains(&parent_id) {
        sink.warn(WarningKind::CyclicInheritance, parent_id.as_str());
        let mut base = record;
        let flags = apply_flags_ops(base.flags().to_vec(), base.extend(), base.delete());
        base.set_flags(flags);
        resolved.insert(id.clone(), base.clone());
        return base;
    }

    let Some(_parent_record) = by_id.get(&parent_id) else {
        sink.warn(WarningKind::MissingParent, parent_id.as_str());
        let mut base = record;
        let flags = apply_flags_ops(base.flags().to_vec(), base.extend(), base.delete());
        base.set_flags(flags);
        resolved.insert(id.clone(), base.clone());
        return base;
    };

    visiting.push(id.clone());
    let parent_resolved = resolve_one(&parent_id, by_id, resolved, visiting, sink);
    visiting.pop();

    let mut merged = R::merge(&parent_resolved, &record);
    let flags = apply_flags_ops(merged.flags().to_vec(), merged.extend(), merged.delete());
    merged.set_flags(flags);

    resolved.insert(id.clone(), merged.clone());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapgen_macros::content_entry;
    use mapgen_types::{IdentityField, MaybeVec};

    #[content_entry]
    #[derive(Debug, Clone)]
    pub struct Stub {
        pub id: Identifier,
        pub move_cost: Option<i32>,
    }

    fn concrete(id: &str, copy_from: Option<&str>, move_cost: Option<i32>, flags: Vec<&str>) -> StubRaw {
        StubRaw {
            identity: IdentityField::Concrete {
                id: MaybeVec::Single(id.into()),
            },
            flags: flags.into_iter().map(String::from).collect(),
            copy_from: copy_from.map(Identifier::from),
            extend: None,
            delete: None,
            move_cost,
        }
    }

    #[test]
    fn inherits_missing_fields_from_parent() {
        let mut sink = WarningSink::new();
        let parent = concrete("parent", None, Some(5), vec!["BASE"]);
        let child = concrete("child", Some("parent"), None, vec![]);
        let resolved = resolve_inheritance(vec![parent, child], &mut sink);
        let child_resolved = resolved.iter().find(|r| r.identity().primary_id().as_str() == "child").unwrap();
        assert_eq!(child_resolved.move_cost, Some(5));
        assert_eq!(child_resolved.flags, vec!["BASE".to_string()]);
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn child_field_overrides_parent() {
        let mut sink = WarningSink::new();
        let parent = concrete("parent", None, Some(5), vec![]);
        let child = concrete("child", Some("parent"), Some(9), vec![]);
        let resolved = resolve_inheritance(vec![parent, child], &mut sink);
        let child_resolved = resolved.iter().find(|r| r.identity().primary_id().as_str() == "child").unwrap();
        assert_eq!(child_resolved.move_cost, Some(9));
    }

    #[test]
    fn missing_parent_falls_back_and_warns_once() {
        let mut sink = WarningSink::new();
        let child = concrete("child", Some("ghost"), None, vec![]);
        let resolved = resolve_inheritance(vec![child], &mut sink);
        assert_eq!(resolved.len(), 1);
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn cycle_terminates_and_warns_once() {
        let mut sink = WarningSink::new();
        let a = concrete("a", Some("b"), Some(1), vec![]);
        let b = concrete("b", Some("a"), Some(2), vec![]);
        let resolved = resolve_inheritance(vec![a, b], &mut sink);
        assert_eq!(resolved.len(), 2);
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn abstract_records_are_excluded_from_into_concrete() {
        let template = StubRaw {
            identity: IdentityField::Template {
                abstract_id: "tmpl".into(),
            },
            flags: vec![],
            copy_from: None,
            extend: None,
            delete: None,
            move_cost: Some(3),
        };
        assert!(template.into_concrete().is_empty());
    }
}
