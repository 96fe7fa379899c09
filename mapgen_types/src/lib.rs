//! Primitive types shared by the content loaders, the palette resolver and
//! the mapgen interpreter: identifier newtypes, the "maybe a list / maybe
//! weighted" serde shapes the JSON content leans on, and the `ImportRecord`
//! trait that drives `copy-from` inheritance resolution.

use derive_more::Display;
use num_traits::int::PrimInt;
use rand::distr::uniform::SampleUniform;
use rand::{Rng, RngCore};
use serde::de::{self, Deserializer, Visitor};
use serde_derive::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;
use std::ops::Deref;

/// The null terrain id. Reserved: cell storage treats integer id `0` as
/// "no terrain" and the string form as the fallback when a symbol fails to
/// resolve.
pub const NULL_TERRAIN: &str = "t_null";
pub const NULL_FURNITURE: &str = "f_null";
pub const NULL_TRAP: &str = "tr_null";
pub const NULL_FIELD: &str = "fd_null";

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash, Display, Default, PartialOrd, Ord)]
pub struct Identifier(pub String);

impl Deref for Identifier {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        matches!(
            self.0.as_str(),
            NULL_TERRAIN | NULL_FURNITURE | NULL_TRAP | NULL_FIELD | "null"
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash, Display)]
pub struct ParameterId(pub String);

impl From<&str> for ParameterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

pub type Comment = Option<String>;

#[derive(Debug, Eq, PartialEq, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MaybeVec<T> {
    Single(T),
    Vec(Vec<T>),
}

impl<T: Clone> MaybeVec<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            MaybeVec::Single(s) => vec![s],
            MaybeVec::Vec(v) => v,
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match self {
            MaybeVec::Single(s) => Box::new(std::iter::once(s)),
            MaybeVec::Vec(v) => Box::new(v.iter()),
        }
    }

    pub fn first(&self) -> Option<&T> {
        match self {
            MaybeVec::Single(s) => Some(s),
            MaybeVec::Vec(v) => v.first(),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct Weighted<T> {
    pub data: T,
    pub weight: i32,
}

impl<T> Weighted<T> {
    pub fn new(data: impl Into<T>, weight: i32) -> Self {
        Self {
            data: data.into(),
            weight,
        }
    }
}

impl<'de, T> Deserialize<'de> for Weighted<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WeightedVisitor<T> {
            _marker: std::marker::PhantomData<T>,
        }

        impl<'de, T> Visitor<'de> for WeightedVisitor<T>
        where
            T: Deserialize<'de>,
        {
            type Value = Weighted<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("expected [value, weight] or a bare value")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let data: T = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let weight: i32 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                Ok(Weighted { data, weight })
            }
        }

        deserializer.deserialize_seq(WeightedVisitor {
            _marker: std::marker::PhantomData,
        })
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MaybeWeighted<T> {
    Weighted(Weighted<T>),
    NotWeighted(T),
}

impl<T> From<T> for MaybeWeighted<T> {
    fn from(value: T) -> Self {
        Self::NotWeighted(value)
    }
}

impl<T> MaybeWeighted<T> {
    pub fn into_data(self) -> T {
        match self {
            MaybeWeighted::NotWeighted(nw) => nw,
            MaybeWeighted::Weighted(w) => w.data,
        }
    }

    pub fn to_weighted(self) -> Weighted<T> {
        match self {
            MaybeWeighted::NotWeighted(d) => Weighted { data: d, weight: 1 },
            MaybeWeighted::Weighted(w) => w,
        }
    }

    pub fn weight_or_one(&self) -> i32 {
        match self {
            MaybeWeighted::Weighted(w) => w.weight,
            MaybeWeighted::NotWeighted(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum NumberOrRange<T: PrimInt + Clone + SampleUniform> {
    Number(T),
    Range((T, T)),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrArray<T: PrimInt + Clone + SampleUniform> {
    Number(T),
    Array(Vec<T>),
}

impl<'de, T: PrimInt + Clone + SampleUniform + Deserialize<'de>> Deserialize<'de>
    for NumberOrRange<T>
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = NumberOrArray::<T>::deserialize(deserializer)?;
        match value {
            NumberOrArray::Number(n) => Ok(NumberOrRange::Number(n)),
            NumberOrArray::Array(arr) => match arr.len() {
                1 => Ok(NumberOrRange::Number(arr[0])),
                2 => Ok(NumberOrRange::Range((arr[0], arr[1]))),
                _ => Err(de::Error::custom("array must contain 1 or 2 elements")),
            },
        }
    }
}

impl<T: PrimInt + Clone + SampleUniform> NumberOrRange<T> {
    pub fn sample(&self, rng: &mut dyn RngCore) -> T {
        match *self {
            NumberOrRange::Number(n) => n,
            NumberOrRange::Range((from, to)) => {
                if from == to {
                    from
                } else {
                    rng.random_range(from..=to)
                }
            }
        }
    }

    pub fn bounds(&self) -> (T, T) {
        match *self {
            NumberOrRange::Number(n) => (n, n),
            NumberOrRange::Range((from, to)) => (from, to),
        }
    }
}

impl<T: PrimInt + SampleUniform> PartialEq<T> for NumberOrRange<T> {
    fn eq(&self, other: &T) -> bool {
        match self {
            NumberOrRange::Number(n) => n == other,
            NumberOrRange::Range((min, max)) => other >= min && other <= max,
        }
    }
}

impl<T: PrimInt + SampleUniform> PartialOrd<T> for NumberOrRange<T> {
    fn partial_cmp(&self, other: &T) -> Option<Ordering> {
        match self {
            NumberOrRange::Number(n) => n.partial_cmp(other),
            NumberOrRange::Range((min, max)) => {
                if other < min {
                    Some(Ordering::Greater)
                } else if other > max {
                    Some(Ordering::Less)
                } else {
                    Some(Ordering::Equal)
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Switch {
    pub param: ParameterId,
    pub fallback: Identifier,
}

/// One entry of a mapgen/palette symbol table: a bare id, a `{param}`
/// reference, a `{switch, cases}` dispatch, or a weighted distribution.
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingValue {
    Single(Identifier),
    Param {
        param: ParameterId,
        fallback: Option<Identifier>,
    },
    Switch {
        switch: Switch,
        cases: HashMap<Identifier, Identifier>,
    },
    Distribution(MaybeVec<MaybeWeighted<DistributionEntry>>),
}

/// A dedicated type rather than `Box<MappingValue>` to avoid the enum
/// recursing into itself during deserialization.
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DistributionEntry {
    Single(Identifier),
    Param {
        param: ParameterId,
        fallback: Option<Identifier>,
    },
    Switch {
        switch: Switch,
        cases: HashMap<Identifier, Identifier>,
    },
    Nested(Distribution),
}

impl From<&str> for DistributionEntry {
    fn from(value: &str) -> Self {
        Self::Single(value.into())
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub distribution: MaybeVec<MaybeWeighted<Identifier>>,
}

/// Implemented by `MappingValue`, `DistributionEntry` and `Distribution` so
/// the resolver and the interpreter share one code path for resolving a
/// symbol-table entry to a concrete id.
pub trait ResolveIdentifier {
    type Error;

    fn resolve(
        &self,
        resolved_parameters: &indexmap::IndexMap<ParameterId, Identifier>,
        rng: &mut dyn RngCore,
    ) -> Result<Identifier, Self::Error>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("parameter {0} has no override and no fallback")]
    MissingFallback(String),
    #[error("switch on {0} has no case for resolved value {1}")]
    MissingSwitchCase(String, String),
    #[error("distribution has no entries to choose from")]
    EmptyDistribution,
}

/// Clamps negative weights to zero; if the total is not positive, returns
/// the first entry.
pub fn weighted_pick<'a, T>(entries: &'a [Weighted<T>], rng: &mut dyn RngCore) -> &'a T {
    let total: i64 = entries.iter().map(|w| w.weight.max(0) as i64).sum();
    if total <= 0 {
        return &entries[0].data;
    }
    let draw = rng.random_range(0..total);
    let mut cumulative = 0i64;
    for entry in entries {
        cumulative += entry.weight.max(0) as i64;
        if draw < cumulative {
            return &entry.data;
        }
    }
    &entries.last().expect("non-empty").data
}

impl ResolveIdentifier for DistributionEntry {
    type Error = ResolveError;

    fn resolve(
        &self,
        resolved_parameters: &indexmap::IndexMap<ParameterId, Identifier>,
        rng: &mut dyn RngCore,
    ) -> Result<Identifier, ResolveError> {
        match self {
            DistributionEntry::Single(id) => Ok(id.clone()),
            DistributionEntry::Param { param, fallback } => resolved_parameters
                .get(param)
                .cloned()
                .or_else(|| fallback.clone())
                .ok_or_else(|| ResolveError::MissingFallback(param.0.clone())),
            DistributionEntry::Switch { switch, cases } => {
                let switched_on = resolved_parameters
                    .get(&switch.param)
                    .cloned()
                    .unwrap_or_else(|| switch.fallback.clone());
                cases.get(&switched_on).cloned().ok_or_else(|| {
                    ResolveError::MissingSwitchCase(switch.param.0.clone(), switched_on.0.clone())
                })
            }
            DistributionEntry::Nested(d) => d.resolve(resolved_parameters, rng),
        }
    }
}

impl ResolveIdentifier for Distribution {
    type Error = ResolveError;

    fn resolve(
        &self,
        resolved_parameters: &indexmap::IndexMap<ParameterId, Identifier>,
        rng: &mut dyn RngCore,
    ) -> Result<Identifier, ResolveError> {
        match &self.distribution {
            MaybeVec::Single(single) => Ok(single.clone().into_data()),
            MaybeVec::Vec(entries) => {
                if entries.is_empty() {
                    return Err(ResolveError::EmptyDistribution);
                }
                let weighted: Vec<Weighted<Identifier>> = entries
                    .iter()
                    .cloned()
                    .map(MaybeWeighted::to_weighted)
                    .collect();
                Ok(weighted_pick(&weighted, rng).clone())
            }
        }
    }
}

impl ResolveIdentifier for MappingValue {
    type Error = ResolveError;

    fn resolve(
        &self,
        resolved_parameters: &indexmap::IndexMap<ParameterId, Identifier>,
        rng: &mut dyn RngCore,
    ) -> Result<Identifier, ResolveError> {
        match self {
            MappingValue::Single(id) => Ok(id.clone()),
            MappingValue::Param { param, fallback } => resolved_parameters
                .get(param)
                .cloned()
                .or_else(|| fallback.clone())
                .ok_or_else(|| ResolveError::MissingFallback(param.0.clone())),
            MappingValue::Switch { switch, cases } => {
                let switched_on = resolved_parameters
                    .get(&switch.param)
                    .cloned()
                    .unwrap_or_else(|| switch.fallback.clone());
                cases.get(&switched_on).cloned().ok_or_else(|| {
                    ResolveError::MissingSwitchCase(switch.param.0.clone(), switched_on.0.clone())
                })
            }
            MappingValue::Distribution(entries) => match entries {
                MaybeVec::Single(single) => {
                    single.clone().into_data().resolve(resolved_parameters, rng)
                }
                MaybeVec::Vec(v) => {
                    if v.is_empty() {
                        return Err(ResolveError::EmptyDistribution);
                    }
                    let weighted: Vec<Weighted<&DistributionEntry>> = v
                        .iter()
                        .map(|mw| match mw {
                            MaybeWeighted::Weighted(w) => Weighted {
                                data: &w.data,
                                weight: w.weight,
                            },
                            MaybeWeighted::NotWeighted(d) => Weighted { data: d, weight: 1 },
                        })
                        .collect();
                    weighted_pick(&weighted, rng).resolve(resolved_parameters, rng)
                }
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExtendOp {
    pub flags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DeleteOp {
    pub flags: Option<Vec<String>>,
}

/// Concrete records (`"id": ...`) are materialized into the content store;
/// abstract records (`"abstract": ...`) exist only to be `copy-from`'d by
/// other records and are never themselves emitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdentityField {
    Concrete { id: MaybeVec<Identifier> },
    Template {
        #[serde(rename = "abstract")]
        abstract_id: Identifier,
    },
}

impl IdentityField {
    pub fn primary_id(&self) -> Identifier {
        match self {
            IdentityField::Concrete { id } => {
                id.first().cloned().expect("a record's id list is never empty")
            }
            IdentityField::Template { abstract_id } => abstract_id.clone(),
        }
    }

    pub fn concrete_ids(&self) -> Vec<Identifier> {
        match self {
            IdentityField::Concrete { id } => id.clone().into_vec(),
            IdentityField::Template { .. } => Vec::new(),
        }
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, IdentityField::Template { .. })
    }
}

/// Implemented by every loader's `*Raw` intermediate struct (normally
/// generated by `#[content_entry]`). Drives `copy-from` resolution: walk the
/// parent chain, apply `extend`/`delete`, then let the child's own fields
/// override whatever the parent supplied.
pub trait ImportRecord: Clone + Debug {
    fn merge(base: &Self, override_: &Self) -> Self;

    fn identity(&self) -> &IdentityField;
    fn copy_from(&self) -> Option<&Identifier>;
    fn extend(&self) -> Option<&ExtendOp>;
    fn delete(&self) -> Option<&DeleteOp>;

    fn flags(&self) -> &[String];
    fn set_flags(&mut self, flags: Vec<String>);
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum InheritanceError {
    #[error("parent '{0}' not found")]
    MissingParent(String),
    #[error("cyclic copy-from chain reached '{0}' again")]
    Cyclic(String),
}
