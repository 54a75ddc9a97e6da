//! The particle catalog: entity types, particle ids and their order numbers.
//!
//! RULE: insertion order of entity types is part of the seed contract.
//! Reordering types between runs changes every derived seed, which makes
//! streams incomparable with earlier runs. The catalog is immutable once an
//! engine owns it.

use crate::error::{PrngError, PrngResult};
use crate::types::{EntityId, OrderIndex};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// The particles of one entity type.
///
/// `Named` particles carry a unique id and a gapless order number, so they
/// can be filtered individually. `Counted` particles are indistinguishable:
/// only their number is known and id filtering is rejected for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntitySet {
    Counted(usize),
    Named(IndexMap<EntityId, OrderIndex>),
}

impl EntitySet {
    /// Build a named set from ids in order, assigning order numbers 0, 1, ...
    pub fn named_in_order<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        let map = ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| (id.into(), index))
            .collect();
        EntitySet::Named(map)
    }

    pub fn len(&self) -> usize {
        match self {
            EntitySet::Counted(n) => *n,
            EntitySet::Named(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered mapping from entity-type name to its particles.
///
/// Serialized as the bare nested mapping; the export file is an opaque
/// artifact consumed only by [`ParticleCatalog::from_file`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticleCatalog {
    types: IndexMap<String, EntitySet>,
}

impl ParticleCatalog {
    pub fn new(types: IndexMap<String, EntitySet>) -> PrngResult<Self> {
        let catalog = Self { types };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build a catalog of counted (indistinguishable) entity types.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let types = counts
            .into_iter()
            .map(|(name, n)| (name.into(), EntitySet::Counted(n)))
            .collect();
        Self { types }
    }

    /// Load a catalog previously written with [`ParticleCatalog::export`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> PrngResult<Self> {
        let file = File::open(path)?;
        let catalog: Self = serde_json::from_reader(BufReader::new(file))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Write the catalog to `path`, replacing any existing file.
    pub fn export<P: AsRef<Path>>(&self, path: P) -> PrngResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    fn validate(&self) -> PrngResult<()> {
        for (name, set) in &self.types {
            if let EntitySet::Named(map) = set {
                let mut seen = vec![false; map.len()];
                for &index in map.values() {
                    if index >= map.len() || seen[index] {
                        return Err(PrngError::MalformedCatalog {
                            ptype: name.clone(),
                            expected: map.len(),
                        });
                    }
                    seen[index] = true;
                }
            }
        }
        Ok(())
    }

    /// Number of entity types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Entity-type names in insertion order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Position of an entity type in insertion order, used for seeding.
    pub fn type_index(&self, ptype: &str) -> PrngResult<usize> {
        self.types
            .get_index_of(ptype)
            .ok_or_else(|| PrngError::UnknownEntityType(ptype.to_string()))
    }

    /// Number of particles of one entity type.
    pub fn amount(&self, ptype: &str) -> PrngResult<usize> {
        self.entity_set(ptype).map(EntitySet::len)
    }

    pub fn entity_set(&self, ptype: &str) -> PrngResult<&EntitySet> {
        self.types
            .get(ptype)
            .ok_or_else(|| PrngError::UnknownEntityType(ptype.to_string()))
    }

    /// Order number of a named particle. Counted types have no id namespace.
    pub fn order_of(&self, ptype: &str, id: &str) -> PrngResult<OrderIndex> {
        match self.entity_set(ptype)? {
            EntitySet::Named(map) => {
                map.get(id)
                    .copied()
                    .ok_or_else(|| PrngError::UnknownEntityId {
                        ptype: ptype.to_string(),
                        id: id.to_string(),
                    })
            }
            EntitySet::Counted(_) => Err(PrngError::UnfilterableEntityType(ptype.to_string())),
        }
    }
}
