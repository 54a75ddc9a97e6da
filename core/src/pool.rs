//! The engine pool: one bit generator per (realization, type, purpose) key.
//!
//! RULE: engines are created only through explicit initialization.
//! A lookup miss is a hard error, never a lazily seeded engine, so a
//! forgotten `init_engines` fails loudly instead of producing wrong data.

use crate::error::{PrngError, PrngResult};
use crate::types::Realization;
use rand_pcg::Pcg64Mcg;
use std::collections::HashMap;

/// The deterministic bit generator behind every stream.
pub type BitEngine = Pcg64Mcg;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineKey {
    pub realization: Realization,
    pub ptype: String,
    pub purpose: String,
}

impl EngineKey {
    pub fn new(realization: Realization, ptype: &str, purpose: &str) -> Self {
        Self {
            realization,
            ptype: ptype.to_string(),
            purpose: purpose.to_string(),
        }
    }
}

/// Exclusively owned by one generation engine; at most one bit generator
/// per key, replaced wholesale on re-initialization.
#[derive(Default)]
pub struct EnginePool {
    engines: HashMap<EngineKey, BitEngine>,
}

impl EnginePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an engine at `key`, overwriting any prior entry.
    pub fn insert(&mut self, key: EngineKey, engine: BitEngine) {
        self.engines.insert(key, engine);
    }

    /// Discard all stored engines.
    pub fn clear(&mut self) {
        self.engines.clear();
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn engine_mut(&mut self, key: &EngineKey) -> PrngResult<&mut BitEngine> {
        self.engines
            .get_mut(key)
            .ok_or_else(|| PrngError::EngineNotInitialized {
                realization: key.realization,
                ptype: key.ptype.clone(),
                purpose: key.purpose.clone(),
            })
    }

    /// The one realization currently initialized for (ptype, purpose).
    /// Errors unless exactly one distinct realization is active.
    pub fn single_realization(&self, ptype: &str, purpose: &str) -> PrngResult<Realization> {
        let mut active: Vec<Realization> = self
            .engines
            .keys()
            .filter(|key| key.ptype == ptype && key.purpose == purpose)
            .map(|key| key.realization)
            .collect();
        active.sort_unstable();
        active.dedup();

        if active.len() == 1 {
            Ok(active[0])
        } else {
            Err(PrngError::AmbiguousRealization {
                ptype: ptype.to_string(),
                purpose: purpose.to_string(),
                active: active.len(),
            })
        }
    }
}
