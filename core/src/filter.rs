//! Post-draw selection of particles by id.
//!
//! Filtering never touches engine state: the full row has been drawn (or
//! read) already and the excluded draws have advanced the engine anyway.

use crate::catalog::ParticleCatalog;
use crate::error::PrngResult;
use crate::types::{EntityId, OrderIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStrategy {
    /// Keep only the listed ids, in the order they were listed.
    Include,
    /// Drop the listed ids; survivors keep their catalog order.
    Exclude,
}

/// A set of particle ids plus the strategy to apply them with.
#[derive(Debug, Clone, PartialEq)]
pub struct IdFilter {
    ids: Vec<EntityId>,
    strategy: FilterStrategy,
}

impl IdFilter {
    pub fn include<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            strategy: FilterStrategy::Include,
        }
    }

    pub fn exclude<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            strategy: FilterStrategy::Exclude,
        }
    }

    pub fn strategy(&self) -> FilterStrategy {
        self.strategy
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Row length after filtering a full row of `full` values.
    pub fn survivor_count(&self, full: usize) -> usize {
        match self.strategy {
            FilterStrategy::Exclude => full.saturating_sub(self.ids.len()),
            FilterStrategy::Include => self.ids.len(),
        }
    }

    /// Resolve every id to its order number, failing on counted types and
    /// unknown ids. Also used as a pure validation pass.
    pub fn order_indices(&self, catalog: &ParticleCatalog, ptype: &str) -> PrngResult<Vec<OrderIndex>> {
        self.ids
            .iter()
            .map(|id| catalog.order_of(ptype, id))
            .collect()
    }

    pub fn validate(&self, catalog: &ParticleCatalog, ptype: &str) -> PrngResult<()> {
        self.order_indices(catalog, ptype).map(|_| ())
    }

    /// Apply the filter to one full unfiltered row.
    pub fn apply(&self, catalog: &ParticleCatalog, ptype: &str, row: &[f64]) -> PrngResult<Vec<f64>> {
        let indices = self.order_indices(catalog, ptype)?;
        match self.strategy {
            FilterStrategy::Exclude => {
                let mut dropped = vec![false; row.len()];
                for index in indices {
                    dropped[index] = true;
                }
                Ok(row
                    .iter()
                    .zip(dropped)
                    .filter(|&(_, dropped)| !dropped)
                    .map(|(value, _)| *value)
                    .collect())
            }
            FilterStrategy::Include => Ok(indices.into_iter().map(|index| row[index]).collect()),
        }
    }
}
