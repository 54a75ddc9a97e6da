//! The generation engine: named, reproducible random-number streams.
//!
//! RULES:
//!   - Every stream is addressed by (realization, entity type, purpose).
//!   - Engines are seeded only through the seed logic; same key, same stream.
//!   - Draws advance an engine by the full unfiltered particle count, so
//!     call-count and call-order never leak into another key's stream.
//!   - With a source stream attached, engines are never touched: switching
//!     back to generator mode later reproduces the numbers generator mode
//!     would have produced from scratch.

use crate::catalog::ParticleCatalog;
use crate::distribution::Distribution;
use crate::error::{PrngError, PrngResult};
use crate::exim::{SourceReader, TeeWriter};
use crate::filter::IdFilter;
use crate::pool::{BitEngine, EngineKey, EnginePool};
use crate::seed::SeedLogic;
use crate::types::Realization;
use log::warn;
use rand::SeedableRng;
use std::ops::Range;
use std::path::Path;

/// Owns the catalog, the purpose list, the engine pool and the optional
/// tee/source stream handles. Stream handles live for the engine's
/// lifetime and are released exactly once, at [`NamedPrng::close_streams`]
/// or at drop.
pub struct NamedPrng {
    catalog: ParticleCatalog,
    purposes: Vec<String>,
    seed_logic: SeedLogic,
    pool: EnginePool,
    tee: Option<TeeWriter>,
    source: Option<SourceReader>,
    only_used: bool,
}

impl NamedPrng {
    /// Build an engine over `catalog` and `purposes` with the default seed
    /// logic. Fails fast if the catalog and purpose list exceed the seed
    /// capacity.
    pub fn new(purposes: Vec<String>, catalog: ParticleCatalog) -> PrngResult<Self> {
        let seed_logic = SeedLogic::default();
        seed_logic.check_limits(catalog.len(), purposes.len())?;
        Ok(Self {
            catalog,
            purposes,
            seed_logic,
            pool: EnginePool::new(),
            tee: None,
            source: None,
            only_used: false,
        })
    }

    /// Replace the seed logic, re-checking capacity against it.
    pub fn with_seed_logic(mut self, seed_logic: SeedLogic) -> PrngResult<Self> {
        seed_logic.check_limits(self.catalog.len(), self.purposes.len())?;
        self.seed_logic = seed_logic;
        Ok(self)
    }

    /// Attach a tee stream: every generated or replayed value is appended
    /// to `path`. An open failure is an error, not a disabled feature.
    pub fn with_tee<P: AsRef<Path>>(mut self, path: P) -> PrngResult<Self> {
        self.tee = Some(TeeWriter::open(path)?);
        Ok(self)
    }

    /// Attach a source stream: values are read from `path` instead of being
    /// generated, and engine state is left untouched.
    pub fn with_source<P: AsRef<Path>>(mut self, path: P) -> PrngResult<Self> {
        self.source = Some(SourceReader::open(path)?);
        Ok(self)
    }

    /// Switch tee/source between full rows (false, the default) and only
    /// the filtered subset (true).
    pub fn with_only_used(mut self, only_used: bool) -> Self {
        self.only_used = only_used;
        self
    }

    pub fn catalog(&self) -> &ParticleCatalog {
        &self.catalog
    }

    pub fn purposes(&self) -> &[String] {
        &self.purposes
    }

    pub fn seed_logic(&self) -> SeedLogic {
        self.seed_logic
    }

    pub fn only_used(&self) -> bool {
        self.only_used
    }

    /// Number of live engines in the pool.
    pub fn engine_count(&self) -> usize {
        self.pool.len()
    }

    fn purpose_index(&self, purpose: &str) -> PrngResult<usize> {
        self.purposes
            .iter()
            .position(|known| known == purpose)
            .ok_or_else(|| PrngError::UnknownPurpose(purpose.to_string()))
    }

    /// Seed and store one engine for every combination of the given
    /// realizations, entity types and purposes. `None` means "all".
    /// Existing engines at the same keys are replaced.
    pub fn init_engines(
        &mut self,
        realizations: &[Realization],
        ptypes: Option<&[&str]>,
        purposes: Option<&[&str]>,
    ) -> PrngResult<()> {
        let ptypes: Vec<String> = match ptypes {
            Some(named) => {
                for ptype in named {
                    self.catalog.type_index(ptype)?;
                }
                named.iter().map(|s| s.to_string()).collect()
            }
            None => self.catalog.type_names().map(str::to_string).collect(),
        };
        let purposes: Vec<String> = match purposes {
            Some(named) => {
                for purpose in named {
                    self.purpose_index(purpose)?;
                }
                named.iter().map(|s| s.to_string()).collect()
            }
            None => self.purposes.clone(),
        };

        for &realization in realizations {
            for ptype in &ptypes {
                let type_index = self.catalog.type_index(ptype)?;
                for purpose in &purposes {
                    let purpose_index = self.purpose_index(purpose)?;
                    let seed = self.seed_logic.seed_for(realization, type_index, purpose_index);
                    self.pool.insert(
                        EngineKey::new(realization, ptype, purpose),
                        BitEngine::seed_from_u64(seed),
                    );
                }
            }
        }
        Ok(())
    }

    /// Discard every engine. Generating afterwards without re-initializing
    /// fails with a lookup error.
    pub fn clear_engines(&mut self) {
        self.pool.clear();
    }

    /// Draw one row of random numbers for (`ptype`, `purpose`).
    ///
    /// With no `realization` given, the single currently initialized one is
    /// used (an error if none or several are active). The engine advances
    /// by the full unfiltered particle count regardless of the filter; with
    /// a source attached, values come from the stream and no engine state
    /// changes. Tee/source honor the `only_used` mode: full rows by
    /// default, only the filtered subset when `only_used` is set.
    pub fn generate(
        &mut self,
        distribution: Distribution,
        ptype: &str,
        purpose: &str,
        realization: Option<Realization>,
        id_filter: Option<&IdFilter>,
    ) -> PrngResult<Vec<f64>> {
        let amount = self.catalog.amount(ptype)?;
        self.purpose_index(purpose)?;
        if let Some(filter) = id_filter {
            filter.validate(&self.catalog, ptype)?;
        }

        let row = if let Some(source) = self.source.as_mut() {
            let wanted = if self.only_used {
                id_filter.map_or(amount, |filter| filter.survivor_count(amount))
            } else {
                amount
            };
            source.read_row(wanted)?
        } else {
            let realization = match realization {
                Some(explicit) => explicit,
                None => {
                    let implied = self.pool.single_realization(ptype, purpose)?;
                    warn!(
                        "no realization given for ('{ptype}', '{purpose}'), \
                         using the only initialized one: {implied}"
                    );
                    implied
                }
            };
            let key = EngineKey::new(realization, ptype, purpose);
            let engine = self.pool.engine_mut(&key)?;
            distribution.sample_row(engine, amount)?
        };

        // Full-row mode records everything, replayed values included.
        if !self.only_used {
            if let Some(tee) = self.tee.as_mut() {
                tee.write_row(&row)?;
            }
        }

        // A source in only_used mode already delivers the filtered subset.
        let skip_filter = self.source.is_some() && self.only_used;
        let row = match id_filter {
            Some(filter) if !skip_filter => filter.apply(&self.catalog, ptype, &row)?,
            _ => row,
        };

        if self.only_used {
            if let Some(tee) = self.tee.as_mut() {
                tee.write_row(&row)?;
            }
        }

        Ok(row)
    }

    /// One row per realization in selector order, drawn from the live pool.
    /// Every listed realization must have been initialized.
    pub fn generate_rows(
        &mut self,
        distribution: Distribution,
        ptype: &str,
        purpose: &str,
        realizations: &[Realization],
        id_filter: Option<&IdFilter>,
    ) -> PrngResult<Vec<Vec<f64>>> {
        let mut rows = Vec::with_capacity(realizations.len());
        for &realization in realizations {
            rows.push(self.generate(distribution, ptype, purpose, Some(realization), id_filter)?);
        }
        Ok(rows)
    }

    /// One freshly seeded row per realization: each listed realization is
    /// re-initialized for (`ptype`, `purpose`) before its row is drawn, so
    /// the result only depends on the key, never on prior calls.
    pub fn generate_realizations(
        &mut self,
        distribution: Distribution,
        ptype: &str,
        purpose: &str,
        realizations: &[Realization],
        id_filter: Option<&IdFilter>,
    ) -> PrngResult<Vec<Vec<f64>>> {
        let blocks =
            self.generate_over_time(distribution, ptype, purpose, realizations, 0..1, id_filter)?;
        Ok(blocks.into_iter().flatten().collect())
    }

    /// Realizations x time steps x particles.
    ///
    /// Per realization, `time_range.start` full rows are drawn and discarded
    /// to fast-forward deterministically, then the remaining rows are
    /// collected. Discarded rows still pass through tee/source, keeping
    /// record and replay call sequences aligned.
    pub fn generate_over_time(
        &mut self,
        distribution: Distribution,
        ptype: &str,
        purpose: &str,
        realizations: &[Realization],
        time_range: Range<usize>,
        id_filter: Option<&IdFilter>,
    ) -> PrngResult<Vec<Vec<Vec<f64>>>> {
        let mut blocks = Vec::with_capacity(realizations.len());
        for &realization in realizations {
            self.init_engines(&[realization], Some(&[ptype]), Some(&[purpose]))?;
            let mut block = Vec::with_capacity(time_range.len());
            for step in 0..time_range.end {
                if step < time_range.start {
                    self.generate(distribution, ptype, purpose, Some(realization), None)?;
                } else {
                    block.push(self.generate(
                        distribution,
                        ptype,
                        purpose,
                        Some(realization),
                        id_filter,
                    )?);
                }
            }
            blocks.push(block);
        }
        Ok(blocks)
    }

    /// Write the catalog to `path`; load it back with
    /// [`ParticleCatalog::from_file`].
    pub fn export_particles<P: AsRef<Path>>(&self, path: P) -> PrngResult<()> {
        self.catalog.export(path)
    }

    /// Flush and release both stream handles. Safe to call once; the
    /// handles are gone afterwards and later draws use the pool only.
    pub fn close_streams(&mut self) -> PrngResult<()> {
        if let Some(mut tee) = self.tee.take() {
            tee.flush()?;
        }
        self.source = None;
        Ok(())
    }
}
