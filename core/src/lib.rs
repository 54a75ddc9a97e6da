//! Deterministic, named random-number streams for Monte Carlo simulations.
//!
//! Each stream is addressed by a (realization, entity type, purpose) key
//! and always replays the same sequence, independent of generation order,
//! call count or process restarts. Streams can be recorded to and replayed
//! from flat binary files, and a subset of particles can be filtered out of
//! a batch without perturbing the underlying stream.

pub mod catalog;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod exim;
pub mod filter;
pub mod pool;
pub mod seed;
pub mod types;

pub use catalog::{EntitySet, ParticleCatalog};
pub use distribution::Distribution;
pub use engine::NamedPrng;
pub use error::{PrngError, PrngResult};
pub use exim::{dump_all, SourceReader, TeeWriter};
pub use filter::{FilterStrategy, IdFilter};
pub use pool::{BitEngine, EngineKey, EnginePool};
pub use seed::SeedLogic;
pub use types::{EntityId, OrderIndex, Realization};
