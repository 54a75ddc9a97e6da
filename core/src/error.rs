use crate::distribution::Distribution;
use crate::types::Realization;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrngError {
    #[error(
        "seed capacity exceeded: {types} entity types and {purposes} purposes \
         do not fit n_ptl={n_ptl}, n_max={n_max}"
    )]
    SeedCapacity {
        types: usize,
        purposes: usize,
        n_ptl: u64,
        n_max: u64,
    },

    #[error("entity type '{ptype}': order indices must be unique and cover 0..{expected}")]
    MalformedCatalog { ptype: String, expected: usize },

    #[error("unknown entity type '{0}'")]
    UnknownEntityType(String),

    #[error("unknown purpose '{0}'")]
    UnknownPurpose(String),

    #[error("unknown entity id '{id}' in type '{ptype}'")]
    UnknownEntityId { ptype: String, id: String },

    #[error("entity type '{0}' is counted; id filtering needs named entities")]
    UnfilterableEntityType(String),

    #[error("engine not initialized for realization {realization}, type '{ptype}', purpose '{purpose}'")]
    EngineNotInitialized {
        realization: Realization,
        ptype: String,
        purpose: String,
    },

    #[error(
        "expected exactly one initialized realization for type '{ptype}', \
         purpose '{purpose}', found {active}; pass the realization explicitly"
    )]
    AmbiguousRealization {
        ptype: String,
        purpose: String,
        active: usize,
    },

    #[error("distribution {0:?} is not implemented")]
    Unsupported(Distribution),

    #[error("normal distribution rejected parameters mean={mean}, std={std}")]
    BadNormalParams { mean: f64, std: f64 },

    #[error("source stream exhausted while reading {requested} values")]
    SourceExhausted { requested: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PrngResult<T> = Result<T, PrngError>;
