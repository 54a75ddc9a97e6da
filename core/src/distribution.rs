//! Distribution kinds a stream can be drawn from.

use crate::error::{PrngError, PrngResult};
use rand::Rng;
use rand_distr::{Distribution as Sample, Normal};

/// Closed set of supported draw kinds. Each variant carries its own
/// parameters; sampling an unimplemented variant is an explicit error,
/// never a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// Uniform on [0, 1).
    Uniform,
    /// Normal with the given mean and standard deviation.
    Normal { mean: f64, std: f64 },
    /// Student's t. Declared for forward compatibility, not implemented.
    StudentT { dof: f64 },
}

impl Distribution {
    /// Normal with mean 0 and std 1.
    pub fn standard_normal() -> Self {
        Distribution::Normal { mean: 0.0, std: 1.0 }
    }

    /// Draw `amount` values, advancing `rng` by exactly `amount` draws.
    pub fn sample_row<R: Rng>(&self, rng: &mut R, amount: usize) -> PrngResult<Vec<f64>> {
        match *self {
            Distribution::Uniform => Ok((0..amount).map(|_| rng.gen::<f64>()).collect()),
            Distribution::Normal { mean, std } => {
                let normal = Normal::new(mean, std)
                    .map_err(|_| PrngError::BadNormalParams { mean, std })?;
                Ok((0..amount).map(|_| normal.sample(rng)).collect())
            }
            Distribution::StudentT { .. } => Err(PrngError::Unsupported(*self)),
        }
    }
}
