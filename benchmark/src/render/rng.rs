//! Deterministic random stream shared by every draw in a test case

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp1, Poisson, StandardNormal};

use crate::error::RenderError;

/// Seeded random stream.
///
/// The generator state is the only state: two streams built from the same
/// seed and asked for the same sequence of draws return identical values.
/// Rendering passes one stream through every band and source of a case, so
/// draw order matters.
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: ChaCha8Rng,
}

impl RandomStream {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Stream for the `case_index`-th test case of a batch
    pub fn for_case(base_seed: u64, case_index: usize) -> Self {
        Self::from_seed(base_seed.wrapping_add(case_index as u64))
    }

    /// Uniform draw in [0, 1)
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    pub fn standard_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }

    /// Gamma draw with integer shape `k` and unit scale, as a sum of `k`
    /// unit exponentials
    pub fn gamma_integer(&mut self, k: u32) -> f64 {
        (0..k)
            .map(|_| -> f64 { Exp1.sample(&mut self.rng) })
            .sum()
    }

    /// Poisson draw with the given mean; a zero mean always yields zero
    pub fn poisson(&mut self, mean: f64) -> Result<u64, RenderError> {
        if mean == 0.0 {
            return Ok(0);
        }
        if !(mean.is_finite() && mean > 0.0) {
            return Err(RenderError::InvalidPhotonMean(mean));
        }
        let poisson = Poisson::new(mean).map_err(|_| RenderError::InvalidPhotonMean(mean))?;
        let count: f64 = poisson.sample(&mut self.rng);
        Ok(count as u64)
    }
}

impl RngCore for RandomStream {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}
