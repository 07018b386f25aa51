//! Counter-based deterministic randomness.
//!
//! Every random draw is a pure function of (run seed, individual id, variant,
//! stage index, channel). Nothing is carried between draws, so results do not
//! depend on evaluation order or on how trajectories are spread over workers.

use funnel_types::ArrivalVariant;

/// Named draw within one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedChannel {
    /// Bounded noise added to the decision advantage.
    Variance,
    /// Uniform draw compared against the continuation probability.
    Sample,
}

impl SeedChannel {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Variance => "variance",
            Self::Sample => "sample",
        }
    }
}

/// Key identifying one stage of one trajectory.
#[derive(Clone, Copy, Debug)]
pub struct SeedKey<'a> {
    pub run_seed: u64,
    pub individual_id: &'a str,
    pub variant: ArrivalVariant,
    pub stage_index: usize,
}

impl<'a> SeedKey<'a> {
    pub fn new(
        run_seed: u64,
        individual_id: &'a str,
        variant: ArrivalVariant,
        stage_index: usize,
    ) -> Self {
        Self {
            run_seed,
            individual_id,
            variant,
            stage_index,
        }
    }

    /// Raw 64-bit value for a channel.
    pub fn stream(&self, channel: SeedChannel) -> u64 {
        let mut seed = self.run_seed;
        seed = mix64(seed ^ hash_bytes(self.individual_id.as_bytes()));
        seed = mix64(seed ^ hash_bytes(self.variant.id().as_bytes()));
        seed = mix64(seed ^ self.stage_index as u64);
        mix64(seed ^ hash_bytes(channel.as_str().as_bytes()))
    }

    /// Uniform draw in `[0, 1)` for a channel.
    pub fn unit(&self, channel: SeedChannel) -> f64 {
        (self.stream(channel) >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn hash_bytes(input: &[u8]) -> u64 {
    // FNV-1a 64-bit
    let mut hash = 0xcbf29ce484222325_u64;
    for byte in input {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}
