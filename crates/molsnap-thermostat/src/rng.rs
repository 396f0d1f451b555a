//! Random number sources for stochastic thermostats.
//!
//! A [`RngSource::Counter`] source is ChaCha8: its seed, stream and word
//! position are readable and settable, so its state can be captured
//! exactly and a restored run continues with the same draws.
//! [`RngSource::Entropy`] is seeded from the OS and exposes nothing.
//!
//! # Exported layout
//!
//! `[seed0, seed1, seed2, seed3, stream, word_pos_hi, word_pos_lo]`,
//! where the seed words are the 32 seed bytes read as little-endian u64.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of words in an exported counter state.
pub const STATE_WORDS: usize = 7;

/// Generator backing a thermostat.
#[derive(Debug, Clone)]
pub enum RngSource {
    Counter(ChaCha8Rng),
    Entropy(StdRng),
}

impl RngSource {
    /// Reproducible source from a 64-bit seed.
    pub fn seeded(seed: u64) -> Self {
        Self::Counter(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Opaque source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::Entropy(StdRng::from_entropy())
    }

    /// Returns true if [`state`](Self::state) captures the generator exactly.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Counter(_))
    }

    /// Exact generator state, or `None` for an opaque source.
    pub fn state(&self) -> Option<Vec<u64>> {
        let Self::Counter(rng) = self else {
            return None;
        };
        let seed = rng.get_seed();
        let mut words: Vec<u64> = seed
            .chunks_exact(8)
            .map(|chunk| {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(chunk);
                u64::from_le_bytes(bytes)
            })
            .collect();
        let pos = rng.get_word_pos();
        words.push(rng.get_stream());
        words.push((pos >> 64) as u64);
        words.push(pos as u64);
        Some(words)
    }

    /// Rebuilds a counter source from [`state`](Self::state) output.
    pub fn from_state(words: &[u64]) -> Result<Self, String> {
        if words.len() != STATE_WORDS {
            return Err(format!(
                "expected {STATE_WORDS} state words, got {}",
                words.len()
            ));
        }
        let mut seed = [0u8; 32];
        for (chunk, word) in seed.chunks_exact_mut(8).zip(&words[..4]) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        let mut rng = ChaCha8Rng::from_seed(seed);
        rng.set_stream(words[4]);
        rng.set_word_pos(((words[5] as u128) << 64) | words[6] as u128);
        Ok(Self::Counter(rng))
    }
}

impl RngCore for RngSource {
    fn next_u32(&mut self) -> u32 {
        match self {
            Self::Counter(rng) => rng.next_u32(),
            Self::Entropy(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            Self::Counter(rng) => rng.next_u64(),
            Self::Entropy(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            Self::Counter(rng) => rng.fill_bytes(dest),
            Self::Entropy(rng) => rng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        match self {
            Self::Counter(rng) => rng.try_fill_bytes(dest),
            Self::Entropy(rng) => rng.try_fill_bytes(dest),
        }
    }
}
