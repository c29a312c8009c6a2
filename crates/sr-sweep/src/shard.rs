//! Deterministic hash sharding.
//!
//! A [`ShardFilter`] assigns every configuration to exactly one of
//! `num_chunks` shards from its content alone, so independent launches can
//! each take a consistent, non-overlapping slice of the same sweep without
//! talking to each other.

use sha2::{Digest, Sha256};
use sr_types::{ConcreteConfig, SweepError, SweepResult};

/// Content-hash shard predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardFilter {
    chunk_id: u64,
    num_chunks: u64,
}

impl ShardFilter {
    /// `num_chunks` must be positive and `chunk_id` in `[0, num_chunks)`.
    pub fn new(chunk_id: usize, num_chunks: usize) -> SweepResult<Self> {
        if num_chunks == 0 || chunk_id >= num_chunks {
            return Err(SweepError::InvalidShard {
                chunk_id,
                num_chunks,
            });
        }
        Ok(Self {
            chunk_id: chunk_id as u64,
            num_chunks: num_chunks as u64,
        })
    }

    /// Whether `config` belongs to this shard.
    ///
    /// SHA-256 over the canonical encoding, first 8 digest bytes as a
    /// big-endian integer, reduced modulo `num_chunks`. Stable across
    /// processes, platforms, and languages.
    pub fn accepts(&self, config: &ConcreteConfig) -> bool {
        let digest = Sha256::digest(config.canonical_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix) % self.num_chunks == self.chunk_id
    }

    pub fn chunk_id(&self) -> usize {
        self.chunk_id as usize
    }

    pub fn num_chunks(&self) -> usize {
        self.num_chunks as usize
    }
}
