//! Keyed hashing of folded board keys for slot indexing.
//!
//! The reference implementation ran three AES-NI round transforms with a fixed 128-bit
//! key over the board bits. That is a CPU-specific trick for a well-mixing keyed hash;
//! `xxh3_64_with_seed` gives the same property (deterministic, strongly-mixing, seeded
//! so it isn't just the identity on low-entropy inputs) without depending on AES-NI
//! being available.
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Arbitrary fixed seed; any constant works as long as it's stable across runs, since
/// slot placement only needs to be deterministic within a run, not secret.
const SEED: u64 = 0x427a_139d_fe5c_8821;

pub fn hash_key(key58: u64) -> u64 {
    xxh3_64_with_seed(&key58.to_le_bytes(), SEED)
}
