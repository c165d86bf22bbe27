//! The lock-free, symmetry-folded hash set: the core concurrent data structure the
//! BFS driver inserts successors into and, once a layer is closed, iterates.
//!
//! Each 64-bit slot holds a folded key's upper 58 bits (`key58`) plus a 6-bit bitset
//! recording which of the six low-triple permutations are present; up to six distinct
//! canonical boards can therefore share one slot. Zero marks an empty slot — safe
//! because an occupied slot always has at least one of its top six bits set.

use crate::board::Board;
use crate::fold::{fold, unfold};
use crate::hash::hash_key;
use crate::vm::Region;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

const POSITION_BITS: u32 = 58;
const KEY_MASK: u64 = (1u64 << POSITION_BITS) - 1;

#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    NewlyInserted,
    AlreadyPresent,
}

/// A concurrent set of canonical boards, all sharing a fixed tile sum, stored in
/// folded form. See the module docs for the slot layout.
pub struct FoldedSet {
    tile_sum: u32,
    region: Region,
}

impl FoldedSet {
    pub fn new(tile_sum: u32, initial_capacity: usize) -> Result<FoldedSet, crate::error::Error> {
        Ok(FoldedSet {
            tile_sum,
            region: Region::new(initial_capacity.max(1))?,
        })
    }

    pub fn tile_sum(&self) -> u32 {
        self.tile_sum
    }

    pub fn capacity(&self) -> usize {
        self.region.len_words()
    }

    fn slots(&self) -> &[AtomicU64] {
        self.region.as_atomic_slice()
    }

    /// Inserts a canonical board with this set's tile sum. Safe to call concurrently
    /// with other inserts; must not be called concurrently with `iterate`,
    /// `parallel_count`, or `gorge`.
    pub fn insert(&self, b: Board) -> InsertOutcome {
        debug_assert!(b.is_canonical(), "insert requires a canonical board");
        debug_assert_eq!(b.tile_sum(), self.tile_sum, "insert requires matching tile sum");

        let folded = fold(b);
        let slots = self.slots();
        let capacity = slots.len() as u64;
        let bit = 1u64 << (POSITION_BITS + folded.rank as u32);

        'retry: loop {
            let mut index = (hash_key(folded.key58) % capacity) as usize;
            loop {
                let current = slots[index].load(Ordering::SeqCst);

                if current == 0 {
                    match slots[index].compare_exchange(
                        0,
                        bit | folded.key58,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    ) {
                        Ok(_) => return InsertOutcome::NewlyInserted,
                        Err(_) => continue 'retry,
                    }
                }

                if current & KEY_MASK == folded.key58 {
                    if current & bit != 0 {
                        return InsertOutcome::AlreadyPresent;
                    }
                    match slots[index].compare_exchange(
                        current,
                        current | bit,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    ) {
                        Ok(_) => return InsertOutcome::NewlyInserted,
                        Err(_) => continue 'retry,
                    }
                }

                index = (index + 1) % capacity as usize;
            }
        }
    }

    /// Read-only membership test, usable concurrently with other `contains` calls and
    /// with `insert`, but not with `gorge` (post-compaction slot order no longer
    /// satisfies the probing invariant, so lookups are only meaningful beforehand).
    pub fn contains(&self, b: Board) -> bool {
        let folded = fold(b);
        let slots = self.slots();
        let capacity = slots.len() as u64;
        let bit = 1u64 << (POSITION_BITS + folded.rank as u32);
        let mut index = (hash_key(folded.key58) % capacity) as usize;

        loop {
            let current = slots[index].load(Ordering::SeqCst);
            if current == 0 {
                return false;
            }
            if current & KEY_MASK == folded.key58 {
                return current & bit != 0;
            }
            index = (index + 1) % capacity as usize;
        }
    }

    /// Number of canonical boards stored, summed in parallel across slots.
    pub fn parallel_count(&self) -> usize {
        self.slots()
            .par_iter()
            .map(|w| (w.load(Ordering::SeqCst) >> POSITION_BITS).count_ones() as usize)
            .sum()
    }

    /// Reconstructs and returns every stored canonical board, in parallel across
    /// slots. Each occupied slot's permutation bitset yields one board per set bit.
    pub fn iterate(&self) -> Vec<Board> {
        self.slots()
            .par_iter()
            .flat_map_iter(|w| {
                let word = w.load(Ordering::SeqCst);
                let tile_sum = self.tile_sum;
                SlotBoards::new(word, tile_sum)
            })
            .collect()
    }

    /// Removes every empty slot, shrinking the backing region to the occupied count.
    /// Not safe to call concurrently with `insert`/`contains`/`iterate`/`parallel_count`
    /// — this is the BFS driver's exclusive compaction phase.
    pub fn gorge(&mut self) -> Result<(), crate::error::Error> {
        let old_capacity = self.region.len_words();
        let slots = self.region.as_slice();

        let num_threads = rayon::current_num_threads().max(1);
        let chunk = (old_capacity / num_threads).max(1);

        let mut bounds = Vec::new();
        let mut start = 0;
        while start < old_capacity {
            bounds.push((start, (start + chunk).min(old_capacity)));
            start += chunk;
        }

        // Each worker compacts its own range's non-zero words into a local buffer,
        // preserving relative order; ranges are already in start-index order because
        // `bounds` is, so concatenating them in this order concatenates the whole
        // set in a well-defined (if otherwise meaningless) order.
        let mut per_range: Vec<(usize, Vec<u64>)> = bounds
            .into_par_iter()
            .map(|(lo, hi)| {
                let compacted: Vec<u64> = slots[lo..hi].iter().copied().filter(|&w| w != 0).collect();
                (lo, compacted)
            })
            .collect();
        per_range.sort_by_key(|&(lo, _)| lo);

        let new_data: Vec<u64> = per_range.into_iter().flat_map(|(_, v)| v).collect();
        let new_capacity = new_data.len().max(1);

        self.region.remap(new_capacity)?;
        let atomics = self.region.as_atomic_slice();
        for (i, word) in new_data.iter().enumerate() {
            atomics[i].store(*word, Ordering::SeqCst);
        }
        for slot in atomics.iter().skip(new_data.len()) {
            slot.store(0, Ordering::SeqCst);
        }

        Ok(())
    }
}

struct SlotBoards {
    recovered_key: u64,
    remaining_bits: u64,
    tile_sum: u32,
}

impl SlotBoards {
    fn new(word: u64, tile_sum: u32) -> SlotBoards {
        if word == 0 {
            return SlotBoards {
                recovered_key: 0,
                remaining_bits: 0,
                tile_sum,
            };
        }
        SlotBoards {
            recovered_key: word & KEY_MASK,
            remaining_bits: word >> POSITION_BITS,
            tile_sum,
        }
    }
}

impl Iterator for SlotBoards {
    type Item = Board;

    fn next(&mut self) -> Option<Board> {
        if self.remaining_bits == 0 {
            return None;
        }
        let rank = self.remaining_bits.trailing_zeros() as u8;
        self.remaining_bits &= self.remaining_bits - 1;

        let sorted_upper = Board(self.recovered_key << 4);
        let upper_sum: u32 = (1..16).map(|i| crate::board::repr_to_tile(sorted_upper.get_tile(i))).sum();
        let recovered_tile_value = self.tile_sum - upper_sum;
        let low_nibble = if recovered_tile_value == 0 {
            0
        } else {
            debug_assert!(recovered_tile_value.is_power_of_two());
            recovered_tile_value.trailing_zeros() as u8
        };

        Some(unfold(self.recovered_key, rank, low_nibble))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_board(tile_sum_cells: &[(usize, u8)]) -> Board {
        let mut b = Board::EMPTY;
        for &(i, v) in tile_sum_cells {
            b = b.set_tile(i, v);
        }
        b.canonical_form()
    }

    #[test]
    fn insert_then_contains() {
        let set = FoldedSet::new(4, 64).unwrap();
        let b = small_board(&[(0, 1), (1, 1)]);
        assert_eq!(set.insert(b), InsertOutcome::NewlyInserted);
        assert!(set.contains(b));
    }

    #[test]
    fn insert_is_idempotent() {
        let set = FoldedSet::new(4, 64).unwrap();
        let b = small_board(&[(0, 1), (1, 1)]);
        assert_eq!(set.insert(b), InsertOutcome::NewlyInserted);
        assert_eq!(set.insert(b), InsertOutcome::AlreadyPresent);
        assert_eq!(set.parallel_count(), 1);
    }

    #[test]
    fn iterate_recovers_inserted_boards() {
        let set = FoldedSet::new(6, 128).unwrap();
        let mut expected = std::collections::HashSet::new();
        for b in [
            small_board(&[(0, 1), (1, 2)]),
            small_board(&[(0, 2), (5, 1)]),
        ] {
            set.insert(b);
            expected.insert(b.0);
        }

        let found: std::collections::HashSet<u64> = set.iterate().into_iter().map(|b| b.0).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn gorge_preserves_contents() {
        let mut set = FoldedSet::new(6, 4096).unwrap();
        let mut expected = std::collections::HashSet::new();
        for b in [
            small_board(&[(0, 1), (1, 2)]),
            small_board(&[(0, 2), (5, 1)]),
            small_board(&[(2, 2), (9, 1)]),
        ] {
            set.insert(b);
            expected.insert(b.0);
        }

        set.gorge().unwrap();
        assert_eq!(set.capacity(), expected.len());

        let found: std::collections::HashSet<u64> = set.iterate().into_iter().map(|b| b.0).collect();
        assert_eq!(found, expected);
    }
}
