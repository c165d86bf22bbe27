use std::collections::HashSet;
use sumlayer_core::board::Board;
use sumlayer_core::set::{FoldedSet, InsertOutcome};

fn board_from_cells(cells: [u8; 16]) -> Board {
    let mut b = Board::EMPTY;
    for (i, &v) in cells.iter().enumerate() {
        b = b.set_tile(i, v);
    }
    b.canonical_form()
}

/// All canonical boards at tile sum 10 reachable from a handful of low-cardinality
/// tile placements (3 tiles summing to 10, or equivalent), enumerated by hand instead
/// of via BFS, as a small closed universe to round-trip through the set.
fn small_layer_10() -> Vec<Board> {
    let mut boards = HashSet::new();
    // 2 + 4 + 4 = 10, three tiles across distinct cells.
    for i in 0..16usize {
        for j in 0..16usize {
            for k in 0..16usize {
                if i == j || j == k || i == k {
                    continue;
                }
                let b = Board::EMPTY
                    .set_tile(i, 1)
                    .set_tile(j, 2)
                    .set_tile(k, 2)
                    .canonical_form();
                boards.insert(b.0);
            }
        }
    }
    boards.into_iter().map(Board).collect()
}

#[test]
fn insert_contains_and_count_agree_across_a_small_layer() {
    let layer = small_layer_10();
    let set = FoldedSet::new(10, (layer.len() * 4).max(64)).unwrap();

    for &b in &layer {
        assert_eq!(set.insert(b), InsertOutcome::NewlyInserted);
    }
    for &b in &layer {
        assert_eq!(set.insert(b), InsertOutcome::AlreadyPresent);
    }
    for &b in &layer {
        assert!(set.contains(b));
    }
    assert_eq!(set.parallel_count(), layer.len());
}

#[test]
fn iterate_reconstructs_exactly_the_inserted_multiset() {
    let layer = small_layer_10();
    let set = FoldedSet::new(10, (layer.len() * 4).max(64)).unwrap();
    for &b in &layer {
        set.insert(b);
    }

    let expected: HashSet<u64> = layer.iter().map(|b| b.0).collect();
    let found: HashSet<u64> = set.iterate().into_iter().map(|b| b.0).collect();
    assert_eq!(found, expected);
}

#[test]
fn gorge_shrinks_capacity_to_occupancy_and_preserves_contents() {
    let layer = small_layer_10();
    let mut set = FoldedSet::new(10, layer.len() * 16).unwrap();
    for &b in &layer {
        set.insert(b);
    }

    let expected: HashSet<u64> = layer.iter().map(|b| b.0).collect();
    set.gorge().unwrap();
    assert_eq!(set.capacity(), expected.len());

    let found: HashSet<u64> = set.iterate().into_iter().map(|b| b.0).collect();
    assert_eq!(found, expected);
}

#[test]
fn six_permutations_of_a_low_triple_share_one_slot() {
    // Six boards differing only by a permutation of the three lowest-index tiles all
    // fold to the same key58; the folded set must still report each as present
    // individually without growing beyond one slot's worth of storage for them.
    let mut boards = HashSet::new();
    let perms = [
        [0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0],
    ];
    let values = [3u8, 1, 2];
    for p in perms {
        let mut b = Board::EMPTY;
        for (slot, &src) in p.iter().enumerate() {
            b = b.set_tile(slot, values[src]);
        }
        boards.insert(b.canonical_form().0);
    }

    let set = FoldedSet::new(Board(*boards.iter().next().unwrap()).tile_sum(), 64).unwrap();
    for &raw in &boards {
        set.insert(Board(raw));
    }
    assert_eq!(set.parallel_count(), boards.len());
}
