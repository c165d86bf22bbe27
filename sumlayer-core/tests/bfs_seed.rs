use std::collections::HashSet;
use sumlayer_core::driver::starting_positions;

#[test]
fn starting_positions_are_canonical_deduplicated_and_correctly_summed() {
    let positions = starting_positions();

    let mut seen = HashSet::new();
    for b in &positions {
        assert!(b.is_canonical(), "seed position not canonical: {b:?}");
        assert!(matches!(b.tile_sum(), 4 | 6 | 8));
        assert!(seen.insert(b.0), "duplicate canonical seed position");
    }

    // Every two-tile start is a placement of two values in {2, 4} across two of the 16
    // cells; canonicalisation can only ever merge these 16*15/2*4 = 480 raw placements
    // down, never produce more.
    assert!(positions.len() <= 480);
    assert!(!positions.is_empty());
}

#[test]
fn each_tile_sum_bucket_is_nonempty() {
    let positions = starting_positions();
    for target in [4u32, 6, 8] {
        assert!(positions.iter().any(|b| b.tile_sum() == target));
    }
}
