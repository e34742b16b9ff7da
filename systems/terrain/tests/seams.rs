use proptest::prelude::*;
use strata_core::{BlockId, TileCoord};
use strata_system_terrain::{TerrainField, TerrainParams};

fn field(seed: u32) -> TerrainField {
    TerrainField::new(seed, TerrainParams::default())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn split_generation_matches_single_call(
        seed in any::<u32>(),
        offset in -20_000i64..20_000,
        first in 1u32..48,
        second in 1u32..48,
        height in 8u32..48,
    ) {
        let field = field(seed);
        let whole = field.generate(offset, first + second, height);

        let mut stitched = field.generate(offset, first, height);
        stitched
            .append_right(&field.generate(offset + i64::from(first), second, height))
            .expect("slices share a height");
        prop_assert_eq!(&stitched, &whole);

        let mut prepended = field.generate(offset + i64::from(first), second, height);
        prepended
            .prepend_left(&field.generate(offset, first, height))
            .expect("slices share a height");
        prop_assert_eq!(&prepended, &whole);
    }

    #[test]
    fn regeneration_is_byte_identical(
        seed in any::<u32>(),
        offset in -20_000i64..20_000,
        width in 1u32..64,
        height in 2u32..48,
    ) {
        let field = field(seed);
        prop_assert_eq!(
            field.generate(offset, width, height),
            field.generate(offset, width, height)
        );
    }

    #[test]
    fn last_row_is_always_stone(
        seed in any::<u32>(),
        offset in -20_000i64..20_000,
        width in 1u32..64,
        height in 2u32..48,
    ) {
        let grid = field(seed).generate(offset, width, height);
        let view = grid.view();
        for column in 0..width as i32 {
            prop_assert_eq!(
                view.block(TileCoord::new(column, height as i32 - 1)),
                Some(BlockId::Stone)
            );
        }
    }
}

#[test]
fn different_seeds_produce_different_worlds() {
    let a = field(1).generate(0, 256, 40);
    let b = field(2).generate(0, 256, 40);
    assert_ne!(a, b);
}

#[test]
fn surface_rows_stay_above_the_bedrock_row() {
    let field = field(404);
    for height in [2u32, 3, 12, 40] {
        for x in -300..300 {
            let profile = field.profile(x, height);
            assert!(profile.surface_row + 2 <= height, "column {x} at height {height}");
        }
    }
}
