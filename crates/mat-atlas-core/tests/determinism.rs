use mat_atlas_core::prelude::*;
use rand::{Rng, SeedableRng};

fn mixed_items(seed: u64) -> Vec<PackItem<String>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..120)
        .map(|i| {
            PackItem::new(
                format!("t{}", i),
                rng.gen_range(4..=64),
                rng.gen_range(4..=64),
            )
        })
        .collect()
}

fn frames(layout: &Layout) -> Vec<Rect> {
    layout.placements.iter().map(|p| p.frame).collect()
}

#[test]
fn tree_packer_is_deterministic_for_identical_input() {
    let items = mixed_items(42);
    let a = GrowingTreePacker.pack(&items).expect("pack");
    let b = GrowingTreePacker.pack(&items).expect("pack");
    assert_eq!((a.width, a.height), (b.width, b.height));
    assert_eq!(frames(&a), frames(&b));
}

#[test]
fn row_packer_is_deterministic_for_identical_input() {
    let items = mixed_items(42);
    let a = AlignmentRowPacker.pack(&items).expect("pack");
    let b = AlignmentRowPacker.pack(&items).expect("pack");
    assert_eq!((a.width, a.height), (b.width, b.height));
    assert_eq!(frames(&a), frames(&b));
}

#[test]
fn strategies_are_swappable_behind_the_trait() {
    let items = mixed_items(7);
    for strategy in [PackStrategy::GrowingTree, PackStrategy::AlignmentRows] {
        let packer = packer_for::<String>(&strategy);
        let layout = packer.pack(&items).expect("pack");
        assert_eq!(layout.placements.len(), items.len());
    }
}
