use atlaspack_core::config::Heuristic;
use atlaspack_core::model::{Item, Rect};
use atlaspack_core::packer::greedy::GreedyFiller;
use atlaspack_core::packer::maxrects::MaxRectsBin;
use rand::{Rng, SeedableRng};

fn random_items(seed: u64, n: usize) -> Vec<Item> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| Item::new(format!("r{i}"), rng.gen_range(4..=64), rng.gen_range(4..=64)))
        .collect()
}

fn fill_one_page(items: &[Item], heuristic: Heuristic) -> Vec<(String, Rect)> {
    let mut bin = MaxRectsBin::new(512, 512, true);
    let filler = GreedyFiller::new(heuristic);
    let mut pending = items.to_vec();
    let mut out = Vec::new();
    while let Some((idx, rect)) = filler.next_placement(&bin, &pending) {
        bin.commit(rect).expect("commit");
        out.push((pending.remove(idx).id, rect));
    }
    out
}

#[test]
fn greedy_fill_is_repeatable() {
    let items = random_items(42, 120);
    for heuristic in Heuristic::ALL {
        let a = fill_one_page(&items, heuristic);
        let b = fill_one_page(&items, heuristic);
        assert!(!a.is_empty());
        assert_eq!(a, b, "{heuristic} is not deterministic");
    }
}

#[test]
fn greedy_filler_reports_exhaustion() {
    let bin = MaxRectsBin::new(8, 8, false);
    let filler = GreedyFiller::new(Heuristic::BestShortSideFit);
    let pending = vec![Item::new("wide", 9, 1), Item::new("tall", 1, 9)];
    assert_eq!(filler.next_placement(&bin, &pending), None);
    assert_eq!(filler.next_placement(&bin, &[]), None);
}

#[test]
fn greedy_filler_picks_lowest_score_pair() {
    let bin = MaxRectsBin::new(10, 10, false);
    let filler = GreedyFiller::new(Heuristic::BestShortSideFit);
    let pending = vec![
        Item::new("loose", 2, 2),
        Item::new("snug", 9, 10),
        Item::new("exact", 10, 10),
    ];
    // snug scores (0, 1), exact scores (0, 0)
    assert_eq!(
        filler.next_placement(&bin, &pending),
        Some((2, Rect::new(0, 0, 10, 10)))
    );
}
