use atlaspack_core::config::Heuristic;
use atlaspack_core::model::Rect;
use atlaspack_core::packer::maxrects::MaxRectsBin;

/// 10x10 bin with a 3x3 block in the top-left corner.
/// Free list: A = (0,3,10,7) bottom band, B = (3,0,7,10) right column.
fn corner_bin() -> MaxRectsBin {
    let mut bin = MaxRectsBin::new(10, 10, false);
    bin.commit(Rect::new(0, 0, 3, 3)).expect("commit");
    assert_eq!(
        bin.free_rects(),
        &[Rect::new(0, 3, 10, 7), Rect::new(3, 0, 7, 10)]
    );
    bin
}

#[test]
fn best_short_side_fit() {
    let s = corner_bin().score(7, 2, Heuristic::BestShortSideFit);
    // A: leftovers (3, 5); B: leftovers (0, 8) -> short side 0 wins
    assert_eq!(s.rect, Rect::new(3, 0, 7, 2));
    assert_eq!((s.score1, s.score2), (0, 8));
}

#[test]
fn best_long_side_fit() {
    let s = corner_bin().score(7, 2, Heuristic::BestLongSideFit);
    // A: long side 5 beats B: long side 8
    assert_eq!(s.rect, Rect::new(0, 3, 7, 2));
    assert_eq!((s.score1, s.score2), (5, 3));
}

#[test]
fn best_area_fit_breaks_ties_by_short_side() {
    let s = corner_bin().score(7, 2, Heuristic::BestAreaFit);
    // both free rects leave 56 px; B has the shorter leftover side
    assert_eq!(s.rect, Rect::new(3, 0, 7, 2));
    assert_eq!((s.score1, s.score2), (56, 0));
}

#[test]
fn bottom_left_minimizes_top_edge_then_x() {
    let s = corner_bin().score(7, 2, Heuristic::BottomLeft);
    assert_eq!(s.rect, Rect::new(3, 0, 7, 2));
    assert_eq!((s.score1, s.score2), (2, 3));

    // equal top edges fall back to the smaller x
    let mut bin = MaxRectsBin::new(10, 10, false);
    bin.commit(Rect::new(4, 0, 2, 10)).expect("commit");
    let s = bin.score(3, 3, Heuristic::BottomLeft);
    assert_eq!(s.rect, Rect::new(0, 0, 3, 3));
    assert_eq!((s.score1, s.score2), (3, 0));
}

#[test]
fn contact_point_is_negated_contact_length() {
    let bin = corner_bin();
    // B at (3,0): right bin edge 2 + top bin edge 7 + 2 along the placed block
    assert_eq!(bin.contact_point_score(3, 0, 7, 2), 11);
    // A at (0,3): left bin edge 2 + 3 along the placed block's bottom
    assert_eq!(bin.contact_point_score(0, 3, 7, 2), 5);
    let s = bin.score(7, 2, Heuristic::ContactPoint);
    assert_eq!(s.rect, Rect::new(3, 0, 7, 2));
    assert_eq!((s.score1, s.score2), (-11, 0));
}

#[test]
fn contact_point_ties_keep_first_free_rect() {
    let bin = corner_bin();
    // both candidates touch 6 px: A scores the left edge + block bottom,
    // B scores the top edge + block right side
    assert_eq!(bin.contact_point_score(0, 3, 3, 3), 6);
    assert_eq!(bin.contact_point_score(3, 0, 3, 3), 6);
    let s = bin.score(3, 3, Heuristic::ContactPoint);
    assert_eq!(s.rect, Rect::new(0, 3, 3, 3));
    assert_eq!(s.score1, -6);
}

#[test]
fn contact_point_counts_each_bin_axis_once() {
    let bin = MaxRectsBin::new(10, 10, false);
    // touches left and right edges: height counted once; top edge: width once
    assert_eq!(bin.contact_point_score(0, 0, 10, 3), 13);
}

#[test]
fn heuristic_parsing_and_names() {
    for h in Heuristic::ALL {
        let parsed: Heuristic = h.short_name().parse().expect("short name parses");
        assert_eq!(parsed, h);
        assert_eq!(h.to_string(), h.short_name());
    }
    assert_eq!(
        "BestAreaFit".parse::<Heuristic>().expect("long name"),
        Heuristic::BestAreaFit
    );
    assert!("guillotine".parse::<Heuristic>().is_err());
    assert_eq!(Heuristic::default(), Heuristic::BestShortSideFit);
}

#[test]
fn best_area_fit_handles_areas_beyond_i64() {
    let (w, h) = (u32::MAX, u32::MAX);
    let mut bin = MaxRectsBin::new(w, h, false);
    bin.commit(Rect::new(2, 0, 1, 1)).expect("commit");
    assert_eq!(
        bin.free_rects(),
        &[
            Rect::new(0, 1, w, h - 1),
            Rect::new(0, 0, 2, h),
            Rect::new(3, 0, w - 3, h),
        ]
    );
    // the 2-wide column leaves 2h - 2 px; both wide rects leave ~1.8e19
    let s = bin.score(2, 1, Heuristic::BestAreaFit);
    assert_eq!(s.rect, Rect::new(0, 0, 2, 1));
    assert_eq!(s.score1, 2 * i128::from(h) - 2);
    assert_eq!(s.score2, 0);
}
