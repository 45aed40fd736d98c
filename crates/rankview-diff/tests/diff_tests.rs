use rankview_core::types::{ResultItem, ResultKind, ResultSet};
use rankview_diff::{diff, rank_deltas, RankChange};

fn set(kind: ResultKind, ids: &[&str]) -> ResultSet {
    ResultSet::new(kind, ids.iter().map(|id| ResultItem::new(*id, format!("item {id}"))).collect())
}

fn pair(base: &[&str], ai: &[&str]) -> (ResultSet, ResultSet) {
    (set(ResultKind::Baseline, base), set(ResultKind::Enhanced, ai))
}

#[test]
fn swap_and_replace_scenario() {
    let (b, e) = pair(&["A", "B", "C"], &["B", "A", "D"]);
    let s = diff(&b, &e);
    assert_eq!(s.improved_rank_count, 1, "only B moved up");
    assert_eq!(s.total_product_count, 3);
    assert_eq!(s.new_product_count, 1);
    assert_eq!(s.removed_product_count, 1);
    assert_eq!(s.average_rank_improvement, 1.0);
}

#[test]
fn identical_lists_have_no_improvement() {
    for ids in [&[][..], &["A"][..], &["A", "B", "C", "D"][..]] {
        let (b, e) = pair(ids, ids);
        let s = diff(&b, &e);
        assert_eq!(s.improved_rank_count, 0);
        assert_eq!(s.average_rank_improvement, 0.0);
        assert_eq!(s.new_product_count, 0);
        assert_eq!(s.removed_product_count, 0);
        assert_eq!(s.total_product_count, ids.len());
    }
}

#[test]
fn declines_are_not_penalized() {
    // C jumps two places, A and B each drop one.
    let (b, e) = pair(&["A", "B", "C"], &["C", "A", "B"]);
    let s = diff(&b, &e);
    assert_eq!(s.improved_rank_count, 1);
    assert_eq!(s.average_rank_improvement, 2.0);
}

#[test]
fn average_is_mean_over_improved_items_only() {
    let (b, e) = pair(&["A", "B", "C", "D", "E"], &["E", "D", "A", "B", "C"]);
    let s = diff(&b, &e);
    // E: 4 -> 0, D: 3 -> 1
    assert_eq!(s.improved_rank_count, 2);
    assert_eq!(s.average_rank_improvement, 3.0);
    assert!(s.average_rank_improvement >= 0.0);
}

#[test]
fn disjoint_lists_count_every_item_as_new_and_removed() {
    let (b, e) = pair(&["A", "B"], &["X", "Y", "Z"]);
    let s = diff(&b, &e);
    assert_eq!(s.total_product_count, 3);
    assert_eq!(s.new_product_count, 3);
    assert_eq!(s.removed_product_count, 2);
    assert_eq!(s.improved_rank_count, 0);
    assert_eq!(s.average_rank_improvement, 0.0);
}

#[test]
fn diff_is_idempotent() {
    let (b, e) = pair(&["A", "B", "C", "D", "E", "F", "G"], &["G", "C", "A", "Q", "F", "B"]);
    let first = diff(&b, &e);
    let second = diff(&b, &e);
    assert_eq!(first, second);
    assert_eq!(first.average_rank_improvement.to_bits(), second.average_rank_improvement.to_bits());
}

#[test]
fn rank_deltas_cover_both_lists() {
    let (b, e) = pair(&["A", "B", "C"], &["B", "A", "D"]);
    let deltas = rank_deltas(&b, &e);
    let ids: Vec<&str> = deltas.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["B", "A", "D", "C"]);
    assert_eq!(deltas[0].change(), RankChange::Improved(1));
    assert_eq!(deltas[0].signed(), Some(1));
    assert_eq!(deltas[1].change(), RankChange::Declined(1));
    assert_eq!(deltas[1].signed(), Some(-1));
    assert_eq!(deltas[2].change(), RankChange::New);
    assert_eq!(deltas[2].signed(), None);
    assert_eq!(deltas[3].change(), RankChange::Removed);
}

#[test]
fn rank_deltas_agree_with_summary() {
    let (b, e) = pair(&["A", "B", "C", "D"], &["D", "B", "A", "E"]);
    let s = diff(&b, &e);
    let improved = rank_deltas(&b, &e).iter().filter(|d| matches!(d.change(), RankChange::Improved(_))).count();
    assert_eq!(improved, s.improved_rank_count);
}
