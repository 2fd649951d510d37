use super::*;

#[test]
fn union_empty_is_empty() {
    assert_eq!(union(&[]), Vec::<u32>::new());
}

#[test]
fn union_single_is_identity() {
    let a: &[u32] = &[1, 3, 5];
    assert_eq!(union(&[a]), vec![1, 3, 5]);
}

#[test]
fn union_two_merges_and_dedupes() {
    let a: &[u32] = &[1, 2, 4];
    let b: &[u32] = &[2, 3, 4, 5];
    assert_eq!(union(&[a, b]), vec![1, 2, 3, 4, 5]);
}

#[test]
fn union_k_way_dedupes_across_many_lists() {
    let a: &[u32] = &[1, 5];
    let b: &[u32] = &[2, 5];
    let c: &[u32] = &[3, 5];
    let out = union(&[a, b, c]);
    assert_eq!(out, vec![1, 2, 3, 5]);
    // strictly ascending, no duplicate run
    assert!(out.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn intersect_commutative() {
    let a = [1u32, 2, 3, 5, 8];
    let b = [2u32, 3, 4, 5];
    let mut out1 = Vec::new();
    let mut out2 = Vec::new();
    intersect(&a, &b, &mut out1);
    intersect(&b, &a, &mut out2);
    assert_eq!(out1, out2);
    assert_eq!(out1, vec![2, 3, 5]);
}

#[test]
fn intersect_reuses_target_buffer() {
    let mut target = vec![99, 100, 101];
    intersect(&[1, 2], &[2, 3], &mut target);
    assert_eq!(target, vec![2]);
}

#[test]
fn intersect_disjoint_is_empty() {
    let mut target = Vec::new();
    intersect(&[1, 2], &[3, 4], &mut target);
    assert!(target.is_empty());
}

#[test]
fn all_indices_is_ascending_from_zero() {
    assert_eq!(all_indices(4), vec![0, 1, 2, 3]);
    assert_eq!(all_indices(0), Vec::<u32>::new());
}

#[test]
fn chained_intersections_with_alternating_buffers() {
    // Models the evaluator's small-first intersection chain across three
    // per-field candidate sets using two alternating scratch buffers.
    let sets: Vec<Vec<u32>> = vec![vec![1, 2, 3, 4, 5], vec![2, 3, 4], vec![3, 4]];

    let mut buf_a = Vec::new();
    let mut buf_b = Vec::new();
    intersect(&sets[0], &sets[1], &mut buf_a);
    intersect(&buf_a, &sets[2], &mut buf_b);

    assert_eq!(buf_b, vec![3, 4]);
}
