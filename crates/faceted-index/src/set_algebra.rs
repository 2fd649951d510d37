//! Sorted-ascending, duplicate-free integer set algebra.
//!
//! Every posting list and every candidate set the evaluator produces is
//! sorted-ascending and duplicate-free; correctness of `union`/`intersect`
//! depends on that invariant holding for all inputs.

/// K-way merge-union of sorted-distinct lists into one sorted-distinct
/// list. Dedupes against the last emitted value as it merges, so inputs
/// that individually satisfy the sorted-distinct invariant never produce a
/// duplicate in the output even when the same value appears in several
/// inputs.
#[must_use]
pub fn union(lists: &[&[u32]]) -> Vec<u32> {
    match lists {
        [] => Vec::new(),
        [single] => single.to_vec(),
        [a, b] => union_two(a, b),
        _ => union_k_way(lists),
    }
}

fn union_two(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                push_distinct(&mut out, a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                push_distinct(&mut out, b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                push_distinct(&mut out, a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    for &v in &a[i..] {
        push_distinct(&mut out, v);
    }
    for &v in &b[j..] {
        push_distinct(&mut out, v);
    }

    out
}

fn union_k_way(lists: &[&[u32]]) -> Vec<u32> {
    let total: usize = lists.iter().map(|l| l.len()).sum();
    let mut out = Vec::with_capacity(total);
    let mut cursors = vec![0usize; lists.len()];

    loop {
        let mut min: Option<u32> = None;
        for (list, &cursor) in lists.iter().zip(cursors.iter()) {
            if let Some(&head) = list.get(cursor) {
                if min.is_none_or(|m| head < m) {
                    min = Some(head);
                }
            }
        }

        let Some(min) = min else { break };
        push_distinct(&mut out, min);

        for (list, cursor) in lists.iter().zip(cursors.iter_mut()) {
            if list.get(*cursor) == Some(&min) {
                *cursor += 1;
            }
        }
    }

    out
}

fn push_distinct(out: &mut Vec<u32>, value: u32) {
    if out.last() != Some(&value) {
        out.push(value);
    }
}

/// Pairwise intersection. `target` is cleared and reused — callers chain
/// several intersections by alternating between two scratch buffers, since
/// writing a set's own output back into one of its inputs mid-walk is not
/// safe (the operation is commutative but not associative under in-place
/// reuse).
pub fn intersect(a: &[u32], b: &[u32], target: &mut Vec<u32>) {
    target.clear();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                target.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
}

/// `0..n` as an already-sorted, already-distinct candidate set — the seed
/// used when a query has no `equal` constraints.
#[must_use]
pub fn all_indices(n: usize) -> Vec<u32> {
    (0..u32::try_from(n).unwrap_or(u32::MAX)).collect()
}

#[cfg(test)]
mod tests;
