//! Permutation-level operators used by the GA chromosome: order
//! crossover (OX) and swap mutation. Both preserve invariant 4
//! (permutation integrity) by construction.

use rand::Rng;

use crate::domain::types::LocationId;

/// Order crossover: copies a random contiguous segment of `parent1` into
/// the child verbatim, then fills the remaining slots, walking forward
/// from the segment's end and wrapping around, with `parent2`'s genes in
/// their own order, skipping anything already placed.
pub fn order_crossover<R: Rng + ?Sized>(
    parent1: &[LocationId],
    parent2: &[LocationId],
    rng: &mut R,
) -> Vec<LocationId> {
    let n = parent1.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return parent1.to_vec();
    }

    let a = rng.gen_range(0..n);
    let b = rng.gen_range(0..n);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };

    let mut child: Vec<Option<LocationId>> = vec![None; n];
    let mut taken = std::collections::HashSet::with_capacity(n);
    for i in start..=end {
        child[i] = Some(parent1[i]);
        taken.insert(parent1[i]);
    }

    let mut cursor = (end + 1) % n;
    for offset in 0..n {
        let candidate = parent2[(end + 1 + offset) % n];
        if taken.contains(&candidate) {
            continue;
        }
        child[cursor] = Some(candidate);
        taken.insert(candidate);
        cursor = (cursor + 1) % n;
    }

    child.into_iter().map(|gene| gene.expect("OX fills every slot")).collect()
}

/// Exchanges two random positions. A no-op on permutations shorter than 2.
pub fn swap_mutation<R: Rng + ?Sized>(permutation: &mut [LocationId], rng: &mut R) {
    if permutation.len() < 2 {
        return;
    }
    let i = rng.gen_range(0..permutation.len());
    let j = rng.gen_range(0..permutation.len());
    permutation.swap(i, j);
}
