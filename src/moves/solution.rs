//! Route-level move operators used by SA and Tabu: 2-opt, relocate, and
//! swap. Each returns a new [`Solution`] with stale metrics — callers
//! re-evaluate before comparing cost.

use rand::Rng;

use crate::domain::solution::Solution;

fn routes_with_len_at_least(solution: &Solution, min_len: usize) -> Vec<usize> {
    solution
        .routes
        .iter()
        .enumerate()
        .filter(|(_, r)| r.len() >= min_len)
        .map(|(i, _)| i)
        .collect()
}

fn non_empty_route_indices(solution: &Solution) -> Vec<usize> {
    routes_with_len_at_least(solution, 1)
}

/// Reverses a random segment within one route that has at least 3 stops.
/// Leaves `solution` unchanged (cloned) if no route qualifies.
pub fn two_opt<R: Rng + ?Sized>(solution: &Solution, rng: &mut R) -> Solution {
    let mut next = solution.clone();
    let candidates = routes_with_len_at_least(&next, 3);
    if candidates.is_empty() {
        return next;
    }
    let route_idx = candidates[rng.gen_range(0..candidates.len())];
    let stops = &mut next.routes[route_idx].stops;
    let n = stops.len();
    let a = rng.gen_range(0..n);
    let b = rng.gen_range(0..n);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    if start == end {
        return next;
    }
    stops[start..=end].reverse();
    next
}

/// Moves one stop from a random non-empty route A into a random
/// insertion point of a different route B. A no-op (cloned) if fewer
/// than two routes are non-empty.
pub fn relocate<R: Rng + ?Sized>(solution: &Solution, rng: &mut R) -> Solution {
    let mut next = solution.clone();
    let candidates = non_empty_route_indices(&next);
    if candidates.len() < 2 {
        return next;
    }
    let from = candidates[rng.gen_range(0..candidates.len())];
    let to = loop {
        let idx = candidates[rng.gen_range(0..candidates.len())];
        if idx != from {
            break idx;
        }
    };

    let stop_pos = rng.gen_range(0..next.routes[from].stops.len());
    let stop = next.routes[from].stops.remove(stop_pos);
    let insert_at = rng.gen_range(0..=next.routes[to].stops.len());
    next.routes[to].stops.insert(insert_at, stop);
    next
}

/// Exchanges one random stop between two different non-empty routes. A
/// no-op (cloned) if fewer than two routes are non-empty.
pub fn swap<R: Rng + ?Sized>(solution: &Solution, rng: &mut R) -> Solution {
    let mut next = solution.clone();
    let candidates = non_empty_route_indices(&next);
    if candidates.len() < 2 {
        return next;
    }
    let a = candidates[rng.gen_range(0..candidates.len())];
    let b = loop {
        let idx = candidates[rng.gen_range(0..candidates.len())];
        if idx != a {
            break idx;
        }
    };

    let a_pos = rng.gen_range(0..next.routes[a].stops.len());
    let b_pos = rng.gen_range(0..next.routes[b].stops.len());
    let a_stop = next.routes[a].stops[a_pos];
    let b_stop = next.routes[b].stops[b_pos];
    next.routes[a].stops[a_pos] = b_stop;
    next.routes[b].stops[b_pos] = a_stop;
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::solution::Route;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_solution() -> Solution {
        let mut sol = Solution::new();
        sol.routes.push(Route::new(1, vec![1, 2, 3, 4]));
        sol.routes.push(Route::new(2, vec![5, 6]));
        sol
    }

    #[test]
    fn two_opt_preserves_stop_multiset() {
        let sol = sample_solution();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mutated = two_opt(&sol, &mut rng);
        let mut before: Vec<_> = sol.routes.iter().flat_map(|r| r.stops.clone()).collect();
        let mut after: Vec<_> = mutated.routes.iter().flat_map(|r| r.stops.clone()).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn relocate_preserves_total_stop_count() {
        let sol = sample_solution();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mutated = relocate(&sol, &mut rng);
        assert_eq!(sol.served_count(), mutated.served_count());
    }

    #[test]
    fn swap_preserves_stop_multiset() {
        let sol = sample_solution();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mutated = swap(&sol, &mut rng);
        let mut before: Vec<_> = sol.routes.iter().flat_map(|r| r.stops.clone()).collect();
        let mut after: Vec<_> = mutated.routes.iter().flat_map(|r| r.stops.clone()).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }
}
