//! Tour construction and improvement over a travel-cost matrix.
//!
//! Greedy nearest-neighbor builds the initial visiting order and 2-opt
//! refinement untangles crossings. Both treat the order as an open path:
//! no cost is charged for returning to the start.

use crate::matrix::CostMatrix;

/// Nearest-neighbor visiting order, starting at index 0.
///
/// Each step moves to the strictly cheapest reachable unvisited waypoint,
/// so infinite and NaN costs are never selected. When no reachable
/// candidate remains, the leftover waypoints are appended in index order;
/// the result is always a full permutation.
pub fn greedy_tour(matrix: &CostMatrix) -> Vec<usize> {
    let n = matrix.size();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0];
    }

    let mut order = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    order.push(0);
    visited[0] = true;
    let mut current = 0usize;

    while order.len() < n {
        let mut best: Option<usize> = None;
        let mut best_cost = f64::INFINITY;
        for candidate in 0..n {
            if visited[candidate] {
                continue;
            }
            let cost = matrix.get(current, candidate);
            if cost < best_cost {
                best_cost = cost;
                best = Some(candidate);
            }
        }
        match best {
            Some(next) => {
                visited[next] = true;
                order.push(next);
                current = next;
            }
            None => {
                // Everything left is unreachable from here; keep input order.
                for (index, seen) in visited.iter().enumerate() {
                    if !seen {
                        order.push(index);
                    }
                }
                break;
            }
        }
    }
    order
}

/// Total cost of visiting `order` as an open path.
///
/// Any out-of-range index or non-finite hop makes the whole tour
/// infinite, as does an order too short to contain a hop.
pub fn tour_cost(order: &[usize], matrix: &CostMatrix) -> f64 {
    if order.len() < 2 {
        return f64::INFINITY;
    }
    let mut total = 0.0;
    for hop in order.windows(2) {
        match matrix.try_get(hop[0], hop[1]) {
            Some(cost) if cost.is_finite() => total += cost,
            _ => return f64::INFINITY,
        }
    }
    total
}

/// Refine `order` with best-improvement 2-opt passes.
///
/// Every pass tries reversing each contiguous slice and adopts a candidate
/// only when it is strictly cheaper, so equal-cost alternatives cannot
/// cycle and the loop terminates. Orders with fewer than three stops, or
/// whose length disagrees with the matrix, come back unchanged.
pub fn two_opt(order: Vec<usize>, matrix: &CostMatrix, max_passes: usize) -> Vec<usize> {
    if order.len() < 3 || order.len() != matrix.size() {
        return order;
    }

    let mut best = order;
    let mut best_cost = tour_cost(&best, matrix);
    let mut passes = 0usize;
    let mut improved = true;

    while improved && passes < max_passes {
        improved = false;
        for i in 0..best.len() - 1 {
            for j in (i + 1)..best.len() {
                let mut candidate = best.clone();
                candidate[i + 1..=j].reverse();
                let cost = tour_cost(&candidate, matrix);
                if cost < best_cost {
                    best = candidate;
                    best_cost = cost;
                    improved = true;
                }
            }
        }
        passes += 1;
    }
    best
}
