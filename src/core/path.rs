use ndarray::Array2;
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::error::{ReconstructError, Result};

/// Union-find over segment indices, used to reject cycle-closing edges.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `a` and `b`; false if they were already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Greedy-edge approximation of the shortest open Hamiltonian path.
///
/// Pairs `i < j` are taken in ascending distance; equal distances prefer
/// temporally closer pairs (smaller `j - i`), then smaller `i`. An edge is kept
/// when both endpoints still have degree below two and it joins two different
/// path fragments. On a complete graph this always ends with `N - 1` edges. The
/// path is read from its lower-indexed endpoint.
///
/// Preferring adjacent pairs keeps all-equal distances in the original
/// temporal order; plain `(i, j)` order would zig-zag around segment 0.
pub fn solve_path(distances: &Array2<f64>) -> Result<Vec<usize>> {
    let (rows, cols) = distances.dim();
    if rows != cols {
        return Err(ReconstructError::invariant(format!(
            "distance matrix must be square, got {rows}x{cols}"
        )));
    }
    let n = rows;
    if n < 2 {
        return Ok((0..n).collect());
    }

    let mut edges: Vec<(usize, usize)> = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            edges.push((i, j));
        }
    }
    edges.sort_by(|&(ai, aj), &(bi, bj)| {
        distances[(ai, aj)]
            .total_cmp(&distances[(bi, bj)])
            .then((aj - ai).cmp(&(bj - bi)))
            .then(ai.cmp(&bi))
    });

    let mut degree = vec![0u8; n];
    let mut adjacent: Vec<Vec<usize>> = vec![Vec::with_capacity(2); n];
    let mut fragments = DisjointSet::new(n);
    let mut accepted = 0;

    for (i, j) in edges {
        if accepted == n - 1 {
            break;
        }
        if degree[i] >= 2 || degree[j] >= 2 {
            continue;
        }
        if !fragments.union(i, j) {
            continue;
        }
        degree[i] += 1;
        degree[j] += 1;
        adjacent[i].push(j);
        adjacent[j].push(i);
        accepted += 1;
    }

    if accepted != n - 1 {
        return Err(ReconstructError::invariant(format!(
            "greedy edge pass accepted {accepted} edges for {n} segments"
        )));
    }

    let start = (0..n)
        .find(|&v| degree[v] == 1)
        .ok_or_else(|| ReconstructError::invariant("path has no endpoint"))?;

    let mut path = Vec::with_capacity(n);
    let mut prev = usize::MAX;
    let mut cur = start;
    loop {
        path.push(cur);
        match adjacent[cur].iter().copied().find(|&v| v != prev) {
            Some(next) => {
                prev = cur;
                cur = next;
            }
            None => break,
        }
    }

    if path.len() != n {
        return Err(ReconstructError::invariant(format!(
            "linearized path visits {} of {n} segments",
            path.len()
        )));
    }

    log::debug!("Greedy path: {:?}", path);
    Ok(path)
}

/// A shuffled visiting order that ignores spectral distance.
pub fn random_path(n: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut path: Vec<usize> = (0..n).collect();
    path.shuffle(rng);
    path
}

/// Sum of distances between consecutive entries of `path`.
pub fn path_cost(distances: &Array2<f64>, path: &[usize]) -> f64 {
    path.windows(2).map(|w| distances[(w[0], w[1])]).sum()
}
