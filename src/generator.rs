//! Random-graph generator: an external collaborator, not part of the
//! algorithmic core. Produces a graph file by joining `nC` cycles of length
//! `lC` and `nK` complete graphs of size `lK` in a tree, using either 2 or 3
//! cross edges per link, then shuffling vertex identities and edge order.
//!
//! Follows the original generator's edge counts, per-link vertex-offset
//! selection, and final dedup-and-shuffle pass, substituting `rand`'s
//! seedable `StdRng` for `rand()`/`srand()` so output is reproducible from
//! an explicit seed instead of reaching for `libc`.

use hashbrown::HashSet;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

/// Parameters rejected by the generator: `lC, lK >= 3`; `nC + nK >= 1`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorParamError {
    #[error("lC must be at least 3, got {0}")]
    CycleLengthTooSmall(u64),
    #[error("lK must be at least 3, got {0}")]
    CliqueSizeTooSmall(u64),
    #[error("nC + nK must be at least 1, got nC={nc} nK={nk}")]
    NoSubgraphs { nc: u64, nk: u64 },
}

/// The parameters of one generator run; `seed` is always explicit (no
/// "current time" fallback: per §6, the core's external collaborators take
/// no environment-derived state).
#[derive(Debug, Clone, Copy)]
pub struct GeneratorParams {
    pub n_cycles: u64,
    pub cycle_len: u64,
    pub n_cliques: u64,
    pub clique_len: u64,
    pub three_edges: bool,
    pub seed: u64,
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<(), GeneratorParamError> {
        if self.cycle_len < 3 {
            return Err(GeneratorParamError::CycleLengthTooSmall(self.cycle_len));
        }
        if self.clique_len < 3 {
            return Err(GeneratorParamError::CliqueSizeTooSmall(self.clique_len));
        }
        if self.n_cycles + self.n_cliques == 0 {
            return Err(GeneratorParamError::NoSubgraphs {
                nc: self.n_cycles,
                nk: self.n_cliques,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum SubgraphKind {
    Cycle,
    Clique,
}

/// Generates `(n, edges)` for `params`. Callers that want a [`crate::graph::Graph`]
/// should build one from the returned edge list via [`crate::graph::Graph::from_edges`].
pub fn generate(params: &GeneratorParams) -> Result<(usize, Vec<(usize, usize)>), GeneratorParamError> {
    params.validate()?;
    let mut rng = StdRng::seed_from_u64(params.seed);

    let nc = params.n_cycles as usize;
    let lc = params.cycle_len as usize;
    let nk = params.n_cliques as usize;
    let lk = params.clique_len as usize;

    let n = nc * lc + nk * lk;

    let mut nodes: Vec<usize> = (0..n).collect();
    for i in 0..n {
        let j = rng.random_range(i..n);
        nodes.swap(i, j);
    }

    let mut kinds: Vec<SubgraphKind> =
        std::iter::repeat_n(SubgraphKind::Cycle, nc).chain(std::iter::repeat_n(SubgraphKind::Clique, nk)).collect();
    let total = nc + nk;
    for i in 0..total {
        let j = rng.random_range(i..total);
        kinds.swap(i, j);
    }

    let mut edges: Vec<(usize, usize)> = Vec::new();
    let mut start_node = vec![0usize; total];
    let mut current = 0usize;
    for (i, kind) in kinds.iter().enumerate() {
        start_node[i] = current;
        match kind {
            SubgraphKind::Cycle => {
                for j in 0..lc {
                    edges.push((nodes[current + j], nodes[current + (j + 1) % lc]));
                }
                current += lc;
            }
            SubgraphKind::Clique => {
                for j in 0..lk {
                    for k in (j + 1)..lk {
                        edges.push((nodes[current + j], nodes[current + k]));
                    }
                }
                current += lk;
            }
        }
    }

    // Connect the subgraphs into a tree: subgraph i (i >= 1) links to a
    // uniformly chosen earlier subgraph j, with 2 or 3 cross edges chosen
    // from distinct offsets within each side.
    for i in 1..total {
        let j = rng.random_range(0..i);
        let mod1 = match kinds[i] {
            SubgraphKind::Clique => lk,
            SubgraphKind::Cycle => lc,
        };
        let mod2 = match kinds[j] {
            SubgraphKind::Clique => lk,
            SubgraphKind::Cycle => lc,
        };

        if !params.three_edges {
            let x1 = rng.random_range(0..mod1);
            let x2 = (x1 + (1 + rng.random_range(0..mod1 - 2))) % mod1;
            let y1 = rng.random_range(0..mod2);
            let y2 = (y1 + (1 + rng.random_range(0..mod2 - 2))) % mod2;
            edges.push((nodes[start_node[i] + x1], nodes[start_node[j] + y1]));
            edges.push((nodes[start_node[i] + x2], nodes[start_node[j] + y2]));
        } else {
            let (x1, x2, x3) = three_distinct_offsets(&mut rng, mod1);
            let (y1, y2, y3) = three_distinct_offsets(&mut rng, mod2);
            edges.push((nodes[start_node[i] + x1], nodes[start_node[j] + y1]));
            edges.push((nodes[start_node[i] + x2], nodes[start_node[j] + y2]));
            edges.push((nodes[start_node[i] + x3], nodes[start_node[j] + y3]));
        }
    }

    // Dedup (undirected), then shuffle edge order and orientation.
    let mut unique: HashSet<(usize, usize)> = HashSet::new();
    for (u, v) in edges {
        let key = if u > v { (v, u) } else { (u, v) };
        unique.insert(key);
    }
    let mut unique_edges: Vec<(usize, usize)> = unique.into_iter().collect();
    let m = unique_edges.len();
    for i in 0..m {
        let j = rng.random_range(i..m);
        unique_edges.swap(i, j);
        if rng.random_bool(0.5) {
            let (u, v) = unique_edges[i];
            unique_edges[i] = (v, u);
        }
    }

    Ok((n, unique_edges))
}

/// Three distinct offsets mod `m`, following the source's construction for
/// the `three_edges` branch: `x1` free, `x2` at least two steps past `x1`,
/// `x3` strictly between them on the remaining arc.
fn three_distinct_offsets(rng: &mut StdRng, m: usize) -> (usize, usize, usize) {
    if m == 3 {
        return (0, 1, 2);
    }
    let x1 = rng.random_range(0..m);
    let x2 = (x1 + (2 + rng.random_range(0..m - 3))) % m;
    let span = (m + x2 - x1 - 1) % m;
    let x3 = (x1 + (1 + rng.random_range(0..span))) % m;
    (x1, x2, x3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_cycle() {
        let p = GeneratorParams {
            n_cycles: 1,
            cycle_len: 2,
            n_cliques: 0,
            clique_len: 3,
            three_edges: false,
            seed: 1,
        };
        assert_eq!(generate(&p), Err(GeneratorParamError::CycleLengthTooSmall(2)));
    }

    #[test]
    fn rejects_no_subgraphs() {
        let p = GeneratorParams {
            n_cycles: 0,
            cycle_len: 3,
            n_cliques: 0,
            clique_len: 3,
            three_edges: false,
            seed: 1,
        };
        assert!(matches!(generate(&p), Err(GeneratorParamError::NoSubgraphs { .. })));
    }

    #[test]
    fn single_clique_has_expected_vertex_and_edge_count() {
        let p = GeneratorParams {
            n_cycles: 0,
            cycle_len: 3,
            n_cliques: 1,
            clique_len: 5,
            three_edges: false,
            seed: 7,
        };
        let (n, edges) = generate(&p).unwrap();
        assert_eq!(n, 5);
        assert_eq!(edges.len(), 5 * 4 / 2);
    }

    #[test]
    fn deterministic_for_a_fixed_seed() {
        let p = GeneratorParams {
            n_cycles: 2,
            cycle_len: 4,
            n_cliques: 1,
            clique_len: 4,
            three_edges: true,
            seed: 42,
        };
        let (n1, e1) = generate(&p).unwrap();
        let (n2, e2) = generate(&p).unwrap();
        assert_eq!(n1, n2);
        assert_eq!(e1, e2);
    }

    #[test]
    fn every_vertex_appears_in_some_edge() {
        let p = GeneratorParams {
            n_cycles: 1,
            cycle_len: 3,
            n_cliques: 1,
            clique_len: 4,
            three_edges: false,
            seed: 99,
        };
        let (n, edges) = generate(&p).unwrap();
        let mut seen = vec![false; n];
        for (u, v) in &edges {
            seen[*u] = true;
            seen[*v] = true;
        }
        assert!(seen.into_iter().all(|s| s));
    }
}
