//! Random connected/biconnected graphs for property tests, distinct from
//! the generator CLI in `crate::generator` (which builds cycle/clique
//! unions specifically shaped to contain or avoid K4-subdivisions).
//!
//! Grounded on this crate's own prior `testing::random_graphs` (the
//! spanning-tree-plus-extra-edges construction), retargeted from
//! `petgraph::UnGraph` to [`crate::graph::Graph`]; `random_biconnected_graph`
//! is rebuilt on top of `crate::generator` (a single cycle or clique is
//! biconnected by construction) rather than the now-removed
//! `block_cut::get_block_cut_tree` helper this module previously used.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::generator::{self, GeneratorParams};
use crate::graph::Graph;

/// A random connected graph: a random spanning tree (vertex `i` attaches to
/// a uniformly chosen earlier vertex) plus `extra_edges` further random
/// edges.
pub fn random_connected_graph(n: usize, extra_edges: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = Graph::new(n);
    for i in 1..n {
        let j = rng.random_range(0..i);
        g.add_edge(i, j);
    }
    let mut added = 0;
    let mut attempts = 0;
    while added < extra_edges && attempts < extra_edges * 20 + 100 {
        attempts += 1;
        let u = rng.random_range(0..n);
        let v = rng.random_range(0..n);
        if u != v && !g.adjacent(u, v) {
            g.add_edge(u, v);
            added += 1;
        }
    }
    g
}

/// A random biconnected graph: a single cycle of length `len` (or, if
/// `as_clique`, a single complete graph on `len` vertices) run through the
/// generator, which shuffles vertex identity and edge order.
pub fn random_biconnected_graph(len: usize, as_clique: bool, seed: u64) -> Graph {
    let len = len.max(3) as u64;
    let params = GeneratorParams {
        n_cycles: if as_clique { 0 } else { 1 },
        cycle_len: len,
        n_cliques: if as_clique { 1 } else { 0 },
        clique_len: len,
        three_edges: false,
        seed,
    };
    let (n, edges) = generator::generate(&params).expect("single-subgraph params are always valid");
    Graph::from_edges(n, &edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_connected_graph_has_no_isolated_vertex() {
        let g = random_connected_graph(10, 5, 3);
        for v in 0..10 {
            assert!(g.degree(v) > 0);
        }
    }

    #[test]
    fn random_biconnected_clique_has_complete_degree() {
        let g = random_biconnected_graph(5, true, 11);
        assert_eq!(g.n(), 5);
        for v in 0..5 {
            assert_eq!(g.degree(v), 4);
        }
    }

    #[test]
    fn random_biconnected_cycle_has_degree_two() {
        let g = random_biconnected_graph(6, false, 12);
        assert_eq!(g.n(), 6);
        for v in 0..6 {
            assert_eq!(g.degree(v), 2);
        }
    }
}
