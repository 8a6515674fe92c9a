//! Grid graphs: a simple biconnected family for exercising the recogniser
//! outside the cycle/clique shapes the generator (§6.3) produces — a grid
//! with more than one row and column is 2-connected and contains K4 only
//! once both dimensions are large enough to fold a 4-cycle onto a
//! diagonal, so it is a convenient non-SP witness source.
//!
//! Grounded on this crate's own prior `testing::grids` (kept the row/column
//! iteration, retargeted from `petgraph::UnGraph` to [`crate::graph::Graph`]).

use crate::graph::Graph;

/// A `rows` x `cols` grid graph, vertex `(r, c)` at index `r * cols + c`.
pub fn generate_grid_graph(rows: usize, cols: usize) -> Graph {
    assert!(rows > 1 && cols > 1, "grid must be at least 2x2 to be biconnected");
    let mut g = Graph::new(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let here = r * cols + c;
            if r + 1 < rows {
                g.add_edge(here, (r + 1) * cols + c);
            }
            if c + 1 < cols {
                g.add_edge(here, r * cols + c + 1);
            }
        }
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_by_two_grid_is_a_four_cycle() {
        let g = generate_grid_graph(2, 2);
        assert_eq!(g.n(), 4);
        assert_eq!(g.edge_count(), 4);
        for v in 0..4 {
            assert_eq!(g.degree(v), 2);
        }
    }

    #[test]
    fn three_by_three_grid_has_expected_edge_count() {
        let g = generate_grid_graph(3, 3);
        assert_eq!(g.n(), 9);
        // 2 * rows * (cols - 1) horizontal-like edges in each direction.
        assert_eq!(g.edge_count(), 12);
    }
}
