//! C1: the graph store.
//!
//! A fixed vertex set `{0,...,n-1}` with an unordered adjacency list per
//! vertex. Mirrors the `GraphInternal` adjacency-list layout this crate's
//! triconnectivity ancestor used internally, since the core algorithms here
//! need the same tight, index-based control rather than `petgraph`'s
//! iterator machinery.
//!
//! No ordering contract is made across a vertex's adjacency list; callers
//! that need a canonical form (the authenticator, comparing two adjacency
//! lists for equality) must sort first — see [`Graph::sorted_neighbors`].

/// An undirected simple graph on vertices `0..n`.
#[derive(Debug, Clone)]
pub struct Graph {
    adj: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Graph {
    /// An edgeless graph on `n` vertices.
    pub fn new(n: usize) -> Self {
        Self { adj: vec![Vec::new(); n], edge_count: 0 }
    }

    /// Builds a graph from `n` vertices and a list of undirected edges.
    ///
    /// Adjacencies are added symmetrically, in the order the edges are
    /// given. Does not itself reject self-loops or duplicates; callers
    /// that must (e.g. the file reader, see [`crate::input`]) validate
    /// before calling this.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut g = Self::new(n);
        for &(u, v) in edges {
            g.add_edge(u, v);
        }
        g
    }

    /// Number of vertices.
    pub fn n(&self) -> usize {
        self.adj.len()
    }

    /// Number of undirected edges: half the sum of adjacency-list lengths.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Adds the undirected edge `(u, v)` to both adjacency lists.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        self.adj[u].push(v);
        self.adj[v].push(u);
        self.edge_count += 1;
    }

    /// Neighbours of `v`, in insertion order. No ordering is guaranteed.
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.adj[v]
    }

    /// `deg(v)`.
    pub fn degree(&self, v: usize) -> usize {
        self.adj[v].len()
    }

    /// Whether `(u, v)` is an edge, by linear scan of `u`'s adjacency list.
    ///
    /// Sufficient here: every authenticator call site bounds the number of
    /// `adjacent` queries by the certificate size, not by `n`.
    pub fn adjacent(&self, u: usize, v: usize) -> bool {
        self.adj[u].iter().any(|&w| w == v)
    }

    /// `v`'s neighbours sorted ascending, for adjacency-list comparisons
    /// that must ignore insertion order.
    pub fn sorted_neighbors(&self, v: usize) -> Vec<usize> {
        let mut ns = self.adj[v].clone();
        radsort::sort(&mut ns);
        ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_edges_is_symmetric() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2)]);
        assert!(g.adjacent(0, 1));
        assert!(g.adjacent(1, 0));
        assert!(!g.adjacent(0, 2));
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.degree(1), 2);
    }

    #[test]
    fn sorted_neighbors_normalises_order() {
        let mut g = Graph::new(4);
        g.add_edge(0, 3);
        g.add_edge(0, 1);
        g.add_edge(0, 2);
        assert_eq!(g.sorted_neighbors(0), vec![1, 2, 3]);
    }
}
