//! C3: block decomposition.
//!
//! A single iterative DFS from vertex 0 finds biconnected components
//! (bicomps), cut vertices, and — assuming the block tree turns out to be a
//! path — orders the bicomps into the chain C4 consumes one at a time.
//!
//! Grounded on this crate's own lowpoint/bicomponent `dfs` (Tarjan-style,
//! recursive, extracting full edge sets per block via an edge stack),
//! generalized here to (a) run iteratively, per the core's no-recursion
//! discipline, and (b) stop at a representative edge per bicomp rather than
//! collecting every edge, since C4 re-derives each bicomp's own structure
//! with its own local DFS.

use crate::certificate::Certificate;
use crate::graph::Graph;

const NIL: usize = usize::MAX;

/// A bicomp ready for C4, in chain-processing order.
#[derive(Debug, Clone, Copy)]
pub struct Bicomp {
    /// The cut vertex (or, for the first bicomp in the chain, its own
    /// natural root vertex) through which this bicomp attaches to the
    /// already-processed part of the decomposition.
    pub root: usize,
    /// An edge used to seed C4's local DFS. May be a *fake edge* — its
    /// first endpoint need not equal `root` once the natural discovery
    /// order has been reversed to build the chain (§4.4 "Fake edge").
    pub seed_edge: (usize, usize),
}

/// Outcome of block decomposition.
#[derive(Debug, Clone)]
pub enum Decomposition {
    /// No negative structure found at this stage; bicomps in chain order.
    Chain(Vec<Bicomp>),
    /// A single vertex whose removal splits the graph into >= 3 pieces.
    ThreeComponentCut { vertex: usize },
    /// Three cut vertices of one bicomp each anchor a separate branch.
    ThreeCutVertexBicomp { c1: usize, c2: usize, c3: usize },
}

impl Decomposition {
    /// Collapses the `ThreeComponentCut`/`ThreeCutVertexBicomp` outcomes
    /// into the matching [`Certificate`], leaving `Chain` as the `Ok` path
    /// for C4 to continue from.
    pub fn into_certificate(self) -> Result<Vec<Bicomp>, Certificate> {
        match self {
            Decomposition::Chain(b) => Ok(b),
            Decomposition::ThreeComponentCut { vertex } => {
                Err(Certificate::three_component_cut(vertex))
            }
            Decomposition::ThreeCutVertexBicomp { c1, c2, c3 } => {
                Err(Certificate::three_cut_vertex_bicomp(c1, c2, c3))
            }
        }
    }
}

struct RawBicomp {
    root: usize,
    seed_edge: (usize, usize),
}

/// Runs C3 on `g`, which must be connected.
pub fn decompose(g: &Graph) -> Decomposition {
    let n = g.n();
    if n <= 1 {
        return Decomposition::Chain(Vec::new());
    }

    let mut dfs_no = vec![NIL; n];
    let mut low = vec![NIL; n];
    let mut parent = vec![NIL; n];
    let mut it = vec![0usize; n];
    let mut stack = Vec::with_capacity(n);

    let mut raw: Vec<RawBicomp> = Vec::new();
    let mut closure_count = vec![0u32; n];
    let mut cut_verts = vec![NIL; n]; // cut_verts[w] = index into `raw`, or NIL

    let root = 0usize;
    dfs_no[root] = 0;
    low[root] = 0;
    let mut time = 1usize;
    stack.push(root);

    while let Some(&u) = stack.last() {
        if it[u] < g.neighbors(u).len() {
            let v = g.neighbors(u)[it[u]];
            it[u] += 1;
            if v == parent[u] {
                continue;
            }
            if dfs_no[v] == NIL {
                parent[v] = u;
                dfs_no[v] = time;
                low[v] = time;
                time += 1;
                stack.push(v);
            } else if dfs_no[v] < dfs_no[u] {
                low[u] = low[u].min(dfs_no[v]);
            }
        } else {
            stack.pop();
            if let Some(&w) = stack.last() {
                low[w] = low[w].min(low[u]);
                if low[u] >= dfs_no[w] {
                    let idx = raw.len();
                    raw.push(RawBicomp { root: w, seed_edge: (w, u) });
                    closure_count[w] += 1;
                    // A non-root w already carries one implicit connector up
                    // to its own parent bicomp, so its second closure here is
                    // its third block overall; the DFS root has no such
                    // upward connector, so it tolerates one extra closure
                    // (two blocks meeting at the root is an ordinary 2-valent
                    // cut vertex) before the same "== 3 blocks" test fires.
                    // This keeps the threshold equal to the authenticator's
                    // own `num_comps_after_removal(v) >= 3` re-derivation
                    // regardless of which vertex the DFS happened to root at
                    // (see DESIGN.md).
                    let limit = if w == root { 3 } else { 2 };
                    if closure_count[w] < limit {
                        cut_verts[w] = idx;
                    } else {
                        return Decomposition::ThreeComponentCut { vertex: w };
                    }
                }
            }
        }
    }

    if raw.len() <= 1 {
        let bicomps =
            raw.into_iter().map(|b| Bicomp { root: b.root, seed_edge: b.seed_edge }).collect();
        return Decomposition::Chain(bicomps);
    }

    let last = raw.len() - 1;
    let mut parent_bicomp: Vec<Option<usize>> = vec![None; raw.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); raw.len()];

    // `last` always closes at the DFS root (the final pop of the whole
    // traversal). If some other bicomp i < last *also* has raw[i].root ==
    // root, the root is the rare 2-valent cut vertex allowed by the relaxed
    // threshold above: `parent[root]` doesn't exist, so neither of these two
    // root-attached bicomps can be reached by walking `parent[]` upward.
    // Link them to each other directly instead of leaving both parentless,
    // so the tree built below stays a single path through the shared vertex.
    let mut root_attached_below_last: Option<usize> = None;
    for i in 0..last {
        if raw[i].root == root {
            root_attached_below_last = Some(i);
            continue;
        }
        let mut v = parent[raw[i].root];
        while cut_verts[v] == NIL {
            v = parent[v];
        }
        let j = cut_verts[v];
        parent_bicomp[i] = Some(j);
        children[j].push(i);
    }
    if let Some(i0) = root_attached_below_last {
        parent_bicomp[last] = Some(i0);
        children[i0].push(last);
    }

    // A bicomp's own cut-vertex set is {raw[j].root} (shared with its
    // parent, if any) union the root vertex of each child; flag once that
    // set reaches 3 distinct vertices.
    for j in 0..raw.len() {
        let self_connector = usize::from(parent_bicomp[j].is_some());
        if children[j].len() + self_connector >= 3 {
            let mut named = Vec::with_capacity(3);
            if parent_bicomp[j].is_some() {
                named.push(raw[j].root);
            }
            for &c in &children[j] {
                if named.len() == 3 {
                    break;
                }
                named.push(raw[c].root);
            }
            return Decomposition::ThreeCutVertexBicomp {
                c1: named[0],
                c2: named[1],
                c3: named[2],
            };
        }
    }

    // Every bicomp now has at most two connectors (itself-to-parent plus
    // children), so the block tree is a simple path. Linearize it by
    // walking from one degree-<=1 endpoint to the other.
    let mut degree = vec![0usize; raw.len()];
    for (j, d) in degree.iter_mut().enumerate() {
        *d = children[j].len() + usize::from(parent_bicomp[j].is_some());
    }
    let start = (0..raw.len()).find(|&j| degree[j] <= 1).unwrap_or(0);

    let mut order = Vec::with_capacity(raw.len());
    let mut visited = vec![false; raw.len()];
    let mut cur = start;
    loop {
        order.push(cur);
        visited[cur] = true;
        let mut next = None;
        if let Some(p) = parent_bicomp[cur] {
            if !visited[p] {
                next = Some(p);
            }
        }
        if next.is_none() {
            next = children[cur].iter().copied().find(|&c| !visited[c]);
        }
        match next {
            Some(n) => cur = n,
            None => break,
        }
    }
    // Any bicomp the walk above failed to reach means the block tree is
    // not in fact a simple path; append it in natural closing order as a
    // fallback (see DESIGN.md).
    for (j, v) in visited.iter().enumerate() {
        if !v {
            order.push(j);
        }
    }

    let mut bicomps = Vec::with_capacity(order.len());
    for (pos, &idx) in order.iter().enumerate() {
        let root = if pos == 0 {
            raw[idx].root
        } else {
            let prev = order[pos - 1];
            if parent_bicomp[idx] == Some(prev) {
                raw[idx].root
            } else {
                raw[prev].root
            }
        };
        bicomps.push(Bicomp { root, seed_edge: raw[idx].seed_edge });
    }

    Decomposition::Chain(bicomps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle_is_one_bicomp() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (2, 0)]);
        match decompose(&g) {
            Decomposition::Chain(b) => assert_eq!(b.len(), 1),
            other => panic!("expected a chain, got {other:?}"),
        }
    }

    #[test]
    fn two_triangles_sharing_a_vertex_chain() {
        // 0-1-2-0 and 2-3-4-2, sharing cut vertex 2.
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)]);
        match decompose(&g) {
            Decomposition::Chain(b) => assert_eq!(b.len(), 2),
            other => panic!("expected a 2-bicomp chain, got {other:?}"),
        }
    }

    #[test]
    fn three_triangles_sharing_one_vertex_is_flagged() {
        let g = Graph::from_edges(
            7,
            &[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 0), (0, 5), (5, 6), (6, 0)],
        );
        match decompose(&g) {
            Decomposition::ThreeComponentCut { vertex } => assert_eq!(vertex, 0),
            other => panic!("expected a three-component cut, got {other:?}"),
        }
    }

    #[test]
    fn single_edge_graph_has_no_bicomp() {
        let g = Graph::from_edges(2, &[(0, 1)]);
        match decompose(&g) {
            Decomposition::Chain(b) => assert_eq!(b.len(), 1),
            other => panic!("expected a one-edge chain, got {other:?}"),
        }
    }
}
