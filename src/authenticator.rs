//! C6: the authenticator.
//!
//! Independently re-verifies any [`Certificate`] against the original graph.
//! The recogniser (C3/C4) is trusted only insofar as this module, built from
//! the graph alone and never from the recogniser's internal state, agrees
//! with its verdict — so every DFS here is its own, freshly derived from
//! `g`, rather than reused from [`crate::block_cut`] or [`crate::recognizer`].
//!
//! Grounded on this crate's own `triconnected_blocks::palm_dfs` (iterative
//! low-point DFS) for the biconnectivity/cut-vertex machinery, generalized
//! to the component-counting and edge-stack-bicomp forms the five negative
//! kinds need, and on the `Component`-style tagged-data walk this crate's
//! triconnected-components code does for the positive SP walk.

use hashbrown::HashSet;

use crate::certificate::{Certificate, Path};
use crate::error::AuthFailure;
use crate::graph::Graph;
use crate::sp_tree::{Kind, NodeRef, SpTree};

const NIL: usize = usize::MAX;

/// Authenticates `cert` against `g`, the graph the recogniser was run on.
pub fn authenticate(cert: &Certificate, g: &Graph) -> Result<(), AuthFailure> {
    match cert {
        Certificate::K4 { a, b, c, d, paths } => authenticate_k4(g, *a, *b, *c, *d, paths),
        Certificate::K23 { a, b, paths } => authenticate_k23(g, *a, *b, paths),
        Certificate::T4 { c1, c2, a, b, paths } => authenticate_t4(g, *c1, *c2, *a, *b, paths),
        Certificate::ThreeComponentCut { vertex } => authenticate_three_component_cut(g, *vertex),
        Certificate::ThreeCutVertexBicomp { c1, c2, c3 } => {
            authenticate_three_cut_vertex_bicomp(g, *c1, *c2, *c3)
        }
        Certificate::Sp(tree) => authenticate_sp(tree, g),
    }
}

/// Verifies `path` is a simple walk between `e1` and `e2` in `g`: every step
/// is an edge of `g`, and no interior vertex is a named branch vertex or has
/// already been claimed by an earlier path traced against the same `seen`
/// set. Paths may be supplied in either direction; this canonicalises to
/// `e1 -> e2` before walking.
fn trace_path(
    g: &Graph,
    seen: &mut HashSet<usize>,
    e1: usize,
    e2: usize,
    path: &Path,
    branch_vertices: &[usize],
    sub_check: &str,
) -> Result<(), AuthFailure> {
    if path.len() < 2 {
        return Err(AuthFailure::new(format!(
            "{sub_check}: path between {e1} and {e2} has fewer than two vertices"
        )));
    }
    let (first, last) = (path[0], *path.last().unwrap());
    let oriented: &[usize] = if first == e1 && last == e2 {
        path
    } else if first == e2 && last == e1 {
        // Canonicalise a reversed path; walk it back to front below.
        let reversed: Path = path.iter().rev().copied().collect();
        return trace_path(g, seen, e1, e2, &reversed, branch_vertices, sub_check);
    } else {
        return Err(AuthFailure::new(format!(
            "{sub_check}: path endpoints ({first}, {last}) do not match ({e1}, {e2})"
        )));
    };

    for w in oriented.windows(2) {
        if !g.adjacent(w[0], w[1]) {
            return Err(AuthFailure::new(format!(
                "{sub_check}: ({}, {}) is not an edge of the input graph",
                w[0], w[1]
            )));
        }
    }

    for &v in &oriented[1..oriented.len() - 1] {
        if branch_vertices.contains(&v) {
            return Err(AuthFailure::new(format!(
                "{sub_check}: branch vertex {v} reappears as an interior vertex"
            )));
        }
        if !seen.insert(v) {
            return Err(AuthFailure::new(format!(
                "{sub_check}: interior vertex {v} reused by another path"
            )));
        }
    }
    Ok(())
}

fn authenticate_k4(
    g: &Graph,
    a: usize,
    b: usize,
    c: usize,
    d: usize,
    paths: &[Path; 6],
) -> Result<(), AuthFailure> {
    let branch = [a, b, c, d];
    if (0..4).any(|i| ((i + 1)..4).any(|j| branch[i] == branch[j])) {
        return Err(AuthFailure::new("K4: branch vertices a, b, c, d are not pairwise distinct"));
    }
    let mut seen = HashSet::new();
    let pairs = [(a, b), (a, c), (a, d), (b, c), (b, d), (c, d)];
    for (i, (e1, e2)) in pairs.into_iter().enumerate() {
        trace_path(g, &mut seen, e1, e2, &paths[i], &branch, "K4 trace_path")?;
    }
    Ok(())
}

fn authenticate_k23(g: &Graph, a: usize, b: usize, paths: &[Path; 3]) -> Result<(), AuthFailure> {
    if a == b {
        return Err(AuthFailure::new("K23: branch vertices a, b must be distinct"));
    }
    let branch = [a, b];
    let mut seen = HashSet::new();
    for path in paths {
        if path.len() < 3 {
            return Err(AuthFailure::new(
                "K23 trace_path: path must have at least two edges",
            ));
        }
        trace_path(g, &mut seen, a, b, path, &branch, "K23 trace_path")?;
    }
    Ok(())
}

fn authenticate_t4(
    g: &Graph,
    c1: usize,
    c2: usize,
    a: usize,
    b: usize,
    paths: &[Path; 5],
) -> Result<(), AuthFailure> {
    let branch = [c1, c2, a, b];
    if (0..4).any(|i| ((i + 1)..4).any(|j| branch[i] == branch[j])) {
        return Err(AuthFailure::new("T4: branch vertices c1, c2, a, b are not pairwise distinct"));
    }
    let mut seen = HashSet::new();
    let pairs = [(c1, a), (c2, a), (c1, b), (c2, b), (a, b)];
    for (i, (e1, e2)) in pairs.into_iter().enumerate() {
        trace_path(g, &mut seen, e1, e2, &paths[i], &branch, "T4 trace_path")?;
    }
    if !is_cut_vertex(g, c1) {
        return Err(AuthFailure::new("T4: is_cut_vertex(c1) is false"));
    }
    if !is_cut_vertex(g, c2) {
        return Err(AuthFailure::new("T4: is_cut_vertex(c2) is false"));
    }
    Ok(())
}

fn authenticate_three_component_cut(g: &Graph, vertex: usize) -> Result<(), AuthFailure> {
    let comps = num_comps_after_removal(g, vertex);
    if comps >= 3 {
        Ok(())
    } else {
        Err(AuthFailure::new(format!(
            "three-component-cut: num_comps_after_removal({vertex}) = {comps}, expected >= 3"
        )))
    }
}

fn authenticate_three_cut_vertex_bicomp(
    g: &Graph,
    c1: usize,
    c2: usize,
    c3: usize,
) -> Result<(), AuthFailure> {
    if !(c1 != c2 && c1 != c3 && c2 != c3) {
        return Err(AuthFailure::new(
            "three-cut-vertex-bicomp: c1, c2, c3 are not pairwise distinct",
        ));
    }
    for (name, v) in [("c1", c1), ("c2", c2), ("c3", c3)] {
        if !is_cut_vertex(g, v) {
            return Err(AuthFailure::new(format!("three-cut-vertex-bicomp: is_cut_vertex({name}) is false")));
        }
    }
    if bicomps(g).iter().any(|verts| verts.contains(&c1) && verts.contains(&c2) && verts.contains(&c3)) {
        Ok(())
    } else {
        Err(AuthFailure::new(
            "three-cut-vertex-bicomp: no biconnected component contains c1, c2 and c3",
        ))
    }
}

/// `num_comps_after_removal(v)`: the number of connected components of `g`
/// with `v` and its incident edges deleted. Iterative DFS, one pass per
/// remaining component.
pub fn num_comps_after_removal(g: &Graph, v: usize) -> usize {
    let n = g.n();
    let mut visited = vec![false; n];
    visited[v] = true;
    let mut comps = 0;
    for start in 0..n {
        if visited[start] {
            continue;
        }
        comps += 1;
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(u) = stack.pop() {
            for &w in g.neighbors(u) {
                if w != v && !visited[w] {
                    visited[w] = true;
                    stack.push(w);
                }
            }
        }
    }
    comps
}

/// `is_cut_vertex(v) = num_comps_after_removal(v) >= 2`.
pub fn is_cut_vertex(g: &Graph, v: usize) -> bool {
    num_comps_after_removal(g, v) >= 2
}

/// Freshly derived biconnected components of `g`, each as the set of
/// vertices it spans. Standard low-point DFS with an explicit edge stack,
/// closing a component when `low[u] >= dfs_no[w]` on return from `u` to
/// `w`; run iteratively and restarted for every undiscovered vertex so
/// disconnected inputs are handled too (the core itself never produces a
/// `ThreeCutVertexBicomp` certificate over a disconnected graph, but the
/// authenticator does not get to assume that).
fn bicomps(g: &Graph) -> Vec<HashSet<usize>> {
    let n = g.n();
    let mut dfs_no = vec![NIL; n];
    let mut low = vec![NIL; n];
    let mut parent = vec![NIL; n];
    let mut it = vec![0usize; n];
    let mut edge_stack: Vec<(usize, usize)> = Vec::new();
    let mut comps = Vec::new();
    let mut time = 0usize;

    for root in 0..n {
        if dfs_no[root] != NIL {
            continue;
        }
        dfs_no[root] = time;
        low[root] = time;
        time += 1;
        let mut stack = vec![root];
        while let Some(&u) = stack.last() {
            if it[u] < g.neighbors(u).len() {
                let w = g.neighbors(u)[it[u]];
                it[u] += 1;
                if w == parent[u] {
                    continue;
                }
                if dfs_no[w] == NIL {
                    parent[w] = u;
                    dfs_no[w] = time;
                    low[w] = time;
                    time += 1;
                    edge_stack.push((u, w));
                    stack.push(w);
                } else if dfs_no[w] < dfs_no[u] {
                    low[u] = low[u].min(dfs_no[w]);
                    edge_stack.push((u, w));
                }
            } else {
                stack.pop();
                if let Some(&p) = stack.last() {
                    low[p] = low[p].min(low[u]);
                    if low[u] >= dfs_no[p] {
                        let mut verts = HashSet::new();
                        while let Some(e) = edge_stack.pop() {
                            verts.insert(e.0);
                            verts.insert(e.1);
                            if e == (p, u) {
                                break;
                            }
                        }
                        comps.push(verts);
                    }
                }
            }
        }
    }
    comps
}

/// One pending step of the iterative post-order walk over an [`SpTree`]
/// used by [`authenticate_sp`].
enum Frame<'a> {
    Visit(NodeRef<'a>, bool),
    Combine(Kind),
}

/// Walks the decomposition tree iteratively, reconstructing a graph `g2`
/// from its edge leaves and maintaining per-vertex open-end counters
/// (`n_src`, `n_sink`) and a `no_edge` flag, then compares `g2` against `g`.
///
/// `Antiparallel` nodes are handled by threading a "swap" bit down the walk
/// (flipped for the right child of every `Antiparallel` node encountered, not
/// just the outermost one) rather than assuming the tree has already been
/// passed through [`SpTree::deantiparallelize`] — this authenticator must
/// independently accept a tree the recogniser never ran that pass over.
fn authenticate_sp(tree: &SpTree, g: &Graph) -> Result<(), AuthFailure> {
    let n = g.n();
    let Some(root) = tree.root_ref() else {
        return Err(AuthFailure::new("SP certificate: decomposition tree is empty"));
    };

    let mut g2 = Graph::new(n);
    let mut n_src = vec![0i64; n];
    let mut n_sink = vec![0i64; n];
    let mut no_edge = vec![false; n];

    let mut work = vec![Frame::Visit(root, false)];
    let mut values: Vec<(usize, usize)> = Vec::new();

    while let Some(frame) = work.pop() {
        match frame {
            Frame::Visit(node, swapped) => {
                if node.is_leaf() {
                    let (mut s, mut t) = (node.source(), node.sink());
                    if swapped {
                        std::mem::swap(&mut s, &mut t);
                    }
                    if s >= n || t >= n {
                        return Err(AuthFailure::new(format!(
                            "SP certificate: edge leaf ({s}, {t}) references a vertex outside 0..{n}"
                        )));
                    }
                    if no_edge[s] || no_edge[t] {
                        return Err(AuthFailure::new(format!(
                            "SP certificate: edge leaf ({s}, {t}) incident on a vertex already closed by a series composition"
                        )));
                    }
                    if !g.adjacent(s, t) {
                        return Err(AuthFailure::new(format!(
                            "SP certificate: edge leaf ({s}, {t}) is not an edge of the input graph"
                        )));
                    }
                    g2.add_edge(s, t);
                    n_src[s] += 1;
                    n_sink[t] += 1;
                    values.push((s, t));
                } else {
                    let kind = node.kind();
                    if kind == Kind::Dangling {
                        return Err(AuthFailure::new(
                            "SP certificate: dangling composition is not a valid positive witness",
                        ));
                    }
                    let (Some(l), Some(r)) = (node.left(), node.right()) else {
                        return Err(AuthFailure::new(
                            "SP certificate: internal node has fewer than two children",
                        ));
                    };
                    let right_swapped = swapped ^ (kind == Kind::Antiparallel);
                    work.push(Frame::Combine(kind));
                    work.push(Frame::Visit(r, right_swapped));
                    work.push(Frame::Visit(l, swapped));
                }
            }
            Frame::Combine(kind) => {
                let (sr, tr) = values.pop().expect("right child result missing");
                let (sl, tl) = values.pop().expect("left child result missing");
                match kind {
                    Kind::Series => {
                        if tl != sr {
                            return Err(AuthFailure::new(format!(
                                "SP certificate: series mismatch, left sink {tl} != right source {sr}"
                            )));
                        }
                        let mid = tl;
                        if n_src[mid] != 1 || n_sink[mid] != 1 {
                            return Err(AuthFailure::new(format!(
                                "SP certificate: series middle vertex {mid} has (n_src, n_sink) = ({}, {}), expected (1, 1)",
                                n_src[mid], n_sink[mid]
                            )));
                        }
                        n_src[sl] -= 1;
                        n_sink[mid] -= 1;
                        n_src[mid] -= 1;
                        n_sink[tr] -= 1;
                        no_edge[mid] = true;
                        n_src[sl] += 1;
                        n_sink[tr] += 1;
                        values.push((sl, tr));
                    }
                    Kind::Parallel => {
                        if sl != sr || tl != tr {
                            return Err(AuthFailure::new(format!(
                                "SP certificate: parallel endpoints differ: ({sl}, {tl}) vs ({sr}, {tr})"
                            )));
                        }
                        n_src[sl] -= 2;
                        n_sink[tl] -= 2;
                        n_src[sl] += 1;
                        n_sink[tl] += 1;
                        values.push((sl, tl));
                    }
                    Kind::Antiparallel => {
                        if sl != tr || tl != sr {
                            return Err(AuthFailure::new(format!(
                                "SP certificate: antiparallel endpoints not crossed: ({sl}, {tl}) vs ({sr}, {tr})"
                            )));
                        }
                        n_src[sl] -= 1;
                        n_sink[tl] -= 1;
                        n_src[tl] -= 1;
                        n_sink[sl] -= 1;
                        n_src[sl] += 1;
                        n_sink[tl] += 1;
                        values.push((sl, tl));
                    }
                    Kind::Edge | Kind::Dangling => {
                        unreachable!("leaves and Dangling never reach Combine")
                    }
                }
            }
        }
    }

    let (root_source, root_sink) = values.pop().expect("root result missing");
    n_src[root_source] -= 1;
    n_sink[root_sink] -= 1;

    for v in 0..n {
        if n_src[v] != 0 || n_sink[v] != 0 {
            return Err(AuthFailure::new(format!(
                "SP certificate: vertex {v} has unresolved open ends (n_src = {}, n_sink = {})",
                n_src[v], n_sink[v]
            )));
        }
    }

    for v in 0..n {
        if g.sorted_neighbors(v) != g2.sorted_neighbors(v) {
            return Err(AuthFailure::new(format!(
                "SP certificate: reconstructed adjacency at vertex {v} does not match the input graph"
            )));
        }
    }

    Ok(())
}
