//! C4: the SP recogniser.
//!
//! For each bicomp produced by [`crate::block_cut`], an iterative DFS
//! maintains an ear structure, a "winning" SP chain per vertex (`seq`), and
//! per-vertex stacks of not-yet-merged chains, building a decomposition
//! tree as the traversal unwinds. Detects K4/K2,3/Θ4 obstructions in
//! flight; bicomps are then stitched together through shared cut vertices
//! into one global certificate.
//!
//! Grounded on this crate's `triconnected.rs` (`tstack`/`estack`-driven,
//! explicit-stack bookkeeping around a DFS) for the general shape of
//! "maintain several interacting stacks alongside an iterative DFS", and
//! on `palm_tree.rs`'s low/rank computation for the ear/DFS-number
//! machinery it generalizes.
//!
//! **Witness construction.** The four/two/five branch vertices a witness
//! names (§4.4.a/§4.4.b) are derived from the ear/seq bookkeeping below,
//! but the *paths between them* are built by a breadth-first search over
//! the real graph (`graph_path_avoiding`/`path_with_interior`), threading a
//! "used" vertex set across the whole witness so every path is genuinely
//! internally disjoint from its siblings — a tree-climb between two branch
//! vertices almost always passes straight through a *third* one (`c` sits
//! on the plain `parent`-chain between `a` and `d` whenever `a` is `c`'s
//! descendant and `d` its ancestor), which the authenticator's shared
//! `seen` set and branch-vertex check both reject outright. Searching the
//! real graph sidesteps that without needing to reproduce the source's
//! exact edge-stack bookkeeping; the `tree_path` climb is kept only as a
//! last-resort fallback when the graph search turns up nothing (see
//! `DESIGN.md`).

use hashbrown::{HashMap, HashSet};
use std::collections::VecDeque;

use crate::block_cut::Bicomp;
use crate::certificate::{Certificate, Path};
use crate::graph::Graph;
use crate::sp_tree::{Kind, SpTree};

const NIL: usize = usize::MAX;

struct StackEntry {
    sp: SpTree,
    end: usize,
    tail: SpTree,
}

/// Per-bicomp DFS state, indexed by global vertex id; entries for
/// vertices outside the current bicomp are never read.
struct BicompState {
    dfs_no: Vec<usize>,
    parent: Vec<usize>,
    ear: Vec<(usize, usize)>,
    seq: Vec<Option<SpTree>>,
    earliest_outgoing: Vec<usize>,
    alert: Vec<usize>,
    vertex_stacks: Vec<Vec<StackEntry>>,
}

impl BicompState {
    fn new(n: usize) -> Self {
        Self {
            dfs_no: vec![NIL; n],
            parent: vec![NIL; n],
            ear: vec![(NIL, NIL); n],
            seq: vec![None; n],
            earliest_outgoing: vec![NIL; n],
            alert: vec![NIL; n],
            vertex_stacks: (0..n).map(|_| Vec::new()).collect(),
        }
    }

    fn rank(&self, v: usize) -> usize {
        if v == NIL {
            usize::MAX
        } else {
            self.dfs_no[v]
        }
    }
}

/// Nearest-common-ancestor tree path between `u` and `v`, via `parent`.
/// Always returns a valid vertex sequence; when `u`/`v` are not in an
/// ancestor relationship with each other, the path simply passes through
/// their lowest common ancestor. Kept only as a fallback for
/// [`build_k4`]/[`build_k23`]/[`build_t4`] when a real-graph search finds
/// no remaining disjoint route (see `DESIGN.md`): on its own it frequently
/// routes through a third branch vertex, which is exactly the defect a
/// real-graph search avoids.
fn tree_path(state: &BicompState, mut u: usize, mut v: usize) -> Path {
    let mut up = vec![u];
    let mut vp = vec![v];
    while state.dfs_no[u] != state.dfs_no[v] {
        if state.rank(u) > state.rank(v) {
            u = state.parent[u];
            up.push(u);
        } else {
            v = state.parent[v];
            vp.push(v);
        }
    }
    vp.pop();
    vp.reverse();
    up.extend(vp);
    up
}

/// Shortest path from `from` to `to` in `g` whose interior vertices avoid
/// every vertex in `forbidden`. Used to build certificate witnesses whose
/// paths are genuinely internally disjoint from one another, independent
/// of whatever tree/ear bookkeeping identified the branch vertices in the
/// first place.
fn graph_path_avoiding(
    g: &Graph,
    from: usize,
    to: usize,
    forbidden: &HashSet<usize>,
) -> Option<Path> {
    if from == to {
        return Some(vec![from]);
    }
    let n = g.n();
    let mut visited = vec![false; n];
    let mut prev = vec![NIL; n];
    visited[from] = true;
    let mut queue = VecDeque::new();
    queue.push_back(from);
    while let Some(u) = queue.pop_front() {
        if u == to {
            break;
        }
        for &w in g.neighbors(u) {
            if visited[w] || (w != to && forbidden.contains(&w)) {
                continue;
            }
            visited[w] = true;
            prev[w] = u;
            queue.push_back(w);
        }
    }
    if !visited[to] {
        return None;
    }
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur];
        path.push(cur);
    }
    path.reverse();
    Some(path)
}

/// As [`graph_path_avoiding`], but additionally refuses the direct edge
/// `from -> to` as a whole path: a K2,3 witness needs every path to carry
/// at least one interior vertex (§4.5).
fn path_with_interior(
    g: &Graph,
    from: usize,
    to: usize,
    forbidden: &HashSet<usize>,
) -> Option<Path> {
    let n = g.n();
    let mut visited = vec![false; n];
    let mut prev = vec![NIL; n];
    visited[from] = true;
    let mut queue = VecDeque::new();
    queue.push_back(from);
    while let Some(u) = queue.pop_front() {
        if u == to {
            break;
        }
        for &w in g.neighbors(u) {
            if u == from && w == to {
                continue;
            }
            if visited[w] || (w != to && forbidden.contains(&w)) {
                continue;
            }
            visited[w] = true;
            prev[w] = u;
            queue.push_back(w);
        }
    }
    if !visited[to] {
        return None;
    }
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur];
        path.push(cur);
    }
    path.reverse();
    Some(path)
}

/// Builds a K4 witness: six paths among the four branch vertices, each
/// routed through `g` avoiding the other branch vertices and every
/// interior vertex an earlier path in this witness already claimed.
fn build_k4(g: &Graph, st: &BicompState, a: usize, b: usize, w: usize) -> Certificate {
    let c = w;
    let d = {
        let p = st.parent[w];
        if p == NIL { c } else { p }
    };
    let branch = [a, b, c, d];
    let pairs = [(a, b), (a, c), (a, d), (b, c), (b, d), (c, d)];
    let mut used: HashSet<usize> = HashSet::new();
    let mut paths: Vec<Path> = Vec::with_capacity(6);
    for &(x, y) in &pairs {
        let forbidden: HashSet<usize> = used
            .iter()
            .copied()
            .chain(branch.iter().copied().filter(|v| *v != x && *v != y))
            .collect();
        let path = graph_path_avoiding(g, x, y, &forbidden).unwrap_or_else(|| tree_path(st, x, y));
        for &v in &path[1..path.len().saturating_sub(1)] {
            used.insert(v);
        }
        paths.push(path);
    }
    Certificate::K4 { a, b, c, d, paths: paths.try_into().expect("six K4 paths by construction") }
}

/// Builds a K2,3 witness: three paths between `a` and `b`, each with at
/// least one interior vertex and no interior vertex shared with another
/// path of the same witness.
fn build_k23(g: &Graph, st: &BicompState, a: usize, b: usize) -> Certificate {
    let mut used: HashSet<usize> = HashSet::new();
    let mut paths: Vec<Path> = Vec::with_capacity(3);
    for _ in 0..3 {
        let path = path_with_interior(g, a, b, &used).unwrap_or_else(|| tree_path(st, a, b));
        for &v in &path[1..path.len().saturating_sub(1)] {
            used.insert(v);
        }
        paths.push(path);
    }
    Certificate::K23 { a, b, paths: paths.try_into().expect("three K23 paths by construction") }
}

/// Builds a Θ4 witness: five paths among `c1, c2, a, b` — no direct path
/// between the two cut vertices is required, which is what distinguishes
/// Θ4 from K4 (§4.5) — each internally disjoint from the others.
fn build_t4(g: &Graph, c1: usize, c2: usize, a: usize, b: usize) -> Certificate {
    let branch = [c1, c2, a, b];
    let pairs = [(c1, a), (c2, a), (c1, b), (c2, b), (a, b)];
    let mut used: HashSet<usize> = HashSet::new();
    let mut paths: Vec<Path> = Vec::with_capacity(5);
    for &(x, y) in &pairs {
        let forbidden: HashSet<usize> = used
            .iter()
            .copied()
            .chain(branch.iter().copied().filter(|v| *v != x && *v != y))
            .collect();
        // Best-effort fallback: a direct edge. `rewrite_k4_to_t4` only
        // reaches here for vertices that a just-detected K4 already
        // proved are connected through `g`, so a route normally exists.
        let path = graph_path_avoiding(g, x, y, &forbidden).unwrap_or_else(|| vec![x, y]);
        for &v in &path[1..path.len().saturating_sub(1)] {
            used.insert(v);
        }
        paths.push(path);
    }
    Certificate::T4 { c1, c2, a, b, paths: paths.try_into().expect("five T4 paths by construction") }
}

/// Runs C4 over one bicomp, returning the SP-tree spanning it (rooted at
/// `bicomp.root`) or a negative certificate.
///
/// If the bicomp was seeded with a fake edge (§4.4 "Fake edge") and the
/// first pass's K4 witness names both fake-edge endpoints as branch
/// vertices, the bicomp is re-run once with per-vertex state cleared
/// (§4.4.c's "bicomp index decremented... per-vertex state cleared") before
/// the diagnosis is finalised as a Θ4 witness naming the fake edge's two
/// endpoints as the cut vertices.
fn run_bicomp(g: &Graph, bicomp: &Bicomp) -> Result<SpTree, Certificate> {
    match run_bicomp_once(g, bicomp, true) {
        Err(Certificate::K4 { a, b, c, d, paths }) => {
            if let Some(fake) = fake_edge(g, bicomp) {
                let branch = [a, b, c, d];
                if branch.contains(&fake.0) && branch.contains(&fake.1) {
                    return match run_bicomp_once(g, bicomp, false) {
                        Err(Certificate::K4 { a, b, c, d, .. }) => {
                            Err(rewrite_k4_to_t4(g, fake, a, b, c, d))
                        }
                        other => other,
                    };
                }
            }
            Err(Certificate::K4 { a, b, c, d, paths })
        }
        other => other,
    }
}

/// The fake edge a bicomp's DFS was seeded with, if C3's chosen second
/// vertex is not actually adjacent to `bicomp.root` (§4.4 "Fake edge").
fn fake_edge(g: &Graph, bicomp: &Bicomp) -> Option<(usize, usize)> {
    if g.adjacent(bicomp.seed_edge.0, bicomp.seed_edge.1) {
        None
    } else {
        Some(bicomp.seed_edge)
    }
}

/// Rewrites a K4 witness that implicates a bicomp's fake edge into the
/// Θ4 (T4) kind per §4.4.c: the fake edge's two endpoints become the two
/// cut vertices, the other two K4 branch vertices carry over unchanged.
fn rewrite_k4_to_t4(g: &Graph, fake: (usize, usize), a: usize, b: usize, c: usize, d: usize) -> Certificate {
    let set = [a, b, c, d];
    let (c1, c2) = fake;
    let mut others = set.iter().copied().filter(|v| *v != c1 && *v != c2);
    let ta = others.next().unwrap_or(c1);
    let tb = others.next().unwrap_or(c2);
    build_t4(g, c1, c2, ta, tb)
}

/// One DFS pass over a bicomp. `prefer_seed` controls whether `root`'s
/// neighbour order prioritises the bicomp's seed edge — the lever
/// [`run_bicomp`]'s re-run flips after a fake-edge-implicated K4, per
/// §4.4.c's "per-vertex state cleared" re-derivation (a fresh
/// [`BicompState`] is always built here, so state is cleared either way).
fn run_bicomp_once(g: &Graph, bicomp: &Bicomp, prefer_seed: bool) -> Result<SpTree, Certificate> {
    let n = g.n();
    let mut st = BicompState::new(n);
    let root = bicomp.root;
    let fake = fake_edge(g, bicomp);

    st.dfs_no[root] = 0;
    st.seq[root] = Some(SpTree::empty());
    let mut time = 1usize;

    // Visit order per vertex: for `root`, the seed edge's second endpoint
    // first (if it is a real neighbour and `prefer_seed` is set), then the
    // rest in adjacency order.
    let neighbor_order = |v: usize| -> Vec<usize> {
        if v == root && prefer_seed {
            let mut order = Vec::with_capacity(g.degree(v));
            if fake.is_none() && g.adjacent(root, bicomp.seed_edge.1) {
                order.push(bicomp.seed_edge.1);
            }
            for &w in g.neighbors(v) {
                if !order.contains(&w) {
                    order.push(w);
                }
            }
            order
        } else {
            g.neighbors(v).to_vec()
        }
    };

    let mut it = vec![0usize; n];
    let mut adj_cache: HashMap<usize, Vec<usize>> = HashMap::new();
    adj_cache.insert(root, neighbor_order(root));
    let mut stack = vec![root];

    while let Some(&u) = stack.last() {
        let adj = adj_cache.entry(u).or_insert_with(|| g.neighbors(u).to_vec());
        if it[u] < adj.len() {
            let v = adj[it[u]];
            it[u] += 1;
            if v == st.parent[u] {
                continue;
            }
            if st.dfs_no[v] == NIL {
                st.parent[v] = u;
                st.dfs_no[v] = time;
                time += 1;
                st.seq[v] = Some(SpTree::empty());
                st.ear[v] = (NIL, NIL);
                stack.push(v);
            } else if st.dfs_no[v] < st.dfs_no[u] {
                // Back edge u -> v.
                let seq_u = SpTree::leaf(u, v);
                let ear_f = (v, u);
                update_ear_of_parent(g, &mut st, u, ear_f, seq_u, true)?;
            }
        } else {
            stack.pop();
            let w = st.parent[u];
            if w != NIL {
                update_seq(g, &mut st, u, w)?;
                let seq_u = st.seq[u].take().unwrap_or_else(SpTree::empty);
                let ear_f = st.ear[u];
                update_ear_of_parent(g, &mut st, w, ear_f, seq_u, false)?;
            }
            pop_vertex(&mut st, u, w, root);
        }
    }

    Ok(st.seq[root].take().unwrap_or_else(SpTree::empty))
}

/// Merges the returning child's chain with `w`'s pending stack entries.
fn update_seq(g: &Graph, st: &mut BicompState, u: usize, w: usize) -> Result<(), Certificate> {
    loop {
        let top_end = match st.vertex_stacks[w].last() {
            Some(e) => e.end,
            None => break,
        };
        let seq_u_source = st.seq[u].as_ref().map(|t| t.source());
        if seq_u_source != Some(top_end) {
            let a = top_end;
            let b = seq_u_source.unwrap_or(u);
            return Err(build_k4(g, st, a, b, w));
        }
        let entry = st.vertex_stacks[w].pop().unwrap();
        let mut seq_u = st.seq[u].take().unwrap_or_else(SpTree::empty);
        seq_u = seq_u.compose(entry.sp, Kind::Antiparallel);
        seq_u = seq_u.l_compose(entry.tail, Kind::Series);
        st.seq[u] = Some(seq_u);
    }
    Ok(())
}

/// Incorporates a child's (or back edge's) ear/seq into `w`'s own.
///
/// `incoming_is_back_edge` is set exactly when this merge was triggered by
/// a back edge rather than a tree-edge return; per §4.4 CASE A/C step 2,
/// the K2,3 test only runs for tree-edge returns.
fn update_ear_of_parent(
    g: &Graph,
    st: &mut BicompState,
    w: usize,
    ear_f: (usize, usize),
    seq_u: SpTree,
    incoming_is_back_edge: bool,
) -> Result<(), Certificate> {
    let incoming_ear_rank = st.rank(ear_f.1);
    let current_ear_rank = st.rank(st.ear[w].1);

    if incoming_ear_rank < current_ear_rank {
        // CASE B.
        if st.ear[w].0 != NIL {
            if let Some(winner) = st.seq[w].as_ref() {
                if winner.sink() != w && winner.source() != w {
                    run_k23_test(g, st, st.ear[w], w)?;
                }
            }
        }
        let expect_source = st.ear[w].1;
        if expect_source != NIL {
            if let Some(cur) = st.seq[w].as_ref() {
                if cur.source() != expect_source {
                    return Err(build_k4(g, st, expect_source, cur.source(), w));
                }
            }
        }
        let prev_seq = st.seq[w].take().unwrap_or_else(SpTree::empty);
        if st.ear[w].1 != NIL {
            st.vertex_stacks[st.ear[w].1].push(StackEntry {
                sp: prev_seq,
                end: w,
                tail: SpTree::empty(),
            });
        }
        st.earliest_outgoing[w] = st.ear[w].1;
        st.ear[w] = ear_f;
        st.seq[w] = Some(seq_u);
    } else if incoming_ear_rank == current_ear_rank && ear_f.1 != NIL {
        // CASE C.
        if seq_u.source() != ear_f.1 {
            return Err(build_k4(g, st, ear_f.1, seq_u.source(), w));
        }
        if let Some(cur) = st.seq[w].as_ref() {
            if cur.source() != st.ear[w].1 {
                return Err(build_k4(g, st, st.ear[w].1, cur.source(), w));
            }
        }
        if !incoming_is_back_edge {
            run_k23_test(g, st, ear_f, w)?;
        }
        let cur = st.seq[w].take().unwrap_or_else(SpTree::empty);
        st.seq[w] = Some(cur.compose(seq_u, Kind::Parallel));
        if st.rank(ear_f.0) < st.rank(st.ear[w].0) {
            st.ear[w] = ear_f;
        }
    } else {
        // CASE A.
        if seq_u.source() != ear_f.1 {
            return Err(build_k4(g, st, ear_f.1, seq_u.source(), w));
        }
        if !incoming_is_back_edge {
            run_k23_test(g, st, ear_f, w)?;
        }
        let anc = ear_f.1;
        let top_matches = st.vertex_stacks[anc].last().map(|e| e.end) == Some(w);
        if anc != NIL && top_matches {
            let entry = st.vertex_stacks[anc].pop().unwrap();
            let merged = entry.sp.compose(seq_u, Kind::Parallel);
            st.vertex_stacks[anc].push(StackEntry { sp: merged, end: w, tail: entry.tail });
        } else if anc != NIL {
            st.vertex_stacks[anc].push(StackEntry { sp: seq_u, end: w, tail: SpTree::empty() });
            if st.rank(anc) < st.rank(st.earliest_outgoing[w]) {
                st.earliest_outgoing[w] = anc;
            }
        }
    }
    Ok(())
}

fn pop_vertex(st: &mut BicompState, w: usize, parent: usize, bicomp_root: usize) {
    if w == bicomp_root || parent == NIL {
        return;
    }
    if st.earliest_outgoing[w] != NIL {
        let dest = st.earliest_outgoing[w];
        if let Some(top) = st.vertex_stacks[dest].last_mut() {
            top.tail = st.seq[w].take().unwrap_or_else(SpTree::empty);
        }
    }
    let seq_w = st.seq[w].take().unwrap_or_else(SpTree::empty);
    if parent == bicomp_root {
        let joined = seq_w.compose(SpTree::leaf(parent, w), Kind::Parallel);
        st.seq[parent] = Some(match st.seq[parent].take() {
            Some(existing) => existing.compose(joined, Kind::Series),
            None => joined,
        });
    } else {
        let joined = seq_w.compose(SpTree::leaf(w, parent), Kind::Series);
        st.seq[parent] = Some(match st.seq[parent].take() {
            Some(existing) => existing.compose(joined, Kind::Series),
            None => joined,
        });
    }
}

/// §4.4.b: called with `(found_ear, w)` when admitting a new ear while an
/// older one exists. Both branches emit the same kind of witness (a K2,3
/// between `w` and the relevant ancestor); the two sub-cases differ only
/// in which ancestor that is, never in how the witness is built.
fn run_k23_test(
    g: &Graph,
    st: &mut BicompState,
    found_ear: (usize, usize),
    w: usize,
) -> Result<(), Certificate> {
    if found_ear.1 != st.parent[w] && found_ear.1 != NIL {
        let a = w;
        let b = found_ear.1;
        return Err(build_k23(g, st, a, b));
    }
    if st.alert[w] != NIL {
        let a = w;
        let b = found_ear.1;
        return Err(build_k23(g, st, a, b));
    }
    st.alert[w] = found_ear.0;
    Ok(())
}

/// Runs C4 over every bicomp in chain order, stitching results through
/// shared cut vertices with a series composition. `block_cut::decompose`
/// orders the chain so each bicomp's attachment point (`root`) is the
/// previous bicomp's far end, so a plain left-to-right series fold is
/// enough.
pub fn recognize(g: &Graph, chain: &[Bicomp]) -> Result<SpTree, Certificate> {
    let mut overall: Option<SpTree> = None;
    for bicomp in chain {
        let local = run_bicomp(g, bicomp)?;
        overall = Some(match overall.take() {
            None => local,
            Some(acc) => acc.compose(local, Kind::Series),
        });
    }

    let mut tree = overall.unwrap_or_else(SpTree::empty);
    tree.deantiparallelize();
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_cut;

    #[test]
    fn path_of_three_edges_recognises_as_sp() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let chain = match block_cut::decompose(&g) {
            block_cut::Decomposition::Chain(b) => b,
            other => panic!("expected chain, got {other:?}"),
        };
        let result = recognize(&g, &chain);
        assert!(result.is_ok());
    }

    #[test]
    fn four_cycle_recognises_as_sp() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let chain = match block_cut::decompose(&g) {
            block_cut::Decomposition::Chain(b) => b,
            other => panic!("expected chain, got {other:?}"),
        };
        let result = recognize(&g, &chain);
        assert!(result.is_ok());
    }

    #[test]
    fn k4_witness_paths_are_internally_disjoint() {
        let g = Graph::from_edges(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        let chain = match block_cut::decompose(&g) {
            block_cut::Decomposition::Chain(b) => b,
            other => panic!("expected chain, got {other:?}"),
        };
        let cert = recognize(&g, &chain).expect_err("K4 is not series-parallel");
        assert!(crate::authenticator::authenticate(&cert, &g).is_ok());
    }

    #[test]
    fn k23_witness_paths_are_internally_disjoint() {
        let g = Graph::from_edges(5, &[(0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4)]);
        let chain = match block_cut::decompose(&g) {
            block_cut::Decomposition::Chain(b) => b,
            other => panic!("expected chain, got {other:?}"),
        };
        let cert = recognize(&g, &chain).expect_err("K2,3 is not series-parallel");
        assert!(crate::authenticator::authenticate(&cert, &g).is_ok());
    }
}
