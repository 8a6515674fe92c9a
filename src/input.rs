//! Graph-file reader: external glue, not part of the algorithmic core.
//!
//! Grammar: line 1 is `n e`; the next `e` lines are `u v` edges,
//! `0 <= u, v < n`. Adjacencies are added symmetrically.
//!
//! A malformed graph file is an ordinary, expected failure mode (exit 1
//! with a message), not a bug, so every parse step returns a typed
//! [`GraphParseError`] propagated with `?`, never a panic.
//!
//! Self-loops and duplicate edges are both rejected at parse time rather
//! than silently dropped or deduplicated, since the graph store's
//! invariants disallow them outright (see `DESIGN.md`).

use std::io::BufRead;

use hashbrown::HashSet;

use crate::error::GraphParseError;
use crate::graph::Graph;

/// Reads a graph from `reader` per the grammar in §6.1.
pub fn read_graph<R: BufRead>(reader: R) -> Result<Graph, GraphParseError> {
    let mut lines = reader.lines().enumerate();

    let (line_no, header) = lines.next().ok_or(GraphParseError::TruncatedHeader { line: 1 })?;
    let header = header.map_err(|_| GraphParseError::TruncatedHeader { line: line_no + 1 })?;
    let mut header_tokens = header.split_whitespace();
    let n: usize = header_tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or(GraphParseError::TruncatedHeader { line: line_no + 1 })?;
    let declared_e: usize = header_tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or(GraphParseError::TruncatedHeader { line: line_no + 1 })?;

    let mut g = Graph::new(n);
    let mut seen_edges: HashSet<(usize, usize)> = HashSet::new();
    let mut found = 0usize;

    for (line_no, line) in lines {
        let line =
            line.map_err(|_| GraphParseError::MalformedEdgeLine { line: line_no + 1, text: String::new() })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut tokens = trimmed.split_whitespace();
        let (Some(u_tok), Some(v_tok)) = (tokens.next(), tokens.next()) else {
            return Err(GraphParseError::MalformedEdgeLine {
                line: line_no + 1,
                text: trimmed.to_string(),
            });
        };
        if tokens.next().is_some() {
            return Err(GraphParseError::MalformedEdgeLine {
                line: line_no + 1,
                text: trimmed.to_string(),
            });
        }
        let u: usize = u_tok.parse().map_err(|_| GraphParseError::MalformedEdgeLine {
            line: line_no + 1,
            text: trimmed.to_string(),
        })?;
        let v: usize = v_tok.parse().map_err(|_| GraphParseError::MalformedEdgeLine {
            line: line_no + 1,
            text: trimmed.to_string(),
        })?;

        if u >= n {
            return Err(GraphParseError::VertexOutOfRange { line: line_no + 1, vertex: u, n });
        }
        if v >= n {
            return Err(GraphParseError::VertexOutOfRange { line: line_no + 1, vertex: v, n });
        }
        if u == v {
            return Err(GraphParseError::SelfLoop { line: line_no + 1, vertex: u });
        }
        let key = if u < v { (u, v) } else { (v, u) };
        if !seen_edges.insert(key) {
            return Err(GraphParseError::DuplicateEdge { line: line_no + 1, u, v });
        }

        g.add_edge(u, v);
        found += 1;
    }

    if found != declared_e {
        return Err(GraphParseError::EdgeCountMismatch { declared: declared_e, found });
    }

    Ok(g)
}

/// Reads a graph from a file path.
pub fn read_graph_file(path: &str) -> Result<Graph, GraphParseError> {
    let file = std::fs::File::open(path)
        .map_err(|_| GraphParseError::TruncatedHeader { line: 1 })?;
    read_graph(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(s: &str) -> Result<Graph, GraphParseError> {
        read_graph(Cursor::new(s))
    }

    #[test]
    fn reads_a_simple_path() {
        let g = read("4 3\n0 1\n1 2\n2 3\n").unwrap();
        assert_eq!(g.n(), 4);
        assert_eq!(g.edge_count(), 3);
        assert!(g.adjacent(0, 1));
        assert!(g.adjacent(1, 0));
    }

    #[test]
    fn rejects_self_loop() {
        let err = read("2 1\n0 0\n").unwrap_err();
        assert_eq!(err, GraphParseError::SelfLoop { line: 2, vertex: 0 });
    }

    #[test]
    fn rejects_duplicate_edge() {
        let err = read("2 2\n0 1\n0 1\n").unwrap_err();
        assert_eq!(err, GraphParseError::DuplicateEdge { line: 3, u: 0, v: 1 });
    }

    #[test]
    fn rejects_duplicate_edge_given_reversed() {
        let err = read("2 2\n0 1\n1 0\n").unwrap_err();
        assert_eq!(err, GraphParseError::DuplicateEdge { line: 3, u: 1, v: 0 });
    }

    #[test]
    fn rejects_vertex_out_of_range() {
        let err = read("2 1\n0 5\n").unwrap_err();
        assert_eq!(err, GraphParseError::VertexOutOfRange { line: 2, vertex: 5, n: 2 });
    }

    #[test]
    fn rejects_edge_count_mismatch() {
        let err = read("3 2\n0 1\n").unwrap_err();
        assert_eq!(err, GraphParseError::EdgeCountMismatch { declared: 2, found: 1 });
    }

    #[test]
    fn rejects_truncated_header() {
        assert_eq!(read("3\n").unwrap_err(), GraphParseError::TruncatedHeader { line: 1 });
        assert_eq!(read("").unwrap_err(), GraphParseError::TruncatedHeader { line: 1 });
    }

    #[test]
    fn rejects_malformed_edge_line() {
        let err = read("2 1\nnotanumber 1\n").unwrap_err();
        assert!(matches!(err, GraphParseError::MalformedEdgeLine { line: 2, .. }));
    }
}
