//! Verdict and edge-list printing: external glue, not part of the
//! algorithmic core.
//!
//! Grounded on §6: the recogniser-authenticator prints a one-line verdict
//! (`SP` / `NOT SP`) followed by a short structured reason; the generator
//! prints `n e` then a reshuffled edge list.

use std::fmt::Write as _;

use crate::certificate::Certificate;

/// The `SP` / `NOT SP` verdict line plus a short structured reason, per §6.
pub fn verdict_line(cert: &Certificate) -> String {
    match cert {
        Certificate::Sp(_) => "SP".to_string(),
        other => format!("NOT SP: {}", reason(other)),
    }
}

fn reason(cert: &Certificate) -> String {
    match cert {
        Certificate::K4 { a, b, c, d, .. } => {
            format!("K4-subdivision on branch vertices {{{a}, {b}, {c}, {d}}}")
        }
        Certificate::K23 { a, b, .. } => {
            format!("K2,3-subdivision on branch vertices {{{a}, {b}}}")
        }
        Certificate::T4 { c1, c2, a, b, .. } => {
            format!("Theta-4 on cut vertices {{{c1}, {c2}}} and branch vertices {{{a}, {b}}}")
        }
        Certificate::ThreeComponentCut { vertex } => {
            format!("vertex {vertex} splits the graph into at least three components")
        }
        Certificate::ThreeCutVertexBicomp { c1, c2, c3 } => {
            format!("cut vertices {{{c1}, {c2}, {c3}}} all anchor the same biconnected component")
        }
        Certificate::Sp(_) => unreachable!("handled by verdict_line"),
    }
}

/// Renders `(n, edges)` in the input grammar of §6.1, for the generator.
pub fn format_graph(n: usize, edges: &[(usize, usize)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{n} {}", edges.len());
    for &(u, v) in edges {
        let _ = writeln!(out, "{u} {v}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sp_tree::SpTree;

    #[test]
    fn positive_verdict_is_just_sp() {
        assert_eq!(verdict_line(&Certificate::Sp(SpTree::leaf(0, 1))), "SP");
    }

    #[test]
    fn negative_verdict_names_the_kind_and_vertices() {
        let line = verdict_line(&Certificate::three_component_cut(3));
        assert!(line.starts_with("NOT SP: "));
        assert!(line.contains('3'));
    }

    #[test]
    fn format_graph_matches_the_input_grammar() {
        let s = format_graph(3, &[(0, 1), (1, 2)]);
        assert_eq!(s, "3 2\n0 1\n1 2\n");
    }
}
