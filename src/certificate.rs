//! C5: certificate kinds.
//!
//! A tagged variant over the five negative obstruction kinds plus the
//! positive SP-decomposition kind, each with a common `authenticate`
//! entry point (see [`crate::authenticator`]). Grounded on the
//! `Component{edges, component_type}` builder idiom this crate's
//! triconnected-components code uses for bundling a classification tag
//! with its supporting edge data.

use crate::sp_tree::SpTree;

/// A sequence of vertices describing a simple walk; `path[i]` is adjacent
/// to `path[i + 1]` in the graph the certificate is checked against.
pub type Path = Vec<usize>;

/// A structural witness for either verdict, independently re-checkable
/// against the original graph by [`crate::authenticator::authenticate`].
#[derive(Debug, Clone)]
pub enum Certificate {
    /// A K4-subdivision: four branch vertices and the six paths between
    /// every pair of them.
    K4 { a: usize, b: usize, c: usize, d: usize, paths: [Path; 6] },
    /// A K2,3-subdivision: two branch vertices and three internally
    /// disjoint paths between them, each of at least two edges.
    K23 { a: usize, b: usize, paths: [Path; 3] },
    /// Theta-4 (T4): two cut vertices `c1, c2` and two further vertices
    /// `a, b`, joined by five paths.
    T4 { c1: usize, c2: usize, a: usize, b: usize, paths: [Path; 5] },
    /// A single vertex whose removal splits the graph into >= 3 pieces.
    ThreeComponentCut { vertex: usize },
    /// Three cut vertices that all belong to the same bicomp.
    ThreeCutVertexBicomp { c1: usize, c2: usize, c3: usize },
    /// A positive witness: the graph is series-parallel, realised by this
    /// decomposition tree.
    Sp(SpTree),
}

impl Certificate {
    pub fn three_component_cut(vertex: usize) -> Self {
        Certificate::ThreeComponentCut { vertex }
    }

    pub fn three_cut_vertex_bicomp(c1: usize, c2: usize, c3: usize) -> Self {
        Certificate::ThreeCutVertexBicomp { c1, c2, c3 }
    }

    /// Short machine-readable name, used in verdict lines and log events.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Certificate::K4 { .. } => "K4",
            Certificate::K23 { .. } => "K23",
            Certificate::T4 { .. } => "T4",
            Certificate::ThreeComponentCut { .. } => "three-component-cut",
            Certificate::ThreeCutVertexBicomp { .. } => "three-cut-vertex-bicomp",
            Certificate::Sp(_) => "SP",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Certificate::Sp(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_name_matches_variant() {
        let c = Certificate::three_component_cut(3);
        assert_eq!(c.kind_name(), "three-component-cut");
        assert!(!c.is_positive());
    }
}
