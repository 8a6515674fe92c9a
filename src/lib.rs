#![warn(missing_docs)]

//! # sp_cert
//!
//! Decides whether an undirected simple graph is series-parallel and emits
//! a certificate independently checkable by [`authenticator::authenticate`]
//! against the original graph — the recogniser itself is trusted only
//! insofar as a separate authenticator can re-derive its verdict.
//!
//! Dependency order of the core: [`graph`] (C1) underlies [`sp_tree`] (C2),
//! which [`block_cut`] (C3) and [`recognizer`] (C4) build into a
//! [`certificate::Certificate`] (C5), checked by [`authenticator`] (C6).
//! [`input`], [`output`] and [`generator`] are external collaborators: glue
//! around the algorithmic core, not part of it.

pub mod authenticator;
pub mod block_cut;
pub mod certificate;
pub mod error;
pub mod generator;
pub mod graph;
pub mod input;
pub mod output;
pub mod recognizer;
pub mod sp_tree;

#[cfg(any(test, feature = "testing-helpers"))]
pub mod testing;

use certificate::Certificate;
use error::AuthFailure;
use graph::Graph;

/// Runs the full pipeline (C3 → C4 → C5) on `g`, returning whichever
/// certificate — positive or negative — the recogniser produces.
///
/// `g` must be connected; block decomposition (C3) assumes a single DFS
/// tree rooted at vertex 0 spans every vertex.
#[tracing::instrument(level = "debug", skip(g), fields(n = g.n(), e = g.edge_count()))]
pub fn decide(g: &Graph) -> Certificate {
    match block_cut::decompose(g).into_certificate() {
        Err(cert) => {
            tracing::debug!(kind = cert.kind_name(), "block decomposition found a negative witness");
            cert
        }
        Ok(chain) => match recognizer::recognize(g, &chain) {
            Ok(tree) => {
                tracing::debug!("recognizer completed with a positive decomposition tree");
                Certificate::Sp(tree)
            }
            Err(cert) => {
                tracing::debug!(kind = cert.kind_name(), "recognizer found a negative witness");
                cert
            }
        },
    }
}

/// Runs [`decide`] and then authenticates the result against `g`, per §1's
/// "trusted only insofar as ... re-verify" design. `Ok` carries the
/// certificate that was produced and independently confirmed.
#[tracing::instrument(level = "debug", skip(g))]
pub fn decide_and_authenticate(g: &Graph) -> Result<Certificate, AuthFailure> {
    let cert = decide(g);
    authenticator::authenticate(&cert, g)?;
    Ok(cert)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_authenticates_as_sp() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let cert = decide_and_authenticate(&g).unwrap();
        assert!(cert.is_positive());
    }

    #[test]
    fn four_cycle_authenticates_as_sp() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let cert = decide_and_authenticate(&g).unwrap();
        assert!(cert.is_positive());
    }

    #[test]
    fn two_triangles_sharing_a_vertex_authenticate_as_three_component_cut() {
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 0)]);
        // Two bicomps through one cut vertex: fine for SP, NOT a three-component-cut.
        let cert = decide_and_authenticate(&g).unwrap();
        assert!(cert.is_positive());
    }

    #[test]
    fn three_triangles_sharing_one_vertex_authenticate_as_three_component_cut() {
        let g = Graph::from_edges(
            7,
            &[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 0), (0, 5), (5, 6), (6, 0)],
        );
        let cert = decide_and_authenticate(&g).unwrap();
        assert_eq!(cert.kind_name(), "three-component-cut");
    }

    #[test]
    fn k4_authenticates_as_a_negative_witness() {
        let g = Graph::from_edges(
            4,
            &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
        );
        let cert = decide_and_authenticate(&g).unwrap();
        assert!(!cert.is_positive());
    }
}
