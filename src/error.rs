//! Crate-wide error types.
//!
//! Recognition itself cannot fail (a negative certificate is a successful
//! outcome, not an error); only graph-file parsing and certificate
//! authentication surface [`SpError`].

use thiserror::Error;

/// Failure to parse an adjacency-list graph file (see the grammar in
/// [`crate::input`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphParseError {
    #[error("line {line}: expected 'n e' header")]
    TruncatedHeader { line: usize },
    #[error("line {line}: expected 'u v' edge, got {text:?}")]
    MalformedEdgeLine { line: usize, text: String },
    #[error("line {line}: vertex {vertex} out of range for n = {n}")]
    VertexOutOfRange { line: usize, vertex: usize, n: usize },
    #[error("line {line}: self-loop on vertex {vertex} is not a simple graph")]
    SelfLoop { line: usize, vertex: usize },
    #[error("line {line}: duplicate edge ({u}, {v})")]
    DuplicateEdge { line: usize, u: usize, v: usize },
    #[error("header declared {declared} edges but {found} were read")]
    EdgeCountMismatch { declared: usize, found: usize },
}

/// A certificate failed re-verification against the input graph.
///
/// Carries the name of the specific sub-check that failed, per the
/// `AUTH FAILED <sub-check>` contract.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("AUTH FAILED: {sub_check}")]
pub struct AuthFailure {
    pub sub_check: String,
}

impl AuthFailure {
    pub fn new(sub_check: impl Into<String>) -> Self {
        Self { sub_check: sub_check.into() }
    }
}

/// Top-level error type for the `sp_cert` binaries.
#[derive(Debug, Error)]
pub enum SpError {
    #[error(transparent)]
    Parse(#[from] GraphParseError),
    #[error(transparent)]
    Auth(#[from] AuthFailure),
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}
