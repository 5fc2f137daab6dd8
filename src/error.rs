use thiserror::Error;

/// Fatal error conditions for [`crate::count`] and [`crate::count_with_options`].
///
/// Every variant is terminal: the call that raised one returns no partial
/// count, and there is no retry policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HomomorphismError {
    /// The input graph is not simple: it contains a self-loop or a
    /// duplicated (multi-)edge. Only simple undirected graphs are supported.
    #[error("graph is not simple (self-loop or multi-edge at vertex/edge {0:?})")]
    UnsupportedGraph(String),

    /// The nice tree decomposition built from the pattern graph does not
    /// satisfy the tree-decomposition axioms. This indicates a bug in the
    /// tree-decomposition producer or normaliser, never a user error.
    #[error("produced tree decomposition is invalid: {0}")]
    InvalidDecomposition(String),

    /// `colourful` was requested but `graph_clr` or `target_clr` is missing
    /// or does not match the corresponding vertex count.
    #[error("colourful counting requires graph_clr and target_clr matching the vertex counts")]
    MissingColouring,

    /// Failure while importing a graph or tree decomposition from a file.
    /// Not part of the core counting contract; only reachable through the
    /// optional helpers in [`crate::io`].
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for HomomorphismError {
    fn from(e: std::io::Error) -> Self {
        HomomorphismError::Io(e.to_string())
    }
}
