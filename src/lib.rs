//! Counts graph homomorphisms `φ: V(G) → V(H)` from a pattern graph `G` to a
//! target graph `H` via dynamic programming over a nice tree decomposition
//! of `G`, following Díaz, Serna & Thilikos's tree-decomposition DP.
//!
//! ```
//! use counting_homomorphisms::{count, Graph};
//!
//! let triangle = Graph::try_new(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();
//! let edge = Graph::try_new(2, &[(0, 1)]).unwrap();
//! // no homomorphism from a triangle into a single edge
//! assert!(count(&triangle, &edge).unwrap() == 0u32.into());
//! ```

mod dp;
mod error;
mod graph;
mod integer_functions;
pub mod io;
mod td_producer;
mod tree_decompositions;

pub use crate::dp::dp::CountOptions;
pub use crate::error::HomomorphismError;
pub use crate::graph::graph::Graph;
pub use crate::tree_decompositions::nice_tree_decomposition::NiceTreeDecomposition;

use num_bigint::BigUint;
use tracing::instrument;

/// Counts homomorphisms from `pattern` into `target` with default options
/// (`density_threshold = 0.5`, `colourful = false`).
#[instrument(skip(pattern, target))]
pub fn count(pattern: &Graph, target: &Graph) -> Result<BigUint, HomomorphismError> {
    count_with_options(pattern, target, CountOptions::default())
}

/// Counts homomorphisms from `pattern` into `target`, with `options`
/// controlling the target's dense-matrix threshold and the optional
/// colour-preserving filter.
#[instrument(skip(pattern, target, options))]
pub fn count_with_options(
    pattern: &Graph,
    target: &Graph,
    options: CountOptions,
) -> Result<BigUint, HomomorphismError> {
    let mut target = target.clone();
    target.densify_if_above(options.density_threshold);

    let ntd = NiceTreeDecomposition::build(pattern)?;
    dp::dp::count(pattern, &target, &ntd, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_homomorphisms_from_a_single_vertex() {
        let pattern = Graph::try_new(1, &[]).unwrap();
        let target = Graph::try_new(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(count(&pattern, &target).unwrap(), BigUint::from(3u32));
    }

    #[test]
    fn counts_homomorphisms_of_an_edge_into_a_triangle() {
        let pattern = Graph::try_new(2, &[(0, 1)]).unwrap();
        let target = Graph::try_new(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();
        assert_eq!(count(&pattern, &target).unwrap(), BigUint::from(6u32));
    }

    #[test]
    fn rejects_a_pattern_with_a_self_loop() {
        let pattern = Graph::try_new(1, &[(0, 0)]);
        assert!(pattern.is_err());
    }

    #[test]
    fn default_and_explicit_options_agree() {
        let pattern = Graph::try_new(3, &[(0, 1), (1, 2)]).unwrap();
        let target = Graph::try_new(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let a = count(&pattern, &target).unwrap();
        let b = count_with_options(&pattern, &target, CountOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn dense_target_path_agrees_with_sparse_path() {
        let pattern = Graph::try_new(3, &[(0, 1), (1, 2)]).unwrap();
        let target = Graph::try_new(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]).unwrap();
        let sparse = count_with_options(
            &pattern,
            &target,
            CountOptions {
                density_threshold: 2.0,
                ..CountOptions::default()
            },
        )
        .unwrap();
        let dense = count_with_options(
            &pattern,
            &target,
            CountOptions {
                density_threshold: 0.0,
                ..CountOptions::default()
            },
        )
        .unwrap();
        assert_eq!(sparse, dense);
    }
}
