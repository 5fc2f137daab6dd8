/// A simple, undirected graph on dense vertices `0..n`.
///
/// Holds a sparse adjacency list always, plus an optional dense adjacency
/// matrix built on request (used as the target graph's hot-path edge test
/// once its density crosses the configured threshold, trading memory for
/// O(1) edge checks during the DP's inner loop).
pub mod graph {
    use crate::error::HomomorphismError;
    use std::collections::HashSet;

    pub type Vertex = u32;

    #[derive(Debug, Clone)]
    pub struct Graph {
        adjacency: Vec<HashSet<Vertex>>,
        edge_count: usize,
        dense: Option<Vec<bool>>,
    }

    impl Graph {
        /// Builds a graph on `n` vertices from an edge list. Rejects
        /// self-loops and duplicated edges with `UnsupportedGraph`; disconnected
        /// graphs and isolated vertices are accepted.
        pub fn try_new(n: usize, edges: &[(Vertex, Vertex)]) -> Result<Graph, HomomorphismError> {
            let mut adjacency: Vec<HashSet<Vertex>> = vec![HashSet::new(); n];
            let mut edge_count = 0usize;

            for &(u, v) in edges {
                let (u, v) = (u as usize, v as usize);
                if u >= n || v >= n {
                    return Err(HomomorphismError::UnsupportedGraph(format!(
                        "edge ({u}, {v}) references a vertex outside 0..{n}"
                    )));
                }
                if u == v {
                    return Err(HomomorphismError::UnsupportedGraph(format!(
                        "self-loop at vertex {u}"
                    )));
                }
                if adjacency[u].contains(&(v as Vertex)) {
                    return Err(HomomorphismError::UnsupportedGraph(format!(
                        "multi-edge ({u}, {v})"
                    )));
                }
                adjacency[u].insert(v as Vertex);
                adjacency[v].insert(u as Vertex);
                edge_count += 1;
            }

            Ok(Graph {
                adjacency,
                edge_count,
                dense: None,
            })
        }

        /// An empty graph on `n` isolated vertices.
        pub fn empty(n: usize) -> Graph {
            Graph {
                adjacency: vec![HashSet::new(); n],
                edge_count: 0,
                dense: None,
            }
        }

        pub fn vertex_count(&self) -> usize {
            self.adjacency.len()
        }

        pub fn edge_count(&self) -> usize {
            self.edge_count
        }

        pub fn vertices(&self) -> impl Iterator<Item = Vertex> {
            0..self.adjacency.len() as Vertex
        }

        pub fn neighbours(&self, v: Vertex) -> impl Iterator<Item = Vertex> + '_ {
            self.adjacency[v as usize].iter().copied()
        }

        pub fn degree(&self, v: Vertex) -> usize {
            self.adjacency[v as usize].len()
        }

        pub fn has_edge(&self, u: Vertex, v: Vertex) -> bool {
            if let Some(dense) = &self.dense {
                let n = self.vertex_count();
                return dense[u as usize * n + v as usize];
            }
            self.adjacency[u as usize].contains(&v)
        }

        /// Density `2|E| / (n(n-1))`, `0.0` for `n <= 1`.
        pub fn density(&self) -> f64 {
            let n = self.vertex_count();
            if n <= 1 {
                return 0.0;
            }
            let max_edges = (n * (n - 1)) / 2;
            self.edge_count as f64 / max_edges as f64
        }

        /// Materialises a dense `n x n` adjacency matrix so `has_edge`
        /// becomes O(1). Idempotent; a no-op once already built.
        pub fn densify(&mut self) {
            if self.dense.is_some() {
                return;
            }
            let n = self.vertex_count();
            let mut matrix = vec![false; n * n];
            for u in 0..n {
                for &v in &self.adjacency[u] {
                    matrix[u * n + v as usize] = true;
                }
            }
            self.dense = Some(matrix);
        }

        /// Builds the dense matrix iff `density() >= threshold`. Affects
        /// performance only, never the resulting count.
        pub fn densify_if_above(&mut self, threshold: f64) {
            if self.density() >= threshold {
                self.densify();
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn rejects_self_loop() {
            let err = Graph::try_new(2, &[(0, 0)]).unwrap_err();
            assert!(matches!(err, HomomorphismError::UnsupportedGraph(_)));
        }

        #[test]
        fn rejects_multi_edge() {
            let err = Graph::try_new(2, &[(0, 1), (1, 0)]).unwrap_err();
            assert!(matches!(err, HomomorphismError::UnsupportedGraph(_)));
        }

        #[test]
        fn basic_adjacency() {
            let g = Graph::try_new(3, &[(0, 1), (1, 2)]).unwrap();
            assert_eq!(g.vertex_count(), 3);
            assert_eq!(g.edge_count(), 2);
            assert!(g.has_edge(0, 1));
            assert!(g.has_edge(1, 0));
            assert!(!g.has_edge(0, 2));
            assert_eq!(g.degree(1), 2);
        }

        #[test]
        fn densify_matches_sparse() {
            let mut g = Graph::try_new(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
            let before: Vec<_> = (0..4)
                .flat_map(|u| (0..4).map(move |v| (u, v)))
                .map(|(u, v)| g.has_edge(u, v))
                .collect();
            g.densify();
            let after: Vec<_> = (0..4)
                .flat_map(|u| (0..4).map(move |v| (u, v)))
                .map(|(u, v)| g.has_edge(u, v))
                .collect();
            assert_eq!(before, after);
        }
    }
}
