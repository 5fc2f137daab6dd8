/// Builds a tree decomposition of a pattern graph from scratch, since the
/// public `count` contract takes only `G` and `H`, never a pre-built
/// decomposition.
///
/// Builds *some* valid tree decomposition of a simple graph — not
/// necessarily of minimum width; finding the minimum-width decomposition is
/// NP-hard and out of scope here. Uses the classic min-degree
/// elimination-ordering construction: repeatedly eliminate a
/// currently-minimum-degree vertex, record its bag as itself plus its
/// remaining neighbours, and fill in edges between those neighbours so the
/// elimination graph stays chordal-like. See DESIGN.md for the grounding of
/// this heuristic.
pub mod td_producer {
    use crate::graph::graph::{Graph, Vertex};
    use std::collections::HashSet;

    /// An unrooted tree decomposition: one bag per node, plus the tree's
    /// undirected edges.
    #[derive(Debug, Clone)]
    pub struct RawTreeDecomposition {
        pub bags: Vec<HashSet<Vertex>>,
        pub edges: Vec<(usize, usize)>,
    }

    /// Builds a tree decomposition of `graph` via min-degree elimination.
    /// `graph` must have at least one vertex.
    pub fn build_tree_decomposition(graph: &Graph) -> RawTreeDecomposition {
        let n = graph.vertex_count();
        assert!(n > 0, "build_tree_decomposition requires a non-empty graph");

        // Mutable "elimination graph": starts as graph's adjacency, gains
        // fill-in edges as vertices are eliminated.
        let mut remaining: HashSet<Vertex> = graph.vertices().collect();
        let mut elim_adjacency: Vec<HashSet<Vertex>> =
            (0..n).map(|v| graph.neighbours(v as Vertex).collect()).collect();

        let mut order: Vec<Vertex> = Vec::with_capacity(n);
        let mut bags: Vec<HashSet<Vertex>> = Vec::with_capacity(n);

        while !remaining.is_empty() {
            // Pick a remaining vertex of minimum degree within `remaining`.
            let v = *remaining
                .iter()
                .min_by_key(|&&v| {
                    elim_adjacency[v as usize]
                        .iter()
                        .filter(|u| remaining.contains(u))
                        .count()
                })
                .unwrap();

            let neighbours: Vec<Vertex> = elim_adjacency[v as usize]
                .iter()
                .copied()
                .filter(|u| remaining.contains(u))
                .collect();

            // Fill in: make the remaining neighbourhood a clique.
            for &a in &neighbours {
                for &b in &neighbours {
                    if a != b {
                        elim_adjacency[a as usize].insert(b);
                    }
                }
            }

            let mut bag: HashSet<Vertex> = neighbours.iter().copied().collect();
            bag.insert(v);
            bags.push(bag);
            order.push(v);
            remaining.remove(&v);
        }

        // Parent of the node eliminating v is the node eliminating the
        // neighbour of v (at elimination time) that is eliminated earliest
        // afterwards; the last-eliminated vertex's node has no parent.
        // This is the standard elimination-ordering-to-tree-decomposition
        // construction and always yields a valid tree decomposition.
        let position_of: std::collections::HashMap<Vertex, usize> =
            order.iter().enumerate().map(|(i, &v)| (v, i)).collect();

        let mut edges = Vec::new();
        let mut component_roots = Vec::new();
        for (i, &v) in order.iter().enumerate() {
            let bag_i = &bags[i];
            let mut best: Option<usize> = None;
            for &u in bag_i {
                if u == v {
                    continue;
                }
                let j = position_of[&u];
                if j > i && (best.is_none() || j < best.unwrap()) {
                    best = Some(j);
                }
            }
            match best {
                Some(j) => edges.push((i, j)),
                // No later bag-neighbour means `i` is the last node of its
                // connected component in the elimination forest. A
                // disconnected pattern graph (isolated vertices included)
                // produces more than one such node; chain the components'
                // roots together so the result is a single tree rather than
                // a forest.
                None => component_roots.push(i),
            }
        }
        for w in component_roots.windows(2) {
            edges.push((w[0], w[1]));
        }

        RawTreeDecomposition { bags, edges }
    }

}
