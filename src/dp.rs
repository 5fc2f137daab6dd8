/// The dynamic-programming engine: computes the homomorphism count by
/// walking a [`NiceTreeDecomposition`] bottom-up, one DP table per node.
///
/// Each node's table is indexed by a [`Mapping`]-encoded partial assignment
/// of its bag to target vertices; cell values are
/// [`BigUint`][num_bigint::BigUint] rather than a fixed machine word, since
/// homomorphism counts grow exponentially in the pattern size and would
/// silently wrap a `u64` well before graphs of any interesting size. Leaves
/// always carry the empty bag, so the Leaf rule is the trivial
/// one-mapping base case; an optional colour filter at Introduce nodes
/// restricts the count to colour-preserving homomorphisms when requested.
pub mod dp {
    use crate::error::HomomorphismError;
    use crate::graph::graph::Graph;
    use crate::integer_functions::integer_functions::{self, Mapping};
    use crate::tree_decompositions::nice_tree_decomposition::{NiceTreeDecomposition, NodeType};
    use num_bigint::BigUint;
    use num_traits::{One, Zero};
    use std::collections::HashMap;
    use tracing::{instrument, trace};

    /// Knobs for [`crate::count_with_options`].
    #[derive(Debug, Clone)]
    pub struct CountOptions {
        /// Target-graph density at or above which the target's adjacency
        /// matrix is materialised before the DP runs. Performance only.
        pub density_threshold: f64,
        /// Restrict the count to colour-preserving homomorphisms.
        pub colourful: bool,
        /// Required iff `colourful`: `graph_clr[v]` is the colour class of
        /// pattern vertex `v`.
        pub graph_clr: Option<Vec<u32>>,
        /// Required iff `colourful`: `target_clr[u]` is the colour class of
        /// target vertex `u`.
        pub target_clr: Option<Vec<u32>>,
    }

    impl Default for CountOptions {
        fn default() -> Self {
            CountOptions {
                density_threshold: 0.5,
                colourful: false,
                graph_clr: None,
                target_clr: None,
            }
        }
    }

    /// Sorts each node's bag into a canonical vertex order so `Mapping`
    /// digit positions are well defined.
    fn sorted_bags(ntd: &NiceTreeDecomposition) -> HashMap<usize, Vec<u32>> {
        let mut out = HashMap::with_capacity(ntd.node_count());
        for p in 0..ntd.node_count() {
            let mut bag: Vec<u32> = ntd.bag(p).iter().copied().collect();
            bag.sort_unstable();
            out.insert(p, bag);
        }
        out
    }

    /// Runs the Leaf/Introduce/Forget/Join recurrence over `ntd`, counting
    /// homomorphisms from `pattern` into `target`.
    #[instrument(skip(pattern, target, ntd, options), fields(pattern_n = pattern.vertex_count(), target_n = target.vertex_count()))]
    pub fn count(
        pattern: &Graph,
        target: &Graph,
        ntd: &NiceTreeDecomposition,
        options: &CountOptions,
    ) -> Result<BigUint, HomomorphismError> {
        if options.colourful
            && (options.graph_clr.is_none() || options.target_clr.is_none())
        {
            return Err(HomomorphismError::MissingColouring);
        }
        if let Some(c) = &options.graph_clr {
            if c.len() != pattern.vertex_count() {
                return Err(HomomorphismError::MissingColouring);
            }
        }
        if let Some(c) = &options.target_clr {
            if c.len() != target.vertex_count() {
                return Err(HomomorphismError::MissingColouring);
            }
        }

        let k = target.vertex_count() as Mapping;
        let bags = sorted_bags(ntd);
        let mut table: HashMap<usize, Vec<BigUint>> = HashMap::with_capacity(ntd.node_count());

        for &p in ntd.processing_order() {
            match ntd.node_type(p) {
                NodeType::Leaf => {
                    table.insert(p, vec![BigUint::one()]);
                }
                NodeType::Introduce => {
                    let q = ntd.unique_child(p);
                    let v = ntd.unique_vertex(p).expect("introduce node has a unique vertex");

                    let bag_q = &bags[&q];
                    let new_index = bag_q.iter().position(|&u| v < u).unwrap_or(bag_q.len()) as Mapping;

                    let bag_p = &bags[&p];
                    let significance: HashMap<u32, Mapping> = bag_p
                        .iter()
                        .enumerate()
                        .map(|(i, &u)| (u, i as Mapping))
                        .collect();

                    let neighbours_in_q: Vec<u32> =
                        pattern.neighbours(v).filter(|u| bag_q.contains(u)).collect();

                    let child_table = &table[&q];
                    let width_p = integer_functions::max_mappings(bag_p.len() as Mapping, k) as usize;
                    let mut row = vec![BigUint::zero(); width_p];

                    for (f_q, cell) in child_table.iter().enumerate() {
                        if cell.is_zero() {
                            continue;
                        }
                        for a in 0..k {
                            let f_prime = integer_functions::insert(k, f_q as Mapping, new_index, a);

                            let mut consistent = true;
                            if options.colourful {
                                if let (Some(target_clr), Some(pattern_clr)) =
                                    (&options.target_clr, &options.graph_clr)
                                {
                                    if target_clr[a as usize] != pattern_clr[v as usize] {
                                        consistent = false;
                                    }
                                }
                            }
                            if consistent {
                                for &u in &neighbours_in_q {
                                    let significance_u = significance[&u];
                                    let image_u = integer_functions::extract(k, f_prime, significance_u);
                                    if !target.has_edge(a as u32, image_u as u32) {
                                        consistent = false;
                                        break;
                                    }
                                }
                            }

                            if consistent {
                                row[f_prime as usize] = cell.clone();
                            }
                        }
                    }

                    trace!(node = p, width = width_p, "introduce");
                    table.insert(p, row);
                    table.remove(&q);
                }
                NodeType::Forget => {
                    let q = ntd.unique_child(p);
                    let forgotten = ntd.unique_vertex(p).expect("forget node has a unique vertex");

                    let bag_q = &bags[&q];
                    let significance = bag_q.iter().position(|&u| u == forgotten).unwrap() as Mapping;

                    let bag_p = &bags[&p];
                    let width_p = integer_functions::max_mappings(bag_p.len() as Mapping, k) as usize;
                    let child_table = &table[&q];
                    let mut row = vec![BigUint::zero(); width_p];

                    for (f_prime, slot) in row.iter_mut().enumerate() {
                        let mut sum = BigUint::zero();
                        for a in 0..k {
                            let f_old = integer_functions::insert(k, f_prime as Mapping, significance, a);
                            sum += &child_table[f_old as usize];
                        }
                        *slot = sum;
                    }

                    trace!(node = p, width = width_p, "forget");
                    table.insert(p, row);
                    table.remove(&q);
                }
                NodeType::Join => {
                    let children = ntd.children(p);
                    let (q1, q2) = (children[0], children[1]);
                    let left = &table[&q1];
                    let right = &table[&q2];
                    let row: Vec<BigUint> = left.iter().zip(right.iter()).map(|(a, b)| a * b).collect();

                    trace!(node = p, width = row.len(), "join");
                    table.insert(p, row);
                    table.remove(&q1);
                    table.remove(&q2);
                }
            }
        }

        let root = ntd.root();
        Ok(table
            .remove(&root)
            .and_then(|row| row.into_iter().next())
            .unwrap_or_else(BigUint::zero))
    }

}
