/// Nice tree decompositions of the pattern graph: the structure the DP
/// engine (`dp`) walks bottom-up.
///
/// A nice tree decomposition restricts the general tree-decomposition shape
/// to four kinds of node (leaf, introduce, forget, join) so the DP
/// recurrence only ever has to handle those four cases. Tree topology and
/// per-node data live together in one `Vec`-backed arena, addressed by dense
/// `0..N` indices assigned during normalisation; there is no separate
/// topology type, since the indices already give direct array access.
pub mod nice_tree_decomposition {
    use crate::error::HomomorphismError;
    use crate::graph::graph::{Graph, Vertex};
    use crate::td_producer::td_producer::{self, RawTreeDecomposition};
    use std::collections::{HashMap, HashSet};

    /// The set of pattern vertices attached to a node.
    pub type Bag = HashSet<Vertex>;

    /// A node's role in the DP recurrence.
    #[derive(PartialEq, Eq, Debug, Clone, Copy)]
    pub enum NodeType {
        Leaf,
        Introduce,
        Forget,
        Join,
    }

    #[derive(Debug, Clone)]
    struct NodeData {
        bag: Bag,
        node_type: NodeType,
        children: Vec<usize>,
        parent: Option<usize>,
    }

    /// A nice tree decomposition of a pattern graph, ready for DP.
    ///
    /// Every node has at most two children and satisfies the nice-TD shape:
    /// leaves carry the empty bag, introduce/forget nodes have one child
    /// whose bag differs by exactly one vertex, and join nodes have two
    /// children sharing their own bag.
    #[derive(Debug, Clone)]
    pub struct NiceTreeDecomposition {
        nodes: Vec<NodeData>,
        root: usize,
        change_index: HashMap<usize, Vertex>,
        processing_order: Vec<usize>,
        vertex_count: usize,
    }

    impl NiceTreeDecomposition {
        /// Builds a nice tree decomposition of `graph`'s vertex set by first
        /// producing an unrooted decomposition ([`td_producer`]) and then
        /// normalising it into nice form.
        pub fn build(graph: &Graph) -> Result<NiceTreeDecomposition, HomomorphismError> {
            let n = graph.vertex_count();

            if n == 0 {
                let nodes = vec![NodeData {
                    bag: Bag::new(),
                    node_type: NodeType::Leaf,
                    children: vec![],
                    parent: None,
                }];
                return Ok(NiceTreeDecomposition {
                    nodes,
                    root: 0,
                    change_index: HashMap::new(),
                    processing_order: vec![0],
                    vertex_count: 0,
                });
            }

            let raw = td_producer::build_tree_decomposition(graph);
            let (arena, final_root) = Self::nicify_all(&raw);
            let td = Self::finalise(arena, final_root, n);
            td.validate(graph)?;
            Ok(td)
        }

        /// Orients the raw (unrooted) tree at a degree-<=1 node, attaches an
        /// empty-bag leaf below every former leaf, recursively rebuilds every
        /// subtree in nice form, then caps the whole thing with an empty bag
        /// above the real root (folded into the general single-child chain
        /// machinery instead of being special-cased). Returns the built
        /// arena and the id of its final (capped) root.
        ///
        /// Assumes `raw` is a single connected tree over all of its bags —
        /// [`td_producer::build_tree_decomposition`] guarantees this even for
        /// a disconnected pattern graph, chaining separate components
        /// together before returning.
        fn nicify_all(raw: &RawTreeDecomposition) -> (Vec<NodeData>, usize) {
            let raw_n = raw.bags.len();
            let mut adjacency: Vec<Vec<usize>> = vec![vec![]; raw_n];
            let mut degree = vec![0usize; raw_n];
            for &(a, b) in &raw.edges {
                adjacency[a].push(b);
                adjacency[b].push(a);
                degree[a] += 1;
                degree[b] += 1;
            }

            let raw_root = (0..raw_n).find(|&i| degree[i] <= 1).unwrap_or(0);

            let mut raw_children: Vec<Vec<usize>> = vec![vec![]; raw_n];
            let mut visited = vec![false; raw_n];
            let mut bfs = vec![raw_root];
            visited[raw_root] = true;
            let mut i = 0;
            while i < bfs.len() {
                let u = bfs[i];
                i += 1;
                for &v in &adjacency[u] {
                    if !visited[v] {
                        visited[v] = true;
                        raw_children[u].push(v);
                        bfs.push(v);
                    }
                }
            }

            let former_leaves: HashSet<usize> = (0..raw_n).filter(|&i| degree[i] <= 1).collect();

            let mut arena: Vec<NodeData> = Vec::new();
            let root_top = Self::nicify(&mut arena, raw, &raw_children, &former_leaves, raw_root);
            let final_root = Self::build_chain(&mut arena, &Bag::new(), root_top);
            (arena, final_root)
        }

        /// Pushes an empty-shelled node (kind fixed up later) into `arena`,
        /// returning its id.
        fn push_node(arena: &mut Vec<NodeData>, bag: Bag) -> usize {
            arena.push(NodeData {
                bag,
                node_type: NodeType::Leaf,
                children: vec![],
                parent: None,
            });
            arena.len() - 1
        }

        fn set_child(arena: &mut Vec<NodeData>, parent: usize, child: usize) {
            arena[parent].children.push(child);
            arena[child].parent = Some(parent);
        }

        /// Raises `current`'s bag to `target_bag` by a chain of single-vertex
        /// forget/introduce steps (the "chains" of `nice_tree_decomp.py` step
        /// 5), forgetting everything `current` has that `target_bag` doesn't
        /// before introducing what's missing. Returns the id of the chain's
        /// top node (bag == `target_bag`).
        fn build_chain(arena: &mut Vec<NodeData>, target_bag: &Bag, mut current: usize) -> usize {
            loop {
                let current_bag = arena[current].bag.clone();
                if &current_bag == target_bag {
                    return current;
                }
                if let Some(&v) = current_bag.difference(target_bag).next() {
                    let mut new_bag = current_bag.clone();
                    new_bag.remove(&v);
                    let new_id = Self::push_node(arena, new_bag);
                    Self::set_child(arena, new_id, current);
                    current = new_id;
                } else if let Some(&v) = target_bag.difference(&current_bag).next() {
                    let mut new_bag = current_bag.clone();
                    new_bag.insert(v);
                    let new_id = Self::push_node(arena, new_bag);
                    Self::set_child(arena, new_id, current);
                    current = new_id;
                } else {
                    unreachable!("bags differ but neither difference is non-empty");
                }
            }
        }

        /// Recursively rebuilds the subtree rooted at `raw_id` in nice form,
        /// returning the arena id of its top node (bag == `raw.bags[raw_id]`).
        fn nicify(
            arena: &mut Vec<NodeData>,
            raw: &RawTreeDecomposition,
            raw_children: &[Vec<usize>],
            former_leaves: &HashSet<usize>,
            raw_id: usize,
        ) -> usize {
            let bag = raw.bags[raw_id].clone();
            let mut children_tops: Vec<usize> = raw_children[raw_id]
                .iter()
                .map(|&c| Self::nicify(arena, raw, raw_children, former_leaves, c))
                .collect();

            if former_leaves.contains(&raw_id) {
                let empty_leaf = Self::push_node(arena, Bag::new());
                children_tops.push(empty_leaf);
            }

            match children_tops.len() {
                1 => Self::build_chain(arena, &bag, children_tops[0]),
                _ => {
                    let mut raised: Vec<usize> = children_tops
                        .into_iter()
                        .map(|c| Self::build_chain(arena, &bag, c))
                        .collect();
                    let mut acc = raised.remove(0);
                    for next in raised {
                        let join_id = Self::push_node(arena, bag.clone());
                        Self::set_child(arena, join_id, acc);
                        Self::set_child(arena, join_id, next);
                        acc = join_id;
                    }
                    acc
                }
            }
        }

        /// BFS-reindexes the built arena to dense `0..N` ids with the root
        /// at 0, labels every node's [`NodeType`] from its bag-size
        /// relationship to its children, computes each introduce/forget/leaf
        /// node's unique vertex, and derives a processing order with every
        /// child before its parent (any reversal of a parent-first BFS order
        /// satisfies this; it makes no attempt to minimise how many live
        /// DP tables coexist during traversal, see DESIGN.md).
        fn finalise(arena: Vec<NodeData>, final_root: usize, vertex_count: usize) -> NiceTreeDecomposition {
            let mut bfs_order = vec![final_root];
            let mut seen: HashSet<usize> = HashSet::new();
            seen.insert(final_root);
            let mut i = 0;
            while i < bfs_order.len() {
                let u = bfs_order[i];
                i += 1;
                for &c in &arena[u].children {
                    if seen.insert(c) {
                        bfs_order.push(c);
                    }
                }
            }

            let new_index: HashMap<usize, usize> = bfs_order
                .iter()
                .enumerate()
                .map(|(new, &old)| (old, new))
                .collect();

            let mut nodes: Vec<NodeData> = Vec::with_capacity(bfs_order.len());
            for &old in &bfs_order {
                let old_node = &arena[old];
                nodes.push(NodeData {
                    bag: old_node.bag.clone(),
                    node_type: NodeType::Leaf,
                    children: old_node.children.iter().map(|c| new_index[c]).collect(),
                    parent: old_node.parent.map(|p| new_index[&p]),
                });
            }

            for idx in 0..nodes.len() {
                let child_count = nodes[idx].children.len();
                nodes[idx].node_type = match child_count {
                    0 => NodeType::Leaf,
                    2 => NodeType::Join,
                    1 => {
                        let child = nodes[idx].children[0];
                        if nodes[idx].bag.len() == nodes[child].bag.len() + 1 {
                            NodeType::Introduce
                        } else {
                            NodeType::Forget
                        }
                    }
                    _ => unreachable!("nice tree decomposition nodes have at most two children"),
                };
            }

            let mut change_index = HashMap::new();
            for idx in 0..nodes.len() {
                match nodes[idx].node_type {
                    NodeType::Introduce => {
                        let child = nodes[idx].children[0];
                        let v = *nodes[idx].bag.difference(&nodes[child].bag).next().unwrap();
                        change_index.insert(idx, v);
                    }
                    NodeType::Forget => {
                        let child = nodes[idx].children[0];
                        let v = *nodes[child].bag.difference(&nodes[idx].bag).next().unwrap();
                        change_index.insert(idx, v);
                    }
                    NodeType::Leaf => {
                        if let Some(&v) = nodes[idx].bag.iter().next() {
                            change_index.insert(idx, v);
                        }
                    }
                    NodeType::Join => {}
                }
            }

            let root = new_index[&final_root];
            let processing_order: Vec<usize> = (0..nodes.len()).rev().collect();

            NiceTreeDecomposition {
                nodes,
                root,
                change_index,
                processing_order,
                vertex_count,
            }
        }

        /// Checks the tree-decomposition axioms against the original pattern
        /// graph: every vertex is covered, every edge shares a bag, and each
        /// vertex's bags induce a connected subtree. A failure here means
        /// the producer or normaliser has a bug, never bad user input — any
        /// simple graph, connected or not, has a valid tree decomposition.
        fn validate(&self, graph: &Graph) -> Result<(), HomomorphismError> {
            let n = graph.vertex_count();

            let mut union: Bag = Bag::new();
            for node in &self.nodes {
                union.extend(node.bag.iter().copied());
            }
            let expected: Bag = (0..n as Vertex).collect();
            if union != expected {
                return Err(HomomorphismError::InvalidDecomposition(
                    "union of bags does not cover all pattern vertices".to_string(),
                ));
            }

            for u in graph.vertices() {
                for v in graph.neighbours(u) {
                    if u < v && !self.nodes.iter().any(|nd| nd.bag.contains(&u) && nd.bag.contains(&v)) {
                        return Err(HomomorphismError::InvalidDecomposition(format!(
                            "edge ({u}, {v}) is not covered by any bag"
                        )));
                    }
                }
            }

            for v in 0..n as Vertex {
                let containing: Vec<usize> = (0..self.nodes.len())
                    .filter(|&i| self.nodes[i].bag.contains(&v))
                    .collect();
                if containing.is_empty() {
                    continue;
                }
                let mut seen = HashSet::new();
                let mut stack = vec![containing[0]];
                seen.insert(containing[0]);
                while let Some(u) = stack.pop() {
                    if let Some(p) = self.nodes[u].parent {
                        if self.nodes[p].bag.contains(&v) && seen.insert(p) {
                            stack.push(p);
                        }
                    }
                    for &c in &self.nodes[u].children {
                        if self.nodes[c].bag.contains(&v) && seen.insert(c) {
                            stack.push(c);
                        }
                    }
                }
                if seen.len() != containing.len() {
                    return Err(HomomorphismError::InvalidDecomposition(format!(
                        "vertex {v} does not induce a connected subtree of bags"
                    )));
                }
            }

            Ok(())
        }

        pub fn node_count(&self) -> usize {
            self.nodes.len()
        }

        pub fn vertex_count(&self) -> usize {
            self.vertex_count
        }

        pub fn root(&self) -> usize {
            self.root
        }

        pub fn bag(&self, p: usize) -> &Bag {
            &self.nodes[p].bag
        }

        pub fn node_type(&self, p: usize) -> NodeType {
            self.nodes[p].node_type
        }

        pub fn children(&self, p: usize) -> &[usize] {
            &self.nodes[p].children
        }

        pub fn parent(&self, p: usize) -> Option<usize> {
            self.nodes[p].parent
        }

        /// The single child of an introduce or forget node. Panics if called
        /// on a leaf or join node.
        pub fn unique_child(&self, p: usize) -> usize {
            self.nodes[p].children[0]
        }

        /// The vertex introduced, forgotten, or (for a leaf) contained at
        /// node `p`. `None` for join nodes.
        pub fn unique_vertex(&self, p: usize) -> Option<Vertex> {
            self.change_index.get(&p).copied()
        }

        /// Children-before-parents traversal order for the DP engine.
        pub fn processing_order(&self) -> &[usize] {
            &self.processing_order
        }

        /// `max bag size - 1` across all nodes (0 for the empty decomposition).
        pub fn width(&self) -> usize {
            self.nodes.iter().map(|n| n.bag.len()).max().unwrap_or(1).saturating_sub(1)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn assert_valid(td: &NiceTreeDecomposition) {
            for p in 0..td.node_count() {
                match td.node_type(p) {
                    NodeType::Leaf => assert!(td.bag(p).is_empty()),
                    NodeType::Introduce | NodeType::Forget => assert_eq!(td.children(p).len(), 1),
                    NodeType::Join => {
                        assert_eq!(td.children(p).len(), 2);
                        let c = td.children(p);
                        assert_eq!(td.bag(c[0]), td.bag(p));
                        assert_eq!(td.bag(c[1]), td.bag(p));
                    }
                }
            }
            assert_eq!(td.bag(td.root()).len(), 0);
        }

        #[test]
        fn empty_graph_is_single_leaf() {
            let g = Graph::empty(0);
            let td = NiceTreeDecomposition::build(&g).unwrap();
            assert_eq!(td.node_count(), 1);
            assert_eq!(td.node_type(td.root()), NodeType::Leaf);
        }

        #[test]
        fn single_vertex_graph_has_root_above_empty_bag() {
            let g = Graph::try_new(1, &[]).unwrap();
            let td = NiceTreeDecomposition::build(&g).unwrap();
            assert_valid(&td);
            assert!(td.bag(td.root()).is_empty());
            assert!(td.node_count() >= 3);
        }

        #[test]
        fn path_graph_covers_all_edges() {
            let g = Graph::try_new(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
            let td = NiceTreeDecomposition::build(&g).unwrap();
            assert_valid(&td);
            for p in 0..td.node_count() {
                assert!(td.bag(p).len() <= td.width() + 1);
            }
        }

        #[test]
        fn cycle_graph_round_trips_through_join() {
            let g = Graph::try_new(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
            let td = NiceTreeDecomposition::build(&g).unwrap();
            assert_valid(&td);
            assert!((0..td.node_count()).any(|p| td.node_type(p) == NodeType::Join));
        }

        #[test]
        fn disconnected_graph_with_isolated_vertex_builds_successfully() {
            let g = Graph::try_new(3, &[(0, 1)]).unwrap();
            let td = NiceTreeDecomposition::build(&g).unwrap();
            assert_valid(&td);
            assert!((0..td.node_count()).any(|p| td.bag(p).contains(&2)));
        }

        #[test]
        fn graph_with_two_disjoint_edges_builds_successfully() {
            let g = Graph::try_new(4, &[(0, 1), (2, 3)]).unwrap();
            let td = NiceTreeDecomposition::build(&g).unwrap();
            assert_valid(&td);
        }

        #[test]
        fn processing_order_is_children_before_parents() {
            let g = Graph::try_new(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
            let td = NiceTreeDecomposition::build(&g).unwrap();
            let mut position = vec![0usize; td.node_count()];
            for (pos, &node) in td.processing_order().iter().enumerate() {
                position[node] = pos;
            }
            for p in 0..td.node_count() {
                for &c in td.children(p) {
                    assert!(position[c] < position[p]);
                }
            }
        }
    }
}
