use super::graph::Graph;
use super::traits::NegativeCycleFinder;
use common::{
    error::Error,
    types::{Cost, NegativeCycle},
};
use log::trace;
use std::collections::VecDeque;
use std::str::FromStr;

/// Which ends of the SPFA work queue are used for popping and pushing.
///
/// Only convergence speed depends on this; every discipline finds a
/// negative cycle whenever one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueDiscipline {
    /// Pop from the back, push to the front.
    #[default]
    Hybrid,
    /// Pop from the front, push to the back.
    Fifo,
}

impl QueueDiscipline {
    /// Every vertex queued once, ordered so that vertex 0 is popped first.
    fn initial_queue(self, num_nodes: usize) -> VecDeque<usize> {
        match self {
            QueueDiscipline::Hybrid => (0..num_nodes).rev().collect(),
            QueueDiscipline::Fifo => (0..num_nodes).collect(),
        }
    }

    fn pop(self, queue: &mut VecDeque<usize>) -> Option<usize> {
        match self {
            QueueDiscipline::Hybrid => queue.pop_back(),
            QueueDiscipline::Fifo => queue.pop_front(),
        }
    }

    fn push(self, queue: &mut VecDeque<usize>, vertex: usize) {
        match self {
            QueueDiscipline::Hybrid => queue.push_front(vertex),
            QueueDiscipline::Fifo => queue.push_back(vertex),
        }
    }
}

impl FromStr for QueueDiscipline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hybrid" => Ok(QueueDiscipline::Hybrid),
            "fifo" => Ok(QueueDiscipline::Fifo),
            other => Err(format!(
                "unknown queue discipline '{}', expected 'hybrid' or 'fifo'",
                other
            )),
        }
    }
}

/// Walks the predecessor forest looking for a cycle.
///
/// The chain from `start` is walked first, then the chain from every vertex
/// not yet visited. `visited` persists across chains of this call so each
/// vertex is walked at most once; `on_stack` marks the chain currently being
/// walked. Returns a vertex lying on a cycle, or `None`.
///
/// Both mark arrays are local to the call: `pre` changes between calls and
/// marks from an older snapshot would hide new cycles.
pub(crate) fn find_predecessor_cycle(start: usize, pre: &[Option<usize>]) -> Option<usize> {
    let num_nodes = pre.len();
    let mut visited = vec![false; num_nodes];
    let mut on_stack = vec![false; num_nodes];
    let mut chain: Vec<usize> = Vec::new();

    for root in std::iter::once(start).chain(0..num_nodes) {
        if visited[root] {
            continue;
        }

        let mut current = Some(root);
        while let Some(v) = current {
            if visited[v] {
                if on_stack[v] {
                    return Some(v);
                }
                // Merged into a chain already known to be acyclic.
                break;
            }
            visited[v] = true;
            on_stack[v] = true;
            chain.push(v);
            current = pre[v];
        }

        for v in chain.drain(..) {
            on_stack[v] = false;
        }
    }

    None
}

/// Negative-cycle detector built on the Shortest Path Faster Algorithm (SPFA).
///
/// Relaxation is used only to grow a predecessor forest; every `|V|`
/// relaxations the forest is checked for a cycle, and any cycle in it has
/// strictly negative weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpfaDetector {
    pub discipline: QueueDiscipline,
}

impl SpfaDetector {
    pub fn new(discipline: QueueDiscipline) -> Self {
        SpfaDetector { discipline }
    }

    /// Rebuilds the explicit cycle through `start` from the predecessor array.
    ///
    /// Follows `pre` backwards from `start` until some vertex repeats, keeps
    /// only the repeated loop and reverses it, so that consecutive entries of
    /// `vertices` are real forward edges `cycle[i] -> cycle[i + 1]`. Between
    /// two vertices the lightest parallel edge is counted.
    ///
    /// # Errors
    /// Returns `Error::MalformedCycle` if the chain breaks, does not repeat
    /// within `|V|` steps, uses a missing edge, or closes with a weight that
    /// is not strictly negative.
    pub fn reconstruct_cycle(
        &self,
        start: usize,
        pre: &[Option<usize>],
        graph: &Graph,
    ) -> Result<NegativeCycle, Error> {
        let num_nodes = graph.vertex_count();
        if start >= num_nodes || pre.len() != num_nodes {
            return Err(Error::OutOfRange {
                vertex: start,
                vertex_count: num_nodes,
            });
        }
        let malformed = Error::MalformedCycle { vertex: start };

        let mut position: Vec<Option<usize>> = vec![None; num_nodes];
        let mut chain = vec![start];
        position[start] = Some(0);

        let mut current = start;
        let mut loop_start = None;
        for _ in 0..num_nodes {
            current = pre[current].ok_or_else(|| malformed.clone())?;
            if let Some(pos) = position[current] {
                loop_start = Some(pos);
                break;
            }
            position[current] = Some(chain.len());
            chain.push(current);
        }
        let loop_start = loop_start.ok_or_else(|| malformed.clone())?;

        // `chain[loop_start..]` runs against the edges; close it and flip it.
        let mut vertices = chain.split_off(loop_start);
        vertices.push(vertices[0]);
        vertices.reverse();

        let mut weight: Cost = 0;
        for pair in vertices.windows(2) {
            let (_, w) = graph
                .lightest_edge(pair[0], pair[1])?
                .ok_or_else(|| malformed.clone())?;
            weight = weight.checked_add(w).ok_or(Error::CostOverflow)?;
        }

        if weight >= 0 {
            return Err(malformed);
        }

        Ok(NegativeCycle { vertices, weight })
    }
}

impl NegativeCycleFinder for SpfaDetector {
    /// Runs SPFA from a virtual source and returns the first negative cycle seen.
    ///
    /// # Returns
    /// - `Ok(Some(cycle))` → Negative cycle found.
    /// - `Ok(None)` → Graph has no negative cycle.
    /// - `Err(e)` → Error occurred.
    fn find_negative_cycle(&self, graph: &Graph) -> Result<Option<NegativeCycle>, Error> {
        let num_nodes = graph.vertex_count();

        // Every vertex starts at distance 0 and in the queue: a virtual
        // zero-weight source connected to all vertices, so a negative cycle
        // anywhere in the graph is reachable.
        let mut distance: Vec<Cost> = vec![0; num_nodes];
        let mut pre: Vec<Option<usize>> = vec![None; num_nodes];
        let mut in_queue = vec![true; num_nodes];
        let mut queue = self.discipline.initial_queue(num_nodes);

        let mut relaxations = 0usize;
        let mut last_relaxed = None;

        while let Some(u) = self.discipline.pop(&mut queue) {
            in_queue[u] = false;

            for edge in graph.edges_of(u)? {
                let v = edge.to;
                let candidate = distance[u]
                    .checked_add(edge.weight)
                    .ok_or(Error::CostOverflow)?;
                if candidate < distance[v] {
                    distance[v] = candidate;
                    pre[v] = Some(u);
                    last_relaxed = Some(v);

                    relaxations += 1;
                    if relaxations == num_nodes {
                        if let Some(on_cycle) = find_predecessor_cycle(v, &pre) {
                            trace!("predecessor cycle through vertex {}", on_cycle);
                            return self.reconstruct_cycle(on_cycle, &pre, graph).map(Some);
                        }
                        relaxations = 0;
                    }

                    if !in_queue[v] {
                        in_queue[v] = true;
                        self.discipline.push(&mut queue, v);
                    }
                }
            }
        }

        let Some(last) = last_relaxed else {
            trace!("no relaxation happened; graph has no negative edge on a cycle");
            return Ok(None);
        };

        match find_predecessor_cycle(last, &pre) {
            Some(on_cycle) => self.reconstruct_cycle(on_cycle, &pre, graph).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod spfa_tests {
    use super::*;
    use common::types::DirectedEdge;

    fn build_graph(num_nodes: usize, edges: &[DirectedEdge]) -> Graph {
        Graph::from_edges(num_nodes, edges).unwrap()
    }

    fn assert_closed_and_real(cycle: &NegativeCycle, graph: &Graph) {
        assert_eq!(cycle.vertices.first(), cycle.vertices.last());
        let mut total = 0;
        for (u, v) in cycle.edges() {
            let (_, w) = graph
                .lightest_edge(u, v)
                .unwrap()
                .expect("cycle uses an edge that is not in the graph");
            total += w;
        }
        assert_eq!(total, cycle.weight);
        assert!(cycle.weight < 0);
    }

    #[test]
    fn queue_discipline_parses_case_insensitively() {
        assert_eq!("Hybrid".parse(), Ok(QueueDiscipline::Hybrid));
        assert_eq!(" fifo ".parse(), Ok(QueueDiscipline::Fifo));
        assert!("lifo".parse::<QueueDiscipline>().is_err());
    }

    #[test]
    fn both_disciplines_pop_vertex_zero_first() {
        for discipline in [QueueDiscipline::Hybrid, QueueDiscipline::Fifo] {
            let mut queue = discipline.initial_queue(3);
            assert_eq!(discipline.pop(&mut queue), Some(0));
            discipline.push(&mut queue, 7);
            assert_eq!(discipline.pop(&mut queue), Some(1));
        }
    }

    #[test]
    fn predecessor_cycle_found_from_unvisited_root() {
        // 3 is a dead end; 0 -> 2 -> 1 -> 0 closes through pre.
        let pre = vec![Some(2), Some(0), Some(1), None];

        let hit = find_predecessor_cycle(3, &pre);
        assert!(matches!(hit, Some(0) | Some(1) | Some(2)));
    }

    #[test]
    fn predecessor_tree_has_no_cycle() {
        let pre = vec![None, Some(0), Some(1), Some(1), Some(3)];

        assert_eq!(find_predecessor_cycle(4, &pre), None);
    }

    #[test]
    fn predecessor_self_loop_is_a_cycle() {
        let pre = vec![None, Some(1)];

        assert_eq!(find_predecessor_cycle(0, &pre), Some(1));
    }

    #[test]
    fn reconstruct_cycle_orients_along_forward_edges() {
        let graph = build_graph(3, &[(0, 1, -1), (1, 2, -1), (2, 0, -1)]);
        let pre = vec![Some(2), Some(0), Some(1)];

        let cycle = SpfaDetector::default()
            .reconstruct_cycle(0, &pre, &graph)
            .unwrap();

        assert_eq!(cycle.vertices, vec![0, 1, 2, 0]);
        assert_eq!(cycle.weight, -3);
    }

    #[test]
    fn reconstruct_cycle_trims_tail_leading_into_cycle() {
        let graph = build_graph(4, &[(0, 1, -1), (1, 2, -1), (2, 0, -1), (0, 3, 5)]);
        let pre = vec![Some(2), Some(0), Some(1), Some(0)];

        let cycle = SpfaDetector::default()
            .reconstruct_cycle(3, &pre, &graph)
            .unwrap();

        assert_eq!(cycle.vertices, vec![0, 1, 2, 0]);
        assert!(!cycle.vertices.contains(&3));
    }

    #[test]
    fn reconstruct_cycle_reports_broken_chain() {
        let graph = build_graph(3, &[(0, 1, -1)]);
        let pre = vec![None, Some(0), Some(1)];

        let result = SpfaDetector::default().reconstruct_cycle(2, &pre, &graph);
        assert_eq!(result, Err(Error::MalformedCycle { vertex: 2 }));
    }

    #[test]
    fn reconstruct_cycle_rejects_non_negative_loop() {
        let graph = build_graph(2, &[(0, 1, 1), (1, 0, -1)]);
        let pre = vec![Some(1), Some(0)];

        let result = SpfaDetector::default().reconstruct_cycle(0, &pre, &graph);
        assert_eq!(result, Err(Error::MalformedCycle { vertex: 0 }));
    }

    #[test]
    fn reconstruct_cycle_rejects_pre_pointing_at_missing_edge() {
        let graph = build_graph(2, &[(0, 1, -5)]);
        let pre = vec![Some(1), Some(0)];

        let result = SpfaDetector::default().reconstruct_cycle(0, &pre, &graph);
        assert!(matches!(result, Err(Error::MalformedCycle { .. })));
    }

    #[test]
    fn spfa_detects_simple_negative_cycle() {
        let graph = build_graph(2, &[(0, 1, -3), (1, 0, 1)]);

        let cycle = SpfaDetector::default()
            .find_negative_cycle(&graph)
            .unwrap()
            .expect("negative cycle expected");

        assert_eq!(cycle.len(), 2);
        assert_eq!(cycle.weight, -2);
        assert_closed_and_real(&cycle, &graph);
    }

    #[test]
    fn spfa_no_negative_cycle_returns_none() {
        let graph = build_graph(4, &[(0, 1, -1), (1, 2, -7), (2, 3, -2), (0, 3, 4)]);

        let cycle = SpfaDetector::default().find_negative_cycle(&graph).unwrap();
        assert!(cycle.is_none());
    }

    #[test]
    fn spfa_zero_weight_cycle_is_not_negative() {
        let graph = build_graph(2, &[(0, 1, 3), (1, 0, -3)]);

        let cycle = SpfaDetector::default().find_negative_cycle(&graph).unwrap();
        assert!(cycle.is_none());
    }

    #[test]
    fn spfa_negative_self_loop() {
        let graph = build_graph(2, &[(0, 1, 2), (1, 1, -1)]);

        let cycle = SpfaDetector::default()
            .find_negative_cycle(&graph)
            .unwrap()
            .expect("self loop is a negative cycle");

        assert_eq!(cycle.vertices, vec![1, 1]);
        assert_eq!(cycle.weight, -1);
    }

    #[test]
    fn spfa_empty_graph_has_no_cycle() {
        let graph = build_graph(0, &[]);

        assert!(SpfaDetector::default().find_negative_cycle(&graph).unwrap().is_none());
    }

    #[test]
    fn spfa_single_node_graph() {
        let graph = build_graph(1, &[]);

        assert!(SpfaDetector::default().find_negative_cycle(&graph).unwrap().is_none());
    }

    // ----------------------------
    // Stress and edge-case tests
    // ----------------------------

    #[test]
    fn spfa_large_linear_graph_no_cycle() {
        let n = 1000;
        let edges: Vec<DirectedEdge> = (0..n - 1).map(|i| (i, i + 1, -1)).collect();
        let graph = build_graph(n, &edges);

        for discipline in [QueueDiscipline::Hybrid, QueueDiscipline::Fifo] {
            let cycle = SpfaDetector::new(discipline).find_negative_cycle(&graph).unwrap();
            assert!(cycle.is_none());
        }
    }

    #[test]
    fn spfa_large_circular_graph_negative_cycle() {
        let n = 1000;
        let edges: Vec<DirectedEdge> = (0..n).map(|i| (i, (i + 1) % n, -1)).collect();
        let graph = build_graph(n, &edges);

        for discipline in [QueueDiscipline::Hybrid, QueueDiscipline::Fifo] {
            let cycle = SpfaDetector::new(discipline)
                .find_negative_cycle(&graph)
                .unwrap()
                .expect("the ring is one big negative cycle");
            assert_eq!(cycle.len(), n);
            assert_eq!(cycle.weight, -(n as Cost));
        }
    }

    #[test]
    fn spfa_detects_cycle_in_disconnected_component() {
        let graph = build_graph(
            5,
            &[
                // Positive cycle.
                (0, 1, 1),
                (1, 2, 2),
                (2, 0, 3),
                // Separate negative cycle.
                (3, 4, 2),
                (4, 3, -3),
            ],
        );

        let cycle = SpfaDetector::default()
            .find_negative_cycle(&graph)
            .unwrap()
            .expect("cycle 3-4-3 must be found");

        assert_closed_and_real(&cycle, &graph);
        assert!(cycle.vertices.contains(&3));
        assert!(cycle.vertices.contains(&4));
    }

    #[test]
    fn spfa_uses_lightest_parallel_edge() {
        let graph = build_graph(2, &[(0, 1, 5), (0, 1, -4), (1, 0, 1)]);

        let cycle = SpfaDetector::default()
            .find_negative_cycle(&graph)
            .unwrap()
            .expect("0 -(-4)-> 1 -(1)-> 0 is negative");

        assert_eq!(cycle.weight, -3);
    }

    #[test]
    fn spfa_chain_with_multiple_cycles_finds_the_negative_one() {
        let graph = build_graph(
            4,
            &[(0, 1, 2), (1, 0, -1), (1, 2, 0), (2, 3, -4), (3, 2, 3)],
        );

        let cycle = SpfaDetector::default()
            .find_negative_cycle(&graph)
            .unwrap()
            .expect("2-3-2 has weight -1");

        assert_closed_and_real(&cycle, &graph);
        assert_eq!(cycle.len(), 2);
        assert!(cycle.vertices.contains(&2) && cycle.vertices.contains(&3));
    }
}
