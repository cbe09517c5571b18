//! Degree and betweenness centrality over an undirected simple graph.
//!
//! Betweenness follows Brandes (2001) for unweighted graphs: one BFS per
//! source counting shortest paths, then dependencies accumulated in reverse
//! BFS order. Sources are processed on the rayon pool but their
//! contributions are summed in source order, so results do not depend on
//! scheduling.
//!
//! Normalization matches the usual undirected convention: the raw sum over
//! ordered sources (which sees every unordered pair twice) is multiplied by
//! `1 / ((n - 1)(n - 2))` when `n > 2`.

use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;
use std::collections::VecDeque;
use tracing::warn;

/// Result of a betweenness pass.
#[derive(Debug, Clone, PartialEq)]
pub enum BetweennessOutcome {
    /// Scores indexed by node position.
    Computed(Vec<f64>),
    /// The graph had no paths to measure (no edges, or a non-finite score
    /// came out); every node scores 0.
    DegenerateDefault,
}

impl BetweennessOutcome {
    pub fn score(&self, index: usize) -> f64 {
        match self {
            BetweennessOutcome::Computed(scores) => scores.get(index).copied().unwrap_or(0.0),
            BetweennessOutcome::DegenerateDefault => 0.0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, BetweennessOutcome::DegenerateDefault)
    }
}

/// `deg(v) / (n - 1)` for every node; all zeros when `n <= 1`.
pub fn degree_centrality<N, E>(graph: &UnGraph<N, E>) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    graph
        .node_indices()
        .map(|v| graph.neighbors(v).count() as f64 * scale)
        .collect()
}

pub fn betweenness_centrality<N, E>(graph: &UnGraph<N, E>) -> BetweennessOutcome
where
    N: Sync,
    E: Sync,
{
    let n = graph.node_count();
    if graph.edge_count() == 0 {
        return BetweennessOutcome::DegenerateDefault;
    }

    // Parallel per-source dependency vectors, collected in source order
    let sources: Vec<NodeIndex> = graph.node_indices().collect();
    let per_source: Vec<Vec<f64>> = sources
        .into_par_iter()
        .map(|s| source_dependencies(graph, s))
        .collect();

    let mut scores = vec![0.0_f64; n];
    for delta in &per_source {
        for (score, d) in scores.iter_mut().zip(delta) {
            *score += d;
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for score in &mut scores {
            *score *= scale;
        }
    }

    if scores.iter().any(|s| !s.is_finite()) {
        warn!(nodes = n, "betweenness produced non-finite scores; using zeros");
        return BetweennessOutcome::DegenerateDefault;
    }

    BetweennessOutcome::Computed(scores)
}

/// Dependency of `source` on every node, with the source's own entry zeroed.
fn source_dependencies<N, E>(graph: &UnGraph<N, E>, source: NodeIndex) -> Vec<f64> {
    let n = graph.node_count();
    let mut sigma = vec![0.0_f64; n];
    let mut dist = vec![-1_i64; n];
    let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);

    sigma[source.index()] = 1.0;
    dist[source.index()] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        let vi = v.index();
        for w in graph.neighbors(v) {
            let wi = w.index();
            if dist[wi] < 0 {
                dist[wi] = dist[vi] + 1;
                queue.push_back(w);
            }
            if dist[wi] == dist[vi] + 1 {
                sigma[wi] += sigma[vi];
                predecessors[wi].push(v);
            }
        }
    }

    let mut delta = vec![0.0_f64; n];
    for &w in order.iter().rev() {
        let wi = w.index();
        for &v in &predecessors[wi] {
            let vi = v.index();
            delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
        }
    }
    delta[source.index()] = 0.0;
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(u32, u32)]) -> UnGraph<(), ()> {
        let mut g = UnGraph::with_capacity(n, edges.len());
        for _ in 0..n {
            g.add_node(());
        }
        for &(a, b) in edges {
            g.add_edge(NodeIndex::new(a as usize), NodeIndex::new(b as usize), ());
        }
        g
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn degree_of_single_node_is_zero() {
        assert_eq!(degree_centrality(&graph(1, &[])), vec![0.0]);
        assert!(degree_centrality(&graph(0, &[])).is_empty());
    }

    #[test]
    fn degree_is_fraction_of_other_nodes() {
        let d = degree_centrality(&graph(3, &[(0, 1)]));
        assert_eq!(d, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn edgeless_graph_is_degenerate() {
        assert!(betweenness_centrality(&graph(0, &[])).is_degenerate());
        assert!(betweenness_centrality(&graph(1, &[])).is_degenerate());
        let outcome = betweenness_centrality(&graph(4, &[]));
        assert!(outcome.is_degenerate());
        assert_eq!(outcome.score(3), 0.0);
    }

    #[test]
    fn path_middle_node_is_a_full_bridge() {
        // 0 - 1 - 2
        let outcome = betweenness_centrality(&graph(3, &[(0, 1), (1, 2)]));
        assert_close(outcome.score(0), 0.0);
        assert_close(outcome.score(1), 1.0);
        assert_close(outcome.score(2), 0.0);
    }

    #[test]
    fn star_center_sits_on_every_leaf_pair() {
        let outcome = betweenness_centrality(&graph(4, &[(0, 1), (0, 2), (0, 3)]));
        assert_close(outcome.score(0), 1.0);
        for leaf in 1..4 {
            assert_close(outcome.score(leaf), 0.0);
        }
    }

    #[test]
    fn longer_path_matches_closed_form() {
        // 0 - 1 - 2 - 3: inner nodes each lie on 2 of the 3 pairs that need
        // an intermediary, normalized by (n-1)(n-2)/2 = 3.
        let outcome = betweenness_centrality(&graph(4, &[(0, 1), (1, 2), (2, 3)]));
        assert_close(outcome.score(1), 2.0 / 3.0);
        assert_close(outcome.score(2), 2.0 / 3.0);
    }

    #[test]
    fn cliques_have_no_brokers() {
        // Two disjoint triangles plus an isolated node
        let outcome = betweenness_centrality(&graph(
            7,
            &[(0, 1), (0, 2), (1, 2), (3, 4), (3, 5), (4, 5)],
        ));
        assert!(!outcome.is_degenerate());
        for v in 0..7 {
            assert_close(outcome.score(v), 0.0);
        }
    }

    #[test]
    fn single_edge_is_computed_but_zero() {
        let outcome = betweenness_centrality(&graph(2, &[(0, 1)]));
        assert_eq!(outcome, BetweennessOutcome::Computed(vec![0.0, 0.0]));
    }
}
