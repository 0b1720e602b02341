//! Degree, betweenness (Brandes), closeness and eigenvector centrality on
//! undirected, unweighted graphs. Normalisations follow the usual
//! social-network conventions so values are comparable across graph sizes.

use super::{CentralityKind, CentralityScores, EgoScope, MetricsEngine, ISOLATE_SENTINEL};
use crate::SocialGraph;
use egonet_core::{EgoNetError, PersonId, PersonRef, Result};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::warn;

/// Degree divided by `n - 1`. A single-node graph scores 1.
pub fn degree_centrality(graph: &SocialGraph) -> CentralityScores {
    let n = graph.node_count();
    if n <= 1 {
        return graph.nodes().map(|id| (id, 1.0)).collect();
    }
    let denom = (n - 1) as f64;
    graph
        .nodes()
        .map(|id| (id, graph.degree(id).unwrap_or(0) as f64 / denom))
        .collect()
}

/// Brandes' algorithm, normalised by `(n - 1)(n - 2)`.
pub fn betweenness_centrality(graph: &SocialGraph) -> CentralityScores {
    let dense = graph.dense();
    let n = dense.len();
    let mut bc = vec![0.0_f64; n];

    for s in 0..n {
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist = vec![-1_i64; n];
        let mut delta = vec![0.0_f64; n];

        sigma[s] = 1.0;
        dist[s] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &dense.neighbors[v] {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                bc[w] += delta[w];
            }
        }
    }

    // Each undirected pair was counted from both ends.
    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for b in bc.iter_mut() {
            *b *= scale;
        }
    }

    dense.ids.into_iter().zip(bc).collect()
}

/// Closeness with the Wasserman–Faust correction for disconnected graphs:
/// `(r - 1) / sum(d)` scaled by `(r - 1) / (n - 1)`, where `r` is the size of
/// the node's reachable set.
pub fn closeness_centrality(graph: &SocialGraph) -> CentralityScores {
    let dense = graph.dense();
    let n = dense.len();
    let mut scores = CentralityScores::new();

    for s in 0..n {
        let dist = dense.distances_from(s);
        let reachable = dist.iter().filter(|d| d.is_some()).count();
        let total: usize = dist.iter().flatten().sum();
        let closeness = if total > 0 && n > 1 {
            let r = (reachable - 1) as f64;
            (r / total as f64) * (r / (n - 1) as f64)
        } else {
            0.0
        };
        scores.insert(dense.ids[s], closeness);
    }
    scores
}

/// Power iteration on `A + I`, L2-normalised each round. Converged once the
/// L1 change falls below `n * tolerance`.
pub fn eigenvector_centrality(
    graph: &SocialGraph,
    max_iterations: usize,
    tolerance: f64,
) -> Result<CentralityScores> {
    let dense = graph.dense();
    let n = dense.len();
    if n == 0 {
        return Ok(CentralityScores::new());
    }

    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..max_iterations {
        let last = x.clone();
        for v in 0..n {
            for &w in &dense.neighbors[v] {
                x[w] += last[v];
            }
        }

        let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        for v in x.iter_mut() {
            *v /= norm;
        }

        let change: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * tolerance {
            return Ok(dense.ids.into_iter().zip(x).collect());
        }
    }

    warn!(max_iterations, nodes = n, "Eigenvector centrality failed to converge");
    Err(EgoNetError::Convergence {
        iterations: max_iterations,
    })
}

fn with_sentinels(mut scores: CentralityScores, isolates: &BTreeSet<PersonId>) -> CentralityScores {
    for &id in isolates {
        scores.insert(id, ISOLATE_SENTINEL);
    }
    scores
}

impl<'a> MetricsEngine<'a> {
    pub fn degree_centrality(&self, scope: EgoScope) -> CentralityScores {
        let (graph, isolates) = self.scoped(scope);
        with_sentinels(degree_centrality(&graph), &isolates)
    }

    pub fn betweenness_centrality(&self, scope: EgoScope) -> CentralityScores {
        let (graph, isolates) = self.scoped(scope);
        with_sentinels(betweenness_centrality(&graph), &isolates)
    }

    pub fn closeness_centrality(&self, scope: EgoScope) -> CentralityScores {
        let (graph, isolates) = self.scoped(scope);
        with_sentinels(closeness_centrality(&graph), &isolates)
    }

    pub fn eigenvector_centrality(
        &self,
        scope: EgoScope,
        max_iterations: usize,
    ) -> Result<CentralityScores> {
        let (graph, isolates) = self.scoped(scope);
        let scores =
            eigenvector_centrality(&graph, max_iterations, self.config.eigenvector_tolerance)?;
        Ok(with_sentinels(scores, &isolates))
    }

    /// Eigenvector centrality uses the configured iteration bound.
    pub fn centrality(&self, kind: CentralityKind, scope: EgoScope) -> Result<CentralityScores> {
        Ok(match kind {
            CentralityKind::Degree => self.degree_centrality(scope),
            CentralityKind::Betweenness => self.betweenness_centrality(scope),
            CentralityKind::Closeness => self.closeness_centrality(scope),
            CentralityKind::Eigenvector => {
                self.eigenvector_centrality(scope, self.config.eigenvector_max_iterations)?
            }
        })
    }

    /// Score of a single person, looked up by id or name.
    pub fn centrality_of(
        &self,
        kind: CentralityKind,
        scope: EgoScope,
        person: impl Into<PersonRef>,
    ) -> Result<f64> {
        let person = person.into();
        let id = self.resolve_node(&person)?;
        let scores = self.centrality(kind, scope)?;
        scores
            .get(&id)
            .copied()
            .ok_or_else(|| EgoNetError::UnknownNode(format!("{} is not in the {} view", person, kind)))
    }

    /// Re-keys scores by display name. People sharing a name collapse to one
    /// entry.
    pub fn resolve_names(&self, scores: &CentralityScores) -> Result<BTreeMap<String, f64>> {
        scores
            .iter()
            .map(|(id, v)| Ok((self.network.id_to_name(*id)?.to_string(), *v)))
            .collect()
    }

    pub(crate) fn resolve_node(&self, person: &PersonRef) -> Result<PersonId> {
        self.network
            .store()
            .resolve(person)
            .map_err(|_| EgoNetError::UnknownNode(person.to_string()))
    }
}
