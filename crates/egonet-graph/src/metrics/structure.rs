use super::{EgoScope, MetricsEngine};
use crate::SocialGraph;
use egonet_core::{EgoNetError, PersonRef, Result};

impl<'a> MetricsEngine<'a> {
    /// Degree in the full graph.
    pub fn degree(&self, person: impl Into<PersonRef>) -> Result<usize> {
        let person = person.into();
        let id = self.resolve_node(&person)?;
        self.network
            .graph()
            .degree(id)
            .ok_or_else(|| EgoNetError::UnknownNode(person.to_string()))
    }

    /// Mean degree within the scoped graph; `None` if it has no nodes.
    pub fn average_degree(&self, scope: EgoScope) -> Option<f64> {
        let (graph, _) = self.scoped(scope);
        let n = graph.node_count();
        if n == 0 {
            return None;
        }
        Some((2 * graph.edge_count()) as f64 / n as f64)
    }

    pub fn density(&self, scope: EgoScope) -> f64 {
        self.scoped(scope).0.density()
    }

    /// Without the ego, alters left isolated count as their own component.
    pub fn component_count(&self, scope: EgoScope) -> usize {
        let network = self.network;
        match scope {
            EgoScope::WithEgo => network.graph().connected_components().len(),
            EgoScope::WithoutEgo => network
                .graph()
                .without_node(network.ego())
                .connected_components()
                .len(),
        }
    }

    pub fn average_path_length(&self, scope: EgoScope) -> Result<f64> {
        let (graph, _) = self.scoped(scope);
        let (total, pairs) = path_totals(&graph)?;
        if pairs == 0 {
            return Ok(0.0);
        }
        Ok(total as f64 / pairs as f64)
    }

    pub fn diameter(&self, scope: EgoScope) -> Result<usize> {
        let (graph, _) = self.scoped(scope);
        require_connected(&graph)?;
        let dense = graph.dense();
        Ok((0..dense.len())
            .flat_map(|s| dense.distances_from(s))
            .flatten()
            .max()
            .unwrap_or(0))
    }
}

fn require_connected(graph: &SocialGraph) -> Result<()> {
    if graph.is_empty() {
        return Err(EgoNetError::Disconnected("graph has no nodes".to_string()));
    }
    let components = graph.connected_components().len();
    if components > 1 {
        return Err(EgoNetError::Disconnected(format!(
            "{} components",
            components
        )));
    }
    Ok(())
}

/// Sum of shortest-path lengths over ordered pairs, and the pair count.
fn path_totals(graph: &SocialGraph) -> Result<(usize, usize)> {
    require_connected(graph)?;
    let dense = graph.dense();
    let n = dense.len();
    let total = (0..n)
        .map(|s| dense.distances_from(s).into_iter().flatten().sum::<usize>())
        .sum();
    Ok((total, n * (n - 1)))
}
