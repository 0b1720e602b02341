use super::MetricsEngine;
use crate::SocialGraph;
use egonet_core::{AttributeValue, ContextId, EgoNetError, PersonId, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Which people a clustering query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterGroup {
    /// Every node, measured on the full graph.
    WholeGraph,
    /// Every alter, measured on the full graph.
    WithoutEgo,
    /// Alters known from one context, measured on the full graph.
    Context(ContextId),
}

impl ClusterGroup {
    /// Numeric selector: `0` whole graph, `-1` without ego, anything
    /// positive a context id.
    pub fn from_selector(selector: i64) -> Result<Self> {
        match selector {
            0 => Ok(ClusterGroup::WholeGraph),
            -1 => Ok(ClusterGroup::WithoutEgo),
            id if id > 0 && id <= ContextId::MAX as i64 => Ok(ClusterGroup::Context(id as ContextId)),
            other => Err(EgoNetError::InvalidAttribute(format!(
                "{} is not a group selector",
                other
            ))),
        }
    }
}

impl fmt::Display for ClusterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterGroup::WholeGraph => write!(f, "whole graph"),
            ClusterGroup::WithoutEgo => write!(f, "whole graph without ego"),
            ClusterGroup::Context(id) => write!(f, "context {}", id),
        }
    }
}

/// Local clustering coefficient `2T / (d (d - 1))` for each requested node
/// present in `graph`; nodes with degree below two score 0.
pub fn clustering_coefficients<I>(graph: &SocialGraph, nodes: I) -> BTreeMap<PersonId, f64>
where
    I: IntoIterator<Item = PersonId>,
{
    let mut coefficients = BTreeMap::new();
    for id in nodes {
        let Some(neighbors) = graph.neighbors(id) else {
            continue;
        };
        let degree = neighbors.len();
        if degree < 2 {
            coefficients.insert(id, 0.0);
            continue;
        }
        let neighbors: Vec<PersonId> = neighbors.iter().copied().collect();
        let mut triangles = 0usize;
        for (i, &u) in neighbors.iter().enumerate() {
            for &w in &neighbors[i + 1..] {
                if graph.has_edge(u, w) {
                    triangles += 1;
                }
            }
        }
        let c = (2 * triangles) as f64 / (degree * (degree - 1)) as f64;
        coefficients.insert(id, c);
    }
    coefficients
}

/// Mean of a coefficient map; `None` when it is empty.
pub fn average_clustering(coefficients: &BTreeMap<PersonId, f64>) -> Option<f64> {
    if coefficients.is_empty() {
        return None;
    }
    Some(coefficients.values().sum::<f64>() / coefficients.len() as f64)
}

pub type ClusteringByValue = BTreeMap<Option<AttributeValue>, BTreeMap<PersonId, f64>>;

impl<'a> MetricsEngine<'a> {
    /// Every group is measured on the full graph; the group only picks which
    /// nodes are reported.
    pub fn clustering(&self, group: ClusterGroup) -> Result<BTreeMap<PersonId, f64>> {
        let network = self.network;
        match group {
            ClusterGroup::WholeGraph => {
                let graph = network.graph();
                Ok(clustering_coefficients(graph, graph.nodes()))
            }
            ClusterGroup::WithoutEgo => {
                let graph = network.graph();
                let ego = network.ego();
                Ok(clustering_coefficients(
                    graph,
                    graph.nodes().filter(|id| *id != ego),
                ))
            }
            ClusterGroup::Context(context) => {
                network.contexts().get(context)?;
                let members: Vec<PersonId> = network
                    .store()
                    .people_known_from(context)
                    .iter()
                    .map(|p| p.id)
                    .collect();
                Ok(clustering_coefficients(network.graph(), members))
            }
        }
    }

    pub fn average_clustering(&self, group: ClusterGroup) -> Result<Option<f64>> {
        Ok(average_clustering(&self.clustering(group)?))
    }

    /// Partitions the roster by `attribute` and measures each partition's
    /// members on the full graph. People with no value share the `None` key.
    pub fn clustering_by_attribute(&self, attribute: &str) -> Result<ClusteringByValue> {
        let store = self.network.store();
        let column = store.groupable_column(attribute)?;

        let mut partitions: BTreeMap<Option<AttributeValue>, Vec<PersonId>> = BTreeMap::new();
        for person in store.iter() {
            partitions
                .entry(store.value(person, &column))
                .or_default()
                .push(person.id);
        }

        Ok(partitions
            .into_iter()
            .map(|(value, members)| {
                (
                    value,
                    clustering_coefficients(self.network.graph(), members),
                )
            })
            .collect())
    }

    /// Average clustering per attribute value.
    pub fn clustering_by_attribute_summary(
        &self,
        attribute: &str,
    ) -> Result<BTreeMap<Option<AttributeValue>, f64>> {
        Ok(self
            .clustering_by_attribute(attribute)?
            .into_iter()
            .filter_map(|(value, coefficients)| {
                average_clustering(&coefficients).map(|avg| (value, avg))
            })
            .collect())
    }
}
